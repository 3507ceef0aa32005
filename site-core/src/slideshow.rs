use crate::context::SiteContext;
use crate::dom::Dom;
use crate::error::SiteError;
use std::cell::RefCell;
use std::rc::Rc;

pub const IMAGE_CLASS: &str = "hero-slideshow__image";
pub const ACTIVE_CLASS: &str = "is-active";

/// Splits a `|`-delimited list, trimming entries and dropping empty ones.
pub fn parse_image_list(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// One of the two stacked image elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// What a single tick does to the two image elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub src: String,
    pub show: Slot,
    pub hide: Slot,
}

/// Cycle position of a double-buffered cross-fade.
#[derive(Clone, Debug)]
pub struct Crossfade {
    images: Vec<String>,
    index: usize,
    active: Slot,
}

impl Crossfade {
    /// `None` for an empty list.
    pub fn new(images: Vec<String>) -> Option<Self> {
        if images.is_empty() {
            return None;
        }
        Some(Self {
            images,
            index: 0,
            active: Slot::First,
        })
    }

    /// Sources for the first and second element at start-up.
    pub fn initial(&self) -> (&str, &str) {
        let first = &self.images[0];
        let second = self.images.get(1).unwrap_or(first);
        (first, second)
    }

    pub fn cycles(&self) -> bool {
        self.images.len() > 1
    }

    pub fn current(&self) -> &str {
        &self.images[self.index]
    }

    pub fn active(&self) -> Slot {
        self.active
    }

    pub fn advance(&mut self) -> Step {
        self.index = (self.index + 1) % self.images.len();
        let show = self.active.other();
        let hide = self.active;
        self.active = show;
        Step {
            src: self.images[self.index].clone(),
            show,
            hide,
        }
    }
}

/// Sets up the hero slideshow. Returns `false` when the page has none.
pub fn init_slideshow<D: Dom>(dom: &D, ctx: &SiteContext) -> Result<bool, SiteError> {
    let Some(container) = dom.first_with_attribute(&ctx.config.slideshow_attribute) else {
        return Ok(false);
    };
    let images = parse_image_list(
        &dom.attribute(&container, &ctx.config.images_attribute)
            .unwrap_or_default(),
    );
    let Some(cycle) = Crossfade::new(images) else {
        return Ok(false);
    };

    let (first_src, second_src) = cycle.initial();
    let first = dom.create_element("img")?;
    let second = dom.create_element("img")?;
    dom.set_attribute(&first, "class", &format!("{IMAGE_CLASS} {ACTIVE_CLASS}"))?;
    dom.set_attribute(&second, "class", IMAGE_CLASS)?;
    dom.set_attribute(&first, "alt", "")?;
    dom.set_attribute(&second, "alt", "")?;
    dom.set_attribute(&first, "src", first_src)?;
    dom.set_attribute(&second, "src", second_src)?;
    dom.append_child(&container, &first)?;
    dom.append_child(&container, &second)?;

    if !cycle.cycles() {
        return Ok(true);
    }

    let slots = [first, second];
    let cycle = RefCell::new(cycle);
    let tick_dom = dom.clone();
    dom.set_interval(
        ctx.config.slide_interval_ms,
        Rc::new(move || {
            let step = cycle.borrow_mut().advance();
            let show = &slots[step.show.index()];
            let hide = &slots[step.hide.index()];
            if let Err(e) = tick_dom.set_attribute(show, "src", &step.src) {
                log::warn!("slideshow could not load {}: {e}", step.src);
            }
            tick_dom.add_class(show, ACTIVE_CLASS);
            tick_dom.remove_class(hide, ACTIVE_CLASS);
        }),
    )?;
    Ok(true)
}
