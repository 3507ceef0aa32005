//! Declarative element trees.
//!
//! Components describe what they want as an [`El`] and hand it to [`mount`],
//! which is the only place that turns a description into live nodes. The
//! description can be inspected in tests without any document at all.

use crate::dom::{Dom, DomEvent, EventKind, Flow, Listener};
use crate::error::SiteError;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenPhoto { src: String, label: String },
    ClosePhoto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Click,
    /// Click whose target is the element itself, not one of its children.
    ClickOnSelf,
    /// Enter or Space; the browser default is suppressed.
    KeyActivate,
}

pub type Dispatch = Rc<dyn Fn(&Action)>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct El {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<El>,
    pub bindings: Vec<(Trigger, Action)>,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.push((property.to_string(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on(mut self, trigger: Trigger, action: Action) -> Self {
        self.bindings.push((trigger, action));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Builds live nodes for `el` and its subtree. The returned node is detached;
/// the caller decides where it goes.
pub fn mount<D: Dom>(dom: &D, el: &El, dispatch: &Dispatch) -> Result<D::Node, SiteError> {
    let node = dom.create_element(&el.tag)?;

    if !el.classes.is_empty() {
        dom.set_attribute(&node, "class", &el.classes.join(" "))?;
    }
    for (name, value) in &el.attributes {
        dom.set_attribute(&node, name, value)?;
    }
    for (property, value) in &el.style {
        dom.set_style(&node, property, value);
    }
    if let Some(text) = &el.text {
        dom.set_text(&node, text);
    }
    for child in &el.children {
        let child_node = mount(dom, child, dispatch)?;
        dom.append_child(&node, &child_node)?;
    }
    for (trigger, action) in &el.bindings {
        let (kind, listener) = bind(*trigger, action.clone(), dispatch.clone());
        dom.listen(&node, kind, listener);
    }

    Ok(node)
}

fn bind(trigger: Trigger, action: Action, dispatch: Dispatch) -> (EventKind, Listener) {
    match trigger {
        Trigger::Click => (
            EventKind::Click,
            Rc::new(move |_: &DomEvent| {
                dispatch(&action);
                Flow::Continue
            }),
        ),
        Trigger::ClickOnSelf => (
            EventKind::Click,
            Rc::new(move |event: &DomEvent| {
                if event.on_target {
                    dispatch(&action);
                }
                Flow::Continue
            }),
        ),
        Trigger::KeyActivate => (
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent| {
                if event.key_is("Enter") || event.key_is(" ") {
                    dispatch(&action);
                    Flow::PreventDefault
                } else {
                    Flow::Continue
                }
            }),
        ),
    }
}
