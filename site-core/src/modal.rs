use crate::config::SiteConfig;
use crate::dom::{Dom, DomEvent, EventKind, Flow};
use crate::error::SiteError;
use crate::view::{self, Action, Dispatch, El};
use std::rc::Rc;

pub const MODAL_ID: &str = "photo-modal";
pub const MODAL_CLASS: &str = "photo-modal";
pub const CONTENT_CLASS: &str = "photo-modal__content";
pub const CLOSE_CLASS: &str = "photo-modal__close";
pub const IMAGE_CLASS: &str = "photo-modal__image";
pub const OPEN_CLASS: &str = "is-open";
pub const BODY_OPEN_CLASS: &str = "modal-open";

/// Handle to the page's single photo overlay.
///
/// Obtained through [`PhotoModal::ensure`]; all open/close mutations go
/// through it.
#[derive(Clone)]
pub struct PhotoModal<D: Dom> {
    dom: D,
    modal: D::Node,
    image: D::Node,
}

impl<D: Dom> PhotoModal<D> {
    /// Returns the overlay already in the document, or builds and attaches one.
    ///
    /// Listeners are only registered when the overlay is built here, so calling
    /// this repeatedly never stacks handlers.
    pub fn ensure(dom: &D, config: &SiteConfig) -> Result<Self, SiteError> {
        if let Some(modal) = dom.element_by_id(MODAL_ID) {
            let image = dom
                .find_by_class(&modal, IMAGE_CLASS)
                .ok_or_else(|| SiteError::ModalMarkup(MODAL_ID.into()))?;
            return Ok(Self {
                dom: dom.clone(),
                modal,
                image,
            });
        }

        let body = dom
            .body()
            .ok_or_else(|| SiteError::Dom("document has no body".into()))?;

        let dispatch: Dispatch = Rc::new(|_: &Action| {});
        let modal = view::mount(dom, &overlay(config), &dispatch)?;
        let image = dom
            .find_by_class(&modal, IMAGE_CLASS)
            .ok_or_else(|| SiteError::ModalMarkup(MODAL_ID.into()))?;
        let close = dom
            .find_by_class(&modal, CLOSE_CLASS)
            .ok_or_else(|| SiteError::ModalMarkup(MODAL_ID.into()))?;
        dom.append_child(&body, &modal)?;

        let handle = Self {
            dom: dom.clone(),
            modal: modal.clone(),
            image,
        };

        let on_backdrop = handle.clone();
        dom.listen(
            &modal,
            EventKind::Click,
            Rc::new(move |event: &DomEvent| {
                if event.on_target {
                    on_backdrop.close();
                }
                Flow::Continue
            }),
        );

        let on_button = handle.clone();
        dom.listen(
            &close,
            EventKind::Click,
            Rc::new(move |_: &DomEvent| {
                on_button.close();
                Flow::Continue
            }),
        );

        let on_escape = handle.clone();
        dom.listen_document(
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent| {
                if event.key_is("Escape") && on_escape.is_open() {
                    on_escape.close();
                }
                Flow::Continue
            }),
        );

        log::debug!("photo modal created");
        Ok(handle)
    }

    /// Shows `src` with `label` as its accessible name. Opening an already
    /// open modal just swaps the image.
    pub fn open(&self, src: &str, label: &str) {
        self.set(&self.image, "src", src);
        self.set(&self.image, "alt", label);
        self.dom.add_class(&self.modal, OPEN_CLASS);
        self.set(&self.modal, "aria-hidden", "false");
        if let Some(body) = self.dom.body() {
            self.dom.add_class(&body, BODY_OPEN_CLASS);
        }
    }

    pub fn close(&self) {
        self.dom.remove_class(&self.modal, OPEN_CLASS);
        self.set(&self.modal, "aria-hidden", "true");
        self.set(&self.image, "src", "");
        if let Some(body) = self.dom.body() {
            self.dom.remove_class(&body, BODY_OPEN_CLASS);
        }
    }

    /// Reads the live class, so it stays correct if markup is touched elsewhere.
    pub fn is_open(&self) -> bool {
        self.dom.has_class(&self.modal, OPEN_CLASS)
    }

    pub fn handle(&self, action: &Action) {
        match action {
            Action::OpenPhoto { src, label } => self.open(src, label),
            Action::ClosePhoto => self.close(),
        }
    }

    /// A dispatcher that routes view actions to this modal.
    pub fn dispatcher(&self) -> Dispatch {
        let handle = self.clone();
        Rc::new(move |action: &Action| handle.handle(action))
    }

    fn set(&self, node: &D::Node, name: &str, value: &str) {
        if let Err(e) = self.dom.set_attribute(node, name, value) {
            log::warn!("photo modal could not set {name}: {e}");
        }
    }

    #[cfg(test)]
    fn overlay_node(&self) -> &D::Node {
        &self.modal
    }

    #[cfg(test)]
    fn image_node(&self) -> &D::Node {
        &self.image
    }
}

fn overlay(config: &SiteConfig) -> El {
    El::new("div")
        .class(MODAL_CLASS)
        .attr("id", MODAL_ID)
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .attr("aria-hidden", "true")
        .child(
            El::new("div")
                .class(CONTENT_CLASS)
                .child(
                    El::new("button")
                        .class(CLOSE_CLASS)
                        .attr("type", "button")
                        .attr("aria-label", config.close_label.clone())
                        .text("\u{00d7}"),
                )
                .child(El::new("img").class(IMAGE_CLASS).attr("alt", "")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    fn setup() -> (MemoryDom, PhotoModal<MemoryDom>) {
        let dom = MemoryDom::new();
        let modal = PhotoModal::ensure(&dom, &SiteConfig::default()).expect("modal");
        (dom, modal)
    }

    #[test]
    fn builds_accessible_overlay_once() {
        let (dom, modal) = setup();
        let overlay = *modal.overlay_node();

        assert_eq!(dom.parent(overlay), Some(dom.body_node()));
        assert_eq!(dom.attribute(&overlay, "role").as_deref(), Some("dialog"));
        assert_eq!(dom.attribute(&overlay, "aria-modal").as_deref(), Some("true"));
        assert_eq!(dom.attribute(&overlay, "aria-hidden").as_deref(), Some("true"));
        let close = dom.find_by_class(&overlay, CLOSE_CLASS).expect("close");
        assert_eq!(dom.attribute(&close, "aria-label").as_deref(), Some("Sluit foto"));
        assert_eq!(dom.text(close).as_deref(), Some("\u{00d7}"));
        assert_eq!(dom.document_listener_count(), 1);

        PhotoModal::ensure(&dom, &SiteConfig::default()).expect("again");
        assert_eq!(dom.elements_with_class(MODAL_CLASS).len(), 1);
        assert_eq!(dom.document_listener_count(), 1);
    }

    #[test]
    fn open_twice_keeps_one_overlay_with_latest_image() {
        let (dom, modal) = setup();
        let again = PhotoModal::ensure(&dom, &SiteConfig::default()).expect("again");

        modal.open("/img/a.jpg", "A");
        again.open("/img/b.jpg", "B");

        assert_eq!(dom.elements_with_class(MODAL_CLASS).len(), 1);
        let image = *modal.image_node();
        assert_eq!(dom.attribute(&image, "src").as_deref(), Some("/img/b.jpg"));
        assert_eq!(dom.attribute(&image, "alt").as_deref(), Some("B"));
        assert!(modal.is_open());
        assert!(dom.has_class(&dom.body_node(), BODY_OPEN_CLASS));
        assert_eq!(
            dom.attribute(modal.overlay_node(), "aria-hidden").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn close_always_clears_source() {
        let (dom, modal) = setup();
        let image = *modal.image_node();

        modal.close();
        assert_eq!(dom.attribute(&image, "src").as_deref(), Some(""));

        modal.open("/img/a.jpg", "A");
        modal.close();
        assert_eq!(dom.attribute(&image, "src").as_deref(), Some(""));
        assert!(!modal.is_open());
        assert!(!dom.has_class(&dom.body_node(), BODY_OPEN_CLASS));
        assert_eq!(
            dom.attribute(modal.overlay_node(), "aria-hidden").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn escape_closes_only_when_open() {
        let (dom, modal) = setup();
        let image = *modal.image_node();
        dom.set_attribute(&image, "src", "/left-over.jpg").expect("attr");

        dom.key_down_document("Escape");
        assert_eq!(dom.attribute(&image, "src").as_deref(), Some("/left-over.jpg"));

        modal.open("/img/a.jpg", "A");
        dom.key_down_document("Enter");
        assert!(modal.is_open());
        dom.key_down_document("Escape");
        assert!(!modal.is_open());
    }

    #[test]
    fn backdrop_click_closes_but_image_click_does_not() {
        let (dom, modal) = setup();
        modal.open("/img/a.jpg", "A");

        dom.click(*modal.image_node());
        assert!(modal.is_open());

        dom.click(*modal.overlay_node());
        assert!(!modal.is_open());
    }

    #[test]
    fn close_button_closes() {
        let (dom, modal) = setup();
        modal.open("/img/a.jpg", "A");
        let close = dom.find_by_class(modal.overlay_node(), CLOSE_CLASS).expect("close");
        dom.click(close);
        assert!(!modal.is_open());
    }

    #[test]
    fn existing_overlay_without_image_is_an_error() {
        let dom = MemoryDom::new();
        dom.append_element(dom.body_node(), "div", &[("id", MODAL_ID)]);
        assert!(matches!(
            PhotoModal::ensure(&dom, &SiteConfig::default()),
            Err(SiteError::ModalMarkup(_))
        ));
    }

    #[test]
    fn rejected_attribute_write_is_logged_not_fatal() {
        let (dom, modal) = setup();
        modal.open("/img/a.jpg", "A");

        modal.set(modal.image_node(), "", "ignored");

        assert!(modal.is_open());
        assert_eq!(
            dom.attribute(modal.image_node(), "src").as_deref(),
            Some("/img/a.jpg")
        );
        modal.close();
        assert_eq!(dom.attribute(modal.image_node(), "src").as_deref(), Some(""));
    }

    #[test]
    fn dispatcher_routes_actions() {
        let (_dom, modal) = setup();
        let dispatch = modal.dispatcher();
        dispatch(&Action::OpenPhoto {
            src: "/x.jpg".into(),
            label: "x".into(),
        });
        assert!(modal.is_open());
        dispatch(&Action::ClosePhoto);
        assert!(!modal.is_open());
    }
}
