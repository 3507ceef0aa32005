//! The document seam.
//!
//! Components never touch a browser API directly; they read and mutate the
//! page through [`Dom`]. The wasm entry point implements it over `web-sys`,
//! tests use [`MemoryDom`].

mod memory;

pub use memory::{MemoryDom, NodeId};

use crate::error::SiteError;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
        }
    }
}

/// What a listener gets to see of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomEvent {
    /// `KeyboardEvent.key` for key events.
    pub key: Option<String>,
    /// True when the element the listener sits on is the event target itself.
    pub on_target: bool,
}

impl DomEvent {
    pub fn key_is(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    PreventDefault,
}

pub type Listener = Rc<dyn Fn(&DomEvent) -> Flow>;
pub type Tick = Rc<dyn Fn()>;

pub trait Dom: Clone + 'static {
    type Node: Clone + PartialEq + 'static;

    fn body(&self) -> Option<Self::Node>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Connected elements carrying `name`, in document order.
    fn elements_with_attribute(&self, name: &str) -> Vec<Self::Node>;
    /// First descendant of `scope` with the given class.
    fn find_by_class(&self, scope: &Self::Node, class: &str) -> Option<Self::Node>;

    fn create_element(&self, tag: &str) -> Result<Self::Node, SiteError>;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), SiteError>;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), SiteError>;
    fn clear_children(&self, node: &Self::Node);
    /// Replaces `node` in its parent with the given markup.
    fn replace_with_markup(&self, node: &Self::Node, markup: &str) -> Result<(), SiteError>;

    fn listen(&self, node: &Self::Node, kind: EventKind, listener: Listener);
    fn listen_document(&self, kind: EventKind, listener: Listener);
    /// Runs `tick` every `period_ms` for the rest of the page lifetime.
    fn set_interval(&self, period_ms: u32, tick: Tick) -> Result<(), SiteError>;

    fn first_with_attribute(&self, name: &str) -> Option<Self::Node> {
        self.elements_with_attribute(name).into_iter().next()
    }
}
