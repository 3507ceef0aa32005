use super::{Dom, DomEvent, EventKind, Flow, Listener, Tick};
use crate::error::SiteError;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle to a node inside a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Tag given to the node that stands in for spliced markup.
pub const MARKUP_TAG: &str = "#markup";

#[derive(Default)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: Option<String>,
    markup: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    listeners: Vec<(EventKind, Listener)>,
}

impl NodeData {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    fn set_classes(&mut self, classes: &[String]) {
        let joined = classes.join(" ");
        upsert(&mut self.attributes, "class", &joined);
    }
}

struct Interval {
    period_ms: u32,
    tick: Tick,
}

#[derive(Default)]
struct Arena {
    nodes: Vec<NodeData>,
    document_listeners: Vec<(EventKind, Listener)>,
    intervals: Vec<Interval>,
}

/// A small arena-backed document: `<html>` with an empty `<body>`.
///
/// Listeners bubble from the target through its ancestors and then to the
/// document. Intervals never fire on their own; call [`MemoryDom::tick_intervals`].
#[derive(Clone)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let dom = Self {
            arena: Rc::new(RefCell::new(Arena::default())),
        };
        let html = dom.alloc("html");
        let body = dom.alloc("body");
        dom.attach(html, body);
        dom
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body_node(&self) -> NodeId {
        NodeId(1)
    }

    /// Test-setup helper: creates `<tag ...attributes>` as the last child of `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let node = self.alloc(tag);
        {
            let mut arena = self.arena.borrow_mut();
            for (k, v) in attributes {
                upsert(&mut arena.nodes[node.0].attributes, k, v);
            }
        }
        self.attach(parent, node);
        node
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.arena.borrow().nodes[node.0].tag.clone()
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.arena.borrow().nodes[node.0].text.clone()
    }

    pub fn markup(&self, node: NodeId) -> Option<String> {
        self.arena.borrow().nodes[node.0].markup.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.arena.borrow().nodes[node.0]
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena.borrow().nodes[node.0].children.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().nodes[node.0].parent
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.arena.borrow().nodes[node.0].listeners.len()
    }

    pub fn document_listener_count(&self) -> usize {
        self.arena.borrow().document_listeners.len()
    }

    pub fn interval_count(&self) -> usize {
        self.arena.borrow().intervals.len()
    }

    pub fn interval_periods(&self) -> Vec<u32> {
        self.arena
            .borrow()
            .intervals
            .iter()
            .map(|i| i.period_ms)
            .collect()
    }

    /// Connected elements with `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let connected = self.connected();
        let arena = self.arena.borrow();
        connected
            .into_iter()
            .filter(|n| arena.nodes[n.0].classes().iter().any(|c| c == class))
            .collect()
    }

    /// Dispatches a bubbling click at `target`. Returns whether default was prevented.
    pub fn click(&self, target: NodeId) -> bool {
        self.dispatch(target, EventKind::Click, None)
    }

    pub fn key_down(&self, target: NodeId, key: &str) -> bool {
        self.dispatch(target, EventKind::KeyDown, Some(key))
    }

    /// A key press with no focused element: only document listeners run.
    pub fn key_down_document(&self, key: &str) -> bool {
        let event = DomEvent {
            key: Some(key.to_string()),
            on_target: false,
        };
        self.run_document_listeners(EventKind::KeyDown, &event)
    }

    /// Fires every registered interval once.
    pub fn tick_intervals(&self) {
        let ticks: Vec<Tick> = self
            .arena
            .borrow()
            .intervals
            .iter()
            .map(|i| i.tick.clone())
            .collect();
        for tick in ticks {
            tick();
        }
    }

    fn alloc(&self, tag: &str) -> NodeId {
        let mut arena = self.arena.borrow_mut();
        arena.nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        NodeId(arena.nodes.len() - 1)
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut arena = self.arena.borrow_mut();
        arena.nodes[parent.0].children.push(child);
        arena.nodes[child.0].parent = Some(parent);
    }

    fn detach(&self, node: NodeId) {
        let mut arena = self.arena.borrow_mut();
        if let Some(parent) = arena.nodes[node.0].parent.take() {
            arena.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn ancestors_and_self(&self, node: NodeId) -> Vec<NodeId> {
        let arena = self.arena.borrow();
        let mut path = vec![node];
        let mut cursor = arena.nodes[node.0].parent;
        while let Some(p) = cursor {
            path.push(p);
            cursor = arena.nodes[p.0].parent;
        }
        path
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.ancestors_and_self(node).last() == Some(&self.root())
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let arena = self.arena.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = arena.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(arena.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn connected(&self) -> Vec<NodeId> {
        let mut all = vec![self.root()];
        all.extend(self.descendants(self.root()));
        all
    }

    fn dispatch(&self, target: NodeId, kind: EventKind, key: Option<&str>) -> bool {
        let mut prevented = false;
        for current in self.ancestors_and_self(target) {
            let listeners: Vec<Listener> = self.arena.borrow().nodes[current.0]
                .listeners
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, l)| l.clone())
                .collect();
            let event = DomEvent {
                key: key.map(ToString::to_string),
                on_target: current == target,
            };
            for listener in listeners {
                prevented |= listener(&event) == Flow::PreventDefault;
            }
        }

        if self.is_connected(target) {
            let event = DomEvent {
                key: key.map(ToString::to_string),
                on_target: false,
            };
            prevented |= self.run_document_listeners(kind, &event);
        }
        prevented
    }

    fn run_document_listeners(&self, kind: EventKind, event: &DomEvent) -> bool {
        let listeners: Vec<Listener> = self
            .arena
            .borrow()
            .document_listeners
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, l)| l.clone())
            .collect();
        let mut prevented = false;
        for listener in listeners {
            prevented |= listener(event) == Flow::PreventDefault;
        }
        prevented
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Some(self.body_node())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let connected = self.connected();
        let arena = self.arena.borrow();
        connected
            .into_iter()
            .find(|n| arena.nodes[n.0].attribute("id") == Some(id))
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        let connected = self.connected();
        let arena = self.arena.borrow();
        connected
            .into_iter()
            .filter(|n| arena.nodes[n.0].attribute(name).is_some())
            .collect()
    }

    fn find_by_class(&self, scope: &NodeId, class: &str) -> Option<NodeId> {
        let descendants = self.descendants(*scope);
        let arena = self.arena.borrow();
        descendants
            .into_iter()
            .find(|n| arena.nodes[n.0].classes().iter().any(|c| c == class))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, SiteError> {
        if tag.is_empty() || tag.contains(char::is_whitespace) {
            return Err(SiteError::Dom(format!("invalid tag name '{tag}'")));
        }
        Ok(self.alloc(tag))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.arena.borrow().nodes[node.0]
            .attribute(name)
            .map(ToString::to_string)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), SiteError> {
        if name.is_empty() {
            return Err(SiteError::Dom("empty attribute name".into()));
        }
        upsert(&mut self.arena.borrow_mut().nodes[node.0].attributes, name, value);
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        for child in self.children(*node) {
            self.detach(child);
        }
        self.arena.borrow_mut().nodes[node.0].text = Some(text.to_string());
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        upsert(&mut self.arena.borrow_mut().nodes[node.0].style, property, value);
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut arena = self.arena.borrow_mut();
        let data = &mut arena.nodes[node.0];
        let mut classes = data.classes();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            data.set_classes(&classes);
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut arena = self.arena.borrow_mut();
        let data = &mut arena.nodes[node.0];
        if data.attribute("class").is_none() {
            return;
        }
        let mut classes = data.classes();
        classes.retain(|c| c != class);
        data.set_classes(&classes);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.arena.borrow().nodes[node.0]
            .classes()
            .iter()
            .any(|c| c == class)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), SiteError> {
        if self.ancestors_and_self(*parent).contains(child) {
            return Err(SiteError::Dom("cannot append a node into itself".into()));
        }
        self.attach(*parent, *child);
        Ok(())
    }

    fn clear_children(&self, node: &NodeId) {
        for child in self.children(*node) {
            self.detach(child);
        }
        self.arena.borrow_mut().nodes[node.0].text = None;
    }

    fn replace_with_markup(&self, node: &NodeId, markup: &str) -> Result<(), SiteError> {
        let Some(parent) = self.parent(*node) else {
            return Err(SiteError::Dom("cannot replace a node without a parent".into()));
        };
        let replacement = self.alloc(MARKUP_TAG);
        let mut arena = self.arena.borrow_mut();
        arena.nodes[replacement.0].markup = Some(markup.to_string());
        arena.nodes[replacement.0].parent = Some(parent);
        arena.nodes[node.0].parent = None;
        let siblings = &mut arena.nodes[parent.0].children;
        if let Some(slot) = siblings.iter_mut().find(|c| **c == *node) {
            *slot = replacement;
        }
        Ok(())
    }

    fn listen(&self, node: &NodeId, kind: EventKind, listener: Listener) {
        self.arena.borrow_mut().nodes[node.0]
            .listeners
            .push((kind, listener));
    }

    fn listen_document(&self, kind: EventKind, listener: Listener) {
        self.arena
            .borrow_mut()
            .document_listeners
            .push((kind, listener));
    }

    fn set_interval(&self, period_ms: u32, tick: Tick) -> Result<(), SiteError> {
        if period_ms == 0 {
            return Err(SiteError::Dom("interval period must be positive".into()));
        }
        self.arena
            .borrow_mut()
            .intervals
            .push(Interval { period_ms, tick });
        Ok(())
    }
}
