use site_core::dom::{Dom, DomEvent, EventKind, Flow, Listener, Tick};
use site_core::SiteError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, Window};

fn js_error(value: JsValue) -> SiteError {
    SiteError::Dom(format!("{value:?}"))
}

/// The live document, seen through the `Dom` seam.
#[derive(Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }
}

// Listeners and timers live as long as the page, so their closures are leaked.
fn attach(target: &EventTarget, kind: EventKind, listener: Listener) {
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let dom_event = DomEvent {
            key: event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key),
            on_target: event.target() == event.current_target(),
        };
        if listener(&dom_event) == Flow::PreventDefault {
            event.prevent_default();
        }
    });
    if let Err(e) =
        target.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
    {
        log::warn!("failed to add {} listener: {e:?}", kind.as_str());
    }
    closure.forget();
}

impl Dom for WebDom {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&format!("[{name}]")) else {
            log::warn!("invalid attribute selector [{name}]");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn find_by_class(&self, scope: &Element, class: &str) -> Option<Element> {
        scope.query_selector(&format!(".{class}")).ok().flatten()
    }

    fn create_element(&self, tag: &str) -> Result<Element, SiteError> {
        self.document.create_element(tag).map_err(js_error)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), SiteError> {
        node.set_attribute(name, value).map_err(js_error)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(e) = html.style().set_property(property, value) {
            log::warn!("failed to set style {property}: {e:?}");
        }
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            log::warn!("failed to add class {class}: {e:?}");
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().remove_1(class) {
            log::warn!("failed to remove class {class}: {e:?}");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), SiteError> {
        parent.append_child(child).map(|_| ()).map_err(js_error)
    }

    fn clear_children(&self, node: &Element) {
        node.set_inner_html("");
    }

    fn replace_with_markup(&self, node: &Element, markup: &str) -> Result<(), SiteError> {
        if node.parent_node().is_none() {
            return Err(SiteError::Dom("cannot replace a node without a parent".into()));
        }
        node.set_outer_html(markup);
        Ok(())
    }

    fn listen(&self, node: &Element, kind: EventKind, listener: Listener) {
        attach(node.as_ref(), kind, listener);
    }

    fn listen_document(&self, kind: EventKind, listener: Listener) {
        attach(self.document.as_ref(), kind, listener);
    }

    fn set_interval(&self, period_ms: u32, tick: Tick) -> Result<(), SiteError> {
        let timeout = i32::try_from(period_ms)
            .map_err(|_| SiteError::Dom(format!("interval {period_ms}ms out of range")))?;
        let closure = Closure::<dyn FnMut()>::new(move || tick());
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout,
            )
            .map_err(js_error)?;
        closure.forget();
        Ok(())
    }
}
