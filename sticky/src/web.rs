//! Browser [`Host`] backed by `web-sys`.
//!
//! Available with `feature = "web"` on `wasm32` targets. Host failures (`Err(JsValue)`) are logged
//! and otherwise ignored: the worst outcome is an element that does not stick.

use alloc::boxed::Box;

use js_sys::Function;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Document, EventTarget, HtmlElement, Node, Window};

use crate::{ClientRect, Handler, Host, ListenTarget, StickyEvent, Task, Unsubscribe};

/// A [`Host`] for the current browser window.
#[derive(Clone, Debug)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Returns `None` outside of a window context (e.g. in a worker).
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn from_window(window: Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self { window, document })
    }
}

impl Host for WebHost {
    type Node = HtmlElement;
    type FrameId = i32;

    fn create_placeholder(&mut self) -> Option<HtmlElement> {
        match self.document.create_element("div") {
            Ok(el) => el.dyn_into::<HtmlElement>().ok(),
            Err(_err) => {
                swarn!(err = ?_err, "WebHost: failed to create the placeholder");
                None
            }
        }
    }

    fn parent_element(&self, node: &HtmlElement) -> Option<HtmlElement> {
        node.parent_element()?.dyn_into::<HtmlElement>().ok()
    }

    fn is_document_root(&self, node: &HtmlElement) -> bool {
        let tag = node.tag_name();
        tag.eq_ignore_ascii_case("html") || tag.eq_ignore_ascii_case("body")
    }

    fn has_attribute(&self, node: &HtmlElement, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn insert_before(&mut self, node: &HtmlElement, reference: &HtmlElement) {
        let Some(parent) = reference.parent_node() else {
            return;
        };
        let reference: &Node = reference.as_ref();
        if let Err(_err) = parent.insert_before(node, Some(reference)) {
            swarn!(err = ?_err, "WebHost: failed to insert the placeholder");
        }
    }

    fn remove(&mut self, node: &HtmlElement) {
        node.remove();
    }

    fn bounding_rect(&self, node: &HtmlElement) -> ClientRect {
        let rect = node.get_bounding_client_rect();
        ClientRect::new(rect.top(), rect.left(), rect.width(), rect.height())
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn set_style(&mut self, node: &HtmlElement, property: &str, value: &str) {
        if let Err(_err) = node.style().set_property(property, value) {
            swarn!(property, err = ?_err, "WebHost: failed to set a style");
        }
    }

    fn remove_style(&mut self, node: &HtmlElement, property: &str) {
        let _ = node.style().remove_property(property);
    }

    fn has_class(&self, node: &HtmlElement, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &HtmlElement, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &HtmlElement, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn listen(
        &mut self,
        target: ListenTarget<'_, HtmlElement>,
        event: StickyEvent,
        handler: Handler,
    ) -> Unsubscribe {
        let target: EventTarget = match target {
            ListenTarget::Viewport => self.window.clone().into(),
            ListenTarget::Node(node) => node.clone().into(),
        };
        let closure = Closure::<dyn Fn()>::new(move || handler());
        let options = AddEventListenerOptions::new();
        options.set_passive(true);

        let name = event.as_str();
        if let Err(_err) = target.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            swarn!(event = name, err = ?_err, "WebHost: failed to add a listener");
        }

        Box::new(move || {
            let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        })
    }

    fn next_tick(&mut self, task: Task) {
        let callback = Closure::once_into_js(move || task());
        self.window
            .queue_microtask(callback.unchecked_ref::<Function>());
    }

    fn request_animation_frame(&mut self, task: Task) -> Option<i32> {
        // A cancelled frame never calls its once-closure, so that closure is never freed.
        let callback = Closure::once_into_js(move || task());
        match self
            .window
            .request_animation_frame(callback.unchecked_ref::<Function>())
        {
            Ok(id) => Some(id),
            Err(_err) => {
                swarn!(err = ?_err, "WebHost: requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_animation_frame(&mut self, id: i32) {
        let _ = self.window.cancel_animation_frame(id);
    }
}
