use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::ClientRect;

/// A cleanup closure returned by [`Host::listen`]; calling it removes the listener.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// A deferred unit of work (next tick or animation frame).
pub type Task = Box<dyn FnOnce()>;

/// A shared event handler. One handler is registered for every `(target, event)` pair of a bind.
pub type Handler = Rc<dyn Fn()>;

/// Events that trigger a geometry recompute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StickyEvent {
    Resize,
    Scroll,
    TouchStart,
    TouchMove,
    TouchEnd,
    PageShow,
    Load,
}

impl StickyEvent {
    pub const ALL: [StickyEvent; 7] = [
        StickyEvent::Resize,
        StickyEvent::Scroll,
        StickyEvent::TouchStart,
        StickyEvent::TouchMove,
        StickyEvent::TouchEnd,
        StickyEvent::PageShow,
        StickyEvent::Load,
    ];

    /// The DOM event type name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::PageShow => "pageshow",
            Self::Load => "load",
        }
    }
}

/// Where a listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenTarget<'a, N> {
    /// The global viewport (`window`).
    Viewport,
    Node(&'a N),
}

/// The document seam.
///
/// The controller never touches a UI object directly: every read, write, listener and deferred
/// task goes through this trait. Implementations are expected to be cheap handles (clones share
/// the same document).
///
/// Contract: `next_tick` and `request_animation_frame` must *queue* their task. A host that runs a
/// task synchronously from inside the call re-enters the controller while it is borrowed.
pub trait Host: 'static {
    type Node: Clone + PartialEq + 'static;
    type FrameId: Copy + 'static;

    /// Creates a detached block element used as the placeholder.
    fn create_placeholder(&mut self) -> Option<Self::Node>;

    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is `<html>` or `<body>`; the container lookup stops there.
    fn is_document_root(&self, node: &Self::Node) -> bool;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool;

    /// Inserts `node` right before `reference`. No-op when `reference` has no parent.
    fn insert_before(&mut self, node: &Self::Node, reference: &Self::Node);

    /// Detaches `node` from its parent. No-op when already detached.
    fn remove(&mut self, node: &Self::Node);

    fn bounding_rect(&self, node: &Self::Node) -> ClientRect;

    fn viewport_height(&self) -> f64;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    fn remove_style(&mut self, node: &Self::Node, property: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Registers a passive listener and returns the closure that removes it.
    fn listen(
        &mut self,
        target: ListenTarget<'_, Self::Node>,
        event: StickyEvent,
        handler: Handler,
    ) -> Unsubscribe;

    /// Queues `task` for the owner's next render flush.
    fn next_tick(&mut self, task: Task);

    /// Queues `task` for the next animation frame. Returns `None` if the host refused it.
    fn request_animation_frame(&mut self, task: Task) -> Option<Self::FrameId>;

    fn cancel_animation_frame(&mut self, id: Self::FrameId);
}
