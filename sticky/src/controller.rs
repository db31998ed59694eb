use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::geometry::read_snapshot;
use crate::patch::{apply_patch, compute_patch, reset_element};
use crate::state::LastFired;
use crate::{
    ELEMENT_CLASS, GeometrySnapshot, Handler, Host, ListenTarget, OnStickCallback,
    PLACEHOLDER_CLASS, StickChange, StickState, StickyConfig, StickyEvent, StickyOptions,
    Unsubscribe,
};

/// Attribute that opts an ancestor in as the scroll container.
pub const CONTAINER_ATTRIBUTE: &str = "sticky-container";

/// Finds the nearest ancestor carrying [`CONTAINER_ATTRIBUTE`], falling back to the parent.
///
/// The walk stops at `<html>`/`<body>`.
pub fn resolve_container<H: Host>(host: &H, element: &H::Node) -> Option<H::Node> {
    let parent = host.parent_element(element)?;
    let mut node = Some(parent.clone());
    while let Some(current) = node {
        if host.is_document_root(&current) {
            break;
        }
        if host.has_attribute(&current, CONTAINER_ATTRIBUTE) {
            return Some(current);
        }
        node = host.parent_element(&current);
    }
    Some(parent)
}

struct Inner<H: Host> {
    host: H,
    element: H::Node,
    options: StickyOptions,

    /// Bumped on every unbind; a queued bind only attaches if the epoch still matches.
    epoch: u64,
    bind_queued: bool,
    unsubscribers: Vec<Unsubscribe>,

    is_pending: bool,
    frame: Option<H::FrameId>,

    placeholder: Option<H::Node>,
    container: Option<H::Node>,
    snapshot: Option<GeometrySnapshot>,
    state: StickState,
    last_fired: LastFired,
}

impl<H: Host> Inner<H> {
    fn is_bound(&self) -> bool {
        !self.unsubscribers.is_empty()
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame.take() {
            self.host.cancel_animation_frame(id);
        }
        self.is_pending = false;
    }

    fn release_listeners(&mut self) {
        for unsubscribe in self.unsubscribers.drain(..) {
            unsubscribe();
        }
    }

    /// Recomputes the state and applies it.
    ///
    /// Returns the callback to fire, if any; the caller invokes it once the borrow is released.
    fn refresh(&mut self) -> Option<(OnStickCallback, StickChange)> {
        let snapshot = read_snapshot(
            &self.host,
            &self.element,
            self.placeholder.as_ref(),
            self.container.as_ref(),
        )?;
        let state = StickState::evaluate(&snapshot, &self.options);
        strace!(
            top = state.is_top_sticky,
            bottom = state.is_bottom_sticky,
            placeholder_top = snapshot.placeholder.top,
            container_bottom = snapshot.container.bottom(),
            "Sticky::refresh"
        );
        self.snapshot = Some(snapshot);
        self.state = state;

        let patch = compute_patch(&snapshot, state, &self.options);
        apply_patch(
            &mut self.host,
            &self.element,
            self.placeholder.as_ref(),
            &patch,
        );

        let on_stick = self.options.on_stick()?.clone();
        let change = self.last_fired.transition(state)?;
        sdebug!(
            top = change.top,
            bottom = change.bottom,
            sticked = change.sticked,
            "Sticky: stick state changed"
        );
        Some((on_stick, change))
    }
}

impl<H: Host> Drop for Inner<H> {
    fn drop(&mut self) {
        self.cancel_frame();
        self.release_listeners();
    }
}

/// A sticky controller for one element.
///
/// The controller owns the element's sticky lifecycle:
/// - [`Sticky::bind`] inserts the placeholder and installs listeners on the next host tick.
/// - Every listener funnels into [`Sticky::update`], which coalesces bursts into at most one
///   recompute per animation frame.
/// - [`Sticky::unbind`] removes listeners, cancels the pending frame and restores the element.
///
/// Clones share the same instance. Dropping the last clone releases listeners and the pending
/// frame but leaves the element's inline state untouched; call `unbind` to restore it.
pub struct Sticky<H: Host> {
    inner: Rc<RefCell<Inner<H>>>,
}

impl<H: Host> Clone for Sticky<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> Sticky<H> {
    /// Creates a controller. Nothing is read or written until [`Sticky::bind`].
    pub fn new(host: H, element: H::Node, config: StickyConfig) -> Self {
        let options = StickyOptions::from(config);
        sdebug!(
            top_offset = options.top_offset(),
            bottom_offset = options.bottom_offset(),
            top = options.should_top_sticky(),
            bottom = options.should_bottom_sticky(),
            z_index = options.z_index(),
            "Sticky::new"
        );
        Self {
            inner: Rc::new(RefCell::new(Inner {
                host,
                element,
                options,
                epoch: 0,
                bind_queued: false,
                unsubscribers: Vec::new(),
                is_pending: false,
                frame: None,
                placeholder: None,
                container: None,
                snapshot: None,
                state: StickState::default(),
                last_fired: LastFired::default(),
            })),
        }
    }

    /// Schedules the bind for the host's next tick.
    ///
    /// No-op when already bound or when a bind is already queued.
    pub fn bind(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.is_bound() || inner.bind_queued {
            return;
        }
        inner.bind_queued = true;
        let epoch = inner.epoch;
        let weak = Rc::downgrade(&self.inner);
        inner.host.next_tick(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::attach(&inner, epoch);
            }
        }));
    }

    fn attach(rc: &Rc<RefCell<Inner<H>>>, epoch: u64) {
        let mut guard = rc.borrow_mut();
        let inner = &mut *guard;
        if inner.epoch != epoch || !inner.bind_queued {
            return;
        }
        inner.bind_queued = false;
        if inner.is_bound() {
            return;
        }

        let placeholder = inner.host.create_placeholder();
        if let Some(placeholder) = &placeholder {
            inner.host.insert_before(placeholder, &inner.element);
            inner.host.add_class(placeholder, PLACEHOLDER_CLASS);
        }
        inner.placeholder = placeholder;
        inner.container = resolve_container(&inner.host, &inner.element);
        inner.host.add_class(&inner.element, ELEMENT_CLASS);

        let handler: Handler = {
            let weak = Rc::downgrade(rc);
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self::schedule(&inner);
                }
            })
        };
        for event in StickyEvent::ALL {
            let unsubscribe =
                inner
                    .host
                    .listen(ListenTarget::Viewport, event, Rc::clone(&handler));
            inner.unsubscribers.push(unsubscribe);
            if let Some(container) = &inner.container {
                let unsubscribe =
                    inner
                        .host
                        .listen(ListenTarget::Node(container), event, Rc::clone(&handler));
                inner.unsubscribers.push(unsubscribe);
            }
        }
        sdebug!(
            listeners = inner.unsubscribers.len(),
            has_placeholder = inner.placeholder.is_some(),
            has_container = inner.container.is_some(),
            "Sticky: bound"
        );
    }

    /// Requests a recompute on the next animation frame.
    ///
    /// Calls made while a frame is already scheduled are no-ops, as are calls on an unbound
    /// controller.
    pub fn update(&self) {
        Self::schedule(&self.inner);
    }

    fn schedule(rc: &Rc<RefCell<Inner<H>>>) {
        let mut inner = rc.borrow_mut();
        if inner.is_pending || !inner.is_bound() {
            return;
        }
        let weak = Rc::downgrade(rc);
        let frame = inner.host.request_animation_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::on_frame(&inner);
            }
        }));
        match frame {
            Some(id) => {
                inner.frame = Some(id);
                inner.is_pending = true;
            }
            None => {
                swarn!("Sticky: host refused an animation frame");
            }
        }
    }

    fn on_frame(rc: &Rc<RefCell<Inner<H>>>) {
        let fired = {
            let mut inner = rc.borrow_mut();
            inner.is_pending = false;
            inner.frame = None;
            if !inner.is_bound() {
                return;
            }
            inner.refresh()
        };
        if let Some((on_stick, change)) = fired {
            on_stick(change);
        }
    }

    /// Removes every listener, cancels the pending frame and restores the element.
    ///
    /// Idempotent. A bind still waiting for its tick is abandoned.
    pub fn unbind(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.epoch = inner.epoch.wrapping_add(1);
        inner.bind_queued = false;
        inner.cancel_frame();
        inner.release_listeners();

        let placeholder = inner.placeholder.take();
        reset_element(&mut inner.host, &inner.element, placeholder.as_ref());
        inner.container = None;
        sdebug!("Sticky: unbound");
    }

    pub fn is_bound(&self) -> bool {
        self.inner.borrow().is_bound()
    }

    /// Whether an animation frame is scheduled.
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().is_pending
    }

    /// The state computed on the last frame.
    pub fn state(&self) -> StickState {
        self.inner.borrow().state
    }

    /// The geometry read on the last frame.
    pub fn snapshot(&self) -> Option<GeometrySnapshot> {
        self.inner.borrow().snapshot
    }

    pub fn options(&self) -> StickyOptions {
        self.inner.borrow().options.clone()
    }

    pub fn element(&self) -> H::Node {
        self.inner.borrow().element.clone()
    }

    pub fn placeholder(&self) -> Option<H::Node> {
        self.inner.borrow().placeholder.clone()
    }

    pub fn container(&self) -> Option<H::Node> {
        self.inner.borrow().container.clone()
    }

    /// Number of registered listeners (one per `(target, event)` pair).
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().unsubscribers.len()
    }
}

impl<H: Host> fmt::Debug for Sticky<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Sticky")
                .field("options", &inner.options)
                .field("bound", &inner.is_bound())
                .field("is_pending", &inner.is_pending)
                .field("state", &inner.state)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Sticky { .. }"),
        }
    }
}
