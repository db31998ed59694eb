//! An in-memory document implementing [`Host`].
//!
//! There is no layout engine: rects are whatever the caller assigns with
//! [`HeadlessDom::set_rect`]. Ticks, animation frames and events only run when the caller drives
//! them (`run_ticks`, `run_frame`, `dispatch`), which makes the controller fully deterministic in
//! tests and simulations.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::{ClientRect, Handler, Host, ListenTarget, StickyEvent, Task, Unsubscribe};

/// Identifies a node of a [`HeadlessDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// An owned listener target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Viewport,
    Node(NodeId),
}

struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    classes: Vec<String>,
    rect: ClientRect,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            classes: Vec::new(),
            rect: ClientRect::default(),
        }
    }
}

struct Listener {
    id: u64,
    target: Target,
    event: StickyEvent,
    handler: Handler,
}

struct DomState {
    nodes: Vec<NodeData>,
    viewport_height: f64,
    listeners: Vec<Listener>,
    next_listener: u64,
    ticks: VecDeque<Task>,
    frames: Vec<(u64, Task)>,
    next_frame: u64,
    rect_reads: Cell<usize>,
    style_writes: usize,
}

impl DomState {
    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }
}

/// A shared handle to an in-memory document.
///
/// Clones refer to the same document. The document starts with `<html>` and `<body>`; every
/// `NodeId` passed to its methods must come from the same document.
#[derive(Clone)]
pub struct HeadlessDom {
    state: Rc<RefCell<DomState>>,
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDom {
    pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

    pub fn new() -> Self {
        let mut html = NodeData::new("html");
        let mut body = NodeData::new("body");
        html.children.push(NodeId(1));
        body.parent = Some(NodeId(0));
        Self {
            state: Rc::new(RefCell::new(DomState {
                nodes: alloc::vec![html, body],
                viewport_height: Self::DEFAULT_VIEWPORT_HEIGHT,
                listeners: Vec::new(),
                next_listener: 0,
                ticks: VecDeque::new(),
                frames: Vec::new(),
                next_frame: 0,
                rect_reads: Cell::new(0),
                style_writes: 0,
            })),
        }
    }

    pub fn document_element(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body(&self) -> NodeId {
        NodeId(1)
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut state = self.state.borrow_mut();
        state.nodes.push(NodeData::new(tag));
        NodeId(state.nodes.len() - 1)
    }

    /// Appends `child` to `parent`, detaching it from its previous parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut state = self.state.borrow_mut();
        state.detach(child);
        state.nodes[child.0].parent = Some(parent);
        state.nodes[parent.0].children.push(child);
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn tag_name(&self, node: NodeId) -> String {
        self.state.borrow().nodes[node.0].tag.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.borrow().nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state.borrow().nodes[node.0].children.clone()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state.borrow();
        let parent = state.nodes[node.0].parent?;
        let siblings = &state.nodes[parent.0].children;
        let index = siblings.iter().position(|&c| c == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.parent(node).is_some()
    }

    pub fn set_rect(&self, node: NodeId, rect: ClientRect) {
        self.state.borrow_mut().nodes[node.0].rect = rect;
    }

    pub fn rect(&self, node: NodeId) -> ClientRect {
        self.state.borrow().nodes[node.0].rect
    }

    /// Simulates a viewport scroll by moving every node up by `dy`.
    pub fn scroll_by(&self, dy: f64) {
        for node in self.state.borrow_mut().nodes.iter_mut() {
            node.rect = node.rect.translated(-dy);
        }
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.state.borrow_mut().viewport_height = height;
    }

    /// The inline style value of `property`, if set.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.state.borrow().nodes[node.0].styles.get(property).cloned()
    }

    pub fn has_style(&self, node: NodeId, property: &str) -> bool {
        self.state.borrow().nodes[node.0].styles.contains_key(property)
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.state.borrow().nodes[node.0].classes.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn listener_count_on(&self, target: Target) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target)
            .count()
    }

    pub fn pending_ticks(&self) -> usize {
        self.state.borrow().ticks.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Total number of `bounding_rect` calls served.
    pub fn rect_reads(&self) -> usize {
        self.state.borrow().rect_reads.get()
    }

    /// Total number of inline style writes.
    pub fn style_writes(&self) -> usize {
        self.state.borrow().style_writes
    }

    /// Runs queued ticks until the queue is empty. Returns how many ran.
    pub fn run_ticks(&self) -> usize {
        let mut ran = 0usize;
        loop {
            let task = self.state.borrow_mut().ticks.pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    /// Runs the frames queued so far; frames requested while running wait for the next call.
    pub fn run_frame(&self) -> usize {
        let frames = core::mem::take(&mut self.state.borrow_mut().frames);
        let ran = frames.len();
        for (_, task) in frames {
            task();
        }
        ran
    }

    /// Fires `event` on `target`. Returns how many handlers ran.
    pub fn dispatch(&self, target: Target, event: StickyEvent) -> usize {
        let handlers: Vec<Handler> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target && l.event == event)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }
}

impl fmt::Debug for HeadlessDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessDom")
            .field("nodes", &state.nodes.len())
            .field("viewport_height", &state.viewport_height)
            .field("listeners", &state.listeners.len())
            .field("pending_ticks", &state.ticks.len())
            .field("pending_frames", &state.frames.len())
            .finish()
    }
}

impl Host for HeadlessDom {
    type Node = NodeId;
    type FrameId = u64;

    fn create_placeholder(&mut self) -> Option<NodeId> {
        Some(self.create_element("div"))
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn is_document_root(&self, node: &NodeId) -> bool {
        let state = self.state.borrow();
        let tag = &state.nodes[node.0].tag;
        tag == "HTML" || tag == "BODY"
    }

    fn has_attribute(&self, node: &NodeId, name: &str) -> bool {
        self.state.borrow().nodes[node.0]
            .attributes
            .contains_key(name)
    }

    fn insert_before(&mut self, node: &NodeId, reference: &NodeId) {
        let mut state = self.state.borrow_mut();
        let Some(parent) = state.nodes[reference.0].parent else {
            return;
        };
        state.detach(*node);
        let siblings = &mut state.nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, *node);
        state.nodes[node.0].parent = Some(parent);
    }

    fn remove(&mut self, node: &NodeId) {
        self.state.borrow_mut().detach(*node);
    }

    fn bounding_rect(&self, node: &NodeId) -> ClientRect {
        let state = self.state.borrow();
        state.rect_reads.set(state.rect_reads.get() + 1);
        state.nodes[node.0].rect
    }

    fn viewport_height(&self) -> f64 {
        self.state.borrow().viewport_height
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        state.style_writes += 1;
        state.nodes[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn remove_style(&mut self, node: &NodeId, property: &str) {
        self.state.borrow_mut().nodes[node.0].styles.remove(property);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.state.borrow().nodes[node.0]
            .classes
            .iter()
            .any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        let classes = &mut state.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.state.borrow_mut().nodes[node.0]
            .classes
            .retain(|c| c != class);
    }

    fn listen(
        &mut self,
        target: ListenTarget<'_, NodeId>,
        event: StickyEvent,
        handler: Handler,
    ) -> Unsubscribe {
        let target = match target {
            ListenTarget::Viewport => Target::Viewport,
            ListenTarget::Node(node) => Target::Node(*node),
        };
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push(Listener {
                id,
                target,
                event,
                handler,
            });
            id
        };
        let weak = Rc::downgrade(&self.state);
        Box::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }

    fn next_tick(&mut self, task: Task) {
        self.state.borrow_mut().ticks.push_back(task);
    }

    fn request_animation_frame(&mut self, task: Task) -> Option<u64> {
        let mut state = self.state.borrow_mut();
        let id = state.next_frame;
        state.next_frame += 1;
        state.frames.push((id, task));
        Some(id)
    }

    fn cancel_animation_frame(&mut self, id: u64) {
        self.state.borrow_mut().frames.retain(|(f, _)| *f != id);
    }
}
