use crate::headless::{HeadlessDom, NodeId, Target};
use crate::*;

use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

struct Fixture {
    dom: HeadlessDom,
    container: NodeId,
    element: NodeId,
}

/// body > div (container, 1000px tall) > div (element, 50px tall at y=100).
fn fixture() -> Fixture {
    let dom = HeadlessDom::new();
    let container = dom.create_element("div");
    let element = dom.create_element("div");
    dom.append_child(dom.body(), container);
    dom.append_child(container, element);
    dom.set_rect(container, ClientRect::new(0.0, 0.0, 400.0, 1000.0));
    dom.set_rect(element, ClientRect::new(100.0, 20.0, 300.0, 50.0));
    Fixture {
        dom,
        container,
        element,
    }
}

impl Fixture {
    fn bound(&self, config: StickyConfig) -> Sticky<HeadlessDom> {
        let sticky = Sticky::new(self.dom.clone(), self.element, config);
        sticky.bind();
        self.dom.run_ticks();
        sticky
    }

    /// Lays out the placeholder where the element sits and moves the container.
    fn place(&self, sticky: &Sticky<HeadlessDom>, placeholder_top: f64, container_top: f64) {
        let placeholder = sticky.placeholder().unwrap();
        self.dom
            .set_rect(placeholder, ClientRect::new(placeholder_top, 20.0, 300.0, 0.0));
        self.dom
            .set_rect(self.container, ClientRect::new(container_top, 0.0, 400.0, 1000.0));
    }

    fn frame(&self, sticky: &Sticky<HeadlessDom>) {
        sticky.update();
        self.dom.run_frame();
    }

    fn style(&self, property: &str) -> Option<alloc::string::String> {
        self.dom.style(self.element, property)
    }

    fn has_class(&self, class: &str) -> bool {
        self.dom.classes(self.element).iter().any(|c| c == class)
    }
}

fn snapshot(placeholder_top: f64, container_top: f64, container_height: f64) -> GeometrySnapshot {
    GeometrySnapshot {
        height: 50.0,
        width: 300.0,
        x_offset: 20.0,
        placeholder: ClientRect::new(placeholder_top, 20.0, 300.0, 0.0),
        container: ClientRect::new(container_top, 0.0, 400.0, container_height),
        viewport_height: 800.0,
    }
}

fn options(config: StickyConfig) -> StickyOptions {
    StickyOptions::from(config)
}

#[test]
fn options_defaults() {
    let o = StickyOptions::default();
    assert_eq!(o.top_offset(), 0.0);
    assert_eq!(o.bottom_offset(), 0.0);
    assert!(o.should_top_sticky());
    assert!(!o.should_bottom_sticky());
    assert_eq!(o.z_index(), DEFAULT_Z_INDEX);
    assert!(o.on_stick().is_none());
}

#[test]
fn options_normalize_offsets_and_side() {
    let o = options(
        StickyConfig::new()
            .with_offset(Some(f64::NAN), Some(12.5))
            .with_side(Side::Both)
            .with_z_index(0),
    );
    assert_eq!(o.top_offset(), 0.0);
    assert_eq!(o.bottom_offset(), 12.5);
    assert!(o.should_top_sticky());
    assert!(o.should_bottom_sticky());
    assert_eq!(o.z_index(), 0);

    let o = options(StickyConfig::new().with_side(Side::Bottom));
    assert!(!o.should_top_sticky());
    assert!(o.should_bottom_sticky());
}

#[test]
fn side_parses_known_names() {
    assert_eq!("top".parse::<Side>(), Ok(Side::Top));
    assert_eq!(" bottom ".parse::<Side>(), Ok(Side::Bottom));
    assert_eq!("both".parse::<Side>(), Ok(Side::Both));
    assert_eq!("left".parse::<Side>(), Err(ParseSideError));
    assert_eq!(Side::Both.to_string(), "both");
}

#[test]
fn config_merges_over_defaults() {
    let defaults = StickyConfig::new()
        .with_top_offset(8.0)
        .with_side(Side::Both)
        .with_z_index(99);
    let merged = StickyConfig::new().with_z_index(5).merged_over(&defaults);
    assert_eq!(merged.offset.top, Some(8.0));
    assert_eq!(merged.offset.bottom, None);
    assert_eq!(merged.side, Some(Side::Both));
    assert_eq!(merged.z_index, Some(5));
}

#[test]
fn top_disabled_never_sticks_to_top() {
    let o = options(StickyConfig::new().with_side(Side::Bottom));
    for placeholder_top in [-5000.0, -1.0, 0.0, 1.0, 5000.0] {
        for container_top in [-5000.0, -500.0, 0.0, 500.0] {
            let s = snapshot(placeholder_top, container_top, 1000.0);
            assert!(!is_top_sticky(&s, &o));
        }
    }
}

#[test]
fn bottom_disabled_never_sticks_to_bottom() {
    let o = options(StickyConfig::new());
    for placeholder_top in [-100.0, 400.0, 790.0, 2000.0] {
        let s = snapshot(placeholder_top, 0.0, 1000.0);
        assert!(!is_bottom_sticky(&s, &o));
    }
}

#[test]
fn top_sticks_until_container_scrolls_past() {
    let o = options(StickyConfig::new().with_side(Side::Top));

    // Natural position still below the offset line.
    assert!(!is_top_sticky(&snapshot(10.0, -90.0, 1000.0), &o));
    // Placeholder reaches the line while the container is in view.
    assert!(is_top_sticky(&snapshot(0.0, -100.0, 1000.0), &o));
    assert!(is_top_sticky(&snapshot(-500.0, -600.0, 1000.0), &o));
    // Container bottom is exactly at the line.
    assert!(is_top_sticky(&snapshot(-900.0, -1000.0, 1000.0), &o));
    // Container scrolled fully past.
    assert!(!is_top_sticky(&snapshot(-950.0, -1050.0, 1000.0), &o));
}

#[test]
fn top_respects_offsets() {
    let o = options(StickyConfig::new().with_offset(Some(60.0), Some(40.0)));
    assert!(!is_top_sticky(&snapshot(61.0, 0.0, 1000.0), &o));
    assert!(is_top_sticky(&snapshot(60.0, 0.0, 1000.0), &o));
    // container bottom 30 < bottom offset 40
    assert!(!is_top_sticky(&snapshot(-900.0, -970.0, 1000.0), &o));
}

#[test]
fn bottom_sticks_while_container_top_is_in_view() {
    let o = options(StickyConfig::new().with_side(Side::Bottom));
    // from_bottom = 800 - 760 - 50 = -10 <= 0, from_top = 800 - 300 = 500 >= 0
    assert!(is_bottom_sticky(&snapshot(760.0, 300.0, 1000.0), &o));
    // from_bottom = 800 - 700 - 50 = 50 > 0
    assert!(!is_bottom_sticky(&snapshot(700.0, 300.0, 1000.0), &o));
    // container starts below the viewport: from_top = 800 - 900 < 0
    assert!(!is_bottom_sticky(&snapshot(1200.0, 900.0, 1000.0), &o));
}

#[test]
fn top_transition_happens_once_while_scrolling_down() {
    let o = options(StickyConfig::new().with_side(Side::Both));
    let mut transitions = 0usize;
    let mut prev = false;
    let mut first_true_at = None;
    for (frame, placeholder_top) in [300.0, 200.0, 100.0, 1.0, 0.0, -1.0, -100.0, -300.0]
        .into_iter()
        .enumerate()
    {
        let s = snapshot(placeholder_top, placeholder_top - 100.0, 5000.0);
        let now = is_top_sticky(&s, &o);
        if now != prev {
            transitions += 1;
            if first_true_at.is_none() {
                first_true_at = Some(frame);
            }
        }
        prev = now;
    }
    assert_eq!(transitions, 1);
    assert_eq!(first_true_at, Some(4));
}

#[test]
fn css_values_render_like_inline_styles() {
    assert_eq!(CssValue::Px(12.5).to_string(), "12.5px");
    assert_eq!(CssValue::Px(-20.0).to_string(), "-20px");
    assert_eq!(CssValue::Integer(10).to_string(), "10");
    assert_eq!(CssValue::Keyword("auto").to_string(), "auto");
    assert_eq!(StyleProperty::ZIndex.css_name(), "z-index");
}

#[test]
fn patch_prefers_top_when_both_flags_are_set() {
    let o = options(StickyConfig::new().with_side(Side::Both));
    let state = StickState {
        is_top_sticky: true,
        is_bottom_sticky: true,
    };
    let patch = compute_patch(&snapshot(0.0, 0.0, 1000.0), state, &o);
    assert_eq!(
        patch.element_value(StyleProperty::Top),
        Some(CssValue::Px(0.0))
    );
    assert_eq!(
        patch.element_value(StyleProperty::Bottom),
        Some(CssValue::Keyword("auto"))
    );
    assert!(patch.element_classes.contains(&(TOP_STICKY_CLASS, true)));
    assert!(patch.element_classes.contains(&(BOTTOM_STICKY_CLASS, false)));
}

#[test]
fn bind_is_deferred_to_the_next_tick() {
    let f = fixture();
    let sticky = Sticky::new(f.dom.clone(), f.element, StickyConfig::new());
    sticky.bind();

    assert!(!sticky.is_bound());
    assert!(sticky.placeholder().is_none());
    assert_eq!(f.dom.listener_count(), 0);
    assert_eq!(f.dom.children(f.container), [f.element]);

    assert_eq!(f.dom.run_ticks(), 1);
    assert!(sticky.is_bound());
    let placeholder = sticky.placeholder().unwrap();
    assert_eq!(f.dom.previous_sibling(f.element), Some(placeholder));
    assert!(f.dom.classes(placeholder).iter().any(|c| c == PLACEHOLDER_CLASS));
    assert!(f.has_class(ELEMENT_CLASS));
    assert_eq!(sticky.container(), Some(f.container));

    let per_target = StickyEvent::ALL.len();
    assert_eq!(f.dom.listener_count_on(Target::Viewport), per_target);
    assert_eq!(f.dom.listener_count_on(Target::Node(f.container)), per_target);
    assert_eq!(sticky.listener_count(), 2 * per_target);
}

#[test]
fn bind_twice_is_a_no_op() {
    let f = fixture();
    let sticky = Sticky::new(f.dom.clone(), f.element, StickyConfig::new());
    sticky.bind();
    sticky.bind();
    assert_eq!(f.dom.pending_ticks(), 1);
    f.dom.run_ticks();

    sticky.bind();
    assert_eq!(f.dom.pending_ticks(), 0);
    assert_eq!(f.dom.children(f.container).len(), 2);
    assert_eq!(f.dom.listener_count(), 2 * StickyEvent::ALL.len());
}

#[test]
fn container_is_the_marked_ancestor() {
    let f = fixture();
    let outer = f.dom.create_element("section");
    f.dom.append_child(f.dom.body(), outer);
    f.dom.append_child(outer, f.container);
    f.dom.set_attribute(outer, CONTAINER_ATTRIBUTE, "");
    assert_eq!(resolve_container(&f.dom, &f.element), Some(outer));
}

#[test]
fn container_falls_back_to_the_parent() {
    let f = fixture();
    // A marker on <body> is ignored: the walk stops at the document root.
    f.dom.set_attribute(f.dom.body(), CONTAINER_ATTRIBUTE, "");
    assert_eq!(resolve_container(&f.dom, &f.element), Some(f.container));

    let detached = f.dom.create_element("div");
    assert_eq!(resolve_container(&f.dom, &detached), None);
}

#[test]
fn top_sticky_pins_element_and_reserves_slot() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    f.place(&sticky, -10.0, -110.0);
    f.frame(&sticky);

    assert!(sticky.state().is_top_sticky);
    assert_eq!(f.style("position").as_deref(), Some("fixed"));
    assert_eq!(f.style("top").as_deref(), Some("0px"));
    assert_eq!(f.style("bottom").as_deref(), Some("auto"));
    assert_eq!(f.style("left").as_deref(), Some("20px"));
    assert_eq!(f.style("width").as_deref(), Some("300px"));
    assert_eq!(f.style("z-index").as_deref(), Some("10"));
    assert!(f.has_class(TOP_STICKY_CLASS));
    assert!(!f.has_class(BOTTOM_STICKY_CLASS));

    let placeholder = sticky.placeholder().unwrap();
    assert_eq!(
        f.dom.style(placeholder, "padding-top").as_deref(),
        Some("50px")
    );
}

#[test]
fn top_sticky_scrolls_off_with_the_container() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    // container bottom = -970 + 1000 = 30; limit = 30 - 50 = -20
    f.place(&sticky, -870.0, -970.0);
    f.frame(&sticky);

    assert!(sticky.state().is_top_sticky);
    assert_eq!(f.style("top").as_deref(), Some("-20px"));
}

#[test]
fn bottom_sticky_pins_element_to_the_bottom() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new().with_side(Side::Bottom).with_bottom_offset(5.0));
    // from_bottom = 800 - 760 - 50 = -10; from_top = 800 - 100 = 700
    f.place(&sticky, 760.0, 100.0);
    f.frame(&sticky);

    assert!(sticky.state().is_bottom_sticky);
    assert_eq!(f.style("position").as_deref(), Some("fixed"));
    assert_eq!(f.style("top").as_deref(), Some("auto"));
    assert_eq!(f.style("bottom").as_deref(), Some("5px"));
    assert!(f.has_class(BOTTOM_STICKY_CLASS));
    assert!(!f.has_class(TOP_STICKY_CLASS));
}

#[test]
fn bottom_sticky_clamps_against_the_container_top() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new().with_side(Side::Bottom));
    // from_top = 800 - 770 = 30; limit = 30 - 50 = -20
    f.place(&sticky, 770.0, 770.0);
    f.frame(&sticky);

    assert!(sticky.state().is_bottom_sticky);
    assert_eq!(f.style("bottom").as_deref(), Some("-20px"));
}

#[test]
fn unstuck_collapses_the_placeholder() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    f.place(&sticky, -10.0, -110.0);
    f.frame(&sticky);
    assert!(f.has_class(TOP_STICKY_CLASS));

    f.place(&sticky, 100.0, 0.0);
    f.frame(&sticky);
    assert_eq!(sticky.state(), StickState::default());
    assert_eq!(f.style("position").as_deref(), Some("static"));
    assert_eq!(f.style("left").as_deref(), Some("auto"));
    assert!(!f.has_class(TOP_STICKY_CLASS));
    let placeholder = sticky.placeholder().unwrap();
    assert_eq!(
        f.dom.style(placeholder, "padding-top").as_deref(),
        Some("0px")
    );
}

#[test]
fn on_stick_fires_once_per_transition() {
    let f = fixture();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sticky = f.bound(StickyConfig::new().with_on_stick(Some({
        let fired = Rc::clone(&fired);
        move |change: StickChange| fired.borrow_mut().push(change)
    })));

    f.place(&sticky, 100.0, 0.0);
    f.frame(&sticky);
    f.frame(&sticky);
    assert!(fired.borrow().is_empty());

    f.place(&sticky, -10.0, -110.0);
    for _ in 0..5 {
        f.frame(&sticky);
    }
    assert_eq!(
        *fired.borrow(),
        [StickChange {
            top: true,
            bottom: false,
            sticked: true
        }]
    );

    f.place(&sticky, 100.0, 0.0);
    f.frame(&sticky);
    f.frame(&sticky);
    assert_eq!(fired.borrow().len(), 2);
    assert_eq!(fired.borrow()[1], StickChange::default());
}

#[test]
fn scroll_burst_recomputes_once_per_frame() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    f.place(&sticky, -10.0, -110.0);

    let reads = f.dom.rect_reads();
    let writes = f.dom.style_writes();
    for _ in 0..10 {
        f.dom.dispatch(Target::Viewport, StickyEvent::Scroll);
        f.dom.dispatch(Target::Node(f.container), StickyEvent::Scroll);
    }
    assert!(sticky.is_pending());
    assert_eq!(f.dom.pending_frames(), 1);

    assert_eq!(f.dom.run_frame(), 1);
    assert!(!sticky.is_pending());
    // element + placeholder + container
    assert_eq!(f.dom.rect_reads() - reads, 3);
    // six element properties + placeholder padding
    assert_eq!(f.dom.style_writes() - writes, 7);
    assert!(sticky.state().is_top_sticky);
}

#[test]
fn unbind_restores_the_element() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    let placeholder = sticky.placeholder().unwrap();
    f.place(&sticky, -10.0, -110.0);
    f.frame(&sticky);
    assert!(f.has_class(TOP_STICKY_CLASS));

    sticky.unbind();
    for property in StyleProperty::ELEMENT {
        assert!(!f.dom.has_style(f.element, property.css_name()));
    }
    assert!(!f.has_class(TOP_STICKY_CLASS));
    assert!(!f.has_class(BOTTOM_STICKY_CLASS));
    assert!(!f.dom.is_attached(placeholder));
    assert_eq!(f.dom.children(f.container), [f.element]);
    assert_eq!(f.dom.listener_count(), 0);
    assert!(!sticky.is_bound());
}

#[test]
fn unbind_is_idempotent() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new().with_side(Side::Bottom));
    f.place(&sticky, 760.0, 100.0);
    f.frame(&sticky);

    sticky.unbind();
    let classes = f.dom.classes(f.element);
    let children = f.dom.children(f.container);
    sticky.unbind();
    assert_eq!(f.dom.classes(f.element), classes);
    assert_eq!(f.dom.children(f.container), children);
    assert!(!f.dom.has_style(f.element, "position"));
    assert_eq!(f.dom.listener_count(), 0);
}

#[test]
fn unbind_before_the_tick_abandons_the_bind() {
    let f = fixture();
    let sticky = Sticky::new(f.dom.clone(), f.element, StickyConfig::new());
    sticky.bind();
    sticky.unbind();
    f.dom.run_ticks();

    assert!(!sticky.is_bound());
    assert_eq!(sticky.listener_count(), 0);
    assert_eq!(f.dom.listener_count(), 0);
    assert_eq!(f.dom.children(f.container), [f.element]);
}

#[test]
fn bind_then_unbind_without_a_frame() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    let placeholder = sticky.placeholder().unwrap();
    sticky.update();
    sticky.unbind();

    assert!(!f.dom.is_attached(placeholder));
    assert_eq!(sticky.listener_count(), 0);
    assert_eq!(f.dom.listener_count(), 0);
    // The scheduled frame is cancelled.
    assert_eq!(f.dom.pending_frames(), 0);
    assert!(!sticky.is_pending());
}

#[test]
fn rebind_after_unbind_inserts_a_fresh_placeholder() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    sticky.unbind();
    sticky.bind();
    f.dom.run_ticks();

    assert!(sticky.is_bound());
    let placeholder = sticky.placeholder().unwrap();
    assert_eq!(f.dom.previous_sibling(f.element), Some(placeholder));
    assert_eq!(f.dom.children(f.container).len(), 2);
}

#[test]
fn update_is_ignored_while_unbound() {
    let f = fixture();
    let sticky = Sticky::new(f.dom.clone(), f.element, StickyConfig::new());
    sticky.update();
    assert_eq!(f.dom.pending_frames(), 0);
    assert!(!sticky.is_pending());
}

#[test]
fn detached_element_never_updates() {
    let f = fixture();
    let lonely = f.dom.create_element("div");
    let sticky = Sticky::new(f.dom.clone(), lonely, StickyConfig::new());
    sticky.bind();
    f.dom.run_ticks();
    assert!(sticky.container().is_none());

    let writes = f.dom.style_writes();
    f.frame(&sticky);
    assert_eq!(f.dom.style_writes(), writes);
    assert!(sticky.snapshot().is_none());
}

#[test]
fn on_stick_may_unbind_the_controller() {
    let f = fixture();
    let slot: Rc<RefCell<Option<Sticky<HeadlessDom>>>> = Rc::new(RefCell::new(None));
    let calls = Rc::new(Cell::new(0usize));
    let sticky = f.bound(StickyConfig::new().with_on_stick(Some({
        let slot = Rc::clone(&slot);
        let calls = Rc::clone(&calls);
        move |_: StickChange| {
            calls.set(calls.get() + 1);
            if let Some(sticky) = slot.borrow().as_ref() {
                sticky.unbind();
            }
        }
    })));
    *slot.borrow_mut() = Some(sticky.clone());

    f.place(&sticky, -10.0, -110.0);
    f.frame(&sticky);
    assert_eq!(calls.get(), 1);
    assert!(!sticky.is_bound());
    assert!(!f.has_class(TOP_STICKY_CLASS));

    slot.borrow_mut().take();
}

#[test]
fn dropping_the_controller_releases_listeners() {
    let f = fixture();
    let sticky = f.bound(StickyConfig::new());
    sticky.update();
    assert!(f.dom.listener_count() > 0);

    drop(sticky);
    assert_eq!(f.dom.listener_count(), 0);
    assert_eq!(f.dom.pending_frames(), 0);
}

#[test]
fn headless_scroll_sequence_sticks_and_releases() {
    let f = fixture();
    let fired = Rc::new(Cell::new(0usize));
    let sticky = f.bound(StickyConfig::new().with_on_stick(Some({
        let fired = Rc::clone(&fired);
        move |_: StickChange| fired.set(fired.get() + 1)
    })));
    let placeholder = sticky.placeholder().unwrap();
    f.dom
        .set_rect(placeholder, ClientRect::new(100.0, 20.0, 300.0, 0.0));

    let mut stuck = Vec::new();
    for _ in 0..12 {
        f.dom.scroll_by(100.0);
        f.dom.dispatch(Target::Viewport, StickyEvent::Scroll);
        f.dom.run_frame();
        stuck.push(sticky.state().is_top_sticky);
    }
    // placeholder top: 0 after one scroll; container bottom < 0 after eleven.
    assert!(stuck[0]);
    assert!(stuck[9]);
    assert!(!stuck[10]);
    assert_eq!(fired.get(), 2);
}
