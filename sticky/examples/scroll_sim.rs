// Example: drive a sticky header through a simulated scroll with the headless host.
use sticky::headless::{HeadlessDom, Target};
use sticky::{ClientRect, Side, StickChange, Sticky, StickyConfig, StickyEvent};

fn main() {
    let dom = HeadlessDom::new();
    dom.set_viewport_height(600.0);

    // body > section (1200px) > header (40px at y=80)
    let section = dom.create_element("section");
    let header = dom.create_element("header");
    dom.append_child(dom.body(), section);
    dom.append_child(section, header);
    dom.set_rect(section, ClientRect::new(0.0, 0.0, 800.0, 1200.0));
    dom.set_rect(header, ClientRect::new(80.0, 0.0, 800.0, 40.0));

    let sticky = Sticky::new(
        dom.clone(),
        header,
        StickyConfig::new()
            .with_top_offset(10.0)
            .with_side(Side::Top)
            .with_on_stick(Some(|change: StickChange| {
                println!("  on_stick: {change:?}");
            })),
    );
    sticky.bind();
    dom.run_ticks();

    // No layout engine: the placeholder sits where the header would be.
    let placeholder = sticky.placeholder().expect("placeholder inserted on bind");
    dom.set_rect(placeholder, ClientRect::new(80.0, 0.0, 800.0, 0.0));

    for step in 0..14 {
        dom.scroll_by(100.0);
        // A burst of scroll events still costs one recompute.
        for _ in 0..5 {
            dom.dispatch(Target::Viewport, StickyEvent::Scroll);
        }
        dom.run_frame();
        println!(
            "scroll={:>4} state={:?} position={:?} top={:?}",
            (step + 1) * 100,
            sticky.state(),
            dom.style(header, "position"),
            dom.style(header, "top"),
        );
    }

    sticky.unbind();
    println!(
        "after unbind: position={:?} classes={:?} listeners={}",
        dom.style(header, "position"),
        dom.classes(header),
        dom.listener_count()
    );
}
