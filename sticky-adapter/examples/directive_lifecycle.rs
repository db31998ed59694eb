// Example: forward framework hook calls to the directive and watch instances come and go.
use sticky::headless::{HeadlessDom, NodeId};
use sticky::{Side, StickyConfig};
use sticky_adapter::{
    DirectiveRegistry, DirectiveValue, FrameworkVersion, StickyDirective, StickyPlugin,
};

#[derive(Default)]
struct App {
    sticky: Option<StickyDirective<HeadlessDom, NodeId>>,
}

impl DirectiveRegistry<HeadlessDom, NodeId> for App {
    fn directive(&mut self, name: &'static str, directive: StickyDirective<HeadlessDom, NodeId>) {
        println!("registered directive `{name}`");
        self.sticky = Some(directive);
    }
}

fn main() {
    let dom = HeadlessDom::new();
    let container = dom.create_element("div");
    let el = dom.create_element("nav");
    dom.append_child(dom.body(), container);
    dom.append_child(container, el);

    let version = FrameworkVersion::from_version_str("2.7.16").unwrap_or_default();
    let mut app = App::default();
    let mut plugin = StickyPlugin::new();
    plugin.install::<_, NodeId, _>(
        &mut app,
        dom.clone(),
        version,
        StickyConfig::new().with_z_index(100),
    );
    // Installing twice is ignored.
    plugin.install::<_, NodeId, _>(&mut app, dom.clone(), version, StickyConfig::new());

    let Some(directive) = app.sticky.as_mut() else {
        return;
    };
    let value = || DirectiveValue::from(StickyConfig::new().with_side(Side::Both));

    for (hook, value) in [
        ("inserted", value()),
        ("componentUpdated", value()),
        ("componentUpdated", DirectiveValue::Disabled),
        ("componentUpdated", value()),
        ("unbind", DirectiveValue::Absent),
    ] {
        let resolved = directive.dispatch(hook, el, el, value);
        dom.run_ticks();
        println!(
            "{hook:<17} -> {resolved:?}: instances={} listeners={}",
            directive.len(),
            dom.listener_count()
        );
    }
}
