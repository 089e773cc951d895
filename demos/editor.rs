use eframe::{run_native, App, CreationContext};
use egui::Context;
use egui_mindmap::{
    parse_outline, DefaultTreeView, SettingsInteraction, SettingsNavigation, SettingsStyle,
    SiblingOrders, Tree,
};

const OUTLINE: &str = "\
Trip
  Packing
    Tent
    Stove
    Food
  Route
    Day 1
    Day 2
  Budget
";

pub struct EditorApp {
    tree: Tree,
    orders: SiblingOrders,
}

impl EditorApp {
    fn new(_: &CreationContext<'_>) -> Self {
        let tree = parse_outline(OUTLINE).expect("demo outline parses");
        Self {
            tree,
            orders: SiblingOrders::new(),
        }
    }
}

impl App for EditorApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(
                &mut DefaultTreeView::new(&mut self.tree, &mut self.orders)
                    .with_interactions(&SettingsInteraction {
                        dragging_enabled: true,
                        node_selection_enabled: true,
                        ..Default::default()
                    })
                    .with_navigations(&SettingsNavigation {
                        fit_to_screen_enabled: false,
                        zoom_and_pan_enabled: true,
                        ..Default::default()
                    })
                    .with_styles(&SettingsStyle {
                        labels_always: true,
                        ..Default::default()
                    }),
            );
        });
    }
}

fn main() {
    run_native(
        "egui_mindmap demo",
        eframe::NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(EditorApp::new(cc)))),
    )
    .unwrap();
}
