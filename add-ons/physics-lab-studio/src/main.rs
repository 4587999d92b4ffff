//! Physics Lab Studio: desktop window with simulation cards and lab worksheets.
//!
//! Run with: cargo run -p physics-lab-studio

use eframe::egui;
use physics_lab_core::Catalog;
use physics_lab_studio::{navigation_channel, NavigationReceiver, NavigationSender, Page, PageTransition};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match Catalog::load_embedded() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("catalog failed to load: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("Fizika Lab"),
        ..Default::default()
    };

    eframe::run_native(
        "Fizika Lab",
        options,
        Box::new(move |_cc| Ok(Box::new(StudioApp::new(catalog)))),
    )
}

struct StudioApp {
    catalog: Catalog,
    nav_tx: NavigationSender,
    nav_rx: NavigationReceiver,
    page: PageTransition<Page>,
}

impl StudioApp {
    fn new(catalog: Catalog) -> Self {
        let (nav_tx, nav_rx) = navigation_channel("/");
        Self {
            catalog,
            nav_tx,
            nav_rx,
            page: PageTransition::new(Page::Home),
        }
    }

    fn navigate(&self, location: String) {
        // Receiver lives as long as the app, so send only fails during teardown.
        let _ = self.nav_tx.send(location);
    }

    fn sidebar(&self, ui: &mut egui::Ui) {
        ui.heading("Fizika Lab");
        ui.separator();
        ui.label(egui::RichText::new("Simulyatsiyalar").strong());
        for sim in &self.catalog.simulations {
            if ui.selectable_label(false, sim.title_uz.as_str()).clicked() {
                self.navigate(format!("/simulations/{}", sim.id));
            }
        }
        ui.separator();
        ui.label(egui::RichText::new("Laboratoriya ishlari").strong());
        for exp in &self.catalog.experiments {
            if ui.selectable_label(false, exp.title_uz.as_str()).clicked() {
                self.navigate(format!("/labs/{}", exp.id));
            }
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let catalog = &self.catalog;
        self.page
            .poll(&mut self.nav_rx, |location| Page::for_location(catalog, location));

        egui::SidePanel::left("nav").resizable(false).show(ctx, |ui| self.sidebar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.page.render(ui, |ui, page| match page {
                    Page::Home => {
                        ui.heading("Xush kelibsiz!");
                        ui.label("Chap tomondagi ro'yxatdan simulyatsiya yoki laboratoriya ishini tanlang.");
                    }
                    Page::Simulation(panel) => panel.ui(ui),
                    Page::Lab(sheet) => sheet.ui(ui),
                    Page::NotFound(location) => {
                        ui.label(format!("Sahifa topilmadi: {location}"));
                    }
                });
            });
        });
    }
}
