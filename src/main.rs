use eframe::egui;
use sick_motion::gui::OverlayApp;
use sick_motion::logging;
use sick_motion::settings;

fn main() -> anyhow::Result<()> {
    let settings = settings::load_or_default();
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!(path = %settings::settings_path().display(), "starting sick motion");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sick Motion")
            .with_inner_size([300.0, 140.0])
            .with_min_inner_size([240.0, 120.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sick Motion",
        native_options,
        Box::new(move |_cc| Box::new(OverlayApp::new(&settings))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run overlay: {err}"))
}
