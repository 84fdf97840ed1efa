mod app;
mod config;
mod ui;

use app::App;
use flipwall_core as fc;

fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    // Load and save config at startup
    let config = config::Config::load();
    config.save();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.general.window_width as f32,
                config.general.window_height as f32,
            ])
            .with_fullscreen(config.general.fullscreen)
            .with_title("flipwall"),
        ..eframe::NativeOptions::default()
    };

    eframe::run_native(
        "flipwall",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, config)))),
    )
    .unwrap();
}
