mod app;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Data view JSON (a `table` or `categorical` shape).
    #[arg(long)]
    data: PathBuf,
    /// Flat settings bag JSON, e.g. `{"node.defaultRadius": 10}`.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "constellation",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ConstellationApp::new(
                cc,
                app::InputPaths {
                    data: args.data.clone(),
                    settings: args.settings.clone(),
                },
            )))
        }),
    )
}
