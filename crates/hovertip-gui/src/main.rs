use clap::Parser;
use eframe::egui;

mod app;
mod surface;

use app::DemoApp;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive tooltip demo", long_about = None)]
struct Args {
    /// Log tracker activity to stdout (filter with RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt::init();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hovertip Demo",
        options,
        Box::new(|cc| {
            let app = DemoApp::new(cc)?;
            Ok(Box::new(app))
        }),
    )
}
