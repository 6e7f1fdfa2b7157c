mod app;
mod logging;
mod repo;
mod util;

use std::path::PathBuf;

use clap::Parser;

use app::ColorMode;
use repo::LayoutOptions;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Hierarchy JSON produced by the repository analysis.
    #[arg(long, default_value = "files/flare.json")]
    data: PathBuf,

    /// Gap between packed sibling circles, in layout units.
    #[arg(long, default_value_t = 5.0)]
    padding: f64,

    /// Side of the square the hierarchy is packed into.
    #[arg(long, default_value_t = 1000.0)]
    layout_size: f64,

    #[arg(long, value_enum, default_value_t = ColorMode::Authors)]
    color_mode: ColorMode,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    if let Err(error) = logging::init_logging(args.verbose) {
        eprintln!("logging disabled: {error:#}");
    }

    let layout = LayoutOptions {
        size: args.layout_size.max(1.0),
        padding: args.padding.max(0.0),
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "code-bubbles",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CodeBubblesApp::new(
                cc,
                args.data.clone(),
                layout,
                args.color_mode,
            )))
        }),
    )
}
