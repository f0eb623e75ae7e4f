use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use log::info;
use raw_volume::{app::TransformApp, enums::MemoryOrder, volume_loader::VolumeLoader};

/// Inspect and re-orient a raw voxel volume.
#[derive(Parser)]
#[command(name = "loadtool")]
struct Args {
    /// Raw volume file, named <prefix>_<resolution>_<Nx>_<Ny>_<Nz>.raw
    path: PathBuf,

    /// Memory layout of the flat sample buffer
    #[arg(long, default_value_t = MemoryOrder::C)]
    order: MemoryOrder,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // the error goes to standard output, not the log
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let (volume, header) = VolumeLoader::load_from_path(&args.path, args.order)?;
    let (nx, ny, nz) = volume.dim();
    info!("loaded {} ({nx} x {ny} x {nz})", args.path.display());

    let out_dir = args
        .path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let order = args.order;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("3D Image Transformer"),
        ..Default::default()
    };
    eframe::run_native(
        "raw-volume loadtool",
        options,
        Box::new(move |cc| Ok(Box::new(TransformApp::new(cc, volume, header, order, out_dir)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run the ui: {err}"))?;
    Ok(())
}
