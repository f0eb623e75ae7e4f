use std::fs;
use std::path::PathBuf;

use clap::Parser;
use raw_volume::{codec, enums::MemoryOrder, generator};

/// Write a synthetic raw volume sampled from a closed-form ellipsoid.
#[derive(Parser)]
#[command(name = "genvolume")]
struct Args {
    /// Filename prefix of the generated volume
    #[arg(long, default_value = "exampleFile")]
    prefix: String,

    /// Samples along x
    #[arg(long, default_value_t = 101)]
    nx: usize,

    /// Samples along y
    #[arg(long, default_value_t = 150)]
    ny: usize,

    /// Samples along z
    #[arg(long, default_value_t = 200)]
    nz: usize,

    /// Resolution tag recorded in the filename
    #[arg(long, default_value_t = 200)]
    resolution: u32,

    /// Memory layout of the flat sample buffer
    #[arg(long, default_value_t = MemoryOrder::C)]
    order: MemoryOrder,

    /// Directory the volume is written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (volume, header) = generator::generate(&args.prefix, args.resolution, (args.nx, args.ny, args.nz));
    let path = args.out_dir.join(header.file_name());
    fs::write(&path, codec::encode(volume.data(), args.order))?;

    println!("Example file written to {}", path.display());
    Ok(())
}
