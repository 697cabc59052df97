use ght_detector::config::load_config;
use ght_detector::image::io::load_grayscale_image;
use ght_detector::rtable::save_file;
use ght_detector::{GhtDetector, GhtParams};
use log::info;
use std::env;
use std::path::PathBuf;

struct LearnArgs {
    shape_image: PathBuf,
    rtable_out: PathBuf,
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args(env::args().skip(1))?;
    let params = match &args.config {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => GhtParams::default(),
    };
    let detector = GhtDetector::new(params).map_err(|e| e.to_string())?;

    let gray = load_grayscale_image(&args.shape_image).map_err(|e| e.to_string())?;
    let edges = detector.edge_map(&gray.as_view());
    info!(
        "{}: {}x{} with {} edge pixels",
        args.shape_image.display(),
        gray.width(),
        gray.height(),
        edges.edge_count()
    );

    let table = detector.learn(&edges).map_err(|e| e.to_string())?;
    let [cx, cy] = table.centroid();
    println!("center: {cx:.3} x {cy:.3}");
    println!(
        "r-table: {} vectors in {} buckets",
        table.len(),
        table.bucket_count()
    );

    save_file(&table, &args.rtable_out).map_err(|e| e.to_string())?;
    println!("Saved r-table to {}", args.rtable_out.display());
    Ok(())
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<LearnArgs, String> {
    let mut positional = Vec::new();
    let mut config = None;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(it.next().ok_or_else(usage)?)),
            "-h" | "--help" => return Err(usage()),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let [shape_image, rtable_out]: [PathBuf; 2] =
        positional.try_into().map_err(|_| usage())?;
    Ok(LearnArgs {
        shape_image,
        rtable_out,
        config,
    })
}

fn usage() -> String {
    "Usage: learn <shape-image> <rtable-file> [--config <params.json>]".to_string()
}
