use ght_detector::config::load_config;
use ght_detector::image::io::{load_grayscale_image, save_grayscale_f32, write_json_file};
use ght_detector::rtable::load_file;
use ght_detector::{Detection, GhtDetector, GhtParams};
use log::info;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

struct DetectArgs {
    rtable: PathBuf,
    query_image: PathBuf,
    output_image: PathBuf,
    config: Option<PathBuf>,
    json_out: Option<PathBuf>,
    progress: bool,
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

    let table = load_file(&args.rtable).map_err(|e| e.to_string())?;
    let gray = load_grayscale_image(&args.query_image).map_err(|e| e.to_string())?;
    let edges = detector.edge_map(&gray.as_view());
    info!(
        "{}: {}x{} with {} edge pixels, r-table has {} vectors",
        args.query_image.display(),
        gray.width(),
        gray.height(),
        edges.edge_count(),
        table.len()
    );

    // highest whole percentage printed so far; workers may report out of order
    let shown = AtomicU32::new(0);
    let report = |percent: f32| {
        let p = percent as u32;
        if shown.fetch_max(p, Ordering::Relaxed) < p {
            eprint!("\rvoting: {p:3}%");
            let _ = std::io::stderr().flush();
        }
    };
    let detection = if args.progress {
        let d = detector.detect_with_progress(&table, &edges, &report);
        eprintln!();
        d
    } else {
        detector.detect(&table, &edges)
    };

    print_candidates(&detection);

    let mut projection = detection.accumulator.project_xy();
    projection.normalize_max();
    save_grayscale_f32(&projection, &args.output_image).map_err(|e| e.to_string())?;
    println!("Saved accumulator projection to {}", args.output_image.display());

    if let Some(path) = &args.json_out {
        write_json_file(path, &detection.report()).map_err(|e| e.to_string())?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn print_candidates(detection: &Detection) {
    println!("Candidates ({}):", detection.candidates.len());
    for (i, c) in detection.candidates.iter().enumerate() {
        println!(
            "  #{i}: scale={} rotation={:.4} rad ({:.1} deg) at ({}, {}) score={:.3}",
            c.scale,
            c.rotation,
            c.rotation.to_degrees(),
            c.x,
            c.y,
            c.score
        );
    }
    for stage in &detection.timings.stages {
        info!("{}: {:.1} ms", stage.label, stage.elapsed_ms);
    }
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<DetectArgs, String> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut json_out = None;
    let mut progress = false;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(it.next().ok_or_else(usage)?)),
            "--json" => json_out = Some(PathBuf::from(it.next().ok_or_else(usage)?)),
            "--progress" => progress = true,
            "-h" | "--help" => return Err(usage()),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let [rtable, query_image, output_image]: [PathBuf; 3] =
        positional.try_into().map_err(|_| usage())?;
    Ok(DetectArgs {
        rtable,
        query_image,
        output_image,
        config,
        json_out,
        progress,
    })
}

fn usage() -> String {
    "Usage: detect <rtable-file> <query-image> <output-image> \
     [--config <params.json>] [--json <report.json>] [--progress]"
        .to_string()
}
