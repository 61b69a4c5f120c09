use clap::Parser;
use harris_corners::io::{load_gray_image, load_rgb_image, mark_corners, save_rgb_image};
use harris_corners::{Corner, DetectConfig, Detector, ImageView};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Harris corner detector CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for per-stage profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum BackendConfig {
    Sequential,
    Parallel,
    #[default]
    Both,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    threshold: f64,
    suppression_window: usize,
    sum_radius: usize,
    max_workers: usize,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            threshold: cfg.threshold,
            suppression_window: cfg.suppression_window,
            sum_radius: cfg.sum_radius,
            max_workers: cfg.max_workers,
        }
    }
}

impl DetectConfigJson {
    fn to_config(&self, parallel: bool) -> DetectConfig {
        DetectConfig {
            threshold: self.threshold,
            suppression_window: self.suppression_window,
            sum_radius: self.sum_radius,
            parallel,
            max_workers: self.max_workers,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MarkerConfigJson {
    sequential_path: Option<String>,
    parallel_path: Option<String>,
    color: [u8; 3],
    half_size: u32,
}

impl Default for MarkerConfigJson {
    fn default() -> Self {
        Self {
            sequential_path: None,
            parallel_path: None,
            color: [255, 255, 255],
            half_size: 1,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    backend: BackendConfig,
    detect: DetectConfigJson,
    markers: MarkerConfigJson,
}

#[derive(Debug, Serialize)]
struct RunRecord {
    elapsed_ms: f64,
    count: usize,
    corners: Vec<[usize; 2]>,
}

#[derive(Debug, Serialize)]
struct Output {
    width: usize,
    height: usize,
    sequential: Option<RunRecord>,
    parallel: Option<RunRecord>,
    agree: Option<bool>,
}

struct Run {
    corners: HashSet<Corner>,
    elapsed_ms: f64,
}

impl Run {
    fn record(&self) -> RunRecord {
        let mut corners: Vec<Corner> = self.corners.iter().copied().collect();
        corners.sort_by_key(|c| (c.y, c.x));
        RunRecord {
            elapsed_ms: self.elapsed_ms,
            count: corners.len(),
            corners: corners.into_iter().map(|c| [c.x, c.y]).collect(),
        }
    }
}

fn run_detector(
    cfg: DetectConfig,
    image: ImageView<'_, u8>,
) -> Result<Run, Box<dyn std::error::Error>> {
    let detector = Detector::new(cfg)?;
    let start = Instant::now();
    let corners = detector.detect(image);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
    tracing::info!(
        parallel = detector.is_parallel(),
        elapsed_ms,
        count = corners.len(),
        "detection finished"
    );
    Ok(Run {
        corners,
        elapsed_ms,
    })
}

fn save_markers(
    config: &Config,
    path: Option<&String>,
    run: Option<&Run>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(path), Some(run)) = (path, run) else {
        return Ok(());
    };
    let mut canvas = load_rgb_image(&config.image_path)?;
    mark_corners(
        &mut canvas,
        run.corners.iter(),
        config.markers.color,
        config.markers.half_size,
    );
    save_rgb_image(&canvas, path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("harris_corners=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let image = load_gray_image(&config.image_path)?;
    let view = image.view();

    let sequential = match config.backend {
        BackendConfig::Sequential | BackendConfig::Both => {
            Some(run_detector(config.detect.to_config(false), view)?)
        }
        BackendConfig::Parallel => None,
    };
    let parallel = match config.backend {
        BackendConfig::Parallel | BackendConfig::Both => {
            Some(run_detector(config.detect.to_config(true), view)?)
        }
        BackendConfig::Sequential => None,
    };

    save_markers(
        &config,
        config.markers.sequential_path.as_ref(),
        sequential.as_ref(),
    )?;
    save_markers(
        &config,
        config.markers.parallel_path.as_ref(),
        parallel.as_ref(),
    )?;

    let agree = match (&sequential, &parallel) {
        (Some(seq), Some(par)) => Some(seq.corners == par.corners),
        _ => None,
    };
    let output = Output {
        width: image.width(),
        height: image.height(),
        sequential: sequential.as_ref().map(Run::record),
        parallel: parallel.as_ref().map(Run::record),
        agree,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
