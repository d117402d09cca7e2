use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::to_writer_pretty;
use showcase_engine::config::ShowcaseConfig;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Serialize)]
struct ShowcaseSample {
    progress: f32,
    position: [f32; 3],
    look_at: [f32; 3],
}

#[derive(Serialize)]
struct FlythroughSample {
    progress: f32,
    center: [f64; 2],
    zoom: f64,
    pitch: f64,
    bearing: f64,
}

#[derive(Serialize)]
struct PathCapture {
    samples: usize,
    snap_points: Vec<f32>,
    showcase: Vec<ShowcaseSample>,
    flythrough: Vec<FlythroughSample>,
}

fn print_help() {
    eprintln!(
        "Usage: flythrough_capture [--config <path>] [--samples <n>] [--out <path>]\n\n\
         Options:\n  --config <path>  Showcase config JSON (defaults are used when omitted)\n  \
         --samples <n>    Number of progress samples across [0, 1] (default 64)\n  \
         --out <path>     Destination for the capture JSON (defaults to stdout)\n  \
         --compact        Emit minified JSON instead of pretty output\n  \
         -h, --help       Show this message"
    );
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut out_path: Option<PathBuf> = None;
    let mut samples: usize = 64;
    let mut pretty = true;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().context("--config requires a path")?;
                config_path = Some(PathBuf::from(value));
            }
            "--samples" => {
                let value = args.next().context("--samples requires a count")?;
                samples = value.parse().with_context(|| format!("Invalid sample count '{value}'"))?;
            }
            "--out" => {
                let value = args.next().context("--out requires a path")?;
                out_path = Some(PathBuf::from(value));
            }
            "--compact" => {
                pretty = false;
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            other => {
                return Err(anyhow!("Unknown argument '{other}'. Use --help for usage."));
            }
        }
    }

    if samples < 2 {
        return Err(anyhow!("--samples must be at least 2"));
    }

    let config = match config_path {
        Some(path) => ShowcaseConfig::load(&path)?,
        None => ShowcaseConfig::default(),
    };
    let rig = config.camera_rig().context("Building showcase camera rig")?;
    let driver = config.flythrough_driver().context("Building flythrough path")?;
    let path = driver.path();

    let mut capture = PathCapture {
        samples,
        snap_points: rig.snap_progress_points(config.showcase.scroll_pages),
        showcase: Vec::with_capacity(samples),
        flythrough: Vec::with_capacity(samples),
    };
    for step in 0..samples {
        let progress = step as f32 / (samples - 1) as f32;
        let pose = rig.sample(progress);
        capture.showcase.push(ShowcaseSample {
            progress,
            position: pose.position.to_array(),
            look_at: pose.look_at.to_array(),
        });
        let map = path.sample(progress);
        capture.flythrough.push(FlythroughSample {
            progress,
            center: [map.center.x, map.center.y],
            zoom: map.zoom,
            pitch: map.pitch,
            bearing: map.bearing,
        });
    }

    match out_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Creating directory {}", parent.display()))?;
            }
            let file = File::create(&path).with_context(|| format!("Creating {}", path.display()))?;
            if pretty {
                to_writer_pretty(file, &capture)?;
            } else {
                serde_json::to_writer(file, &capture)?;
            }
            println!("Wrote capture to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let handle = stdout.lock();
            if pretty {
                to_writer_pretty(handle, &capture)?;
            } else {
                serde_json::to_writer(handle, &capture)?;
            }
        }
    }

    Ok(())
}
