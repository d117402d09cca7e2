use anyhow::{anyhow, Context, Result};
use showcase_engine::config::ShowcaseConfig;
use showcase_engine::paint::Pixmap;
use showcase_engine::starfield::Starfield;
use std::path::PathBuf;
use std::time::Duration;
use winit::dpi::PhysicalSize;

fn print_help() {
    eprintln!(
        "Usage: starfield_capture [--config <path>] [--frames <n>] [--size <WxH>] [--out-dir <dir>]\n\n\
         Options:\n  --config <path>  Showcase config JSON (starfield section; defaults when omitted)\n  \
         --frames <n>     Number of frames to render (default 60)\n  \
         --size <WxH>     Surface size in pixels (default 640x360)\n  \
         --out-dir <dir>  Directory for frame PNGs (default starfield_frames)\n  \
         --target <speed> Target speed to ramp toward before the first frame\n  \
         -h, --help       Show this message"
    );
}

fn parse_size(value: &str) -> Result<PhysicalSize<u32>> {
    let (width, height) =
        value.split_once('x').ok_or_else(|| anyhow!("Expected WxH, e.g. 640x360, got '{value}'"))?;
    Ok(PhysicalSize::new(
        width.parse().with_context(|| format!("Invalid width '{width}'"))?,
        height.parse().with_context(|| format!("Invalid height '{height}'"))?,
    ))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut frames: u32 = 60;
    let mut size = PhysicalSize::new(640, 360);
    let mut out_dir = PathBuf::from("starfield_frames");
    let mut target: Option<f32> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().context("--config requires a path")?;
                config_path = Some(PathBuf::from(value));
            }
            "--frames" => {
                let value = args.next().context("--frames requires a count")?;
                frames = value.parse().with_context(|| format!("Invalid frame count '{value}'"))?;
            }
            "--size" => {
                let value = args.next().context("--size requires WxH")?;
                size = parse_size(&value)?;
            }
            "--out-dir" => {
                let value = args.next().context("--out-dir requires a path")?;
                out_dir = PathBuf::from(value);
            }
            "--target" => {
                let value = args.next().context("--target requires a speed")?;
                target = Some(value.parse().with_context(|| format!("Invalid target speed '{value}'"))?);
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

    if size.width == 0 || size.height == 0 {
        return Err(anyhow!("--size must be non-zero in both dimensions"));
    }

    let config = match config_path {
        Some(path) => ShowcaseConfig::load(&path)?,
        None => ShowcaseConfig::default(),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Creating directory {}", out_dir.display()))?;

    let mut field = Starfield::new(Pixmap::new(size), config.starfield);
    if let Some(target) = target {
        field.set_target_speed(target);
    }

    for frame in 0..frames {
        // Pace the capture near the 60 Hz baseline so motion per frame
        // matches what a live host would show.
        std::thread::sleep(Duration::from_millis(16));
        field.advance();
        let path = out_dir.join(format!("frame_{frame:04}.png"));
        field.painter().save_png(&path)?;
    }

    println!("Wrote {frames} frames to {}", out_dir.display());
    Ok(())
}
