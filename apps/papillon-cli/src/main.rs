use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use papillon_common::Resolution;
use papillon_render::{DebugTextRenderer, FrameClock, FrameTimer, Preset, RenderConfig, Renderer};
use papillon_scene::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "papillon-cli", about = "Render and inspect raymarched butterfly scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Built-in scene preset (meadow or lamppost)
    #[arg(short, long, default_value = "meadow", global = true)]
    preset: Preset,

    /// YAML or JSON render config; overrides --preset
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the resolved configuration summary
    Info,
    /// Render a PNG frame sequence
    Render {
        /// Number of frames to render
        #[arg(short, long, default_value = "1")]
        frames: u32,
        /// Animation time of the first frame, in seconds
        #[arg(short, long, default_value = "0.0")]
        start: f32,
        /// Frames per second of animation time
        #[arg(long, default_value = "30.0")]
        fps: f32,
        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,
    },
    /// Print an ASCII preview of one frame
    Preview {
        /// Animation time in seconds
        #[arg(short, long, default_value = "0.0")]
        time: f32,
        /// Preview width in characters
        #[arg(long, default_value = "80")]
        cols: u32,
        /// Preview height in lines
        #[arg(long, default_value = "30")]
        rows: u32,
    },
    /// List butterfly placements at a given time
    Inspect {
        /// Animation time in seconds
        #[arg(short, long, default_value = "0.0")]
        time: f32,
        /// Show only this instance
        #[arg(short, long)]
        index: Option<u32>,
    },
    /// Time full CPU frames
    Bench {
        /// Number of frames to render
        #[arg(short, long, default_value = "10")]
        frames: u32,
    },
    /// Print the resolved render config as YAML
    Config,
    /// Print the generated WGSL for the resolved config
    Shader,
}

/// Preset or config file, then command line resolution overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => cli.preset.config(),
    };
    if let Some(width) = cli.width {
        config.resolution.width = width;
    }
    if let Some(height) = cli.height {
        config.resolution.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:04}.png"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = resolve_config(&cli)?;
    let scene = config.scene()?;

    match cli.command {
        Commands::Info => {
            println!("papillon-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", SceneInspector::summary(&scene, 0.0));
            println!(
                "resolution: {}x{}",
                config.resolution.width, config.resolution.height
            );
            println!(
                "march: max_steps={} max_distance={} hit_epsilon={} normal_epsilon={}",
                config.march.max_steps,
                config.march.max_distance,
                config.march.hit_epsilon,
                config.march.normal_epsilon
            );
            println!(
                "camera: origin=({:.2}, {:.2}, {:.2}) focal={:.2}",
                config.camera.origin.x,
                config.camera.origin.y,
                config.camera.origin.z,
                config.camera.focal_length
            );
        }
        Commands::Render {
            frames,
            start,
            fps,
            out,
        } => {
            anyhow::ensure!(fps > 0.0, "--fps must be positive");
            let renderer = config.renderer();
            let mut clock = FrameClock::starting_at(start);
            let step = Duration::from_secs_f32(1.0 / fps);

            for index in 0..frames {
                let params = clock.frame(config.resolution);
                let rendered = renderer.render(&scene, &params);
                let path = frame_path(&out, index);
                rendered
                    .frame
                    .save_png(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(
                    frame = index,
                    time = params.time,
                    elapsed = ?rendered.elapsed,
                    luminance = rendered.frame.mean_luminance(),
                    "{}",
                    rendered.stats
                );
                clock.advance(step);
            }
            println!("wrote {frames} frame(s) to {}", out.display());
        }
        Commands::Preview { time, cols, rows } => {
            let preview = DebugTextRenderer::new(config.renderer());
            let params = FrameClock::starting_at(time).frame(Resolution::new(cols, rows));
            print!("{}", preview.render(&scene, &params));
        }
        Commands::Inspect { time, index } => {
            println!("{}", SceneInspector::summary(&scene, time));
            let indices: Vec<u32> = match index {
                Some(i) => vec![i],
                None => (0..scene.instance_count()).collect(),
            };
            for i in indices {
                match SceneInspector::inspect_instance(&scene, i, time) {
                    Some(info) => println!("  {info}"),
                    None => println!("  no butterfly with index {i}"),
                }
            }
        }
        Commands::Bench { frames } => {
            let renderer = config.renderer();
            let mut timer = FrameTimer::new(frames.max(1) as usize);
            let mut clock = FrameClock::new();
            let mut last = None;

            for _ in 0..frames {
                let rendered = renderer.render(&scene, &clock.frame(config.resolution));
                timer.record(rendered.elapsed);
                last = Some((rendered.stats, rendered.frame.mean_luminance()));
                clock.advance(Duration::from_millis(33));
            }

            println!(
                "{} frames at {}x{}: avg {:?}, min {:?}, max {:?}, {:.1} fps",
                timer.count(),
                config.resolution.width,
                config.resolution.height,
                timer.average(),
                timer.min(),
                timer.max(),
                timer.fps()
            );
            if let Some((stats, luminance)) = last {
                println!("last frame: mean luminance {luminance:.3}, {stats}");
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Shader => {
            print!("{}", papillon_render_wgpu::scene_shader(&config)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_render_command() {
        let cli = Cli::try_parse_from([
            "papillon-cli",
            "--preset",
            "lamppost",
            "render",
            "--frames",
            "3",
            "--width",
            "64",
        ])
        .unwrap();
        assert_eq!(cli.preset, Preset::Lamppost);
        assert!(matches!(cli.command, Commands::Render { frames: 3, .. }));

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.resolution.width, 64);
        assert_eq!(config.march.max_steps, 100);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(Cli::try_parse_from(["papillon-cli", "--preset", "swamp", "info"]).is_err());
    }

    #[test]
    fn frame_paths_are_zero_padded() {
        assert_eq!(
            frame_path(Path::new("out"), 7),
            Path::new("out").join("frame_0007.png")
        );
    }
}
