use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

const PRESETS: [&str; 2] = ["meadow", "lamppost"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for papillon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Write the generated WGSL for every preset
    Shaders {
        #[arg(short, long, default_value = "target/shaders")]
        out: PathBuf,
    },
    /// Render one reference still per preset with the CPU renderer
    Stills {
        #[arg(short, long, default_value = "target/stills")]
        out: PathBuf,
        /// Animation time of the still
        #[arg(short, long, default_value = "1.0")]
        time: f32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => run_build()?,
        Commands::Shaders { out } => run_shaders(&out)?,
        Commands::Stills { out, time } => run_stills(&out, time)?,
    }

    Ok(())
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    println!("==> Running cargo {what}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "fmt --check")
}

fn run_clippy() -> Result<()> {
    cargo(
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        "clippy",
    )
}

fn run_tests() -> Result<()> {
    cargo(&["test", "--workspace"], "test")
}

fn run_doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"], "doc")
}

fn run_build() -> Result<()> {
    cargo(&["build", "--workspace"], "build")
}

fn cli_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--release", "-p", "papillon-cli", "--"]);
    cmd
}

fn run_shaders(out: &Path) -> Result<()> {
    std::fs::create_dir_all(out)?;
    for preset in PRESETS {
        println!("==> Generating WGSL for {preset}");
        let output = cli_command()
            .args(["--preset", preset, "shader"])
            .output()?;
        if !output.status.success() {
            anyhow::bail!(
                "shader generation for {preset} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
        let path = out.join(format!("{preset}.wgsl"));
        std::fs::write(&path, &output.stdout)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_stills(out: &Path, time: f32) -> Result<()> {
    for preset in PRESETS {
        println!("==> Rendering {preset} still at t={time}");
        let dir = out.join(preset);
        let status = cli_command()
            .args(["--preset", preset, "render", "--start", &time.to_string()])
            .arg("--out")
            .arg(&dir)
            .status()?;
        if !status.success() {
            anyhow::bail!("rendering {preset} failed");
        }
    }
    Ok(())
}
