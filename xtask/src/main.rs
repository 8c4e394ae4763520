use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

const DIST: &str = "dist";
const STATIC_DIR: &str = "extension/static";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Pomodoro extension task runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the content/popup wasm module with wasm-pack
    Build {
        /// Build without optimizations
        #[arg(long)]
        dev: bool,
    },

    /// Build the background service worker module
    Background,

    /// Build everything and assemble the unpacked extension in dist/
    Package,

    /// Run all Rust tests on the host target
    Test,

    /// Run clippy linter
    Clippy,

    /// Remove build output
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dev } => build(dev),
        Commands::Background => background(),
        Commands::Package => package(),
        Commands::Test => test(),
        Commands::Clippy => clippy(),
        Commands::Clean => clean(),
    }
}

fn build(dev: bool) -> Result<()> {
    println!("🔨 Building pomodoro-extension (content + popup)...");
    let mut args = vec![
        "build",
        "extension",
        "--target",
        "web",
        "--out-dir",
        "../dist/pkg",
        "--out-name",
        "pomodoro_extension",
    ];
    if dev {
        args.push("--dev");
    }
    run_cmd("wasm-pack", &args)?;
    Ok(())
}

fn background() -> Result<()> {
    println!("🔨 Building background service worker...");
    run_cmd(
        "cargo",
        &[
            "build",
            "--release",
            "-p",
            "pomodoro-extension",
            "--bin",
            "background",
            "--target",
            "wasm32-unknown-unknown",
            "--no-default-features",
        ],
    )?;

    println!("🔗 Generating no-modules bindings...");
    run_cmd(
        "wasm-bindgen",
        &[
            "target/wasm32-unknown-unknown/release/background.wasm",
            "--target",
            "no-modules",
            "--out-dir",
            "dist/pkg-bg",
            "--no-typescript",
        ],
    )?;
    Ok(())
}

fn package() -> Result<()> {
    build(false)?;
    background()?;

    println!("📦 Copying static assets...");
    let target = Path::new(DIST).join("static");
    fs::create_dir_all(&target).context("Failed to create dist/static")?;

    for entry in fs::read_dir(STATIC_DIR).context("Failed to read extension/static")? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let dest = target.join(entry.file_name());
        fs::copy(entry.path(), &dest)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        println!("  ✅ {}", dest.display());
    }

    println!("\n✅ Unpacked extension ready in {}/", DIST);
    Ok(())
}

fn test() -> Result<()> {
    println!("🧪 Running all tests...");
    run_cmd("cargo", &["test", "--workspace"])?;
    Ok(())
}

fn clippy() -> Result<()> {
    println!("🔍 Running clippy on workspace (warnings as errors)...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    Ok(())
}

fn clean() -> Result<()> {
    println!("🧹 Removing {}/...", DIST);
    // Ignore error if nothing was built yet
    let _ = fs::remove_dir_all(DIST);
    Ok(())
}

// Helper functions
fn run_cmd(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run: {} {}", program, args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("Command failed: {} {}", program, args.join(" "));
    }

    Ok(())
}
