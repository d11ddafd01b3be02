use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use memeband::{Captioner, FontChoice};

#[derive(Parser, Debug)]
#[command(name = "memeband", version)]
struct Cli {
    /// Directory containing the bundled font assets.
    #[arg(long, default_value = "fonts")]
    fonts: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Caption a still image (PNG out with --transparent, JPEG otherwise).
    Still(StillArgs),
    /// Caption an animated GIF, optionally retiming it.
    Gif(GifArgs),
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Caption text.
    #[arg(long)]
    text: String,

    /// Font key (default, comic_sans).
    #[arg(long, default_value = "default")]
    font: String,

    /// Keep an alpha channel in the output.
    #[arg(long)]
    transparent: bool,
}

#[derive(Parser, Debug)]
struct GifArgs {
    /// Input GIF path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Caption text.
    #[arg(long)]
    text: String,

    /// Font key (default, comic_sans).
    #[arg(long, default_value = "default")]
    font: String,

    /// Keep an alpha channel in the output.
    #[arg(long)]
    transparent: bool,

    /// Speed multiplier (>1 speeds up, <1 slows down).
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(cli.fonts, args),
        Command::Gif(args) => cmd_gif(cli.fonts, args),
    }
}

fn cmd_still(fonts: PathBuf, args: StillArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.in_path)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;
    let font = FontChoice::from_key(&args.font)?;

    let captioner = Captioner::new(fonts);
    let out = captioner.add_caption_to_still(&bytes, &args.text, font, args.transparent)?;

    write_output(&args.out, &out)
}

fn cmd_gif(fonts: PathBuf, args: GifArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.in_path)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;
    let font = FontChoice::from_key(&args.font)?;

    let captioner = Captioner::new(fonts);
    let out = captioner.add_caption_to_animation(
        &bytes,
        &args.text,
        font,
        args.transparent,
        args.speed,
    )?;

    write_output(&args.out, &out)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write output '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
