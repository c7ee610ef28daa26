use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "softmask", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON mask script against an image and write a PNG.
    Apply(ApplyArgs),
    /// Erase a single feathered circle and write a PNG.
    Circle(CircleArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Mask script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CircleArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Center x in image pixels.
    #[arg(long)]
    x: f64,

    /// Center y in image pixels.
    #[arg(long)]
    y: f64,

    /// Brush radius in image pixels.
    #[arg(long)]
    radius: f64,

    /// Soft-edge fraction of the radius, 0..=1.
    #[arg(long, default_value_t = 0.5)]
    feather: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Circle(args) => cmd_circle(args),
    }
}

fn read_buffer(path: &Path) -> anyhow::Result<softmask::PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .into_rgba8();
    Ok(softmask::PixelBuffer::from_rgba_image(img))
}

fn write_png(path: &Path, buf: softmask::PixelBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let (width, height) = buf.dimensions();
    image::save_buffer_with_format(
        path,
        buf.as_raw(),
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let script = softmask::MaskScript::from_path(&args.script)?;
    let buf = read_buffer(&args.in_path)?;
    let out = script
        .apply(&buf)
        .with_context(|| format!("apply mask script '{}'", args.script.display()))?;
    write_png(&args.out, out)
}

fn cmd_circle(args: CircleArgs) -> anyhow::Result<()> {
    let cfg = softmask::MaskConfig::new(args.radius, args.feather)?;
    let mut buf = read_buffer(&args.in_path)?;
    softmask::erase_circle_with(&mut buf, softmask::Point::new(args.x, args.y), &cfg);
    write_png(&args.out, buf)
}
