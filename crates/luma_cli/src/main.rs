mod config;
mod logging;
mod presenter;
mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use luma_edit::{
    apply_brightness_contrast, apply_scale, equalize_local_histogram, Decoder, Editor, Encoder,
    GestureSnapshot, ImageCodec, PixelBuffer, Presenter, Response,
};
use walkdir::WalkDir;

use crate::config::EditorSettings;
use crate::presenter::FrameWriter;
use crate::script::Command;

#[derive(Parser, Debug)]
#[command(author, version, about = "Apply luma edits to images without a window")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// TOML file with an [editor] table
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Explicit log level, overrides -v
    #[arg(long, env = "LUMA_LOG", global = true)]
    log_level: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run local histogram equalization on an image or a directory of images
    Equalize(EqualizeArgs),
    /// Map luma through `contrast * y + brightness`
    Adjust(AdjustArgs),
    /// Scale about the bottom-left corner, keeping the canvas size
    Scale(ScaleArgs),
    /// Replay a script of input events against an editor session
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct EqualizeArgs {
    /// Input image or directory
    input: PathBuf,
    /// Output image, or output directory when the input is a directory
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    settings: EditorSettings,
}

#[derive(Parser, Debug)]
struct AdjustArgs {
    /// Input image path
    input: PathBuf,
    /// Output image path
    #[arg(short, long)]
    output: PathBuf,
    /// Luma multiplier
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    contrast: f64,
    /// Luma offset
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    brightness: f64,
}

#[derive(Parser, Debug)]
struct ScaleArgs {
    /// Input image path
    input: PathBuf,
    /// Output image path
    #[arg(short, long)]
    output: PathBuf,
    /// Scale factor (> 0)
    #[arg(long)]
    factor: f64,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Image the session starts from
    input: PathBuf,
    /// Event script
    #[arg(short, long)]
    script: PathBuf,
    /// Where to write the final image
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Directory receiving one PNG per presented frame
    #[arg(long)]
    frames_dir: Option<PathBuf>,
    #[command(flatten)]
    settings: EditorSettings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(logging::level_for(cli.log_level, cli.verbose))
        .context("failed to install logger")?;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Equalize(args) => equalize(args, config),
        Commands::Adjust(args) => adjust(args),
        Commands::Scale(args) => scale(args),
        Commands::Replay(args) => replay(args, config),
    }
}

fn equalize(args: EqualizeArgs, config: Option<&Path>) -> Result<()> {
    let radius = args.settings.to_options(config)?.histogram_radius;

    if !args.input.is_dir() {
        return equalize_file(&args.input, &args.output, radius);
    }

    let inputs = collect_images(&args.input)?;
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    for input in &inputs {
        let relative = input.strip_prefix(&args.input).unwrap_or(input);
        let output = args.output.join(relative);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {:?}", parent))?;
        }
        equalize_file(input, &output, radius)?;
        progress.inc(1);
    }

    progress.finish_with_message(format!("Equalized images written to {:?}", args.output));
    Ok(())
}

fn equalize_file(input: &Path, output: &Path, radius: u32) -> Result<()> {
    let mut buffer = load(input)?;
    equalize_local_histogram(&mut buffer, radius)
        .with_context(|| format!("failed to equalize {:?}", input))?;
    save(&buffer, output)
}

fn adjust(args: AdjustArgs) -> Result<()> {
    let mut buffer = load(&args.input)?;
    let snapshot = GestureSnapshot::capture(&buffer);
    apply_brightness_contrast(&mut buffer, &snapshot, args.contrast, args.brightness)
        .with_context(|| format!("failed to adjust {:?}", args.input))?;
    save(&buffer, &args.output)
}

fn scale(args: ScaleArgs) -> Result<()> {
    let mut buffer = load(&args.input)?;
    let snapshot = GestureSnapshot::capture(&buffer);
    apply_scale(&mut buffer, &snapshot, args.factor)
        .with_context(|| format!("failed to scale {:?}", args.input))?;
    save(&buffer, &args.output)
}

fn replay(args: ReplayArgs, config: Option<&Path>) -> Result<()> {
    let options = args.settings.to_options(config)?;
    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {:?}", args.script))?;
    let lines = script::parse(&source)
        .with_context(|| format!("failed to parse script {:?}", args.script))?;

    if let Some(dir) = &args.frames_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create frames directory {:?}", dir))?;
    }

    let mut editor = Editor::open(&ImageCodec, &args.input, &options)
        .with_context(|| format!("failed to open {:?}", args.input))?;
    let mut presenter = FrameWriter::new(args.frames_dir.clone());

    let progress = ProgressBar::new(lines.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} events",
        )?
        .progress_chars("=> "),
    );

    for line in &lines {
        let response = match &line.command {
            Command::Event(event) => editor.dispatch(*event, &mut presenter),
            Command::Load(path) => editor
                .load(&ImageCodec, path)
                .and_then(|()| presenter.present(editor.buffer()))
                .map(|()| Response::Redraw),
            Command::Save(path) => editor.save(&ImageCodec, path).map(|()| Response::Unchanged),
        }
        .with_context(|| format!("script line {} failed", line.number))?;
        progress.inc(1);

        if response == Response::Exit {
            info!("exit requested on script line {}", line.number);
            break;
        }
    }

    progress.finish_with_message(format!("{} frames presented", presenter.frames()));

    if let Some(output) = &args.output {
        save(editor.buffer(), output)?;
    }
    Ok(())
}

fn load(path: &Path) -> Result<PixelBuffer> {
    ImageCodec.load(path).with_context(|| format!("failed to open image {:?}", path))
}

fn save(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    ImageCodec.save(buffer, path).with_context(|| format!("failed to write image {:?}", path))
}

fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| image::ImageFormat::from_path(path).is_ok())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", dir);
    }
    Ok(entries)
}
