//! CLI binary for spriteforge.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use spriteforge::config::{MAX_SEQUENCE_FRAMES, MAX_SHEET_COLUMNS};
use spriteforge::generation::GeminiBackend;
use spriteforge::{
    AnimationState, EncodedImage, ForgeConfig, ForgeEvent, GeneratedFrame, SpriteCategory,
    SpriteConfig, SpriteForge, SpriteStyle, SpriteWeapon,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// SpriteForge: generate consistent 2D character sprite sets.
#[derive(Parser)]
#[command(name = "spriteforge", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Generate a base sprite and animation sequences, then export PNGs.
    Generate {
        #[command(flatten)]
        sprite: SpriteArgs,

        /// Animation to generate after the base, as `state=count` (repeatable).
        #[arg(short, long = "sequence", value_parser = parse_sequence)]
        sequences: Vec<(AnimationState, usize)>,

        /// Sprite sheet columns (defaults to the configured value).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SHEET_COLUMNS)))]
        columns: Option<u32>,

        /// Output directory.
        #[arg(short, long, default_value = "sprites")]
        out: PathBuf,
    },

    /// Matte the background of a local image and center its content.
    Clean {
        input: PathBuf,

        /// RGB distance under which a pixel counts as background.
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Output file (default: `<input>_clean.png`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Composite local images into a sprite sheet.
    Sheet {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SHEET_COLUMNS)))]
        columns: Option<u32>,

        /// Output file (default: the configured sheet file name).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Character identity flags for `generate`.
#[derive(Args, Debug, Default)]
struct SpriteArgs {
    /// Start from a random category, style, weapon and description.
    #[arg(long)]
    random: bool,

    #[arg(long, value_enum)]
    category: Option<SpriteCategory>,

    #[arg(long, value_enum)]
    style: Option<SpriteStyle>,

    #[arg(long, value_enum)]
    weapon: Option<SpriteWeapon>,

    /// Free-text character description.
    #[arg(short, long)]
    description: Option<String>,
}

impl SpriteArgs {
    /// Apply the flags on top of `base`. Explicit values win over `--random`.
    fn resolve(self, base: SpriteConfig, rng: &mut impl rand::Rng) -> SpriteConfig {
        let mut sprite = if self.random {
            SpriteConfig::random(rng)
        } else {
            base
        };
        if let Some(category) = self.category {
            sprite.category = category;
        }
        if let Some(style) = self.style {
            sprite.style = style;
        }
        if let Some(weapon) = self.weapon {
            sprite.weapon = weapon;
        }
        if let Some(description) = self.description {
            sprite.description = description;
        }
        sprite
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spriteforge=info,spriteforge_raster=warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ForgeConfig::from_file(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ForgeConfig::load_or_default(&ForgeConfig::default_config_path())?,
    };
    config.validate()?;

    match cli.command {
        Command::Generate {
            sprite,
            sequences,
            columns,
            out,
        } => {
            let mut config = config;
            config.sprite = sprite.resolve(config.sprite, &mut rand::thread_rng());
            if let Some(columns) = columns {
                config.sheet.columns = columns;
            }
            run_generate(config, sequences, &out).await
        }
        Command::Clean {
            input,
            tolerance,
            output,
        } => run_clean(
            &input,
            tolerance.unwrap_or(config.postprocess.tolerance),
            output,
        ),
        Command::Sheet {
            inputs,
            columns,
            output,
        } => run_sheet(
            &inputs,
            columns.unwrap_or(config.sheet.columns),
            output.unwrap_or_else(|| PathBuf::from(&config.sheet.file_name)),
        ),
    }
}

async fn run_generate(
    config: ForgeConfig,
    sequences: Vec<(AnimationState, usize)>,
    out: &Path,
) -> anyhow::Result<()> {
    let backend = GeminiBackend::new(config.backend.gemini_config()?)?;
    let forge = SpriteForge::from_config(&config, Arc::new(backend))?
        .with_event_callback(Box::new(print_event));

    println!(
        "Generating {} {} ({})",
        config.sprite.style, config.sprite.category, config.sprite.description
    );
    forge
        .generate_base(|| true)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    for (state, count) in sequences {
        forge
            .generate_sequence(state, count)
            .await
            .map_err(|e| anyhow::anyhow!("{state} sequence: {}", e.user_message()))?;
    }

    export_session(&forge, &config, out).await?;
    println!("Wrote {} frames to {}", forge.frame_count(), out.display());
    Ok(())
}

/// Write every frame, then the sheet, then per-state strips.
///
/// Frames are already paid for, so a strip that cannot be composed is logged
/// and skipped rather than ending the export.
async fn export_session(
    forge: &SpriteForge,
    config: &ForgeConfig,
    out: &Path,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("cannot create output directory {}", out.display()))?;

    for state in AnimationState::ALL {
        let frames = forge.frames_for_state(state);
        for (path, frame) in frame_paths(out, state, &frames) {
            write_image(&path, &frame.image)?;
        }
    }

    if let Some(sheet) = forge.sprite_sheet(config.sheet.columns).await? {
        write_image(&out.join(&config.sheet.file_name), &sheet)?;
    }

    for state in AnimationState::ALL {
        match forge.state_strip(state).await {
            Ok(Some(strip)) => {
                write_image(&out.join(format!("{}_strip.png", state.slug())), &strip)?;
            }
            Ok(None) => {}
            Err(e) => warn!(%state, code = e.code(), error = %e, "strip skipped"),
        }
    }
    Ok(())
}

fn run_clean(input: &Path, tolerance: f64, output: Option<PathBuf>) -> anyhow::Result<()> {
    let image = read_image(input)?;
    let cleaned = spriteforge_raster::clean_sprite(&image, tolerance)?;
    let output = output.unwrap_or_else(|| clean_output_path(input));
    write_image(&output, &cleaned)
}

fn run_sheet(inputs: &[PathBuf], columns: u32, output: PathBuf) -> anyhow::Result<()> {
    let images = inputs
        .iter()
        .map(|p| read_image(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    match spriteforge_raster::generate_sprite_sheet(&images, columns)? {
        Some(sheet) => write_image(&output, &sheet),
        None => anyhow::bail!("no images to composite"),
    }
}

fn print_event(event: ForgeEvent) {
    match event {
        ForgeEvent::RequestStarted {
            state,
            index,
            total,
        } => println!("  {state}: frame {index}/{total}..."),
        ForgeEvent::FrameAdded { frame_id, state } => {
            info!(%frame_id, %state, "frame ready");
        }
        ForgeEvent::ActionFailed { message } => eprintln!("  failed: {message}"),
    }
}

/// Parse `state=count`, e.g. `walk=4`.
fn parse_sequence(s: &str) -> Result<(AnimationState, usize), String> {
    let (state, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <state>=<count>, got '{s}'"))?;
    let state =
        AnimationState::parse(state).ok_or_else(|| format!("unknown animation state '{state}'"))?;
    let count: usize = count
        .trim()
        .parse()
        .map_err(|_| format!("invalid frame count '{count}'"))?;
    if !(1..=MAX_SEQUENCE_FRAMES).contains(&count) {
        return Err(format!(
            "frame count must be in 1..={MAX_SEQUENCE_FRAMES}, got {count}"
        ));
    }
    Ok((state, count))
}

/// `<state>_<nn>.png` for each frame, numbered from 01.
fn frame_paths<'a>(
    dir: &Path,
    state: AnimationState,
    frames: &'a [GeneratedFrame],
) -> Vec<(PathBuf, &'a GeneratedFrame)> {
    frames
        .iter()
        .enumerate()
        .map(|(i, f)| (dir.join(format!("{}_{:02}.png", state.slug(), i + 1)), f))
        .collect()
}

fn clean_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite".to_owned());
    input.with_file_name(format!("{stem}_clean.png"))
}

fn read_image(path: &Path) -> anyhow::Result<EncodedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let format = image::guess_format(&bytes)
        .with_context(|| format!("{} is not a recognised image", path.display()))?;
    Ok(EncodedImage::new(format.to_mime_type(), bytes))
}

fn write_image(path: &Path, image: &EncodedImage) -> anyhow::Result<()> {
    std::fs::write(path, image.data()).with_context(|| format!("cannot write {}", path.display()))?;
    info!(path = %path.display(), bytes = image.data().len(), "wrote image");
    Ok(())
}
