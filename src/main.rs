use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frame_cvt::{ConversionConfig, Frame, FrameConverter, ScalePolicy, Size};
use tracing::info;

/// Convert frames between fixed resolutions: one uniform scale factor, then a centered crop.
#[derive(Parser, Debug)]
#[command(name = "cvt")]
#[command(about = "Aspect-preserving resolution conversion with center cropping")]
#[command(long_about = "Convert images between fixed resolutions. Both axes share one scale factor
(area averaging when shrinking, cubic when enlarging); whatever exceeds the target is cropped
symmetrically. Output is never padded.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the scale factor, intermediate size and crop offsets for a conversion
    Plan {
        /// Source size, e.g. 1280x1024
        #[arg(long)]
        input: Size,

        /// Target size, e.g. 640x360
        #[arg(long)]
        output: Size,

        #[arg(long, value_enum, default_value_t = ScalePolicy::Gentle)]
        policy: ScalePolicy,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert an image file
    Convert {
        /// Image to read (any format the `image` crate decodes)
        input_path: PathBuf,

        /// Where to write the result; the extension selects the format
        output_path: PathBuf,

        /// TOML file with a [conversion] table; its input size must match the image
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target size, overrides the config file
        #[arg(short, long)]
        output: Option<Size>,

        /// Scale policy, overrides the config file
        #[arg(long, value_enum)]
        policy: Option<ScalePolicy>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("frame_cvt=info".parse()?)
                .add_directive("cvt=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Plan {
            input,
            output,
            policy,
            json,
        } => plan(input, output, policy, json),
        Command::Convert {
            input_path,
            output_path,
            config,
            output,
            policy,
        } => convert(input_path, output_path, config, output, policy),
    }
}

fn plan(input: Size, output: Size, policy: ScalePolicy, json: bool) -> Result<()> {
    let decision = cvt_scale::build_plan(input, output, policy)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    println!("{} -> {} ({:?})", input, output, policy);
    println!("  scale_x:      {:.4}", decision.scale_x);
    println!("  scale_y:      {:.4}", decision.scale_y);
    println!("  scale_factor: {:.4}", decision.scale_factor);
    println!("  scaled:       {}", decision.scaled);
    println!("  crop origin:  ({}, {})", decision.crop_x, decision.crop_y);
    match decision.interpolation {
        Some(filter) => println!("  filter:       {:?}", filter),
        None => println!("  filter:       none"),
    }
    if !decision.fits() {
        println!("  warning: scaled frame is smaller than the output, conversion will fail");
    }
    Ok(())
}

fn convert(
    input_path: PathBuf,
    output_path: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<Size>,
    policy: Option<ScalePolicy>,
) -> Result<()> {
    let image = image::open(&input_path)
        .with_context(|| format!("failed to read image {}", input_path.display()))?;
    let frame = Frame::from_image(image)?;

    let config = match config_path {
        Some(path) => {
            let file = ConversionConfig::load(&path)?;
            let target = output.unwrap_or(file.output());
            ConversionConfig::new(file.input_width(), file.input_height(), target.w, target.h)?
                .with_fps(file.input_fps(), file.output_fps())?
                .with_policy(policy.unwrap_or(file.policy()))
        }
        None => {
            let target = output.context("either --output or --config is required")?;
            ConversionConfig::new(frame.width(), frame.height(), target.w, target.h)?
                .with_policy(policy.unwrap_or_default())
        }
    };

    let converter = FrameConverter::new(config)?;
    let converted = converter.convert(&frame)?;
    converted
        .to_image()?
        .save(&output_path)
        .with_context(|| format!("failed to write image {}", output_path.display()))?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        size = %converted.size(),
        "image converted"
    );
    Ok(())
}
