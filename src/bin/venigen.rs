//! CLI for Venigen - Venice.ai media generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use venigen::{
    run_video_job, AlwaysConfirm, Confirm, ConsoleConfirm, EditImageRequest,
    GenerateImageRequest, ImageFormat, RetrieveOptions, UpscaleRequest, VeniceClient,
    VideoDuration, VideoJobConfig, VideoJobOutcome, VideoJobRequest, VideoResolution,
    DEFAULT_EDIT_MODEL, DEFAULT_GENERATE_MODEL, DEFAULT_VIDEO_MODEL,
};

#[derive(Parser)]
#[command(name = "venigen")]
#[command(about = "Generate, edit and upscale images and generate videos via the Venice.ai API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key (falls back to the VENICE_API_KEY env var)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate images from a text prompt
    Generate(GenerateArgs),

    /// Edit an image with a text instruction
    Edit(EditArgs),

    /// Apply several edits to an image sequentially
    MultiEdit(MultiEditArgs),

    /// Upscale and/or enhance an image
    Upscale(UpscaleArgs),

    /// Remove the background from an image
    RemoveBackground(RemoveBackgroundArgs),

    /// Generate a video from an image and a motion prompt (billable; quotes first)
    Video(VideoArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Output file path
    #[arg(short, long, default_value = "generated_image.png")]
    output: PathBuf,

    /// Model to use
    #[arg(long, default_value = DEFAULT_GENERATE_MODEL)]
    model: String,

    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 576)]
    height: u32,

    /// Aspect ratio (e.g. 16:9)
    #[arg(long, default_value = "16:9")]
    aspect_ratio: String,

    /// Resolution tier (e.g. 1K, 2K, 4K) - premium models only
    #[arg(long)]
    resolution: Option<String>,

    /// What to avoid in the image
    #[arg(long, default_value = "")]
    negative_prompt: String,

    /// CFG scale (0-20)
    #[arg(long, default_value_t = 7.5)]
    cfg_scale: f64,

    /// Seed for reproducible generation
    #[arg(long)]
    seed: Option<i64>,

    /// Output format
    #[arg(long, value_enum, default_value = "png")]
    format: FormatArg,

    /// Number of variants to generate (1-4)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    variants: u8,
}

#[derive(Args)]
struct EditArgs {
    /// Input image path
    image: PathBuf,

    /// Edit instruction (e.g. "change sky to sunset")
    prompt: String,

    /// Output file path
    #[arg(short, long, default_value = "edited_image.png")]
    output: PathBuf,

    /// Edit model to use
    #[arg(long, default_value = DEFAULT_EDIT_MODEL)]
    model: String,

    /// Output aspect ratio (e.g. 16:9)
    #[arg(long)]
    aspect_ratio: Option<String>,
}

#[derive(Args)]
struct MultiEditArgs {
    /// Input image path
    image: PathBuf,

    /// Edit prompts to apply in order
    #[arg(required = true)]
    edits: Vec<String>,

    /// Final output file path
    #[arg(short, long, default_value = "final_edit.png")]
    output: PathBuf,

    /// Edit model to use
    #[arg(long, default_value = DEFAULT_EDIT_MODEL)]
    model: String,

    /// Save intermediate steps as separate files
    #[arg(long)]
    save_steps: bool,

    /// Output aspect ratio (e.g. 16:9)
    #[arg(long)]
    aspect_ratio: Option<String>,
}

#[derive(Args)]
struct UpscaleArgs {
    /// Input image path
    image: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "upscaled_image.png")]
    output: PathBuf,

    /// Scale factor (1-4); use 1 with --enhance for enhancement only
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
    scale: u8,

    /// Apply AI enhancement (required if scale is 1)
    #[arg(long)]
    enhance: bool,

    /// Enhancement creativity (0-1, higher changes more)
    #[arg(long, default_value_t = 0.5)]
    enhance_creativity: f64,

    /// Enhancement style prompt (e.g. "crisp details")
    #[arg(long, default_value = "")]
    enhance_prompt: String,

    /// Replication strength (0-1, higher preserves more of the original)
    #[arg(long, default_value_t = 0.35)]
    replication: f64,
}

#[derive(Args)]
struct RemoveBackgroundArgs {
    /// Input image path
    image: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "no_background.png")]
    output: PathBuf,
}

#[derive(Args)]
struct VideoArgs {
    /// Input image path
    image: PathBuf,

    /// Video description/motion prompt
    prompt: String,

    /// Output file path
    #[arg(short, long, default_value = "generated_video.mp4")]
    output: PathBuf,

    /// Video duration
    #[arg(long, value_enum, default_value = "5s")]
    duration: DurationArg,

    /// Video resolution
    #[arg(long, value_enum, default_value = "720p")]
    resolution: ResolutionArg,

    /// Aspect ratio (e.g. 16:9)
    #[arg(long, default_value = "16:9")]
    aspect_ratio: String,

    /// What to avoid
    #[arg(long)]
    negative_prompt: Option<String>,

    /// Disable audio generation
    #[arg(long)]
    no_audio: bool,

    /// Video generation model
    #[arg(long, default_value = DEFAULT_VIDEO_MODEL)]
    model: String,

    /// Reference images for consistency
    #[arg(long, num_args = 1..)]
    reference_images: Vec<PathBuf>,

    /// Seconds between status checks
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Give up after this many seconds of waiting (default: wait indefinitely)
    #[arg(long)]
    deadline: Option<u64>,

    /// Delete the media from Venice servers after download
    #[arg(long)]
    delete_on_completion: bool,

    /// Skip the cost confirmation prompt (use with caution)
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpeg => ImageFormat::Jpeg,
            FormatArg::Webp => ImageFormat::WebP,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DurationArg {
    #[value(name = "5s")]
    FiveSeconds,
    #[value(name = "10s")]
    TenSeconds,
}

impl From<DurationArg> for VideoDuration {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::FiveSeconds => VideoDuration::FiveSeconds,
            DurationArg::TenSeconds => VideoDuration::TenSeconds,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResolutionArg {
    #[value(name = "480p")]
    P480,
    #[value(name = "720p")]
    P720,
    #[value(name = "1080p")]
    P1080,
}

impl From<ResolutionArg> for VideoResolution {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::P480 => VideoResolution::P480,
            ResolutionArg::P720 => VideoResolution::P720,
            ResolutionArg::P1080 => VideoResolution::P1080,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = VeniceClient::builder();
    if let Some(key) = cli.api_key {
        builder = builder.api_key(key);
    }
    let client = builder.build()?;

    match cli.command {
        Commands::Generate(args) => generate(&client, args, cli.json).await?,
        Commands::Edit(args) => edit(&client, args, cli.json).await?,
        Commands::MultiEdit(args) => multi_edit(&client, args, cli.json).await?,
        Commands::Upscale(args) => upscale(&client, args, cli.json).await?,
        Commands::RemoveBackground(args) => remove_background(&client, args, cli.json).await?,
        Commands::Video(args) => video(&client, args, cli.json).await?,
    }

    Ok(())
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("image file not found: {}", path.display());
    }
    Ok(std::fs::read(path)?)
}

/// Derives "name_1.png" style paths for saving multiple variants.
fn variant_path(output: &Path, index: usize, total: usize) -> PathBuf {
    if total == 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    output.with_file_name(format!("{}_{}.{}", stem, index + 1, ext))
}

async fn generate(client: &VeniceClient, args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let mut request = GenerateImageRequest::new(&args.prompt)
        .with_model(&args.model)
        .with_size(args.width, args.height)
        .with_aspect_ratio(&args.aspect_ratio)
        .with_negative_prompt(&args.negative_prompt)
        .with_cfg_scale(args.cfg_scale)
        .with_format(args.format.into())
        .with_variants(args.variants);

    if let Some(resolution) = args.resolution {
        request = request.with_resolution(resolution);
    }
    if let Some(seed) = args.seed {
        request = request.with_seed(seed);
    }

    let images = client.generate_image(&request).await?;

    let mut saved = Vec::new();
    for (i, image) in images.iter().enumerate() {
        let path = variant_path(&args.output, i, images.len());
        image.save(&path)?;
        saved.push(path);
    }

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "model": args.model,
            "outputs": saved.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for path in &saved {
            println!("Saved: {}", path.display());
        }
        println!("Generated {} image(s)", saved.len());
    }

    Ok(())
}

async fn edit(client: &VeniceClient, args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;

    let mut request = EditImageRequest::new(image, &args.prompt).with_model(&args.model);
    if let Some(ratio) = args.aspect_ratio {
        request = request.with_aspect_ratio(ratio);
    }

    let edited = client.edit_image(&request).await?;
    edited.save(&args.output)?;

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "model": args.model,
            "output": args.output.display().to_string(),
            "size_bytes": edited.size(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved edited image: {}", args.output.display());
    }

    Ok(())
}

async fn multi_edit(
    client: &VeniceClient,
    args: MultiEditArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;

    if !json_output {
        println!(
            "Applying {} edit(s) to {}",
            args.edits.len(),
            args.image.display()
        );
    }

    let steps = client
        .edit_chain(image, &args.edits, &args.model, args.aspect_ratio.as_deref())
        .await?;

    let mut step_paths = Vec::new();
    if args.save_steps {
        for (i, step) in steps.iter().enumerate() {
            let path = args.output.with_file_name(format!(
                "{}_step{}.png",
                args.output
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("edit"),
                i + 1
            ));
            step.save(&path)?;
            step_paths.push(path);
        }
    }

    // The last step is the final image; steps is non-empty because clap
    // requires at least one edit prompt
    let last = steps.last().expect("edit chain returned no steps");
    last.save(&args.output)?;

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "model": args.model,
            "edits_applied": args.edits.len(),
            "output": args.output.display().to_string(),
            "steps": step_paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for path in &step_paths {
            println!("Saved step: {}", path.display());
        }
        println!("Applied {} edit(s)", args.edits.len());
        println!("Final result: {}", args.output.display());
    }

    Ok(())
}

async fn upscale(client: &VeniceClient, args: UpscaleArgs, json_output: bool) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;

    let request = UpscaleRequest::new(image)
        .with_scale(args.scale)
        .with_enhance(args.enhance)
        .with_enhance_creativity(args.enhance_creativity)
        .with_enhance_prompt(&args.enhance_prompt)
        .with_replication(args.replication);

    let upscaled = client.upscale_image(&request).await?;
    upscaled.save(&args.output)?;

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "scale": args.scale,
            "enhance": args.enhance,
            "output": args.output.display().to_string(),
            "size_bytes": upscaled.size(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved upscaled image: {}", args.output.display());
    }

    Ok(())
}

async fn remove_background(
    client: &VeniceClient,
    args: RemoveBackgroundArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;

    let result_image = client.remove_background(image).await?;
    result_image.save(&args.output)?;

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": result_image.size(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved image without background: {}", args.output.display());
    }

    Ok(())
}

async fn video(client: &VeniceClient, args: VideoArgs, json_output: bool) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;

    let config = VideoJobConfig::new()
        .with_model(&args.model)
        .with_duration(args.duration.into())
        .with_resolution(args.resolution.into())
        .with_aspect_ratio(&args.aspect_ratio)
        .with_audio(!args.no_audio);

    let mut request = VideoJobRequest::new(config, &args.prompt, image);
    if let Some(negative) = args.negative_prompt {
        request = request.with_negative_prompt(negative);
    }
    for path in &args.reference_images {
        request = request.with_reference_image(read_image(path)?);
    }

    let options = RetrieveOptions {
        poll_interval: Duration::from_secs(args.poll_interval),
        deadline: args.deadline.map(Duration::from_secs),
        delete_on_completion: args.delete_on_completion,
    };

    let confirm: &dyn Confirm = if args.yes {
        &AlwaysConfirm
    } else {
        &ConsoleConfirm
    };

    if !json_output {
        println!("Getting price quote...");
    }

    let outcome = run_video_job(client, &request, &options, confirm, &args.output).await?;

    match outcome {
        VideoJobOutcome::Completed {
            output,
            size_bytes,
            quote,
        } => {
            if json_output {
                let result = serde_json::json!({
                    "type": "video",
                    "success": true,
                    "model": args.model,
                    "output": output.display().to_string(),
                    "size_bytes": size_bytes,
                    "cost": quote.amount,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "Successfully generated video: {} ({} bytes)",
                    output.display(),
                    size_bytes
                );
                println!("Total cost: ${quote} USD");
            }
        }
        VideoJobOutcome::Cancelled { quote } => {
            if json_output {
                let result = serde_json::json!({
                    "type": "video",
                    "success": false,
                    "cancelled": true,
                    "cost": quote.amount,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Video generation cancelled.");
            }
        }
    }

    Ok(())
}
