//! rd-cli: command-line front end for the Retro Diffusion API.
//!
//! Usage:
//!   rd-cli credits                               Show the remaining credit balance
//!   rd-cli generate <prompt> [OPTIONS]           Text-to-image generation
//!   rd-cli img2img <prompt> <image> [OPTIONS]    Image-to-image generation
//!   rd-cli animate <prompt> [OPTIONS]            Four-angle walking animation

use retro_diffusion::{
    AnimationRequest, ImageToImageRequest, InferenceResponse, PromptStyle, RetroDiffusionClient,
    TextToImageRequest,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "credits" => cmd_credits().await,
        "generate" => cmd_generate(&args[2..]).await,
        "img2img" => cmd_img2img(&args[2..]).await,
        "animate" => cmd_animate(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"rd-cli: Retro Diffusion command-line tool

USAGE:
    rd-cli <COMMAND> [OPTIONS]

COMMANDS:
    credits                         Show the remaining credit balance
    generate <prompt>               Generate images from a prompt
    img2img <prompt> <image>        Transform a local image file
    animate <prompt>                Generate a 48x48 walking animation
    version                         Show version information
    help                            Show this help message

OPTIONS:
    --width <n> --height <n>        Output size (64, 128, 256 or 512)
    --num <n>                       Number of images (1-10)
    --style <style>                 Prompt style, e.g. rd_fast__retro
    --seed <n>                      Seed for reproducible output
    --strength <f>                  img2img strength (0-1)
    --remove-bg                     Remove the background (generate)
    --spritesheet                   Return a spritesheet instead of a GIF (animate)
    --out <dir>                     Output directory (default: current directory)

ENVIRONMENT:
    RD_TOKEN / RD_API_KEY           API key
    RD_BASE_URL                     Override the API base URL
    RUST_LOG                        Log filter, e.g. retro_diffusion=debug"#
    );
}

fn cmd_version() {
    println!("rd-cli {}", env!("CARGO_PKG_VERSION"));
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Parsed options shared by the generation commands.
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    width: Option<u32>,
    height: Option<u32>,
    num: Option<u32>,
    style: Option<PromptStyle>,
    seed: Option<i64>,
    strength: Option<f64>,
    remove_bg: bool,
    spritesheet: bool,
    out: Option<PathBuf>,
}

fn parse_options(args: &[String]) -> Result<Options, Box<dyn std::error::Error>> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--width" => opts.width = Some(value(arg)?.parse()?),
            "--height" => opts.height = Some(value(arg)?.parse()?),
            "--num" => opts.num = Some(value(arg)?.parse()?),
            "--style" => opts.style = Some(value(arg)?.parse()?),
            "--seed" => opts.seed = Some(value(arg)?.parse()?),
            "--strength" => opts.strength = Some(value(arg)?.parse()?),
            "--out" => opts.out = Some(PathBuf::from(value(arg)?)),
            "--remove-bg" => opts.remove_bg = true,
            "--spritesheet" => opts.spritesheet = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}").into()),
            _ => opts.positional.push(arg.clone()),
        }
    }
    Ok(opts)
}

fn client() -> retro_diffusion::Result<RetroDiffusionClient> {
    let mut builder = RetroDiffusionClient::builder();
    if let Ok(url) = std::env::var("RD_BASE_URL") {
        builder = builder.base_url(url);
    }
    builder.build()
}

async fn cmd_credits() -> CliResult {
    let balance = client()?.credits().get().await?;
    println!("{}", balance.credits);
    Ok(())
}

async fn cmd_generate(args: &[String]) -> CliResult {
    let opts = parse_options(args)?;
    let prompt = opts.positional.first().ok_or("generate requires a prompt")?;

    let mut request = TextToImageRequest::new(prompt.as_str());
    request.width = opts.width;
    request.height = opts.height;
    request.num_images = opts.num;
    request.seed = opts.seed;
    request.prompt_style = opts.style;
    if opts.remove_bg {
        request.remove_bg = Some(true);
    }

    let response = client()?.inference().text_to_image(request).await?;
    write_images(&response, opts.out.as_deref(), "png")
}

async fn cmd_img2img(args: &[String]) -> CliResult {
    let opts = parse_options(args)?;
    let prompt = opts.positional.first().ok_or("img2img requires a prompt")?;
    let image = opts.positional.get(1).ok_or("img2img requires an image path")?;
    let encoded = retro_diffusion::utils::encode_file(image)?;

    let mut request = ImageToImageRequest::new(prompt.as_str(), encoded);
    request.width = opts.width;
    request.height = opts.height;
    request.num_images = opts.num;
    request.seed = opts.seed;
    request.prompt_style = opts.style;
    request.strength = opts.strength;

    let response = client()?.inference().image_to_image(request).await?;
    write_images(&response, opts.out.as_deref(), "png")
}

async fn cmd_animate(args: &[String]) -> CliResult {
    let opts = parse_options(args)?;
    let prompt = opts.positional.first().ok_or("animate requires a prompt")?;

    let mut request = AnimationRequest::new(prompt.as_str());
    request.seed = opts.seed;
    if opts.spritesheet {
        request.return_spritesheet = Some(true);
    }

    let response = client()?.inference().animation(request).await?;
    let ext = if opts.spritesheet { "png" } else { "gif" };
    write_images(&response, opts.out.as_deref(), ext)
}

fn write_images(response: &InferenceResponse, out: Option<&Path>, ext: &str) -> CliResult {
    let dir = out.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    for (i, bytes) in response.decode_images()?.iter().enumerate() {
        let path = dir.join(format!("rd_{}_{}.{}", response.created_at, i, ext));
        std::fs::write(&path, bytes)?;
        println!("{}", path.display());
    }
    eprintln!(
        "model={} cost={} remaining={}",
        response.model.as_str(),
        response.credit_cost,
        response.remaining_credits
    );
    Ok(())
}
