use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand};
use libalphamask::{
    base_url_from_uri, sink, AsvrError, CancelFlag, ContainerKind, DecodeMode, MaskDecoder, RenderOptions,
    SceneMetadata,
};
use tracing_subscriber::EnvFilter;

/// Frames rendered per batch before their PNGs are written.
const RENDER_CHUNK: u32 = 64;

#[derive(Parser, Debug)]
#[command(name = "alphamask", version, about = "Inspect, convert and render ASVR alpha-mask containers")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the container layout and check its size.
    Info(InfoArgs),
    /// Write the plaintext-equivalent (ASVP) container.
    Convert(ConvertArgs),
    /// Render frames to grayscale PNGs.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene id from the catalog. Not needed for plaintext inputs.
    #[arg(long)]
    scene_id: Option<u32>,

    /// Asset version string, e.g. 1.5.0.
    #[arg(long = "version", id = "asset_version")]
    version: Option<String>,

    /// Base url salt component. Defaults to the input file name.
    #[arg(long, conflicts_with = "uri")]
    base_url: Option<String>,

    /// Full container URL; its last path segment becomes the base url.
    #[arg(long)]
    uri: Option<String>,

    /// Report faulty frames and keep going instead of failing.
    #[arg(long)]
    lenient: bool,
}

impl SceneArgs {
    fn metadata(&self, input: &Path) -> anyhow::Result<Option<SceneMetadata>> {
        let Some(scene_id) = self.scene_id else {
            return Ok(None);
        };
        let Some(version) = &self.version else {
            bail!("--version is required together with --scene-id");
        };
        let base_url = match (&self.base_url, &self.uri) {
            (Some(base_url), _) => base_url.clone(),
            (None, Some(uri)) => base_url_from_uri(uri).to_owned(),
            (None, None) => input
                .file_name()
                .and_then(|s| s.to_str())
                .context("input path has no usable file name; pass --base-url")?
                .to_owned(),
        };
        tracing::debug!(scene_id, version = %version, base_url = %base_url, "scene metadata");
        Ok(Some(SceneMetadata::new(scene_id, version.as_bytes(), base_url.into_bytes())))
    }

    fn mode(&self) -> DecodeMode {
        if self.lenient {
            DecodeMode::Lenient
        } else {
            DecodeMode::Strict
        }
    }
}

#[derive(Parser, Debug)]
struct InfoArgs {
    input: PathBuf,

    #[command(flatten)]
    scene: SceneArgs,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    input: PathBuf,

    output: PathBuf,

    #[command(flatten)]
    scene: SceneArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    input: PathBuf,

    #[command(flatten)]
    scene: SceneArgs,

    /// Directory for frame_NNNNNN.png files.
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Last frame (exclusive). Defaults to the frame count.
    #[arg(long)]
    end: Option<u32>,

    /// Draw outlines only.
    #[arg(long)]
    no_fill: bool,

    /// Worker threads; 0 uses one per core.
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn open_decoder(
    input: &Path,
    scene: &SceneArgs,
    render: RenderOptions,
    threads: usize,
) -> anyhow::Result<MaskDecoder> {
    let meta = scene.metadata(input)?;
    let decoder = MaskDecoder::builder()
        .runtime_threads(threads)
        .max_in_flight(threads.max(1) * 2)
        .mode(scene.mode())
        .render_options(render)
        .build_from_path(input, meta.as_ref());
    match decoder {
        Err(AsvrError::MissingKeyMaterial(msg)) => {
            bail!("{msg}: pass --scene-id and --version for encrypted inputs")
        }
        other => other.with_context(|| format!("open {}", input.display())),
    }
}

fn run_info(args: InfoArgs) -> anyhow::Result<()> {
    let decoder = open_decoder(&args.input, &args.scene, RenderOptions::default(), 1)?;
    let info = decoder.info();
    let kind = match info.kind {
        ContainerKind::Encrypted => "ASVR (encrypted)",
        ContainerKind::Plain => "ASVP (plaintext)",
    };
    println!("kind:                 {kind}");
    println!("frames:               {}", info.frame_count);
    println!("compressed_data_size: {}", info.compressed_data_size);
    println!("total_body_size:      {}", info.total_body_size);
    println!("expected_file_size:   {}", info.expected_file_size);
    println!("actual_file_size:     {}", info.actual_file_size);
    println!(
        "size check:           {}",
        if info.is_exact() { "ok" } else { "trailing bytes" }
    );
    Ok(())
}

fn run_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let decoder = open_decoder(&args.input, &args.scene, RenderOptions::default(), 1)?;
    let file = File::create(&args.output).with_context(|| format!("create {}", args.output.display()))?;
    let summary = decoder
        .convert_to_plain(BufWriter::new(file))
        .with_context(|| format!("convert {}", args.input.display()))?;
    for (frame, fault) in &summary.faults {
        eprintln!("frame {frame}: {fault}");
    }
    println!(
        "wrote {} frames ({} bytes) to {}",
        summary.frames,
        summary.bytes_written,
        args.output.display()
    );
    Ok(())
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let render = RenderOptions::new(args.width, args.height).with_fill(!args.no_fill);
    let decoder = open_decoder(&args.input, &args.scene, render, args.threads)?;
    let end = args.end.unwrap_or(decoder.frame_count()).min(decoder.frame_count());
    if args.start >= end {
        bail!("empty frame range {}..{} (frame count {})", args.start, end, decoder.frame_count());
    }
    std::fs::create_dir_all(&args.out_dir).with_context(|| format!("create {}", args.out_dir.display()))?;

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).context("install Ctrl-C handler")?;
    }

    let (mut written, mut failed) = (0u32, 0u32);
    let mut chunk_start = args.start;
    while chunk_start < end {
        let chunk_end = chunk_start.saturating_add(RENDER_CHUNK).min(end);
        let indices: Vec<u32> = (chunk_start..chunk_end).collect();
        let outcomes = decoder
            .render_frames(&indices, &cancel)
            .with_context(|| format!("render frames {chunk_start}..{chunk_end}"))?;
        for outcome in outcomes {
            match outcome.result {
                Ok(mask) => {
                    let path = args.out_dir.join(sink::frame_file_name(outcome.index));
                    sink::save_png(&mask, &path).with_context(|| format!("write {}", path.display()))?;
                    written += 1;
                }
                Err(err) => {
                    eprintln!("frame {}: {err}", outcome.index);
                    failed += 1;
                }
            }
        }
        tracing::info!(done = chunk_end - args.start, total = end - args.start, "progress");
        chunk_start = chunk_end;
    }
    println!("rendered {written} frames to {} ({failed} failed)", args.out_dir.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => run_info(args),
        Command::Convert(args) => run_convert(args),
        Command::Render(args) => run_render(args),
    }
}
