use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

type OfflineSession = mapview::PreviewSession<
    mapview::SilentTransport<mapview::ManualSource>,
    mapview::ManualSource,
>;

#[derive(Parser, Debug)]
#[command(name = "mapview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single preview frame as a PNG.
    Frame(FrameArgs),
    /// Render a sequence of frames as numbered PNGs.
    Frames(FramesArgs),
    /// Print beatmap diagnostics as JSON.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Input beatmap JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional preview config JSON; `MAPVIEW_*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which surface to write.
    #[arg(long, value_enum, default_value_t = View::Playfield)]
    view: View,

    /// Timeline zoom factor.
    #[arg(long)]
    zoom: Option<f64>,

    /// Timeline beat-snap divisor.
    #[arg(long)]
    snap: Option<u32>,

    /// Draw the playfield grid.
    #[arg(long)]
    grid: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Preview time in milliseconds.
    #[arg(long)]
    time_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// First frame time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    from_ms: f64,

    /// Last frame time in milliseconds (inclusive).
    #[arg(long)]
    to_ms: f64,

    /// Frames per second of preview time.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Playback rate.
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Output directory; frames are written as `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input beatmap JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum View {
    Playfield,
    Timeline,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_beatmap(path: &Path) -> anyhow::Result<mapview::BeatmapMetadata> {
    let f = File::open(path).with_context(|| format!("open beatmap '{}'", path.display()))?;
    mapview::BeatmapMetadata::from_json_reader(BufReader::new(f))
        .with_context(|| format!("load beatmap '{}'", path.display()))
}

fn load_config(common: &CommonArgs) -> anyhow::Result<mapview::PreviewConfig> {
    let mut config = match &common.config {
        Some(path) => mapview::PreviewConfig::from_json_file(path)?,
        None => mapview::PreviewConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(zoom) = common.zoom {
        config.timeline_zoom = zoom;
    }
    if let Some(snap) = common.snap {
        config.snap_divisor = snap;
    }
    config.show_grid |= common.grid;
    config.validate()?;
    Ok(config)
}

fn open_session(common: &CommonArgs) -> anyhow::Result<(mapview::ManualSource, OfflineSession)> {
    let meta = read_beatmap(&common.in_path)?;
    let config = load_config(common)?;
    let source = mapview::ManualSource::new();
    let transport = mapview::SilentTransport::new(source.clone(), meta.audio_duration_ms);
    let session = mapview::PreviewSession::new(meta, &config, transport, source.clone())
        .context("prepare preview")?;
    Ok((source, session))
}

fn selected_frame(session: &OfflineSession, view: View) -> mapview::FrameRGBA {
    match view {
        View::Playfield => session.playfield_frame(),
        View::Timeline => session.timeline_frame(),
    }
}

fn write_png(path: &Path, frame: &mapview::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    // PNG stores straight alpha.
    let frame = frame.unpremultiplied();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (_, mut session) = open_session(&args.common)?;
    session.seek(args.time_ms)?;
    let outcome = session.render_frame();
    write_png(&args.out, &selected_frame(&session, args.common.view))?;

    tracing::info!(
        time_ms = outcome.time_ms,
        drawn = outcome.playfield.objects_drawn,
        markers = outcome.playfield.markers,
        "frame rendered"
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Drive the real frame loop with a hand-stepped clock and host.
fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    if !(args.to_ms >= args.from_ms) {
        anyhow::bail!("--to-ms must not precede --from-ms");
    }
    let (source, mut session) = open_session(&args.common)?;
    session.set_rate(args.rate)?;
    session.seek(args.from_ms)?;
    session.play()?;

    let step_ms = 1000.0 / args.fps;
    let count = ((args.to_ms - args.from_ms) / (step_ms * args.rate)).floor() as u64 + 1;
    let mut frame_loop = mapview::PreviewLoop::new(session, mapview::ManualFrameHost::new());
    frame_loop.start();

    let mut written = 0u64;
    while written < count {
        let Some(handle) = frame_loop.host_mut().take_pending() else {
            break;
        };
        let Some(outcome) = frame_loop.on_frame(handle) else {
            break;
        };
        let Some(session) = frame_loop.session() else {
            break;
        };
        let path = args.out_dir.join(format!("frame_{written:05}.png"));
        write_png(&path, &selected_frame(session, args.common.view))?;
        tracing::debug!(frame = written, time_ms = outcome.time_ms, "frame written");
        written += 1;
        if outcome.ended {
            break;
        }
        source.advance(step_ms);
    }
    frame_loop.teardown();

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

#[derive(serde::Serialize)]
struct Info<'a> {
    title: &'a str,
    artist: &'a str,
    version: &'a str,
    duration_ms: f64,
    initial_bpm: f64,
    diagnostics: mapview::IndexDiagnostics,
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let meta = read_beatmap(&args.in_path)?;
    let prepared = mapview::PreparedBeatmap::prepare(meta, &mapview::PreviewConfig::default())
        .context("prepare beatmap")?;
    let first = prepared
        .timing()
        .uninherited_points()
        .first()
        .map_or(0.0, |p| p.time);
    let meta = prepared.metadata();
    let info = Info {
        title: &meta.title,
        artist: &meta.artist,
        version: &meta.version,
        duration_ms: prepared.duration_ms(),
        initial_bpm: prepared.timing().bpm_at(first),
        diagnostics: prepared.diagnostics(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&info).context("serialize info")?
    );
    Ok(())
}
