use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "raven-morph", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the feather field of one cycle.
    Field(FieldArgs),
    /// Play the transition headlessly and write one JSON frame per line.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct FieldArgs {
    /// Cycle number.
    #[arg(long, default_value_t = 0)]
    cycle: u64,

    /// Emit JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Transition config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second on the virtual clock.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Last frame timestamp in milliseconds.
    #[arg(long, default_value_t = 8_000)]
    duration_ms: u64,

    /// Press replay at this timestamp (repeatable).
    #[arg(long = "replay-at")]
    replay_at: Vec<u64>,

    /// Output path for frames; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Field(args) => cmd_field(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env("RAVEN_MORPH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_field(args: FieldArgs) -> anyhow::Result<()> {
    let field = raven_morph::generate(args.cycle);
    let fingerprint = format!("{:016x}", field.fingerprint());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let doc = serde_json::json!({
            "cycle": field.cycle(),
            "fingerprint": fingerprint,
            "particles": field.particles(),
        });
        serde_json::to_writer_pretty(&mut out, &doc).context("write field json")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "cycle {} fingerprint {fingerprint}", field.cycle())?;
    writeln!(out, "id  angle  offset      dist  dur   delay  color")?;
    for p in field.particles() {
        writeln!(
            out,
            "{:>2}  {:>5}  ({:>3},{:>3})  {:>4}  {:.2}  {:.2}   {:>3}",
            p.id,
            p.angle,
            p.initial_offset.x,
            p.initial_offset.y,
            p.travel_distance,
            p.duration,
            p.delay,
            p.color_shift
        )?;
    }
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => raven_morph::TransitionConfig::from_path(path)?,
        None => raven_morph::TransitionConfig::default(),
    };
    let opts = raven_morph::PlayOpts {
        fps: args.fps,
        duration_ms: args.duration_ms,
        replay_at: args
            .replay_at
            .iter()
            .copied()
            .map(raven_morph::TimeMs)
            .collect(),
    };

    let stats = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let file = std::fs::File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            let mut surface = raven_morph::JsonLinesSurface::new(std::io::BufWriter::new(file));
            raven_morph::play(cfg, &opts, &mut surface)?
        }
        None => {
            let stdout = std::io::stdout();
            let mut surface = raven_morph::JsonLinesSurface::new(stdout.lock());
            raven_morph::play(cfg, &opts, &mut surface)?
        }
    };

    eprintln!(
        "played {} frames, cycle {} ({:?}); replays started {} dropped {} absorbed {}",
        stats.frames,
        stats.final_state.cycle,
        stats.final_state.stage,
        stats.replays_started,
        stats.replays_dropped,
        stats.replays_absorbed
    );
    if let Some(path) = &args.out {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
