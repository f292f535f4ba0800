use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "layout360", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every flow of a configuration file.
    Run(RunArgs),
    /// Remap a single picture between two layout sections of a configuration file.
    Remap(RemapArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Configuration JSON.
    #[arg(short, long)]
    config: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct RemapArgs {
    /// Configuration JSON holding the layout sections.
    #[arg(short, long)]
    config: PathBuf,

    /// Layout section of the input picture.
    #[arg(long)]
    from: String,

    /// Layout section of the output picture.
    #[arg(long)]
    to: String,

    /// Input picture.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output picture.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Remap(args) => cmd_remap(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut doc = layout360::ConfigDocument::load(&args.config)?;
    if args.threads.is_some() {
        doc.global.threads = args.threads;
    }
    let mut session = layout360::FlowSession::from_config(&doc)?;
    let stats = session.run()?;
    if stats.stopped_early {
        tracing::warn!(
            processed = stats.frames_processed,
            "an input ended before the requested frame count"
        );
    }
    eprintln!(
        "processed {} of {} frames read",
        stats.frames_processed, stats.frames_read
    );
    Ok(())
}

fn cmd_remap(args: RemapArgs) -> anyhow::Result<()> {
    let doc = layout360::ConfigDocument::load(&args.config)?;
    let picture = layout360::Picture::open(&args.in_path)?;
    let out = layout360::remap_picture(&doc, &args.from, &args.to, &picture)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    out.save(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
