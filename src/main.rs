use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::thread_rng;

use centipede::config::Args;
use centipede::display::{spawn_event_reader, TerminalGateway, TerminalSession};
use centipede::gateway::run;

// ── Logging ───────────────────────────────────────────────────────────────────

/// `RUST_LOG` picks the filter (default `warn`).  While the game owns the
/// screen, stderr output would land on top of the frame, so a log file can
/// take its place.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = args.sim_config()?;
    info!("starting with {:?}", config);

    let session = TerminalSession::enter().context("failed to prepare the terminal")?;
    let mut gateway = TerminalGateway::new(BufWriter::new(stdout()), spawn_event_reader());
    let mut rng = thread_rng();

    let result = run(&mut gateway, &config, &mut rng);

    // Always restore the terminal before reporting anything
    drop(gateway);
    drop(session);

    let state = result.context("game loop failed")?;
    info!(
        "finished on frame {} with {} segment(s) remaining",
        state.frame,
        state.blocks.len()
    );
    Ok(())
}
