// PasteKeys CLI Harness
// Validates stored snapshots and replays scripted key sequences

mod sim;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use pastekeys_core::{default_snapshot_content, Session, SnapshotFile};

/// Chord-to-snippet engine harness
#[derive(Parser, Debug)]
#[command(name = "pastekeys")]
#[command(about = "Chord-to-snippet engine harness", long_about = None)]
struct Args {
    /// Snapshot TOML file with settings and bindings
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Validate the snapshot and exit
    #[arg(long)]
    check_config: bool,

    /// Print a commented starter snapshot and exit
    #[arg(long)]
    print_default_config: bool,

    /// Simulation script to replay against an in-memory page
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if args.print_default_config {
        print!("{}", default_snapshot_content());
        return Ok(());
    }

    let snapshot = match &args.config {
        Some(path) => SnapshotFile::from_file(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?,
        None => SnapshotFile::load_default().context("loading default snapshot")?,
    };

    if args.check_config {
        report_snapshot(&snapshot);
        return Ok(());
    }

    let Some(script_path) = args.script else {
        bail!("nothing to do: pass --script to replay events, or --check-config to validate");
    };
    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;

    let mut session = Session::new();
    session.apply_update(snapshot.initial_update());
    log::debug!("session configured with {} binding(s)", snapshot.bindings().len());

    let mut simulator = sim::Simulator::new(session);
    simulator.run_script(&script)?;
    println!("script completed");
    Ok(())
}

fn report_snapshot(snapshot: &SnapshotFile) {
    println!("Snapshot is valid");
    let settings = snapshot.settings();
    match &settings.insert_combination_key {
        Some(key) => println!("  insert key: {}", key.display()),
        None => println!("  insert key: disabled"),
    }
    match &settings.paste_combination_key {
        Some(key) => println!("  paste key: {}", key.display()),
        None => println!("  paste key: disabled"),
    }
    println!(
        "  password fields: {}",
        if settings.insert_into_password_field {
            "allowed"
        } else {
            "excluded"
        }
    );
    println!("  {} binding(s):", snapshot.bindings().len());
    for (key, text) in snapshot.bindings().iter() {
        let preview: String = text.chars().take(40).collect();
        println!("    {} -> {:?}", key.display(), preview);
    }
}
