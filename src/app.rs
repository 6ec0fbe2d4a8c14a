//! Application orchestrator.
//! Loads and merges config, initializes logging, installs the interrupt handler,
//! picks the directory to review, and hands the session to the console loop.

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use image_sorter::cli::Args;
use image_sorter::config::{LoadResult, load_or_init};
use image_sorter::console::{Console, RunOutcome};
use image_sorter::output as out;
use image_sorter::session::Session;
use image_sorter::{CONFIG_ENV, Config, default_config_path, shutdown};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!(
            "To override, unset {CONFIG_ENV} or set it to another file."
        ));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default image_sorter config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there yet. Run without --print-config to create a template.",
                );
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

fn load_config() -> Result<Config> {
    match load_or_init()? {
        LoadResult::Loaded(cfg, path) => {
            debug!(path = %path.display(), "Loaded config");
            Ok(cfg)
        }
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template image_sorter config was written to: {}",
                path.display()
            ));
            out::print_info(
                "Edit it to pre-bind folders, e.g. <destinations><bind key=\"k\">/photos/keep</bind></destinations>. Continuing with defaults.",
            );
            Ok(Config::default())
        }
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg)?;

    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // The guard is dropped on interrupt so buffered file logs are flushed.
    let guard_slot = Arc::new(Mutex::new(guard));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            if shutdown::is_requested() {
                std::process::exit(130);
            }
            shutdown::request();
            out::print_warn(
                "Interrupt received; press Enter to leave without committing (Ctrl-C again exits now).",
            );
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("failed to install interrupt handler")?;
    }

    debug!("Starting image_sorter: {:?}", args);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    let result = review(&cfg, &mut console);

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn review<R: io::BufRead, W: io::Write>(cfg: &Config, console: &mut Console<R, W>) -> Result<()> {
    let source: PathBuf = match &cfg.source_dir {
        Some(dir) => dir.clone(),
        None => match console.prompt_folder("Please select a directory of images to review")? {
            Some(dir) => dir,
            None => {
                out::print_info("No directory selected; nothing to do.");
                return Ok(());
            }
        },
    };

    cfg.validate(&source)?;
    let mut session = Session::open(&source, cfg).map_err(|e| {
        error!(code = e.code(), kind = e.kind(), error = %e, "Failed to open session");
        e
    })?;

    if !session.destinations().is_empty() {
        out::print_bindings(session.destinations().iter());
    }
    if cfg.dry_run {
        out::print_info("Dry-run: commits will only report what they would do.");
    }

    match console.run(&mut session)? {
        RunOutcome::Finished => {
            info!(root = %source.display(), "Review finished");
            out::print_success("All images reviewed.");
        }
        RunOutcome::Quit | RunOutcome::EndOfInput => {
            out::print_info("Left without committing pending changes.")
        }
        RunOutcome::Interrupted => out::print_warn("Interrupted; pending changes were not committed."),
    }
    Ok(())
}
