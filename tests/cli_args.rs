//! Command-line parsing and config overrides.

use clap::Parser;
use std::path::PathBuf;

use image_sorter::cli::Args;
use image_sorter::{Config, LogLevel};

#[test]
fn parses_source_and_bindings() {
    let args = Args::try_parse_from([
        "image_sorter",
        "/photos/inbox",
        "--bind",
        "k=/photos/keep",
        "-b",
        "T = /photos/trash",
        "--dry-run",
    ])
    .unwrap();
    assert_eq!(args.source_dir, Some(PathBuf::from("/photos/inbox")));
    assert_eq!(
        args.bindings().unwrap(),
        vec![
            ('k', PathBuf::from("/photos/keep")),
            ('t', PathBuf::from("/photos/trash")),
        ]
    );
    assert!(args.dry_run);
}

#[test]
fn debug_flag_beats_log_level() {
    let args = Args::try_parse_from(["image_sorter", "--log-level", "quiet", "-d"]).unwrap();
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args = Args::try_parse_from(["image_sorter", "--log-level", "info"]).unwrap();
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::try_parse_from(["image_sorter"]).unwrap();
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn overrides_win_over_config() {
    let mut cfg = Config::default();
    cfg.destinations.insert('k', PathBuf::from("/from/config"));
    cfg.log_level = LogLevel::Quiet;

    let args = Args::try_parse_from([
        "image_sorter",
        "--bind",
        "K=/from/cli",
        "--preserve-metadata",
        "--log-level",
        "info",
    ])
    .unwrap();
    args.apply_overrides(&mut cfg).unwrap();

    assert_eq!(cfg.destinations.get(&'k'), Some(&PathBuf::from("/from/cli")));
    assert!(cfg.preserve_metadata);
    assert!(!cfg.dry_run);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.source_dir, None);
}

#[test]
fn malformed_bindings_are_rejected() {
    for bad in ["k", "kk=/x", "1=/x", "k="] {
        let args = Args::try_parse_from(["image_sorter", "--bind", bad]).unwrap();
        assert!(args.bindings().is_err(), "{bad} should be rejected");
    }
}
