//! IMAGE_SORTER_CONFIG selects the config file.

use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use image_sorter::config::{LoadResult, load_or_init};
use image_sorter::{CONFIG_ENV, LogLevel, default_config_path};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        // SAFETY: every test touching the variable is #[serial].
        unsafe { std::env::set_var(CONFIG_ENV, value) };
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe { std::env::remove_var(CONFIG_ENV) };
    }
}

#[test]
#[serial]
fn env_path_is_loaded() {
    let td = tempdir().unwrap();
    let p = td.path().join("custom.xml");
    fs::write(&p, "<config><log_level>debug</log_level></config>").unwrap();
    let _g = EnvGuard::set(&p);

    assert_eq!(default_config_path().unwrap(), p);
    match load_or_init().unwrap() {
        LoadResult::Loaded(cfg, path) => {
            assert_eq!(path, p);
            assert_eq!(cfg.log_level, LogLevel::Debug);
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[test]
#[serial]
fn missing_env_path_is_an_error_and_writes_nothing() {
    let td = tempdir().unwrap();
    let p = td.path().join("absent.xml");
    let _g = EnvGuard::set(&p);

    assert!(load_or_init().is_err());
    assert!(!p.exists());
}

#[test]
#[serial]
fn template_round_trips_to_defaults() {
    let td = tempdir().unwrap();
    // Resolve platform tempdir symlinks (macOS /var) so the template is not refused.
    let base = td.path().canonicalize().unwrap();
    let p = base.join("nested").join("config.xml");
    image_sorter::config::create_template_config(&p).unwrap();
    let _g = EnvGuard::set(&p);

    match load_or_init().unwrap() {
        LoadResult::Loaded(cfg, _) => assert_eq!(cfg, image_sorter::Config::default()),
        other => panic!("expected Loaded, got {other:?}"),
    }
}
