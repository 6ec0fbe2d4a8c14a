//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a secure template if the default file is missing (not for an explicit
//!   IMAGE_SORTER_CONFIG, which must exist).
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown top-level fields are rejected to surface typos early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::platform::{restrict_dir, write_private_file_new};
use crate::resolve::DEFAULT_RESOLVE_LIMIT;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    dry_run: Option<bool>,
    preserve_metadata: Option<bool>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    resolve_limit: Option<usize>,
    extensions: Option<XmlExtensions>,
    destinations: Option<XmlDestinations>,
}

#[derive(Debug, Deserialize)]
struct XmlExtensions {
    #[serde(rename = "ext", default)]
    ext: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct XmlDestinations {
    #[serde(rename = "bind", default)]
    bind: Vec<XmlBind>,
}

/// `<bind key="k">/photos/keep</bind>`
#[derive(Debug, Deserialize)]
struct XmlBind {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "$text")]
    folder: String,
}

// Custom deserializer that trims surrounding whitespace for optional usize
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<usize>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config {
        source_dir: non_empty_path(parsed.source_dir.as_deref()),
        log_file: non_empty_path(parsed.log_file.as_deref()),
        dry_run: parsed.dry_run.unwrap_or(false),
        preserve_metadata: parsed.preserve_metadata.unwrap_or(false),
        resolve_limit: parsed.resolve_limit.unwrap_or(DEFAULT_RESOLVE_LIMIT),
        ..Config::default()
    };

    if let Some(s) = parsed.log_level.as_deref() {
        cfg.log_level = s
            .trim()
            .parse::<LogLevel>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(exts) = parsed.extensions {
        let list: Vec<String> = exts
            .ext
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if !list.is_empty() {
            cfg.extensions = list;
        }
    }

    if let Some(dests) = parsed.destinations {
        let mut map = BTreeMap::new();
        for b in dests.bind {
            let key = parse_binding_key(&b.key)?;
            let folder = non_empty_path(Some(&b.folder))
                .with_context(|| format!("destination for key '{key}' is empty"))?;
            map.insert(key, folder);
        }
        cfg.destinations = map;
    }

    Ok(cfg)
}

/// A binding key is exactly one ASCII letter; stored lowercase.
pub fn parse_binding_key(raw: &str) -> Result<char> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_lowercase()),
        _ => bail!("destination key must be a single letter, got '{raw}'"),
    }
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid config xml '{}'", path.display()))
}

/// Outcome of looking for the config file at startup.
#[derive(Debug)]
pub enum LoadResult {
    /// A config file was found and parsed.
    Loaded(Config, PathBuf),
    /// No config existed at the default location; a template was written there.
    CreatedTemplate(PathBuf),
}

/// Load the config file, writing a template when the default location is empty.
/// An explicit IMAGE_SORTER_CONFIG that does not exist is an error.
pub fn load_or_init() -> Result<LoadResult> {
    let path = default_config_path()?;
    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }
    if env::var_os(CONFIG_ENV).is_some() {
        bail!("{CONFIG_ENV} points to a missing file: {}", path.display());
    }
    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(path))
}

/// Create default template config file and parent directory (best-effort permissions).
/// Uses secure creation to avoid following attacker-controlled symlinks on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = restrict_dir(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/image_sorter.log".into());

    let content = format!(
        "<!--\n  image_sorter configuration (XML)\n\n  Fields:\n    source_dir         -> directory to review (optional; prompted for when absent)\n    log_level          -> quiet | normal | info | debug\n    log_file           -> path to a log file (optional), e.g. {suggested_log}\n    dry_run            -> true/false; report actions without touching files\n    preserve_metadata  -> true/false; copies keep timestamps and permissions\n    resolve_limit      -> max \"(n)\" candidates tried for a name collision\n    extensions         -> <ext>png</ext> entries; matched case-sensitively\n    destinations       -> <bind key=\"k\">/folder</bind>; lowercase moves, uppercase copies\n\n  CLI flags override XML values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <dry_run>false</dry_run>\n  <preserve_metadata>false</preserve_metadata>\n  <resolve_limit>{DEFAULT_RESOLVE_LIMIT}</resolve_limit>\n  <extensions>\n    <ext>png</ext>\n    <ext>jpg</ext>\n    <ext>jpeg</ext>\n    <ext>gif</ext>\n    <ext>bmp</ext>\n  </extensions>\n  <destinations>\n  </destinations>\n</config>\n"
    );

    write_private_file_new(path, content.as_bytes())
        .with_context(|| format!("write template config '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}
