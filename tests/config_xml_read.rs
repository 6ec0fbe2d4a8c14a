//! Verify XML config is parsed and used without touching user state.

use std::fs;
use tempfile::tempdir;

use image_sorter::config::load_config_from_xml_path;
use image_sorter::LogLevel;

#[test]
fn reads_config_xml_and_applies_values() {
    let td = tempdir().expect("create tempdir");
    let cfg_path = td.path().join("config.xml");
    let source = td.path().join("photos");
    let keep = td.path().join("keep");
    let log_file = td.path().join("sorter.log");

    let xml = format!(
        r#"
<config>
  <source_dir>{}</source_dir>
  <log_level>info</log_level>
  <log_file>{}</log_file>
  <dry_run>true</dry_run>
  <preserve_metadata>true</preserve_metadata>
  <resolve_limit> 25 </resolve_limit>
  <extensions>
    <ext>.png</ext>
    <ext>webp</ext>
  </extensions>
  <destinations>
    <bind key="K">{}</bind>
  </destinations>
</config>
"#,
        source.display(),
        log_file.display(),
        keep.display()
    );
    fs::write(&cfg_path, xml).expect("write config.xml");

    let cfg = load_config_from_xml_path(&cfg_path).expect("load_config_from_xml_path");
    assert_eq!(cfg.source_dir.as_deref(), Some(source.as_path()));
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file.as_deref(), Some(log_file.as_path()));
    assert!(cfg.dry_run);
    assert!(cfg.preserve_metadata);
    assert_eq!(cfg.resolve_limit, 25);
    assert_eq!(cfg.extensions, vec!["png", "webp"]);
    assert_eq!(cfg.destinations.get(&'k'), Some(&keep));
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><log_file>  </log_file></config>").unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg, image_sorter::Config::default());
}

#[test]
fn rejects_bad_binding_key() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><destinations><bind key=\"12\">/tmp</bind></destinations></config>",
    )
    .unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}

#[test]
fn rejects_unknown_fields() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><download_base>/x</download_base></config>").unwrap();
    let err = load_config_from_xml_path(&cfg_path).unwrap_err();
    assert!(format!("{err:#}").contains("config.xml"), "got: {err:#}");
}
