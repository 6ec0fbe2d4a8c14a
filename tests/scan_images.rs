//! Recursive discovery by extension.

use assert_fs::prelude::*;

use image_sorter::scan::{default_extensions, scan_images};
use image_sorter::SorterError;

#[test]
fn finds_images_recursively_in_order() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("b.png").touch().unwrap();
    dir.child("a.jpg").touch().unwrap();
    dir.child("c.txt").touch().unwrap();
    dir.child("nested/deeper/d.gif").touch().unwrap();
    dir.child("upper.PNG").touch().unwrap();

    let found = scan_images(dir.path(), &default_extensions()).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            std::path::PathBuf::from("a.jpg"),
            std::path::PathBuf::from("b.png"),
            std::path::Path::new("nested").join("deeper").join("d.gif"),
        ]
    );
}

#[test]
fn custom_extension_list_is_honored() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("a.webp").touch().unwrap();
    dir.child("b.png").touch().unwrap();

    let found = scan_images(dir.path(), &["webp".to_string()]).unwrap();
    assert_eq!(found, vec![dir.path().join("a.webp")]);
}

#[test]
fn missing_root_is_an_error() {
    let dir = assert_fs::TempDir::new().unwrap();
    let err = scan_images(&dir.path().join("nope"), &default_extensions()).unwrap_err();
    assert!(matches!(err, SorterError::ScanRoot(_)));
}
