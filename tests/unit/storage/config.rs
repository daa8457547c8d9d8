use std::path::Path;

use super::*;
use crate::storage::backend::StorageBackend;

#[test]
fn defaults_derive_dest_and_url_from_collection() {
    let cfg = UploadsConfig::new("/srv/uploads");
    let s = cfg.storage_for("advert").unwrap();
    assert_eq!(s.dest(), Path::new("/srv/uploads/advert"));
    assert_eq!(s.url("a.png"), "/_uploads/advert/a.png");
    assert!(s.extension_allowed("a.png"));
    assert!(!s.extension_allowed("a.exe"));
}

#[test]
fn collection_overrides_win() {
    let mut cfg = UploadsConfig::new("/srv/uploads");
    cfg.collections.insert(
        "avatar".to_string(),
        CollectionConfig {
            dest: Some(PathBuf::from("/var/avatars")),
            url: Some("https://cdn.example.com/avatars".to_string()),
            allowed_extensions: Some(vec![]),
        },
    );
    let s = cfg.storage_for("avatar").unwrap();
    assert_eq!(s.dest(), Path::new("/var/avatars"));
    assert_eq!(
        s.url("thumbnail/a.jpg"),
        "https://cdn.example.com/avatars/thumbnail/a.jpg"
    );
    assert!(s.extension_allowed("anything.exe"));
}

#[test]
fn missing_destination_is_config_error() {
    let cfg = UploadsConfig::default();
    assert!(matches!(
        cfg.storage_for("advert"),
        Err(FilekitError::Config(_))
    ));
}

#[test]
fn deserializes_with_defaults() {
    let cfg: UploadsConfig =
        serde_json::from_str(r#"{"default_dest":"/tmp/x","default_url":"/media/"}"#).unwrap();
    assert_eq!(cfg.allowed_extensions, default_extensions());
    assert_eq!(
        cfg.storage_for("k").unwrap().url("f.png"),
        "/media/k/f.png"
    );
}
