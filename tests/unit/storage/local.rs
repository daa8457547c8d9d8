use std::io::Cursor;

use super::*;

fn storage(dir: &Path) -> LocalStorage {
    LocalStorage::new("advert", dir.join("advert"), "/_uploads/advert/")
}

#[test]
fn save_renames_on_conflict() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path());
    s.init().unwrap();

    let a = s
        .save(&mut Cursor::new(b"one"), None, "image.png", Conflict::Rename)
        .unwrap();
    let b = s
        .save(&mut Cursor::new(b"two"), None, "image.png", Conflict::Rename)
        .unwrap();
    let c = s
        .save(&mut Cursor::new(b"three"), None, "image.png", Conflict::Rename)
        .unwrap();
    assert_eq!(a, "image.png");
    assert_eq!(b, "image_1.png");
    assert_eq!(c, "image_2.png");
    assert_eq!(s.read("image.png").unwrap(), b"one");
    assert_eq!(s.read("image_1.png").unwrap(), b"two");
}

#[test]
fn save_replace_overwrites_in_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path());

    let first = s
        .save(&mut Cursor::new(b"v1"), Some("thumbnail"), "a.jpg", Conflict::Replace)
        .unwrap();
    let second = s
        .save(&mut Cursor::new(b"v2"), Some("thumbnail"), "a.jpg", Conflict::Replace)
        .unwrap();
    assert_eq!(first, "a.jpg");
    assert_eq!(second, "a.jpg");
    assert_eq!(s.read("thumbnail/a.jpg").unwrap(), b"v2");

    let leftovers: Vec<_> = std::fs::read_dir(s.dest().join("thumbnail"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(leftovers.len(), 1, "temp files must not linger");
}

#[test]
fn save_sanitizes_names() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path());
    let stored = s
        .save(
            &mut Cursor::new(b"x"),
            None,
            "../../my holiday.png",
            Conflict::Rename,
        )
        .unwrap();
    assert_eq!(stored, "my_holiday.png");
    assert!(s.exists(&s.path("my_holiday.png")));
}

#[test]
fn allow_list_is_enforced() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path()).with_allowed_extensions(["png", ".JPG"]);
    assert!(s.extension_allowed("a.PNG"));
    assert!(s.extension_allowed("a.jpg"));
    assert!(!s.extension_allowed("a.exe"));
    assert!(!s.extension_allowed("README"));

    let err = s
        .save(&mut Cursor::new(b"x"), None, "run.exe", Conflict::Rename)
        .unwrap_err();
    assert!(matches!(err, FilekitError::NotAllowed(_)));

    let open = storage(tmp.path()).with_allowed_extensions(Vec::<String>::new());
    assert!(open.extension_allowed("README"));
}

#[test]
fn path_and_url_are_pure() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path());
    let p = s.path("thumbnail/a.jpg");
    assert_eq!(p, tmp.path().join("advert").join("thumbnail/a.jpg"));
    assert!(!s.exists(&p));
    assert_eq!(s.url("thumbnail/a.jpg"), "/_uploads/advert/thumbnail/a.jpg");
    assert_eq!(s.url("a.png"), "/_uploads/advert/a.png");
}

#[test]
fn open_missing_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path());
    assert!(s.open("nope.png").err().unwrap().is_not_found());
    assert!(s.open("../escape.png").err().unwrap().is_not_found());
}

#[test]
fn folder_must_be_single_segment() {
    let tmp = tempfile::tempdir().unwrap();
    let s = storage(tmp.path());
    let err = s
        .save(&mut Cursor::new(b"x"), Some("../up"), "a.png", Conflict::Replace)
        .unwrap_err();
    assert!(matches!(err, FilekitError::Config(_)));
}

#[test]
fn suffixed_keeps_extension() {
    assert_eq!(suffixed("a.png", 3), "a_3.png");
    assert_eq!(suffixed("README", 1), "README_1");
}
