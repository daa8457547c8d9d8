use std::io::Cursor;

use super::*;
use crate::{
    kit::{field::Field, spec::KitSpec},
    processing::resize::Resize,
    storage::config::UploadsConfig,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn registry(root: &std::path::Path) -> KitRegistry {
    let uploads = UploadsConfig::new(root);
    let advert = KitSpec::builder("advert")
        .field(
            "thumbnail",
            Field::with(Resize::new(20, 20).crop(true)).pre_cache(true),
        )
        .unwrap()
        .field("large", Field::with(Resize::fit_width(40)))
        .unwrap()
        .uploads(&uploads)
        .unwrap()
        .build()
        .unwrap();
    KitRegistry::builder().register(advert).unwrap().build()
}

#[test]
fn upload_reports_name_original_and_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let registry = registry(tmp.path());

    let files = [
        ("photo.png", Cursor::new(png_bytes(64, 32))),
        ("photo.png", Cursor::new(png_bytes(32, 64))),
    ];
    let response = upload(&registry, "advert", files).unwrap();

    assert_eq!(response.files.len(), 2);
    let first = &response.files[0];
    assert_eq!(first.name, "photo.png");
    assert_eq!(first.original, "/_uploads/advert/photo.png");
    assert_eq!(
        first.fields["thumbnail"],
        "/_uploads/advert/thumbnail/photo.jpg"
    );
    assert_eq!(first.fields["large"], "/_uploads/advert/large/photo.jpg");
    assert_eq!(response.files[1].name, "photo_1.png");

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["files"][1]["thumbnail"], "/_uploads/advert/thumbnail/photo_1.jpg");
    assert_eq!(json["files"][1]["name"], "photo_1.png");
}

#[test]
fn file_info_lists_field_urls() {
    let tmp = tempfile::tempdir().unwrap();
    let registry = registry(tmp.path());
    upload(&registry, "advert", [("a.png", Cursor::new(png_bytes(50, 50)))]).unwrap();

    let info = file_info(&registry, "advert", "a.png").unwrap();
    assert_eq!(
        info.keys().map(String::as_str).collect::<Vec<_>>(),
        ["large", "thumbnail"]
    );
    assert!(tmp.path().join("advert/large/a.jpg").is_file());
}

#[test]
fn unknown_kit_or_file_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let registry = registry(tmp.path());

    assert!(file_info(&registry, "avatar", "a.png").unwrap_err().is_not_found());
    assert!(file_info(&registry, "advert", "a.png").unwrap_err().is_not_found());
    let none: [(&str, Cursor<Vec<u8>>); 0] = [];
    assert!(upload(&registry, "avatar", none).unwrap_err().is_not_found());
}
