use super::*;
use crate::processing::encode::OutputFormat;

const MANIFEST: &str = r#"
{
  "uploads": { "default_dest": "/srv/uploads", "default_url": "/files" },
  "kits": [
    {
      "name": "advert",
      "fields": [
        {
          "label": "thumbnail",
          "pre_cache": true,
          "processors": [{ "kind": "resize", "width": 100, "height": 75, "crop": true }]
        },
        {
          "label": "lossless",
          "ext": ".png",
          "processors": [{ "kind": "convert", "format": "png" }]
        }
      ]
    }
  ]
}
"#;

#[test]
fn parses_kits_fields_and_processors() {
    let m = KitManifest::from_json_str(MANIFEST).unwrap();
    assert_eq!(m.uploads.default_url, "/files");
    assert_eq!(m.kits.len(), 1);

    let kit = &m.kits[0];
    assert_eq!(kit.name, "advert");
    assert_eq!(kit.fields[0].label, "thumbnail");
    assert!(kit.fields[0].pre_cache);
    assert_eq!(
        kit.fields[0].processors,
        [ProcessorSpec::Resize {
            width: Some(100),
            height: Some(75),
            crop: true,
            upscale: false,
            quality: 80,
        }]
    );
    assert_eq!(
        kit.fields[1].processors,
        [ProcessorSpec::Convert {
            format: OutputFormat::Png,
            quality: 80,
        }]
    );
}

#[test]
fn builds_kit_on_configured_collection() {
    let m = KitManifest::from_json_str(MANIFEST).unwrap();
    let kit = m.kits[0].build(&m.uploads).unwrap();

    assert_eq!(kit.name(), "advert");
    assert_eq!(kit.storage().url("a.jpg"), "/files/advert/a.jpg");
    assert_eq!(
        kit.field("thumbnail").unwrap().effective_extension(),
        Some("jpg")
    );
    assert_eq!(
        kit.field("lossless").unwrap().explicit_extension(),
        Some("png")
    );
    assert!(!kit.field("lossless").unwrap().is_pre_cache());
}

#[test]
fn unknown_keys_are_rejected() {
    let err = KitManifest::from_json_str(r#"{ "kits": [], "extra": 1 }"#).unwrap_err();
    assert!(matches!(err, FilekitError::Config(_)));

    let err = KitManifest::from_json_str(
        r#"{ "kits": [{ "name": "a", "fields": [
            { "label": "t", "processors": [{ "kind": "blur" }] }
        ] }] }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("parse kit manifest JSON"));
}

#[test]
fn invalid_processor_is_a_config_error() {
    let decl = FieldDecl {
        label: "t".into(),
        processors: vec![ProcessorSpec::Resize {
            width: None,
            height: None,
            crop: false,
            upscale: false,
            quality: 80,
        }],
        ext: None,
        pre_cache: false,
    };
    let err = decl.build().unwrap_err();
    assert!(matches!(err, FilekitError::Config(_)));
    assert!(err.to_string().contains("field 't'"));
}

#[test]
fn missing_destination_fails_build() {
    let m = KitManifest::from_json_str(
        r#"{ "kits": [{ "name": "a", "fields": [] }] }"#,
    )
    .unwrap();
    assert!(matches!(
        m.kits[0].build(&m.uploads),
        Err(FilekitError::Config(_))
    ));
}

#[test]
fn from_path_reports_missing_file() {
    let err = KitManifest::from_path("/nonexistent/manifest.json").unwrap_err();
    assert!(err.to_string().contains("open kit manifest"));
}
