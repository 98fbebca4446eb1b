//! Integration tests for document loading and saving.

use plistquill::config::Config;
use plistquill::document::{Document, Node, Scalar};
use plistquill::file::format::Format;
use plistquill::file::loader::{load_document, load_document_as};
use plistquill::file::saver::save_document;
use std::fs;
use tempfile::TempDir;

const BASE_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Misc</key>
	<dict>
		<key>Boot</key>
		<dict>
			<key>Timeout</key>
			<integer>5</integer>
			<key>HideAuxiliary</key>
			<true/>
		</dict>
	</dict>
	<key>PlatformInfo</key>
	<dict>
		<key>Generic</key>
		<dict>
			<key>ROM</key>
			<data>ESIzRFVm</data>
		</dict>
	</dict>
	<key>Built</key>
	<date>2021-03-04T05:06:07Z</date>
</dict>
</plist>
"#;

fn base(dir: &TempDir) -> Document {
    let path = dir.path().join("config.plist");
    fs::write(&path, BASE_PLIST).unwrap();
    let (document, format) = load_document(&path).unwrap();
    assert_eq!(format, Format::Plist);
    document
}

#[test]
fn test_load_xml_plist() {
    let dir = TempDir::new().unwrap();
    let document = base(&dir);

    let keys: Vec<&String> = document.entries().keys().collect();
    assert_eq!(keys, ["Misc", "PlatformInfo", "Built"]);

    let generic = document.entries()["PlatformInfo"].as_mapping().unwrap()["Generic"].clone();
    assert_eq!(
        generic.as_mapping().unwrap()["ROM"],
        Node::from(vec![0x11u8, 0x22, 0x33, 0x44, 0x55, 0x66])
    );
    assert!(matches!(
        document.entries()["Built"],
        Node::Scalar(Scalar::Date(_))
    ));
}

#[test]
fn test_plist_round_trip_preserves_types() {
    let dir = TempDir::new().unwrap();
    let document = base(&dir);

    let out = dir.path().join("out.plist");
    save_document(&out, &document, Format::Plist, &Config::default()).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("<data>"));
    assert!(written.contains("<date>2021-03-04T05:06:07Z</date>"));

    let (reloaded, _) = load_document(&out).unwrap();
    assert_eq!(reloaded, document);
}

#[test]
fn test_binary_plist_is_read_with_plist_extension() {
    let dir = TempDir::new().unwrap();
    let document = base(&dir);

    let out = dir.path().join("binary.plist");
    save_document(&out, &document, Format::BinaryPlist, &Config::default()).unwrap();
    assert!(fs::read(&out).unwrap().starts_with(b"bplist00"));

    let (reloaded, format) = load_document(&out).unwrap();
    assert_eq!(format, Format::Plist);
    assert_eq!(reloaded, document);
}

#[test]
fn test_gzipped_plist_round_trip() {
    let dir = TempDir::new().unwrap();
    let document = base(&dir);

    let out = dir.path().join("config.plist.gz");
    save_document(&out, &document, Format::Plist, &Config::default()).unwrap();
    assert!(fs::read(&out).unwrap().starts_with(&[0x1f, 0x8b]));

    let (reloaded, format) = load_document(&out).unwrap();
    assert_eq!(format, Format::Plist);
    assert_eq!(reloaded, document);
}

#[test]
fn test_json_output_encodes_blob_and_date_as_strings() {
    let dir = TempDir::new().unwrap();
    let document = base(&dir);

    let out = dir.path().join("config.json");
    save_document(&out, &document, Format::Json, &Config::default()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["PlatformInfo"]["Generic"]["ROM"], "ESIzRFVm");
    assert_eq!(value["Built"], "2021-03-04T05:06:07Z");
    assert_eq!(value["Misc"]["Boot"]["Timeout"], 5);
}

#[test]
fn test_yaml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "Misc:\n  Boot:\n    Timeout: 5\n    Picker: External\nList:\n  - 1\n  - 2.5\n").unwrap();

    let (document, format) = load_document(&path).unwrap();
    assert_eq!(format, Format::Yaml);

    save_document(&path, &document, Format::Yaml, &Config::default()).unwrap();
    let reloaded = load_document_as(&path, Format::Yaml).unwrap();
    assert_eq!(reloaded, document);
}

#[test]
fn test_null_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"a": null}"#).unwrap();

    assert!(load_document(&path).is_err());
}

#[test]
fn test_non_mapping_root_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.plist");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><array><integer>1</integer></array></plist>"#,
    )
    .unwrap();

    let err = load_document(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("root must be a mapping"));
}

#[test]
fn test_unknown_extension_reads_as_plist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.base");
    fs::write(&path, BASE_PLIST).unwrap();

    let (_, format) = load_document(&path).unwrap();
    assert_eq!(format, Format::Plist);
}
