//! Integration tests for parsing and running instruction files.

use plistquill::document::{Document, Node};
use plistquill::helpers::FileHelpers;
use plistquill::keypath::{Evaluator, PathError};
use plistquill::script::{Environment, RuntimeError, Script, ScriptError, Variables};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn evaluator(value: serde_json::Value) -> Evaluator {
    let root: Node = serde_json::from_value(value).unwrap();
    Evaluator::new(Document::try_from(root).unwrap())
}

fn node(value: serde_json::Value) -> Node {
    serde_json::from_value(value).unwrap()
}

fn vars(debug: bool) -> Variables {
    Variables {
        debug,
        product: "iMac20,1".to_string(),
        mlb: "C02123456789".to_string(),
        rom: vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66],
        serial_number: "C02ABCDEFG".to_string(),
        uuid: "00000000-0000-0000-0000-000000000000".to_string(),
    }
}

const PLATFORM_SCRIPT: &str = r#"
// SMBIOS
set("PlatformInfo.Generic.SystemProductName", vars.Product)
set("PlatformInfo.Generic.MLB", vars.MLB)
set("PlatformInfo.Generic.ROM", vars.ROM)
set("PlatformInfo.Generic.SystemSerialNumber", vars.SerialNumber)
set("PlatformInfo.Generic.SystemUUID", vars.UUID)

vars.Debug && set("Misc.Debug.Target", 67)
set("NVRAM.Add.boot-args", vars.Debug ? "-v keepsyms=1" : "")
"#;

#[test]
fn test_platform_script() {
    let base = json!({
        "Misc": {"Debug": {"Target": 3}},
        "NVRAM": {"Add": {}},
        "PlatformInfo": {"Generic": {}}
    });
    let helpers = FileHelpers::new();
    let script = Script::parse(PLATFORM_SCRIPT).unwrap();
    assert_eq!(script.len(), 7);

    let mut e = evaluator(base.clone());
    let env = Environment::new(&helpers).with_global("vars", Node::from(&vars(false)));
    script.run(&mut e, &env).unwrap();

    assert_eq!(e.get("Misc.Debug.Target").unwrap(), Node::from(3));
    assert_eq!(e.get("NVRAM.Add.boot-args").unwrap(), Node::from(""));
    assert_eq!(
        e.get("PlatformInfo.Generic.ROM").unwrap(),
        Node::from(vec![0x11u8, 0x22, 0x33, 0x44, 0x55, 0x66])
    );

    let mut e = evaluator(base);
    let env = Environment::new(&helpers).with_global("vars", Node::from(&vars(true)));
    script.run(&mut e, &env).unwrap();

    assert_eq!(e.get("Misc.Debug.Target").unwrap(), Node::from(67));
    assert_eq!(
        e.get("NVRAM.Add.boot-args").unwrap(),
        Node::from("-v keepsyms=1")
    );
}

#[test]
fn test_syntax_error_anywhere_stops_before_running() {
    let source = "set(\"a\", 2)\nset(\"b\", 3\n";
    let err = Script::parse(source).unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(matches!(err, ScriptError::Syntax { .. }));
}

#[test]
fn test_runtime_error_halts_without_rollback() {
    let source = r#"
set("a", 2)
append("a", 3)
set("b", 4)
"#;
    let helpers = FileHelpers::new();
    let env = Environment::new(&helpers);
    let mut e = evaluator(json!({"a": 1, "b": 1}));

    let err = Script::parse(source).unwrap().run(&mut e, &env).unwrap_err();

    match err {
        ScriptError::Runtime {
            line,
            source: RuntimeError::Eval(ref eval),
        } => {
            assert_eq!(line, 3);
            assert_eq!(eval.kind(), &PathError::NotAppendable);
        }
        ref other => panic!("expected runtime error, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "line 3: append \"a\": cannot append to non-sequence entry"
    );
    assert_eq!(e.document().root(), &node(json!({"a": 2, "b": 1})));
}

#[test]
fn test_map_and_array_literals() {
    let source = r#"
append("UEFI.Drivers", {"Path": 'OpenRuntime.efi', Enabled: true, "Arguments": ""})
set("Booter.Quirks", {"Flags": [1, 2.5, false]})
delete("Stale")
"#;
    let helpers = FileHelpers::new();
    let env = Environment::new(&helpers);
    let mut e = evaluator(json!({"UEFI": {"Drivers": []}, "Booter": {}, "Stale": 1}));

    Script::parse(source).unwrap().run(&mut e, &env).unwrap();

    assert_eq!(
        e.document().root(),
        &node(json!({
            "UEFI": {"Drivers": [{"Path": "OpenRuntime.efi", "Enabled": true, "Arguments": ""}]},
            "Booter": {"Quirks": {"Flags": [1, 2.5, false]}}
        }))
    );
}

#[test]
fn test_helpers_against_asset_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("SSDT-PLUG.aml"), b"aml").unwrap();
    fs::write(dir.path().join("OpenShell.efi"), b"efi").unwrap();

    let source = r#"
append("ACPI.Add", helpers.ACPI("SSDT-PLUG.aml"))
append("Misc.Tools", helpers.Tool("OpenShell.efi"))
"#;
    let helpers = FileHelpers::rooted(dir.path());
    let env = Environment::new(&helpers);
    let mut e = evaluator(json!({"ACPI": {"Add": []}, "Misc": {"Tools": []}}));

    Script::parse(source).unwrap().run(&mut e, &env).unwrap();

    assert_eq!(
        e.get("ACPI.Add").unwrap(),
        node(json!([{"Comment": "", "Enabled": true, "Path": "SSDT-PLUG.aml"}]))
    );
    let tools = e.get("Misc.Tools").unwrap();
    let tool = tools.as_sequence().unwrap()[0].as_mapping().unwrap();
    assert_eq!(tool["Name"], Node::from("OpenShell"));
    assert_eq!(tool["FullNvramAccess"], Node::from(false));
}

#[test]
fn test_missing_helper_file_is_runtime_error() {
    let dir = TempDir::new().unwrap();
    let helpers = FileHelpers::rooted(dir.path());
    let env = Environment::new(&helpers);
    let mut e = evaluator(json!({"Kernel": {"Add": []}}));

    let err = Script::parse(r#"append("Kernel.Add", helpers.Kext("Lilu.kext"))"#)
        .unwrap()
        .run(&mut e, &env)
        .unwrap_err();

    assert!(matches!(
        err,
        ScriptError::Runtime {
            line: 1,
            source: RuntimeError::Helper(_)
        }
    ));
    assert_eq!(e.get("Kernel.Add").unwrap(), node(json!([])));
}

#[test]
fn test_echo_disabled_still_runs() {
    let helpers = FileHelpers::new();
    let env = Environment::new(&helpers).with_echo(false);
    let mut e = evaluator(json!({}));
    let count = Script::parse("set(\"a\", 1) // trailing comment")
        .unwrap()
        .run(&mut e, &env)
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(e.get("a").unwrap(), Node::from(1));
}

#[test]
fn test_deeply_nested_line_is_syntax_error() {
    let source = format!(
        "set(\"a\", 1)\nset(\"a\", {}1{})\n",
        "[".repeat(200_000),
        "]".repeat(200_000)
    );
    let err = Script::parse(&source).unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(err.to_string().ends_with("nesting too deep"));
}
