//! Integration tests across load, reload, simulation, and classification.

use std::fs;
use std::path::Path;

use mibsim_core::agent::{InstanceTable, NextResult, OidSpace};
use mibsim_core::model::{
    Access, CompileError, CompiledModule, DeclKind, ObjectDecl, Oid, Status,
};
use mibsim_core::overrides::{OverrideValue, Overrides};
use mibsim_core::registry::ResolveDirection;
use mibsim_core::synth::Value;
use mibsim_core::walk::{parse_walk_at, MetricValue};
use mibsim_std::loader::{load_directory, ModuleCompiler};
use mibsim_std::shared::SharedRegistry;

/// Compiler stub producing a small interface-style module per file.
struct FixtureCompiler;

impl ModuleCompiler for FixtureCompiler {
    fn compile(&mut self, name: &str, source: &str) -> Result<CompiledModule, CompileError> {
        if source.contains("BREAK") {
            return Err(CompileError::Other("parse failed".into()));
        }
        let mut compiled = CompiledModule::default();
        compiled.objects.push(ObjectDecl::new(
            name,
            "ifDescr",
            Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2]),
            DeclKind::TableColumn,
            "DisplayString",
            Access::ReadOnly,
            Status::Current,
        ));
        compiled.objects.push(ObjectDecl::new(
            name,
            "ifInOctets",
            Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10]),
            DeclKind::TableColumn,
            "Counter32",
            Access::ReadOnly,
            Status::Current,
        ));
        Ok(compiled)
    }
}

fn load(dir: &Path) -> mibsim_core::registry::Registry {
    load_directory(dir, &mut FixtureCompiler)
}

#[test]
fn test_reload_swaps_without_disturbing_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("FIRST-MIB.mib"), "FIRST-MIB DEFINITIONS").unwrap();

    let shared = SharedRegistry::from_registry(load(dir.path()));
    let before = shared.snapshot();
    assert_eq!(before.status().loaded, 1);

    fs::write(dir.path().join("SECOND-MIB.mib"), "SECOND-MIB DEFINITIONS").unwrap();
    shared.swap(load(dir.path()));

    // The pre-reload snapshot is untouched; new snapshots see both modules.
    assert_eq!(before.status().loaded, 1);
    assert!(!before.is_loaded("SECOND-MIB"));

    let after = shared.snapshot();
    assert_eq!(after.status().loaded, 2);
    assert!(after.is_loaded("FIRST-MIB"));
    assert!(after.is_loaded("SECOND-MIB"));
}

#[test]
fn test_resolution_against_loaded_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("IF-MIB.mib"), "IF-MIB DEFINITIONS").unwrap();

    let registry = load(dir.path());
    let res = registry.resolve("IF-MIB::ifInOctets.7", ResolveDirection::ToNumeric);
    assert!(res.is_resolved());
    assert_eq!(res.output, "1.3.6.1.2.1.2.2.1.10.7");

    let back = registry.resolve(&res.output, ResolveDirection::ToName);
    assert_eq!(back.output, "IF-MIB::ifInOctets.7");
}

/// Render one instance the way a walk client would print it.
fn render(registry: &mibsim_core::registry::Registry, oid: &Oid, value: &Value) -> String {
    let name = registry
        .resolve(&oid.dotted(), ResolveDirection::ToName)
        .output;
    let tagged = match value {
        Value::Integer(v) => format!("INTEGER: {v}"),
        Value::Counter32(v) => format!("Counter32: {v}"),
        Value::Counter64(v) => format!("Counter64: {v}"),
        Value::Gauge(v) => format!("Gauge32: {v}"),
        Value::Unsigned(v) => format!("Unsigned32: {v}"),
        Value::TimeTicks(v) => format!("Timeticks: ({v}) 0:00:00.00"),
        Value::OctetString(v) => format!("STRING: \"{v}\""),
        other => format!("STRING: \"{other}\""),
    };
    format!("{name} = {tagged}")
}

#[test]
fn test_walk_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("IF-MIB.mib"), "IF-MIB DEFINITIONS").unwrap();
    let registry = load(dir.path());

    let mut overrides = Overrides::new();
    overrides.insert("IF-MIB::ifDescr.1", OverrideValue::Text("eth0".into()));
    overrides.insert("IF-MIB::ifInOctets.1", OverrideValue::Integer(12345));

    let mut rng = rand::thread_rng();
    let table = InstanceTable::build(registry.symbols(), &overrides, &mut rng);

    // Walk the whole space through the protocol boundary.
    let mut lines = Vec::new();
    let mut cursor = Oid::from_slice(&[0]);
    loop {
        match table.get_next(&cursor) {
            NextResult::Next(oid, value) => {
                lines.push(render(&registry, oid, value));
                cursor = oid.clone();
            }
            NextResult::EndOfView => break,
        }
    }
    // Two columns, two rows each.
    assert_eq!(lines.len(), 4);

    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let records = parse_walk_at(line_refs, "127.0.0.1", "IF-MIB::ifTable", 1_700_000_000);

    let row1 = records
        .iter()
        .find(|r| r.labels["snmp_index"] == "1")
        .unwrap();
    assert_eq!(row1.metric_name, "ifInOctets");
    assert_eq!(row1.value, MetricValue::Integer(12345));
    assert_eq!(row1.labels["ifDescr"], "eth0");
    assert_eq!(row1.mib_module, "IF-MIB");
    assert_eq!(row1.metric_category, "ifTable");
}
