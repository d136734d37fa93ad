//! The symbol registry: module lifecycle tracking and name↔OID resolution.
//!
//! A [`Registry`] is populated once by a loader (see `mibsim-std`) and is
//! immutable thereafter; reload means building a fresh registry off to the
//! side and swapping it in wholesale. Per-module load failures are recorded
//! here as data, never raised: one broken definition file must not take
//! down the batch.

pub mod imports;
pub mod standard;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::model::{CompileError, CompiledModule, Oid, SymbolTable};

/// Well-known registration-authority arcs, used by the resolve fallback.
const WELL_KNOWN_ROOTS: &[(&[u32], &str)] = &[
    (&[1], "iso"),
    (&[1, 3], "org"),
    (&[1, 3, 6], "dod"),
    (&[1, 3, 6, 1], "internet"),
    (&[1, 3, 6, 1, 2], "mgmt"),
    (&[1, 3, 6, 1, 2, 1], "mib-2"),
    (&[1, 3, 6, 1, 4], "private"),
    (&[1, 3, 6, 1, 4, 1], "enterprises"),
];

/// Load status of one module. At rest a module is either loaded or failed;
/// missing-dependency is a sub-state of failed, not a third state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Compiled successfully; symbols are in the table.
    Loaded,
    /// Failed because an imported module could not be found.
    MissingDeps,
    /// Failed for any other reason.
    Error,
}

impl ModuleStatus {
    /// Snapshot wording.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::MissingDeps => "missing_deps",
            Self::Error => "error",
        }
    }

    /// Whether this is either failure sub-state.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        !matches!(self, Self::Loaded)
    }
}

/// Per-module record kept by the registry.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct ModuleRecord {
    /// Module name (file stem).
    pub name: String,
    /// Source file name.
    pub file: String,
    /// Load outcome.
    pub status: ModuleStatus,
    /// Imports extracted from the raw text.
    pub imports: Vec<String>,
    /// Count of scalar and table-column declarations.
    pub objects: usize,
    /// Count of notification declarations.
    pub traps: usize,
    /// Failure message, when failed.
    pub error: Option<String>,
}

/// Counts-and-detail snapshot for UI consumption.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct RegistryStatus {
    /// Number of loaded modules.
    pub loaded: usize,
    /// Number of failed modules.
    pub failed: usize,
    /// Total discovered modules.
    pub total: usize,
    /// Detail for each loaded module.
    pub modules: Vec<ModuleRecord>,
    /// Detail for each failed module.
    pub errors: Vec<ModuleRecord>,
}

/// Which way [`Registry::resolve`] should translate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveDirection {
    /// `Module::Name[.index…]` → dotted numeric.
    ToNumeric,
    /// Dotted numeric → `Module::Name[.suffix]`.
    ToName,
}

/// Outcome of a resolution attempt. `output` echoes the input unchanged on
/// failure; `error` carries the reason. Nothing is ever raised past this
/// boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub struct Resolution {
    /// Resolved identifier, or the input verbatim.
    pub output: String,
    /// Why resolution failed, if it did.
    pub error: Option<String>,
}

impl Resolution {
    fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    fn failed(input: &str, reason: impl Into<String>) -> Self {
        Self {
            output: input.to_string(),
            error: Some(reason.into()),
        }
    }

    /// Whether the attempt succeeded (a no-op on an identifier already in
    /// the target form counts as success).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.error.is_none()
    }
}

/// One object declaration flattened for enumeration views.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct ObjectSummary {
    /// Owning module.
    pub module: String,
    /// Local name.
    pub name: String,
    /// `Module::Name`.
    pub full_name: String,
    /// Dotted numeric OID.
    pub oid: String,
    /// `scalar` or `table-column`.
    pub kind: String,
    /// Declared syntax type name.
    pub syntax: String,
}

/// One notification flattened for enumeration views.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct NotificationSummary {
    /// Owning module.
    pub module: String,
    /// Local name.
    pub name: String,
    /// `Module::Name`.
    pub full_name: String,
    /// Dotted numeric OID.
    pub oid: String,
    /// Description, or a placeholder.
    pub description: String,
    /// Resolved payload objects. References that no longer resolve are
    /// skipped rather than reported half-filled.
    pub objects: Vec<PayloadObject>,
}

/// A resolved notification payload member.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct PayloadObject {
    /// Local name.
    pub name: String,
    /// `Module::Name`.
    pub full_name: String,
    /// Dotted numeric OID.
    pub oid: String,
}

/// The symbol registry.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    symbols: SymbolTable,
    loaded: BTreeMap<String, ModuleRecord>,
    failed: BTreeMap<String, ModuleRecord>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled symbol table.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Whether a module loaded successfully.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Record a successful module load.
    pub fn record_loaded(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
        module_imports: Vec<String>,
        compiled: CompiledModule,
    ) {
        let name = name.into();
        let record = ModuleRecord {
            name: name.clone(),
            file: file.into(),
            status: ModuleStatus::Loaded,
            imports: module_imports,
            objects: compiled.objects.len(),
            traps: compiled.notifications.len(),
            error: None,
        };
        self.symbols.insert_module(name.clone(), compiled);
        self.loaded.insert(name, record);
    }

    /// Record an isolated per-module load failure.
    pub fn record_failed(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
        module_imports: Vec<String>,
        error: &CompileError,
    ) {
        let name = name.into();
        let status = if error.is_missing_dependency() {
            ModuleStatus::MissingDeps
        } else {
            ModuleStatus::Error
        };
        warn!(module = %name, %error, "failed to load module");
        let record = ModuleRecord {
            name: name.clone(),
            file: file.into(),
            status,
            imports: module_imports,
            objects: 0,
            traps: 0,
            error: Some(error.to_string()),
        };
        self.failed.insert(name, record);
    }

    /// Counts and per-module detail.
    #[must_use]
    pub fn status(&self) -> RegistryStatus {
        RegistryStatus {
            loaded: self.loaded.len(),
            failed: self.failed.len(),
            total: self.loaded.len() + self.failed.len(),
            modules: self.loaded.values().cloned().collect(),
            errors: self.failed.values().cloned().collect(),
        }
    }

    /// Enumerate object declarations, optionally for one module.
    #[must_use]
    pub fn list_objects(&self, module_filter: Option<&str>) -> Vec<ObjectSummary> {
        self.symbols
            .objects()
            .filter(|obj| module_filter.map_or(true, |m| obj.module == m))
            .map(|obj| ObjectSummary {
                module: obj.module.clone(),
                name: obj.name.clone(),
                full_name: obj.qualified_name(),
                oid: obj.oid.dotted(),
                kind: obj.kind.as_str().to_string(),
                syntax: obj.syntax_name.clone(),
            })
            .collect()
    }

    /// Enumerate notification declarations with resolved payloads.
    #[must_use]
    pub fn list_notifications(&self) -> Vec<NotificationSummary> {
        self.symbols
            .notifications()
            .map(|notif| {
                let objects = notif
                    .objects
                    .iter()
                    .filter_map(|obj_ref| {
                        let oid = self.symbols.oid_of(&obj_ref.module, &obj_ref.name)?;
                        Some(PayloadObject {
                            name: obj_ref.name.clone(),
                            full_name: format!("{}::{}", obj_ref.module, obj_ref.name),
                            oid: oid.dotted(),
                        })
                    })
                    .collect();
                NotificationSummary {
                    module: notif.module.clone(),
                    name: notif.name.clone(),
                    full_name: notif.qualified_name(),
                    oid: notif.oid.dotted(),
                    description: notif
                        .description
                        .clone()
                        .unwrap_or_else(|| "No description".to_string()),
                    objects,
                }
            })
            .collect()
    }

    /// Find one notification by `Module::Name` or by dotted OID.
    #[must_use]
    pub fn find_notification(&self, identifier: &str) -> Option<NotificationSummary> {
        self.list_notifications()
            .into_iter()
            .find(|n| n.full_name == identifier || n.oid == identifier)
    }

    /// Bidirectional identifier resolution.
    ///
    /// Fails closed: the input is echoed unchanged with an error annotation
    /// whenever the module is unknown, the name is absent, or the numeric
    /// form has no known prefix.
    #[must_use]
    pub fn resolve(&self, identifier: &str, direction: ResolveDirection) -> Resolution {
        match direction {
            ResolveDirection::ToNumeric => self.resolve_to_numeric(identifier),
            ResolveDirection::ToName => self.resolve_to_name(identifier),
        }
    }

    fn resolve_to_numeric(&self, identifier: &str) -> Resolution {
        if !identifier.contains("::") {
            // Already numeric.
            return Resolution::ok(identifier);
        }
        let Some((module, name_with_index)) = identifier.split_once("::") else {
            return Resolution::failed(identifier, "invalid identifier format");
        };
        if module.is_empty() || name_with_index.is_empty() {
            return Resolution::failed(identifier, "invalid identifier format");
        }
        if !self.symbols.contains_module(module) {
            debug!(module, "module not loaded");
            return Resolution::failed(identifier, format!("module '{module}' not loaded"));
        }
        let (name, index) = match name_with_index.split_once('.') {
            Some((name, index)) => (name, Some(index)),
            None => (name_with_index, None),
        };
        let Some(oid) = self.symbols.oid_of(module, name) else {
            debug!(module, name, "symbol not found");
            return Resolution::failed(
                identifier,
                format!("symbol '{name}' not found in module '{module}'"),
            );
        };
        let mut numeric = oid.dotted();
        if let Some(index) = index {
            numeric.push('.');
            numeric.push_str(index);
        }
        Resolution::ok(numeric)
    }

    fn resolve_to_name(&self, identifier: &str) -> Resolution {
        if identifier.contains("::") {
            // Already symbolic.
            return Resolution::ok(identifier);
        }
        let Some(oid) = Oid::parse(identifier) else {
            return Resolution::failed(identifier, "not a dotted numeric OID");
        };

        if let Some((prefix, decl)) = self.symbols.longest_prefix(&oid) {
            let mut result = format!("{}::{}", decl.module, decl.name);
            if let Some(suffix) = oid.suffix_after(prefix) {
                if !suffix.is_empty() {
                    let rendered = Oid::from_slice(suffix).dotted();
                    result.push('.');
                    result.push_str(&rendered);
                }
            }
            return Resolution::ok(result);
        }

        // No declaration covers any prefix: best-effort path-label fallback.
        self.resolve_by_path_labels(identifier, &oid)
    }

    /// Render the deepest well-known root labels, re-appending arcs below
    /// them in numeric form.
    ///
    /// Best-effort by design: arcs below the deepest well-known root have
    /// no symbolic label here, and name collisions across modules are not
    /// disambiguated.
    fn resolve_by_path_labels(&self, identifier: &str, oid: &Oid) -> Resolution {
        // The roots form chains, so the matches walk the OID's own path
        // and their count equals the deepest matched prefix length.
        let labels: Vec<&str> = WELL_KNOWN_ROOTS
            .iter()
            .filter(|(arcs, _)| oid.arcs().starts_with(arcs))
            .map(|(_, label)| *label)
            .collect();
        if labels.is_empty() {
            return Resolution::failed(identifier, "no known prefix");
        }

        let tail: Vec<&str> = labels.iter().rev().take(2).rev().copied().collect();
        let mut result = tail.join("::");
        let suffix = &oid.arcs()[labels.len()..];
        if !suffix.is_empty() {
            result.push('.');
            result.push_str(&Oid::from_slice(suffix).dotted());
        }
        Resolution::ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Access, DeclKind, NotificationDecl, ObjectDecl, ObjectRef, Status};

    fn test_registry() -> Registry {
        let mut registry = Registry::new();
        let mut compiled = CompiledModule::default();
        compiled.objects.push(ObjectDecl::new(
            "IF-MIB",
            "ifDescr",
            Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2]),
            DeclKind::TableColumn,
            "DisplayString",
            Access::ReadOnly,
            Status::Current,
        ));
        compiled.objects.push(ObjectDecl::new(
            "IF-MIB",
            "ifInOctets",
            Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10]),
            DeclKind::TableColumn,
            "Counter32",
            Access::ReadOnly,
            Status::Current,
        ));
        compiled.notifications.push(NotificationDecl {
            module: "IF-MIB".into(),
            name: "linkDown".into(),
            oid: Oid::from_slice(&[1, 3, 6, 1, 6, 3, 1, 1, 5, 3]),
            objects: vec![
                ObjectRef {
                    module: "IF-MIB".into(),
                    name: "ifDescr".into(),
                },
                ObjectRef {
                    module: "IF-MIB".into(),
                    name: "missingRef".into(),
                },
            ],
            description: None,
        });
        registry.record_loaded("IF-MIB", "IF-MIB.mib", vec!["SNMPv2-SMI".into()], compiled);
        registry
    }

    #[test]
    fn test_resolve_symbolic_to_numeric_with_index() {
        let registry = test_registry();
        let res = registry.resolve("IF-MIB::ifDescr.1", ResolveDirection::ToNumeric);
        assert!(res.is_resolved());
        assert_eq!(res.output, "1.3.6.1.2.1.2.2.1.2.1");
    }

    #[test]
    fn test_resolve_multi_part_index_kept_verbatim() {
        let registry = test_registry();
        let res = registry.resolve("IF-MIB::ifDescr.1.2.3", ResolveDirection::ToNumeric);
        assert_eq!(res.output, "1.3.6.1.2.1.2.2.1.2.1.2.3");
    }

    #[test]
    fn test_resolve_unknown_module_echoes_input() {
        let registry = test_registry();
        let res = registry.resolve("NO-MIB::thing.0", ResolveDirection::ToNumeric);
        assert!(!res.is_resolved());
        assert_eq!(res.output, "NO-MIB::thing.0");
    }

    #[test]
    fn test_resolve_unknown_symbol_echoes_input() {
        let registry = test_registry();
        let res = registry.resolve("IF-MIB::nope.0", ResolveDirection::ToNumeric);
        assert!(!res.is_resolved());
        assert_eq!(res.output, "IF-MIB::nope.0");
    }

    #[test]
    fn test_resolve_numeric_to_name() {
        let registry = test_registry();
        let res = registry.resolve("1.3.6.1.2.1.2.2.1.2.1", ResolveDirection::ToName);
        assert!(res.is_resolved());
        assert_eq!(res.output, "IF-MIB::ifDescr.1");
    }

    #[test]
    fn test_resolve_round_trip() {
        let registry = test_registry();
        let numeric = "1.3.6.1.2.1.2.2.1.10.7";
        let name = registry.resolve(numeric, ResolveDirection::ToName);
        let back = registry.resolve(&name.output, ResolveDirection::ToNumeric);
        assert_eq!(back.output, numeric);
    }

    #[test]
    fn test_resolve_already_in_target_form() {
        let registry = test_registry();
        let res = registry.resolve("1.3.6.1", ResolveDirection::ToNumeric);
        assert!(res.is_resolved());
        assert_eq!(res.output, "1.3.6.1");

        let res = registry.resolve("IF-MIB::ifDescr", ResolveDirection::ToName);
        assert!(res.is_resolved());
        assert_eq!(res.output, "IF-MIB::ifDescr");
    }

    #[test]
    fn test_resolve_fallback_well_known_roots() {
        let registry = Registry::new();
        let res = registry.resolve("1.3.6.1.4.1", ResolveDirection::ToName);
        assert!(res.is_resolved());
        assert_eq!(res.output, "private::enterprises");
    }

    #[test]
    fn test_resolve_fallback_appends_numeric_suffix() {
        let registry = Registry::new();
        // 9.1 sits below enterprises and has no symbolic labels.
        let res = registry.resolve("1.3.6.1.4.1.9.1", ResolveDirection::ToName);
        assert_eq!(res.output, "private::enterprises.9.1");
    }

    #[test]
    fn test_resolve_fallback_no_known_prefix() {
        let registry = Registry::new();
        let res = registry.resolve("2.5.4", ResolveDirection::ToName);
        assert!(!res.is_resolved());
        assert_eq!(res.output, "2.5.4");
    }

    #[test]
    fn test_resolve_garbage_echoes_input() {
        let registry = Registry::new();
        let res = registry.resolve("not an oid", ResolveDirection::ToName);
        assert!(!res.is_resolved());
        assert_eq!(res.output, "not an oid");
    }

    #[test]
    fn test_reloaded_module_stops_answering_for_old_symbols() {
        let mut registry = Registry::new();
        let mut first = CompiledModule::default();
        first.objects.push(ObjectDecl::new(
            "M",
            "oldSym",
            Oid::from_slice(&[1, 3, 9, 1]),
            DeclKind::Scalar,
            "Integer32",
            Access::ReadOnly,
            Status::Current,
        ));
        registry.record_loaded("M", "M.mib", Vec::new(), first);

        // Same module name from a second file with no declarations.
        registry.record_loaded("M", "M.txt", Vec::new(), CompiledModule::default());

        let res = registry.resolve("1.3.9.1.0", ResolveDirection::ToName);
        assert_ne!(res.output, "M::oldSym.0");
        // Only the path-label fallback remains for that subtree.
        assert_eq!(res.output, "iso::org.9.1.0");
    }

    #[test]
    fn test_status_counts() {
        let mut registry = test_registry();
        registry.record_failed(
            "BROKEN-MIB",
            "BROKEN-MIB.mib",
            vec!["MISSING-MIB".into()],
            &CompileError::MissingDependency("MISSING-MIB".into()),
        );
        let status = registry.status();
        assert_eq!(status.loaded, 1);
        assert_eq!(status.failed, 1);
        assert_eq!(status.total, 2);
        assert_eq!(status.errors[0].status, ModuleStatus::MissingDeps);
        assert_eq!(status.modules[0].objects, 2);
        assert_eq!(status.modules[0].traps, 1);
    }

    #[test]
    fn test_list_objects_filter() {
        let registry = test_registry();
        assert_eq!(registry.list_objects(None).len(), 2);
        assert_eq!(registry.list_objects(Some("IF-MIB")).len(), 2);
        assert!(registry.list_objects(Some("OTHER")).is_empty());
    }

    #[test]
    fn test_list_notifications_skips_dangling_refs() {
        let registry = test_registry();
        let notifs = registry.list_notifications();
        assert_eq!(notifs.len(), 1);
        // missingRef doesn't resolve and is skipped.
        assert_eq!(notifs[0].objects.len(), 1);
        assert_eq!(notifs[0].objects[0].full_name, "IF-MIB::ifDescr");
    }

    #[test]
    fn test_find_notification_by_name_and_oid() {
        let registry = test_registry();
        assert!(registry.find_notification("IF-MIB::linkDown").is_some());
        assert!(registry.find_notification("1.3.6.1.6.3.1.1.5.3").is_some());
        assert!(registry.find_notification("IF-MIB::linkUp").is_none());
    }
}
