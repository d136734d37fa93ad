//! Object and notification declarations, and the compiled symbol table.

use std::collections::BTreeMap;

use super::oid::Oid;
use super::syntax::{Access, Status, SyntaxKind};

/// Whether an object declaration is a scalar or a tabular column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    /// Exactly one instance, conventionally at index 0.
    Scalar,
    /// Instances indexed by one or more row-identifying integers.
    TableColumn,
}

impl DeclKind {
    /// Short name for enumeration views.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::TableColumn => "table-column",
        }
    }
}

/// A scalar or table-column definition from a loaded module.
///
/// Immutable once the owning module loads; identity is `(module, name)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectDecl {
    /// Owning module name.
    pub module: String,
    /// Local symbol name.
    pub name: String,
    /// Numeric OID prefix (instances append index arcs).
    pub oid: Oid,
    /// Scalar or table column.
    pub kind: DeclKind,
    /// Declared syntax type name as written in the module.
    pub syntax_name: String,
    /// Classified value family, computed once from `syntax_name`.
    pub syntax: SyntaxKind,
    /// MAX-ACCESS class.
    pub access: Access,
    /// Lifecycle status.
    pub status: Status,
}

impl ObjectDecl {
    /// Build a declaration, classifying the syntax name immediately.
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        oid: Oid,
        kind: DeclKind,
        syntax_name: impl Into<String>,
        access: Access,
        status: Status,
    ) -> Self {
        let syntax_name = syntax_name.into();
        let syntax = SyntaxKind::classify(&syntax_name);
        Self {
            module: module.into(),
            name: name.into(),
            oid,
            kind,
            syntax_name,
            syntax,
            access,
            status,
        }
    }

    /// `Module::Name` form used in override keys and enumeration views.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    /// Whether this declaration yields instances in a simulated namespace.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.status.is_active() && self.access.is_accessible()
    }
}

/// Reference to an object declaration by identity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ObjectRef {
    /// Module owning the referenced object.
    pub module: String,
    /// Local name of the referenced object.
    pub name: String,
}

/// An event-type definition carrying payload object references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationDecl {
    /// Owning module name.
    pub module: String,
    /// Local symbol name.
    pub name: String,
    /// Numeric OID of the notification itself.
    pub oid: Oid,
    /// Referenced payload objects, in declaration order.
    pub objects: Vec<ObjectRef>,
    /// Description text, if the module carried one.
    pub description: Option<String>,
}

impl NotificationDecl {
    /// `Module::Name` form.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

/// Failure reported by the external definition compiler for one module.
///
/// The missing-dependency case is a distinct variant so callers classify
/// failures structurally instead of pattern-matching error text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
    /// An imported module could not be located.
    #[error("cannot find module `{0}`")]
    MissingDependency(String),
    /// Any other compilation failure, with the compiler's message.
    #[error("{0}")]
    Other(String),
}

impl CompileError {
    /// Whether this failure is the missing-dependency sub-state.
    #[must_use]
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency(_))
    }
}

/// Output of compiling one definition file.
#[derive(Clone, Debug, Default)]
pub struct CompiledModule {
    /// Scalar and table-column declarations.
    pub objects: Vec<ObjectDecl>,
    /// Notification declarations.
    pub notifications: Vec<NotificationDecl>,
}

/// All symbols materialized by the definition compiler, keyed by module.
///
/// Also maintains an OID index over object and notification declarations
/// for longest-prefix lookups during numeric→symbolic resolution.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    modules: BTreeMap<String, CompiledModule>,
    oid_index: BTreeMap<Oid, ObjectRef>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a compiled module, replacing any previous entry of that name.
    ///
    /// Replacement purges the previous module's OID-index entries first, so
    /// declarations that no longer exist stop answering prefix lookups.
    pub fn insert_module(&mut self, name: impl Into<String>, module: CompiledModule) {
        let name = name.into();
        if let Some(previous) = self.modules.remove(&name) {
            let stale = previous
                .objects
                .iter()
                .map(|o| (&o.oid, &o.module, &o.name))
                .chain(
                    previous
                        .notifications
                        .iter()
                        .map(|n| (&n.oid, &n.module, &n.name)),
                );
            for (oid, module, symbol) in stale {
                // Another module may have since claimed the same OID; only
                // entries still pointing at the replaced module go.
                let owned = self
                    .oid_index
                    .get(oid)
                    .is_some_and(|r| r.module == *module && r.name == *symbol);
                if owned {
                    self.oid_index.remove(oid);
                }
            }
        }
        for obj in &module.objects {
            self.oid_index.insert(
                obj.oid.clone(),
                ObjectRef {
                    module: obj.module.clone(),
                    name: obj.name.clone(),
                },
            );
        }
        for notif in &module.notifications {
            self.oid_index.insert(
                notif.oid.clone(),
                ObjectRef {
                    module: notif.module.clone(),
                    name: notif.name.clone(),
                },
            );
        }
        self.modules.insert(name, module);
    }

    /// Whether a module of this name has compiled symbols.
    #[must_use]
    pub fn contains_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// The compiled symbols of one module.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&CompiledModule> {
        self.modules.get(name)
    }

    /// Iterate module names in sorted order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Iterate `(module name, symbols)` pairs.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &CompiledModule)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate every object declaration across all modules.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectDecl> {
        self.modules.values().flat_map(|m| m.objects.iter())
    }

    /// Iterate every notification declaration across all modules.
    pub fn notifications(&self) -> impl Iterator<Item = &NotificationDecl> {
        self.modules.values().flat_map(|m| m.notifications.iter())
    }

    /// Look up one object declaration by identity.
    #[must_use]
    pub fn object(&self, module: &str, name: &str) -> Option<&ObjectDecl> {
        self.modules
            .get(module)?
            .objects
            .iter()
            .find(|o| o.name == name)
    }

    /// Look up any declaration's OID by identity (object or notification).
    #[must_use]
    pub fn oid_of(&self, module: &str, name: &str) -> Option<&Oid> {
        let symbols = self.modules.get(module)?;
        if let Some(obj) = symbols.objects.iter().find(|o| o.name == name) {
            return Some(&obj.oid);
        }
        symbols
            .notifications
            .iter()
            .find(|n| n.name == name)
            .map(|n| &n.oid)
    }

    /// The longest declaration OID that is a prefix of `oid`.
    ///
    /// Returns the matched prefix and the declaration it belongs to.
    #[must_use]
    pub fn longest_prefix(&self, oid: &Oid) -> Option<(&Oid, &ObjectRef)> {
        // Scan candidate prefixes longest-first; the index is keyed by
        // exact OID so each probe is one map lookup.
        let mut best: Option<(&Oid, &ObjectRef)> = None;
        for prefix in oid.prefixes() {
            if let Some((key, decl)) = self.oid_index.get_key_value(&prefix) {
                best = Some((key, decl));
            }
        }
        best
    }
}
