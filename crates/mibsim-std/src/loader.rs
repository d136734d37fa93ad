//! Directory loading.
//!
//! Scans a definitions directory, compiles each file through a caller-owned
//! [`ModuleCompiler`], and records every outcome in a fresh registry. Failure
//! handling is strictly per-file: one broken definition is recorded and the
//! scan moves on.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use mibsim_core::model::{CompileError, CompiledModule};
use mibsim_core::registry::imports::extract_imports;
use mibsim_core::registry::Registry;

/// File extensions treated as module definitions.
const MODULE_EXTENSIONS: &[&str] = &["mib", "txt", "my"];

/// Compiles one module's source text into declarations.
///
/// The compiler is stateful on purpose: implementations typically accumulate
/// already-compiled modules so later files can resolve imports against them.
pub trait ModuleCompiler {
    /// Compile `source` as module `name`.
    fn compile(&mut self, name: &str, source: &str) -> Result<CompiledModule, CompileError>;
}

/// Discover definition files under `dir`, sorted by file name.
fn discover(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| MODULE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

/// Load every definition file under `dir` into a new registry.
///
/// A missing or unreadable directory yields an empty registry, not an
/// error; the caller's environment may legitimately start with no modules.
pub fn load_directory<C: ModuleCompiler>(dir: &Path, compiler: &mut C) -> Registry {
    let mut registry = Registry::new();

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "module directory missing, starting empty");
        return registry;
    }

    for path in discover(dir) {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        let file = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&name)
            .to_string();

        let source = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                registry.record_failed(
                    name,
                    file,
                    Vec::new(),
                    &CompileError::Other(format!("read failed: {err}")),
                );
                continue;
            }
        };

        let module_imports = extract_imports(&source);
        match compiler.compile(&name, &source) {
            Ok(compiled) => registry.record_loaded(name, file, module_imports, compiled),
            Err(err) => registry.record_failed(name, file, module_imports, &err),
        }
    }

    let status = registry.status();
    info!(
        loaded = status.loaded,
        failed = status.failed,
        "module directory loaded"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibsim_core::model::{Access, DeclKind, ObjectDecl, Oid, Status};
    use std::fs;

    /// Compiler stub: one synthetic scalar per module, failing on demand.
    struct StubCompiler;

    impl ModuleCompiler for StubCompiler {
        fn compile(&mut self, name: &str, source: &str) -> Result<CompiledModule, CompileError> {
            if source.contains("BREAK-MISSING") {
                return Err(CompileError::MissingDependency("GONE-MIB".into()));
            }
            if source.contains("BREAK-PARSE") {
                return Err(CompileError::Other("parse failed".into()));
            }
            let mut compiled = CompiledModule::default();
            compiled.objects.push(ObjectDecl::new(
                name,
                "stubScalar",
                Oid::from_slice(&[1, 3, 6, 1, 9, 9, 1]),
                DeclKind::Scalar,
                "Integer32",
                Access::ReadOnly,
                Status::Current,
            ));
            Ok(compiled)
        }
    }

    #[test]
    fn test_missing_directory_is_empty_registry() {
        let registry = load_directory(Path::new("/nonexistent/mibs"), &mut StubCompiler);
        let status = registry.status();
        assert_eq!(status.total, 0);
    }

    #[test]
    fn test_loads_known_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("GOOD-MIB.mib"), "GOOD-MIB DEFINITIONS").unwrap();
        fs::write(dir.path().join("ALSO-MIB.txt"), "ALSO-MIB DEFINITIONS").unwrap();
        fs::write(dir.path().join("OLD-MIB.my"), "OLD-MIB DEFINITIONS").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let registry = load_directory(dir.path(), &mut StubCompiler);
        let status = registry.status();
        assert_eq!(status.loaded, 3);
        assert_eq!(status.failed, 0);
        assert!(registry.is_loaded("GOOD-MIB"));
        assert!(!registry.is_loaded("notes"));
    }

    #[test]
    fn test_failures_are_isolated_per_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A-MIB.mib"), "fine").unwrap();
        fs::write(dir.path().join("B-MIB.mib"), "BREAK-MISSING").unwrap();
        fs::write(dir.path().join("C-MIB.mib"), "BREAK-PARSE").unwrap();

        let registry = load_directory(dir.path(), &mut StubCompiler);
        let status = registry.status();
        assert_eq!(status.loaded, 1);
        assert_eq!(status.failed, 2);

        let b = status.errors.iter().find(|r| r.name == "B-MIB").unwrap();
        assert_eq!(b.status.as_str(), "missing_deps");
        let c = status.errors.iter().find(|r| r.name == "C-MIB").unwrap();
        assert_eq!(c.status.as_str(), "error");
    }

    #[test]
    fn test_imports_recorded_from_source_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("DEP-MIB.mib"),
            "DEP-MIB DEFINITIONS ::= BEGIN\n\
             IMPORTS\n    OBJECT-TYPE FROM SNMPv2-SMI\n    ifIndex FROM IF-MIB;\n\
             END",
        )
        .unwrap();

        let registry = load_directory(dir.path(), &mut StubCompiler);
        let status = registry.status();
        assert_eq!(
            status.modules[0].imports,
            vec!["IF-MIB".to_string(), "SNMPv2-SMI".to_string()]
        );
    }
}
