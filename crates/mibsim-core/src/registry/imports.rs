//! Lightweight dependency extraction and batch validation.
//!
//! This is deliberately not a grammar parser: the full compiler owns that.
//! A textual scan of the `IMPORTS … ;` block is enough to know which
//! modules a definition file depends on, and presence-of-marker checks are
//! enough to reject files that are obviously not MIB modules at all.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::Registry;
use crate::registry::standard::is_standard_module;

static IMPORTS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"IMPORTS\s+(.*?);")
        .dot_matches_new_line(true)
        .case_insensitive(true)
        .build()
        .expect("imports pattern compiles")
});

static FROM_MODULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"FROM\s+([A-Za-z0-9\-]+)").expect("from pattern compiles"));

/// Extract the module names a definition file imports from.
///
/// Scans the first `IMPORTS … ;` block for `FROM <module>` tokens. Returns
/// a deduplicated, sorted list; a file without an imports block imports
/// nothing.
#[must_use]
pub fn extract_imports(source: &str) -> Vec<String> {
    let Some(block) = IMPORTS_BLOCK.captures(source) else {
        return Vec::new();
    };
    let names: BTreeSet<String> = FROM_MODULE
        .captures_iter(&block[1])
        .map(|c| c[1].to_string())
        .collect();
    names.into_iter().collect()
}

/// One not-yet-persisted definition file offered for upload.
#[derive(Clone, Debug)]
pub struct UploadCandidate {
    /// Module name, normally the file stem.
    pub name: String,
    /// Raw module text.
    pub source: String,
}

/// Validation outcome for one candidate file.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct CandidateReport {
    /// Module name of the candidate.
    pub name: String,
    /// Imports extracted from the candidate's text.
    pub imports: Vec<String>,
    /// Imports satisfiable by nothing currently known.
    pub missing_deps: Vec<String>,
    /// Structural problems (missing markers). Advisory dependencies never
    /// appear here.
    pub errors: Vec<String>,
}

impl CandidateReport {
    /// Whether this candidate alone is structurally sound.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validation outcome for a whole upload batch.
#[derive(Clone, Debug)]
#[derive(serde::Serialize)]
pub struct BatchReport {
    /// True iff every candidate has zero structural errors. Missing
    /// dependencies are advisory and never block upload.
    pub can_upload: bool,
    /// Per-candidate detail, in input order.
    pub candidates: Vec<CandidateReport>,
}

/// Validate a batch of candidate files against the current registry.
///
/// A dependency is satisfied when it names another candidate in the same
/// batch, an already-loaded module, a standard module, or a module whose
/// symbols the compiler has already materialized. This makes an internally
/// self-sufficient batch (A imports B, both uploaded together) pass even
/// though neither is on disk yet.
#[must_use]
pub fn validate_batch(registry: &Registry, candidates: &[UploadCandidate]) -> BatchReport {
    let batch_names: BTreeSet<&str> = candidates.iter().map(|c| c.name.as_str()).collect();

    let reports: Vec<CandidateReport> = candidates
        .iter()
        .map(|candidate| {
            let imports = extract_imports(&candidate.source);

            let missing_deps: Vec<String> = imports
                .iter()
                .filter(|imp| {
                    !batch_names.contains(imp.as_str())
                        && !registry.is_loaded(imp)
                        && !is_standard_module(imp)
                        && !registry.symbols().contains_module(imp)
                })
                .cloned()
                .collect();

            let mut errors = Vec::new();
            if !candidate.source.contains("DEFINITIONS") {
                errors.push("missing DEFINITIONS keyword".to_string());
            }
            if !candidate.source.contains("BEGIN") || !candidate.source.contains("END") {
                errors.push("missing BEGIN/END block".to_string());
            }

            CandidateReport {
                name: candidate.name.clone(),
                imports,
                missing_deps,
                errors,
            }
        })
        .collect();

    BatchReport {
        can_upload: reports.iter().all(CandidateReport::is_valid),
        candidates: reports,
    }
}
