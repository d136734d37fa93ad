//! The simulated agent's OID space.
//!
//! An [`InstanceTable`] is built once per simulated-agent run from the
//! registry's declarations plus the override map, and is read-only for the
//! life of that run. It answers exact GET lookups and lexicographic
//! successor (GET-NEXT) queries; absence and end-of-space are normal,
//! representable outcomes, never errors.

use std::collections::BTreeMap;
use std::ops::Bound;

use rand::Rng;
use tracing::debug;

use crate::model::{DeclKind, Oid, SymbolTable};
use crate::overrides::Overrides;
use crate::synth::{synthesize, Value};

/// Default row indices synthesized for each table column.
const DEFAULT_COLUMN_INDICES: [u32; 2] = [1, 2];

/// Result of an exact lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum GetResult<'a> {
    /// The stored value at that OID.
    Value(&'a Value),
    /// Nothing is stored at that OID.
    NoSuchObject,
}

/// Result of a successor lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum NextResult<'a> {
    /// The instance at the smallest key strictly greater than the query.
    Next(&'a Oid, &'a Value),
    /// The query is at or past the last stored key.
    EndOfView,
}

/// The boundary the transport layer calls, once per protocol request.
pub trait OidSpace {
    /// Exact-match lookup.
    fn get(&self, oid: &Oid) -> GetResult<'_>;
    /// Strict-successor lookup in tuple-lexicographic order.
    fn get_next(&self, oid: &Oid) -> NextResult<'_>;
}

/// All instances of one simulated agent, sorted by OID.
#[derive(Clone, Debug, Default)]
pub struct InstanceTable {
    instances: BTreeMap<Oid, Value>,
}

impl InstanceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from compiled declarations and overrides.
    ///
    /// First pass: every active, accessible declaration gets one instance
    /// at index `.0` (scalars) or two at `.1`/`.2` (table columns), with
    /// the override map consulted per symbolic instance key. Second pass:
    /// override keys naming indices the scan did not cover inject extra
    /// instances, which is how rows beyond the default two are simulated.
    /// Not-accessible declarations never materialize, overridden or not.
    #[must_use]
    pub fn build<R: Rng + ?Sized>(
        symbols: &SymbolTable,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Self {
        let mut instances = BTreeMap::new();

        for decl in symbols.objects() {
            if !decl.is_simulated() {
                continue;
            }
            let indices: &[u32] = match decl.kind {
                DeclKind::Scalar => &[0],
                DeclKind::TableColumn => &DEFAULT_COLUMN_INDICES,
            };
            for &index in indices {
                let key = format!("{}.{index}", decl.qualified_name());
                let value = synthesize(decl.syntax, overrides.get(&key), rng);
                instances.insert(decl.oid.append(&[index]), value);
            }
        }

        for (key, value) in overrides.parsed_entries() {
            let Some(decl) = symbols.object(&key.module, &key.name) else {
                continue;
            };
            if !decl.access.is_accessible() {
                continue;
            }
            let oid = decl.oid.append(&key.index);
            if instances.contains_key(&oid) {
                continue;
            }
            let value = synthesize(decl.syntax, Some(value), rng);
            instances.insert(oid, value);
        }

        debug!(instances = instances.len(), "instance table built");
        Self { instances }
    }

    /// Number of stored instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when no instances are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterate instances in ascending OID order.
    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &Value)> {
        self.instances.iter()
    }
}

impl OidSpace for InstanceTable {
    fn get(&self, oid: &Oid) -> GetResult<'_> {
        match self.instances.get(oid) {
            Some(value) => GetResult::Value(value),
            None => GetResult::NoSuchObject,
        }
    }

    fn get_next(&self, oid: &Oid) -> NextResult<'_> {
        let mut after = self
            .instances
            .range::<Oid, _>((Bound::Excluded(oid), Bound::Unbounded));
        match after.next() {
            Some((next_oid, value)) => NextResult::Next(next_oid, value),
            None => NextResult::EndOfView,
        }
    }
}
