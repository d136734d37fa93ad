//! Numeric object identifiers.

use core::fmt;
use std::fmt::Write as _;

/// An OID: an ordered tuple of non-negative sub-identifiers.
///
/// The derived `Ord` is tuple-lexicographic with shorter-prefix-first when
/// one OID is a strict prefix of another, which is exactly the namespace
/// order GET-NEXT traversal requires.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Build an OID from a vector of arcs.
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Self { arcs }
    }

    /// Build an OID from a slice of arcs.
    #[must_use]
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Parse dotted notation, e.g. `1.3.6.1.2.1` or `.1.3.6.1.2.1`.
    ///
    /// A leading or trailing dot is tolerated; any non-numeric component
    /// makes the whole parse fail.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim().trim_matches('.');
        if trimmed.is_empty() {
            return None;
        }
        trimmed
            .split('.')
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()
            .map(Self::new)
    }

    /// Render as dotted notation without a leading dot.
    #[must_use]
    pub fn dotted(&self) -> String {
        let mut out = String::with_capacity(self.arcs.len() * 4);
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            let _ = write!(out, "{arc}");
        }
        out
    }

    /// The arcs as a slice.
    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// True when the OID has no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// True when `self` is a (non-strict) prefix of `other`.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }

    /// A new OID with `suffix` appended after this one's arcs.
    ///
    /// This is how instance OIDs are formed: object prefix + index arcs.
    #[must_use]
    pub fn append(&self, suffix: &[u32]) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + suffix.len());
        arcs.extend_from_slice(&self.arcs);
        arcs.extend_from_slice(suffix);
        Self::new(arcs)
    }

    /// The arcs of `self` beyond the end of `prefix`, if `prefix` matches.
    #[must_use]
    pub fn suffix_after(&self, prefix: &Self) -> Option<&[u32]> {
        if prefix.is_prefix_of(self) {
            Some(&self.arcs[prefix.len()..])
        } else {
            None
        }
    }

    /// Iterate over every non-empty leading prefix, shortest first.
    pub fn prefixes(&self) -> impl Iterator<Item = Oid> + '_ {
        (1..=self.arcs.len()).map(move |n| Oid::from_slice(&self.arcs[..n]))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}
