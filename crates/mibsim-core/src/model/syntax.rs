//! Syntax kinds, access classes, and lifecycle status.
//!
//! The declared syntax arrives from the compiler as a type-name string
//! (`Counter32`, `DisplayString`, `AutonomousType`, …). It is classified
//! into [`SyntaxKind`] once, when the declaration is built; everything
//! downstream switches exhaustively on the enum and never re-inspects the
//! string.

/// Closed set of value families the simulator can synthesize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxKind {
    /// OBJECT IDENTIFIER and OID-valued conventions (AutonomousType etc.).
    ObjectIdentifier,
    /// Signed 32-bit integer, including enumerated INTEGER.
    Integer,
    /// Unsigned 32-bit integer.
    Unsigned,
    /// Gauge32.
    Gauge,
    /// Counter64.
    Counter64,
    /// Counter32.
    Counter32,
    /// Hundredths of a second since an epoch.
    TimeTicks,
    /// IPv4 address.
    IpAddress,
    /// Physical (MAC) address: six octets.
    PhysAddress,
    /// OCTET STRING and textual conventions over it.
    OctetString,
    /// Anything unrecognized; synthesized as integer zero.
    Other,
}

impl SyntaxKind {
    /// Classify a declared syntax type name.
    ///
    /// Substring checks run in a fixed order. The OID family is checked
    /// first so that OID-valued conventions such as `AutonomousType` are
    /// not misread by the broader matches below, and `Counter64` must
    /// precede the plain `Counter` check.
    #[must_use]
    pub fn classify(type_name: &str) -> Self {
        let oid_like = ["Oid", "ObjectIdentifier", "AutonomousType"];
        if oid_like.iter().any(|pat| type_name.contains(pat)) {
            Self::ObjectIdentifier
        } else if type_name.contains("PhysAddress") || type_name.contains("MacAddress") {
            Self::PhysAddress
        } else if type_name.contains("Integer") {
            Self::Integer
        } else if type_name.contains("Unsigned") {
            Self::Unsigned
        } else if type_name.contains("Gauge") {
            Self::Gauge
        } else if type_name.contains("Counter64") {
            Self::Counter64
        } else if type_name.contains("Counter") {
            Self::Counter32
        } else if type_name.contains("TimeTicks") {
            Self::TimeTicks
        } else if type_name.contains("IpAddress") {
            Self::IpAddress
        } else if type_name.contains("String") {
            Self::OctetString
        } else {
            Self::Other
        }
    }

    /// Short name for diagnostics and enumeration views.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectIdentifier => "object-identifier",
            Self::Integer => "integer",
            Self::Unsigned => "unsigned",
            Self::Gauge => "gauge",
            Self::Counter64 => "counter64",
            Self::Counter32 => "counter32",
            Self::TimeTicks => "time-ticks",
            Self::IpAddress => "ip-address",
            Self::PhysAddress => "phys-address",
            Self::OctetString => "string",
            Self::Other => "other",
        }
    }
}

/// Access class of an object declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    /// Readable over the protocol.
    ReadOnly,
    /// Readable and writable.
    ReadWrite,
    /// Readable, writable, row-creating.
    ReadCreate,
    /// Never instantiated directly (table indexes, row entries).
    NotAccessible,
    /// Usable only inside notification payloads.
    AccessibleForNotify,
}

impl Access {
    /// Parse the MAX-ACCESS clause wording.
    #[must_use]
    pub fn from_clause(s: &str) -> Option<Self> {
        match s {
            "read-only" => Some(Self::ReadOnly),
            "read-write" => Some(Self::ReadWrite),
            "read-create" => Some(Self::ReadCreate),
            "not-accessible" => Some(Self::NotAccessible),
            "accessible-for-notify" => Some(Self::AccessibleForNotify),
            _ => None,
        }
    }

    /// Whether instances of this object appear in a simulated namespace.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        !matches!(self, Self::NotAccessible)
    }
}

/// Lifecycle status of a declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// In current use.
    #[default]
    Current,
    /// Being phased out; hidden from simulated namespaces.
    Deprecated,
    /// Retired; hidden from simulated namespaces.
    Obsolete,
}

impl Status {
    /// Parse the STATUS clause wording.
    #[must_use]
    pub fn from_clause(s: &str) -> Option<Self> {
        match s {
            "current" | "mandatory" => Some(Self::Current),
            "deprecated" => Some(Self::Deprecated),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }

    /// Whether the declaration participates in simulation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Current)
    }
}
