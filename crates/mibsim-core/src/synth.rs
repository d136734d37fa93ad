//! Typed synthetic-value generation.
//!
//! Given a declaration's [`SyntaxKind`] and an optional operator override,
//! produce one correctly-typed instance value. This never fails: a bad
//! override logs a warning and falls through to random synthesis for the
//! same family, and an unrecognized family yields integer zero.

use std::fmt;
use std::net::Ipv4Addr;

use rand::Rng;
use tracing::warn;

use crate::model::{Oid, SyntaxKind};
use crate::overrides::OverrideValue;

/// A typed simulated instance value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// INTEGER / Integer32, including enumerations.
    Integer(i32),
    /// Unsigned32.
    Unsigned(u32),
    /// Gauge32.
    Gauge(u32),
    /// Counter32.
    Counter32(u32),
    /// Counter64.
    Counter64(u64),
    /// TimeTicks (centiseconds).
    TimeTicks(u32),
    /// IPv4 address.
    IpAddress(Ipv4Addr),
    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),
    /// OCTET STRING rendered as text.
    OctetString(String),
    /// Six-octet physical address.
    PhysAddress([u8; 6]),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Unsigned(v) | Self::Gauge(v) | Self::Counter32(v) | Self::TimeTicks(v) => {
                write!(f, "{v}")
            }
            Self::Counter64(v) => write!(f, "{v}"),
            Self::IpAddress(v) => write!(f, "{v}"),
            Self::ObjectIdentifier(v) => write!(f, "{v}"),
            Self::OctetString(v) => write!(f, "{v}"),
            Self::PhysAddress(octets) => {
                let parts: Vec<String> = octets.iter().map(|b| format!("{b:02x}")).collect();
                write!(f, "{}", parts.join(":"))
            }
        }
    }
}

/// Produce one value for `kind`, honoring `override_val` when it coerces.
pub fn synthesize<R: Rng + ?Sized>(
    kind: SyntaxKind,
    override_val: Option<&OverrideValue>,
    rng: &mut R,
) -> Value {
    if let Some(val) = override_val {
        match coerce(kind, val) {
            Some(value) => return value,
            None => {
                warn!(%val, kind = kind.as_str(), "override does not coerce, using random value");
            }
        }
    }
    random(kind, rng)
}

/// Coerce an override into the family's native representation.
fn coerce(kind: SyntaxKind, val: &OverrideValue) -> Option<Value> {
    match kind {
        SyntaxKind::Integer => val.as_integer().and_then(|v| i32::try_from(v).ok()).map(Value::Integer),
        SyntaxKind::Unsigned => coerce_u32(val).map(Value::Unsigned),
        SyntaxKind::Gauge => coerce_u32(val).map(Value::Gauge),
        SyntaxKind::Counter32 => coerce_u32(val).map(Value::Counter32),
        SyntaxKind::Counter64 => val
            .as_integer()
            .and_then(|v| u64::try_from(v).ok())
            .map(Value::Counter64),
        SyntaxKind::TimeTicks => coerce_u32(val).map(Value::TimeTicks),
        SyntaxKind::IpAddress => val.as_text().parse().ok().map(Value::IpAddress),
        SyntaxKind::ObjectIdentifier => Oid::parse(&val.as_text()).map(Value::ObjectIdentifier),
        SyntaxKind::OctetString | SyntaxKind::PhysAddress => {
            Some(Value::OctetString(val.as_text()))
        }
        // No family matched the declaration; an all-digits override still
        // reads naturally as an integer.
        SyntaxKind::Other => val
            .as_integer()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Integer),
    }
}

fn coerce_u32(val: &OverrideValue) -> Option<u32> {
    val.as_integer().and_then(|v| u32::try_from(v).ok())
}

/// Draw a family-appropriate pseudo-random value.
fn random<R: Rng + ?Sized>(kind: SyntaxKind, rng: &mut R) -> Value {
    match kind {
        SyntaxKind::ObjectIdentifier => {
            let arc = rng.gen_range(1..=100);
            Value::ObjectIdentifier(Oid::from_slice(&[1, 3, 6, 1, 2, 1, arc]))
        }
        SyntaxKind::Integer => Value::Integer(rng.gen_range(1..=100)),
        SyntaxKind::Unsigned => Value::Unsigned(rng.gen_range(1..=10_000)),
        SyntaxKind::Gauge => Value::Gauge(rng.gen_range(1..=100)),
        SyntaxKind::Counter64 => Value::Counter64(rng.gen_range(1_000_000..=999_999_999)),
        SyntaxKind::Counter32 => Value::Counter32(rng.gen_range(1_000..=999_999)),
        SyntaxKind::TimeTicks => Value::TimeTicks(rng.gen_range(0..=5_000_000)),
        SyntaxKind::IpAddress => Value::IpAddress(Ipv4Addr::LOCALHOST),
        SyntaxKind::PhysAddress => {
            let mut octets = [0u8; 6];
            rng.fill(&mut octets);
            Value::PhysAddress(octets)
        }
        SyntaxKind::OctetString => Value::OctetString(format!("Sim-{}", rng.gen_range(1..=99))),
        SyntaxKind::Other => Value::Integer(0),
    }
}
