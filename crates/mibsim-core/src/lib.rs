//! mibsim-core: SNMP agent simulation core
//!
//! This crate holds the IO-free parts of the simulator:
//!
//! - [`model`] — OIDs, syntax kinds, and object/notification declarations
//!   as produced by an external MIB compiler.
//! - [`registry`] — the symbol registry: loaded/failed module tracking,
//!   dependency extraction, and bidirectional name↔OID resolution.
//! - [`synth`] — typed synthetic-value generation per declared syntax kind.
//! - [`agent`] — the ordered instance table answering GET and GET-NEXT.
//! - [`overrides`] — operator-supplied literal values keyed by
//!   `Module::Name.index`.
//! - [`walk`] — reconstruction of metric/label records from walk output.
//!
//! Transport binding, packet codecs, and MIB grammar parsing live outside
//! this crate; see the `ModuleCompiler` trait in `mibsim-std` and the
//! [`agent::OidSpace`] trait for the two collaborator boundaries.

pub mod agent;
pub mod model;
pub mod overrides;
pub mod registry;
pub mod synth;
pub mod walk;
