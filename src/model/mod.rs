//! Core data model types for yggdrasil

mod digest;
mod proof;

pub use digest::Digest;
pub use proof::{AuditNode, AuditProof, Side};
