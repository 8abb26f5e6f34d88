//! Operational core over the lattice wire types.
//!
//! The encode path: the caller builds an [`record::AssetAttributes`] from
//! raw asset data, [`record::AssetRecord::ingest`] packs both bitfields,
//! derives the Morton sort key from the coordinates, serializes the fixed
//! 28-byte vertex buffer, and (optionally) computes the provenance digest
//! over the canonical semantic fields. The decode path
//! ([`record::AssetRecord::from_row`]) is the mirror image for reads.
//!
//! Every function in this crate is pure and stateless: no I/O, no shared
//! mutable state, no locking. Concurrent callers need no coordination.

pub mod digest;
pub mod morton;
pub mod record;

pub use digest::{CanonicalValue, canonical_text, digest_fields};
pub use morton::{Bounds3, MAX_BITS_PER_AXIS, MortonEncoder};
pub use record::{AssetAttributes, AssetRecord};
