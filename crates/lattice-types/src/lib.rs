//! Wire-level types for the lattice asset-encoding core.
//!
//! Everything in this crate is a pure, bounded computation over fixed-width
//! integers and 32-bit floats. The two artifacts with bit-exact contracts
//! live here:
//!
//! - [`bitfield`] — the packed `taxonomy32` / `meta32` semantic bitfields.
//! - [`vertex`] — the fixed 28-byte per-asset vertex buffer.
//!
//! Any two conforming implementations must produce byte-identical buffers
//! and bit-identical packed words for identical inputs.

pub mod bitfield;
pub mod encoding;
pub mod vertex;

pub use bitfield::{
    MetaFields, TaxonomyFields, Trend, pack_meta, pack_taxonomy, unpack_meta, unpack_taxonomy,
};
pub use vertex::{VERTEX_BUFFER_LEN, VertexFields};
