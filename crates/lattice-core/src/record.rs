//! `AssetRecord`: the per-ingestion encode/decode unit.
//!
//! One record is constructed per ingestion event and is immutable after
//! construction: fields are private, accessors are read-only, and any
//! change means building a new record. The derived fields — Morton code,
//! vertex buffer, optional row digest — are never independently settable.
//!
//! Numeric fields are held at wire precision: the caller's f64 inputs are
//! narrowed to f32 at construction and widened back, so the record, its
//! vertex buffer, its Morton code, and its digest all agree with what a
//! reader will reconstruct from the persisted row. Quantization therefore
//! happens at wire precision on both paths.

use std::collections::{BTreeMap, BTreeSet};

use lattice_error::{LatticeError, Result};
use lattice_types::bitfield::{
    DOMAIN_SHIFT, MetaFields, TaxonomyFields, pack_meta, pack_taxonomy, unpack_meta,
    unpack_taxonomy,
};
use lattice_types::vertex::{VERTEX_BUFFER_LEN, VertexFields};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::digest::{CanonicalValue, digest_fields};
use crate::morton::{Bounds3, MortonEncoder};

/// Raw asset attributes as supplied by the ingestion caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetAttributes {
    pub domain: u8,
    pub outlier: bool,
    pub risk_score: u16,
    pub risk: u8,
    pub shock: u8,
    pub trend: u8,
    pub vitality: u8,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub fidelity_score: f64,
    pub spin: f64,
}

/// One observed asset, fully encoded.
///
/// The persistence layer stores `{morton_code, taxonomy32, meta32,
/// vertex_buffer, row_digest}` and scans by `morton_code` so that spatially
/// and categorically nearby assets land contiguously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    taxonomy32: u32,
    meta32: u32,
    x: f64,
    y: f64,
    z: f64,
    fidelity_score: f64,
    spin: f64,
    morton_code: u64,
    vertex_buffer: [u8; VERTEX_BUFFER_LEN],
    row_digest: Option<String>,
}

impl AssetRecord {
    /// Encode an asset for persistence, without a provenance digest.
    pub fn ingest(
        attrs: &AssetAttributes,
        encoder: MortonEncoder,
        bounds: &Bounds3,
    ) -> Result<Self> {
        Self::build(attrs, encoder, bounds, false)
    }

    /// Encode an asset for persistence and compute its provenance digest.
    pub fn ingest_with_digest(
        attrs: &AssetAttributes,
        encoder: MortonEncoder,
        bounds: &Bounds3,
    ) -> Result<Self> {
        Self::build(attrs, encoder, bounds, true)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build(
        attrs: &AssetAttributes,
        encoder: MortonEncoder,
        bounds: &Bounds3,
        with_digest: bool,
    ) -> Result<Self> {
        // NaN fails the range check too; out-of-range is an error, never a
        // silent clamp.
        if !(0.0..=1.0).contains(&attrs.fidelity_score) {
            return Err(LatticeError::FidelityRange {
                value: attrs.fidelity_score,
            });
        }

        let taxonomy32 = pack_taxonomy(attrs.domain, attrs.outlier, attrs.risk_score)?;
        let meta32 = pack_meta(attrs.risk, attrs.shock, attrs.trend, attrs.vitality)?;

        // Narrow to wire precision first so every derived field agrees
        // with the decode path.
        let x = f64::from(attrs.x as f32);
        let y = f64::from(attrs.y as f32);
        let z = f64::from(attrs.z as f32);
        let fidelity_score = f64::from(attrs.fidelity_score as f32);
        let spin = f64::from(attrs.spin as f32);

        let morton_code = encoder.compute(x, y, z, bounds);
        let vertex_buffer = VertexFields {
            taxonomy32,
            meta32,
            x: x as f32,
            y: y as f32,
            z: z as f32,
            fidelity: fidelity_score as f32,
            spin: spin as f32,
        }
        .to_bytes();

        let mut record = Self {
            taxonomy32,
            meta32,
            x,
            y,
            z,
            fidelity_score,
            spin,
            morton_code,
            vertex_buffer,
            row_digest: None,
        };
        if with_digest {
            record.row_digest = Some(digest_fields(&record.canonical_fields(), &BTreeSet::new()));
        }

        debug!(
            morton_code = record.morton_code,
            domain = attrs.domain,
            digest = record.row_digest.is_some(),
            "ingested asset record"
        );
        Ok(record)
    }

    /// Reconstruct a record from a persisted row: the mirror of the encode
    /// path.
    ///
    /// The fidelity invariant is re-checked at this boundary; a buffer
    /// carrying an out-of-range score was tampered with or corrupted.
    pub fn from_row(
        vertex_buffer: &[u8],
        morton_code: u64,
        row_digest: Option<String>,
    ) -> Result<Self> {
        let fields = VertexFields::from_bytes(vertex_buffer)?;
        let fidelity_score = f64::from(fields.fidelity);
        if !(0.0..=1.0).contains(&fidelity_score) {
            return Err(LatticeError::FidelityRange {
                value: fidelity_score,
            });
        }

        trace!(morton_code, "decoded asset row");
        Ok(Self {
            taxonomy32: fields.taxonomy32,
            meta32: fields.meta32,
            x: f64::from(fields.x),
            y: f64::from(fields.y),
            z: f64::from(fields.z),
            fidelity_score,
            spin: f64::from(fields.spin),
            morton_code,
            vertex_buffer: fields.to_bytes(),
            row_digest,
        })
    }

    /// The semantic fields in canonical form, ready for digesting.
    ///
    /// The vertex buffer and the digest itself never enter this map, which
    /// discharges the exclusion obligation for the built-in digest path.
    /// External rows with extra fields go through
    /// [`crate::digest::digest_fields`] with a caller-chosen exclude set.
    pub fn canonical_fields(&self) -> BTreeMap<String, CanonicalValue> {
        let mut fields = BTreeMap::new();
        fields.insert(
            "taxonomy32".to_owned(),
            CanonicalValue::UInt(u64::from(self.taxonomy32)),
        );
        fields.insert(
            "meta32".to_owned(),
            CanonicalValue::UInt(u64::from(self.meta32)),
        );
        fields.insert("x".to_owned(), CanonicalValue::Float(self.x));
        fields.insert("y".to_owned(), CanonicalValue::Float(self.y));
        fields.insert("z".to_owned(), CanonicalValue::Float(self.z));
        fields.insert(
            "fidelity_score".to_owned(),
            CanonicalValue::Float(self.fidelity_score),
        );
        fields.insert("spin".to_owned(), CanonicalValue::Float(self.spin));
        fields.insert(
            "morton_code".to_owned(),
            CanonicalValue::UInt(self.morton_code),
        );
        fields
    }

    /// Recompute the Morton code from the stored coordinates and compare.
    ///
    /// An audit helper for the read path: the persisted code is trusted for
    /// scans, but provenance checks can verify it was not rewritten.
    pub fn verify_morton(&self, encoder: MortonEncoder, bounds: &Bounds3) -> bool {
        encoder.compute(self.x, self.y, self.z, bounds) == self.morton_code
    }

    /// The derived sector: the top 3 bits of `taxonomy32` (the domain),
    /// which the persistence boundary filters on.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn sector(&self) -> u8 {
        (self.taxonomy32 >> DOMAIN_SHIFT) as u8
    }

    pub const fn taxonomy32(&self) -> u32 {
        self.taxonomy32
    }

    pub const fn meta32(&self) -> u32 {
        self.meta32
    }

    /// Decoded view of `taxonomy32`.
    pub const fn taxonomy(&self) -> TaxonomyFields {
        unpack_taxonomy(self.taxonomy32)
    }

    /// Decoded view of `meta32`.
    pub const fn meta(&self) -> MetaFields {
        unpack_meta(self.meta32)
    }

    pub const fn x(&self) -> f64 {
        self.x
    }

    pub const fn y(&self) -> f64 {
        self.y
    }

    pub const fn z(&self) -> f64 {
        self.z
    }

    pub const fn fidelity_score(&self) -> f64 {
        self.fidelity_score
    }

    pub const fn spin(&self) -> f64 {
        self.spin
    }

    pub const fn morton_code(&self) -> u64 {
        self.morton_code
    }

    /// The exact 28-byte serialized form.
    pub const fn vertex_buffer(&self) -> &[u8; VERTEX_BUFFER_LEN] {
        &self.vertex_buffer
    }

    pub fn row_digest(&self) -> Option<&str> {
        self.row_digest.as_deref()
    }
}
