//! The fixed 28-byte vertex wire format.
//!
//! Layout, little-endian, in order:
//!
//! | Offset | Width | Field      | Type |
//! |--------|-------|------------|------|
//! | 0      | 4     | taxonomy32 | u32  |
//! | 4      | 4     | meta32     | u32  |
//! | 8      | 4     | x          | f32  |
//! | 12     | 4     | y          | f32  |
//! | 16     | 4     | z          | f32  |
//! | 20     | 4     | fidelity   | f32  |
//! | 24     | 4     | spin       | f32  |
//!
//! This is the sole bit-exact wire-compatibility artifact of the core: any
//! consumer decoding this buffer must use the identical field order and
//! width, and any two conforming encoders must produce byte-identical
//! buffers for identical inputs.
//!
//! Coordinates, fidelity and spin are carried at single precision even
//! though the in-memory model uses `f64`. Narrowing loses sub-f32
//! precision; round trips recover floats within
//! `1e-6 * max(1, |original|)`.

use lattice_error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

use crate::encoding::{read_f32_le, read_u32_le, write_f32_le, write_u32_le};

/// Exact serialized size of a vertex buffer. Never more, never less.
pub const VERTEX_BUFFER_LEN: usize = 28;

/// The seven wire fields of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexFields {
    pub taxonomy32: u32,
    pub meta32: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub fidelity: f32,
    pub spin: f32,
}

impl VertexFields {
    /// Serialize into the fixed 28-byte layout.
    ///
    /// The stride is structural: the output is a `[u8; 28]`, not a
    /// runtime-checked format.
    pub fn to_bytes(&self) -> [u8; VERTEX_BUFFER_LEN] {
        let mut out = [0u8; VERTEX_BUFFER_LEN];
        write_u32_le(&mut out[0..4], self.taxonomy32).expect("fixed u32 field");
        write_u32_le(&mut out[4..8], self.meta32).expect("fixed u32 field");
        write_f32_le(&mut out[8..12], self.x).expect("fixed f32 field");
        write_f32_le(&mut out[12..16], self.y).expect("fixed f32 field");
        write_f32_le(&mut out[16..20], self.z).expect("fixed f32 field");
        write_f32_le(&mut out[20..24], self.fidelity).expect("fixed f32 field");
        write_f32_le(&mut out[24..28], self.spin).expect("fixed f32 field");
        out
    }

    /// Deserialize from a 28-byte buffer.
    ///
    /// Fails with [`LatticeError::BufferLength`] for any other length; no
    /// partial decoding is attempted.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() != VERTEX_BUFFER_LEN {
            return Err(LatticeError::buffer_length(VERTEX_BUFFER_LEN, buf.len()));
        }
        Ok(Self {
            taxonomy32: read_u32_le(&buf[0..4]).expect("fixed u32 field"),
            meta32: read_u32_le(&buf[4..8]).expect("fixed u32 field"),
            x: read_f32_le(&buf[8..12]).expect("fixed f32 field"),
            y: read_f32_le(&buf[12..16]).expect("fixed f32 field"),
            z: read_f32_le(&buf[16..20]).expect("fixed f32 field"),
            fidelity: read_f32_le(&buf[20..24]).expect("fixed f32 field"),
            spin: read_f32_le(&buf[24..28]).expect("fixed f32 field"),
        })
    }
}
