//! 3D Morton (Z-order) sort key derivation.
//!
//! Each coordinate is quantized into `[0, 2^bits)` against caller-supplied
//! bounds, then the three quantized values are interleaved bit-by-bit: bit
//! `3i` of the code comes from x, `3i+1` from y, `3i+2` from z. At the
//! default 21 bits per axis the code occupies 63 bits and fits a u64.
//!
//! Z-order gives spatial locality on average, not exactly: points near a
//! cell boundary can land far apart in code space. That is inherent to the
//! curve and deliberately left alone.

use lattice_error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

/// Maximum quantization width per axis: 3 x 21 = 63 bits of code.
pub const MAX_BITS_PER_AXIS: u32 = 21;

/// Per-axis coordinate bounds for quantization.
///
/// Supplied per call or per universe configuration; never persisted by the
/// core. Coordinates outside the bounds are clamped at quantization time —
/// an asset outside the nominal universe still needs a deterministic key —
/// but the bounds themselves must be well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds3 {
    /// The unit cube, the common normalized-space configuration.
    pub const UNIT: Self = Self {
        min_x: 0.0,
        max_x: 1.0,
        min_y: 0.0,
        max_y: 1.0,
        min_z: 0.0,
        max_z: 1.0,
    };

    /// Validate and construct bounds.
    ///
    /// Fails with [`LatticeError::InvalidBounds`] if any endpoint is
    /// non-finite or `min > max` on an axis. A degenerate axis
    /// (`min == max`) is allowed and quantizes everything to cell 0.
    pub fn new(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        min_z: f64,
        max_z: f64,
    ) -> Result<Self> {
        Self::check_axis("x", min_x, max_x)?;
        Self::check_axis("y", min_y, max_y)?;
        Self::check_axis("z", min_z, max_z)?;
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            min_z,
            max_z,
        })
    }

    fn check_axis(axis: &'static str, min: f64, max: f64) -> Result<()> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(LatticeError::InvalidBounds { axis, min, max });
        }
        Ok(())
    }
}

/// Morton code derivation with a configurable quantization width.
///
/// The width is a parameter rather than a hard-coded constant; the default
/// of 21 bits per axis is the widest that fits three axes in a u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MortonEncoder {
    bits_per_axis: u32,
}

impl Default for MortonEncoder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl MortonEncoder {
    /// 21 bits per axis, a 63-bit code.
    pub const DEFAULT: Self = Self {
        bits_per_axis: MAX_BITS_PER_AXIS,
    };

    /// Create an encoder with the given per-axis width (1..=21).
    pub fn new(bits_per_axis: u32) -> Result<Self> {
        if bits_per_axis == 0 || bits_per_axis > MAX_BITS_PER_AXIS {
            return Err(LatticeError::field_range(
                "bits_per_axis",
                u64::from(bits_per_axis),
                u64::from(MAX_BITS_PER_AXIS),
            ));
        }
        Ok(Self { bits_per_axis })
    }

    /// The configured quantization width.
    pub const fn bits_per_axis(self) -> u32 {
        self.bits_per_axis
    }

    /// Quantize one coordinate into `[0, 2^bits)` against `[min, max]`.
    ///
    /// Out-of-range values clamp to the nearest endpoint; NaN clamps to the
    /// axis minimum. A degenerate axis (`max <= min`) quantizes to 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quantize(self, v: f64, min: f64, max: f64) -> u32 {
        if max <= min {
            return 0;
        }
        // NaN fails every comparison, so clamp it explicitly.
        let clamped = if v.is_nan() { min } else { v.clamp(min, max) };
        let cells = 1u64 << self.bits_per_axis;
        let normalized = (clamped - min) / (max - min);
        let cell = (normalized * cells as f64) as u64;
        // v == max normalizes to 1.0 and would land one past the last cell.
        cell.min(cells - 1) as u32
    }

    /// Compute the Morton code for a point under the given bounds.
    ///
    /// Deterministic: identical `(x, y, z, bounds)` always yields the
    /// identical code, across calls and across processes.
    pub fn compute(self, x: f64, y: f64, z: f64, bounds: &Bounds3) -> u64 {
        let qx = self.quantize(x, bounds.min_x, bounds.max_x);
        let qy = self.quantize(y, bounds.min_y, bounds.max_y);
        let qz = self.quantize(z, bounds.min_z, bounds.max_z);
        spread(qx) | spread(qy) << 1 | spread(qz) << 2
    }

    /// De-interleave a Morton code back into quantized lattice coordinates.
    ///
    /// This is the exact inverse of the interleave step, not of `compute`:
    /// quantization already discarded sub-cell precision, so the original
    /// floats are unrecoverable by design.
    pub fn decompose(self, code: u64) -> (u32, u32, u32) {
        let axis_mask = if self.bits_per_axis == 32 {
            u32::MAX
        } else {
            (1u32 << self.bits_per_axis) - 1
        };
        (
            compact(code) & axis_mask,
            compact(code >> 1) & axis_mask,
            compact(code >> 2) & axis_mask,
        )
    }
}

/// Spread the low 21 bits of `v` so bit `i` lands at position `3i`.
const fn spread(v: u32) -> u64 {
    let mut x = v as u64 & 0x1F_FFFF;
    x = (x | x << 32) & 0x001F_0000_0000_FFFF;
    x = (x | x << 16) & 0x001F_0000_FF00_00FF;
    x = (x | x << 8) & 0x100F_00F0_0F00_F00F;
    x = (x | x << 4) & 0x10C3_0C30_C30C_30C3;
    x = (x | x << 2) & 0x1249_2492_4924_9249;
    x
}

/// Gather every third bit of `v` back into the low 21 bits.
#[allow(clippy::cast_possible_truncation)]
const fn compact(v: u64) -> u32 {
    let mut x = v & 0x1249_2492_4924_9249;
    x = (x | x >> 2) & 0x10C3_0C30_C30C_30C3;
    x = (x | x >> 4) & 0x100F_00F0_0F00_F00F;
    x = (x | x >> 8) & 0x001F_0000_FF00_00FF;
    x = (x | x >> 16) & 0x001F_0000_0000_FFFF;
    x = (x | x >> 32) & 0x001F_FFFF;
    x as u32
}
