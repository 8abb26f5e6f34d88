use thiserror::Error;

/// Primary error type for lattice encoding operations.
///
/// Structured variants carry the offending value alongside the declared
/// limit so callers can report exactly what was rejected. Every operation
/// in the core is pure and deterministic, so no error here is worth
/// retrying: the same input reproduces the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// A packed sub-field value exceeds its declared bit width.
    ///
    /// Raised at pack time; values are never silently truncated to fit.
    #[error("{field} out of range: {value} (max {max})")]
    FieldRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A buffer presented for decoding is not exactly the fixed stride.
    ///
    /// Decoding never attempts a best-effort partial parse.
    #[error("vertex buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// A fidelity score outside `[0, 1]` at construction or at the
    /// persistence boundary. Out-of-range values are rejected, not clamped.
    #[error("fidelity score out of range: {value} (must be within [0, 1])")]
    FidelityRange { value: f64 },

    /// Morton bounds with a non-finite endpoint or `min > max` on an axis.
    #[error("invalid {axis} bounds: min={min} max={max}")]
    InvalidBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}

impl LatticeError {
    /// Create a `FieldRange` error.
    pub const fn field_range(field: &'static str, value: u64, max: u64) -> Self {
        Self::FieldRange { field, value, max }
    }

    /// Create a `BufferLength` error.
    pub const fn buffer_length(expected: usize, actual: usize) -> Self {
        Self::BufferLength { expected, actual }
    }

    /// Whether this error indicates bad caller input (as opposed to a
    /// corrupt or truncated persisted row).
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::FieldRange { .. } | Self::FidelityRange { .. } | Self::InvalidBounds { .. }
        )
    }
}

/// Result type alias using `LatticeError`.
pub type Result<T> = std::result::Result<T, LatticeError>;
