//! Fixed-width little-endian slice helpers.
//!
//! The vertex wire format is little-endian throughout. These helpers return
//! `None` when the slice is shorter than the field width; callers writing
//! into buffers they sized themselves use `.expect("fixed ... field")`.

/// Read a little-endian u32 from the first 4 bytes of `buf`.
pub fn read_u32_le(buf: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = buf.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

/// Write a little-endian u32 into the first 4 bytes of `buf`.
pub fn write_u32_le(buf: &mut [u8], value: u32) -> Option<()> {
    buf.get_mut(..4)?.copy_from_slice(&value.to_le_bytes());
    Some(())
}

/// Read a little-endian IEEE 754 single from the first 4 bytes of `buf`.
pub fn read_f32_le(buf: &[u8]) -> Option<f32> {
    let bytes: [u8; 4] = buf.get(..4)?.try_into().ok()?;
    Some(f32::from_le_bytes(bytes))
}

/// Write a little-endian IEEE 754 single into the first 4 bytes of `buf`.
pub fn write_f32_le(buf: &mut [u8], value: f32) -> Option<()> {
    buf.get_mut(..4)?.copy_from_slice(&value.to_le_bytes());
    Some(())
}
