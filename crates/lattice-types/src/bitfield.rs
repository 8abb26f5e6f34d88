//! Packed 32-bit semantic bitfields: `taxonomy32` and `meta32`.
//!
//! Layout of `taxonomy32`:
//!
//! | Bits    | Width | Field      | Range       |
//! |---------|-------|------------|-------------|
//! | 31..=29 | 3     | domain     | 0..=7       |
//! | 28      | 1     | outlier    | flag        |
//! | 27..=12 | 16    | risk_score | 0..=65535   |
//! | 11..=0  | 12    | reserved   | round-trips |
//!
//! Layout of `meta32`:
//!
//! | Bits    | Width | Field    | Range                          |
//! |---------|-------|----------|--------------------------------|
//! | 31..=24 | 8     | risk     | 0..=255                        |
//! | 23..=16 | 8     | shock    | 0..=255                        |
//! | 15..=14 | 2     | trend    | 0=Down, 1=Flat, 2=Up, 3=reserved |
//! | 13..=8  | 6     | vitality | 0..=63                         |
//! | 7..=0   | 8     | reserved | round-trips                    |
//!
//! Pack rejects out-of-range inputs; nothing is silently truncated. Unpack
//! is total: any u32 is a valid (if semantically odd) bitfield, and reserved
//! bits are reported verbatim rather than assumed zero. "Reserved" is a
//! writer contract, not a reader assumption — legacy or externally produced
//! words may carry nonzero reserved bits and must survive a decode-then-
//! re-encode round trip unchanged.

use lattice_error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

/// Bit position of the 3-bit domain field in `taxonomy32`.
pub const DOMAIN_SHIFT: u32 = 29;
/// Maximum domain value (3 bits).
pub const DOMAIN_MAX: u8 = 7;
/// The outlier flag bit in `taxonomy32`.
pub const OUTLIER_BIT: u32 = 1 << 28;
/// Bit position of the 16-bit risk score in `taxonomy32`.
pub const RISK_SCORE_SHIFT: u32 = 12;
/// Mask of the reserved low 12 bits of `taxonomy32`.
pub const TAXONOMY_RESERVED_MASK: u32 = 0x0FFF;

/// Bit position of the 8-bit risk field in `meta32`.
pub const RISK_SHIFT: u32 = 24;
/// Bit position of the 8-bit shock field in `meta32`.
pub const SHOCK_SHIFT: u32 = 16;
/// Bit position of the 2-bit trend field in `meta32`.
pub const TREND_SHIFT: u32 = 14;
/// Maximum trend value (2 bits).
pub const TREND_MAX: u8 = 3;
/// Bit position of the 6-bit vitality field in `meta32`.
pub const VITALITY_SHIFT: u32 = 8;
/// Maximum vitality value (6 bits).
pub const VITALITY_MAX: u8 = 63;
/// Mask of the reserved low 8 bits of `meta32`.
pub const META_RESERVED_MASK: u32 = 0x00FF;

/// Typed view of the 2-bit trend field.
///
/// The raw `u8` stays the wire contract; this enum is the semantic reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Trend {
    Down = 0,
    Flat = 1,
    Up = 2,
    /// Bit pattern 3 is reserved for future use.
    Reserved = 3,
}

impl Trend {
    /// Parse from the raw 2-bit value. Returns `None` above 3.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Down),
            1 => Some(Self::Flat),
            2 => Some(Self::Up),
            3 => Some(Self::Reserved),
            _ => None,
        }
    }

    /// The raw 2-bit wire value.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Unpacked fields of a `taxonomy32` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonomyFields {
    pub domain: u8,
    pub outlier: bool,
    pub risk_score: u16,
    /// Low 12 bits, reported verbatim. Zero for words produced by
    /// [`pack_taxonomy`].
    pub reserved: u16,
}

/// Unpacked fields of a `meta32` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetaFields {
    pub risk: u8,
    pub shock: u8,
    pub trend: u8,
    pub vitality: u8,
    /// Low 8 bits, reported verbatim. Zero for words produced by
    /// [`pack_meta`].
    pub reserved: u8,
}

impl MetaFields {
    /// The trend field as a typed enum.
    pub const fn trend_kind(&self) -> Trend {
        // trend is masked to 2 bits on unpack, so from_bits cannot fail.
        match Trend::from_bits(self.trend) {
            Some(t) => t,
            None => Trend::Reserved,
        }
    }
}

/// Pack a `taxonomy32` word. Reserved bits are emitted as zero.
///
/// Fails with [`LatticeError::FieldRange`] if `domain > 7`. The risk score
/// spans its full 16-bit width, so the type already enforces its range.
pub fn pack_taxonomy(domain: u8, outlier: bool, risk_score: u16) -> Result<u32> {
    if domain > DOMAIN_MAX {
        return Err(LatticeError::field_range(
            "domain",
            u64::from(domain),
            u64::from(DOMAIN_MAX),
        ));
    }
    let mut word = u32::from(domain) << DOMAIN_SHIFT;
    if outlier {
        word |= OUTLIER_BIT;
    }
    word |= u32::from(risk_score) << RISK_SCORE_SHIFT;
    Ok(word)
}

/// Unpack a `taxonomy32` word. Total: never fails for any u32.
#[allow(clippy::cast_possible_truncation)]
pub const fn unpack_taxonomy(word: u32) -> TaxonomyFields {
    TaxonomyFields {
        domain: (word >> DOMAIN_SHIFT) as u8,
        outlier: word & OUTLIER_BIT != 0,
        risk_score: ((word >> RISK_SCORE_SHIFT) & 0xFFFF) as u16,
        reserved: (word & TAXONOMY_RESERVED_MASK) as u16,
    }
}

/// Pack a `meta32` word. Reserved bits are emitted as zero.
///
/// Fails with [`LatticeError::FieldRange`] if `trend > 3` or `vitality > 63`.
pub fn pack_meta(risk: u8, shock: u8, trend: u8, vitality: u8) -> Result<u32> {
    if trend > TREND_MAX {
        return Err(LatticeError::field_range(
            "trend",
            u64::from(trend),
            u64::from(TREND_MAX),
        ));
    }
    if vitality > VITALITY_MAX {
        return Err(LatticeError::field_range(
            "vitality",
            u64::from(vitality),
            u64::from(VITALITY_MAX),
        ));
    }
    Ok(u32::from(risk) << RISK_SHIFT
        | u32::from(shock) << SHOCK_SHIFT
        | u32::from(trend) << TREND_SHIFT
        | u32::from(vitality) << VITALITY_SHIFT)
}

/// Unpack a `meta32` word. Total: never fails for any u32.
#[allow(clippy::cast_possible_truncation)]
pub const fn unpack_meta(word: u32) -> MetaFields {
    MetaFields {
        risk: (word >> RISK_SHIFT) as u8,
        shock: (word >> SHOCK_SHIFT) as u8,
        trend: ((word >> TREND_SHIFT) & 0x3) as u8,
        vitality: ((word >> VITALITY_SHIFT) & 0x3F) as u8,
        reserved: (word & META_RESERVED_MASK) as u8,
    }
}

/// Re-pack unpacked taxonomy fields, preserving reserved bits verbatim.
///
/// Used by decode-then-re-encode paths that must not zero legacy reserved
/// bits. Range checks still apply to the semantic fields.
pub fn repack_taxonomy(fields: &TaxonomyFields) -> Result<u32> {
    let word = pack_taxonomy(fields.domain, fields.outlier, fields.risk_score)?;
    Ok(word | u32::from(fields.reserved) & TAXONOMY_RESERVED_MASK)
}

/// Re-pack unpacked meta fields, preserving reserved bits verbatim.
pub fn repack_meta(fields: &MetaFields) -> Result<u32> {
    let word = pack_meta(fields.risk, fields.shock, fields.trend, fields.vitality)?;
    Ok(word | u32::from(fields.reserved) & META_RESERVED_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_round_trip_concrete() {
        let word = pack_taxonomy(3, true, 50000).unwrap();
        let fields = unpack_taxonomy(word);
        assert_eq!(
            fields,
            TaxonomyFields {
                domain: 3,
                outlier: true,
                risk_score: 50000,
                reserved: 0,
            }
        );
    }

    #[test]
    fn taxonomy_bit_positions() {
        // Each field alone, against hand-computed words.
        assert_eq!(pack_taxonomy(7, false, 0).unwrap(), 0xE000_0000);
        assert_eq!(pack_taxonomy(0, true, 0).unwrap(), 0x1000_0000);
        assert_eq!(pack_taxonomy(0, false, 0xFFFF).unwrap(), 0x0FFF_F000);
    }

    #[test]
    fn taxonomy_domain_range_rejected() {
        let err = pack_taxonomy(8, false, 0).unwrap_err();
        assert_eq!(err, LatticeError::field_range("domain", 8, 7));
        assert!(pack_taxonomy(255, true, 1).is_err());
    }

    #[test]
    fn meta_round_trip_extremes() {
        for (risk, shock, trend, vitality) in
            [(0, 0, 0, 0), (255, 255, 3, 63), (1, 2, 2, 33), (0x80, 0x7F, 1, 63)]
        {
            let word = pack_meta(risk, shock, trend, vitality).unwrap();
            let fields = unpack_meta(word);
            assert_eq!(fields.risk, risk);
            assert_eq!(fields.shock, shock);
            assert_eq!(fields.trend, trend);
            assert_eq!(fields.vitality, vitality);
            assert_eq!(fields.reserved, 0);
        }
    }

    #[test]
    fn meta_bit_positions() {
        assert_eq!(pack_meta(0xFF, 0, 0, 0).unwrap(), 0xFF00_0000);
        assert_eq!(pack_meta(0, 0xFF, 0, 0).unwrap(), 0x00FF_0000);
        assert_eq!(pack_meta(0, 0, 3, 0).unwrap(), 0x0000_C000);
        assert_eq!(pack_meta(0, 0, 0, 63).unwrap(), 0x0000_3F00);
    }

    #[test]
    fn meta_range_rejected() {
        assert_eq!(
            pack_meta(0, 0, 4, 0).unwrap_err(),
            LatticeError::field_range("trend", 4, 3)
        );
        assert_eq!(
            pack_meta(0, 0, 0, 64).unwrap_err(),
            LatticeError::field_range("vitality", 64, 63)
        );
    }

    #[test]
    fn reserved_bits_reported_verbatim() {
        // Externally produced words with junk in the reserved regions must
        // decode without losing those bits.
        let tax = unpack_taxonomy(0x0000_0ABC);
        assert_eq!(tax.reserved, 0xABC);
        assert_eq!(repack_taxonomy(&tax).unwrap(), 0x0000_0ABC);

        let meta = unpack_meta(0x0000_00DE);
        assert_eq!(meta.reserved, 0xDE);
        assert_eq!(repack_meta(&meta).unwrap(), 0x0000_00DE);
    }

    #[test]
    fn trend_enum_view() {
        assert_eq!(Trend::from_bits(0), Some(Trend::Down));
        assert_eq!(Trend::from_bits(1), Some(Trend::Flat));
        assert_eq!(Trend::from_bits(2), Some(Trend::Up));
        assert_eq!(Trend::from_bits(3), Some(Trend::Reserved));
        assert_eq!(Trend::from_bits(4), None);
        assert_eq!(Trend::Up.bits(), 2);

        let fields = unpack_meta(pack_meta(0, 0, 2, 0).unwrap());
        assert_eq!(fields.trend_kind(), Trend::Up);
    }

    // -----------------------------------------------------------------------
    // proptest: round-trip laws over the full in-range input space
    // -----------------------------------------------------------------------

    use proptest::prelude::*;

    proptest::proptest! {
        /// unpack(pack(..)) recovers every in-range taxonomy input exactly,
        /// with reserved bits zero.
        #[test]
        fn prop_taxonomy_round_trip(
            domain in 0u8..=7,
            outlier in proptest::bool::ANY,
            risk_score in proptest::num::u16::ANY,
        ) {
            let word = pack_taxonomy(domain, outlier, risk_score).unwrap();
            let fields = unpack_taxonomy(word);
            prop_assert_eq!(fields.domain, domain);
            prop_assert_eq!(fields.outlier, outlier);
            prop_assert_eq!(fields.risk_score, risk_score);
            prop_assert_eq!(fields.reserved, 0);
        }

        /// unpack(pack(..)) recovers every in-range meta input exactly.
        #[test]
        fn prop_meta_round_trip(
            risk in proptest::num::u8::ANY,
            shock in proptest::num::u8::ANY,
            trend in 0u8..=3,
            vitality in 0u8..=63,
        ) {
            let word = pack_meta(risk, shock, trend, vitality).unwrap();
            let fields = unpack_meta(word);
            prop_assert_eq!(fields.risk, risk);
            prop_assert_eq!(fields.shock, shock);
            prop_assert_eq!(fields.trend, trend);
            prop_assert_eq!(fields.vitality, vitality);
            prop_assert_eq!(fields.reserved, 0);
        }

        /// Arbitrary u32s survive unpack-then-repack bit-for-bit, reserved
        /// regions included.
        #[test]
        fn prop_unpack_repack_preserves_any_word(word in proptest::num::u32::ANY) {
            let tax = unpack_taxonomy(word);
            prop_assert_eq!(repack_taxonomy(&tax).unwrap(), word);

            let meta = unpack_meta(word);
            prop_assert_eq!(repack_meta(&meta).unwrap(), word);
        }
    }
}
