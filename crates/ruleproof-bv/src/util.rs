//! Bit-vector width utilities
//!
//! The two helpers every rule script leans on: the maximum representable
//! unsigned value of a narrow type expressed at a wider width, and the
//! zero-extending upcast into that wider width. Violating a precondition
//! here is a programming defect in the caller, so both return a
//! [`TermError`] immediately instead of producing an ill-formed term.

use crate::term::{BvTerm, TermError};
use num_bigint::BigUint;
use num_traits::One;

/// The constant 2^`type_bits` - 1 represented as an unsigned bit-vector of
/// width `total_bits`. Requires `0 < type_bits <= total_bits`.
pub fn unsigned_max(type_bits: u32, total_bits: u32) -> Result<BvTerm, TermError> {
    if type_bits == 0 {
        return Err(TermError::ZeroWidth);
    }
    if type_bits > total_bits {
        return Err(TermError::NarrowingUpcast {
            width: type_bits,
            target: total_bits,
        });
    }
    let value = (BigUint::one() << type_bits) - 1u8;
    BvTerm::constant(value, total_bits)
}

/// Zero-extend `value` to exactly `total_bits`, preserving its unsigned
/// numeric value. Requires `total_bits >= value.width()`.
pub fn unsigned_upcast(value: &BvTerm, total_bits: u32) -> Result<BvTerm, TermError> {
    let width = value.width();
    if total_bits < width {
        return Err(TermError::NarrowingUpcast {
            width,
            target: total_bits,
        });
    }
    Ok(value.clone().zero_extend(total_bits - width))
}
