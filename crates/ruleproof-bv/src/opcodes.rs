//! The modeled machine's arithmetic instruction set
//!
//! Rule scripts reconstruct the code generator's overflow checks from these
//! operators and nothing else, so each one must reproduce the bit-level
//! semantics of the corresponding runtime instruction exactly:
//!
//! - `add`/`sub`/`mul` wrap modulo 2^width;
//! - `div` yields zero for a zero divisor (the SMT-LIB `bvudiv` all-ones
//!   convention must not leak through);
//! - comparisons and `iszero` produce a 1-bit value (1 = true, 0 = false)
//!   rather than a native boolean, so results combine algebraically and are
//!   consumed via `!= 0` exactly as in the generated code.

use crate::term::{BoolTerm, BvTerm, TermError};

/// Modular addition.
pub fn add(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    BvTerm::bvadd(lhs, rhs)
}

/// Modular subtraction.
pub fn sub(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    BvTerm::bvsub(lhs, rhs)
}

/// Modular multiplication.
pub fn mul(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    BvTerm::bvmul(lhs, rhs)
}

/// Unsigned division with the machine convention `div(x, 0) = 0`.
pub fn div(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    let width = rhs.width();
    let zero = BvTerm::zero(width)?;
    let divisor_is_zero = BoolTerm::eq(rhs.clone(), zero.clone())?;
    BvTerm::ite(divisor_is_zero, zero, BvTerm::bvudiv(lhs, rhs)?)
}

/// Unsigned strictly-greater-than as a 1-bit flag.
pub fn gt(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    flag(BoolTerm::ugt(lhs, rhs)?)
}

/// Unsigned strictly-less-than as a 1-bit flag.
pub fn lt(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    flag(BoolTerm::ult(lhs, rhs)?)
}

/// Equality as a 1-bit flag.
pub fn eq(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    flag(BoolTerm::eq(lhs, rhs)?)
}

/// Zero test as a 1-bit flag.
pub fn iszero(term: BvTerm) -> Result<BvTerm, TermError> {
    let zero = BvTerm::zero(term.width())?;
    flag(BoolTerm::eq(term, zero)?)
}

/// Bitwise conjunction (also combines 1-bit flags).
pub fn and(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    BvTerm::bvand(lhs, rhs)
}

/// Bitwise disjunction.
pub fn or(lhs: BvTerm, rhs: BvTerm) -> Result<BvTerm, TermError> {
    BvTerm::bvor(lhs, rhs)
}

/// Bitwise complement.
pub fn not(term: BvTerm) -> BvTerm {
    BvTerm::bvnot(term)
}

fn flag(cond: BoolTerm) -> Result<BvTerm, TermError> {
    BvTerm::ite(cond, BvTerm::constant(1u8, 1)?, BvTerm::zero(1)?)
}
