//! Reference overflow oracle
//!
//! The ground truth each candidate check is judged against. The conditions
//! are built over the *narrow* operands by the textbook definitions the
//! solver's own no-overflow predicates use, and are deliberately
//! shape-different from the candidate formulas (which range-compare at the
//! canonical width): an oracle sharing the candidate's shape would make the
//! equivalence check vacuous.

use ruleproof_bv::{unsigned_max, BoolTerm, BvTerm, TermError};

/// Exact unsigned add overflow: the carry bit of the one-bit-extended sum
/// is set.
pub fn add_overflow(x: &BvTerm, y: &BvTerm) -> Result<BoolTerm, TermError> {
    let width = x.width();
    let sum = BvTerm::bvadd(x.clone().zero_extend(1), y.clone().zero_extend(1))?;
    let carry = BvTerm::extract(sum, width, width)?;
    BoolTerm::ne(carry, BvTerm::zero(1)?)
}

/// Exact unsigned sub underflow: the subtrahend exceeds the minuend.
pub fn sub_underflow(x: &BvTerm, y: &BvTerm) -> Result<BoolTerm, TermError> {
    BoolTerm::ult(x.clone(), y.clone())
}

/// Exact unsigned mul overflow: the double-width product exceeds the type
/// maximum.
pub fn mul_overflow(x: &BvTerm, y: &BvTerm) -> Result<BoolTerm, TermError> {
    let width = x.width();
    let product = BvTerm::bvmul(
        x.clone().zero_extend(width),
        y.clone().zero_extend(width),
    )?;
    BoolTerm::ugt(product, unsigned_max(width, 2 * width)?)
}
