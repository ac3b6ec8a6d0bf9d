//! Overflow-checked unsigned integer multiplication
//!
//! Unlike addition and subtraction, the emitted multiplication guard is the
//! same shape at every width: `x != 0 && y > maxValue / x`, built from the
//! machine's division (zero divisor yields zero, so the guard's short
//! circuit is sound even as plain flag arithmetic). A canonical-width
//! product comparison would be unsound above 128 bits, where the 256-bit
//! product itself can wrap; that is why the generated code divides.

use crate::oracle;
use crate::report::RuleReport;
use crate::type_widths;
use crate::CANONICAL_BITS;
use ruleproof_bv::{opcodes, unsigned_max, unsigned_upcast, BvTerm, TermError};
use ruleproof_engine::{EngineError, EquivalenceObligation, Rule};
use tracing::{debug, warn};

pub const RULE_NAME: &str = "checked-mul-uint";

/// The equivalence obligation for one type width.
pub fn build_obligation(type_bits: u32) -> Result<EquivalenceObligation, TermError> {
    // Input vars
    let x_short = BvTerm::var("X", type_bits)?;
    let y_short = BvTerm::var("Y", type_bits)?;

    // Exact overflow condition over the narrow operands
    let actual_overflow = oracle::mul_overflow(&x_short, &y_short)?;

    // Cast to full-width values
    let x = unsigned_upcast(&x_short, CANONICAL_BITS)?;
    let y = unsigned_upcast(&y_short, CANONICAL_BITS)?;

    // Constants
    let max_value = unsigned_max(type_bits, CANONICAL_BITS)?;

    // The check emitted for checked multiplication:
    // and(iszero(iszero(x)), gt(y, div(maxValue, x)))
    let x_nonzero = opcodes::iszero(opcodes::iszero(x.clone())?)?;
    let limit = opcodes::div(max_value, x)?;
    let overflow_check = opcodes::and(x_nonzero, opcodes::gt(y, limit)?)?;

    Ok(EquivalenceObligation::new(
        overflow_check.is_nonzero(),
        actual_overflow,
    ))
}

/// Prove the multiplication check at every width. A failed width is
/// recorded and the remaining widths still run.
pub async fn verify(rule: &Rule) -> Result<RuleReport, EngineError> {
    let mut report = RuleReport::new(RULE_NAME);
    for type_bits in type_widths() {
        let obligation = build_obligation(type_bits)?;
        let outcome = rule.check_obligation(&obligation).await?;
        if outcome.is_proved() {
            debug!(width = type_bits, "multiplication check proved");
        } else {
            warn!(width = type_bits, %outcome, "multiplication check failed");
        }
        report.record(type_bits, outcome);
    }
    Ok(report)
}
