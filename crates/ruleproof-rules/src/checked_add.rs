//! Overflow-checked unsigned integer addition
//!
//! The generated routine computes the sum at the canonical width and
//! compares it against the type maximum. At the full 256 bits there is no
//! wider width left to range-check against; the emitted code instead relies
//! on wraparound monotonicity (a sum that wrapped is strictly below either
//! operand), so that width gets its own formula shape. The two shapes are
//! intentionally not merged.

use crate::oracle;
use crate::report::RuleReport;
use crate::{type_widths, CANONICAL_BITS};
use ruleproof_bv::{opcodes, unsigned_max, unsigned_upcast, BvTerm, TermError};
use ruleproof_engine::{EngineError, EquivalenceObligation, Rule};
use tracing::{debug, warn};

pub const RULE_NAME: &str = "checked-add-uint";

/// The equivalence obligation for one type width.
pub fn build_obligation(type_bits: u32) -> Result<EquivalenceObligation, TermError> {
    // Input vars
    let x_short = BvTerm::var("X", type_bits)?;
    let y_short = BvTerm::var("Y", type_bits)?;

    // Exact overflow condition over the narrow operands
    let actual_overflow = oracle::add_overflow(&x_short, &y_short)?;

    // Cast to full-width values
    let x = unsigned_upcast(&x_short, CANONICAL_BITS)?;
    let y = unsigned_upcast(&y_short, CANONICAL_BITS)?;
    let sum = opcodes::add(x.clone(), y)?;

    // Constants
    let max_value = unsigned_max(type_bits, CANONICAL_BITS)?;

    // The check emitted for checked addition
    let overflow_check = if type_bits == CANONICAL_BITS {
        opcodes::gt(x, sum)?
    } else {
        opcodes::gt(sum, max_value)?
    };

    Ok(EquivalenceObligation::new(
        overflow_check.is_nonzero(),
        actual_overflow,
    ))
}

/// Prove the addition check at every width. A failed width is recorded and
/// the remaining widths still run.
pub async fn verify(rule: &Rule) -> Result<RuleReport, EngineError> {
    let mut report = RuleReport::new(RULE_NAME);
    for type_bits in type_widths() {
        let obligation = build_obligation(type_bits)?;
        let outcome = rule.check_obligation(&obligation).await?;
        if outcome.is_proved() {
            debug!(width = type_bits, "addition check proved");
        } else {
            warn!(width = type_bits, %outcome, "addition check failed");
        }
        report.record(type_bits, outcome);
    }
    Ok(report)
}
