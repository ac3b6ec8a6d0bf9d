//! Underflow-checked unsigned integer subtraction
//!
//! Below the full width the difference is computed at the canonical width,
//! where an underflow wraps into the huge range above the type maximum, so
//! the emitted check is a range comparison. At 256 bits the wrap lands back
//! inside the type's own range and the emitted code instead checks that the
//! difference exceeds the minuend.

use crate::oracle;
use crate::report::RuleReport;
use crate::{type_widths, CANONICAL_BITS};
use ruleproof_bv::{opcodes, unsigned_max, unsigned_upcast, BvTerm, TermError};
use ruleproof_engine::{EngineError, EquivalenceObligation, Rule};
use tracing::{debug, warn};

pub const RULE_NAME: &str = "checked-sub-uint";

/// The equivalence obligation for one type width.
pub fn build_obligation(type_bits: u32) -> Result<EquivalenceObligation, TermError> {
    // Input vars
    let x_short = BvTerm::var("X", type_bits)?;
    let y_short = BvTerm::var("Y", type_bits)?;

    // Exact underflow condition over the narrow operands
    let actual_underflow = oracle::sub_underflow(&x_short, &y_short)?;

    // Cast to full-width values
    let x = unsigned_upcast(&x_short, CANONICAL_BITS)?;
    let y = unsigned_upcast(&y_short, CANONICAL_BITS)?;
    let diff = opcodes::sub(x.clone(), y)?;

    // Constants
    let max_value = unsigned_max(type_bits, CANONICAL_BITS)?;

    // The check emitted for checked subtraction
    let underflow_check = if type_bits == CANONICAL_BITS {
        opcodes::gt(diff, x)?
    } else {
        opcodes::gt(diff, max_value)?
    };

    Ok(EquivalenceObligation::new(
        underflow_check.is_nonzero(),
        actual_underflow,
    ))
}

/// Prove the subtraction check at every width. A failed width is recorded
/// and the remaining widths still run.
pub async fn verify(rule: &Rule) -> Result<RuleReport, EngineError> {
    let mut report = RuleReport::new(RULE_NAME);
    for type_bits in type_widths() {
        let obligation = build_obligation(type_bits)?;
        let outcome = rule.check_obligation(&obligation).await?;
        if outcome.is_proved() {
            debug!(width = type_bits, "subtraction check proved");
        } else {
            warn!(width = type_bits, %outcome, "subtraction check failed");
        }
        report.record(type_bits, outcome);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::One;
    use ruleproof_bv::{eval_bool, Assignment};

    fn env(x: BigUint, y: BigUint) -> Assignment {
        let mut env = Assignment::new();
        env.insert("X".to_string(), x);
        env.insert("Y".to_string(), y);
        env
    }

    fn env64(x: u64, y: u64) -> Assignment {
        env(BigUint::from(x), BigUint::from(y))
    }

    #[test]
    fn test_every_width_builds() {
        for type_bits in type_widths() {
            build_obligation(type_bits).unwrap();
        }
    }

    #[test]
    fn test_full_width_compares_against_the_minuend() {
        let obligation = build_obligation(256).unwrap();
        let script = obligation.to_smt2().unwrap();
        assert!(script.contains("(bvugt (bvsub X Y) X)"));
    }

    #[test]
    fn test_byte_underflow_boundary() {
        // 0 - 1 wraps; both sides must say underflow.
        let obligation = build_obligation(8).unwrap();
        let e = env64(0, 1);
        assert!(eval_bool(&obligation.candidate, &e).unwrap());
        assert!(eval_bool(&obligation.reference, &e).unwrap());
    }

    #[test]
    fn test_equal_operands_do_not_underflow() {
        let obligation = build_obligation(8).unwrap();
        let e = env64(7, 7);
        assert!(!eval_bool(&obligation.candidate, &e).unwrap());
        assert!(!eval_bool(&obligation.reference, &e).unwrap());
    }

    #[test]
    fn test_full_width_underflow_boundary() {
        let obligation = build_obligation(256).unwrap();
        let e = env(BigUint::from(0u8), BigUint::one());
        assert!(eval_bool(&obligation.candidate, &e).unwrap());
        assert!(eval_bool(&obligation.reference, &e).unwrap());

        let max = (BigUint::one() << 256u32) - 1u8;
        let e = env(max, BigUint::one());
        assert!(!eval_bool(&obligation.candidate, &e).unwrap());
        assert!(!eval_bool(&obligation.reference, &e).unwrap());
    }
}
