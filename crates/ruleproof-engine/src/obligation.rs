//! Equivalence proof obligations
//!
//! A proof obligation pairs the candidate formula (the fast overflow check
//! the code generator emits) with the reference formula (the exact overflow
//! condition). The obligation renders to an SMT-LIB2 script that asserts
//! their disagreement; `unsat` therefore certifies the equivalence for all
//! values of the shared free variables.

use ruleproof_bv::{BoolTerm, TermError};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A claim that two boolean formulas agree for all inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceObligation {
    pub candidate: BoolTerm,
    pub reference: BoolTerm,
}

impl EquivalenceObligation {
    pub fn new(candidate: BoolTerm, reference: BoolTerm) -> Self {
        Self {
            candidate,
            reference,
        }
    }

    /// The free variables of both sides, with width-consistency enforced
    /// across the whole obligation.
    pub fn free_variables(&self) -> Result<BTreeMap<String, u32>, TermError> {
        let mut vars = BTreeMap::new();
        self.candidate.collect_vars(&mut vars)?;
        self.reference.collect_vars(&mut vars)?;
        Ok(vars)
    }

    /// Render the counterexample search as an SMT-LIB2 script.
    pub fn to_smt2(&self) -> Result<String, TermError> {
        let vars = self.free_variables()?;
        let mut script = String::new();
        let _ = writeln!(script, "(set-logic QF_BV)");
        for (name, width) in &vars {
            let _ = writeln!(script, "(declare-const {name} (_ BitVec {width}))");
        }
        let _ = writeln!(
            script,
            "(assert (distinct {} {}))",
            self.candidate.to_smt2(),
            self.reference.to_smt2()
        );
        let _ = writeln!(script, "(check-sat)");
        let _ = writeln!(script, "(get-model)");
        Ok(script)
    }
}
