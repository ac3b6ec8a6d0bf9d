//! ruleproof: symbolic verification of generated checked arithmetic
//!
//! The code generator this harness serves emits fast, bit-width-limited
//! overflow checks for checked unsigned arithmetic on a 256-bit word
//! machine. For each operation and each type width from 8 to 256 bits the
//! harness models the narrow operands symbolically, up-casts them to the
//! canonical width, derives the exact overflow condition, and proves the
//! emitted check equivalent to it for *every* input by asking an SMT solver
//! to refute the equivalence.
//!
//! # Layers
//!
//! - [`bv`]: symbolic bit-vector terms, the machine opcode vocabulary, and
//!   a concrete big-integer evaluator
//! - [`solver`]: the external `z4`/`z3` process boundary
//! - [`engine`]: the equivalence-checking rule engine
//! - [`rules`]: one rule script per checked operation
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ruleproof::engine::Rule;
//! use ruleproof::solver::detect_solver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let solver = detect_solver().expect("no z4/z3 on PATH");
//!     let rule = Rule::new(Box::new(solver));
//!     for report in ruleproof::verify_all(&rule).await? {
//!         println!("{report}");
//!     }
//!     Ok(())
//! }
//! ```

pub use ruleproof_bv as bv;
pub use ruleproof_engine as engine;
pub use ruleproof_rules as rules;
pub use ruleproof_solver as solver;

use ruleproof_engine::{EngineError, Rule};
use ruleproof_rules::RuleReport;

/// Current version of ruleproof
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run every rule script in the catalog, in a fixed order.
pub async fn verify_all(rule: &Rule) -> Result<Vec<RuleReport>, EngineError> {
    Ok(vec![
        rules::checked_add::verify(rule).await?,
        rules::checked_sub::verify(rule).await?,
        rules::checked_mul::verify(rule).await?,
    ])
}
