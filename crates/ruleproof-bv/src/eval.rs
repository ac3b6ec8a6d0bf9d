//! Concrete term evaluation
//!
//! Evaluates symbolic terms under a concrete assignment, using unbounded
//! integers so wide intermediate values (up to 512 bits for double-width
//! products) are exact. This is the independent ground arithmetic the
//! operator layer is tested against, and the mechanism for replaying a
//! solver counterexample to confirm that the two sides of an obligation
//! really disagree on it.

use crate::term::{BoolTerm, BvTerm};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::collections::BTreeMap;
use thiserror::Error;

/// Concrete values for the free variables of a term.
pub type Assignment = BTreeMap<String, BigUint>;

/// Errors raised during concrete evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The assignment has no value for a free variable.
    #[error("no value for variable {name}")]
    UnboundVariable { name: String },

    /// The assignment's value does not fit the variable's declared width.
    #[error("value {value} for variable {name} does not fit in {width} bits")]
    ValueOutOfRange {
        name: String,
        value: BigUint,
        width: u32,
    },
}

fn modulus(width: u32) -> BigUint {
    BigUint::one() << width
}

fn mask(width: u32) -> BigUint {
    modulus(width) - 1u8
}

/// Evaluate a bit-vector term to its unsigned integer value.
pub fn eval_bv(term: &BvTerm, env: &Assignment) -> Result<BigUint, EvalError> {
    match term {
        BvTerm::Var { name, width } => {
            let value = env
                .get(name)
                .ok_or_else(|| EvalError::UnboundVariable { name: name.clone() })?;
            if value.bits() > u64::from(*width) {
                return Err(EvalError::ValueOutOfRange {
                    name: name.clone(),
                    value: value.clone(),
                    width: *width,
                });
            }
            Ok(value.clone())
        }
        BvTerm::Const { value, .. } => Ok(value.clone()),
        BvTerm::Add(lhs, rhs) => {
            let m = modulus(term.width());
            Ok((eval_bv(lhs, env)? + eval_bv(rhs, env)?) % m)
        }
        BvTerm::Sub(lhs, rhs) => {
            let m = modulus(term.width());
            Ok((eval_bv(lhs, env)? + &m - eval_bv(rhs, env)?) % m)
        }
        BvTerm::Mul(lhs, rhs) => {
            let m = modulus(term.width());
            Ok((eval_bv(lhs, env)? * eval_bv(rhs, env)?) % m)
        }
        BvTerm::UDiv(lhs, rhs) => {
            // SMT-LIB semantics: bvudiv by zero is all-ones.
            let divisor = eval_bv(rhs, env)?;
            if divisor.is_zero() {
                Ok(mask(term.width()))
            } else {
                Ok(eval_bv(lhs, env)? / divisor)
            }
        }
        BvTerm::And(lhs, rhs) => Ok(eval_bv(lhs, env)? & eval_bv(rhs, env)?),
        BvTerm::Or(lhs, rhs) => Ok(eval_bv(lhs, env)? | eval_bv(rhs, env)?),
        BvTerm::Not(inner) => Ok(mask(term.width()) ^ eval_bv(inner, env)?),
        BvTerm::ZeroExtend { inner, .. } => eval_bv(inner, env),
        BvTerm::Extract { hi, lo, inner } => {
            let value = eval_bv(inner, env)?;
            Ok((value >> *lo) & mask(hi - lo + 1))
        }
        BvTerm::Ite {
            cond,
            then_term,
            else_term,
        } => {
            if eval_bool(cond, env)? {
                eval_bv(then_term, env)
            } else {
                eval_bv(else_term, env)
            }
        }
    }
}

/// Evaluate a boolean formula under a concrete assignment.
pub fn eval_bool(term: &BoolTerm, env: &Assignment) -> Result<bool, EvalError> {
    match term {
        BoolTerm::Ugt(lhs, rhs) => Ok(eval_bv(lhs, env)? > eval_bv(rhs, env)?),
        BoolTerm::Ult(lhs, rhs) => Ok(eval_bv(lhs, env)? < eval_bv(rhs, env)?),
        BoolTerm::Eq(lhs, rhs) => Ok(eval_bv(lhs, env)? == eval_bv(rhs, env)?),
        BoolTerm::Ne(lhs, rhs) => Ok(eval_bv(lhs, env)? != eval_bv(rhs, env)?),
        BoolTerm::Not(inner) => Ok(!eval_bool(inner, env)?),
        BoolTerm::And(lhs, rhs) => Ok(eval_bool(lhs, env)? && eval_bool(rhs, env)?),
        BoolTerm::Or(lhs, rhs) => Ok(eval_bool(lhs, env)? || eval_bool(rhs, env)?),
    }
}
