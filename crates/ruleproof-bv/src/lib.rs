//! Symbolic bit-vector layer for checked-arithmetic rule verification
//!
//! This crate provides the vocabulary rule scripts are written in:
//!
//! - [`term`]: immutable bit-vector / boolean term ASTs with width tracking
//!   and SMT-LIB2 rendering
//! - [`opcodes`]: the modeled machine's arithmetic instruction set (modular
//!   ADD/SUB/MUL, zero-on-zero DIV, 1-bit comparison results)
//! - [`util`]: width-conversion helpers (`unsigned_max`, `unsigned_upcast`)
//! - [`eval`]: a concrete big-integer evaluator, used as an independent
//!   reference for operator semantics and for replaying solver witnesses
//!
//! Everything here is a pure term constructor; no solver interaction happens
//! in this crate.

pub mod eval;
pub mod opcodes;
pub mod term;
pub mod util;

pub use eval::{eval_bool, eval_bv, Assignment, EvalError};
pub use term::{BoolTerm, BvTerm, TermError};
pub use util::{unsigned_max, unsigned_upcast};
