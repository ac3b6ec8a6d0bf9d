//! Counterexample model parsing
//!
//! When a query is satisfiable the solver prints a model; the harness only
//! ever declares bit-vector constants, so the interesting entries all look
//! like
//!
//! ```text
//! (define-fun X () (_ BitVec 8) #xff)
//! ```
//!
//! with the value possibly on its own line and written as `#x...`, `#b...`
//! or `(_ bvN W)` depending on the solver and width.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    /// Matches one bit-vector `define-fun` entry; `\s` spans newlines, so
    /// values wrapped by the solver's pretty-printer are still captured.
    static ref RE_DEFINE_FUN: Regex = Regex::new(
        r"\(define-fun\s+([A-Za-z_][A-Za-z0-9_!.]*)\s+\(\)\s+\(_\s+BitVec\s+(\d+)\)\s*(#x[0-9a-fA-F]+|#b[01]+|\(_\s+bv\d+\s+\d+\s*\))"
    )
    .expect("RE_DEFINE_FUN regex is valid");
}

/// One assignment in a counterexample model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelValue {
    /// Unsigned value of the constant.
    pub value: BigUint,
    /// Declared bit-width.
    pub width: u32,
}

impl fmt::Display for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-bit)", self.value, self.width)
    }
}

/// A satisfying assignment, keyed by constant name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: BTreeMap<String, ModelValue>,
}

impl Model {
    /// Extract every bit-vector assignment from raw solver output.
    pub fn parse(output: &str) -> Self {
        let mut values = BTreeMap::new();
        for captures in RE_DEFINE_FUN.captures_iter(output) {
            let name = captures[1].to_string();
            let width: u32 = match captures[2].parse() {
                Ok(width) => width,
                Err(_) => continue,
            };
            if let Some(value) = parse_bv_literal(&captures[3]) {
                values.insert(name, ModelValue { value, width });
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ModelValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModelValue)> {
        self.values.iter()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Parse an SMT-LIB bit-vector literal (`#x...`, `#b...` or `(_ bvN W)`).
pub fn parse_bv_literal(text: &str) -> Option<BigUint> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("#x") {
        return BigUint::parse_bytes(hex.as_bytes(), 16);
    }
    if let Some(bits) = text.strip_prefix("#b") {
        return BigUint::parse_bytes(bits.as_bytes(), 2);
    }
    if let Some(inner) = text.strip_prefix("(_") {
        let inner = inner.trim_end_matches(')').trim();
        let digits = inner.split_whitespace().next()?.strip_prefix("bv")?;
        return BigUint::parse_bytes(digits.as_bytes(), 10);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_literal() {
        assert_eq!(parse_bv_literal("#xff"), Some(BigUint::from(255u8)));
        assert_eq!(parse_bv_literal("#x00"), Some(BigUint::from(0u8)));
    }

    #[test]
    fn test_parse_binary_literal() {
        assert_eq!(parse_bv_literal("#b1010"), Some(BigUint::from(10u8)));
    }

    #[test]
    fn test_parse_decimal_literal() {
        assert_eq!(parse_bv_literal("(_ bv256 16)"), Some(BigUint::from(256u16)));
    }

    #[test]
    fn test_parse_garbage_literal() {
        assert_eq!(parse_bv_literal("true"), None);
        assert_eq!(parse_bv_literal(""), None);
    }

    #[test]
    fn test_parse_single_line_model() {
        let output = "sat\n(model\n  (define-fun X () (_ BitVec 8) #xff)\n  (define-fun Y () (_ BitVec 8) #x01)\n)\n";
        let model = Model::parse(output);
        assert_eq!(model.len(), 2);
        let x = model.get("X").unwrap();
        assert_eq!(x.value, BigUint::from(255u8));
        assert_eq!(x.width, 8);
        assert_eq!(model.get("Y").unwrap().value, BigUint::from(1u8));
    }

    #[test]
    fn test_parse_value_on_next_line() {
        // Newer solvers omit the `model` keyword and wrap the value.
        let output = "sat\n(\n  (define-fun X () (_ BitVec 256)\n    #x8000000000000000000000000000000000000000000000000000000000000000)\n)\n";
        let model = Model::parse(output);
        let x = model.get("X").unwrap();
        assert_eq!(x.width, 256);
        assert_eq!(x.value, BigUint::from(1u8) << 255u32);
    }

    #[test]
    fn test_parse_decimal_model_entry() {
        let output = "sat\n((define-fun X () (_ BitVec 16) (_ bv512 16)))\n";
        let model = Model::parse(output);
        assert_eq!(model.get("X").unwrap().value, BigUint::from(512u16));
    }

    #[test]
    fn test_parse_no_model() {
        let model = Model::parse("unsat\n");
        assert!(model.is_empty());
    }

    #[test]
    fn test_display() {
        let output = "sat\n((define-fun X () (_ BitVec 8) #x02))\n";
        let model = Model::parse(output);
        assert_eq!(model.to_string(), "X = 2 (8-bit)");
    }
}
