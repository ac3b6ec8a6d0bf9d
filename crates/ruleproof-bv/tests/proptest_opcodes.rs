//! Property-based tests for operator fidelity
//!
//! The machine opcodes must agree with plain big-integer modular arithmetic
//! for every width the harness enumerates. Operands are drawn uniformly
//! from the full value range of each width, including 256-bit values.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use proptest::prelude::*;
use ruleproof_bv::{eval_bv, opcodes, unsigned_upcast, Assignment, BvTerm};

fn arb_width() -> impl Strategy<Value = u32> {
    (1u32..=32).prop_map(|i| i * 8)
}

fn arb_operands() -> impl Strategy<Value = (u32, BigUint, BigUint)> {
    arb_width().prop_flat_map(|width| {
        (any::<[u8; 32]>(), any::<[u8; 32]>()).prop_map(move |(a, b)| {
            let modulus = BigUint::one() << width;
            (
                width,
                BigUint::from_bytes_be(&a) % &modulus,
                BigUint::from_bytes_be(&b) % &modulus,
            )
        })
    })
}

fn operand_env(a: &BigUint, b: &BigUint) -> Assignment {
    let mut env = Assignment::new();
    env.insert("X".to_string(), a.clone());
    env.insert("Y".to_string(), b.clone());
    env
}

fn binary_op(
    width: u32,
    op: fn(BvTerm, BvTerm) -> Result<BvTerm, ruleproof_bv::TermError>,
) -> BvTerm {
    let x = BvTerm::var("X", width).unwrap();
    let y = BvTerm::var("Y", width).unwrap();
    op(x, y).unwrap()
}

proptest! {
    #[test]
    fn add_is_modular_addition((width, a, b) in arb_operands()) {
        let term = binary_op(width, opcodes::add);
        let expected = (&a + &b) % (BigUint::one() << width);
        prop_assert_eq!(eval_bv(&term, &operand_env(&a, &b)).unwrap(), expected);
    }

    #[test]
    fn sub_is_modular_subtraction((width, a, b) in arb_operands()) {
        let term = binary_op(width, opcodes::sub);
        let modulus = BigUint::one() << width;
        let expected = (&a + &modulus - &b) % &modulus;
        prop_assert_eq!(eval_bv(&term, &operand_env(&a, &b)).unwrap(), expected);
    }

    #[test]
    fn mul_is_modular_multiplication((width, a, b) in arb_operands()) {
        let term = binary_op(width, opcodes::mul);
        let expected = (&a * &b) % (BigUint::one() << width);
        prop_assert_eq!(eval_bv(&term, &operand_env(&a, &b)).unwrap(), expected);
    }

    #[test]
    fn div_is_floor_division_with_zero_convention((width, a, b) in arb_operands()) {
        let term = binary_op(width, opcodes::div);
        let expected = if b.is_zero() { BigUint::zero() } else { &a / &b };
        prop_assert_eq!(eval_bv(&term, &operand_env(&a, &b)).unwrap(), expected);
    }

    #[test]
    fn div_by_zero_is_always_zero((width, a, _b) in arb_operands()) {
        let term = binary_op(width, opcodes::div);
        let zero = BigUint::zero();
        let value = eval_bv(&term, &operand_env(&a, &zero)).unwrap();
        prop_assert_eq!(value, BigUint::zero());
    }

    #[test]
    fn gt_agrees_with_integer_comparison((width, a, b) in arb_operands()) {
        let term = binary_op(width, opcodes::gt);
        let value = eval_bv(&term, &operand_env(&a, &b)).unwrap();
        let expected = if a > b { BigUint::one() } else { BigUint::zero() };
        prop_assert_eq!(value, expected);
    }

    #[test]
    fn lt_agrees_with_integer_comparison((width, a, b) in arb_operands()) {
        let term = binary_op(width, opcodes::lt);
        let value = eval_bv(&term, &operand_env(&a, &b)).unwrap();
        let expected = if a < b { BigUint::one() } else { BigUint::zero() };
        prop_assert_eq!(value, expected);
    }

    #[test]
    fn upcast_preserves_the_unsigned_value((width, a, _b) in arb_operands()) {
        let x = BvTerm::var("X", width).unwrap();
        let wide = unsigned_upcast(&x, 256).unwrap();
        prop_assert_eq!(wide.width(), 256);
        let mut env = Assignment::new();
        env.insert("X".to_string(), a.clone());
        prop_assert_eq!(eval_bv(&wide, &env).unwrap(), a);
    }

    #[test]
    fn iszero_is_the_zero_indicator((width, a, _b) in arb_operands()) {
        let term = opcodes::iszero(BvTerm::var("X", width).unwrap()).unwrap();
        let mut env = Assignment::new();
        env.insert("X".to_string(), a.clone());
        let value = eval_bv(&term, &env).unwrap();
        let expected = if a.is_zero() { BigUint::one() } else { BigUint::zero() };
        prop_assert_eq!(value, expected);
    }
}
