//! Symbolic bit-vector and boolean terms
//!
//! Terms are immutable ASTs that carry their bit-width and render to
//! SMT-LIB2 text on demand. Construction goes through the checked
//! constructors; a width mismatch indicates a defect in the calling rule
//! script and is reported as a [`TermError`] immediately rather than being
//! deferred to the solver.

use num_bigint::BigUint;
use num_traits::One;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use thiserror::Error;

/// Errors raised while constructing or traversing terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// Operand widths disagree for a width-homogeneous operation.
    #[error("width mismatch in {op}: {lhs} bits vs {rhs} bits")]
    WidthMismatch {
        op: &'static str,
        lhs: u32,
        rhs: u32,
    },

    /// Zero-width bit-vectors do not exist.
    #[error("bit-vector width must be nonzero")]
    ZeroWidth,

    /// A constant value needs more bits than the requested width.
    #[error("constant {value} does not fit in {width} bits")]
    ConstantTooWide { value: BigUint, width: u32 },

    /// An upcast may never shrink a value.
    #[error("cannot upcast a {width}-bit value to {target} bits")]
    NarrowingUpcast { width: u32, target: u32 },

    /// Extract bounds must satisfy `lo <= hi < width`.
    #[error("invalid extract [{hi}:{lo}] on a {width}-bit term")]
    InvalidExtract { hi: u32, lo: u32, width: u32 },

    /// The same variable name was used at two different widths.
    #[error("variable {name} used at both {first} bits and {second} bits")]
    InconsistentVariable {
        name: String,
        first: u32,
        second: u32,
    },
}

/// A bit-vector valued term of a fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BvTerm {
    /// A free symbolic variable, implicitly universally quantified by the
    /// proof procedure.
    Var { name: String, width: u32 },
    /// An unsigned constant.
    Const { value: BigUint, width: u32 },
    /// Modular addition.
    Add(Box<BvTerm>, Box<BvTerm>),
    /// Modular subtraction.
    Sub(Box<BvTerm>, Box<BvTerm>),
    /// Modular multiplication.
    Mul(Box<BvTerm>, Box<BvTerm>),
    /// Raw SMT-LIB unsigned division (division by zero yields all-ones).
    UDiv(Box<BvTerm>, Box<BvTerm>),
    /// Bitwise conjunction.
    And(Box<BvTerm>, Box<BvTerm>),
    /// Bitwise disjunction.
    Or(Box<BvTerm>, Box<BvTerm>),
    /// Bitwise complement.
    Not(Box<BvTerm>),
    /// Widening by `extra` zero bits.
    ZeroExtend { extra: u32, inner: Box<BvTerm> },
    /// Bit range `[hi:lo]`, inclusive on both ends.
    Extract {
        hi: u32,
        lo: u32,
        inner: Box<BvTerm>,
    },
    /// If-then-else on a boolean condition.
    Ite {
        cond: Box<BoolTerm>,
        then_term: Box<BvTerm>,
        else_term: Box<BvTerm>,
    },
}

/// A boolean-valued formula over bit-vector terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoolTerm {
    /// Unsigned strictly-greater-than.
    Ugt(Box<BvTerm>, Box<BvTerm>),
    /// Unsigned strictly-less-than.
    Ult(Box<BvTerm>, Box<BvTerm>),
    /// Equality.
    Eq(Box<BvTerm>, Box<BvTerm>),
    /// Disequality.
    Ne(Box<BvTerm>, Box<BvTerm>),
    /// Negation.
    Not(Box<BoolTerm>),
    /// Conjunction.
    And(Box<BoolTerm>, Box<BoolTerm>),
    /// Disjunction.
    Or(Box<BoolTerm>, Box<BoolTerm>),
}

fn check_widths(op: &'static str, lhs: &BvTerm, rhs: &BvTerm) -> Result<(), TermError> {
    if lhs.width() != rhs.width() {
        return Err(TermError::WidthMismatch {
            op,
            lhs: lhs.width(),
            rhs: rhs.width(),
        });
    }
    Ok(())
}

impl BvTerm {
    /// Declare a fresh symbolic variable of the given width.
    pub fn var(name: impl Into<String>, width: u32) -> Result<Self, TermError> {
        if width == 0 {
            return Err(TermError::ZeroWidth);
        }
        Ok(BvTerm::Var {
            name: name.into(),
            width,
        })
    }

    /// An unsigned constant of the given width.
    pub fn constant(value: impl Into<BigUint>, width: u32) -> Result<Self, TermError> {
        if width == 0 {
            return Err(TermError::ZeroWidth);
        }
        let value = value.into();
        if value.bits() > u64::from(width) {
            return Err(TermError::ConstantTooWide { value, width });
        }
        Ok(BvTerm::Const { value, width })
    }

    /// The all-zero constant of the given width.
    pub fn zero(width: u32) -> Result<Self, TermError> {
        Self::constant(0u8, width)
    }

    /// The all-ones constant of the given width, i.e. 2^width - 1.
    pub fn all_ones(width: u32) -> Result<Self, TermError> {
        if width == 0 {
            return Err(TermError::ZeroWidth);
        }
        let value = (BigUint::one() << width) - 1u8;
        Ok(BvTerm::Const { value, width })
    }

    pub fn bvadd(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvadd", &lhs, &rhs)?;
        Ok(BvTerm::Add(Box::new(lhs), Box::new(rhs)))
    }

    pub fn bvsub(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvsub", &lhs, &rhs)?;
        Ok(BvTerm::Sub(Box::new(lhs), Box::new(rhs)))
    }

    pub fn bvmul(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvmul", &lhs, &rhs)?;
        Ok(BvTerm::Mul(Box::new(lhs), Box::new(rhs)))
    }

    /// Raw SMT-LIB `bvudiv`. Division by zero yields all-ones here; the
    /// machine's zero-on-zero convention lives in the opcode layer.
    pub fn bvudiv(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvudiv", &lhs, &rhs)?;
        Ok(BvTerm::UDiv(Box::new(lhs), Box::new(rhs)))
    }

    pub fn bvand(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvand", &lhs, &rhs)?;
        Ok(BvTerm::And(Box::new(lhs), Box::new(rhs)))
    }

    pub fn bvor(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvor", &lhs, &rhs)?;
        Ok(BvTerm::Or(Box::new(lhs), Box::new(rhs)))
    }

    pub fn bvnot(inner: BvTerm) -> Self {
        BvTerm::Not(Box::new(inner))
    }

    /// Widen by `extra` zero bits, preserving the unsigned value.
    pub fn zero_extend(self, extra: u32) -> Self {
        if extra == 0 {
            return self;
        }
        BvTerm::ZeroExtend {
            extra,
            inner: Box::new(self),
        }
    }

    /// Bits `[hi:lo]` of `inner`, producing a `hi - lo + 1` bit term.
    pub fn extract(inner: BvTerm, hi: u32, lo: u32) -> Result<Self, TermError> {
        if lo > hi || hi >= inner.width() {
            return Err(TermError::InvalidExtract {
                hi,
                lo,
                width: inner.width(),
            });
        }
        Ok(BvTerm::Extract {
            hi,
            lo,
            inner: Box::new(inner),
        })
    }

    pub fn ite(cond: BoolTerm, then_term: BvTerm, else_term: BvTerm) -> Result<Self, TermError> {
        check_widths("ite", &then_term, &else_term)?;
        Ok(BvTerm::Ite {
            cond: Box::new(cond),
            then_term: Box::new(then_term),
            else_term: Box::new(else_term),
        })
    }

    /// The bit-width of this term.
    pub fn width(&self) -> u32 {
        match self {
            BvTerm::Var { width, .. } | BvTerm::Const { width, .. } => *width,
            BvTerm::Add(lhs, _)
            | BvTerm::Sub(lhs, _)
            | BvTerm::Mul(lhs, _)
            | BvTerm::UDiv(lhs, _)
            | BvTerm::And(lhs, _)
            | BvTerm::Or(lhs, _) => lhs.width(),
            BvTerm::Not(inner) => inner.width(),
            BvTerm::ZeroExtend { extra, inner } => inner.width() + extra,
            BvTerm::Extract { hi, lo, .. } => hi - lo + 1,
            BvTerm::Ite { then_term, .. } => then_term.width(),
        }
    }

    /// The `!= 0` consumption of a machine flag: true iff this term is
    /// nonzero. Panic-free because `width()` is nonzero by construction.
    pub fn is_nonzero(self) -> BoolTerm {
        let width = self.width();
        let zero = BvTerm::Const {
            value: BigUint::from(0u8),
            width,
        };
        BoolTerm::Ne(Box::new(self), Box::new(zero))
    }

    /// Render to SMT-LIB2 text.
    pub fn to_smt2(&self) -> String {
        let mut out = String::new();
        self.write_smt2(&mut out);
        out
    }

    fn write_smt2(&self, out: &mut String) {
        match self {
            BvTerm::Var { name, .. } => out.push_str(name),
            BvTerm::Const { value, width } => {
                let _ = write!(out, "(_ bv{value} {width})");
            }
            BvTerm::Add(lhs, rhs) => write_bin(out, "bvadd", lhs, rhs),
            BvTerm::Sub(lhs, rhs) => write_bin(out, "bvsub", lhs, rhs),
            BvTerm::Mul(lhs, rhs) => write_bin(out, "bvmul", lhs, rhs),
            BvTerm::UDiv(lhs, rhs) => write_bin(out, "bvudiv", lhs, rhs),
            BvTerm::And(lhs, rhs) => write_bin(out, "bvand", lhs, rhs),
            BvTerm::Or(lhs, rhs) => write_bin(out, "bvor", lhs, rhs),
            BvTerm::Not(inner) => {
                out.push_str("(bvnot ");
                inner.write_smt2(out);
                out.push(')');
            }
            BvTerm::ZeroExtend { extra, inner } => {
                let _ = write!(out, "((_ zero_extend {extra}) ");
                inner.write_smt2(out);
                out.push(')');
            }
            BvTerm::Extract { hi, lo, inner } => {
                let _ = write!(out, "((_ extract {hi} {lo}) ");
                inner.write_smt2(out);
                out.push(')');
            }
            BvTerm::Ite {
                cond,
                then_term,
                else_term,
            } => {
                out.push_str("(ite ");
                cond.write_smt2(out);
                out.push(' ');
                then_term.write_smt2(out);
                out.push(' ');
                else_term.write_smt2(out);
                out.push(')');
            }
        }
    }

    /// Collect the free variables of this term, checking that no name is
    /// used at two different widths.
    pub fn collect_vars(&self, vars: &mut BTreeMap<String, u32>) -> Result<(), TermError> {
        match self {
            BvTerm::Var { name, width } => record_var(vars, name, *width),
            BvTerm::Const { .. } => Ok(()),
            BvTerm::Add(lhs, rhs)
            | BvTerm::Sub(lhs, rhs)
            | BvTerm::Mul(lhs, rhs)
            | BvTerm::UDiv(lhs, rhs)
            | BvTerm::And(lhs, rhs)
            | BvTerm::Or(lhs, rhs) => {
                lhs.collect_vars(vars)?;
                rhs.collect_vars(vars)
            }
            BvTerm::Not(inner) => inner.collect_vars(vars),
            BvTerm::ZeroExtend { inner, .. } | BvTerm::Extract { inner, .. } => {
                inner.collect_vars(vars)
            }
            BvTerm::Ite {
                cond,
                then_term,
                else_term,
            } => {
                cond.collect_vars(vars)?;
                then_term.collect_vars(vars)?;
                else_term.collect_vars(vars)
            }
        }
    }
}

impl BoolTerm {
    pub fn ugt(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvugt", &lhs, &rhs)?;
        Ok(BoolTerm::Ugt(Box::new(lhs), Box::new(rhs)))
    }

    pub fn ult(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("bvult", &lhs, &rhs)?;
        Ok(BoolTerm::Ult(Box::new(lhs), Box::new(rhs)))
    }

    pub fn eq(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("=", &lhs, &rhs)?;
        Ok(BoolTerm::Eq(Box::new(lhs), Box::new(rhs)))
    }

    pub fn ne(lhs: BvTerm, rhs: BvTerm) -> Result<Self, TermError> {
        check_widths("distinct", &lhs, &rhs)?;
        Ok(BoolTerm::Ne(Box::new(lhs), Box::new(rhs)))
    }

    pub fn negate(self) -> Self {
        BoolTerm::Not(Box::new(self))
    }

    pub fn and(lhs: BoolTerm, rhs: BoolTerm) -> Self {
        BoolTerm::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: BoolTerm, rhs: BoolTerm) -> Self {
        BoolTerm::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Render to SMT-LIB2 text.
    pub fn to_smt2(&self) -> String {
        let mut out = String::new();
        self.write_smt2(&mut out);
        out
    }

    fn write_smt2(&self, out: &mut String) {
        match self {
            BoolTerm::Ugt(lhs, rhs) => write_bin(out, "bvugt", lhs, rhs),
            BoolTerm::Ult(lhs, rhs) => write_bin(out, "bvult", lhs, rhs),
            BoolTerm::Eq(lhs, rhs) => write_bin(out, "=", lhs, rhs),
            BoolTerm::Ne(lhs, rhs) => write_bin(out, "distinct", lhs, rhs),
            BoolTerm::Not(inner) => {
                out.push_str("(not ");
                inner.write_smt2(out);
                out.push(')');
            }
            BoolTerm::And(lhs, rhs) => {
                out.push_str("(and ");
                lhs.write_smt2(out);
                out.push(' ');
                rhs.write_smt2(out);
                out.push(')');
            }
            BoolTerm::Or(lhs, rhs) => {
                out.push_str("(or ");
                lhs.write_smt2(out);
                out.push(' ');
                rhs.write_smt2(out);
                out.push(')');
            }
        }
    }

    /// Collect the free variables of this formula.
    pub fn collect_vars(&self, vars: &mut BTreeMap<String, u32>) -> Result<(), TermError> {
        match self {
            BoolTerm::Ugt(lhs, rhs)
            | BoolTerm::Ult(lhs, rhs)
            | BoolTerm::Eq(lhs, rhs)
            | BoolTerm::Ne(lhs, rhs) => {
                lhs.collect_vars(vars)?;
                rhs.collect_vars(vars)
            }
            BoolTerm::Not(inner) => inner.collect_vars(vars),
            BoolTerm::And(lhs, rhs) | BoolTerm::Or(lhs, rhs) => {
                lhs.collect_vars(vars)?;
                rhs.collect_vars(vars)
            }
        }
    }
}

fn write_bin(out: &mut String, op: &str, lhs: &BvTerm, rhs: &BvTerm) {
    out.push('(');
    out.push_str(op);
    out.push(' ');
    lhs.write_smt2(out);
    out.push(' ');
    rhs.write_smt2(out);
    out.push(')');
}

fn record_var(vars: &mut BTreeMap<String, u32>, name: &str, width: u32) -> Result<(), TermError> {
    if let Some(&first) = vars.get(name) {
        if first != width {
            return Err(TermError::InconsistentVariable {
                name: name.to_string(),
                first,
                second: width,
            });
        }
        return Ok(());
    }
    vars.insert(name.to_string(), width);
    Ok(())
}
