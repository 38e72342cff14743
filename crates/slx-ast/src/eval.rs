//! Constant-expression evaluation.
//!
//! Folds literal, unary, binary, cast, and constructor expressions to a
//! scalar [`Variant`] at compile time. The evaluator is total: any
//! non-constant input, invalid arithmetic, or overflow yields the caller's
//! fallback instead of an error.

use crate::arena::Handle;
use crate::expr::{Expr, ExprKind};
use crate::program::Program;
use crate::types::{BinaryOp, DataType, UnaryOp, is_boolean_type, is_integral_type, is_real_type};

/// A scalar constant value.
#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
}

impl Variant {
    /// Coerces to boolean: numbers are `true` when non-zero.
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Real(r) => *r != 0.0,
            Self::Str(_) => false,
        }
    }

    /// Coerces to integer; real values truncate toward zero.
    pub fn to_int(&self) -> i64 {
        match self {
            Self::Bool(b) => *b as i64,
            Self::Int(i) => *i,
            Self::Real(r) => r.trunc() as i64,
            Self::Str(_) => 0,
        }
    }

    /// Coerces to real.
    pub fn to_real(&self) -> f64 {
        match self {
            Self::Bool(b) => *b as i64 as f64,
            Self::Int(i) => *i as f64,
            Self::Real(r) => *r,
            Self::Str(_) => 0.0,
        }
    }

    /// Parses a literal token: `true`/`false`, decimal or `0x` integers, and
    /// real numbers, with the usual type suffixes stripped.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "true" => return Some(Self::Bool(true)),
            "false" => return Some(Self::Bool(false)),
            _ => {}
        }

        // Hex first: its digits may end in characters that double as type
        // suffixes ('f').
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            let digits = hex.trim_end_matches(['u', 'U', 'l', 'L']);
            return i64::from_str_radix(digits, 16).ok().map(Self::Int);
        }

        let trimmed = text.trim_end_matches(['f', 'F', 'h', 'H', 'u', 'U', 'l', 'L']);
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return Some(Self::Int(int));
        }
        trimmed.parse::<f64>().ok().map(Self::Real)
    }
}

/// Evaluates an expression to a constant, returning `fallback` on any
/// non-constant input. Never panics, never reports.
pub fn evaluate_or_default(program: &Program, expr: Handle<Expr>, fallback: Variant) -> Variant {
    evaluate(program, expr).unwrap_or(fallback)
}

fn evaluate(program: &Program, expr: Handle<Expr>) -> Option<Variant> {
    match &program.exprs[expr].kind {
        ExprKind::Literal { value, .. } => Variant::parse(value),

        ExprKind::Bracket { expr } => evaluate(program, *expr),

        ExprKind::Unary { op, expr } => {
            let value = evaluate(program, *expr)?;
            fold_unary(*op, value)
        }

        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = evaluate(program, *lhs)?;
            let rhs = evaluate(program, *rhs)?;
            fold_binary(*op, lhs, rhs)
        }

        ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            let condition = evaluate(program, *condition)?;
            if condition.to_bool() {
                evaluate(program, *then_expr)
            } else {
                evaluate(program, *else_expr)
            }
        }

        ExprKind::Cast { target, expr } => {
            let value = evaluate(program, *expr)?;
            Some(cast_to(value, target.base_data_type()))
        }

        ExprKind::Call(call) => {
            // Single-argument type constructors behave like casts; anything
            // else is not a constant.
            let ctor = call.type_ctor.as_ref()?;
            if call.arguments.len() != 1 {
                return None;
            }
            let value = evaluate(program, call.arguments[0])?;
            Some(cast_to(value, ctor.base_data_type()))
        }

        _ => None,
    }
}

fn cast_to(value: Variant, target: DataType) -> Variant {
    if is_boolean_type(target) {
        Variant::Bool(value.to_bool())
    } else if is_integral_type(target) {
        Variant::Int(value.to_int())
    } else if is_real_type(target) {
        Variant::Real(value.to_real())
    } else {
        value
    }
}

fn fold_unary(op: UnaryOp, value: Variant) -> Option<Variant> {
    match (op, value) {
        (UnaryOp::Nop, value) => Some(value),
        (UnaryOp::LogicalNot, value) => Some(Variant::Bool(!value.to_bool())),
        (UnaryOp::Negate, Variant::Int(i)) => Some(Variant::Int(i.checked_neg()?)),
        (UnaryOp::Negate, Variant::Real(r)) => Some(Variant::Real(-r)),
        (UnaryOp::Not, Variant::Int(i)) => Some(Variant::Int(!i)),
        // ++/-- need an l-value and string operands have no arithmetic.
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, lhs: Variant, rhs: Variant) -> Option<Variant> {
    use Variant::*;

    // Promote bool < int < real; strings only compare for equality.
    match (&lhs, &rhs) {
        (Str(a), Str(b)) => {
            return match op {
                BinaryOp::Equal => Some(Bool(a == b)),
                BinaryOp::NotEqual => Some(Bool(a != b)),
                _ => None,
            };
        }
        (Str(_), _) | (_, Str(_)) => return None,
        _ => {}
    }

    if matches!(lhs, Real(_)) || matches!(rhs, Real(_)) {
        fold_real(op, lhs.to_real(), rhs.to_real())
    } else if matches!(lhs, Int(_)) || matches!(rhs, Int(_)) {
        fold_int(op, lhs.to_int(), rhs.to_int())
    } else {
        fold_bool(op, lhs.to_bool(), rhs.to_bool())
    }
}

fn fold_real(op: BinaryOp, l: f64, r: f64) -> Option<Variant> {
    use Variant::{Bool, Real};
    match op {
        BinaryOp::Add => Some(Real(l + r)),
        BinaryOp::Sub => Some(Real(l - r)),
        BinaryOp::Mul => Some(Real(l * r)),
        BinaryOp::Div if r != 0.0 => Some(Real(l / r)),
        BinaryOp::Mod if r != 0.0 => Some(Real(l % r)),
        BinaryOp::Equal => Some(Bool(l == r)),
        BinaryOp::NotEqual => Some(Bool(l != r)),
        BinaryOp::Less => Some(Bool(l < r)),
        BinaryOp::LessEqual => Some(Bool(l <= r)),
        BinaryOp::Greater => Some(Bool(l > r)),
        BinaryOp::GreaterEqual => Some(Bool(l >= r)),
        _ => None,
    }
}

fn fold_int(op: BinaryOp, l: i64, r: i64) -> Option<Variant> {
    use Variant::{Bool, Int};
    match op {
        BinaryOp::Add => Some(Int(l.checked_add(r)?)),
        BinaryOp::Sub => Some(Int(l.checked_sub(r)?)),
        BinaryOp::Mul => Some(Int(l.checked_mul(r)?)),
        BinaryOp::Div => Some(Int(l.checked_div(r)?)),
        BinaryOp::Mod => Some(Int(l.checked_rem(r)?)),
        BinaryOp::Equal => Some(Bool(l == r)),
        BinaryOp::NotEqual => Some(Bool(l != r)),
        BinaryOp::Less => Some(Bool(l < r)),
        BinaryOp::LessEqual => Some(Bool(l <= r)),
        BinaryOp::Greater => Some(Bool(l > r)),
        BinaryOp::GreaterEqual => Some(Bool(l >= r)),
        BinaryOp::And => Some(Int(l & r)),
        BinaryOp::Or => Some(Int(l | r)),
        BinaryOp::Xor => Some(Int(l ^ r)),
        BinaryOp::LShift => Some(Int(l.checked_shl(u32::try_from(r).ok()?)?)),
        BinaryOp::RShift => Some(Int(l.checked_shr(u32::try_from(r).ok()?)?)),
        BinaryOp::LogicalAnd => Some(Bool(l != 0 && r != 0)),
        BinaryOp::LogicalOr => Some(Bool(l != 0 || r != 0)),
    }
}

fn fold_bool(op: BinaryOp, l: bool, r: bool) -> Option<Variant> {
    use Variant::Bool;
    match op {
        BinaryOp::Equal => Some(Bool(l == r)),
        BinaryOp::NotEqual => Some(Bool(l != r)),
        BinaryOp::LogicalAnd => Some(Bool(l && r)),
        BinaryOp::LogicalOr => Some(Bool(l || r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denoter::TypeDenoter;
    use crate::expr::CallExpr;

    fn literal(program: &mut Program, value: &str, ty: DataType) -> Handle<Expr> {
        program.add_expr(ExprKind::literal(value, ty))
    }

    #[test]
    fn parse_literals() {
        assert_eq!(Variant::parse("true"), Some(Variant::Bool(true)));
        assert_eq!(Variant::parse("42"), Some(Variant::Int(42)));
        assert_eq!(Variant::parse("0xFF"), Some(Variant::Int(255)));
        assert_eq!(Variant::parse("1.5"), Some(Variant::Real(1.5)));
        assert_eq!(Variant::parse("2.5f"), Some(Variant::Real(2.5)));
        assert_eq!(Variant::parse("16u"), Some(Variant::Int(16)));
        assert_eq!(Variant::parse("0.5h"), Some(Variant::Real(0.5)));
        assert_eq!(Variant::parse("banana"), None);
    }

    #[test]
    fn truncation_toward_zero() {
        assert_eq!(Variant::Real(2.9).to_int(), 2);
        assert_eq!(Variant::Real(-2.9).to_int(), -2);
    }

    #[test]
    fn folds_arithmetic() {
        let mut program = Program::new();
        let a = literal(&mut program, "6", DataType::Int);
        let b = literal(&mut program, "7", DataType::Int);
        let mul = program.add_expr(ExprKind::Binary {
            op: BinaryOp::Mul,
            lhs: a,
            rhs: b,
        });
        assert_eq!(
            evaluate_or_default(&program, mul, Variant::Int(0)),
            Variant::Int(42)
        );
    }

    #[test]
    fn promotes_int_to_real() {
        let mut program = Program::new();
        let a = literal(&mut program, "1", DataType::Int);
        let b = literal(&mut program, "0.5", DataType::Float);
        let add = program.add_expr(ExprKind::Binary {
            op: BinaryOp::Add,
            lhs: a,
            rhs: b,
        });
        assert_eq!(
            evaluate_or_default(&program, add, Variant::Real(0.0)),
            Variant::Real(1.5)
        );
    }

    #[test]
    fn division_by_zero_falls_back() {
        let mut program = Program::new();
        let a = literal(&mut program, "1", DataType::Int);
        let b = literal(&mut program, "0", DataType::Int);
        let div = program.add_expr(ExprKind::Binary {
            op: BinaryOp::Div,
            lhs: a,
            rhs: b,
        });
        assert_eq!(
            evaluate_or_default(&program, div, Variant::Int(-1)),
            Variant::Int(-1)
        );
    }

    #[test]
    fn overflow_falls_back() {
        let mut program = Program::new();
        let a = literal(&mut program, "9223372036854775807", DataType::Int);
        let b = literal(&mut program, "1", DataType::Int);
        let add = program.add_expr(ExprKind::Binary {
            op: BinaryOp::Add,
            lhs: a,
            rhs: b,
        });
        assert_eq!(
            evaluate_or_default(&program, add, Variant::Int(0)),
            Variant::Int(0)
        );
    }

    #[test]
    fn non_constant_falls_back() {
        let mut program = Program::new();
        let object = program.add_expr(ExprKind::object("x", None));
        assert_eq!(
            evaluate_or_default(&program, object, Variant::Real(0.25)),
            Variant::Real(0.25)
        );
    }

    #[test]
    fn cast_truncates() {
        let mut program = Program::new();
        let value = literal(&mut program, "3.9", DataType::Float);
        let cast = program.add_expr(ExprKind::Cast {
            target: TypeDenoter::Base(DataType::Int),
            expr: value,
        });
        assert_eq!(
            evaluate_or_default(&program, cast, Variant::Int(0)),
            Variant::Int(3)
        );
    }

    #[test]
    fn single_argument_constructor() {
        let mut program = Program::new();
        let value = literal(&mut program, "2", DataType::Int);
        let call = program.add_expr(ExprKind::Call(CallExpr {
            type_ctor: Some(TypeDenoter::Base(DataType::Float)),
            arguments: vec![value],
            ..CallExpr::default()
        }));
        assert_eq!(
            evaluate_or_default(&program, call, Variant::Real(0.0)),
            Variant::Real(2.0)
        );
    }

    #[test]
    fn ternary_selects_constant_branch() {
        let mut program = Program::new();
        let cond = literal(&mut program, "false", DataType::Bool);
        let a = literal(&mut program, "1", DataType::Int);
        let b = literal(&mut program, "2", DataType::Int);
        let ternary = program.add_expr(ExprKind::Ternary {
            condition: cond,
            then_expr: a,
            else_expr: b,
        });
        assert_eq!(
            evaluate_or_default(&program, ternary, Variant::Int(0)),
            Variant::Int(2)
        );
    }
}
