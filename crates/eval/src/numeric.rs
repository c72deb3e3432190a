//! Arithmetic, rounding and comparison over [`Value`]s.
//!
//! Integer arithmetic stays in `i64` with overflow checks. As soon as one
//! operand is a decimal the operation runs in `rust_decimal::Decimal`.
//! No `f64` anywhere in the evaluation path. Integer division truncates
//! toward zero, like the service's integer `div`.

use std::cmp::Ordering;

use rust_decimal::{Decimal, MathematicalOps};
use verity_model::{ArithOp, Func, Value};

use crate::config::{RoundingMode, TextCollation};
use crate::error::EvalError;

/// Apply a binary arithmetic operator.
pub fn eval_arith(op: ArithOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => eval_int_arith(op, *l, *r).map(Value::Int),
        _ => {
            let (l, r) = match (left.as_decimal(), right.as_decimal()) {
                (Some(l), Some(r)) => (l, r),
                _ => {
                    return Err(EvalError::TypeError {
                        message: format!(
                            "operator '{}' requires numeric operands, got {} and {}",
                            op.symbol(),
                            left.type_name(),
                            right.type_name()
                        ),
                    })
                }
            };
            eval_decimal_arith(op, l, r).map(Value::Decimal)
        }
    }
}

fn eval_int_arith(op: ArithOp, l: i64, r: i64) -> Result<i64, EvalError> {
    let result = match op {
        ArithOp::Add => l.checked_add(r),
        ArithOp::Sub => l.checked_sub(r),
        ArithOp::Mul => l.checked_mul(r),
        ArithOp::Div => {
            if r == 0 {
                return Err(EvalError::DivisionByZero {
                    expression: format!("{} / {}", l, r),
                });
            }
            l.checked_div(r)
        }
    };
    result.ok_or_else(|| EvalError::Overflow {
        message: format!("{} {} {}", l, op.symbol(), r),
    })
}

fn eval_decimal_arith(op: ArithOp, l: Decimal, r: Decimal) -> Result<Decimal, EvalError> {
    let result = match op {
        ArithOp::Add => l.checked_add(r),
        ArithOp::Sub => l.checked_sub(r),
        ArithOp::Mul => l.checked_mul(r),
        ArithOp::Div => {
            if r.is_zero() {
                return Err(EvalError::DivisionByZero {
                    expression: format!("{} / {}", l, r),
                });
            }
            l.checked_div(r)
        }
    };
    result.ok_or_else(|| EvalError::Overflow {
        message: format!("{} {} {}", l, op.symbol(), r),
    })
}

/// Evaluate `floor`, `ceiling`, `round` or `sqrt`.
///
/// Integers pass through the rounding functions unchanged. `sqrt`
/// always produces a decimal.
pub fn eval_numeric_func(
    func: Func,
    value: &Value,
    rounding: RoundingMode,
) -> Result<Value, EvalError> {
    if let (Value::Int(i), Func::Floor | Func::Ceiling | Func::Round) = (value, func) {
        return Ok(Value::Int(*i));
    }
    let d = value.as_decimal().ok_or_else(|| EvalError::TypeError {
        message: format!("{}() requires a number, got {}", func.name(), value.type_name()),
    })?;
    let result = match func {
        Func::Floor => d.floor(),
        Func::Ceiling => d.ceil(),
        Func::Round => d.round_dp_with_strategy(0, rounding.strategy()),
        Func::Sqrt => d.sqrt().ok_or_else(|| EvalError::Domain {
            func: "sqrt",
            value: d.to_string(),
        })?,
        other => {
            return Err(EvalError::TypeError {
                message: format!("{}() is not a numeric function", other.name()),
            })
        }
    };
    Ok(Value::Decimal(result))
}

/// Three-way comparison used by relational operators and sorting.
///
/// Numbers compare across `Int`/`Decimal`; timestamps compare by instant;
/// text follows `collation`. Mixed kinds are a type error.
pub fn compare_values(
    left: &Value,
    right: &Value,
    collation: TextCollation,
) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(l.cmp(r)),
        (Value::Text(l), Value::Text(r)) => Ok(compare_text(l, r, collation)),
        (Value::Bool(l), Value::Bool(r)) => Ok(l.cmp(r)),
        (Value::DateTime(l), Value::DateTime(r)) => Ok(l.cmp(r)),
        _ => match (left.as_decimal(), right.as_decimal()) {
            (Some(l), Some(r)) => Ok(l.cmp(&r)),
            _ => Err(mismatch(left, right)),
        },
    }
}

/// Equality used by `==` and `!=`. Text equality is exact.
pub fn values_equal(left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Text(l), Value::Text(r)) => Ok(l == r),
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::DateTime(l), Value::DateTime(r)) => Ok(l == r),
        _ => match (left.as_decimal(), right.as_decimal()) {
            (Some(l), Some(r)) => Ok(l == r),
            _ => Err(mismatch(left, right)),
        },
    }
}

pub fn compare_text(l: &str, r: &str, collation: TextCollation) -> Ordering {
    match collation {
        TextCollation::Ordinal => l.cmp(r),
        TextCollation::CaseInsensitive => l
            .to_lowercase()
            .cmp(&r.to_lowercase())
            .then_with(|| l.cmp(r)),
    }
}

fn mismatch(left: &Value, right: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!(
            "cannot compare {} with {}",
            left.type_name(),
            right.type_name()
        ),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
