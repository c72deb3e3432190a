//! Predicate evaluator.
//!
//! Walks the shared predicate AST against a single record. Logical nodes
//! short-circuit left to right; every leaf either yields a boolean or a
//! typed error.

use time::UtcOffset;
use verity_model::{CmpOp, Expr, Func, Predicate, Record, TextOp, Value};

use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::numeric;

/// Evaluate an expression to a value.
pub fn eval_expr(expr: &Expr, record: &Record, config: &EvalConfig) -> Result<Value, EvalError> {
    match expr {
        Expr::Field(id) => Ok(record.field(*id)),

        Expr::Literal(value) => Ok(value.clone()),

        Expr::Arith { op, left, right } => {
            let l = eval_expr(left, record, config)?;
            let r = eval_expr(right, record, config)?;
            numeric::eval_arith(*op, &l, &r)
        }

        Expr::Call { func, arg } => {
            let v = eval_expr(arg, record, config)?;
            eval_call(*func, v, config)
        }
    }
}

fn eval_call(func: Func, value: Value, config: &EvalConfig) -> Result<Value, EvalError> {
    match func {
        Func::ToLower | Func::ToUpper => match value {
            Value::Text(s) => Ok(Value::Text(if func == Func::ToLower {
                s.to_lowercase()
            } else {
                s.to_uppercase()
            })),
            other => Err(EvalError::TypeError {
                message: format!("{}() requires Text, got {}", func.name(), other.type_name()),
            }),
        },

        // Date parts are taken in UTC, as the service stores them.
        Func::Year | Func::Month | Func::Day => match value {
            Value::DateTime(dt) => {
                let utc = dt.to_offset(UtcOffset::UTC);
                let part = match func {
                    Func::Year => i64::from(utc.year()),
                    Func::Month => i64::from(u8::from(utc.month())),
                    _ => i64::from(utc.day()),
                };
                Ok(Value::Int(part))
            }
            other => Err(EvalError::TypeError {
                message: format!(
                    "{}() requires DateTime, got {}",
                    func.name(),
                    other.type_name()
                ),
            }),
        },

        Func::Floor | Func::Ceiling | Func::Round | Func::Sqrt => {
            numeric::eval_numeric_func(func, &value, config.rounding)
        }
    }
}

/// Evaluate a predicate against one record.
pub fn eval_pred(pred: &Predicate, record: &Record, config: &EvalConfig) -> Result<bool, EvalError> {
    match pred {
        Predicate::Always => Ok(true),

        Predicate::Compare { left, op, right } => {
            let l = eval_expr(left, record, config)?;
            let r = eval_expr(right, record, config)?;
            match op {
                CmpOp::Eq => numeric::values_equal(&l, &r),
                CmpOp::Ne => numeric::values_equal(&l, &r).map(|eq| !eq),
                _ => numeric::compare_values(&l, &r, config.collation).map(|o| op.holds(o)),
            }
        }

        Predicate::Text {
            op,
            subject,
            needle,
        } => {
            let v = eval_expr(subject, record, config)?;
            let text = v.as_text().ok_or_else(|| EvalError::TypeError {
                message: format!("{} requires Text, got {}", op.name(), v.type_name()),
            })?;
            Ok(match op {
                TextOp::StartsWith => text.starts_with(needle.as_str()),
                TextOp::EndsWith => text.ends_with(needle.as_str()),
                TextOp::Contains => text.contains(needle.as_str()),
            })
        }

        Predicate::And(left, right) => {
            if !eval_pred(left, record, config)? {
                // Short-circuit: left is false, skip right
                return Ok(false);
            }
            eval_pred(right, record, config)
        }

        Predicate::Or(left, right) => {
            if eval_pred(left, record, config)? {
                // Short-circuit: left is true, skip right
                return Ok(true);
            }
            eval_pred(right, record, config)
        }

        Predicate::Not(operand) => eval_pred(operand, record, config).map(|b| !b),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::macros::datetime;
    use verity_model::predicate::{field, lit};
    use verity_model::FieldId::*;

    fn casablanca() -> Record {
        Record {
            id: None,
            title: "Casablanca".to_string(),
            year: 1942,
            duration: 102,
            rating: "PG".to_string(),
            release_date: datetime!(1943-01-23 0:00 UTC),
            best_picture_winner: true,
        }
    }

    fn eval(p: &Predicate) -> bool {
        eval_pred(p, &casablanca(), &EvalConfig::default()).unwrap()
    }

    #[test]
    fn always_is_true() {
        assert!(eval(&Predicate::Always));
    }

    #[test]
    fn range_and_compound() {
        assert!(eval(&field(Year).ge(1930).and(field(Year).lt(1950))));
        assert!(!eval(&field(Year).gt(1989).and(field(Year).lt(2000))));
        let thirties_or_forties = field(Year)
            .ge(1930)
            .and(field(Year).lt(1940))
            .or(field(Year).ge(1940).and(field(Year).lt(1950)));
        assert!(eval(&thirties_or_forties));
    }

    #[test]
    fn arithmetic_inside_predicate() {
        assert!(eval(&field(Year).sub(1900).ge(40)));
        assert!(eval(&field(Year).add(10).lt(2000)));
        assert!(!eval(&field(Year).div(Decimal::new(10000, 1)).equals(2)));
    }

    #[test]
    fn string_functions() {
        assert!(eval(&field(Title).starts_with("Casa")));
        assert!(!eval(&field(Title).starts_with("casa")));
        assert!(eval(&field(Title).to_lower().starts_with("casa")));
        assert!(eval(&field(Title).to_upper().contains("BLAN")));
        assert!(eval(&field(Title).to_lower().ends_with("a")));
    }

    #[test]
    fn numeric_functions() {
        // 102 / 60 = 1.7
        let hours = || field(Duration).div(Decimal::new(600, 1));
        assert!(eval(&hours().floor().equals(1)));
        assert!(eval(&hours().ceiling().equals(2)));
        assert!(eval(&hours().round().equals(2)));
    }

    #[test]
    fn date_parts_and_field_to_field_comparison() {
        assert!(eval(&field(ReleaseDate).month().equals(1)));
        assert!(eval(&field(ReleaseDate).day().equals(23)));
        assert!(eval(&field(ReleaseDate).year().differs(field(Year))));
    }

    #[test]
    fn date_parts_use_utc() {
        let mut r = casablanca();
        // 23:30 on Jan 22 at -05:00 is already Jan 23 in UTC.
        r.release_date = datetime!(1943-01-22 23:30 -5);
        let p = field(ReleaseDate).day().equals(23);
        assert!(eval_pred(&p, &r, &EvalConfig::default()).unwrap());
    }

    #[test]
    fn timestamp_equality_is_exact() {
        assert!(eval(&field(ReleaseDate).equals(datetime!(1943-01-23 0:00 UTC))));
        assert!(!eval(&field(ReleaseDate).equals(datetime!(1943-01-23 0:00:01 UTC))));
    }

    #[test]
    fn bool_forms() {
        assert!(eval(&field(BestPictureWinner).equals(true)));
        assert!(eval(&!field(BestPictureWinner).equals(false)));
        assert!(eval(&field(BestPictureWinner).differs(false)));
    }

    #[test]
    fn short_circuit_skips_type_error() {
        let bad = field(Title).gt(1);
        assert!(!eval(&field(Year).lt(0).and(bad.clone())));
        assert!(eval(&field(Year).gt(0).or(bad)));
    }

    #[test]
    fn type_errors_surface() {
        let err = eval_pred(&field(Title).gt(1), &casablanca(), &EvalConfig::default());
        assert!(matches!(err, Err(EvalError::TypeError { .. })));
        let err = eval_pred(
            &lit(1).to_lower().equals("x"),
            &casablanca(),
            &EvalConfig::default(),
        );
        assert!(matches!(err, Err(EvalError::TypeError { .. })));
    }
}
