//! Descriptor → OData v3 query translation.
//!
//! Every compound expression is parenthesized, so the rendered text never
//! depends on operator precedence. The loopback parser relies on that.

use rust_decimal::Decimal;
use time::{OffsetDateTime, UtcOffset};
use verity_model::{
    ArithOp, CmpOp, Direction, Expr, Func, OrderClause, OrderingPlan, Predicate, QueryDescriptor,
    TextOp, Value,
};

use crate::error::RemoteError;
use crate::query::TableQuery;

/// Translate a descriptor into query parameters.
///
/// Fails without side effects on negative paging, an unsupported
/// ordering, or a predicate the query language cannot express.
pub fn translate(descriptor: &QueryDescriptor) -> Result<TableQuery, RemoteError> {
    let top = non_negative("take", descriptor.limit())?;
    let skip = non_negative("skip", descriptor.offset())?;

    let plan =
        OrderingPlan::resolve(descriptor.ordering()).map_err(|e| RemoteError::NotTranslatable {
            reason: e.to_string(),
        })?;

    let predicate = descriptor.predicate();
    let filter = if predicate.is_always() {
        None
    } else {
        Some(render_predicate(predicate)?)
    };

    Ok(TableQuery {
        filter,
        order_by: plan.map(|p| render_ordering(p.clauses())),
        top,
        skip,
        inline_count: descriptor.wants_total_count(),
    })
}

fn non_negative(name: &str, value: Option<i64>) -> Result<Option<u64>, RemoteError> {
    match value {
        None => Ok(None),
        Some(v) => u64::try_from(v)
            .map(Some)
            .map_err(|_| RemoteError::InvalidArgument {
                reason: format!("{} must be non-negative, got {}", name, v),
            }),
    }
}

pub fn render_ordering(clauses: &[OrderClause]) -> String {
    clauses
        .iter()
        .map(|c| match c.direction {
            Direction::Ascending => c.field.wire_name().to_string(),
            Direction::Descending => format!("{} desc", c.field.wire_name()),
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn render_predicate(pred: &Predicate) -> Result<String, RemoteError> {
    match pred {
        Predicate::Always => Ok("true".to_string()),
        Predicate::Compare { left, op, right } => Ok(format!(
            "({} {} {})",
            render_expr(left)?,
            cmp_keyword(*op),
            render_expr(right)?
        )),
        Predicate::Text {
            op,
            subject,
            needle,
        } => {
            let subject = render_expr(subject)?;
            let needle = render_text(needle);
            Ok(match op {
                TextOp::StartsWith => format!("startswith({},{})", subject, needle),
                TextOp::EndsWith => format!("endswith({},{})", subject, needle),
                TextOp::Contains => format!("substringof({},{})", needle, subject),
            })
        }
        Predicate::And(l, r) => Ok(format!(
            "({} and {})",
            render_predicate(l)?,
            render_predicate(r)?
        )),
        Predicate::Or(l, r) => Ok(format!(
            "({} or {})",
            render_predicate(l)?,
            render_predicate(r)?
        )),
        Predicate::Not(inner) => Ok(format!("not({})", render_predicate(inner)?)),
    }
}

pub fn render_expr(expr: &Expr) -> Result<String, RemoteError> {
    match expr {
        Expr::Field(id) => Ok(id.wire_name().to_string()),
        Expr::Literal(v) => Ok(render_value(v)),
        Expr::Arith { op, left, right } => Ok(format!(
            "({} {} {})",
            render_expr(left)?,
            arith_keyword(*op),
            render_expr(right)?
        )),
        Expr::Call { func, arg } => {
            if *func == Func::Sqrt {
                return Err(RemoteError::NotTranslatable {
                    reason: format!("function '{}' has no query-language equivalent", func.name()),
                });
            }
            Ok(format!("{}({})", func.name(), render_expr(arg)?))
        }
    }
}

pub fn render_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Decimal(d) => render_decimal(*d),
        Value::Text(s) => render_text(s),
        Value::DateTime(dt) => format!("datetime'{}'", render_timestamp(*dt)),
    }
}

// A decimal literal always carries a fractional part so that the service
// does not treat it as an integer.
fn render_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

fn render_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// UTC timestamp with millisecond precision, or nanoseconds when the
/// value carries sub-millisecond digits.
pub fn render_timestamp(dt: OffsetDateTime) -> String {
    let utc = dt.to_offset(UtcOffset::UTC);
    let nanos = utc.nanosecond();
    let fraction = if nanos % 1_000_000 == 0 {
        format!("{:03}", nanos / 1_000_000)
    } else {
        format!("{:09}", nanos)
    };
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        fraction
    )
}

pub(crate) fn cmp_keyword(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "eq",
        CmpOp::Ne => "ne",
        CmpOp::Lt => "lt",
        CmpOp::Le => "le",
        CmpOp::Gt => "gt",
        CmpOp::Ge => "ge",
    }
}

pub(crate) fn arith_keyword(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "add",
        ArithOp::Sub => "sub",
        ArithOp::Mul => "mul",
        ArithOp::Div => "div",
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use verity_model::predicate::field;
    use verity_model::FieldId::*;
    use verity_model::ErrorKind;

    fn filter_of(p: Predicate) -> String {
        translate(&QueryDescriptor::new().filter(p))
            .unwrap()
            .filter
            .unwrap()
    }

    #[test]
    fn empty_descriptor_has_no_parameters() {
        assert_eq!(translate(&QueryDescriptor::new()).unwrap(), TableQuery::default());
        let explicit = QueryDescriptor::new().filter(Predicate::Always);
        assert_eq!(translate(&explicit).unwrap(), TableQuery::default());
    }

    #[test]
    fn range_compound() {
        assert_eq!(
            filter_of(field(Year).gt(1989).and(field(Year).lt(2000))),
            "((year gt 1989) and (year lt 2000))"
        );
    }

    #[test]
    fn arithmetic_and_decimal_literals() {
        assert_eq!(
            filter_of(field(Year).div(Decimal::new(10000, 1)).equals(2)),
            "((year div 1000.0) eq 2)"
        );
        assert_eq!(
            filter_of(field(Year).sub(1900).ge(80)),
            "((year sub 1900) ge 80)"
        );
        assert_eq!(
            filter_of(field(Duration).div(Decimal::new(60, 0)).floor().equals(2)),
            "(floor((duration div 60.0)) eq 2)"
        );
    }

    #[test]
    fn string_functions() {
        assert_eq!(
            filter_of(field(Title).to_lower().starts_with("the")),
            "startswith(tolower(title),'the')"
        );
        assert_eq!(filter_of(field(Title).ends_with("r")), "endswith(title,'r')");
        assert_eq!(
            filter_of(field(Title).contains("father")),
            "substringof('father',title)"
        );
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(
            filter_of(field(Title).equals("Schindler's List")),
            "(title eq 'Schindler''s List')"
        );
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(
            filter_of(field(ReleaseDate).equals(datetime!(1994-10-14 2:00 +2))),
            "(releaseDate eq datetime'1994-10-14T00:00:00.000Z')"
        );
    }

    #[test]
    fn negation_and_nested_always() {
        assert_eq!(
            filter_of(!field(BestPictureWinner).equals(false)),
            "not((bestPictureWinner eq false))"
        );
        assert_eq!(
            filter_of(Predicate::Always.and(field(Year).gt(1))),
            "(true and (year gt 1))"
        );
    }

    #[test]
    fn ordering_and_paging() {
        let d = QueryDescriptor::new()
            .order_by(OrderClause::desc(ReleaseDate))
            .order_by(OrderClause::asc(Title))
            .skip(10)
            .take(5)
            .include_total_count();
        let q = translate(&d).unwrap();
        assert_eq!(q.order_by.as_deref(), Some("releaseDate desc,title"));
        assert_eq!(q.top, Some(5));
        assert_eq!(q.skip, Some(10));
        assert!(q.inline_count);
    }

    #[test]
    fn sqrt_is_not_translatable() {
        let d = QueryDescriptor::new().filter(field(Year).sqrt().gt(43));
        let err = translate(&d).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PredicateNotTranslatable);
    }

    #[test]
    fn negative_paging_is_invalid() {
        let err = translate(&QueryDescriptor::new().skip(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = translate(&QueryDescriptor::new().take(-5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn unsupported_ordering_is_not_translatable() {
        let d = QueryDescriptor::new().order_by(OrderClause::asc(Year));
        assert_eq!(
            translate(&d).unwrap_err().kind(),
            ErrorKind::PredicateNotTranslatable
        );
    }
}
