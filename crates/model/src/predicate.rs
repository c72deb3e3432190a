//! Predicate AST.
//!
//! Filters are plain data so that the local evaluator, the remote
//! translator and the loopback parser all work from one definition.
//! Leaves are comparisons between [`Expr`] values or text matches;
//! interior nodes are `And`, `Or` and `Not`.
//!
//! ```ignore
//! use verity_model::predicate::field;
//! use verity_model::FieldId::Year;
//!
//! let nineties = field(Year).gt(1989).and(field(Year).lt(2000));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::record::FieldId;
use crate::value::Value;

// ──────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Whether a three-way comparison result satisfies this operator.
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CmpOp::Eq => ordering == Equal,
            CmpOp::Ne => ordering != Equal,
            CmpOp::Lt => ordering == Less,
            CmpOp::Le => ordering != Greater,
            CmpOp::Gt => ordering == Greater,
            CmpOp::Ge => ordering != Less,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Closed set of unary functions usable inside a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Func {
    ToLower,
    ToUpper,
    Floor,
    Ceiling,
    Round,
    /// Evaluable locally; the service query language has no square root.
    Sqrt,
    Year,
    Month,
    Day,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::ToLower => "tolower",
            Func::ToUpper => "toupper",
            Func::Floor => "floor",
            Func::Ceiling => "ceiling",
            Func::Round => "round",
            Func::Sqrt => "sqrt",
            Func::Year => "year",
            Func::Month => "month",
            Func::Day => "day",
        }
    }
}

/// Text matching operators. Matching is case-sensitive; case folding is
/// expressed by wrapping the subject in `ToLower`/`ToUpper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
    StartsWith,
    EndsWith,
    Contains,
}

impl TextOp {
    pub fn name(self) -> &'static str {
        match self {
            TextOp::StartsWith => "starts_with",
            TextOp::EndsWith => "ends_with",
            TextOp::Contains => "contains",
        }
    }
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Field(FieldId),
    Literal(Value),
    Arith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: Func,
        arg: Box<Expr>,
    },
}

/// Reference a record field.
pub fn field(id: FieldId) -> Expr {
    Expr::Field(id)
}

/// Wrap a constant.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

impl Expr {
    fn arith(self, op: ArithOp, rhs: impl Into<Expr>) -> Expr {
        Expr::Arith {
            op,
            left: Box::new(self),
            right: Box::new(rhs.into()),
        }
    }

    fn call(self, func: Func) -> Expr {
        Expr::Call {
            func,
            arg: Box::new(self),
        }
    }

    fn compare(self, op: CmpOp, rhs: impl Into<Expr>) -> Predicate {
        Predicate::Compare {
            left: self,
            op,
            right: rhs.into(),
        }
    }

    fn text(self, op: TextOp, needle: &str) -> Predicate {
        Predicate::Text {
            op,
            subject: self,
            needle: needle.to_string(),
        }
    }

    pub fn add(self, rhs: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Add, rhs)
    }

    pub fn sub(self, rhs: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Sub, rhs)
    }

    pub fn mul(self, rhs: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Mul, rhs)
    }

    pub fn div(self, rhs: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Div, rhs)
    }

    pub fn to_lower(self) -> Expr {
        self.call(Func::ToLower)
    }

    pub fn to_upper(self) -> Expr {
        self.call(Func::ToUpper)
    }

    pub fn floor(self) -> Expr {
        self.call(Func::Floor)
    }

    pub fn ceiling(self) -> Expr {
        self.call(Func::Ceiling)
    }

    pub fn round(self) -> Expr {
        self.call(Func::Round)
    }

    pub fn sqrt(self) -> Expr {
        self.call(Func::Sqrt)
    }

    pub fn year(self) -> Expr {
        self.call(Func::Year)
    }

    pub fn month(self) -> Expr {
        self.call(Func::Month)
    }

    pub fn day(self) -> Expr {
        self.call(Func::Day)
    }

    pub fn equals(self, rhs: impl Into<Expr>) -> Predicate {
        self.compare(CmpOp::Eq, rhs)
    }

    pub fn differs(self, rhs: impl Into<Expr>) -> Predicate {
        self.compare(CmpOp::Ne, rhs)
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Predicate {
        self.compare(CmpOp::Lt, rhs)
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Predicate {
        self.compare(CmpOp::Le, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Predicate {
        self.compare(CmpOp::Gt, rhs)
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Predicate {
        self.compare(CmpOp::Ge, rhs)
    }

    pub fn starts_with(self, needle: &str) -> Predicate {
        self.text(TextOp::StartsWith, needle)
    }

    pub fn ends_with(self, needle: &str) -> Predicate {
        self.text(TextOp::EndsWith, needle)
    }

    pub fn contains(self, needle: &str) -> Predicate {
        self.text(TextOp::Contains, needle)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Literal(v)
    }
}

impl From<FieldId> for Expr {
    fn from(f: FieldId) -> Self {
        Expr::Field(f)
    }
}

impl From<i64> for Expr {
    fn from(i: i64) -> Self {
        lit(i)
    }
}

impl From<i32> for Expr {
    fn from(i: i32) -> Self {
        lit(i)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit(b)
    }
}

impl From<Decimal> for Expr {
    fn from(d: Decimal) -> Self {
        lit(d)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit(s)
    }
}

impl From<OffsetDateTime> for Expr {
    fn from(dt: OffsetDateTime) -> Self {
        lit(dt)
    }
}

// ──────────────────────────────────────────────
// Predicates
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Tautology. An absent filter behaves exactly like this.
    Always,
    Compare {
        left: Expr,
        op: CmpOp,
        right: Expr,
    },
    Text {
        op: TextOp,
        subject: Expr,
        needle: String,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

/// Shared tautology returned for descriptors without a filter.
pub static ALWAYS: Predicate = Predicate::Always;

impl Predicate {
    pub fn and(self, rhs: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(rhs))
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

// Readable infix rendering, used in logs and `verity list`.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Field(id) => write!(f, "{}", id),
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Arith { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Call { func, arg } => write!(f, "{}({})", func.name(), arg),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => f.write_str("true"),
            Predicate::Compare { left, op, right } => {
                write!(f, "{} {} {}", left, op.symbol(), right)
            }
            Predicate::Text {
                op,
                subject,
                needle,
            } => write!(f, "{}({}, {:?})", op.name(), subject, needle),
            Predicate::And(l, r) => write!(f, "({} && {})", l, r),
            Predicate::Or(l, r) => write!(f, "({} || {})", l, r),
            Predicate::Not(p) => write!(f, "!({})", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldId::{Title, Year};
    use std::cmp::Ordering;

    #[test]
    fn builder_produces_tree() {
        let p = field(Year).gt(1989).and(field(Year).lt(2000));
        match &p {
            Predicate::And(l, r) => {
                assert_eq!(
                    **l,
                    Predicate::Compare {
                        left: Expr::Field(Year),
                        op: CmpOp::Gt,
                        right: Expr::Literal(Value::Int(1989)),
                    }
                );
                assert!(matches!(**r, Predicate::Compare { op: CmpOp::Lt, .. }));
            }
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn display_is_readable() {
        let p = !field(Title).to_lower().starts_with("the");
        assert_eq!(p.to_string(), "!(starts_with(tolower(title), \"the\"))");
        let q = field(Year).sub(1900).ge(80);
        assert_eq!(q.to_string(), "(year - 1900) >= 80");
    }

    #[test]
    fn cmp_op_holds() {
        assert!(CmpOp::Le.holds(Ordering::Equal));
        assert!(CmpOp::Le.holds(Ordering::Less));
        assert!(!CmpOp::Lt.holds(Ordering::Equal));
        assert!(CmpOp::Ne.holds(Ordering::Greater));
        assert!(!CmpOp::Ge.holds(Ordering::Less));
    }

    #[test]
    fn predicate_serde_is_externally_tagged() {
        let p = field(Year).equals(1994);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "compare": {
                    "left": {"field": "year"},
                    "op": "eq",
                    "right": {"literal": {"type": "Int", "value": 1994}}
                }
            })
        );
        let back: Predicate = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
