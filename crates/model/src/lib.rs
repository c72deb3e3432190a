//! Shared vocabulary for the Verity query oracle: records, the predicate
//! AST, the query descriptor and the supported orderings.

pub mod descriptor;
pub mod kind;
pub mod ordering;
pub mod predicate;
pub mod record;
pub mod value;

pub use descriptor::{Direction, OrderClause, QueryDescriptor};
pub use kind::ErrorKind;
pub use ordering::{OrderingPlan, UnsupportedOrdering};
pub use predicate::{ArithOp, CmpOp, Expr, Func, Predicate, TextOp};
pub use record::{Dataset, FieldId, Record};
pub use value::Value;
