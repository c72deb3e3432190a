use std::fmt;

use serde::{Deserialize, Serialize};

use crate::predicate::{Predicate, ALWAYS};
use crate::record::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderClause {
    pub field: FieldId,
    pub direction: Direction,
}

impl OrderClause {
    pub const fn asc(field: FieldId) -> Self {
        OrderClause {
            field,
            direction: Direction::Ascending,
        }
    }

    pub const fn desc(field: FieldId) -> Self {
        OrderClause {
            field,
            direction: Direction::Descending,
        }
    }
}

impl fmt::Display for OrderClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        write!(f, "{} {}", self.field, dir)
    }
}

/// Everything one query case asks of the service.
///
/// Built with consuming setters and immutable afterwards. Paging values
/// are signed so that invalid requests can be expressed; validation
/// happens when the descriptor is translated, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<OrderClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    take: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skip: Option<i64>,
    #[serde(default)]
    include_total_count: bool,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Append a sort key. The first call sets the primary key, later
    /// calls add tie-breakers.
    pub fn order_by(mut self, clause: OrderClause) -> Self {
        self.order_by.push(clause);
        self
    }

    pub fn take(mut self, limit: i64) -> Self {
        self.take = Some(limit);
        self
    }

    pub fn skip(mut self, offset: i64) -> Self {
        self.skip = Some(offset);
        self
    }

    pub fn include_total_count(mut self) -> Self {
        self.include_total_count = true;
        self
    }

    /// The effective filter: the explicit predicate, or [`Predicate::Always`].
    pub fn predicate(&self) -> &Predicate {
        self.filter.as_ref().unwrap_or(&ALWAYS)
    }

    pub fn explicit_filter(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub fn ordering(&self) -> &[OrderClause] {
        &self.order_by
    }

    pub fn limit(&self) -> Option<i64> {
        self.take
    }

    pub fn offset(&self) -> Option<i64> {
        self.skip
    }

    pub fn wants_total_count(&self) -> bool {
        self.include_total_count
    }

    /// True when neither ordering nor paging constrains result order.
    pub fn is_unordered(&self) -> bool {
        self.order_by.is_empty() && self.take.is_none() && self.skip.is_none()
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "where {}", self.predicate())?;
        if !self.order_by.is_empty() {
            let keys: Vec<String> = self.order_by.iter().map(|c| c.to_string()).collect();
            write!(f, " order by {}", keys.join(", "))?;
        }
        if let Some(skip) = self.skip {
            write!(f, " skip {}", skip)?;
        }
        if let Some(take) = self.take {
            write!(f, " take {}", take)?;
        }
        if self.include_total_count {
            f.write_str(" with total count")?;
        }
        Ok(())
    }
}
