//! The closed set of orderings the oracle knows how to request and
//! reproduce.
//!
//! Both evaluators resolve a descriptor's clause list through
//! [`OrderingPlan::resolve`]; an unknown combination is a configuration
//! error and never reaches the service.

use crate::descriptor::OrderClause;
use crate::record::FieldId;

const TITLE_ASC: &[OrderClause] = &[OrderClause::asc(FieldId::Title)];
const YEAR_DESC: &[OrderClause] = &[OrderClause::desc(FieldId::Year)];
const DURATION_ASC_TITLE_ASC: &[OrderClause] = &[
    OrderClause::asc(FieldId::Duration),
    OrderClause::asc(FieldId::Title),
];
const RELEASE_DATE_DESC_TITLE_ASC: &[OrderClause] = &[
    OrderClause::desc(FieldId::ReleaseDate),
    OrderClause::asc(FieldId::Title),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingPlan {
    TitleAsc,
    YearDesc,
    DurationAscTitleAsc,
    ReleaseDateDescTitleAsc,
}

impl OrderingPlan {
    pub const SUPPORTED: [OrderingPlan; 4] = [
        OrderingPlan::TitleAsc,
        OrderingPlan::YearDesc,
        OrderingPlan::DurationAscTitleAsc,
        OrderingPlan::ReleaseDateDescTitleAsc,
    ];

    /// Match a clause list against the supported set.
    ///
    /// An empty list resolves to `None` (no ordering requested).
    pub fn resolve(clauses: &[OrderClause]) -> Result<Option<Self>, UnsupportedOrdering> {
        if clauses.is_empty() {
            return Ok(None);
        }
        Self::SUPPORTED
            .into_iter()
            .find(|plan| plan.clauses() == clauses)
            .map(Some)
            .ok_or_else(|| UnsupportedOrdering {
                clauses: clauses.to_vec(),
            })
    }

    /// Sort keys in priority order.
    pub fn clauses(self) -> &'static [OrderClause] {
        match self {
            OrderingPlan::TitleAsc => TITLE_ASC,
            OrderingPlan::YearDesc => YEAR_DESC,
            OrderingPlan::DurationAscTitleAsc => DURATION_ASC_TITLE_ASC,
            OrderingPlan::ReleaseDateDescTitleAsc => RELEASE_DATE_DESC_TITLE_ASC,
        }
    }
}

/// A clause list outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ordering by [{}] is not supported", render(.clauses))]
pub struct UnsupportedOrdering {
    pub clauses: Vec<OrderClause>,
}

fn render(clauses: &[OrderClause]) -> String {
    clauses
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_plan_resolves_to_itself() {
        for plan in OrderingPlan::SUPPORTED {
            assert_eq!(OrderingPlan::resolve(plan.clauses()), Ok(Some(plan)));
        }
    }

    #[test]
    fn empty_list_means_unordered() {
        assert_eq!(OrderingPlan::resolve(&[]), Ok(None));
    }

    #[test]
    fn direction_matters() {
        let err = OrderingPlan::resolve(&[OrderClause::desc(FieldId::Title)]).unwrap_err();
        assert_eq!(err.to_string(), "ordering by [title desc] is not supported");
    }

    #[test]
    fn pairs_must_match_exactly() {
        let swapped = [
            OrderClause::asc(FieldId::Title),
            OrderClause::asc(FieldId::Duration),
        ];
        assert!(OrderingPlan::resolve(&swapped).is_err());
        let prefix_only = [OrderClause::asc(FieldId::Duration)];
        assert!(OrderingPlan::resolve(&prefix_only).is_err());
    }
}
