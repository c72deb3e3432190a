//! The named query cases, grouped by what they exercise.

use rust_decimal::Decimal;
use time::macros::datetime;
use verity_model::predicate::field;
use verity_model::FieldId::{BestPictureWinner, Duration, Rating, ReleaseDate, Title, Year};
use verity_model::{ErrorKind, OrderClause, QueryDescriptor};
use verity_oracle::QueryCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    NumericFields,
    StringFunctions,
    NumericFunctions,
    DateFields,
    DateFunctions,
    BoolFields,
    TopAndSkip,
    OrderBy,
    Negative,
    Lookup,
}

impl Family {
    pub const ALL: [Family; 10] = [
        Family::NumericFields,
        Family::StringFunctions,
        Family::NumericFunctions,
        Family::DateFields,
        Family::DateFunctions,
        Family::BoolFields,
        Family::TopAndSkip,
        Family::OrderBy,
        Family::Negative,
        Family::Lookup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::NumericFields => "numeric_fields",
            Family::StringFunctions => "string_functions",
            Family::NumericFunctions => "numeric_functions",
            Family::DateFields => "date_fields",
            Family::DateFunctions => "date_functions",
            Family::BoolFields => "bool_fields",
            Family::TopAndSkip => "top_and_skip",
            Family::OrderBy => "order_by",
            Family::Negative => "negative",
            Family::Lookup => "lookup",
        }
    }
}

fn q() -> QueryDescriptor {
    QueryDescriptor::new()
}

// 60.0, so that the division is decimal rather than integer.
fn sixty() -> Decimal {
    Decimal::new(600, 1)
}

pub fn family_cases(family: Family) -> Vec<QueryCase> {
    match family {
        Family::NumericFields => vec![
            QueryCase::query(
                "year_range_exclusive",
                q().filter(field(Year).gt(1989).and(field(Year).lt(2000))),
            ),
            QueryCase::query(
                "year_range_inclusive",
                q().filter(field(Year).ge(1990).and(field(Year).le(1999))),
            ),
            QueryCase::query(
                "thirties_or_fifties",
                q().filter(
                    field(Year)
                        .ge(1930)
                        .and(field(Year).lt(1940))
                        .or(field(Year).ge(1950).and(field(Year).lt(1960))),
                ),
            ),
            QueryCase::query(
                "division_year_2000_not_rated_r",
                q().filter(
                    field(Year)
                        .div(Decimal::new(10000, 1))
                        .equals(2)
                        .and(field(Rating).differs("R")),
                ),
            ),
            QueryCase::query(
                "eighties_under_two_hours",
                q().filter(
                    field(Year)
                        .sub(1900)
                        .ge(80)
                        .and(field(Year).add(10).lt(2000))
                        .and(field(Duration).lt(120)),
                ),
            ),
        ],

        Family::StringFunctions => vec![
            QueryCase::query(
                "starts_with_the",
                q().filter(field(Title).starts_with("The")).take(100),
            ),
            QueryCase::query(
                "starts_with_the_case_insensitive",
                q().filter(field(Title).to_lower().starts_with("the"))
                    .take(100),
            ),
            QueryCase::query(
                "ends_with_r_case_insensitive",
                q().filter(field(Title).to_lower().ends_with("r")),
            ),
            QueryCase::query(
                "contains_one_case_insensitive",
                q().filter(field(Title).to_upper().contains("ONE")),
            ),
        ],

        Family::NumericFunctions => vec![
            QueryCase::query(
                "floor_over_three_hours",
                q().filter(field(Duration).div(sixty()).floor().ge(3)),
            ),
            QueryCase::query(
                "ceiling_winners_at_most_two_hours",
                q().filter(
                    field(BestPictureWinner)
                        .equals(true)
                        .and(field(Duration).div(sixty()).ceiling().equals(2)),
                ),
            ),
            QueryCase::query(
                "round_winners_over_two_and_a_half_hours",
                q().filter(
                    field(BestPictureWinner)
                        .equals(true)
                        .and(field(Duration).div(sixty()).round().gt(2)),
                ),
            ),
        ],

        Family::DateFields => vec![
            QueryCase::query(
                "released_in_1970",
                q().filter(
                    field(ReleaseDate)
                        .gt(datetime!(1969-12-31 0:00 UTC))
                        .and(field(ReleaseDate).lt(datetime!(1971-01-01 0:00 UTC))),
                ),
            ),
            QueryCase::query(
                "released_in_the_eighties",
                q().filter(
                    field(ReleaseDate)
                        .ge(datetime!(1980-01-01 0:00 UTC))
                        .and(field(ReleaseDate).lt(datetime!(1989-12-31 23:59:59 UTC))),
                ),
            ),
            QueryCase::query(
                "released_on_1994_10_14",
                q().filter(field(ReleaseDate).equals(datetime!(1994-10-14 0:00 UTC))),
            ),
        ],

        Family::DateFunctions => vec![
            QueryCase::query(
                "released_in_november",
                q().filter(field(ReleaseDate).month().equals(11)),
            ),
            QueryCase::query(
                "released_on_first_of_month",
                q().filter(field(ReleaseDate).day().equals(1)),
            ),
            QueryCase::query(
                "release_year_differs_from_year",
                q().filter(field(ReleaseDate).year().differs(field(Year)))
                    .take(100),
            ),
        ],

        Family::BoolFields => vec![
            QueryCase::query(
                "winners_before_1950",
                q().filter(field(Year).lt(1950).and(field(BestPictureWinner).equals(true))),
            ),
            QueryCase::query(
                "winners_since_2000_negated",
                q().filter(
                    field(Year)
                        .ge(2000)
                        .and(!field(BestPictureWinner).equals(false)),
                ),
            ),
            QueryCase::query(
                "winners_since_2000_not_false",
                q().filter(
                    field(BestPictureWinner)
                        .differs(false)
                        .and(field(Year).ge(2000)),
                ),
            ),
        ],

        Family::TopAndSkip => vec![
            QueryCase::query("top_500", q().take(500)),
            QueryCase::query("skip_500", q().skip(500)),
            QueryCase::query(
                "skip_take_count_by_title",
                q().order_by(OrderClause::asc(Title))
                    .skip(10)
                    .take(10)
                    .include_total_count(),
            ),
            QueryCase::query(
                "winners_skip_take_count_by_year_desc",
                q().filter(field(BestPictureWinner).equals(true))
                    .order_by(OrderClause::desc(Year))
                    .skip(10)
                    .take(10)
                    .include_total_count(),
            ),
        ],

        Family::OrderBy => vec![
            QueryCase::query(
                "release_date_desc_then_title",
                q().order_by(OrderClause::desc(ReleaseDate))
                    .order_by(OrderClause::asc(Title))
                    .take(50),
            ),
            QueryCase::query(
                "shortest_since_1970",
                q().filter(field(Year).ge(1970))
                    .order_by(OrderClause::asc(Duration))
                    .order_by(OrderClause::asc(Title))
                    .take(30)
                    .include_total_count(),
            ),
        ],

        Family::Negative => vec![
            QueryCase::query("top_1001", q().filter(field(Year).gt(2000)).take(1001))
                .expecting(ErrorKind::ServiceRejected),
            QueryCase::query("sqrt_not_translatable", q().filter(field(Year).sqrt().gt(43)))
                .expecting(ErrorKind::PredicateNotTranslatable),
            QueryCase::query("negative_skip", q().skip(-1)).expecting(ErrorKind::InvalidArgument),
        ],

        Family::Lookup => vec![
            QueryCase::lookup("lookup_id_-1", -1).expecting(ErrorKind::InvalidArgument),
            QueryCase::lookup("lookup_id_0", 0).expecting(ErrorKind::InvalidArgument),
            QueryCase::lookup("lookup_id_1", 1),
        ],
    }
}

/// Every case, in family order.
pub fn all_cases() -> Vec<QueryCase> {
    Family::ALL.into_iter().flat_map(family_cases).collect()
}

pub fn find(name: &str) -> Option<QueryCase> {
    all_cases().into_iter().find(|c| c.name == name)
}
