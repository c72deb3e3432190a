//! Property tests for the reference evaluator.
//!
//! Datasets are generated, so these exercise the algebra of
//! filter / count / order / page rather than any particular movie list.

use proptest::prelude::*;
use time::macros::datetime;
use verity_eval::{evaluate, EvalConfig, TextCollation};
use verity_model::predicate::field;
use verity_model::{Dataset, FieldId, OrderingPlan, Predicate, QueryDescriptor, Record};

// ──────────────────────────────────────────────
// Strategies
// ──────────────────────────────────────────────

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        "[A-Za-z][A-Za-z ]{0,11}",
        1920i64..2020,
        60i64..240,
        prop::sample::select(vec!["G", "PG", "PG-13", "R", "NC-17"]),
        0i64..36_500,
        any::<bool>(),
    )
        .prop_map(|(title, year, duration, rating, days, winner)| Record {
            id: None,
            title,
            year,
            duration,
            rating: rating.to_string(),
            release_date: datetime!(1920-01-01 0:00 UTC) + time::Duration::days(days),
            best_picture_winner: winner,
        })
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(record_strategy(), 0..40).prop_map(Dataset::new)
}

fn plan_strategy() -> impl Strategy<Value = OrderingPlan> {
    prop::sample::select(OrderingPlan::SUPPORTED.to_vec())
}

fn predicate_strategy() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        Just(Predicate::Always),
        (1920i64..2020).prop_map(|y| field(FieldId::Year).ge(y)),
        (60i64..240).prop_map(|d| field(FieldId::Duration).lt(d)),
        any::<bool>().prop_map(|b| field(FieldId::BestPictureWinner).equals(b)),
        "[a-z]".prop_map(|s| field(FieldId::Title).to_lower().contains(&s)),
        (1920i64..2020, 1i64..30).prop_map(|(y, w)| {
            field(FieldId::Year)
                .ge(y)
                .and(field(FieldId::Year).lt(y + w))
                .or(field(FieldId::Rating).equals("R"))
        }),
    ]
}

fn descriptor(pred: &Predicate, plan: OrderingPlan) -> QueryDescriptor {
    plan.clauses()
        .iter()
        .fold(QueryDescriptor::new().filter(pred.clone()), |d, c| {
            d.order_by(*c)
        })
}

// ──────────────────────────────────────────────
// Properties
// ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn evaluation_is_deterministic(
        data in dataset_strategy(),
        pred in predicate_strategy(),
        plan in plan_strategy(),
    ) {
        let d = descriptor(&pred, plan).include_total_count();
        let config = EvalConfig::default();
        prop_assert_eq!(evaluate(&d, &data, &config), evaluate(&d, &data, &config));
    }

    #[test]
    fn paging_is_a_window_over_the_ordered_result(
        data in dataset_strategy(),
        pred in predicate_strategy(),
        plan in plan_strategy(),
        skip in 0i64..50,
        take in 0i64..50,
    ) {
        let config = EvalConfig::default();
        let full = evaluate(&descriptor(&pred, plan), &data, &config).unwrap();
        let paged = evaluate(&descriptor(&pred, plan).skip(skip).take(take), &data, &config).unwrap();

        let expected: Vec<Record> = full
            .records
            .into_iter()
            .skip(skip as usize)
            .take(take as usize)
            .collect();
        prop_assert_eq!(paged.records, expected);
    }

    #[test]
    fn unordered_paging_is_a_plain_slice(
        data in dataset_strategy(),
        skip in 0i64..50,
        take in 0i64..50,
    ) {
        let d = QueryDescriptor::new().skip(skip).take(take);
        let paged = evaluate(&d, &data, &EvalConfig::default()).unwrap();

        let (n, o, l) = (data.len() as i64, skip, take);
        prop_assert_eq!(paged.records.len() as i64, 0i64.max(l.min(n - o)));

        let start = (o as usize).min(data.len());
        let slice: Vec<Record> = data.records()[start..]
            .iter()
            .take(l as usize)
            .cloned()
            .collect();
        prop_assert_eq!(paged.records, slice);
    }

    #[test]
    fn total_count_ignores_paging(
        data in dataset_strategy(),
        pred in predicate_strategy(),
        plan in plan_strategy(),
        skip in 0i64..50,
        take in 0i64..50,
    ) {
        let config = EvalConfig::default();
        let unpaged = evaluate(&descriptor(&pred, plan), &data, &config).unwrap();
        let paged = evaluate(
            &descriptor(&pred, plan).skip(skip).take(take).include_total_count(),
            &data,
            &config,
        )
        .unwrap();
        prop_assert_eq!(paged.total_count, Some(unpaged.records.len() as u64));
    }

    #[test]
    fn filter_and_its_negation_partition_the_dataset(
        data in dataset_strategy(),
        pred in predicate_strategy(),
    ) {
        let config = EvalConfig::default();
        let yes = evaluate(&QueryDescriptor::new().filter(pred.clone()), &data, &config).unwrap();
        let no = evaluate(&QueryDescriptor::new().filter(!pred), &data, &config).unwrap();
        prop_assert_eq!(yes.records.len() + no.records.len(), data.len());
    }

    #[test]
    fn ordered_results_respect_primary_key(
        data in dataset_strategy(),
        collation in prop::sample::select(vec![TextCollation::CaseInsensitive, TextCollation::Ordinal]),
    ) {
        let config = EvalConfig { collation, ..EvalConfig::default() };
        let d = descriptor(&Predicate::Always, OrderingPlan::YearDesc);
        let out = evaluate(&d, &data, &config).unwrap();
        for pair in out.records.windows(2) {
            prop_assert!(pair[0].year >= pair[1].year);
        }

        let d = descriptor(&Predicate::Always, OrderingPlan::DurationAscTitleAsc);
        let out = evaluate(&d, &data, &config).unwrap();
        for pair in out.records.windows(2) {
            prop_assert!(pair[0].duration <= pair[1].duration);
        }
    }
}
