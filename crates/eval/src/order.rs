//! Stable multi-key sort for the supported orderings.

use std::cmp::Ordering;

use verity_model::{Direction, FieldId, OrderingPlan, Record, Value};

use crate::config::TextCollation;
use crate::error::EvalError;
use crate::numeric::compare_values;

/// Sort `records` in place by `plan`.
///
/// The sort is stable, so records equal on every key keep their dataset
/// order. Keys are extracted and type-checked up front; a column with
/// values that cannot be compared aborts before anything is reordered.
pub fn sort_records(
    records: &mut [Record],
    plan: OrderingPlan,
    collation: TextCollation,
) -> Result<(), EvalError> {
    let clauses = plan.clauses();
    let keys: Vec<Vec<Value>> = records
        .iter()
        .map(|r| clauses.iter().map(|c| r.field(c.field)).collect())
        .collect();
    for (column, clause) in clauses.iter().enumerate() {
        ensure_comparable(clause.field, keys.iter().map(|k| &k[column]), collation)?;
    }

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        clauses
            .iter()
            .zip(keys[a].iter().zip(&keys[b]))
            .map(|(clause, (left, right))| {
                // Checked above.
                let ord = compare_values(left, right, collation).unwrap_or(Ordering::Equal);
                match clause.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    let sorted: Vec<Record> = order.iter().map(|&i| records[i].clone()).collect();
    records.clone_from_slice(&sorted);
    Ok(())
}

/// Every value in a sort column must compare with the first one.
///
/// Comparability is an equivalence over value kinds (numbers, text,
/// booleans, timestamps), so checking against one representative covers
/// every pair.
fn ensure_comparable<'a>(
    field: FieldId,
    mut column: impl Iterator<Item = &'a Value>,
    collation: TextCollation,
) -> Result<(), EvalError> {
    let Some(first) = column.next() else {
        return Ok(());
    };
    for value in column {
        if compare_values(first, value, collation).is_err() {
            return Err(EvalError::IncomparableKeys {
                field: field.to_string(),
                left: first.to_string(),
                right: value.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn movie(title: &str, year: i64, duration: i64, released: OffsetDateTime) -> Record {
        Record {
            id: None,
            title: title.to_string(),
            year,
            duration,
            rating: "PG".to_string(),
            release_date: released,
            best_picture_winner: false,
        }
    }

    fn titles(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            movie("Pulp Fiction", 1994, 154, datetime!(1994-10-14 0:00 UTC)),
            movie("Alien", 1979, 117, datetime!(1979-05-25 0:00 UTC)),
            movie("The Shawshank Redemption", 1994, 142, datetime!(1994-10-14 0:00 UTC)),
            movie("Babe", 1995, 91, datetime!(1995-08-04 0:00 UTC)),
            movie("Toy Story", 1995, 81, datetime!(1995-11-22 0:00 UTC)),
            movie("Beauty and the Beast", 1991, 84, datetime!(1991-11-22 0:00 UTC)),
        ]
    }

    #[test]
    fn title_ascending() {
        let mut r = sample();
        sort_records(&mut r, OrderingPlan::TitleAsc, TextCollation::default()).unwrap();
        assert_eq!(
            titles(&r),
            vec![
                "Alien",
                "Babe",
                "Beauty and the Beast",
                "Pulp Fiction",
                "The Shawshank Redemption",
                "Toy Story"
            ]
        );
    }

    #[test]
    fn year_descending_is_stable_on_ties() {
        let mut r = sample();
        sort_records(&mut r, OrderingPlan::YearDesc, TextCollation::default()).unwrap();
        // Babe precedes Toy Story and Pulp Fiction precedes Shawshank in the input.
        assert_eq!(
            titles(&r),
            vec![
                "Babe",
                "Toy Story",
                "Pulp Fiction",
                "The Shawshank Redemption",
                "Beauty and the Beast",
                "Alien"
            ]
        );
    }

    #[test]
    fn release_date_ties_break_on_title() {
        let mut r = sample();
        sort_records(
            &mut r,
            OrderingPlan::ReleaseDateDescTitleAsc,
            TextCollation::default(),
        )
        .unwrap();
        assert_eq!(&titles(&r)[..4], &["Toy Story", "Babe", "Pulp Fiction", "The Shawshank Redemption"]);
    }

    #[test]
    fn duration_then_title() {
        let mut r = sample();
        r.push(movie("Aladdin", 1992, 84, datetime!(1992-11-25 0:00 UTC)));
        sort_records(&mut r, OrderingPlan::DurationAscTitleAsc, TextCollation::default()).unwrap();
        assert_eq!(&titles(&r)[..3], &["Toy Story", "Aladdin", "Beauty and the Beast"]);
    }

    #[test]
    fn mixed_key_column_is_rejected() {
        let column = [Value::Int(1994), Value::Text("1995".to_string()), Value::Int(1991)];
        let err = ensure_comparable(FieldId::Year, column.iter(), TextCollation::default()).unwrap_err();
        assert!(matches!(err, EvalError::IncomparableKeys { .. }), "{err}");
    }

    #[test]
    fn numeric_kinds_mix_in_one_column() {
        let column = [
            Value::Int(90),
            Value::Decimal(rust_decimal::Decimal::new(905, 1)),
            Value::Int(91),
        ];
        assert!(ensure_comparable(FieldId::Duration, column.iter(), TextCollation::default()).is_ok());
        assert!(ensure_comparable(FieldId::Duration, std::iter::empty(), TextCollation::default()).is_ok());
    }
}
