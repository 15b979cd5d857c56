//! Rates ordered by the fixed credit-rating scale.

use serde::Serialize;

use crate::filter::FilteredView;
use crate::types::{rating_rank, RATING_ORDER};

/// One rated loan's rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedRate {
    /// Rating in the fixed vocabulary
    pub rating: String,
    /// Nominal rate (decimal fraction)
    pub nominal_rate: Option<f64>,
}

/// Rows sorted by rating, with the rating order restricted to present values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingGroups {
    /// Ratings present in the view, in fixed-order sequence
    pub order: Vec<String>,
    /// Rated rows, stably sorted by `order`
    pub rows: Vec<RatedRate>,
}

impl RatingGroups {
    /// Whether no rated row remained.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Drop unrated rows and rows whose rating is outside the vocabulary, then
/// sort by the fixed rating order.
pub fn group_by_rating(view: &FilteredView<'_>) -> RatingGroups {
    let mut ranked: Vec<(usize, RatedRate)> = view
        .iter()
        .filter_map(|record| {
            let rating = record.rating.as_deref()?;
            let rank = rating_rank(rating)?;
            Some((
                rank,
                RatedRate {
                    rating: RATING_ORDER[rank].to_string(),
                    nominal_rate: record.nominal_rate,
                },
            ))
        })
        .collect();

    if ranked.is_empty() {
        return RatingGroups::default();
    }

    ranked.sort_by_key(|(rank, _)| *rank);

    let mut order: Vec<String> = Vec::new();
    for (_, row) in &ranked {
        if order.last() != Some(&row.rating) {
            order.push(row.rating.clone());
        }
    }

    RatingGroups {
        order,
        rows: ranked.into_iter().map(|(_, row)| row).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, Selection};
    use crate::loader::Dataset;
    use crate::types::LoanRecord;

    fn rated(rating: Option<&str>, rate: f64) -> LoanRecord {
        let record = LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "CLP", Some(rate), None);
        match rating {
            Some(r) => record.with_rating(r),
            None => record,
        }
    }

    #[test]
    fn test_order_follows_fixed_scale() {
        let dataset = Dataset::from_records(vec![
            rated(Some("BBB"), 0.08),
            rated(Some("AA-"), 0.05),
            rated(Some("B"), 0.12),
            rated(Some("BBB"), 0.09),
        ]);
        let groups = group_by_rating(&filter(&dataset, &Selection::default()));

        assert_eq!(groups.order, vec!["AA-", "BBB", "B"]);
        let ratings: Vec<_> = groups.rows.iter().map(|r| r.rating.as_str()).collect();
        assert_eq!(ratings, vec!["AA-", "BBB", "BBB", "B"]);
        assert_eq!(groups.rows[1].nominal_rate, Some(0.08));
        assert_eq!(groups.rows[2].nominal_rate, Some(0.09));
    }

    #[test]
    fn test_unrated_and_unknown_ratings_are_dropped() {
        let dataset = Dataset::from_records(vec![
            rated(None, 0.08),
            rated(Some("NR"), 0.05),
            rated(Some("A"), 0.06),
        ]);
        let groups = group_by_rating(&filter(&dataset, &Selection::default()));

        assert_eq!(groups.order, vec!["A"]);
        assert_eq!(groups.rows.len(), 1);
    }

    #[test]
    fn test_no_ratings_is_empty() {
        let dataset = Dataset::from_records(vec![rated(None, 0.08), rated(Some("??"), 0.1)]);
        let groups = group_by_rating(&filter(&dataset, &Selection::default()));
        assert!(groups.is_empty());
        assert!(groups.rows.is_empty());
    }
}
