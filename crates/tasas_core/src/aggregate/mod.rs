//! Aggregators over a [`FilteredView`](crate::filter::FilteredView).
//!
//! - `kpi`: headline rate metrics
//! - `currency`: mean rate per (currency, institution), sorted for the bar chart
//! - `rating`: rates ordered by the fixed rating scale, for the box plot
//! - `scatter`: one (amount, rate) pair per row
//!
//! Aggregators never fail. An empty view produces an empty result and an
//! undefined mean produces `None` (or [`KpiResult::NotAvailable`]).

pub mod currency;
pub mod kpi;
pub mod rating;
pub mod scatter;

pub use currency::{group_by_currency_and_institution, CurrencyInstitutionMean};
pub use kpi::{format_pct, summarize, InstitutionRate, KpiCard, KpiResult};
pub use rating::{group_by_rating, RatedRate, RatingGroups};
pub use scatter::{scatter_pairs, ScatterPair};

/// Mean of the defined values, or `None` when there are none.
///
/// Non-finite values count as undefined.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Running sum used while grouping.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub(crate) fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.sum += v;
            self.count += 1;
        }
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_skips_missing_values() {
        let m = mean([Some(0.05), None, Some(0.07), Some(0.09)]).unwrap();
        assert_relative_eq!(m, 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_of_nothing_is_undefined() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([None, None]), None);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let m = mean([Some(f64::NAN), Some(0.05), Some(f64::INFINITY)]).unwrap();
        assert_relative_eq!(m, 0.05, epsilon = 1e-12);
        assert_eq!(mean([Some(f64::NAN)]), None);

        let mut acc = MeanAccumulator::default();
        acc.push(Some(f64::NAN));
        assert_eq!(acc.mean(), None);
    }

    #[test]
    fn test_accumulator_matches_mean() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);
        acc.push(Some(0.08));
        acc.push(None);
        acc.push(Some(0.10));
        assert_relative_eq!(acc.mean().unwrap(), 0.09, epsilon = 1e-12);
    }
}
