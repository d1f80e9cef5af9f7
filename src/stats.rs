//! Aggregates over a loaded [`Dataset`]: descriptive summaries of the
//! numeric columns and per-category means of a numeric column.

use std::collections::BTreeMap;

use num::ToPrimitive;

use crate::error::{AnalysisError, Result};
use crate::records::{Dataset, InsuranceRecord};

/// Arithmetic mean, `0.0` for an empty slice. Values with no `f64`
/// representation count as neither sum nor length.
pub fn mean<T: ToPrimitive + Copy>(values: &[T]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter_map(|v| v.to_f64())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Smallest and largest value. An empty slice has no range and is rejected.
pub fn min_max<T: PartialOrd + Copy>(values: &[T], field: &'static str) -> Result<(T, T)> {
    let (first, rest) = values
        .split_first()
        .ok_or(AnalysisError::EmptyInput { field })?;
    Ok(rest.iter().fold((*first, *first), |(lo, hi), &v| {
        (if v < lo { v } else { lo }, if v > hi { v } else { hi })
    }))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary<T> {
    pub min: T,
    pub max: T,
    pub mean: f64,
}

impl<T: ToPrimitive + PartialOrd + Copy> Summary<T> {
    pub fn of(values: &[T], field: &'static str) -> Result<Self> {
        let (min, max) = min_max(values, field)?;
        Ok(Summary {
            min,
            max,
            mean: mean(values),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub age: Summary<u32>,
    pub bmi: Summary<f64>,
    pub charges: Summary<f64>,
}

impl DescriptiveStats {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        Ok(DescriptiveStats {
            age: Summary::of(&dataset.ages(), "age")?,
            bmi: Summary::of(&dataset.bmis(), "bmi")?,
            charges: Summary::of(&dataset.charges(), "charges")?,
        })
    }
}

fn mean_per_group<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> BTreeMap<K, f64>
where
    K: Ord,
    V: ToPrimitive + Copy,
{
    let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for (key, value) in pairs {
        groups.entry(key).or_default().push(value);
    }
    groups
        .into_iter()
        .map(|(key, values)| (key, mean(&values)))
        .collect()
}

/// Mean of `values[i]` grouped by `keys[i]`. Both slices must have the
/// same length.
pub fn group_means<K, V>(keys: &[K], values: &[V]) -> Result<BTreeMap<K, f64>>
where
    K: Ord + Clone,
    V: ToPrimitive + Copy,
{
    if keys.len() != values.len() {
        return Err(AnalysisError::InvalidInput {
            keys: keys.len(),
            values: values.len(),
        });
    }
    Ok(mean_per_group(keys.iter().cloned().zip(values.iter().copied())))
}

/// Same grouping as [`group_means`], projecting key and value out of each
/// record so the pairing can never drift.
pub fn group_means_by<K, F, G>(records: &[InsuranceRecord], key: F, value: G) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&InsuranceRecord) -> K,
    G: Fn(&InsuranceRecord) -> f64,
{
    mean_per_group(records.iter().map(|r| (key(r), value(r))))
}

pub fn charges_by_smoker(dataset: &Dataset) -> BTreeMap<String, f64> {
    group_means_by(dataset.records(), |r| r.smoker.clone(), |r| r.charges)
}

pub fn charges_by_region(dataset: &Dataset) -> BTreeMap<String, f64> {
    group_means_by(dataset.records(), |r| r.region.clone(), |r| r.charges)
}

/// Dependents are grouped by their decimal text, not by the integer.
pub fn charges_by_children(dataset: &Dataset) -> BTreeMap<String, f64> {
    group_means_by(dataset.records(), |r| r.children.to_string(), |r| r.charges)
}

/// Percentage by which smokers pay more than non-smokers. `None` when the
/// non-smoker mean is zero.
pub fn smoker_premium(smokers: f64, non_smokers: f64) -> Option<f64> {
    if non_smokers == 0.0 {
        return None;
    }
    Some((smokers / non_smokers) * 100.0 - 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokerImpact {
    pub smokers: f64,
    pub non_smokers: f64,
    pub premium: Option<f64>,
}

impl SmokerImpact {
    /// Needs both a "yes" and a "no" group.
    pub fn from_means(means: &BTreeMap<String, f64>) -> Option<Self> {
        let smokers = *means.get("yes")?;
        let non_smokers = *means.get("no")?;
        Some(SmokerImpact {
            smokers,
            non_smokers,
            premium: smoker_premium(smokers, non_smokers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: u32, children: u32, smoker: &str, region: &str, charges: f64) -> InsuranceRecord {
        InsuranceRecord {
            age,
            sex: "female".to_string(),
            bmi: 25.0,
            children,
            smoker: smoker.to_string(),
            region: region.to_string(),
            charges,
        }
    }

    #[test]
    fn mean_is_sum_over_len() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), 3.0);
        assert_eq!(mean(&[18u32, 19, 20]), 19.0);
        assert_eq!(mean::<f64>(&[]), 0.0);
    }

    #[test]
    fn integer_groups_share_the_mean_rules() {
        let means = group_means(&["a", "b", "a"], &[1u32, 4, 2]).unwrap();
        assert_eq!(means["a"], 1.5);
        assert_eq!(means["b"], 4.0);
        assert_eq!(means["a"], mean(&[1u32, 2]));
    }

    #[test]
    fn min_max_rejects_empty_input() {
        assert_eq!(min_max(&[3, 9, 1, 4], "age").unwrap(), (1, 9));
        let err = min_max::<f64>(&[], "bmi").unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput { field: "bmi" }));
    }

    #[test]
    fn summary_combines_range_and_mean() {
        let s = Summary::of(&[10.0, 20.0, 60.0], "charges").unwrap();
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 60.0);
        assert_eq!(s.mean, 30.0);
    }

    #[test]
    fn descriptive_stats_of_empty_dataset_fail() {
        let err = DescriptiveStats::from_dataset(&Dataset::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput { field: "age" }));
    }

    #[test]
    fn groups_values_by_key() {
        let keys = ["yes", "no", "yes", "no", "no"];
        let values = [300.0, 100.0, 500.0, 200.0, 0.0];
        let means = group_means(&keys, &values).unwrap();

        assert_eq!(means.len(), 2);
        assert_eq!(means["yes"], 400.0);
        assert_eq!(means["no"], 100.0);
    }

    #[test]
    fn grouping_ignores_pair_order() {
        let pairs = vec![
            ("north", 500.0),
            ("south", 650.0),
            ("north", 250.0),
            ("east", 700.0),
            ("south", 750.0),
            ("north", 125.0),
        ];
        let (keys, values): (Vec<_>, Vec<_>) = pairs.iter().cloned().unzip();
        let expected = group_means(&keys, &values).unwrap();

        let mut shuffled = pairs.clone();
        shuffled.reverse();
        shuffled.rotate_left(2);
        let (keys, values): (Vec<_>, Vec<_>) = shuffled.into_iter().unzip();
        assert_eq!(group_means(&keys, &values).unwrap(), expected);
    }

    #[test]
    fn mismatched_lengths_are_invalid_input() {
        let err = group_means(&["a", "b"], &[1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { keys: 2, values: 1 }));
    }

    #[test]
    fn record_grouping_matches_parallel_grouping() {
        let records = vec![
            record(30, 0, "no", "northeast", 1000.0),
            record(40, 2, "yes", "southeast", 3000.0),
            record(50, 0, "no", "southeast", 2000.0),
            record(60, 10, "yes", "northeast", 5000.0),
        ];
        let ds = Dataset::new(records);

        let regions: Vec<String> = ds.records().iter().map(|r| r.region.clone()).collect();
        assert_eq!(
            charges_by_region(&ds),
            group_means(&regions, &ds.charges()).unwrap()
        );

        let children = charges_by_children(&ds);
        assert_eq!(children.keys().collect::<Vec<_>>(), vec!["0", "10", "2"]);
        assert_eq!(children["0"], 1500.0);

        let impact = SmokerImpact::from_means(&charges_by_smoker(&ds)).unwrap();
        assert_eq!(impact.smokers, 4000.0);
        assert_eq!(impact.non_smokers, 1500.0);
    }

    #[test]
    fn smoker_impact_needs_both_groups() {
        let mut means = BTreeMap::new();
        means.insert("yes".to_string(), 30000.0);
        assert!(SmokerImpact::from_means(&means).is_none());

        means.insert("no".to_string(), 10000.0);
        let impact = SmokerImpact::from_means(&means).unwrap();
        assert_eq!(impact.premium, Some(200.0));
    }

    #[test]
    fn premium_undefined_for_free_non_smokers() {
        assert_eq!(smoker_premium(100.0, 0.0), None);
        assert_eq!(smoker_premium(150.0, 100.0), Some(50.0));
    }
}
