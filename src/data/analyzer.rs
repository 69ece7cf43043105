//! Sales Analyzer Module
//! Grouped revenue aggregation across product and demographic dimensions.

use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

/// Column names the analyzer expects in an imported dataset.
pub const CATEGORY_COL: &str = "Product_Category";
pub const COUNTRY_COL: &str = "Country";
pub const AGE_COL: &str = "Customer_Age";
pub const REVENUE_COL: &str = "Revenue";

/// Fixed demographic age buckets: half-open ranges, except the last which
/// includes both ends. Ages outside the full span are skipped.
const AGE_BUCKETS: [(f64, f64, &str); 5] = [
    (0.0, 25.0, "<25"),
    (25.0, 35.0, "25-35"),
    (35.0, 45.0, "35-45"),
    (45.0, 55.0, "45-55"),
    (55.0, 100.0, "55+"),
];

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Analysis failed: {0}")]
    Polars(#[from] PolarsError),
}

/// A grouped-and-summed revenue result.
///
/// Entries are `(label, summed revenue)` pairs with unique labels; category
/// and country aggregations are sorted by label, age aggregations follow
/// bucket order. The name tags the grouping dimension and is reused for
/// spreadsheet sheet naming.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    name: String,
    entries: Vec<(String, f64)>,
}

impl Aggregation {
    pub fn new(name: impl Into<String>, entries: Vec<(String, f64)>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Sum over all groups.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a single group's value.
    #[allow(dead_code)]
    pub fn value(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| *value)
    }
}

/// Outcome of age-group aggregation. The age column is optional in imported
/// datasets, so its absence is a normal value rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AgeGroupShare {
    Available(Aggregation),
    Unavailable,
}

/// Revenue aggregation over an imported DataFrame.
pub struct SalesAnalyzer;

impl SalesAnalyzer {
    /// Sum revenue per distinct product category.
    pub fn revenue_by_category(df: &DataFrame) -> Result<Aggregation, AnalyzerError> {
        Self::group_sum(df, CATEGORY_COL, "Category")
    }

    /// Sum revenue per distinct country.
    pub fn revenue_by_country(df: &DataFrame) -> Result<Aggregation, AnalyzerError> {
        Self::group_sum(df, COUNTRY_COL, "Country")
    }

    /// Sum revenue per demographic age bucket.
    ///
    /// Returns `Unavailable` when the dataset has no age column. Null ages
    /// and ages outside the bucket span are skipped; buckets nothing fell
    /// into are omitted from the result.
    pub fn revenue_by_age_group(df: &DataFrame) -> Result<AgeGroupShare, AnalyzerError> {
        let Ok(age_series) = df.column(AGE_COL) else {
            return Ok(AgeGroupShare::Unavailable);
        };

        let ages = age_series.cast(&DataType::Float64)?;
        let ages = ages.f64()?;
        let revenue = df.column(REVENUE_COL)?.cast(&DataType::Float64)?;
        let revenue = revenue.f64()?;

        let mut sums = [0.0f64; AGE_BUCKETS.len()];
        let mut seen = [false; AGE_BUCKETS.len()];

        for i in 0..df.height() {
            if let (Some(age), Some(value)) = (ages.get(i), revenue.get(i)) {
                if value.is_nan() {
                    continue;
                }
                if let Some(bucket) = Self::age_bucket(age) {
                    sums[bucket] += value;
                    seen[bucket] = true;
                }
            }
        }

        let entries: Vec<(String, f64)> = AGE_BUCKETS
            .iter()
            .enumerate()
            .filter(|(i, _)| seen[*i])
            .map(|(i, &(_, _, label))| (label.to_string(), sums[i]))
            .collect();

        Ok(AgeGroupShare::Available(Aggregation::new(
            "Age Group",
            entries,
        )))
    }

    /// Grand total of the revenue column.
    pub fn total_revenue(df: &DataFrame) -> Result<f64, AnalyzerError> {
        let revenue = df.column(REVENUE_COL)?.cast(&DataType::Float64)?;
        let revenue = revenue.f64()?;

        Ok(revenue
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .sum())
    }

    /// Bucket index for an age, or None when outside every bucket.
    fn age_bucket(age: f64) -> Option<usize> {
        let last = AGE_BUCKETS.len() - 1;
        let (last_lo, last_hi, _) = AGE_BUCKETS[last];
        if age >= last_lo && age <= last_hi {
            return Some(last);
        }
        AGE_BUCKETS
            .iter()
            .position(|&(lo, hi, _)| age >= lo && age < hi)
    }

    /// Sum the revenue column per distinct value of `key_col`, skipping rows
    /// with a null key or missing revenue.
    fn group_sum(
        df: &DataFrame,
        key_col: &str,
        name: &str,
    ) -> Result<Aggregation, AnalyzerError> {
        let keys = df.column(key_col)?;
        let revenue = df.column(REVENUE_COL)?.cast(&DataType::Float64)?;
        let revenue = revenue.f64()?;

        let mut sums: BTreeMap<String, f64> = BTreeMap::new();

        for i in 0..df.height() {
            if let (Ok(key), Some(value)) = (keys.get(i), revenue.get(i)) {
                if key.is_null() || value.is_nan() {
                    continue;
                }
                let label = key.to_string().trim_matches('"').to_string();
                *sums.entry(label).or_insert(0.0) += value;
            }
        }

        Ok(Aggregation::new(name, sums.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                CATEGORY_COL.into(),
                vec!["A".to_string(), "B".to_string(), "A".to_string()],
            ),
            Column::new(
                COUNTRY_COL.into(),
                vec!["US".to_string(), "DE".to_string(), "DE".to_string()],
            ),
            Column::new(AGE_COL.into(), vec![Some(24.9), Some(25.0), Some(100.0)]),
            Column::new(REVENUE_COL.into(), vec![100.0, 300.0, 50.0]),
        ])
        .unwrap()
    }

    #[test]
    fn category_aggregation_matches_example() {
        let df = DataFrame::new(vec![
            Column::new(
                CATEGORY_COL.into(),
                vec!["A".to_string(), "B".to_string()],
            ),
            Column::new(REVENUE_COL.into(), vec![100.0, 300.0]),
        ])
        .unwrap();

        let agg = SalesAnalyzer::revenue_by_category(&df).unwrap();
        assert_eq!(agg.value("A"), Some(100.0));
        assert_eq!(agg.value("B"), Some(300.0));
        assert_eq!(SalesAnalyzer::total_revenue(&df).unwrap(), 400.0);
    }

    #[test]
    fn group_sums_equal_grand_total() {
        let df = sales_df();
        let total = SalesAnalyzer::total_revenue(&df).unwrap();

        let by_category = SalesAnalyzer::revenue_by_category(&df).unwrap();
        let by_country = SalesAnalyzer::revenue_by_country(&df).unwrap();

        assert!((by_category.total() - total).abs() < 1e-9);
        assert!((by_country.total() - total).abs() < 1e-9);
    }

    #[test]
    fn labels_are_sorted_and_unique() {
        let agg = SalesAnalyzer::revenue_by_country(&sales_df()).unwrap();
        let labels: Vec<&str> = agg.entries().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["DE", "US"]);
    }

    #[test]
    fn age_bucket_edges() {
        let AgeGroupShare::Available(agg) =
            SalesAnalyzer::revenue_by_age_group(&sales_df()).unwrap()
        else {
            panic!("age column present");
        };

        // 24.9 -> <25, 25 -> 25-35 (half-open), 100 -> 55+ (last closed)
        assert_eq!(agg.value("<25"), Some(100.0));
        assert_eq!(agg.value("25-35"), Some(300.0));
        assert_eq!(agg.value("55+"), Some(50.0));
        assert_eq!(agg.len(), 3);
    }

    #[test]
    fn out_of_range_ages_are_skipped() {
        let df = DataFrame::new(vec![
            Column::new(AGE_COL.into(), vec![Some(101.0), Some(-1.0), None]),
            Column::new(REVENUE_COL.into(), vec![10.0, 20.0, 30.0]),
        ])
        .unwrap();

        let AgeGroupShare::Available(agg) =
            SalesAnalyzer::revenue_by_age_group(&df).unwrap()
        else {
            panic!("age column present");
        };
        assert!(agg.is_empty());
    }

    #[test]
    fn missing_age_column_is_unavailable() {
        let df = DataFrame::new(vec![
            Column::new(CATEGORY_COL.into(), vec!["A".to_string()]),
            Column::new(REVENUE_COL.into(), vec![100.0]),
        ])
        .unwrap();

        let share = SalesAnalyzer::revenue_by_age_group(&df).unwrap();
        assert_eq!(share, AgeGroupShare::Unavailable);
    }

    #[test]
    fn missing_revenue_column_is_an_error() {
        let df = DataFrame::new(vec![Column::new(
            CATEGORY_COL.into(),
            vec!["A".to_string()],
        )])
        .unwrap();

        assert!(SalesAnalyzer::revenue_by_category(&df).is_err());
        assert!(SalesAnalyzer::total_revenue(&df).is_err());
    }

    #[test]
    fn null_keys_are_skipped() {
        let df = DataFrame::new(vec![
            Column::new(
                CATEGORY_COL.into(),
                vec![Some("A".to_string()), None, Some("A".to_string())],
            ),
            Column::new(REVENUE_COL.into(), vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();

        let agg = SalesAnalyzer::revenue_by_category(&df).unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.value("A"), Some(4.0));
    }
}
