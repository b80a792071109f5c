//! Comparing a company's ESG indicators against industry benchmarks.
//!
//! Lower values are better for every indicator, so a company at or below the
//! benchmark is above average.

use std::{collections::HashMap, fmt::Display};

use rand::Rng;

use crate::esg::benchmark::{Benchmark, round_to_cents};

/// The range of the factor applied to benchmarks for stand-in company values.
const PLACEHOLDER_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 0.7..=1.3;

/// How a company's value compares to the industry benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    AboveAverage,
    NeedsImprovement,
}

impl Performance {
    /// Rate `company_value` against `benchmark`.
    pub fn rate(company_value: f64, benchmark: f64) -> Self {
        if company_value <= benchmark {
            Performance::AboveAverage
        } else {
            Performance::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Performance::AboveAverage => "Above Average",
            Performance::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl Display for Performance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One indicator of the comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub indicator: String,
    pub benchmark: f64,
    pub company_value: f64,
    pub performance: Performance,
}

/// The compared indicators and the selected indicators that could not be
/// compared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    /// Rows in benchmark table order.
    pub rows: Vec<ComparisonRow>,
    /// Selected indicators without a benchmark or company value, in the order
    /// they were selected.
    pub skipped: Vec<String>,
}

/// The result shown on the ESG dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonState {
    /// No report has been submitted yet.
    AwaitingInput,
    Ready(Comparison),
}

/// Compare `company_values` against `benchmarks` for the `selected` indicators.
pub fn compare(
    benchmarks: &[Benchmark],
    selected: &[String],
    company_values: &HashMap<String, f64>,
) -> Comparison {
    let rows: Vec<ComparisonRow> = benchmarks
        .iter()
        .filter(|benchmark| selected.contains(&benchmark.indicator))
        .filter_map(|benchmark| {
            let company_value = *company_values.get(&benchmark.indicator)?;

            Some(ComparisonRow {
                indicator: benchmark.indicator.clone(),
                benchmark: benchmark.value,
                company_value,
                performance: Performance::rate(company_value, benchmark.value),
            })
        })
        .collect();

    let mut skipped: Vec<String> = Vec::new();

    for indicator in selected {
        let compared = rows.iter().any(|row| &row.indicator == indicator);

        if !compared && !skipped.contains(indicator) {
            skipped.push(indicator.clone());
        }
    }

    Comparison { rows, skipped }
}

/// Stand-in company values until reports can be read: each benchmark scaled
/// by a random factor in [0.7, 1.3] and rounded to two decimal places.
pub fn placeholder_company_values(
    benchmarks: &[Benchmark],
    rng: &mut impl Rng,
) -> HashMap<String, f64> {
    benchmarks
        .iter()
        .map(|benchmark| {
            let factor = rng.gen_range(PLACEHOLDER_FACTOR_RANGE);
            (
                benchmark.indicator.clone(),
                round_to_cents(benchmark.value * factor),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};

    use crate::esg::benchmark::Benchmark;

    use super::{Comparison, ComparisonRow, Performance, compare, placeholder_company_values};

    fn get_test_benchmarks() -> Vec<Benchmark> {
        vec![
            Benchmark {
                indicator: "Water Consumption".to_owned(),
                value: 40.0,
            },
            Benchmark {
                indicator: "Carbon Emissions".to_owned(),
                value: 75.5,
            },
            Benchmark {
                indicator: "Energy Usage".to_owned(),
                value: 20.0,
            },
        ]
    }

    fn water_only(company_value: f64) -> Comparison {
        compare(
            &get_test_benchmarks(),
            &["Water Consumption".to_owned()],
            &HashMap::from([("Water Consumption".to_owned(), company_value)]),
        )
    }

    #[test]
    fn lower_is_above_average() {
        assert_eq!(
            water_only(35.0).rows,
            vec![ComparisonRow {
                indicator: "Water Consumption".to_owned(),
                benchmark: 40.0,
                company_value: 35.0,
                performance: Performance::AboveAverage,
            }]
        );
    }

    #[test]
    fn higher_needs_improvement() {
        assert_eq!(
            water_only(45.0).rows[0].performance,
            Performance::NeedsImprovement
        );
    }

    #[test]
    fn equal_is_above_average() {
        assert_eq!(water_only(40.0).rows[0].performance, Performance::AboveAverage);
    }

    #[test]
    fn rows_follow_benchmark_order() {
        let selected = vec!["Energy Usage".to_owned(), "Water Consumption".to_owned()];
        let company_values = HashMap::from([
            ("Energy Usage".to_owned(), 30.0),
            ("Water Consumption".to_owned(), 10.0),
        ]);

        let comparison = compare(&get_test_benchmarks(), &selected, &company_values);

        let indicators: Vec<_> = comparison
            .rows
            .iter()
            .map(|row| row.indicator.as_str())
            .collect();
        assert_eq!(indicators, vec!["Water Consumption", "Energy Usage"]);
        assert!(comparison.skipped.is_empty());
    }

    #[test]
    fn reports_indicators_that_cannot_be_compared() {
        let selected = vec![
            "Biodiversity".to_owned(),
            "Carbon Emissions".to_owned(),
            "Water Consumption".to_owned(),
            "Biodiversity".to_owned(),
        ];
        let company_values = HashMap::from([("Water Consumption".to_owned(), 10.0)]);

        let comparison = compare(&get_test_benchmarks(), &selected, &company_values);

        assert_eq!(comparison.rows.len(), 1);
        assert_eq!(
            comparison.skipped,
            vec!["Biodiversity".to_owned(), "Carbon Emissions".to_owned()]
        );
    }

    #[test]
    fn nothing_selected_gives_empty_comparison() {
        let comparison = compare(&get_test_benchmarks(), &[], &HashMap::new());

        assert_eq!(comparison, Comparison::default());
    }

    #[test]
    fn placeholder_values_stay_near_benchmark() {
        let benchmarks = get_test_benchmarks();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let values = placeholder_company_values(&benchmarks, &mut rng);

            assert_eq!(values.len(), benchmarks.len());
            for benchmark in &benchmarks {
                let value = values[&benchmark.indicator];
                assert!(
                    value >= benchmark.value * 0.7 - 0.01 && value <= benchmark.value * 1.3 + 0.01,
                    "{value} is too far from {}",
                    benchmark.value
                );
            }
        }
    }
}
