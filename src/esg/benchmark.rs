//! Synthetic ESG benchmarks per industry.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::Error;

/// The ESG indicators every industry has a benchmark for, in table order.
pub const INDICATORS: [&str; 5] = [
    "Water Consumption",
    "Carbon Emissions",
    "Energy Usage",
    "Waste Generated",
    "Employee Turnover",
];

/// The range benchmark values are drawn from.
const BENCHMARK_RANGE: std::ops::Range<f64> = 10.0..100.0;
/// The largest benchmark after rounding, which must stay below the range end.
const BENCHMARK_MAX: f64 = 99.99;

/// An industry with its own benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Industry {
    Technology,
    Manufacturing,
    Energy,
    Retail,
    Finance,
}

impl Industry {
    pub const ALL: [Industry; 5] = [
        Industry::Technology,
        Industry::Manufacturing,
        Industry::Energy,
        Industry::Retail,
        Industry::Finance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Manufacturing => "Manufacturing",
            Industry::Energy => "Energy",
            Industry::Retail => "Retail",
            Industry::Finance => "Finance",
        }
    }
}

impl Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Industry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Industry::ALL
            .into_iter()
            .find(|industry| industry.label() == s)
            .ok_or_else(|| Error::UnknownIndustry(s.to_owned()))
    }
}

/// The industry average for one indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    pub indicator: String,
    pub value: f64,
}

/// The benchmarks for every industry, generated once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkTables {
    tables: HashMap<Industry, Vec<Benchmark>>,
}

impl BenchmarkTables {
    /// Generate benchmarks for every industry and indicator from `seed`.
    ///
    /// Values are uniform in [10, 100) and rounded to two decimal places. The
    /// same seed always gives the same tables.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let tables = Industry::ALL
            .into_iter()
            .map(|industry| {
                let benchmarks = INDICATORS
                    .iter()
                    .map(|indicator| {
                        let value = round_to_cents(rng.gen_range(BENCHMARK_RANGE));

                        Benchmark {
                            indicator: (*indicator).to_owned(),
                            value: value.min(BENCHMARK_MAX),
                        }
                    })
                    .collect();

                (industry, benchmarks)
            })
            .collect();

        Self { tables }
    }

    /// Create tables from explicit benchmarks.
    pub fn new(tables: impl IntoIterator<Item = (Industry, Vec<Benchmark>)>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
        }
    }

    /// Get the benchmarks for `industry` in table order.
    pub fn for_industry(&self, industry: Industry) -> &[Benchmark] {
        self.tables
            .get(&industry)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Round to two decimal places.
pub(super) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{BenchmarkTables, INDICATORS, Industry};

    #[test]
    fn every_industry_has_every_indicator() {
        let tables = BenchmarkTables::generate(42);

        for industry in Industry::ALL {
            let indicators: Vec<_> = tables
                .for_industry(industry)
                .iter()
                .map(|benchmark| benchmark.indicator.as_str())
                .collect();
            assert_eq!(indicators, INDICATORS, "wrong indicators for {industry}");
        }
    }

    #[test]
    fn values_are_in_range_and_rounded() {
        let tables = BenchmarkTables::generate(7);

        for industry in Industry::ALL {
            for benchmark in tables.for_industry(industry) {
                assert!(
                    (10.0..100.0).contains(&benchmark.value),
                    "{} is out of range",
                    benchmark.value
                );
                let cents = benchmark.value * 100.0;
                assert!((cents - cents.round()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_tables() {
        assert_eq!(BenchmarkTables::generate(42), BenchmarkTables::generate(42));
        assert_ne!(BenchmarkTables::generate(42), BenchmarkTables::generate(43));
    }

    #[test]
    fn parses_industry_labels() {
        assert_eq!(" Energy ".parse::<Industry>(), Ok(Industry::Energy));
        assert_eq!(
            "Mining".parse::<Industry>(),
            Err(Error::UnknownIndustry("Mining".to_owned()))
        );
    }
}
