//! The ESG dashboard: synthetic industry benchmarks and comparing a company's
//! report against them.

mod benchmark;
mod comparison;
mod handlers;

pub use benchmark::BenchmarkTables;
pub use handlers::{compare_report_endpoint, get_esg_page};
