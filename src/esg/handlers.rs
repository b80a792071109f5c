//! ESG dashboard HTTP handlers and view rendering.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Multipart, Query, State},
    response::{IntoResponse, Response},
};
use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, Emphasis, EmphasisFocus, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    charts::{ChartView, charts_script, charts_view},
    endpoints,
    esg::{
        benchmark::{Benchmark, BenchmarkTables, INDICATORS, Industry},
        comparison::{
            Comparison, ComparisonState, Performance, compare, placeholder_company_values,
        },
    },
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

const COMPARISON_CHART_ID: &str = "esg-comparison-chart";

/// The state needed for the ESG dashboard.
#[derive(Debug, Clone)]
pub struct EsgState {
    /// The benchmarks for each industry.
    pub benchmarks: Arc<BenchmarkTables>,
}

impl FromRef<AppState> for EsgState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            benchmarks: state.benchmarks.clone(),
        }
    }
}

/// The query string for the ESG page.
#[derive(Debug, Default, Deserialize)]
pub struct EsgQuery {
    pub industry: Option<String>,
}

/// The fields of the comparison form.
#[derive(Debug, Default)]
struct CompareForm {
    industry: Option<String>,
    indicators: Vec<String>,
    report: Option<ReportUpload>,
}

/// A submitted report. Only its name and size are used until reports can be
/// read.
#[derive(Debug)]
struct ReportUpload {
    file_name: String,
    size: usize,
}

/// Display the ESG dashboard with the benchmarks for an industry.
pub async fn get_esg_page(
    State(state): State<EsgState>,
    Query(query): Query<EsgQuery>,
) -> Result<Response, Error> {
    let industry = match query.industry.as_deref().map(str::trim) {
        Some(industry) if !industry.is_empty() => industry.parse::<Industry>()?,
        _ => Industry::Technology,
    };

    let benchmarks = state.benchmarks.for_industry(industry);

    Ok(esg_view(industry, benchmarks).into_response())
}

/// Compare a submitted report against the benchmarks for the selected industry.
///
/// Without a report the result says the comparison is waiting for one.
pub async fn compare_report_endpoint(
    State(state): State<EsgState>,
    multipart: Multipart,
) -> Response {
    let form = match read_compare_form(multipart).await {
        Ok(form) => form,
        Err(error) => {
            tracing::error!("Failed to read the ESG comparison form: {error}");
            return error.into_alert_response();
        }
    };

    let industry = match form.industry.as_deref().unwrap_or_default().parse::<Industry>() {
        Ok(industry) => industry,
        Err(error) => return error.into_alert_response(),
    };

    let benchmarks = state.benchmarks.for_industry(industry);
    let comparison = run_comparison(industry, benchmarks, &form);

    comparison_result_view(industry, benchmarks, &comparison).into_response()
}

async fn read_compare_form(mut multipart: Multipart) -> Result<CompareForm, Error> {
    let mut form = CompareForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "industry" => {
                form.industry = Some(read_text(field).await?);
            }
            "indicators" => {
                form.indicators.push(read_text(field).await?);
            }
            "report" => {
                let file_name = field.file_name().unwrap_or("report").to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|error| Error::MultipartError(error.body_text()))?;

                // Browsers send an empty file part when no file was chosen.
                if !data.is_empty() {
                    form.report = Some(ReportUpload {
                        file_name,
                        size: data.len(),
                    });
                }
            }
            _ => tracing::debug!("Ignoring unexpected multipart field \"{name}\""),
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map(|text| text.trim().to_owned())
        .map_err(|error| Error::MultipartError(error.body_text()))
}

fn run_comparison(
    industry: Industry,
    benchmarks: &[Benchmark],
    form: &CompareForm,
) -> ComparisonState {
    let Some(report) = &form.report else {
        return ComparisonState::AwaitingInput;
    };

    tracing::info!(
        "Comparing {} ({} bytes) against the {industry} benchmarks",
        report.file_name,
        report.size
    );

    let company_values = placeholder_company_values(benchmarks, &mut rand::thread_rng());
    let comparison = compare(benchmarks, &form.indicators, &company_values);

    if !comparison.skipped.is_empty() {
        tracing::warn!(
            "Skipped indicators without a {industry} benchmark or company value: {}",
            comparison.skipped.join(", ")
        );
    }

    ComparisonState::Ready(comparison)
}

fn esg_view(industry: Industry, benchmarks: &[Benchmark]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ESG_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full mb-4"
            {
                h1 class="text-2xl font-bold" { "ESG Benchmarks" }
                p class="text-gray-600 dark:text-gray-400"
                {
                    "Compare your sustainability report against industry averages.
                    Lower values are better for every indicator."
                }
            }

            (compare_form(industry))

            div id="esg-result" class="w-full"
            {
                (comparison_result_view(industry, benchmarks, &ComparisonState::AwaitingInput))
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("ESG Benchmarks", &scripts, &content)
}

fn compare_form(selected_industry: Industry) -> Markup {
    html!(
        form
            id="esg-form"
            hx-post=(endpoints::ESG_COMPARE_API)
            hx-encoding="multipart/form-data"
            hx-target="#esg-result"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            class="w-full grid grid-cols-1 md:grid-cols-2 gap-4 mb-4 p-4 rounded-lg bg-gray-100 dark:bg-gray-800"
        {
            div
            {
                label for="industry" class=(FORM_LABEL_STYLE) { "Industry" }
                select id="industry" name="industry" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for industry in Industry::ALL {
                        option value=(industry) selected[industry == selected_industry]
                        {
                            (industry)
                        }
                    }
                }

                label for="report" class={(FORM_LABEL_STYLE) " mt-4"} { "Sustainability report" }
                input
                    type="file"
                    id="report"
                    name="report"
                    accept=".pdf,.txt,.csv"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Indicators" }

                @for indicator in INDICATORS {
                    label class="flex items-center space-x-2 mb-1"
                    {
                        input type="checkbox" name="indicators" value=(indicator) checked;
                        span { (indicator) }
                    }
                }
            }

            div class="md:col-span-2"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Compare" }
            }
        }
    )
}

/// Renders the comparison, or the benchmarks and a prompt to upload a report.
fn comparison_result_view(
    industry: Industry,
    benchmarks: &[Benchmark],
    state: &ComparisonState,
) -> Markup {
    match state {
        ComparisonState::AwaitingInput => html!(
            div id="esg-status"
            {
                (Alert::info(
                    "Awaiting report",
                    &format!("Upload a report to compare it against the {industry} benchmarks."),
                )
                .into_html())
            }

            (benchmark_table(industry, benchmarks))
        ),
        ComparisonState::Ready(comparison) => comparison_view(industry, comparison),
    }
}

fn comparison_view(industry: Industry, comparison: &Comparison) -> Markup {
    let charts = [ChartView {
        id: COMPARISON_CHART_ID,
        options: comparison_chart(industry, comparison).to_string(),
    }];

    html!(
        @if !comparison.skipped.is_empty() {
            div id="esg-status"
            {
                (Alert::info(
                    "Some indicators were skipped",
                    &format!(
                        "There is no benchmark or company value for: {}.",
                        comparison.skipped.join(", ")
                    ),
                )
                .into_html())
            }
        }

        @if comparison.rows.is_empty() {
            p id="esg-empty" class="mb-4" { "Select at least one indicator to compare." }
        } @else {
            section id="charts" class="w-full mx-auto mb-4"
            {
                (charts_view(&charts))
            }

            (comparison_table(industry, comparison))

            (charts_script(&charts))
        }
    )
}

fn benchmark_table(industry: Industry, benchmarks: &[Benchmark]) -> Markup {
    html!(
        section id="benchmarks" class="w-full mb-4"
        {
            h3 class="text-xl font-semibold mb-4" { (industry) " Benchmarks" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Indicator" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Industry Average" }
                        }
                    }

                    tbody
                    {
                        @for benchmark in benchmarks {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (benchmark.indicator) }
                                td class={(TABLE_CELL_STYLE) " text-right"} { (format!("{:.2}", benchmark.value)) }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn comparison_table(industry: Industry, comparison: &Comparison) -> Markup {
    html!(
        section id="comparison" class="w-full mb-4"
        {
            h3 class="text-xl font-semibold mb-4" { "Your Report vs " (industry) " Average" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Indicator" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Industry Average" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Your Company" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Performance" }
                        }
                    }

                    tbody
                    {
                        @for row in &comparison.rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (row.indicator) }
                                td class={(TABLE_CELL_STYLE) " text-right"} { (format!("{:.2}", row.benchmark)) }
                                td class={(TABLE_CELL_STYLE) " text-right"} { (format!("{:.2}", row.company_value)) }
                                td class={(TABLE_CELL_STYLE) " " (performance_style(row.performance))} { (row.performance) }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn performance_style(performance: Performance) -> &'static str {
    match performance {
        Performance::AboveAverage => "text-green-600 dark:text-green-400",
        Performance::NeedsImprovement => "text-red-600 dark:text-red-400",
    }
}

fn comparison_chart(industry: Industry, comparison: &Comparison) -> Chart {
    let labels: Vec<String> = comparison
        .rows
        .iter()
        .map(|row| row.indicator.clone())
        .collect();
    let benchmarks: Vec<f64> = comparison.rows.iter().map(|row| row.benchmark).collect();
    let company_values: Vec<f64> = comparison
        .rows
        .iter()
        .map(|row| row.company_value)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("ESG Comparison")
                .subtext(format!("{industry} industry average, lower is better")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .name("Industry Average")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(benchmarks),
        )
        .series(
            Bar::new()
                .name("Your Company")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(company_values),
        )
}
