//! Shared helpers for rendering ECharts charts.
//!
//! Chart options are built with `charming` and serialized to JSON. The HTML
//! contains an empty container per chart and an inline script that initializes
//! ECharts on each container. The script runs when it is inserted, so the same
//! markup works for full pages and htmx partials.

use charming::element::{AxisPointer, AxisPointerType, JsFunction, Tooltip, Trigger};
use maud::{Markup, html};

use crate::html::inline_script;

/// A chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone)]
pub struct ChartView {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the containers for `charts` in a responsive grid.
pub fn charts_view(charts: &[ChartView]) -> Markup {
    html!(
        div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
        {
            @for chart in charts {
                div
                    id=(chart.id)
                    data-chart
                    class="min-h-[380px] rounded dark:bg-gray-100"
                {}
            }
        }
    )
}

/// Generates the script that initializes `charts`, with dark mode support
/// and responsive resizing.
///
/// Must be placed after the chart containers.
pub fn charts_script(charts: &[ChartView]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    inline_script(script_content)
}

/// Formats amounts as Australian dollars. Missing values are shown as "-",
/// zero is formatted like any other amount.
#[inline]
pub fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-AU', {
              style: 'currency',
              currency: 'AUD',
              currencyDisplay: 'symbol'
            });
            return (number == null) ? \"-\" : currencyFormatter.format(number);",
    )
}

/// Creates a tooltip configuration for currency values on an axis chart.
pub fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use scraper::Selector;

    use crate::test_utils::parse_markup;

    use charming::Chart;

    use super::{ChartView, charts_script, charts_view, currency_tooltip};

    fn get_test_charts() -> Vec<ChartView> {
        vec![
            ChartView {
                id: "first-chart",
                options: r#"{"series":[]}"#.to_owned(),
            },
            ChartView {
                id: "second-chart",
                options: r#"{"series":[]}"#.to_owned(),
            },
        ]
    }

    #[test]
    fn renders_container_per_chart() {
        let charts = get_test_charts();

        let html = parse_markup(charts_view(&charts));

        let selector = Selector::parse("div[data-chart]").unwrap();
        let ids: Vec<_> = html
            .select(&selector)
            .filter_map(|element| element.value().id())
            .collect();
        assert_eq!(ids, vec!["first-chart", "second-chart"]);
    }

    #[test]
    fn script_initializes_every_chart_without_escaping_options() {
        let charts = get_test_charts();

        let script = charts_script(&charts).into_string();

        assert!(script.starts_with("<script>"));
        assert!(script.contains(r#"document.getElementById("first-chart")"#));
        assert!(script.contains(r#"document.getElementById("second-chart")"#));
        assert!(script.contains(r#"const option = {"series":[]};"#));
    }

    #[test]
    fn currency_formatter_only_hides_missing_values() {
        let options = Chart::new().tooltip(currency_tooltip()).to_string();

        assert!(options.contains("(number == null) ?"), "{options}");
        assert!(!options.contains("(number) ?"), "{options}");
    }
}
