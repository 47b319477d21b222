//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations of a user's spending:
//! - **Expenses by Category**: pie chart of the expense breakdown
//! - **Monthly Expenses**: bar chart of the last twelve months
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a matching HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{CategoryTotal, MonthlyTotal},
    html::HeadElement,
    money::decimal_to_f64,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Each chart follows the colour scheme of the browser and resizes with
/// the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
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
                chart.id,
                escape_script_json(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Escape the characters that could end an inline `<script>` element early.
///
/// The escapes are still valid inside JSON strings, so the options parse to
/// the same values.
fn escape_script_json(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

pub(super) fn expense_breakdown_chart(breakdown: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|entry| (decimal_to_f64(entry.total), entry.category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by Category")
                .subtext("All time")
                .left(20)
                .top("1%"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

pub(super) fn monthly_expenses_chart(monthly_expenses: &[MonthlyTotal]) -> Chart {
    let labels: Vec<String> = monthly_expenses
        .iter()
        .map(|month| month.label.clone())
        .collect();
    let values: Vec<f64> = monthly_expenses
        .iter()
        .map(|month| decimal_to_f64(month.total))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext("Last twelve months")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Expenses").data(values))
}

#[inline]
/// Embedded in the inline chart script as raw JS, so it must not contain
/// `<`, `>` or `&`.
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use charming::{Chart, element::Tooltip};
    use rust_decimal::Decimal;

    use crate::{
        dashboard::aggregation::{CategoryTotal, MonthlyTotal},
        html::HeadElement,
    };

    use super::{
        DashboardChart, charts_script, currency_formatter, escape_script_json,
        expense_breakdown_chart, monthly_expenses_chart,
    };

    #[test]
    fn breakdown_chart_has_each_category() {
        let breakdown = [
            CategoryTotal {
                category: "Rent".to_owned(),
                total: Decimal::from(400),
            },
            CategoryTotal {
                category: "Coffee".to_owned(),
                total: Decimal::from_str("12.5").unwrap(),
            },
        ];

        let options = expense_breakdown_chart(&breakdown).to_string();

        assert!(options.contains("\"Rent\""));
        assert!(options.contains("\"Coffee\""));
        assert!(options.contains("12.5"));
    }

    #[test]
    fn monthly_chart_has_labels_in_order() {
        let months = [
            MonthlyTotal {
                label: "Sep 2026".to_owned(),
                total: Decimal::ZERO,
            },
            MonthlyTotal {
                label: "Oct 2026".to_owned(),
                total: Decimal::from(30),
            },
        ];

        let options = monthly_expenses_chart(&months).to_string();

        let september = options.find("Sep 2026").unwrap();
        let october = options.find("Oct 2026").unwrap();
        assert!(september < october);
    }

    #[test]
    fn script_initializes_every_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want an inline script");
        };

        assert!(script.0.contains("getElementById(\"first-chart\")"));
        assert!(script.0.contains("getElementById(\"second-chart\")"));
    }

    #[test]
    fn escapes_characters_that_end_a_script() {
        let escaped = escape_script_json(r#"{"name":"</script>&<b>"}"#);

        assert_eq!(
            escaped,
            r#"{"name":"\u003c/script\u003e\u0026\u003cb\u003e"}"#
        );
    }

    #[test]
    fn breakdown_labels_are_escaped_in_script() {
        let breakdown = [CategoryTotal {
            category: "Fish & <Chips>".to_owned(),
            total: Decimal::from(7),
        }];
        let chart = DashboardChart {
            id: "breakdown",
            options: expense_breakdown_chart(&breakdown).to_string(),
        };

        let HeadElement::ScriptSource(script) = charts_script(&[chart]) else {
            panic!("want an inline script");
        };

        assert!(!script.0.contains("<Chips>"));
        assert!(script.0.contains(r#"Fish \u0026 \u003cChips\u003e"#));
    }

    #[test]
    fn currency_formatter_survives_escaping() {
        let options = Chart::new()
            .tooltip(Tooltip::new().value_formatter(currency_formatter()))
            .to_string();

        assert_eq!(escape_script_json(&options), options);
    }
}
