//! Card components for the dashboard summary and goal progress.

use maud::{Markup, html};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    dashboard::aggregation::{DashboardSummary, GoalProgress},
    endpoints,
    html::{LINK_STYLE, format_currency},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

fn summary_card(label: &str, value: &str, detail: Option<&str>, value_class: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-summary-card=(label)
        {
            p class=(CARD_LABEL_STYLE) { (label) }
            p class={ (CARD_VALUE_STYLE) " " (value_class) } { (value) }

            @if let Some(detail) = detail {
                p class=(CARD_LABEL_STYLE) { (detail) }
            }
        }
    }
}

/// The four headline numbers: income, expenses, balance and the biggest
/// expense category.
pub(super) fn summary_cards_view(summary: &DashboardSummary) -> Markup {
    let balance_class = if summary.balance.is_sign_negative() && !summary.balance.is_zero() {
        "text-red-600 dark:text-red-500"
    } else {
        "text-green-600 dark:text-green-500"
    };

    let (top_category, top_amount) = match summary.top_expense() {
        Some(top) => (top.category.as_str(), top.total),
        None => ("None", Decimal::ZERO),
    };
    let top_amount = format_currency(top_amount);

    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            (summary_card("Total Income", &format_currency(summary.total_income), None, ""))
            (summary_card("Total Expenses", &format_currency(summary.total_expenses), None, ""))
            (summary_card("Balance", &format_currency(summary.balance), None, balance_class))
            (summary_card("Top Expense", top_category, Some(&top_amount), ""))
        }
    }
}

/// Round a percentage for display, e.g. "33%".
///
/// Halves round up. Only a fully funded goal shows "100%".
fn format_percentage(percentage: Decimal) -> String {
    let rounded = percentage.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if percentage < Decimal::ONE_HUNDRED {
        format!("{}%", rounded.min(Decimal::from(99)))
    } else {
        format!("{rounded}%")
    }
}

fn goal_progress_bar(progress: &GoalProgress) -> Markup {
    let percentage = format_percentage(progress.percentage);

    html! {
        li class="space-y-1" data-goal-progress=(progress.name)
        {
            div class="flex justify-between text-sm"
            {
                span class="font-medium" { (progress.name) }
                span class=(CARD_LABEL_STYLE)
                {
                    (percentage) " of " (format_currency(progress.target_amount))
                }
            }

            div
                class="w-full h-2.5 bg-gray-200 rounded-full dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(progress.percentage.round())
                aria-label=(progress.name)
            {
                div class="h-2.5 bg-blue-600 rounded-full" style={ "width: " (percentage) } {}
            }
        }
    }
}

/// Progress bars for each goal in funding order.
pub(super) fn goal_progress_view(goal_progress: &[GoalProgress]) -> Markup {
    html! {
        section class={ (CARD_STYLE) " w-full mb-4" }
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Goals" }
                a href=(endpoints::NEW_GOAL_VIEW) class=(LINK_STYLE) { "Add Goal" }
            }

            @if goal_progress.is_empty() {
                p class=(CARD_LABEL_STYLE) data-empty-state="true"
                {
                    "You have not set any goals yet."
                }
            } @else {
                ul class="space-y-4"
                {
                    @for progress in goal_progress {
                        (goal_progress_bar(progress))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::format_percentage;

    #[test]
    fn percentages_are_rounded() {
        assert_eq!(format_percentage(Decimal::ONE_HUNDRED), "100%");
        assert_eq!(
            format_percentage(Decimal::from_str("33.333333").unwrap()),
            "33%"
        );
        assert_eq!(format_percentage(Decimal::ZERO), "0%");
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(format_percentage(Decimal::from_str("12.5").unwrap()), "13%");
        assert_eq!(format_percentage(Decimal::from_str("0.5").unwrap()), "1%");
    }

    #[test]
    fn unfinished_goals_never_show_complete() {
        assert_eq!(format_percentage(Decimal::from_str("99.6").unwrap()), "99%");
        assert_eq!(format_percentage(Decimal::from_str("99.99").unwrap()), "99%");
    }
}
