//! Turns a user's transactions and goals into the numbers on the dashboard.
//!
//! The summary holds:
//! - income, expense and balance totals
//! - expenses per category, largest first
//! - expenses per month for the last twelve months
//! - how much of each goal the balance covers
//!
//! Every function here is pure. The caller loads the rows for a single user.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, Month};

use crate::{
    goal::Goal,
    transaction::{Transaction, TransactionType},
};

/// The number of months shown in the monthly expenses chart, including the
/// current month.
pub(super) const MONTHS_IN_WINDOW: usize = 12;

/// The summed expenses for one category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// The summed expenses for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlyTotal {
    /// E.g. "Oct 2026".
    pub label: String,
    pub total: Decimal,
}

/// How much of a goal the balance covers.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct GoalProgress {
    pub name: String,
    pub target_amount: Decimal,
    /// Between 0 and 100 inclusive.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Income minus expenses, may be negative.
    pub balance: Decimal,
    /// Sorted by total descending, then by category.
    pub expense_breakdown: Vec<CategoryTotal>,
    /// Exactly [MONTHS_IN_WINDOW] entries, oldest first.
    pub monthly_expenses: Vec<MonthlyTotal>,
    /// One entry per goal in funding order.
    pub goal_progress: Vec<GoalProgress>,
}

impl DashboardSummary {
    /// The category with the most spending, if there are any expenses.
    pub fn top_expense(&self) -> Option<&CategoryTotal> {
        self.expense_breakdown.first()
    }
}

/// Summarise the transactions and goals of one user as of `today`.
///
/// `goals` must be in funding order, i.e. the order they were created.
pub(super) fn summarize(
    transactions: &[Transaction],
    goals: &[Goal],
    today: Date,
) -> DashboardSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount.as_decimal(),
            TransactionType::Expense => total_expenses += transaction.amount.as_decimal(),
        }
    }

    let balance = total_income - total_expenses;

    DashboardSummary {
        total_income,
        total_expenses,
        balance,
        expense_breakdown: group_expenses_by_category(transactions),
        monthly_expenses: aggregate_monthly_expenses(transactions, today),
        goal_progress: allocate_goal_progress(balance, goals),
    }
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
}

fn group_expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();

    for transaction in expenses(transactions) {
        *totals.entry(transaction.category.as_str()).or_default() +=
            transaction.amount.as_decimal();
    }

    let mut breakdown: Vec<_> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    breakdown
}

/// The `(year, month)` pairs of the last [MONTHS_IN_WINDOW] months ending at
/// the month of `today`, oldest first.
fn month_window(today: Date) -> Vec<(i32, Month)> {
    let mut year = today.year();
    let mut month = today.month();
    let mut window = Vec::with_capacity(MONTHS_IN_WINDOW);

    for _ in 0..MONTHS_IN_WINDOW {
        window.push((year, month));

        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    window.reverse();
    window
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Sum expenses per month over the window ending at `today`.
///
/// Months without expenses are zero. Expenses outside the window are ignored.
fn aggregate_monthly_expenses(transactions: &[Transaction], today: Date) -> Vec<MonthlyTotal> {
    let window = month_window(today);
    let mut totals: HashMap<(i32, Month), Decimal> =
        window.iter().map(|&month| (month, Decimal::ZERO)).collect();

    for transaction in expenses(transactions) {
        let key = (transaction.date.year(), transaction.date.month());

        if let Some(total) = totals.get_mut(&key) {
            *total += transaction.amount.as_decimal();
        }
    }

    window
        .into_iter()
        .map(|(year, month)| MonthlyTotal {
            label: format!("{} {year}", month_abbreviation(month)),
            total: totals.get(&(year, month)).copied().unwrap_or_default(),
        })
        .collect()
}

/// Spend `balance` on each goal in turn until it runs out.
///
/// A goal is fully funded before any money goes to the next one. A goal
/// with a zero target is complete while the remaining balance is not negative.
pub(super) fn allocate_goal_progress(balance: Decimal, goals: &[Goal]) -> Vec<GoalProgress> {
    let hundred = Decimal::ONE_HUNDRED;
    let mut remaining = balance;

    goals
        .iter()
        .map(|goal| {
            let target = goal.target_amount.as_decimal();

            // A zero target never reaches the division below.
            let percentage = if remaining >= target {
                remaining -= target;
                hundred
            } else if remaining > Decimal::ZERO {
                let percentage = remaining / target * hundred;
                remaining = Decimal::ZERO;
                percentage
            } else {
                Decimal::ZERO
            };

            GoalProgress {
                name: goal.name.clone(),
                target_amount: target,
                percentage: percentage.clamp(Decimal::ZERO, hundred),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::{Date, macros::date};

    use crate::{
        goal::Goal,
        money::Amount,
        transaction::{Transaction, TransactionType},
        user::UserID,
    };

    use super::{MONTHS_IN_WINDOW, allocate_goal_progress, summarize};

    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn transaction(
        amount: &str,
        transaction_type: TransactionType,
        category: &str,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            user_id: UserID::new(1),
            title: "test".to_owned(),
            amount: Amount::new(decimal(amount)).unwrap(),
            transaction_type,
            date,
            category: category.to_owned(),
        }
    }

    fn income(amount: &str) -> Transaction {
        transaction(amount, TransactionType::Income, "Salary", date!(2026 - 10 - 01))
    }

    fn expense(amount: &str, category: &str, date: Date) -> Transaction {
        transaction(amount, TransactionType::Expense, category, date)
    }

    fn goal(name: &str, target: &str) -> Goal {
        Goal {
            id: 0,
            user_id: UserID::new(1),
            name: name.to_owned(),
            target_amount: Amount::new(decimal(target)).unwrap(),
            deadline: date!(2027 - 01 - 01),
        }
    }

    fn percentages(balance: &str, goals: &[Goal]) -> Vec<Decimal> {
        allocate_goal_progress(decimal(balance), goals)
            .into_iter()
            .map(|progress| progress.percentage)
            .collect()
    }

    #[test]
    fn summarizes_income_expenses_and_goals() {
        let transactions = [
            income("1000"),
            expense("400", "Rent", date!(2026 - 10 - 02)),
        ];
        let goals = [goal("G1", "500"), goal("G2", "200")];

        let summary = summarize(&transactions, &goals, date!(2026 - 10 - 17));

        assert_eq!(summary.total_income, decimal("1000"));
        assert_eq!(summary.total_expenses, decimal("400"));
        assert_eq!(summary.balance, decimal("600"));
        assert_eq!(summary.goal_progress.len(), 2);
        assert_eq!(summary.goal_progress[0].name, "G1");
        assert_eq!(summary.goal_progress[0].percentage, decimal("100"));
        assert_eq!(summary.goal_progress[1].name, "G2");
        assert_eq!(summary.goal_progress[1].percentage, decimal("50"));
    }

    #[test]
    fn no_goals_gives_no_progress() {
        let summary = summarize(&[income("1000")], &[], date!(2026 - 10 - 17));

        assert!(summary.goal_progress.is_empty());
    }

    #[test]
    fn empty_input_gives_zeroes() {
        let summary = summarize(&[], &[], date!(2026 - 10 - 17));

        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.total_expenses, Decimal::ZERO);
        assert_eq!(summary.balance, Decimal::ZERO);
        assert!(summary.expense_breakdown.is_empty());
        assert_eq!(summary.top_expense(), None);
        assert_eq!(summary.monthly_expenses.len(), MONTHS_IN_WINDOW);
        assert!(
            summary
                .monthly_expenses
                .iter()
                .all(|month| month.total.is_zero())
        );
    }

    #[test]
    fn breakdown_is_sorted_by_total_then_category() {
        let day = date!(2026 - 10 - 01);
        let transactions = [
            expense("10", "Coffee", day),
            expense("50", "Groceries", day),
            expense("25", "Books", day),
            expense("25", "Bills", day),
            expense("15", "Coffee", day),
        ];

        let summary = summarize(&transactions, &[], date!(2026 - 10 - 17));

        let breakdown: Vec<_> = summary
            .expense_breakdown
            .iter()
            .map(|entry| (entry.category.as_str(), entry.total))
            .collect();
        assert_eq!(
            breakdown,
            [
                ("Groceries", decimal("50")),
                ("Bills", decimal("25")),
                ("Books", decimal("25")),
                ("Coffee", decimal("25")),
            ]
        );
        assert_eq!(
            summary.top_expense().map(|top| top.category.as_str()),
            Some("Groceries")
        );
    }

    #[test]
    fn breakdown_sums_to_total_expenses() {
        let transactions = [
            income("3000"),
            expense("12.34", "Coffee", date!(2024 - 01 - 01)),
            expense("100.01", "Rent", date!(2026 - 09 - 30)),
            expense("0.65", "Coffee", date!(2026 - 10 - 17)),
        ];

        let summary = summarize(&transactions, &[], date!(2026 - 10 - 17));

        let breakdown_total: Decimal = summary
            .expense_breakdown
            .iter()
            .map(|entry| entry.total)
            .sum();
        assert_eq!(breakdown_total, summary.total_expenses);
    }

    #[test]
    fn monthly_window_covers_last_twelve_months() {
        let summary = summarize(&[], &[], date!(2026 - 10 - 17));

        let labels: Vec<_> = summary
            .monthly_expenses
            .iter()
            .map(|month| month.label.as_str())
            .collect();
        assert_eq!(
            labels,
            [
                "Nov 2025", "Dec 2025", "Jan 2026", "Feb 2026", "Mar 2026", "Apr 2026",
                "May 2026", "Jun 2026", "Jul 2026", "Aug 2026", "Sep 2026", "Oct 2026",
            ]
        );
    }

    #[test]
    fn monthly_window_handles_january() {
        let summary = summarize(&[], &[], date!(2027 - 01 - 05));

        assert_eq!(summary.monthly_expenses[0].label, "Feb 2026");
        assert_eq!(summary.monthly_expenses[11].label, "Jan 2027");
    }

    #[test]
    fn monthly_totals_skip_income_and_old_expenses() {
        let transactions = [
            income("5000"),
            expense("20", "Coffee", date!(2026 - 10 - 01)),
            expense("30", "Coffee", date!(2026 - 10 - 16)),
            expense("70", "Rent", date!(2025 - 11 - 30)),
            // One month too old for the window.
            expense("999", "Rent", date!(2025 - 10 - 31)),
        ];

        let summary = summarize(&transactions, &[], date!(2026 - 10 - 17));

        assert_eq!(summary.monthly_expenses[0].total, decimal("70"));
        assert_eq!(summary.monthly_expenses[11].total, decimal("50"));
        let window_total: Decimal = summary
            .monthly_expenses
            .iter()
            .map(|month| month.total)
            .sum();
        assert_eq!(window_total, decimal("120"));
        // Still counted in the totals.
        assert_eq!(summary.total_expenses, decimal("1119"));
    }

    #[test]
    fn goals_are_funded_in_order() {
        let goals = [goal("A", "100"), goal("B", "300"), goal("C", "50")];

        assert_eq!(
            percentages("250", &goals),
            [decimal("100"), decimal("50"), decimal("0")]
        );
    }

    #[test]
    fn negative_balance_gives_zero_progress() {
        let goals = [goal("A", "100"), goal("B", "1")];

        assert_eq!(percentages("-40", &goals), [Decimal::ZERO, Decimal::ZERO]);
    }

    #[test]
    fn zero_target_is_complete_without_using_balance() {
        let goals = [goal("Nothing", "0"), goal("Bike", "200")];

        assert_eq!(
            percentages("100", &goals),
            [decimal("100"), decimal("50")]
        );
        assert_eq!(percentages("0", &goals), [decimal("100"), decimal("0")]);
    }

    #[test]
    fn zero_target_gets_nothing_from_negative_balance() {
        let goals = [goal("Nothing", "0"), goal("Bike", "10")];

        assert_eq!(percentages("-50", &goals), [decimal("0"), decimal("0")]);
    }

    #[test]
    fn exact_balance_completes_goal_and_leaves_nothing() {
        let goals = [goal("A", "100"), goal("B", "100")];

        assert_eq!(
            percentages("100", &goals),
            [decimal("100"), Decimal::ZERO]
        );
    }

    #[test]
    fn progress_stays_within_bounds() {
        let goals = [goal("A", "3"), goal("B", "7"), goal("C", "0.01")];

        for balance in ["-5", "0", "1", "2.99", "9.5", "1000"] {
            for percentage in percentages(balance, &goals) {
                assert!(percentage >= Decimal::ZERO && percentage <= Decimal::ONE_HUNDRED);
            }
        }
    }
}
