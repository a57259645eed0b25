//! Grouping logic for the transactions list (calendar months, then days).

use time::{Date, Month};

use super::{core::TransactionType, models::TransactionListItem};

/// Income and expense totals for one calendar month.
#[derive(Debug, PartialEq)]
pub(crate) struct MonthTotals {
    pub(crate) income: f64,
    pub(crate) expenses: f64,
}

/// The transactions posted on a single calendar day.
#[derive(Debug, PartialEq)]
pub(crate) struct DayGroup {
    pub(crate) date: Date,
    pub(crate) transactions: Vec<TransactionListItem>,
}

impl DayGroup {
    /// The label displayed in the day subheader, e.g. "Friday 16".
    pub(crate) fn label(&self) -> String {
        format!("{} {}", self.date.weekday(), self.date.day())
    }
}

/// The transactions posted within a single calendar month, grouped by day.
#[derive(Debug, PartialEq)]
pub(crate) struct MonthGroup {
    pub(crate) year: i32,
    pub(crate) month: Month,
    pub(crate) totals: MonthTotals,
    pub(crate) days: Vec<DayGroup>,
}

impl MonthGroup {
    fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month,
            totals: MonthTotals {
                income: 0.0,
                expenses: 0.0,
            },
            days: Vec::new(),
        }
    }

    /// The label displayed in the month header, e.g. "January 2026".
    pub(crate) fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// Bucket transactions first by calendar month, then by calendar day.
///
/// The input must already be sorted by posted date, the grouping is a single
/// pass that opens a new bucket whenever the month or day changes. Ties within
/// a day keep the query order.
pub(crate) fn group_by_month_and_day(transactions: Vec<TransactionListItem>) -> Vec<MonthGroup> {
    let mut months: Vec<MonthGroup> = Vec::new();

    for transaction in transactions {
        let year = transaction.posted_date.year();
        let month = transaction.posted_date.month();

        let month_group = match months.last_mut() {
            Some(current) if current.year == year && current.month == month => current,
            _ => {
                months.push(MonthGroup::new(year, month));
                months.last_mut().expect("month group just added")
            }
        };

        match transaction.transaction_type {
            TransactionType::Income => month_group.totals.income += transaction.amount,
            TransactionType::Expense => month_group.totals.expenses += transaction.amount,
        }

        let day_group = match month_group.days.last_mut() {
            Some(current) if current.date == transaction.posted_date => current,
            _ => {
                month_group.days.push(DayGroup {
                    date: transaction.posted_date,
                    transactions: Vec::new(),
                });
                month_group.days.last_mut().expect("day group just added")
            }
        };

        day_group.transactions.push(transaction);
    }

    months
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{core::TransactionType, models::TransactionListItem};

    use super::group_by_month_and_day;

    fn item(
        transaction_type: TransactionType,
        amount: f64,
        posted_date: time::Date,
    ) -> TransactionListItem {
        TransactionListItem {
            id: 1,
            transaction_type,
            amount,
            posted_date,
            description: "test".to_owned(),
            notes: String::new(),
            edit_url: "/edit".to_owned(),
            delete_url: "/delete".to_owned(),
        }
    }

    #[test]
    fn splits_groups_at_month_boundaries() {
        let transactions = vec![
            item(TransactionType::Expense, 10.0, date!(2026 - 02 - 01)),
            item(TransactionType::Expense, 20.0, date!(2026 - 01 - 31)),
            item(TransactionType::Expense, 30.0, date!(2026 - 01 - 30)),
        ];

        let months = group_by_month_and_day(transactions);

        assert_eq!(months.len(), 2, "want 2 month groups, got {}", months.len());
        assert_eq!(months[0].label(), "February 2026");
        assert_eq!(months[1].label(), "January 2026");
        assert_eq!(months[1].days.len(), 2);
    }

    #[test]
    fn distinguishes_same_month_in_different_years() {
        let transactions = vec![
            item(TransactionType::Expense, 10.0, date!(2026 - 01 - 01)),
            item(TransactionType::Expense, 20.0, date!(2025 - 01 - 01)),
        ];

        let months = group_by_month_and_day(transactions);

        assert_eq!(months.len(), 2, "want 2 month groups, got {}", months.len());
        assert_eq!(months[0].year, 2026);
        assert_eq!(months[1].year, 2025);
    }

    #[test]
    fn groups_same_day_transactions_together() {
        let day = date!(2026 - 01 - 16);
        let transactions = vec![
            item(TransactionType::Expense, 10.0, day),
            item(TransactionType::Income, 20.0, day),
            item(TransactionType::Expense, 30.0, date!(2026 - 01 - 15)),
        ];

        let months = group_by_month_and_day(transactions);

        assert_eq!(months.len(), 1);
        let days = &months[0].days;
        assert_eq!(days.len(), 2, "want 2 day groups, got {}", days.len());
        assert_eq!(days[0].date, day);
        assert_eq!(days[0].transactions.len(), 2);
        assert_eq!(days[0].label(), "Friday 16");
    }

    #[test]
    fn sums_income_and_expenses_per_month() {
        let transactions = vec![
            item(TransactionType::Income, 1000.0, date!(2026 - 01 - 16)),
            item(TransactionType::Expense, 250.0, date!(2026 - 01 - 15)),
            item(TransactionType::Expense, 50.0, date!(2026 - 01 - 15)),
        ];

        let months = group_by_month_and_day(transactions);

        assert_eq!(months.len(), 1);
        assert_eq!(months[0].totals.income, 1000.0);
        assert_eq!(months[0].totals.expenses, 300.0);
    }

    #[test]
    fn empty_input_produces_no_groups() {
        let months = group_by_month_and_day(Vec::new());

        assert!(months.is_empty());
    }
}
