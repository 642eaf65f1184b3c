//! Expense summaries for a period.
//!
//! Provides functions to total the records of a period, break the total down
//! by category and turn that breakdown into the rows of the distribution view.

use std::cmp::Ordering;

use crate::{
    Error,
    api::SummaryPayload,
    format::format_currency,
    navigation::Period,
    record::ExpenseRecord,
};

/// The amount spent on one category within a period.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// The category name.
    pub category: String,
    /// The emoji of the category, taken from the first record of the category.
    pub emoji: String,
    /// The sum of the amounts of the category's records.
    pub amount: f64,
}

/// The total spending of a period and its breakdown by category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    /// The sum of the amounts of every record.
    pub total: f64,
    /// The number of records.
    pub count: usize,
    /// One entry per category, largest amount first.
    pub top_categories: Vec<CategorySummary>,
}

impl Summary {
    /// The `n` categories with the largest amounts.
    ///
    /// The categories are already ranked, so truncation is left to the caller.
    pub fn top(&self, n: usize) -> &[CategorySummary] {
        &self.top_categories[..n.min(self.top_categories.len())]
    }

    /// Keep only the `n` categories with the largest amounts.
    pub fn truncate_top(mut self, n: usize) -> Self {
        self.top_categories.truncate(n);
        self
    }
}

impl From<SummaryPayload> for Summary {
    /// Summaries computed by the expense service are ranked the same way as
    /// local ones so that both sources display identically.
    fn from(payload: SummaryPayload) -> Self {
        let mut top_categories: Vec<CategorySummary> = payload
            .top_categories
            .into_iter()
            .map(|record| CategorySummary {
                category: record.category,
                emoji: record.emoji,
                amount: record.amount,
            })
            .collect();
        rank_categories(&mut top_categories);

        Summary {
            total: payload.total_expenses,
            count: payload.total_expenses_records,
            top_categories,
        }
    }
}

/// Totals `records` and breaks the total down by category.
///
/// Categories are ranked by amount, largest first. Categories with equal
/// amounts keep the order in which they first appear in `records`.
pub fn aggregate(records: &[ExpenseRecord]) -> Summary {
    let mut top_categories: Vec<CategorySummary> = Vec::new();

    for record in records {
        match top_categories
            .iter_mut()
            .find(|summary| summary.category == record.category)
        {
            Some(summary) => summary.amount += record.amount,
            None => top_categories.push(CategorySummary {
                category: record.category.clone(),
                emoji: record.emoji.clone(),
                amount: record.amount,
            }),
        }
    }

    rank_categories(&mut top_categories);

    Summary {
        total: records.iter().map(|record| record.amount).sum(),
        count: records.len(),
        top_categories,
    }
}

fn rank_categories(categories: &mut [CategorySummary]) {
    categories.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
}

/// `amount` as a percentage of `total`, formatted with two decimal places,
/// e.g. "25.00%".
///
/// # Precondition
/// `total` must not be zero. A period without any spending is a normal
/// state, so check for a zero total and show an empty state instead of
/// calling this function. [distribution] performs that check.
///
/// # Errors
/// Returns [Error::DivisionByZero] if `total` is zero.
pub fn percentage_of(total: f64, amount: f64) -> Result<String, Error> {
    if total == 0.0 {
        return Err(Error::DivisionByZero);
    }

    Ok(format!("{:.2}%", amount / total * 100.0))
}

/// The fraction of `total` that `amount` makes up, for sizing progress bars.
///
/// Unlike [percentage_of], a zero total is not an error and gives 0.
pub fn bar_ratio(total: f64, amount: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    amount / total
}

/// One row of the expense distribution view.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The category name.
    pub category: String,
    /// The category emoji.
    pub emoji: String,
    /// The amount spent on the category.
    pub amount: f64,
    /// The amount formatted as currency.
    pub amount_label: String,
    /// The share of the total as a percentage, e.g. "25.00%".
    pub percentage: String,
    /// The share of the total from 0 to 1.
    pub bar_ratio: f64,
}

/// The distribution rows for `summary`, in the summary's order.
///
/// Returns an empty vector, to be displayed as "No Data", when there are no
/// categories or nothing was spent.
///
/// # Errors
/// Only fails if [percentage_of] fails, which the zero total check rules out.
pub fn distribution(summary: &Summary) -> Result<Vec<CategoryShare>, Error> {
    if summary.top_categories.is_empty() || summary.total == 0.0 {
        tracing::debug!("No spending to distribute (total {})", summary.total);
        return Ok(Vec::new());
    }

    summary
        .top_categories
        .iter()
        .map(|category| {
            Ok(CategoryShare {
                category: category.category.clone(),
                emoji: category.emoji.clone(),
                amount: category.amount,
                amount_label: format_currency(category.amount),
                percentage: percentage_of(summary.total, category.amount)?,
                bar_ratio: bar_ratio(summary.total, category.amount),
            })
        })
        .collect()
}

/// The headline numbers of a period.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    /// The card title, e.g. "Apr Overview".
    pub title: String,
    /// The total spending formatted as currency.
    pub expenses: String,
    /// The number of records in the period.
    pub record_count: usize,
}

/// The overview card for `summary` of `period`.
pub fn overview(period: Period, summary: &Summary) -> Overview {
    Overview {
        title: format!("{} Overview", period.label()),
        expenses: format_currency(summary.total),
        record_count: summary.count,
    }
}
