//! The financial report: monthly totals since the start of the year plus
//! the current month's top expenses.

use super::{CommandContext, CommandError};
use crate::i18n;
use chrono::{Datelike, TimeZone, Utc};
use quipu_core::domain::{Category, Organization};
use std::collections::BTreeMap;
use tracing::error;

/// Converted-amount totals for one calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSummary {
    pub month: u32,
    pub income: f64,
    pub essential: f64,
    pub non_essential: f64,
}

impl MonthSummary {
    /// Net expenses (negative when anything was spent).
    pub fn expenses(&self) -> f64 {
        self.essential + self.non_essential
    }
}

/// One entry of the top-expenses list, already in the organization's
/// currency and with the sign stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct TopExpense {
    pub category: Category,
    /// `dd/mm/yyyy` in the organization's local time.
    pub date: String,
    pub description: String,
    pub amount: f64,
}

/// What a successful report execution hands to its render step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    /// Most recent month first.
    pub months: Vec<MonthSummary>,
    /// Sorted by amount descending, at most ten entries.
    pub top: Vec<TopExpense>,
}

/// Aggregate the organization's transactions from year-start through now.
pub async fn execute(
    ctx: &CommandContext<'_>,
    org: &Organization,
) -> Result<ReportOutcome, CommandError> {
    let now_local = Utc::now().with_timezone(&ctx.tz);
    let current_month = now_local.month();

    let year_start = ctx
        .tz
        .with_ymd_and_hms(now_local.year(), 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| {
            error!("could not construct year start for {}", now_local.year());
            CommandError::Internal
        })?;

    let transactions = ctx
        .store
        .list_transactions(&org.id, year_start.with_timezone(&Utc))
        .await
        .map_err(|e| {
            error!("failed to list transactions for org {}: {e}", org.id);
            CommandError::Internal
        })?;

    let mut months: BTreeMap<u32, MonthSummary> = BTreeMap::new();
    let mut top: Vec<TopExpense> = Vec::new();

    for tx in transactions {
        let local = tx.created_at.with_timezone(&ctx.tz);
        let month = local.month();

        let summary = months.entry(month).or_insert_with(|| MonthSummary {
            month,
            ..MonthSummary::default()
        });
        match tx.category {
            Category::Income => summary.income += tx.converted,
            Category::Essential => summary.essential += tx.converted,
            Category::NonEssential => summary.non_essential += tx.converted,
        }

        // Only this month's expenses compete for the top list.
        if month == current_month && tx.converted < 0.0 {
            top.push(TopExpense {
                category: tx.category,
                date: local.format("%d/%m/%Y").to_string(),
                description: tx.description,
                amount: tx.converted.abs(),
            });
        }
    }

    top.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top.truncate(10);

    Ok(ReportOutcome {
        months: months.into_values().rev().collect(),
        top,
    })
}

/// Render the full report message.
pub fn render(org: &Organization, outcome: &ReportOutcome) -> String {
    let lang = org.language;

    let mut monthly = String::new();
    for summary in &outcome.months {
        let expenses = summary.expenses();

        monthly.push_str("----------- ⏳ -----------\n");
        monthly.push_str(&format!(
            "💰 {}. {}\n",
            summary.month,
            i18n::month_name(lang, summary.month)
        ));

        if summary.income > 0.0 {
            monthly.push_str(&format!(
                "🟢 {} {} = {}\n",
                Category::Income.emoji(),
                i18n::category_label(lang, Category::Income),
                i18n::money(summary.income)
            ));

            // Savings only make sense when something was also spent.
            if expenses < 0.0 {
                let savings = summary.income + expenses;
                let ratio = ((savings / summary.income) * 100.0).floor() as i64;
                monthly.push_str(&format!(
                    "\t🥂 {} ({ratio}%)\n\t   👉 {}\n",
                    i18n::t("savings", lang),
                    i18n::money(savings)
                ));
            }
        }

        if expenses < 0.0 {
            monthly.push_str(&format!(
                "🔴 {} = {}\n",
                i18n::t("expenses", lang),
                i18n::money(expenses.abs())
            ));

            for (category, subtotal) in [
                (Category::Essential, summary.essential),
                (Category::NonEssential, summary.non_essential),
            ] {
                if subtotal < 0.0 {
                    // Subtotal and total are both negative, the ratio is positive.
                    let ratio = ((subtotal / expenses) * 100.0).floor() as i64;
                    monthly.push_str(&format!(
                        "\t{} {} ({ratio}%)\n\t   👉 {}\n",
                        category.emoji(),
                        i18n::category_label(lang, category),
                        i18n::money(subtotal.abs())
                    ));
                }
            }
        }

        monthly.push_str("----------- ⏳ -----------\n");
    }

    let mut top = String::new();
    for (ix, expense) in outcome.top.iter().enumerate() {
        top.push_str(&format!(
            "🔥 {}. {} ({})\n\t{} {}\n\t{}\n",
            ix + 1,
            i18n::money(expense.amount),
            expense.date,
            expense.category.emoji(),
            i18n::category_label(lang, expense.category),
            expense.description
        ));
    }

    i18n::report(org, &monthly, &top)
}
