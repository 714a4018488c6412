use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{shift_month, BillKind, Expense, MonthKey};

/// Frequency assumed when a bill carries no period dates.
const DEFAULT_FREQUENCY_MONTHS: u32 = 2;
/// Upper bound on projected cycles per provider.
const MAX_PROJECTED_CYCLES: usize = 64;

/// Forward projection for one `(bill kind, provider)` pair, derived from
/// its paid history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderForecast {
    pub kind: BillKind,
    pub provider: String,
    /// Mean of the provider's historical paid bills.
    pub avg_amount: f64,
    /// Inferred months between issuances: 1, 2, 3, 6, or 12.
    pub billing_frequency_months: u32,
    pub last_bill_date: NaiveDate,
    /// Projected issuance dates, one per cycle, through the forecast
    /// horizon.
    pub next_bill_dates: Vec<NaiveDate>,
}

impl ProviderForecast {
    /// Average monthly cost of this provider.
    pub fn monthly_estimate(&self) -> f64 {
        self.avg_amount / self.billing_frequency_months as f64
    }
}

/// Groups paid bills by `(kind, provider)` and projects each group's
/// billing cycle forward until past `reference + forecast_months`.
pub fn estimate_provider_cycles(
    expenses: &[Expense],
    reference: MonthKey,
    forecast_months: u32,
) -> Vec<ProviderForecast> {
    let mut groups: BTreeMap<(BillKind, String), Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        let Some(bill) = &expense.bill else {
            continue;
        };
        if !bill.is_paid {
            continue;
        }
        let key = (bill.kind, bill.provider.trim().to_lowercase());
        groups.entry(key).or_default().push(expense);
    }

    let horizon = reference.shift(forecast_months as i32);
    let mut forecasts = Vec::with_capacity(groups.len());
    for ((kind, _), mut bills) in groups {
        bills.sort_by_key(|expense| expense.date);
        let Some(latest) = bills.last() else {
            continue;
        };
        let avg_amount =
            bills.iter().map(|expense| expense.amount).sum::<f64>() / bills.len() as f64;
        let frequency = latest
            .bill
            .as_ref()
            .and_then(|bill| Some((bill.period_start?, bill.period_end?)))
            .map(|(start, end)| frequency_from_period(start, end))
            .unwrap_or(DEFAULT_FREQUENCY_MONTHS);

        let mut next_bill_dates = Vec::new();
        let mut cursor = MonthKey::from_date(latest.date).start_date();
        for _ in 0..MAX_PROJECTED_CYCLES {
            cursor = shift_month(cursor, frequency as i32);
            if MonthKey::from_date(cursor) > horizon {
                break;
            }
            next_bill_dates.push(cursor);
        }

        forecasts.push(ProviderForecast {
            kind,
            provider: latest
                .bill
                .as_ref()
                .map(|bill| bill.provider.clone())
                .unwrap_or_default(),
            avg_amount,
            billing_frequency_months: frequency,
            last_bill_date: latest.date,
            next_bill_dates,
        });
    }
    forecasts
}

/// Total expected monthly bill cost across all providers.
pub fn total_bill_estimate(forecasts: &[ProviderForecast]) -> f64 {
    forecasts.iter().map(ProviderForecast::monthly_estimate).sum()
}

/// Maps a billing period length in days onto a cycle length in months.
fn frequency_from_period(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days();
    match days {
        _ if days <= 35 => 1,
        _ if days <= 65 => 2,
        _ if days <= 95 => 3,
        _ if days <= 190 => 6,
        _ => 12,
    }
}
