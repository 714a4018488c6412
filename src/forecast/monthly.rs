use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{classify, ExpenseClass, ProviderRegistry};
use crate::domain::{BillKind, BudgetTransfer, Expense, Invoice, MonthKey};
use crate::utils::round2;

use super::credit_card::booked_month;
use super::providers::{estimate_provider_cycles, total_bill_estimate, ProviderForecast};

/// Tiered savings rate applied to a positive pre-savings balance.
fn savings_rate_for(balance: f64) -> f64 {
    if balance < 2000.0 {
        0.0
    } else if balance < 3000.0 {
        0.10
    } else if balance < 4000.0 {
        0.15
    } else {
        0.20
    }
}

/// Profile running the forecast. Primary profiles earn invoice income and
/// see shared expenses; secondary profiles are funded by transfers and see
/// only their own rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Primary { user_id: Uuid },
    Secondary { user_id: Uuid },
}

impl Profile {
    pub fn user_id(&self) -> Uuid {
        match self {
            Profile::Primary { user_id } | Profile::Secondary { user_id } => *user_id,
        }
    }

    pub fn is_secondary(&self) -> bool {
        matches!(self, Profile::Secondary { .. })
    }

    fn sees(&self, expense: &Expense) -> bool {
        match self {
            Profile::Primary { user_id } => {
                expense.paid_by.is_none() || expense.paid_by == Some(*user_id)
            }
            Profile::Secondary { user_id } => expense.paid_by == Some(*user_id),
        }
    }
}

/// Window and tuning knobs for [`monthly_forecast`].
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    /// Months forward, the current month included.
    pub forecast_months: u32,
    /// Months backward before the current month.
    pub past_months: u32,
    /// How many future months share a redistributed overspend.
    pub horizon_months: u32,
    /// Manual adjustment subtracted from the current month only.
    pub already_spent: f64,
    pub profile: Profile,
}

impl ForecastOptions {
    pub fn new(profile: Profile) -> Self {
        Self {
            forecast_months: 6,
            past_months: 3,
            horizon_months: 3,
            already_spent: 0.0,
            profile,
        }
    }
}

/// One actual or projected bill line inside a month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    pub kind: BillKind,
    pub provider: String,
    pub amount: f64,
    /// True for provider-cycle projections, false for real rows.
    pub projected: bool,
}

/// Running-balance figures for one track (real or forecast income).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackMonth {
    pub carryover_in: f64,
    pub balance_before_savings: f64,
    pub savings_rate: f64,
    pub savings_amount: f64,
    pub accumulated_savings: f64,
    pub balance_after_savings: f64,
    /// `max(0, balance_after_savings)`, never negative.
    pub carryover_out: f64,
}

/// Fully derived figures for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub is_past: bool,
    pub is_current: bool,
    pub received_income: f64,
    pub expected_income: f64,
    pub fixed_expenses: f64,
    pub variable_expenses: f64,
    pub credit_card_expenses: f64,
    pub bill_expenses: f64,
    pub bill_details: Vec<BillLine>,
    /// Deficit share charged into this month by earlier overspent months.
    pub overspend_allocated: f64,
    /// Received-income-only track; authoritative for past and current
    /// months.
    pub real: TrackMonth,
    /// Received-plus-expected track; shown for strictly future months.
    pub forecast: TrackMonth,
}

impl MonthSummary {
    pub fn total_expenses(&self) -> f64 {
        self.fixed_expenses + self.variable_expenses + self.credit_card_expenses + self.bill_expenses
    }

    /// The track a dashboard shows for this month: real up to and
    /// including the current month, forecast beyond it.
    pub fn display(&self) -> &TrackMonth {
        if self.is_past || self.is_current {
            &self.real
        } else {
            &self.forecast
        }
    }

    pub fn carryover(&self) -> f64 {
        self.display().carryover_out
    }

    pub fn spendable(&self) -> f64 {
        self.display().balance_after_savings
    }
}

/// Result of a monthly forecast pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyForecast {
    pub summaries: Vec<MonthSummary>,
    pub current_month: MonthKey,
    pub provider_forecasts: Vec<ProviderForecast>,
    /// Expected monthly bill cost across all providers.
    pub total_bill_estimate: f64,
}

impl MonthlyForecast {
    pub fn current(&self) -> Option<&MonthSummary> {
        self.summaries.iter().find(|summary| summary.is_current)
    }

    pub fn past_months(&self) -> impl Iterator<Item = &MonthSummary> {
        self.summaries.iter().filter(|summary| summary.is_past)
    }

    pub fn future_months(&self) -> impl Iterator<Item = &MonthSummary> {
        self.summaries
            .iter()
            .filter(|summary| !summary.is_past && !summary.is_current)
    }
}

#[derive(Debug, Default)]
struct RawMonth {
    received_income: f64,
    expected_income: f64,
    fixed_expenses: f64,
    variable_expenses: f64,
    credit_card_expenses: f64,
    bill_expenses: f64,
    bill_details: Vec<BillLine>,
    /// Reported allocation total, self-absorbed deficits included.
    overspend_allocated: f64,
    /// Portion actually charged against the balance (allocations from
    /// other months only).
    overspend_charge: f64,
}

impl RawMonth {
    fn total_expenses(&self) -> f64 {
        self.fixed_expenses + self.variable_expenses + self.credit_card_expenses + self.bill_expenses
    }
}

/// Runs the full month-bucketed balance projection.
///
/// Pure over its inputs: identical arguments always produce identical
/// output, and nothing is mutated. Malformed numeric input is the
/// caller's responsibility (`Dataset::validate`).
pub fn monthly_forecast(
    invoices: &[Invoice],
    expenses: &[Expense],
    transfers: &[BudgetTransfer],
    registry: &ProviderRegistry,
    options: &ForecastOptions,
    today: NaiveDate,
) -> MonthlyForecast {
    let current = MonthKey::from_date(today);
    let axis = MonthKey::axis(current, options.past_months, options.forecast_months);
    let index: HashMap<MonthKey, usize> = axis
        .iter()
        .enumerate()
        .map(|(position, month)| (*month, position))
        .collect();
    let current_index = index[&current];
    let mut raws: Vec<RawMonth> = axis.iter().map(|_| RawMonth::default()).collect();

    bucket_invoice_income(invoices, options, &index, &mut raws);
    if options.profile.is_secondary() {
        bucket_transfer_income(transfers, options.profile.user_id(), &index, &mut raws);
    }
    bucket_expenses(expenses, registry, options, &index, current_index, &mut raws);

    let provider_forecasts =
        estimate_provider_cycles(expenses, current, options.forecast_months);
    merge_bills(expenses, &provider_forecasts, &index, current_index, &mut raws);

    redistribute_overspend(&mut raws, current_index, options.horizon_months as usize);

    let apply_savings = !options.profile.is_secondary();
    let real = project_track(
        &raws,
        IncomeSelection::ReceivedOnly,
        apply_savings,
        options.already_spent,
        current_index,
    );
    let forecast = project_track(
        &raws,
        IncomeSelection::ReceivedPlusExpected,
        apply_savings,
        options.already_spent,
        current_index,
    );

    let summaries = axis
        .iter()
        .enumerate()
        .map(|(position, month)| {
            let raw = &raws[position];
            MonthSummary {
                month: *month,
                is_past: position < current_index,
                is_current: position == current_index,
                received_income: raw.received_income,
                expected_income: raw.expected_income,
                fixed_expenses: raw.fixed_expenses,
                variable_expenses: raw.variable_expenses,
                credit_card_expenses: raw.credit_card_expenses,
                bill_expenses: raw.bill_expenses,
                bill_details: raw.bill_details.clone(),
                overspend_allocated: raw.overspend_allocated,
                real: real[position].clone(),
                forecast: forecast[position].clone(),
            }
        })
        .collect();

    let estimate = total_bill_estimate(&provider_forecasts);
    tracing::debug!(
        months = axis.len(),
        providers = provider_forecasts.len(),
        "monthly forecast computed"
    );

    MonthlyForecast {
        summaries,
        current_month: current,
        provider_forecasts,
        total_bill_estimate: estimate,
    }
}

fn bucket_invoice_income(
    invoices: &[Invoice],
    options: &ForecastOptions,
    index: &HashMap<MonthKey, usize>,
    raws: &mut [RawMonth],
) {
    // Secondary profiles are funded by transfers, never by invoices.
    if options.profile.is_secondary() {
        return;
    }
    for invoice in invoices {
        if invoice.exclude_from_budget {
            continue;
        }
        let paid_month = MonthKey::from_date(invoice.paid_date.unwrap_or(invoice.due_date));
        if invoice.is_paid() {
            if let Some(&position) = index.get(&paid_month) {
                raws[position].received_income += invoice.total_amount;
            }
            continue;
        }
        if invoice.paid_amount > 0.0 {
            if let Some(&position) = index.get(&paid_month) {
                raws[position].received_income += invoice.paid_amount;
            }
        }
        let due_month = MonthKey::from_date(invoice.due_date);
        if let Some(&position) = index.get(&due_month) {
            raws[position].expected_income += invoice.outstanding();
        }
    }
}

fn bucket_transfer_income(
    transfers: &[BudgetTransfer],
    user_id: Uuid,
    index: &HashMap<MonthKey, usize>,
    raws: &mut [RawMonth],
) {
    for transfer in transfers {
        if transfer.to_user_id != user_id {
            continue;
        }
        if let Some(&position) = index.get(&transfer.month) {
            raws[position].received_income += transfer.amount;
        }
    }
}

fn bucket_expenses(
    expenses: &[Expense],
    registry: &ProviderRegistry,
    options: &ForecastOptions,
    index: &HashMap<MonthKey, usize>,
    current_index: usize,
    raws: &mut [RawMonth],
) {
    for expense in expenses {
        // Bill rows are merged separately so a bill paid by card is never
        // counted twice.
        if expense.is_bill() {
            continue;
        }
        if !options.profile.sees(expense) {
            continue;
        }
        match classify(expense, registry) {
            ExpenseClass::CreditCard => {
                let month = booked_month(expense.purchase_date.unwrap_or(expense.date));
                if let Some(&position) = index.get(&month) {
                    raws[position].credit_card_expenses += expense.amount;
                }
            }
            class if expense.recurring && class.is_fixed() => {
                // A recurring fixed expense repeats in every non-past
                // month of the window, however many rows exist.
                for raw in raws.iter_mut().skip(current_index) {
                    raw.fixed_expenses += expense.amount;
                }
            }
            class => {
                let month = MonthKey::from_date(expense.effective_date());
                if let Some(&position) = index.get(&month) {
                    if class.is_fixed() {
                        raws[position].fixed_expenses += expense.amount;
                    } else {
                        raws[position].variable_expenses += expense.amount;
                    }
                }
            }
        }
    }
}

fn merge_bills(
    expenses: &[Expense],
    provider_forecasts: &[ProviderForecast],
    index: &HashMap<MonthKey, usize>,
    current_index: usize,
    raws: &mut [RawMonth],
) {
    // Actual rows first; projections never land in a month that already
    // has a real bill from the same provider.
    let mut actual: HashSet<(BillKind, String, MonthKey)> = HashSet::new();
    for expense in expenses {
        let Some(bill) = &expense.bill else {
            continue;
        };
        let month = MonthKey::from_date(bill.paid_at.unwrap_or(expense.effective_date()));
        actual.insert((bill.kind, bill.provider.trim().to_lowercase(), month));
        if let Some(&position) = index.get(&month) {
            raws[position].bill_expenses += expense.amount;
            raws[position].bill_details.push(BillLine {
                kind: bill.kind,
                provider: bill.provider.clone(),
                amount: expense.amount,
                projected: false,
            });
        }
    }

    for forecast in provider_forecasts {
        let provider_key = forecast.provider.trim().to_lowercase();
        for date in &forecast.next_bill_dates {
            let month = MonthKey::from_date(*date);
            let Some(&position) = index.get(&month) else {
                continue;
            };
            if position < current_index {
                continue;
            }
            if actual.contains(&(forecast.kind, provider_key.clone(), month)) {
                continue;
            }
            raws[position].bill_expenses += forecast.avg_amount;
            raws[position].bill_details.push(BillLine {
                kind: forecast.kind,
                provider: forecast.provider.clone(),
                amount: forecast.avg_amount,
                projected: true,
            });
        }
    }
}

/// Spreads each non-past month's pre-carryover deficit across the next
/// `horizon` months, proportionally to their received income. The last
/// share absorbs the rounding remainder so the split sums exactly to the
/// deficit. A deficit in the window's final month has nowhere to go and
/// stays where it is.
fn redistribute_overspend(raws: &mut [RawMonth], current_index: usize, horizon: usize) {
    let len = raws.len();
    for position in current_index..len {
        let deficit = raws[position].received_income - raws[position].total_expenses();
        if deficit >= 0.0 {
            continue;
        }
        let deficit = -deficit;
        let targets: Vec<usize> = (position + 1..len.min(position + 1 + horizon)).collect();
        if targets.is_empty() {
            raws[position].overspend_allocated += round2(deficit);
            continue;
        }
        let income_total: f64 = targets
            .iter()
            .map(|&target| raws[target].received_income)
            .sum();
        let mut distributed = 0.0;
        for (slot, &target) in targets.iter().enumerate() {
            let share = if slot + 1 == targets.len() {
                round2(deficit - distributed)
            } else if income_total > 0.0 {
                round2(deficit * raws[target].received_income / income_total)
            } else {
                round2(deficit / targets.len() as f64)
            };
            distributed += share;
            raws[target].overspend_allocated += share;
            raws[target].overspend_charge += share;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncomeSelection {
    ReceivedOnly,
    ReceivedPlusExpected,
}

impl IncomeSelection {
    fn income(&self, raw: &RawMonth) -> f64 {
        match self {
            IncomeSelection::ReceivedOnly => raw.received_income,
            IncomeSelection::ReceivedPlusExpected => raw.received_income + raw.expected_income,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TrackState {
    carryover: f64,
    accumulated_savings: f64,
}

/// Single generic ledger projection: both the real and the forecast track
/// are this fold with a different income selection, so the recurrence
/// relation cannot drift between them.
fn project_track(
    raws: &[RawMonth],
    selection: IncomeSelection,
    apply_savings: bool,
    already_spent: f64,
    current_index: usize,
) -> Vec<TrackMonth> {
    raws.iter()
        .enumerate()
        .scan(TrackState::default(), |state, (position, raw)| {
            let adjustment = if position == current_index {
                already_spent
            } else {
                0.0
            };
            let carryover_in = state.carryover;
            let balance_before_savings = selection.income(raw) + carryover_in
                - raw.total_expenses()
                - raw.overspend_charge
                - adjustment;
            let savings_rate = if apply_savings && balance_before_savings > 0.0 {
                savings_rate_for(balance_before_savings)
            } else {
                0.0
            };
            let savings_amount = round2(balance_before_savings * savings_rate);
            let balance_after_savings = balance_before_savings - savings_amount;
            let carryover_out = balance_after_savings.max(0.0);
            *state = TrackState {
                carryover: carryover_out,
                accumulated_savings: state.accumulated_savings + savings_amount,
            };
            Some(TrackMonth {
                carryover_in,
                balance_before_savings,
                savings_rate,
                savings_amount,
                accumulated_savings: state.accumulated_savings,
                balance_after_savings,
                carryover_out,
            })
        })
        .collect()
}
