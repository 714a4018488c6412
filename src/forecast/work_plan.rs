use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, ExpenseClass, ProviderRegistry};
use crate::domain::{Expense, FinancialSettings, Invoice, ManualEstimates, MonthKey};
use crate::utils::round2;

/// Months averaged for the historical expense estimate and the trailing
/// starting-balance computation.
const TRAILING_MONTHS: u32 = 3;
/// Cumulative balance below this is a deficit month.
const DEFICIT_THRESHOLD: f64 = -100.0;
/// Cumulative balance above this is a surplus month.
const SURPLUS_THRESHOLD: f64 = 500.0;

/// Tuning for [`work_plan`].
#[derive(Debug, Clone, Default)]
pub struct WorkPlanOptions {
    /// Months forward, the current month included.
    pub forecast_months: u32,
    /// Count draft invoices as future income.
    pub include_drafts: bool,
    /// Modeled monthly family-transfer outflow.
    pub family_transfer_monthly: f64,
    /// One-off planned expenses.
    pub expected_expenses: Vec<ExpectedExpense>,
}

/// A single planned one-off expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedExpense {
    pub month: MonthKey,
    pub amount: f64,
    pub description: String,
}

/// Where a month's expense estimate came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    Actual,
    HistoricalAverage,
    Manual,
}

/// Where the plan's starting balance came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InitialBalanceSource {
    Custom,
    TrailingForecast,
    RealHistory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MonthStatus {
    Deficit,
    Ok,
    Surplus,
}

/// Fixed / variable / bill expense split for one month.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub fixed: f64,
    pub variable: f64,
    pub bills: f64,
}

impl ExpenseBreakdown {
    pub fn total(&self) -> f64 {
        self.fixed + self.variable + self.bills
    }
}

impl From<ManualEstimates> for ExpenseBreakdown {
    fn from(estimates: ManualEstimates) -> Self {
        Self {
            fixed: estimates.fixed_expenses,
            variable: estimates.variable_expenses,
            bills: estimates.bill_expenses,
        }
    }
}

/// One month of the work plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPlanMonth {
    pub month: MonthKey,
    pub income: f64,
    pub expenses: ExpenseBreakdown,
    pub estimate_source: EstimateSource,
    pub pension_contribution: f64,
    pub family_transfers: f64,
    pub expected_expenses: f64,
    pub total_expenses: f64,
    /// Days of billable work needed to cover this month's expenses.
    pub required_work_days: u32,
    /// Extra days required to recover the prior month's deficit.
    pub deficit_recovery_days: u32,
    pub cumulative_balance: f64,
    pub status: MonthStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPlanSummary {
    pub average_work_days: f64,
    pub total_deficit_months: usize,
    pub total_surplus_months: usize,
    pub annual_surplus: f64,
    pub annual_deficit: f64,
    pub final_balance: f64,
    pub recommended_buffer: f64,
}

/// Pension annuity check: what the goal requires each month versus what
/// is currently configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionGoalPlan {
    pub target_amount: f64,
    pub required_monthly_contribution: f64,
    pub configured_contribution: f64,
    /// Positive when the configured contribution falls short.
    pub monthly_gap: f64,
    pub extra_work_days_per_month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPlan {
    pub months: Vec<WorkPlanMonth>,
    pub summary: WorkPlanSummary,
    pub initial_balance: f64,
    pub initial_balance_source: InitialBalanceSource,
    pub pension_goal: Option<PensionGoalPlan>,
}

/// Projects how many freelance work-days each forecast month needs to
/// cover its expenses, with a compounding cumulative balance.
pub fn work_plan(
    invoices: &[Invoice],
    expenses: &[Expense],
    registry: &ProviderRegistry,
    settings: &FinancialSettings,
    options: &WorkPlanOptions,
    today: NaiveDate,
) -> WorkPlan {
    let current = MonthKey::from_date(today);
    let (initial_balance, initial_balance_source) =
        starting_balance(invoices, expenses, settings, current);

    let trailing_average = trailing_expense_average(expenses, registry, current);
    let manual: Option<ExpenseBreakdown> = settings
        .manual_estimates
        .filter(|_| settings.use_manual_estimates)
        .map(ExpenseBreakdown::from);

    let months = MonthKey::axis(current, 0, options.forecast_months.max(1));
    let mut plan_months = Vec::with_capacity(months.len());
    let mut balance = initial_balance;

    for month in months {
        let income = month_income(invoices, month, settings, options);
        let (breakdown, estimate_source) = if let Some(manual) = manual {
            (manual, EstimateSource::Manual)
        } else if month == current {
            (
                bucketed_expenses(expenses, registry, month),
                EstimateSource::Actual,
            )
        } else {
            (trailing_average, EstimateSource::HistoricalAverage)
        };
        let expected: f64 = options
            .expected_expenses
            .iter()
            .filter(|expense| expense.month == month)
            .map(|expense| expense.amount)
            .sum();
        let total_expenses = breakdown.total()
            + settings.pension_contribution
            + options.family_transfer_monthly
            + expected;

        let required_work_days = days_for(total_expenses, settings.daily_rate);
        // Balance still holds the prior month's close here.
        let deficit_recovery_days = if balance < 0.0 {
            days_for(-balance, settings.daily_rate)
        } else {
            0
        };

        balance += income - total_expenses;
        let status = if balance < DEFICIT_THRESHOLD {
            MonthStatus::Deficit
        } else if balance > SURPLUS_THRESHOLD {
            MonthStatus::Surplus
        } else {
            MonthStatus::Ok
        };

        plan_months.push(WorkPlanMonth {
            month,
            income,
            expenses: breakdown,
            estimate_source,
            pension_contribution: settings.pension_contribution,
            family_transfers: options.family_transfer_monthly,
            expected_expenses: expected,
            total_expenses,
            required_work_days,
            deficit_recovery_days,
            cumulative_balance: balance,
            status,
        });
    }

    let summary = summarize(&plan_months, balance);
    let pension_goal = settings.pension_goal.map(|goal| {
        let required = required_monthly_contribution(
            goal.target_amount,
            goal.years,
            goal.expected_annual_return,
        );
        let monthly_gap = required - settings.pension_contribution;
        PensionGoalPlan {
            target_amount: goal.target_amount,
            required_monthly_contribution: round2(required),
            configured_contribution: settings.pension_contribution,
            monthly_gap: round2(monthly_gap),
            extra_work_days_per_month: days_for(monthly_gap.max(0.0), settings.daily_rate),
        }
    });

    tracing::debug!(
        months = plan_months.len(),
        source = ?initial_balance_source,
        "work plan computed"
    );

    WorkPlan {
        months: plan_months,
        summary,
        initial_balance,
        initial_balance_source,
        pension_goal,
    }
}

/// Standard annuity: the monthly payment that compounds to `target` over
/// `years` at the expected annual return.
pub fn required_monthly_contribution(target: f64, years: u32, annual_return: f64) -> f64 {
    let n = (years * 12) as f64;
    if n == 0.0 {
        return target;
    }
    let r = annual_return / 12.0;
    if r.abs() < f64::EPSILON {
        return target / n;
    }
    target * r / ((1.0 + r).powf(n) - 1.0)
}

fn days_for(amount: f64, daily_rate: f64) -> u32 {
    if daily_rate <= 0.0 || amount <= 0.0 {
        return 0;
    }
    (amount / daily_rate).ceil() as u32
}

/// Starting balance, by priority: explicit override, trailing-window
/// result, then all-history result.
fn starting_balance(
    invoices: &[Invoice],
    expenses: &[Expense],
    settings: &FinancialSettings,
    current: MonthKey,
) -> (f64, InitialBalanceSource) {
    if settings.use_custom_initial_balance {
        if let Some(balance) = settings.initial_balance {
            return (balance, InitialBalanceSource::Custom);
        }
    }
    let window_start = current.shift(-(TRAILING_MONTHS as i32));
    if let Some(balance) = net_between(invoices, expenses, Some(window_start), current) {
        return (balance, InitialBalanceSource::TrailingForecast);
    }
    let balance = net_between(invoices, expenses, None, current).unwrap_or(0.0);
    (balance, InitialBalanceSource::RealHistory)
}

/// Paid invoice income minus expenses over `[start, end)` months.
/// Returns `None` when the window saw no activity at all.
fn net_between(
    invoices: &[Invoice],
    expenses: &[Expense],
    start: Option<MonthKey>,
    end: MonthKey,
) -> Option<f64> {
    let in_window = |month: MonthKey| start.map_or(true, |s| month >= s) && month < end;
    let mut any = false;
    let mut net = 0.0;
    for invoice in invoices {
        let Some(paid_date) = invoice.paid_date else {
            continue;
        };
        if invoice.paid_amount <= 0.0 {
            continue;
        }
        if in_window(MonthKey::from_date(paid_date)) {
            net += invoice.paid_amount;
            any = true;
        }
    }
    for expense in expenses {
        if in_window(MonthKey::from_date(expense.effective_date())) {
            net -= expense.amount;
            any = true;
        }
    }
    any.then_some(net)
}

/// Invoice income attributed to one plan month: outstanding remainders by
/// delayed due date, payments received that month, and optionally drafts.
fn month_income(
    invoices: &[Invoice],
    month: MonthKey,
    settings: &FinancialSettings,
    options: &WorkPlanOptions,
) -> f64 {
    let mut income = 0.0;
    for invoice in invoices {
        if invoice.exclude_from_budget {
            continue;
        }
        if invoice.is_draft() && !options.include_drafts {
            continue;
        }
        let expected_payment = invoice.due_date + Duration::days(settings.payment_delay_days);
        if !invoice.is_paid()
            && invoice.outstanding() > 0.0
            && MonthKey::from_date(expected_payment) == month
        {
            income += invoice.outstanding();
        }
        if let Some(paid_date) = invoice.paid_date {
            if invoice.paid_amount > 0.0 && MonthKey::from_date(paid_date) == month {
                income += invoice.paid_amount;
            }
        }
    }
    income
}

/// Splits one month's actual rows into the fixed/variable/bill buckets.
fn bucketed_expenses(
    expenses: &[Expense],
    registry: &ProviderRegistry,
    month: MonthKey,
) -> ExpenseBreakdown {
    let mut breakdown = ExpenseBreakdown::default();
    for expense in expenses {
        if MonthKey::from_date(expense.effective_date()) != month {
            continue;
        }
        if expense.is_bill() {
            breakdown.bills += expense.amount;
            continue;
        }
        match classify(expense, registry) {
            class if class.is_fixed() => breakdown.fixed += expense.amount,
            ExpenseClass::UtilityBill => breakdown.bills += expense.amount,
            _ => breakdown.variable += expense.amount,
        }
    }
    breakdown
}

fn trailing_expense_average(
    expenses: &[Expense],
    registry: &ProviderRegistry,
    current: MonthKey,
) -> ExpenseBreakdown {
    let window_start = current.shift(-(TRAILING_MONTHS as i32));
    let mut total = ExpenseBreakdown::default();
    for step in 0..TRAILING_MONTHS as i32 {
        let month = window_start.shift(step);
        let breakdown = bucketed_expenses(expenses, registry, month);
        total.fixed += breakdown.fixed;
        total.variable += breakdown.variable;
        total.bills += breakdown.bills;
    }
    ExpenseBreakdown {
        fixed: total.fixed / TRAILING_MONTHS as f64,
        variable: total.variable / TRAILING_MONTHS as f64,
        bills: total.bills / TRAILING_MONTHS as f64,
    }
}

fn summarize(months: &[WorkPlanMonth], final_balance: f64) -> WorkPlanSummary {
    let count = months.len().max(1) as f64;
    let average_work_days = months
        .iter()
        .map(|month| (month.required_work_days + month.deficit_recovery_days) as f64)
        .sum::<f64>()
        / count;
    let mut annual_surplus = 0.0;
    let mut annual_deficit = 0.0;
    for month in months {
        let net = month.income - month.total_expenses;
        if net >= 0.0 {
            annual_surplus += net;
        } else {
            annual_deficit += -net;
        }
    }
    let average_expenses = months
        .iter()
        .map(|month| month.total_expenses)
        .sum::<f64>()
        / count;
    WorkPlanSummary {
        average_work_days,
        total_deficit_months: months
            .iter()
            .filter(|month| month.status == MonthStatus::Deficit)
            .count(),
        total_surplus_months: months
            .iter()
            .filter(|month| month.status == MonthStatus::Surplus)
            .count(),
        annual_surplus,
        annual_deficit,
        final_balance,
        recommended_buffer: round2(average_expenses * 3.0),
    }
}
