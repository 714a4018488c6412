mod common;

use bilancio_core::classify::ProviderRegistry;
use bilancio_core::domain::{FinancialSettings, Invoice, ManualEstimates, PensionGoalSettings};
use bilancio_core::forecast::{work_plan, EstimateSource, MonthStatus, WorkPlanOptions};
use common::{date, grocery, paid_invoice};
use uuid::Uuid;

fn settings(daily_rate: f64) -> FinancialSettings {
    FinancialSettings::new(Uuid::new_v4(), daily_rate)
}

#[test]
fn covered_months_report_ok_or_surplus() {
    let invoices = vec![{
        let mut invoice = Invoice::new(date(2024, 6, 1), date(2024, 6, 20), 4500.0).sent();
        invoice.mark_paid(date(2024, 6, 21));
        invoice
    }];
    let mut cfg = settings(300.0);
    cfg.use_manual_estimates = true;
    cfg.manual_estimates = Some(ManualEstimates {
        fixed_expenses: 1000.0,
        variable_expenses: 800.0,
        bill_expenses: 200.0,
    });
    let mut options = WorkPlanOptions::default();
    options.forecast_months = 3;
    let plan = work_plan(
        &invoices,
        &[],
        &ProviderRegistry::default(),
        &cfg,
        &options,
        date(2024, 6, 15),
    );

    // 4500 arrives in the current month against 2000 of estimated spend.
    let first = &plan.months[0];
    assert_eq!(first.estimate_source, EstimateSource::Manual);
    assert_eq!(first.income, 4500.0);
    assert_eq!(first.required_work_days, 7);
    assert_eq!(first.status, MonthStatus::Surplus);

    // Later months burn the surplus down by 2000 each.
    assert_eq!(plan.months[1].cumulative_balance, 500.0);
    assert_eq!(plan.months[2].cumulative_balance, -1500.0);
    assert_eq!(plan.months[2].status, MonthStatus::Deficit);
    assert_eq!(plan.summary.total_deficit_months, 1);
    assert_eq!(plan.summary.total_surplus_months, 1);
    assert_eq!(plan.summary.final_balance, -1500.0);
}

#[test]
fn historical_average_drives_future_months() {
    // 600 of spending over the trailing three months = 200/month.
    let expenses = vec![
        grocery(100.0, date(2024, 3, 10)),
        grocery(200.0, date(2024, 4, 12)),
        grocery(300.0, date(2024, 5, 20)),
    ];
    let mut options = WorkPlanOptions::default();
    options.forecast_months = 2;
    let plan = work_plan(
        &[],
        &expenses,
        &ProviderRegistry::default(),
        &settings(300.0),
        &options,
        date(2024, 6, 15),
    );
    let future = &plan.months[1];
    assert_eq!(future.estimate_source, EstimateSource::HistoricalAverage);
    assert_eq!(future.expenses.variable, 200.0);
    assert_eq!(future.required_work_days, 1);
}

#[test]
fn pension_contribution_and_one_offs_add_to_each_month() {
    let mut cfg = settings(250.0);
    cfg.pension_contribution = 150.0;
    cfg.use_manual_estimates = true;
    cfg.manual_estimates = Some(ManualEstimates {
        fixed_expenses: 500.0,
        variable_expenses: 0.0,
        bill_expenses: 0.0,
    });
    let mut options = WorkPlanOptions::default();
    options.forecast_months = 2;
    options.family_transfer_monthly = 350.0;
    options.expected_expenses = vec![bilancio_core::forecast::ExpectedExpense {
        month: common::month(2024, 7),
        amount: 400.0,
        description: "bollo auto".into(),
    }];
    let plan = work_plan(
        &[],
        &[],
        &ProviderRegistry::default(),
        &cfg,
        &options,
        date(2024, 6, 15),
    );
    assert_eq!(plan.months[0].total_expenses, 1000.0);
    assert_eq!(plan.months[1].total_expenses, 1400.0);
    assert_eq!(plan.months[1].expected_expenses, 400.0);
}

#[test]
fn pension_goal_shortfall_becomes_extra_days() {
    let mut cfg = settings(200.0);
    cfg.pension_contribution = 50.0;
    cfg.pension_goal = Some(PensionGoalSettings {
        target_amount: 24_000.0,
        years: 10,
        expected_annual_return: 0.0,
    });
    let mut options = WorkPlanOptions::default();
    options.forecast_months = 1;
    let plan = work_plan(
        &[],
        &[],
        &ProviderRegistry::default(),
        &cfg,
        &options,
        date(2024, 6, 15),
    );
    let goal = plan.pension_goal.expect("pension goal");
    assert_eq!(goal.required_monthly_contribution, 200.0);
    assert_eq!(goal.monthly_gap, 150.0);
    assert_eq!(goal.extra_work_days_per_month, 1);
}

#[test]
fn trailing_invoices_seed_the_starting_balance() {
    let invoices = vec![paid_invoice(3000.0, date(2024, 4, 10))];
    let expenses = vec![grocery(400.0, date(2024, 5, 3))];
    let mut options = WorkPlanOptions::default();
    options.forecast_months = 1;
    let plan = work_plan(
        &invoices,
        &expenses,
        &ProviderRegistry::default(),
        &settings(300.0),
        &options,
        date(2024, 6, 15),
    );
    assert_eq!(plan.initial_balance, 2600.0);
}
