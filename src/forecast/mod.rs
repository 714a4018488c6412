//! Forecasting engines: monthly bucketing and balances, provider billing
//! cycles, credit-card deferral, accumulated carryover, and the work plan.
//!
//! Every function here is pure over already-fetched rows: no I/O, no
//! shared state, identical inputs always produce identical outputs.

pub mod accumulated;
pub mod credit_card;
pub mod monthly;
pub mod providers;
pub mod work_plan;

pub use accumulated::{accumulate, AccumulatedBudget};
pub use credit_card::{booked_date, booked_month, is_booked};
pub use monthly::{
    monthly_forecast, BillLine, ForecastOptions, MonthSummary, MonthlyForecast, Profile,
    TrackMonth,
};
pub use providers::{estimate_provider_cycles, total_bill_estimate, ProviderForecast};
pub use work_plan::{
    required_monthly_contribution, work_plan, EstimateSource, ExpectedExpense, ExpenseBreakdown,
    InitialBalanceSource, MonthStatus, PensionGoalPlan, WorkPlan, WorkPlanMonth, WorkPlanOptions,
    WorkPlanSummary,
};
