use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user financial configuration consumed by the work-plan engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSettings {
    pub user_id: Uuid,
    /// Gross freelance income per worked day.
    pub daily_rate: f64,
    /// Typical delay between an invoice's due date and the actual
    /// payment, in days.
    #[serde(default)]
    pub payment_delay_days: i64,
    /// Fixed monthly pension contribution currently configured.
    #[serde(default)]
    pub pension_contribution: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pension_goal: Option<PensionGoalSettings>,
    /// Manual monthly expense estimates, used when
    /// `use_manual_estimates` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_estimates: Option<ManualEstimates>,
    /// Starting balance override, used when
    /// `use_custom_initial_balance` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<f64>,
    #[serde(default)]
    pub use_manual_estimates: bool,
    #[serde(default)]
    pub use_custom_initial_balance: bool,
}

impl FinancialSettings {
    pub fn new(user_id: Uuid, daily_rate: f64) -> Self {
        Self {
            user_id,
            daily_rate,
            payment_delay_days: 0,
            pension_contribution: 0.0,
            pension_goal: None,
            manual_estimates: None,
            initial_balance: None,
            use_manual_estimates: false,
            use_custom_initial_balance: false,
        }
    }
}

/// Target for the pension annuity calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PensionGoalSettings {
    pub target_amount: f64,
    pub years: u32,
    /// Expected annual return, e.g. `0.04` for 4%.
    pub expected_annual_return: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ManualEstimates {
    #[serde(default)]
    pub fixed_expenses: f64,
    #[serde(default)]
    pub variable_expenses: f64,
    #[serde(default)]
    pub bill_expenses: f64,
}

impl ManualEstimates {
    pub fn total(&self) -> f64 {
        self.fixed_expenses + self.variable_expenses + self.bill_expenses
    }
}
