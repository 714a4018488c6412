use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::MonthKey;

/// A household budget transfer between two profiles.
///
/// Immutable once created except for deletion. Negative amounts are
/// corrective adjustments (resets), so the type carries a signed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetTransfer {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub amount: f64,
    /// Budget month the transfer funds, independent of `transfer_date`.
    pub month: MonthKey,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_date: Option<NaiveDate>,
    /// Dedup key for rows originating from a bank-statement import;
    /// uniqueness is enforced per recipient on bulk insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_row_key: Option<String>,
}

impl BudgetTransfer {
    pub fn new(
        from_user_id: Uuid,
        to_user_id: Uuid,
        amount: f64,
        month: MonthKey,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_user_id,
            to_user_id,
            amount,
            month,
            description: description.into(),
            transfer_date: None,
            bank_row_key: None,
        }
    }

    pub fn with_bank_row_key(mut self, key: impl Into<String>) -> Self {
        self.bank_row_key = Some(key.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.transfer_date = Some(date);
        self
    }
}
