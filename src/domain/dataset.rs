use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::{BudgetTransfer, Expense, FinancialSettings, Invoice};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory root the forecasting engines consume: all raw rows for one
/// household plus per-user settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub transfers: Vec<BudgetTransfer>,
    #[serde(default)]
    pub settings: Vec<FinancialSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Dataset::schema_version_default")]
    pub schema_version: u8,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            invoices: Vec::new(),
            expenses: Vec::new(),
            transfers: Vec::new(),
            settings: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_invoice(&mut self, invoice: Invoice) -> Uuid {
        let id = invoice.id;
        self.invoices.push(invoice);
        self.touch();
        id
    }

    pub fn add_expense(&mut self, mut expense: Expense) -> Uuid {
        expense.normalize();
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn create_transfer(&mut self, transfer: BudgetTransfer) -> Uuid {
        let id = transfer.id;
        self.transfers.push(transfer);
        self.touch();
        id
    }

    /// Bulk-inserts imported transfers, skipping rows whose
    /// `(to_user_id, bank_row_key)` pair is already present so re-running
    /// an import is idempotent. Returns the number of rows inserted.
    pub fn create_transfers_bulk(&mut self, transfers: Vec<BudgetTransfer>) -> usize {
        let mut seen: HashSet<(Uuid, String)> = self
            .transfers
            .iter()
            .filter_map(|t| t.bank_row_key.clone().map(|key| (t.to_user_id, key)))
            .collect();
        let mut inserted = 0usize;
        for transfer in transfers {
            if let Some(key) = transfer.bank_row_key.clone() {
                if !seen.insert((transfer.to_user_id, key)) {
                    continue;
                }
            }
            self.transfers.push(transfer);
            inserted += 1;
        }
        if inserted > 0 {
            self.touch();
        }
        inserted
    }

    pub fn delete_transfer(&mut self, id: Uuid) -> Result<BudgetTransfer, CoreError> {
        let index = self
            .transfers
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::TransferNotFound(id))?;
        let removed = self.transfers.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn settings_for(&self, user_id: Uuid) -> Option<&FinancialSettings> {
        self.settings.iter().find(|s| s.user_id == user_id)
    }

    /// Normalizes every row at the ingestion boundary (legacy category
    /// mapping). Call after deserializing external data.
    pub fn normalize(&mut self) {
        for expense in &mut self.expenses {
            expense.normalize();
        }
    }

    /// Boundary guard for the pure engines: rejects non-finite amounts
    /// outright. The engines themselves perform no validation and would
    /// propagate NaN into every downstream total.
    pub fn validate(&self) -> Result<(), CoreError> {
        for invoice in &self.invoices {
            for (label, value) in [
                ("total_amount", invoice.total_amount),
                ("paid_amount", invoice.paid_amount),
                ("remaining_amount", invoice.remaining_amount),
            ] {
                if !value.is_finite() {
                    return Err(CoreError::Validation(format!(
                        "invoice {} has non-finite {label}",
                        invoice.id
                    )));
                }
            }
        }
        for expense in &self.expenses {
            if !expense.amount.is_finite() {
                return Err(CoreError::Validation(format!(
                    "expense {} has non-finite amount",
                    expense.id
                )));
            }
            if expense.amount < 0.0 {
                return Err(CoreError::Validation(format!(
                    "expense {} has negative amount",
                    expense.id
                )));
            }
        }
        for transfer in &self.transfers {
            if !transfer.amount.is_finite() {
                return Err(CoreError::Validation(format!(
                    "transfer {} has non-finite amount",
                    transfer.id
                )));
            }
        }
        Ok(())
    }

    /// Soft consistency findings that do not block forecasting.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for invoice in &self.invoices {
            if invoice.is_paid() {
                if invoice.paid_date.is_none() {
                    warnings.push(format!("invoice {} is paid with no paid date", invoice.id));
                }
                if invoice.remaining_amount.abs() > f64::EPSILON {
                    warnings.push(format!(
                        "invoice {} is paid with nonzero remainder",
                        invoice.id
                    ));
                }
            } else {
                let expected = invoice.total_amount - invoice.paid_amount;
                if (invoice.remaining_amount - expected).abs() > 0.01 {
                    warnings.push(format!(
                        "invoice {} remainder {} does not match total - paid = {}",
                        invoice.id, invoice.remaining_amount, expected
                    ));
                }
            }
        }
        for expense in &self.expenses {
            if let Some(bill) = &expense.bill {
                if bill.is_paid && bill.paid_at.is_none() {
                    warnings.push(format!(
                        "bill expense {} is paid with no payment date",
                        expense.id
                    ));
                }
            }
        }
        warnings
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
