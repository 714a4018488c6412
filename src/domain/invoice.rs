use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Freelance invoice as tracked for income forecasting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub status: InvoiceStatus,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub total_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    /// Stored remainder; kept in sync with `total_amount - paid_amount`
    /// by the lifecycle helpers and checked by dataset warnings.
    #[serde(default)]
    pub remaining_amount: f64,
    #[serde(default)]
    pub exclude_from_budget: bool,
}

/// Invoice lifecycle. Forward-only: `Bozza` → `Inviata` → (`Parziale` →)
/// `Pagata`; a direct `Inviata` → `Pagata` jump is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Bozza,
    Inviata,
    Parziale,
    Pagata,
}

impl Invoice {
    pub fn new(invoice_date: NaiveDate, due_date: NaiveDate, total_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: InvoiceStatus::Bozza,
            invoice_date,
            due_date,
            paid_date: None,
            total_amount,
            paid_amount: 0.0,
            remaining_amount: total_amount,
            exclude_from_budget: false,
        }
    }

    pub fn sent(mut self) -> Self {
        self.status = InvoiceStatus::Inviata;
        self
    }

    /// Records a partial payment, moving the invoice to `Parziale` (or
    /// `Pagata` when the remainder reaches zero).
    pub fn record_payment(&mut self, amount: f64, on: NaiveDate) {
        self.paid_amount += amount;
        self.paid_date = Some(on);
        self.remaining_amount = (self.total_amount - self.paid_amount).max(0.0);
        self.status = if self.remaining_amount <= f64::EPSILON {
            self.remaining_amount = 0.0;
            InvoiceStatus::Pagata
        } else {
            InvoiceStatus::Parziale
        };
    }

    /// Marks the invoice fully paid on the given date.
    pub fn mark_paid(&mut self, on: NaiveDate) {
        self.paid_amount = self.total_amount;
        self.remaining_amount = 0.0;
        self.paid_date = Some(on);
        self.status = InvoiceStatus::Pagata;
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Pagata
    }

    pub fn is_draft(&self) -> bool {
        self.status == InvoiceStatus::Bozza
    }

    /// Outstanding amount still expected for this invoice.
    pub fn outstanding(&self) -> f64 {
        match self.status {
            InvoiceStatus::Pagata => 0.0,
            _ => self.remaining_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Invoice {
        Invoice::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            1500.0,
        )
    }

    #[test]
    fn partial_payment_tracks_remainder() {
        let mut invoice = sample().sent();
        invoice.record_payment(500.0, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        assert_eq!(invoice.status, InvoiceStatus::Parziale);
        assert_eq!(invoice.remaining_amount, 1000.0);
        assert_eq!(invoice.outstanding(), 1000.0);
    }

    #[test]
    fn full_payment_reaches_pagata_with_zero_remainder() {
        let mut invoice = sample().sent();
        invoice.record_payment(1500.0, NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
        assert_eq!(invoice.status, InvoiceStatus::Pagata);
        assert_eq!(invoice.remaining_amount, 0.0);
    }

    #[test]
    fn direct_inviata_to_pagata_is_allowed() {
        let mut invoice = sample().sent();
        invoice.mark_paid(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
        assert!(invoice.is_paid());
        assert_eq!(invoice.paid_amount, invoice.total_amount);
    }
}
