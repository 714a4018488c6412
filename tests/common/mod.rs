#![allow(dead_code)]

use bilancio_core::domain::{
    BudgetTransfer, Expense, Invoice, MonthKey, PaymentMethod,
};
use chrono::NaiveDate;
use uuid::Uuid;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn month(year: i32, month_number: u32) -> MonthKey {
    MonthKey::new(year, month_number).unwrap()
}

/// An invoice fully paid on `paid`, worth `amount`.
pub fn paid_invoice(amount: f64, paid: NaiveDate) -> Invoice {
    let mut invoice = Invoice::new(paid - chrono::Duration::days(30), paid, amount).sent();
    invoice.mark_paid(paid);
    invoice
}

/// A plain bancomat expense on `on`, classifying as variable.
pub fn grocery(amount: f64, on: NaiveDate) -> Expense {
    Expense::new("Spesa Esselunga", amount, on, PaymentMethod::Bancomat)
}

pub fn transfer_to(recipient: Uuid, amount: f64, key: MonthKey) -> BudgetTransfer {
    BudgetTransfer::new(Uuid::new_v4(), recipient, amount, key, "budget mensile")
}
