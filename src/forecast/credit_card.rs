use chrono::NaiveDate;

use crate::domain::{Expense, MonthKey, PaymentMethod};

/// Day of the month the card issuer books the previous month's purchases.
const STATEMENT_DAY: u32 = 10;

/// Statement date for a card purchase: day 10 of the month following the
/// purchase month.
pub fn booked_date(purchase_date: NaiveDate) -> NaiveDate {
    let statement_month = MonthKey::from_date(purchase_date).next();
    NaiveDate::from_ymd_opt(statement_month.year(), statement_month.month(), STATEMENT_DAY)
        .unwrap()
}

/// Month a card purchase impacts cash flow.
pub fn booked_month(purchase_date: NaiveDate) -> MonthKey {
    MonthKey::from_date(booked_date(purchase_date))
}

/// Whether the expense has hit the ledger yet. Non-card expenses post
/// immediately; card purchases post on their statement date.
pub fn is_booked(expense: &Expense, today: NaiveDate) -> bool {
    if expense.payment_method != PaymentMethod::CartaCredito {
        return true;
    }
    let purchase = expense.purchase_date.unwrap_or(expense.date);
    today >= booked_date(purchase)
}
