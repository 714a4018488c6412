//! Normalized domain records and the dataset root the engines consume.

pub mod dataset;
pub mod expense;
pub mod invoice;
pub mod month;
pub mod settings;
pub mod transfer;

pub use dataset::Dataset;
pub use expense::{Bill, BillKind, CategoryParent, Expense, PaymentMethod, SubscriptionKind};
pub use invoice::{Invoice, InvoiceStatus};
pub use month::{days_in_month, shift_month, MonthKey};
pub use settings::{FinancialSettings, ManualEstimates, PensionGoalSettings};
pub use transfer::BudgetTransfer;
