use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single expense row as the engines consume it.
///
/// Loose legacy tags are normalized into the closed enums below at the
/// ingestion boundary (see [`Expense::normalize`]); the forecasting code
/// never inspects the raw `legacy_category` string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    /// Transaction date.
    pub date: NaiveDate,
    /// Effective ledger date when it differs from `date` (credit-card
    /// statements, delayed debits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    /// Raw legacy flat category tag, kept only until normalization.
    #[serde(default, rename = "category", skip_serializing_if = "Option::is_none")]
    pub legacy_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_parent: Option<CategoryParent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_child: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill: Option<Bill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_transfer_id: Option<Uuid>,
    #[serde(default)]
    pub is_family_expense: bool,
    /// Owning profile for shared-household visibility filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<Uuid>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
            booked_date: None,
            purchase_date: None,
            legacy_category: None,
            category_parent: None,
            category_child: None,
            payment_method,
            recurring: false,
            bill: None,
            subscription: None,
            linked_transfer_id: None,
            is_family_expense: false,
            paid_by: None,
        }
    }

    pub fn with_bill(mut self, bill: Bill) -> Self {
        self.bill = Some(bill);
        self
    }

    pub fn with_subscription(mut self, kind: SubscriptionKind) -> Self {
        self.subscription = Some(kind);
        self
    }

    pub fn with_category(mut self, parent: CategoryParent, child: Option<String>) -> Self {
        self.category_parent = Some(parent);
        self.category_child = child;
        self
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    pub fn is_bill(&self) -> bool {
        self.bill.is_some()
    }

    /// Ledger date used for month bucketing outside the credit-card path.
    pub fn effective_date(&self) -> NaiveDate {
        self.booked_date.unwrap_or(self.date)
    }

    /// Maps the legacy flat category tag onto the hierarchical pair when
    /// the row predates the split. Already-normalized rows are untouched.
    pub fn normalize(&mut self) {
        if self.category_parent.is_some() {
            return;
        }
        if let Some(raw) = self.legacy_category.as_deref() {
            let (parent, child) = map_legacy_category(raw);
            self.category_parent = Some(parent);
            if self.category_child.is_none() {
                self.category_child = child;
            }
        }
    }
}

/// Settlement instrument for an expense row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Contanti,
    Bancomat,
    CartaCredito,
    Bonifico,
}

/// Hierarchical parent category, covering the legacy flat tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryParent {
    Fisse,
    Variabili,
    Abbonamenti,
    FinanzaObblighi,
    CasaUtenze,
    Trasporti,
    Salute,
    Svago,
    Altro,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    Streaming,
    Palestra,
    Software,
    Telefonia,
    Altro,
}

/// Utility-bill metadata attached to an expense row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub kind: BillKind,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_unit: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<NaiveDate>,
}

impl Bill {
    pub fn new(kind: BillKind, provider: impl Into<String>) -> Self {
        Self {
            kind,
            provider: provider.into(),
            period_start: None,
            period_end: None,
            consumption_value: None,
            consumption_unit: None,
            is_paid: false,
            paid_at: None,
        }
    }

    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period_start = Some(start);
        self.period_end = Some(end);
        self
    }

    pub fn paid(mut self, at: NaiveDate) -> Self {
        self.is_paid = true;
        self.paid_at = Some(at);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    Luce,
    Gas,
    Acqua,
    Internet,
    Telefono,
    Rifiuti,
    Altro,
}

fn map_legacy_category(raw: &str) -> (CategoryParent, Option<String>) {
    match raw.trim().to_lowercase().as_str() {
        "fissa" | "fisse" => (CategoryParent::Fisse, None),
        "variabile" | "variabili" => (CategoryParent::Variabili, None),
        "abbonamenti" => (CategoryParent::Abbonamenti, None),
        "finanza_obblighi" => (CategoryParent::FinanzaObblighi, None),
        "bollette" | "utenze" | "casa_utenze" => (CategoryParent::CasaUtenze, None),
        "trasporti" => (CategoryParent::Trasporti, None),
        "salute" => (CategoryParent::Salute, None),
        "svago" => (CategoryParent::Svago, None),
        other => (CategoryParent::Altro, Some(other.to_string())),
    }
}
