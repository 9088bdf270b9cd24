//! Row projections of the remote tables and views. All read-only from this
//! system's perspective.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

/// One row of the pre-joined `invoices_with_customers` view. `amount` is
/// integer cents; formatting happens at the display boundary only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub amount: i64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
}

/// Invoice projection for the dashboard's "latest invoices" card, amount
/// already currency-formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub amount: String,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
}

impl LatestInvoice {
    pub fn from_row(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            amount: crate::format::format_currency(row.amount),
            date: row.date,
            status: row.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub month: String,
    pub amount: i64,
}

/// Aggregate statistics for the dashboard landing page. Derived per request,
/// never persisted; totals are currency-formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub number_of_invoices: u64,
    pub number_of_customers: u64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}
