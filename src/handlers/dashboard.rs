//! Dashboard read endpoints. Each page fans out to independent data-layer
//! reads; a failed read renders as empty data, never as an error page.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::data::models::{InvoiceRow, InvoiceStatus};
use crate::format::format_currency;
use crate::state::AppState;

/// GET /dashboard - summary cards, revenue chart data, latest invoices.
pub async fn overview(State(state): State<AppState>) -> Json<Value> {
    let (cards, revenue, latest_invoices) = tokio::join!(
        state.data.fetch_card_data(),
        state.data.fetch_revenue(),
        state.data.fetch_latest_invoices(),
    );

    Json(json!({
        "success": true,
        "data": {
            "cards": cards,
            "revenue": revenue,
            "latest_invoices": latest_invoices,
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct InvoicesParams {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

/// Invoice row as displayed in the table, amount currency-formatted.
#[derive(Debug, Serialize)]
struct InvoiceItem {
    id: uuid::Uuid,
    name: String,
    email: String,
    image_url: Option<String>,
    amount: String,
    date: chrono::NaiveDate,
    status: InvoiceStatus,
}

impl From<InvoiceRow> for InvoiceItem {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            amount: format_currency(row.amount),
            date: row.date,
            status: row.status,
        }
    }
}

/// GET /dashboard/invoices?query=&page= - one filtered page plus the total
/// page count for the pagination control.
pub async fn invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoicesParams>,
) -> Json<Value> {
    let (rows, total_pages) = tokio::join!(
        state.data.fetch_filtered_invoices(&params.query, params.page),
        state.data.fetch_invoices_pages(&params.query),
    );

    let invoices: Vec<InvoiceItem> = rows.into_iter().map(InvoiceItem::from).collect();

    Json(json!({
        "success": true,
        "data": {
            "invoices": invoices,
            "total_pages": total_pages,
            "page": params.page,
        }
    }))
}
