pub mod models;
pub mod queries;

pub use models::{CardSummary, InvoiceRow, InvoiceStatus, LatestInvoice, Revenue};
pub use queries::{DashboardData, ITEMS_PER_PAGE};
