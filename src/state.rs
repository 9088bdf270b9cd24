use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::data::DashboardData;
use crate::session::events::AuthEvents;
use crate::store::TableStore;

/// Shared application state. Both external clients are stateless handles;
/// nothing here is mutated across requests.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn TableStore>,
    pub data: Arc<DashboardData>,
    pub events: AuthEvents,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn TableStore>) -> Self {
        Self {
            auth,
            data: Arc::new(DashboardData::new(store.clone())),
            store,
            events: AuthEvents::new(),
        }
    }
}
