pub mod events;
pub mod gate;
pub mod routes;

pub use events::{AuthEvent, AuthEvents, AuthSubscription};
pub use gate::{session_gate, SessionContext, ACCESS_COOKIE, REFRESH_COOKIE};
pub use routes::{RouteClass, DASHBOARD_PATH, LOGIN_PATH};
