//! Static route classification for the session gate.

/// Paths reachable without an authenticated session.
pub const PUBLIC_PATHS: &[&str] = &["/", "/login"];

/// Where an authenticated user lands by default.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Where an unauthenticated user is sent for protected paths.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteClass {
    Public,
    Protected,
    /// Infrastructure paths the gate ignores entirely (liveness probes carry
    /// no cookies and must never be redirected).
    Bypass,
}

pub fn classify(path: &str) -> RouteClass {
    if path == "/health" {
        return RouteClass::Bypass;
    }
    if PUBLIC_PATHS.contains(&path) {
        RouteClass::Public
    } else {
        RouteClass::Protected
    }
}
