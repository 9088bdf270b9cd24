//! Shared test doubles: a stub auth provider and an in-memory table store
//! that interprets the same request shape the real PostgREST client sends.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use uuid::Uuid;

use acme_dashboard_api::auth::{AuthError, AuthOutcome, AuthProvider, AuthUser, SessionTokens};
use acme_dashboard_api::state::AppState;
use acme_dashboard_api::store::{StoreError, TableQuery, TableStore};

pub fn some_user() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: Some("user@example.com".to_string()),
    }
}

/// Auth provider stub with a fixed answer.
pub struct StubAuth {
    pub user: Option<AuthUser>,
    pub refreshed: Option<SessionTokens>,
    pub unreachable: bool,
}

impl StubAuth {
    pub fn signed_in() -> Self {
        Self {
            user: Some(some_user()),
            refreshed: None,
            unreachable: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            refreshed: None,
            unreachable: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            user: None,
            refreshed: None,
            unreachable: true,
        }
    }

    pub fn with_refresh(mut self, tokens: SessionTokens) -> Self {
        self.refreshed = Some(tokens);
        self
    }
}

#[async_trait]
impl AuthProvider for StubAuth {
    async fn current_user(&self, _tokens: &SessionTokens) -> Result<AuthOutcome, AuthError> {
        if self.unreachable {
            return Err(AuthError::Provider("provider unreachable".to_string()));
        }
        match &self.user {
            Some(user) => Ok(AuthOutcome {
                user: user.clone(),
                refreshed: self.refreshed.clone(),
            }),
            None => Err(AuthError::SessionRejected),
        }
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        password: &str,
    ) -> Result<SessionTokens, AuthError> {
        if password == "correct-horse" {
            Ok(SessionTokens {
                access_token: "fresh-access".to_string(),
                refresh_token: "fresh-refresh".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn sign_out(&self, _tokens: &SessionTokens) -> Result<(), AuthError> {
        Ok(())
    }
}

/// In-memory store that executes the translated request shape (or-filter,
/// order, offset/limit) against fixture rows, so the data layer is exercised
/// end to end without a network.
#[derive(Default)]
pub struct FakeStore {
    tables: HashMap<String, Vec<Value>>,
    failing: HashSet<String>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, rows: Vec<Value>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    fn matching_rows(&self, query: &TableQuery) -> Result<Vec<Value>, StoreError> {
        let request = query.to_request();
        if self.failing.contains(&request.table) {
            return Err(StoreError::Remote {
                code: "57014".to_string(),
                message: format!("simulated failure for {}", request.table),
                details: None,
            });
        }

        let mut rows = self
            .tables
            .get(&request.table)
            .cloned()
            .unwrap_or_default();

        if let Some(or_value) = get_pair(&request.query_pairs, "or") {
            let disjuncts = parse_or_filter(&or_value);
            rows.retain(|row| row_matches(row, &disjuncts));
        }

        if let Some(order) = get_pair(&request.query_pairs, "order") {
            if let Some((column, direction)) = order.rsplit_once('.') {
                let column = column.to_string();
                rows.sort_by(|a, b| {
                    let left = a.get(&column).and_then(Value::as_str).unwrap_or("");
                    let right = b.get(&column).and_then(Value::as_str).unwrap_or("");
                    if direction == "desc" {
                        right.cmp(left)
                    } else {
                        left.cmp(right)
                    }
                });
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl TableStore for FakeStore {
    async fn select(&self, query: TableQuery) -> Result<Vec<Value>, StoreError> {
        let request = query.to_request();
        let rows = self.matching_rows(&query)?;

        let offset = get_pair(&request.query_pairs, "offset")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let limit = get_pair(&request.query_pairs, "limit")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(usize::MAX);

        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: TableQuery) -> Result<u64, StoreError> {
        Ok(self.matching_rows(&query)?.len() as u64)
    }
}

fn get_pair(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn parse_or_filter(value: &str) -> Vec<(String, String)> {
    value
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .filter_map(|disjunct| disjunct.split_once(".ilike."))
        .map(|(column, pattern)| {
            (
                column.to_string(),
                pattern.trim_matches('"').trim_matches('*').to_lowercase(),
            )
        })
        .collect()
}

fn row_matches(row: &Value, disjuncts: &[(String, String)]) -> bool {
    disjuncts.iter().any(|(column, needle)| {
        row.get(column)
            .and_then(Value::as_str)
            .map(|v| v.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

pub fn test_app(auth: StubAuth, store: FakeStore) -> Router {
    let state = AppState::new(Arc::new(auth), Arc::new(store));
    acme_dashboard_api::app(state)
}

pub fn test_state(auth: StubAuth, store: FakeStore) -> AppState {
    AppState::new(Arc::new(auth), Arc::new(store))
}
