//! Typed query parameters for the remote tabular store.
//!
//! Each data-access operation fills a [`TableQuery`] and hands it to the
//! client; [`TableQuery::to_request`] is the single place where the logical
//! query becomes the PostgREST wire shape (query-string pairs plus a
//! `Prefer` header), so every operation's external request is verifiable
//! without touching the network.

use super::error::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Row-count accuracy requested from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountMode {
    Exact,
    Planned,
    Estimated,
}

impl CountMode {
    fn as_str(&self) -> &'static str {
        match self {
            CountMode::Exact => "exact",
            CountMode::Planned => "planned",
            CountMode::Estimated => "estimated",
        }
    }
}

/// HTTP method the translated request should use. `Head` fetches metadata
/// (row counts) without transferring rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestMethod {
    Get,
    Head,
}

/// The wire shape of one store request: everything the HTTP client needs,
/// already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub method: RequestMethod,
    pub table: String,
    pub query_pairs: Vec<(String, String)>,
    pub prefer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TableQuery {
    table: String,
    select_columns: Vec<String>,
    or_ilike: Vec<(String, String)>,
    order: Option<(String, SortDirection)>,
    limit: Option<u64>,
    offset: Option<u64>,
    count: Option<CountMode>,
    head: bool,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        validate_identifier(&table).map_err(StoreError::InvalidTableName)?;
        Ok(Self {
            table,
            select_columns: vec![],
            or_ilike: vec![],
            order: None,
            limit: None,
            offset: None,
            count: None,
            head: false,
        })
    }

    pub fn select(mut self, columns: &[&str]) -> Result<Self, StoreError> {
        for column in columns {
            validate_identifier(column).map_err(StoreError::InvalidColumn)?;
        }
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        Ok(self)
    }

    /// Add a case-insensitive substring match on `column`; multiple calls are
    /// OR'd together by the store.
    pub fn or_ilike(
        mut self,
        column: impl Into<String>,
        needle: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let column = column.into();
        validate_identifier(&column).map_err(StoreError::InvalidColumn)?;
        self.or_ilike.push((column, needle.into()));
        Ok(self)
    }

    pub fn order_by(
        mut self,
        column: impl Into<String>,
        direction: SortDirection,
    ) -> Result<Self, StoreError> {
        let column = column.into();
        validate_identifier(&column).map_err(StoreError::InvalidColumn)?;
        self.order = Some((column, direction));
        Ok(self)
    }

    /// Inclusive zero-based row window `[offset, offset + limit)`.
    pub fn range(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn count(mut self, mode: CountMode) -> Self {
        self.count = Some(mode);
        self
    }

    /// Metadata-only request: no rows come back, only headers (used with
    /// [`TableQuery::count`] to get a row count cheaply).
    pub fn head_only(mut self) -> Self {
        self.head = true;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Translate this logical query into the store's request shape. This is
    /// the only place the PostgREST syntax is produced.
    pub fn to_request(&self) -> StoreRequest {
        let mut pairs: Vec<(String, String)> = Vec::new();

        let select = if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.join(",")
        };
        pairs.push(("select".to_string(), select));

        if !self.or_ilike.is_empty() {
            let disjuncts: Vec<String> = self
                .or_ilike
                .iter()
                .map(|(column, needle)| {
                    format!("{}.ilike.{}", column, ilike_pattern(needle))
                })
                .collect();
            pairs.push(("or".to_string(), format!("({})", disjuncts.join(","))));
        }

        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }

        StoreRequest {
            method: if self.head { RequestMethod::Head } else { RequestMethod::Get },
            table: self.table.clone(),
            query_pairs: pairs,
            prefer: self.count.map(|mode| format!("count={}", mode.as_str())),
        }
    }
}

/// Build the store's ilike pattern for a substring search. Characters that
/// are structural inside an `or=(...)` group force the quoted form.
fn ilike_pattern(needle: &str) -> String {
    const RESERVED: &[char] = &[',', '(', ')', '"', '.'];
    let pattern = format!("*{}*", needle);
    if pattern.contains(RESERVED) {
        format!("\"{}\"", pattern.replace('"', ""))
    } else {
        pattern
    }
}

fn validate_identifier(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    if name.is_empty() || !valid_start || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(name.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn select_all_is_default() {
        let request = TableQuery::new("revenue").unwrap().to_request();
        assert_eq!(request.method, RequestMethod::Get);
        assert_eq!(request.table, "revenue");
        assert_eq!(request.query_pairs, vec![pair("select", "*")]);
        assert_eq!(request.prefer, None);
    }

    #[test]
    fn filtered_invoice_page_request_shape() {
        let request = TableQuery::new("invoices_with_customers")
            .unwrap()
            .or_ilike("name", "lee")
            .unwrap()
            .or_ilike("email", "lee")
            .unwrap()
            .order_by("date", SortDirection::Desc)
            .unwrap()
            .range(6, 6)
            .to_request();

        assert_eq!(
            request.query_pairs,
            vec![
                pair("select", "*"),
                pair("or", "(name.ilike.*lee*,email.ilike.*lee*)"),
                pair("order", "date.desc"),
                pair("limit", "6"),
                pair("offset", "6"),
            ]
        );
    }

    #[test]
    fn head_count_request_shape() {
        let request = TableQuery::new("customers")
            .unwrap()
            .count(CountMode::Exact)
            .head_only()
            .to_request();

        assert_eq!(request.method, RequestMethod::Head);
        assert_eq!(request.prefer.as_deref(), Some("count=exact"));
    }

    #[test]
    fn explicit_columns_are_joined() {
        let request = TableQuery::new("invoices")
            .unwrap()
            .select(&["count"])
            .unwrap()
            .to_request();
        assert_eq!(request.query_pairs, vec![pair("select", "count")]);
    }

    #[test]
    fn structural_characters_force_quoted_pattern() {
        let request = TableQuery::new("invoices_with_customers")
            .unwrap()
            .or_ilike("email", "a,b@example.com")
            .unwrap()
            .to_request();
        assert_eq!(
            request.query_pairs[1],
            pair("or", "(email.ilike.\"*a,b@example.com*\")")
        );
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!(TableQuery::new("invoices; drop table").is_err());
        assert!(TableQuery::new("1invoices").is_err());
        assert!(TableQuery::new("revenue")
            .unwrap()
            .or_ilike("name or 1=1", "x")
            .is_err());
    }
}
