//! Builder for IGDB's query body syntax (APIcalypse)
//!
//! Clauses render in a fixed order, one per line, each terminated by `;`:
//!
//! ```text
//! fields name,cover.image_id;
//! search "zelda";
//! where id = (1942);
//! sort first_release_date desc;
//! limit 10;
//! offset 20;
//! ```
//!
//! `where` predicates are passed through verbatim. The predicate grammar
//! belongs to IGDB, not to this client.

use super::error::{ApiError, ApiResult};

/// Sort direction for the `sort` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Fluent query builder
///
/// Fallible setters leave the builder untouched when they fail. `build` does
/// not consume or change the builder, so one configured builder can be
/// cloned or reused for many requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    fields: Vec<String>,
    search: Option<String>,
    predicate: Option<String>,
    sort: Option<(String, SortDirection)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl QueryBuilder {
    /// Creates an empty builder (renders `fields *;`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds fields to select, skipping ones already selected
    ///
    /// Every name must be a non-empty dotted path such as `cover.image_id`.
    /// If any name is invalid nothing is added.
    pub fn fields<I, S>(&mut self, names: I) -> ApiResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();

        if let Some(bad) = names.iter().find(|name| !is_valid_field(name)) {
            return Err(ApiError::invalid(format!("invalid field name {bad:?}")));
        }

        for name in names {
            if !self.fields.contains(&name) {
                self.fields.push(name);
            }
        }

        Ok(self)
    }

    /// Sets the search term; last call wins
    pub fn search(&mut self, term: impl AsRef<str>) -> &mut Self {
        self.search = Some(escape(term.as_ref()));
        self
    }

    /// Sets the filter predicate; last call wins
    pub fn where_clause(&mut self, predicate: impl Into<String>) -> &mut Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Sets the sort field and direction; last call wins
    pub fn sort(&mut self, field: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.sort = Some((field.into(), direction));
        self
    }

    /// Sets the result limit; must be positive
    pub fn limit(&mut self, n: i64) -> ApiResult<&mut Self> {
        if n <= 0 {
            return Err(ApiError::invalid(format!("limit must be positive, got {n}")));
        }
        self.limit = Some(n as u64);
        Ok(self)
    }

    /// Sets the number of results to skip
    pub fn offset(&mut self, n: i64) -> ApiResult<&mut Self> {
        if n < 0 {
            return Err(ApiError::invalid(format!("offset must not be negative, got {n}")));
        }
        self.offset = Some(n as u64);
        Ok(self)
    }

    /// Renders the query body
    pub fn build(&self) -> String {
        let mut clauses = Vec::with_capacity(6);

        if self.fields.is_empty() {
            clauses.push("fields *;".to_string());
        } else {
            clauses.push(format!("fields {};", self.fields.join(",")));
        }

        if let Some(term) = &self.search {
            clauses.push(format!("search \"{term}\";"));
        }

        if let Some(predicate) = &self.predicate {
            clauses.push(format!("where {predicate};"));
        }

        if let Some((field, direction)) = &self.sort {
            clauses.push(format!("sort {field} {};", direction.as_str()));
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("limit {limit};"));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("offset {offset};"));
        }

        clauses.join("\n")
    }
}

fn is_valid_field(name: &str) -> bool {
    name == "*"
        || (!name.is_empty()
            && name.split('.').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c == '*' || c == '_' || c.is_ascii_alphanumeric())
            }))
}

fn escape(term: &str) -> String {
    term.replace('\\', "\\\\").replace('"', "\\\"")
}
