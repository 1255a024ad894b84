//! List declarations and report plans.
//!
//! A declaration is a `key=value` list separated by semicolons:
//!
//! ```text
//! type=path;name=Slowest paths;rows=20;sort=avg-time,count:asc;columns=index,avg-time,count,path
//! ```
//!
//! It goes through [`ListSpec::parse`] into a [`ListSpec`], then through
//! [`ListPlan::build`] into a plan whose columns and sort keys are all
//! resolved against the column registry. Executing the plan sorts a view
//! of the analysis and applies the row limit.

use super::columns::{Column, ListType, Row};
use crate::aggregator::AnalyzeResult;
use crate::utils::error::ListError;
use log::{debug, warn};
use std::cmp::Ordering;
use std::str::FromStr;

/// Columns shown when a path list declares none
pub const DEFAULT_PATH_COLUMNS: &str =
    "index,count,count-percent,time,time-percent,avg-time,requests,path";

/// Columns shown when a request list declares none
pub const DEFAULT_REQUEST_COLUMNS: &str =
    "index,count,count-percent,time,time-percent,avg-time,max-time,min-time,path";

/// A list declaration with its options validated but not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpec {
    pub list_type: ListType,
    pub name: Option<String>,
    pub columns: Option<String>,
    pub sort: Option<String>,
    /// `None` falls back to the caller's default, `<= 0` means all rows
    pub rows: Option<i64>,
}

impl ListSpec {
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            name: None,
            columns: None,
            sort: None,
            rows: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Parse a raw declaration
    ///
    /// **Public** - entry point for `--list` values
    ///
    /// # Errors
    /// * `ListError::MalformedPair` - a segment without `=`
    /// * `ListError::UnknownOption` - a key other than type/name/rows/sort/columns
    /// * `ListError::MissingType` / `ListError::InvalidType` - bad or absent `type`
    /// * `ListError::InvalidRows` - `rows` is not an integer
    pub fn parse(raw: &str) -> Result<Self, ListError> {
        let mut list_type = None;
        let mut name = None;
        let mut columns = None;
        let mut sort = None;
        let mut rows = None;

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ListError::MalformedPair(pair.to_string()))?;
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "type" => list_type = Some(value.parse::<ListType>()?),
                "name" => name = Some(value.to_string()),
                "columns" => columns = Some(value.to_string()),
                "sort" => sort = Some(value.to_string()),
                "rows" => {
                    let parsed = value
                        .parse::<i64>()
                        .map_err(|_| ListError::InvalidRows(value.to_string()))?;
                    rows = Some(parsed);
                }
                other => return Err(ListError::UnknownOption(other.to_string())),
            }
        }

        Ok(Self {
            list_type: list_type.ok_or(ListError::MissingType)?,
            name,
            columns,
            sort,
            rows,
        })
    }
}

impl FromStr for ListSpec {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Sort direction of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A resolved sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub direction: Direction,
}

impl SortKey {
    fn compare(&self, a: Row<'_>, b: Row<'_>, totals: &AnalyzeResult) -> Ordering {
        let ordering = self.column.compare(a, b, totals);
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// A fully resolved report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan {
    pub list_type: ListType,
    pub title: String,
    pub columns: Vec<Column>,
    pub sort: Vec<SortKey>,
    /// `None` keeps every row
    pub limit: Option<usize>,
    /// Names dropped while resolving columns and sort keys
    pub dropped: Vec<String>,
}

impl ListPlan {
    /// Resolve a declaration against the column registry
    ///
    /// **Public** - `default_rows` applies when the declaration has no `rows`
    ///
    /// Unknown, inapplicable and duplicate names are dropped with a warning;
    /// non-sortable columns are dropped from the sort keys only.
    ///
    /// # Errors
    /// * `ListError::NoColumns` - no display column survived
    /// * `ListError::NoSortColumn` - no sort key survived
    pub fn build(spec: &ListSpec, default_rows: i64) -> Result<Self, ListError> {
        let title = spec
            .name
            .clone()
            .unwrap_or_else(|| format!("custom {} list", spec.list_type));

        let mut dropped = Vec::new();

        let column_names = spec.columns.as_deref().unwrap_or(match spec.list_type {
            ListType::Path => DEFAULT_PATH_COLUMNS,
            ListType::Request => DEFAULT_REQUEST_COLUMNS,
        });
        let columns = resolve_columns(column_names, spec.list_type, &title, &mut dropped);
        if columns.is_empty() {
            return Err(ListError::NoColumns(title));
        }

        let sort = resolve_sort_keys(
            spec.sort.as_deref().unwrap_or_default(),
            spec.list_type,
            &title,
            &mut dropped,
        );
        if sort.is_empty() {
            return Err(ListError::NoSortColumn(title));
        }

        let rows = spec.rows.unwrap_or(default_rows);
        let limit = usize::try_from(rows).ok().filter(|&n| n > 0);

        debug!(
            "Built plan '{}': {} columns, {} sort keys, limit {:?}",
            title,
            columns.len(),
            sort.len(),
            limit
        );

        Ok(Self {
            list_type: spec.list_type,
            title,
            columns,
            sort,
            limit,
            dropped,
        })
    }

    /// Compare two rows on every sort key in turn
    pub fn compare(&self, a: Row<'_>, b: Row<'_>, totals: &AnalyzeResult) -> Ordering {
        self.sort
            .iter()
            .map(|key| key.compare(a, b, totals))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sort a view of the analysis and apply the row limit
    ///
    /// **Public** - the analysis itself is never reordered
    pub fn execute<'a>(&self, result: &'a AnalyzeResult) -> Vec<Row<'a>> {
        let mut rows: Vec<Row<'a>> = match self.list_type {
            ListType::Path => result.calls.iter().map(Row::Call).collect(),
            ListType::Request => result.requests.iter().map(Row::Request).collect(),
        };

        // Stable, exact ties keep first-seen order
        rows.sort_by(|a, b| self.compare(*a, *b, result));

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        rows
    }
}

fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(',').map(str::trim).filter(|n| !n.is_empty())
}

/// Resolve one name, logging and recording it when it is unusable
fn resolve(
    name: &str,
    list_type: ListType,
    title: &str,
    dropped: &mut Vec<String>,
) -> Option<Column> {
    let Some(column) = Column::from_key(name) else {
        warn!("List '{}': unknown column '{}' dropped", title, name);
        dropped.push(name.to_string());
        return None;
    };

    if !column.applies_to(list_type) {
        warn!(
            "List '{}': column '{}' does not apply to {} lists, dropped",
            title, name, list_type
        );
        dropped.push(name.to_string());
        return None;
    }

    Some(column)
}

fn resolve_columns(
    names: &str,
    list_type: ListType,
    title: &str,
    dropped: &mut Vec<String>,
) -> Vec<Column> {
    let mut columns = Vec::new();

    for name in split_names(names) {
        if let Some(column) = resolve(name, list_type, title, dropped) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }

    columns
}

fn resolve_sort_keys(
    names: &str,
    list_type: ListType,
    title: &str,
    dropped: &mut Vec<String>,
) -> Vec<SortKey> {
    let mut keys: Vec<SortKey> = Vec::new();

    for entry in split_names(names) {
        let (name, direction) = match entry.rsplit_once(':') {
            Some((name, dir)) => match dir.trim().to_ascii_lowercase().as_str() {
                "asc" => (name.trim(), Direction::Ascending),
                "desc" => (name.trim(), Direction::Descending),
                _ => {
                    warn!("List '{}': invalid sort direction in '{}', dropped", title, entry);
                    dropped.push(entry.to_string());
                    continue;
                }
            },
            None => (entry, Direction::Descending),
        };

        let Some(column) = resolve(name, list_type, title, dropped) else {
            continue;
        };

        if !column.is_sortable() {
            warn!("List '{}': column '{}' is not sortable, dropped from sort", title, name);
            dropped.push(name.to_string());
            continue;
        }

        if keys.iter().all(|key| key.column != column) {
            keys.push(SortKey { column, direction });
        }
    }

    keys
}
