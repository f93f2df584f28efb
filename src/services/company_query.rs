use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::config;
use crate::database::models::company::COMPANY_COLUMNS;
use crate::filter::error::FilterError;
use crate::filter::filter_order::FilterOrder;
use crate::filter::{FilterData, FilterOrderInfo, PageRequest};
use crate::sanitize::is_safe_key;

/// Query-string keys that drive the listing instead of filtering it
const RESERVED_KEYS: &[&str] = &["select", "sort", "page", "limit"];

/// Text columns a listing may filter on. `id` is excluded because its values
/// arrive as strings and the column is a UUID.
const FILTER_COLUMNS: &[&str] = &["name", "address", "website", "description", "tel", "quote"];

/// Parsed company listing request
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyQuery {
    pub filters: Map<String, Value>,
    pub select: Option<Vec<String>>,
    pub order: Vec<FilterOrderInfo>,
    pub page: PageRequest,
}

/// Per-field filter accumulated while reading pairs
enum FieldFilter {
    Eq(String),
    Ops(Map<String, Value>),
}

impl CompanyQuery {
    /// Build from raw query-string pairs in arrival order.
    ///
    /// `field=v` filters by equality and `field[gt|gte|lt|lte|in]=v` by
    /// comparison. A repeated plain key keeps its last value, `in` values
    /// are split on commas and accumulate. Keys that are unsafe or not
    /// filterable company fields are dropped; other bracket operators fail.
    pub fn from_params(pairs: &[(String, String)]) -> Result<Self, FilterError> {
        let mut reserved: HashMap<&str, &str> = HashMap::new();
        let mut fields: Vec<(String, FieldFilter)> = Vec::new();

        for (key, value) in pairs {
            if let Some(name) = RESERVED_KEYS.iter().find(|k| **k == key.as_str()) {
                reserved.insert(*name, value.as_str());
                continue;
            }

            let (field, op) = split_bracket(key);
            if !is_safe_key(field) {
                tracing::debug!("Dropping unsafe query key {:?}", key);
                continue;
            }
            if !FILTER_COLUMNS.contains(&field) {
                tracing::debug!("Dropping filter on unknown field {:?}", field);
                continue;
            }

            let index = match fields.iter().position(|(name, _)| name == field) {
                Some(index) => index,
                None => {
                    fields.push((field.to_string(), FieldFilter::Ops(Map::new())));
                    fields.len() - 1
                }
            };
            let slot = &mut fields[index].1;

            match op {
                None => *slot = FieldFilter::Eq(value.clone()),
                Some(op) => apply_operator(slot, op, value)?,
            }
        }

        let filters = fields
            .into_iter()
            .filter_map(|(name, filter)| match filter {
                FieldFilter::Eq(value) => Some((name, Value::String(value))),
                FieldFilter::Ops(ops) if ops.is_empty() => None,
                FieldFilter::Ops(ops) => Some((name, Value::Object(ops))),
            })
            .collect();

        let filter_config = &config::config().filter;
        Ok(Self {
            filters,
            select: reserved.get("select").and_then(|s| parse_select(s)),
            order: parse_sort(reserved.get("sort").copied()),
            page: PageRequest::from_params(
                reserved.get("page").copied(),
                reserved.get("limit").copied(),
                filter_config.default_limit,
                filter_config.max_limit,
            ),
        })
    }

    /// Filter statement for the requested page
    pub fn to_filter_data(&self) -> FilterData {
        let columns = self
            .select
            .clone()
            .unwrap_or_else(|| COMPANY_COLUMNS.iter().map(|c| c.to_string()).collect());

        FilterData {
            select: Some(columns),
            where_clause: Some(Value::Object(self.filters.clone())),
            order: Some(self.order.clone()),
            limit: Some(self.page.take()),
            offset: Some(self.page.skip()),
        }
    }
}

/// `name[gte]` -> (`name`, Some(`gte`)); keys without a trailing bracket pass through
fn split_bracket(key: &str) -> (&str, Option<&str>) {
    match key.find('[') {
        Some(open) if key.ends_with(']') => (&key[..open], Some(&key[open + 1..key.len() - 1])),
        _ => (key, None),
    }
}

fn apply_operator(slot: &mut FieldFilter, op: &str, value: &str) -> Result<(), FilterError> {
    if let FieldFilter::Eq(_) = slot {
        *slot = FieldFilter::Ops(Map::new());
    }
    let FieldFilter::Ops(ops) = slot else {
        return Ok(());
    };

    // Only whole operator tokens are translated, never substrings of a name
    match op {
        "gt" | "gte" | "lt" | "lte" => {
            ops.insert(format!("${}", op), Value::String(value.to_string()));
        }
        "in" => {
            let entry = ops
                .entry("$in".to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(values) = entry {
                values.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(|v| Value::String(v.to_string())),
                );
            }
        }
        other => return Err(FilterError::UnsupportedOperator(other.to_string())),
    }
    Ok(())
}

/// Selected company columns, always including `id`. Unknown names are ignored.
fn parse_select(spec: &str) -> Option<Vec<String>> {
    let requested: Vec<&str> = spec.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    if requested.is_empty() {
        return None;
    }

    let mut columns = vec!["id".to_string()];
    for column in requested {
        if COMPANY_COLUMNS.contains(&column) && !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
    }
    Some(columns)
}

fn parse_sort(spec: Option<&str>) -> Vec<FilterOrderInfo> {
    let order: Vec<FilterOrderInfo> = spec
        .map(FilterOrder::parse)
        .unwrap_or_default()
        .into_iter()
        .filter(|info| COMPANY_COLUMNS.contains(&info.column.as_str()))
        .collect();

    if order.is_empty() {
        vec![FilterOrderInfo::asc("name")]
    } else {
        order
    }
}
