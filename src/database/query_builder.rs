use serde_json::{Map, Value};
use sqlx::{self, postgres::PgArguments, PgPool, Row};

use crate::config;
use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;
use crate::filter::{Filter, FilterData};

/// Runs Filter statements against a table, returning rows as JSON objects
pub struct QueryBuilder {
    table_name: String,
    filter: Option<Filter>,
}

impl QueryBuilder {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = table_name.into();
        // Reuse Filter table name validation
        Filter::new(&name)?;
        Ok(Self { table_name: name, filter: None })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        let mut filter = Filter::new(&self.table_name)?;
        filter.assign(filter_data)?;
        self.filter = Some(filter);
        Ok(self)
    }

    /// Every matching row as a JSON object keyed by the selected columns
    pub async fn select_json(self, pool: &PgPool) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        let sql_result = match &self.filter {
            Some(filter) => filter.to_json_sql()?,
            None => Filter::new(&self.table_name)?.to_json_sql()?,
        };
        log_sql(&sql_result);

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let rows = q.fetch_all(pool).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Value::Object(map) = row.try_get::<Value, _>("row")? {
                out.push(map);
            }
        }
        Ok(out)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = match &self.filter {
            Some(filter) => filter.to_count_sql()?,
            None => SqlResult { query: format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table_name), params: vec![] },
        };
        log_sql(&sql_result);

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn log_sql(sql_result: &SqlResult) {
    if config::config().filter.debug_logging {
        tracing::debug!(query = %sql_result.query, params = ?sql_result.params, "filter sql");
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Arrays are expanded by FilterWhere before binding
        Value::Array(_) => q,
        Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}
