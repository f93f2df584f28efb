use serde::Serialize;

/// Requested page window, always `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Lenient parsing: missing, unparsable or non-positive values fall back to
    /// page 1 and `default_limit`. The limit is capped at `max_limit`.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: i64,
        max_limit: Option<i64>,
    ) -> Self {
        let default_limit = default_limit.max(1);
        let page = parse_positive(page).unwrap_or(1);
        let mut limit = parse_positive(limit).unwrap_or(default_limit);
        if let Some(max) = max_limit.filter(|max| *max >= 1) {
            if limit > max {
                tracing::debug!("Limit {} exceeds max {}, capping to max", limit, max);
                limit = max;
            }
        }
        Self { page, limit }
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn take(&self) -> i64 {
        self.limit
    }
}

fn parse_positive(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
}

/// Hint telling a client how to request an adjacent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCue {
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageCue>,
}

impl Pagination {
    /// `total` is the size of the whole collection, not of the filtered result.
    pub fn compute(request: PageRequest, total: i64) -> Self {
        let next = (request.skip().saturating_add(request.limit) < total).then(|| PageCue {
            page: request.page + 1,
            limit: request.limit,
        });
        let prev = (request.page > 1).then(|| PageCue {
            page: request.page - 1,
            limit: request.limit,
        });
        Self { next, prev }
    }
}
