use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// A page of rows plus the number of rows matching the same filter.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }
}

impl<T: Serialize> IntoResponse for PaginatedResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    pub id: i32,
}

/// Page/limit pair with 1-based pages. Non-positive or missing pages fall back
/// to the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub page: u64,
}

impl PageWindow {
    pub const MAX_LIMIT: u64 = 1000;

    /// Returns `None` when `limit` is missing or non-positive, which selects the
    /// unpaginated listing.
    pub fn from_query(limit: Option<i64>, page: Option<i64>) -> Option<Self> {
        let limit = limit.filter(|l| *l > 0)? as u64;
        let page = page.filter(|p| *p > 0).unwrap_or(1) as u64;
        Some(Self {
            limit: limit.min(Self::MAX_LIMIT),
            page,
        })
    }

    /// Saturates at `i64::MAX`, the largest OFFSET Postgres accepts, so absurd
    /// pages yield an empty page rather than an overflow.
    pub fn offset(&self) -> i64 {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .and_then(|o| i64::try_from(o).ok())
            .unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_means_unpaginated() {
        assert_eq!(PageWindow::from_query(None, Some(2)), None);
        assert_eq!(PageWindow::from_query(Some(0), Some(2)), None);
        assert_eq!(PageWindow::from_query(Some(-5), None), None);
    }

    #[test]
    fn page_defaults_to_first() {
        let w = PageWindow::from_query(Some(10), None).unwrap();
        assert_eq!(w.page, 1);
        assert_eq!(w.offset(), 0);

        let w = PageWindow::from_query(Some(10), Some(0)).unwrap();
        assert_eq!(w.page, 1);

        let w = PageWindow::from_query(Some(10), Some(-3)).unwrap();
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let w = PageWindow::from_query(Some(25), Some(3)).unwrap();
        assert_eq!(w.offset(), 50);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let w = PageWindow::from_query(Some(1000), Some(i64::MAX)).unwrap();
        assert_eq!(w.offset(), i64::MAX);

        let w = PageWindow::from_query(Some(1000), Some(9_300_000_000_000_000)).unwrap();
        assert_eq!(w.offset(), i64::MAX);

        let w = PageWindow::from_query(Some(1), Some(i64::MAX)).unwrap();
        assert_eq!(w.offset(), i64::MAX - 1);
    }

    #[test]
    fn limit_is_capped() {
        let w = PageWindow::from_query(Some(50_000), Some(1)).unwrap();
        assert_eq!(w.limit, PageWindow::MAX_LIMIT);
    }

    #[test]
    fn paginated_response_serializes_data_and_total() {
        let resp = PaginatedResponse::new(vec![1, 2], 7);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["total"], 7);
        assert_eq!(v["data"].as_array().unwrap().len(), 2);
    }
}
