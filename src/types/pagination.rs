//! Paginated list envelope.

use serde::Serialize;

/// One page of a list endpoint, with the totals needed to page through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub ok: bool,
    pub total_docs: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub page: u64,
    /// 1-based position of the first item of this page
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub payload: Vec<T>,
}

impl<T> PaginatedResult<T> {
    /// Convert the items of this page, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            ok: self.ok,
            total_docs: self.total_docs,
            limit: self.limit,
            total_pages: self.total_pages,
            page: self.page,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
            payload: self.payload.into_iter().map(f).collect(),
        }
    }
}

/// Wrap a fetched page and its total count into the list envelope.
///
/// There is always at least one page, even for an empty collection.
pub fn to_paginated_result<T>(items: Vec<T>, total: u64, page: u64, limit: u64) -> PaginatedResult<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total_pages = total.div_ceil(limit).max(1);

    PaginatedResult {
        ok: true,
        total_docs: total,
        limit,
        total_pages,
        page,
        paging_counter: (page - 1).saturating_mul(limit).saturating_add(1),
        has_prev_page: page > 1,
        has_next_page: page < total_pages,
        prev_page: (page > 1).then(|| page - 1),
        next_page: (page < total_pages).then(|| page + 1),
        payload: items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_has_one_page() {
        let result = to_paginated_result(Vec::<u8>::new(), 0, 1, 20);
        assert_eq!(result.total_pages, 1);
        assert!(!result.has_prev_page);
        assert!(!result.has_next_page);
        assert_eq!(result.prev_page, None);
        assert_eq!(result.next_page, None);
        assert_eq!(result.paging_counter, 1);
    }

    #[test]
    fn test_middle_page() {
        let result = to_paginated_result(vec![1, 2, 3], 45, 2, 20);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.paging_counter, 21);
        assert_eq!(result.prev_page, Some(1));
        assert_eq!(result.next_page, Some(3));
        assert!(result.has_prev_page && result.has_next_page);
    }

    #[test]
    fn test_exact_multiple_of_limit() {
        let result = to_paginated_result(vec![0; 20], 40, 2, 20);
        assert_eq!(result.total_pages, 2);
        assert!(!result.has_next_page);
        assert_eq!(result.next_page, None);
    }

    #[test]
    fn test_page_beyond_last_keeps_totals() {
        let result = to_paginated_result(Vec::<u8>::new(), 5, 9, 2);
        assert_eq!(result.total_docs, 5);
        assert_eq!(result.total_pages, 3);
        assert!(result.payload.is_empty());
        assert!(result.has_prev_page);
        assert!(!result.has_next_page);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(to_paginated_result(vec!["a"], 1, 1, 20)).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["totalDocs"], 1);
        assert_eq!(json["pagingCounter"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert!(json["nextPage"].is_null());
        assert_eq!(json["payload"][0], "a");
    }

    #[test]
    fn test_page_far_past_the_end() {
        let result = to_paginated_result(Vec::<u8>::new(), 5, u64::MAX, 100);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.paging_counter, u64::MAX);
        assert!(result.has_prev_page);
        assert!(!result.has_next_page);
        assert_eq!(result.next_page, None);
    }
}
