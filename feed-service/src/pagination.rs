/// `ceil(total_count / limit)`. A zero limit yields zero pages.
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit)
}

/// 1-based page number for `offset`.
///
/// Uses the configured page size rather than the request's `limit`, so the
/// two can disagree when a client asks for a non-default window.
pub fn page_number(offset: u64, items_per_page: u64) -> u64 {
    offset.checked_div(items_per_page).unwrap_or(0) + 1
}
