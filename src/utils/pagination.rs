/// One page of a longer list.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number, clamped to the valid range
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

/// Split `items` into pages of `per_page` and return the requested one.
///
/// An empty list still has one (empty) page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}
