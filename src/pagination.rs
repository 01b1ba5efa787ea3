use serde::Serialize;

/// Number of products shown per listing page when nothing else is configured.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;

/// Number of page links rendered on each side of the current page.
const PAGER_RADIUS: usize = 2;

/// Page window requested from a repository (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows skipped before the requested page starts.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }
}

/// One page of results together with the size of the unpaginated result set.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Rows on the current page.
    pub items: Vec<T>,
    /// Current page (1-based).
    pub page: usize,
    /// Requested page size.
    pub per_page: usize,
    /// Count of all matching rows before pagination.
    pub total: usize,
    /// Number of pages needed to show `total` rows.
    pub total_pages: usize,
    /// Pager links; `None` marks a gap rendered as an ellipsis.
    pub pages: Vec<Option<usize>>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, per_page: usize, total: usize) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
            pages: pager_links(page, total_pages),
        }
    }

    /// Convert the page items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            pages: self.pages,
        }
    }
}

fn pager_links(current: usize, total_pages: usize) -> Vec<Option<usize>> {
    let mut links = Vec::new();
    if total_pages == 0 {
        return links;
    }

    // Pages past the end get the pager of the last page.
    let current = current.clamp(1, total_pages);
    let start = current.saturating_sub(PAGER_RADIUS).max(1);
    let end = current.saturating_add(PAGER_RADIUS).min(total_pages);

    if start > 1 {
        links.push(Some(1));
        if start > 2 {
            links.push(None);
        }
    }

    links.extend((start..=end).map(Some));

    if end < total_pages {
        if end.saturating_add(1) < total_pages {
            links.push(None);
        }
        links.push(Some(total_pages));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_for_first_page() {
        let pagination = Pagination {
            page: 1,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), 0);

        let pagination = Pagination {
            page: 3,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2], 1, 5, 11);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn pager_inserts_gaps_for_distant_pages() {
        let page = Paginated::new(Vec::<i32>::new(), 10, 10, 200);
        assert_eq!(
            page.pages,
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: 12,
        };
        assert_eq!(pagination.offset(), usize::MAX);

        let page = Paginated::new(Vec::<i32>::new(), usize::MAX, 12, 30);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(page.page, usize::MAX);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page = Paginated::new(Vec::<i32>::new(), 1, 10, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.pages.is_empty());
    }
}
