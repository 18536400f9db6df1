use serde::Serialize;

use crate::listing::query::{Filters, ListQuery, PageSize};

/// One page of search results. `total` counts all matches, not just `items`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }
}

/// `max(1, ceil(total / page_size))`.
pub fn last_page(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamps `page` into `[1, last_page]`.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, last_page(total, page_size))
}

/// `Hiển thị {start} - {end} trên {total} mục`, or `0 items` when empty.
pub fn range_text(page: usize, page_size: usize, total: usize) -> String {
    if total == 0 {
        return "0 items".to_string();
    }
    let start = (page.saturating_sub(1) * page_size + 1).min(total);
    let end = total.min(page * page_size);
    format!("Hiển thị {start} - {end} trên {total} mục")
}

/// Compact page strip: both edges plus a window around the current page,
/// `None` marking a gap.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageLink {
    pub number: Option<usize>,
    pub href: Option<String>,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageSizeOption {
    pub size: usize,
    pub href: String,
    pub selected: bool,
}

/// Pagination footer handed to templates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageView {
    pub page: usize,
    pub last_page: usize,
    pub total: usize,
    pub range_text: String,
    pub links: Vec<PageLink>,
    pub sizes: Vec<PageSizeOption>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PageView {
    /// Builds the footer for `query` with hrefs relative to `base_path`.
    pub fn new<F: Filters>(base_path: &str, query: &ListQuery<F>, total: usize) -> Self {
        let size = query.page_size.get();
        let last = last_page(total, size);
        let page = query.page.clamp(1, last);
        let href = |target: usize| {
            let mut q = query.clone();
            q.page = target;
            with_query(base_path, &q.to_query_string())
        };

        let links = get_pages(last, page, 2, 2, 4, 2)
            .into_iter()
            .map(|number| PageLink {
                number,
                href: number.map(&href),
                current: number == Some(page),
            })
            .collect();

        let sizes = PageSize::ALL
            .into_iter()
            .map(|option| {
                let mut q = query.clone();
                q.page = 1;
                q.page_size = option;
                PageSizeOption {
                    size: option.get(),
                    href: with_query(base_path, &q.to_query_string()),
                    selected: option == query.page_size,
                }
            })
            .collect();

        Self {
            page,
            last_page: last,
            total,
            range_text: range_text(page, size, total),
            links,
            sizes,
            prev_href: (page > 1).then(|| href(page - 1)),
            next_href: (page < last).then(|| href(page + 1)),
        }
    }
}

/// Joins a path and an encoded query, dropping the `?` when empty.
pub fn with_query(base_path: &str, query: &str) -> String {
    if query.is_empty() {
        base_path.to_string()
    } else {
        format!("{base_path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::query::KeywordFilters;

    #[test]
    fn last_page_is_at_least_one() {
        assert_eq!(last_page(0, 10), 1);
        assert_eq!(last_page(3, 10), 1);
        assert_eq!(last_page(10, 10), 1);
        assert_eq!(last_page(11, 10), 2);
        assert_eq!(last_page(101, 50), 3);
    }

    #[test]
    fn clamp_keeps_page_in_range() {
        for total in [0, 1, 9, 10, 11, 55] {
            for size in [5, 10, 20, 50] {
                for page in [0, 1, 2, 3, 7, 100] {
                    let clamped = clamp_page(page, total, size);
                    assert!(clamped >= 1 && clamped <= last_page(total, size));
                }
            }
        }
    }

    #[test]
    fn range_text_matches_display_format() {
        assert_eq!(range_text(1, 10, 3), "Hiển thị 1 - 3 trên 3 mục");
        assert_eq!(range_text(2, 10, 25), "Hiển thị 11 - 20 trên 25 mục");
        assert_eq!(range_text(1, 10, 0), "0 items");
    }

    #[test]
    fn get_pages_inserts_gaps() {
        let pages = get_pages(20, 10, 2, 2, 4, 2);
        assert_eq!(
            pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
        assert_eq!(get_pages(1, 1, 2, 2, 4, 2), vec![Some(1)]);
    }

    #[test]
    fn page_view_links_keep_filters() {
        let query = ListQuery::<KeywordFilters>::from_query_str("keyword=vay&page=2");
        let view = PageView::new("/admin/categories", &query, 25);
        assert_eq!(view.last_page, 3);
        assert_eq!(
            view.prev_href.as_deref(),
            Some("/admin/categories?keyword=vay")
        );
        assert_eq!(
            view.next_href.as_deref(),
            Some("/admin/categories?keyword=vay&page=3")
        );
        assert!(view.links.iter().any(|link| link.current && link.number == Some(2)));
        let fifty = view.sizes.iter().find(|s| s.size == 50).expect("size option");
        assert_eq!(fifty.href, "/admin/categories?keyword=vay&pageSize=50");
    }
}
