//! Pagination window and pager markup for the HTML view.

use std::fmt::Write;

use minijinja::HtmlEscape;
use serde::Serialize;

/// Pages shown in the window.
const WINDOW: usize = 5;

/// Pages listed before the current one.
const LEAD: usize = 2;

/// The visible page numbers plus optional jump links.
///
/// ```
/// use datagrid::PageRange;
///
/// let range = PageRange::compute(5, 20);
/// assert_eq!(range.pages, vec![3, 4, 5, 6, 7]);
/// assert_eq!(range.first, Some(1));
/// assert_eq!(range.last, Some(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRange {
    /// Jump-to-first target, when page 1 is outside the window.
    pub first: Option<usize>,
    pub pages: Vec<usize>,
    /// Jump-to-last target, when the full window ends before the last page.
    pub last: Option<usize>,
}

impl PageRange {
    /// Window of up to five pages starting two before `page`.
    pub fn compute(page: usize, total_pages: usize) -> Self {
        let start = page.saturating_sub(LEAD).max(1);
        let pages: Vec<usize> = (start..=start.saturating_add(WINDOW - 1))
            .take_while(|p| *p <= total_pages)
            .collect();

        let first = match pages.first() {
            Some(&p) if p != 1 => Some(1),
            _ => None,
        };
        let last = match pages.get(WINDOW - 1) {
            Some(&p) if p != total_pages => Some(total_pages),
            _ => None,
        };
        PageRange { first, pages, last }
    }

    /// Number of pages needed for `results` rows at `per_page` rows each.
    pub fn total_pages(results: usize, per_page: usize) -> usize {
        results.div_ceil(per_page.max(1))
    }
}

/// One pager link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub href: String,
    /// `first`, `current` or `last`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
}

/// Structured pager for templates that build their own markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub current: usize,
    pub total_pages: usize,
    pub results: usize,
    pub links: Vec<PageLink>,
}

impl Pager {
    /// Builds the pager, asking `href` for each page's URL.
    pub fn build<E>(
        current: usize,
        results: usize,
        per_page: usize,
        mut href: impl FnMut(usize) -> Result<String, E>,
    ) -> Result<Self, E> {
        let total_pages = PageRange::total_pages(results, per_page);
        let range = PageRange::compute(current, total_pages);

        let mut links = Vec::with_capacity(range.pages.len() + 2);
        if let Some(first) = range.first {
            links.push(PageLink {
                page: first,
                href: href(first)?,
                class: Some("first"),
            });
        }
        for &page in &range.pages {
            links.push(PageLink {
                page,
                href: href(page)?,
                class: (page == current).then_some("current"),
            });
        }
        if let Some(last) = range.last {
            links.push(PageLink {
                page: last,
                href: href(last)?,
                class: Some("last"),
            });
        }

        Ok(Pager {
            current,
            total_pages,
            results,
            links,
        })
    }

    /// Pager markup.
    ///
    /// Links are listed after `Page:` only when there is more than one.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class='pagination'>");
        if self.links.len() > 1 {
            html.push_str("Page:");
            for link in &self.links {
                let _ = write!(html, " <a href=\"{}\"", HtmlEscape(&link.href));
                if let Some(class) = link.class {
                    let _ = write!(html, " class='{}'", class);
                }
                let _ = write!(html, ">{}</a>", link.page);
            }
        }
        let _ = write!(html, " &nbsp; ({} results)</div>", self.results);
        html
    }
}
