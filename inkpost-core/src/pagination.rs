//! Page number pagination for list endpoints

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

pub const PAGE_QUERY_PARAM: &str = "page";

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Invalid page.")]
pub struct InvalidPage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Convert the results, keeping the envelope
    pub fn try_map<U, E>(self, f: impl FnOnce(Vec<T>) -> Result<Vec<U>, E>) -> Result<Page<U>, E> {
        Ok(Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: f(self.results)?,
        })
    }
}

/// Where a page was requested, used to build the `next`/`previous` links
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Raw value of the `page` query parameter
    pub page: Option<String>,
    pub path: String,
    /// Other query parameters, kept on the links
    pub query: Vec<(String, String)>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, page: Option<String>) -> Self {
        Self {
            page,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    fn link(&self, page: Option<usize>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.extend_pairs(&self.query);
        if let Some(page) = page {
            query.append_pair(PAGE_QUERY_PARAM, &page.to_string());
        }
        let query = query.finish();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }
}

/// Cut one page out of `items`.
///
/// Pages are 1-based; `last` selects the final page. An empty collection
/// still has a first page. Anything else out of range is an [`InvalidPage`].
pub fn paginate<T>(
    items: Vec<T>,
    page_size: usize,
    request: &PageRequest,
) -> Result<Page<T>, InvalidPage> {
    let page_size = page_size.max(1);
    let count = items.len();
    let num_pages = count.div_ceil(page_size).max(1);

    let number = match request.page.as_deref().map(str::trim) {
        None | Some("") => 1,
        Some("last") => num_pages,
        Some(raw) => raw.parse::<usize>().map_err(|_| InvalidPage)?,
    };
    if number == 0 || number > num_pages {
        return Err(InvalidPage);
    }

    let results: Vec<T> = items
        .into_iter()
        .skip((number - 1) * page_size)
        .take(page_size)
        .collect();

    let next = (number < num_pages).then(|| request.link(Some(number + 1)));
    // the first page is linked without a page parameter
    let previous = match number {
        1 => None,
        2 => Some(request.link(None)),
        n => Some(request.link(Some(n - 1))),
    };

    Ok(Page {
        count,
        next,
        previous,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: Option<&str>) -> PageRequest {
        PageRequest::new("/api/v1/category/", page.map(str::to_string))
    }

    #[test]
    fn test_first_page() {
        let page = paginate((1..=12).collect(), 5, &request(None)).unwrap();
        assert_eq!(page.count, 12);
        assert_eq!(page.results, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.next.as_deref(), Some("/api/v1/category/?page=2"));
        assert_eq!(page.previous, None);
    }

    #[test]
    fn test_middle_and_last_page_links() {
        let page = paginate((1..=12).collect(), 5, &request(Some("2"))).unwrap();
        assert_eq!(page.results, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.previous.as_deref(), Some("/api/v1/category/"));

        let page = paginate((1..=12).collect(), 5, &request(Some("last"))).unwrap();
        assert_eq!(page.results, vec![11, 12]);
        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/api/v1/category/?page=2"));
    }

    #[test]
    fn test_links_keep_other_query_parameters() {
        let req = request(Some("1")).with_query("search", Some("sci"));
        let page = paginate((1..=6).collect(), 5, &req).unwrap();
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/category/?search=sci&page=2")
        );
    }

    #[test]
    fn test_links_encode_query_values() {
        let req = request(None).with_query("search", Some("a&b =#"));
        let page = paginate((1..=6).collect(), 5, &req).unwrap();
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/category/?search=a%26b+%3D%23&page=2")
        );

        let req = request(Some("2")).with_query("search", Some("a&b"));
        let page = paginate((1..=6).collect(), 5, &req).unwrap();
        assert_eq!(page.previous.as_deref(), Some("/api/v1/category/?search=a%26b"));
    }

    #[test]
    fn test_empty_collection_has_a_first_page() {
        let page = paginate(Vec::<i32>::new(), 10, &request(Some("1"))).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_invalid_pages() {
        for raw in ["0", "3", "-1", "abc"] {
            assert_eq!(
                paginate((1..=10).collect::<Vec<_>>(), 5, &request(Some(raw))),
                Err(InvalidPage),
                "{raw}"
            );
        }
    }
}
