use serde::Deserialize;

/// Page sizes of the paginated collections. Every other list is unpaginated.
#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct PaginationSettings {
    #[serde(default = "default_category_page_size")]
    pub category_page_size: usize,
    #[serde(default = "default_blog_page_size")]
    pub blog_page_size: usize,
}

fn default_category_page_size() -> usize {
    5
}

fn default_blog_page_size() -> usize {
    10
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            category_page_size: default_category_page_size(),
            blog_page_size: default_blog_page_size(),
        }
    }
}
