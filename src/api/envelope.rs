use crate::store::Page;
use serde::Serialize;

/// Uniform wrapper for single-resource responses. Failures from any endpoint
/// use this shape with a null resource, so clients parse one failure form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub success: bool,
    pub messages: Vec<String>,
    pub resource: Option<T>,
}

impl<T> QueryResult<T> {
    pub fn success(resource: T) -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            resource: Some(resource),
        }
    }

    pub fn failure(messages: Vec<String>) -> Self {
        Self {
            success: false,
            messages,
            resource: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryResult<T> {
    pub success: bool,
    pub messages: Vec<String>,
    pub total_count: usize,
    pub items: Vec<T>,
}

impl<T> ListQueryResult<T> {
    pub fn success(items: Vec<T>) -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            total_count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedQueryResult<T> {
    pub success: bool,
    pub messages: Vec<String>,
    pub page_index: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub items: Vec<T>,
}

impl<T> From<Page<T>> for PagedQueryResult<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            page_index: page.page_index,
            page_size: page.page_size,
            total_count: page.total_count,
            total_pages: page.total_pages(),
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            items: page.items,
        }
    }
}
