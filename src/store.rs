use crate::{
    data::student::{Student, StudentDraft},
    error::RollbookResult,
};
use async_trait::async_trait;
use serde::Deserialize;

pub mod memory;
pub mod postgres;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Narrow persistence port for the [`Student`] aggregate. Handlers only ever
/// talk to this trait; the backing store is picked at startup.
#[async_trait]
pub trait StudentStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i32) -> RollbookResult<Option<Student>>;
    async fn list(&self) -> RollbookResult<Vec<Student>>;
    async fn page(&self, query: PageQuery) -> RollbookResult<Page<Student>>;
    /// The store assigns the id and returns the full stored record.
    async fn create(&self, draft: StudentDraft) -> RollbookResult<Student>;
    /// Full-record replacement of every mutable field, address included.
    /// `None` when no record with that id exists.
    async fn update(&self, id: i32, draft: StudentDraft) -> RollbookResult<Option<Student>>;
    /// Removes the record (and its owned address with it), returning the
    /// removed record. `None` when no record with that id exists.
    async fn delete(&self, id: i32) -> RollbookResult<Option<Student>>;
    async fn exists(&self, id: i32) -> RollbookResult<bool>;
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}

impl PageQuery {
    /// Out-of-range requests are clamped rather than rejected: the first page
    /// and the default size of 10.
    pub fn clamped(self) -> (i64, i64) {
        let page = if self.page <= 0 { 1 } else { self.page };
        let page_size = if self.page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        (page, page_size)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub page_index: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index < self.total_pages()
    }
}
