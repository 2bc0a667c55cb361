//! Page envelope returned by list endpoints.

use serde::Serialize;

use crate::repository::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total: usize) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.per_page,
            total,
            pages: total.div_ceil(pagination.per_page),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: usize, pagination: Pagination) -> Self {
        Self {
            items,
            pagination: PageInfo::new(pagination, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
