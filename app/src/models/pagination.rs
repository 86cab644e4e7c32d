// fastcart/app/src/models/pagination.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub page: i64,
  pub page_size: i64,
}

impl Page {
  /// Applies defaults and bounds; out-of-range values come back as field details.
  pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Result<Self, Vec<String>> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let mut details = Vec::new();
    if page < 1 {
      details.push("page: must be greater than or equal to 1".to_string());
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
      details.push(format!("page_size: must be between 1 and {}", MAX_PAGE_SIZE));
    }

    if details.is_empty() {
      Ok(Self { page, page_size })
    } else {
      Err(details)
    }
  }

  pub fn offset(&self) -> i64 {
    (self.page - 1) * self.page_size
  }
}

pub fn total_pages(total_records: i64, page_size: i64) -> i64 {
  if page_size <= 0 {
    return 0;
  }
  (total_records + page_size - 1) / page_size
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
  pub page: Option<i64>,
  pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
  pub current_page: i64,
  pub page_size: i64,
  pub total_records: i64,
  pub total_pages: i64,
  pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
  pub fn new(page: Page, total_records: i64, data: Vec<T>) -> Self {
    Self {
      current_page: page.page,
      page_size: page.page_size,
      total_records,
      total_pages: total_pages(total_records, page.page_size),
      data,
    }
  }
}
