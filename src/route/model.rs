use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::store::Page;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
pub fn one() -> i64 {
	1
}

#[inline]
pub fn ten() -> i64 {
	10
}

/// The pagination envelope attached to every list response.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub current_page: i64,
	pub total_pages: i64,
	pub total_items: i64,
	pub items_per_page: i64,
	pub has_next: bool,
	pub has_prev: bool,
}

impl Pagination {
	pub fn new(page: i64, limit: i64, total: i64) -> Self {
		let total_pages = if total == 0 {
			0
		} else {
			(total + limit - 1) / limit
		};

		Self {
			current_page: page,
			total_pages,
			total_items: total,
			items_per_page: limit,
			has_next: page < total_pages,
			has_prev: page > 1,
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct ListResponse<T> {
	pub success: bool,
	pub data: Vec<T>,
	pub pagination: Pagination,
}

impl<T> ListResponse<T> {
	pub fn new(page: Page<T>, current_page: i64, limit: i64) -> Self {
		Self {
			success: true,
			pagination: Pagination::new(current_page, limit, page.total),
			data: page.items,
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct DataResponse<T> {
	pub success: bool,
	pub data: T,
}

impl<T> DataResponse<T> {
	pub fn new(data: T) -> Self {
		Self {
			success: true,
			data,
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct ItemResponse<T> {
	pub success: bool,
	pub message: String,
	pub data: T,
}

impl<T> ItemResponse<T> {
	pub fn new(message: &str, data: T) -> Self {
		Self {
			success: true,
			message: message.to_string(),
			data,
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct MessageResponse {
	pub success: bool,
	pub message: String,
}

impl MessageResponse {
	pub fn new(message: &str) -> Self {
		Self {
			success: true,
			message: message.to_string(),
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_pagination_middle_page() {
		let pagination = Pagination::new(2, 10, 25);

		assert_eq!(pagination.total_pages, 3);
		assert!(pagination.has_next);
		assert!(pagination.has_prev);
	}

	#[test]
	fn test_pagination_first_and_last_page() {
		let first = Pagination::new(1, 10, 25);

		assert!(first.has_next);
		assert!(!first.has_prev);

		let last = Pagination::new(3, 10, 25);

		assert!(!last.has_next);
		assert!(last.has_prev);
	}

	#[test]
	fn test_pagination_empty() {
		let pagination = Pagination::new(1, 10, 0);

		assert_eq!(pagination.total_pages, 0);
		assert!(!pagination.has_next);
		assert!(!pagination.has_prev);
	}
}
