pub use crate::model::{Blog, BlogInput};
pub use crate::route::model::IdInput;

use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::model::Category;
use crate::route::model::{one, ten};
use crate::store::BlogQuery;

/// Query parameters of the public listing.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct BlogListInput {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1))]
	#[serde(default = "one")]
	pub page: i64,
	/// The number of items to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten")]
	pub limit: i64,
	pub category: Option<Category>,
	pub featured: Option<bool>,
	/// Case-insensitive substring match across title, summary and tags.
	pub search: Option<String>,
}

impl BlogListInput {
	pub fn query(&self) -> BlogQuery {
		BlogQuery {
			category: self.category,
			featured: self.featured,
			search: self.search.clone(),
			limit: self.limit,
			offset: (self.page - 1) * self.limit,
		}
	}
}

/// Full update payload; the target record is addressed by the `id` field.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct UpdateBlogInput {
	pub id: Uuid,
	#[serde(flatten)]
	#[validate(nested)]
	pub blog: BlogInput,
}
