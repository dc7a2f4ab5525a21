pub use crate::model::{AdminBlog, AdminBlogInput};
pub use crate::route::model::IdInput;

use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::model::Status;
use crate::route::model::{one, ten};
use crate::store::AdminBlogQuery;

/// Query parameters of the admin listing.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct AdminListInput {
	#[validate(range(min = 1))]
	#[serde(default = "one")]
	pub page: i64,
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten")]
	pub limit: i64,
	pub status: Option<Status>,
	pub author_id: Option<Uuid>,
	/// Case-insensitive substring match across title and content.
	pub search: Option<String>,
}

impl AdminListInput {
	pub fn query(&self) -> AdminBlogQuery {
		AdminBlogQuery {
			status: self.status,
			author_id: self.author_id,
			search: self.search.clone(),
			limit: self.limit,
			offset: (self.page - 1) * self.limit,
		}
	}
}
