use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The public-facing category of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	Technology,
	Career,
	Academic,
	Lifestyle,
	News,
}

impl Category {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Technology => "technology",
			Self::Career => "career",
			Self::Academic => "academic",
			Self::Lifestyle => "lifestyle",
			Self::News => "news",
		}
	}
}

impl FromStr for Category {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"technology" => Ok(Self::Technology),
			"career" => Ok(Self::Career),
			"academic" => Ok(Self::Academic),
			"lifestyle" => Ok(Self::Lifestyle),
			"news" => Ok(Self::News),
			_ => Err(()),
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The lifecycle status of an admin-authored blog post.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	#[default]
	Draft,
	Published,
	Archived,
}

impl Status {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Draft => "draft",
			Self::Published => "published",
			Self::Archived => "archived",
		}
	}
}

impl FromStr for Status {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"draft" => Ok(Self::Draft),
			"published" => Ok(Self::Published),
			"archived" => Ok(Self::Archived),
			_ => Err(()),
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

fn default_published() -> bool {
	true
}

/// A public-facing blog post.
///
/// This is what the general `/api/blogs` surface reads and writes. The
/// `admin_id` field links the post to its admin-side counterpart; it is set
/// at first sync and never exposed on the wire.
#[model]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The title of the post.
	#[validate(length(min = 5, max = 200))]
	pub title: String,
	/// The URL-safe slug, derived from the title.
	#[serde(skip_deserializing)]
	pub slug: String,
	/// A short summary shown in listings.
	#[validate(length(min = 10, max = 500))]
	pub summary: String,
	/// The post body in Markdown format.
	#[validate(length(min = 50))]
	pub content: String,
	pub category: Category,
	/// Tags in insertion order, not deduplicated.
	#[serde(default)]
	pub tags: Vec<String>,
	/// The user that authored the post, when known.
	#[serde(skip_deserializing)]
	pub author_id: Option<Uuid>,
	#[serde(default)]
	pub featured: bool,
	#[serde(default = "default_published")]
	pub published: bool,
	#[serde(skip_deserializing)]
	pub views: i64,
	#[serde(skip_deserializing)]
	pub likes: i64,
	#[validate(url)]
	pub image_url: Option<String>,
	/// Cross-reference to the admin-side counterpart, set at first sync.
	#[serde(skip)]
	pub admin_id: Option<Uuid>,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing)]
	pub updated_at: DateTime<Utc>,
}

impl Blog {
	/// Builds a post from a validated payload and a pre-resolved unique slug.
	pub fn create(input: BlogInput, slug: String, author_id: Option<Uuid>) -> Self {
		let now = Utc::now();

		Self {
			id: Uuid::new_v4(),
			title: input.title,
			slug,
			summary: input.summary,
			content: input.content,
			category: input.category,
			tags: input.tags,
			author_id,
			featured: input.featured,
			published: input.published,
			views: 0,
			likes: 0,
			image_url: input.image_url,
			admin_id: None,
			created_at: now,
			updated_at: now,
		}
	}

	/// Overwrites the editable fields from a full payload, leaving the
	/// server-owned ones (id, slug, counters, links) alone.
	pub fn apply(&mut self, input: BlogInput) {
		self.title = input.title;
		self.summary = input.summary;
		self.content = input.content;
		self.category = input.category;
		self.tags = input.tags;
		self.featured = input.featured;
		self.published = input.published;
		self.image_url = input.image_url;
		self.updated_at = Utc::now();
	}
}

/// An admin-authored blog post with a draft/published/archived lifecycle.
///
/// `blog_id` is an app-generated identifier independent of the database id,
/// kept for compatibility with external references. `public_id` links the
/// record to its public-facing counterpart.
#[model]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct AdminBlog {
	#[serde(skip_deserializing)]
	pub id: Uuid,
	#[serde(skip_deserializing)]
	pub blog_id: String,
	#[validate(length(min = 5, max = 200))]
	pub title: String,
	#[serde(skip_deserializing)]
	pub slug: String,
	#[validate(length(min = 50))]
	pub content: String,
	#[serde(skip_deserializing)]
	pub author_id: Option<Uuid>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub status: Status,
	/// Stamped on the first transition into `published`, never re-stamped.
	#[serde(skip_deserializing)]
	pub published_date: Option<DateTime<Utc>>,
	#[serde(skip_deserializing)]
	pub last_updated: DateTime<Utc>,
	/// Cross-reference to the public counterpart, set at first sync.
	#[serde(skip)]
	pub public_id: Option<Uuid>,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

impl AdminBlog {
	pub fn create(input: AdminBlogInput, slug: String, author_id: Uuid) -> Self {
		let now = Utc::now();

		Self {
			id: Uuid::new_v4(),
			blog_id: format!("blog-{}", Uuid::new_v4().simple()),
			title: input.title,
			slug,
			content: input.content,
			author_id: Some(author_id),
			tags: input.tags,
			status: input.status,
			published_date: (input.status == Status::Published).then(|| now),
			last_updated: now,
			public_id: None,
			created_at: now,
		}
	}

	/// Overwrites the editable fields from a full payload, stamping
	/// `published_date` on the first transition into `published`.
	pub fn apply(&mut self, input: AdminBlogInput) {
		self.title = input.title;
		self.content = input.content;
		self.tags = input.tags;
		self.status = input.status;

		if self.status == Status::Published && self.published_date.is_none() {
			self.published_date = Some(Utc::now());
		}

		self.last_updated = Utc::now();
	}
}
