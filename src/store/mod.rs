pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{AdminBlog, Blog, Category, Status};

/// Shared handle to the content store, injected through application state.
pub type Store = Arc<dyn ContentStore>;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("corrupt {column} value in row {id}")]
	Corrupt { id: Uuid, column: &'static str },
}

/// One page of a filtered listing, with the unpaginated total for the
/// pagination envelope.
#[derive(Debug)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: i64,
}

/// Filters for the public listing. `search` is a case-insensitive substring
/// match across title, summary and tags.
#[derive(Debug, Default)]
pub struct BlogQuery {
	pub category: Option<Category>,
	pub featured: Option<bool>,
	pub search: Option<String>,
	pub limit: i64,
	pub offset: i64,
}

/// Filters for the admin listing. `search` matches title and content.
#[derive(Debug, Default)]
pub struct AdminBlogQuery {
	pub status: Option<Status>,
	pub author_id: Option<Uuid>,
	pub search: Option<String>,
	pub limit: i64,
	pub offset: i64,
}

/// The storage contract the routes and the sync engine depend on.
///
/// `save_*` has document-store semantics: insert when the id is new,
/// overwrite the whole record otherwise. Backends: [`postgres::PgStore`] in
/// production, [`memory::MemoryStore`] in tests.
#[async_trait]
pub trait ContentStore: Send + Sync {
	async fn save_blog(&self, blog: &Blog) -> Result<(), StoreError>;
	async fn blog_by_id(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;
	async fn blog_by_slug(&self, slug: &str) -> Result<Option<Blog>, StoreError>;
	async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError>;
	async fn list_blogs(&self, query: &BlogQuery) -> Result<Page<Blog>, StoreError>;
	/// Increments the view counter and returns the updated post.
	async fn record_blog_view(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;
	/// Public posts with no admin-side counterpart, oldest first.
	async fn blogs_without_mirror(&self, limit: i64) -> Result<Vec<Blog>, StoreError>;

	async fn save_admin_blog(&self, blog: &AdminBlog) -> Result<(), StoreError>;
	async fn admin_blog_by_id(&self, id: Uuid) -> Result<Option<AdminBlog>, StoreError>;
	async fn admin_blog_by_slug(&self, slug: &str) -> Result<Option<AdminBlog>, StoreError>;
	async fn admin_blog_by_public_id(
		&self,
		public_id: Uuid,
	) -> Result<Option<AdminBlog>, StoreError>;
	async fn delete_admin_blog(&self, id: Uuid) -> Result<bool, StoreError>;
	async fn list_admin_blogs(
		&self,
		query: &AdminBlogQuery,
	) -> Result<Page<AdminBlog>, StoreError>;
}
