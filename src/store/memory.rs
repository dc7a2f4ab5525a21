use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AdminBlogQuery, BlogQuery, ContentStore, Page, StoreError};
use crate::model::{AdminBlog, Blog};

/// In-memory content store implementing the same contract as the SQL
/// backend. Used by the test suite so routes and the sync engine can be
/// exercised without a database.
#[derive(Default)]
pub struct MemoryStore {
	blogs: RwLock<HashMap<Uuid, Blog>>,
	admin_blogs: RwLock<HashMap<Uuid, AdminBlog>>,
}

fn contains(haystack: &str, needle: &str) -> bool {
	haystack.to_lowercase().contains(needle)
}

fn paginate<T>(mut items: Vec<T>, limit: i64, offset: i64) -> Page<T> {
	let total = items.len() as i64;
	let offset = usize::try_from(offset).unwrap_or(0);
	let limit = usize::try_from(limit).unwrap_or(0);

	let items = if offset >= items.len() {
		Vec::new()
	} else {
		items.drain(offset..).take(limit).collect()
	};

	Page { items, total }
}

#[async_trait]
impl ContentStore for MemoryStore {
	async fn save_blog(&self, blog: &Blog) -> Result<(), StoreError> {
		self.blogs.write().unwrap().insert(blog.id, blog.clone());
		Ok(())
	}

	async fn blog_by_id(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
		Ok(self.blogs.read().unwrap().get(&id).cloned())
	}

	async fn blog_by_slug(&self, slug: &str) -> Result<Option<Blog>, StoreError> {
		Ok(self
			.blogs
			.read()
			.unwrap()
			.values()
			.find(|blog| blog.slug == slug)
			.cloned())
	}

	async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
		Ok(self.blogs.write().unwrap().remove(&id).is_some())
	}

	async fn list_blogs(&self, query: &BlogQuery) -> Result<Page<Blog>, StoreError> {
		let search = query.search.as_deref().map(str::to_lowercase);

		let mut items = self
			.blogs
			.read()
			.unwrap()
			.values()
			.filter(|blog| query.category.map_or(true, |c| blog.category == c))
			.filter(|blog| query.featured.map_or(true, |f| blog.featured == f))
			.filter(|blog| {
				search.as_deref().map_or(true, |needle| {
					contains(&blog.title, needle)
						|| contains(&blog.summary, needle)
						|| blog.tags.iter().any(|tag| contains(tag, needle))
				})
			})
			.cloned()
			.collect::<Vec<_>>();

		items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

		Ok(paginate(items, query.limit, query.offset))
	}

	async fn record_blog_view(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
		let mut blogs = self.blogs.write().unwrap();

		Ok(blogs.get_mut(&id).map(|blog| {
			blog.views += 1;
			blog.clone()
		}))
	}

	async fn blogs_without_mirror(&self, limit: i64) -> Result<Vec<Blog>, StoreError> {
		let mut items = self
			.blogs
			.read()
			.unwrap()
			.values()
			.filter(|blog| blog.admin_id.is_none())
			.cloned()
			.collect::<Vec<_>>();

		items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
		items.truncate(usize::try_from(limit).unwrap_or(0));

		Ok(items)
	}

	async fn save_admin_blog(&self, blog: &AdminBlog) -> Result<(), StoreError> {
		self.admin_blogs
			.write()
			.unwrap()
			.insert(blog.id, blog.clone());
		Ok(())
	}

	async fn admin_blog_by_id(&self, id: Uuid) -> Result<Option<AdminBlog>, StoreError> {
		Ok(self.admin_blogs.read().unwrap().get(&id).cloned())
	}

	async fn admin_blog_by_slug(&self, slug: &str) -> Result<Option<AdminBlog>, StoreError> {
		Ok(self
			.admin_blogs
			.read()
			.unwrap()
			.values()
			.find(|blog| blog.slug == slug)
			.cloned())
	}

	async fn admin_blog_by_public_id(
		&self,
		public_id: Uuid,
	) -> Result<Option<AdminBlog>, StoreError> {
		Ok(self
			.admin_blogs
			.read()
			.unwrap()
			.values()
			.find(|blog| blog.public_id == Some(public_id))
			.cloned())
	}

	async fn delete_admin_blog(&self, id: Uuid) -> Result<bool, StoreError> {
		Ok(self.admin_blogs.write().unwrap().remove(&id).is_some())
	}

	async fn list_admin_blogs(
		&self,
		query: &AdminBlogQuery,
	) -> Result<Page<AdminBlog>, StoreError> {
		let search = query.search.as_deref().map(str::to_lowercase);

		let mut items = self
			.admin_blogs
			.read()
			.unwrap()
			.values()
			.filter(|blog| query.status.map_or(true, |s| blog.status == s))
			.filter(|blog| {
				query
					.author_id
					.map_or(true, |author| blog.author_id == Some(author))
			})
			.filter(|blog| {
				search.as_deref().map_or(true, |needle| {
					contains(&blog.title, needle) || contains(&blog.content, needle)
				})
			})
			.cloned()
			.collect::<Vec<_>>();

		items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

		Ok(paginate(items, query.limit, query.offset))
	}
}
