use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{AdminBlogQuery, BlogQuery, ContentStore, Page, StoreError};
use crate::model::{AdminBlog, Blog, Category, Status};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL-backed content store.
///
/// Owns the process-wide connection pool; constructed once at startup and
/// injected into the application state.
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
		let pool = PgPoolOptions::new()
			.max_connections(MAX_CONNECTIONS)
			.acquire_timeout(ACQUIRE_TIMEOUT)
			.connect(url)
			.await?;

		Ok(Self { pool })
	}

	pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
		sqlx::migrate!("./migrations").run(&self.pool).await
	}
}

#[derive(sqlx::FromRow)]
struct BlogRow {
	id: Uuid,
	title: String,
	slug: String,
	summary: String,
	content: String,
	category: String,
	tags: Vec<String>,
	author_id: Option<Uuid>,
	featured: bool,
	published: bool,
	views: i64,
	likes: i64,
	image_url: Option<String>,
	admin_id: Option<Uuid>,
	created_at: DateTime<Utc>,
	updated_at: DateTime<Utc>,
}

impl TryFrom<BlogRow> for Blog {
	type Error = StoreError;

	fn try_from(row: BlogRow) -> Result<Self, Self::Error> {
		let category = row.category.parse::<Category>().map_err(|()| {
			StoreError::Corrupt {
				id: row.id,
				column: "category",
			}
		})?;

		Ok(Self {
			id: row.id,
			title: row.title,
			slug: row.slug,
			summary: row.summary,
			content: row.content,
			category,
			tags: row.tags,
			author_id: row.author_id,
			featured: row.featured,
			published: row.published,
			views: row.views,
			likes: row.likes,
			image_url: row.image_url,
			admin_id: row.admin_id,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

#[derive(sqlx::FromRow)]
struct AdminBlogRow {
	id: Uuid,
	blog_id: String,
	title: String,
	slug: String,
	content: String,
	author_id: Option<Uuid>,
	tags: Vec<String>,
	status: String,
	published_date: Option<DateTime<Utc>>,
	last_updated: DateTime<Utc>,
	public_id: Option<Uuid>,
	created_at: DateTime<Utc>,
}

impl TryFrom<AdminBlogRow> for AdminBlog {
	type Error = StoreError;

	fn try_from(row: AdminBlogRow) -> Result<Self, Self::Error> {
		let status = row.status.parse::<Status>().map_err(|()| StoreError::Corrupt {
			id: row.id,
			column: "status",
		})?;

		Ok(Self {
			id: row.id,
			blog_id: row.blog_id,
			title: row.title,
			slug: row.slug,
			content: row.content,
			author_id: row.author_id,
			tags: row.tags,
			status,
			published_date: row.published_date,
			last_updated: row.last_updated,
			public_id: row.public_id,
			created_at: row.created_at,
		})
	}
}

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(search: &str) -> String {
	let escaped = search
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_");

	format!("%{escaped}%")
}

fn push_blog_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BlogQuery) {
	let mut prefix = " WHERE ";

	if let Some(category) = query.category {
		builder.push(prefix).push("category = ").push_bind(category.as_str());
		prefix = " AND ";
	}

	if let Some(featured) = query.featured {
		builder.push(prefix).push("featured = ").push_bind(featured);
		prefix = " AND ";
	}

	if let Some(search) = query.search.as_deref() {
		let pattern = like_pattern(search);

		builder
			.push(prefix)
			.push("(title ILIKE ")
			.push_bind(pattern.clone())
			.push(" OR summary ILIKE ")
			.push_bind(pattern.clone())
			.push(" OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE ")
			.push_bind(pattern)
			.push("))");
	}
}

fn push_admin_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AdminBlogQuery) {
	let mut prefix = " WHERE ";

	if let Some(status) = query.status {
		builder.push(prefix).push("status = ").push_bind(status.as_str());
		prefix = " AND ";
	}

	if let Some(author_id) = query.author_id {
		builder.push(prefix).push("author_id = ").push_bind(author_id);
		prefix = " AND ";
	}

	if let Some(search) = query.search.as_deref() {
		let pattern = like_pattern(search);

		builder
			.push(prefix)
			.push("(title ILIKE ")
			.push_bind(pattern.clone())
			.push(" OR content ILIKE ")
			.push_bind(pattern)
			.push(")");
	}
}

#[async_trait]
impl ContentStore for PgStore {
	async fn save_blog(&self, blog: &Blog) -> Result<(), StoreError> {
		sqlx::query(
			r#"
				INSERT INTO blog (
					id, title, slug, summary, content, category, tags, author_id,
					featured, published, views, likes, image_url, admin_id,
					created_at, updated_at
				)
				VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
				ON CONFLICT (id) DO UPDATE SET
					title = EXCLUDED.title,
					slug = EXCLUDED.slug,
					summary = EXCLUDED.summary,
					content = EXCLUDED.content,
					category = EXCLUDED.category,
					tags = EXCLUDED.tags,
					author_id = EXCLUDED.author_id,
					featured = EXCLUDED.featured,
					published = EXCLUDED.published,
					views = EXCLUDED.views,
					likes = EXCLUDED.likes,
					image_url = EXCLUDED.image_url,
					admin_id = EXCLUDED.admin_id,
					updated_at = EXCLUDED.updated_at
			"#,
		)
		.bind(blog.id)
		.bind(&blog.title)
		.bind(&blog.slug)
		.bind(&blog.summary)
		.bind(&blog.content)
		.bind(blog.category.as_str())
		.bind(&blog.tags)
		.bind(blog.author_id)
		.bind(blog.featured)
		.bind(blog.published)
		.bind(blog.views)
		.bind(blog.likes)
		.bind(&blog.image_url)
		.bind(blog.admin_id)
		.bind(blog.created_at)
		.bind(blog.updated_at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn blog_by_id(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
		sqlx::query_as::<_, BlogRow>("SELECT * FROM blog WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?
			.map(Blog::try_from)
			.transpose()
	}

	async fn blog_by_slug(&self, slug: &str) -> Result<Option<Blog>, StoreError> {
		sqlx::query_as::<_, BlogRow>("SELECT * FROM blog WHERE slug = $1")
			.bind(slug)
			.fetch_optional(&self.pool)
			.await?
			.map(Blog::try_from)
			.transpose()
	}

	async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM blog WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn list_blogs(&self, query: &BlogQuery) -> Result<Page<Blog>, StoreError> {
		let mut count = QueryBuilder::new("SELECT COUNT(*) FROM blog");
		push_blog_filters(&mut count, query);

		let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

		let mut select = QueryBuilder::new("SELECT * FROM blog");
		push_blog_filters(&mut select, query);
		select
			.push(" ORDER BY created_at DESC LIMIT ")
			.push_bind(query.limit)
			.push(" OFFSET ")
			.push_bind(query.offset);

		let items = select
			.build_query_as::<BlogRow>()
			.fetch_all(&self.pool)
			.await?
			.into_iter()
			.map(Blog::try_from)
			.collect::<Result<_, _>>()?;

		Ok(Page { items, total })
	}

	async fn record_blog_view(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
		sqlx::query_as::<_, BlogRow>(
			"UPDATE blog SET views = views + 1 WHERE id = $1 RETURNING *",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?
		.map(Blog::try_from)
		.transpose()
	}

	async fn blogs_without_mirror(&self, limit: i64) -> Result<Vec<Blog>, StoreError> {
		sqlx::query_as::<_, BlogRow>(
			"SELECT * FROM blog WHERE admin_id IS NULL ORDER BY created_at ASC LIMIT $1",
		)
		.bind(limit)
		.fetch_all(&self.pool)
		.await?
		.into_iter()
		.map(Blog::try_from)
		.collect()
	}

	async fn save_admin_blog(&self, blog: &AdminBlog) -> Result<(), StoreError> {
		sqlx::query(
			r#"
				INSERT INTO admin_blog (
					id, blog_id, title, slug, content, author_id, tags, status,
					published_date, last_updated, public_id, created_at
				)
				VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
				ON CONFLICT (id) DO UPDATE SET
					blog_id = EXCLUDED.blog_id,
					title = EXCLUDED.title,
					slug = EXCLUDED.slug,
					content = EXCLUDED.content,
					author_id = EXCLUDED.author_id,
					tags = EXCLUDED.tags,
					status = EXCLUDED.status,
					published_date = EXCLUDED.published_date,
					last_updated = EXCLUDED.last_updated,
					public_id = EXCLUDED.public_id
			"#,
		)
		.bind(blog.id)
		.bind(&blog.blog_id)
		.bind(&blog.title)
		.bind(&blog.slug)
		.bind(&blog.content)
		.bind(blog.author_id)
		.bind(&blog.tags)
		.bind(blog.status.as_str())
		.bind(blog.published_date)
		.bind(blog.last_updated)
		.bind(blog.public_id)
		.bind(blog.created_at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn admin_blog_by_id(&self, id: Uuid) -> Result<Option<AdminBlog>, StoreError> {
		sqlx::query_as::<_, AdminBlogRow>("SELECT * FROM admin_blog WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?
			.map(AdminBlog::try_from)
			.transpose()
	}

	async fn admin_blog_by_slug(&self, slug: &str) -> Result<Option<AdminBlog>, StoreError> {
		sqlx::query_as::<_, AdminBlogRow>("SELECT * FROM admin_blog WHERE slug = $1")
			.bind(slug)
			.fetch_optional(&self.pool)
			.await?
			.map(AdminBlog::try_from)
			.transpose()
	}

	async fn admin_blog_by_public_id(
		&self,
		public_id: Uuid,
	) -> Result<Option<AdminBlog>, StoreError> {
		sqlx::query_as::<_, AdminBlogRow>("SELECT * FROM admin_blog WHERE public_id = $1")
			.bind(public_id)
			.fetch_optional(&self.pool)
			.await?
			.map(AdminBlog::try_from)
			.transpose()
	}

	async fn delete_admin_blog(&self, id: Uuid) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM admin_blog WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn list_admin_blogs(
		&self,
		query: &AdminBlogQuery,
	) -> Result<Page<AdminBlog>, StoreError> {
		let mut count = QueryBuilder::new("SELECT COUNT(*) FROM admin_blog");
		push_admin_filters(&mut count, query);

		let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

		let mut select = QueryBuilder::new("SELECT * FROM admin_blog");
		push_admin_filters(&mut select, query);
		select
			.push(" ORDER BY created_at DESC LIMIT ")
			.push_bind(query.limit)
			.push(" OFFSET ")
			.push_bind(query.offset);

		let items = select
			.build_query_as::<AdminBlogRow>()
			.fetch_all(&self.pool)
			.await?
			.into_iter()
			.map(AdminBlog::try_from)
			.collect::<Result<_, _>>()?;

		Ok(Page { items, total })
	}
}
