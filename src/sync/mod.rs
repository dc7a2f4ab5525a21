pub mod reconciler;

use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::model::{AdminBlog, Blog, Category, Status};
use crate::store::{Store, StoreError};

const SUMMARY_LENGTH: usize = 200;

/// A deferred mirror operation, carried on the outbox channel to the
/// background reconciler. Jobs hold ids rather than records so the
/// reconciler always works from fresh state.
#[derive(Debug)]
pub enum Job {
	MirrorAdmin(Uuid),
	MirrorPublic(Uuid),
	RemovePublicMirror {
		public_id: Option<Uuid>,
		slug: String,
	},
	RemoveAdminMirror {
		admin_id: Option<Uuid>,
		slug: String,
	},
	Reconcile,
}

/// Derives a listing summary from the post body.
pub fn summarize(content: &str) -> String {
	if content.chars().count() <= SUMMARY_LENGTH {
		return content.to_string();
	}

	let mut summary: String = content.chars().take(SUMMARY_LENGTH).collect();
	summary.push_str("...");
	summary
}

/// The fallible sync core: converges the admin and public collections one
/// record at a time. Shared by the route-facing [`Handle`] and the
/// background reconciler.
#[derive(Clone)]
pub struct Engine {
	store: Store,
}

impl Engine {
	pub fn new(store: Store) -> Self {
		Self { store }
	}

	/// Converges the public counterpart of an admin record.
	///
	/// The counterpart is found by cross-reference id first, slug second.
	/// When found, the authored fields are overwritten and the engagement
	/// fields (category, summary, featured, views, likes, image) are left
	/// alone, so replays never regress them. When absent, a fresh public
	/// post is created with defaults. Both records end up cross-linked.
	pub async fn apply_admin(&self, admin: &AdminBlog) -> Result<Uuid, StoreError> {
		let existing = match admin.public_id {
			Some(public_id) => self.store.blog_by_id(public_id).await?,
			None => None,
		};
		let existing = match existing {
			Some(blog) => Some(blog),
			None => self.store.blog_by_slug(&admin.slug).await?,
		};

		let blog = match existing {
			Some(mut blog) => {
				blog.title = admin.title.clone();
				blog.slug = admin.slug.clone();
				blog.content = admin.content.clone();
				blog.tags = admin.tags.clone();
				blog.author_id = admin.author_id;
				blog.published = admin.status == Status::Published;
				blog.admin_id = Some(admin.id);
				blog.updated_at = Utc::now();

				self.store.save_blog(&blog).await?;
				blog
			}
			None => {
				let now = Utc::now();
				let blog = Blog {
					id: Uuid::new_v4(),
					title: admin.title.clone(),
					slug: admin.slug.clone(),
					summary: summarize(&admin.content),
					content: admin.content.clone(),
					category: Category::Technology,
					tags: admin.tags.clone(),
					author_id: admin.author_id,
					featured: false,
					published: admin.status == Status::Published,
					views: 0,
					likes: 0,
					image_url: None,
					admin_id: Some(admin.id),
					created_at: now,
					updated_at: now,
				};

				self.store.save_blog(&blog).await?;
				blog
			}
		};

		if admin.public_id != Some(blog.id) {
			let mut admin = admin.clone();
			admin.public_id = Some(blog.id);
			self.store.save_admin_blog(&admin).await?;
		}

		Ok(blog.id)
	}

	/// Adopts a public record into the admin collection.
	///
	/// A counterpart found by cross-reference or slug is only re-linked;
	/// otherwise a new admin record is created with `blog_id` derived from
	/// the public id and `status` derived from the published flag.
	pub async fn apply_public(&self, blog: &Blog) -> Result<Uuid, StoreError> {
		let existing = match blog.admin_id {
			Some(admin_id) => self.store.admin_blog_by_id(admin_id).await?,
			None => None,
		};
		let existing = match existing {
			Some(admin) => Some(admin),
			None => self.store.admin_blog_by_public_id(blog.id).await?,
		};
		let existing = match existing {
			Some(admin) => Some(admin),
			None => self.store.admin_blog_by_slug(&blog.slug).await?,
		};

		let admin = match existing {
			Some(mut admin) => {
				if admin.public_id != Some(blog.id) {
					admin.public_id = Some(blog.id);
					self.store.save_admin_blog(&admin).await?;
				}
				admin
			}
			None => {
				let now = Utc::now();
				let admin = AdminBlog {
					id: Uuid::new_v4(),
					blog_id: blog.id.to_string(),
					title: blog.title.clone(),
					slug: blog.slug.clone(),
					content: blog.content.clone(),
					author_id: blog.author_id,
					tags: blog.tags.clone(),
					status: if blog.published {
						Status::Published
					} else {
						Status::Draft
					},
					published_date: blog.published.then(Utc::now),
					last_updated: now,
					public_id: Some(blog.id),
					created_at: now,
				};

				self.store.save_admin_blog(&admin).await?;
				admin
			}
		};

		if blog.admin_id != Some(admin.id) {
			let mut blog = blog.clone();
			blog.admin_id = Some(admin.id);
			self.store.save_blog(&blog).await?;
		}

		Ok(admin.id)
	}

	/// Cascade half of an admin delete: removes the public counterpart, by
	/// cross-reference id first, slug second. Absence is not an error.
	pub async fn remove_public_mirror(
		&self,
		public_id: Option<Uuid>,
		slug: &str,
	) -> Result<bool, StoreError> {
		if let Some(id) = public_id {
			if self.store.delete_blog(id).await? {
				return Ok(true);
			}
		}

		match self.store.blog_by_slug(slug).await? {
			Some(blog) => self.store.delete_blog(blog.id).await,
			None => Ok(false),
		}
	}

	/// Cascade half of a public delete: removes the admin counterpart.
	pub async fn remove_admin_mirror(
		&self,
		admin_id: Option<Uuid>,
		slug: &str,
	) -> Result<bool, StoreError> {
		if let Some(id) = admin_id {
			if self.store.delete_admin_blog(id).await? {
				return Ok(true);
			}
		}

		match self.store.admin_blog_by_slug(slug).await? {
			Some(admin) => self.store.delete_admin_blog(admin.id).await,
			None => Ok(false),
		}
	}

	/// Mirrors every public post that has no admin counterpart yet.
	/// Returns how many records were adopted.
	pub async fn reconcile(&self) -> Result<usize, StoreError> {
		let unlinked = self.store.blogs_without_mirror(i64::MAX).await?;
		let count = unlinked.len();

		for blog in &unlinked {
			self.apply_public(blog).await?;
		}

		Ok(count)
	}
}

/// Route-facing sync handle: the core engine plus the outbox sender.
///
/// The `mirror_*` entry points carry the availability-over-consistency
/// policy: a failed mirror write is logged, handed to the reconciler for
/// retry, and never fails the caller's primary operation.
#[derive(Clone)]
pub struct Handle {
	engine: Engine,
	queue: mpsc::UnboundedSender<Job>,
}

impl Handle {
	pub fn new(store: Store) -> (Self, mpsc::UnboundedReceiver<Job>) {
		let (queue, jobs) = mpsc::unbounded_channel();

		(
			Self {
				engine: Engine::new(store),
				queue,
			},
			jobs,
		)
	}

	pub fn engine(&self) -> &Engine {
		&self.engine
	}

	/// Hands a job to the background reconciler.
	pub fn schedule(&self, job: Job) {
		if self.queue.send(job).is_err() {
			tracing::warn!("sync queue closed, dropping job");
		}
	}

	/// Fallible adoption of a public record, used when an admin operation
	/// targets an id that only exists in the public collection. Part of the
	/// primary operation there, so errors surface normally.
	pub async fn apply_public(&self, blog: &Blog) -> Result<Uuid, StoreError> {
		self.engine.apply_public(blog).await
	}

	/// Best-effort admin→public mirror; failures are logged and retried in
	/// the background, never surfaced to the caller.
	pub async fn mirror_admin(&self, admin: &AdminBlog) {
		if let Err(error) = self.engine.apply_admin(admin).await {
			tracing::warn!(%error, slug = %admin.slug, "mirror write failed, scheduling retry");
			self.schedule(Job::MirrorAdmin(admin.id));
		}
	}

	/// Best-effort cascade of an admin delete.
	pub async fn mirror_public_removal(&self, admin: &AdminBlog) {
		if let Err(error) = self
			.engine
			.remove_public_mirror(admin.public_id, &admin.slug)
			.await
		{
			tracing::warn!(%error, slug = %admin.slug, "mirror delete failed, scheduling retry");
			self.schedule(Job::RemovePublicMirror {
				public_id: admin.public_id,
				slug: admin.slug.clone(),
			});
		}
	}

	/// Best-effort cascade of a public delete.
	pub async fn mirror_admin_removal(&self, blog: &Blog) {
		if let Err(error) = self
			.engine
			.remove_admin_mirror(blog.admin_id, &blog.slug)
			.await
		{
			tracing::warn!(%error, slug = %blog.slug, "mirror delete failed, scheduling retry");
			self.schedule(Job::RemoveAdminMirror {
				admin_id: blog.admin_id,
				slug: blog.slug.clone(),
			});
		}
	}
}
