use aide::axum::IntoApiResponse;
use axum::{
	extract::State,
	http::{header, HeaderValue, StatusCode},
};
use macros::route;

use crate::{
	extract::{Admin, Json, Path, Query},
	openapi::tag,
	route::model::{ItemResponse, ListResponse, MessageResponse},
	slug, sync, AppState,
};

use super::{model, Error, RouteError};

fn no_cache() -> [(header::HeaderName, HeaderValue); 2] {
	[
		(
			header::CACHE_CONTROL,
			HeaderValue::from_static("no-store, no-cache, must-revalidate"),
		),
		(header::PRAGMA, HeaderValue::from_static("no-cache")),
	]
}

/// Resolves the target of an admin mutation.
///
/// An id missing from the admin collection is retried as a public id: the
/// public record, if any, is adopted into the admin collection first. This
/// keeps admin edits working for content that entered through the public
/// surface and was never mirrored.
async fn admin_blog_or_adopt(
	state: &AppState,
	id: uuid::Uuid,
) -> Result<model::AdminBlog, RouteError> {
	if let Some(admin) = state.store.admin_blog_by_id(id).await? {
		return Ok(admin);
	}

	let Some(blog) = state.store.blog_by_id(id).await? else {
		return Err(Error::UnknownBlog(id).into());
	};

	let admin_id = state.sync.apply_public(&blog).await?;

	state
		.store
		.admin_blog_by_id(admin_id)
		.await?
		.ok_or_else(|| Error::UnknownBlog(id).into())
}

/// List admin blogs
/// Returns a filtered, paginated listing of admin-side blog records, newest first.
#[route(tag = tag::ADMIN, response(status = 200, shape = "Json<ListResponse<model::AdminBlog>>"))]
pub async fn list_blogs(
	State(state): State<AppState>,
	_admin: Admin,
	Query(query): Query<model::AdminListInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let page = state.store.list_admin_blogs(&query.query()).await?;

	Ok((
		no_cache(),
		Json(ListResponse::new(page, query.page, query.limit)),
	))
}

/// Create admin blog
/// Creates an admin-side blog record; a colliding title-derived slug is a conflict.
#[route(tag = tag::ADMIN, response(status = 201, description = "Blog created successfully.", shape = "Json<ItemResponse<model::AdminBlog>>"))]
pub async fn create_blog(
	State(state): State<AppState>,
	admin: Admin,
	Json(input): Json<model::AdminBlogInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let slug = slug::slugify(&input.title);

	if state.store.admin_blog_by_slug(&slug).await?.is_some() {
		return Err(Error::DuplicateSlug(slug).into());
	}

	let blog = model::AdminBlog::create(input, slug, admin.0.user_id);

	state.store.save_admin_blog(&blog).await?;
	state.sync.mirror_admin(&blog).await;

	// the mirror may have linked the counterpart in the meantime
	let blog = state.store.admin_blog_by_id(blog.id).await?.unwrap_or(blog);

	Ok((
		StatusCode::CREATED,
		Json(ItemResponse::new("Blog created successfully", blog)),
	))
}

/// Update admin blog
/// Re-validates the full payload and overwrites an admin record by id, adopting an untracked public record when needed.
#[route(tag = tag::ADMIN)]
pub async fn update_blog(
	State(state): State<AppState>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::AdminBlogInput>,
) -> Result<Json<ItemResponse<model::AdminBlog>>, RouteError> {
	let mut blog = admin_blog_or_adopt(&state, path.id).await?;

	if blog.title != input.title {
		let slug = slug::slugify(&input.title);

		match state.store.admin_blog_by_slug(&slug).await? {
			Some(other) if other.id != blog.id => {
				return Err(Error::DuplicateSlug(slug).into());
			}
			_ => blog.slug = slug,
		}
	}

	blog.apply(input);

	state.store.save_admin_blog(&blog).await?;
	state.sync.mirror_admin(&blog).await;

	let blog = state.store.admin_blog_by_id(blog.id).await?.unwrap_or(blog);

	Ok(Json(ItemResponse::new("Blog updated successfully", blog)))
}

/// Delete admin blog
/// Deletes an admin record by id and cascades to the public counterpart best-effort.
#[route(tag = tag::ADMIN)]
pub async fn delete_blog(
	State(state): State<AppState>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<Json<MessageResponse>, RouteError> {
	let blog = admin_blog_or_adopt(&state, path.id).await?;

	state.store.delete_admin_blog(blog.id).await?;
	state.sync.mirror_public_removal(&blog).await;

	Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

/// Reconcile content
/// Schedules a background pass that mirrors every public post without an admin counterpart.
#[route(tag = tag::ADMIN)]
pub async fn sync_blogs(
	State(state): State<AppState>,
	_admin: Admin,
) -> Json<MessageResponse> {
	state.sync.schedule(sync::Job::Reconcile);

	Json(MessageResponse::new("Content reconciliation scheduled"))
}
