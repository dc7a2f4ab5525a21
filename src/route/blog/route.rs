use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Identity, Json, Path, Query},
	openapi::tag,
	route::model::{DataResponse, ItemResponse, ListResponse, MessageResponse},
	slug, sync, AppState,
};

use super::{model, Error, RouteError};

/// List blog posts
/// Returns a filtered, paginated listing of public blog posts, newest first.
#[route(tag = tag::BLOG)]
pub async fn list_blogs(
	State(state): State<AppState>,
	Query(query): Query<model::BlogListInput>,
) -> Result<Json<ListResponse<model::Blog>>, RouteError> {
	let page = state.store.list_blogs(&query.query()).await?;

	Ok(Json(ListResponse::new(page, query.page, query.limit)))
}

/// Get blog post
/// Returns a single blog post by its unique id, counting the view.
#[route(tag = tag::BLOG)]
pub async fn get_blog(
	State(state): State<AppState>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<DataResponse<model::Blog>>, RouteError> {
	let blog = state.store.record_blog_view(path.id).await?;

	Ok(Json(DataResponse::new(
		blog.ok_or(Error::UnknownBlog(path.id))?,
	)))
}

/// Create blog post
/// Creates a new public blog post, deriving a unique slug from the title.
#[route(tag = tag::BLOG, response(status = 201, description = "Blog post created successfully.", shape = "Json<ItemResponse<model::Blog>>"))]
pub async fn create_blog(
	State(state): State<AppState>,
	identity: Identity,
	Json(input): Json<model::BlogInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let slug = slug::unique_blog_slug(state.store.as_ref(), &input.title, None).await?;
	let blog = model::Blog::create(input, slug, Some(identity.user_id));

	state.store.save_blog(&blog).await?;
	state.sync.schedule(sync::Job::MirrorPublic(blog.id));

	Ok((
		StatusCode::CREATED,
		Json(ItemResponse::new("Blog post created successfully", blog)),
	))
}

/// Update blog post
/// Re-validates the full payload and overwrites an existing post by the id in the body.
#[route(tag = tag::BLOG)]
pub async fn update_blog(
	State(state): State<AppState>,
	_identity: Identity,
	Json(input): Json<model::UpdateBlogInput>,
) -> Result<Json<ItemResponse<model::Blog>>, RouteError> {
	let mut blog = state
		.store
		.blog_by_id(input.id)
		.await?
		.ok_or(Error::UnknownBlog(input.id))?;

	if blog.title != input.blog.title {
		blog.slug =
			slug::unique_blog_slug(state.store.as_ref(), &input.blog.title, Some(blog.id))
				.await?;
	}

	blog.apply(input.blog);

	state.store.save_blog(&blog).await?;
	state.sync.schedule(sync::Job::MirrorPublic(blog.id));

	Ok(Json(ItemResponse::new("Blog post updated successfully", blog)))
}

/// Delete blog post
/// Deletes a post by the id in the query string, cascading to the admin-side counterpart best-effort.
#[route(tag = tag::BLOG)]
pub async fn delete_blog(
	State(state): State<AppState>,
	_identity: Identity,
	Query(query): Query<model::IdInput>,
) -> Result<Json<MessageResponse>, RouteError> {
	let blog = state
		.store
		.blog_by_id(query.id)
		.await?
		.ok_or(Error::UnknownBlog(query.id))?;

	state.store.delete_blog(blog.id).await?;
	state.sync.mirror_admin_removal(&blog).await;

	Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}
