use uuid::Uuid;

use crate::store::{ContentStore, StoreError};

pub const MAX_SLUG_LENGTH: usize = 80;
pub const MAX_SLUG_PROBES: u32 = 5;

/// Derives a URL-safe slug from a title.
///
/// One algorithm for both collections: lowercase, strip everything outside
/// ASCII alphanumerics, collapse separator runs to single hyphens, cap at
/// [`MAX_SLUG_LENGTH`] without leaving a trailing hyphen.
pub fn slugify(title: &str) -> String {
	let mut slug = String::with_capacity(title.len());
	let mut pending_hyphen = false;

	for c in title.chars() {
		if c.is_ascii_alphanumeric() {
			if pending_hyphen && !slug.is_empty() {
				slug.push('-');
			}
			pending_hyphen = false;
			slug.push(c.to_ascii_lowercase());
		} else {
			pending_hyphen = true;
		}
	}

	if slug.len() > MAX_SLUG_LENGTH {
		slug.truncate(MAX_SLUG_LENGTH);
		while slug.ends_with('-') {
			slug.pop();
		}
	}

	slug
}

/// Resolves a slug that is unique within the public collection.
///
/// Probes `base`, then `base-1` through `base-5`; after that many collisions
/// it falls back to a short random suffix instead of probing forever. A
/// candidate already owned by `exclude` (the record being updated) counts as
/// free.
pub async fn unique_blog_slug(
	store: &dyn ContentStore,
	title: &str,
	exclude: Option<Uuid>,
) -> Result<String, StoreError> {
	let base = slugify(title);
	let mut candidate = base.clone();
	let mut probe = 0;

	loop {
		match store.blog_by_slug(&candidate).await? {
			None => return Ok(candidate),
			Some(existing) if Some(existing.id) == exclude => return Ok(candidate),
			Some(_) => {
				probe += 1;
				if probe > MAX_SLUG_PROBES {
					break;
				}
				candidate = format!("{base}-{probe}");
			}
		}
	}

	Ok(format!("{base}-{}", random_suffix()))
}

fn random_suffix() -> String {
	let id = Uuid::new_v4().simple().to_string();
	id[..8].to_string()
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use super::*;
	use crate::model::{Blog, BlogInput, Category};
	use crate::store::{memory::MemoryStore, ContentStore};

	fn blog_with_slug(slug: &str) -> Blog {
		Blog::create(
			BlogInput {
				title: "Some Placeholder Title".into(),
				summary: "A summary long enough to pass.".into(),
				content: "c".repeat(60),
				category: Category::Technology,
				tags: Vec::new(),
				featured: false,
				published: true,
				image_url: None,
			},
			slug.into(),
			None,
		)
	}

	#[test]
	fn test_slugify_basic() {
		assert_eq!(slugify("Intro to Robotics"), "intro-to-robotics");
		assert_eq!(slugify("Hello, World!"), "hello-world");
		assert_eq!(slugify("  spaced   out  "), "spaced-out");
		assert_eq!(slugify("C++ & Rust: a comparison"), "c-rust-a-comparison");
	}

	#[test]
	fn test_slugify_caps_length() {
		let slug = slugify(&"a ".repeat(200));

		assert!(slug.len() <= MAX_SLUG_LENGTH);
		assert!(!slug.ends_with('-'));
	}

	#[tokio::test]
	async fn test_unique_slug_suffixes() {
		let store = Arc::new(MemoryStore::default());
		store.save_blog(&blog_with_slug("intro-to-robotics")).await.unwrap();

		let slug = unique_blog_slug(store.as_ref(), "Intro to Robotics", None)
			.await
			.unwrap();

		assert_eq!(slug, "intro-to-robotics-1");
	}

	#[tokio::test]
	async fn test_unique_slug_keeps_own_slug() {
		let store = Arc::new(MemoryStore::default());
		let blog = blog_with_slug("intro-to-robotics");
		store.save_blog(&blog).await.unwrap();

		let slug = unique_blog_slug(store.as_ref(), "Intro to Robotics", Some(blog.id))
			.await
			.unwrap();

		assert_eq!(slug, "intro-to-robotics");
	}

	#[tokio::test]
	async fn test_unique_slug_bounded_fallback() {
		let store = Arc::new(MemoryStore::default());
		store.save_blog(&blog_with_slug("busy")).await.unwrap();
		for probe in 1..=MAX_SLUG_PROBES {
			store
				.save_blog(&blog_with_slug(&format!("busy-{probe}")))
				.await
				.unwrap();
		}

		let slug = unique_blog_slug(store.as_ref(), "busy", None).await.unwrap();

		assert!(slug.starts_with("busy-"));
		assert_eq!(slug.len(), "busy-".len() + 8);
	}
}
