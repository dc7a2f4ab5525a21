use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::{Engine, Job};
use crate::store::StoreError;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Starts the background worker that drains the sync outbox.
///
/// Jobs are processed sequentially with bounded exponential backoff; a job
/// that still fails after [`MAX_ATTEMPTS`] is dropped with a warning. The
/// worker holds no outbox sender, so it stops once every route-side handle
/// is gone.
pub fn spawn(engine: Engine, mut jobs: mpsc::UnboundedReceiver<Job>) -> JoinHandle<()> {
	tokio::spawn(async move {
		while let Some(job) = jobs.recv().await {
			run(&engine, &job).await;
		}

		tracing::debug!("sync queue closed, reconciler stopping");
	})
}

async fn run(engine: &Engine, job: &Job) {
	let mut delay = INITIAL_BACKOFF;

	for attempt in 1..=MAX_ATTEMPTS {
		match attempt_job(engine, job).await {
			Ok(()) => {
				if attempt > 1 {
					tracing::info!(?job, attempt, "mirror retry succeeded");
				}
				return;
			}
			Err(error) if attempt == MAX_ATTEMPTS => {
				tracing::warn!(%error, ?job, "giving up on mirror job");
			}
			Err(error) => {
				tracing::warn!(%error, ?job, attempt, "mirror job failed, backing off");
				sleep(delay).await;
				delay = (delay * 2).min(MAX_BACKOFF);
			}
		}
	}
}

async fn attempt_job(engine: &Engine, job: &Job) -> Result<(), StoreError> {
	match job {
		Job::MirrorAdmin(id) => {
			// the record may be gone by the time the job runs; that settles it
			if let Some(admin) = engine.store.admin_blog_by_id(*id).await? {
				engine.apply_admin(&admin).await?;
			}
		}
		Job::MirrorPublic(id) => {
			if let Some(blog) = engine.store.blog_by_id(*id).await? {
				engine.apply_public(&blog).await?;
			}
		}
		Job::RemovePublicMirror { public_id, slug } => {
			engine.remove_public_mirror(*public_id, slug).await?;
		}
		Job::RemoveAdminMirror { admin_id, slug } => {
			engine.remove_admin_mirror(*admin_id, slug).await?;
		}
		Job::Reconcile => {
			let adopted = engine.reconcile().await?;
			tracing::info!(adopted, "content reconciliation finished");
		}
	}

	Ok(())
}
