//! [`IdeaStore`]: the ordered backend fallback chain over the Postgres
//! primary and the JSON snapshot.

use std::fmt;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use sqlx::PgPool;

use ideaforge_core::Idea;

use crate::{ping, postgres, snapshot, StoreError};

/// One persistence backend in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Relational primary.
    Primary,
    /// Local JSON snapshot file. Terminal: its failures surface to callers.
    Snapshot,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Primary => f.write_str("primary"),
            BackendKind::Snapshot => f.write_str("snapshot"),
        }
    }
}

/// Reachability of the primary backend, as reported to health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryStatus {
    /// No primary configured; the store is snapshot-only for the process
    /// lifetime.
    Unconfigured,
    Ok,
    Unavailable,
}

/// Dual-backend idea persistence.
///
/// Whether a primary pool exists is fixed at construction. Every write
/// attempts the chain in [`IdeaStore::backend_order`]; exactly one backend
/// services each call.
pub struct IdeaStore {
    pool: Option<PgPool>,
    snapshot_path: PathBuf,
}

impl IdeaStore {
    #[must_use]
    pub fn new(pool: Option<PgPool>, snapshot_path: PathBuf) -> Self {
        Self {
            pool,
            snapshot_path,
        }
    }

    /// The backend attempt order for this instance: the primary participates
    /// only when a pool was configured, the snapshot is always last.
    #[must_use]
    pub fn backend_order(&self) -> Vec<BackendKind> {
        match self.pool {
            Some(_) => vec![BackendKind::Primary, BackendKind::Snapshot],
            None => vec![BackendKind::Snapshot],
        }
    }

    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.pool.is_some()
    }

    /// Pings the primary for health reporting. Never errors; an unreachable
    /// primary is a reportable state, not a failure.
    pub async fn primary_status(&self) -> PrimaryStatus {
        match &self.pool {
            None => PrimaryStatus::Unconfigured,
            Some(pool) => match ping(pool).await {
                Ok(()) => PrimaryStatus::Ok,
                Err(e) => {
                    tracing::debug!(error = %e, "primary ping failed");
                    PrimaryStatus::Unavailable
                }
            },
        }
    }

    /// Persists a batch of ideas through the first backend that accepts it.
    ///
    /// Each backend re-checks title dedup against its own current content,
    /// so the returned count is the number of ideas that actually landed.
    /// An empty batch touches no backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only when the terminal snapshot backend fails;
    /// primary failures log a warning and fall through.
    pub async fn save(&self, ideas: Vec<Idea>) -> Result<usize, StoreError> {
        if ideas.is_empty() {
            return Ok(0);
        }

        if let Some(pool) = &self.pool {
            match postgres::save_ideas(pool, &ideas).await {
                Ok(saved) => {
                    tracing::debug!(saved, backend = %BackendKind::Primary, "ideas saved");
                    return Ok(saved);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "primary save failed, falling through to snapshot"
                    );
                }
            }
        }

        let saved = snapshot::save_snapshot(&self.snapshot_path, &ideas).await?;
        tracing::debug!(saved, backend = %BackendKind::Snapshot, "ideas saved");
        Ok(saved)
    }

    /// Loads the stored catalog, newest first on the primary.
    ///
    /// Never errors: a primary failure or an empty primary falls through to
    /// the snapshot, and an unreadable snapshot yields an empty list.
    pub async fn load(&self) -> Vec<Idea> {
        if let Some(pool) = &self.pool {
            match postgres::load_ideas(pool).await {
                Ok(ideas) if !ideas.is_empty() => return ideas,
                Ok(_) => {
                    tracing::debug!("primary holds no ideas, reading snapshot");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "primary load failed, reading snapshot");
                }
            }
        }
        snapshot::load_snapshot(&self.snapshot_path).await
    }

    /// Loads ideas created within the trailing `window`, same fallback rules
    /// as [`IdeaStore::load`]. Snapshot records without a timestamp are
    /// outside any window.
    pub async fn load_recent(&self, window: Duration) -> Vec<Idea> {
        let since = Utc::now() - window;

        if let Some(pool) = &self.pool {
            match postgres::load_recent_ideas(pool, since).await {
                Ok(ideas) if !ideas.is_empty() => return ideas,
                Ok(_) => {
                    tracing::debug!("primary holds no recent ideas, reading snapshot");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "primary recent load failed, reading snapshot");
                }
            }
        }

        let mut ideas = snapshot::load_snapshot(&self.snapshot_path).await;
        ideas.retain(|idea| idea.created_at.is_some_and(|created| created >= since));
        ideas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect_pool_lazy, PoolConfig};

    #[test]
    fn snapshot_only_store_has_a_single_backend() {
        let store = IdeaStore::new(None, PathBuf::from("/tmp/ideas.json"));

        assert_eq!(store.backend_order(), vec![BackendKind::Snapshot]);
        assert!(!store.has_primary());
    }

    #[tokio::test]
    async fn configured_primary_is_attempted_before_the_snapshot() {
        // connect_lazy only parses the URL; no database is contacted.
        let pool = connect_pool_lazy(
            "postgres://forge@localhost:5432/forge",
            PoolConfig::default(),
        )
        .expect("lazy pool construction is offline");
        let store = IdeaStore::new(Some(pool), PathBuf::from("/tmp/ideas.json"));

        assert_eq!(
            store.backend_order(),
            vec![BackendKind::Primary, BackendKind::Snapshot]
        );
        assert!(store.has_primary());
    }
}
