//! src/provider/data_provider.rs
//! ============================================================================
//! # DataProvider: the read-only source of the six collections
//!
//! `load_catalog` issues the six requests concurrently and waits for all of
//! them under one overall timeout. Any failure fails the whole load: the
//! caller receives either a complete `Catalog` or `ProviderUnavailable`,
//! never a partial data set.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use enum_map::Enum;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::records::{Branch, Course, Resource, Semester, Subject, University};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Collection {
    Courses,
    Branches,
    Semesters,
    Subjects,
    Resources,
    Universities,
}

impl Collection {
    pub const ALL: [Self; 6] = [
        Self::Courses,
        Self::Branches,
        Self::Semesters,
        Self::Subjects,
        Self::Resources,
        Self::Universities,
    ];
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Courses => "courses",
            Self::Branches => "branches",
            Self::Semesters => "semesters",
            Self::Subjects => "subjects",
            Self::Resources => "resources",
            Self::Universities => "universities",
        };
        f.write_str(s)
    }
}

/// Anything that can serve a collection as a list of flat JSON records.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Value>, AppError>;
}

/// Collections completed so far; shared with the loading overlay.
#[derive(Debug, Clone, Default)]
pub struct LoadProgress {
    completed: Arc<AtomicUsize>,
}

impl LoadProgress {
    pub const TOTAL: usize = Collection::ALL.len();

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mark_done(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed).min(Self::TOTAL)
    }

    /// Percentage in `0..=100`.
    #[must_use]
    pub fn percent(&self) -> u16 {
        (self.completed() * 100 / Self::TOTAL) as u16
    }
}

async fn fetch_typed<T, P>(
    provider: &P,
    collection: Collection,
    progress: &LoadProgress,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned,
    P: DataProvider + ?Sized,
{
    let rows = provider
        .fetch_collection(collection)
        .await
        .map_err(|e| match e {
            AppError::ProviderUnavailable(_) => e,
            other => AppError::provider_unavailable(format!("{collection}: {other}")),
        })?;

    let total = rows.len();
    let typed: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(row, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%collection, row, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if typed.len() < total {
        warn!(%collection, kept = typed.len(), total, "Some records were skipped");
    }

    progress.mark_done();
    Ok(typed)
}

/// Fetch all six collections concurrently, bounded by `timeout`.
#[instrument(level = "info", skip(provider, progress))]
pub async fn load_catalog<P>(
    provider: &P,
    timeout: Duration,
    progress: &LoadProgress,
) -> Result<Catalog, AppError>
where
    P: DataProvider + ?Sized,
{
    let start = Instant::now();

    let load = async {
        futures::try_join!(
            fetch_typed::<Course, _>(provider, Collection::Courses, progress),
            fetch_typed::<Branch, _>(provider, Collection::Branches, progress),
            fetch_typed::<Semester, _>(provider, Collection::Semesters, progress),
            fetch_typed::<Subject, _>(provider, Collection::Subjects, progress),
            fetch_typed::<Resource, _>(provider, Collection::Resources, progress),
            fetch_typed::<University, _>(provider, Collection::Universities, progress),
        )
    };

    let (courses, branches, semesters, subjects, resources, universities) =
        tokio::time::timeout(timeout, load).await.map_err(|_| {
            AppError::provider_unavailable(format!("no response within {timeout:?}"))
        })??;

    let catalog = Catalog::new(courses, branches, semesters, subjects, resources, universities);
    info!(
        counts = ?catalog.counts(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "All data loaded successfully"
    );
    Ok(catalog)
}
