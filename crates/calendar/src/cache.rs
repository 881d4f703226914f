use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cookcal_api::CalendarBackend;
use cookcal_shared::{
    CalendarMeal, DateRange, Error, GroupId, GroupMeals, GroupRef, MealDate, MealId, MealsByDate,
    Result,
};
use strum::Display;

use crate::{Coverage, CoverageMode, group_recipes, state::CachedState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnsureOptions {
    /// Leave the loading flag untouched, for background prefetches.
    pub silent: bool,
    /// Skip the coverage check and replace everything cached.
    pub force: bool,
}

impl EnsureOptions {
    pub fn background() -> Self {
        Self {
            silent: true,
            force: false,
        }
    }

    pub fn forced() -> Self {
        Self {
            silent: false,
            force: true,
        }
    }
}

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum EnsureOutcome {
    /// The range was already covered, nothing was fetched.
    CacheHit,
    /// Fetched and merged into the cache.
    Applied,
    /// Fetched, but a later request had already been applied.
    Superseded,
    /// The fetch failed, see [`CalendarRangeCache::error`].
    Failed,
}

#[derive(Display, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Everything a calendar view renders, copied out of the cache.
#[derive(Debug, Clone, Default)]
pub struct CalendarSnapshot {
    pub personal_meals: MealsByDate,
    pub group_meals_by_group: GroupMeals,
    pub groups: Vec<GroupRef>,
    pub covered_range: Option<DateRange>,
    pub loading: bool,
    pub error: Option<Arc<Error>>,
    pub status: Status,
}

struct Inner {
    meals: CachedState,
    coverage: Coverage,
    error: Option<Arc<Error>>,
    loading: usize,
    next_seq: u64,
    /// Highest request that finished, successfully or not.
    completed_seq: u64,
    applied_seq: u64,
    last_requested: Option<DateRange>,
}

impl Inner {
    fn status(&self) -> Status {
        if self.loading > 0 {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else if self.applied_seq > 0 {
            Status::Ready
        } else {
            Status::Idle
        }
    }
}

struct Shared<B> {
    backend: B,
    inner: RwLock<Inner>,
}

/// Client-side cache of calendar meals for one calendar view.
///
/// Requests are numbered as they start. A response, data or error, is only
/// taken when no later-numbered request has completed already, so overlapping
/// requests resolve to the most recently issued one regardless of completion
/// order.
pub struct CalendarRangeCache<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for CalendarRangeCache<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: CalendarBackend> CalendarRangeCache<B> {
    pub fn new(backend: B) -> Self {
        Self::with_coverage(backend, CoverageMode::default())
    }

    pub fn with_coverage(backend: B, mode: CoverageMode) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                inner: RwLock::new(Inner {
                    meals: CachedState::default(),
                    coverage: Coverage::new(mode),
                    error: None,
                    loading: 0,
                    next_seq: 0,
                    completed_seq: 0,
                    applied_seq: 0,
                    last_requested: None,
                }),
            }),
        }
    }

    /// Makes sure the cache holds the meals of `range`.
    ///
    /// Failures never escape: they are stored and exposed through
    /// [`error`](Self::error) until the next attempt starts.
    #[tracing::instrument(
        skip(self),
        fields(start = %range.start(), end = %range.end(), force = options.force, silent = options.silent)
    )]
    pub async fn ensure_range(&self, range: DateRange, options: EnsureOptions) -> EnsureOutcome {
        let seq = {
            let mut inner = self.write();
            inner.last_requested = Some(range);

            if !options.force && inner.coverage.covers(&range) {
                tracing::debug!("range already covered");
                return EnsureOutcome::CacheHit;
            }

            if options.force {
                inner.coverage.clear();
            }

            inner.error = None;
            inner.next_seq += 1;
            inner.next_seq
        };

        let _loading = (!options.silent).then(|| LoadingGuard::new(&self.shared));

        let result = self
            .shared
            .backend
            .fetch_range(&range)
            .await
            .map(group_recipes);

        let mut inner = self.write();

        if seq < inner.completed_seq {
            tracing::debug!(seq, completed = inner.completed_seq, "discarding superseded fetch");
            return EnsureOutcome::Superseded;
        }

        inner.completed_seq = seq;

        match result {
            Ok(fresh) => {
                let meals = fresh.meal_count();

                // Ranges merged while a forced fetch was in flight are
                // dropped by the replace, so their coverage goes too.
                if options.force {
                    inner.meals.replace(fresh);
                    inner.coverage.clear();
                } else {
                    inner.meals.merge(fresh, &range);
                }

                inner.coverage.insert(range);
                inner.error = None;
                inner.applied_seq = seq;

                tracing::info!(seq, meals, covered = ?inner.coverage.bounds(), "calendar range applied");

                EnsureOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(seq, err = %err, "calendar fetch failed");
                inner.error = Some(Arc::new(err));

                EnsureOutcome::Failed
            }
        }
    }

    /// Asks the backend to delete a meal. The cached copy stays until the
    /// next forced fetch.
    #[tracing::instrument(skip(self))]
    pub async fn delete_meal(&self, meal_id: MealId) -> Result<()> {
        self.shared.backend.delete_meal(meal_id).await?;
        tracing::info!(meal_id, "calendar meal deleted");

        Ok(())
    }

    /// Forced reload of the last requested range. `None` when nothing was
    /// requested yet.
    pub async fn refetch(&self) -> Option<EnsureOutcome> {
        let range = self.read().last_requested?;

        Some(self.ensure_range(range, EnsureOptions::forced()).await)
    }
}

impl<B> CalendarRangeCache<B> {
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.shared
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.shared
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Forgets the covered range so the next request fetches. Cached meals
    /// stay visible.
    pub fn invalidate(&self) {
        self.write().coverage.clear();
    }

    pub fn personal_meals(&self) -> MealsByDate {
        self.read().meals.personal_meals.clone()
    }

    pub fn group_meals_by_group(&self) -> GroupMeals {
        self.read().meals.group_meals.clone()
    }

    pub fn groups(&self) -> Vec<GroupRef> {
        self.read().meals.groups.clone()
    }

    pub fn meals_on(&self, date: MealDate) -> Vec<CalendarMeal> {
        self.read()
            .meals
            .personal_meals
            .get(&date)
            .cloned()
            .unwrap_or_default()
    }

    pub fn group_meals_on(&self, group_id: GroupId, date: MealDate) -> Vec<CalendarMeal> {
        self.read()
            .meals
            .group_meals
            .get(&group_id)
            .and_then(|dates| dates.get(&date))
            .cloned()
            .unwrap_or_default()
    }

    pub fn loading(&self) -> bool {
        self.read().loading > 0
    }

    pub fn error(&self) -> Option<Arc<Error>> {
        self.read().error.clone()
    }

    pub fn status(&self) -> Status {
        self.read().status()
    }

    pub fn coverage_mode(&self) -> CoverageMode {
        self.read().coverage.mode()
    }

    /// Outer bounds of everything fetched since the last force or invalidate.
    pub fn covered_range(&self) -> Option<DateRange> {
        self.read().coverage.bounds()
    }

    pub fn covered_spans(&self) -> Vec<DateRange> {
        self.read().coverage.spans().to_vec()
    }

    pub fn snapshot(&self) -> CalendarSnapshot {
        let inner = self.read();

        CalendarSnapshot {
            personal_meals: inner.meals.personal_meals.clone(),
            group_meals_by_group: inner.meals.group_meals.clone(),
            groups: inner.meals.groups.clone(),
            covered_range: inner.coverage.bounds(),
            loading: inner.loading > 0,
            error: inner.error.clone(),
            status: inner.status(),
        }
    }
}

/// Holds the loading flag up for as long as a non-silent fetch is in flight,
/// including when the request future is dropped mid-fetch.
struct LoadingGuard<B> {
    shared: Arc<Shared<B>>,
}

impl<B> LoadingGuard<B> {
    fn new(shared: &Arc<Shared<B>>) -> Self {
        shared
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loading += 1;

        Self {
            shared: Arc::clone(shared),
        }
    }
}

impl<B> Drop for LoadingGuard<B> {
    fn drop(&mut self) {
        let mut inner = self
            .shared
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        inner.loading = inner.loading.saturating_sub(1);
    }
}
