use std::{
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use cookcal_shared::{CalendarMeal, CalendarRecipes, DateRange, GroupCalendar, MealId, Result};

use crate::CalendarBackend;

/// Offline backend that answers range queries from a static list of meals.
#[derive(Debug, Default)]
pub struct FixtureBackend {
    meals: Vec<CalendarMeal>,
    fetches: AtomicUsize,
}

impl FixtureBackend {
    pub fn new(meals: impl IntoIterator<Item = CalendarMeal>) -> Self {
        Self {
            meals: meals.into_iter().collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Loads a JSON array of meals.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let meals: Vec<CalendarMeal> = serde_json::from_slice(&bytes)?;

        tracing::debug!(path = %path.as_ref().display(), meals = meals.len(), "fixtures loaded");

        Ok(Self::new(meals))
    }

    pub fn meals(&self) -> &[CalendarMeal] {
        &self.meals
    }

    /// Number of `fetch_range` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarBackend for FixtureBackend {
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let mut recipes = CalendarRecipes::default();

        for meal in self
            .meals
            .iter()
            .filter(|meal| range.contains(meal.scheduled_date))
        {
            let Some(group_id) = meal.group_id else {
                recipes.personal_calendars.push(meal.clone());
                continue;
            };

            match recipes
                .group_calendars
                .iter_mut()
                .find(|group| group.group_id == group_id)
            {
                Some(group) => group.calendars.push(meal.clone()),
                None => recipes.group_calendars.push(GroupCalendar {
                    group_id,
                    group_name: meal.group_name.to_owned().unwrap_or_default(),
                    calendars: vec![meal.clone()],
                }),
            }
        }

        Ok(recipes)
    }

    async fn delete_meal(&self, meal_id: MealId) -> Result<()> {
        tracing::debug!(meal_id, "offline mode, delete ignored");

        Ok(())
    }
}
