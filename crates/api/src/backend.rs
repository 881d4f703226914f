use std::sync::Arc;

use async_trait::async_trait;
use cookcal_shared::{CalendarRecipes, DateRange, MealId, Result};

/// Source of calendar meals, reached over HTTP in production and served from
/// fixtures in offline mode.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Every meal scheduled inside `range`, bounds inclusive.
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes>;

    async fn delete_meal(&self, meal_id: MealId) -> Result<()>;
}

#[async_trait]
impl<T: CalendarBackend + ?Sized> CalendarBackend for Arc<T> {
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes> {
        (**self).fetch_range(range).await
    }

    async fn delete_meal(&self, meal_id: MealId) -> Result<()> {
        (**self).delete_meal(meal_id).await
    }
}

#[async_trait]
impl<T: CalendarBackend + ?Sized> CalendarBackend for Box<T> {
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes> {
        (**self).fetch_range(range).await
    }

    async fn delete_meal(&self, meal_id: MealId) -> Result<()> {
        (**self).delete_meal(meal_id).await
    }
}
