use cookcal_api::CalendarBackend;
use cookcal_calendar::CalendarRangeCache;
use cookcal_shared::MealId;

pub async fn delete_meal<B: CalendarBackend>(
    cache: &CalendarRangeCache<B>,
    meal_id: MealId,
) -> anyhow::Result<()> {
    cache
        .delete_meal(meal_id)
        .await
        .map_err(|e| anyhow::anyhow!("failed to delete meal {meal_id}: {e}"))?;

    tracing::info!("meal {meal_id} deleted");

    Ok(())
}
