use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use cookcal_api::CalendarBackend;
use cookcal_shared::{
    CalendarMeal, CalendarRecipes, DateRange, Error, GroupCalendar, MealDate, MealId, Result,
};
use tokio::sync::oneshot;

pub fn day(value: &str) -> MealDate {
    MealDate::parse(value).unwrap()
}

pub fn range(start: &str, end: &str) -> DateRange {
    DateRange::parse(start, end).unwrap()
}

pub fn meal(id: MealId, date: &str, sort_order: i32) -> CalendarMeal {
    CalendarMeal {
        id,
        scheduled_date: day(date),
        sort_order,
        recipe_id: id * 100,
        recipe_title: format!("recipe {id}"),
        main_img_url: None,
        cooking_time: Some(20),
        group_id: None,
        group_name: None,
    }
}

#[allow(dead_code)]
pub fn group_meal(id: MealId, date: &str, sort_order: i32, group_id: i64) -> CalendarMeal {
    CalendarMeal {
        group_id: Some(group_id),
        group_name: Some(format!("group {group_id}")),
        ..meal(id, date, sort_order)
    }
}

#[allow(dead_code)]
pub fn personal(meals: Vec<CalendarMeal>) -> CalendarRecipes {
    CalendarRecipes {
        personal_calendars: meals,
        group_calendars: vec![],
    }
}

#[allow(dead_code)]
pub fn with_group(
    mut recipes: CalendarRecipes,
    group_id: i64,
    meals: Vec<CalendarMeal>,
) -> CalendarRecipes {
    recipes.group_calendars.push(GroupCalendar {
        group_id,
        group_name: format!("group {group_id}"),
        calendars: meals,
    });
    recipes
}

#[allow(dead_code)]
pub fn ids(meals: &[CalendarMeal]) -> Vec<MealId> {
    meals.iter().map(|meal| meal.id).collect()
}

/// Answers fetches from a queue of canned responses, in order.
#[allow(dead_code)]
#[derive(Default)]
pub struct QueueBackend {
    responses: Mutex<Vec<Result<CalendarRecipes>>>,
    requested: Mutex<Vec<DateRange>>,
    deleted: Mutex<Vec<MealId>>,
}

#[allow(dead_code)]
impl QueueBackend {
    pub fn new(responses: Vec<Result<CalendarRecipes>>) -> Self {
        let mut responses = responses;
        responses.reverse();

        Self {
            responses: Mutex::new(responses),
            ..Default::default()
        }
    }

    pub fn requested(&self) -> Vec<DateRange> {
        self.requested.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<MealId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarBackend for QueueBackend {
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes> {
        self.requested.lock().unwrap().push(*range);

        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(CalendarRecipes::default()))
    }

    async fn delete_meal(&self, meal_id: MealId) -> Result<()> {
        self.deleted.lock().unwrap().push(meal_id);

        Ok(())
    }
}

/// Holds each fetch until the test releases it, keyed by range start.
#[allow(dead_code)]
#[derive(Default)]
pub struct GatedBackend {
    gates: Mutex<HashMap<MealDate, oneshot::Receiver<Result<CalendarRecipes>>>>,
    fetches: AtomicUsize,
}

#[allow(dead_code)]
impl GatedBackend {
    pub fn gate(&self, start: &str) -> oneshot::Sender<Result<CalendarRecipes>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(day(start), rx);
        tx
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarBackend for GatedBackend {
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let gate = self
            .gates
            .lock()
            .unwrap()
            .remove(&range.start())
            .ok_or_else(|| Error::Unknown(anyhow::anyhow!("no gate for {range}")))?;

        gate.await
            .map_err(|err| Error::Unknown(anyhow::anyhow!("gate dropped: {err}")))?
    }

    async fn delete_meal(&self, _meal_id: MealId) -> Result<()> {
        Ok(())
    }
}
