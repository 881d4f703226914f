use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::MealDate;

pub type MealId = i64;
pub type GroupId = i64;
pub type RecipeId = i64;

/// Meals partitioned by scheduled day, each bucket ordered by `sort_order`.
pub type MealsByDate = BTreeMap<MealDate, Vec<CalendarMeal>>;

/// Group meals partitioned by group, then by day.
pub type GroupMeals = BTreeMap<GroupId, MealsByDate>;

/// One recipe scheduled on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMeal {
    pub id: MealId,
    pub scheduled_date: MealDate,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub recipe_id: RecipeId,
    #[serde(default)]
    pub recipe_title: String,
    #[serde(default)]
    pub main_img_url: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
    pub group_id: GroupId,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCalendar {
    pub group_id: GroupId,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub calendars: Vec<CalendarMeal>,
}


/// Payload of `GET /calendar/recipes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRecipes {
    #[serde(default)]
    pub personal_calendars: Vec<CalendarMeal>,
    #[serde(default)]
    pub group_calendars: Vec<GroupCalendar>,
}

impl CalendarRecipes {
    pub fn len(&self) -> usize {
        self.personal_calendars.len()
            + self
                .group_calendars
                .iter()
                .map(|group| group.calendars.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
