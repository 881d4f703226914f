use cookcal_shared::{CalendarMeal, CalendarRecipes, GroupId, GroupMeals, GroupRef, MealsByDate};

/// A fetch result partitioned the way the calendar renders it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedMeals {
    pub personal: MealsByDate,
    pub groups: GroupMeals,
    pub group_refs: Vec<GroupRef>,
}

impl GroupedMeals {
    fn register_group(&mut self, group_id: GroupId, group_name: Option<&str>) {
        self.groups.entry(group_id).or_default();

        match self.group_refs.iter_mut().find(|g| g.group_id == group_id) {
            Some(existing) => {
                if existing.group_name.is_empty() {
                    existing.group_name = group_name.unwrap_or_default().to_owned();
                }
            }
            None => self.group_refs.push(GroupRef {
                group_id,
                group_name: group_name.unwrap_or_default().to_owned(),
            }),
        }
    }

    fn push_group_meal(&mut self, group_id: GroupId, meal: CalendarMeal) {
        self.groups
            .entry(group_id)
            .or_default()
            .entry(meal.scheduled_date)
            .or_default()
            .push(meal);
    }

    pub fn meal_count(&self) -> usize {
        let personal: usize = self.personal.values().map(Vec::len).sum();
        let groups: usize = self
            .groups
            .values()
            .flat_map(|dates| dates.values())
            .map(Vec::len)
            .sum();

        personal + groups
    }
}

/// Buckets personal meals by day and group meals by group then day, each
/// bucket stably sorted by `sort_order`.
///
/// A meal carrying a `group_id` never lands in the personal buckets, even
/// when the backend lists it with the personal calendars.
pub fn group_recipes(recipes: CalendarRecipes) -> GroupedMeals {
    let mut grouped = GroupedMeals::default();

    for group in recipes.group_calendars {
        grouped.register_group(group.group_id, Some(&group.group_name));

        for mut meal in group.calendars {
            meal.group_id.get_or_insert(group.group_id);
            if meal.group_name.is_none() {
                meal.group_name = Some(group.group_name.to_owned());
            }

            grouped.push_group_meal(group.group_id, meal);
        }
    }

    for meal in recipes.personal_calendars {
        match meal.group_id {
            Some(group_id) => {
                grouped.register_group(group_id, meal.group_name.as_deref());
                grouped.push_group_meal(group_id, meal);
            }
            None => grouped
                .personal
                .entry(meal.scheduled_date)
                .or_default()
                .push(meal),
        }
    }

    for bucket in grouped.personal.values_mut() {
        bucket.sort_by_key(|meal| meal.sort_order);
    }

    for bucket in grouped.groups.values_mut().flat_map(|dates| dates.values_mut()) {
        bucket.sort_by_key(|meal| meal.sort_order);
    }

    grouped
}
