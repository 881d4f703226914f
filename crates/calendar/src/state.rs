use cookcal_shared::{DateRange, GroupMeals, GroupRef, MealsByDate};

use crate::GroupedMeals;

#[derive(Debug, Clone, Default)]
pub(crate) struct CachedState {
    pub personal_meals: MealsByDate,
    pub group_meals: GroupMeals,
    pub groups: Vec<GroupRef>,
}

impl CachedState {
    pub fn replace(&mut self, fresh: GroupedMeals) {
        self.personal_meals = fresh.personal;
        self.group_meals = fresh.groups;
        self.groups = fresh.group_refs;
    }

    /// Days inside `range` are owned by `fresh`: an in-range day missing from
    /// it is confirmed empty and dropped. Days outside `range` are kept.
    pub fn merge(&mut self, fresh: GroupedMeals, range: &DateRange) {
        merge_days(&mut self.personal_meals, fresh.personal, range);

        for dates in self.group_meals.values_mut() {
            dates.retain(|date, _| !range.contains(*date));
        }

        for (group_id, dates) in fresh.groups {
            self.group_meals.entry(group_id).or_default().extend(dates);
        }

        for group in fresh.group_refs {
            match self.groups.iter_mut().find(|g| g.group_id == group.group_id) {
                Some(existing) => {
                    if !group.group_name.is_empty() {
                        existing.group_name = group.group_name;
                    }
                }
                None => self.groups.push(group),
            }
        }
    }
}

fn merge_days(target: &mut MealsByDate, fresh: MealsByDate, range: &DateRange) {
    target.retain(|date, _| !range.contains(*date));
    target.extend(fresh);
}
