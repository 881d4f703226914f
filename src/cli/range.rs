use std::io::Write;

use cookcal_api::CalendarBackend;
use cookcal_calendar::{CalendarRangeCache, CalendarSnapshot, EnsureOptions, EnsureOutcome};
use cookcal_shared::{CalendarMeal, DateRange, GroupMeals, GroupRef, MealsByDate};
use serde::Serialize;

use super::parse_range;

/// What `cookcal range --json` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    pub range: DateRange,
    pub outcome: String,
    pub personal_meals: MealsByDate,
    pub group_meals: GroupMeals,
    pub groups: Vec<GroupRef>,
}

impl RangeReport {
    pub fn new(range: DateRange, outcome: EnsureOutcome, snapshot: CalendarSnapshot) -> Self {
        let personal_meals = snapshot
            .personal_meals
            .into_iter()
            .filter(|(date, _)| range.contains(*date))
            .collect();

        let group_meals = snapshot
            .group_meals_by_group
            .into_iter()
            .map(|(group_id, dates)| {
                let dates = dates
                    .into_iter()
                    .filter(|(date, _)| range.contains(*date))
                    .collect::<MealsByDate>();
                (group_id, dates)
            })
            .filter(|(_, dates)| !dates.is_empty())
            .collect();

        Self {
            range,
            outcome: outcome.to_string(),
            personal_meals,
            group_meals,
            groups: snapshot.groups,
        }
    }
}

pub async fn load_range<B: CalendarBackend>(
    cache: &CalendarRangeCache<B>,
    start: &str,
    end: &str,
    force: bool,
) -> anyhow::Result<RangeReport> {
    let range = parse_range(start, end)?;
    let options = EnsureOptions {
        force,
        ..Default::default()
    };

    let outcome = cache.ensure_range(range, options).await;

    if let Some(err) = cache.error() {
        anyhow::bail!("failed to load {range}: {err}");
    }

    Ok(RangeReport::new(range, outcome, cache.snapshot()))
}

pub fn print_range(report: &RangeReport, json: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", report.range, report.outcome)?;
    write_days(&mut out, &report.personal_meals)?;

    for group in &report.groups {
        let Some(dates) = report.group_meals.get(&group.group_id) else {
            continue;
        };

        writeln!(out, "group {} {}", group.group_id, group.group_name)?;
        write_days(&mut out, dates)?;
    }

    Ok(())
}

fn write_days(out: &mut impl Write, days: &MealsByDate) -> std::io::Result<()> {
    for (date, meals) in days {
        writeln!(out, "  {date}")?;
        for meal in meals {
            writeln!(out, "    {}", describe(meal))?;
        }
    }

    Ok(())
}

fn describe(meal: &CalendarMeal) -> String {
    match meal.cooking_time {
        Some(minutes) => format!("#{} {} ({minutes} min)", meal.id, meal.recipe_title),
        None => format!("#{} {}", meal.id, meal.recipe_title),
    }
}
