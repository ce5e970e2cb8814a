use chrono::{Datelike, Duration, NaiveDate};

use super::item::{Checkup, Item};
use super::recurrence::{item_applies_on, reminder_applies_on};
use super::reminder::Reminder;

/// Column headers for the month grid, Sunday first.
pub const MONTH_HEADERS: &[&str] = &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month layout: Sunday-first weeks of 7 cells, None for the leading and
/// trailing blanks of partial weeks.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<NaiveDate>; 7]> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return Vec::new(),
    };

    let mut weeks = Vec::new();
    let mut week: [Option<NaiveDate>; 7] = [None; 7];

    let mut date = first;
    loop {
        let column = date.weekday().num_days_from_sunday() as usize;
        week[column] = Some(date);

        let next = date + Duration::days(1);
        if column == 6 || next.month() != month {
            weeks.push(week);
            week = [None; 7];
        }
        if next.month() != month {
            break;
        }
        date = next;
    }

    weeks
}

/// Seven contiguous days starting at `start` (a Monday for week layouts).
pub fn week_days(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Items and reminders occurring on one visible day, with any checkup the
/// selected item already has recorded there.
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub items: Vec<&'a Item>,
    pub reminders: Vec<&'a Reminder>,
    pub checkup: Option<&'a Checkup>,
}

/// Annotate a day by scanning every item and reminder. Full O(items) per
/// cell; both collections are small and UI-scoped.
pub fn day_cell<'a>(
    date: NaiveDate,
    today: NaiveDate,
    items: &'a [Item],
    reminders: &'a [Reminder],
    selected: Option<&'a Item>,
) -> DayCell<'a> {
    let day_items = match selected {
        Some(item) => vec![item],
        None => items
            .iter()
            .filter(|i| item_applies_on(i, date, today))
            .collect(),
    };
    let day_reminders = reminders
        .iter()
        .filter(|r| reminder_applies_on(r, date, today))
        .collect();
    DayCell {
        date,
        items: day_items,
        reminders: day_reminders,
        checkup: selected.and_then(|i| i.checkup_on(date)),
    }
}

/// The single-day layout: checkups still owed vs. already recorded, plus the
/// day's reminders and holidays.
pub struct DayBreakdown<'a> {
    pub pending: Vec<&'a Item>,
    pub completed: Vec<(&'a Item, &'a Checkup)>,
    pub reminders: Vec<&'a Reminder>,
    pub holidays: Vec<&'static str>,
}

pub fn day_breakdown<'a>(
    date: NaiveDate,
    today: NaiveDate,
    items: &'a [Item],
    reminders: &'a [Reminder],
) -> DayBreakdown<'a> {
    let mut pending = Vec::new();
    let mut completed = Vec::new();
    for item in items {
        match item.checkup_on(date) {
            Some(checkup) => completed.push((item, checkup)),
            None => pending.push(item),
        }
    }

    DayBreakdown {
        pending,
        completed,
        reminders: reminders
            .iter()
            .filter(|r| reminder_applies_on(r, date, today))
            .collect(),
        holidays: holidays_on(date),
    }
}

/// Fixed-date holidays shown in the day view.
const HOLIDAYS: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (12, 25, "Christmas Day"),
];

pub fn holidays_on(date: NaiveDate) -> Vec<&'static str> {
    HOLIDAYS
        .iter()
        .filter(|(m, d, _)| date.month() == *m && date.day() == *d)
        .map(|(_, _, name)| *name)
        .collect()
}

/// Week start used by the week layout, same Monday anchor as the reminder
/// past-week cutoff.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    super::recurrence::week_start(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{CheckupStatus, ItemKind};
    use chrono::{Local, TimeZone, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_grid_shape_june_2024() {
        // June 2024 starts on a Saturday and ends on a Sunday
        let weeks = month_grid(2024, 6);
        assert_eq!(weeks.len(), 6);

        // First week: only the Saturday cell is filled
        assert!(weeks[0][..6].iter().all(|c| c.is_none()));
        assert_eq!(weeks[0][6], Some(date(2024, 6, 1)));

        // Last week: only the Sunday cell is filled
        assert_eq!(weeks[5][0], Some(date(2024, 6, 30)));
        assert!(weeks[5][1..].iter().all(|c| c.is_none()));

        // Every day of the month appears exactly once
        let count = weeks.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(count, 30);
    }

    #[test]
    fn month_grid_columns_match_weekdays() {
        let weeks = month_grid(2024, 6);
        for week in &weeks {
            for (col, cell) in week.iter().enumerate() {
                if let Some(d) = cell {
                    assert_eq!(d.weekday().num_days_from_sunday() as usize, col);
                }
            }
        }
    }

    #[test]
    fn week_days_are_contiguous() {
        let days = week_days(date(2024, 6, 10));
        assert_eq!(days[0], date(2024, 6, 10));
        assert_eq!(days[6], date(2024, 6, 16));
    }

    #[test]
    fn day_breakdown_splits_pending_and_completed() {
        let user = Uuid::new_v4();
        let mut done = Item::new("Piano", ItemKind::Goal, user);
        done.record_checkup(
            Local
                .with_ymd_and_hms(2024, 6, 10, 9, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
            CheckupStatus::Done,
            "practiced",
        );
        let waiting = Item::new("Spanish", ItemKind::Goal, user);

        let items = vec![done, waiting];
        let breakdown = day_breakdown(date(2024, 6, 10), date(2024, 6, 10), &items, &[]);

        assert_eq!(breakdown.pending.len(), 1);
        assert_eq!(breakdown.pending[0].title, "Spanish");
        assert_eq!(breakdown.completed.len(), 1);
        assert_eq!(breakdown.completed[0].0.title, "Piano");
        assert_eq!(breakdown.completed[0].1.notes, "practiced");
    }

    #[test]
    fn fixed_holidays() {
        assert_eq!(holidays_on(date(2024, 12, 25)), vec!["Christmas Day"]);
        assert!(holidays_on(date(2024, 6, 10)).is_empty());
    }
}
