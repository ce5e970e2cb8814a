use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::item::Item;
use super::reminder::Reminder;

/// How often an item or reminder occurs.
///
/// - one-time: occurs on the entity's own date only
/// - daily: occurs on the current day only (not projected forward)
/// - weekly: occurs on a fixed set of weekdays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "one-time")]
    OneTime,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
}

impl Frequency {
    pub const ALL: &'static [Frequency] = &[Self::OneTime, Self::Daily, Self::Weekly];

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneTime => "One-time",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OneTime => "one-time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        };
        write!(f, "{}", s)
    }
}

/// Full weekday names as stored in the `weeklyDays`/`weekly_days` columns.
pub const WEEKDAY_NAMES: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Whether `item` occurs on `date`.
///
/// Daily items surface only on the current day; weekly items match purely on
/// weekday membership. All comparisons are calendar-day comparisons.
pub fn item_applies_on(item: &Item, date: NaiveDate, today: NaiveDate) -> bool {
    match item.frequency {
        Frequency::OneTime => item.due_date == Some(date),
        Frequency::Daily => date == today,
        Frequency::Weekly => item
            .weekly_days
            .iter()
            .any(|d| d == weekday_name(date.weekday())),
    }
}

/// Whether `reminder` occurs on `date`.
///
/// Weekly reminders are never projected into the past: days before the start
/// of the current week never match.
pub fn reminder_applies_on(reminder: &Reminder, date: NaiveDate, today: NaiveDate) -> bool {
    match reminder.frequency {
        Frequency::OneTime => reminder
            .reminder_date
            .is_some_and(|dt| dt.date_naive() == date),
        Frequency::Daily => date == today,
        Frequency::Weekly => {
            if date < week_start(today) {
                return false;
            }
            reminder
                .weekly_days
                .iter()
                .any(|d| d == weekday_name(date.weekday()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_item(days: &[&str]) -> Item {
        let mut item = Item::new("Gym", crate::core::item::ItemKind::Goal, Uuid::new_v4());
        item.frequency = Frequency::Weekly;
        item.weekly_days = days.iter().map(|d| d.to_string()).collect();
        item
    }

    #[test]
    fn one_time_matches_due_day_only() {
        let mut item = Item::new("Taxes", crate::core::item::ItemKind::Task, Uuid::new_v4());
        item.due_date = Some(date(2024, 6, 10));
        let today = date(2024, 6, 8);

        assert!(item_applies_on(&item, date(2024, 6, 10), today));
        assert!(!item_applies_on(&item, date(2024, 6, 9), today));
        assert!(!item_applies_on(&item, date(2024, 6, 11), today));
    }

    #[test]
    fn one_time_without_due_date_never_applies() {
        let item = Item::new("Someday", crate::core::item::ItemKind::Goal, Uuid::new_v4());
        assert!(!item_applies_on(&item, date(2024, 6, 10), date(2024, 6, 10)));
    }

    #[test]
    fn daily_applies_only_today() {
        let mut item = Item::new("Stretch", crate::core::item::ItemKind::Goal, Uuid::new_v4());
        item.frequency = Frequency::Daily;
        let today = date(2024, 6, 10);

        assert!(item_applies_on(&item, today, today));
        assert!(!item_applies_on(&item, date(2024, 6, 9), today));
        assert!(!item_applies_on(&item, date(2024, 6, 11), today));
    }

    #[test]
    fn weekly_matches_weekday_membership() {
        let item = weekly_item(&["Monday", "Thursday"]);
        let today = date(2024, 6, 12); // a Wednesday

        // 2024-06-10 is a Monday, 2024-06-13 a Thursday
        assert!(item_applies_on(&item, date(2024, 6, 10), today));
        assert!(item_applies_on(&item, date(2024, 6, 13), today));
        assert!(!item_applies_on(&item, date(2024, 6, 12), today));
        // Items are not past-week limited; last Monday still matches
        assert!(item_applies_on(&item, date(2024, 6, 3), today));
    }

    #[test]
    fn weekly_reminder_excludes_past_weeks() {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            title: "Standup".into(),
            description: String::new(),
            frequency: Frequency::Weekly,
            weekly_days: vec!["Monday".into()],
            reminder_date: None,
            user_id: Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            last_updated: None,
        };
        let today = date(2024, 6, 12); // Wednesday; week starts Monday 06-10

        // Sunday one week in the past
        assert!(!reminder_applies_on(&reminder, date(2024, 6, 2), today));
        // Last week's Monday is also excluded
        assert!(!reminder_applies_on(&reminder, date(2024, 6, 3), today));
        // This week's Monday and next Monday both apply
        assert!(reminder_applies_on(&reminder, date(2024, 6, 10), today));
        assert!(reminder_applies_on(&reminder, date(2024, 6, 17), today));
        // Weekday mismatch within the window
        assert!(!reminder_applies_on(&reminder, date(2024, 6, 11), today));
    }

    #[test]
    fn one_time_reminder_matches_calendar_day() {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            title: "Dentist".into(),
            description: String::new(),
            frequency: Frequency::OneTime,
            weekly_days: Vec::new(),
            reminder_date: Some(Utc.with_ymd_and_hms(2024, 6, 10, 14, 30, 0).unwrap()),
            user_id: Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            last_updated: None,
        };
        let today = date(2024, 6, 8);

        assert!(reminder_applies_on(&reminder, date(2024, 6, 10), today));
        assert!(!reminder_applies_on(&reminder, date(2024, 6, 9), today));
    }

    #[test]
    fn week_start_is_monday() {
        // 2024-06-12 is a Wednesday
        assert_eq!(week_start(date(2024, 6, 12)), date(2024, 6, 10));
        assert_eq!(week_start(date(2024, 6, 10)), date(2024, 6, 10));
        assert_eq!(week_start(date(2024, 6, 16)), date(2024, 6, 10));
    }
}
