use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::Frequency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "goal")]
    Goal,
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "project")]
    Project,
}

impl ItemKind {
    pub const ALL: &'static [ItemKind] = &[Self::Goal, Self::Task, Self::Project];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Goal => "Goal",
            Self::Task => "Task",
            Self::Project => "Project",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckupStatus {
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "not-worked")]
    NotWorked,
}

impl CheckupStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::InProgress => "In progress",
            Self::NotWorked => "Missed",
        }
    }
}

/// A dated status record against an item. At most one exists per local
/// calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkup {
    pub date: DateTime<Utc>,
    pub status: CheckupStatus,
    pub notes: String,
}

/// A trackable goal, task, or project.
///
/// Field names mirror the backend `goals` table, which mixes camelCase and
/// snake_case columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub frequency: Frequency,
    #[serde(rename = "weeklyDays", default)]
    pub weekly_days: Vec<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub checkups: Vec<Checkup>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(title: impl Into<String>, kind: ItemKind, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            kind,
            frequency: Frequency::OneTime,
            weekly_days: Vec::new(),
            due_date: None,
            priority: 0,
            checkups: Vec::new(),
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Change the recurrence kind, clearing the weekday set when it no longer
    /// applies (weekly_days must be empty unless frequency = weekly).
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        if frequency != Frequency::Weekly {
            self.weekly_days.clear();
        }
    }

    /// The checkup recorded for `day`, if any.
    pub fn checkup_on(&self, day: NaiveDate) -> Option<&Checkup> {
        self.checkups.iter().find(|c| local_day(c.date) == day)
    }

    /// Record a checkup for the calendar day of `date`. A checkup already on
    /// that day is replaced in place; otherwise the new one is appended.
    pub fn record_checkup(&mut self, date: DateTime<Utc>, status: CheckupStatus, notes: &str) {
        let checkup = Checkup {
            date,
            status,
            notes: notes.trim().to_string(),
        };
        let day = local_day(date);
        match self.checkups.iter().position(|c| local_day(c.date) == day) {
            Some(idx) => self.checkups[idx] = checkup,
            None => self.checkups.push(checkup),
        }
    }

    /// Share of checkups marked done, as a 0–100 percentage.
    pub fn progress(&self) -> f32 {
        if self.checkups.is_empty() {
            return 0.0;
        }
        let done = self
            .checkups
            .iter()
            .filter(|c| c.status == CheckupStatus::Done)
            .count();
        (done as f32 / self.checkups.len() as f32) * 100.0
    }

    /// Whole days until the due date, or None without one. Negative once past.
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }

    /// Past its due date with nothing ever marked done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => {
                due < today
                    && !self
                        .checkups
                        .iter()
                        .any(|c| c.status == CheckupStatus::Done)
            }
            None => false,
        }
    }
}

/// Calendar day of `instant` where the user is. Checkups are keyed by local
/// days so a late-evening check-in stays on the day the user saw, not the
/// UTC day the instant happens to fall on.
fn local_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item() -> Item {
        Item::new("Learn piano", ItemKind::Goal, Uuid::new_v4())
    }

    // Instants built from local wall-clock times, so day-keying assertions
    // hold in whatever timezone the tests run in.
    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn record_checkup_appends_then_replaces() {
        let mut item = item();
        item.record_checkup(at(2024, 6, 10, 9), CheckupStatus::InProgress, "scales ");
        assert_eq!(item.checkups.len(), 1);
        assert_eq!(item.checkups[0].notes, "scales");

        // Same calendar day, later time: replaced in place, not appended
        item.record_checkup(at(2024, 6, 10, 21), CheckupStatus::Done, "nailed it");
        assert_eq!(item.checkups.len(), 1);
        assert_eq!(item.checkups[0].status, CheckupStatus::Done);
        assert_eq!(item.checkups[0].notes, "nailed it");

        // Different day appends
        item.record_checkup(at(2024, 6, 11, 9), CheckupStatus::NotWorked, "");
        assert_eq!(item.checkups.len(), 2);
    }

    #[test]
    fn checkups_key_on_local_days() {
        // 11:00 and 13:30 local can straddle a UTC day boundary (e.g. at
        // UTC+13 the morning instant is 22:00 UTC of the previous day); both
        // must still count as the same check-in day.
        let mut item = item();
        item.record_checkup(at(2024, 6, 10, 11), CheckupStatus::InProgress, "");
        let afternoon = Local
            .with_ymd_and_hms(2024, 6, 10, 13, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        item.record_checkup(afternoon, CheckupStatus::Done, "");

        assert_eq!(item.checkups.len(), 1);
        assert!(item
            .checkup_on(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
            .is_some());
        assert!(item
            .checkup_on(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap())
            .is_none());
    }

    #[test]
    fn progress_percentage() {
        let mut item = item();
        assert_eq!(item.progress(), 0.0);

        item.record_checkup(at(2024, 6, 10, 9), CheckupStatus::Done, "");
        item.record_checkup(at(2024, 6, 11, 9), CheckupStatus::NotWorked, "");
        assert_eq!(item.progress(), 50.0);
    }

    #[test]
    fn days_until_due() {
        let mut item = item();
        assert_eq!(item.days_until_due(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()), None);

        item.due_date = NaiveDate::from_ymd_opt(2024, 6, 10);
        assert_eq!(
            item.days_until_due(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()),
            Some(2)
        );
        assert_eq!(
            item.days_until_due(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()),
            Some(0)
        );
    }

    #[test]
    fn overdue_requires_no_done_checkup() {
        let mut item = item();
        item.due_date = NaiveDate::from_ymd_opt(2024, 6, 10);

        assert!(!item.is_overdue(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()));
        assert!(item.is_overdue(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()));

        item.record_checkup(at(2024, 6, 10, 9), CheckupStatus::Done, "shipped");
        assert!(!item.is_overdue(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()));
    }

    #[test]
    fn set_frequency_clears_weekdays() {
        let mut item = item();
        item.set_frequency(Frequency::Weekly);
        item.weekly_days = vec!["Monday".into(), "Friday".into()];

        item.set_frequency(Frequency::Daily);
        assert!(item.weekly_days.is_empty());
    }
}
