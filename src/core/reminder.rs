use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::Frequency;

/// A standalone notification entity, independent of items.
///
/// Maps to the backend `reminders` table (snake_case columns throughout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub weekly_days: Vec<String>,
    /// Set only for one-time reminders; carries the time of day.
    pub reminder_date: Option<DateTime<Utc>>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Reminder {
    pub fn new(title: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            frequency: Frequency::OneTime,
            weekly_days: Vec::new(),
            reminder_date: None,
            user_id,
            created_at: Utc::now(),
            last_updated: None,
        }
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        if frequency != Frequency::Weekly {
            self.weekly_days.clear();
        }
        if frequency != Frequency::OneTime {
            self.reminder_date = None;
        }
    }

    /// "HH:MM" for one-time reminders, "All Day" otherwise.
    pub fn time_label(&self) -> String {
        match (self.frequency, self.reminder_date) {
            (Frequency::OneTime, Some(dt)) => dt.format("%H:%M").to_string(),
            _ => "All Day".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn set_frequency_clears_stale_fields() {
        let mut reminder = Reminder::new("Water plants", Uuid::new_v4());
        reminder.reminder_date = Some(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());

        // Leaving one-time drops the date
        reminder.set_frequency(Frequency::Weekly);
        assert_eq!(reminder.reminder_date, None);

        // Leaving weekly drops the weekday set
        reminder.weekly_days = vec!["Monday".into(), "Friday".into()];
        reminder.set_frequency(Frequency::Daily);
        assert!(reminder.weekly_days.is_empty());
        assert_eq!(reminder.reminder_date, None);
    }

    #[test]
    fn time_label_shows_clock_only_for_dated_reminders() {
        let mut reminder = Reminder::new("Dentist", Uuid::new_v4());
        assert_eq!(reminder.time_label(), "All Day");

        reminder.reminder_date = Some(Utc.with_ymd_and_hms(2024, 6, 10, 14, 30, 0).unwrap());
        assert_eq!(reminder.time_label(), "14:30");
    }
}
