use chrono::NaiveDate;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, text};
use cosmic::Element;

use crate::core::item::{CheckupStatus, Item};
use crate::core::recurrence::Frequency;
use crate::message::Message;

/// Card for one tracked item: schedule line, progress, and quick check-in
/// buttons for today. `confirm_delete` swaps the delete icon for a
/// confirmation button awaiting the second press.
pub fn item_card<'a>(item: &Item, today: NaiveDate, confirm_delete: bool) -> Element<'a, Message> {
    let delete: Element<'a, Message> = if confirm_delete {
        button::destructive("Confirm")
            .on_press(Message::DeleteItem(item.id))
            .into()
    } else {
        button::icon(icon::from_name("edit-delete-symbolic"))
            .on_press(Message::DeleteItem(item.id))
            .into()
    };

    let header = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::title4(item.title.clone()).width(Length::Fill))
        .push(text::caption(item.kind.label()))
        .push(
            button::icon(icon::from_name("go-up-symbolic"))
                .on_press(Message::MoveItem(item.id, -1)),
        )
        .push(
            button::icon(icon::from_name("go-down-symbolic"))
                .on_press(Message::MoveItem(item.id, 1)),
        )
        .push(
            button::icon(icon::from_name("document-edit-symbolic"))
                .on_press(Message::OpenItemForm(Some(item.id))),
        )
        .push(delete);

    let mut content = column().spacing(4).push(header);

    if !item.description.is_empty() {
        content = content.push(text::caption(item.description.clone()));
    }

    content = content.push(text::caption(schedule_label(item, today)));

    if !item.checkups.is_empty() {
        let progress = item.progress();
        content = content.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::caption(progress_glyphs(progress)))
                .push(text::caption(format!("{:.0}%", progress))),
        );
    }

    let today_status = item.checkup_on(today).map(|c| c.status);
    let quick = row()
        .spacing(4)
        .push(status_button("Done", CheckupStatus::Done, today_status, item))
        .push(status_button(
            "In progress",
            CheckupStatus::InProgress,
            today_status,
            item,
        ))
        .push(status_button(
            "Missed",
            CheckupStatus::NotWorked,
            today_status,
            item,
        ))
        .push(
            button::standard("Notes…").on_press(Message::OpenCheckupForm(item.id, today)),
        );
    content = content.push(quick);

    container(content).padding(12).width(Length::Fill).into()
}

fn status_button<'a>(
    label: &'static str,
    status: CheckupStatus,
    current: Option<CheckupStatus>,
    item: &Item,
) -> Element<'a, Message> {
    if current == Some(status) {
        button::suggested(label)
            .on_press(Message::QuickCheckup(item.id, status))
            .into()
    } else {
        button::standard(label)
            .on_press(Message::QuickCheckup(item.id, status))
            .into()
    }
}

/// 10-slot filled/empty dot bar for a 0-100 percentage.
pub fn progress_glyphs(progress: f32) -> String {
    let filled = ((progress / 10.0).round() as usize).min(10);
    let mut bar = String::new();
    for i in 0..10 {
        bar.push(if i < filled { '\u{25CF}' } else { '\u{25CB}' });
    }
    bar
}

pub fn schedule_label(item: &Item, today: NaiveDate) -> String {
    match item.frequency {
        Frequency::Daily => "Every day".to_string(),
        Frequency::Weekly => {
            if item.weekly_days.is_empty() {
                "Weekly".to_string()
            } else {
                format!("Weekly on {}", item.weekly_days.join(", "))
            }
        }
        Frequency::OneTime => match item.days_until_due(today) {
            None => "No due date".to_string(),
            Some(0) => "Due today".to_string(),
            Some(1) => "Due tomorrow".to_string(),
            Some(n) if n > 0 => format!("Due in {} days", n),
            Some(n) => {
                if item.is_overdue(today) {
                    format!("Overdue by {} days", -n)
                } else {
                    "Completed".to_string()
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::ItemKind;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn glyph_bar_rounds_to_ten_slots() {
        assert_eq!(progress_glyphs(0.0), "○○○○○○○○○○");
        assert_eq!(progress_glyphs(50.0), "●●●●●○○○○○");
        assert_eq!(progress_glyphs(100.0), "●●●●●●●●●●");
    }

    #[test]
    fn schedule_labels() {
        let mut item = Item::new("Taxes", ItemKind::Task, Uuid::new_v4());
        assert_eq!(schedule_label(&item, date(2024, 6, 10)), "No due date");

        item.due_date = Some(date(2024, 6, 11));
        assert_eq!(schedule_label(&item, date(2024, 6, 10)), "Due tomorrow");
        assert_eq!(schedule_label(&item, date(2024, 6, 13)), "Overdue by 2 days");

        item.set_frequency(Frequency::Weekly);
        item.weekly_days = vec!["Monday".into()];
        assert_eq!(
            schedule_label(&item, date(2024, 6, 10)),
            "Weekly on Monday"
        );
    }
}
