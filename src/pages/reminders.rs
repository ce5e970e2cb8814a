use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, scrollable, text};
use cosmic::Element;

use crate::core::recurrence::Frequency;
use crate::core::reminder::Reminder;
use crate::fl;
use crate::message::{Message, PendingDelete};

pub fn reminders_view<'a>(
    reminders: &[Reminder],
    pending_delete: Option<PendingDelete>,
) -> Element<'a, Message> {
    let mut content = column().spacing(12);

    content = content.push(
        button::suggested(fl!("reminders-new")).on_press(Message::OpenReminderForm(None)),
    );

    if reminders.is_empty() {
        content = content.push(
            container(text::body(fl!("reminders-empty")))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    } else {
        for reminder in reminders {
            let mut details = column().spacing(2).push(text::body(reminder.title.clone()));
            if !reminder.description.is_empty() {
                details = details.push(text::caption(reminder.description.clone()));
            }
            details = details.push(text::caption(schedule_label(reminder)));

            // Second press on an armed row confirms the delete
            let delete: Element<'a, Message> =
                if pending_delete == Some(PendingDelete::Reminder(reminder.id)) {
                    button::destructive("Confirm")
                        .on_press(Message::DeleteReminder(reminder.id))
                        .into()
                } else {
                    button::icon(icon::from_name("edit-delete-symbolic"))
                        .on_press(Message::DeleteReminder(reminder.id))
                        .into()
                };

            content = content.push(
                row()
                    .spacing(8)
                    .align_y(Alignment::Center)
                    .push(text::caption(reminder.time_label()).width(Length::Fixed(80.0)))
                    .push(container(details).width(Length::Fill))
                    .push(
                        button::icon(icon::from_name("document-edit-symbolic"))
                            .on_press(Message::OpenReminderForm(Some(reminder.id))),
                    )
                    .push(delete),
            );
        }
    }

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn schedule_label(reminder: &Reminder) -> String {
    match reminder.frequency {
        Frequency::Daily => "Every day".to_string(),
        Frequency::Weekly => {
            if reminder.weekly_days.is_empty() {
                "Weekly".to_string()
            } else {
                format!("Weekly on {}", reminder.weekly_days.join(", "))
            }
        }
        Frequency::OneTime => match reminder.reminder_date {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => "No date set".to_string(),
        },
    }
}
