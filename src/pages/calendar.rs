use chrono::{Datelike, NaiveDate};
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, scrollable, text};
use cosmic::Element;

use crate::components::month_calendar::{month_calendar, CalendarState};
use crate::core::calendar::{day_breakdown, holidays_on, week_days};
use crate::core::item::Item;
use crate::core::reminder::Reminder;
use crate::core::recurrence::item_applies_on;
use crate::fl;
use crate::message::{CalendarLayout, Message};

pub fn calendar_view<'a>(
    state: &CalendarState,
    today: NaiveDate,
    items: &[Item],
    reminders: &[Reminder],
    selected_item: Option<&Item>,
) -> Element<'a, Message> {
    let mut layout_row = row().spacing(4);
    for layout in CalendarLayout::ALL {
        let btn = if state.layout == *layout {
            button::suggested(layout.label())
        } else {
            button::standard(layout.label())
        };
        layout_row = layout_row.push(btn.on_press(Message::SetCalendarLayout(*layout)));
    }
    layout_row = layout_row.push(
        button::standard(fl!("calendar-today")).on_press(Message::CalendarToday),
    );

    let header = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(
            button::icon(icon::from_name("go-previous-symbolic"))
                .on_press(Message::CalendarPrev),
        )
        .push(text::title4(state.title()).width(Length::Fill).center())
        .push(
            button::icon(icon::from_name("go-next-symbolic")).on_press(Message::CalendarNext),
        );

    let mut content = column()
        .spacing(12)
        .push(layout_row)
        .push(item_picker(items, selected_item))
        .push(header);

    content = match state.layout {
        CalendarLayout::Month => content.push(month_calendar(
            state,
            today,
            items,
            reminders,
            selected_item,
        )),
        CalendarLayout::Week => {
            let mut week = content.push(week_view(state, today, items, reminders));
            if let Some(selected) = state.selected_day {
                week = week.push(day_breakdown_view(selected, today, items, reminders));
            }
            week
        }
        CalendarLayout::Day => {
            content.push(day_breakdown_view(state.anchor, today, items, reminders))
        }
    };

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Focus the calendar on a single item, or all of them.
fn item_picker<'a>(items: &[Item], selected: Option<&Item>) -> Element<'a, Message> {
    let mut names = vec!["All items".to_string()];
    names.extend(items.iter().map(|i| i.title.clone()));
    let selected_idx = selected
        .and_then(|s| items.iter().position(|i| i.id == s.id))
        .map(|p| p + 1)
        .or(Some(0));

    let ids: Vec<_> = items.iter().map(|i| i.id).collect();
    cosmic::widget::dropdown(names, selected_idx, move |sel| {
        if sel == 0 {
            Message::SelectItem(None)
        } else {
            Message::SelectItem(ids.get(sel - 1).copied())
        }
    })
    .width(Length::Fixed(200.0))
    .into()
}

fn week_view<'a>(
    state: &CalendarState,
    today: NaiveDate,
    items: &[Item],
    reminders: &[Reminder],
) -> Element<'a, Message> {
    let mut columns = row().spacing(4);

    for date in week_days(state.week_start()) {
        let day_label = format!("{} {}", date.format("%a"), date.day());
        let header: Element<'a, Message> = if date == today {
            button::suggested(day_label)
                .on_press(Message::CalendarSelectDay(date))
                .into()
        } else {
            button::standard(day_label)
                .on_press(Message::CalendarSelectDay(date))
                .into()
        };

        let mut day_column = column().spacing(4).push(header);

        for item in items.iter().filter(|i| item_applies_on(i, date, today)) {
            let prefix = item
                .checkup_on(date)
                .map(|c| match c.status {
                    crate::core::item::CheckupStatus::Done => "\u{25CF} ",
                    crate::core::item::CheckupStatus::InProgress => "\u{25D0} ",
                    crate::core::item::CheckupStatus::NotWorked => "\u{25CB} ",
                })
                .unwrap_or("");
            day_column = day_column.push(text::caption(format!("{}{}", prefix, item.title)));
        }

        for reminder in reminders
            .iter()
            .filter(|r| crate::core::recurrence::reminder_applies_on(r, date, today))
        {
            day_column = day_column.push(text::caption(format!("\u{23F0} {}", reminder.title)));
        }

        columns = columns.push(
            container(day_column)
                .width(Length::FillPortion(1))
                .padding(4),
        );
    }

    columns.into()
}

fn day_breakdown_view<'a>(
    date: NaiveDate,
    today: NaiveDate,
    items: &[Item],
    reminders: &[Reminder],
) -> Element<'a, Message> {
    // Only items occurring on this day enter the pending/completed split
    let day_items: Vec<Item> = items
        .iter()
        .filter(|i| item_applies_on(i, date, today) || i.checkup_on(date).is_some())
        .cloned()
        .collect();
    let breakdown = day_breakdown(date, today, &day_items, reminders);

    let mut content = column().spacing(8);

    for holiday in holidays_on(date) {
        content = content.push(text::body(format!("\u{1F389} {}", holiday)));
    }

    if !breakdown.pending.is_empty() {
        content = content.push(text::title4(fl!("calendar-pending")));
        for item in &breakdown.pending {
            content = content.push(
                row()
                    .spacing(8)
                    .align_y(Alignment::Center)
                    .push(text::body(item.title.clone()).width(Length::Fill))
                    .push(
                        button::standard(fl!("form-checkup"))
                            .on_press(Message::OpenCheckupForm(item.id, date)),
                    ),
            );
        }
    }

    if !breakdown.completed.is_empty() {
        content = content.push(text::title4(fl!("calendar-completed")));
        for (item, checkup) in &breakdown.completed {
            let mut line = row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::caption(checkup.status.label()).width(Length::Fixed(100.0)))
                .push(text::body(item.title.clone()).width(Length::Fill))
                .push(
                    button::standard(fl!("form-checkup"))
                        .on_press(Message::OpenCheckupForm(item.id, date)),
                );
            if !checkup.notes.is_empty() {
                line = line.push(text::caption(checkup.notes.clone()));
            }
            content = content.push(line);
        }
    }

    if !breakdown.reminders.is_empty() {
        content = content.push(text::title4(fl!("calendar-reminders")));
        for reminder in &breakdown.reminders {
            content = content.push(
                row()
                    .spacing(8)
                    .align_y(Alignment::Center)
                    .push(text::caption(reminder.time_label()).width(Length::Fixed(100.0)))
                    .push(text::body(reminder.title.clone()).width(Length::Fill)),
            );
        }
    }

    if breakdown.pending.is_empty()
        && breakdown.completed.is_empty()
        && breakdown.reminders.is_empty()
    {
        content = content.push(text::caption(fl!("calendar-no-entries")));
    }

    container(content).padding(8).width(Length::Fill).into()
}
