use chrono::{Datelike, Duration, NaiveDate};
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, text};
use cosmic::Element;

use crate::core::calendar::{self, day_cell, month_grid, MONTH_HEADERS};
use crate::core::item::{CheckupStatus, Item};
use crate::core::reminder::Reminder;
use crate::message::{CalendarLayout, Message};

#[derive(Debug, Clone)]
pub struct CalendarState {
    pub layout: CalendarLayout,
    /// Date the current layout is anchored on.
    pub anchor: NaiveDate,
    pub selected_day: Option<NaiveDate>,
}

impl Default for CalendarState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            layout: CalendarLayout::Month,
            anchor: today,
            selected_day: Some(today),
        }
    }
}

impl CalendarState {
    pub fn prev(&mut self) {
        self.step(-1);
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    fn step(&mut self, direction: i64) {
        self.anchor = match self.layout {
            CalendarLayout::Month => {
                let first = first_of_month(self.anchor);
                let shifted = if direction < 0 {
                    first.checked_sub_months(chrono::Months::new(1))
                } else {
                    first.checked_add_months(chrono::Months::new(1))
                };
                shifted.unwrap_or(self.anchor)
            }
            CalendarLayout::Week => self.anchor + Duration::days(7 * direction),
            CalendarLayout::Day => self.anchor + Duration::days(direction),
        };
        self.selected_day = None;
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
        self.selected_day = Some(date);
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        if self.selected_day == Some(date) {
            self.selected_day = None;
        } else {
            self.selected_day = Some(date);
        }
    }

    /// Monday starting the displayed week.
    pub fn week_start(&self) -> NaiveDate {
        calendar::week_anchor(self.anchor)
    }

    pub fn title(&self) -> String {
        match self.layout {
            CalendarLayout::Month => self.anchor.format("%B %Y").to_string(),
            CalendarLayout::Week => {
                let start = self.week_start();
                let end = start + Duration::days(6);
                format!("{} – {}", start.format("%b %e"), end.format("%b %e, %Y"))
            }
            CalendarLayout::Day => self.anchor.format("%A, %B %e, %Y").to_string(),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Render the month grid with a detail panel for the selected day. When an
/// item is selected, day markers show its checkup status instead of general
/// activity.
pub fn month_calendar<'a>(
    state: &CalendarState,
    today: NaiveDate,
    items: &[Item],
    reminders: &[Reminder],
    selected_item: Option<&Item>,
) -> Element<'a, Message> {
    let mut day_labels = row().spacing(0);
    for label in MONTH_HEADERS {
        day_labels = day_labels.push(
            container(text::caption(*label).center())
                .width(Length::FillPortion(1))
                .center_x(Length::FillPortion(1)),
        );
    }

    let mut grid = column().spacing(2).push(day_labels);

    for week in month_grid(state.anchor.year(), state.anchor.month()) {
        let mut week_row = row().spacing(0);

        for cell in week {
            let element: Element<'a, Message> = match cell {
                None => container(text::body(" "))
                    .width(Length::FillPortion(1))
                    .center_x(Length::FillPortion(1))
                    .into(),
                Some(date) => {
                    let marker = day_marker(date, today, items, reminders, selected_item);
                    let label = format!("{}\n{}", date.day(), marker);

                    let txt = if date == today {
                        text::body(label).font(cosmic::iced::Font {
                            weight: cosmic::iced::font::Weight::Bold,
                            ..Default::default()
                        })
                    } else {
                        text::body(label)
                    };

                    let cell_content = container(txt.center()).center_x(Length::Fill);

                    let class = if state.selected_day == Some(date) {
                        cosmic::theme::Button::Suggested
                    } else {
                        cosmic::theme::Button::Text
                    };
                    button::custom(cell_content)
                        .class(class)
                        .on_press(Message::CalendarSelectDay(date))
                        .width(Length::FillPortion(1))
                        .into()
                }
            };
            week_row = week_row.push(element);
        }

        grid = grid.push(week_row);
    }

    let mut content = column()
        .spacing(8)
        .push(container(grid).width(Length::Fill).padding(8));

    if let Some(selected) = state.selected_day {
        for element in day_detail(selected, today, items, reminders, selected_item) {
            content = content.push(element);
        }
    }

    content.into()
}

fn day_marker(
    date: NaiveDate,
    today: NaiveDate,
    items: &[Item],
    reminders: &[Reminder],
    selected_item: Option<&Item>,
) -> char {
    if let Some(item) = selected_item {
        return match item.checkup_on(date).map(|c| c.status) {
            Some(CheckupStatus::Done) => '\u{25CF}',
            Some(CheckupStatus::InProgress) => '\u{25D0}',
            Some(CheckupStatus::NotWorked) => '\u{25CB}',
            None => ' ',
        };
    }

    let cell = day_cell(date, today, items, reminders, None);
    if cell.items.is_empty() && cell.reminders.is_empty() {
        ' '
    } else {
        '\u{00B7}'
    }
}

fn day_detail<'a>(
    date: NaiveDate,
    today: NaiveDate,
    items: &[Item],
    reminders: &[Reminder],
    selected_item: Option<&Item>,
) -> Vec<Element<'a, Message>> {
    let mut elements: Vec<Element<'a, Message>> = Vec::new();

    let header = if date == today {
        format!("Today, {}", date.format("%A %b %e"))
    } else {
        date.format("%A, %b %e").to_string()
    };
    elements.push(text::title4(header).into());

    let cell = day_cell(date, today, items, reminders, selected_item);

    for item in &cell.items {
        let status = item
            .checkup_on(date)
            .map(|c| c.status.label())
            .unwrap_or("Pending");
        elements.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::caption(status).width(Length::Fixed(100.0)))
                .push(text::body(item.title.clone()).width(Length::Fill))
                .push(
                    button::standard("Check In")
                        .on_press(Message::OpenCheckupForm(item.id, date)),
                )
                .into(),
        );
    }

    for reminder in &cell.reminders {
        elements.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::caption(reminder.time_label()).width(Length::Fixed(100.0)))
                .push(text::body(reminder.title.clone()).width(Length::Fill))
                .into(),
        );
    }

    for holiday in calendar::holidays_on(date) {
        elements.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::caption("Holiday").width(Length::Fixed(100.0)))
                .push(text::body(holiday).width(Length::Fill))
                .into(),
        );
    }

    if cell.items.is_empty() && cell.reminders.is_empty() {
        elements.push(text::caption(crate::fl!("calendar-no-entries")).into());
    }

    elements
}
