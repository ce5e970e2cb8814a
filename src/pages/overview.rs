use chrono::NaiveDate;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text};
use cosmic::Element;

use crate::components::item_card::item_card;
use crate::core::item::{Item, ItemKind};
use crate::fl;
use crate::message::{Message, PendingDelete, SortOrder};

pub fn overview_view<'a>(
    items: &[Item],
    today: NaiveDate,
    sort: SortOrder,
    filter: Option<ItemKind>,
    pending_delete: Option<PendingDelete>,
) -> Element<'a, Message> {
    let mut content = column().spacing(12);

    // Sort selector and kind filter
    let sort_names: Vec<String> = SortOrder::ALL.iter().map(|s| s.label().to_string()).collect();
    let sort_selected = SortOrder::ALL.iter().position(|s| *s == sort);

    let mut controls = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::caption(fl!("overview-sort")))
        .push(
            cosmic::widget::dropdown(sort_names, sort_selected, |sel| {
                Message::SetSortOrder(*SortOrder::ALL.get(sel).unwrap_or(&SortOrder::Priority))
            })
            .width(Length::Fixed(120.0)),
        );

    controls = controls.push(filter_button(fl!("overview-filter-all"), None, filter));
    for kind in ItemKind::ALL {
        controls = controls.push(filter_button(
            kind.label().to_string(),
            Some(*kind),
            filter,
        ));
    }
    content = content.push(controls);

    if items.is_empty() {
        content = content.push(
            container(text::body(fl!("overview-empty")))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    } else {
        for item in items {
            let confirm = pending_delete == Some(PendingDelete::Item(item.id));
            content = content.push(item_card(item, today, confirm));
        }
    }

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn filter_button<'a>(
    label: String,
    kind: Option<ItemKind>,
    current: Option<ItemKind>,
) -> Element<'a, Message> {
    if kind == current {
        button::suggested(label)
            .on_press(Message::SetKindFilter(kind))
            .into()
    } else {
        button::standard(label)
            .on_press(Message::SetKindFilter(kind))
            .into()
    }
}
