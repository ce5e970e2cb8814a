use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};
use cosmic::Element;

use crate::config::WaypointConfig;
use crate::core::session::SessionState;
use crate::fl;
use crate::message::Message;

const POLL_INTERVALS: &[u64] = &[15, 30, 60, 300];

pub fn settings_view<'a>(
    config: &'a WaypointConfig,
    session: &SessionState,
) -> Element<'a, Message> {
    let mut content = column().spacing(12);

    // --- Backend ---
    content = content.push(text::title4(fl!("settings-backend")));
    content = content.push(
        text_input::text_input(fl!("settings-backend-url"), &config.backend_url)
            .on_input(Message::SetBackendUrl)
            .width(Length::Fill),
    );
    content = content.push(
        text_input::secure_input(
            fl!("settings-anon-key"),
            config.anon_key.clone(),
            None::<Message>,
            true,
        )
        .on_input(Message::SetAnonKey)
        .width(Length::Fill),
    );

    let interval_names: Vec<String> = POLL_INTERVALS
        .iter()
        .map(|secs| format!("{} s", secs))
        .collect();
    let interval_selected = POLL_INTERVALS
        .iter()
        .position(|s| *s == config.poll_interval_secs);
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(fl!("settings-poll-interval")).width(Length::Fill))
            .push(
                cosmic::widget::dropdown(interval_names, interval_selected, |sel| {
                    Message::SetPollInterval(*POLL_INTERVALS.get(sel).unwrap_or(&30))
                })
                .width(Length::Fixed(100.0)),
            ),
    );

    // --- Appearance ---
    content = content.push(text::title4(fl!("settings-appearance")));
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(fl!("settings-dark-mode")).width(Length::Fill))
            .push(cosmic::widget::toggler(config.dark_mode).on_toggle(|_| Message::ToggleDarkMode)),
    );
    content = content.push(text::caption(fl!("settings-dark-mode-note")));

    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(fl!("settings-debug-logging")).width(Length::Fill))
            .push(
                cosmic::widget::toggler(config.debug_logging)
                    .on_toggle(|_| Message::ToggleDebugLogging),
            ),
    );

    // --- Account ---
    if let Some(user) = session.user() {
        content = content.push(text::title4(fl!("settings-account")));
        content = content.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::body(user.email.clone()).width(Length::Fill))
                .push(button::destructive(fl!("settings-sign-out")).on_press(Message::SignOut)),
        );
    }

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
