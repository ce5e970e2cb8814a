use std::sync::LazyLock;

use cosmic::iced::Length;
use cosmic::widget::{button, column, container, row, text, text_input};
use cosmic::Element;
use regex::Regex;

use crate::fl;
use crate::message::Message;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn sign_in_view<'a>(
    email: &'a str,
    password: &'a str,
    error: Option<&str>,
    notice: Option<&str>,
    busy: bool,
    configured: bool,
) -> Element<'a, Message> {
    let mut form = column()
        .spacing(12)
        .width(Length::Fixed(360.0))
        .push(text::title3(fl!("sign-in-title")));

    if !configured {
        form = form.push(text::body(fl!("sign-in-not-configured")));
    }

    form = form.push(
        text_input::text_input(fl!("sign-in-email"), email)
            .on_input(Message::EmailInput)
            .width(Length::Fill),
    );
    form = form.push(
        text_input::secure_input(
            fl!("sign-in-password"),
            password.to_string(),
            None::<Message>,
            true,
        )
        .on_input(Message::PasswordInput)
        .on_submit(|_| Message::SubmitSignIn)
        .width(Length::Fill),
    );

    if let Some(error) = error {
        form = form.push(text::body(format!("\u{2717} {}", error)));
    }
    if let Some(notice) = notice {
        form = form.push(text::body(notice.to_string()));
    }

    let submittable = !busy && configured && valid_email(email) && !password.is_empty();

    let mut sign_in = button::suggested(fl!("sign-in-button"));
    let mut sign_up = button::standard(fl!("sign-up-button"));
    if submittable {
        sign_in = sign_in.on_press(Message::SubmitSignIn);
        sign_up = sign_up.on_press(Message::SubmitSignUp);
    }

    form = form.push(row().spacing(8).push(sign_in).push(sign_up));

    container(form)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(valid_email("ada@example.com"));
        assert!(!valid_email("ada@example"));
        assert!(!valid_email("not an email"));
        assert!(!valid_email(""));
    }
}
