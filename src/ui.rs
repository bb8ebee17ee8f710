//! Widget tree for the main window and the login dialog

use iced::widget::{button, column, container, row, scrollable, text, text_input, Space};
use iced::{Alignment, Element, Length};

use hstray_core::locale::{Lang, TextKey};
use hstray_core::vpn::ConnectionState;

use crate::app::{Banner, HstrayApp, LoginForm, Message};

pub fn view(app: &HstrayApp) -> Element<'_, Message> {
    let content = match &app.login {
        Some(form) => login_view(app, form),
        None => main_view(app),
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
        .into()
}

fn main_view(app: &HstrayApp) -> Element<'_, Message> {
    let t = |key| app.lang.text(key);

    let status_value = match app.state {
        ConnectionState::Connected => text(t(TextKey::Connected)).style(text::success),
        ConnectionState::Connecting => text(t(TextKey::Connecting)),
        ConnectionState::Disconnecting => text(t(TextKey::Disconnecting)),
        ConnectionState::Error => text(t(TextKey::ConnectionError)).style(text::danger),
        ConnectionState::Disconnected if app.checked => {
            text(t(TextKey::NotConnected)).style(text::danger)
        }
        ConnectionState::Disconnected => text(t(TextKey::CheckingConnection)),
    };
    let status_line = row![text(format!("{}:", t(TextKey::Status))), status_value].spacing(8);

    let actions = row![
        button(text(t(TextKey::Connect)))
            .on_press_maybe((!app.busy).then_some(Message::ConnectPressed)),
        button(text(t(TextKey::Disconnect)))
            .style(button::secondary)
            .on_press_maybe((!app.busy).then_some(Message::DisconnectPressed)),
    ]
    .spacing(10);

    let mut list = column![].spacing(4);
    for location in &app.locations {
        let entry: Element<'_, Message> = if location.is_placeholder() {
            text(t(TextKey::NotAvailable)).into()
        } else {
            button(text(location.name().to_string()))
                .style(button::text)
                .on_press_maybe(
                    (!app.busy).then_some(Message::LocationPicked(location.code().to_string())),
                )
                .into()
        };
        list = list.push(entry);
    }

    let other_lang = match app.lang {
        Lang::Tr => "EN",
        Lang::En => "TR",
    };
    let footer = row![
        button(text(t(TextKey::Login)))
            .style(button::text)
            .on_press(Message::LoginPressed),
        button(text(t(TextKey::Logout)))
            .style(button::text)
            .on_press_maybe((!app.busy).then_some(Message::LogoutPressed)),
        Space::with_width(Length::Fill),
        button(text(other_lang))
            .style(button::text)
            .on_press(Message::LanguageToggled),
        button(text(t(TextKey::Quit)))
            .style(button::danger)
            .on_press(Message::QuitRequested),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut content = column![text(t(TextKey::WindowTitle)).size(24), status_line].spacing(16);
    if let Some(banner) = &app.banner {
        content = content.push(banner_view(app, banner));
    }
    content
        .push(actions)
        .push(text(t(TextKey::Locations)).size(18))
        .push(scrollable(list).height(Length::Fill))
        .push(footer)
        .into()
}

fn login_view<'a>(app: &'a HstrayApp, form: &'a LoginForm) -> Element<'a, Message> {
    let t = |key| app.lang.text(key);

    let mut content = column![
        text(t(TextKey::Login)).size(24),
        text_input(t(TextKey::Username), &form.username)
            .on_input(Message::LoginUsernameChanged)
            .padding(8),
        text_input(t(TextKey::Password), &form.password)
            .secure(true)
            .on_input(Message::LoginPasswordChanged)
            .on_submit(Message::LoginSubmitted)
            .padding(8),
    ]
    .spacing(12);

    if let Some(banner) = &app.banner {
        content = content.push(banner_view(app, banner));
    }

    content
        .push(
            row![
                button(text(t(TextKey::LoginButton)))
                    .on_press_maybe((!app.busy).then_some(Message::LoginSubmitted)),
                button(text(t(TextKey::Cancel)))
                    .style(button::secondary)
                    .on_press(Message::LoginCancelled),
            ]
            .spacing(10),
        )
        .into()
}

fn banner_view<'a>(app: &HstrayApp, banner: &Banner) -> Element<'a, Message> {
    column![
        text(app.lang.text(banner.title)).style(text::danger),
        text(app.lang.text(banner.body)).size(13),
    ]
    .spacing(4)
    .into()
}
