use iced::widget::{button, container, row, text, Space};
use iced::{Border, Element, Length, Padding, Theme};

use crate::app::{Message, Route};
use crate::core::model::{MediaServerRead, ServerTarget};
use crate::theme;

pub fn header_bar(
    servers: &[MediaServerRead],
    route: Route,
    loading: bool,
) -> Element<'static, Message> {
    let title = row![
        text("Server").size(20).color(theme::ACCENT),
        text("Deck").size(20).color(theme::TEXT_PRIMARY),
    ]
    .spacing(0);

    let enabled_count = servers.iter().filter(|s| s.enabled).count();
    let stats = if loading {
        row![text("Loading...").size(13).color(theme::TEXT_MUTED)]
    } else {
        row![
            text(format!("{} servers", servers.len()))
                .size(13)
                .color(theme::TEXT_SECONDARY),
            text(" · ").size(13).color(theme::TEXT_MUTED),
            text(format!("{enabled_count} enabled"))
                .size(13)
                .color(theme::TEXT_SECONDARY),
        ]
    }
    .spacing(0);

    let left = row![title, Space::new().width(16), stats].align_y(iced::Alignment::Center);

    let right = match route {
        Route::List => row![
            styled_button("Reload", Message::ReloadRequested),
            accent_button("+ Add Media Server", (!loading).then_some(Message::Navigate(
                Route::Edit(ServerTarget::New)
            ))),
        ],
        Route::Edit(_) => row![styled_button("Back to list", Message::CancelRequested)],
    }
    .spacing(8)
    .align_y(iced::Alignment::Center);

    container(
        row![left, Space::new().width(Length::Fill), right]
            .align_y(iced::Alignment::Center)
            .padding(Padding::from([12, 20])),
    )
    .width(Length::Fill)
    .style(|_: &Theme| container::Style {
        background: Some(theme::BG_SECONDARY.into()),
        border: Border {
            color: theme::BORDER,
            width: 0.0,
            radius: 0.0.into(),
        },
        ..Default::default()
    })
    .into()
}

fn accent_button(label: &str, msg: Option<Message>) -> Element<'static, Message> {
    let label = label.to_string();
    button(text(label).size(13).color(theme::TEXT_PRIMARY))
        .padding(Padding::from([6, 16]))
        .style(move |_, status| {
            let bg = match status {
                button::Status::Hovered => theme::ACCENT_HOVER,
                button::Status::Disabled => theme::ACCENT_DIM,
                _ => theme::ACCENT,
            };
            button::Style {
                background: Some(bg.into()),
                text_color: theme::TEXT_PRIMARY,
                border: Border::default().rounded(6),
                ..Default::default()
            }
        })
        .on_press_maybe(msg)
        .into()
}

fn styled_button(label: &str, msg: Message) -> Element<'static, Message> {
    let label = label.to_string();
    button(text(label).size(13).color(theme::TEXT_PRIMARY))
        .padding(Padding::from([6, 14]))
        .style(|_, status| {
            let bg = match status {
                button::Status::Hovered => theme::BG_HOVER,
                _ => theme::BG_TERTIARY,
            };
            button::Style {
                background: Some(bg.into()),
                text_color: theme::TEXT_PRIMARY,
                border: Border {
                    color: theme::BORDER,
                    width: 1.0,
                    radius: 6.0.into(),
                },
                ..Default::default()
            }
        })
        .on_press(msg)
        .into()
}
