use iced::widget::{container, text};
use iced::{Border, Element, Padding, Theme};

use crate::app::Message;
use crate::core::model::MediaServerType;
use crate::theme;

/// Render a server type badge.
pub fn server_type_badge(server_type: MediaServerType) -> Element<'static, Message> {
    let color = theme::server_type_color(server_type);
    container(
        text(server_type.as_str().to_uppercase())
            .size(10)
            .color(theme::TEXT_PRIMARY),
    )
    .padding(Padding::from([2, 6]))
    .style(move |_: &Theme| container::Style {
        background: Some(color.into()),
        border: Border::default().rounded(3),
        ..Default::default()
    })
    .into()
}

/// Render an enabled/disabled badge.
pub fn enabled_badge(enabled: bool) -> Element<'static, Message> {
    let (label, color) = if enabled {
        ("enabled", theme::SUCCESS)
    } else {
        ("disabled", theme::TEXT_MUTED)
    };
    container(text(label).size(11).color(theme::TEXT_PRIMARY))
        .padding(Padding::from([2, 8]))
        .style(move |_: &Theme| container::Style {
            background: Some(iced::Color { a: 0.7, ..color }.into()),
            border: Border::default().rounded(4),
            ..Default::default()
        })
        .into()
}
