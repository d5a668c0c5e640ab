use iced::widget::{button, column, container, mouse_area, opaque, row, text, Space};
use iced::{Border, Element, Length, Padding, Theme};

use crate::app::Message;
use crate::core::workflow::Confirmation;
use crate::theme;

fn dialog_text(confirmation: Confirmation) -> (&'static str, &'static str, &'static str) {
    match confirmation {
        Confirmation::Delete => (
            "Delete Media Server",
            "Are you sure you want to delete this Media Server?",
            "Delete",
        ),
        Confirmation::DiscardChanges => (
            "Unsaved Changes",
            "You have unsaved changes. Leave anyway?",
            "Leave",
        ),
    }
}

/// Modal yes/no prompt. Clicking the backdrop declines.
pub fn confirm_dialog(confirmation: Confirmation) -> Element<'static, Message> {
    let (title, body, accept_label) = dialog_text(confirmation);
    let destructive = confirmation == Confirmation::Delete;

    let content = column![
        text(title).size(18).color(theme::TEXT_PRIMARY),
        text(body).size(13).color(theme::TEXT_SECONDARY),
        Space::new().height(8),
        row![
            button(text("Cancel").size(13).color(theme::TEXT_PRIMARY))
                .padding(Padding::from([8, 20]))
                .style(|_, _| button::Style {
                    background: Some(theme::BG_TERTIARY.into()),
                    border: Border {
                        color: theme::BORDER,
                        width: 1.0,
                        radius: 6.0.into(),
                    },
                    ..Default::default()
                })
                .on_press(Message::ConfirmDeclined),
            Space::new().width(Length::Fill),
            button(text(accept_label).size(13).color(theme::TEXT_PRIMARY))
                .padding(Padding::from([8, 20]))
                .style(move |_, _| button::Style {
                    background: Some(if destructive { theme::ERROR } else { theme::ACCENT }.into()),
                    border: Border::default().rounded(6),
                    ..Default::default()
                })
                .on_press(Message::ConfirmAccepted),
        ]
        .align_y(iced::Alignment::Center),
    ]
    .spacing(12)
    .padding(24)
    .width(420);

    // Clicks on the dialog itself must not reach the backdrop.
    let modal = opaque(container(content).style(|_: &Theme| container::Style {
        background: Some(theme::BG_SECONDARY.into()),
        border: Border {
            color: theme::BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    }));

    mouse_area(
        container(modal)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_: &Theme| container::Style {
                background: Some(iced::Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                ..Default::default()
            }),
    )
    .on_press(Message::ConfirmDeclined)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_prompt_wording() {
        let (_, body, accept) = dialog_text(Confirmation::Delete);
        assert_eq!(body, "Are you sure you want to delete this Media Server?");
        assert_eq!(accept, "Delete");
    }

    #[test]
    fn test_discard_prompt_wording() {
        let (title, _, accept) = dialog_text(Confirmation::DiscardChanges);
        assert_eq!(title, "Unsaved Changes");
        assert_eq!(accept, "Leave");
    }
}
