use iced::widget::{
    button, checkbox, column, container, pick_list, row, scrollable, text, text_input, Space,
};
use iced::{Border, Color, Element, Length, Padding, Theme};

use crate::app::Message;
use crate::core::model::MediaServerType;
use crate::core::validation::Field;
use crate::core::workflow::{EditWorkflow, FieldChange, Phase};
use crate::theme;

/// Label for the primary button. A successful test turns "Test" into "Save".
fn submit_label(workflow: &EditWorkflow) -> &'static str {
    if workflow.is_submitting() {
        "Saving..."
    } else if !workflow.is_ready_to_submit() {
        "Test & Continue"
    } else if workflow.is_create() {
        "Add Media Server"
    } else {
        "Save Changes"
    }
}

pub fn server_form(workflow: &EditWorkflow, pending_return: bool) -> Element<'_, Message> {
    let form = workflow.form();
    let busy = workflow.is_busy();
    let idle = |msg: Message| (!busy).then_some(msg);

    let title = if workflow.is_create() {
        "Add Media Server".to_string()
    } else {
        format!("Edit {}", form.name)
    };

    let type_picker = column![
        text("Server Type").size(13).color(theme::TEXT_SECONDARY),
        pick_list(MediaServerType::ALL, Some(form.server_type), |t| {
            Message::FormChanged(FieldChange::ServerType(t))
        })
        .text_size(13)
        .padding(Padding::from([6, 10])),
    ]
    .spacing(4);

    let enabled = row![
        checkbox(form.enabled).on_toggle(|v| Message::FormChanged(FieldChange::Enabled(v))),
        text("Enabled").size(13).color(theme::TEXT_SECONDARY),
    ]
    .spacing(8)
    .align_y(iced::Alignment::Center);

    let mut content = column![
        text(title).size(18).color(theme::TEXT_PRIMARY),
        form_field(
            "Name",
            "My Media Server",
            &form.name,
            workflow.error_for(Field::Name),
            false,
            |v| Message::FormChanged(FieldChange::Name(v)),
        ),
        type_picker,
        form_field(
            "URL",
            "http://192.168.1.10:8096",
            &form.url,
            workflow.error_for(Field::Url),
            false,
            |v| Message::FormChanged(FieldChange::Url(v)),
        ),
        form_field(
            "API Key",
            "",
            &form.api_key,
            workflow.error_for(Field::ApiKey),
            true,
            |v| Message::FormChanged(FieldChange::ApiKey(v)),
        ),
        enabled,
    ]
    .spacing(14);

    if let Some((message, kind)) = workflow.result() {
        content = content.push(text(message).size(13).color(theme::result_color(kind)));
    }
    if pending_return {
        content = content.push(
            text("Returning to the list...")
                .size(12)
                .color(theme::TEXT_MUTED),
        );
    }

    let test_label = if workflow.phase() == Phase::Testing {
        "Testing..."
    } else {
        "Test Connection"
    };

    let mut actions = row![secondary_button("Cancel", idle(Message::CancelRequested))]
        .spacing(8)
        .align_y(iced::Alignment::Center);
    if !workflow.is_create() {
        actions = actions.push(danger_button("Delete", idle(Message::DeleteRequested)));
    }
    actions = actions
        .push(Space::new().width(Length::Fill))
        .push(secondary_button(test_label, idle(Message::TestRequested)))
        .push(accent_button(submit_label(workflow), idle(Message::SubmitRequested)));

    content = content.push(Space::new().height(4)).push(actions);

    let card = container(content.padding(24).width(560)).style(|_: &Theme| container::Style {
        background: Some(theme::BG_SECONDARY.into()),
        border: Border {
            color: theme::BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    });

    scrollable(
        container(card)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding(24),
    )
    .height(Length::Fill)
    .into()
}

/// Shown on the edit route while the snapshot is still loading.
pub fn loading_placeholder() -> Element<'static, Message> {
    container(text("Loading media server...").size(14).color(theme::TEXT_MUTED))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn form_field<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    error: Option<&'a str>,
    secure: bool,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    let border_color = if error.is_some() {
        theme::ERROR
    } else {
        theme::BORDER
    };
    let input = text_input(placeholder, value)
        .on_input(on_input)
        .secure(secure)
        .size(13)
        .padding(Padding::from([6, 10]))
        .style(move |_, _| text_input::Style {
            background: theme::BG_TERTIARY.into(),
            border: Border {
                color: border_color,
                width: 1.0,
                radius: 6.0.into(),
            },
            icon: theme::TEXT_MUTED,
            placeholder: theme::TEXT_MUTED,
            value: theme::TEXT_PRIMARY,
            selection: theme::ACCENT,
        });

    let mut field = column![text(label).size(13).color(theme::TEXT_SECONDARY), input].spacing(4);
    if let Some(error) = error {
        field = field.push(text(error).size(11).color(theme::ERROR));
    }
    field.into()
}

fn filled_button(
    label: &'static str,
    msg: Option<Message>,
    base: Color,
    hover: Color,
) -> Element<'static, Message> {
    button(text(label).size(13).color(theme::TEXT_PRIMARY))
        .padding(Padding::from([8, 18]))
        .style(move |_, status| {
            let bg = match status {
                button::Status::Hovered => hover,
                button::Status::Disabled => Color { a: 0.5, ..base },
                _ => base,
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

fn accent_button(label: &'static str, msg: Option<Message>) -> Element<'static, Message> {
    filled_button(label, msg, theme::ACCENT, theme::ACCENT_HOVER)
}

fn danger_button(label: &'static str, msg: Option<Message>) -> Element<'static, Message> {
    filled_button(label, msg, theme::ERROR, theme::ERROR)
}

fn secondary_button(label: &'static str, msg: Option<Message>) -> Element<'static, Message> {
    button(text(label).size(13).color(theme::TEXT_PRIMARY))
        .padding(Padding::from([8, 18]))
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
        .on_press_maybe(msg)
        .into()
}
