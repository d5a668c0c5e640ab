use iced::widget::{button, column, container, row, scrollable, svg, text, text_input, Space};
use iced::{Border, Element, Length, Padding, Theme};

use crate::app::{Message, Route};
use crate::core::model::{MediaServerRead, MediaServerType, ServerTarget};
use crate::core::service::RefreshOutcome;
use crate::core::workflow::ResultKind;
use crate::theme;
use crate::ui::badges;

const DEFAULT_LOGO: &[u8] = include_bytes!("../../assets/mediaserver.svg");

/// Logo per server type. Every type currently shares the default artwork.
const LOGOS: &[(MediaServerType, &[u8])] = &[
    (MediaServerType::Emby, DEFAULT_LOGO),
    (MediaServerType::Jellyfin, DEFAULT_LOGO),
    (MediaServerType::Plex, DEFAULT_LOGO),
];

pub fn logo_for(server_type: MediaServerType) -> &'static [u8] {
    LOGOS
        .iter()
        .find(|(t, _)| *t == server_type)
        .map(|(_, logo)| *logo)
        .unwrap_or(DEFAULT_LOGO)
}

/// Transient state of the list page.
#[derive(Debug, Default)]
pub struct ListState {
    pub folder_path: String,
    pub refreshing: bool,
    pub result: Option<(String, ResultKind)>,
}

impl ListState {
    /// Summarize a "refresh all" run into the result area.
    pub fn apply_refresh_outcomes(&mut self, outcomes: &[RefreshOutcome]) {
        self.refreshing = false;
        if outcomes.is_empty() {
            self.result = Some((
                "No enabled media servers to refresh".to_string(),
                ResultKind::Info,
            ));
            return;
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        let lines: Vec<String> = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(message) => format!("{}: {message}", o.server_name),
                Err(e) => format!("{}: failed ({e})", o.server_name),
            })
            .collect();
        let kind = if failed == 0 {
            ResultKind::Success
        } else {
            ResultKind::Error
        };
        self.result = Some((lines.join("\n"), kind));
    }
}

pub fn server_list<'a>(
    servers: &'a [MediaServerRead],
    loading: bool,
    state: &'a ListState,
) -> Element<'a, Message> {
    let folder_input = text_input("Folder path to refresh (optional)", &state.folder_path)
        .on_input(Message::FolderPathChanged)
        .size(13)
        .padding(Padding::from([6, 10]))
        .width(360)
        .style(|_, _| text_input::Style {
            background: theme::BG_TERTIARY.into(),
            border: Border {
                color: theme::BORDER,
                width: 1.0,
                radius: 6.0.into(),
            },
            icon: theme::TEXT_MUTED,
            placeholder: theme::TEXT_MUTED,
            value: theme::TEXT_PRIMARY,
            selection: theme::ACCENT,
        });

    let refresh_all_label = if state.refreshing {
        "Refreshing..."
    } else {
        "Refresh all enabled"
    };
    let toolbar = row![
        text("Media Servers").size(16).color(theme::TEXT_PRIMARY),
        Space::new().width(Length::Fill),
        folder_input,
        small_button(
            refresh_all_label,
            (!state.refreshing && !loading).then_some(Message::RefreshAllEnabled),
        ),
    ]
    .spacing(8)
    .align_y(iced::Alignment::Center);

    let mut page = column![toolbar].spacing(12).padding(20);

    if let Some((message, kind)) = &state.result {
        page = page.push(result_banner(message, *kind));
    }

    let body: Element<'a, Message> = if loading && servers.is_empty() {
        centered_note("Loading media servers...")
    } else if servers.is_empty() {
        centered_note("No media servers yet. Add one to get started.")
    } else {
        let cards: Vec<Element<'a, Message>> = servers
            .iter()
            .map(|s| server_card(s, state.refreshing))
            .collect();
        scrollable(column(cards).spacing(8))
            .height(Length::Fill)
            .into()
    };

    page.push(body).width(Length::Fill).height(Length::Fill).into()
}

fn server_card(server: &MediaServerRead, refreshing: bool) -> Element<'_, Message> {
    let id = server.id;
    let logo = svg(svg::Handle::from_memory(logo_for(server.server_type)))
        .width(40)
        .height(40);

    let details = column![
        row![
            text(&server.name).size(14).color(theme::TEXT_PRIMARY),
            badges::server_type_badge(server.server_type),
            badges::enabled_badge(server.enabled),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
        text(&server.url).size(12).color(theme::TEXT_SECONDARY),
        text(format!("Added {}", server.added_at.format("%Y-%m-%d %H:%M")))
            .size(11)
            .color(theme::TEXT_MUTED),
    ]
    .spacing(4);

    let actions = row![
        small_button("Refresh library", (!refreshing).then_some(Message::RefreshLibrary(id))),
        small_button(
            "Edit",
            Some(Message::Navigate(Route::Edit(ServerTarget::from_id(id)))),
        ),
    ]
    .spacing(6)
    .align_y(iced::Alignment::Center);

    container(
        row![logo, details, Space::new().width(Length::Fill), actions]
            .spacing(12)
            .align_y(iced::Alignment::Center),
    )
    .padding(Padding::from([10, 14]))
    .width(Length::Fill)
    .style(|_: &Theme| container::Style {
        background: Some(theme::BG_SECONDARY.into()),
        border: Border {
            color: theme::BORDER,
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    })
    .into()
}

fn result_banner(message: &str, kind: ResultKind) -> Element<'_, Message> {
    let color = theme::result_color(kind);
    container(
        row![
            text(message).size(13).color(color),
            Space::new().width(Length::Fill),
            button(text("✕").size(12).color(theme::TEXT_MUTED))
                .padding(Padding::from([2, 8]))
                .style(|_, _| button::Style {
                    background: None,
                    ..Default::default()
                })
                .on_press(Message::DismissResult),
        ]
        .align_y(iced::Alignment::Center),
    )
    .padding(Padding::from([8, 12]))
    .width(Length::Fill)
    .style(move |_: &Theme| container::Style {
        background: Some(iced::Color { a: 0.1, ..color }.into()),
        border: Border {
            color,
            width: 1.0,
            radius: 6.0.into(),
        },
        ..Default::default()
    })
    .into()
}

fn centered_note(note: &'static str) -> Element<'static, Message> {
    container(text(note).size(14).color(theme::TEXT_MUTED))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn small_button(label: &str, msg: Option<Message>) -> Element<'static, Message> {
    let label = label.to_string();
    button(text(label).size(12).color(theme::TEXT_PRIMARY))
        .padding(Padding::from([4, 10]))
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
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .on_press_maybe(msg)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_resolves_to_shared_logo() {
        for t in MediaServerType::ALL {
            assert_eq!(logo_for(*t), DEFAULT_LOGO);
        }
        assert_eq!(LOGOS.len(), MediaServerType::ALL.len());
    }

    #[test]
    fn test_refresh_summary_all_ok() {
        let mut state = ListState {
            refreshing: true,
            ..Default::default()
        };
        state.apply_refresh_outcomes(&[RefreshOutcome {
            server_name: "Den".to_string(),
            result: Ok("Library refresh triggered on 'Den'".to_string()),
        }]);
        assert!(!state.refreshing);
        assert_eq!(
            state.result,
            Some((
                "Den: Library refresh triggered on 'Den'".to_string(),
                ResultKind::Success
            ))
        );
    }

    #[test]
    fn test_refresh_summary_with_failure() {
        let mut state = ListState::default();
        state.apply_refresh_outcomes(&[
            RefreshOutcome {
                server_name: "Den".to_string(),
                result: Ok("ok".to_string()),
            },
            RefreshOutcome {
                server_name: "Office".to_string(),
                result: Err("timed out".to_string()),
            },
        ]);
        let (message, kind) = state.result.unwrap();
        assert_eq!(kind, ResultKind::Error);
        assert_eq!(message, "Den: ok\nOffice: failed (timed out)");
    }

    #[test]
    fn test_refresh_summary_empty() {
        let mut state = ListState::default();
        state.apply_refresh_outcomes(&[]);
        assert_eq!(state.result.map(|(_, k)| k), Some(ResultKind::Info));
    }
}
