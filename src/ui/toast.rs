use iced::widget::{column, container, mouse_area, text};
use iced::{Border, Color, Element, Length, Padding, Theme};
use std::time::{Duration, Instant};

use crate::app::Message;
use crate::theme;

const TOAST_LIFETIME: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastType {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub toast_type: ToastType,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(id: u64, message: String, toast_type: ToastType) -> Self {
        Self {
            id,
            message,
            toast_type,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > TOAST_LIFETIME
    }
}

/// Notifications currently on screen.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
        }
    }
}

impl ToastQueue {
    pub fn push(&mut self, message: impl Into<String>, toast_type: ToastType) {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast::new(id, message.into(), toast_type));
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn prune_expired(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

fn toast_colors(tt: ToastType) -> (Color, Color, Color) {
    // (border, background, text)
    match tt {
        ToastType::Error => (theme::ERROR, with_alpha(theme::ERROR, 0.1), theme::ERROR),
        ToastType::Warning => (theme::WARNING, with_alpha(theme::WARNING, 0.1), theme::WARNING),
    }
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color { a: alpha, ..color }
}

/// Render the toast container (bottom-right, overlaid via Stack).
pub fn toast_container(toasts: &ToastQueue) -> Element<'_, Message> {
    let toast_views: Vec<Element<'_, Message>> = toasts
        .iter()
        .map(|t| {
            let (border_color, bg_color, text_color) = toast_colors(t.toast_type);
            let id = t.id;

            mouse_area(
                container(text(&t.message).size(13).color(text_color))
                    .padding(Padding::from([10, 16]))
                    .width(320)
                    .style(move |_: &Theme| container::Style {
                        background: Some(bg_color.into()),
                        border: Border {
                            color: border_color,
                            width: 1.0,
                            radius: 8.0.into(),
                        },
                        ..Default::default()
                    }),
            )
            .on_press(Message::DismissToast(id))
            .into()
        })
        .collect();

    container(column(toast_views).spacing(8))
        .padding(16)
        .width(Length::Shrink)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut queue = ToastQueue::default();
        queue.push("first", ToastType::Warning);
        queue.push("second", ToastType::Error);
        let ids: Vec<u64> = queue.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_dismiss_removes_only_target() {
        let mut queue = ToastQueue::default();
        queue.push("a", ToastType::Error);
        queue.push("b", ToastType::Error);
        queue.dismiss(1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().map(|t| t.message.as_str()), Some("b"));
    }

    #[test]
    fn test_fresh_toast_survives_prune() {
        let mut queue = ToastQueue::default();
        queue.push("fresh", ToastType::Warning);
        queue.prune_expired();
        assert!(!queue.is_empty());
    }
}
