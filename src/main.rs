mod app;
mod config;
mod core;
mod theme;
mod ui;

use crate::core::api::ApiClient;
use crate::ui::toast::ToastType;

fn main() -> iced::Result {
    let (config, config_problem) = config::Config::load();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(config.max_level())
        .init();

    tracing::info!("ServerDeck starting...");
    if let Some(problem) = &config_problem {
        tracing::warn!("{problem}; using defaults");
    }
    let api = match ApiClient::new(&config.api_url, config.request_timeout()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Backend API: {}", api.base_url());

    let start_route = app::Route::from_args(std::env::args().skip(1));

    iced::application(
        move || {
            let (mut app, task) = app::App::new(config.clone(), api.clone());
            if let Some(problem) = &config_problem {
                app.toasts
                    .push(format!("{problem}; using defaults"), ToastType::Warning);
            }
            let open = app.update(app::Message::Navigate(start_route));
            (app, iced::Task::batch([task, open]))
        },
        app::App::update,
        app::App::view,
    )
    .title(app::App::title)
    .subscription(app::App::subscription)
    .theme(app::App::theme)
    .window_size((1100.0, 760.0))
    .antialiasing(true)
    .run()
}
