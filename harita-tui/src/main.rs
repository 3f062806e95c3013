//! Terminal UI for harita that shows the district choropleth and lets an
//! operator upload measurement data.

mod app;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use harita_backend::BackendClient;
use harita_core::{
    plugin::SourceRegistry,
    ports::{AttributePort, SyncError, UploadPort},
    service::SyncService,
};
use harita_source_ankara as ankara;
use harita_source_turkiye as turkiye;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Screen, TuiMapSurface};
use crate::input::Action;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REGION: &str = "Ankara";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let backend_url =
        std::env::var("HARITA_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_owned());
    let region = std::env::var("HARITA_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_owned());

    // HTTP + service setup
    let client = Client::builder().user_agent("harita/0.1").build()?;

    let plugins = vec![
        ankara::plugin(client.clone(), &backend_url),
        turkiye::plugin(client.clone(), &backend_url, &region),
    ];
    let registry = Arc::new(SourceRegistry::new(plugins));

    let backend_client = Arc::new(BackendClient::new(client, &backend_url));
    let attributes: Arc<dyn AttributePort> = Arc::<BackendClient>::clone(&backend_client);
    let uploads: Arc<dyn UploadPort> = backend_client;

    let surface = Arc::new(TuiMapSurface::new());
    let service = Arc::new(SyncService::new(
        registry,
        attributes,
        uploads,
        Arc::<TuiMapSurface>::clone(&surface),
    ));

    // App state
    let app = App::new(service, surface);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Logs would fight ratatui for the terminal, so they go to a file and
/// only when `HARITA_LOG` names one.
fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var("HARITA_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::ActivateSource => {
                    let Some(source) = app.highlighted_source() else {
                        app.error_message = Some("No boundary source registered".into());
                        continue;
                    };

                    if let Err(err) = app.service.set_active_source(source) {
                        app.error_message = Some(format!("Cannot activate source: {err}"));
                        continue;
                    }

                    app.screen = Screen::MapView;
                    refresh_now(terminal, &mut app).await?;
                }
                Action::Refresh => {
                    refresh_now(terminal, &mut app).await?;
                }
                Action::SubmitUpload => {
                    let Some(district) = app.selected_district() else {
                        app.error_message =
                            Some("No district to select (refresh the map first)".into());
                        continue;
                    };

                    let path = app.file_input.trim().to_owned();
                    if path.is_empty() {
                        app.error_message =
                            Some("Type the path of a measurement CSV, then press Enter".into());
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let bytes = match tokio::fs::read(&path).await {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            app.is_loading = false;
                            app.error_message = Some(format!("Cannot read {path}: {err}"));
                            continue;
                        }
                    };
                    let file_name = std::path::Path::new(&path)
                        .file_name()
                        .map_or_else(|| "veri.csv".to_owned(), |name| name.to_string_lossy().into_owned());

                    let outcome = app
                        .service
                        .submit_measurements(&district, &file_name, bytes)
                        .await;

                    app.is_loading = false;
                    match outcome {
                        Ok(outcome) => {
                            app.upload_status = Some(format!(
                                "Başarılı: {} için ortalama {:.2}, renk {}",
                                outcome.receipt.district,
                                outcome.receipt.average,
                                outcome.receipt.color
                            ));
                            // A successful upload clears the form.
                            app.file_input.clear();
                            app.sync_selection();
                            app.error_message = outcome
                                .refresh_error
                                .map(|err| format!("Refresh after upload failed: {err}"));
                        }
                        Err(SyncError::UploadRejected(message)) => {
                            app.upload_status = Some(format!("Hata: {message}"));
                        }
                        Err(err) => {
                            app.upload_status = Some(format!("Sunucu hatası: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

async fn refresh_now(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.is_loading = true;
    app.error_message = None;
    terminal.draw(|frame| ui::draw(frame, app))?;

    let res = app.service.refresh().await;

    app.is_loading = false;
    match res {
        Ok(()) => {
            app.sync_selection();
        }
        Err(err) => {
            // The previous layer and selection stay visible on failure.
            app.error_message = Some(format!("Refresh failed: {err}"));
        }
    }

    Ok(())
}
