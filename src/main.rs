//! Seeker TUI - terminal front end for The Seeker construction quote service
//!
//! A Ratatui-based TUI for requesting free or paid quote analyses and
//! partner referrals. Requests are delivered as email through Web3Forms.

mod app;
mod config;
mod platform;
mod relay;
mod state;
mod submission;
mod ui;

use anyhow::Result;
use app::App;
use config::SeekerConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use relay::Web3FormsClient;
use state::LabelResolver;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use submission::SubmissionPipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env may carry the relay access key
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeker_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = SeekerConfig::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Ignoring unreadable config file");
        SeekerConfig::default()
    });
    let settings = config.relay_settings();
    let relay = Web3FormsClient::new(&settings)?;
    tracing::info!(endpoint = relay.endpoint(), "Relay client ready");

    let pipeline = SubmissionPipeline::new(
        Arc::new(relay),
        settings.access_key,
        Arc::new(LabelResolver::default()),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(pipeline);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Payment timer and finished submissions
        app.tick(Instant::now());

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Faster polling while the payment progress bar moves
        let poll_duration = if app.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                app.handle_key(key).await?;
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
