mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::messages::UiEvent;
use crate::state::ticker::TickerHandle;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = Arc::new(Mutex::new(App::new()));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Animation tick thread: 80ms, drives the goal banner and notice fade
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    // Game clock ticker, only alive while the clock runs
    let ticker = TickerHandle::new(ui_event_tx.clone());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, ticker).await;

    input_handler.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("laxtui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "laxtui - youth lacrosse bench manager

Usage:
  laxtui
  laxtui --help
  laxtui --version

Environment:
  LAXTUI_STATE_DIR      Where the game is saved (default ~/.config/laxtui)
  LAXTUI_ROSTER_JSON    Path to a JSON roster to use instead of the built-in one
  LAXTUI_EXPORT_PATH    Where 'e' writes the activity log
  LAXTUI_FIELD_CAP      Skaters allowed on the field (default 4)
  LAXTUI_QUARTER_SECS   Quarter length in seconds (default 600)
  LAXTUI_LOG            Log level for the debug pane (error, warn, info, debug, trace)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut ticker: TickerHandle,
) {
    while let Some(ui_event) = ui_events.recv().await {
        let should_redraw = handle_ui_event(ui_event, &app).await;

        let mut app_guard = app.lock().await;
        // Pausing, finishing, resetting or undoing can all stop the clock.
        ticker.reconcile(app_guard.clock_running());
        if should_redraw {
            draw::draw(&mut terminal, &mut app_guard);
        }
    }
    ticker.stop();
}

async fn handle_ui_event(ui_event: UiEvent, app: &Arc<Mutex<App>>) -> bool {
    match ui_event {
        UiEvent::AppStarted => true,
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            guard.advance_animation()
        }
        UiEvent::ClockTick => {
            let mut guard = app.lock().await;
            guard.on_clock_tick()
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        match crossterm_event::read() {
            Ok(event) => {
                let ui_event = match event {
                    Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                    Event::Resize(_, _) => Some(UiEvent::Resize),
                    _ => None,
                };

                if let Some(ui_event) = ui_event
                    && ui_events.send(ui_event).await.is_err()
                {
                    break;
                }
            }
            Err(e) => error!("input error: {e}"),
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
