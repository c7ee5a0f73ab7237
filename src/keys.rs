use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    if key_event.kind == KeyEventKind::Release {
        return;
    }
    let mut guard = app.lock().await;

    if guard.state.prompt.is_some() {
        match (key_event.code, key_event.modifiers) {
            (Char('y') | KeyCode::Enter, _) => guard.confirm_prompt(),
            (Char('n') | KeyCode::Esc, _) => guard.cancel_prompt(),
            (Char('c'), KeyModifiers::CONTROL) => quit(),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bench),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Stats),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Selection
        (MenuItem::Bench, Char('j') | KeyCode::Down, KeyModifiers::NONE) => guard.select_down(),
        (MenuItem::Bench, Char('k') | KeyCode::Up, KeyModifiers::NONE) => guard.select_up(),
        (MenuItem::Bench, KeyCode::Tab | Char('h') | Char('l') | KeyCode::Left | KeyCode::Right, _) => {
            guard.switch_zone()
        }

        // Substitutions
        (MenuItem::Bench, Char(' ') | KeyCode::Enter, _) => guard.toggle_selected(),
        (MenuItem::Bench, Char('J'), _) | (MenuItem::Bench, KeyCode::Down, KeyModifiers::SHIFT) => {
            guard.reorder_selected(true)
        }
        (MenuItem::Bench, Char('K'), _) | (MenuItem::Bench, KeyCode::Up, KeyModifiers::SHIFT) => {
            guard.reorder_selected(false)
        }
        (MenuItem::Bench, Char('x'), _) => guard.remove_selected(),
        (MenuItem::Bench, Char('g'), _) => guard.goal_selected(),

        // Clock
        (_, Char('s'), _) => guard.start_clock(),
        (_, Char('p'), _) => guard.toggle_pause(),
        (_, Char('n'), _) => guard.next_quarter(),
        (_, Char('t'), _) => guard.reset_timer(),

        // History
        (_, Char('u'), _) | (_, Char('z'), KeyModifiers::CONTROL) => guard.undo(),
        (_, Char('R'), _) => guard.request_reset(),

        // Global
        (_, Char('e'), _) => guard.export_log(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

fn quit() {
    crate::cleanup_terminal();
    std::process::exit(0);
}
