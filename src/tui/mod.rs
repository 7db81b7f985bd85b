pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::ThemeColors;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

/// Run the form until the user quits, handing the final state back.
pub async fn run_tui(mut app: App) -> anyhow::Result<App> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250);
    tracing::debug!(judges = app.sheet.judges().len(), "form started");

    let result: anyhow::Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result.map(|()| app)
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Editing
                KeyCode::Enter | KeyCode::Char('e') => app.start_editing(),
                KeyCode::Char(' ') => app.toggle_selected(),

                // Structure
                KeyCode::Char('a') => app.add_judge(),
                KeyCode::Char('d') => app.remove_selected_judge(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.add_criterion(),
                KeyCode::Char('-') => app.remove_criterion(),

                // Undo
                KeyCode::Char('u') => app.undo_last(),

                KeyCode::Char('c') => app.calculate(),

                // Overlays
                KeyCode::Char('f') => app.show_formulas(),
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::Editing => {
            match key.code {
                KeyCode::Enter => app.confirm_edit(),
                KeyCode::Esc => app.cancel_edit(),
                KeyCode::Backspace => {
                    app.edit_buffer.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.edit_buffer.push(c);
                }

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::Help | app::InputMode::Formulas => {
            // Any key closes the overlay
            app.dismiss_overlay();
        }
    }
}
