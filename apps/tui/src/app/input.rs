use crate::app::state::{App, InputState, Section, Severity};
use crate::domain::Spot;
use crate::event::WorkerHandle;
use crossterm::event::KeyCode;

pub fn handle_input(app: &mut App, key: KeyCode, worker: &WorkerHandle) {
    if handle_help_toggle(app, key) {
        return;
    }

    match app.input_state {
        InputState::EnteringCrewName => handle_crew_name_input(app, key),
        InputState::Browsing => handle_browse_input(app, key, worker),
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    // '?' stays typable while a crew name is being entered.
    let toggle = key == KeyCode::F(1)
        || (key == KeyCode::Char('?') && app.input_state != InputState::EnteringCrewName);
    if toggle {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

fn handle_browse_input(app: &mut App, key: KeyCode, worker: &WorkerHandle) {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('l') => start_locate_flow(app, worker),
        KeyCode::Char('w') => start_forecast_refresh(app, worker),
        KeyCode::Char('c') => {
            app.input_state = InputState::EnteringCrewName;
            app.current_input.clear();
        }
        // The get-started control jumps straight to the map region.
        KeyCode::Char('g') => app.focus = Section::Map,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Left => select_spot_offset(app, -1),
        KeyCode::Right => select_spot_offset(app, 1),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(spot) = Spot::from_index(index) {
                app.selected_spot = spot;
                app.focus = Section::Map;
            }
        }
        KeyCode::Up => {
            if app.focus == Section::Crews && app.selected_crew_index > 0 {
                app.selected_crew_index -= 1;
            }
        }
        KeyCode::Down => {
            if app.focus == Section::Crews
                && !app.registry.is_empty()
                && app.selected_crew_index < app.registry.len() - 1
            {
                app.selected_crew_index += 1;
            }
        }
        _ => {}
    }
}

fn select_spot_offset(app: &mut App, offset: isize) {
    let count = Spot::ALL.len() as isize;
    let index = (app.selected_spot.index() as isize + offset).rem_euclid(count);
    if let Some(spot) = Spot::from_index(index as usize) {
        app.selected_spot = spot;
    }
}

/// Enable-location control: locate, then (on success) fetch the forecast.
/// The worker reports back through the event channel; the loading popup is
/// cleared on every outcome.
fn start_locate_flow(app: &mut App, worker: &WorkerHandle) {
    if !app.actions.supports_location() {
        app.notify(
            "Geolocation is not available on this device",
            Severity::Error,
        );
        return;
    }
    // One operation at a time; started requests are not cancellable.
    if app.is_busy() {
        return;
    }

    app.set_loading(true, "Getting your location...");
    worker.spawn_locate_flow();
}

fn start_forecast_refresh(app: &mut App, worker: &WorkerHandle) {
    if app.is_busy() {
        return;
    }
    app.set_loading(true, "Loading 24-hour forecast...");
    worker.spawn_forecast();
}

fn handle_crew_name_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => app.current_input.push(c),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Esc => {
            app.input_state = InputState::Browsing;
            app.current_input.clear();
        }
        KeyCode::Enter => submit_crew_name(app),
        _ => {}
    }
}

fn submit_crew_name(app: &mut App) {
    let name = app.current_input.clone();
    match app.registry.create_crew(&name) {
        Ok(crew) => {
            app.notify(format!("Crew \"{}\" created!", crew.name), Severity::Success);
            app.focus = Section::Crews;
            app.selected_crew_index = app.registry.len() - 1;
        }
        Err(_) => {
            app.notify("Please enter a crew name", Severity::Info);
        }
    }
    app.input_state = InputState::Browsing;
    app.current_input.clear();
}
