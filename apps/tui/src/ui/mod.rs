// UI module for shoresquad-tui
// Handles all rendering; the overlays draw on top of the dashboard

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &mut App, f: &mut Frame<'_>) {
    screens::main::render_main(app, f);

    if !app.show_help {
        widgets::toast::render_toasts(app, f);
        widgets::spinner::render_loading(app, f);
    }
}
