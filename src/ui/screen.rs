use ratatui::Frame;

use crate::{ui::struggles::render_struggles, App, AppState};

/// A UI Screen boundary: responsible for rendering
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Drill screen - renders the App widget
pub struct DrillScreen;

impl Screen for DrillScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Struggles screen - uses dedicated renderer
pub struct StrugglesScreen;

impl Screen for StrugglesScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_struggles(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Drill => Box::new(DrillScreen),
        AppState::Struggles => Box::new(StrugglesScreen),
    }
}
