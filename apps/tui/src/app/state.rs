use crate::app::actions::AppActions;
use crate::crews::CrewRegistry;
use crate::domain::{CleanupEvent, Spot, UserLocation};
use crate::weather::ForecastView;
use std::sync::Arc;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

/// Fixed toast auto-dismiss interval.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// One transient notification. Independent of every other toast; no queue,
/// no coalescing.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    born: Instant,
}

impl Toast {
    pub fn new(message: String, severity: Severity) -> Self {
        Self {
            message,
            severity,
            born: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.born) >= TOAST_TTL
    }
}

/// Which dashboard region has focus. Cycled with Tab, jumped to by the
/// get-started and enable-location flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Map,
    Weather,
    Crews,
}

impl Section {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Map => "Cleanup Spots",
            Self::Weather => "24-Hour Forecast",
            Self::Crews => "Your Crews",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Map => Self::Weather,
            Self::Weather => Self::Crews,
            Self::Crews => Self::Map,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Map => Self::Crews,
            Self::Weather => Self::Map,
            Self::Crews => Self::Weather,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Browsing,
    EnteringCrewName,
}

pub struct App {
    pub running: bool,
    pub focus: Section,
    pub input_state: InputState,
    pub current_input: String,
    pub show_help: bool,
    pub selected_spot: Spot,
    pub selected_crew_index: usize,
    pub registry: CrewRegistry,
    pub events: Vec<CleanupEvent>,
    pub user_location: Option<UserLocation>,
    pub forecast: Option<ForecastView>,
    pub toasts: Vec<Toast>,
    pub loading: Option<String>,
    pub throbber: ThrobberState,
    pub actions: Arc<AppActions>,
}

impl App {
    pub fn new(registry: CrewRegistry, events: Vec<CleanupEvent>, actions: Arc<AppActions>) -> Self {
        Self {
            running: true,
            focus: Section::Map,
            input_state: InputState::Browsing,
            current_input: String::new(),
            show_help: false,
            selected_spot: Spot::ALL[0],
            selected_crew_index: 0,
            registry,
            events,
            user_location: None,
            forecast: None,
            toasts: Vec::new(),
            loading: None,
            throbber: ThrobberState::default(),
            actions,
        }
    }

    /// Per-frame housekeeping: expire toasts and advance the spinner.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|toast| !toast.expired(now));
        if self.loading.is_some() {
            self.throbber.calc_next();
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.push(Toast::new(message.into(), severity));
    }

    /// Toggle the single shared modal indicator; last call wins.
    pub fn set_loading(&mut self, active: bool, message: &str) {
        self.loading = active.then(|| message.to_string());
    }

    pub const fn is_busy(&self) -> bool {
        self.loading.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn test_app(name: &str) -> App {
        let path = std::env::temp_dir().join(format!(
            "shoresquad-state-{name}-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let registry = CrewRegistry::load(Store::open(path));
        App::new(registry, Vec::new(), Arc::new(AppActions::disconnected()))
    }

    #[test]
    fn set_loading_last_call_wins() {
        let mut app = test_app("loading");

        app.set_loading(true, "Getting your location...");
        app.set_loading(true, "Loading 24-hour forecast...");
        assert_eq!(app.loading.as_deref(), Some("Loading 24-hour forecast..."));

        app.set_loading(false, "");
        assert!(app.loading.is_none());
    }

    #[test]
    fn toasts_accumulate_independently() {
        let mut app = test_app("toasts");

        app.notify("one", Severity::Info);
        app.notify("two", Severity::Error);
        assert_eq!(app.toasts.len(), 2);

        app.update();
        assert_eq!(app.toasts.len(), 2, "fresh toasts must survive an update");
    }

    #[test]
    fn toast_expires_after_ttl() {
        let toast = Toast::new("hi".to_string(), Severity::Success);
        let now = Instant::now();

        assert!(!toast.expired(now));
        assert!(toast.expired(now + TOAST_TTL));
        assert!(toast.expired(now + TOAST_TTL + Duration::from_secs(1)));
    }

    #[test]
    fn section_cycle_covers_all_regions() {
        let mut section = Section::Map;
        section = section.next();
        assert_eq!(section, Section::Weather);
        section = section.next();
        assert_eq!(section, Section::Crews);
        section = section.next();
        assert_eq!(section, Section::Map);
        assert_eq!(Section::Map.prev(), Section::Crews);
    }
}
