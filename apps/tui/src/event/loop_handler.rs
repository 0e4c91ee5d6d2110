use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::app::{App, AppActions, Severity};
use crate::domain::{nearest_spot, UserLocation};
use crate::location::LocationError;
use crate::ui;
use crate::weather::ForecastView;

/// Results reported back to the event loop by background tasks. The UI
/// thread owns all shared state; workers only send these.
#[derive(Debug)]
pub enum WorkerEvent {
    LocationResolved(Result<UserLocation, LocationError>),
    ForecastReady(ForecastView),
}

/// Spawns the two async operations onto the runtime and reports their
/// outcomes over the channel. Started operations are not cancellable.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: UnboundedSender<WorkerEvent>,
    actions: Arc<AppActions>,
}

impl WorkerHandle {
    pub const fn new(tx: UnboundedSender<WorkerEvent>, actions: Arc<AppActions>) -> Self {
        Self { tx, actions }
    }

    /// Locate, then fetch the forecast only when the position resolved.
    pub fn spawn_locate_flow(&self) {
        let tx = self.tx.clone();
        let actions = self.actions.clone();
        tokio::spawn(async move {
            let result = actions.request_location().await;
            let follow_up = result.is_ok();
            if tx.send(WorkerEvent::LocationResolved(result)).is_err() {
                return;
            }
            if follow_up {
                let view = actions.fetch_forecast().await;
                let _ = tx.send(WorkerEvent::ForecastReady(view));
            }
        });
    }

    pub fn spawn_forecast(&self) {
        let tx = self.tx.clone();
        let actions = self.actions.clone();
        tokio::spawn(async move {
            let view = actions.fetch_forecast().await;
            let _ = tx.send(WorkerEvent::ForecastReady(view));
        });
    }
}

/// Apply one worker outcome to the state. This is the single place that
/// decides notification versus silent log, and it keeps the invariant that
/// every path that activated the loading popup clears it.
pub fn handle_worker_event(app: &mut App, event: WorkerEvent) {
    match event {
        WorkerEvent::LocationResolved(Ok(location)) => {
            app.user_location = Some(location);
            let (spot, distance) = nearest_spot(app.user_location.as_ref());
            app.selected_spot = spot;
            app.focus = crate::app::Section::Weather;

            let message = match distance {
                Some(km) => format!(
                    "Location enabled! Nearest spot: {} ({km:.1} km away)",
                    spot.label()
                ),
                None => "Location enabled!".to_string(),
            };
            app.notify(message, Severity::Success);

            // The same worker task goes on to fetch the forecast.
            app.set_loading(true, "Loading 24-hour forecast...");
        }
        WorkerEvent::LocationResolved(Err(e)) => {
            app.set_loading(false, "");
            app.notify(e.to_string(), Severity::Error);
        }
        WorkerEvent::ForecastReady(view) => {
            app.set_loading(false, "");
            if view.is_fallback() {
                app.notify("Forecast unavailable, showing demo data", Severity::Info);
            } else {
                app.notify("24-hour forecast loaded", Severity::Success);
            }
            app.forecast = Some(view);
        }
    }
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Event poll timeout (ms); also the frame cadence for spinner/toasts.
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (tx, mut rx): (UnboundedSender<WorkerEvent>, UnboundedReceiver<WorkerEvent>) =
        tokio::sync::mpsc::unbounded_channel();
    let worker = WorkerHandle::new(tx, app.actions.clone());

    loop {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // Drain worker outcomes before handling the next key.
        while let Ok(worker_event) = rx.try_recv() {
            handle_worker_event(app, worker_event);
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    crate::app::handle_input(app, key.code, &worker);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events
                }
            }
        }
    }
    Ok(())
}

/// Print a crew summary without entering the UI.
pub fn run_headless(app: &App, json: bool) -> Result<()> {
    let summary = build_headless_summary(app);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\nShoreSquad Summary");
    println!("==================");
    println!("Total crews: {}", summary.total_crews);

    for crew in &summary.crews {
        println!(
            "- {} | {} member(s) | {} kg collected",
            crew.name, crew.members, crew.trash_collected
        );
    }

    if !summary.events.is_empty() {
        println!("\nUpcoming cleanups:");
        for event in &summary.events {
            println!("- {} @ {} on {}", event.title, event.spot, event.scheduled_for);
        }
    }

    println!("\nCleanup spots:");
    for spot in crate::domain::Spot::ALL {
        let info = spot.info();
        println!(
            "- {} ({}) - {}",
            info.name, info.difficulty, info.description
        );
    }

    Ok(())
}

fn build_headless_summary(app: &App) -> HeadlessSummary {
    let crews = app
        .registry
        .crews()
        .iter()
        .map(|crew| HeadlessCrew {
            name: crew.name.clone(),
            members: crew.members.len(),
            trash_collected: crew.trash_collected,
            created_at: crew.created_at.clone(),
        })
        .collect();

    let events = app
        .events
        .iter()
        .map(|event| HeadlessEvent {
            title: event.title.clone(),
            spot: event.spot.clone(),
            scheduled_for: event.scheduled_for.clone(),
        })
        .collect();

    HeadlessSummary {
        total_crews: app.registry.len(),
        crews,
        events,
    }
}

#[derive(serde::Serialize)]
struct HeadlessSummary {
    total_crews: usize,
    crews: Vec<HeadlessCrew>,
    events: Vec<HeadlessEvent>,
}

#[derive(serde::Serialize)]
struct HeadlessCrew {
    name: String,
    members: usize,
    trash_collected: f64,
    created_at: String,
}

#[derive(serde::Serialize)]
struct HeadlessEvent {
    title: String,
    spot: String,
    scheduled_for: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Section;
    use crate::crews::CrewRegistry;
    use crate::domain::Spot;
    use crate::store::Store;
    use crate::weather::fallback_view;

    fn test_app(name: &str) -> App {
        let path = std::env::temp_dir().join(format!(
            "shoresquad-loop-{name}-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let registry = CrewRegistry::load(Store::open(path));
        App::new(registry, Vec::new(), Arc::new(AppActions::disconnected()))
    }

    fn singapore() -> UserLocation {
        UserLocation {
            latitude: 1.4060,
            longitude: 103.9770,
            accuracy_meters: Some(25.0),
        }
    }

    #[test]
    fn failed_locate_clears_loading_and_notifies() {
        for error in [
            LocationError::PermissionDenied,
            LocationError::PositionUnavailable("gps off".to_string()),
            LocationError::Timeout,
            LocationError::Unknown("boom".to_string()),
        ] {
            let mut app = test_app("locate-err");
            app.set_loading(true, "Getting your location...");

            handle_worker_event(&mut app, WorkerEvent::LocationResolved(Err(error)));

            assert!(app.loading.is_none(), "loading must clear on failure");
            assert!(app
                .toasts
                .iter()
                .any(|toast| toast.severity == Severity::Error));
        }
    }

    #[test]
    fn successful_locate_selects_nearest_spot_and_awaits_forecast() {
        let mut app = test_app("locate-ok");
        app.set_loading(true, "Getting your location...");

        handle_worker_event(&mut app, WorkerEvent::LocationResolved(Ok(singapore())));

        assert!(app.user_location.is_some());
        assert_eq!(app.selected_spot, Spot::Changi);
        assert_eq!(app.focus, Section::Weather);
        // The flow continues into the forecast fetch; loading stays active
        // with the new message until ForecastReady lands.
        assert_eq!(app.loading.as_deref(), Some("Loading 24-hour forecast..."));

        handle_worker_event(&mut app, WorkerEvent::ForecastReady(fallback_view()));
        assert!(app.loading.is_none(), "loading must clear when the flow ends");
    }

    #[test]
    fn locate_success_overwrites_previous_position() {
        let mut app = test_app("overwrite");
        app.user_location = Some(UserLocation {
            latitude: 0.0,
            longitude: 0.0,
            accuracy_meters: None,
        });

        handle_worker_event(&mut app, WorkerEvent::LocationResolved(Ok(singapore())));

        let location = app.user_location.unwrap();
        assert!((location.latitude - 1.4060).abs() < f64::EPSILON);
    }

    #[test]
    fn fallback_forecast_notifies_demo_data() {
        let mut app = test_app("fallback");
        app.set_loading(true, "Loading 24-hour forecast...");

        handle_worker_event(&mut app, WorkerEvent::ForecastReady(fallback_view()));

        assert!(app.loading.is_none());
        let view = app.forecast.as_ref().unwrap();
        assert!(view.is_fallback());
        assert!(app
            .toasts
            .iter()
            .any(|toast| toast.message.contains("demo data")));
    }

    #[test]
    fn headless_summary_reflects_registry() {
        let mut app = test_app("headless");
        app.registry.create_crew("Coast Guards").unwrap();
        app.registry.create_crew("Tide Riders").unwrap();

        let summary = build_headless_summary(&app);

        assert_eq!(summary.total_crews, 2);
        assert_eq!(summary.crews[0].name, "Coast Guards");
        assert_eq!(summary.crews[0].members, 1);
    }
}
