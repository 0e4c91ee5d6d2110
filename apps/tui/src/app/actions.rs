use crate::config::AppConfig;
use crate::domain::UserLocation;
use crate::location::{IpGeoLocator, LocationError, Locator};
use crate::weather::{ForecastClient, ForecastView, DEFAULT_FORECAST_URL};
use color_eyre::Result;
use std::sync::Arc;

/// The outbound side of the application: one locator, one forecast client.
/// Shared with background tasks via `Arc`; the crew registry stays on the
/// UI thread.
#[derive(Debug)]
pub struct AppActions {
    locator: Option<Arc<dyn Locator>>,
    forecast: ForecastClient,
}

impl AppActions {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let locator = match &config.geolocate_url {
            Some(url) => {
                let locator = IpGeoLocator::new(url.clone())?;
                Some(Arc::new(locator) as Arc<dyn Locator>)
            }
            None => None,
        };

        Ok(Self {
            locator,
            forecast: ForecastClient::new(config.forecast_url.clone())?,
        })
    }

    /// Actions with the geolocation capability absent. Test constructor;
    /// the real wiring goes through `from_config`.
    pub fn disconnected() -> Self {
        #[allow(clippy::unwrap_used)] // default client construction does not fail
        let forecast = ForecastClient::new(DEFAULT_FORECAST_URL.to_string()).unwrap();
        Self {
            locator: None,
            forecast,
        }
    }

    pub const fn supports_location(&self) -> bool {
        self.locator.is_some()
    }

    /// One-shot position request. `Unsupported` is reported immediately,
    /// without blocking, when no locator is configured.
    pub async fn request_location(&self) -> Result<UserLocation, LocationError> {
        match &self.locator {
            Some(locator) => locator.request_location().await,
            None => Err(LocationError::Unsupported),
        }
    }

    pub async fn fetch_forecast(&self) -> ForecastView {
        self.forecast.fetch_forecast().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedLocator;

    #[async_trait]
    impl Locator for FixedLocator {
        async fn request_location(&self) -> Result<UserLocation, LocationError> {
            Ok(UserLocation {
                latitude: 1.3521,
                longitude: 103.8198,
                accuracy_meters: Some(50.0),
            })
        }
    }

    #[tokio::test]
    async fn missing_capability_reports_unsupported_immediately() {
        let actions = AppActions::disconnected();
        let err = actions.request_location().await.unwrap_err();
        assert!(matches!(err, LocationError::Unsupported));
    }

    #[tokio::test]
    async fn configured_locator_is_consulted() {
        let actions = AppActions {
            locator: Some(Arc::new(FixedLocator)),
            forecast: ForecastClient::new(DEFAULT_FORECAST_URL.to_string()).unwrap(),
        };

        let location = actions.request_location().await.unwrap();
        assert!((location.latitude - 1.3521).abs() < f64::EPSILON);
    }
}
