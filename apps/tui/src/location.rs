use crate::domain::UserLocation;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Fixed one-shot position request timeout.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("geolocation is not available on this device")]
    Unsupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    PositionUnavailable(String),
    #[error("location request timed out")]
    Timeout,
    #[error("location error: {0}")]
    Unknown(String),
}

/// One-shot position source. Exactly one request per call, no retry; the
/// caller is suspended until the source resolves or the timeout elapses.
#[async_trait]
pub trait Locator: Send + Sync + fmt::Debug {
    async fn request_location(&self) -> Result<UserLocation, LocationError>;
}

/// Position via a public IP-geolocation endpoint, the closest analog to a
/// one-shot device position request this runtime has.
#[derive(Debug, Clone)]
pub struct IpGeoLocator {
    http: Client,
    url: String,
}

impl IpGeoLocator {
    pub fn new(url: String) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(LOCATE_TIMEOUT).build()?;
        Ok(Self { http, url })
    }
}

#[derive(Debug, Deserialize)]
struct IpGeoResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl Locator for IpGeoLocator {
    async fn request_location(&self) -> Result<UserLocation, LocationError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(LocationError::Unknown(format!(
                "geolocation endpoint returned HTTP {status}"
            )));
        }

        let body: IpGeoResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unknown(e.to_string()))?;

        decode_position(&body)
    }
}

fn classify_transport(error: reqwest::Error) -> LocationError {
    if error.is_timeout() {
        LocationError::Timeout
    } else if error.is_connect() {
        LocationError::PositionUnavailable(error.to_string())
    } else {
        LocationError::Unknown(error.to_string())
    }
}

fn decode_position(body: &IpGeoResponse) -> Result<UserLocation, LocationError> {
    if body.status != "success" {
        let reason = body
            .message
            .clone()
            .unwrap_or_else(|| "provider reported failure".to_string());
        return Err(LocationError::PositionUnavailable(reason));
    }

    match (body.lat, body.lon) {
        (Some(latitude), Some(longitude)) => Ok(UserLocation {
            latitude,
            longitude,
            // IP geolocation has no meaningful accuracy radius to report.
            accuracy_meters: None,
        }),
        _ => Err(LocationError::Unknown(
            "geolocation response missing coordinates".to_string(),
        )),
    }
}
