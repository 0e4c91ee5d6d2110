use crate::weather::DEFAULT_FORECAST_URL;
use color_eyre::Result;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Default public IP-geolocation endpoint. No API key required.
pub const DEFAULT_GEOLOCATE_URL: &str = "http://ip-api.com/json";

const DEFAULT_STORE_FILE: &str = "shoresquad.json";

/// Resolved application configuration. Built once at startup from the
/// environment (after CLI overrides are applied) and passed by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub forecast_url: String,
    /// `None` means the geolocation capability is absent.
    pub geolocate_url: Option<String>,
    pub debug: bool,
}

/// Initializes the application configuration from `.env` and the process
/// environment.
pub fn init_app_config() -> Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let store_path = match env::var("STORE_PATH") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => env::current_dir()?.join(DEFAULT_STORE_FILE),
    };

    let forecast_url = env::var("FORECAST_URL")
        .ok()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_FORECAST_URL.to_string());

    // An explicitly empty GEOLOCATE_URL disables the capability.
    let geolocate_url = match env::var("GEOLOCATE_URL") {
        Ok(url) if url.is_empty() => None,
        Ok(url) => Some(url),
        Err(_) => Some(DEFAULT_GEOLOCATE_URL.to_string()),
    };

    let debug = env::var("DEBUG").is_ok_and(|value| !value.is_empty() && value != "0");

    Ok(AppConfig {
        store_path,
        forecast_url,
        geolocate_url,
        debug,
    })
}
