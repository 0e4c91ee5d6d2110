use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "shoresquad", version, about = "ShoreSquad crew organizer TUI")]
pub struct CliArgs {
    /// Print a crew summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the store file path
    #[arg(long, value_name = "PATH")]
    pub store: Option<String>,

    /// Override the forecast endpoint
    #[arg(long = "forecast-url", value_name = "URL")]
    pub forecast_url: Option<String>,

    /// Disable the geolocation capability
    #[arg(long = "no-location")]
    pub no_location: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(store) = &self.store {
            std::env::set_var("STORE_PATH", store);
        }
        if let Some(url) = &self.forecast_url {
            std::env::set_var("FORECAST_URL", url);
        }
        if self.no_location {
            std::env::set_var("GEOLOCATE_URL", "");
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
