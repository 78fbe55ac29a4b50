//! FlightPanel CLI - track one flight and render its status.
//!
//! Loads configuration and credentials, wires the provider clients into
//! the poll loop and runs until terminated. Configuration or credential
//! problems are fatal before the first tick.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Parser;

use flightpanel::airports::AirportIndex;
use flightpanel::budget::{BudgetTracker, UsageState};
use flightpanel::config::{
    config_file_path, credentials_file_path, ConfigFile, Credentials,
};
use flightpanel::display::ConsoleDisplay;
use flightpanel::logging::{default_log_dir, default_log_file, init_logging};
use flightpanel::orchestrator::QueryOrchestrator;
use flightpanel::provider::{
    AeroApiClient, AsyncReqwestClient, OpenSkyClient, OpenWeatherClient,
};
use flightpanel::status::FlightQuery;
use flightpanel::tracker::FlightTracker;
use flightpanel::window::OperationalWindow;

#[derive(Parser)]
#[command(name = "flightpanel")]
#[command(about = "Track a single flight and render its status for a small display", long_about = None)]
#[command(version = flightpanel::VERSION)]
struct Args {
    /// Config file path (default: ~/.flightpanel/config.ini)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Credentials file path (default: ~/.flightpanel/credentials.json)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Flight number to track, overriding the config file
    #[arg(long)]
    flight: Option<String>,

    /// Run a single poll tick and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging regardless of RUST_LOG
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Configuration and credentials are fatal to get wrong; report and
    // exit before anything else starts.
    let config_path = args.config.unwrap_or_else(config_file_path);
    let config = match ConfigFile::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };

    let ident = args
        .flight
        .map(|f| f.trim().to_uppercase())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| config.flight.ident.clone());
    if ident.is_empty() {
        eprintln!("Error: no flight configured. Use --flight or set [flight] number in config.ini");
        process::exit(1);
    }

    let credentials_path = args.credentials.unwrap_or_else(credentials_file_path);
    let credentials = match Credentials::load(&credentials_path) {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("Error loading credentials: {}", e);
            process::exit(1);
        }
    };

    let _logging = match init_logging(default_log_dir(), default_log_file(), args.debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(version = flightpanel::VERSION, flight = %ident, "flightpanel starting");

    let airports = match AirportIndex::load(&config.data.airports_file) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error loading airport index: {}", e);
            process::exit(1);
        }
    };

    let http = match AsyncReqwestClient::with_timeout(config.poll.request_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            process::exit(1);
        }
    };

    let position = OpenSkyClient::new(
        http.clone(),
        credentials.client_id,
        credentials.client_secret,
        config.providers.position_token_url.clone(),
        config.providers.position_states_url.clone(),
    );
    let schedule = AeroApiClient::new(
        http.clone(),
        credentials.schedule_api_key,
        config.providers.schedule_flights_url.clone(),
    );
    let weather = OpenWeatherClient::new(
        http,
        credentials.weather_api_key,
        config.providers.weather_url.clone(),
    );

    let orchestrator = QueryOrchestrator::new(
        position,
        schedule,
        weather,
        airports,
        Duration::from_secs(config.poll.request_timeout_secs),
    );

    let now = Utc::now();
    let mut budget = BudgetTracker::new(&config.budget, now);
    if let Some(state) = UsageState::load(&config.data.usage_file) {
        budget.restore(&state, now);
        tracing::info!("restored persisted budget usage");
    }

    let window = OperationalWindow::new(
        config.window.start,
        config.window.end,
        &config.window.days,
    );

    let mut query = FlightQuery::new(ident.clone());
    if let Some(date) = config.flight.date {
        query = query.with_date(date);
    }

    let display = ConsoleDisplay::new(ident, config.display.time_format);

    let mut tracker = FlightTracker::new(
        query,
        orchestrator,
        budget,
        window,
        display,
        Duration::from_secs(config.poll.interval_secs),
    )
    .with_usage_path(config.data.usage_file.clone());

    if args.once {
        let mode = tracker.tick(Utc::now(), Local::now().naive_local()).await;
        tracing::info!(mode = ?mode, "single tick complete");
        return;
    }

    tracker.run().await;
}
