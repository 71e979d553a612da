//! hwpilot CLI — supplies the credentials and prints the progress stream.

use chrono::{DateTime, Utc};
use clap::Parser;
use hwpilot::config::Config;
use hwpilot::config::secrets::ExposeSecret;
use hwpilot::engine::{Observer, TaskRunner, Workflow};
use hwpilot::event::ProgressEvent;
use hwpilot::model::Credentials;
use hwpilot::platform::HttpPlatform;
use hwpilot::telemetry::{TelemetryConfig, init_telemetry};
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hwpilot", about = "Submit the stored answers of a homework assignment")]
struct Cli {
    /// Homework (assignment) id
    #[arg(long)]
    homework_id: String,
    /// X-Access-Token value; falls back to HWPILOT_ACCESS_TOKEN
    #[arg(long)]
    token: Option<String>,
    /// Print progress as JSON lines
    #[arg(long)]
    json: bool,
}

/// Prints each event on stdout as it arrives.
struct ConsoleObserver {
    json: bool,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a ProgressEvent,
}

impl Observer for ConsoleObserver {
    fn on_event(&mut self, event: ProgressEvent) {
        if self.json {
            let line = JsonLine {
                at: Utc::now(),
                event: &event,
            };
            match serde_json::to_string(&line) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("failed to encode event: {e}"),
            }
        } else {
            println!("{event}");
        }
    }

    fn on_complete(&mut self) {
        if !self.json {
            println!("done");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_telemetry(TelemetryConfig {
        default_filter: config.log_level.clone(),
        compact: true,
    })?;

    let token = match cli.token {
        Some(token) => token,
        None => config
            .access_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .unwrap_or_default(),
    };
    let credentials = Credentials::new(cli.homework_id, token);
    let observer = ConsoleObserver { json: cli.json };

    let platform = HttpPlatform::from_config(&config)?;
    let workflow = Workflow::new(Arc::new(platform));

    // Blank credentials are refused by the runner before anything starts.
    if !cli.json && credentials.validate().is_ok() {
        println!("task started");
    }

    // A refused start has already been reported through the observer.
    let Ok(handle) = TaskRunner::new().start(workflow, credentials, observer) else {
        std::process::exit(2);
    };
    handle.wait().await?;
    Ok(())
}
