use std::process::ExitCode;
use tokio::net::TcpListener;

use random_server::{error::ServerError, server, settings::Settings, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("could not load settings: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = telemetry::init_tracing(&settings) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = run(settings).await {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(settings: Settings) -> Result<(), ServerError> {
    let rate = settings.error_rate()?;
    tracing::info!(
        random_error_rate = rate.get(),
        listen_address = %settings.listen_address,
        metrics_enabled = settings.metrics_enabled,
        "settings loaded"
    );

    telemetry::init_metrics(&settings)?;

    let listener = TcpListener::bind(settings.listen_addr()?).await?;
    server::serve(listener, server::router(rate)).await
}
