use axum::http::StatusCode;
use random_server::{
    catalog::ErrorCatalog, decider::ErrorRate, logging::RequestLogLayer, responder::Responder,
    server,
};
use tokio::net::TcpListener;

static STATUSES: [StatusCode; 2] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::SERVICE_UNAVAILABLE,
];
static DETAILS: [&str; 2] = ["rate limited", "try again later"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Throttle half of the requests instead of using the default catalog.
    let catalog = ErrorCatalog::new(&STATUSES, &DETAILS).ok_or("invalid catalog")?;
    let responder = Responder::new(ErrorRate::new(0.5)?).catalog(catalog);

    // Start the axum server.
    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    server::serve(listener, server::app(responder, RequestLogLayer::new())).await?;

    Ok(())
}
