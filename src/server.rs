//! HTTP server wiring.
//!
//! Every path and method falls through to the [`Responder`], wrapped in a
//! [`RequestLogLayer`].

use axum::Router;
use rand::Rng;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;

use crate::{
    decider::{Decider, ErrorRate},
    error::ServerError,
    logging::{LogSink, RequestLogLayer},
    responder::Responder,
};

/// Catch-all router failing requests at `rate`, logging through `tracing`.
pub fn router(rate: ErrorRate) -> Router {
    app(Responder::new(rate), RequestLogLayer::new())
}

/// Catch-all router from a custom responder and log layer.
pub fn app<D, R, K>(responder: Responder<D, R>, logger: RequestLogLayer<K>) -> Router
where
    D: Decider + Clone + Send + Sync + 'static,
    R: Rng + Send + 'static,
    K: LogSink + Clone + Send + Sync + 'static,
{
    let service = ServiceBuilder::new().layer(logger).service(responder);
    Router::new().fallback_service(service)
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
