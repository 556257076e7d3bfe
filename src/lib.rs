//! A JSON API for tracking the housing-maintenance expenses of a property
//! management company.
//!
//! The company manages buildings ("objects"). Its spending is recorded as
//! bills (invoices paid without cash) and checks (cash receipts from
//! employees), each with line items and grouped into spending groups. Deposits
//! record cash handed to employees. Reports summarize the monthly
//! current-repair costs of a building and the company's overall expenses.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod bill;
mod check;
mod cors;
mod database_id;
mod db;
mod deposit;
mod endpoints;
mod error;
mod extract;
mod line_item;
mod logging;
mod object;
mod report;
mod routing;
mod spending_group;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_CASHBOX_USER_ID};
pub use cors::build_cors_layer;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
