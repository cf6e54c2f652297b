//! HTTP surface for cut-off lookups.
//!
//! `GET /getCutOff` answers every date two or more days ahead from the
//! `after_tomorrow` reading, since the reference data tracks only three days.

use crate::core::config::ServerConfig;
use crate::core::resolver::{CutOffResult, LookupError, Resolver};
use crate::core::table::is_currency_code;
use crate::store::{ReferenceStore, build_table};
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct AppState {
    resolver: Arc<Resolver>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Serialize)]
pub struct Pong {
    message: &'static str,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    loc: [&'static str; 2],
    msg: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl FieldError {
    fn missing(field: &'static str) -> Self {
        FieldError {
            loc: ["query", field],
            msg: "field required",
            kind: "value_error.missing",
        }
    }

    fn currency_code(field: &'static str) -> Self {
        FieldError {
            loc: ["query", field],
            msg: "ensure this value is exactly 3 uppercase letters",
            kind: "value_error.currency_code",
        }
    }

    fn repeated(field: &'static str) -> Self {
        FieldError {
            loc: ["query", field],
            msg: "field given more than once",
            kind: "value_error.repeated",
        }
    }

    fn date(field: &'static str) -> Self {
        FieldError {
            loc: ["query", field],
            msg: "invalid date format",
            kind: "value_error.date",
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Malformed(Vec<FieldError>),
    Lookup(LookupError),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::Lookup(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Malformed(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))).into_response()
            }
            ApiError::Lookup(err) => {
                let status = match err {
                    LookupError::CurrencyNotFound { .. } => StatusCode::NOT_FOUND,
                    LookupError::PastDate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, Json(json!({ "detail": err.to_string() }))).into_response()
            }
        }
    }
}

struct ValidQuery {
    currency_a: String,
    currency_b: String,
    date: NaiveDate,
}

/// Query fields collected from the raw pairs, so repeated keys are reported
/// per field instead of failing the whole extraction.
struct CutOffParams {
    pairs: Vec<(String, String)>,
}

impl CutOffParams {
    fn field(&self, name: &'static str, errors: &mut Vec<FieldError>) -> Option<&str> {
        let mut values = self
            .pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str());
        match (values.next(), values.next()) {
            (None, _) => {
                errors.push(FieldError::missing(name));
                None
            }
            (Some(_), Some(_)) => {
                errors.push(FieldError::repeated(name));
                None
            }
            (Some(value), None) => Some(value),
        }
    }

    fn currency(&self, name: &'static str, errors: &mut Vec<FieldError>) -> Option<String> {
        let value = self.field(name, errors)?;
        if is_currency_code(value) {
            Some(value.to_string())
        } else {
            errors.push(FieldError::currency_code(name));
            None
        }
    }

    fn validate(self) -> Result<ValidQuery, ApiError> {
        let mut errors = Vec::new();
        let currency_a = self.currency("currency_a", &mut errors);
        let currency_b = self.currency("currency_b", &mut errors);
        let date = self.field("date", &mut errors).and_then(|value| {
            match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(FieldError::date("date"));
                    None
                }
            }
        });

        match (currency_a, currency_b, date) {
            (Some(currency_a), Some(currency_b), Some(date)) if errors.is_empty() => Ok(ValidQuery {
                currency_a,
                currency_b,
                date,
            }),
            _ => Err(ApiError::Malformed(errors)),
        }
    }
}

async fn root() -> Json<&'static str> {
    Json("Welcome to the cut-off time API!")
}

async fn ping() -> Json<Pong> {
    Json(Pong { message: "pong" })
}

async fn get_cut_off(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CutOffResult>, ApiError> {
    let query = CutOffParams { pairs }.validate()?;
    debug!(
        currency_a = %query.currency_a,
        currency_b = %query.currency_b,
        date = %query.date,
        "Cut-off request"
    );
    let result = state
        .resolver
        .resolve_on(
            &query.currency_a,
            &query.currency_b,
            query.date,
            (state.today)(),
        )?;
    Ok(Json(result))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn router(resolver: Arc<Resolver>, cors_origins: &[String]) -> Router {
    router_with_clock(resolver, cors_origins, local_today)
}

/// Like [`router`], with `today` supplying the date past requests are judged
/// against.
pub fn router_with_clock(
    resolver: Arc<Resolver>,
    cors_origins: &[String],
    today: fn() -> NaiveDate,
) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/getCutOff", get(get_cut_off))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { resolver, today })
}

/// Rebuilds the table from `store` every `interval` and publishes it. A
/// failed rebuild keeps the current table.
pub fn spawn_reload(
    resolver: Arc<Resolver>,
    store: Arc<dyn ReferenceStore>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match build_table(store.as_ref()).await {
                Ok(table) => resolver.publish(table),
                Err(e) => warn!(error = %format!("{e:#}"), "Reload failed, keeping current table"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

pub async fn serve(
    config: &ServerConfig,
    resolver: Arc<Resolver>,
    store: Arc<dyn ReferenceStore>,
) -> Result<()> {
    let reload = (config.reload_interval_secs > 0).then(|| {
        info!(
            "Reloading reference data every {}s",
            config.reload_interval_secs
        );
        spawn_reload(
            Arc::clone(&resolver),
            store,
            Duration::from_secs(config.reload_interval_secs),
        )
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, router(resolver, &config.cors_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(handle) = reload {
        handle.abort();
    }
    Ok(())
}
