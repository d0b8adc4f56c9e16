//! The Twilio webhook server.
//!
//! One route does the work: Twilio POSTs each inbound WhatsApp message as a
//! form, the engine produces the reply, and the response body is the TwiML
//! envelope Twilio relays back to the sender.

use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use quipu_channels::{strip_channel_prefix, twiml_reply};
use quipu_core::config::ServerConfig;
use quipu_engine::Engine;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// The subset of Twilio's webhook form we read.
#[derive(Debug, Deserialize)]
struct InboundForm {
    #[serde(rename = "From", default)]
    from: String,
    #[serde(rename = "Body", default)]
    body: String,
}

/// `GET /` — liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// `POST /twilio` — inbound message webhook.
async fn inbound(
    State(engine): State<Arc<Engine>>,
    Form(form): Form<InboundForm>,
) -> impl IntoResponse {
    let phone = strip_channel_prefix(&form.from);
    let reply = engine.handle_message(&phone, &form.body).await;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/xml")],
        twiml_reply(&reply),
    )
}

fn build_router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/twilio", post(inbound))
        .with_state(engine)
}

/// Bind and serve until the process is stopped.
pub async fn serve(engine: Engine, config: &ServerConfig) -> anyhow::Result<()> {
    let app = build_router(Arc::new(engine));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("webhook server listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
