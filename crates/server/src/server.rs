use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use chrono_tz::Tz;

use std::sync::Arc;

use crate::{attendance, import, records, reports, salary};
use engine::{DEFAULT_TIMEZONE, Engine, InvalidDatePolicy, RecordKind};

/// Request-independent knobs the handlers need.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    /// Zone used for "today" and for timestamps carrying an offset.
    pub timezone: Tz,
    /// Import policy when the request does not pick one.
    pub invalid_date: InvalidDatePolicy,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            invalid_date: InvalidDatePolicy::default(),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub options: ServerOptions,
}

fn record_routes(router: Router<ServerState>, kind: RecordKind) -> Router<ServerState> {
    let base = format!("/{}", kind.table());
    router
        .route(
            &base,
            get(move |state, query| records::list(kind, state, query))
                .post(move |state, body| records::create(kind, state, body)),
        )
        .route(
            &format!("{base}/{{id}}"),
            patch(move |state, id, body| records::update(kind, state, id, body))
                .delete(move |state, id| records::remove(kind, state, id)),
        )
}

pub fn router(state: ServerState) -> Router {
    let router = Router::new();
    let router = record_routes(router, RecordKind::Expense);
    let router = record_routes(router, RecordKind::Income);

    router
        .route(
            "/attendance",
            get(attendance::list).put(attendance::upsert),
        )
        .route("/attendance/{date}", delete(attendance::remove))
        .route("/stats/{month}", get(reports::expense_stats))
        .route("/history", get(reports::history))
        .route("/months/{month}", get(reports::month_detail))
        .route("/calendar/{month}", get(reports::calendar))
        .route("/salary", get(salary::estimate))
        .route("/import", post(import::upload))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        options,
    };

    axum::serve(listener, router(state)).await
}
