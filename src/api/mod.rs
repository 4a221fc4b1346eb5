use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{ProjectionInput, ProjectionResult, run_projection};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    transactions_per_month: Option<u32>,
    #[serde(alias = "roundUpAmount", alias = "round_up_nearest")]
    round_up_nearest: Option<f64>,
    months: Option<u32>,
    #[serde(alias = "annualGrowthRate", alias = "annual_growth")]
    annual_growth: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "cryptoround",
    about = "Round-up investing simulator (spare-change contributions + monthly compounding)"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 30,
        help = "Simulated card transactions per month"
    )]
    transactions_per_month: u32,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Currency unit transactions are rounded up to; average round-up is half of this"
    )]
    round_up_nearest: f64,
    #[arg(long, default_value_t = 12, help = "Projection horizon in months")]
    months: u32,
    #[arg(
        long,
        default_value_t = 15.0,
        help = "Expected nominal annual growth in percent, e.g. 15"
    )]
    annual_growth_rate: f64,
}

const MAX_HORIZON_MONTHS: u32 = 1_200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    months: Vec<u32>,
    values: Vec<f64>,
    monthly_contribution: f64,
    total_invested: f64,
    projected_value: f64,
    round_ups: u64,
    /// Rounded percent growth over contributions; null when nothing was
    /// contributed.
    growth_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<ProjectionInput, String> {
    if !cli.round_up_nearest.is_finite() || cli.round_up_nearest <= 0.0 {
        return Err("--round-up-nearest must be a finite value > 0".to_string());
    }

    if !cli.annual_growth_rate.is_finite() || cli.annual_growth_rate < 0.0 {
        return Err("--annual-growth-rate must be a finite value >= 0".to_string());
    }

    if cli.months > MAX_HORIZON_MONTHS {
        return Err(format!("--months must be <= {MAX_HORIZON_MONTHS}"));
    }

    Ok(ProjectionInput {
        transactions_per_month: cli.transactions_per_month,
        round_up_nearest: cli.round_up_nearest,
        horizon_months: cli.months,
        annual_growth_rate: cli.annual_growth_rate / 100.0,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("CryptoRound simulator listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let result = run_projection(&inputs);
    json_response(StatusCode::OK, build_simulate_response(result))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<ProjectionInput, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: SimulatePayload) -> Result<ProjectionInput, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.transactions_per_month {
        cli.transactions_per_month = v;
    }
    if let Some(v) = payload.round_up_nearest {
        cli.round_up_nearest = v;
    }
    if let Some(v) = payload.months {
        cli.months = v;
    }
    if let Some(v) = payload.annual_growth {
        cli.annual_growth_rate = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        transactions_per_month: 30,
        round_up_nearest: 10.0,
        months: 12,
        annual_growth_rate: 15.0,
    }
}

fn build_simulate_response(result: ProjectionResult) -> SimulateResponse {
    SimulateResponse {
        growth_percent: result.growth_ratio().map(|ratio| (ratio * 100.0).round()),
        months: result.months,
        values: result.balances,
        monthly_contribution: result.monthly_contribution,
        total_invested: result.total_contributed,
        projected_value: result.projected_value,
        round_ups: result.round_up_events,
    }
}
