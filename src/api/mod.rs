use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

mod calculators;
mod error;
mod payoff;

pub use error::ValidationError;
pub use payoff::{CliStrategy, DebtArg, PayoffArgs, build_config, render_summary};

use crate::core::affordability::house_affordability;
use crate::core::annuity::annuity_payout;
use crate::core::pension::project_pension;
use crate::core::social_security::estimate_benefit;
use crate::core::va::va_mortgage;
use crate::core::{simulate_payoff, solve_extra_payment};
use calculators::{
    AffordabilityPayload, AnnuityPayload, CreditCardPayload, MortgagePayload, PensionPayload,
    SocialSecurityPayload, VaMortgagePayload,
};
use payoff::{PayoffPayload, PayoffResponse, SolvePayload};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/payoff", post(payoff_handler))
        .route("/api/payoff/solve", post(payoff_solve_handler))
        .route(
            "/api/mortgage",
            get(mortgage_get_handler).post(mortgage_post_handler),
        )
        .route(
            "/api/credit-card",
            get(credit_card_get_handler).post(credit_card_post_handler),
        )
        .route(
            "/api/annuity",
            get(annuity_get_handler).post(annuity_post_handler),
        )
        .route(
            "/api/affordability",
            get(affordability_get_handler).post(affordability_post_handler),
        )
        .route(
            "/api/pension",
            get(pension_get_handler).post(pension_post_handler),
        )
        .route(
            "/api/social-security",
            get(social_security_get_handler).post(social_security_post_handler),
        )
        .route(
            "/api/va-mortgage",
            get(va_mortgage_get_handler).post(va_mortgage_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "calculator HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/health");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn payoff_handler(Json(payload): Json<PayoffPayload>) -> Response {
    let config = match payoff::payoff_args_from_payload(payload).and_then(|a| build_config(&a)) {
        Ok(config) => config,
        Err(err) => return err.into_response(),
    };
    let result = simulate_payoff(&config);
    json_response(StatusCode::OK, PayoffResponse::from(result))
}

async fn payoff_solve_handler(Json(payload): Json<SolvePayload>) -> Response {
    let solved = payoff::solve_request_from_payload(payload).and_then(|request| {
        solve_extra_payment(&request.debts, request.strategy, request.config)
            .map_err(ValidationError::from)
    });
    match solved {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => err.into_response(),
    }
}

fn respond<T: Serialize>(result: Result<T, ValidationError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => err.into_response(),
    }
}

async fn mortgage_get_handler(Query(payload): Query<MortgagePayload>) -> Response {
    respond(calculators::mortgage(payload))
}

async fn mortgage_post_handler(Json(payload): Json<MortgagePayload>) -> Response {
    respond(calculators::mortgage(payload))
}

async fn credit_card_get_handler(Query(payload): Query<CreditCardPayload>) -> Response {
    respond(calculators::credit_card(payload))
}

async fn credit_card_post_handler(Json(payload): Json<CreditCardPayload>) -> Response {
    respond(calculators::credit_card(payload))
}

async fn annuity_get_handler(Query(payload): Query<AnnuityPayload>) -> Response {
    respond(calculators::annuity_inputs(payload).map(|i| annuity_payout(&i)))
}

async fn annuity_post_handler(Json(payload): Json<AnnuityPayload>) -> Response {
    respond(calculators::annuity_inputs(payload).map(|i| annuity_payout(&i)))
}

async fn affordability_get_handler(Query(payload): Query<AffordabilityPayload>) -> Response {
    respond(calculators::affordability_inputs(payload).map(|i| house_affordability(&i)))
}

async fn affordability_post_handler(Json(payload): Json<AffordabilityPayload>) -> Response {
    respond(calculators::affordability_inputs(payload).map(|i| house_affordability(&i)))
}

async fn pension_get_handler(Query(payload): Query<PensionPayload>) -> Response {
    respond(calculators::pension_inputs(payload).map(|i| project_pension(&i)))
}

async fn pension_post_handler(Json(payload): Json<PensionPayload>) -> Response {
    respond(calculators::pension_inputs(payload).map(|i| project_pension(&i)))
}

async fn social_security_get_handler(Query(payload): Query<SocialSecurityPayload>) -> Response {
    respond(calculators::social_security_inputs(payload).map(|i| estimate_benefit(&i)))
}

async fn social_security_post_handler(Json(payload): Json<SocialSecurityPayload>) -> Response {
    respond(calculators::social_security_inputs(payload).map(|i| estimate_benefit(&i)))
}

async fn va_mortgage_get_handler(Query(payload): Query<VaMortgagePayload>) -> Response {
    respond(calculators::va_mortgage_inputs(payload).map(|i| va_mortgage(&i)))
}

async fn va_mortgage_post_handler(Json(payload): Json<VaMortgagePayload>) -> Response {
    respond(calculators::va_mortgage_inputs(payload).map(|i| va_mortgage(&i)))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
