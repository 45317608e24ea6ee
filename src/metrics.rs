use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether metrics are recorded. Off until [`init_metrics`] turns it on.
pub fn is_observability_enabled() -> bool {
    OBSERVABILITY_ENABLED.get().copied().unwrap_or(false)
}

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled.
pub fn init_metrics(enabled: bool) -> anyhow::Result<Option<PrometheusHandle>> {
    let enabled = *OBSERVABILITY_ENABLED.get_or_init(|| enabled);
    if !enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )
        .context("Failed to set histogram buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for the separate metrics listener.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("admin_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("admin_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason.to_string()).increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

pub fn track_admission_submitted() {
    if !is_observability_enabled() {
        return;
    }
    counter!("admissions_submitted_total").increment(1);
}

/// `decision` is the status the admission moved to.
pub fn track_admission_decided(decision: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("admissions_decided_total", "decision" => decision.to_string()).increment(1);
}

pub fn track_fee_record_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("fee_records_created_total").increment(1);
}

pub fn track_payment_recorded(mode: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("payments_recorded_total", "mode" => mode.to_string()).increment(1);
}

pub fn track_payment_verification_failure() {
    if !is_observability_enabled() {
        return;
    }
    counter!("payment_verification_failures_total").increment(1);
}

pub fn track_side_effect_dispatched(kind: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("side_effects_dispatched_total", "kind" => kind).increment(1);
}

pub fn track_side_effect_failed(kind: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("side_effects_failed_total", "kind" => kind).increment(1);
}

pub fn track_side_effect_dropped(kind: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("side_effects_dropped_total", "kind" => kind).increment(1);
}
