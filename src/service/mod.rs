use crate::location::Coords;
use crate::lookup::AdminLookup;
use actix_web::dev::Service as _;
use actix_web::{error, get, web, App, HttpServer, Responder, Result};
use futures_util::future::FutureExt;
use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;
use tracing_actix_web::TracingLogger;

lazy_static! {
    static ref RESPONSE_CODE_COLLECTOR: IntCounterVec = register_int_counter_vec!(
        Opts::new("http_requests_total", "Total Requests"),
        &["code", "method", "route"],
    )
    .unwrap();
    static ref RESPONSE_TIME_COLLECTOR: HistogramVec = register_histogram_vec!(
        HistogramOpts::new("http_request_duration_seconds", "Response Times"),
        &["code", "method", "route"]
    )
    .unwrap();
}

type AppState = Arc<AdminLookup>;

#[derive(Deserialize)]
pub struct LocateQuery {
    loc: String,
}

/// `?loc=lng,lat` -> candidates per admin level.
#[get("/locate")]
pub async fn locate(
    info: web::Query<LocateQuery>,
    state: web::Data<AppState>,
) -> Result<impl Responder> {
    let coords: Coords = info.loc.parse().map_err(error::ErrorBadRequest)?;
    let result = state
        .lookup(coords)
        .await
        .map_err(error::ErrorServiceUnavailable)?;
    Ok(web::Json(result))
}

#[get("/health")]
async fn health() -> &'static str {
    "Ok"
}

#[get("/metrics")]
async fn metrics() -> Result<String> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .map_err(error::ErrorInternalServerError)
}

fn track_metrics(code: u16, method: &str, route: &str, time: f64) {
    // dos protection
    if route != "/locate" && route != "/health" {
        return;
    }

    let normalized_code = match code {
        200..=299 => "2XX",
        300..=399 => "3XX",
        400..=499 => "4XX",
        500..=599 => "5XX",
        _ => "invalid",
    };

    RESPONSE_CODE_COLLECTOR
        .with_label_values(&[normalized_code, method, route])
        .inc();

    RESPONSE_TIME_COLLECTOR
        .with_label_values(&[normalized_code, method, route])
        .observe(time);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(locate).service(metrics);
}

pub async fn start(lookup: AppState, port: u16) -> std::io::Result<()> {
    info!(port, "starting http service");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(lookup.clone()))
            .wrap(TracingLogger::default())
            .wrap_fn(|req, srv| {
                let path = String::from(req.path());
                let method = String::from(req.method().as_str());
                let offset = OffsetDateTime::now_utc();
                srv.call(req).map(move |res| {
                    let time = OffsetDateTime::now_utc() - offset;
                    if let Ok(ref res) = res {
                        let status = res.response().status();
                        track_metrics(status.into(), &method, &path, time.as_seconds_f64());
                    }
                    res
                })
            })
            .configure(configure)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupConfig;
    use crate::index::tests::get_test_boundaries;
    use crate::placetype::Placetype;
    use crate::resolver::{Candidate, LookupResult};
    use actix_web::http::StatusCode;
    use actix_web::test;

    async fn lookup(dir: &std::path::Path) -> AppState {
        let mut config = LookupConfig::new(dir);
        config.layers = vec![Placetype::Locality];
        let lookup = AdminLookup::start(&config, Arc::new(get_test_boundaries()))
            .await
            .unwrap();
        Arc::new(lookup)
    }

    #[actix_web::test]
    async fn locates_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lookup(dir.path()).await))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/locate?loc=0.5,0.5")
            .to_request();
        let result: LookupResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            result,
            LookupResult::new().with(Placetype::Locality, vec![Candidate::new(4, "locality 4")])
        );

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn rejects_malformed_locations() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lookup(dir.path()).await))
                .configure(configure),
        )
        .await;

        for uri in ["/locate?loc=8.8", "/locate?loc=a,b", "/locate?loc=200,10"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }
}
