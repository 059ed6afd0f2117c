use crate::cli::ServeArgs;
use crate::infra::{load_service, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use school_ratings::config::AppConfig;
use school_ratings::error::AppError;
use school_ratings::rating_router;
use school_ratings::refresh::spawn_refresh_loop;
use school_ratings::telemetry::{self, LogSink};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Stdout)?;

    let service = load_service(&config, args.data_dir.take())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.refresh.enabled {
        info!(
            interval_secs = config.refresh.interval_secs,
            staleness_days = config.refresh.staleness_days,
            "background rating refresh enabled"
        );
        spawn_refresh_loop(service.driver(), config.refresh.interval());
    } else {
        info!("background rating refresh disabled");
    }

    let app = with_operational_routes(rating_router(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "school ratings service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
