use anyhow::Result;
use tracing::{info, Subscriber};
#[cfg(not(feature = "telemetry"))]
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, registry, registry::LookupSpan, EnvFilter, Layer};

#[cfg(feature = "telemetry")]
pub fn build_otel_layer<S>() -> Result<
    tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>,
    opentelemetry::trace::TraceError,
>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    use init_tracing_opentelemetry::{init_propagator, otlp, resource::DetectResource};
    use opentelemetry::{global, trace::TracerProvider};

    let otel_rsrc = DetectResource::default()
        .with_fallback_service_name(env!("CARGO_PKG_NAME"))
        .with_fallback_service_version(env!("CARGO_PKG_VERSION"))
        .build();
    let tracerprovider = otlp::init_tracerprovider(otel_rsrc, otlp::identity)?;
    init_propagator()?;
    let layer = tracing_opentelemetry::layer()
        .with_error_records_to_exceptions(true)
        .with_tracer(tracerprovider.tracer(""));
    global::set_tracer_provider(tracerprovider);
    Ok(layer)
}

/// Compact single line output in debug builds, full output otherwise
pub fn build_logger_text<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if cfg!(debug_assertions) {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_line_number(false)
                .with_thread_names(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
                .event_format(tracing_subscriber::fmt::format().compact()),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true),
        )
    }
}

/// `RUST_LOG` wins over `OTEL_LOG_LEVEL`, `info` is the fallback.
pub fn build_loglevel_filter_layer() -> EnvFilter {
    let base = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("OTEL_LOG_LEVEL"))
        .unwrap_or_else(|_| "info".to_string());
    let directives =
        format!("{base},otel::tracing=trace,otel=debug,axum_tracing_opentelemetry=error");
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(feature = "telemetry")]
pub fn init_telemetry_and_tracing(traces_enabled: bool) -> Result<()> {
    if traces_enabled {
        let subscriber = registry()
            .with(build_otel_layer()?)
            .with(build_loglevel_filter_layer())
            .with(build_logger_text());
        tracing::subscriber::set_global_default(subscriber)?;
        info!("Logging initialized with OpenTelemetry trace export");
    } else {
        let subscriber = registry()
            .with(build_loglevel_filter_layer())
            .with(build_logger_text());
        tracing::subscriber::set_global_default(subscriber)?;
        info!("Logging initialized");
    }
    Ok(())
}

#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry_and_tracing(traces_enabled: bool) -> Result<()> {
    let subscriber = registry()
        .with(build_loglevel_filter_layer())
        .with(build_logger_text());
    tracing::subscriber::set_global_default(subscriber)?;

    if traces_enabled {
        warn!("Trace export requested, but inkpost was built without the `telemetry` feature");
    }
    info!("Logging initialized");
    Ok(())
}
