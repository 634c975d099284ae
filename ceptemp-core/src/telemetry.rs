//! Tracing setup and W3C trace-context propagation across the internal
//! service hop.
//!
//! Spans are exported over OTLP/gRPC when a collector endpoint is
//! configured; without one, only the fmt subscriber is installed and the
//! propagation helpers degrade to no-ops on injection.

use anyhow::{Context as _, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::{
    Context, KeyValue, global,
    propagation::{Extractor, Injector},
    trace::TracerProvider as _,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, propagation::TraceContextPropagator, trace::SdkTracerProvider,
};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// W3C Trace Context header name.
pub const TRACEPARENT: &str = "traceparent";

/// Install the global subscriber and, when `otlp_endpoint` is set, the
/// OTLP span exporter. Returns the provider so the caller can shut it
/// down and flush pending spans.
pub fn init(service_name: &str, otlp_endpoint: Option<&str>) -> Result<Option<SdkTracerProvider>> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .context("Failed to build OTLP span exporter")?;

            let resource = Resource::builder_empty()
                .with_attributes([KeyValue::new("service.name", service_name.to_string())])
                .build();

            let provider = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(resource)
                .build();
            global::set_tracer_provider(provider.clone());

            let tracer = provider.tracer("ceptemp");
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_opentelemetry::OpenTelemetryLayer::new(tracer))
                .init();

            tracing::info!(%endpoint, service_name, "span export enabled");
            Ok(Some(provider))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            Ok(None)
        }
    }
}

/// Adapter injecting W3C Trace Context into HTTP headers.
struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes())
            && let Ok(val) = HeaderValue::from_str(&value)
        {
            self.0.insert(name, val);
        }
    }
}

/// Adapter extracting W3C Trace Context from HTTP headers.
struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Inject the current span's trace context into outbound request headers.
pub fn inject_context(headers: &mut HeaderMap) {
    let cx = Span::current().context();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderInjector(headers));
    });
}

/// Extract an inbound trace context and set it as `span`'s parent, joining
/// this hop into the caller's trace. Also records the trace id on the span
/// (when it declares a `trace_id` field) for log correlation.
pub fn extract_parent(span: &Span, headers: &HeaderMap) {
    let parent = extract_context(headers);
    let _ = span.set_parent(parent);

    if let Some(traceparent) = headers.get(TRACEPARENT).and_then(|v| v.to_str().ok())
        && let Some(trace_id) = parse_trace_id(traceparent)
    {
        span.record("trace_id", trace_id);
    }
}

fn extract_context(headers: &HeaderMap) -> Context {
    global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(headers)))
}

/// Parse the trace id out of a `traceparent` value
/// (`00-{trace_id}-{span_id}-{flags}`), for log correlation.
pub fn parse_trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(_), Some(_)) => Some(trace_id),
        _ => None,
    }
}
