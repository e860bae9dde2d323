// SPDX-License-Identifier: MIT
//! Bridge from `tracing` events to OpenTelemetry log records.
//!
//! [`LogBridge`] owns one logger obtained from the pipeline; [`LogBridge::layer`] returns a
//! [`tracing_subscriber::Layer`] that forwards every event through it. Per event the layer:
//!
//! 1. drops events from [`ReservedNamespaces`] (the telemetry stack's own crates), so export
//!    failures logged by the transport never turn into more telemetry;
//! 2. drops events without a (trimmed) message;
//! 3. maps the level to a [`LogSeverity`];
//! 4. attaches `logger.name`, `thread.name`, every non-empty span/event field as
//!    `log.context.<key>`, and `exception.type` / `exception.message` when present;
//! 5. correlates the record with a trace, preferring ids found in fields over the ambient
//!    OpenTelemetry context (see [`correlation`]);
//! 6. emits the record.
//!
//! Emission is best effort. Any panic raised while building or emitting a record is caught
//! at the layer boundary and the record is dropped; the logging call site never sees it.
//! The panic still runs the process panic hook, so the default hook prints it to stderr.
//! Hosts that need a silent stderr install their own hook with [`std::panic::set_hook`].
//!
//! ```no_run
//! use beacon_telemetry::bridge::LogBridge;
//! use beacon_telemetry::pipeline::PipelineRegistry;
//! use beacon_telemetry::TelemetryConfig;
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PipelineRegistry::global().initialize(TelemetryConfig::from_env())?;
//! let bridge = LogBridge::attach(&pipeline);
//! tracing_subscriber::registry().with(bridge.layer()).try_init()?;
//!
//! tracing::info!(order_id = 42, "order placed");
//!
//! bridge.detach();
//! pipeline.shutdown();
//! # Ok(()) }
//! ```
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use opentelemetry::logs::{AnyValue, LogRecord as _, Logger};
use opentelemetry_sdk::logs::SdkLogger;
use thiserror::Error;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::{LookupSpan, SpanRef};

use crate::pipeline::Pipeline;

pub mod correlation;
mod fields;
mod severity;

use fields::{EventFields, FieldMap, SpanFields};
pub use severity::LogSeverity;

/// Instrumentation scope of the logger used by [`LogBridge::attach`].
pub const BRIDGE_SCOPE: &str = "beacon-telemetry-log-bridge";

/// Prefix applied to span and event field names so they cannot collide with
/// reserved attribute names.
pub const CONTEXT_ATTRIBUTE_PREFIX: &str = "log.context.";

pub const LOGGER_NAME_KEY: &str = "logger.name";
pub const THREAD_NAME_KEY: &str = "thread.name";
pub const EXCEPTION_TYPE_KEY: &str = "exception.type";
pub const EXCEPTION_MESSAGE_KEY: &str = "exception.message";

/// Target prefixes dropped by default: the OpenTelemetry crates, their HTTP transport
/// and this crate.
pub const DEFAULT_RESERVED_NAMESPACES: [&str; 7] = [
    "opentelemetry",
    "tracing_opentelemetry",
    "reqwest",
    "hyper",
    "h2::",
    "tower",
    "beacon_telemetry",
];

/// Event targets the bridge never forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNamespaces {
    prefixes: Vec<Cow<'static, str>>,
}

impl Default for ReservedNamespaces {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_NAMESPACES)
    }
}

impl ReservedNamespaces {
    pub fn new<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Cow<'static, str>>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Add another reserved prefix.
    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(|p| p.as_ref())
    }

    pub fn is_reserved(&self, target: &str) -> bool {
        self.prefixes().any(|prefix| target.starts_with(prefix))
    }
}

/// Failure while turning one event into a record. Never leaves the layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum EmitError {
    #[error("log record emission panicked: {0}")]
    Panicked(String),
}

impl EmitError {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        EmitError::Panicked(message)
    }
}

struct BridgeState<L> {
    logger: L,
    attached: AtomicBool,
    reserved: ReservedNamespaces,
}

/// One bridged event, fully extracted from `tracing`.
struct BridgedEvent {
    target: &'static str,
    severity: LogSeverity,
    message: String,
    context: FieldMap,
    exception_type: Option<String>,
    exception_message: Option<String>,
}

fn thread_name() -> String {
    let thread = std::thread::current();
    thread
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{:?}", thread.id()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn store_span_fields<S>(span: &SpanRef<'_, S>, record: impl FnOnce(&mut SpanFields))
where
    S: for<'a> LookupSpan<'a>,
{
    let mut extensions = span.extensions_mut();
    if let Some(fields) = extensions.get_mut::<SpanFields>() {
        record(fields);
        return;
    }
    let mut fields = SpanFields::default();
    record(&mut fields);
    extensions.insert(fields);
}

impl<L: Logger> BridgeState<L> {
    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// The single boundary where emission failures are consumed.
    fn try_forward<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> Result<(), EmitError>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        panic::catch_unwind(AssertUnwindSafe(|| {
            if let Some(bridged) = self.extract(event, ctx) {
                self.emit(bridged);
            }
        }))
        .map_err(EmitError::from_panic)
    }

    fn extract<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> Option<BridgedEvent>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let metadata = event.metadata();
        let target = metadata.target();
        if self.reserved.is_reserved(target) {
            return None;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);
        let message = non_empty(fields.message.take())?;

        let mut context = FieldMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(span_fields) = span.extensions().get::<SpanFields>() {
                    context.extend(span_fields.0.clone());
                }
            }
        }
        context.extend(fields.fields);

        Some(BridgedEvent {
            target,
            severity: LogSeverity::from_level(metadata.level()),
            message,
            context,
            exception_type: non_empty(fields.exception_type),
            exception_message: non_empty(fields.exception_message),
        })
    }

    fn emit(&self, event: BridgedEvent) {
        let mut record = self.logger.create_log_record();
        let now = SystemTime::now();
        record.set_timestamp(now);
        record.set_observed_timestamp(now);
        record.set_target(event.target);
        record.set_severity_number(event.severity.to_otel());
        record.set_severity_text(event.severity.as_str());
        record.set_body(AnyValue::from(event.message));

        record.add_attribute(LOGGER_NAME_KEY, event.target);
        record.add_attribute(THREAD_NAME_KEY, thread_name());
        for (key, value) in &event.context {
            let (key, value) = (key.trim(), value.trim());
            if !key.is_empty() && !value.is_empty() {
                record.add_attribute(format!("{CONTEXT_ATTRIBUTE_PREFIX}{key}"), value.to_string());
            }
        }
        if let Some(exception_type) = event.exception_type {
            record.add_attribute(EXCEPTION_TYPE_KEY, exception_type);
        }
        if let Some(exception_message) = event.exception_message {
            record.add_attribute(EXCEPTION_MESSAGE_KEY, exception_message);
        }

        if let Some(span_context) = correlation::resolve(&event.context) {
            record.set_trace_context(
                span_context.trace_id(),
                span_context.span_id(),
                Some(span_context.trace_flags()),
            );
        }

        self.logger.emit(record);
    }
}

/// Adapter forwarding `tracing` events to an OpenTelemetry logger.
///
/// Clones share the same attach state.
pub struct LogBridge<L = SdkLogger> {
    state: Arc<BridgeState<L>>,
}

impl<L> Clone for LogBridge<L> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<L> fmt::Debug for LogBridge<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBridge")
            .field("attached", &self.state.attached.load(Ordering::Acquire))
            .field("reserved", &self.state.reserved)
            .finish()
    }
}

impl LogBridge<SdkLogger> {
    /// Bridge into `pipeline`'s logger, bound to [`BRIDGE_SCOPE`].
    pub fn attach(pipeline: &Pipeline) -> Self {
        Self::new(pipeline.logger(BRIDGE_SCOPE))
    }
}

impl<L> LogBridge<L>
where
    L: Logger + Send + Sync + 'static,
{
    pub fn new(logger: L) -> Self {
        Self::with_reserved_namespaces(logger, ReservedNamespaces::default())
    }

    pub fn with_reserved_namespaces(logger: L, reserved: ReservedNamespaces) -> Self {
        Self {
            state: Arc::new(BridgeState {
                logger,
                attached: AtomicBool::new(true),
                reserved,
            }),
        }
    }

    /// Layer to compose into the host subscriber.
    pub fn layer(&self) -> LogBridgeLayer<L> {
        LogBridgeLayer {
            state: Arc::clone(&self.state),
        }
    }

    /// Stop forwarding. Events delivered afterwards are ignored.
    pub fn detach(&self) {
        self.state.attached.store(false, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    pub fn reserved_namespaces(&self) -> &ReservedNamespaces {
        &self.state.reserved
    }
}

/// [`Layer`] half of a [`LogBridge`].
pub struct LogBridgeLayer<L = SdkLogger> {
    state: Arc<BridgeState<L>>,
}

impl<S, L> Layer<S> for LogBridgeLayer<L>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    L: Logger + Send + Sync + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if !self.state.is_attached() {
            return;
        }
        if let Some(span) = ctx.span(id) {
            store_span_fields(&span, |fields| attrs.record(fields));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if !self.state.is_attached() {
            return;
        }
        if let Some(span) = ctx.span(id) {
            store_span_fields(&span, |fields| values.record(fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if !self.state.is_attached() {
            return;
        }
        // Dropping the error is the contract: telemetry never disturbs the caller.
        let _ = self.state.try_forward(event, &ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::logs::{LoggerProvider as _, Severity};
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };
    use opentelemetry_sdk::logs::{InMemoryLogExporter, SdkLogRecord, SdkLoggerProvider};
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use tracing::{debug, error, info, info_span, trace, warn};
    use tracing_subscriber::layer::SubscriberExt;

    const TRACE: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
    const SPAN: &str = "00f067aa0ba902b7";

    struct Harness {
        exporter: InMemoryLogExporter,
        _provider: SdkLoggerProvider,
        bridge: LogBridge<SdkLogger>,
    }

    impl Harness {
        fn new() -> Self {
            let exporter = InMemoryLogExporter::default();
            let provider = SdkLoggerProvider::builder()
                .with_simple_exporter(exporter.clone())
                .build();
            let bridge = LogBridge::new(provider.logger("bridge-test"));
            Self {
                exporter,
                _provider: provider,
                bridge,
            }
        }

        fn run(&self, f: impl FnOnce()) {
            let subscriber = tracing_subscriber::registry().with(self.bridge.layer());
            tracing::subscriber::with_default(subscriber, f);
        }

        fn records(&self) -> Vec<SdkLogRecord> {
            self.exporter
                .get_emitted_logs()
                .unwrap()
                .into_iter()
                .map(|log| log.record)
                .collect()
        }

        fn single(&self) -> SdkLogRecord {
            let mut records = self.records();
            assert_eq!(records.len(), 1, "expected exactly one record");
            records.remove(0)
        }
    }

    fn attr(record: &SdkLogRecord, key: &str) -> Option<String> {
        record
            .attributes_iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| match v {
                AnyValue::String(s) => s.as_str().to_string(),
                other => format!("{other:?}"),
            })
    }

    fn context_keys(record: &SdkLogRecord) -> Vec<String> {
        record
            .attributes_iter()
            .map(|(k, _)| k.as_str().to_string())
            .filter(|k| k.starts_with(CONTEXT_ATTRIBUTE_PREFIX))
            .collect()
    }

    #[test]
    fn emits_record_with_core_attributes() {
        let h = Harness::new();
        h.run(|| info!(target: "app::orders", "  order placed  "));

        let record = h.single();
        assert_eq!(record.body(), Some(&AnyValue::from("order placed")));
        assert_eq!(record.severity_number(), Some(Severity::Info));
        assert_eq!(record.severity_text(), Some("INFO"));
        assert_eq!(record.target().map(|t| t.as_ref()), Some("app::orders"));
        assert_eq!(attr(&record, LOGGER_NAME_KEY).as_deref(), Some("app::orders"));
        assert!(attr(&record, THREAD_NAME_KEY).is_some_and(|name| !name.is_empty()));
        assert!(record.timestamp().is_some());
    }

    #[test]
    fn severity_follows_level() {
        let h = Harness::new();
        h.run(|| {
            trace!(target: "app", "t");
            debug!(target: "app", "d");
            info!(target: "app", "i");
            warn!(target: "app", "w");
            error!(target: "app", "e");
        });

        let severities: Vec<_> = h.records().iter().map(|r| r.severity_number()).collect();
        assert_eq!(
            severities,
            [
                Some(Severity::Trace),
                Some(Severity::Debug),
                Some(Severity::Info),
                Some(Severity::Warn),
                Some(Severity::Error),
            ]
        );
    }

    #[test]
    fn events_without_message_are_dropped() {
        let h = Harness::new();
        h.run(|| {
            info!(target: "app", "");
            info!(target: "app", "   ");
            info!(target: "app", user = "alice");
        });
        assert!(h.records().is_empty());
    }

    #[test]
    fn reserved_namespaces_are_dropped() {
        let h = Harness::new();
        h.run(|| {
            warn!(target: "opentelemetry_sdk", "export failed");
            warn!(target: "opentelemetry-otlp", "export failed");
            warn!(target: "reqwest::connect", "connection refused");
            warn!(target: "hyper_util::client", "connection refused");
            debug!(target: "beacon_telemetry::pipeline", "pipeline built");
            info!(target: "app", "kept");
        });

        let records = h.records();
        assert_eq!(records.len(), 1);
        assert_eq!(attr(&records[0], LOGGER_NAME_KEY).as_deref(), Some("app"));
    }

    #[test]
    fn reserved_namespaces_match_prefixes() {
        let reserved = ReservedNamespaces::default().with_prefix("vendor_sdk");
        assert!(reserved.is_reserved("opentelemetry_sdk::logs"));
        assert!(reserved.is_reserved("tracing_opentelemetry::layer"));
        assert!(reserved.is_reserved("tower_http::trace"));
        assert!(reserved.is_reserved("vendor_sdk::client"));
        assert!(!reserved.is_reserved("app::opentelemetry"));
        assert!(!reserved.is_reserved("h2o::server"));

        let empty = ReservedNamespaces::new(Vec::<&'static str>::new());
        assert!(!empty.is_reserved("opentelemetry_sdk"));
    }

    #[test]
    fn custom_reserved_namespaces_apply_to_bridge() {
        let exporter = InMemoryLogExporter::default();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let bridge = LogBridge::with_reserved_namespaces(
            provider.logger("bridge-test"),
            ReservedNamespaces::new(["noisy"]),
        );

        let subscriber = tracing_subscriber::registry().with(bridge.layer());
        tracing::subscriber::with_default(subscriber, || {
            info!(target: "noisy::client", "dropped");
            info!(target: "opentelemetry_sdk", "kept without default prefixes");
        });

        assert_eq!(exporter.get_emitted_logs().unwrap().len(), 1);
    }

    #[test]
    fn span_and_event_fields_become_prefixed_attributes() {
        let h = Harness::new();
        h.run(|| {
            let span = info_span!("request", request_id = "r-42", tenant = "");
            let _entered = span.enter();
            info!(target: "app", user = "alice", attempt = 3, "processing");
        });

        let record = h.single();
        assert_eq!(attr(&record, "log.context.request_id").as_deref(), Some("r-42"));
        assert_eq!(attr(&record, "log.context.user").as_deref(), Some("alice"));
        assert_eq!(attr(&record, "log.context.attempt").as_deref(), Some("3"));
        assert_eq!(attr(&record, "log.context.tenant"), None);
        assert_eq!(attr(&record, "user"), None);
    }

    #[test]
    fn inner_fields_override_outer_ones() {
        let h = Harness::new();
        h.run(|| {
            let outer = info_span!("outer", stage = "outer", region = "eu");
            let _outer = outer.enter();
            let inner = info_span!("inner", stage = "inner");
            let _inner = inner.enter();
            info!(target: "app", region = "us", "nested");
        });

        let record = h.single();
        assert_eq!(attr(&record, "log.context.stage").as_deref(), Some("inner"));
        assert_eq!(attr(&record, "log.context.region").as_deref(), Some("us"));
        assert_eq!(context_keys(&record).len(), 2);
    }

    #[test]
    fn late_recorded_span_fields_are_seen() {
        let h = Harness::new();
        h.run(|| {
            let span = info_span!("job", job_id = tracing::field::Empty);
            span.record("job_id", "j-7");
            let _entered = span.enter();
            info!(target: "app", "job started");
        });

        assert_eq!(attr(&h.single(), "log.context.job_id").as_deref(), Some("j-7"));
    }

    #[test]
    fn trace_context_from_fields() {
        let h = Harness::new();
        h.run(|| info!(target: "app", trace_id = TRACE, span_id = SPAN, "correlated"));

        let record = h.single();
        let trace_context = record.trace_context().expect("trace context");
        assert_eq!(trace_context.trace_id, TraceId::from_hex(TRACE).unwrap());
        assert_eq!(trace_context.span_id, SpanId::from_hex(SPAN).unwrap());
        assert_eq!(attr(&record, "log.context.trace_id").as_deref(), Some(TRACE));
    }

    #[test]
    fn mixed_case_ids_are_accepted() {
        let h = Harness::new();
        h.run(|| {
            let span = info_span!("remote", traceId = "4BF92F3577B34DA6a3ce929d0e0e4736");
            let _entered = span.enter();
            info!(target: "app", spanId = "00F067AA0BA902B7", "from upstream");
        });

        let trace_context = h.single().trace_context().cloned().expect("trace context");
        assert_eq!(trace_context.trace_id, TraceId::from_hex(TRACE).unwrap());
    }

    #[test]
    fn invalid_ids_leave_record_uncorrelated() {
        let h = Harness::new();
        h.run(|| {
            info!(
                target: "app",
                trace_id = "00000000000000000000000000000000",
                span_id = SPAN,
                "zero trace"
            );
            info!(
                target: "app",
                trace_id = "4bf92f3577b34da6a3ce929d0e0e473",
                span_id = SPAN,
                "short trace"
            );
        });

        let records = h.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.trace_context().is_none()));
    }

    #[test]
    fn ambient_context_is_used_without_fields() {
        let ambient = SpanContext::new(
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
            SpanId::from_hex("b7ad6b7169203331").unwrap(),
            TraceFlags::SAMPLED,
            false,
            TraceState::default(),
        );
        let h = Harness::new();
        h.run(|| {
            let _guard = opentelemetry::Context::new()
                .with_remote_span_context(ambient.clone())
                .attach();
            info!(target: "app", "inside request");
        });

        let trace_context = h.single().trace_context().cloned().expect("trace context");
        assert_eq!(trace_context.trace_id, ambient.trace_id());
        assert_eq!(trace_context.span_id, ambient.span_id());
    }

    #[test]
    fn exception_fields_are_attached() {
        let h = Harness::new();
        h.run(|| {
            let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
            error!(
                target: "app",
                error = &err as &(dyn std::error::Error + 'static),
                "exception.type" = "std::io::Error",
                "write failed"
            );
        });

        let record = h.single();
        assert_eq!(attr(&record, EXCEPTION_TYPE_KEY).as_deref(), Some("std::io::Error"));
        assert_eq!(attr(&record, EXCEPTION_MESSAGE_KEY).as_deref(), Some("disk full"));
        assert!(context_keys(&record).is_empty());
    }

    #[test]
    fn empty_exception_parts_are_omitted() {
        let h = Harness::new();
        h.run(|| {
            error!(
                target: "app",
                { "exception.type" = "",
                "exception.message" = "timed out" },
                "call failed"
            )
        });

        let record = h.single();
        assert_eq!(attr(&record, EXCEPTION_TYPE_KEY), None);
        assert_eq!(attr(&record, EXCEPTION_MESSAGE_KEY).as_deref(), Some("timed out"));
    }

    #[test]
    fn detached_bridge_ignores_events() {
        let h = Harness::new();
        assert!(h.bridge.is_attached());
        h.bridge.detach();
        assert!(!h.bridge.is_attached());

        h.run(|| info!(target: "app", "after detach"));
        assert!(h.records().is_empty());
    }

    #[test]
    fn thread_name_is_recorded() {
        let h = Harness::new();
        let layer = h.bridge.layer();
        thread::Builder::new()
            .name("worker-7".into())
            .spawn(move || {
                let subscriber = tracing_subscriber::registry().with(layer);
                tracing::subscriber::with_default(subscriber, || {
                    info!(target: "app", "from worker")
                });
            })
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(attr(&h.single(), THREAD_NAME_KEY).as_deref(), Some("worker-7"));
    }

    #[test]
    fn concurrent_events_are_all_emitted() {
        let h = Harness::new();
        thread::scope(|s| {
            for worker in 0..4 {
                let layer = h.bridge.layer();
                s.spawn(move || {
                    let subscriber = tracing_subscriber::registry().with(layer);
                    tracing::subscriber::with_default(subscriber, || {
                        for i in 0..25 {
                            info!(target: "app", worker, i, "tick");
                        }
                    });
                });
            }
        });
        assert_eq!(h.records().len(), 100);
    }

    struct PanickingLogger {
        inner: SdkLogger,
        emits: Arc<AtomicUsize>,
    }

    impl Logger for PanickingLogger {
        type LogRecord = SdkLogRecord;

        fn create_log_record(&self) -> Self::LogRecord {
            self.inner.create_log_record()
        }

        fn emit(&self, _record: Self::LogRecord) {
            self.emits.fetch_add(1, Ordering::SeqCst);
            panic!("collector unavailable");
        }
    }

    #[test]
    fn emission_panics_never_reach_the_caller() {
        let provider = SdkLoggerProvider::builder().build();
        let emits = Arc::new(AtomicUsize::new(0));
        let bridge = LogBridge::new(PanickingLogger {
            inner: provider.logger("panics"),
            emits: Arc::clone(&emits),
        });

        let subscriber = tracing_subscriber::registry().with(bridge.layer());
        let finished = tracing::subscriber::with_default(subscriber, || {
            error!(target: "app", "first");
            error!(target: "app", "second");
            error!(target: "opentelemetry_sdk", "never emitted");
            true
        });
        assert!(finished);
        assert_eq!(emits.load(Ordering::SeqCst), 2);
        assert!(bridge.is_attached());
    }

    #[test]
    fn panic_payloads_become_emit_errors() {
        let err = EmitError::from_panic(Box::new("boom"));
        assert_eq!(err, EmitError::Panicked("boom".to_string()));

        let err = EmitError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err, EmitError::Panicked("owned boom".to_string()));

        let err = EmitError::from_panic(Box::new(7_u8));
        assert_eq!(err, EmitError::Panicked("unknown panic".to_string()));
    }
}
