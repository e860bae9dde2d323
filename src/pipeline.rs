// SPDX-License-Identifier: MIT
//! Pipeline lifecycle: building, registering and tearing down the export pipeline.
//!
//! A [`PipelineRegistry`] owns at most one [`Pipeline`]. The first successful
//! [`PipelineRegistry::initialize`] builds and registers it; later calls return the same
//! handle and ignore their configuration. [`Pipeline::shutdown`] flushes every exporting
//! provider within [`SHUTDOWN_TIMEOUT`], marks the handle closed and clears the registry
//! slot so a fresh pipeline can be built afterwards.
//!
//! The process-wide registry is reachable through [`PipelineRegistry::global`] and the
//! free functions [`initialize`], [`is_initialized`] and [`shutdown_global`]. Code that
//! wants isolation (tests, embedded hosts) creates its own registry with
//! [`PipelineRegistry::new`].
//!
//! # Locking
//! Registration state lives behind a single mutex. Teardown holds that mutex for its
//! whole duration (bounded by the shutdown timeout), so `initialize` never observes a
//! half torn-down handle and concurrent shutdowns tear down exactly once.
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::time::{Duration, Instant};

use opentelemetry::logs::LoggerProvider as _;
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, InstrumentationScope};
use opentelemetry_otlp::{
    ExporterBuildError, LogExporter, MetricExporter, Protocol, SpanExporter, WithExportConfig,
    WithHttpConfig,
};
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use tracing::{debug, warn};

use crate::config::TelemetryConfig;
use crate::endpoint::Signal;
use crate::error::{TelemetryError, TelemetryResult};
use crate::resource::build_resource;

/// Upper bound on how long [`Pipeline::shutdown`] waits for providers to flush.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

type Slot = Mutex<Option<Pipeline>>;

fn lock_slot(slot: &Slot) -> MutexGuard<'_, Option<Pipeline>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn scope(name: impl Into<Cow<'static, str>>) -> InstrumentationScope {
    InstrumentationScope::builder(name).build()
}

fn auth_headers(api_key: &str) -> HashMap<String, String> {
    HashMap::from([("Authorization".to_string(), format!("Bearer {api_key}"))])
}

/// Signal providers owned by a pipeline. Disabled signals are backed by providers with no
/// processors or readers, so everything handed out for them is inert. The inert tracer
/// never samples, so its spans do not record.
struct Providers {
    tracer: SdkTracerProvider,
    meter: SdkMeterProvider,
    logger: SdkLoggerProvider,
    exporting: Vec<Signal>,
}

impl Providers {
    fn inert() -> Self {
        Self {
            tracer: SdkTracerProvider::builder()
                .with_sampler(Sampler::AlwaysOff)
                .build(),
            meter: SdkMeterProvider::builder().build(),
            logger: SdkLoggerProvider::builder().build(),
            exporting: Vec::new(),
        }
    }

    /// Build exporters for every enabled signal, then wire them into providers.
    ///
    /// All exporters are constructed before any provider so a transport failure leaves
    /// no batch worker behind.
    fn build(cfg: &TelemetryConfig, resource: &Resource) -> TelemetryResult<Self> {
        let headers = auth_headers(&cfg.api_key);
        let transport = |signal: Signal| {
            move |source: ExporterBuildError| TelemetryError::Transport { signal, source }
        };

        let span_exporter = cfg
            .enable_traces
            .then(|| {
                SpanExporter::builder()
                    .with_http()
                    .with_protocol(Protocol::HttpBinary)
                    .with_endpoint(Signal::Traces.endpoint(&cfg.endpoint))
                    .with_headers(headers.clone())
                    .build()
                    .map_err(transport(Signal::Traces))
            })
            .transpose()?;

        let metric_exporter = cfg
            .enable_metrics
            .then(|| {
                MetricExporter::builder()
                    .with_http()
                    .with_protocol(Protocol::HttpBinary)
                    .with_endpoint(Signal::Metrics.endpoint(&cfg.endpoint))
                    .with_headers(headers.clone())
                    .build()
                    .map_err(transport(Signal::Metrics))
            })
            .transpose()?;

        let log_exporter = cfg
            .enable_logs
            .then(|| {
                LogExporter::builder()
                    .with_http()
                    .with_protocol(Protocol::HttpBinary)
                    .with_endpoint(Signal::Logs.endpoint(&cfg.endpoint))
                    .with_headers(headers.clone())
                    .build()
                    .map_err(transport(Signal::Logs))
            })
            .transpose()?;

        let mut providers = Self::inert();
        if let Some(exporter) = span_exporter {
            providers.tracer = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(resource.clone())
                .build();
            providers.exporting.push(Signal::Traces);
        }
        if let Some(exporter) = metric_exporter {
            let reader = PeriodicReader::builder(exporter)
                .with_interval(cfg.export_interval)
                .build();
            providers.meter = SdkMeterProvider::builder()
                .with_reader(reader)
                .with_resource(resource.clone())
                .build();
            providers.exporting.push(Signal::Metrics);
        }
        if let Some(exporter) = log_exporter {
            providers.logger = SdkLoggerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(resource.clone())
                .build();
            providers.exporting.push(Signal::Logs);
        }
        Ok(providers)
    }

    fn exports(&self, signal: Signal) -> bool {
        self.exporting.contains(&signal)
    }

    /// Flush and close exporting providers, sharing one deadline across all of them.
    fn shutdown(&self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        let remaining = || deadline.saturating_duration_since(Instant::now());

        let mut errs = Vec::new();
        for signal in &self.exporting {
            let result = match signal {
                Signal::Traces => self.tracer.shutdown_with_timeout(remaining()),
                Signal::Metrics => self.meter.shutdown_with_timeout(remaining()),
                Signal::Logs => self.logger.shutdown_with_timeout(remaining()),
            };
            if let Err(e) = result {
                errs.push(format!("{signal}: {e}"));
            }
        }
        if !errs.is_empty() {
            warn!(errors = %errs.join(", "), "telemetry providers did not shut down cleanly");
        }
    }
}

struct PipelineInner {
    config: TelemetryConfig,
    resource: Option<Resource>,
    providers: Providers,
    closed: AtomicBool,
    teardown: Mutex<()>,
    registry: Weak<Slot>,
}

/// Handle to a built telemetry pipeline.
///
/// Cloning is cheap; every clone refers to the same providers. Accessors keep working
/// after shutdown, but nothing emitted through them is exported any more.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("service_name", &self.inner.config.service_name)
            .field("exporting", &self.inner.providers.exporting)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Pipeline {
    fn build(config: TelemetryConfig, registry: Weak<Slot>) -> TelemetryResult<Self> {
        let (resource, providers) = if config.any_signal_enabled() {
            let resource = build_resource(&config);
            let providers = Providers::build(&config, &resource)?;
            (Some(resource), providers)
        } else {
            (None, Providers::inert())
        };
        debug!(
            service = %config.service_name,
            exporting = ?providers.exporting,
            "telemetry pipeline built"
        );
        Ok(Self {
            inner: Arc::new(PipelineInner {
                config,
                resource,
                providers,
                closed: AtomicBool::new(false),
                teardown: Mutex::new(()),
                registry,
            }),
        })
    }

    /// The configuration this pipeline was built from.
    pub fn config(&self) -> &TelemetryConfig {
        &self.inner.config
    }

    /// Merged resource shared by all exporting providers; `None` for a no-op pipeline.
    pub fn resource(&self) -> Option<&Resource> {
        self.inner.resource.as_ref()
    }

    /// Signals that are actually exported, in trace/metric/log order.
    pub fn exporting_signals(&self) -> &[Signal] {
        &self.inner.providers.exporting
    }

    /// True when no signal is exported.
    pub fn is_noop(&self) -> bool {
        self.inner.providers.exporting.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// True if both handles refer to the same pipeline.
    pub fn ptr_eq(&self, other: &Pipeline) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Tracer bound to the given instrumentation scope.
    pub fn tracer(&self, scope_name: impl Into<Cow<'static, str>>) -> SdkTracer {
        self.inner.providers.tracer.tracer_with_scope(scope(scope_name))
    }

    /// Meter bound to the given instrumentation scope.
    pub fn meter(&self, scope_name: impl Into<Cow<'static, str>>) -> Meter {
        self.inner.providers.meter.meter_with_scope(scope(scope_name))
    }

    /// Logger bound to the given instrumentation scope.
    pub fn logger(&self, scope_name: impl Into<Cow<'static, str>>) -> SdkLogger {
        self.inner.providers.logger.logger_with_scope(scope(scope_name))
    }

    /// Register exporting providers with [`opentelemetry::global`] and install the W3C
    /// trace-context propagator.
    pub fn install_global_providers(&self) {
        let providers = &self.inner.providers;
        if providers.exports(Signal::Traces) {
            global::set_text_map_propagator(TraceContextPropagator::new());
            global::set_tracer_provider(providers.tracer.clone());
        }
        if providers.exports(Signal::Metrics) {
            global::set_meter_provider(providers.meter.clone());
        }
    }

    /// Flush and close all providers, then unregister this pipeline.
    ///
    /// Idempotent: only the first call does any work. Flushing is bounded by
    /// [`SHUTDOWN_TIMEOUT`]; if it runs out the pipeline is closed anyway.
    pub fn shutdown(&self) {
        if self.is_closed() {
            return;
        }
        let registry = self.inner.registry.upgrade();
        let mut registered = registry.as_deref().map(lock_slot);
        let _teardown = self
            .inner
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return;
        }

        self.inner.providers.shutdown(SHUTDOWN_TIMEOUT);
        self.inner.closed.store(true, Ordering::Release);

        if let Some(current) = registered.as_deref_mut() {
            if current.as_ref().is_some_and(|p| p.ptr_eq(self)) {
                *current = None;
            }
        }
        debug!(service = %self.inner.config.service_name, "telemetry pipeline shut down");
    }
}

/// Owner of the single registered pipeline.
#[derive(Clone, Debug, Default)]
pub struct PipelineRegistry {
    slot: Arc<Slot>,
}

static GLOBAL_REGISTRY: OnceLock<PipelineRegistry> = OnceLock::new();

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static PipelineRegistry {
        GLOBAL_REGISTRY.get_or_init(PipelineRegistry::new)
    }

    /// Return the registered pipeline, building and registering one first if needed.
    ///
    /// Only the first successful call's configuration takes effect.
    ///
    /// # Errors
    /// * [`TelemetryError::Configuration`] if an enabled signal lacks a required field.
    /// * [`TelemetryError::Transport`] if an exporter cannot be constructed.
    ///
    /// Nothing is registered when an error is returned.
    pub fn initialize(&self, config: TelemetryConfig) -> TelemetryResult<Pipeline> {
        let mut current = lock_slot(&self.slot);
        if let Some(existing) = current.as_ref() {
            // TODO: surface ignored configurations to the caller instead of only logging them.
            if existing.config() != &config {
                debug!(
                    service = %existing.config().service_name,
                    ignored_service = %config.service_name,
                    "telemetry already initialized; ignoring later configuration"
                );
            }
            return Ok(existing.clone());
        }

        config.validate()?;
        let pipeline = Pipeline::build(config, Arc::downgrade(&self.slot))?;
        *current = Some(pipeline.clone());
        Ok(pipeline)
    }

    pub fn is_initialized(&self) -> bool {
        lock_slot(&self.slot).is_some()
    }

    /// The registered pipeline, if any.
    pub fn current(&self) -> Option<Pipeline> {
        lock_slot(&self.slot).clone()
    }

    /// Shut down the registered pipeline, if any. A no-op when nothing is registered.
    pub fn shutdown(&self) {
        if let Some(pipeline) = self.current() {
            pipeline.shutdown();
        }
    }
}

/// [`PipelineRegistry::initialize`] on the process-wide registry.
pub fn initialize(config: TelemetryConfig) -> TelemetryResult<Pipeline> {
    PipelineRegistry::global().initialize(config)
}

/// Whether the process-wide registry currently holds a pipeline.
pub fn is_initialized() -> bool {
    PipelineRegistry::global().is_initialized()
}

/// Shut down the process-wide pipeline, if any.
pub fn shutdown_global() {
    PipelineRegistry::global().shutdown();
}
