// SPDX-License-Identifier: MIT
use anyhow::Result;
use beacon_telemetry::telemetry::init_telemetry;
use beacon_telemetry::TelemetryConfig;
use opentelemetry::KeyValue;
use tracing::{info, info_span, instrument, Instrument};

// The binary shares the library's crate name, whose target the log bridge drops.
const TARGET: &str = "beacon_demo";

#[instrument]
async fn simulated_work() {
    info!(target: TARGET, task = "simulated_work", "starting task");
    // Placeholder for actual business logic
    tokio::time::sleep(std::time::Duration::from_millis(150)).await;
    info!(target: TARGET, task = "simulated_work", "completed task");
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = init_telemetry(TelemetryConfig::from_env())?;
    info!(target: TARGET, "application started");

    let requests = telemetry
        .pipeline()
        .meter("beacon-demo")
        .u64_counter("demo.requests")
        .build();

    // Fields on the request span become `log.context.*` attributes on bridged records.
    let request = info_span!("request", request_id = "req-1");
    async {
        requests.add(1, &[KeyValue::new("route", "/work")]);
        simulated_work().await;
    }
    .instrument(request)
    .await;

    info!(target: TARGET, "shutting down");
    telemetry.shutdown();
    Ok(())
}
