// SPDX-License-Identifier: MIT
//! Trace-context resolution for bridged records.
//!
//! Context carried explicitly in event or span fields wins over the ambient
//! OpenTelemetry context of the calling thread. Ids from fields must be well-formed
//! lowercase or uppercase hex of the exact W3C length and not all zero; anything else
//! falls through to the ambient context.
use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};
use opentelemetry::Context;

use super::fields::FieldMap;

/// Field names recognized as carrying a trace id, in lookup order.
pub const TRACE_ID_KEYS: [&str; 4] = ["trace.id", "trace_id", "traceId", "otel.trace_id"];
/// Field names recognized as carrying a span id, in lookup order.
pub const SPAN_ID_KEYS: [&str; 4] = ["span.id", "span_id", "spanId", "otel.span_id"];

const TRACE_ID_HEX_LEN: usize = 32;
const SPAN_ID_HEX_LEN: usize = 16;

fn is_hex_of_len(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse a 32-character hex trace id, rejecting the all-zero id.
pub fn parse_trace_id(value: &str) -> Option<TraceId> {
    if !is_hex_of_len(value, TRACE_ID_HEX_LEN) {
        return None;
    }
    TraceId::from_hex(value)
        .ok()
        .filter(|id| *id != TraceId::INVALID)
}

/// Parse a 16-character hex span id, rejecting the all-zero id.
pub fn parse_span_id(value: &str) -> Option<SpanId> {
    if !is_hex_of_len(value, SPAN_ID_HEX_LEN) {
        return None;
    }
    SpanId::from_hex(value).ok().filter(|id| *id != SpanId::INVALID)
}

fn first_non_blank<'a>(fields: &'a FieldMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// Remote span context built from trace/span id fields, if both are present and valid.
pub(crate) fn from_fields(fields: &FieldMap) -> Option<SpanContext> {
    let trace_id = parse_trace_id(first_non_blank(fields, &TRACE_ID_KEYS)?)?;
    let span_id = parse_span_id(first_non_blank(fields, &SPAN_ID_KEYS)?)?;
    Some(SpanContext::new(
        trace_id,
        span_id,
        TraceFlags::SAMPLED,
        true,
        TraceState::default(),
    ))
}

/// The calling thread's active span context, if valid.
pub(crate) fn current() -> Option<SpanContext> {
    Context::map_current(|cx| {
        let span = cx.span();
        let span_context = span.span_context();
        span_context.is_valid().then(|| span_context.clone())
    })
}

/// Fields first, then the ambient context, otherwise nothing.
pub(crate) fn resolve(fields: &FieldMap) -> Option<SpanContext> {
    from_fields(fields).or_else(current)
}
