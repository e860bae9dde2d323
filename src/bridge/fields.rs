// SPDX-License-Identifier: MIT
//! Field capture for spans and events.
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use tracing::field::{Field, Visit};

pub(crate) type FieldMap = BTreeMap<String, String>;

const MESSAGE_FIELD: &str = "message";
const EXCEPTION_TYPE_FIELD: &str = "exception.type";
const EXCEPTION_MESSAGE_FIELD: &str = "exception.message";

/// Stringified fields of one span, stored in the span's extensions.
#[derive(Debug, Default, Clone)]
pub(crate) struct SpanFields(pub(crate) FieldMap);

impl SpanFields {
    fn insert(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for SpanFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }
}

/// Everything the bridge needs from a single event.
#[derive(Debug, Default)]
pub(crate) struct EventFields {
    pub(crate) message: Option<String>,
    pub(crate) fields: FieldMap,
    pub(crate) exception_type: Option<String>,
    pub(crate) exception_message: Option<String>,
}

impl EventFields {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            MESSAGE_FIELD => self.message = Some(value),
            EXCEPTION_TYPE_FIELD => self.exception_type = Some(value),
            EXCEPTION_MESSAGE_FIELD => self.exception_message = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn Error + 'static)) {
        // an explicit `exception.message` field wins over the error's Display
        if self.exception_message.is_none() {
            self.exception_message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }
}
