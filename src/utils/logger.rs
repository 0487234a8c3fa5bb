use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{JsonFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Event fields whose values must never reach the log output.
const REDACTED_FIELDS: [&str; 5] = [
    "access_token",
    "refresh_token",
    "code",
    "token",
    "client_secret",
];

#[derive(Default)]
struct JsonFieldVisitor {
    fields: Map<String, Value>,
}

fn redact(name: &str, value: Value) -> Value {
    if REDACTED_FIELDS.contains(&name) {
        Value::from("[redacted]")
    } else {
        value
    }
}

impl JsonFieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields
            .insert(field.name().to_string(), redact(field.name(), value));
    }
}

impl Visit for JsonFieldVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}

/// Single-line JSON events: timestamp, level, target, message, the event's
/// fields merged with those of its enclosing spans, and the service identity.
///
/// Span fields are read from the JSON that `JsonFields` stores on each span,
/// so the layer must be built with `.fmt_fields(JsonFields::new())`.
#[derive(Clone)]
struct JsonEventFormatter {
    service_name: &'static str,
    service_version: &'static str,
    app_env: String,
}

impl JsonEventFormatter {
    fn render(&self, event: &Event<'_>, span_fields: Map<String, Value>) -> Value {
        let metadata = event.metadata();
        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        let mut fields = visitor.fields;
        // Event fields win over span fields of the same name.
        for (name, value) in span_fields {
            if !fields.contains_key(&name) {
                let value = redact(&name, value);
                fields.insert(name, value);
            }
        }
        let message = fields
            .remove("message")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| metadata.name().to_string());

        let mut root = Map::new();
        root.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        root.insert("level".to_string(), Value::from(metadata.level().as_str()));
        root.insert("target".to_string(), Value::from(metadata.target()));
        root.insert("message".to_string(), Value::from(message));
        root.insert("fields".to_string(), Value::Object(fields));
        root.insert("service".to_string(), Value::from(self.service_name));
        root.insert("version".to_string(), Value::from(self.service_version));
        root.insert("app_env".to_string(), Value::from(self.app_env.clone()));
        Value::Object(root)
    }
}

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        // Innermost span last, so it overrides its parents.
        let mut span_fields = Map::new();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                let Some(formatted) = extensions.get::<FormattedFields<N>>() else {
                    continue;
                };
                if let Ok(Value::Object(recorded)) = serde_json::from_str(&formatted.fields) {
                    span_fields.extend(recorded);
                }
            }
        }

        let serialized =
            serde_json::to_string(&self.render(event, span_fields)).map_err(|_| std::fmt::Error)?;
        writer.write_str(&serialized)?;
        writer.write_char('\n')
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` directives are honoured on top of the configured level.
pub fn init_logging(logging_config: &LoggingConfig, app_env: &str) {
    let level_filter = logging_config.level_filter().unwrap_or(LevelFilter::INFO);
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    if logging_config.is_json() {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                fmt::layer()
                    .fmt_fields(JsonFields::new())
                    .event_format(JsonEventFormatter {
                        service_name: env!("CARGO_PKG_NAME"),
                        service_version: env!("CARGO_PKG_VERSION"),
                        app_env: app_env.to_string(),
                    }),
            )
            .init();
    } else {
        // Human-readable console output with ANSI colors
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().pretty())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> Value {
        let out = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .fmt_fields(JsonFields::new())
                .event_format(JsonEventFormatter {
                    service_name: "goodvibes-server",
                    service_version: "0.0.0",
                    app_env: "test".to_string(),
                })
                .with_writer(out.clone()),
        );
        tracing::subscriber::with_default(subscriber, f);
        let bytes = out.0.lock().unwrap().clone();
        serde_json::from_slice(&bytes).expect("one JSON line")
    }

    #[test]
    fn json_event_has_message_and_fields() {
        let line = capture(|| tracing::info!(status = 302u64, "login redirect issued"));

        assert_eq!(line["message"], "login redirect issued");
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["fields"]["status"], 302);
        assert_eq!(line["service"], "goodvibes-server");
        assert_eq!(line["app_env"], "test");
    }

    #[test]
    fn token_fields_are_redacted() {
        let line = capture(|| {
            tracing::warn!(access_token = "BQD-secret", code = "auth-code", "oops")
        });

        assert_eq!(line["fields"]["access_token"], "[redacted]");
        assert_eq!(line["fields"]["code"], "[redacted]");
    }

    #[test]
    fn span_fields_are_merged_into_events() {
        let line = capture(|| {
            let span = tracing::info_span!("http_request", method = "GET", path = "/login");
            let _guard = span.enter();
            tracing::info!(status = 302u64, "finished processing request");
        });

        assert_eq!(line["fields"]["method"], "GET");
        assert_eq!(line["fields"]["path"], "/login");
        assert_eq!(line["fields"]["status"], 302);
    }

    #[test]
    fn span_token_fields_are_redacted() {
        let line = capture(|| {
            let span = tracing::info_span!("exchange", code = "auth-code");
            let _guard = span.enter();
            tracing::info!("exchanging");
        });

        assert_eq!(line["fields"]["code"], "[redacted]");
    }
}
