//! Minimal W3C trace-context propagation for outgoing requests.
//!
//! No OpenTelemetry SDK is involved: a fresh `traceparent` is generated per
//! request and recorded on the request span so log lines can be correlated
//! with the backend's access logs.

use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::Span;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// Build a `00-<trace-id>-<span-id>-01` header value.
pub fn new_traceparent() -> String {
    let trace_id = format!("{:032x}", rand::random::<u128>());
    let span_id = format!("{:016x}", rand::random::<u64>());
    format!("00-{trace_id}-{span_id}-01")
}

/// Inject a trace context into `headers` (unless the caller already set one)
/// and record its trace id on `span`.
pub fn inject_trace_context(headers: &mut HeaderMap, span: &Span) {
    if headers.contains_key(TRACEPARENT) {
        return;
    }
    let traceparent = new_traceparent();
    if let Some(trace_id) = parse_trace_id(&traceparent) {
        span.record("trace_id", trace_id.as_str());
    }
    if let Ok(header_value) = HeaderValue::from_str(&traceparent) {
        headers.insert(HeaderName::from_static(TRACEPARENT), header_value);
    }
}

/// Parse trace ID from traceparent header
pub fn parse_trace_id(traceparent: &str) -> Option<String> {
    let parts: Vec<&str> = traceparent.split('-').collect();
    if parts.len() == 4 && parts[0] == "00" && parts[1].len() == 32 {
        Some(parts[1].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::info_span;

    #[test]
    fn test_inject_trace_context() {
        let mut headers = HeaderMap::new();
        let span = info_span!("test", trace_id = tracing::field::Empty);

        inject_trace_context(&mut headers, &span);

        let header = headers.get(TRACEPARENT).unwrap().to_str().unwrap();
        assert!(header.starts_with("00-"));
        assert!(header.ends_with("-01"));
        assert_eq!(header.matches('-').count(), 3);
    }

    #[test]
    fn existing_header_is_preserved() {
        let mut headers = HeaderMap::new();
        let fixed = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
        headers.insert(TRACEPARENT, fixed.parse().unwrap());

        inject_trace_context(&mut headers, &Span::none());

        assert_eq!(headers.get(TRACEPARENT).unwrap(), fixed);
    }

    #[test]
    fn test_parse_trace_id() {
        let traceparent = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
        assert_eq!(
            parse_trace_id(traceparent).unwrap(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
        assert!(parse_trace_id("invalid").is_none());
        assert!(parse_trace_id(&new_traceparent()).is_some());
    }
}
