//! Observability for legalchat: subscriber setup, log filtering, and the
//! optional OpenTelemetry bridge.

pub mod tracing_setup;
