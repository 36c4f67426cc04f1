//! Field formatting shared by all report tables.

use fl_core::{AgentIndex, Step, StepClock};

/// Six decimals; `None` and non-finite values become an empty field.
pub fn fmt_float(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => String::new(),
    }
}

pub fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Seconds at `step`, or an empty field without a clock.
pub fn fmt_time(clock: Option<StepClock>, step: Option<Step>) -> String {
    fmt_float(clock.zip(step).map(|(c, s)| c.secs_at(s)))
}

/// Seconds spanned by `steps`, or an empty field without a clock.
pub fn fmt_span(clock: Option<StepClock>, steps: Option<i64>) -> String {
    fmt_float(clock.zip(steps).map(|(c, n)| c.span_secs(n)))
}

/// Space-separated `idx=N` list.
pub fn fmt_agents(agents: &[AgentIndex]) -> String {
    agents.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(" ")
}
