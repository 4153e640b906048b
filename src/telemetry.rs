use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["category"]
    )
    .unwrap();
    pub static ref QUESTIONS_CREATED: IntCounter = register_int_counter!(
        "trivia_questions_created_total",
        "Number of questions created through the API"
    )
    .unwrap();
}

/// `LOG_LEVEL` takes `EnvFilter` directives, `INCLUDE_SPAN_EVENTS=true` logs
/// handler spans as they are entered and left.
pub fn init_tracing() {
    let fmt_layer = fmt::layer().with_span_events(span_events(
        std::env::var("INCLUDE_SPAN_EVENTS").ok().as_deref(),
    ));
    let filter_layer = filter(std::env::var("LOG_LEVEL").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn span_events(setting: Option<&str>) -> FmtSpan {
    match setting {
        Some(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    }
}

// an unparsable LOG_LEVEL falls back to the defaults instead of aborting startup
fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
