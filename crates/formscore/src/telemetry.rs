use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{value}' for the submission engine")
            }
            TelemetryError::Subscriber(err) => write!(f, "tracing subscriber already set: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

const ENGINE_TARGETS: [&str; 2] = ["formscore", "formscore_api"];

/// Expands a bare level such as `debug` so it only raises the engine crates;
/// everything else stays at `warn`. Full directives pass through untouched.
pub fn directives_for(log_level: &str) -> String {
    let level = log_level.trim();
    if level.is_empty() || level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let scoped: Vec<String> = ENGINE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    format!("warn,{}", scoped.join(","))
}

/// `RUST_LOG` wins over the configured level when set.
pub fn filter_for(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(directives_for(&config.log_level)).map_err(|source| {
        TelemetryError::EnvFilter {
            value: config.log_level.clone(),
            source,
        }
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = filter_for(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
