use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED is true but LOKI_URL is not set")]
    MissingLokiUrl,
    #[error("invalid LOKI_URL: {0}")]
    LokiUrl(#[from] url::ParseError),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("logging already initialised: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
    #[cfg(feature = "loki")]
    #[error("loki layer: {0}")]
    Loki(#[from] tracing_loki::Error),
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            loki_enabled: non_empty("LOKI_ENABLED").map(|v| is_truthy(&v)).unwrap_or(false),
            loki_url: non_empty("LOKI_URL"),
            service_name: non_empty("SERVICE_NAME").unwrap_or_else(|| "earnings-dashboard".to_string()),
            environment: non_empty("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_level: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Loki target, if shipping is switched on.
    pub fn loki_target(&self) -> Result<Option<url::Url>, LoggingError> {
        if !self.loki_enabled {
            return Ok(None);
        }
        let raw = self.loki_url.as_deref().ok_or(LoggingError::MissingLokiUrl)?;
        Ok(Some(url::Url::parse(raw)?))
    }

    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        Ok(EnvFilter::try_new(&self.log_level)?)
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        self.loki_target()?;
        self.filter()?;
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let target = config.loki_target()?;

    #[cfg(feature = "loki")]
    if let Some(url) = target {
        return init_with_loki(&config, url);
    }

    #[cfg(not(feature = "loki"))]
    if target.is_some() {
        eprintln!("LOKI_ENABLED is set but this build has no loki feature; logging to console only");
    }

    init_console_only(&config)
}

fn init_console_only(config: &LoggingConfig) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(config.filter()?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!(
        "📊 Console logging for {} ({}) at {}",
        config.service_name,
        config.environment,
        config.log_level
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: &LoggingConfig, url: url::Url) -> Result<(), LoggingError> {
    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .extra_field("version", env!("CARGO_PKG_VERSION"))?
        .build_url(url.clone())?;

    // Ships buffered events to Loki for the life of the process
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(config.filter()?)
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!(
        "✅ Shipping {} ({}) logs to Loki at {}",
        config.service_name,
        config.environment,
        url
    );
    Ok(())
}
