use std::env;
use std::fmt;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_HIGH_PRIORITY_THRESHOLD: f64 = 500_000.0;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub processing: ProcessingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let batch_size = match env::var("RECOVERY_BATCH_SIZE") {
            Ok(raw) => parse_batch_size(&raw)?,
            Err(_) => DEFAULT_BATCH_SIZE,
        };

        let high_priority_threshold = match env::var("RECOVERY_HIGH_PRIORITY_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_HIGH_PRIORITY_THRESHOLD,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            processing: ProcessingConfig::new(batch_size, high_priority_threshold)?,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Knobs for the batch scheduler. Both values are supplied from outside the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingConfig {
    pub batch_size: usize,
    pub high_priority_threshold: f64,
}

impl ProcessingConfig {
    pub fn new(batch_size: usize, high_priority_threshold: f64) -> Result<Self, ConfigError> {
        let config = Self {
            batch_size,
            high_priority_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the scheduler cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize {
                value: self.batch_size.to_string(),
            });
        }
        if !self.high_priority_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                value: self.high_priority_threshold.to_string(),
            });
        }
        Ok(())
    }

    /// Applies signed overrides coming from the command line.
    pub fn with_overrides(
        mut self,
        batch_size: Option<i64>,
        high_priority_threshold: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = batch_size {
            self.batch_size = usize::try_from(raw)
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidBatchSize {
                    value: raw.to_string(),
                })?;
        }
        if let Some(threshold) = high_priority_threshold {
            self.high_priority_threshold = threshold;
        }
        self.validate()?;
        Ok(self)
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            high_priority_threshold: DEFAULT_HIGH_PRIORITY_THRESHOLD,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_batch_size(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| usize::try_from(value).ok())
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::InvalidBatchSize {
            value: raw.to_string(),
        })
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ConfigError::InvalidThreshold {
            value: raw.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidBatchSize { value: String },
    InvalidThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBatchSize { value } => {
                write!(f, "batch size must be a positive integer (got '{value}')")
            }
            ConfigError::InvalidThreshold { value } => {
                write!(
                    f,
                    "high priority threshold must be a finite number (got '{value}')"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
