use crate::simulation::config::{
    validate_sample_count, GeneratorConfig, SimulationSettings, DEFAULT_MATCH_THRESHOLD,
    DEFAULT_NOISE_STDEV, DEFAULT_SAMPLE_COUNT,
};
use crate::simulation::metric::{DistanceMetric, UnknownMetric};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub simulation: SimulationSettings,
    pub personas_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sample_count = parse_var("APP_SAMPLE_COUNT", DEFAULT_SAMPLE_COUNT)?;
        validate_sample_count(sample_count)
            .map_err(|source| ConfigError::InvalidSimulation { source })?;
        let threshold = parse_var("APP_MATCH_THRESHOLD", DEFAULT_MATCH_THRESHOLD)?;
        let stdev = parse_var("APP_NOISE_STDEV", DEFAULT_NOISE_STDEV)?;
        let metric = match env::var("APP_DISTANCE_METRIC") {
            Ok(raw) => raw.parse::<DistanceMetric>()?,
            Err(_) => DistanceMetric::default(),
        };
        let seed = match env::var("APP_SIMULATION_SEED") {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidNumber {
                    variable: "APP_SIMULATION_SEED",
                    value: raw.clone(),
                }
            })?),
            Err(_) => None,
        };

        let generator = GeneratorConfig {
            threshold,
            stdev,
            metric,
        };
        generator
            .validate()
            .map_err(|source| ConfigError::InvalidSimulation { source })?;

        let personas_csv = env::var("APP_PERSONAS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            simulation: SimulationSettings {
                sample_count,
                seed,
                generator,
            },
            personas_csv,
        })
    }
}

fn parse_var<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber {
                variable,
                value: raw.clone(),
            }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        variable: &'static str,
        value: String,
    },
    InvalidMetric(UnknownMetric),
    InvalidSimulation {
        source: crate::simulation::InvalidInput,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} has an invalid value '{value}'")
            }
            ConfigError::InvalidMetric(err) => write!(f, "APP_DISTANCE_METRIC: {err}"),
            ConfigError::InvalidSimulation { source } => {
                write!(f, "simulation defaults are invalid: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidMetric(err) => Some(err),
            ConfigError::InvalidSimulation { source } => Some(source),
        }
    }
}

impl From<UnknownMetric> for ConfigError {
    fn from(value: UnknownMetric) -> Self {
        Self::InvalidMetric(value)
    }
}
