use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by a venue call.
///
/// A timeout is reported through the same type so callers treat it like any
/// other failed call.
#[derive(Error, Debug, Clone)]
pub enum VenueError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{venue} API error: {message}")]
    Api { venue: String, message: String },

    #[error("{venue} call timed out after {secs}s")]
    Timeout { venue: String, secs: u64 },

    #[error("order rejected by {venue}: {reason}")]
    Rejected { venue: String, reason: String },

    #[error("{operation} is not supported by {venue}")]
    Unsupported {
        venue: String,
        operation: &'static str,
    },
}

impl From<reqwest::Error> for VenueError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// A venue's funding-rate query failed, aborting the cycle.
#[derive(Error, Debug, Clone)]
#[error("failed to fetch funding rates from {venue}: {source}")]
pub struct FetchError {
    pub venue: String,
    #[source]
    pub source: VenueError,
}

/// Reasons an opening sequence is refused before any order is placed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("exposure limit exceeded: {current} + {additional} > {limit}")]
    ExposureLimitExceeded {
        current: Decimal,
        additional: Decimal,
        limit: Decimal,
    },

    #[error("position already open for market {market}")]
    AlreadyOpen { market: String },

    #[error("opening already in flight for market {market}")]
    PendingOpen { market: String },

    #[error("no reference price available for market {market}")]
    PriceUnavailable { market: String },

    #[error("order amount for {market} out of range: {size_usd} USD at price {price}")]
    AmountOutOfRange {
        market: String,
        size_usd: Decimal,
        price: Decimal,
    },
}

/// Leg-level execution failures.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("long leg failed on {venue}: {source}")]
    LegFailureLong {
        venue: String,
        #[source]
        source: VenueError,
    },

    #[error(
        "short leg failed on {short_venue} after long leg filled on {long_venue} (order {long_order_id}): {source}"
    )]
    LegFailureShortAsymmetric {
        long_venue: String,
        long_order_id: String,
        short_venue: String,
        #[source]
        source: VenueError,
    },

    #[error("closing failed on {failed_legs} leg(s) for market {market}")]
    ClosePartialFailure { market: String, failed_legs: usize },
}

impl ExecutionError {
    /// True for failures that leave unhedged exposure on a venue.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::LegFailureShortAsymmetric { .. })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error(transparent)]
    Risk(#[from] RiskError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn asymmetric_failure_is_critical() {
        let err = ExecutionError::LegFailureShortAsymmetric {
            long_venue: "paper-b".into(),
            long_order_id: "ord-1".into(),
            short_venue: "paper-a".into(),
            source: VenueError::Http("connection reset".into()),
        };
        assert!(err.is_critical());

        let err = ExecutionError::LegFailureLong {
            venue: "paper-b".into(),
            source: VenueError::Http("connection reset".into()),
        };
        assert!(!err.is_critical());
    }

    #[test]
    fn exposure_error_message() {
        let err = RiskError::ExposureLimitExceeded {
            current: dec!(90),
            additional: dec!(20),
            limit: dec!(100),
        };
        assert_eq!(err.to_string(), "exposure limit exceeded: 90 + 20 > 100");
    }
}
