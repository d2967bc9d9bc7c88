use std::fmt;

use thiserror::Error;

/// The six aggregations the dashboard refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    DashboardStats,
    Sentiment,
    ServiceType,
    BranchType,
    Topic,
    Satisfaction,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Domain::DashboardStats => "dashboard statistics",
            Domain::Sentiment => "sentiment data",
            Domain::ServiceType => "service type data",
            Domain::BranchType => "branch type data",
            Domain::Topic => "topic data",
            Domain::Satisfaction => "satisfaction data",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
#[error("Failed to fetch {domain}")]
pub struct FetchError {
    pub domain: Domain,
    #[source]
    pub source: anyhow::Error,
}

impl FetchError {
    pub fn new(domain: Domain, source: anyhow::Error) -> Self {
        FetchError { domain, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_domain() {
        let err = FetchError::new(Domain::BranchType, anyhow::anyhow!("connection reset"));
        assert_eq!(err.to_string(), "Failed to fetch branch type data");

        let err = FetchError::new(Domain::DashboardStats, anyhow::anyhow!("timeout"));
        assert_eq!(err.to_string(), "Failed to fetch dashboard statistics");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("timeout".to_string())
        );
    }
}
