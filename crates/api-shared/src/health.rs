use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Liveness check shared by the server and anything embedding the router.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as up, stamped with the current time.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "ok".into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_health_reports_ok_with_recent_timestamp() {
        let before = Utc::now();
        let res = HealthService::check_health();

        assert_eq!(res.status, "ok");
        assert!(res.timestamp >= before);
    }
}
