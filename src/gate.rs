//! Bootstrap gate: decides between the first-run (sign-up) and
//! steady-state (sign-in) entry routes from a remote status probe.
//!
//! The gate performs no authentication check itself; session handling is
//! an external concern layered on top.

use crate::models::BootstrapStatus;
use anyhow::{Context, Result};
use tracing::warn;

pub const SIGN_UP_PATH: &str = "/sign-up";
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Raw result of one status-endpoint probe, before the fallback rule.
#[derive(Debug, Clone)]
pub enum StatusProbe {
    Ok(BootstrapStatus),
    Unreachable(String),
}

/// Fallback rule: an unreachable status endpoint reads as "setup not
/// required", so a transient failure never forces the sign-up flow.
pub fn resolve(probe: StatusProbe) -> BootstrapStatus {
    match probe {
        StatusProbe::Ok(status) => status,
        StatusProbe::Unreachable(reason) => {
            warn!(%reason, "bootstrap status check failed, defaulting to setupRequired=false");
            BootstrapStatus {
                setup_required: false,
            }
        }
    }
}

/// Pure routing decision. `None` means the current path already matches
/// the required entry route.
pub fn route_decision(setup_required: bool, current_path: &str) -> Option<&'static str> {
    if setup_required {
        (current_path != SIGN_UP_PATH).then_some(SIGN_UP_PATH)
    } else {
        (current_path != SIGN_IN_PATH).then_some(SIGN_IN_PATH)
    }
}

pub struct BootstrapGate {
    http: reqwest::Client,
    status_url: String,
}

impl BootstrapGate {
    pub fn new(status_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            status_url: status_url.into(),
        }
    }

    pub async fn probe(&self) -> StatusProbe {
        match self.fetch_status().await {
            Ok(status) => StatusProbe::Ok(status),
            Err(e) => StatusProbe::Unreachable(format!("{:#}", e)),
        }
    }

    async fn fetch_status(&self) -> Result<BootstrapStatus> {
        let body: serde_json::Value = self
            .http
            .get(&self.status_url)
            .send()
            .await
            .context("Bootstrap status request failed")?
            .json()
            .await
            .context("Bootstrap status response was not JSON")?;

        // A missing or non-boolean field reads as steady-state.
        let setup_required = body
            .get("setupRequired")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        Ok(BootstrapStatus { setup_required })
    }

    /// One gate pass: probe, apply the fallback rule, decide the route.
    /// Re-run on every route entry.
    pub async fn entry_route(&self, current_path: &str) -> Option<&'static str> {
        let status = resolve(self.probe().await);
        route_decision(status.setup_required, current_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_required_forces_sign_up_from_anywhere_else() {
        assert_eq!(route_decision(true, "/"), Some(SIGN_UP_PATH));
        assert_eq!(route_decision(true, "/contacts/7"), Some(SIGN_UP_PATH));
        assert_eq!(route_decision(true, SIGN_IN_PATH), Some(SIGN_UP_PATH));
    }

    #[test]
    fn setup_required_on_sign_up_stays_put() {
        assert_eq!(route_decision(true, SIGN_UP_PATH), None);
    }

    #[test]
    fn steady_state_forces_sign_in_from_anywhere_else() {
        assert_eq!(route_decision(false, "/"), Some(SIGN_IN_PATH));
        assert_eq!(route_decision(false, SIGN_UP_PATH), Some(SIGN_IN_PATH));
    }

    #[test]
    fn steady_state_on_sign_in_stays_put() {
        assert_eq!(route_decision(false, SIGN_IN_PATH), None);
    }

    #[test]
    fn unreachable_probe_resolves_to_steady_state() {
        let status = resolve(StatusProbe::Unreachable("connection refused".to_string()));
        assert!(!status.setup_required);
    }
}
