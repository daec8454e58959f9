use hovertip_core::{LogicalTarget, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info};
use uuid::Uuid;

const TELEMETRY_TARGET: &str = "hovertip::events::telemetry";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TipLifecycle {
    Shown,
    Moved,
    Hidden,
    Aborted,
}

impl fmt::Display for TipLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shown => write!(f, "tip_shown"),
            Self::Moved => write!(f, "tip_moved"),
            Self::Hidden => write!(f, "tip_hidden"),
            Self::Aborted => write!(f, "tip_aborted"),
        }
    }
}

/// One lifecycle record of a show cycle. A cycle starts when the popup is
/// made visible and ends with the matching hide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipTelemetry {
    pub cycle_id: String,
    pub target: String,
    pub lifecycle: TipLifecycle,
    pub bounds: Option<Rect>,
    pub reason: Option<String>,
}

impl TipTelemetry {
    fn record(
        cycle_id: &str,
        target: &LogicalTarget,
        lifecycle: TipLifecycle,
        bounds: Option<Rect>,
        reason: Option<String>,
    ) -> Self {
        Self {
            cycle_id: cycle_id.to_string(),
            target: target.to_string(),
            lifecycle,
            bounds,
            reason,
        }
    }

    fn now_unix_ms() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }
}

pub fn new_cycle_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn tip_shown(
    cycle_id: &str,
    target: &LogicalTarget,
    bounds: Rect,
    manual: bool,
) -> TipTelemetry {
    let telemetry =
        TipTelemetry::record(cycle_id, target, TipLifecycle::Shown, Some(bounds), None);
    info!(
        target: TELEMETRY_TARGET,
        cycle_id = %telemetry.cycle_id,
        tip_target = %telemetry.target,
        lifecycle = %telemetry.lifecycle,
        manual,
        x = bounds.min.x,
        y = bounds.min.y,
        width = bounds.width(),
        height = bounds.height(),
        timestamp_ms = TipTelemetry::now_unix_ms(),
        "tip_shown"
    );
    telemetry
}

pub fn tip_moved(cycle_id: &str, target: &LogicalTarget, bounds: Rect) -> TipTelemetry {
    let telemetry =
        TipTelemetry::record(cycle_id, target, TipLifecycle::Moved, Some(bounds), None);
    debug!(
        target: TELEMETRY_TARGET,
        cycle_id = %telemetry.cycle_id,
        tip_target = %telemetry.target,
        lifecycle = %telemetry.lifecycle,
        x = bounds.min.x,
        y = bounds.min.y,
        timestamp_ms = TipTelemetry::now_unix_ms(),
        "tip_moved"
    );
    telemetry
}

pub fn tip_hidden(cycle_id: &str, target: &LogicalTarget, reason: &str) -> TipTelemetry {
    let telemetry = TipTelemetry::record(
        cycle_id,
        target,
        TipLifecycle::Hidden,
        None,
        Some(reason.to_string()),
    );
    info!(
        target: TELEMETRY_TARGET,
        cycle_id = %telemetry.cycle_id,
        tip_target = %telemetry.target,
        lifecycle = %telemetry.lifecycle,
        reason = %reason,
        timestamp_ms = TipTelemetry::now_unix_ms(),
        "tip_hidden"
    );
    telemetry
}

/// A show cycle that never reached the screen. Misconfiguration is logged
/// as an error, everything else at debug level.
pub fn tip_aborted(target: &LogicalTarget, reason: &str, fatal: bool) -> TipTelemetry {
    let telemetry = TipTelemetry::record(
        "",
        target,
        TipLifecycle::Aborted,
        None,
        Some(reason.to_string()),
    );
    if fatal {
        error!(
            target: TELEMETRY_TARGET,
            tip_target = %telemetry.target,
            lifecycle = %telemetry.lifecycle,
            error = %reason,
            timestamp_ms = TipTelemetry::now_unix_ms(),
            "tip_aborted"
        );
    } else {
        debug!(
            target: TELEMETRY_TARGET,
            tip_target = %telemetry.target,
            lifecycle = %telemetry.lifecycle,
            reason = %reason,
            "tip_aborted"
        );
    }
    telemetry
}
