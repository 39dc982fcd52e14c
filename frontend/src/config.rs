use shared::Waypoint;

/// Interaction policy of a widget instance: how map clicks become waypoints.
/// Fixed at configuration time, never changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Two clicks define origin and destination; a third restarts the pair.
    TwoPoint,
    /// Destination clicks need an explicit confirmation before they commit.
    SinglePointWithConfirm,
    /// Clicks accumulate stops while a toggle is active; routing is explicit.
    MultiWaypointAccumulate,
}

pub const DEFAULT_TIMEOUT_MS: u32 = 60_000;

/// Configuration of one widget instance, resolved from compile-time
/// environment overrides the same way the surrounding client injects its API
/// root.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub mode: OperatingMode,
    pub api_root: String,
    pub timeout_ms: u32,
    /// Origin that survives clears, for deployments where routes always start
    /// at the depot.
    pub pinned_origin: Option<Waypoint>,
}

impl WidgetConfig {
    pub fn new(mode: OperatingMode) -> Self {
        Self {
            mode,
            api_root: "http://localhost:8080/api/route".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            pinned_origin: None,
        }
    }

    pub fn with_pinned_origin(mut self, origin: Waypoint) -> Self {
        self.pinned_origin = Some(origin);
        self
    }

    pub fn from_env() -> Self {
        let mode = match option_env!("WIDGET_MODE") {
            Some("confirm") => OperatingMode::SinglePointWithConfirm,
            Some("multi") => OperatingMode::MultiWaypointAccumulate,
            _ => OperatingMode::TwoPoint,
        };
        let mut config = Self::new(mode);
        if let Some(url) = option_env!("ROUTING_API_ROOT") {
            config.api_root = url.trim_end_matches('/').to_string();
        }
        if let Some(ms) = option_env!("ROUTE_TIMEOUT_MS").and_then(|raw| raw.parse().ok()) {
            config.timeout_ms = ms;
        }
        if let Some(origin) = option_env!("PINNED_ORIGIN").and_then(parse_origin) {
            config.pinned_origin = Some(origin);
        }
        config
    }
}

fn parse_origin(raw: &str) -> Option<Waypoint> {
    let (lat, lng) = raw.split_once(',')?;
    Some(Waypoint::new(
        lat.trim().parse().ok()?,
        lng.trim().parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origin_accepts_lat_comma_lng() {
        assert_eq!(
            parse_origin("-16.5, -68.189"),
            Some(Waypoint::new(-16.5, -68.189))
        );
    }

    #[test]
    fn parse_origin_rejects_garbage() {
        assert_eq!(parse_origin("depot"), None);
        assert_eq!(parse_origin("-16.5"), None);
        assert_eq!(parse_origin("-16.5,south"), None);
    }

    #[test]
    fn defaults_are_sane() {
        let config = WidgetConfig::new(OperatingMode::TwoPoint);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.pinned_origin.is_none());
        assert!(config.api_root.starts_with("http"));
    }
}
