use seed::{prelude::*, *};
use shared::{RouteRequest, RouteResponse, Waypoint};
use thiserror::Error;

/// Identity of one dispatched route computation. Tokens are handed out in
/// monotonically increasing order; only the token of the most recent dispatch
/// may touch shared state, which is what makes a slow stale response harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

/// What the planner hands to the fetch layer when it decides a route must be
/// computed: the wire payload plus the token its resolution will be matched
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub token: RequestToken,
    pub payload: RouteRequest,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("el servidor devolvió una ruta sin puntos")]
    EmptyRoute,
    #[error("{0}")]
    ServerRejected(String),
    #[error("error de red: {0}")]
    Transport(String),
    #[error("la solicitud de ruta superó el tiempo de espera")]
    Timeout,
    #[error("se necesitan al menos dos puntos para calcular una ruta")]
    InsufficientWaypoints,
}

/// Normalized outcome of a successful route computation. Distance and time
/// stay in raw meters and minutes; unit conversion and rounding belong to the
/// view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub polyline: Vec<Waypoint>,
    pub distance_meters: f64,
    pub predicted_time_min: f64,
    pub client_latency_ms: u32,
    pub server_processing_ms: Option<u64>,
}

/// Posts the payload to the routing service and normalizes the answer. The
/// latency clock starts at dispatch and stops when the body has arrived, so
/// it covers network transit as seen from the widget.
pub async fn send(api_root: String, payload: RouteRequest) -> Result<RouteSummary, RoutingError> {
    let started = js_sys::Date::now();
    let request = Request::new(api_root)
        .method(Method::Post)
        .json(&payload)
        .map_err(|err| RoutingError::Transport(format!("{err:?}")))?;
    let raw = request
        .fetch()
        .await
        .map_err(|err| RoutingError::Transport(format!("{err:?}")))?;
    // The body is decoded regardless of HTTP status: a rejection may arrive
    // as a non-2xx whose body still carries `success: false` and a message.
    let response: RouteResponse = raw
        .json()
        .await
        .map_err(|err| RoutingError::Transport(format!("{err:?}")))?;
    let elapsed_ms = (js_sys::Date::now() - started).max(0.0) as u32;
    normalize(response, elapsed_ms)
}

/// Turns the raw wire response into a `RouteSummary`, requiring a truthy
/// success flag and a non-empty coordinate sequence.
pub fn normalize(
    response: RouteResponse,
    client_latency_ms: u32,
) -> Result<RouteSummary, RoutingError> {
    if !response.success {
        let message = response
            .message
            .unwrap_or_else(|| "solicitud rechazada por el servidor".to_string());
        return Err(RoutingError::ServerRejected(message));
    }
    let leg = response.route.ok_or(RoutingError::EmptyRoute)?;
    if leg.coordinates.is_empty() {
        return Err(RoutingError::EmptyRoute);
    }
    Ok(RouteSummary {
        polyline: leg.coordinates,
        distance_meters: leg.distance_meters,
        predicted_time_min: leg.predicted_time_min,
        client_latency_ms,
        server_processing_ms: response.processing_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> RouteResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn normalize_keeps_raw_meters_and_minutes() {
        let response = parse(json!({
            "success": true,
            "route": {
                "coordinates": [[-16.5, -68.19], [-16.505, -68.195], [-16.51, -68.2]],
                "distance_meters": 5000.0,
                "predicted_time_min": 12.0,
            },
            "processing_time_ms": 41,
        }));
        let summary = normalize(response, 180).unwrap();
        assert_eq!(summary.polyline.len(), 3);
        assert_eq!(summary.distance_meters, 5000.0);
        assert_eq!(summary.predicted_time_min, 12.0);
        assert_eq!(summary.client_latency_ms, 180);
        assert_eq!(summary.server_processing_ms, Some(41));
    }

    #[test]
    fn success_with_empty_coordinates_is_an_empty_route() {
        let response = parse(json!({
            "success": true,
            "route": { "coordinates": [], "distance_meters": 0.0, "predicted_time_min": 0.0 },
        }));
        assert_eq!(normalize(response, 50), Err(RoutingError::EmptyRoute));
    }

    #[test]
    fn success_without_route_is_an_empty_route() {
        let response = parse(json!({ "success": true }));
        assert_eq!(normalize(response, 50), Err(RoutingError::EmptyRoute));
    }

    #[test]
    fn rejection_carries_the_server_message() {
        let response = parse(json!({ "success": false, "message": "No se encontró ruta" }));
        assert_eq!(
            normalize(response, 50),
            Err(RoutingError::ServerRejected("No se encontró ruta".to_string()))
        );
    }

    #[test]
    fn rejection_without_message_gets_a_fallback() {
        let response = parse(json!({ "success": false }));
        match normalize(response, 50) {
            Err(RoutingError::ServerRejected(message)) => assert!(!message.is_empty()),
            other => panic!("expected ServerRejected, got {other:?}"),
        }
    }

    #[test]
    fn tokens_compare_by_issue_order() {
        assert_ne!(RequestToken::new(1), RequestToken::new(2));
        assert_eq!(RequestToken::new(7), RequestToken::new(7));
    }
}
