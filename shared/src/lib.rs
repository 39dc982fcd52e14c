use serde::{Deserialize, Serialize};

/// A geographic point picked by the operator. On the wire it travels as a
/// two-element `[lat, lng]` array, which is what the routing service expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Waypoint> for (f64, f64) {
    fn from(point: Waypoint) -> Self {
        (point.lat, point.lng)
    }
}

/// Body of a route computation request. Exactly one shape is valid per
/// operating mode: the pairwise modes send `origin`/`destination`, the
/// accumulate mode sends the full ordered waypoint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteRequest {
    Pair {
        origin: Waypoint,
        destination: Waypoint,
    },
    Accumulated {
        waypoints: Vec<Waypoint>,
    },
}

impl RouteRequest {
    pub fn pair(origin: Waypoint, destination: Waypoint) -> Self {
        Self::Pair {
            origin,
            destination,
        }
    }

    pub fn accumulated(waypoints: Vec<Waypoint>) -> Self {
        Self::Accumulated { waypoints }
    }
}

/// Raw response of the routing service. `success: false` carries a `message`;
/// `success: true` carries the computed leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteLeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    pub coordinates: Vec<Waypoint>,
    pub distance_meters: f64,
    pub predicted_time_min: f64,
}

/// Bounding box of a polyline, used to fit the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl RouteBounds {
    /// Returns `None` for an empty polyline.
    pub fn from_points(points: &[Waypoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for point in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(point.lat);
            bounds.max_lat = bounds.max_lat.max(point.lat);
            bounds.min_lng = bounds.min_lng.min(point.lng);
            bounds.max_lng = bounds.max_lng.max(point.lng);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn waypoint_serializes_as_lat_lng_array() {
        let point = Waypoint::new(-16.5, -68.19);
        let value = serde_json::to_value(point).unwrap();
        assert_eq!(value, json!([-16.5, -68.19]));
    }

    #[test]
    fn waypoint_roundtrips_from_array() {
        let point: Waypoint = serde_json::from_value(json!([-16.51, -68.2])).unwrap();
        assert_eq!(point, Waypoint::new(-16.51, -68.2));
    }

    #[test]
    fn pair_request_matches_wire_shape() {
        let request = RouteRequest::pair(
            Waypoint::new(-16.5, -68.19),
            Waypoint::new(-16.51, -68.2),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "origin": [-16.5, -68.19],
                "destination": [-16.51, -68.2],
            })
        );
    }

    #[test]
    fn accumulated_request_keeps_insertion_order() {
        let request = RouteRequest::accumulated(vec![
            Waypoint::new(-16.50, -68.19),
            Waypoint::new(-16.49, -68.18),
            Waypoint::new(-16.52, -68.21),
            Waypoint::new(-16.48, -68.17),
        ]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "waypoints": [
                    [-16.50, -68.19],
                    [-16.49, -68.18],
                    [-16.52, -68.21],
                    [-16.48, -68.17],
                ],
            })
        );
    }

    #[test]
    fn success_response_parses_route_leg() {
        let body = json!({
            "success": true,
            "route": {
                "coordinates": [[-16.5, -68.19], [-16.505, -68.195], [-16.51, -68.2]],
                "distance_meters": 5000.0,
                "predicted_time_min": 12.0,
            },
            "processing_time_ms": 38,
        });
        let response: RouteResponse = serde_json::from_value(body).unwrap();
        assert!(response.success);
        let leg = response.route.unwrap();
        assert_eq!(leg.coordinates.len(), 3);
        assert_eq!(leg.distance_meters, 5000.0);
        assert_eq!(response.processing_time_ms, Some(38));
    }

    #[test]
    fn failure_response_parses_without_route() {
        let body = json!({ "success": false, "message": "No se encontró ruta" });
        let response: RouteResponse = serde_json::from_value(body).unwrap();
        assert!(!response.success);
        assert!(response.route.is_none());
        assert_eq!(response.message.as_deref(), Some("No se encontró ruta"));
    }

    #[test]
    fn bounds_cover_all_points() {
        let bounds = RouteBounds::from_points(&[
            Waypoint::new(-16.5, -68.19),
            Waypoint::new(-16.52, -68.17),
            Waypoint::new(-16.48, -68.21),
        ])
        .unwrap();
        assert_eq!(bounds.min_lat, -16.52);
        assert_eq!(bounds.max_lat, -16.48);
        assert_eq!(bounds.min_lng, -68.21);
        assert_eq!(bounds.max_lng, -68.17);
    }

    #[test]
    fn bounds_of_empty_polyline_is_none() {
        assert!(RouteBounds::from_points(&[]).is_none());
    }
}
