use serde_wasm_bindgen::to_value;
use shared::{RouteBounds, Waypoint};
use wasm_bindgen::prelude::{wasm_bindgen, JsValue};

/// Pixel padding applied when fitting the viewport around a route.
const FIT_PADDING_PX: u32 = 48;

#[wasm_bindgen(module = "/maplibre_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map_js();
    #[wasm_bindgen(js_name = updateWaypointMarkers)]
    fn update_waypoint_markers_js(points: JsValue);
    #[wasm_bindgen(js_name = drawRoute)]
    fn draw_route_js(coords: JsValue);
    #[wasm_bindgen(js_name = clearRoute)]
    fn clear_route_js();
    #[wasm_bindgen(js_name = fitRouteBounds)]
    fn fit_route_bounds_js(bounds: JsValue, padding: u32);
}

/// Gateway to the map layers. The underlying MapLibre handles live in the JS
/// bridge and are touched exclusively through these intent-level operations;
/// the surface never initiates network calls and never mutates the selection.
pub struct MapSurface;

impl MapSurface {
    pub fn init() -> Self {
        init_map_js();
        Self
    }

    /// Fully replaces the marker layer with one marker per waypoint.
    pub fn show_markers(&self, points: &[Waypoint]) {
        if let Ok(value) = to_value(points) {
            update_waypoint_markers_js(value);
        }
    }

    /// Replaces the current polyline and fits the viewport to its bounds.
    pub fn draw_route(&self, polyline: &[Waypoint]) {
        if let Ok(coords) = to_value(polyline) {
            draw_route_js(coords);
        }
        if let Some(bounds) = RouteBounds::from_points(polyline) {
            if let Ok(value) = to_value(&bounds) {
                fit_route_bounds_js(value, FIT_PADDING_PX);
            }
        }
    }

    pub fn clear_route(&self) {
        clear_route_js();
    }
}
