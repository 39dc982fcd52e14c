use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::Waypoint;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast};

pub mod config;
pub mod map;
pub mod planner;
pub mod request;
pub mod session;
pub mod waypoints;

use config::{OperatingMode, WidgetConfig};
use map::MapSurface;
use planner::{ClickOutcome, RequestLifecycle, Resolution, RoutePlanner, MAX_WAYPOINTS};
use request::{Dispatch, RequestToken, RouteSummary, RoutingError};

pub struct Model {
    config: WidgetConfig,
    planner: RoutePlanner,
    map: MapSurface,
    banner: Option<String>,
    operator: Option<String>,
}

pub enum Msg {
    MapClicked { lat: f64, lng: f64 },
    ConfirmDestination,
    DeclineDestination,
    ToggleAddingPoints,
    RemoveWaypoint(usize),
    ComputeRoute,
    ClearSelection,
    RouteResolved(RequestToken, Result<RouteSummary, RoutingError>),
    RouteTimedOut(RequestToken),
    Logout,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let event = event
            .dyn_into::<web_sys::CustomEvent>()
            .expect("map-click event must be CustomEvent");
        let payload: MapClickPayload = serde_wasm_bindgen::from_value(event.detail())
            .unwrap_or(MapClickPayload { lat: 0.0, lng: 0.0 });
        Msg::MapClicked {
            lat: payload.lat,
            lng: payload.lng,
        }
    }));

    let config = WidgetConfig::from_env();
    let planner = RoutePlanner::new(&config);
    let map = MapSurface::init();
    map.show_markers(planner.waypoints());

    Model {
        config,
        planner,
        map,
        banner: None,
        operator: session::current_user(),
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::MapClicked { lat, lng } => {
            web_sys::console::debug_1(
                &format!("[widget] map click lat={lat:.5} lng={lng:.5}").into(),
            );
            match model.planner.handle_click(Waypoint::new(lat, lng)) {
                ClickOutcome::Selected { dispatch } => {
                    model.map.show_markers(model.planner.waypoints());
                    if let Some(dispatch) = dispatch {
                        start_route_request(model, dispatch, orders);
                    }
                }
                ClickOutcome::Candidate(_) | ClickOutcome::Ignored => {}
            }
        }
        Msg::ConfirmDestination => {
            if let Some(dispatch) = model.planner.confirm_destination() {
                model.map.show_markers(model.planner.waypoints());
                start_route_request(model, dispatch, orders);
            }
        }
        Msg::DeclineDestination => model.planner.decline_destination(),
        Msg::ToggleAddingPoints => {
            let active = !model.planner.adding_points();
            model.planner.set_adding_points(active);
        }
        Msg::RemoveWaypoint(index) => {
            model.planner.remove_waypoint(index);
            model.map.show_markers(model.planner.waypoints());
        }
        Msg::ComputeRoute => match model.planner.compute_route() {
            Ok(dispatch) => start_route_request(model, dispatch, orders),
            Err(err) => model.banner = Some(err.to_string()),
        },
        Msg::ClearSelection => {
            model.planner.clear();
            model.banner = None;
            model.map.show_markers(model.planner.waypoints());
            model.map.clear_route();
        }
        Msg::RouteResolved(token, outcome) => {
            match model.planner.apply_outcome(token, outcome) {
                Resolution::RouteUpdated => {
                    model.banner = None;
                    if let Some(route) = model.planner.route() {
                        model.map.draw_route(&route.polyline);
                    }
                }
                Resolution::Failed(err) => model.banner = Some(err.to_string()),
                Resolution::Superseded => {
                    web_sys::console::debug_1(&"[widget] dropped superseded route response".into());
                }
            }
        }
        Msg::RouteTimedOut(token) => {
            if let Some(err) = model.planner.timeout_elapsed(token) {
                model.banner = Some(err.to_string());
            }
        }
        Msg::Logout => session::logout(),
    }
}

fn start_route_request(model: &mut Model, dispatch: Dispatch, orders: &mut impl Orders<Msg>) {
    model.banner = None;
    let Dispatch { token, payload } = dispatch;
    web_sys::console::debug_1(&format!("[widget] dispatching route request {token:?}").into());
    let api_root = model.config.api_root.clone();
    orders.perform_cmd(async move {
        Msg::RouteResolved(token, request::send(api_root, payload).await)
    });
    orders.perform_cmd(cmds::timeout(model.config.timeout_ms, move || {
        Msg::RouteTimedOut(token)
    }));
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["route-widget"],
        view_header(model),
        view_controls(model),
        view_status(model),
    ]
}

fn view_header(model: &Model) -> Node<Msg> {
    let operator = model.operator.as_deref().unwrap_or("operador");
    header![
        C!["widget-header"],
        span![format!("Bienvenido, {operator}")],
        button![
            "Cerrar sesión",
            C!["logout"],
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Logout
            }),
        ],
    ]
}

fn view_controls(model: &Model) -> Node<Msg> {
    form![
        C!["controls"],
        match model.planner.mode() {
            OperatingMode::TwoPoint => view_two_point_controls(model),
            OperatingMode::SinglePointWithConfirm => view_confirm_controls(model),
            OperatingMode::MultiWaypointAccumulate => view_accumulate_controls(model),
        },
        button![
            "Limpiar selección",
            C!["clear-btn"],
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::ClearSelection
            }),
        ],
        if model.planner.lifecycle() == RequestLifecycle::Pending {
            p![C!["pending"], "Calculando ruta…"]
        } else {
            empty![]
        },
        if let Some(banner) = &model.banner {
            p![C!["error"], banner]
        } else {
            empty![]
        },
    ]
}

fn view_two_point_controls(model: &Model) -> Node<Msg> {
    fieldset![
        legend!["Origen y destino"],
        small![
            "Haga clic en el mapa: el primer punto es el origen, el segundo el destino. \
             Un tercer clic inicia un par nuevo."
        ],
        view_waypoint_list(model, false),
    ]
}

fn view_confirm_controls(model: &Model) -> Node<Msg> {
    fieldset![
        legend!["Destino"],
        small!["Haga clic en el mapa para proponer un destino y confírmelo."],
        view_waypoint_list(model, false),
        if let Some(candidate) = model.planner.candidate() {
            div![
                C!["confirm-box"],
                p![format!("¿Usar {} como destino?", format_point(candidate))],
                button![
                    "Confirmar",
                    ev(Ev::Click, |event| {
                        event.prevent_default();
                        Msg::ConfirmDestination
                    }),
                ],
                button![
                    "Cancelar",
                    ev(Ev::Click, |event| {
                        event.prevent_default();
                        Msg::DeclineDestination
                    }),
                ],
            ]
        } else {
            empty![]
        },
    ]
}

fn view_accumulate_controls(model: &Model) -> Node<Msg> {
    let at_capacity = model.planner.waypoints().len() >= MAX_WAYPOINTS;
    fieldset![
        legend!["Paradas"],
        label![
            C!["adding-toggle"],
            input![
                attrs! {
                    At::Type => "checkbox",
                    At::Checked => bool_attr(model.planner.adding_points()),
                    At::Disabled => bool_attr(at_capacity && !model.planner.adding_points()),
                },
                ev(Ev::Change, |_| Msg::ToggleAddingPoints),
            ],
            span!["Agregar puntos con clic"],
        ],
        small![format!("Hasta {MAX_WAYPOINTS} paradas por ruta.")],
        view_waypoint_list(model, true),
        button![
            "Calcular ruta",
            C!["compute-btn"],
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::ComputeRoute
            }),
        ],
    ]
}

fn view_waypoint_list(model: &Model, removable: bool) -> Node<Msg> {
    let items = model
        .planner
        .waypoints()
        .iter()
        .enumerate()
        .map(|(index, point)| {
            li![
                format!("{index}: {}", format_point(*point)),
                if removable {
                    button![
                        "✕",
                        C!["remove"],
                        ev(Ev::Click, move |event| {
                            event.prevent_default();
                            Msg::RemoveWaypoint(index)
                        }),
                    ]
                } else {
                    empty![]
                },
            ]
        });
    ul![C!["waypoint-list"], items]
}

fn view_status(model: &Model) -> Node<Msg> {
    if let Some(route) = model.planner.route() {
        let latency = match route.server_processing_ms {
            Some(server_ms) => format!(
                "{} ms ({} ms en el servidor)",
                route.client_latency_ms, server_ms
            ),
            None => format!("{} ms", route.client_latency_ms),
        };
        div![
            C!["route-stats"],
            h2!["Última ruta"],
            p![format!("Distancia: {} km", format_km(route.distance_meters))],
            p![format!(
                "Tiempo estimado: {} min",
                format_minutes(route.predicted_time_min)
            )],
            p![format!("Latencia: {latency}")],
        ]
    } else {
        div![
            C!["route-stats"],
            h2!["Sin ruta"],
            p!["Seleccione puntos en el mapa para calcular una ruta."],
        ]
    }
}

fn format_point(point: Waypoint) -> String {
    format!("{:.5} / {:.5}", point.lat, point.lng)
}

/// Display-only conversion; the route result itself stays in meters.
fn format_km(distance_meters: f64) -> String {
    format!("{:.2}", distance_meters / 1000.0)
}

fn format_minutes(minutes: f64) -> String {
    format!("{minutes:.0}")
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lng: f64,
}

#[wasm_bindgen(start)]
pub fn start() {
    if session::current_user().is_none() {
        session::go_to_login();
        return;
    }
    App::start("app", init, update, view);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_thousand_meters_display_as_five_km() {
        assert_eq!(format_km(5000.0), "5.00");
    }

    #[test]
    fn km_display_rounds_to_two_decimals() {
        assert_eq!(format_km(5236.0), "5.24");
        assert_eq!(format_km(0.0), "0.00");
    }

    #[test]
    fn minutes_display_rounds_to_whole_numbers() {
        assert_eq!(format_minutes(12.0), "12");
        assert_eq!(format_minutes(11.6), "12");
    }

    #[test]
    fn points_display_with_five_decimals() {
        assert_eq!(
            format_point(Waypoint::new(-16.5, -68.189)),
            "-16.50000 / -68.18900"
        );
    }
}
