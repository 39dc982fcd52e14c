use shared::{RouteRequest, Waypoint};

use crate::config::{OperatingMode, WidgetConfig};
use crate::request::{Dispatch, RequestToken, RouteSummary, RoutingError};
use crate::waypoints::WaypointStore;

/// Soft cap on accumulated stops. The controls stop offering new points at
/// this size; the store itself never rejects an append.
pub const MAX_WAYPOINTS: usize = 12;

/// Lifecycle of the single current route computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLifecycle {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    AwaitingConfirm(Waypoint),
}

/// What a map click did to the selection.
pub enum ClickOutcome {
    /// The selection changed and markers need a refresh. Carries a dispatch
    /// when the click completed a pair.
    Selected { dispatch: Option<Dispatch> },
    /// A destination candidate now awaits confirmation; the selection itself
    /// is untouched.
    Candidate(Waypoint),
    Ignored,
}

/// How a resolved route computation was applied.
#[derive(Debug, PartialEq)]
pub enum Resolution {
    RouteUpdated,
    Failed(RoutingError),
    /// The resolution belonged to a request that is no longer current.
    Superseded,
}

/// The widget's state machine. Owns the waypoint selection, the operating
/// mode, the request lifecycle and the supersession token; performs no I/O
/// itself and instead returns `Dispatch` descriptors for the caller to run.
pub struct RoutePlanner {
    mode: OperatingMode,
    store: WaypointStore,
    phase: Phase,
    lifecycle: RequestLifecycle,
    adding_points: bool,
    in_flight: Option<RequestToken>,
    issued: u64,
    route: Option<RouteSummary>,
}

impl RoutePlanner {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            mode: config.mode,
            store: WaypointStore::new(
                config.mode == OperatingMode::TwoPoint,
                config.pinned_origin,
            ),
            phase: Phase::Idle,
            lifecycle: RequestLifecycle::Idle,
            adding_points: false,
            in_flight: None,
            issued: 0,
            route: None,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.store.snapshot()
    }

    pub fn lifecycle(&self) -> RequestLifecycle {
        self.lifecycle
    }

    /// The last successfully computed route, if any. Errors never clear it.
    pub fn route(&self) -> Option<&RouteSummary> {
        self.route.as_ref()
    }

    pub fn candidate(&self) -> Option<Waypoint> {
        match self.phase {
            Phase::AwaitingConfirm(point) => Some(point),
            Phase::Idle => None,
        }
    }

    pub fn adding_points(&self) -> bool {
        self.adding_points
    }

    pub fn handle_click(&mut self, point: Waypoint) -> ClickOutcome {
        match self.mode {
            OperatingMode::TwoPoint => {
                self.store.append(point);
                if self.store.len() == 2 {
                    let origin = self.store.snapshot()[0];
                    let destination = self.store.snapshot()[1];
                    let dispatch = self.dispatch(RouteRequest::pair(origin, destination));
                    ClickOutcome::Selected {
                        dispatch: Some(dispatch),
                    }
                } else {
                    ClickOutcome::Selected { dispatch: None }
                }
            }
            OperatingMode::SinglePointWithConfirm => {
                if self.store.is_empty() {
                    // No origin was configured; the first pick becomes one.
                    self.store.append(point);
                    return ClickOutcome::Selected { dispatch: None };
                }
                self.phase = Phase::AwaitingConfirm(point);
                ClickOutcome::Candidate(point)
            }
            OperatingMode::MultiWaypointAccumulate => {
                if !self.adding_points {
                    return ClickOutcome::Ignored;
                }
                self.store.append(point);
                ClickOutcome::Selected { dispatch: None }
            }
        }
    }

    /// Commits the pending destination and fires the route computation.
    /// Returns `None` when no candidate is awaiting confirmation.
    pub fn confirm_destination(&mut self) -> Option<Dispatch> {
        let destination = match self.phase {
            Phase::AwaitingConfirm(point) => point,
            Phase::Idle => return None,
        };
        self.phase = Phase::Idle;
        // A confirmed destination replaces the previous one.
        if self.store.len() == 2 {
            self.store.remove(1);
        }
        self.store.append(destination);
        let origin = self.store.snapshot()[0];
        Some(self.dispatch(RouteRequest::pair(origin, destination)))
    }

    pub fn decline_destination(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn set_adding_points(&mut self, active: bool) {
        self.adding_points = active;
    }

    pub fn remove_waypoint(&mut self, index: usize) {
        self.store.remove(index);
    }

    /// Explicit route computation over the accumulated stops.
    pub fn compute_route(&mut self) -> Result<Dispatch, RoutingError> {
        debug_assert!(self.mode == OperatingMode::MultiWaypointAccumulate);
        if self.store.len() < 2 {
            return Err(RoutingError::InsufficientWaypoints);
        }
        let waypoints = self.store.snapshot().to_vec();
        Ok(self.dispatch(RouteRequest::accumulated(waypoints)))
    }

    /// Drops the selection, the rendered route and any in-flight request. A
    /// response arriving after this is a no-op.
    pub fn clear(&mut self) {
        self.store.clear();
        self.phase = Phase::Idle;
        self.lifecycle = RequestLifecycle::Idle;
        self.in_flight = None;
        self.route = None;
    }

    /// Applies a resolved computation. Resolutions whose token is not the
    /// current in-flight one are dropped without touching any state.
    pub fn apply_outcome(
        &mut self,
        token: RequestToken,
        outcome: Result<RouteSummary, RoutingError>,
    ) -> Resolution {
        if self.in_flight != Some(token) {
            return Resolution::Superseded;
        }
        self.in_flight = None;
        match outcome {
            Ok(summary) => {
                self.lifecycle = RequestLifecycle::Succeeded;
                self.route = Some(summary);
                Resolution::RouteUpdated
            }
            Err(err) => {
                self.lifecycle = RequestLifecycle::Failed;
                Resolution::Failed(err)
            }
        }
    }

    /// Fails the request identified by `token` if it is still the current
    /// one; its eventual network resolution then counts as superseded.
    pub fn timeout_elapsed(&mut self, token: RequestToken) -> Option<RoutingError> {
        if self.in_flight != Some(token) {
            return None;
        }
        self.in_flight = None;
        self.lifecycle = RequestLifecycle::Failed;
        Some(RoutingError::Timeout)
    }

    fn dispatch(&mut self, payload: RouteRequest) -> Dispatch {
        self.issued += 1;
        let token = RequestToken::new(self.issued);
        self.in_flight = Some(token);
        self.lifecycle = RequestLifecycle::Pending;
        Dispatch { token, payload }
    }
}
