use shared::Waypoint;

/// Ordered collection of the points the operator has picked. Single source of
/// truth for the selection; appending is the only growth path and entries are
/// never reordered.
pub struct WaypointStore {
    points: Vec<Waypoint>,
    pinned_origin: Option<Waypoint>,
    pair_mode: bool,
}

impl WaypointStore {
    pub fn new(pair_mode: bool, pinned_origin: Option<Waypoint>) -> Self {
        let mut store = Self {
            points: Vec::new(),
            pinned_origin,
            pair_mode,
        };
        store.clear();
        store
    }

    /// Adds a point at the end. In pair mode a third point starts a fresh
    /// pair: two clicks define origin and destination, the next click
    /// restarts the selection.
    pub fn append(&mut self, point: Waypoint) {
        if self.pair_mode && self.points.len() >= 2 {
            self.points.clear();
        }
        self.points.push(point);
    }

    /// Drops the whole selection. A pinned origin survives the reset.
    pub fn clear(&mut self) {
        self.points.clear();
        if let Some(origin) = self.pinned_origin {
            self.points.push(origin);
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.points.len() {
            self.points.remove(index);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn snapshot(&self) -> &[Waypoint] {
        &self.points
    }
}
