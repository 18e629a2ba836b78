use crate::feed::controller::LoadStatus;
use tracing::debug;

/// Distance around the viewport at which the last item counts as reached
pub const ROOT_MARGIN: f32 = 100.0;

/// Vertical window onto the rendered list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub height: f32,
    pub margin: f32,
}

impl Viewport {
    pub fn new(top: f32, height: f32) -> Self {
        Self {
            top,
            height,
            margin: ROOT_MARGIN,
        }
    }

    /// Whether the span `[start, end)` overlaps the viewport grown by the margin
    pub fn intersects(&self, start: f32, end: f32) -> bool {
        let lower = self.top - self.margin;
        let upper = self.top + self.height + self.margin;
        end > lower && start < upper
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.top = (self.top + delta).max(0.0);
    }
}

/// Visibility change of an observed item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEvent {
    pub item_id: String,
    pub intersecting: bool,
}

impl IntersectionEvent {
    pub fn new(item_id: impl Into<String>, intersecting: bool) -> Self {
        Self {
            item_id: item_id.into(),
            intersecting,
        }
    }
}

#[derive(Debug)]
struct Observation {
    item_id: String,
    intersecting: bool,
}

#[derive(Debug, Default)]
pub struct ScrollTrigger {
    observed: Option<Observation>,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `last_item`, the item about to be rendered last
    ///
    /// Ignored while a load is running or before the first page arrived; the
    /// previous observation then stays in place. Returns whether the
    /// observation was replaced.
    pub fn attach(&mut self, last_item: Option<&str>, status: LoadStatus) -> bool {
        if status.busy() || !status.searched {
            return false;
        }

        self.release();
        if let Some(id) = last_item {
            debug!("Observing {} as the scroll sentinel", id);
            self.observed = Some(Observation {
                item_id: id.to_string(),
                intersecting: false,
            });
        }
        true
    }

    /// Feed a visibility change in; true means "load the next page now"
    ///
    /// Fires once per entry into the margin, and only when no load is running
    /// and more data is known to exist.
    pub fn observe(&mut self, event: &IntersectionEvent, status: LoadStatus) -> bool {
        let Some(observation) = self.observed.as_mut() else {
            return false;
        };
        if observation.item_id != event.item_id {
            return false;
        }

        let entered = event.intersecting && !observation.intersecting;
        observation.intersecting = event.intersecting;

        entered && status.has_more && !status.busy()
    }

    pub fn observed(&self) -> Option<&str> {
        self.observed.as_ref().map(|o| o.item_id.as_str())
    }

    /// Stop observing; no event fires until the next `attach`
    pub fn release(&mut self) {
        if let Some(observation) = self.observed.take() {
            debug!("Released scroll sentinel {}", observation.item_id);
        }
    }
}

impl Drop for ScrollTrigger {
    fn drop(&mut self) {
        self.release();
    }
}
