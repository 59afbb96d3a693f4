//! Test double for [`WorldHooks`].

use std::collections::HashSet;

use glam::Vec3;

use crate::scene::{IndicatorColor, VisualHandle, VisualKind, WorldHooks};

/// Records every hook call and lets tests control visual readiness.
#[derive(Debug)]
pub(crate) struct RecordingHooks {
    next_handle: u64,
    /// Handles currently alive (spawned and not removed).
    pub alive: HashSet<VisualHandle>,
    /// Handles the host reports as not ready.
    pub not_ready: HashSet<VisualHandle>,
    /// Every spawn in order.
    pub spawned: Vec<(VisualHandle, VisualKind, Vec3)>,
    /// Every removal in order.
    pub removed: Vec<VisualHandle>,
    /// Every color push in order.
    pub colors: Vec<IndicatorColor>,
    /// When true, newly spawned visuals start not-ready.
    pub spawn_not_ready: bool,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            alive: HashSet::new(),
            not_ready: HashSet::new(),
            spawned: Vec::new(),
            removed: Vec::new(),
            colors: Vec::new(),
            spawn_not_ready: false,
        }
    }

    /// Flip a handle to ready.
    pub fn mark_ready(&mut self, handle: VisualHandle) {
        self.not_ready.remove(&handle);
    }

    pub fn last_color(&self) -> Option<IndicatorColor> {
        self.colors.last().copied()
    }
}

impl WorldHooks for RecordingHooks {
    fn spawn_visual(&mut self, kind: VisualKind, position: Vec3) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.alive.insert(handle);
        if self.spawn_not_ready {
            self.not_ready.insert(handle);
        }
        self.spawned.push((handle, kind, position));
        handle
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        assert!(
            self.alive.remove(&handle),
            "visual {handle:?} removed twice or never spawned"
        );
        self.removed.push(handle);
    }

    fn visual_ready(&self, handle: VisualHandle) -> bool {
        !self.not_ready.contains(&handle)
    }

    fn set_player_color(&mut self, color: IndicatorColor) {
        self.colors.push(color);
    }
}
