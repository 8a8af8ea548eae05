//! In-memory surface and chart backend.
//!
//! Used by the CLI to collect a render pass for export, and by tests to
//! observe the lifecycle discipline.

use std::collections::BTreeMap;

use super::backend::{ChartBackend, InstanceHandle, RenderSurface};
use super::types::{ChartDescription, Slot};
use crate::error::{InsightError, Result};

/// A host page with a configurable subset of slots
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    slots: BTreeMap<Slot, Option<String>>,
}

impl MemorySurface {
    /// A page that includes all four slots
    pub fn full() -> Self {
        Self::with_slots(&Slot::ALL)
    }

    pub fn with_slots(slots: &[Slot]) -> Self {
        Self {
            slots: slots.iter().map(|s| (*s, None)).collect(),
        }
    }

    pub fn caption(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).and_then(|c| c.as_deref())
    }

    pub fn captions(&self) -> impl Iterator<Item = (Slot, &str)> {
        self.slots
            .iter()
            .filter_map(|(slot, caption)| caption.as_deref().map(|c| (*slot, c)))
    }
}

impl RenderSurface for MemorySurface {
    fn has_slot(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    fn set_caption(&mut self, slot: Slot, caption: &str) {
        if let Some(entry) = self.slots.get_mut(&slot) {
            *entry = Some(caption.to_string());
        }
    }

    fn clear_caption(&mut self, slot: Slot) {
        if let Some(entry) = self.slots.get_mut(&slot) {
            *entry = None;
        }
    }
}

/// Records live chart instances instead of drawing them
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    available: bool,
    fail_destroy: bool,
    next_id: u64,
    live: BTreeMap<InstanceHandle, ChartDescription>,
    created: usize,
    destroyed: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            available: true,
            fail_destroy: false,
            next_id: 1,
            live: BTreeMap::new(),
            created: 0,
            destroyed: 0,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Make every subsequent `destroy` fail until switched off again
    pub fn fail_destroy(&mut self, fail: bool) {
        self.fail_destroy = fail;
    }

    pub fn is_live(&self, handle: InstanceHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live_in(&self, slot: Slot) -> usize {
        self.live.values().filter(|d| d.slot == slot).count()
    }

    pub fn live_total(&self) -> usize {
        self.live.len()
    }

    pub fn description(&self, slot: Slot) -> Option<&ChartDescription> {
        self.live.values().find(|d| d.slot == slot)
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &ChartDescription> {
        self.live.values()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

impl ChartBackend for MemoryBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create(&mut self, description: &ChartDescription) -> Result<InstanceHandle> {
        if !self.available {
            return Err(InsightError::Chart("backend not loaded".to_string()));
        }
        let handle = InstanceHandle(self.next_id);
        self.next_id += 1;
        self.live.insert(handle, description.clone());
        self.created += 1;
        Ok(handle)
    }

    fn destroy(&mut self, handle: InstanceHandle) -> Result<()> {
        if self.fail_destroy {
            return Err(InsightError::Chart(format!("cannot destroy {:?}", handle)));
        }
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_replaced_not_appended() {
        let mut surface = MemorySurface::full();
        surface.set_caption(Slot::Forecast, "first");
        surface.set_caption(Slot::Forecast, "second");
        assert_eq!(surface.caption(Slot::Forecast), Some("second"));
        assert_eq!(surface.captions().count(), 1);
    }

    #[test]
    fn test_clear_caption() {
        let mut surface = MemorySurface::full();
        surface.set_caption(Slot::Inventory, "plan");
        surface.clear_caption(Slot::Inventory);
        assert_eq!(surface.caption(Slot::Inventory), None);
        assert!(surface.has_slot(Slot::Inventory));
    }

    #[test]
    fn test_absent_slot_ignores_caption() {
        let mut surface = MemorySurface::with_slots(&[Slot::Waterfall]);
        assert!(!surface.has_slot(Slot::Forecast));
        surface.set_caption(Slot::Forecast, "ignored");
        assert_eq!(surface.caption(Slot::Forecast), None);
    }
}
