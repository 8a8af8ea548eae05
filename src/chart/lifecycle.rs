//! Chart lifecycle management.
//!
//! The manager owns a fixed registry indexed by [`Slot`]; each entry holds at
//! most one live instance handle. Teardown always goes through the registry,
//! never through a backend-global instance list.

use super::backend::{ChartBackend, InstanceHandle};
use super::types::{ChartDescription, Slot};
use crate::error::{InsightError, Result};

#[derive(Debug, Clone, Copy)]
struct LiveChart {
    handle: InstanceHandle,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ChartLifecycleManager {
    registry: [Option<LiveChart>; 4],
    generation: u64,
}

impl ChartLifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy every registered instance. Returns how many were released.
    ///
    /// With no instances registered this is a no-op. When the backend is
    /// unavailable nothing is touched and a diagnostic is logged. Instances
    /// the backend fails to destroy stay registered so a later `install`
    /// retries their release before creating a replacement.
    pub fn destroy_all<B>(&mut self, backend: &mut B) -> usize
    where
        B: ChartBackend + ?Sized,
    {
        if self.live_count() == 0 {
            return 0;
        }
        if !backend.is_available() {
            log::warn!(
                "Charting library unavailable, skipping teardown of {} chart(s)",
                self.live_count()
            );
            return 0;
        }

        let mut released = 0;
        for slot in Slot::ALL {
            match self.release(slot, backend) {
                Ok(true) => released += 1,
                Ok(false) => {}
                Err(e) => log::warn!("Failed to destroy chart in {}: {}", slot, e),
            }
        }
        log::debug!("Destroyed {} chart instance(s)", released);
        released
    }

    /// Create a chart for `description.slot`, releasing whatever occupied the
    /// slot first
    pub fn install<B>(&mut self, description: &ChartDescription, backend: &mut B) -> Result<InstanceHandle>
    where
        B: ChartBackend + ?Sized,
    {
        let slot = description.slot;
        if !backend.is_available() {
            return Err(InsightError::Chart(format!(
                "charting library unavailable, cannot draw {}",
                slot
            )));
        }

        self.release(slot, backend)?;

        let handle = backend.create(description)?;
        self.generation += 1;
        self.registry[slot.index()] = Some(LiveChart {
            handle,
            generation: self.generation,
        });
        log::debug!("Created chart {:?} in {} (generation {})", handle, slot, self.generation);
        Ok(handle)
    }

    /// Release the instance in `slot`, if any. The registry entry is cleared
    /// only after the backend confirms the destruction.
    fn release<B>(&mut self, slot: Slot, backend: &mut B) -> Result<bool>
    where
        B: ChartBackend + ?Sized,
    {
        let Some(live) = self.registry[slot.index()] else {
            return Ok(false);
        };
        backend.destroy(live.handle)?;
        self.registry[slot.index()] = None;
        log::trace!(
            "Released chart {:?} from {} (generation {})",
            live.handle,
            slot,
            live.generation
        );
        Ok(true)
    }

    pub fn handle(&self, slot: Slot) -> Option<InstanceHandle> {
        self.registry[slot.index()].map(|live| live.handle)
    }

    pub fn live_count(&self) -> usize {
        self.registry.iter().filter(|entry| entry.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::memory::MemoryBackend;
    use crate::chart::types::ChartKind;

    fn description(slot: Slot) -> ChartDescription {
        ChartDescription::new(slot, ChartKind::Bar, "test", vec!["a".to_string()])
    }

    #[test]
    fn test_destroy_with_nothing_registered_is_noop() {
        let mut manager = ChartLifecycleManager::new();
        let mut backend = MemoryBackend::new();
        assert_eq!(manager.destroy_all(&mut backend), 0);
        assert_eq!(manager.destroy_all(&mut backend), 0);
        assert_eq!(backend.destroyed(), 0);
    }

    #[test]
    fn test_install_replaces_existing_instance() {
        let mut manager = ChartLifecycleManager::new();
        let mut backend = MemoryBackend::new();

        let first = manager.install(&description(Slot::Forecast), &mut backend).unwrap();
        let second = manager.install(&description(Slot::Forecast), &mut backend).unwrap();

        assert_ne!(first, second);
        assert!(!backend.is_live(first));
        assert!(backend.is_live(second));
        assert_eq!(backend.live_in(Slot::Forecast), 1);
        assert_eq!(manager.handle(Slot::Forecast), Some(second));
    }

    #[test]
    fn test_destroy_all_releases_every_slot() {
        let mut manager = ChartLifecycleManager::new();
        let mut backend = MemoryBackend::new();
        for slot in Slot::ALL {
            manager.install(&description(slot), &mut backend).unwrap();
        }
        assert_eq!(manager.live_count(), 4);

        assert_eq!(manager.destroy_all(&mut backend), 4);
        assert_eq!(manager.live_count(), 0);
        assert_eq!(backend.live_total(), 0);
        assert_eq!(manager.destroy_all(&mut backend), 0);
    }

    #[test]
    fn test_unavailable_backend_skips_teardown() {
        let mut manager = ChartLifecycleManager::new();
        let mut backend = MemoryBackend::new();
        manager.install(&description(Slot::Waterfall), &mut backend).unwrap();

        backend.set_available(false);
        assert_eq!(manager.destroy_all(&mut backend), 0);
        assert_eq!(manager.live_count(), 1);
        assert!(manager.install(&description(Slot::Waterfall), &mut backend).is_err());
    }

    #[test]
    fn test_failed_destroy_blocks_replacement() {
        let mut manager = ChartLifecycleManager::new();
        let mut backend = MemoryBackend::new();
        let handle = manager.install(&description(Slot::Inventory), &mut backend).unwrap();

        backend.fail_destroy(true);
        assert_eq!(manager.destroy_all(&mut backend), 0);
        assert_eq!(manager.handle(Slot::Inventory), Some(handle));
        assert!(manager.install(&description(Slot::Inventory), &mut backend).is_err());
        assert_eq!(backend.live_in(Slot::Inventory), 1);

        backend.fail_destroy(false);
        let replacement = manager.install(&description(Slot::Inventory), &mut backend).unwrap();
        assert_eq!(backend.live_in(Slot::Inventory), 1);
        assert!(backend.is_live(replacement));
    }
}
