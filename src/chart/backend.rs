//! Seams to the outside world: the charting capability and the page that
//! hosts the chart slots.

use serde::{Deserialize, Serialize};

use super::types::{ChartDescription, Slot};
use crate::error::Result;

/// Opaque identifier of a live chart instance, issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceHandle(pub u64);

/// The charting capability (bar/doughnut/line rendering, legends, tooltips)
pub trait ChartBackend {
    /// False when the charting library is not loaded
    fn is_available(&self) -> bool;

    /// Draw `description` into its slot and return the live instance
    fn create(&mut self, description: &ChartDescription) -> Result<InstanceHandle>;

    /// Release an instance together with its DOM bindings and rendering state
    fn destroy(&mut self, handle: InstanceHandle) -> Result<()>;
}

/// The page that hosts the chart slots and their captions
pub trait RenderSurface {
    /// Not every host page includes every slot
    fn has_slot(&self, slot: Slot) -> bool;

    /// Replace the caption shown beneath `slot`
    fn set_caption(&mut self, slot: Slot, caption: &str);

    /// Remove whatever caption is shown beneath `slot`
    fn clear_caption(&mut self, slot: Slot);
}
