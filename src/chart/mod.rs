//! Chart descriptions, the charting seams, and the lifecycle manager.

pub mod backend;
pub mod lifecycle;
pub mod memory;
pub mod types;

pub use backend::{ChartBackend, InstanceHandle, RenderSurface};
pub use lifecycle::ChartLifecycleManager;
pub use memory::{MemoryBackend, MemorySurface};
pub use types::*;
