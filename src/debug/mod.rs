//! Development-time inspection of running machines.
//!
//! Nothing here is needed for a machine to run. Tools use it to look at a
//! machine from the outside:
//!
//! - [`MachineSnapshot`]: serialisable view of states, edges, current state,
//!   armed triggers and recent history
//! - [`GraphLayout`]: force-directed 2D placement of a snapshot's states
//! - [`VisualizerRegistry`]: an explicit, additive list of published
//!   snapshots for a viewer to enumerate

mod layout;
mod registry;
mod snapshot;

pub use layout::{GraphLayout, LayoutConfig};
pub use registry::{VisualizerEntry, VisualizerRegistry};
pub use snapshot::{MachineSnapshot, SnapshotEdge};
