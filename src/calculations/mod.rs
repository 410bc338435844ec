pub mod effort;
pub mod propagation;

pub use effort::{StartSlot, compute_end_date, remaining_capacity_at_end, resolve_next_available};
pub use propagation::{DEFAULT_MAX_PASSES, Propagation, PropagationReport, propagate};
