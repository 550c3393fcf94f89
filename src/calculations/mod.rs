pub mod forward_pass;
pub mod status;

pub use forward_pass::{ForwardPass, NodeTiming, hours_to_duration, topological_order};
pub use status::{Classification, TaskStatus, classify};
