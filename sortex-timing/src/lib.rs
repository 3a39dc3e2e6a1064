pub mod deferred;
pub mod timer;

pub use deferred::{DeferredTransition, Ticket};
pub use timer::{HighPrecisionTimer, ManualTimer, Timer};
