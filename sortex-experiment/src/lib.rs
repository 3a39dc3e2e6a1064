pub mod config;
pub mod participant;
pub mod state;
pub mod summary;
pub mod view;

pub use config::SessionConfig;
pub use participant::{Participant, Strategy, play_through};
pub use state::{SessionController, SessionEvent};
pub use summary::{SessionSummary, TimelineEntry};
pub use view::{SessionObserver, SessionView};

pub use sortex_core::correct_side;
