pub mod text;
pub mod timeline;

pub use text::{TextRenderer, render_frame, render_results};
pub use timeline::{TimelinePalette, render_timeline, save_timeline_png};
