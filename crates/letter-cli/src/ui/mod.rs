//! UI primitives for the Letter CLI.
//!
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and their styles
//! - **Render**: Badges, key-value lines, hints, errors
//! - **Progress**: Spinner shown while keys are derived

mod context;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, blank_line, divider, header, hint, kv, print, print_error};

pub use progress::Spinner;
