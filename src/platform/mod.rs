//! Operating-system integrations for the copy and share actions.
//!
//! Both shell out to the helpers every desktop already ships: a clipboard
//! writer (`pbcopy`, `clip`, `wl-copy`, `xclip`, `xsel`) and the URL opener
//! (`open`, `xdg-open`, `start`).

mod clipboard;
mod launcher;

pub use clipboard::{ClipboardTool, SystemClipboard};
pub use launcher::{SystemShareLauncher, opener_command};
