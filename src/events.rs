//! DOM event wiring. Every handler forwards into the shared `Session`;
//! presentation changes come back through the next frame's `UiUpdate`s.

pub mod keyboard;
pub mod pointer;
pub mod ui;
