//! Chrome around the screens: theme, shell panels and shared widgets

pub mod shell;
pub mod theme;
pub mod widgets;

pub use shell::{screen_links, AppShell};
pub use theme::apply_theme;
