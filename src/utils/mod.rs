//! Common utilities and helper functions

pub mod error;
pub mod jitter;

pub use jitter::SleepRange;

/// Format a list of dates as one `- date` line each
pub fn bullet_list<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
