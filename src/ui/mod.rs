//! Terminal output: the shared console and the thinking indicator.

pub mod console;
pub mod thinking;
