//! Request handlers.

pub mod classify;
pub mod examples;
pub mod health;
pub mod page;

pub use classify::*;
pub use examples::*;
pub use health::*;
pub use page::*;
