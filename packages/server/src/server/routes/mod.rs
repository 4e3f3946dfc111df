// HTTP routes
pub mod health;
pub mod pipelines;

pub use health::*;
pub use pipelines::*;
