// HTTP routes
pub mod functions;
pub mod health;

pub use functions::*;
pub use health::*;
