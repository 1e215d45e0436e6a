pub mod capabilities;
pub mod config;
pub mod features;
pub mod inference;
pub mod logging;
pub mod router;
pub mod scenario;
pub mod session;
