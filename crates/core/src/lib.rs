pub mod assessment;
pub mod config;
pub mod error;
pub mod reading;

pub use assessment::*;
pub use config::Config;
pub use error::*;
pub use reading::*;
