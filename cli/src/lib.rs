pub mod error;
pub mod inspector;
pub mod transfer;
pub mod types;
mod utils;

pub use utils::{load_config, load_config_from};
