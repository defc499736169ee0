pub mod config;
pub mod error;
pub mod paths;
pub mod store;
pub mod transfer;

pub use config::load_config;
pub use error::{Result, StoreError};
pub use paths::{data_dir_from_env, default_base_dir};
pub use store::CardStore;
