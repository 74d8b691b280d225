pub mod app_config;
pub mod config;
pub mod record;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use record::{
    Designer, Download, ExtractionError, Finish, FinishCatalog, ImageCategory, ImageSet,
    ProductRecord, RecordStatus,
};
