pub mod bug_report;
pub mod config;
pub mod db;
pub mod logger;

pub use config::{get_data_dir, load_app_config};
pub use db::ShareStore;
pub use logger::init_logger;
