//! Shared database access for TutorLink services

pub mod init;

pub use init::{create_settings_table, get_setting, init_database_pool, set_setting};
