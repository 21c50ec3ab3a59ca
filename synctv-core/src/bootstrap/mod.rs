//! Process startup and shutdown
//!
//! - Configuration loading
//! - Signal handling and exit/reload task dispatch

pub mod config;
pub mod sys_notify;

pub use config::{config_path, load_config};
pub use sys_notify::{DispatchReport, NotifyType, SysNotify, TaskGroup};
