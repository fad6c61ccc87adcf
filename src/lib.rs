#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

pub mod frame_info;
pub mod flat_library;
pub mod flat_state;
pub mod flat_select;
pub mod flat_plan;
pub mod picker;
pub mod config;
pub mod fs_utils;
pub mod log_utils;
pub mod progress;
