// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! Logging for the supervisor, a thin layer over the `log` facade.
//!
//! The macros are the facade's own; this crate decides where records go.
pub mod logger;

pub use log_facade::{debug, error, info, log, trace, warn};
pub use log_facade::{max_level, set_max_level};
pub use log_facade::{Level, LevelFilter, Log, Metadata, Record};

pub use logger::init_log;

/// Initialize console logger.
pub fn init_log_to_console(name: &str, level: Level) {
    init_log(name, level, vec!["console"]);
}

/// Initialize kmsg and console logger.
pub fn init_log_to_kmsg_console(name: &str, level: Level) {
    init_log(name, level, vec!["kmsg", "console"]);
}

#[cfg(test)]
mod tests {
    use crate::{init_log_to_console, Level};

    #[test]
    fn test_init_log_to_console() {
        init_log_to_console("test", Level::Debug);
        crate::error!("hello, error!");
        crate::set_max_level(Level::Info.to_level_filter());
        crate::info!("hello, info!");
        crate::debug!("hello debug!"); /* Won't print */
        assert_eq!(crate::max_level(), Level::Info.to_level_filter());
    }
}
