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
//
#![allow(non_snake_case)]
//! Supervisor configuration, read from `/etc/levelmaster/system.toml`.
use confique::Config;
use constants::SYSTEM_CONFIG;
use log::Level;
use nix::sys::signal::Signal;
use std::str::FromStr;

/// Top level of the configuration file.
#[derive(Config, Debug)]
pub struct SupervisorConfig {
    #[config(nested)]
    pub Supervisor: SectionSupervisor,
}

/// The `[Supervisor]` section.
#[derive(Config, Debug)]
pub struct SectionSupervisor {
    #[config(default = "info")]
    pub LogLevel: String,
    #[config(default = "console")]
    pub LogTarget: String,
    #[config(default = "default")]
    pub DefaultRunlevel: String,
    #[config(default = "SIGTERM")]
    pub KillSignal: String,
    #[config(default = true)]
    pub WarnUnknownShell: bool,
}

impl Default for SectionSupervisor {
    fn default() -> Self {
        SectionSupervisor {
            LogLevel: "info".to_string(),
            LogTarget: "console".to_string(),
            DefaultRunlevel: constants::DEFAULT_RUNLEVEL.to_string(),
            KillSignal: "SIGTERM".to_string(),
            WarnUnknownShell: true,
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            Supervisor: SectionSupervisor::default(),
        }
    }
}

impl SupervisorConfig {
    /// Load from the environment, then `file` (or the system file), then
    /// the defaults. Any load error yields the defaults.
    pub fn new(file: Option<&str>) -> SupervisorConfig {
        let builder = SupervisorConfig::builder().env();
        let config = builder.file(file.unwrap_or(SYSTEM_CONFIG));
        match config.load() {
            Ok(c) => c,
            Err(e) => {
                log::debug!("Failed to load the supervisor config, using defaults: {}", e);
                SupervisorConfig::default()
            }
        }
    }

    /// configured log level, `Info` when unparseable
    pub fn log_level(&self) -> Level {
        Level::from_str(self.Supervisor.LogLevel.trim()).unwrap_or(Level::Info)
    }

    /// configured log targets, comma separated in the file
    pub fn log_targets(&self) -> Vec<&str> {
        self.Supervisor
            .LogTarget
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// signal used by the pid based stop strategies, `SIGTERM` when unparseable
    pub fn kill_signal(&self) -> Signal {
        match Signal::from_str(self.Supervisor.KillSignal.trim()) {
            Ok(sig) => sig,
            Err(_) => {
                log::warn!(
                    "Unknown KillSignal {:?}, using SIGTERM",
                    self.Supervisor.KillSignal
                );
                Signal::SIGTERM
            }
        }
    }

    ///
    pub fn default_runlevel(&self) -> &str {
        &self.Supervisor.DefaultRunlevel
    }

    ///
    pub fn warn_unknown_shell(&self) -> bool {
        self.Supervisor.WarnUnknownShell
    }

    /// install the logger described by this configuration
    pub fn init_logging(&self, name: &str) {
        log::init_log(name, self.log_level(), self.log_targets());
    }
}

#[cfg(test)]
mod test {
    use libtests::get_crate_root;
    use std::path::PathBuf;

    use super::*;
    #[test]
    fn load() {
        let mut file: PathBuf = get_crate_root().unwrap();
        file.push("config/system.toml");
        let config = SupervisorConfig::new(file.to_str());
        println!("{:?}", config);
        assert_eq!(config.default_runlevel(), "default");
        assert_eq!(config.kill_signal(), Signal::SIGTERM);
        assert_eq!(config.log_level(), Level::Debug);
        assert_eq!(config.log_targets(), vec!["console", "syslog"]);
        assert!(config.warn_unknown_shell());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = SupervisorConfig::new(Some("/nonexistent/levelmaster/system.toml"));
        assert_eq!(config.default_runlevel(), "default");
        assert_eq!(config.log_level(), Level::Info);
        assert_eq!(config.log_targets(), vec!["console"]);
    }

    #[test]
    fn fallbacks() {
        let mut config = SupervisorConfig::default();
        config.Supervisor.KillSignal = "SIGNOPE".to_string();
        config.Supervisor.LogLevel = "loud".to_string();
        assert_eq!(config.kill_signal(), Signal::SIGTERM);
        assert_eq!(config.log_level(), Level::Info);

        config.Supervisor.KillSignal = "SIGKILL".to_string();
        assert_eq!(config.kill_signal(), Signal::SIGKILL);
    }
}
