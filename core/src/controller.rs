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

//! Start and stop one record, applying its flags and its stop strategy.
use crate::hooks::Hooks;
use crate::launcher::Launcher;
use crate::outcome::Outcome;
use crate::record::{ServiceRecord, StopMode};
use crate::report::status_line;
use basic::process;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::sync::Arc;

/// Drives single records through their start and stop paths.
#[derive(Clone)]
pub struct ServiceController {
    launcher: Launcher,
    kill_signal: Signal,
}

impl ServiceController {
    ///
    pub fn new(launcher: Launcher, kill_signal: Signal) -> ServiceController {
        ServiceController {
            launcher,
            kill_signal,
        }
    }

    ///
    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    ///
    pub fn kill_signal(&self) -> Signal {
        self.kill_signal
    }

    fn hooks(&self) -> &Hooks {
        self.launcher.hooks()
    }

    /// Start or stop `record`, with status lines when `report` is set.
    pub fn process(&self, record: &Arc<ServiceRecord>, is_start: bool, report: bool) -> Outcome {
        if is_start {
            self.start(record, report)
        } else {
            self.stop(record, report)
        }
    }

    fn start(&self, record: &Arc<ServiceRecord>, report: bool) -> Outcome {
        if record.start_command().is_empty() {
            return Outcome::Success;
        }

        let line = status_line(record, true);
        if record.halt_cmd_only() {
            log::debug!("{} is only run at halt, refusing to start it", record.id());
            if report {
                self.hooks().reporter.report(&line, Outcome::Failure);
            }
            return Outcome::Failure;
        }

        if report {
            self.hooks().reporter.announce(&line);
        }

        let outcome = if record.no_wait() {
            let outcome = self.launcher.launch_detached(record);
            record.set_started(true);
            outcome
        } else {
            let outcome = self.launcher.launch(record, true);
            record.set_started(outcome == Outcome::Success);
            outcome
        };

        if report {
            self.hooks().reporter.report(&line, outcome);
        }
        outcome
    }

    fn stop(&self, record: &Arc<ServiceRecord>, report: bool) -> Outcome {
        let stop_mode = record.stop_mode();
        if stop_mode == StopMode::Invalid {
            log::warn!("{} has an invalid stop mode, leaving it alone", record.id());
            return Outcome::default();
        }

        let line = status_line(record, false);
        if report {
            self.hooks().reporter.announce(&line);
        }

        let outcome = match stop_mode {
            StopMode::Command => {
                if record.stop_command().is_empty() {
                    Outcome::Success
                } else {
                    self.launcher.launch(record, false)
                }
            }
            StopMode::Pid => self.kill(record, record.process_id()),
            StopMode::PidFile => match self.hooks().pid_file.read_pid_file(record) {
                Some(pid) => self.kill(record, pid),
                None => {
                    log::warn!("Failed to read the pid file of {}", record.id());
                    Outcome::Failure
                }
            },
            StopMode::None | StopMode::Invalid => Outcome::Success,
        };

        if outcome == Outcome::Success {
            record.set_started(false);
        }
        if report {
            self.hooks().reporter.report(&line, outcome);
        }
        outcome
    }

    fn kill(&self, record: &ServiceRecord, pid: Pid) -> Outcome {
        if !process::valid_pid(pid) {
            log::warn!("Refusing to signal pid {} of {}", pid, record.id());
            return Outcome::Failure;
        }

        match process::send_signal(pid, self.kill_signal) {
            Ok(()) => {
                log::debug!("Sent {} to {} (pid {})", self.kill_signal, record.id(), pid);
                Outcome::Success
            }
            Err(e) => {
                log::warn!(
                    "Failed to send {} to {} (pid {}): {}",
                    self.kill_signal,
                    record.id(),
                    pid,
                    e
                );
                Outcome::Failure
            }
        }
    }
}
