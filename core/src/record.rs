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

//! The service record: configuration and runtime state of one supervisable unit.
use bitflags::bitflags;
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

bitflags! {
    /// Behaviour switches of a service record.
    #[derive(Default)]
    pub struct ServiceFlags: u32 {
        /// participates in starts
        const ENABLED = 1 << 0;
        /// start in the background, do not block the caller
        const NO_WAIT = 1 << 1;
        /// long running, the launched command forks once more
        const IS_SERVICE = 1 << 2;
        /// never started, only ever stopped
        const HALT_CMD_ONLY = 1 << 3;
        /// eligible to be stopped during a runlevel switch
        const CAN_STOP = 1 << 4;
        /// the description is printed verbatim
        const RAW_DESCRIPTION = 1 << 5;
    }
}

/// How a started service is brought down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// run the stop command
    Command,
    /// signal the tracked process id
    Pid,
    /// signal the process id found in the pid file
    PidFile,
    /// nothing to do, only forget the service was started
    None,
    /// misconfigured, stopping does nothing at all
    Invalid,
}

impl Default for StopMode {
    fn default() -> Self {
        StopMode::None
    }
}

impl FromStr for StopMode {
    type Err = std::convert::Infallible;

    /// Unknown names map to `Invalid`, a record is never rejected for it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "command" => StopMode::Command,
            "pid" => StopMode::Pid,
            "pidfile" => StopMode::PidFile,
            "none" => StopMode::None,
            _ => StopMode::Invalid,
        };
        Ok(mode)
    }
}

/// One supervisable unit.
///
/// Everything but the runtime state is fixed once the record is put into a
/// service table. The runtime state may be touched by a background launch
/// while the control thread reads it, so it is kept in atomics.
#[derive(Debug, Default)]
pub struct ServiceRecord {
    id: String,
    description: String,
    start_command: String,
    stop_command: String,
    start_priority: u32,
    stop_priority: u32,
    runlevels: Vec<String>,
    flags: ServiceFlags,
    stop_mode: StopMode,
    pid_file: Option<PathBuf>,

    started: AtomicBool,
    process_id: AtomicI32,
}

impl ServiceRecord {
    /// a record with no commands, no priorities and no flags set
    pub fn new(id: &str) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            description: id.to_string(),
            ..Default::default()
        }
    }

    ///
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    ///
    pub fn with_start_command(mut self, command: &str) -> Self {
        self.start_command = command.to_string();
        self
    }

    ///
    pub fn with_stop_command(mut self, command: &str) -> Self {
        self.stop_command = command.to_string();
        self
    }

    /// set the start and stop priority, zero keeps the record out of sweeps
    pub fn with_priorities(mut self, start: u32, stop: u32) -> Self {
        self.start_priority = start;
        self.stop_priority = stop;
        self
    }

    /// add a runlevel the record belongs to
    pub fn with_runlevel(mut self, runlevel: &str) -> Self {
        self.runlevels.push(runlevel.to_string());
        self
    }

    ///
    pub fn with_flags(mut self, flags: ServiceFlags) -> Self {
        self.flags = flags;
        self
    }

    ///
    pub fn with_stop_mode(mut self, stop_mode: StopMode) -> Self {
        self.stop_mode = stop_mode;
        self
    }

    ///
    pub fn with_pid_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.pid_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Initial runtime state. A halt-only record is never started by the
    /// supervisor, it only takes part in a stop sweep when built as started.
    pub fn with_started(self, started: bool) -> Self {
        self.started.store(started, Ordering::Release);
        self
    }

    ///
    pub fn id(&self) -> &str {
        &self.id
    }

    ///
    pub fn description(&self) -> &str {
        &self.description
    }

    ///
    pub fn start_command(&self) -> &str {
        &self.start_command
    }

    ///
    pub fn stop_command(&self) -> &str {
        &self.stop_command
    }

    /// the command run for the given direction
    pub fn command(&self, is_start: bool) -> &str {
        if is_start {
            &self.start_command
        } else {
            &self.stop_command
        }
    }

    ///
    pub fn start_priority(&self) -> u32 {
        self.start_priority
    }

    ///
    pub fn stop_priority(&self) -> u32 {
        self.stop_priority
    }

    /// the priority used for the given direction
    pub fn priority(&self, is_start: bool) -> u32 {
        if is_start {
            self.start_priority
        } else {
            self.stop_priority
        }
    }

    ///
    pub fn runlevels(&self) -> &[String] {
        &self.runlevels
    }

    ///
    pub fn flags(&self) -> ServiceFlags {
        self.flags
    }

    ///
    pub fn enabled(&self) -> bool {
        self.flags.contains(ServiceFlags::ENABLED)
    }

    ///
    pub fn no_wait(&self) -> bool {
        self.flags.contains(ServiceFlags::NO_WAIT)
    }

    ///
    pub fn is_service(&self) -> bool {
        self.flags.contains(ServiceFlags::IS_SERVICE)
    }

    ///
    pub fn halt_cmd_only(&self) -> bool {
        self.flags.contains(ServiceFlags::HALT_CMD_ONLY)
    }

    ///
    pub fn can_stop(&self) -> bool {
        self.flags.contains(ServiceFlags::CAN_STOP)
    }

    ///
    pub fn raw_description(&self) -> bool {
        self.flags.contains(ServiceFlags::RAW_DESCRIPTION)
    }

    ///
    pub fn stop_mode(&self) -> StopMode {
        self.stop_mode
    }

    ///
    pub fn pid_file(&self) -> Option<&Path> {
        self.pid_file.as_deref()
    }

    /// whether the supervisor considers the service running
    pub fn started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub(crate) fn set_started(&self, started: bool) {
        self.started.store(started, Ordering::Release);
    }

    /// best known process id of the launched command, 0 if none
    pub fn process_id(&self) -> Pid {
        Pid::from_raw(self.process_id.load(Ordering::Acquire))
    }

    /// Replace the tracked process id. Meant for pid refinement, which owns
    /// the final say on which process a record maps to.
    pub fn set_process_id(&self, pid: Pid) {
        self.process_id.store(pid.as_raw(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let record = ServiceRecord::new("syslogd");
        assert_eq!(record.id(), "syslogd");
        assert_eq!(record.description(), "syslogd");
        assert!(record.start_command().is_empty());
        assert_eq!(record.priority(true), 0);
        assert!(!record.enabled());
        assert!(!record.started());
        assert_eq!(record.process_id(), Pid::from_raw(0));
        assert_eq!(record.stop_mode(), StopMode::None);
    }

    #[test]
    fn test_builder() {
        let record = ServiceRecord::new("sshd")
            .with_description("OpenSSH server")
            .with_start_command("/usr/sbin/sshd")
            .with_stop_command("pkill sshd")
            .with_priorities(5, 2)
            .with_runlevel("multiuser")
            .with_flags(ServiceFlags::ENABLED | ServiceFlags::IS_SERVICE)
            .with_stop_mode(StopMode::PidFile)
            .with_pid_file("/run/sshd.pid");

        assert_eq!(record.command(true), "/usr/sbin/sshd");
        assert_eq!(record.command(false), "pkill sshd");
        assert_eq!(record.priority(true), 5);
        assert_eq!(record.priority(false), 2);
        assert_eq!(record.runlevels(), &["multiuser".to_string()]);
        assert!(record.enabled() && record.is_service());
        assert!(!record.no_wait() && !record.halt_cmd_only() && !record.can_stop());
        assert_eq!(record.pid_file(), Some(Path::new("/run/sshd.pid")));
    }

    #[test]
    fn test_with_started() {
        let record = ServiceRecord::new("sync")
            .with_flags(ServiceFlags::HALT_CMD_ONLY)
            .with_started(true);
        assert!(record.started());
        assert!(!ServiceRecord::new("sync").with_started(false).started());
    }

    #[test]
    fn test_runtime_state() {
        let record = ServiceRecord::new("cron");
        record.set_started(true);
        record.set_process_id(Pid::from_raw(4321));
        assert!(record.started());
        assert_eq!(record.process_id().as_raw(), 4321);
    }

    #[test]
    fn test_stop_mode_from_str() {
        assert_eq!("command".parse::<StopMode>().unwrap(), StopMode::Command);
        assert_eq!("PID".parse::<StopMode>().unwrap(), StopMode::Pid);
        assert_eq!(" pidfile ".parse::<StopMode>().unwrap(), StopMode::PidFile);
        assert_eq!("none".parse::<StopMode>().unwrap(), StopMode::None);
        assert_eq!("kill".parse::<StopMode>().unwrap(), StopMode::Invalid);
    }
}
