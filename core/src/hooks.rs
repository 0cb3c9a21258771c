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

//! Collaborators the core relies on without owning their policy.
//!
//! Each seam is a trait with a default implementation; an embedding init
//! replaces the ones it has better answers for.
use crate::outcome::Outcome;
use crate::pid::{FsPidFileReader, ProcPidRefiner};
use crate::record::ServiceRecord;
use crate::recovery::EmergencyShell;
use crate::report::LogReporter;
use nix::unistd::Pid;

/// Corrects the pid guessed for a freshly launched command.
pub trait PidRefiner: Send + Sync {
    /// update `record`'s process id using evidence from the system
    fn refine_process_id(&self, record: &ServiceRecord, is_start: bool);
}

/// Reads the pid a service wrote into its pid file.
pub trait PidFileReader: Send + Sync {
    /// a positive pid, or None when the file is missing or unparseable
    fn read_pid_file(&self, record: &ServiceRecord) -> Option<Pid>;
}

/// Renders status lines, flushed immediately.
pub trait StatusReporter: Send + Sync {
    /// the action described by `line` is about to run
    fn announce(&self, _line: &str) {}

    /// the action described by `line` finished with `outcome`
    fn report(&self, line: &str, outcome: Outcome);
}

/// Last resort when the supervisor can not create processes any more.
pub trait RecoveryShell: Send + Sync {
    /// hand control to an interactive shell, never returns
    fn enter_recovery_shell(&self) -> !;
}

/// The set of collaborators handed to the controller and the launcher.
pub struct Hooks {
    pub(crate) refiner: Box<dyn PidRefiner>,
    pub(crate) pid_file: Box<dyn PidFileReader>,
    pub(crate) reporter: Box<dyn StatusReporter>,
    pub(crate) recovery: Box<dyn RecoveryShell>,
}

impl Hooks {
    ///
    pub fn with_refiner(mut self, refiner: Box<dyn PidRefiner>) -> Self {
        self.refiner = refiner;
        self
    }

    ///
    pub fn with_pid_file_reader(mut self, reader: Box<dyn PidFileReader>) -> Self {
        self.pid_file = reader;
        self
    }

    ///
    pub fn with_reporter(mut self, reporter: Box<dyn StatusReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    ///
    pub fn with_recovery(mut self, recovery: Box<dyn RecoveryShell>) -> Self {
        self.recovery = recovery;
        self
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Hooks {
            refiner: Box::new(ProcPidRefiner),
            pid_file: Box::new(FsPidFileReader),
            reporter: Box::new(LogReporter),
            recovery: Box::new(EmergencyShell::default()),
        }
    }
}
