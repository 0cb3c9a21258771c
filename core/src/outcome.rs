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

//! The result of every action the supervisor takes on a service.
use constants::EXIT_BAD_PARAMETER;
use nix::sys::wait::WaitStatus;
use std::fmt;

/// Outcome of starting or stopping one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// the action completed
    Success,
    /// the action failed
    Failure,
    /// the command ran, but reported a bad or unrepresentable exit status
    Warning,
    /// the action was dispatched to the background, its result is unknown
    Notification,
}

impl Default for Outcome {
    /// Nothing happened, which is not a success.
    fn default() -> Self {
        Outcome::Failure
    }
}

impl Outcome {
    /// Classify a raw exit code.
    ///
    /// `0` is a success, `128` (bad exit parameter) and anything outside the
    /// `0..=255` exit status range are warnings, everything else failed.
    pub fn from_exit_code(code: i32) -> Outcome {
        match code {
            0 => Outcome::Success,
            EXIT_BAD_PARAMETER => Outcome::Warning,
            c if !(0..=255).contains(&c) => Outcome::Warning,
            _ => Outcome::Failure,
        }
    }

    /// Classify the status of a reaped child. A child that did not exit on
    /// its own has no exit code and counts as out of range.
    pub fn from_wait_status(status: Option<WaitStatus>) -> Outcome {
        match status {
            Some(WaitStatus::Exited(_, code)) => Outcome::from_exit_code(code),
            _ => Outcome::from_exit_code(-1),
        }
    }

    ///
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    /// the tag a status line ends with
    pub fn status_tag(self) -> &'static str {
        match self {
            Outcome::Success => "Done",
            Outcome::Failure => "FAILED",
            Outcome::Warning => "WARNING",
            Outcome::Notification => "Launched",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_tag())
    }
}
