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

//! Default emergency recovery: become an interactive shell.
use crate::hooks::RecoveryShell;
use constants::EMERGENCY_SHELL;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;

/// Replaces the supervisor image with a shell on the console.
#[derive(Debug, Clone)]
pub struct EmergencyShell {
    shell: PathBuf,
}

impl EmergencyShell {
    ///
    pub fn new<P: Into<PathBuf>>(shell: P) -> EmergencyShell {
        EmergencyShell {
            shell: shell.into(),
        }
    }
}

impl Default for EmergencyShell {
    fn default() -> Self {
        EmergencyShell::new(EMERGENCY_SHELL)
    }
}

impl RecoveryShell for EmergencyShell {
    fn enter_recovery_shell(&self) -> ! {
        log::error!(
            "Can not create processes any more, entering emergency shell {:?}",
            self.shell
        );
        let err = Command::new(&self.shell).exec();
        log::error!("Failed to execute emergency shell: {}", err);
        std::process::abort();
    }
}
