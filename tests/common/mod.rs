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

#![allow(dead_code)]

use levelmaster::{
    Hooks, Launcher, Outcome, RunlevelEngine, ServiceController, ServiceFlags, ServiceRecord,
    ServiceTable, ShellResolver, StatusReporter, StopMode, SupervisorContext,
};
use nix::sys::signal::Signal;
use std::sync::{Arc, Mutex};

/// Keeps the finished status lines, in order.
#[derive(Clone, Default)]
pub struct Lines(pub Arc<Mutex<Vec<String>>>);

impl Lines {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl StatusReporter for Lines {
    fn report(&self, line: &str, outcome: Outcome) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} [{}]", line, outcome.status_tag()));
    }
}

pub fn engine(table: ServiceTable, runlevel: &str) -> (RunlevelEngine, Lines) {
    let lines = Lines::default();
    let hooks = Hooks::default().with_reporter(Box::new(lines.clone()));
    let launcher = Launcher::new(
        Arc::new(SupervisorContext::new(runlevel)),
        Arc::new(ShellResolver::default()),
        Arc::new(hooks),
    );
    let engine = RunlevelEngine::new(table, ServiceController::new(launcher, Signal::SIGTERM));
    (engine, lines)
}

pub fn service(id: &str, command: &str, priority: u32, runlevel: &str) -> ServiceRecord {
    ServiceRecord::new(id)
        .with_description(id)
        .with_start_command(command)
        .with_priorities(priority, priority)
        .with_runlevel(runlevel)
        .with_flags(ServiceFlags::ENABLED | ServiceFlags::CAN_STOP)
        .with_stop_mode(StopMode::None)
}
