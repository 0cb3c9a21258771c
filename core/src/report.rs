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

//! Status lines shown around every controlled start and stop.
use crate::hooks::StatusReporter;
use crate::outcome::Outcome;
use crate::record::ServiceRecord;

/// The line describing what the controller is about to do with `record`.
pub fn status_line(record: &ServiceRecord, is_start: bool) -> String {
    let description = record.description();
    if record.raw_description() {
        return description.to_string();
    }

    if is_start {
        if record.no_wait() {
            format!("Launching process for {}", description)
        } else {
            format!("Starting {}", description)
        }
    } else if record.halt_cmd_only() {
        // the stop command of a halt-only record is its halt action
        format!("Starting {}", description)
    } else {
        format!("Stopping {}", description)
    }
}

/// Writes status lines through the logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn announce(&self, line: &str) {
        log::debug!("{} ...", line);
    }

    fn report(&self, line: &str, outcome: Outcome) {
        match outcome {
            Outcome::Failure => log::error!("{} [{}]", line, outcome.status_tag()),
            Outcome::Warning => log::warn!("{} [{}]", line, outcome.status_tag()),
            _ => log::info!("{} [{}]", line, outcome.status_tag()),
        }
    }
}
