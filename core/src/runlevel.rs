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

//! Ordered sweeps over the service table.
//!
//! A full sweep starts or stops every eligible record in ascending priority.
//! A runlevel switch first stops what does not belong to the target, then
//! commits the new runlevel, then starts what does. The two phases never
//! interleave.
use crate::config::SupervisorConfig;
use crate::context::{BootMode, SupervisorContext};
use crate::controller::ServiceController;
use crate::error::*;
use crate::hooks::Hooks;
use crate::launcher::Launcher;
use crate::outcome::Outcome;
use crate::record::ServiceRecord;
use crate::shell::ShellResolver;
use crate::table::ServiceTable;
use snafu::OptionExt;
use std::sync::Arc;

/// Owns the service table and drives the controller across it.
pub struct RunlevelEngine {
    table: ServiceTable,
    ctx: Arc<SupervisorContext>,
    controller: ServiceController,
}

impl RunlevelEngine {
    /// the context is the one the controller's launcher works with
    pub fn new(table: ServiceTable, controller: ServiceController) -> RunlevelEngine {
        let ctx = Arc::clone(controller.launcher().context());
        RunlevelEngine {
            table,
            ctx,
            controller,
        }
    }

    /// Wire a complete engine from the configuration.
    pub fn from_config(table: ServiceTable, config: &SupervisorConfig, hooks: Hooks) -> RunlevelEngine {
        let ctx = Arc::new(SupervisorContext::new(config.default_runlevel()));
        let shell = Arc::new(ShellResolver::new(config.warn_unknown_shell()));
        let launcher = Launcher::new(ctx, shell, Arc::new(hooks));
        RunlevelEngine::new(table, ServiceController::new(launcher, config.kill_signal()))
    }

    ///
    pub fn table(&self) -> &ServiceTable {
        &self.table
    }

    ///
    pub fn context(&self) -> &Arc<SupervisorContext> {
        &self.ctx
    }

    ///
    pub fn controller(&self) -> &ServiceController {
        &self.controller
    }

    /// Start (or stop) every eligible record in ascending priority.
    ///
    /// Per record failures are reported and do not end the sweep. Only a
    /// start sweep without any prioritized record fails.
    pub fn run_all(&self, is_start: bool) -> Outcome {
        let max_priority = self.table.highest_priority(is_start);
        if is_start && max_priority == 0 {
            log::error!("All services have a start priority of zero!");
            return Outcome::Failure;
        }

        self.ctx.set_boot_mode(if is_start {
            BootMode::Bootup
        } else {
            BootMode::Shutdown
        });

        let runlevel = self.ctx.runlevel();
        let scope = if is_start { Some(runlevel.as_str()) } else { None };
        for priority in 1..=max_priority {
            let record = match self.table.record_at(scope, is_start, priority) {
                Some(r) => Arc::clone(r),
                None => continue,
            };

            if is_start && (!record.enabled() || record.halt_cmd_only()) {
                continue;
            }
            /* disabled services are still stopped, disabled halt actions are not */
            if !is_start && record.halt_cmd_only() && !record.enabled() {
                continue;
            }

            if Self::due(&record, is_start) {
                self.controller.process(&record, is_start, true);
            }
        }

        self.ctx.set_boot_mode(BootMode::Neutral);
        Outcome::Success
    }

    /// whether the record's state disagrees with the sweep's direction
    fn due(record: &ServiceRecord, is_start: bool) -> bool {
        record.started() != is_start
    }

    /// Move the supervisor into runlevel `target`.
    ///
    /// Fails without touching anything when `target` has no eligible record.
    pub fn switch_to(&self, target: &str) -> Outcome {
        let eligible = self
            .table
            .iter()
            .filter(|r| {
                !r.halt_cmd_only()
                    && r.enabled()
                    && r.start_priority() > 0
                    && self.table.runlevel_matches(target, r)
            })
            .count();
        if eligible == 0 {
            log::warn!("Runlevel {} has no enabled services, not switching", target);
            return Outcome::Failure;
        }

        let current = self.ctx.runlevel();
        log::info!("Switching runlevel from {} to {}", current, target);

        for priority in 1..=self.table.highest_priority(false) {
            let record = match self.table.record_at(Some(current.as_str()), false, priority) {
                Some(r) => Arc::clone(r),
                None => continue,
            };
            if record.started()
                && record.can_stop()
                && !record.halt_cmd_only()
                && !self.table.runlevel_matches(target, &record)
            {
                self.controller.process(&record, false, true);
            }
        }

        self.ctx.set_runlevel(target);

        for priority in 1..=self.table.highest_priority(true) {
            let record = match self.table.record_at(Some(target), true, priority) {
                Some(r) => Arc::clone(r),
                None => continue,
            };
            if record.enabled() && !record.started() {
                self.controller.process(&record, true, true);
            }
        }

        Outcome::Success
    }

    fn lookup(&self, id: &str) -> Result<Arc<ServiceRecord>> {
        self.table
            .find(id)
            .map(Arc::clone)
            .context(NotFoundSnafu {
                what: format!("service {}", id),
            })
    }

    /// start the service named `id` regardless of runlevel and priority
    pub fn start_service(&self, id: &str) -> Result<Outcome> {
        let record = self.lookup(id)?;
        Ok(self.controller.process(&record, true, true))
    }

    /// stop the service named `id` with its stop strategy
    pub fn stop_service(&self, id: &str) -> Result<Outcome> {
        let record = self.lookup(id)?;
        Ok(self.controller.process(&record, false, true))
    }
}
