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

//! Process wide supervisor state, owned by the runlevel engine and lent to
//! the controller and the launcher.
use crate::record::ServiceRecord;
use basic::process;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// What the supervisor is sweeping through right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootMode {
    /// no full sweep in progress
    Neutral = 0,
    /// starting everything
    Bootup = 1,
    /// stopping everything
    Shutdown = 2,
}

impl From<u8> for BootMode {
    fn from(v: u8) -> Self {
        match v {
            1 => BootMode::Bootup,
            2 => BootMode::Shutdown,
            _ => BootMode::Neutral,
        }
    }
}

/// The synchronous launch in flight.
#[derive(Debug, Clone)]
pub struct CurrentTask {
    /// record being launched
    pub record: Arc<ServiceRecord>,
    /// pid of the spawned interpreter
    pub pid: Pid,
}

/// Shared supervisor state.
///
/// Runlevel and boot mode are only written by the control thread. The
/// running child count and the task slot are also touched by background
/// launches.
#[derive(Debug)]
pub struct SupervisorContext {
    runlevel: RwLock<String>,
    boot_mode: AtomicU8,
    current_task: Mutex<Option<CurrentTask>>,
    running_children: AtomicUsize,
}

impl SupervisorContext {
    ///
    pub fn new(runlevel: &str) -> SupervisorContext {
        SupervisorContext {
            runlevel: RwLock::new(runlevel.to_string()),
            boot_mode: AtomicU8::new(BootMode::Neutral as u8),
            current_task: Mutex::new(None),
            running_children: AtomicUsize::new(0),
        }
    }

    /// the runlevel the supervisor is in
    pub fn runlevel(&self) -> String {
        match self.runlevel.read() {
            Ok(v) => v.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn set_runlevel(&self, runlevel: &str) {
        let mut guard = match self.runlevel.write() {
            Ok(v) => v,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = runlevel.to_string();
    }

    ///
    pub fn boot_mode(&self) -> BootMode {
        BootMode::from(self.boot_mode.load(Ordering::Acquire))
    }

    pub(crate) fn set_boot_mode(&self, mode: BootMode) {
        self.boot_mode.store(mode as u8, Ordering::Release);
    }

    /// number of children spawned and not reaped yet
    pub fn running_children(&self) -> usize {
        self.running_children.load(Ordering::Acquire)
    }

    pub(crate) fn child_spawned(&self) {
        self.running_children.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn child_reaped(&self) {
        /* never wrap below zero, an unbalanced reap is a bug but not fatal */
        let _ = self
            .running_children
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<CurrentTask>> {
        match self.current_task.lock() {
            Ok(v) => v,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// the synchronous launch in flight, if any
    pub fn current_task(&self) -> Option<CurrentTask> {
        self.task_slot().clone()
    }

    pub(crate) fn occupy_task(&self, record: &Arc<ServiceRecord>, pid: Pid) {
        let mut slot = self.task_slot();
        if let Some(old) = slot.as_ref() {
            log::warn!(
                "Task slot still held by {} (pid {}), replacing it with {}",
                old.record.id(),
                old.pid,
                record.id()
            );
        }
        *slot = Some(CurrentTask {
            record: Arc::clone(record),
            pid,
        });
    }

    pub(crate) fn clear_task(&self) {
        *self.task_slot() = None;
    }

    /// Deliver `signal` to the synchronous launch in flight, meant for an
    /// external watchdog. Returns false when no launch is in flight or the
    /// slot's pid is no longer a child of the supervisor.
    pub fn signal_current_task(&self, signal: Signal) -> crate::error::Result<bool> {
        let task = match self.current_task() {
            None => return Ok(false),
            Some(t) => t,
        };

        /* the slot is cleared after the reap, the pid may be recycled in between */
        if !process::my_child(task.pid) {
            log::debug!("{} (pid {}) is gone, not signalling it", task.record.id(), task.pid);
            return Ok(false);
        }

        log::info!(
            "Sending {} to {} (pid {})",
            signal,
            task.record.id(),
            task.pid
        );
        process::send_signal(task.pid, signal)?;
        Ok(true)
    }
}

impl Default for SupervisorContext {
    fn default() -> Self {
        SupervisorContext::new(constants::DEFAULT_RUNLEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_runlevel_and_boot_mode() {
        let ctx = SupervisorContext::default();
        assert_eq!(ctx.runlevel(), "default");
        ctx.set_runlevel("multiuser");
        assert_eq!(ctx.runlevel(), "multiuser");

        assert_eq!(ctx.boot_mode(), BootMode::Neutral);
        ctx.set_boot_mode(BootMode::Shutdown);
        assert_eq!(ctx.boot_mode(), BootMode::Shutdown);
        ctx.set_boot_mode(BootMode::Neutral);
        assert_eq!(ctx.boot_mode(), BootMode::Neutral);
    }

    #[test]
    fn test_running_children() {
        let ctx = SupervisorContext::default();
        ctx.child_spawned();
        ctx.child_spawned();
        assert_eq!(ctx.running_children(), 2);
        ctx.child_reaped();
        ctx.child_reaped();
        ctx.child_reaped();
        assert_eq!(ctx.running_children(), 0);
    }

    #[test]
    fn test_running_children_concurrent() {
        let ctx = Arc::new(SupervisorContext::default());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        ctx.child_spawned();
                        ctx.child_reaped();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(ctx.running_children(), 0);
    }

    #[test]
    fn test_task_slot() {
        let ctx = SupervisorContext::default();
        assert!(ctx.current_task().is_none());
        assert!(!ctx.signal_current_task(Signal::SIGTERM).unwrap());

        let record = Arc::new(ServiceRecord::new("getty"));
        ctx.occupy_task(&record, Pid::from_raw(77));
        let task = ctx.current_task().unwrap();
        assert_eq!(task.record.id(), "getty");
        assert_eq!(task.pid.as_raw(), 77);

        assert!(!ctx.signal_current_task(Signal::SIGTERM).unwrap());

        ctx.clear_task();
        assert!(ctx.current_task().is_none());
    }

    #[test]
    fn test_signal_current_task() {
        let ctx = SupervisorContext::default();
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let record = Arc::new(ServiceRecord::new("hung"));
        ctx.occupy_task(&record, Pid::from_raw(child.id() as i32));

        assert!(ctx.signal_current_task(Signal::SIGKILL).unwrap());
        let status = child.wait().unwrap();
        assert!(!status.success());
    }
}
