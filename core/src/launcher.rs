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

//! Synchronous launch of a service command through the shell.
//!
//! One launch creates one interpreter process, waits for exactly that
//! process and classifies how it ended. The caller's thread is blocked for
//! the whole lifetime of the child.
use crate::context::SupervisorContext;
use crate::error::*;
use crate::hooks::Hooks;
use crate::outcome::Outcome;
use crate::pid::estimate_process_id;
use crate::record::ServiceRecord;
use crate::shell::{Shell, ShellResolver};
use basic::errno_is_transient;
use basic::signal::{default_all_signal_handlers, SignalBlockGuard};
use constants::{EXIT_EXEC, SHELL_ARGV0};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::CString;
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::sync::Arc;

/// Everything the child branch needs, built before the fork so that the
/// child neither allocates nor takes locks.
struct ExecArgs {
    path: CString,
    argv: Vec<CString>,
    exec_failed: Vec<u8>,
}

impl ExecArgs {
    fn new(record: &ServiceRecord, shell: &Shell, command: &str) -> Result<ExecArgs> {
        let path = CString::new(shell.path().as_os_str().as_bytes()).context(NulCommandSnafu {
            id: record.id().to_string(),
        })?;
        let argv = [SHELL_ARGV0, "-c", command]
            .iter()
            .map(|arg| CString::new(*arg))
            .collect::<std::result::Result<Vec<_>, _>>()
            .context(NulCommandSnafu {
                id: record.id().to_string(),
            })?;
        let exec_failed = format!(
            "levelmaster: failed to execute {} for {}\n",
            shell.path().display(),
            record.id()
        )
        .into_bytes();

        Ok(ExecArgs {
            path,
            argv,
            exec_failed,
        })
    }

    /// Runs in the child: reset signals, detach, become the interpreter.
    fn exec_child(&self, guard: SignalBlockGuard, argv_ptrs: &[*const c_char]) -> ! {
        default_all_signal_handlers();
        guard.release_in_child();
        let _ = unistd::setsid();

        unsafe {
            libc::execvp(self.path.as_ptr(), argv_ptrs.as_ptr());
            libc::write(
                libc::STDERR_FILENO,
                self.exec_failed.as_ptr() as *const libc::c_void,
                self.exec_failed.len(),
            );
            libc::_exit(EXIT_EXEC);
        }
    }
}

/// Launches service commands and keeps the shared counters straight.
#[derive(Clone)]
pub struct Launcher {
    ctx: Arc<SupervisorContext>,
    shell: Arc<ShellResolver>,
    hooks: Arc<Hooks>,
}

impl Launcher {
    ///
    pub fn new(ctx: Arc<SupervisorContext>, shell: Arc<ShellResolver>, hooks: Arc<Hooks>) -> Launcher {
        Launcher { ctx, shell, hooks }
    }

    ///
    pub fn context(&self) -> &Arc<SupervisorContext> {
        &self.ctx
    }

    ///
    pub fn hooks(&self) -> &Arc<Hooks> {
        &self.hooks
    }

    /// Run the start or stop command of `record` and wait for it.
    ///
    /// A record flagged `no_wait` is never put into the task slot.
    pub fn launch(&self, record: &Arc<ServiceRecord>, is_start: bool) -> Outcome {
        self.run(record, is_start, !record.no_wait())
    }

    pub(crate) fn run(&self, record: &Arc<ServiceRecord>, is_start: bool, track: bool) -> Outcome {
        let shell = self.shell.resolve();
        let command = record.command(is_start);
        let args = match ExecArgs::new(record, shell, command) {
            Ok(args) => args,
            Err(e) => {
                log::error!("Failed to prepare the command of {}: {}", record.id(), e);
                return Outcome::Failure;
            }
        };
        let mut argv_ptrs: Vec<*const c_char> = args.argv.iter().map(|a| a.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());

        log::debug!(
            "Launching {:?} -c {:?} for {}",
            shell.path(),
            command,
            record.id()
        );

        let guard = SignalBlockGuard::block_all();
        match unsafe { unistd::fork() } {
            Ok(ForkResult::Child) => args.exec_child(guard, &argv_ptrs),
            Ok(ForkResult::Parent { child }) => {
                self.ctx.child_spawned();
                if track {
                    self.ctx.occupy_task(record, child);
                }
                guard.release();

                let status = wait_child(child);

                self.ctx.child_reaped();
                if track {
                    self.ctx.clear_task();
                }

                record.set_process_id(estimate_process_id(
                    child,
                    shell.dissolves(),
                    record.is_service(),
                ));
                self.hooks.refiner.refine_process_id(record, is_start);

                let outcome = Outcome::from_wait_status(status);
                log::debug!(
                    "{} of {} finished with {:?}, outcome {}",
                    child,
                    record.id(),
                    status,
                    outcome
                );
                outcome
            }
            Err(e) => {
                drop(guard);
                log::error!("Failed to fork for {}: {}", record.id(), e);
                self.hooks.recovery.enter_recovery_shell()
            }
        }
    }
}

/// Wait for exactly `child`, None when the wait itself failed.
fn wait_child(child: Pid) -> Option<WaitStatus> {
    loop {
        match waitpid(child, None) {
            Ok(status) => return Some(status),
            Err(e) if errno_is_transient(e) => continue,
            Err(e) => {
                log::warn!("Failed to wait for {}: {}", child, e);
                return None;
            }
        }
    }
}
