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

//! Signal mask and disposition helpers around process creation.
//!
//! Everything meant for the child branch of `fork()` stays clear of the
//! logger and the allocator.

use nix::sys::signal::{self, pthread_sigmask, SaFlags, SigAction, SigHandler, SigSet, Signal, SigmaskHow};

/// Set the disposition of every signal to the default, child-safe.
pub fn default_all_signal_handlers() {
    let sig_action = SigAction::new(SigHandler::SigDfl, SaFlags::SA_RESTART, SigSet::empty());
    for sig in Signal::iterator() {
        /* SIGKILL and SIGSTOP is invalid, see sigaction(2) */
        if sig == Signal::SIGKILL || sig == Signal::SIGSTOP {
            continue;
        }
        unsafe {
            let _ = signal::sigaction(sig, &sig_action);
        }
    }

    /* realtime signals are not covered by Signal::iterator() */
    for signo in libc::SIGRTMIN()..=libc::SIGRTMAX() {
        unsafe {
            libc::signal(signo, libc::SIG_DFL);
        }
    }
}

/// Empty the signal mask of the calling thread, child-safe.
pub fn unblock_all_signals() {
    let _ = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&SigSet::empty()), None);
}

/// Blocks every signal on the calling thread until released or dropped.
///
/// The previous mask is put back on release, so the guard also covers early
/// returns between blocking and process creation.
pub struct SignalBlockGuard {
    old: Option<SigSet>,
}

impl SignalBlockGuard {
    /// block all signals, remembering the current mask
    pub fn block_all() -> Self {
        let mut old = SigSet::empty();
        match pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&SigSet::all()), Some(&mut old)) {
            Ok(()) => SignalBlockGuard { old: Some(old) },
            Err(e) => {
                log::warn!("Failed to block signals before spawning: {}", e);
                SignalBlockGuard { old: None }
            }
        }
    }

    /// whether the signals are currently held back by this guard
    pub fn is_blocking(&self) -> bool {
        self.old.is_some()
    }

    /// restore the mask that was active before blocking
    pub fn release(mut self) {
        self.restore();
    }

    /// lift the block in a freshly forked child: the child starts from an
    /// empty mask rather than the parent's, and nothing is logged
    pub fn release_in_child(self) {
        unblock_all_signals();
        std::mem::forget(self);
    }

    fn restore(&mut self) {
        if let Some(old) = self.old.take() {
            if let Err(e) = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&old), None) {
                log::warn!("Failed to restore the signal mask: {}", e);
            }
        }
    }
}

impl Drop for SignalBlockGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
