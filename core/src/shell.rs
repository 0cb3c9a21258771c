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

//! Pick the command interpreter used to run service command lines.
//!
//! Whether an interpreter "dissolves" matters for pid tracking: one that
//! replaces itself with the command keeps the pid of the spawned child,
//! one that forks first leaves the command one pid further.
use basic::fs::file_usable;
use constants::FALLBACK_SHELL;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Known interpreters, most capable first.
pub const SHELL_CANDIDATES: [(&str, bool); 5] = [
    ("/bin/bash", true),
    ("/bin/dash", true),
    ("/bin/zsh", true),
    ("/bin/csh", true),
    /* busybox still forks a child for -c */
    ("/bin/busybox", false),
];

/// A resolved interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    path: PathBuf,
    dissolves: bool,
}

impl Shell {
    ///
    pub fn new<P: AsRef<Path>>(path: P, dissolves: bool) -> Shell {
        Shell {
            path: path.as_ref().to_path_buf(),
            dissolves,
        }
    }

    /// what gets exec'd, looked up in PATH when not absolute
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// whether the interpreter replaces itself with the command
    pub fn dissolves(&self) -> bool {
        self.dissolves
    }
}

/// Probes the candidates once and remembers the answer for the lifetime of
/// the supervisor.
#[derive(Debug)]
pub struct ShellResolver {
    candidates: Vec<Shell>,
    fallback: Shell,
    warn_unknown: bool,
    resolved: OnceCell<Shell>,
}

impl ShellResolver {
    /// resolver over the known interpreters
    pub fn new(warn_unknown: bool) -> ShellResolver {
        let candidates = SHELL_CANDIDATES
            .iter()
            .map(|(path, dissolves)| Shell::new(path, *dissolves))
            .collect();
        ShellResolver::with_candidates(candidates, Shell::new(FALLBACK_SHELL, false), warn_unknown)
    }

    /// resolver over an explicit candidate list
    pub fn with_candidates(candidates: Vec<Shell>, fallback: Shell, warn_unknown: bool) -> ShellResolver {
        ShellResolver {
            candidates,
            fallback,
            warn_unknown,
            resolved: OnceCell::new(),
        }
    }

    /// The interpreter to use. The first call probes the filesystem, later
    /// calls return the same answer.
    pub fn resolve(&self) -> &Shell {
        self.resolved.get_or_init(|| self.probe())
    }

    fn probe(&self) -> Shell {
        if let Some(shell) = self.candidates.iter().find(|s| file_usable(s.path())) {
            log::debug!(
                "Using {:?} to run commands, dissolves: {}",
                shell.path(),
                shell.dissolves()
            );
            return shell.clone();
        }

        if self.warn_unknown {
            log::warn!(
                "No known shell found, using {:?}. Pid detection may be off, \
                 install bash, dash, zsh, csh or busybox.",
                self.fallback.path()
            );
        }
        self.fallback.clone()
    }
}

impl Default for ShellResolver {
    fn default() -> Self {
        ShellResolver::new(true)
    }
}
