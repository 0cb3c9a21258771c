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

//! Process id inference for launched commands.
//!
//! The launcher only knows the pid of the interpreter it created. The real
//! command may live in that process or one level below it. The launcher seeds
//! `process_id` with [`estimate_process_id`] and then asks a
//! [`PidRefiner`](crate::hooks::PidRefiner) to correct it.
use crate::hooks::{PidFileReader, PidRefiner};
use crate::record::ServiceRecord;
use basic::fs::read_first_line;
use basic::process;
use nix::unistd::{self, Pid};
use std::path::Path;

/// Best-effort guess of the pid that runs the launched command.
///
/// Starts from the interpreter's pid. An interpreter that does not dissolve
/// into the command keeps a wrapping process, so the command is presumed to
/// be its immediate child (+1). Long running services are presumed to add one
/// more layer (+1). The result is approximate and only meant as a seed.
pub fn estimate_process_id(child: Pid, shell_dissolves: bool, is_service: bool) -> Pid {
    let mut raw = child.as_raw();
    if !shell_dissolves {
        raw += 1;
    }
    if is_service {
        raw += 1;
    }
    Pid::from_raw(raw)
}

fn base_name(s: &str) -> &str {
    Path::new(s)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(s)
}

/// the executable name a command line would run, without its directory
fn program_name(command: &str) -> Option<&str> {
    command.split_whitespace().next().map(base_name)
}

/// the candidate closest to `seed`, or `seed` itself when it is a candidate
fn nearest(seed: Pid, candidates: &[Pid]) -> Option<Pid> {
    if candidates.contains(&seed) {
        return Some(seed);
    }
    candidates
        .iter()
        .min_by_key(|pid| (pid.as_raw() - seed.as_raw()).abs())
        .copied()
}

/// Corrects the seed by looking at the live processes under `/proc`.
///
/// A process matches when the basename of its `argv[0]` equals the basename
/// of the first word of the command. The seed survives when it matches or
/// when nothing does.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcPidRefiner;

impl ProcPidRefiner {
    fn candidates(&self, program: &str) -> Vec<Pid> {
        let pids = match process::list_pids() {
            Ok(pids) => pids,
            Err(e) => {
                log::debug!("Failed to list processes: {}", e);
                return Vec::new();
            }
        };

        let me = unistd::getpid();
        pids.into_iter()
            .filter(|pid| *pid != me && process::alive(*pid))
            .filter(|pid| match process::cmdline(*pid) {
                Ok(argv) => argv.first().map_or(false, |arg0| base_name(arg0) == program),
                Err(_) => false,
            })
            .collect()
    }
}

impl PidRefiner for ProcPidRefiner {
    fn refine_process_id(&self, record: &ServiceRecord, is_start: bool) {
        let program = match program_name(record.command(is_start)) {
            Some(p) => p,
            None => return,
        };

        let seed = record.process_id();
        let candidates = self.candidates(program);
        if let Some(pid) = nearest(seed, &candidates) {
            if pid != seed {
                log::debug!(
                    "Corrected pid of {} from {} to {}",
                    record.id(),
                    seed,
                    pid
                );
                record.set_process_id(pid);
            }
        }
    }
}

/// Reads the first line of the record's pid file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPidFileReader;

impl PidFileReader for FsPidFileReader {
    fn read_pid_file(&self, record: &ServiceRecord) -> Option<Pid> {
        let path = record.pid_file()?;
        let line = match read_first_line(path) {
            Ok(line) => line,
            Err(e) => {
                log::debug!("Failed to read pid file {:?}: {}", path, e);
                return None;
            }
        };

        match line.trim().parse::<i32>() {
            Ok(pid) if pid > 0 => Some(Pid::from_raw(pid)),
            _ => {
                log::debug!("Failed to parse pid from pid file {:?}: {:?}", path, line);
                None
            }
        }
    }
}
