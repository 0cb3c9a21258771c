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

//! process functions
use crate::error::*;
use crate::fs;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use procfs::process::Stat;
use std::fs::{read_dir, File};
use std::path::{Path, PathBuf};

/// read the state letter of a process from `/proc/<pid>/stat`
pub fn process_state(pid: Pid) -> Result<char> {
    if pid == Pid::from_raw(0) || pid == nix::unistd::getpid() {
        return Ok('R');
    }

    let proc_file = format!("/proc/{}/stat", pid.as_raw());
    let first_line = fs::read_first_line(Path::new(&proc_file))?;

    /* comm may contain blanks, the state follows the closing parenthesis */
    let after_comm = match first_line.rfind(')') {
        Some(pos) => &first_line[pos + 1..],
        None => {
            return Err(Error::Invalid {
                what: "process stat format".to_string(),
            })
        }
    };

    match after_comm.trim_start().chars().next() {
        Some(state) => Ok(state),
        None => Err(Error::Invalid {
            what: "process state".to_string(),
        }),
    }
}

/// whether the process exists and is not a zombie
pub fn alive(pid: Pid) -> bool {
    if pid < Pid::from_raw(0) {
        return false;
    }

    if pid <= Pid::from_raw(1) {
        return true;
    }

    if pid == nix::unistd::getpid() {
        return true;
    }

    match process_state(pid) {
        Ok(state) => state != 'Z',
        Err(_) => false,
    }
}

/// A pid that names exactly one process. Zero and negative values address
/// process groups or every process when handed to kill(2).
pub fn valid_pid(pid: Pid) -> bool {
    pid > Pid::from_raw(0)
}

/// send `sig` to exactly one process
pub fn send_signal(pid: Pid, sig: Signal) -> Result<()> {
    if !valid_pid(pid) {
        return Err(Error::Invalid {
            what: format!("refusing to signal pid {}", pid),
        });
    }

    nix::sys::signal::kill(pid, sig).context(NixSnafu)
}

/// get the parent pid of the reference pid
pub fn get_ppid(pid: Pid) -> Result<Pid> {
    if pid == Pid::from_raw(0) || pid == nix::unistd::getpid() {
        return Ok(nix::unistd::getppid());
    }

    let path = PathBuf::from(format!("/proc/{}/stat", pid));

    let stat = Stat::from_reader(File::open(path).context(IoSnafu)?).context(ProcSnafu)?;

    Ok(Pid::from_raw(stat.ppid))
}

/// return true if the pid is the child of calling process, other false.
pub fn my_child(pid: Pid) -> bool {
    if pid.as_raw() <= 1 {
        return false;
    }

    match get_ppid(pid) {
        Ok(p) => p == nix::unistd::getpid(),
        Err(_) => false,
    }
}

/// all pids currently listed below `/proc`
pub fn list_pids() -> Result<Vec<Pid>> {
    let mut pids = Vec::new();
    for entry in read_dir("/proc").context(IoSnafu)?.flatten() {
        if let Ok(file_type) = entry.file_type() {
            if !file_type.is_dir() {
                continue;
            }
        }
        if let Some(pid_raw) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<i32>().ok())
        {
            pids.push(Pid::from_raw(pid_raw));
        }
    }
    pids.sort();
    Ok(pids)
}

/// the argument vector of a process, empty for kernel threads
pub fn cmdline(pid: Pid) -> Result<Vec<String>> {
    let raw = std::fs::read(format!("/proc/{}/cmdline", pid.as_raw())).map_err(|e| {
        match e.raw_os_error() {
            Some(errno) if errno == Errno::ESRCH as i32 || errno == Errno::ENOENT as i32 => {
                Error::NotExisted {
                    what: format!("process {}", pid),
                }
            }
            _ => Error::Io { source: e },
        }
    })?;

    Ok(raw
        .split(|b| *b == 0)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_valid_pid() {
        assert!(!valid_pid(Pid::from_raw(0)));
        assert!(!valid_pid(Pid::from_raw(-1)));
        assert!(valid_pid(Pid::from_raw(1)));
    }

    #[test]
    fn test_send_signal_refuses_groups() {
        assert!(send_signal(Pid::from_raw(0), Signal::SIGTERM).is_err());
        assert!(send_signal(Pid::from_raw(-1), Signal::SIGTERM).is_err());
    }

    #[test]
    fn test_child_cmdline_and_state() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let pid = Pid::from_raw(child.id() as i32);

        assert!(alive(pid));
        assert!(my_child(pid));
        assert!(list_pids().unwrap().contains(&pid));

        /* the argument vector shows up once the child has exec'd */
        let mut argv = Vec::new();
        for _ in 0..200 {
            argv = cmdline(pid).unwrap();
            if argv.first().map(String::as_str) == Some("sleep") {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(argv.last().map(String::as_str), Some("5"));

        send_signal(pid, Signal::SIGTERM).unwrap();
        child.wait().unwrap();
        assert!(!alive(pid));
    }

    #[test]
    fn test_self_state() {
        assert_eq!(process_state(nix::unistd::getpid()).unwrap(), 'R');
        assert!(!cmdline(nix::unistd::getpid()).unwrap().is_empty());
    }
}
