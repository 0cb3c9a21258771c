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

mod common;

use common::{engine, service};
use levelmaster::{Outcome, ServiceFlags, ServiceTable, StopMode};
use std::process::Command;

#[test]
fn stop_by_pid_file() {
    let mut child = Command::new("sleep").arg("30").spawn().unwrap();
    let pid_file = libtests::write_test_file("levelmaster-daemon.pid", &format!("{}\n", child.id())).unwrap();

    let mut table = ServiceTable::new();
    table.push(
        service("daemon", "true", 1, "default")
            .with_stop_mode(StopMode::PidFile)
            .with_pid_file(&pid_file),
    );
    let (engine, lines) = engine(table, "default");

    assert_eq!(engine.start_service("daemon").unwrap(), Outcome::Success);
    assert_eq!(engine.stop_service("daemon").unwrap(), Outcome::Success);
    assert!(!engine.table().find("daemon").unwrap().started());
    assert!(!child.wait().unwrap().success());
    assert_eq!(
        lines.take(),
        vec!["Starting daemon [Done]", "Stopping daemon [Done]"]
    );
}

#[test]
fn stop_with_missing_pid_file() {
    let mut table = ServiceTable::new();
    table.push(
        service("daemon", "true", 1, "default")
            .with_stop_mode(StopMode::PidFile)
            .with_pid_file("/nonexistent/levelmaster/daemon.pid"),
    );
    let (engine, _) = engine(table, "default");

    engine.start_service("daemon").unwrap();
    assert_eq!(engine.stop_service("daemon").unwrap(), Outcome::Failure);
    assert!(engine.table().find("daemon").unwrap().started());
}

#[test]
fn stop_command() {
    let mut table = ServiceTable::new();
    table.push(
        service("net", "true", 1, "default")
            .with_stop_command("exit 0")
            .with_stop_mode(StopMode::Command),
    );
    let (engine, _) = engine(table, "default");

    engine.start_service("net").unwrap();
    assert_eq!(engine.stop_service("net").unwrap(), Outcome::Success);
    assert!(!engine.table().find("net").unwrap().started());
}

#[test]
fn halt_only_record() {
    let mut table = ServiceTable::new();
    table.push(
        service("sync", "true", 1, "default")
            .with_stop_command("true")
            .with_stop_mode(StopMode::Command)
            .with_flags(ServiceFlags::ENABLED | ServiceFlags::HALT_CMD_ONLY),
    );
    table.push(
        service("umount", "true", 2, "default")
            .with_stop_command("true")
            .with_stop_mode(StopMode::Command)
            .with_flags(ServiceFlags::ENABLED | ServiceFlags::HALT_CMD_ONLY)
            .with_started(true),
    );
    let (engine, lines) = engine(table, "default");

    assert_eq!(engine.start_service("sync").unwrap(), Outcome::Failure);
    assert!(!engine.table().find("sync").unwrap().started());
    assert_eq!(engine.table().find("sync").unwrap().process_id().as_raw(), 0);

    engine.run_all(false);
    engine.run_all(false);
    assert!(!engine.table().find("umount").unwrap().started());
    assert_eq!(
        lines.take(),
        vec!["Starting sync [FAILED]", "Starting umount [Done]"]
    );
}

#[test]
fn detached_start() {
    let mut table = ServiceTable::new();
    table.push(
        service("bg", "sleep 1", 1, "default")
            .with_flags(ServiceFlags::ENABLED | ServiceFlags::NO_WAIT),
    );
    let (engine, lines) = engine(table, "default");

    let begin = std::time::Instant::now();
    assert_eq!(engine.run_all(true), Outcome::Success);
    assert!(begin.elapsed() < std::time::Duration::from_millis(900));
    assert!(engine.table().find("bg").unwrap().started());
    assert!(engine.context().current_task().is_none());
    assert_eq!(lines.take(), vec!["Launching process for bg [Launched]"]);
}
