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

//! Process supervision core of the levelmaster init.
//!
//! [`RunlevelEngine`] sweeps a [`ServiceTable`] in priority order and hands
//! single records to the [`ServiceController`], which starts them through the
//! [`Launcher`] and stops them with their [`StopMode`].
pub mod background;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod hooks;
pub mod launcher;
pub mod outcome;
pub mod pid;
pub mod record;
pub mod recovery;
pub mod report;
pub mod runlevel;
pub mod shell;
pub mod table;

pub use config::SupervisorConfig;
pub use context::{BootMode, CurrentTask, SupervisorContext};
pub use controller::ServiceController;
pub use error::{Error, Result};
pub use hooks::{Hooks, PidFileReader, PidRefiner, RecoveryShell, StatusReporter};
pub use launcher::Launcher;
pub use outcome::Outcome;
pub use record::{ServiceFlags, ServiceRecord, StopMode};
pub use runlevel::RunlevelEngine;
pub use shell::{Shell, ShellResolver};
pub use table::{RecordId, ServiceTable};
