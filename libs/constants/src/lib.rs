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

//! Common used constants by the supervisor core and its support crates.

/// Default configuration file of the supervisor
pub const SYSTEM_CONFIG: &str = "/etc/levelmaster/system.toml";

/// Runlevel entered when nothing else is configured
pub const DEFAULT_RUNLEVEL: &str = "default";

/// Exit code of a child which could not replace its image with the interpreter
pub const EXIT_EXEC: i32 = 203;

/// Exit code reported by shells for a bad exit parameter
pub const EXIT_BAD_PARAMETER: i32 = 128;

/// Interpreter used when none of the known shells is installed
pub const FALLBACK_SHELL: &str = "sh";

/// argv\[0\] handed to every interpreter
pub const SHELL_ARGV0: &str = "sh";

/// Shell started when the supervisor can not go on
pub const EMERGENCY_SHELL: &str = "/bin/sh";

/// Datagram socket of the system logger
pub const SYSLOG_SOCKET: &str = "/dev/log";

/// Kernel log device
pub const KMSG_DEVICE: &str = "/dev/kmsg";
