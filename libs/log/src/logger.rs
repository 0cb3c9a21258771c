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

//! The loggers behind the facade: console, syslog and kmsg.
use constants::{KMSG_DEVICE, SYSLOG_SOCKET};
use log_facade::{Level, Log, Metadata, Record};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    os::unix::net::UnixDatagram,
    sync::Mutex,
};

fn write_msg_common(writer: &mut impl Write, module: &str, msg: String) {
    let time: libc::time_t = unsafe { libc::time(std::ptr::null_mut()) };
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    unsafe { libc::localtime_r(&time, &mut tm) };
    let now_str = format!(
        "{:0>4}-{:0>2}-{:0>2} {:0>2}:{:0>2}:{:0>2} ",
        tm.tm_year + 1900, /* tm_year is years since 1900 */
        tm.tm_mon + 1,     /* tm_mon is months since Jan: [0, 11] */
        tm.tm_mday,
        tm.tm_hour,
        tm.tm_min,
        tm.tm_sec
    );

    let line = now_str + module + " " + &msg + "\n";
    if let Err(e) = writer.write_all(line.as_bytes()) {
        eprintln!("Failed to log message: {}", e);
    }
}

fn module_of<'a>(record: &'a Record) -> &'a str {
    record.module_path().unwrap_or("unknown")
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut stdout = std::io::stdout();
        write_msg_common(&mut stdout, module_of(record), record.args().to_string());
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

struct SysLogger {
    dgram: UnixDatagram,
}

impl SysLogger {
    fn new() -> Result<Self, std::io::Error> {
        let dgram = UnixDatagram::unbound()?;
        dgram.connect(SYSLOG_SOCKET)?;
        Ok(Self { dgram })
    }
}

/* This is an extremely simple implementation, and only
 * supports the very basic log function. */
impl Log for SysLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let msg = format!("{} {}", module_of(record), record.args());
        if let Err(e) = self.dgram.send(msg.as_bytes()) {
            eprintln!("Failed to send message to syslogger: {}", e);
        }
    }

    fn flush(&self) {}
}

struct KmsgLogger {
    name: String,
    kmsg: Mutex<File>,
}

impl KmsgLogger {
    fn new(name: &str) -> Result<Self, std::io::Error> {
        let kmsg = OpenOptions::new().write(true).open(KMSG_DEVICE)?;
        Ok(Self {
            name: name.to_string(),
            kmsg: Mutex::new(kmsg),
        })
    }

    /* syslog(2) priorities */
    fn priority(level: Level) -> u8 {
        match level {
            Level::Error => 3,
            Level::Warn => 4,
            Level::Info => 6,
            Level::Debug | Level::Trace => 7,
        }
    }
}

impl Log for KmsgLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let msg = format!(
            "<{}>{}: {}\n",
            Self::priority(record.level()),
            self.name,
            record.args()
        );
        let mut kmsg = match self.kmsg.lock() {
            Err(_) => return,
            Ok(v) => v,
        };
        /* kmsg refuses overlong records, nothing sensible to do about it here */
        let _ = kmsg.write_all(msg.as_bytes());
    }

    fn flush(&self) {}
}

/// Collect different kinds of loggers together.
///
/// Include: SysLogger, ConsoleLogger, KmsgLogger
struct CombinedLogger {
    loggers: Vec<Box<dyn Log>>,
}

impl Log for CombinedLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        for logger in &self.loggers {
            logger.log(record);
        }
    }

    fn flush(&self) {
        for logger in &self.loggers {
            logger.flush();
        }
    }
}

/// Initialize the global logger instance.
/// Available log `targets` include `console`, `syslog`, `kmsg`.
///
/// Repeated targets take effect only once. The global logger can be
/// installed only once per process, later calls only adjust the level.
///
/// # Arguments
///
/// * `name` - The application name that initializes the logger.
/// * `level` - Log message level.
/// * `targets` - A set of log targets.
pub fn init_log(name: &str, level: Level, targets: Vec<&str>) {
    let mut seen: Vec<&str> = Vec::new();
    let mut loggers: Vec<Box<dyn Log>> = Vec::new();

    for target in targets {
        let target = target.trim();
        if seen.contains(&target) {
            continue;
        }
        seen.push(target);

        let logger = match target {
            "console" => Box::new(ConsoleLogger) as Box<dyn Log>,
            "syslog" => match SysLogger::new() {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to create syslogger: {:?}", name, e);
                    continue;
                }
            },
            "kmsg" => match KmsgLogger::new(name) {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to open {}: {:?}", name, KMSG_DEVICE, e);
                    continue;
                }
            },
            _ => {
                eprintln!("{}: log target '{}' is strange, ignoring.", name, target);
                continue;
            }
        };

        loggers.push(logger);
    }

    if loggers.is_empty() {
        eprintln!("{}: no available log targets.", name);
        return;
    }

    log_facade::set_max_level(level.to_level_filter());

    if let Err(e) = log_facade::set_boxed_logger(Box::new(CombinedLogger { loggers })) {
        eprintln!("{}: failed to set global logger: {:?}", name, e);
    }
}
