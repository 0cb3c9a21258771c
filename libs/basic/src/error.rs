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

//! error definitions
use nix::errno::Errno;
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;

#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Io: {}", source))]
    Io { source: std::io::Error },

    #[snafu(display("Errno: {}", source))]
    Nix { source: nix::Error },

    #[cfg(feature = "process")]
    #[snafu(display("procfs: {}", source))]
    Proc { source: procfs::ProcError },

    #[snafu(display("Not exist: '{}'.", what))]
    NotExisted { what: String },

    #[snafu(display("Invalid: '{}'.", what))]
    Invalid { what: String },
}

impl Error {
    /// Translate the basic error to error number.
    pub fn get_errno(&self) -> i32 {
        match self {
            Error::Io { source } => source.raw_os_error().unwrap_or_default(),
            Error::Nix { source } => *source as i32,
            #[cfg(feature = "process")]
            Error::Proc { source } => match source {
                procfs::ProcError::PermissionDenied(_) => Errno::EPERM as i32,
                procfs::ProcError::NotFound(_) => Errno::ENOENT as i32,
                procfs::ProcError::Io(_, _) => Errno::EIO as i32,
                _ => Errno::EINVAL as i32,
            },
            Error::NotExisted { what: _ } => Errno::ENOENT as i32,
            Error::Invalid { what: _ } => Errno::EINVAL as i32,
        }
    }
}

///
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// two errno to try again
pub fn errno_is_transient(source: Errno) -> bool {
    matches!(source, Errno::EAGAIN | Errno::EINTR)
}
