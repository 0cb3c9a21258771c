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

//! Error define of the supervision core.
//!
//! The operations driven by the runlevel engine report an `Outcome`, errors
//! only travel along the internal fallible steps and the id based lookups.

pub use nix::errno::Errno;
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;

#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("UtilError(levelmaster): {}", source))]
    Util { source: basic::Error },

    #[snafu(display("command of '{}' contains a NUL byte", id))]
    NulCommand {
        id: String,
        source: std::ffi::NulError,
    },

    #[snafu(display("NotFound(levelmaster): '{}'.", what))]
    NotFound { what: String },
}

/// Convert to the standard linux error code
impl From<Error> for nix::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Util { source } => Errno::from_i32(source.get_errno()),
            Error::NulCommand { .. } => Errno::EINVAL,
            Error::NotFound { .. } => Errno::ENOENT,
        }
    }
}

impl From<basic::Error> for Error {
    fn from(source: basic::Error) -> Self {
        Error::Util { source }
    }
}

/// new Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_errno() {
        let e = Error::NotFound {
            what: "sshd".to_string(),
        };
        assert_eq!(nix::Error::from(e), Errno::ENOENT);


        let e: Error = basic::Error::Invalid {
            what: "pid".to_string(),
        }
        .into();
        assert_eq!(nix::Error::from(e), Errno::EINVAL);

        let e = std::ffi::CString::new("true\0false")
            .context(NulCommandSnafu { id: "unit" })
            .unwrap_err();
        assert_eq!(nix::Error::from(e), Errno::EINVAL);
    }
}
