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

//! This crate provides common functions for unit tests
use std::{
    env,
    fs,
    io::{self, ErrorKind},
    path::PathBuf,
};

/// get the source project root path, the first ancestor holding a Cargo.lock
pub fn get_project_root() -> io::Result<PathBuf> {
    let path = env::current_dir()?;
    let mut current_path = Some(path.as_path());

    while let Some(p) = current_path {
        if p.join("Cargo.lock").is_file() {
            return Ok(p.into());
        }
        current_path = p.parent();
    }

    Err(io::Error::new(ErrorKind::NotFound, "NotFound"))
}

/// get the root of the crate under test
///
/// cargo exports `CARGO_MANIFEST_DIR` to the test process, this crate's own
/// manifest directory is only used when running outside cargo.
pub fn get_crate_root() -> io::Result<PathBuf> {
    match env::var_os("CARGO_MANIFEST_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    }
}

/// get a scratch directory for test artifacts, created on demand
///
/// Falls back to the system temporary directory when the project root
/// can not be located.
pub fn get_target_test_dir() -> io::Result<PathBuf> {
    let test_dir = match get_project_root() {
        Ok(root) => root.join("target").join("tests"),
        Err(_) => env::temp_dir().join("levelmaster-tests"),
    };

    if !test_dir.exists() {
        fs::create_dir_all(&test_dir)?;
    }

    Ok(test_dir)
}

/// write `content` into a file named `name` below the scratch directory
pub fn write_test_file(name: &str, content: &str) -> io::Result<PathBuf> {
    let path = get_target_test_dir()?.join(name);
    fs::write(&path, content)?;
    Ok(path)
}
