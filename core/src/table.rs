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

//! The service table, an arena owning every service record.
use crate::record::ServiceRecord;
use std::sync::Arc;

/// Stable handle of a record inside its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    ///
    pub fn index(self) -> usize {
        self.0
    }
}

/// Records in insertion order. Records are shared with background launches,
/// hence the `Arc`.
#[derive(Debug, Default)]
pub struct ServiceTable {
    records: Vec<Arc<ServiceRecord>>,
}

impl ServiceTable {
    ///
    pub fn new() -> ServiceTable {
        ServiceTable::default()
    }

    /// take ownership of a record, returning its handle
    pub fn push(&mut self, record: ServiceRecord) -> RecordId {
        self.records.push(Arc::new(record));
        RecordId(self.records.len() - 1)
    }

    ///
    pub fn get(&self, id: RecordId) -> Option<&Arc<ServiceRecord>> {
        self.records.get(id.0)
    }

    /// look a record up by its service id
    pub fn find(&self, service_id: &str) -> Option<&Arc<ServiceRecord>> {
        self.records.iter().find(|r| r.id() == service_id)
    }

    ///
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ServiceRecord>> {
        self.records.iter()
    }

    ///
    pub fn len(&self) -> usize {
        self.records.len()
    }

    ///
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The highest priority configured for the direction, 0 when no record
    /// takes part in it.
    pub fn highest_priority(&self, is_start: bool) -> u32 {
        self.records
            .iter()
            .map(|r| r.priority(is_start))
            .max()
            .unwrap_or(0)
    }

    /// The record bound to `priority` for the direction. With a runlevel
    /// only members of that runlevel are considered. Priority 0 is never
    /// bound. When several records share a priority the first one wins.
    pub fn record_at(
        &self,
        runlevel: Option<&str>,
        is_start: bool,
        priority: u32,
    ) -> Option<&Arc<ServiceRecord>> {
        if priority == 0 {
            return None;
        }

        self.records.iter().find(|r| {
            r.priority(is_start) == priority
                && runlevel.map_or(true, |rl| self.runlevel_matches(rl, r))
        })
    }

    /// whether the record belongs to the runlevel `target`
    pub fn runlevel_matches(&self, target: &str, record: &ServiceRecord) -> bool {
        record.runlevels().iter().any(|rl| rl == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ServiceTable {
        let mut table = ServiceTable::new();
        table.push(
            ServiceRecord::new("mounts")
                .with_priorities(1, 3)
                .with_runlevel("boot")
                .with_runlevel("default"),
        );
        table.push(
            ServiceRecord::new("sshd")
                .with_priorities(2, 1)
                .with_runlevel("default"),
        );
        table.push(ServiceRecord::new("unplaced").with_runlevel("default"));
        table
    }

    #[test]
    fn test_lookup() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        let id = RecordId(1);
        assert_eq!(table.get(id).unwrap().id(), "sshd");
        assert_eq!(table.find("mounts").unwrap().id(), "mounts");
        assert!(table.find("nope").is_none());
        assert!(table.get(RecordId(9)).is_none());
    }

    #[test]
    fn test_highest_priority() {
        let table = table();
        assert_eq!(table.highest_priority(true), 2);
        assert_eq!(table.highest_priority(false), 3);
        assert_eq!(ServiceTable::new().highest_priority(true), 0);
    }

    #[test]
    fn test_record_at() {
        let table = table();
        assert_eq!(table.record_at(None, true, 2).unwrap().id(), "sshd");
        assert_eq!(table.record_at(None, false, 3).unwrap().id(), "mounts");
        assert!(table.record_at(Some("boot"), true, 2).is_none());
        assert_eq!(
            table.record_at(Some("boot"), true, 1).unwrap().id(),
            "mounts"
        );
        /* zero priority is never bound */
        assert!(table.record_at(None, true, 0).is_none());
        assert!(table.record_at(None, true, 7).is_none());
    }

    #[test]
    fn test_runlevel_matches() {
        let table = table();
        let mounts = table.find("mounts").unwrap();
        assert!(table.runlevel_matches("boot", mounts));
        assert!(!table.runlevel_matches("single", mounts));
    }
}
