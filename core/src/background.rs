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

//! Fire-and-forget launches for records that must not block a sweep.
use crate::launcher::Launcher;
use crate::outcome::Outcome;
use crate::record::ServiceRecord;
use std::sync::Arc;
use std::thread;

impl Launcher {
    /// Start `record` on a detached thread and return at once.
    ///
    /// The eventual outcome is only logged. Detached launches never occupy
    /// the task slot. A failure to create the thread is logged and still
    /// answered with [`Outcome::Notification`].
    pub fn launch_detached(&self, record: &Arc<ServiceRecord>) -> Outcome {
        let launcher = self.clone();
        let job = Arc::clone(record);
        let spawned = thread::Builder::new()
            .name(format!("detached-{}", record.id()))
            .spawn(move || {
                let outcome = launcher.run(&job, true, false);
                log::debug!("Detached launch of {} finished: {}", job.id(), outcome);
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn detached launch of {}: {}", record.id(), e);
        }

        Outcome::Notification
    }
}

#[cfg(test)]
mod tests {
    use crate::context::SupervisorContext;
    use crate::launcher::tests::test_hooks;
    use crate::launcher::Launcher;
    use crate::outcome::Outcome;
    use crate::record::ServiceRecord;
    use crate::shell::ShellResolver;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_launch_detached() {
        let l = Launcher::new(
            Arc::new(SupervisorContext::default()),
            Arc::new(ShellResolver::default()),
            Arc::new(test_hooks()),
        );
        let r = Arc::new(ServiceRecord::new("bg").with_start_command("sleep 1"));

        assert_eq!(l.launch_detached(&r), Outcome::Notification);

        let mut running = false;
        for _ in 0..100 {
            if l.context().running_children() == 1 {
                running = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(running);
        assert!(l.context().current_task().is_none());

        for _ in 0..300 {
            if l.context().running_children() == 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(l.context().running_children(), 0);
    }
}
