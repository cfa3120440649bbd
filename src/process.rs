//! 进程注册表 - 跟踪每个会话当前运行的 agent 进程

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 被跟踪的 agent 进程信息
///
/// 由 `ProcessRegistry` 独占持有，调用方拿到的都是克隆。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub project_path: String,
}

/// 进程注册表 - 会话 ID 到当前进程的内存映射
///
/// 纯记账结构：不做 I/O，不校验 pid 存活。进程本身的健康由
/// 负责启动它的协作方管理，注册表只回答"这个会话现在有没有
/// 被跟踪的进程"。每个会话同一时刻最多一条记录。
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    processes: HashMap<String, ProcessInfo>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            processes: HashMap::new(),
        }
    }

    /// 跟踪进程 - 无条件插入或替换该会话的记录
    ///
    /// 同一会话重复 track 是预期事件（上一条 prompt 名义上还在
    /// 跟踪时新 prompt 已启动）：旧记录直接丢弃，不终止旧 pid，
    /// 只留一条告警日志。本操作永不失败。
    pub fn track(
        &mut self,
        session_id: impl Into<String>,
        pid: u32,
        project_path: impl Into<String>,
    ) {
        let session_id = session_id.into();
        let info = ProcessInfo {
            pid,
            session_id: session_id.clone(),
            started_at: Utc::now(),
            project_path: project_path.into(),
        };

        if let Some(old) = self.processes.insert(session_id.clone(), info) {
            warn!(
                session_id = %session_id,
                old_pid = old.pid,
                new_pid = pid,
                "Replacing tracked process for session"
            );
        } else {
            debug!(session_id = %session_id, pid = pid, "Tracking process");
        }
    }

    /// 取消跟踪，返回该会话此前是否有记录
    ///
    /// 对没有记录的会话调用是安全的（返回 false，不报错）。
    pub fn untrack(&mut self, session_id: &str) -> bool {
        let removed = self.processes.remove(session_id).is_some();
        if removed {
            debug!(session_id = %session_id, "Untracked process");
        }
        removed
    }

    /// 查询会话的进程信息（纯查询，不修改状态）
    pub fn get(&self, session_id: &str) -> Option<ProcessInfo> {
        self.processes.get(session_id).cloned()
    }

    /// 会话是否有被跟踪的进程
    pub fn has(&self, session_id: &str) -> bool {
        self.processes.contains_key(session_id)
    }

    /// 当前所有记录的快照（顺序无意义）
    pub fn list_all(&self) -> Vec<ProcessInfo> {
        self.processes.values().cloned().collect()
    }

    /// 当前记录数
    pub fn count(&self) -> usize {
        self.processes.len()
    }

    /// 清空所有记录（测试隔离/完全重置用），幂等
    pub fn clear(&mut self) {
        self.processes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_and_get() {
        let mut registry = ProcessRegistry::new();
        registry.track("s1", 4242, "/repo");

        let info = registry.get("s1").unwrap();
        assert_eq!(info.pid, 4242);
        assert_eq!(info.session_id, "s1");
        assert_eq!(info.project_path, "/repo");
        assert!(registry.has("s1"));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_retrack_replaces_not_merges() {
        let mut registry = ProcessRegistry::new();
        registry.track("s1", 1, "/a");
        registry.track("s1", 2, "/b");

        // 替换而非合并，count 不变
        let info = registry.get("s1").unwrap();
        assert_eq!(info.pid, 2);
        assert_eq!(info.project_path, "/b");
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_untrack_present_and_absent() {
        let mut registry = ProcessRegistry::new();
        registry.track("s1", 100, "/repo");

        // 不存在的会话返回 false，count 不变
        assert!(!registry.untrack("missing"));
        assert_eq!(registry.count(), 1);

        assert!(registry.untrack("s1"));
        assert!(!registry.has("s1"));
        assert!(registry.get("s1").is_none());
        assert_eq!(registry.count(), 0);

        // 再次 untrack 同样安全
        assert!(!registry.untrack("s1"));
    }

    #[test]
    fn test_count_increases_only_for_new_sessions() {
        let mut registry = ProcessRegistry::new();
        registry.track("s1", 1, "/a");
        assert_eq!(registry.count(), 1);
        registry.track("s2", 2, "/b");
        assert_eq!(registry.count(), 2);
        registry.track("s1", 3, "/c");
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_list_all_snapshot() {
        let mut registry = ProcessRegistry::new();
        registry.track("s1", 1, "/a");
        registry.track("s2", 2, "/b");

        let mut pids: Vec<u32> = registry.list_all().iter().map(|p| p.pid).collect();
        pids.sort();
        assert_eq!(pids, vec![1, 2]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut registry = ProcessRegistry::new();
        registry.track("s1", 1, "/a");
        registry.track("s2", 2, "/b");

        registry.clear();
        assert_eq!(registry.count(), 0);

        registry.clear();
        assert_eq!(registry.count(), 0);
    }
}
