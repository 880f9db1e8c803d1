//! Developer guardrails and invariants
//!
//! `assert_*` helpers are debug assertions for detecting impossible states
//! during development and are compiled out in release builds.
//! [`snapshot_violation`] is always available; rehydration uses it to reject
//! persisted data that could never have been produced by the store.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Member, Task, PROGRESS_COMPLETE};
use crate::store::Snapshot;

/// Describe the first broken invariant of a member, if any
pub fn member_violation(member: &Member) -> Option<String> {
    if member.id.0 == Uuid::nil() {
        return Some(format!("Member '{}' has nil id", member.name));
    }
    None
}

/// Describe the first broken invariant of a task, if any
pub fn task_violation(task: &Task) -> Option<String> {
    if task.id.0 == Uuid::nil() {
        return Some(format!("Task '{}' has nil id", task.title));
    }
    if task.title.trim().is_empty() {
        return Some(format!("Task {} has empty title", task.id));
    }
    if task.progress > PROGRESS_COMPLETE {
        return Some(format!("Task {} has progress {} above 100", task.id, task.progress));
    }
    if task.completed != (task.progress == PROGRESS_COMPLETE) {
        return Some(format!(
            "Task {} has completed={} with progress {}",
            task.id, task.completed, task.progress
        ));
    }
    None
}

/// Describe the first broken invariant of a snapshot, if any
pub fn snapshot_violation(snapshot: &Snapshot) -> Option<String> {
    let mut member_ids = HashSet::new();
    for member in &snapshot.members {
        if let Some(violation) = member_violation(member) {
            return Some(violation);
        }
        if !member_ids.insert(member.id) {
            return Some(format!("Duplicate member id {}", member.id));
        }
    }

    let mut task_ids = HashSet::new();
    for task in &snapshot.tasks {
        if let Some(violation) = task_violation(task) {
            return Some(violation);
        }
        if !task_ids.insert(task.id) {
            return Some(format!("Duplicate task id {}", task.id));
        }
    }

    None
}

/// Validate that a task's progress and completion agree
pub fn assert_task_invariants(task: &Task) {
    let violation = task_violation(task);
    debug_assert!(violation.is_none(), "{}", violation.unwrap_or_default());
}

/// Validate that a whole snapshot is internally consistent
pub fn assert_snapshot_invariants(snapshot: &Snapshot) {
    let violation = snapshot_violation(snapshot);
    debug_assert!(violation.is_none(), "{}", violation.unwrap_or_default());
}
