//! Shared fixtures for model-layer tests.

use poolcare::models::task::{Task, TaskList, TaskSkeleton, TaskStatus, new_task_id};

/// A skeleton list mirroring a typical cleaning template.
pub fn sample_skeletons() -> Vec<TaskSkeleton> {
    vec![
        TaskSkeleton {
            description: "Skim surface debris".to_string(),
            estimated_minutes: None,
            order: None,
        },
        TaskSkeleton {
            description: "Test and balance chemicals".to_string(),
            estimated_minutes: Some(45),
            order: None,
        },
        TaskSkeleton {
            description: "Backwash filter".to_string(),
            estimated_minutes: Some(20),
            order: Some(10),
        },
    ]
}

/// Build a list of `n` pending tasks with sequential orders.
pub fn list_of(n: usize) -> TaskList {
    let mut list = TaskList::default();
    for i in 0..n {
        list.0.push(Task {
            id: new_task_id(),
            description: format!("Task {}", i + 1),
            estimated_minutes: 30,
            status: TaskStatus::Pending,
            assigned_to: None,
            completed_at: None,
            notes: None,
            order: i as i64 + 1,
        });
    }
    list
}
