//! In-memory task checklist attached to one appointment.
//!
//! The list lives on the appointment row as a JSONB array and is decoded
//! through these types at the persistence boundary. All mutations are
//! synchronous in-memory edits; the caller persists the whole list back
//! (last write wins).

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ESTIMATED_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Exact-match parse; `None` for anything outside the enumeration.
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub estimated_minutes: i64,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub order: i64,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_assigned_to(&self, technician_id: &i64) -> bool {
        self.assigned_to == Some(*technician_id)
    }

    pub fn notes_display(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn completed_at_display(&self) -> String {
        self.completed_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Partial update for one task. `None` leaves the field alone; the nested
/// options distinguish "clear" from "leave".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Option<i64>>,
    pub notes: Option<Option<String>>,
}

/// One entry of a service template's prototype list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSkeleton {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(pub Vec<Task>);

impl TaskList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.0.iter().find(|t| t.id == id)
    }

    /// Append a new pending task. A whitespace-only description is a
    /// silent no-op.
    pub fn add_task(&mut self, description: &str, estimated_minutes: i64) {
        let description = description.trim();
        if description.is_empty() {
            return;
        }
        let order = self.0.len() as i64 + 1;
        self.0.push(Task {
            id: new_task_id(),
            description: description.to_string(),
            estimated_minutes,
            status: TaskStatus::Pending,
            assigned_to: None,
            completed_at: None,
            notes: None,
            order,
        });
    }

    /// Merge a partial patch into the task with the given id. Setting
    /// status to completed stamps `completed_at`; setting any other
    /// status clears it; a patch without a status leaves it alone.
    /// Unknown ids are ignored.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) {
        let Some(task) = self.0.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(minutes) = patch.estimated_minutes {
            task.estimated_minutes = minutes;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(notes) = patch.notes {
            task.notes = notes;
        }
        if let Some(status) = patch.status {
            task.status = status;
            task.completed_at = if status == TaskStatus::Completed {
                Some(Utc::now())
            } else {
                None
            };
        }
    }

    /// Remove the task with the given id. Remaining `order` values are
    /// not renumbered. Unknown ids are ignored.
    pub fn delete_task(&mut self, id: &str) {
        self.0.retain(|t| t.id != id);
    }

    /// Flip between completed and pending.
    pub fn toggle_status(&mut self, id: &str) {
        let Some(task) = self.get(id) else { return };
        let next = if task.status == TaskStatus::Completed {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        };
        self.update_task(
            id,
            TaskPatch {
                status: Some(next),
                ..TaskPatch::default()
            },
        );
    }

    pub fn append(&mut self, tasks: Vec<Task>) {
        self.0.extend(tasks);
    }

    pub fn completed_count(&self) -> usize {
        self.0
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    /// Unrounded completion fraction in [0, 1]; 0 for the empty list.
    pub fn progress(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.0.len() as f64
    }

    /// Rounded percentage for display only.
    pub fn progress_percent(&self) -> i64 {
        (self.progress() * 100.0).round() as i64
    }

    pub fn total_estimated_minutes(&self) -> i64 {
        self.0.iter().map(|t| t.estimated_minutes).sum()
    }

    pub fn completed_minutes(&self) -> i64 {
        self.0
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .map(|t| t.estimated_minutes)
            .sum()
    }

    /// Display order: ascending by `order`, stable for ties.
    pub fn sorted_for_display(&self) -> Vec<Task> {
        let mut tasks = self.0.clone();
        tasks.sort_by_key(|t| t.order);
        tasks
    }

    /// Decode the stored blob. A malformed blob degrades to an empty list
    /// with an advisory log, never an error.
    pub fn from_value(value: &serde_json::Value) -> TaskList {
        match serde_json::from_value(value.clone()) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Malformed task blob, treating as empty: {e}");
                TaskList::default()
            }
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Array(vec![]))
    }
}

/// Materialize fresh tasks from a template's skeleton list: new ids,
/// status pending, estimate defaulting to 30 minutes, order defaulting to
/// the 1-based position. The caller decides whether to replace or append.
pub fn instantiate_from_template(skeletons: &[TaskSkeleton]) -> Vec<Task> {
    skeletons
        .iter()
        .enumerate()
        .map(|(index, skeleton)| Task {
            id: new_task_id(),
            description: skeleton.description.clone(),
            estimated_minutes: skeleton
                .estimated_minutes
                .unwrap_or(DEFAULT_ESTIMATED_MINUTES),
            status: TaskStatus::Pending,
            assigned_to: None,
            completed_at: None,
            notes: None,
            order: skeleton.order.unwrap_or(index as i64 + 1),
        })
        .collect()
}

/// Random 16-byte hex id, the same recipe as the CSRF token.
pub fn new_task_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}
