use serde::Deserialize;

use crate::models::task::TaskList;

/// Appointment lifecycle states. Transitions are unrestricted; the enum
/// only closes the value space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "In progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<AppointmentStatus> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "in_progress" => Some(AppointmentStatus::InProgress),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// For the appointment list page; task aggregates come from the decoded
/// checklist.
#[derive(Debug, Clone)]
pub struct AppointmentListItem {
    pub id: i64,
    pub customer_name: String,
    pub technician_name: String,
    pub service_type_name: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub status_label: String,
    pub task_count: usize,
    pub completed_tasks: usize,
    pub progress_percent: i64,
}

/// Full record for the detail/edit screen.
#[derive(Debug, Clone)]
pub struct AppointmentDetail {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub technician_id: i64,
    pub technician_name: String,
    pub service_type_id: i64,
    pub service_type_name: String,
    /// `YYYY-MM-DDTHH:MM`, ready for a datetime-local input.
    pub start_time: String,
    pub end_time: String,
    pub status: AppointmentStatus,
    pub observations: String,
    pub tasks: TaskList,
}

/// Form data from create/edit appointment forms.
#[derive(Debug, Deserialize)]
pub struct AppointmentForm {
    pub customer_id: i64,
    pub technician_id: i64,
    pub service_type_id: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub observations: String,
    pub csrf_token: String,
}
