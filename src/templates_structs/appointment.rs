use askama::Template;

use super::PageContext;
use crate::models::appointment::{AppointmentDetail, AppointmentListItem, AppointmentStatus};
use crate::models::customer::CustomerOption;
use crate::models::service_type::ServiceType;
use crate::models::task::Task;
use crate::models::technician::Technician;
use crate::models::template::TemplateListItem;

/// One entry of the status dropdown.
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn status_options(current: AppointmentStatus) -> Vec<StatusOption> {
    AppointmentStatus::ALL
        .iter()
        .map(|s| StatusOption {
            value: s.as_str(),
            label: s.label(),
            selected: *s == current,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "appointments/list.html")]
pub struct AppointmentListTemplate {
    pub ctx: PageContext,
    pub upcoming: Vec<AppointmentListItem>,
    pub past: Vec<AppointmentListItem>,
}

/// Shared by the create form (`appointment: None`) and edit form.
#[derive(Template)]
#[template(path = "appointments/form.html")]
pub struct AppointmentFormTemplate {
    pub ctx: PageContext,
    pub appointment: Option<AppointmentDetail>,
    pub customers: Vec<CustomerOption>,
    pub technicians: Vec<Technician>,
    pub service_types: Vec<ServiceType>,
    pub statuses: Vec<StatusOption>,
    pub errors: Vec<String>,
}

/// Detail screen: appointment header plus the task checklist with its
/// aggregate progress figures.
#[derive(Template)]
#[template(path = "appointments/detail.html")]
pub struct AppointmentDetailTemplate {
    pub ctx: PageContext,
    pub appointment: AppointmentDetail,
    pub tasks: Vec<Task>,
    pub completed_count: usize,
    pub task_count: usize,
    pub progress_percent: i64,
    pub total_estimated_minutes: i64,
    pub completed_minutes: i64,
    pub technicians: Vec<Technician>,
    pub templates: Vec<TemplateListItem>,
}
