use crate::models::task::TaskSkeleton;

/// A reusable prototype task list scoped to a service type.
#[derive(Debug, Clone)]
pub struct ServiceTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub service_type_id: i64,
    pub estimated_duration: i64,
    pub default_tasks: Vec<TaskSkeleton>,
}

/// Summary row for the template picker on the appointment screen.
#[derive(Debug, Clone)]
pub struct TemplateListItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub task_count: i64,
    pub estimated_duration: i64,
}
