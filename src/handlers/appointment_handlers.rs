use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{get_user_id, require_permission};
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::models::appointment::{self, AppointmentForm, AppointmentStatus};
use crate::models::customer::CustomerOption;
use crate::models::service_type::ServiceType;
use crate::models::task::{TaskList, TaskPatch, instantiate_from_template};
use crate::models::technician::Technician;
use crate::models::{customer, service_type, task, technician, template};
use crate::templates_structs::{
    AppointmentDetailTemplate, AppointmentFormTemplate, AppointmentListTemplate, PageContext,
    appointment::status_options,
};

fn parse_datetime_local(value: &str, field_name: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M")
        .map(|dt| dt.and_utc())
        .map_err(|_| format!("{field_name} must be a date and time"))
}

async fn load_form_options(
    pool: &PgPool,
) -> Result<(Vec<CustomerOption>, Vec<Technician>, Vec<ServiceType>), AppError> {
    let customers = customer::find_options(pool).await?;
    let technicians = technician::find_active(pool).await?;
    let service_types = service_type::find_active(pool).await?;
    Ok((customers, technicians, service_types))
}

pub async fn list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.view")?;
    let ctx = PageContext::build(&session, &pool, "/appointments").await?;

    let now = Utc::now();
    let upcoming = appointment::find_upcoming(&pool, now).await?;
    let past = appointment::find_past(&pool, now, 50).await?;

    render(AppointmentListTemplate { ctx, upcoming, past })
}

pub async fn new_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.create")?;
    let ctx = PageContext::build(&session, &pool, "/appointments").await?;
    let (customers, technicians, service_types) = load_form_options(&pool).await?;

    render(AppointmentFormTemplate {
        ctx,
        appointment: None,
        customers,
        technicians,
        service_types,
        statuses: status_options(AppointmentStatus::Scheduled),
        errors: Vec::new(),
    })
}

fn validate_times(form: &AppointmentForm) -> Result<(DateTime<Utc>, DateTime<Utc>), Vec<String>> {
    let mut errors = Vec::new();
    let start = parse_datetime_local(&form.start_time, "Start time");
    let end = parse_datetime_local(&form.end_time, "End time");
    if let Err(e) = &start {
        errors.push(e.clone());
    }
    if let Err(e) = &end {
        errors.push(e.clone());
    }
    if let (Ok(start), Ok(end)) = (&start, &end) {
        if end <= start {
            errors.push("End time must be after the start time".to_string());
        }
    }
    match (start, end) {
        (Ok(start), Ok(end)) if errors.is_empty() => Ok((start, end)),
        _ => Err(errors),
    }
}

pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<AppointmentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (start, end) = match validate_times(&form) {
        Ok(times) => times,
        Err(errors) => {
            let ctx = PageContext::build(&session, &pool, "/appointments").await?;
            let (customers, technicians, service_types) = load_form_options(&pool).await?;
            return render(AppointmentFormTemplate {
                ctx,
                appointment: None,
                customers,
                technicians,
                service_types,
                statuses: status_options(AppointmentStatus::Scheduled),
                errors,
            });
        }
    };

    let user_id = get_user_id(&session).unwrap_or(0);
    let id = appointment::create(
        &pool,
        form.customer_id,
        form.technician_id,
        form.service_type_id,
        start,
        end,
        &form.observations,
        &TaskList::default(),
        user_id,
    )
    .await?;

    crate::audit::log(
        &pool,
        user_id,
        "create",
        "appointments",
        id,
        serde_json::json!({ "customer_id": form.customer_id, "start_time": &form.start_time }),
    )
    .await;

    let _ = session.insert("flash", "Appointment scheduled successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}

pub async fn detail(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.view")?;
    let ctx = PageContext::build(&session, &pool, "/appointments").await?;

    let appointment = appointment::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    let technicians = technician::find_active(&pool).await?;
    // Template lookup failure degrades to an empty picker, not an error.
    let templates = template::find_by_service_type(&pool, appointment.service_type_id)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Template lookup failed: {e}");
            Vec::new()
        });

    let tasks = appointment.tasks.sorted_for_display();
    render(AppointmentDetailTemplate {
        completed_count: appointment.tasks.completed_count(),
        task_count: appointment.tasks.len(),
        progress_percent: appointment.tasks.progress_percent(),
        total_estimated_minutes: appointment.tasks.total_estimated_minutes(),
        completed_minutes: appointment.tasks.completed_minutes(),
        ctx,
        appointment,
        tasks,
        technicians,
        templates,
    })
}

pub async fn edit_form(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    let ctx = PageContext::build(&session, &pool, "/appointments").await?;

    let appointment = appointment::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    let (customers, technicians, service_types) = load_form_options(&pool).await?;

    render(AppointmentFormTemplate {
        statuses: status_options(appointment.status),
        ctx,
        appointment: Some(appointment),
        customers,
        technicians,
        service_types,
        errors: Vec::new(),
    })
}

pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<AppointmentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let existing = appointment::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let status = form
        .status
        .as_deref()
        .and_then(AppointmentStatus::parse)
        .unwrap_or(existing.status);

    let (start, end) = match validate_times(&form) {
        Ok(times) => times,
        Err(errors) => {
            let ctx = PageContext::build(&session, &pool, "/appointments").await?;
            let (customers, technicians, service_types) = load_form_options(&pool).await?;
            return render(AppointmentFormTemplate {
                statuses: status_options(existing.status),
                ctx,
                appointment: Some(existing),
                customers,
                technicians,
                service_types,
                errors,
            });
        }
    };

    appointment::update(
        &pool,
        id,
        form.customer_id,
        form.technician_id,
        form.service_type_id,
        start,
        end,
        status,
        &form.observations,
    )
    .await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "update",
        "appointments",
        id,
        serde_json::json!({ "status": status.as_str() }),
    )
    .await;

    let _ = session.insert("flash", "Appointment updated successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    appointment::delete(&pool, id).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "delete",
        "appointments",
        id,
        serde_json::json!({}),
    )
    .await;

    let _ = session.insert("flash", "Appointment deleted");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/appointments"))
        .finish())
}

// ---------------------------------------------------------------------------
// Task checklist operations
// ---------------------------------------------------------------------------

/// Load the appointment's checklist, apply a mutation, and persist the
/// whole list back (last write wins).
async fn with_tasks<F>(pool: &PgPool, appointment_id: i64, mutate: F) -> Result<(), AppError>
where
    F: FnOnce(&mut TaskList),
{
    let appointment = appointment::find_by_id(pool, appointment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut tasks = appointment.tasks;
    mutate(&mut tasks);
    appointment::update_tasks(pool, appointment_id, &tasks).await
}

#[derive(Deserialize)]
pub struct TaskAddForm {
    pub description: String,
    pub estimated_minutes: Option<i64>,
    pub csrf_token: String,
}

pub async fn add_task(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<TaskAddForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let minutes = form
        .estimated_minutes
        .unwrap_or(task::DEFAULT_ESTIMATED_MINUTES);
    if let Some(e) = validate::validate_minutes(minutes, "Estimated time") {
        let _ = session.insert("flash", e);
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", format!("/appointments/{id}")))
            .finish());
    }

    // An empty description is a silent no-op inside add_task.
    with_tasks(&pool, id, |tasks| tasks.add_task(&form.description, minutes)).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "task.add",
        "appointments",
        id,
        serde_json::json!({ "description": form.description.trim() }),
    )
    .await;

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}

pub async fn toggle_task(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, String)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (id, task_id) = path.into_inner();
    with_tasks(&pool, id, |tasks| tasks.toggle_status(&task_id)).await?;

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}

pub async fn delete_task(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, String)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (id, task_id) = path.into_inner();
    with_tasks(&pool, id, |tasks| tasks.delete_task(&task_id)).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "task.delete",
        "appointments",
        id,
        serde_json::json!({ "task_id": task_id }),
    )
    .await;

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}

#[derive(Deserialize)]
pub struct TaskUpdateForm {
    #[serde(default)]
    pub notes: Option<String>,
    /// Technician id as a string; empty clears the assignment.
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub csrf_token: String,
}

/// Edit a task's notes and technician assignment.
pub async fn update_task(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, String)>,
    form: web::Form<TaskUpdateForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (id, task_id) = path.into_inner();
    let notes = form.notes.as_ref().map(|n| {
        let trimmed = n.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });
    let assigned_to = form
        .assigned_to
        .as_ref()
        .map(|value| value.trim().parse::<i64>().ok());

    let patch = TaskPatch {
        notes,
        assigned_to,
        ..TaskPatch::default()
    };
    with_tasks(&pool, id, |tasks| tasks.update_task(&task_id, patch)).await?;

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}

#[derive(Deserialize)]
pub struct ApplyTemplateForm {
    pub template_id: i64,
    /// "replace" or "append"
    #[serde(default)]
    pub mode: String,
    pub csrf_token: String,
}

/// Materialize a service template's skeleton list into fresh tasks and
/// either replace or extend the appointment's checklist.
pub async fn apply_template(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<ApplyTemplateForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "appointments.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let template = template::find_by_id(&pool, form.template_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let new_tasks = instantiate_from_template(&template.default_tasks);
    let added = new_tasks.len();

    with_tasks(&pool, id, |tasks| {
        if form.mode != "append" {
            *tasks = TaskList::default();
        }
        tasks.append(new_tasks);
    })
    .await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "task.template",
        "appointments",
        id,
        serde_json::json!({ "template_id": template.id, "tasks_added": added }),
    )
    .await;

    let _ = session.insert(
        "flash",
        format!("{added} tasks added from template \"{}\"", template.name),
    );
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/appointments/{id}")))
        .finish())
}
