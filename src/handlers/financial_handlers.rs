use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{get_user_id, require_permission};
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::models::customer;
use crate::models::financial::{
    self, InvoiceForm, InvoiceStatus, PayableForm, PaymentStatus, ReceivableForm,
};
use crate::templates_structs::{
    FinancialTemplate, InvoiceFormTemplate, PageContext, PayableFormTemplate,
    ReceivableFormTemplate,
};

#[derive(Deserialize)]
pub struct FinancialQuery {
    tab: Option<String>,
}

pub async fn index(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<FinancialQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.view")?;
    let ctx = PageContext::build(&session, &pool, "/financial").await?;

    let summary = financial::summary(&pool).await?;
    let invoices = financial::find_invoices(&pool).await?;
    let payables = financial::find_payables(&pool).await?;
    let receivables = financial::find_receivables(&pool).await?;

    let tab = match query.tab.as_deref() {
        Some("payable") => "payable",
        Some("receivable") => "receivable",
        _ => "invoices",
    };

    render(FinancialTemplate {
        ctx,
        summary,
        invoices,
        payables,
        receivables,
        tab: tab.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

pub async fn invoice_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.create")?;
    let ctx = PageContext::build(&session, &pool, "/financial").await?;
    let customers = customer::find_options(&pool).await?;
    render(InvoiceFormTemplate {
        ctx,
        customers,
        errors: Vec::new(),
    })
}

pub async fn invoice_create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    let amount_cents = validate::parse_amount_cents(&form.amount).unwrap_or_else(|e| {
        errors.push(e);
        0
    });
    let due_date = validate::parse_date(&form.due_date, "Due date").unwrap_or_else(|e| {
        errors.push(e);
        chrono::NaiveDate::MIN
    });
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/financial").await?;
        let customers = customer::find_options(&pool).await?;
        return render(InvoiceFormTemplate {
            ctx,
            customers,
            errors,
        });
    }

    let user_id = get_user_id(&session).unwrap_or(0);
    let number = financial::next_invoice_number(&pool).await?;
    let id = financial::create_invoice(
        &pool,
        &number,
        form.customer_id,
        form.appointment_id,
        &form.description,
        amount_cents,
        due_date,
        &form.payment_method,
        user_id,
    )
    .await?;

    crate::audit::log(
        &pool,
        user_id,
        "create",
        "invoices",
        id,
        serde_json::json!({ "invoice_number": number, "amount_cents": amount_cents }),
    )
    .await;

    let _ = session.insert("flash", format!("Invoice {number} created"));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/financial"))
        .finish())
}

#[derive(Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub csrf_token: String,
}

pub async fn invoice_set_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let status = InvoiceStatus::parse(&form.status)
        .ok_or_else(|| AppError::Validation("Unknown invoice status".to_string()))?;

    let id = path.into_inner();
    financial::set_invoice_status(&pool, id, status).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "status",
        "invoices",
        id,
        serde_json::json!({ "status": status.as_str() }),
    )
    .await;

    let _ = session.insert("flash", "Payment status updated");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/financial"))
        .finish())
}

// ---------------------------------------------------------------------------
// Accounts payable
// ---------------------------------------------------------------------------

pub async fn payable_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.create")?;
    let ctx = PageContext::build(&session, &pool, "/financial").await?;
    render(PayableFormTemplate {
        ctx,
        errors: Vec::new(),
    })
}

pub async fn payable_create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<PayableForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate::validate_required(&form.supplier_name, "Supplier", 200) {
        errors.push(e);
    }
    if let Some(e) = validate::validate_required(&form.description, "Description", 500) {
        errors.push(e);
    }
    let amount_cents = validate::parse_amount_cents(&form.amount).unwrap_or_else(|e| {
        errors.push(e);
        0
    });
    let due_date = validate::parse_date(&form.due_date, "Due date").unwrap_or_else(|e| {
        errors.push(e);
        chrono::NaiveDate::MIN
    });
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/financial").await?;
        return render(PayableFormTemplate { ctx, errors });
    }

    let user_id = get_user_id(&session).unwrap_or(0);
    let id = financial::create_payable(
        &pool,
        &form.supplier_name,
        &form.description,
        &form.category,
        &form.document_number,
        amount_cents,
        due_date,
        user_id,
    )
    .await?;

    crate::audit::log(
        &pool,
        user_id,
        "create",
        "accounts_payable",
        id,
        serde_json::json!({ "supplier_name": form.supplier_name.trim() }),
    )
    .await;

    let _ = session.insert("flash", "Payable created");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/financial?tab=payable"))
        .finish())
}

pub async fn payable_set_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let status = PaymentStatus::parse(&form.status)
        .ok_or_else(|| AppError::Validation("Unknown payment status".to_string()))?;

    let id = path.into_inner();
    financial::set_payable_status(&pool, id, status).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "status",
        "accounts_payable",
        id,
        serde_json::json!({ "status": status.as_str() }),
    )
    .await;

    let _ = session.insert("flash", "Payment status updated");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/financial?tab=payable"))
        .finish())
}

// ---------------------------------------------------------------------------
// Accounts receivable
// ---------------------------------------------------------------------------

pub async fn receivable_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.create")?;
    let ctx = PageContext::build(&session, &pool, "/financial").await?;
    let customers = customer::find_options(&pool).await?;
    render(ReceivableFormTemplate {
        ctx,
        customers,
        errors: Vec::new(),
    })
}

pub async fn receivable_create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<ReceivableForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate::validate_required(&form.description, "Description", 500) {
        errors.push(e);
    }
    let amount_cents = validate::parse_amount_cents(&form.amount).unwrap_or_else(|e| {
        errors.push(e);
        0
    });
    let due_date = validate::parse_date(&form.due_date, "Due date").unwrap_or_else(|e| {
        errors.push(e);
        chrono::NaiveDate::MIN
    });
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/financial").await?;
        let customers = customer::find_options(&pool).await?;
        return render(ReceivableFormTemplate {
            ctx,
            customers,
            errors,
        });
    }

    let user_id = get_user_id(&session).unwrap_or(0);
    let id = financial::create_receivable(
        &pool,
        form.customer_id,
        form.invoice_id,
        &form.description,
        amount_cents,
        due_date,
        user_id,
    )
    .await?;

    crate::audit::log(
        &pool,
        user_id,
        "create",
        "accounts_receivable",
        id,
        serde_json::json!({ "customer_id": form.customer_id, "amount_cents": amount_cents }),
    )
    .await;

    let _ = session.insert("flash", "Receivable created");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/financial?tab=receivable"))
        .finish())
}

pub async fn receivable_set_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "financial.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let status = PaymentStatus::parse(&form.status)
        .ok_or_else(|| AppError::Validation("Unknown payment status".to_string()))?;

    let id = path.into_inner();
    financial::set_receivable_status(&pool, id, status).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "status",
        "accounts_receivable",
        id,
        serde_json::json!({ "status": status.as_str() }),
    )
    .await;

    let _ = session.insert("flash", "Payment status updated");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/financial?tab=receivable"))
        .finish())
}
