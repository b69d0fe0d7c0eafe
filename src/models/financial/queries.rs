use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;

use super::types::{
    FinancialSummary, InvoiceListItem, InvoiceStatus, PayableListItem, PaymentStatus,
    ReceivableListItem, format_cents, invoice_number,
};
use crate::errors::AppError;

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    invoice_number: String,
    customer_name: String,
    description: String,
    amount_cents: i64,
    issue_date: String,
    due_date: String,
    status: String,
    is_overdue: bool,
}

/// Invoices, newest first.
pub async fn find_invoices(pool: &PgPool) -> Result<Vec<InvoiceListItem>, AppError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
        "SELECT i.id, i.invoice_number, c.full_name AS customer_name, i.description, \
                i.amount_cents, \
                to_char(i.issue_date, 'YYYY-MM-DD') AS issue_date, \
                to_char(i.due_date, 'YYYY-MM-DD') AS due_date, \
                i.status, \
                (i.status = 'pending' AND i.due_date < CURRENT_DATE) AS is_overdue \
         FROM invoices i \
         JOIN customers c ON c.id = i.customer_id \
         ORDER BY i.created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| InvoiceListItem {
            id: r.id,
            invoice_number: r.invoice_number,
            customer_name: r.customer_name,
            description: r.description,
            amount: format_cents(r.amount_cents),
            issue_date: r.issue_date,
            due_date: r.due_date,
            status_label: InvoiceStatus::parse(&r.status)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| r.status.clone()),
            status: r.status,
            is_overdue: r.is_overdue,
        })
        .collect())
}

/// Allocate the next invoice number for the current year. The unique
/// constraint on invoice_number backstops concurrent allocations.
pub async fn next_invoice_number(pool: &PgPool) -> Result<String, AppError> {
    let year = Utc::now().year();
    let prefix = format!("INV-{year}-%");
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE invoice_number LIKE $1")
            .bind(&prefix)
            .fetch_one(pool)
            .await?;
    Ok(invoice_number(year, count + 1))
}

#[allow(clippy::too_many_arguments)]
pub async fn create_invoice(
    pool: &PgPool,
    number: &str,
    customer_id: i64,
    appointment_id: Option<i64>,
    description: &str,
    amount_cents: i64,
    due_date: NaiveDate,
    payment_method: &str,
    created_by: i64,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO invoices \
             (invoice_number, customer_id, appointment_id, description, amount_cents, \
              due_date, payment_method, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(number)
    .bind(customer_id)
    .bind(appointment_id)
    .bind(description.trim())
    .bind(amount_cents)
    .bind(due_date)
    .bind(payment_method.trim())
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Update an invoice's status; paid stamps `paid_at`, everything else
/// clears it.
pub async fn set_invoice_status(
    pool: &PgPool,
    id: i64,
    status: InvoiceStatus,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE invoices SET status = $1, \
             paid_at = CASE WHEN $1 = 'paid' THEN now() ELSE NULL END, \
             updated_at = now() \
         WHERE id = $2",
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct PayableRow {
    id: i64,
    supplier_name: String,
    description: String,
    category: String,
    document_number: String,
    amount_cents: i64,
    due_date: String,
    status: String,
    is_overdue: bool,
}

/// Accounts payable, soonest due first.
pub async fn find_payables(pool: &PgPool) -> Result<Vec<PayableListItem>, AppError> {
    let rows = sqlx::query_as::<_, PayableRow>(
        "SELECT id, supplier_name, description, category, document_number, amount_cents, \
                to_char(due_date, 'YYYY-MM-DD') AS due_date, status, \
                (status = 'pending' AND due_date < CURRENT_DATE) AS is_overdue \
         FROM accounts_payable \
         ORDER BY due_date ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| PayableListItem {
            id: r.id,
            supplier_name: r.supplier_name,
            description: r.description,
            category: r.category,
            document_number: r.document_number,
            amount: format_cents(r.amount_cents),
            due_date: r.due_date,
            status_label: PaymentStatus::parse(&r.status)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| r.status.clone()),
            status: r.status,
            is_overdue: r.is_overdue,
        })
        .collect())
}

#[allow(clippy::too_many_arguments)]
pub async fn create_payable(
    pool: &PgPool,
    supplier_name: &str,
    description: &str,
    category: &str,
    document_number: &str,
    amount_cents: i64,
    due_date: NaiveDate,
    created_by: i64,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO accounts_payable \
             (supplier_name, description, category, document_number, amount_cents, \
              due_date, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(supplier_name.trim())
    .bind(description.trim())
    .bind(category.trim())
    .bind(document_number.trim())
    .bind(amount_cents)
    .bind(due_date)
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn set_payable_status(
    pool: &PgPool,
    id: i64,
    status: PaymentStatus,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE accounts_payable SET status = $1, \
             paid_at = CASE WHEN $1 = 'paid' THEN now() ELSE NULL END, \
             updated_at = now() \
         WHERE id = $2",
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct ReceivableRow {
    id: i64,
    customer_name: String,
    description: String,
    amount_cents: i64,
    due_date: String,
    status: String,
    is_overdue: bool,
}

/// Accounts receivable, soonest due first.
pub async fn find_receivables(pool: &PgPool) -> Result<Vec<ReceivableListItem>, AppError> {
    let rows = sqlx::query_as::<_, ReceivableRow>(
        "SELECT ar.id, c.full_name AS customer_name, ar.description, ar.amount_cents, \
                to_char(ar.due_date, 'YYYY-MM-DD') AS due_date, ar.status, \
                (ar.status = 'pending' AND ar.due_date < CURRENT_DATE) AS is_overdue \
         FROM accounts_receivable ar \
         JOIN customers c ON c.id = ar.customer_id \
         ORDER BY ar.due_date ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| ReceivableListItem {
            id: r.id,
            customer_name: r.customer_name,
            description: r.description,
            amount: format_cents(r.amount_cents),
            due_date: r.due_date,
            status_label: PaymentStatus::parse(&r.status)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| r.status.clone()),
            status: r.status,
            is_overdue: r.is_overdue,
        })
        .collect())
}

#[allow(clippy::too_many_arguments)]
pub async fn create_receivable(
    pool: &PgPool,
    customer_id: i64,
    invoice_id: Option<i64>,
    description: &str,
    amount_cents: i64,
    due_date: NaiveDate,
    created_by: i64,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO accounts_receivable \
             (customer_id, invoice_id, description, amount_cents, due_date, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(customer_id)
    .bind(invoice_id)
    .bind(description.trim())
    .bind(amount_cents)
    .bind(due_date)
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Received stamps `received_at`; everything else clears it.
pub async fn set_receivable_status(
    pool: &PgPool,
    id: i64,
    status: PaymentStatus,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE accounts_receivable SET status = $1, \
             received_at = CASE WHEN $1 = 'paid' THEN now() ELSE NULL END, \
             updated_at = now() \
         WHERE id = $2",
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// KPI aggregates: revenue from paid invoices, pending totals on both
/// ledgers, and how many items are overdue by status or due date.
pub async fn summary(pool: &PgPool) -> Result<FinancialSummary, AppError> {
    let (total_revenue_cents,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM invoices WHERE status = 'paid'",
    )
    .fetch_one(pool)
    .await?;

    let (pending_receivables_cents,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM accounts_receivable WHERE status = 'pending'",
    )
    .fetch_one(pool)
    .await?;

    let (pending_payables_cents,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM accounts_payable WHERE status = 'pending'",
    )
    .fetch_one(pool)
    .await?;

    let (overdue_count,): (i64,) = sqlx::query_as(
        "SELECT \
             (SELECT COUNT(*) FROM accounts_receivable \
              WHERE status = 'overdue' OR (status = 'pending' AND due_date < CURRENT_DATE)) + \
             (SELECT COUNT(*) FROM accounts_payable \
              WHERE status = 'overdue' OR (status = 'pending' AND due_date < CURRENT_DATE))",
    )
    .fetch_one(pool)
    .await?;

    Ok(FinancialSummary {
        total_revenue_cents,
        pending_receivables_cents,
        pending_payables_cents,
        overdue_count,
    })
}

/// Count of pending invoices (dashboard).
pub async fn count_pending_invoices(pool: &PgPool) -> Result<i64, AppError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;
    Ok(count)
}
