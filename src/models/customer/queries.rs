use sqlx::PgPool;

use super::types::{CustomerDetail, CustomerForm, CustomerListItem, CustomerOption, CustomerPage};
use crate::errors::AppError;

/// Paginated customer list; text search over name, document, and email,
/// optionally restricted to active records.
pub async fn find_paginated(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    search: Option<&str>,
    active_only: bool,
) -> Result<CustomerPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;
    let pattern = format!("%{}%", search.unwrap_or("").trim());

    let (total_count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM customers \
         WHERE (full_name ILIKE $1 OR document ILIKE $1 OR email ILIKE $1) \
           AND ($2 = FALSE OR is_active)",
    )
    .bind(&pattern)
    .bind(active_only)
    .fetch_one(pool)
    .await?;

    let customers = sqlx::query_as::<_, CustomerListItem>(
        "SELECT id, full_name, person_type, document, phone, email, address_city, is_active \
         FROM customers \
         WHERE (full_name ILIKE $1 OR document ILIKE $1 OR email ILIKE $1) \
           AND ($2 = FALSE OR is_active) \
         ORDER BY full_name, id \
         LIMIT $3 OFFSET $4",
    )
    .bind(&pattern)
    .bind(active_only)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total_pages = (total_count as f64 / per_page as f64).ceil() as i64;
    Ok(CustomerPage {
        customers,
        page,
        per_page,
        total_count,
        total_pages,
    })
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<CustomerDetail>, AppError> {
    let customer = sqlx::query_as::<_, CustomerDetail>(
        "SELECT id, full_name, person_type, document, phone, email, \
                address_street, address_number, address_city, address_state, address_zip, \
                observations, is_active \
         FROM customers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(customer)
}

/// Active customers for dropdowns, ordered by name.
pub async fn find_options(pool: &PgPool) -> Result<Vec<CustomerOption>, AppError> {
    let options = sqlx::query_as::<_, CustomerOption>(
        "SELECT id, full_name FROM customers WHERE is_active ORDER BY full_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(options)
}

pub async fn create(pool: &PgPool, form: &CustomerForm, created_by: i64) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO customers \
             (full_name, person_type, document, phone, email, \
              address_street, address_number, address_city, address_state, address_zip, \
              observations, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         RETURNING id",
    )
    .bind(form.full_name.trim())
    .bind(form.person_type.trim())
    .bind(form.document.trim())
    .bind(form.phone.trim())
    .bind(form.email.trim())
    .bind(form.address_street.trim())
    .bind(form.address_number.trim())
    .bind(form.address_city.trim())
    .bind(form.address_state.trim())
    .bind(form.address_zip.trim())
    .bind(form.observations.trim())
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn update(pool: &PgPool, id: i64, form: &CustomerForm) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE customers SET \
             full_name = $1, person_type = $2, document = $3, phone = $4, email = $5, \
             address_street = $6, address_number = $7, address_city = $8, \
             address_state = $9, address_zip = $10, observations = $11, \
             updated_at = now() \
         WHERE id = $12",
    )
    .bind(form.full_name.trim())
    .bind(form.person_type.trim())
    .bind(form.document.trim())
    .bind(form.phone.trim())
    .bind(form.email.trim())
    .bind(form.address_street.trim())
    .bind(form.address_number.trim())
    .bind(form.address_city.trim())
    .bind(form.address_state.trim())
    .bind(form.address_zip.trim())
    .bind(form.observations.trim())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Customers are referenced by appointments and financial records, so
/// there is no hard delete; deactivation hides them from dropdowns.
pub async fn set_active(pool: &PgPool, id: i64, is_active: bool) -> Result<(), AppError> {
    sqlx::query("UPDATE customers SET is_active = $1, updated_at = now() WHERE id = $2")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_active(pool: &PgPool) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers WHERE is_active")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
