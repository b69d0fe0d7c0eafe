use poolcare::models::appointment::AppointmentStatus;
use poolcare::models::customer::PersonType;
use poolcare::models::financial::{
    FinancialSummary, InvoiceStatus, PaymentStatus, format_cents, invoice_number,
};
use poolcare::models::task::TaskStatus;

#[test]
fn test_format_cents() {
    assert_eq!(format_cents(0), "0.00");
    assert_eq!(format_cents(5), "0.05");
    assert_eq!(format_cents(150), "1.50");
    assert_eq!(format_cents(123456), "1234.56");
    assert_eq!(format_cents(-2500), "-25.00");
}

#[test]
fn test_invoice_number_format() {
    assert_eq!(invoice_number(2026, 1), "INV-2026-0001");
    assert_eq!(invoice_number(2026, 42), "INV-2026-0042");
    // The sequence widens past four digits rather than wrapping.
    assert_eq!(invoice_number(2026, 12345), "INV-2026-12345");
}

#[test]
fn test_summary_display_figures() {
    let summary = FinancialSummary {
        total_revenue_cents: 1_234_500,
        pending_receivables_cents: 99,
        pending_payables_cents: 0,
        overdue_count: 3,
    };
    assert_eq!(summary.total_revenue(), "12345.00");
    assert_eq!(summary.pending_receivables(), "0.99");
    assert_eq!(summary.pending_payables(), "0.00");
}

// ============================================================================
// Closed status enumerations: exact-match parsing, stable wire strings
// ============================================================================

#[test]
fn test_invoice_status_parse() {
    assert_eq!(InvoiceStatus::parse("pending"), Some(InvoiceStatus::Pending));
    assert_eq!(InvoiceStatus::parse("paid"), Some(InvoiceStatus::Paid));
    assert_eq!(InvoiceStatus::parse("overdue"), Some(InvoiceStatus::Overdue));
    assert_eq!(InvoiceStatus::parse("cancelled"), Some(InvoiceStatus::Cancelled));
    assert_eq!(InvoiceStatus::parse("Paid"), None);
    assert_eq!(InvoiceStatus::parse("partial"), None);
}

#[test]
fn test_payment_status_parse() {
    for status in [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Partial,
        PaymentStatus::Overdue,
    ] {
        assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(PaymentStatus::parse("cancelled"), None);
}

#[test]
fn test_appointment_status_parse() {
    for status in AppointmentStatus::ALL {
        assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(AppointmentStatus::parse("done"), None);
    assert_eq!(AppointmentStatus::parse("Scheduled"), None);
}

#[test]
fn test_task_status_parse() {
    assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
    assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
    assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));
    assert_eq!(TaskStatus::parse("in progress"), None);
    assert_eq!(TaskStatus::parse("COMPLETED"), None);
}

#[test]
fn test_person_type_parse() {
    assert_eq!(PersonType::parse("individual"), Some(PersonType::Individual));
    assert_eq!(PersonType::parse("company"), Some(PersonType::Company));
    assert_eq!(PersonType::parse("corporate"), None);
}
