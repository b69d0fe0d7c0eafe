use serde::Deserialize;

/// Invoice lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<InvoiceStatus> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

/// Payment states for payables and receivables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Partial,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Overdue => "overdue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Overdue => "Overdue",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "partial" => Some(PaymentStatus::Partial),
            "overdue" => Some(PaymentStatus::Overdue),
            _ => None,
        }
    }
}

/// Render integer cents as a plain decimal figure ("1234.56"); the
/// currency symbol belongs to the templates.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Sequential per-year invoice numbers: `INV-<year>-<seq>`.
pub fn invoice_number(year: i32, seq: i64) -> String {
    format!("INV-{year}-{seq:04}")
}

#[derive(Debug, Clone)]
pub struct InvoiceListItem {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub description: String,
    pub amount: String,
    pub issue_date: String,
    pub due_date: String,
    pub status: String,
    pub status_label: String,
    pub is_overdue: bool,
}

#[derive(Debug, Clone)]
pub struct PayableListItem {
    pub id: i64,
    pub supplier_name: String,
    pub description: String,
    pub category: String,
    pub document_number: String,
    pub amount: String,
    pub due_date: String,
    pub status: String,
    pub status_label: String,
    pub is_overdue: bool,
}

#[derive(Debug, Clone)]
pub struct ReceivableListItem {
    pub id: i64,
    pub customer_name: String,
    pub description: String,
    pub amount: String,
    pub due_date: String,
    pub status: String,
    pub status_label: String,
    pub is_overdue: bool,
}

/// KPI header for the financial screen.
#[derive(Debug, Clone, Default)]
pub struct FinancialSummary {
    pub total_revenue_cents: i64,
    pub pending_receivables_cents: i64,
    pub pending_payables_cents: i64,
    pub overdue_count: i64,
}

impl FinancialSummary {
    pub fn total_revenue(&self) -> String {
        format_cents(self.total_revenue_cents)
    }

    pub fn pending_receivables(&self) -> String {
        format_cents(self.pending_receivables_cents)
    }

    pub fn pending_payables(&self) -> String {
        format_cents(self.pending_payables_cents)
    }
}

#[derive(Debug, Deserialize)]
pub struct InvoiceForm {
    pub customer_id: i64,
    #[serde(default)]
    pub appointment_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    pub amount: String,
    pub due_date: String,
    #[serde(default)]
    pub payment_method: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PayableForm {
    pub supplier_name: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub document_number: String,
    pub amount: String,
    pub due_date: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ReceivableForm {
    pub customer_id: i64,
    #[serde(default)]
    pub invoice_id: Option<i64>,
    pub description: String,
    pub amount: String,
    pub due_date: String,
    pub csrf_token: String,
}
