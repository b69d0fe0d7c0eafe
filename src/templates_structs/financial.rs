use askama::Template;

use super::PageContext;
use crate::models::customer::CustomerOption;
use crate::models::financial::{
    FinancialSummary, InvoiceListItem, PayableListItem, ReceivableListItem,
};

#[derive(Template)]
#[template(path = "financial/index.html")]
pub struct FinancialTemplate {
    pub ctx: PageContext,
    pub summary: FinancialSummary,
    pub invoices: Vec<InvoiceListItem>,
    pub payables: Vec<PayableListItem>,
    pub receivables: Vec<ReceivableListItem>,
    pub tab: String,
}

#[derive(Template)]
#[template(path = "financial/invoice_form.html")]
pub struct InvoiceFormTemplate {
    pub ctx: PageContext,
    pub customers: Vec<CustomerOption>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "financial/payable_form.html")]
pub struct PayableFormTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "financial/receivable_form.html")]
pub struct ReceivableFormTemplate {
    pub ctx: PageContext,
    pub customers: Vec<CustomerOption>,
    pub errors: Vec<String>,
}
