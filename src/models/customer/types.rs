use serde::Deserialize;

/// Legal nature of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonType {
    Individual,
    Company,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Individual => "individual",
            PersonType::Company => "company",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonType::Individual => "Individual",
            PersonType::Company => "Company",
        }
    }

    pub fn parse(s: &str) -> Option<PersonType> {
        match s {
            "individual" => Some(PersonType::Individual),
            "company" => Some(PersonType::Company),
            _ => None,
        }
    }
}

/// For the customer list page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerListItem {
    pub id: i64,
    pub full_name: String,
    pub person_type: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub address_city: String,
    pub is_active: bool,
}

/// Full record for the edit form.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerDetail {
    pub id: i64,
    pub full_name: String,
    pub person_type: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub address_street: String,
    pub address_number: String,
    pub address_city: String,
    pub address_state: String,
    pub address_zip: String,
    pub observations: String,
    pub is_active: bool,
}

pub struct CustomerPage {
    pub customers: Vec<CustomerListItem>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Slim option row for dropdowns (appointments, invoices, receivables).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerOption {
    pub id: i64,
    pub full_name: String,
}

/// Form data from create/edit customer forms.
#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub full_name: String,
    pub person_type: String,
    pub document: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address_street: String,
    #[serde(default)]
    pub address_number: String,
    #[serde(default)]
    pub address_city: String,
    #[serde(default)]
    pub address_state: String,
    #[serde(default)]
    pub address_zip: String,
    #[serde(default)]
    pub observations: String,
    pub csrf_token: String,
}
