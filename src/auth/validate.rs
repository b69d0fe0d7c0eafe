use chrono::NaiveDate;

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Validate a password: min 8 chars on create.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.len() < 8 {
        return Some("Password must be at least 8 characters".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Parse a decimal money string ("1234.56") into integer cents.
/// Accepts at most two fraction digits; rejects negatives.
pub fn parse_amount_cents(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Amount is required".to_string());
    }
    if trimmed.starts_with('-') {
        return Err("Amount must not be negative".to_string());
    }
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if frac.len() > 2 {
        return Err("Amount has too many decimal places".to_string());
    }
    let whole: i64 = whole
        .parse()
        .map_err(|_| "Amount must be a number".to_string())?;
    let frac: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<2}");
        padded
            .parse()
            .map_err(|_| "Amount must be a number".to_string())?
    };
    Ok(whole * 100 + frac)
}

/// Parse a form date field (YYYY-MM-DD).
pub fn parse_date(value: &str, field_name: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{field_name} must be a date (YYYY-MM-DD)"))
}

/// Validate a positive minutes figure (task estimates, durations).
pub fn validate_minutes(value: i64, field_name: &str) -> Option<String> {
    if value <= 0 {
        return Some(format!("{field_name} must be a positive number of minutes"));
    }
    if value > 24 * 60 {
        return Some(format!("{field_name} must be at most one day"));
    }
    None
}
