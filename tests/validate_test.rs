use poolcare::auth::validate::{
    parse_amount_cents, parse_date, validate_email, validate_minutes, validate_optional,
    validate_password, validate_required,
};

#[test]
fn test_validate_email() {
    assert!(validate_email("tech@poolcare.local").is_none());
    assert!(validate_email("  padded@example.com  ").is_none());

    assert!(validate_email("").is_some());
    assert!(validate_email("no-at-sign.com").is_some());
    assert!(validate_email("nodot@domain").is_some());
    assert!(validate_email(&format!("{}@x.com", "a".repeat(260))).is_some());
}

#[test]
fn test_validate_password() {
    assert!(validate_password("longenough").is_none());
    assert!(validate_password("").is_some());
    assert!(validate_password("short").is_some());
}

#[test]
fn test_validate_required_and_optional() {
    assert!(validate_required("Acme Pools", "Name", 50).is_none());
    assert!(validate_required("   ", "Name", 50).is_some());
    assert!(validate_required(&"x".repeat(51), "Name", 50).is_some());

    assert!(validate_optional("", "Notes", 10).is_none());
    assert!(validate_optional("short", "Notes", 10).is_none());
    assert!(validate_optional(&"x".repeat(11), "Notes", 10).is_some());
}

#[test]
fn test_parse_amount_cents() {
    assert_eq!(parse_amount_cents("0"), Ok(0));
    assert_eq!(parse_amount_cents("150"), Ok(15000));
    assert_eq!(parse_amount_cents("1234.56"), Ok(123456));
    assert_eq!(parse_amount_cents("19.9"), Ok(1990));
    assert_eq!(parse_amount_cents(" 42.00 "), Ok(4200));

    assert!(parse_amount_cents("").is_err());
    assert!(parse_amount_cents("-5").is_err());
    assert!(parse_amount_cents("1.234").is_err());
    assert!(parse_amount_cents("abc").is_err());
    assert!(parse_amount_cents("12,50").is_err());
}

#[test]
fn test_parse_date() {
    let date = parse_date("2026-08-07", "Due date").unwrap();
    assert_eq!(date.to_string(), "2026-08-07");

    assert!(parse_date("07/08/2026", "Due date").is_err());
    assert!(parse_date("2026-13-01", "Due date").is_err());
    assert!(parse_date("", "Due date").is_err());
}

#[test]
fn test_validate_minutes() {
    assert!(validate_minutes(30, "Estimate").is_none());
    assert!(validate_minutes(1440, "Estimate").is_none());

    assert!(validate_minutes(0, "Estimate").is_some());
    assert!(validate_minutes(-10, "Estimate").is_some());
    assert!(validate_minutes(1441, "Estimate").is_some());
}
