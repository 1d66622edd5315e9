use chrono::NaiveDate;

/// `Feb 5, 2024`
#[must_use]
pub fn format_date(value: NaiveDate) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// Value for an `<input type="date">`.
#[must_use]
pub fn date_input_value(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn parse_date_input(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
