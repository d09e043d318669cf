//! Visit date rules and Brazilian date formatting

use chrono::{Datelike, Months, NaiveDate, Weekday};

pub const DATE_REQUIRED: &str = "Por favor, selecione uma data.";
pub const DATE_NOT_FUTURE: &str = "Por favor, selecione uma data futura.";
pub const DATE_CLOSED_DAY: &str =
    "O museu está fechado às segundas-feiras. Por favor, escolha outro dia.";

/// Day the museum does not open.
pub const CLOSED_WEEKDAY: Weekday = Weekday::Mon;

/// Parses the `YYYY-MM-DD` value a date input submits.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Blackout rule: the museum is closed on Mondays.
pub fn is_closed_day(date: NaiveDate) -> bool {
    date.weekday() == CLOSED_WEEKDAY
}

/// Formats an ISO date as `DD/MM/YYYY`; input that does not parse is returned as-is.
pub fn format_date_br(iso: &str) -> String {
    match parse_iso_date(iso) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => iso.to_string(),
    }
}

/// Earliest and latest selectable visit dates: tomorrow through `months` ahead.
pub fn visit_date_bounds(today: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let min = today.succ_opt().unwrap_or(today);
    let max = today.checked_add_months(Months::new(months)).unwrap_or(min);
    (min, max)
}

/// Visit date rule: present, strictly after `today`, and not a closed day.
pub fn validate_visit_date(value: &str, today: NaiveDate) -> Result<(), String> {
    if value.is_empty() {
        return Err(DATE_REQUIRED.to_string());
    }

    let date = parse_iso_date(value).ok_or_else(|| DATE_REQUIRED.to_string())?;

    if date <= today {
        return Err(DATE_NOT_FUTURE.to_string());
    }
    if is_closed_day(date) {
        return Err(DATE_CLOSED_DAY.to_string());
    }

    Ok(())
}
