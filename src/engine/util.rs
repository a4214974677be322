use chrono::{Datelike, NaiveDate};

/// Conversion unique weekday → day_index (0=lundi..6=dimanche).
/// Seule fonction autorisée pour cette normalisation (résolveur et compilateur).
pub fn day_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Énumère les dates de `[start, end]` inclus, dans l'ordre.
pub(crate) fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        out.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    out
}
