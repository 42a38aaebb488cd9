//! Fixed reference data for the facility: 14 physical slots, the
//! selectable rental years and the full English month names.

pub const TOTAL_SLOTS: usize = 14;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The 14 slot identifiers, "SLOT-01" through "SLOT-14".
pub fn slot_numbers() -> Vec<String> {
    (1..=TOTAL_SLOTS).map(|i| format!("SLOT-{i:02}")).collect()
}

/// Selectable rental years, "2020" through "2030".
pub fn years() -> Vec<String> {
    (2020..=2030).map(|y| y.to_string()).collect()
}

pub fn is_valid_slot(slot: &str) -> bool {
    slot_numbers().iter().any(|s| s == slot)
}

pub fn is_valid_year(year: &str) -> bool {
    years().iter().any(|y| y == year)
}

pub fn is_valid_month(month: &str) -> bool {
    MONTHS.contains(&month)
}

/// Chronological position of a month name, used to order report rows.
pub fn month_index(month: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == month)
}
