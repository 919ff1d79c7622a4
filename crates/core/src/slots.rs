//! Interview time-slot enumeration and lock-key derivation.
//!
//! Slots are a fixed set of half-hour ranges. The composite key derived
//! from a date and a slot is the mutual-exclusion token for the booking
//! transaction: one key, at most one SlotLock row, ever.

use chrono::NaiveDate;

use crate::naming::safe_name;

/// The bookable interview time slots, in display form.
///
/// These strings are the wire values accepted by the booking API and
/// stored verbatim on lock and booking rows.
pub const TIME_SLOTS: &[&str] = &[
    "10:00 AM - 10:30 AM",
    "10:30 AM - 11:00 AM",
    "11:00 AM - 11:30 AM",
    "11:30 AM - 12:00 PM",
    "2:00 PM - 2:30 PM",
    "2:30 PM - 3:00 PM",
    "3:00 PM - 3:30 PM",
    "3:30 PM - 4:00 PM",
];

/// Whether `time_slot` is one of the fixed bookable ranges.
pub fn is_valid_time_slot(time_slot: &str) -> bool {
    TIME_SLOTS.contains(&time_slot)
}

/// Derive the deterministic lock key for a (date, time slot) pair.
///
/// The date renders as ISO `YYYY-MM-DD`; the slot portion is normalized
/// with the same collapsing rule as candidate identifiers so the key is
/// stable regardless of spacing in the display string.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use invigil_core::slots::slot_key;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// assert_eq!(slot_key(date, "10:00 AM - 10:30 AM"), "2025-01-10_10_00_am_10_30_am");
/// ```
pub fn slot_key(date: NaiveDate, time_slot: &str) -> String {
    format!("{}_{}", date.format("%Y-%m-%d"), safe_name(time_slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn all_listed_slots_are_valid() {
        for slot in TIME_SLOTS {
            assert!(is_valid_time_slot(slot), "{slot} should be valid");
        }
    }

    #[test]
    fn unknown_slot_is_invalid() {
        assert!(!is_valid_time_slot("9:00 AM - 9:30 AM"));
        assert!(!is_valid_time_slot(""));
        // Near-misses with different spacing are not members.
        assert!(!is_valid_time_slot("10:00 AM-10:30 AM"));
    }

    #[test]
    fn key_is_deterministic() {
        let a = slot_key(date(), "10:00 AM - 10:30 AM");
        let b = slot_key(date(), "10:00 AM - 10:30 AM");
        assert_eq!(a, b);
    }

    #[test]
    fn key_distinguishes_slots_and_dates() {
        let k1 = slot_key(date(), "10:00 AM - 10:30 AM");
        let k2 = slot_key(date(), "10:30 AM - 11:00 AM");
        let k3 = slot_key(
            NaiveDate::from_ymd_opt(2025, 1, 11).unwrap(),
            "10:00 AM - 10:30 AM",
        );
        assert_ne!(k1, k2);
        assert_ne!(k1, k3);
    }

    #[test]
    fn key_shape() {
        assert_eq!(
            slot_key(date(), "2:00 PM - 2:30 PM"),
            "2025-01-10_2_00_pm_2_30_pm"
        );
    }
}
