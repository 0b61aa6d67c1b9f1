//! Fixed weekly coordinate space: 7 days by 14 hours, 98 slots total.

use std::collections::BTreeSet;
use std::fmt;

pub const DAYS: [&str; 7] = ["M", "T", "W", "R", "F", "S", "U"];
pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const HOURS: [&str; 14] = [
    "08", "09", "10", "11", "12", "13", "14", "15", "16", "17", "18", "19", "20", "21",
];
pub const HOUR_LABELS: [&str; 14] = [
    "8am", "9am", "10am", "11am", "12pm", "1pm", "2pm", "3pm", "4pm", "5pm", "6pm", "7pm", "8pm",
    "9pm",
];

pub const DAY_COUNT: usize = DAYS.len();
pub const HOUR_COUNT: usize = HOURS.len();
pub const SLOT_COUNT: usize = DAY_COUNT * HOUR_COUNT;

/// One (day, hour) cell of the weekly grid.
///
/// `day` and `hour` are indices into [`DAYS`] and [`HOURS`]; the wire
/// identity is the 3-character key from [`Slot::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub day: usize,
    pub hour: usize,
}

impl Slot {
    /// Wire key: day letter plus zero-padded hour, e.g. "M08" or "U21".
    pub fn key(&self) -> String {
        format!("{}{}", DAYS[self.day], HOURS[self.hour])
    }

    /// Parse a wire key. Anything outside the 98 valid keys is rejected.
    pub fn parse(key: &str) -> Option<Self> {
        if key.len() != 3 {
            return None;
        }
        let day = DAYS.iter().position(|d| key.starts_with(d))?;
        let hour = HOURS.iter().position(|h| &key[1..] == *h)?;
        Some(Self { day, hour })
    }

    /// All 98 slots, day-major.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..DAY_COUNT).flat_map(|day| (0..HOUR_COUNT).map(move |hour| Slot { day, hour }))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DAYS[self.day], HOURS[self.hour])
    }
}

/// Parse a batch of wire keys into a slot set, dropping anything invalid.
pub fn parse_keys<I, S>(keys: I) -> BTreeSet<Slot>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut slots = BTreeSet::new();
    for key in keys {
        match Slot::parse(key.as_ref()) {
            Some(slot) => {
                slots.insert(slot);
            }
            None => {
                log::warn!("Ignoring invalid slot key {:?}", key.as_ref());
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for slot in Slot::all() {
            let key = slot.key();
            assert_eq!(key.len(), 3);
            assert_eq!(Slot::parse(&key), Some(slot));
        }
    }

    #[test]
    fn test_slot_count_is_98() {
        assert_eq!(Slot::all().count(), SLOT_COUNT);
        assert_eq!(SLOT_COUNT, 98);
    }

    #[test]
    fn test_parse_rejects_invalid_keys() {
        for key in ["", "M", "M8", "M22", "M07", "X08", "m08", "M088", "€"] {
            assert_eq!(Slot::parse(key), None, "{:?} should be invalid", key);
        }
    }

    #[test]
    fn test_parse_corners() {
        assert_eq!(Slot::parse("M08"), Some(Slot { day: 0, hour: 0 }));
        assert_eq!(Slot::parse("U21"), Some(Slot { day: 6, hour: 13 }));
    }

    #[test]
    fn test_parse_keys_drops_garbage() {
        let slots = parse_keys(["M08", "bogus", "T12", "Z99"]);
        assert_eq!(slots.len(), 2);
        assert!(slots.contains(&Slot::parse("M08").unwrap()));
        assert!(slots.contains(&Slot::parse("T12").unwrap()));
    }
}
