// Multiplier table: per-room pricing factors keyed by room composition and child ages

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::{Catalog, HotelId, MultiplierRow};
use crate::guests::GuestGroup;

/// Closed child-age range `[min, max]`, written as `"min-max"`.
///
/// Bounds accept either `,` or `.` as decimal separator, so `"0-6,99"` is
/// `[0, 6.99]`. Text that does not parse is kept so the row can still be
/// reported, but such an interval contains no age. A parseable upper bound
/// still counts towards the hotel's child age ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct AgeInterval {
    text: String,
    bounds: Option<(Decimal, Decimal)>,
    upper: Option<Decimal>,
}

impl AgeInterval {
    pub fn parse(text: &str) -> Self {
        let (lower, upper) = match text.split_once('-') {
            Some((min, max)) => (parse_bound(min), parse_bound(max)),
            None => (None, None),
        };

        Self {
            text: text.to_string(),
            bounds: lower.zip(upper),
            upper,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bounds(&self) -> Option<(Decimal, Decimal)> {
        self.bounds
    }

    pub fn upper(&self) -> Option<Decimal> {
        self.upper
    }

    pub fn contains(&self, age: Decimal) -> bool {
        self.bounds
            .map_or(false, |(min, max)| min <= age && age <= max)
    }
}

fn parse_bound(text: &str) -> Option<Decimal> {
    Decimal::from_str(&text.trim().replace(',', ".")).ok()
}

impl From<String> for AgeInterval {
    fn from(text: String) -> Self {
        AgeInterval::parse(&text)
    }
}

impl From<AgeInterval> for String {
    fn from(interval: AgeInterval) -> Self {
        interval.text
    }
}

impl MultiplierRow {
    // Exact match on composition; interval i constrains the i-th child of the room
    pub fn matches(&self, room_type: &str, room: &GuestGroup) -> bool {
        if self.room_type != room_type
            || self.adults != room.adults
            || self.children != room.children()
        {
            return false;
        }
        if self.child_age_ranges.len() != room.child_ages.len() {
            return false;
        }

        room.child_ages
            .iter()
            .zip(&self.child_age_ranges)
            .all(|(&age, interval)| interval.contains(Decimal::from(age)))
    }
}

// The multiplier rows of a single hotel
#[derive(Debug, Clone)]
pub struct MultiplierTable<'c> {
    hotel_id: HotelId,
    rows: Vec<&'c MultiplierRow>,
}

impl<'c> MultiplierTable<'c> {
    pub fn for_hotel(catalog: &'c Catalog, hotel_id: HotelId) -> Self {
        Self {
            hotel_id,
            rows: catalog
                .multipliers()
                .iter()
                .filter(|row| row.hotel_id == hotel_id)
                .collect(),
        }
    }

    pub fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Factor of the first row matching this room exactly, if any.
    ///
    /// A room without an adult never has a factor, whatever the catalog says.
    pub fn find_factor(&self, room_type: &str, room: &GuestGroup) -> Option<Decimal> {
        if room.adults == 0 {
            return None;
        }

        self.rows
            .iter()
            .find(|row| row.matches(room_type, room))
            .map(|row| row.factor)
    }

    /// Highest parseable upper bound over all child age intervals of the hotel.
    pub fn child_age_ceiling(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .flat_map(|row| row.child_age_ranges.iter())
            .filter_map(AgeInterval::upper)
            .max()
    }
}
