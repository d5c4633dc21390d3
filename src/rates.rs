// Rate table: nightly prices of a single hotel

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::catalog::{Catalog, HotelId, RateRow};

// Nights of a stay: check-in inclusive, check-out exclusive, walked lazily
pub fn stay_nights(checkin: NaiveDate, checkout: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    checkin.iter_days().take_while(move |night| *night < checkout)
}

#[derive(Debug, Clone)]
pub struct RateTable<'c> {
    rows: Vec<&'c RateRow>,
}

impl<'c> RateTable<'c> {
    pub fn for_hotel(catalog: &'c Catalog, hotel_id: HotelId) -> Self {
        Self {
            rows: catalog
                .rates()
                .iter()
                .filter(|row| row.hotel_id == hotel_id)
                .collect(),
        }
    }

    // Rows in catalog order; each one is a candidate (room type, rate plan) offering
    pub fn rows(&self) -> impl Iterator<Item = &'c RateRow> + '_ {
        self.rows.iter().copied()
    }

    pub fn covering_row(
        &self,
        room_type: &str,
        rate_plan: &str,
        night: NaiveDate,
    ) -> Option<&'c RateRow> {
        self.rows
            .iter()
            .copied()
            .find(|row| row.room_type == room_type && row.rate_plan == rate_plan && row.covers(night))
    }

    /// Sum of the nightly prices over `nights`, or `None` as soon as one night
    /// has no covering row. Partial sums are never returned.
    pub fn nightly_sum<I>(&self, room_type: &str, rate_plan: &str, nights: I) -> Option<Decimal>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        nights.into_iter().try_fold(Decimal::ZERO, |sum, night| {
            let row = self.covering_row(room_type, rate_plan, night)?;
            Some(sum + row.nightly_price)
        })
    }
}
