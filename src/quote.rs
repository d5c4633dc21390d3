// Quote engine: normalize -> allocate -> aggregate, per hotel and offering
//
// The engine is a pure function of the catalog, its configuration, and the
// request. Anything that fails for one offering drops that offering only.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::allocation::{Allocation, AllocationSelector, RoomAssignment};
use crate::catalog::{Catalog, HotelId};
use crate::config::EngineConfig;
use crate::guests::{self, GuestGroup};
use crate::multipliers::MultiplierTable;
use crate::partition::PartitionGenerator;
use crate::rates::{stay_nights, RateTable};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Check-out {checkout} must be after check-in {checkin}")]
    InvalidStayRange {
        checkin: NaiveDate,
        checkout: NaiveDate,
    },

    #[error("{children} children declared but {ages} ages given")]
    ChildAgesMismatch { children: u32, ages: usize },
}

// Wire names are camelCase (`childAges`, `hotelId`); snake_case is accepted too
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default, alias = "child_ages")]
    pub child_ages: Vec<u32>,
    #[serde(default, alias = "hotel_id")]
    pub hotel_id: Option<HotelId>,
}

impl QuoteRequest {
    pub fn stay(&self) -> Result<Stay, QuoteError> {
        Stay::new(parse_date(&self.checkin)?, parse_date(&self.checkout)?)
    }

    pub fn party(&self) -> Result<GuestGroup, QuoteError> {
        if self.children as usize != self.child_ages.len() {
            return Err(QuoteError::ChildAgesMismatch {
                children: self.children,
                ages: self.child_ages.len(),
            });
        }
        Ok(GuestGroup::new(self.adults, self.child_ages.clone()))
    }

    pub fn party_size(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, QuoteError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| QuoteError::InvalidDate(text.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stay {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

impl Stay {
    // A stay is at least one night long
    pub fn new(checkin: NaiveDate, checkout: NaiveDate) -> Result<Self, QuoteError> {
        if checkout <= checkin {
            return Err(QuoteError::InvalidStayRange { checkin, checkout });
        }
        Ok(Self { checkin, checkout })
    }

    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> {
        stay_nights(self.checkin, self.checkout)
    }

    pub fn night_count(&self) -> u32 {
        u32::try_from((self.checkout - self.checkin).num_days()).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offering {
    pub room_type: String,
    pub rate_plan: String,
    pub room_count: usize,
    pub total_factor: Decimal,
    pub nightly_sum: Decimal,
    pub final_price: Decimal,
    pub currency: String,
    pub rooms: Vec<RoomAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelQuote {
    pub hotel_id: HotelId,
    pub hotel_name: String,
    pub location: String,
    pub offerings: Vec<Offering>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResponse {
    pub stay: Stay,
    // The party as requested, before any per-hotel normalization
    pub party: GuestGroup,
    pub hotels: Vec<HotelQuote>,
}

// Nearest whole currency unit, halves away from zero
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// Nightly sum and final price, or None when a night is not covered
pub fn aggregate(
    rates: &RateTable<'_>,
    room_type: &str,
    rate_plan: &str,
    total_factor: Decimal,
    stay: &Stay,
) -> Option<(Decimal, Decimal)> {
    let nightly_sum = rates.nightly_sum(room_type, rate_plan, stay.nights())?;
    Some((nightly_sum, round_price(nightly_sum * total_factor)))
}

pub struct QuoteEngine<'c> {
    catalog: &'c Catalog,
    config: &'c EngineConfig,
}

impl<'c> QuoteEngine<'c> {
    pub fn new(catalog: &'c Catalog, config: &'c EngineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, QuoteError> {
        let stay = request.stay()?;
        let party = request.party()?;

        let hotels = self
            .catalog
            .priced_hotels()
            .into_iter()
            .filter(|(hotel_id, _)| request.hotel_id.map_or(true, |wanted| wanted == *hotel_id))
            .map(|(hotel_id, hotel_name)| self.quote_hotel(hotel_id, hotel_name, &party, &stay))
            .filter(|hotel| !hotel.offerings.is_empty())
            .collect();

        Ok(QuoteResponse {
            stay,
            party,
            hotels,
        })
    }

    fn quote_hotel(
        &self,
        hotel_id: HotelId,
        hotel_name: &str,
        party: &GuestGroup,
        stay: &Stay,
    ) -> HotelQuote {
        let multipliers = MultiplierTable::for_hotel(self.catalog, hotel_id);
        let rates = RateTable::for_hotel(self.catalog, hotel_id);
        let selector =
            AllocationSelector::new(&multipliers, PartitionGenerator::new(self.config.max_rooms));

        let party = guests::normalize(&multipliers, party, self.config.default_child_age_ceiling);

        // The allocation only depends on the room type, not on the rate plan
        let mut allocations: HashMap<&str, Option<Allocation>> = HashMap::new();
        let mut offered: HashSet<(&str, &str)> = HashSet::new();
        let mut offerings = Vec::new();

        for row in rates.rows() {
            let pair = (row.room_type.as_str(), row.rate_plan.as_str());
            if offered.contains(&pair) {
                continue;
            }

            let allocation = allocations
                .entry(row.room_type.as_str())
                .or_insert_with(|| selector.select_best(&row.room_type, &party));
            let Some(allocation) = allocation.as_ref() else {
                debug!(hotel_id, room_type = %row.room_type, "no room split matches the party");
                continue;
            };

            let Some((nightly_sum, final_price)) = aggregate(
                &rates,
                &row.room_type,
                &row.rate_plan,
                allocation.total_factor,
                stay,
            ) else {
                debug!(
                    hotel_id,
                    room_type = %row.room_type,
                    rate_plan = %row.rate_plan,
                    "stay not fully covered by rates"
                );
                continue;
            };

            offered.insert(pair);
            offerings.push(Offering {
                room_type: row.room_type.clone(),
                rate_plan: row.rate_plan.clone(),
                room_count: allocation.room_count(),
                total_factor: allocation.total_factor,
                nightly_sum,
                final_price,
                currency: row.currency.clone(),
                rooms: allocation.rooms.clone(),
            });
        }

        debug!(hotel_id, offerings = offerings.len(), "hotel quoted");

        HotelQuote {
            hotel_id,
            hotel_name: hotel_name.to_string(),
            location: self
                .catalog
                .hotel(hotel_id)
                .map(|h| h.location.clone())
                .unwrap_or_default(),
            offerings,
        }
    }
}
