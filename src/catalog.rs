// Catalog: the three read-only tables every quote is computed against.
// Loaded once at startup (see source.rs) and shared immutably afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

use crate::multipliers::AgeInterval;

pub type HotelId = u32;

// A multiplier row never carries more than this many child age intervals
pub const MAX_CHILDREN_PER_ROW: u32 = 3;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error while fetching {url}: {message}")]
    HttpError { url: String, message: String },

    #[error("JSON parse error in {collection}: {message}")]
    JsonParseError { collection: String, message: String },

    #[error("Invalid rate period for hotel {hotel_id} ({room_type}/{rate_plan}): {start} is after {end}")]
    InvalidRatePeriod {
        hotel_id: HotelId,
        room_type: String,
        rate_plan: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid multiplier row for hotel {hotel_id} ({room_type}): {reason}")]
    InvalidMultiplier {
        hotel_id: HotelId,
        room_type: String,
        reason: String,
    },

    #[error("Duplicate multiplier row for hotel {hotel_id} ({room_type}, {adults} adults, {children} children)")]
    DuplicateMultiplier {
        hotel_id: HotelId,
        room_type: String,
        adults: u32,
        children: u32,
    },
}

// Nightly price of a room type under a rate plan, valid over [period_start, period_end]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateRow {
    pub hotel_id: HotelId,
    pub hotel_name: String,
    pub room_type: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub rate_plan: String,
    pub nightly_price: Decimal,
    pub currency: String,
}

impl RateRow {
    // Both ends inclusive
    pub fn covers(&self, night: NaiveDate) -> bool {
        self.period_start <= night && night <= self.period_end
    }
}

// Pricing factor for one room holding exactly `adults` adults and `children` children
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MultiplierRow {
    pub hotel_id: HotelId,
    pub hotel_name: String,
    pub room_type: String,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default, deserialize_with = "non_blank_intervals")]
    pub child_age_ranges: Vec<AgeInterval>,
    pub factor: Decimal,
}

// Blank or null interval slots do not count towards the row's interval count
fn non_blank_intervals<'de, D>(deserializer: D) -> Result<Vec<AgeInterval>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<String>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .flatten()
        .filter(|text| !text.trim().is_empty())
        .map(AgeInterval::from)
        .collect())
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelInfo {
    pub hotel_id: HotelId,
    pub hotel_name: String,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rates: Vec<RateRow>,
    multipliers: Vec<MultiplierRow>,
    hotels: Vec<HotelInfo>,
}

impl Catalog {
    // Build a catalog, rejecting data that breaks the table invariants
    pub fn new(
        rates: Vec<RateRow>,
        multipliers: Vec<MultiplierRow>,
        hotels: Vec<HotelInfo>,
    ) -> Result<Self, CatalogError> {
        for rate in &rates {
            if rate.period_start > rate.period_end {
                return Err(CatalogError::InvalidRatePeriod {
                    hotel_id: rate.hotel_id,
                    room_type: rate.room_type.clone(),
                    rate_plan: rate.rate_plan.clone(),
                    start: rate.period_start,
                    end: rate.period_end,
                });
            }
        }

        let mut seen = HashSet::new();
        for row in &multipliers {
            validate_multiplier(row)?;

            let key = (
                row.hotel_id,
                row.room_type.as_str(),
                row.adults,
                row.children,
                row.child_age_ranges
                    .iter()
                    .map(AgeInterval::text)
                    .collect::<Vec<_>>(),
            );
            if !seen.insert(key) {
                return Err(CatalogError::DuplicateMultiplier {
                    hotel_id: row.hotel_id,
                    room_type: row.room_type.clone(),
                    adults: row.adults,
                    children: row.children,
                });
            }
        }

        Ok(Self {
            rates,
            multipliers,
            hotels,
        })
    }

    // Parse the three collections from their JSON text
    pub fn from_json(
        rates_json: &str,
        multipliers_json: &str,
        hotels_json: &str,
    ) -> Result<Self, CatalogError> {
        let rates = parse_collection("rates", rates_json)?;
        let multipliers = parse_collection("multipliers", multipliers_json)?;
        let hotels = parse_collection("hotels", hotels_json)?;
        Self::new(rates, multipliers, hotels)
    }

    pub fn rates(&self) -> &[RateRow] {
        &self.rates
    }

    pub fn multipliers(&self) -> &[MultiplierRow] {
        &self.multipliers
    }

    pub fn hotels(&self) -> &[HotelInfo] {
        &self.hotels
    }

    pub fn hotel(&self, hotel_id: HotelId) -> Option<&HotelInfo> {
        self.hotels.iter().find(|h| h.hotel_id == hotel_id)
    }

    // Hotels that have at least one rate row, in order of first appearance
    pub fn priced_hotels(&self) -> Vec<(HotelId, &str)> {
        let mut seen = HashSet::new();
        self.rates
            .iter()
            .filter(|r| seen.insert(r.hotel_id))
            .map(|r| (r.hotel_id, r.hotel_name.as_str()))
            .collect()
    }
}

fn validate_multiplier(row: &MultiplierRow) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidMultiplier {
        hotel_id: row.hotel_id,
        room_type: row.room_type.clone(),
        reason,
    };

    if row.children > MAX_CHILDREN_PER_ROW {
        return Err(invalid(format!(
            "{} children exceeds the maximum of {}",
            row.children, MAX_CHILDREN_PER_ROW
        )));
    }
    if row.child_age_ranges.len() > MAX_CHILDREN_PER_ROW as usize {
        return Err(invalid(format!(
            "{} age intervals exceeds the maximum of {}",
            row.child_age_ranges.len(),
            MAX_CHILDREN_PER_ROW
        )));
    }
    if row.factor <= Decimal::ZERO {
        return Err(invalid(format!("factor {} is not positive", row.factor)));
    }

    // Kept, but such a row can never match a room
    if row.child_age_ranges.len() != row.children as usize {
        warn!(
            hotel_id = row.hotel_id,
            room_type = %row.room_type,
            children = row.children,
            intervals = row.child_age_ranges.len(),
            "multiplier row interval count does not match its child count"
        );
    }
    for interval in row.child_age_ranges.iter().filter(|i| i.bounds().is_none()) {
        warn!(
            hotel_id = row.hotel_id,
            room_type = %row.room_type,
            interval = interval.text(),
            "unparseable child age interval"
        );
    }

    Ok(())
}

fn parse_collection<T>(collection: &str, json: &str) -> Result<Vec<T>, CatalogError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json).map_err(|e| CatalogError::JsonParseError {
        collection: collection.to_string(),
        message: e.to_string(),
    })
}
