// Wire shapes of a quote: the flat key/value map the booking page reads, and
// an XML rendition for B2B consumers. Both are derived from QuoteResponse.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::guests::GuestGroup;
use crate::quote::{round_price, HotelQuote, Offering, QuoteResponse};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("XML serialization error: {0}")]
    XmlError(String),
}

const MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Pazartesi",
        Weekday::Tue => "Salı",
        Weekday::Wed => "Çarşamba",
        Weekday::Thu => "Perşembe",
        Weekday::Fri => "Cuma",
        Weekday::Sat => "Cumartesi",
        Weekday::Sun => "Pazar",
    }
}

// "1 Temmuz Salı"
pub fn date_label(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        weekday_name(date.weekday())
    )
}

// "3 Gece 4 Gün"
pub fn nights_and_days_label(nights: u32) -> String {
    format!("{} Gece {} Gün", nights, nights + 1)
}

// "2 Yetişkin 1 Çocuk (5 Yaş)"
pub fn party_label(party: &GuestGroup) -> String {
    let mut label = format!("{} Yetişkin", party.adults);
    if party.children() > 0 {
        let ages: Vec<String> = party.child_ages.iter().map(u32::to_string).collect();
        label.push_str(&format!(" {} Çocuk ({} Yaş)", party.children(), ages.join(", ")));
    }
    label
}

// Whole units with `.` thousands separators and the currency as suffix: "12.345 TL"
pub fn price_label(amount: Decimal, currency: &str) -> String {
    let whole = round_price(amount).to_i128().unwrap_or_default();
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if whole < 0 { "-" } else { "" };
    format!("{}{} {}", sign, grouped, currency)
}

// a, b, ..., z, aa, ab, ...
pub fn offering_suffix(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Flatten a quote into the `hotelName_1`, `finalPrice_1_a`, ... key scheme.
///
/// Hotels are numbered from 1 in response order and offerings lettered in
/// discovery order. A `BTreeMap` keeps the serialized output stable.
pub fn flatten(response: &QuoteResponse) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    fields.insert("checkin".to_string(), date_label(response.stay.checkin));
    fields.insert("checkout".to_string(), date_label(response.stay.checkout));
    fields.insert(
        "nightsAndDays".to_string(),
        nights_and_days_label(response.stay.night_count()),
    );
    fields.insert("guests".to_string(), party_label(&response.party));

    for (hotel_index, hotel) in response.hotels.iter().enumerate() {
        let n = hotel_index + 1;
        fields.insert(format!("hotelName_{}", n), hotel.hotel_name.clone());
        fields.insert(format!("location_{}", n), hotel.location.clone());

        for (offering_index, offering) in hotel.offerings.iter().enumerate() {
            let suffix = offering_suffix(offering_index);
            fields.insert(
                format!("roomTypeAndCount_{}_{}", n, suffix),
                format!("{} {}", offering.room_count, offering.room_type),
            );
            fields.insert(format!("ratePlan_{}_{}", n, suffix), offering.rate_plan.clone());
            fields.insert(
                format!("finalPrice_{}_{}", n, suffix),
                price_label(offering.final_price, &offering.currency),
            );
        }
    }

    fields
}

// Structures for XML serialization
#[derive(Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
#[serde(rename = "QuoteRS")]
pub struct XmlQuoteResponse {
    pub stay: XmlStay,
    pub hotels: XmlHotels,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct XmlStay {
    #[serde(rename = "@checkin")]
    pub checkin: String,
    #[serde(rename = "@checkout")]
    pub checkout: String,
    #[serde(rename = "@nights")]
    pub nights: u32,
    #[serde(rename = "@adults")]
    pub adults: u32,
    #[serde(rename = "@childAges")]
    pub child_ages: String,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlHotels {
    #[serde(rename = "Hotel")]
    pub hotels: Vec<XmlHotel>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlHotel {
    #[serde(rename = "@id")]
    pub hotel_id: u32,
    #[serde(rename = "@name")]
    pub hotel_name: String,
    #[serde(rename = "@location")]
    pub location: String,
    pub offerings: XmlOfferings,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlOfferings {
    #[serde(rename = "Offering")]
    pub offerings: Vec<XmlOffering>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct XmlOffering {
    #[serde(rename = "@roomType")]
    pub room_type: String,
    #[serde(rename = "@ratePlan")]
    pub rate_plan: String,
    #[serde(rename = "@rooms")]
    pub rooms: usize,
    #[serde(rename = "@factor")]
    pub factor: String,
    #[serde(rename = "@price")]
    pub price: String,
    #[serde(rename = "@currency")]
    pub currency: String,
}

impl From<&Offering> for XmlOffering {
    fn from(offering: &Offering) -> Self {
        XmlOffering {
            room_type: offering.room_type.clone(),
            rate_plan: offering.rate_plan.clone(),
            rooms: offering.room_count,
            factor: offering.total_factor.normalize().to_string(),
            price: offering.final_price.normalize().to_string(),
            currency: offering.currency.clone(),
        }
    }
}

impl From<&HotelQuote> for XmlHotel {
    fn from(hotel: &HotelQuote) -> Self {
        XmlHotel {
            hotel_id: hotel.hotel_id,
            hotel_name: hotel.hotel_name.clone(),
            location: hotel.location.clone(),
            offerings: XmlOfferings {
                offerings: hotel.offerings.iter().map(XmlOffering::from).collect(),
            },
        }
    }
}

impl From<&QuoteResponse> for XmlQuoteResponse {
    fn from(response: &QuoteResponse) -> Self {
        let child_ages: Vec<String> = response
            .party
            .child_ages
            .iter()
            .map(u32::to_string)
            .collect();

        XmlQuoteResponse {
            stay: XmlStay {
                checkin: response.stay.checkin.format("%Y-%m-%d").to_string(),
                checkout: response.stay.checkout.format("%Y-%m-%d").to_string(),
                nights: response.stay.night_count(),
                adults: response.party.adults,
                child_ages: child_ages.join(","),
            },
            hotels: XmlHotels {
                hotels: response.hotels.iter().map(XmlHotel::from).collect(),
            },
        }
    }
}

pub fn to_xml(response: &QuoteResponse) -> Result<String, RenderError> {
    let xml_response = XmlQuoteResponse::from(response);
    quick_xml::se::to_string(&xml_response).map_err(|e| RenderError::XmlError(e.to_string()))
}
