// Guest groups and the per-hotel child age normalization

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::multipliers::MultiplierTable;

/// A party, or one room's share of it. The child count is always the length
/// of `child_ages`, which keeps the two from drifting apart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct GuestGroup {
    pub adults: u32,
    pub child_ages: Vec<u32>,
}

impl GuestGroup {
    pub fn new(adults: u32, child_ages: Vec<u32>) -> Self {
        Self { adults, child_ages }
    }

    pub fn children(&self) -> u32 {
        self.child_ages.len() as u32
    }

    pub fn total_guests(&self) -> u32 {
        self.adults + self.children()
    }
}

// Move every child older than `ceiling` to the adults, keeping the order of the rest
pub fn reclassify(party: &GuestGroup, ceiling: Decimal) -> GuestGroup {
    let (too_old, children): (Vec<u32>, Vec<u32>) = party
        .child_ages
        .iter()
        .copied()
        .partition(|&age| Decimal::from(age) > ceiling);

    GuestGroup {
        adults: party.adults + too_old.len() as u32,
        child_ages: children,
    }
}

/// Adjust the party to what the hotel counts as children.
///
/// The ceiling is the highest child age any of the hotel's multiplier rows
/// accepts, or `default_ceiling` when the hotel defines no age intervals.
pub fn normalize(
    table: &MultiplierTable<'_>,
    party: &GuestGroup,
    default_ceiling: Decimal,
) -> GuestGroup {
    let ceiling = table.child_age_ceiling().unwrap_or(default_ceiling);
    let normalized = reclassify(party, ceiling);

    if normalized != *party {
        tracing::debug!(
            hotel_id = table.hotel_id(),
            %ceiling,
            adults = normalized.adults,
            children = normalized.children(),
            "reclassified children above the age ceiling as adults"
        );
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::*;
    use crate::catalog::Catalog;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(2, vec![5, 14], dec!(11), 3, vec![5]; "#1 one child over the ceiling")]
    #[test_case(2, vec![14, 3, 15, 8], dec!(11), 4, vec![3, 8]; "#2 order of remaining children kept")]
    #[test_case(1, vec![11], dec!(11), 1, vec![11]; "#3 age equal to ceiling stays a child")]
    #[test_case(1, vec![7], dec!(6.99), 2, vec![]; "#4 fractional ceiling")]
    #[test_case(0, vec![], dec!(11), 0, vec![]; "#5 empty party")]
    fn test_reclassify(
        adults: u32,
        ages: Vec<u32>,
        ceiling: Decimal,
        expected_adults: u32,
        expected_ages: Vec<u32>,
    ) {
        let result = reclassify(&GuestGroup::new(adults, ages), ceiling);
        assert_eq!(result, GuestGroup::new(expected_adults, expected_ages));
    }

    #[test]
    fn test_normalize_uses_hotel_ceiling() {
        let catalog = Catalog::new(
            vec![],
            vec![
                multiplier(1, "Standard", 2, &["0-6"], dec!(1.1)),
                multiplier(1, "Standard", 2, &["0-6", "7-12,99"], dec!(1.2)),
            ],
            vec![],
        )
        .unwrap();
        let table = MultiplierTable::for_hotel(&catalog, 1);

        let party = GuestGroup::new(2, vec![12, 13]);
        assert_eq!(
            normalize(&table, &party, dec!(11)),
            GuestGroup::new(3, vec![12])
        );
    }

    #[test]
    fn test_normalize_falls_back_to_default_ceiling() {
        let catalog = Catalog::new(
            vec![],
            vec![multiplier(1, "Standard", 2, &[], dec!(1.0))],
            vec![],
        )
        .unwrap();
        let table = MultiplierTable::for_hotel(&catalog, 1);

        let party = GuestGroup::new(2, vec![14]);
        assert_eq!(normalize(&table, &party, dec!(11)), GuestGroup::new(3, vec![]));
        assert_eq!(normalize(&table, &party, dec!(17)), party);
    }
}
