// Allocation selector: the room split a party is priced with, per room type

use rust_decimal::Decimal;
use serde::Serialize;

use crate::guests::GuestGroup;
use crate::multipliers::MultiplierTable;
use crate::partition::PartitionGenerator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAssignment {
    pub guests: GuestGroup,
    pub factor: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub rooms: Vec<RoomAssignment>,
    pub total_factor: Decimal,
}

impl Allocation {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

pub struct AllocationSelector<'a> {
    table: &'a MultiplierTable<'a>,
    generator: PartitionGenerator,
}

impl<'a> AllocationSelector<'a> {
    pub fn new(table: &'a MultiplierTable<'a>, generator: PartitionGenerator) -> Self {
        Self { table, generator }
    }

    /// Pick the allocation for `party` in `room_type`.
    ///
    /// If the whole party fits one room, that room is the answer even when a
    /// split would be cheaper. Otherwise the fully matching partition with the
    /// lowest summed factor wins; on a tie the first one enumerated is kept.
    pub fn select_best(&self, room_type: &str, party: &GuestGroup) -> Option<Allocation> {
        if let Some(factor) = self.table.find_factor(room_type, party) {
            return Some(Allocation {
                rooms: vec![RoomAssignment {
                    guests: party.clone(),
                    factor,
                }],
                total_factor: factor,
            });
        }

        let mut best: Option<Allocation> = None;
        for partition in self.generator.enumerate(party) {
            let Some(candidate) = self.price_partition(room_type, partition) else {
                continue;
            };
            if best
                .as_ref()
                .map_or(true, |b| candidate.total_factor < b.total_factor)
            {
                best = Some(candidate);
            }
        }

        best
    }

    // Every room has to match on its own, or the partition is worthless
    fn price_partition(&self, room_type: &str, partition: Vec<GuestGroup>) -> Option<Allocation> {
        let mut rooms = Vec::with_capacity(partition.len());
        let mut total_factor = Decimal::ZERO;

        for guests in partition {
            let factor = self.table.find_factor(room_type, &guests)?;
            total_factor += factor;
            rooms.push(RoomAssignment { guests, factor });
        }

        Some(Allocation {
            rooms,
            total_factor,
        })
    }
}
