// Partition generator: every way to split a party across rooms
//
// Each room takes at least one adult and a contiguous run of the remaining
// child ages, so concatenating the rooms' ages gives back the party's ages.

use crate::guests::GuestGroup;

pub type Partition = Vec<GuestGroup>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionGenerator {
    max_rooms: Option<usize>,
}

impl PartitionGenerator {
    // `None` explores every room count; a cap of zero is treated as no cap
    pub fn new(max_rooms: Option<usize>) -> Self {
        Self {
            max_rooms: max_rooms.filter(|&cap| cap > 0),
        }
    }

    pub fn max_rooms(&self) -> Option<usize> {
        self.max_rooms
    }

    /// All partitions of `party`, in backtracking order: the first room takes
    /// 1..=adults adults and 0..=children children, the rest is split
    /// recursively. A party without adults has no partition.
    pub fn enumerate(&self, party: &GuestGroup) -> Vec<Partition> {
        let mut partitions = Vec::new();
        if party.adults == 0 {
            return partitions;
        }

        let mut rooms = Vec::new();
        self.backtrack(&mut rooms, party.adults, &party.child_ages, &mut partitions);
        partitions
    }

    fn backtrack(
        &self,
        rooms: &mut Vec<GuestGroup>,
        adults: u32,
        ages: &[u32],
        partitions: &mut Vec<Partition>,
    ) {
        if adults == 0 && ages.is_empty() {
            partitions.push(rooms.clone());
            return;
        }

        // Under a cap the last permitted room has to take everyone left
        let last_room = self.max_rooms.map_or(false, |cap| rooms.len() + 1 >= cap);

        for room_adults in 1..=adults {
            for room_children in 0..=ages.len() {
                if last_room && (room_adults < adults || room_children < ages.len()) {
                    continue;
                }

                let (taken, rest) = ages.split_at(room_children);
                rooms.push(GuestGroup::new(room_adults, taken.to_vec()));
                self.backtrack(rooms, adults - room_adults, rest, partitions);
                rooms.pop();
            }
        }
    }
}
