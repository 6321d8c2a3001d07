//! Car-pool seat assignment (配車)
//!
//! Partitions attending participants across parent-driver vehicles:
//! children ride with their own parent when that parent is driving,
//! grades are kept together where possible, and a car is not left with
//! a single passenger while another carries three or more.

use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::domain::model::{Driver, Participant};

/// Assignment tuning knobs
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentOptions {
    /// Cap on the number of vehicles; drivers beyond the cap (by
    /// descending capacity) are excluded, except parents of attending
    /// participants, who are always kept
    pub max_vehicles: Option<usize>,
    /// Shuffle seed for reproducible assignments; random when None
    pub seed: Option<u64>,
}

/// One vehicle's passenger list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleAssignment {
    pub driver: Driver,
    pub passengers: Vec<Participant>,
}

impl VehicleAssignment {
    fn free_seats(&self) -> u32 {
        self.driver.capacity.saturating_sub(self.passengers.len() as u32)
    }
}

/// Complete assignment result. Participants left over when every seat
/// is taken are reported, never dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub vehicles: Vec<VehicleAssignment>,
    pub unassigned: Vec<Participant>,
}

impl SeatAssignment {
    pub fn assigned_count(&self) -> usize {
        self.vehicles.iter().map(|v| v.passengers.len()).sum()
    }
}

struct Vehicle {
    driver: Driver,
    passengers: Vec<Participant>,
    preferred_grade: Option<u32>,
}

impl Vehicle {
    fn free_seats(&self) -> u32 {
        self.driver.capacity.saturating_sub(self.passengers.len() as u32)
    }
}

/// Assign participants to drivers' vehicles.
pub fn assign_seats(
    participants: &[Participant],
    drivers: &[Driver],
    options: &AssignmentOptions,
) -> SeatAssignment {
    let mut vehicles: Vec<Vehicle> = select_drivers(participants, drivers, options.max_vehicles)
        .into_iter()
        .map(|driver| Vehicle {
            driver,
            passengers: Vec::new(),
            preferred_grade: None,
        })
        .collect();

    let mut queue = grade_ordered_queue(participants, options.seed);

    // Parent pre-assignment. The first child seated records the
    // vehicle's preferred grade.
    let mut parent_linked: HashSet<String> = HashSet::new();
    let mut remaining = Vec::with_capacity(queue.len());
    for participant in queue {
        let vehicle = participant.assigned_parent.as_ref().and_then(|parent| {
            vehicles
                .iter_mut()
                .find(|v| &v.driver.name == parent && v.free_seats() > 0)
        });
        match vehicle {
            Some(v) => {
                if v.preferred_grade.is_none() {
                    v.preferred_grade = Some(participant.grade);
                }
                parent_linked.insert(participant.name.clone());
                v.passengers.push(participant);
            }
            None => remaining.push(participant),
        }
    }
    queue = remaining;

    // Capacity-aware round robin: always fill the emptiest vehicle,
    // honouring its preferred grade when a match is still queued.
    while !queue.is_empty() {
        let Some(idx) = vehicles
            .iter()
            .enumerate()
            .filter(|(_, v)| v.free_seats() > 0)
            .max_by_key(|(_, v)| v.free_seats())
            .map(|(i, _)| i)
        else {
            break;
        };
        let pick = vehicles[idx]
            .preferred_grade
            .and_then(|grade| queue.iter().position(|p| p.grade == grade))
            .unwrap_or(0);
        let participant = queue.remove(pick);
        vehicles[idx].passengers.push(participant);
    }

    rebalance_singletons(&mut vehicles, &parent_linked);

    SeatAssignment {
        vehicles: vehicles
            .into_iter()
            .filter(|v| !v.passengers.is_empty())
            .map(|v| VehicleAssignment {
                driver: v.driver,
                passengers: v.passengers,
            })
            .collect(),
        unassigned: queue,
    }
}

/// Sort drivers by capacity descending and truncate to the vehicle
/// cap. A truncated driver whose child is attending is added back:
/// parent-child pairing outranks the cap.
fn select_drivers(
    participants: &[Participant],
    drivers: &[Driver],
    max_vehicles: Option<usize>,
) -> Vec<Driver> {
    let mut sorted: Vec<Driver> = drivers.iter().filter(|d| d.capacity > 0).cloned().collect();
    sorted.sort_by(|a, b| b.capacity.cmp(&a.capacity));

    let Some(cap) = max_vehicles else {
        return sorted;
    };
    let excluded = sorted.split_off(cap.min(sorted.len()));
    for driver in excluded {
        let is_parent = participants
            .iter()
            .any(|p| p.assigned_parent.as_deref() == Some(driver.name.as_str()));
        if is_parent {
            sorted.push(driver);
        }
    }
    sorted
}

/// Bucket participants by ascending grade, shuffle within each bucket,
/// and concatenate into the assignment queue.
fn grade_ordered_queue(participants: &[Participant], seed: Option<u64>) -> Vec<Participant> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut buckets: BTreeMap<u32, Vec<Participant>> = BTreeMap::new();
    for p in participants {
        buckets.entry(p.grade).or_default().push(p.clone());
    }

    let mut queue = Vec::with_capacity(participants.len());
    for (_, mut bucket) in buckets {
        bucket.shuffle(&mut rng);
        queue.append(&mut bucket);
    }
    queue
}

/// Best-effort single-occupant remediation: each one-passenger vehicle
/// with a free seat receives one passenger from the fullest vehicle
/// holding three or more. Parent-linked passengers stay with their
/// parent and are never moved.
fn rebalance_singletons(vehicles: &mut [Vehicle], parent_linked: &HashSet<String>) {
    for single_idx in 0..vehicles.len() {
        if vehicles[single_idx].passengers.len() != 1 || vehicles[single_idx].free_seats() == 0 {
            continue;
        }
        let donor_idx = vehicles
            .iter()
            .enumerate()
            .filter(|(i, v)| {
                *i != single_idx
                    && v.passengers.len() >= 3
                    && v.passengers.iter().any(|p| !parent_linked.contains(&p.name))
            })
            .max_by_key(|(_, v)| v.passengers.len())
            .map(|(i, _)| i);
        let Some(donor_idx) = donor_idx else {
            continue;
        };
        let movable = vehicles[donor_idx]
            .passengers
            .iter()
            .rposition(|p| !parent_linked.contains(&p.name));
        if let Some(pos) = movable {
            let participant = vehicles[donor_idx].passengers.remove(pos);
            vehicles[single_idx].passengers.push(participant);
        }
    }
}
