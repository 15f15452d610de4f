//! Shuffle-and-cycle assignment matcher
//!
//! Participants are paired in four ordered passes: same region and country,
//! same region across countries, then two global passes over whatever is
//! left. Each pass shuffles its group uniformly and connects consecutive
//! elements in a cycle, so every member of a group of size >= 2 gives once
//! and receives once within that group and nobody is paired with themself.

use crate::types::{Assignment, Participant, ParticipantId};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::{BTreeMap, HashSet};

/// Trait for assignment matching algorithms
///
/// The random source is injected so callers can fix the seed and assert
/// exact pairings.
pub trait AssignmentMatcher: Send + Sync {
    /// Compute the full assignment list for one run. Pure function of the
    /// input and the random source; no side effects.
    fn compute_assignments(
        &self,
        participants: &[Participant],
        rng: &mut dyn RngCore,
    ) -> Vec<Assignment>;
}

/// Region-preferring cycle matcher
///
/// Grouping preference order: same region + same country, same region, then
/// global. Participants missing a region or country all land in a single
/// unlabelled bucket at that grouping level.
///
/// The global leftover pool is computed once after the regional passes and
/// cycle-paired twice; both rounds draw from that same pool, so each
/// leftover participant appears as giver in two cross-region assignments.
/// The second store write then overwrites the first.
#[derive(Debug, Default)]
pub struct RegionalCycleMatcher;

impl RegionalCycleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Shuffle a group and pair position i with position (i + 1) mod len
    fn cycle_pairs(
        group: &[&Participant],
        same_region: bool,
        rng: &mut dyn RngCore,
    ) -> Vec<Assignment> {
        let mut shuffled: Vec<&Participant> = group.to_vec();
        shuffled.shuffle(rng);

        (0..shuffled.len())
            .map(|i| Assignment {
                giver: shuffled[i].clone(),
                receiver: shuffled[(i + 1) % shuffled.len()].clone(),
                same_region,
            })
            .collect()
    }

    /// Ids of participants already used as giver or receiver
    fn used_ids(assignments: &[Assignment]) -> HashSet<ParticipantId> {
        assignments
            .iter()
            .flat_map(|a| [a.giver.id, a.receiver.id])
            .collect()
    }

    // BTreeMap keeps grouping order stable so a fixed seed yields a fully
    // deterministic assignment list.
    fn group_by_region(participants: &[Participant]) -> BTreeMap<Option<String>, Vec<&Participant>> {
        let mut by_region: BTreeMap<Option<String>, Vec<&Participant>> = BTreeMap::new();
        for participant in participants {
            by_region
                .entry(participant.region.clone())
                .or_default()
                .push(participant);
        }
        by_region
    }
}

impl AssignmentMatcher for RegionalCycleMatcher {
    fn compute_assignments(
        &self,
        participants: &[Participant],
        rng: &mut dyn RngCore,
    ) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        let by_region = Self::group_by_region(participants);

        // Pass 1: same region, same country
        for members in by_region.values() {
            if members.len() < 2 {
                continue;
            }

            let mut by_country: BTreeMap<Option<String>, Vec<&Participant>> = BTreeMap::new();
            for participant in members.iter().copied() {
                by_country
                    .entry(participant.address.country.clone())
                    .or_default()
                    .push(participant);
            }

            for group in by_country.values() {
                if group.len() < 2 {
                    continue;
                }
                assignments.extend(Self::cycle_pairs(group, true, rng));
            }
        }

        // Pass 2: same region, country ignored
        for members in by_region.values() {
            let used = Self::used_ids(&assignments);
            let leftovers: Vec<&Participant> = members
                .iter()
                .copied()
                .filter(|p| !used.contains(&p.id))
                .collect();
            if leftovers.len() < 2 {
                continue;
            }
            assignments.extend(Self::cycle_pairs(&leftovers, true, rng));
        }

        // Passes 3 and 4: global leftovers. The pool is computed once and
        // paired in two independent rounds (see the struct docs).
        let used = Self::used_ids(&assignments);
        let leftovers: Vec<&Participant> = participants
            .iter()
            .filter(|p| !used.contains(&p.id))
            .collect();

        if leftovers.len() >= 2 {
            assignments.extend(Self::cycle_pairs(&leftovers, false, rng));
            assignments.extend(Self::cycle_pairs(&leftovers, false, rng));
        }

        assignments
    }
}
