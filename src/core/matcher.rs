use crate::core::match_log::{MatchEvent, MatchLog};
use crate::domain::model::{check_pair, Assignment, Pair, Participant, Violation};
use crate::domain::strategy::Strategy;
use crate::utils::error::{Result, SantaError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_MAX_RETRIES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub max_retries: u32,
    pub strategy: Strategy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            strategy: Strategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub participants: usize,
    pub families: usize,
    pub largest_family: String,
    pub largest_family_size: usize,
    /// `Some(reason)` when no valid pairing can exist for this category.
    pub blocker: Option<String>,
}

/// Matches every category independently. Fails on the first category that
/// cannot be paired; nothing is returned for the categories before it.
pub fn match_participants<R, L>(
    participants: &[Participant],
    options: &MatchOptions,
    rng: &mut R,
    log: &mut L,
) -> Result<Assignment>
where
    R: Rng + ?Sized,
    L: MatchLog + ?Sized,
{
    let mut assignment = Assignment::default();
    for (category, group) in group_by_category(participants) {
        let matched = match_category(category, &group, options, rng, log)?;
        assignment.extend(matched);
    }
    Ok(assignment)
}

pub fn match_category<R, L>(
    category: &str,
    group: &[&Participant],
    options: &MatchOptions,
    rng: &mut R,
    log: &mut L,
) -> Result<Assignment>
where
    R: Rng + ?Sized,
    L: MatchLog + ?Sized,
{
    log.record(MatchEvent::CategoryStarted {
        category: category.to_string(),
        participants: group.len(),
    });

    if let Some(reason) = summarize_group(category, group).blocker {
        log.record(MatchEvent::CategoryFailed {
            category: category.to_string(),
            attempts: 0,
            reason: reason.clone(),
        });
        return Err(SantaError::unsatisfiable(category, 0, reason));
    }

    let mut last_violation = None;
    for attempt in 1..=options.max_retries {
        // Every attempt gets its own seed so retries never replay a failed draw
        // and any attempt can be reproduced from the log.
        let seed: u64 = rng.gen();
        let mut attempt_rng = StdRng::seed_from_u64(seed);

        let verdict = draw_candidate(options.strategy, group, &mut attempt_rng)
            .and_then(|receivers| validate_pairing(group, &receivers).map(|_| receivers));

        match verdict {
            Ok(receivers) => {
                log.record(MatchEvent::CategoryMatched {
                    category: category.to_string(),
                    attempt,
                    seed,
                });
                let pairs = group
                    .iter()
                    .zip(receivers)
                    .map(|(giver, receiver)| Pair {
                        giver: (*giver).clone(),
                        receiver: group[receiver].clone(),
                    })
                    .collect();
                return Ok(Assignment::new(pairs));
            }
            Err(violation) => {
                log.record(MatchEvent::AttemptRejected {
                    category: category.to_string(),
                    attempt,
                    seed,
                    violation: violation.clone(),
                });
                last_violation = Some(violation);
            }
        }
    }

    let reason = match last_violation {
        Some(violation) => format!("retry budget exhausted, last rejection: {}", violation),
        None => "retry budget is zero".to_string(),
    };
    log.record(MatchEvent::CategoryFailed {
        category: category.to_string(),
        attempts: options.max_retries,
        reason: reason.clone(),
    });
    Err(SantaError::unsatisfiable(category, options.max_retries, reason))
}

/// Checks a candidate where `receivers[i]` is the index in `group` that
/// `group[i]` gives to. The verdict depends only on the participants' email,
/// family and category.
pub fn validate_pairing(
    group: &[&Participant],
    receivers: &[usize],
) -> std::result::Result<(), Violation> {
    let mut received = vec![false; group.len()];

    for (giver_index, giver) in group.iter().enumerate() {
        let receiver_index = *receivers.get(giver_index).ok_or_else(|| Violation::UnmatchedGiver {
            email: giver.email.clone(),
        })?;
        let receiver = group.get(receiver_index).ok_or_else(|| Violation::UnknownParticipant {
            email: format!("#{}", receiver_index),
        })?;

        check_pair(giver, receiver)?;

        if received[receiver_index] {
            return Err(Violation::DuplicateReceiver {
                email: receiver.email.clone(),
            });
        }
        received[receiver_index] = true;
    }

    if receivers.len() > group.len() {
        return Err(Violation::UnknownParticipant {
            email: format!("#{}", group.len()),
        });
    }

    Ok(())
}

pub fn group_by_category(participants: &[Participant]) -> BTreeMap<&str, Vec<&Participant>> {
    let mut groups: BTreeMap<&str, Vec<&Participant>> = BTreeMap::new();
    for participant in participants {
        groups
            .entry(participant.category.as_str())
            .or_default()
            .push(participant);
    }
    groups
}

pub fn summarize(participants: &[Participant]) -> Vec<CategorySummary> {
    group_by_category(participants)
        .into_iter()
        .map(|(category, group)| summarize_group(category, &group))
        .collect()
}

/// A pairing exists exactly when the group has two or more members and no
/// family holds more than half of them.
fn summarize_group(category: &str, group: &[&Participant]) -> CategorySummary {
    let mut family_sizes: BTreeMap<&str, usize> = BTreeMap::new();
    for participant in group {
        *family_sizes.entry(participant.family.as_str()).or_default() += 1;
    }
    let (largest_family, largest_family_size) = family_sizes
        .iter()
        .max_by_key(|(_, size)| **size)
        .map(|(family, size)| (family.to_string(), *size))
        .unwrap_or_default();

    let blocker = if group.len() < 2 {
        Some(format!(
            "category has {} participant(s), at least 2 are needed",
            group.len()
        ))
    } else if family_sizes.len() == 1 {
        Some(format!(
            "all {} participants belong to family {}",
            group.len(),
            largest_family
        ))
    } else if largest_family_size * 2 > group.len() {
        Some(format!(
            "family {} has {} of {} participants, more than can give outside their family",
            largest_family,
            largest_family_size,
            group.len()
        ))
    } else {
        None
    };

    CategorySummary {
        category: category.to_string(),
        participants: group.len(),
        families: family_sizes.len(),
        largest_family,
        largest_family_size,
        blocker,
    }
}

fn draw_candidate<R: Rng + ?Sized>(
    strategy: Strategy,
    group: &[&Participant],
    rng: &mut R,
) -> std::result::Result<Vec<usize>, Violation> {
    match strategy {
        Strategy::Greedy => draw_greedy(group, rng),
        Strategy::Rotation => Ok(draw_rotation(group, rng)),
        Strategy::Constructive => draw_constructive(group, rng),
    }
}

fn compatible(giver: &Participant, receiver: &Participant) -> bool {
    giver.email != receiver.email && giver.family != receiver.family
}

fn draw_greedy<R: Rng + ?Sized>(
    group: &[&Participant],
    rng: &mut R,
) -> std::result::Result<Vec<usize>, Violation> {
    let n = group.len();
    let mut givers: Vec<usize> = (0..n).collect();
    let mut candidates: Vec<usize> = (0..n).collect();
    givers.shuffle(rng);
    candidates.shuffle(rng);

    let mut taken = vec![false; n];
    let mut receivers = vec![usize::MAX; n];
    for giver in givers {
        let receiver = candidates
            .iter()
            .copied()
            .find(|&r| !taken[r] && compatible(group[giver], group[r]))
            .ok_or_else(|| Violation::NoCandidate {
                giver: group[giver].email.clone(),
            })?;
        taken[receiver] = true;
        receivers[giver] = receiver;
    }
    Ok(receivers)
}

fn draw_rotation<R: Rng + ?Sized>(group: &[&Participant], rng: &mut R) -> Vec<usize> {
    let n = group.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut receivers = vec![0; n];
    for (position, &giver) in order.iter().enumerate() {
        receivers[giver] = order[(position + 1) % n];
    }
    receivers
}

/// Builds the pairing one giver at a time. A receiver is only taken when
/// every family can still be served by the receivers left outside it, so a
/// group that passed the feasibility check never runs into a dead end.
fn draw_constructive<R: Rng + ?Sized>(
    group: &[&Participant],
    rng: &mut R,
) -> std::result::Result<Vec<usize>, Violation> {
    let n = group.len();

    let mut family_ids: HashMap<&str, usize> = HashMap::new();
    let family_of: Vec<usize> = group
        .iter()
        .map(|participant| {
            let next = family_ids.len();
            *family_ids.entry(participant.family.as_str()).or_insert(next)
        })
        .collect();

    // Unplaced givers plus free receivers of each family. What is left stays
    // solvable while no family's demand exceeds the number of givers left.
    let mut demand = vec![0usize; family_ids.len()];
    for &family in &family_of {
        demand[family] += 2;
    }

    let mut givers: Vec<usize> = (0..n).collect();
    givers.shuffle(rng);

    let mut free = vec![true; n];
    let mut receivers = vec![usize::MAX; n];
    for (placed, &giver) in givers.iter().enumerate() {
        let left = n - placed;
        let own = family_of[giver];
        // A family already at the limit has to lose a free receiver now.
        let tight: Vec<usize> = demand
            .iter()
            .enumerate()
            .filter(|&(family, &need)| family != own && need >= left)
            .map(|(family, _)| family)
            .collect();

        let choices: Vec<usize> = (0..n)
            .filter(|&r| free[r] && compatible(group[giver], group[r]))
            .filter(|&r| tight.iter().all(|&family| family_of[r] == family))
            .collect();
        let receiver = *choices.choose(rng).ok_or_else(|| Violation::NoCandidate {
            giver: group[giver].email.clone(),
        })?;

        free[receiver] = false;
        receivers[giver] = receiver;
        demand[own] -= 1;
        demand[family_of[receiver]] -= 1;
    }
    Ok(receivers)
}
