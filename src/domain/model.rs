use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub family: String,
    pub category: String,
}

impl Participant {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        family: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            family: family.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.last_name, self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub giver: Participant,
    pub receiver: Participant,
}

/// Why a candidate pairing was rejected. Rejections are expected while
/// sampling and only become an error once the retry budget runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    SelfMatch { email: String },
    SameFamily { giver: String, receiver: String, family: String },
    CrossCategory { giver: String, receiver: String },
    DuplicateReceiver { email: String },
    DuplicateGiver { email: String },
    UnmatchedGiver { email: String },
    UnknownParticipant { email: String },
    NoCandidate { giver: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfMatch { email } => write!(f, "{} would give to themselves", email),
            Self::SameFamily { giver, receiver, family } => {
                write!(f, "{} and {} are both in family {}", giver, receiver, family)
            }
            Self::CrossCategory { giver, receiver } => {
                write!(f, "{} and {} are in different categories", giver, receiver)
            }
            Self::DuplicateReceiver { email } => write!(f, "{} receives more than one gift", email),
            Self::DuplicateGiver { email } => write!(f, "{} gives more than one gift", email),
            Self::UnmatchedGiver { email } => write!(f, "{} has no receiver", email),
            Self::UnknownParticipant { email } => write!(f, "{} is not a participant", email),
            Self::NoCandidate { giver } => write!(f, "no receiver left for {}", giver),
        }
    }
}

/// Giver to receiver pairs, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pairs: Vec<Pair>,
}

impl Assignment {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn extend(&mut self, other: Assignment) {
        self.pairs.extend(other.pairs);
    }

    pub fn email_map(&self) -> BTreeMap<String, String> {
        self.pairs
            .iter()
            .map(|pair| (pair.giver.email.clone(), pair.receiver.email.clone()))
            .collect()
    }

    /// Checks the complete assignment against the participant list: every
    /// participant gives once and receives once, never to themselves, never
    /// inside their family and never across categories.
    pub fn validate(&self, participants: &[Participant]) -> Result<(), Violation> {
        let known: HashSet<&str> = participants.iter().map(|p| p.email.as_str()).collect();
        let mut givers: HashMap<&str, usize> = HashMap::new();
        let mut receivers: HashMap<&str, usize> = HashMap::new();

        for pair in &self.pairs {
            for email in [&pair.giver.email, &pair.receiver.email] {
                if !known.contains(email.as_str()) {
                    return Err(Violation::UnknownParticipant { email: email.clone() });
                }
            }
            check_pair(&pair.giver, &pair.receiver)?;

            *givers.entry(pair.giver.email.as_str()).or_default() += 1;
            let received = receivers.entry(pair.receiver.email.as_str()).or_default();
            *received += 1;
            if *received > 1 {
                return Err(Violation::DuplicateReceiver {
                    email: pair.receiver.email.clone(),
                });
            }
        }

        for participant in participants {
            match givers.get(participant.email.as_str()) {
                Some(1) => {}
                Some(_) => {
                    return Err(Violation::DuplicateGiver {
                        email: participant.email.clone(),
                    })
                }
                None => {
                    return Err(Violation::UnmatchedGiver {
                        email: participant.email.clone(),
                    })
                }
            }
        }

        Ok(())
    }
}

/// The per-pair rules. Depends only on email, family and category.
pub fn check_pair(giver: &Participant, receiver: &Participant) -> Result<(), Violation> {
    if giver.email == receiver.email {
        return Err(Violation::SelfMatch {
            email: giver.email.clone(),
        });
    }
    if giver.category != receiver.category {
        return Err(Violation::CrossCategory {
            giver: giver.email.clone(),
            receiver: receiver.email.clone(),
        });
    }
    if giver.family == receiver.family {
        return Err(Violation::SameFamily {
            giver: giver.email.clone(),
            receiver: receiver.email.clone(),
            family: giver.family.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(email: &str, family: &str, category: &str) -> Participant {
        Participant::new(email, "First", "Last", family, category)
    }

    fn pair(giver: &Participant, receiver: &Participant) -> Pair {
        Pair {
            giver: giver.clone(),
            receiver: receiver.clone(),
        }
    }

    #[test]
    fn test_check_pair_rules() {
        let a = person("a@x.com", "F1", "adult");
        let b = person("b@x.com", "F2", "adult");
        let c = person("c@x.com", "F1", "adult");
        let k = person("k@x.com", "F3", "kids");

        assert!(check_pair(&a, &b).is_ok());
        assert!(matches!(check_pair(&a, &a), Err(Violation::SelfMatch { .. })));
        assert!(matches!(check_pair(&a, &c), Err(Violation::SameFamily { .. })));
        assert!(matches!(check_pair(&a, &k), Err(Violation::CrossCategory { .. })));
    }

    #[test]
    fn test_validate_complete_assignment() {
        let a = person("a@x.com", "F1", "adult");
        let b = person("b@x.com", "F2", "adult");
        let participants = vec![a.clone(), b.clone()];

        let good = Assignment::new(vec![pair(&a, &b), pair(&b, &a)]);
        assert!(good.validate(&participants).is_ok());

        let missing = Assignment::new(vec![pair(&a, &b)]);
        assert_eq!(
            missing.validate(&participants),
            Err(Violation::UnmatchedGiver {
                email: "b@x.com".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_double_receiver() {
        let a = person("a@x.com", "F1", "adult");
        let b = person("b@x.com", "F2", "adult");
        let c = person("c@x.com", "F3", "adult");
        let participants = vec![a.clone(), b.clone(), c.clone()];

        let assignment = Assignment::new(vec![pair(&a, &b), pair(&c, &b), pair(&b, &a)]);
        assert_eq!(
            assignment.validate(&participants),
            Err(Violation::DuplicateReceiver {
                email: "b@x.com".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_outsider() {
        let a = person("a@x.com", "F1", "adult");
        let b = person("b@x.com", "F2", "adult");
        let stranger = person("z@x.com", "F9", "adult");

        let assignment = Assignment::new(vec![pair(&a, &stranger), pair(&b, &a)]);
        assert!(matches!(
            assignment.validate(&[a.clone(), b.clone()]),
            Err(Violation::UnknownParticipant { .. })
        ));
    }

    #[test]
    fn test_email_map_and_display() {
        let a = person("a@x.com", "F1", "adult");
        let b = person("b@x.com", "F2", "adult");
        let assignment = Assignment::new(vec![pair(&a, &b), pair(&b, &a)]);

        let map = assignment.email_map();
        assert_eq!(map.get("a@x.com").map(String::as_str), Some("b@x.com"));
        assert_eq!(map.get("b@x.com").map(String::as_str), Some("a@x.com"));
        assert_eq!(a.to_string(), "First Last (a@x.com)");
    }
}
