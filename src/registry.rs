//! Ordered participant list with capacity limits and palette assignment.

use crate::config::{MAX_NAME_LENGTH, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::{Participant, PARTICIPANT_COLORS, PARTICIPANT_EMOJIS};
use log::{debug, info};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    EmptyName,
    NameTooLong { max: usize },
    AtCapacity { max: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::EmptyName => write!(f, "Please enter a name"),
            RegistryError::NameTooLong { max } => {
                write!(f, "Names can be at most {} characters", max)
            }
            RegistryError::AtCapacity { max } => {
                write!(f, "At most {} participants can join", max)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Participant list bounded to `[0, MAX_PARTICIPANTS]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
    next_id: u64,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    pub fn can_spin(&self) -> bool {
        self.participants.len() >= MIN_PARTICIPANTS
    }

    /// How many more participants are needed before a spin is allowed.
    pub fn missing_for_game(&self) -> usize {
        MIN_PARTICIPANTS.saturating_sub(self.participants.len())
    }

    /// Validate `name` and append a new participant.
    pub fn add(&mut self, name: &str) -> Result<Participant, RegistryError> {
        let name = validate_name(name)?;
        if self.is_full() {
            return Err(RegistryError::AtCapacity {
                max: MAX_PARTICIPANTS,
            });
        }

        self.next_id += 1;
        let participant = Participant {
            id: self.next_id.to_string(),
            name,
            emoji: PARTICIPANT_EMOJIS[self.participants.len() % PARTICIPANT_EMOJIS.len()],
            color: self.available_color(),
            weight: 1,
        };
        info!(
            "Participant {} joined ({}/{})",
            participant.name,
            self.participants.len() + 1,
            MAX_PARTICIPANTS
        );
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Remove by id; unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| p.id == id)?;
        let removed = self.participants.remove(pos);
        info!("Participant {} left", removed.name);
        Some(removed)
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} participants", self.participants.len());
        self.participants.clear();
    }

    /// First palette color no current participant uses.
    fn available_color(&self) -> &'static str {
        PARTICIPANT_COLORS
            .iter()
            .copied()
            .find(|color| self.participants.iter().all(|p| p.color != *color))
            .unwrap_or(PARTICIPANT_COLORS[self.participants.len() % PARTICIPANT_COLORS.len()])
    }
}

/// Trim and check a participant name.
pub fn validate_name(input: &str) -> Result<String, RegistryError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(RegistryError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> ParticipantRegistry {
        let mut registry = ParticipantRegistry::new();
        for name in names {
            registry.add(name).unwrap();
        }
        registry
    }

    #[test]
    fn test_add_trims_and_assigns() {
        let mut registry = ParticipantRegistry::new();
        let alice = registry.add("  Alice ").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.emoji, PARTICIPANT_EMOJIS[0]);
        assert_eq!(alice.color, PARTICIPANT_COLORS[0]);
        assert_eq!(alice.weight, 1);

        let bob = registry.add("Bob").unwrap();
        assert_eq!(bob.emoji, PARTICIPANT_EMOJIS[1]);
        assert_eq!(bob.color, PARTICIPANT_COLORS[1]);
        assert_ne!(alice.id, bob.id);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = registry_with(&["Alice"]);
        assert_eq!(registry.add(""), Err(RegistryError::EmptyName));
        assert_eq!(registry.add("   \t"), Err(RegistryError::EmptyName));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_long_name_rejected() {
        let mut registry = ParticipantRegistry::new();
        assert!(registry.add("abcdefghijklmnopqrst").is_ok());
        assert_eq!(
            registry.add("abcdefghijklmnopqrstu"),
            Err(RegistryError::NameTooLong { max: 20 })
        );
        // Multi-byte names are measured in characters
        assert!(registry.add("🍺🍺🍺🍺🍺🍺🍺🍺🍺🍺").is_ok());
    }

    #[test]
    fn test_capacity() {
        let mut registry = ParticipantRegistry::new();
        for i in 0..MAX_PARTICIPANTS {
            registry.add(&format!("P{}", i)).unwrap();
        }
        assert!(registry.is_full());
        assert_eq!(
            registry.add("Extra"),
            Err(RegistryError::AtCapacity { max: 10 })
        );
        assert_eq!(registry.len(), MAX_PARTICIPANTS);
    }

    #[test]
    fn test_colors_stay_unique_after_removal() {
        let mut registry = registry_with(&["A", "B", "C"]);
        let b_id = registry.participants()[1].id.clone();
        registry.remove(&b_id);
        // B's color is free again and is reused first
        let d = registry.add("D").unwrap();
        assert_eq!(d.color, PARTICIPANT_COLORS[1]);
        let colors: Vec<_> = registry.participants().iter().map(|p| p.color).collect();
        let mut deduped = colors.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(colors.len(), deduped.len());
    }

    #[test]
    fn test_emoji_cycles_by_position() {
        let mut registry = registry_with(&["A", "B"]);
        let a_id = registry.participants()[0].id.clone();
        registry.remove(&a_id);
        let c = registry.add("C").unwrap();
        assert_eq!(c.emoji, PARTICIPANT_EMOJIS[1]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = registry_with(&["A", "B"]);
        assert_eq!(registry.remove("does-not-exist"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut registry = registry_with(&["A", "B"]);
        let last = registry.participants()[1].id.clone();
        registry.clear();
        assert!(registry.is_empty());
        let fresh = registry.add("C").unwrap();
        assert_ne!(fresh.id, last);
    }

    #[test]
    fn test_game_readiness() {
        let mut registry = ParticipantRegistry::new();
        assert_eq!(registry.missing_for_game(), 2);
        registry.add("A").unwrap();
        assert!(!registry.can_spin());
        assert_eq!(registry.missing_for_game(), 1);
        registry.add("B").unwrap();
        assert!(registry.can_spin());
        assert_eq!(registry.missing_for_game(), 0);
    }
}
