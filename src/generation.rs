use std::fmt;

use crate::error::GenerationError;

/// Number of the extraction pass that created or last touched an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The generation stamped by the first extraction pass.
    pub const FIRST: Self = Self(0);

    /// Wraps a raw pass number.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the generation following this one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Exhausted`] if the counter would overflow.
    pub fn next(self) -> Result<Self, GenerationError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(GenerationError::Exhausted)
    }

    /// Number of generations between `self` and a later `other`.
    ///
    /// Returns zero when `other` is not later than `self`.
    #[must_use]
    pub fn age_at(self, other: Self) -> u32 {
        other.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generation tag carried by every mesh entity.
///
/// Starts unset; extraction passes stamp it. Stamps never move backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationTag(Option<Generation>);

impl GenerationTag {
    /// Returns the stamped generation, if any.
    #[must_use]
    pub fn get(self) -> Option<Generation> {
        self.0
    }

    /// Whether no pass has stamped this entity yet.
    #[must_use]
    pub fn is_unset(self) -> bool {
        self.0.is_none()
    }

    /// Stamps `generation`, returning the previous tag.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Regression`] if `generation` is older than
    /// the current stamp.
    pub fn stamp(&mut self, generation: Generation) -> Result<Self, GenerationError> {
        if let Some(current) = self.0 {
            if generation < current {
                return Err(GenerationError::Regression {
                    current,
                    requested: generation,
                });
            }
        }
        let previous = *self;
        self.0 = Some(generation);
        Ok(previous)
    }

    /// Restores a tag saved by [`GenerationTag::stamp`] when a pass is rolled back.
    pub(crate) fn restore(&mut self, previous: Self) {
        self.0 = previous.0;
    }

    /// Checks that a reader at `committed` may observe this entity.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Unstamped`] for entities no pass has stamped,
    /// [`GenerationError::Uncommitted`] for entities newer than `committed` and
    /// [`GenerationError::StaleEntity`] for entities older than the
    /// retention window allows.
    pub fn check_visible(
        self,
        committed: Option<Generation>,
        retention_window: u32,
    ) -> Result<Generation, GenerationError> {
        let generation = self.0.ok_or(GenerationError::Unstamped)?;
        let committed = committed.ok_or(GenerationError::Uncommitted { generation })?;
        if generation > committed {
            return Err(GenerationError::Uncommitted { generation });
        }
        if generation.age_at(committed) > retention_window {
            return Err(GenerationError::StaleEntity {
                entity: generation,
                committed,
            });
        }
        Ok(generation)
    }

    /// Whether the garbage collector should remove this entity.
    #[must_use]
    pub fn is_stale(self, committed: Option<Generation>, retention_window: u32) -> bool {
        match (self.0, committed) {
            (Some(generation), Some(committed)) => {
                generation <= committed && generation.age_at(committed) > retention_window
            }
            _ => false,
        }
    }
}
