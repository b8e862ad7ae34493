//! A single player's purse and hand of influence.

use crate::error::{EngineError, Result};
use crate::role::Role;

/// One of a player's two influence slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfluenceCard {
    pub role: Role,
    pub revealed: bool,
}

impl InfluenceCard {
    pub fn new(role: Role) -> InfluenceCard {
        InfluenceCard {
            role,
            revealed: false,
        }
    }
}

/// Cash and influence for a single seat at the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    cash: u32,
    influence: [InfluenceCard; 2],
}

impl Player {
    pub fn new(cash: u32, roles: [Role; 2]) -> Player {
        Player {
            cash,
            influence: [InfluenceCard::new(roles[0]), InfluenceCard::new(roles[1])],
        }
    }

    pub fn cash(&self) -> u32 {
        self.cash
    }

    pub fn influence(&self) -> &[InfluenceCard; 2] {
        &self.influence
    }

    pub fn count_unrevealed(&self) -> u32 {
        self.influence.iter().filter(|c| !c.revealed).count() as u32
    }

    pub fn has_n_unrevealed(&self, n: u32) -> bool {
        self.count_unrevealed() == n
    }

    pub fn is_dead(&self) -> bool {
        self.count_unrevealed() == 0
    }

    pub fn has_unrevealed_role(&self, role: Role) -> bool {
        self.influence
            .iter()
            .any(|c| !c.revealed && c.role == role)
    }

    /// Deducts (or, with a negative delta expressed as a second call,
    /// credits) cash. The engine only ever calls this with amounts a guard
    /// has already verified the player can afford, so saturating rather than
    /// checked arithmetic would hide a real bug; an attempt to go negative
    /// is therefore an invariant violation, not a guard failure.
    pub fn adjust_cash(&mut self, delta: i64) -> Result<()> {
        let new_cash = self.cash as i64 + delta;
        if new_cash < 0 {
            return Err(EngineError::invariant(format!(
                "cash would go negative: {} + ({delta})",
                self.cash
            )));
        }
        self.cash = new_cash as u32;
        Ok(())
    }

    /// Flips the first unrevealed slot holding `role` face up.
    pub fn reveal_role(&mut self, role: Role) -> Result<()> {
        for card in self.influence.iter_mut() {
            if !card.revealed && card.role == role {
                card.revealed = true;
                return Ok(());
            }
        }
        Err(EngineError::invariant(format!(
            "no unrevealed {} to reveal",
            role.name()
        )))
    }

    /// Flips the first revealed slot holding `role` back face down. Used
    /// only by the reshuffle-after-reveal effect, immediately before
    /// `swap_role` replaces its identity.
    pub fn unreveal_role(&mut self, role: Role) -> Result<()> {
        for card in self.influence.iter_mut() {
            if card.revealed && card.role == role {
                card.revealed = false;
                return Ok(());
            }
        }
        Err(EngineError::invariant(format!(
            "no revealed {} to unreveal",
            role.name()
        )))
    }

    /// Replaces the role in the first unrevealed slot holding `old` with
    /// `new`, leaving the slot's `revealed` flag untouched.
    pub fn swap_role(&mut self, old: Role, new: Role) -> Result<()> {
        for card in self.influence.iter_mut() {
            if !card.revealed && card.role == old {
                card.role = new;
                return Ok(());
            }
        }
        Err(EngineError::invariant(format!(
            "no unrevealed {} to swap",
            old.name()
        )))
    }

    /// The sole remaining unrevealed role, used to drive auto-reveal when a
    /// player has exactly one influence left.
    pub fn first_unrevealed_role(&self) -> Result<Role> {
        self.influence
            .iter()
            .find(|c| !c.revealed)
            .map(|c| c.role)
            .ok_or_else(|| EngineError::invariant("first_unrevealed_role on a dead player"))
    }
}
