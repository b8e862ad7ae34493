//! The static rulebook: what an action costs, what it requires, what can
//! block it, and whether it needs a target. `GameDef` is immutable once
//! built and is shared (by value, it is cheap to clone) across every
//! `Context` produced from it.

use crate::role::{Role, RoleSet};

/// Names the handful of actions this distillation executes in full, plus the
/// actions that only need to participate in the challenge/block metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Income,
    ForeignAid,
    Tax,
    Assassinate,
    Steal,
    Exchange,
    Interrogate,
    Coup,
}

impl ActionName {
    pub const ALL: [ActionName; 8] = [
        ActionName::Income,
        ActionName::ForeignAid,
        ActionName::Tax,
        ActionName::Assassinate,
        ActionName::Steal,
        ActionName::Exchange,
        ActionName::Interrogate,
        ActionName::Coup,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActionName::Income => "income",
            ActionName::ForeignAid => "foreign-aid",
            ActionName::Tax => "tax",
            ActionName::Assassinate => "assassinate",
            ActionName::Steal => "steal",
            ActionName::Exchange => "exchange",
            ActionName::Interrogate => "interrogate",
            ActionName::Coup => "coup",
        }
    }

    pub fn from_name(s: &str) -> Option<ActionName> {
        ActionName::ALL.iter().copied().find(|a| a.name() == s)
    }
}

/// Per-action metadata row.
#[derive(Debug, Clone)]
pub struct ActionDef {
    pub cost: u32,
    pub gain: Option<u32>,
    pub required_roles: RoleSet,
    pub blocking_roles: RoleSet,
    pub targeted: bool,
}

/// The immutable rulebook consulted by every guard and effect in the state
/// machine.
#[derive(Debug, Clone)]
pub struct GameDef {
    roles: RoleSet,
    deck_multiplicity: u32,
    actions: Vec<(ActionName, ActionDef)>,
}

impl GameDef {
    pub fn new(roles: RoleSet, deck_multiplicity: u32, actions: Vec<(ActionName, ActionDef)>) -> GameDef {
        GameDef {
            roles,
            deck_multiplicity,
            actions,
        }
    }

    /// The classic five-role, three-copies-each rulebook from the spec's
    /// default table.
    pub fn default_ruleset() -> GameDef {
        let roles = RoleSet::of(&Role::DEFAULT_SET);
        let actions = vec![
            (
                ActionName::Income,
                ActionDef {
                    cost: 0,
                    gain: Some(1),
                    required_roles: RoleSet::empty(),
                    blocking_roles: RoleSet::empty(),
                    targeted: false,
                },
            ),
            (
                ActionName::ForeignAid,
                ActionDef {
                    cost: 0,
                    gain: Some(2),
                    required_roles: RoleSet::empty(),
                    blocking_roles: RoleSet::of(&[Role::Duke]),
                    targeted: false,
                },
            ),
            (
                ActionName::Tax,
                ActionDef {
                    cost: 0,
                    gain: Some(3),
                    required_roles: RoleSet::of(&[Role::Duke]),
                    blocking_roles: RoleSet::empty(),
                    targeted: false,
                },
            ),
            (
                ActionName::Assassinate,
                ActionDef {
                    cost: 3,
                    gain: None,
                    required_roles: RoleSet::of(&[Role::Assassin]),
                    blocking_roles: RoleSet::of(&[Role::Contessa]),
                    targeted: true,
                },
            ),
            (
                ActionName::Steal,
                ActionDef {
                    cost: 0,
                    gain: None,
                    required_roles: RoleSet::of(&[Role::Captain]),
                    blocking_roles: RoleSet::of(&[Role::Captain, Role::Ambassador, Role::Inquisitor]),
                    targeted: true,
                },
            ),
            (
                ActionName::Exchange,
                ActionDef {
                    cost: 0,
                    gain: None,
                    required_roles: RoleSet::of(&[Role::Ambassador, Role::Inquisitor]),
                    blocking_roles: RoleSet::empty(),
                    targeted: false,
                },
            ),
            (
                ActionName::Interrogate,
                ActionDef {
                    cost: 0,
                    gain: None,
                    required_roles: RoleSet::of(&[Role::Inquisitor]),
                    blocking_roles: RoleSet::empty(),
                    targeted: true,
                },
            ),
            (
                ActionName::Coup,
                ActionDef {
                    cost: 7,
                    gain: None,
                    required_roles: RoleSet::empty(),
                    blocking_roles: RoleSet::empty(),
                    targeted: true,
                },
            ),
        ];
        GameDef::new(roles, 3, actions)
    }

    pub fn roles(&self) -> RoleSet {
        self.roles
    }

    pub fn deck_multiplicity(&self) -> u32 {
        self.deck_multiplicity
    }

    pub fn is_valid_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_valid_action(&self, action: ActionName) -> bool {
        self.def(action).is_some()
    }

    fn def(&self, action: ActionName) -> Option<&ActionDef> {
        self.actions.iter().find(|(a, _)| *a == action).map(|(_, d)| d)
    }

    pub fn cost(&self, action: ActionName) -> u32 {
        self.def(action).map(|d| d.cost).unwrap_or(0)
    }

    pub fn gain(&self, action: ActionName) -> Option<u32> {
        self.def(action).and_then(|d| d.gain)
    }

    pub fn required_roles(&self, action: ActionName) -> RoleSet {
        self.def(action).map(|d| d.required_roles).unwrap_or_else(RoleSet::empty)
    }

    pub fn is_role_required(&self, action: ActionName) -> bool {
        !self.required_roles(action).is_empty()
    }

    pub fn blocking_roles(&self, action: ActionName) -> RoleSet {
        self.def(action).map(|d| d.blocking_roles).unwrap_or_else(RoleSet::empty)
    }

    pub fn is_blockable(&self, action: ActionName) -> bool {
        !self.blocking_roles(action).is_empty()
    }

    pub fn is_blocked_by(&self, action: ActionName, role: Role) -> bool {
        self.blocking_roles(action).contains(role)
    }

    pub fn role_allows_action(&self, role: Role, action: ActionName) -> bool {
        self.required_roles(action).contains(role)
    }

    pub fn is_targeted(&self, action: ActionName) -> bool {
        self.def(action).map(|d| d.targeted).unwrap_or(false)
    }

    /// Whether an action can pass directly from `WaitForResponse` to
    /// `FinishAction` with nothing to contest: neither a challenge (no
    /// required roles) nor a block (no blocking roles) applies. `coup` is
    /// unconditionally in this category, by construction of its rulebook
    /// row, which is how the spec exempts it from the challenge/block
    /// sub-protocol without adding a dedicated guard.
    pub fn is_uncontested(&self, action: ActionName) -> bool {
        !self.is_role_required(action) && !self.is_blockable(action)
    }
}

impl Default for GameDef {
    fn default() -> GameDef {
        GameDef::default_ruleset()
    }
}
