//! Role identities and the role-set type used by both `GameDef` (metadata
//! tables) and `Deck` (the closed multiset of role tokens in play).

use enum_map::Enum;

/// A symbolic role a player may claim to hold.
///
/// The default game ships the five classic roles; a `GameDef` built with a
/// different `roles` list can restrict play to a subset (the `RoleSet`
/// below is sized for the full enum regardless, with unconfigured roles
/// simply never dealt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Role {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
    Inquisitor,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Duke,
        Role::Assassin,
        Role::Captain,
        Role::Ambassador,
        Role::Contessa,
        Role::Inquisitor,
    ];

    /// The classic five-role set used by `GameDef::default`.
    pub const DEFAULT_SET: [Role; 5] = [
        Role::Duke,
        Role::Assassin,
        Role::Captain,
        Role::Ambassador,
        Role::Contessa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Duke => "duke",
            Role::Assassin => "assassin",
            Role::Captain => "captain",
            Role::Ambassador => "ambassador",
            Role::Contessa => "contessa",
            Role::Inquisitor => "inquisitor",
        }
    }

    pub fn from_name(s: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.name() == s)
    }
}

/// A multiset of `Role`, used to describe "the roles that may claim this
/// action" and "the roles that may claim to block this action" in
/// `GameDef`, and reused by `Deck` as the counted pool backing the ordered
/// sequence of roles still to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet {
    map: enum_map::EnumMap<Role, u32>,
}

pub struct RoleSetIter {
    remaining: Vec<(Role, u32)>,
}

impl Iterator for RoleSetIter {
    type Item = Role;
    fn next(&mut self) -> Option<Role> {
        let (role, count) = self.remaining.pop()?;
        if count > 1 {
            self.remaining.push((role, count - 1));
        }
        Some(role)
    }
}

impl RoleSet {
    pub fn empty() -> RoleSet {
        RoleSet {
            map: enum_map::EnumMap::default(),
        }
    }

    pub fn of(roles: &[Role]) -> RoleSet {
        let mut set = RoleSet::empty();
        for &r in roles {
            set.insert(r);
        }
        set
    }

    pub fn insert(&mut self, role: Role) {
        self.map[role] += 1;
    }

    pub fn contains(&self, role: Role) -> bool {
        self.map[role] > 0
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(|c| *c == 0)
    }
}

impl IntoIterator for RoleSet {
    type Item = Role;
    type IntoIter = RoleSetIter;

    fn into_iter(self) -> RoleSetIter {
        let remaining = self
            .map
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(role, count)| (role, *count))
            .collect();
        RoleSetIter { remaining }
    }
}
