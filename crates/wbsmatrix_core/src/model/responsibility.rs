//! Responsibility vocabulary: fixed roles, codes, and the RAM color legend.
//!
//! # Responsibility
//! - Define the six fixed project roles and their stable string ids.
//! - Define the responsibility code enum that replaces the empty-string
//!   "no involvement" convention of hand-authored plans.
//!
//! # Invariants
//! - Role order is fixed and drives column order in every matrix view.
//! - Code parsing is case-sensitive: only `L`, `P`, `R`, `I` and `""`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Number of fixed roles carried by every work package.
pub const ROLE_COUNT: usize = 6;

/// Project role holding a responsibility code on each work package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ProjectManager,
    Hardware,
    Software,
    Testing,
    Sponsor,
    Other,
}

impl Role {
    /// All roles in canonical column order.
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::ProjectManager,
        Role::Hardware,
        Role::Software,
        Role::Testing,
        Role::Sponsor,
        Role::Other,
    ];

    /// Stable key used in plan documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectManager => "project_manager",
            Self::Hardware => "hardware",
            Self::Software => "software",
            Self::Testing => "testing",
            Self::Sponsor => "sponsor",
            Self::Other => "other",
        }
    }

    /// Column header used by matrix views.
    pub fn label(self) -> &'static str {
        match self {
            Self::ProjectManager => "Project Manager",
            Self::Hardware => "Hardware",
            Self::Software => "Software",
            Self::Testing => "Testing",
            Self::Sponsor => "Sponsor",
            Self::Other => "Other",
        }
    }

    /// Two-letter glyph used in compact diagram labels.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::ProjectManager => "PM",
            Self::Hardware => "HW",
            Self::Software => "SW",
            Self::Testing => "TE",
            Self::Sponsor => "SP",
            Self::Other => "OT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Parses one role from its document key.
///
/// Returns `None` for keys outside the fixed six.
pub fn parse_role(value: &str) -> Option<Role> {
    Role::ALL.into_iter().find(|role| role.as_str() == value)
}

/// Responsibility of one role on one work package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Responsibility {
    /// No involvement. Authored as `""` or left null.
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "L")]
    Lead,
    #[serde(rename = "P")]
    Participant,
    #[serde(rename = "R")]
    Reviewer,
    #[serde(rename = "I")]
    Input,
}

impl Responsibility {
    /// Every code, with `None` last.
    pub const ALL: [Responsibility; 5] = [
        Responsibility::Lead,
        Responsibility::Participant,
        Responsibility::Reviewer,
        Responsibility::Input,
        Responsibility::None,
    ];

    /// One-letter document code; empty for `None`.
    pub fn code(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lead => "L",
            Self::Participant => "P",
            Self::Reviewer => "R",
            Self::Input => "I",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "No Involvement",
            Self::Lead => "Lead",
            Self::Participant => "Participant",
            Self::Reviewer => "Reviewer",
            Self::Input => "Input",
        }
    }

    /// Cell fill used by the RAM view.
    pub fn color(self) -> &'static str {
        match self {
            Self::None => "#fbf1c7",
            Self::Lead => "#af3a03",
            Self::Participant => "#427b58",
            Self::Reviewer => "#8f3f71",
            Self::Input => "#076678",
        }
    }

    /// Returns whether this code counts toward role involvement.
    pub fn is_involved(self) -> bool {
        self != Self::None
    }
}

/// Parses one responsibility code. Case-sensitive; `""` maps to `None`.
pub fn parse_code(value: &str) -> Option<Responsibility> {
    match value {
        "" => Some(Responsibility::None),
        "L" => Some(Responsibility::Lead),
        "P" => Some(Responsibility::Participant),
        "R" => Some(Responsibility::Reviewer),
        "I" => Some(Responsibility::Input),
        _ => None,
    }
}

/// Complete per-role code assignment for one work package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Responsibilities([Responsibility; ROLE_COUNT]);

impl Responsibilities {
    pub fn get(&self, role: Role) -> Responsibility {
        self.0[role.index()]
    }

    pub fn set(&mut self, role: Role, code: Responsibility) {
        self.0[role.index()] = code;
    }

    /// Iterates `(role, code)` pairs in canonical role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, Responsibility)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Iterates only roles with a non-`None` code.
    pub fn involved(&self) -> impl Iterator<Item = (Role, Responsibility)> + '_ {
        self.iter().filter(|(_, code)| code.is_involved())
    }
}

impl FromIterator<(Role, Responsibility)> for Responsibilities {
    fn from_iter<T: IntoIterator<Item = (Role, Responsibility)>>(iter: T) -> Self {
        let mut out = Self::default();
        for (role, code) in iter {
            out.set(role, code);
        }
        out
    }
}

impl Serialize for Responsibilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ROLE_COUNT))?;
        for (role, code) in self.iter() {
            map.serialize_entry(role.as_str(), code.code())?;
        }
        map.end()
    }
}

/// Per-role count of involved work packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleCounts([u32; ROLE_COUNT]);

impl RoleCounts {
    /// 0/1 involvement vector for one work package.
    pub fn from_responsibilities(responsibilities: &Responsibilities) -> Self {
        let mut counts = Self::default();
        for (role, _) in responsibilities.involved() {
            counts.0[role.index()] = 1;
        }
        counts
    }

    pub fn get(&self, role: Role) -> u32 {
        self.0[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Element-wise addition.
    pub fn absorb(&mut self, other: &RoleCounts) {
        for (slot, value) in self.0.iter_mut().zip(other.0) {
            *slot += value;
        }
    }
}

impl Serialize for RoleCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(role, count)| (role.as_str(), count)))
    }
}

/// One legend entry shared by the RAM renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub code: Responsibility,
    pub label: &'static str,
    pub color: &'static str,
}

/// Code → label → color legend, in `L, P, R, I, none` order.
pub fn role_legend() -> Vec<LegendEntry> {
    Responsibility::ALL
        .into_iter()
        .map(|code| LegendEntry {
            code,
            label: code.label(),
            color: code.color(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_code, parse_role, role_legend, Responsibilities, Responsibility, Role, RoleCounts,
    };

    #[test]
    fn parse_role_accepts_only_fixed_keys() {
        for role in Role::ALL {
            assert_eq!(parse_role(role.as_str()), Some(role));
        }
        assert_eq!(parse_role("Hardware"), None);
        assert_eq!(parse_role("qa"), None);
    }

    #[test]
    fn parse_code_is_case_sensitive() {
        assert_eq!(parse_code("L"), Some(Responsibility::Lead));
        assert_eq!(parse_code(""), Some(Responsibility::None));
        assert_eq!(parse_code("l"), None);
        assert_eq!(parse_code("LP"), None);
    }

    #[test]
    fn role_counts_mark_only_involved_roles() {
        let responsibilities: Responsibilities = [
            (Role::ProjectManager, Responsibility::Reviewer),
            (Role::Testing, Responsibility::Input),
        ]
        .into_iter()
        .collect();

        let counts = RoleCounts::from_responsibilities(&responsibilities);
        assert_eq!(counts.get(Role::ProjectManager), 1);
        assert_eq!(counts.get(Role::Testing), 1);
        assert_eq!(counts.get(Role::Hardware), 0);

        let mut total = counts;
        total.absorb(&counts);
        assert_eq!(total.get(Role::Testing), 2);
    }

    #[test]
    fn legend_lists_codes_before_no_involvement() {
        let legend = role_legend();
        let codes: Vec<&str> = legend.iter().map(|entry| entry.code.code()).collect();
        assert_eq!(codes, vec!["L", "P", "R", "I", ""]);
        assert_eq!(legend[0].color, "#af3a03");
    }
}
