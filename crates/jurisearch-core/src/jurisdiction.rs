//! The fixed catalog of jurisdictions the portal can filter on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PreconditionViolation;

/// A jurisdiction filter.
///
/// Variants are declared in catalog order; `Ord` follows it, so a
/// `BTreeSet<Jurisdiction>` always iterates Civil → Special.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    Civil,
    Penal,
    /// Contencioso-administrativo.
    Administrative,
    Social,
    Military,
    Special,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 6] = [
        Jurisdiction::Civil,
        Jurisdiction::Penal,
        Jurisdiction::Administrative,
        Jurisdiction::Social,
        Jurisdiction::Military,
        Jurisdiction::Special,
    ];

    /// Identifier the portal expects in its jurisdiction filter field.
    pub fn filter_id(self) -> &'static str {
        match self {
            Jurisdiction::Civil => "CIVIL",
            Jurisdiction::Penal => "PENAL",
            Jurisdiction::Administrative => "CONTENCIOSO",
            Jurisdiction::Social => "SOCIAL",
            Jurisdiction::Military => "MILITAR",
            Jurisdiction::Special => "ESPECIAL",
        }
    }

    /// Label shown to users and written to the results log.
    pub fn label(self) -> &'static str {
        match self {
            Jurisdiction::Civil => "Civil",
            Jurisdiction::Penal => "Penal",
            Jurisdiction::Administrative => "Contencioso",
            Jurisdiction::Social => "Social",
            Jurisdiction::Military => "Militar",
            Jurisdiction::Special => "Especial",
        }
    }

    fn english_name(self) -> &'static str {
        match self {
            Jurisdiction::Civil => "civil",
            Jurisdiction::Penal => "penal",
            Jurisdiction::Administrative => "administrative",
            Jurisdiction::Social => "social",
            Jurisdiction::Military => "military",
            Jurisdiction::Special => "special",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Jurisdiction {
    type Err = PreconditionViolation;

    /// Accepts the label, the portal filter id or the English name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Jurisdiction::ALL
            .into_iter()
            .find(|j| {
                needle.eq_ignore_ascii_case(j.label())
                    || needle.eq_ignore_ascii_case(j.filter_id())
                    || needle.eq_ignore_ascii_case(j.english_name())
            })
            .ok_or_else(|| PreconditionViolation::UnknownJurisdiction(needle.to_string()))
    }
}
