//! Validated search requests.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Jurisdiction, PreconditionViolation};

/// A search that passed local validation: non-empty text, at least one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    text: String,
    jurisdictions: BTreeSet<Jurisdiction>,
}

impl SearchQuery {
    /// Validate and build a query. The text is trimmed; duplicate jurisdictions collapse.
    pub fn new<I>(text: &str, jurisdictions: I) -> Result<Self, PreconditionViolation>
    where
        I: IntoIterator<Item = Jurisdiction>,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(PreconditionViolation::EmptyQuery);
        }
        let jurisdictions: BTreeSet<Jurisdiction> = jurisdictions.into_iter().collect();
        if jurisdictions.is_empty() {
            return Err(PreconditionViolation::NoJurisdictions);
        }
        Ok(Self {
            text: text.to_string(),
            jurisdictions,
        })
    }

    /// Like [`new`](Self::new), parsing jurisdiction labels first.
    pub fn from_labels<S: AsRef<str>>(
        text: &str,
        labels: &[S],
    ) -> Result<Self, PreconditionViolation> {
        let jurisdictions = labels
            .iter()
            .map(|l| l.as_ref().parse::<Jurisdiction>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(text, jurisdictions)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn jurisdictions(&self) -> &BTreeSet<Jurisdiction> {
        &self.jurisdictions
    }

    /// Portal filter identifiers in catalog order.
    pub fn filter_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.jurisdictions.iter().map(|j| j.filter_id())
    }

    /// Labels joined with `", "`, as written to the results log.
    pub fn joined_labels(&self) -> String {
        self.jurisdictions
            .iter()
            .map(|j| j.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
