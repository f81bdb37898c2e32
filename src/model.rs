//! Entities submitted for enrichment and the outcomes produced for them.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::Ipv4Addr;

/// Kind of observable. Only IPv4 addresses are looked up today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EntityKind {
    #[default]
    #[serde(rename = "IPv4")]
    Ipv4,
}

/// An observable submitted for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Entity {
    /// String form of the address.
    pub value: String,

    /// Whether the address is private, as precomputed by the caller.
    #[serde(rename = "isPrivateIP", default)]
    pub is_private_ip: bool,

    #[serde(rename = "type", default)]
    pub kind: EntityKind,
}

impl Entity {
    /// Build an IPv4 entity, precomputing the private flag the way the host platform does.
    ///
    /// Values that do not parse as IPv4 are never flagged private.
    pub fn ipv4(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_private_ip = value
            .trim()
            .parse::<Ipv4Addr>()
            .map(|ip| ip.is_private())
            .unwrap_or(false);

        Self {
            value,
            is_private_ip,
            kind: EntityKind::Ipv4,
        }
    }

    /// Override the precomputed private flag.
    pub fn with_private(mut self, is_private_ip: bool) -> Self {
        self.is_private_ip = is_private_ip;
        self
    }
}

/// Per-entity result of one enrichment attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Filtered before any request was made.
    Skipped { entity: Entity },

    /// Upstream answered successfully but without usable data.
    Empty { entity: Entity },

    /// Upstream returned context for the entity.
    Enriched {
        entity: Entity,
        summary_tags: Vec<String>,
        details: Value,
    },

    /// The request failed or upstream reported an error.
    Failed {
        entity: Entity,
        error: LookupError,
        detail: Option<String>,
    },
}

impl LookupOutcome {
    /// Entity this outcome belongs to.
    pub fn entity(&self) -> &Entity {
        match self {
            LookupOutcome::Skipped { entity }
            | LookupOutcome::Empty { entity }
            | LookupOutcome::Enriched { entity, .. }
            | LookupOutcome::Failed { entity, .. } => entity,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LookupOutcome::Failed { .. })
    }

    /// Project this outcome onto the shape handed to the display layer.
    ///
    /// Returns `None` for `Failed`, which never reaches the display layer.
    pub fn to_display(&self) -> Option<DisplayResult> {
        let data = match self {
            LookupOutcome::Skipped { .. } | LookupOutcome::Empty { .. } => None,
            LookupOutcome::Enriched {
                summary_tags,
                details,
                ..
            } => Some(DisplayData {
                summary: summary_tags.clone(),
                details: details.clone(),
            }),
            LookupOutcome::Failed { .. } => return None,
        };

        Some(DisplayResult {
            entity: self.entity().clone(),
            data,
        })
    }
}

/// Outcomes of one successful batch, in completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultBatch {
    outcomes: Vec<LookupOutcome>,
}

impl ResultBatch {
    pub fn new(outcomes: Vec<LookupOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LookupOutcome> {
        self.outcomes.iter()
    }

    pub fn outcomes(&self) -> &[LookupOutcome] {
        &self.outcomes
    }

    /// Outcome recorded for the entity with the given value, if any.
    pub fn get(&self, value: &str) -> Option<&LookupOutcome> {
        self.outcomes.iter().find(|o| o.entity().value == value)
    }

    /// Convert into the list consumed by the display layer.
    pub fn into_display(self) -> Vec<DisplayResult> {
        self.outcomes
            .iter()
            .filter_map(LookupOutcome::to_display)
            .collect()
    }
}

impl IntoIterator for ResultBatch {
    type Item = LookupOutcome;
    type IntoIter = std::vec::IntoIter<LookupOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

/// One entity's result as handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayResult {
    pub entity: Entity,
    /// `None` when the entity was skipped or upstream had no data.
    pub data: Option<DisplayData>,
}

/// Summary tags plus the raw upstream body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayData {
    pub summary: Vec<String>,
    pub details: Value,
}
