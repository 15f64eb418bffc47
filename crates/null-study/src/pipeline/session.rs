//! Purge/flag sessions.
//!
//! A session owns a working copy of a source table and the provenance of
//! the edits applied so far. Every step consumes the session and returns the
//! next one, so no state is shared between steps.

use crate::cleaner::apply_edit;
use crate::error::{Result, ResultExt};
use crate::provenance::Provenance;
use crate::types::StructuralEdit;
use polars::prelude::*;
use tracing::debug;

/// Working state of a purge/flag session.
#[derive(Debug, Clone)]
pub struct PurgeFlagSession {
    working: DataFrame,
    provenance: Provenance,
}

static_assertions::assert_impl_all!(PurgeFlagSession: Send);

/// Result of finishing a session.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// No edit was applied; nothing is created.
    NoOp,
    /// A derived table and its provenance name.
    Derived { name: String, table: DataFrame },
}

impl PurgeFlagSession {
    /// Start from a copy of `source`; the source itself is never modified.
    pub fn new(source: &DataFrame) -> Self {
        Self {
            working: source.clone(),
            provenance: Provenance::new(),
        }
    }

    pub fn working(&self) -> &DataFrame {
        &self.working
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Apply `edit` and record its tag.
    pub fn apply(self, edit: StructuralEdit) -> Result<Self> {
        let working = apply_edit(&self.working, &edit)
            .context(format!("Applying {}", crate::provenance::edit_tag(&edit)))?;
        let provenance = self.provenance.with(&edit);
        debug!("Session now {} ({} columns)", provenance, working.width());
        Ok(Self {
            working,
            provenance,
        })
    }

    /// Apply several edits in order.
    pub fn apply_all<I>(self, edits: I) -> Result<Self>
    where
        I: IntoIterator<Item = StructuralEdit>,
    {
        edits
            .into_iter()
            .try_fold(self, |session, edit| session.apply(edit))
    }

    /// End the session.
    pub fn finish(self) -> SessionOutcome {
        match self.provenance.name() {
            Some(name) => SessionOutcome::Derived {
                name,
                table: self.working,
            },
            None => SessionOutcome::NoOp,
        }
    }
}
