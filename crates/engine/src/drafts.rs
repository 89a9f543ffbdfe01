//! Request builders for the card and card-group forms.
//!
//! Validation runs first and aborts with an [`EngineError`] before anything
//! is built, so a rejected form never produces a partial request.
use api_types::{
    card::{Card, CardNew, CardStatus, CardUpdate},
    card_group::{CardGroup, CardGroupConstraintUpdate},
};

use crate::{BuildContext, EditSession, EngineError};

fn required(value: Option<&str>, err: EngineError) -> Result<String, EngineError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(err),
    }
}

/// Fields of the "new card" form besides the constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub account_id: Option<String>,
    pub virtual_account_id: Option<String>,
    pub card_group_id: Option<String>,
    pub name: String,
}

impl CardDraft {
    pub fn build(&self, session: &EditSession, ctx: &BuildContext) -> Result<CardNew, EngineError> {
        let account_id = required(self.account_id.as_deref(), EngineError::MissingAccount)?;
        let virtual_account_id = required(
            self.virtual_account_id.as_deref(),
            EngineError::MissingVirtualAccount,
        )?;
        let name = required(Some(self.name.as_str()), EngineError::MissingName)?;
        let constraint = session.submit(ctx)?;

        tracing::info!("building card {name:?} for virtual account {virtual_account_id}");
        Ok(CardNew {
            account_id,
            virtual_account_id,
            card_group_id: self
                .card_group_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            name,
            constraint,
        })
    }
}

/// Edit of an existing card: optional status change plus its constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardEdit {
    pub status: Option<CardStatus>,
}

impl CardEdit {
    /// Opens an edit session seeded from the card's current constraint.
    pub fn session_for(card: &Card) -> EditSession {
        match &card.spending_constraint {
            Some(existing) => EditSession::editing(&card.account_id, existing),
            None => EditSession::new(&card.account_id),
        }
    }

    pub fn build(
        &self,
        session: &EditSession,
        ctx: &BuildContext,
    ) -> Result<CardUpdate, EngineError> {
        Ok(CardUpdate {
            status: self.status,
            constraint: session.submit(ctx)?,
        })
    }
}

/// Spending-constraint edit of a card group.
///
/// Unlike cards, a group constraint must carry at least one rule or limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardGroupEdit;

impl CardGroupEdit {
    pub fn session_for(group: &CardGroup) -> EditSession {
        match &group.spending_constraint {
            Some(existing) => EditSession::editing(&group.account_id, existing),
            None => EditSession::new(&group.account_id),
        }
    }

    pub fn build(
        &self,
        session: &EditSession,
        ctx: &BuildContext,
    ) -> Result<CardGroupConstraintUpdate, EngineError> {
        if session.draft.has_no_selection() && session.draft.limits.is_empty() {
            return Err(EngineError::EmptySelection(
                "pick at least one country, MCC, category, merchant or limit".to_string(),
            ));
        }
        let constraint = session.submit(ctx)?;
        if constraint.is_unrestricted() {
            return Err(EngineError::EmptySelection(
                "no valid rule left after normalization".to_string(),
            ));
        }
        Ok(CardGroupConstraintUpdate { constraint })
    }
}
