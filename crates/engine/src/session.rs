//! Per-editor state.
//!
//! Each create/edit dialog owns one [`EditSession`]: its selections, the
//! merchant search results it has browsed and the names learned from them.
//! Two open editors never share any of it.
use api_types::{
    constraint::SpendingConstraintPayload,
    merchant::Merchant,
    paging::CursorPage,
};
use tokio::time::Instant;

use crate::{
    Applied, BuildContext, ConstraintDraft, CursorPager, CursorRequest, DebounceConfig,
    EngineError, MerchantDirectory, SearchDebouncer, SearchEvent, Ticket,
};

/// Identity of a merchant search: a new value resets the result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerchantQuery {
    pub account_id: String,
    pub search: String,
}

#[derive(Debug)]
pub struct EditSession {
    account_id: String,
    pub draft: ConstraintDraft,
    directory: MerchantDirectory,
    merchant_search: CursorPager<Merchant, MerchantQuery>,
    debouncer: SearchDebouncer,
}

impl EditSession {
    /// Empty session for a create dialog.
    pub fn new(account_id: impl Into<String>) -> Self {
        Self::with_config(account_id, DebounceConfig::default())
    }

    pub fn with_config(account_id: impl Into<String>, config: DebounceConfig) -> Self {
        Self {
            account_id: account_id.into(),
            draft: ConstraintDraft::default(),
            directory: MerchantDirectory::default(),
            merchant_search: CursorPager::new(),
            debouncer: SearchDebouncer::new(config),
        }
    }

    /// Session for an edit dialog, seeded from the stored constraint.
    pub fn editing(account_id: impl Into<String>, existing: &SpendingConstraintPayload) -> Self {
        let mut session = Self::new(account_id);
        session.draft = ConstraintDraft::from_payload(existing);
        session
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Switches account: pending search and merchant results are dropped.
    pub fn set_account(&mut self, account_id: impl Into<String>) {
        let account_id = account_id.into();
        if account_id == self.account_id {
            return;
        }
        self.account_id = account_id;
        self.debouncer.cancel();
        self.merchant_search.clear();
    }

    /// Feeds the merchant search box.
    ///
    /// Short text clears the results at once; longer text waits for
    /// [`EditSession::poll_search`].
    pub fn search_input(&mut self, text: &str, now: Instant) {
        if let Some(SearchEvent::Clear) = self.debouncer.input(text, now) {
            self.merchant_search.clear();
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Returns the search request once the input has been quiet long enough.
    pub fn poll_search(&mut self, now: Instant) -> Option<CursorRequest<MerchantQuery>> {
        match self.debouncer.poll(now)? {
            SearchEvent::Search(search) => Some(self.merchant_search.reset(MerchantQuery {
                account_id: self.account_id.clone(),
                search,
            })),
            SearchEvent::Clear => None,
        }
    }

    pub fn load_more_merchants(&mut self) -> Option<CursorRequest<MerchantQuery>> {
        self.merchant_search.load_more()
    }

    /// Hands a merchant page back; names are learned even from stale pages.
    pub fn apply_merchants<E: std::fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<CursorPage<Merchant>, E>,
    ) -> Applied {
        if let Ok(page) = &result {
            self.directory.remember(&page.items);
        }
        self.merchant_search.apply(ticket, result)
    }

    pub fn merchant_search(&self) -> &CursorPager<Merchant, MerchantQuery> {
        &self.merchant_search
    }

    pub fn directory(&self) -> &MerchantDirectory {
        &self.directory
    }

    /// Toggles a merchant from the search results, keeping names aligned.
    pub fn toggle_merchant(&mut self, id: &str) -> bool {
        self.draft.toggle_merchant(id, &self.directory)
    }

    /// Validates and builds the constraint payload for submission.
    pub fn submit(&self, ctx: &BuildContext) -> Result<SpendingConstraintPayload, EngineError> {
        self.draft.prepare(&self.directory, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn merchant(id: &str, name: &str) -> Merchant {
        Merchant {
            id: id.to_string(),
            name: name.to_string(),
            mcc: None,
            category: None,
            country: None,
        }
    }

    fn ctx() -> BuildContext {
        BuildContext::new(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(), "UTC")
    }

    #[tokio::test(start_paused = true)]
    async fn search_then_select_keeps_name_after_results_clear() {
        let mut session = EditSession::new("acc_1");
        let now = Instant::now();
        session.search_input("acme", now);
        assert!(session.poll_search(now).is_none());

        let request = session.poll_search(now + DebounceConfig::default().quiet).unwrap();
        assert_eq!(request.query.search, "acme");
        assert_eq!(request.query.account_id, "acc_1");
        session.apply_merchants(
            request.ticket,
            Ok::<_, String>(CursorPage::last(vec![merchant("m_1", "Acme")])),
        );

        assert!(session.toggle_merchant("m_1"));
        session.search_input("a", now);
        assert!(session.merchant_search().items().is_empty());

        let payload = session.submit(&ctx()).unwrap();
        assert_eq!(payload.merchant_allow, Some(vec!["m_1".to_string()]));
        assert_eq!(payload.user_data.unwrap().merchant_names, vec!["Acme"]);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_account_drops_pending_search() {
        let mut session = EditSession::new("acc_1");
        let now = Instant::now();
        session.search_input("acme", now);
        session.set_account("acc_2");
        assert!(session.poll_search(now + DebounceConfig::default().quiet).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn results_for_previous_account_are_ignored() {
        let mut session = EditSession::new("acc_1");
        let now = Instant::now();
        session.search_input("acme", now);
        let request = session.poll_search(now + DebounceConfig::default().quiet).unwrap();

        session.set_account("acc_2");
        let applied = session.apply_merchants(
            request.ticket,
            Ok::<_, String>(CursorPage::last(vec![merchant("m_9", "Initech")])),
        );

        assert_eq!(applied, Applied::Stale);
        assert!(session.merchant_search().items().is_empty());
        assert!(session.merchant_search().query().is_none());
        assert_eq!(session.directory().label("m_9"), "Initech");
    }

    #[test]
    fn sessions_are_isolated() {
        let mut create = EditSession::new("acc_1");
        let edit = EditSession::editing(
            "acc_1",
            &SpendingConstraintPayload {
                mcc_allow: Some(vec!["5411".to_string()]),
                ..Default::default()
            },
        );
        create.draft.toggle_mcc("7011");
        assert_eq!(create.draft.mcc_codes.as_slice(), &["7011".to_string()]);
        assert_eq!(edit.draft.mcc_codes.as_slice(), &["5411".to_string()]);
    }
}
