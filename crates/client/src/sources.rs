//! Adapters exposing [`ApiClient`] endpoints as engine pager sources.
use api_types::{
    account::VirtualAccount,
    card::{Card, CardListQuery},
    card_group::{CardGroup, CardGroupListQuery},
    merchant::Merchant,
    paging::{CursorPage, PagedResult},
    transaction::Transaction,
};
use engine::{CursorSource, MerchantQuery, PageSource};

use crate::{ApiClient, ClientError, TransactionQuery};

pub struct MerchantSearch<'a>(pub &'a ApiClient);

impl CursorSource for MerchantSearch<'_> {
    type Query = MerchantQuery;
    type Item = Merchant;
    type Error = ClientError;

    async fn fetch_chunk(
        &self,
        query: &MerchantQuery,
        cursor: Option<&str>,
    ) -> Result<CursorPage<Merchant>, ClientError> {
        self.0
            .search_merchants(&query.account_id, Some(query.search.as_str()), cursor)
            .await
    }
}

pub struct TransactionFeed<'a>(pub &'a ApiClient);

impl CursorSource for TransactionFeed<'_> {
    type Query = TransactionQuery;
    type Item = Transaction;
    type Error = ClientError;

    async fn fetch_chunk(
        &self,
        query: &TransactionQuery,
        cursor: Option<&str>,
    ) -> Result<CursorPage<Transaction>, ClientError> {
        self.0.list_transactions(query, cursor).await
    }
}

pub struct CardPages<'a>(pub &'a ApiClient);

impl PageSource for CardPages<'_> {
    type Query = CardListQuery;
    type Item = Card;
    type Error = ClientError;

    async fn fetch_page(
        &self,
        query: &CardListQuery,
        page: u32,
    ) -> Result<PagedResult<Card>, ClientError> {
        self.0.list_cards(query, page).await
    }
}

pub struct CardGroupPages<'a>(pub &'a ApiClient);

impl PageSource for CardGroupPages<'_> {
    type Query = CardGroupListQuery;
    type Item = CardGroup;
    type Error = ClientError;

    async fn fetch_page(
        &self,
        query: &CardGroupListQuery,
        page: u32,
    ) -> Result<PagedResult<CardGroup>, ClientError> {
        self.0.list_card_groups(query, page).await
    }
}

/// Query is the owning account id.
pub struct VirtualAccountPages<'a>(pub &'a ApiClient);

impl PageSource for VirtualAccountPages<'_> {
    type Query = String;
    type Item = VirtualAccount;
    type Error = ClientError;

    async fn fetch_page(
        &self,
        account_id: &String,
        page: u32,
    ) -> Result<PagedResult<VirtualAccount>, ClientError> {
        self.0.virtual_accounts(account_id, page).await
    }
}
