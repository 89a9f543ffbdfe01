use api_types::{
    account::{Account, VirtualAccount},
    card::{Card, CardDetail, CardListQuery, CardNew, CardUpdate},
    card_group::{CardGroup, CardGroupConstraintUpdate, CardGroupListQuery},
    merchant::{Merchant, MerchantSearchResponse},
    meta::{CountryOption, MccOption, MerchantCategoryOption},
    paging::{CursorPage, PagedResult},
    transaction::{Transaction, TransactionListResponse},
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{error::ClientError, query::TransactionQuery};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

const NO_QUERY: [(&str, &str); 0] = [];

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Backend REST client.
///
/// Every call maps non-2xx responses to a [`ClientError`] carrying the
/// backend's message when it sent one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
    page_size: u32,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // `Url::join` replaces the last path segment unless it ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Opaque bearer token sent on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let mut req = self.http.request(method, self.endpoint(path)?);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn read<TResp: DeserializeOwned>(res: Response) -> Result<TResp, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<TResp>().await?);
        }

        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.message));
        tracing::warn!("backend responded {status}: {message:?}");
        Err(ClientError::from_status(status, message))
    }

    async fn get_json<TQuery, TResp>(&self, path: &str, query: &TQuery) -> Result<TResp, ClientError>
    where
        TQuery: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let res = self.request(Method::GET, path)?.query(query).send().await?;
        Self::read(res).await
    }

    async fn send_json<TReq, TResp>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
    ) -> Result<TResp, ClientError>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let res = self.request(method, path)?.json(body).send().await?;
        Self::read(res).await
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ClientError> {
        self.get_json("accounts", &NO_QUERY).await
    }

    pub async fn virtual_accounts(
        &self,
        account_id: &str,
        page: u32,
    ) -> Result<PagedResult<VirtualAccount>, ClientError> {
        let query = [
            ("accountId", account_id.to_string()),
            ("page", page.to_string()),
            ("size", self.page_size.to_string()),
        ];
        self.get_json("virtual-accounts", &query).await
    }

    pub async fn list_cards(
        &self,
        query: &CardListQuery,
        page: u32,
    ) -> Result<PagedResult<Card>, ClientError> {
        let mut params = vec![
            ("page", page.to_string()),
            ("size", self.page_size.to_string()),
        ];
        push_non_empty(&mut params, "virtualAccountId", query.virtual_account_id.as_deref());
        push_non_empty(&mut params, "search", query.search.as_deref());
        push_non_empty(&mut params, "status", query.status.map(|s| s.as_str()));
        self.get_json("cards", &params).await
    }

    /// Creates a card. The request carries a fresh `Idempotency-Key`.
    pub async fn create_card(&self, payload: &CardNew) -> Result<Card, ClientError> {
        let key = uuid::Uuid::new_v4().to_string();
        tracing::info!("creating card {:?} (idempotency key {key})", payload.name);
        let res = self
            .request(Method::POST, "cards")?
            .header("Idempotency-Key", key)
            .json(payload)
            .send()
            .await?;
        Self::read(res).await
    }

    pub async fn update_card(&self, card_id: &str, payload: &CardUpdate) -> Result<Card, ClientError> {
        self.send_json(Method::PUT, &format!("cards/{card_id}"), payload)
            .await
    }

    pub async fn card_detail(
        &self,
        card_id: &str,
        include_pan: bool,
        include_cvv: bool,
    ) -> Result<CardDetail, ClientError> {
        let query = [
            ("includePan", include_pan.to_string()),
            ("includeCvv", include_cvv.to_string()),
        ];
        self.get_json(&format!("cards/{card_id}/detail"), &query)
            .await
    }

    /// Fetches the sensitive fields of `card` and merges them in place.
    pub async fn reveal_card(
        &self,
        card: &mut Card,
        include_pan: bool,
        include_cvv: bool,
    ) -> Result<(), ClientError> {
        let detail = self.card_detail(&card.id, include_pan, include_cvv).await?;
        card.merge_detail(detail);
        Ok(())
    }

    pub async fn list_card_groups(
        &self,
        query: &CardGroupListQuery,
        page: u32,
    ) -> Result<PagedResult<CardGroup>, ClientError> {
        let mut params = vec![
            ("accountId", query.account_id.clone()),
            ("page", page.to_string()),
            ("size", self.page_size.to_string()),
        ];
        push_non_empty(&mut params, "virtualAccountId", query.virtual_account_id.as_deref());
        push_non_empty(&mut params, "search", query.search.as_deref());
        self.get_json("card-groups", &params).await
    }

    pub async fn update_card_group_constraint(
        &self,
        group_id: &str,
        payload: &CardGroupConstraintUpdate,
    ) -> Result<CardGroup, ClientError> {
        self.send_json(
            Method::PUT,
            &format!("card-groups/{group_id}/spending-constraint"),
            payload,
        )
        .await
    }

    pub async fn search_merchants(
        &self,
        account_id: &str,
        search: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<CursorPage<Merchant>, ClientError> {
        let mut params = vec![("accountId", account_id.to_string())];
        push_non_empty(&mut params, "search", search);
        push_non_empty(&mut params, "cursor", cursor);
        let response: MerchantSearchResponse = self.get_json("merchants", &params).await?;
        Ok(response.into())
    }

    pub async fn list_transactions(
        &self,
        query: &TransactionQuery,
        cursor: Option<&str>,
    ) -> Result<CursorPage<Transaction>, ClientError> {
        let params = query.to_params(cursor);
        let response: TransactionListResponse = self.get_json("transactions", &params).await?;
        Ok(response.into())
    }

    pub async fn countries(&self) -> Result<Vec<CountryOption>, ClientError> {
        self.get_json("meta/countries", &NO_QUERY).await
    }

    pub async fn mcc_codes(&self) -> Result<Vec<MccOption>, ClientError> {
        self.get_json("meta/mcc-codes", &NO_QUERY).await
    }

    pub async fn merchant_categories(&self) -> Result<Vec<MerchantCategoryOption>, ClientError> {
        self.get_json("merchant-categories", &NO_QUERY).await
    }

    /// Loads the three metadata lists and indexes them for label lookups.
    pub async fn resolvers(&self) -> Result<engine::Resolvers, ClientError> {
        let countries = self.countries().await?;
        let mcc_codes = self.mcc_codes().await?;
        let categories = self.merchant_categories().await?;
        Ok(engine::Resolvers::new(&countries, &mcc_codes, &categories))
    }
}

fn push_non_empty(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        params.push((key, value.to_string()));
    }
}
