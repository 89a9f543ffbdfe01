//! Cursor and offset pagination state machines.
//!
//! Both pagers split a fetch in two halves: a method that hands out a request
//! tagged with a [`Ticket`], and [`CursorPager::apply`] / [`OffsetPager::apply`]
//! which take the response back. A response whose ticket belongs to a query
//! that has since been reset is stale and is dropped without touching state.
//!
//! The `refresh`/`fetch_more`/`goto_page` helpers run both halves against a
//! [`CursorSource`] or [`PageSource`] when no interleaving is needed.
use std::{fmt, future::Future};

use api_types::paging::{CursorPage, PagedResult};

use crate::EngineError;

/// Fetches one cursor chunk (merchant search, transaction listing).
pub trait CursorSource {
    type Query;
    type Item;
    type Error: fmt::Display;

    /// `cursor` is `None` for the first chunk, the server's `nextCursor` verbatim after.
    fn fetch_chunk(
        &self,
        query: &Self::Query,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<CursorPage<Self::Item>, Self::Error>>;
}

/// Fetches one offset page (cards, card groups, virtual accounts).
pub trait PageSource {
    type Query;
    type Item;
    type Error: fmt::Display;

    /// `page` is zero-based.
    fn fetch_page(
        &self,
        query: &Self::Query,
        page: u32,
    ) -> impl Future<Output = Result<PagedResult<Self::Item>, Self::Error>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerStatus {
    Idle,
    /// First fetch after a reset.
    Loading,
    /// Continuation or page-change fetch.
    LoadingMore,
    Loaded,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    More,
    Page,
}

/// Identifies an issued request: the query generation it belongs to and its sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    sequence: u64,
    kind: FetchKind,
}

impl Ticket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// Outcome of handing a response back to a pager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// The response belonged to a superseded request and was dropped.
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorRequest<Q> {
    pub ticket: Ticket,
    pub query: Q,
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest<Q> {
    pub ticket: Ticket,
    pub query: Q,
    pub page: u32,
}

/// Accumulating cursor pager: page 0 on reset, append on load-more.
#[derive(Debug)]
pub struct CursorPager<T, Q> {
    query: Option<Q>,
    generation: u64,
    sequence: u64,
    items: Vec<T>,
    next_cursor: Option<String>,
    status: PagerStatus,
    in_flight: Option<Ticket>,
    last_error: Option<String>,
}

impl<T, Q> Default for CursorPager<T, Q> {
    fn default() -> Self {
        Self {
            query: None,
            generation: 0,
            sequence: 0,
            items: Vec::new(),
            next_cursor: None,
            status: PagerStatus::Idle,
            in_flight: None,
            last_error: None,
        }
    }
}

impl<T, Q: Clone> CursorPager<T, Q> {
    pub fn new() -> Self {
        Self::default()
    }

    fn ticket(&mut self, kind: FetchKind) -> Ticket {
        self.sequence += 1;
        Ticket {
            generation: self.generation,
            sequence: self.sequence,
            kind,
        }
    }

    /// Clears the accumulation and issues the first fetch for `query`.
    ///
    /// Any request still in flight becomes stale.
    pub fn reset(&mut self, query: Q) -> CursorRequest<Q> {
        self.generation += 1;
        self.query = Some(query.clone());
        self.items.clear();
        self.next_cursor = None;
        self.last_error = None;
        self.status = PagerStatus::Loading;
        let ticket = self.ticket(FetchKind::Initial);
        self.in_flight = Some(ticket);
        CursorRequest {
            ticket,
            query,
            cursor: None,
        }
    }

    /// Issues a continuation fetch with the stored cursor.
    ///
    /// Returns `None` when exhausted or while another fetch is in flight.
    pub fn load_more(&mut self) -> Option<CursorRequest<Q>> {
        if self.in_flight.is_some() {
            return None;
        }
        let cursor = self.next_cursor.clone()?;
        let query = self.query.clone()?;
        self.status = PagerStatus::LoadingMore;
        let ticket = self.ticket(FetchKind::More);
        self.in_flight = Some(ticket);
        Some(CursorRequest {
            ticket,
            query,
            cursor: Some(cursor),
        })
    }

    /// Hands a response back. Stale responses are dropped silently.
    ///
    /// A failed continuation keeps the accumulated items and the cursor so
    /// the user can retry.
    pub fn apply<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<CursorPage<T>, E>,
    ) -> Applied {
        if ticket.generation != self.generation || self.in_flight != Some(ticket) {
            tracing::debug!("discarding stale cursor response ({:?})", ticket.kind);
            return Applied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                match ticket.kind {
                    FetchKind::More => self.items.extend(page.items),
                    FetchKind::Initial | FetchKind::Page => self.items = page.items,
                }
                self.next_cursor = page.next_cursor;
                self.last_error = None;
                self.status = PagerStatus::Loaded;
            }
            Err(err) => {
                tracing::warn!("cursor fetch failed: {err}");
                self.last_error = Some(err.to_string());
                self.status = PagerStatus::Error;
            }
        }
        Applied::Applied
    }

    /// Reset + fetch + apply.
    pub async fn refresh<S>(&mut self, source: &S, query: Q) -> Applied
    where
        S: CursorSource<Query = Q, Item = T>,
    {
        let request = self.reset(query);
        let result = source
            .fetch_chunk(&request.query, request.cursor.as_deref())
            .await;
        self.apply(request.ticket, result)
    }

    /// Load-more + fetch + apply; `None` when there was nothing to load.
    pub async fn fetch_more<S>(&mut self, source: &S) -> Option<Applied>
    where
        S: CursorSource<Query = Q, Item = T>,
    {
        let request = self.load_more()?;
        let result = source
            .fetch_chunk(&request.query, request.cursor.as_deref())
            .await;
        Some(self.apply(request.ticket, result))
    }

    /// Drops results, cursor and query; in-flight responses become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.query = None;
        self.items.clear();
        self.next_cursor = None;
        self.in_flight = None;
        self.last_error = None;
        self.status = PagerStatus::Idle;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn status(&self) -> PagerStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == PagerStatus::Loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.status == PagerStatus::LoadingMore
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Offset pager: one displayed page, replaced on every page change.
///
/// `total_pages`/`total_elements` from the server decide which pages exist.
#[derive(Debug)]
pub struct OffsetPager<T, Q> {
    query: Option<Q>,
    generation: u64,
    sequence: u64,
    content: Vec<T>,
    page: u32,
    total_pages: u32,
    total_elements: u64,
    status: PagerStatus,
    in_flight: Option<Ticket>,
    last_error: Option<String>,
}

impl<T, Q> Default for OffsetPager<T, Q> {
    fn default() -> Self {
        Self {
            query: None,
            generation: 0,
            sequence: 0,
            content: Vec::new(),
            page: 0,
            total_pages: 0,
            total_elements: 0,
            status: PagerStatus::Idle,
            in_flight: None,
            last_error: None,
        }
    }
}

impl<T, Q: Clone> OffsetPager<T, Q> {
    pub fn new() -> Self {
        Self::default()
    }

    fn ticket(&mut self, kind: FetchKind) -> Ticket {
        self.sequence += 1;
        Ticket {
            generation: self.generation,
            sequence: self.sequence,
            kind,
        }
    }

    /// Clears the displayed page and requests page 0 for `query`.
    pub fn reset(&mut self, query: Q) -> PageRequest<Q> {
        self.generation += 1;
        self.query = Some(query.clone());
        self.content.clear();
        self.page = 0;
        self.total_pages = 0;
        self.total_elements = 0;
        self.last_error = None;
        self.status = PagerStatus::Loading;
        let ticket = self.ticket(FetchKind::Initial);
        self.in_flight = Some(ticket);
        PageRequest {
            ticket,
            query,
            page: 0,
        }
    }

    /// Requests page `page`. Out-of-range pages are rejected before any request.
    ///
    /// Only the latest page request is applied; earlier ones become stale.
    pub fn goto(&mut self, page: i64) -> Result<PageRequest<Q>, EngineError> {
        let out_of_range = EngineError::PageOutOfRange {
            page,
            total_pages: self.total_pages,
        };
        let Some(query) = self.query.clone() else {
            return Err(out_of_range);
        };
        let Ok(index) = u32::try_from(page) else {
            tracing::debug!("rejecting page request {page}");
            return Err(out_of_range);
        };
        if index >= self.total_pages {
            tracing::debug!("rejecting page request {page} of {}", self.total_pages);
            return Err(out_of_range);
        }

        self.generation += 1;
        self.status = PagerStatus::LoadingMore;
        let ticket = self.ticket(FetchKind::Page);
        self.in_flight = Some(ticket);
        Ok(PageRequest {
            ticket,
            query,
            page: index,
        })
    }

    pub fn next_page(&mut self) -> Option<PageRequest<Q>> {
        self.goto(i64::from(self.page) + 1).ok()
    }

    pub fn prev_page(&mut self) -> Option<PageRequest<Q>> {
        self.goto(i64::from(self.page) - 1).ok()
    }

    /// Hands a response back. Stale responses are dropped silently.
    ///
    /// A failed page change keeps the previously displayed page.
    pub fn apply<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<PagedResult<T>, E>,
    ) -> Applied {
        if ticket.generation != self.generation || self.in_flight != Some(ticket) {
            tracing::debug!("discarding stale page response ({:?})", ticket.kind);
            return Applied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(result) => {
                self.content = result.content;
                self.page = result.page;
                self.total_pages = result.total_pages;
                self.total_elements = result.total_elements;
                self.last_error = None;
                self.status = PagerStatus::Loaded;
            }
            Err(err) => {
                tracing::warn!("page fetch failed: {err}");
                self.last_error = Some(err.to_string());
                self.status = PagerStatus::Error;
            }
        }
        Applied::Applied
    }

    /// Reset + fetch + apply.
    pub async fn refresh<S>(&mut self, source: &S, query: Q) -> Applied
    where
        S: PageSource<Query = Q, Item = T>,
    {
        let request = self.reset(query);
        let result = source.fetch_page(&request.query, request.page).await;
        self.apply(request.ticket, result)
    }

    /// Goto + fetch + apply.
    pub async fn goto_page<S>(&mut self, source: &S, page: i64) -> Result<Applied, EngineError>
    where
        S: PageSource<Query = Q, Item = T>,
    {
        let request = self.goto(page)?;
        let result = source.fetch_page(&request.query, request.page).await;
        Ok(self.apply(request.ticket, result))
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0 && self.total_pages > 0
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    pub fn status(&self) -> PagerStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, PagerStatus::Loading | PagerStatus::LoadingMore)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
