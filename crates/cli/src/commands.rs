use std::collections::BTreeMap;

use api_types::{
    card::{Card, CardListQuery, CardStatus},
    card_group::{CardGroup, CardGroupListQuery},
    merchant::Merchant,
};
use chrono_tz::Tz;
use clap::{Args, Subcommand, ValueEnum};
use client::{
    ApiClient, TransactionQuery,
    sources::{CardGroupPages, CardPages, MerchantSearch, TransactionFeed, VirtualAccountPages},
};
use engine::{
    BuildContext, CardDraft, CardEdit, CardGroupEdit, CursorPager, CursorRequest, CursorSource,
    DebounceConfig, EditSession, EngineError, LimitSetting, MerchantQuery, OffsetPager,
    PageSource, Resolvers, SearchEvent, SearchTrigger, post_filter,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    output,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the accounts visible to the token.
    Accounts,
    /// List virtual accounts of the configured account.
    VirtualAccounts(PageArgs),
    #[command(subcommand)]
    Cards(CardCommand),
    #[command(subcommand)]
    Groups(GroupCommand),
    #[command(subcommand)]
    Merchants(MerchantCommand),
    #[command(subcommand)]
    Transactions(TransactionCommand),
    #[command(subcommand)]
    Meta(MetaCommand),
}

#[derive(Args, Debug, Default)]
pub struct PageArgs {
    /// Zero-based page number.
    #[arg(long, default_value_t = 0)]
    page: i64,
}

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    List(CardListArgs),
    Create(CardCreateArgs),
    Update(CardUpdateArgs),
    /// Show one card, optionally revealing its number and CVV.
    Detail(CardDetailArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Active,
    Suspended,
    Terminated,
}

impl From<StatusArg> for CardStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Active => CardStatus::Active,
            StatusArg::Suspended => CardStatus::Suspended,
            StatusArg::Terminated => CardStatus::Terminated,
        }
    }
}

#[derive(Args, Debug)]
pub struct CardListArgs {
    #[arg(long)]
    virtual_account: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    /// Resolve country/MCC/category codes to labels.
    #[arg(long)]
    labels: bool,
    #[command(flatten)]
    page: PageArgs,
}

/// Selection and limit flags shared by create and edit commands.
///
/// Selection flags toggle: naming an already selected value removes it.
#[derive(Args, Debug, Default)]
pub struct ConstraintArgs {
    /// Country code (ISO 3166-1 alpha-2); repeatable.
    #[arg(long = "country")]
    countries: Vec<String>,
    /// Merchant category code; repeatable.
    #[arg(long = "mcc")]
    mcc_codes: Vec<String>,
    /// Merchant category id; repeatable.
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Merchant as `ID` or `ID=Name`; repeatable.
    #[arg(long = "merchant")]
    merchants: Vec<String>,
    /// Daily spending limit in dollars. An empty value clears it.
    #[arg(long)]
    daily_limit: Option<String>,
    /// Minimum transaction size in dollars. An empty value clears it.
    #[arg(long)]
    min_amount: Option<String>,
    /// Maximum transaction size in dollars. An empty value clears it.
    #[arg(long)]
    max_amount: Option<String>,
}

impl ConstraintArgs {
    fn apply(&self, session: &mut EditSession) -> Result<()> {
        for code in &self.countries {
            if !session.draft.toggle_country(code) {
                tracing::debug!("country {code:?} deselected or ignored");
            }
        }
        for code in &self.mcc_codes {
            session.draft.toggle_mcc(code);
        }
        for id in &self.categories {
            session.draft.toggle_merchant_category(id);
        }
        for merchant in &self.merchants {
            match merchant.split_once('=') {
                Some((id, name)) => {
                    session.draft.merchants.toggle(id.trim(), name.trim());
                }
                None => {
                    session.toggle_merchant(merchant.trim());
                }
            }
        }

        let limits = &mut session.draft.limits;
        if let Some(text) = &self.daily_limit {
            limits.utilization = LimitSetting::from_text(text)?;
        }
        if let Some(text) = &self.min_amount {
            limits.minimum = LimitSetting::from_text(text)?;
        }
        if let Some(text) = &self.max_amount {
            limits.maximum = LimitSetting::from_text(text)?;
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CardCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    virtual_account: Option<String>,
    #[arg(long)]
    group: Option<String>,
    #[command(flatten)]
    constraint: ConstraintArgs,
}

#[derive(Args, Debug)]
pub struct CardUpdateArgs {
    id: String,
    /// Virtual account to look the card up in.
    #[arg(long)]
    virtual_account: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    /// Start from an empty constraint instead of the card's current one.
    #[arg(long)]
    replace: bool,
    #[command(flatten)]
    constraint: ConstraintArgs,
}

#[derive(Args, Debug)]
pub struct CardDetailArgs {
    id: String,
    #[arg(long)]
    pan: bool,
    #[arg(long)]
    cvv: bool,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    List(GroupListArgs),
    /// Replace or adjust a card group's spending constraint.
    Constrain(GroupConstrainArgs),
}

#[derive(Args, Debug)]
pub struct GroupListArgs {
    #[arg(long)]
    virtual_account: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    labels: bool,
    #[command(flatten)]
    page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GroupConstrainArgs {
    id: String,
    #[arg(long)]
    replace: bool,
    #[command(flatten)]
    constraint: ConstraintArgs,
}

#[derive(Subcommand, Debug)]
pub enum MerchantCommand {
    /// One debounced search, following up to `--pages` cursors.
    Search {
        text: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Read search text from stdin, one line per keystroke batch.
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    List(TransactionListArgs),
}

#[derive(Args, Debug)]
pub struct TransactionListArgs {
    #[arg(long)]
    virtual_account: Option<String>,
    /// Server-side filter as `key=value` (status, from, to); repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
    /// Client-side text match over the loaded transactions.
    #[arg(long)]
    grep: Option<String>,
    /// How many cursor chunks to load.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

#[derive(Subcommand, Debug)]
pub enum MetaCommand {
    Countries,
    Mcc,
    Categories,
}

pub struct Context {
    pub client: ApiClient,
    pub config: AppConfig,
    pub json: bool,
}

impl Context {
    fn account_id(&self) -> Result<&str> {
        match self.config.account_id.trim() {
            "" => Err(EngineError::MissingAccount.into()),
            id => Ok(id),
        }
    }

    fn build_context(&self) -> Result<BuildContext> {
        Ok(BuildContext::now_in(&self.config.timezone)?)
    }

    fn timezone(&self) -> Result<Tz> {
        self.config
            .timezone
            .parse::<Tz>()
            .map_err(|_| EngineError::InvalidTimezone(self.config.timezone.clone()).into())
    }

    async fn resolvers(&self, wanted: bool) -> Result<Option<Resolvers>> {
        if !wanted {
            return Ok(None);
        }
        Ok(Some(self.client.resolvers().await?))
    }
}

pub async fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Accounts => {
            let accounts = ctx.client.accounts().await?;
            if ctx.json {
                return output::print_json(&accounts);
            }
            for account in accounts {
                println!("{:<20} {}", account.id, account.name);
            }
        }
        Command::VirtualAccounts(args) => {
            let account_id = ctx.account_id()?.to_string();
            let mut pager = OffsetPager::new();
            load_page(&mut pager, &VirtualAccountPages(&ctx.client), account_id, args.page)
                .await?;
            if ctx.json {
                return output::print_json(pager.content());
            }
            for va in pager.content() {
                let balance = va
                    .balance_cents
                    .map(|c| engine::MoneyCents::new(c).to_string())
                    .unwrap_or_default();
                println!("{:<20} {:<24} {balance}", va.id, va.name);
            }
            print_page_footer(&pager);
        }
        Command::Cards(command) => cards(ctx, command).await?,
        Command::Groups(command) => groups(ctx, command).await?,
        Command::Merchants(command) => merchants(ctx, command).await?,
        Command::Transactions(TransactionCommand::List(args)) => transactions(ctx, args).await?,
        Command::Meta(command) => meta(ctx, command).await?,
    }
    Ok(())
}

/// Loads page 0 for `query`, then jumps to `page` if asked.
async fn load_page<S>(
    pager: &mut OffsetPager<S::Item, S::Query>,
    source: &S,
    query: S::Query,
    page: i64,
) -> Result<()>
where
    S: PageSource,
    S::Query: Clone,
{
    pager.refresh(source, query).await;
    if page != 0 && pager.last_error().is_none() {
        pager.goto_page(source, page).await?;
    }
    match pager.last_error() {
        Some(err) => Err(AppError::Fetch(err.to_string())),
        None => Ok(()),
    }
}

fn print_page_footer<T, Q: Clone>(pager: &OffsetPager<T, Q>) {
    println!(
        "page {}/{} ({} total)",
        pager.page() + 1,
        pager.total_pages().max(1),
        pager.total_elements()
    );
}

async fn cards(ctx: &Context, command: CardCommand) -> Result<()> {
    match command {
        CardCommand::List(args) => {
            let query = CardListQuery {
                virtual_account_id: args.virtual_account,
                search: args.search,
                status: args.status.map(CardStatus::from),
            };
            let mut pager = OffsetPager::new();
            load_page(&mut pager, &CardPages(&ctx.client), query, args.page.page).await?;
            if ctx.json {
                return output::print_json(pager.content());
            }
            let resolvers = ctx.resolvers(args.labels).await?;
            for card in pager.content() {
                println!("{}", output::card_line(card, resolvers.as_ref()));
            }
            print_page_footer(&pager);
        }
        CardCommand::Create(args) => {
            let account_id = ctx.account_id()?.to_string();
            let mut session = EditSession::new(account_id.clone());
            args.constraint.apply(&mut session)?;
            let draft = CardDraft {
                account_id: Some(account_id),
                virtual_account_id: args.virtual_account,
                card_group_id: args.group,
                name: args.name,
            };
            let payload = draft.build(&session, &ctx.build_context()?)?;
            let card = ctx.client.create_card(&payload).await?;
            tracing::info!("created card {}", card.id);
            print_card(ctx, &card)?;
        }
        CardCommand::Update(args) => {
            let existing = find_card(ctx, &args.id, args.virtual_account.clone()).await?;
            let mut session = if args.replace {
                EditSession::new(existing.account_id.clone())
            } else {
                CardEdit::session_for(&existing)
            };
            args.constraint.apply(&mut session)?;
            let edit = CardEdit {
                status: args.status.map(CardStatus::from),
            };
            let payload = edit.build(&session, &ctx.build_context()?)?;
            let card = ctx.client.update_card(&existing.id, &payload).await?;
            print_card(ctx, &card)?;
        }
        CardCommand::Detail(args) => {
            let detail = ctx.client.card_detail(&args.id, args.pan, args.cvv).await?;
            if ctx.json {
                return output::print_json(&detail);
            }
            let masked = detail
                .last4
                .as_deref()
                .map(|last4| format!("**** **** **** {last4}"))
                .unwrap_or_else(|| "unavailable".to_string());
            println!("number: {}", detail.pan.as_deref().unwrap_or(&masked));
            if let (Some(month), Some(year)) = (detail.expiry_month, detail.expiry_year) {
                println!("expiry: {month:02}/{year}");
            }
            if let Some(cvv) = &detail.cvv {
                println!("cvv:    {cvv}");
            }
        }
    }
    Ok(())
}

fn print_card(ctx: &Context, card: &Card) -> Result<()> {
    if ctx.json {
        return output::print_json(card);
    }
    println!("{}", output::card_line(card, None));
    println!("number: {}", output::masked_pan(card));
    Ok(())
}

/// Walks the card listing until `id` shows up.
async fn find_card(ctx: &Context, id: &str, virtual_account_id: Option<String>) -> Result<Card> {
    let query = CardListQuery {
        virtual_account_id,
        ..Default::default()
    };
    find_in_pages(&CardPages(&ctx.client), query, |card: &Card| card.id == id)
        .await?
        .ok_or_else(|| AppError::Usage(format!("card {id} not found")))
}

async fn find_group(ctx: &Context, id: &str) -> Result<CardGroup> {
    let query = CardGroupListQuery {
        account_id: ctx.account_id()?.to_string(),
        ..Default::default()
    };
    find_in_pages(&CardGroupPages(&ctx.client), query, |group: &CardGroup| {
        group.id == id
    })
    .await?
    .ok_or_else(|| AppError::Usage(format!("card group {id} not found")))
}

async fn find_in_pages<S, F>(source: &S, query: S::Query, matches: F) -> Result<Option<S::Item>>
where
    S: PageSource,
    S::Query: Clone,
    S::Item: Clone,
    F: Fn(&S::Item) -> bool,
{
    let mut pager = OffsetPager::new();
    pager.refresh(source, query).await;
    loop {
        if let Some(err) = pager.last_error() {
            return Err(AppError::Fetch(err.to_string()));
        }
        if let Some(found) = pager.content().iter().find(|&item| matches(item)) {
            return Ok(Some(found.clone()));
        }
        let Some(request) = pager.next_page() else {
            return Ok(None);
        };
        let result = source.fetch_page(&request.query, request.page).await;
        pager.apply(request.ticket, result);
    }
}

async fn groups(ctx: &Context, command: GroupCommand) -> Result<()> {
    match command {
        GroupCommand::List(args) => {
            let query = CardGroupListQuery {
                account_id: ctx.account_id()?.to_string(),
                virtual_account_id: args.virtual_account,
                search: args.search,
            };
            let mut pager = OffsetPager::new();
            load_page(&mut pager, &CardGroupPages(&ctx.client), query, args.page.page).await?;
            if ctx.json {
                return output::print_json(pager.content());
            }
            let resolvers = ctx.resolvers(args.labels).await?;
            for group in pager.content() {
                println!("{}", output::group_line(group, resolvers.as_ref()));
            }
            print_page_footer(&pager);
        }
        GroupCommand::Constrain(args) => {
            let group = find_group(ctx, &args.id).await?;
            let mut session = if args.replace {
                EditSession::new(group.account_id.clone())
            } else {
                CardGroupEdit::session_for(&group)
            };
            args.constraint.apply(&mut session)?;
            let payload = CardGroupEdit.build(&session, &ctx.build_context()?)?;
            let updated = ctx
                .client
                .update_card_group_constraint(&group.id, &payload)
                .await?;
            if ctx.json {
                return output::print_json(&updated);
            }
            println!("{}", output::group_line(&updated, None));
        }
    }
    Ok(())
}

async fn merchants(ctx: &Context, command: MerchantCommand) -> Result<()> {
    let source = MerchantSearch(&ctx.client);
    let mut session = EditSession::new(ctx.account_id()?);

    match command {
        MerchantCommand::Search { text, pages } => {
            let now = tokio::time::Instant::now();
            session.search_input(&text, now);
            let Some(deadline) = session.search_deadline() else {
                return Err(AppError::Usage(format!(
                    "search text must be at least {} characters",
                    engine::MIN_SEARCH_LEN
                )));
            };
            tokio::time::sleep_until(deadline).await;

            let request = session.poll_search(deadline);
            collect_merchants(&mut session, &source, request, pages).await;

            let search = session.merchant_search();
            if ctx.json {
                output::print_json(search.items())?;
            } else {
                for merchant in search.items() {
                    println!(
                        "{:<20} {:<32} {}",
                        merchant.id,
                        merchant.name,
                        merchant.mcc.as_deref().unwrap_or("")
                    );
                }
            }
            if let Some(err) = search.last_error() {
                return Err(AppError::Fetch(err.to_string()));
            }
            if search.has_more() && !ctx.json {
                println!("more results available (--pages {})", pages + 1);
            }
        }
        MerchantCommand::Watch => watch_merchants(ctx, &source).await?,
    }
    Ok(())
}

/// Runs `first` and follows the cursor until `pages` chunks are loaded.
///
/// Stops at the first failure; the session keeps what was loaded before it.
async fn collect_merchants<S>(
    session: &mut EditSession,
    source: &S,
    first: Option<CursorRequest<MerchantQuery>>,
    pages: u32,
) where
    S: CursorSource<Query = MerchantQuery, Item = Merchant>,
{
    let mut request = first;
    let mut fetched = 0;
    while let Some(next) = request.take() {
        let result = source.fetch_chunk(&next.query, next.cursor.as_deref()).await;
        session.apply_merchants(next.ticket, result);
        fetched += 1;
        if fetched < pages && session.merchant_search().last_error().is_none() {
            request = session.load_more_merchants();
        }
    }
}

/// Follows the cursor of an already refreshed pager for up to `pages` chunks in total.
async fn load_chunks<S>(pager: &mut CursorPager<S::Item, S::Query>, source: &S, pages: u32)
where
    S: CursorSource,
    S::Query: Clone,
{
    for _ in 1..pages.max(1) {
        if pager.last_error().is_some() || pager.fetch_more(source).await.is_none() {
            break;
        }
    }
}

/// Feeds stdin lines through the debouncer and prints each settled search.
async fn watch_merchants(ctx: &Context, source: &MerchantSearch<'_>) -> Result<()> {
    let account_id = ctx.account_id()?.to_string();
    let (trigger, mut events) = SearchTrigger::spawn(DebounceConfig::default());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut results = CursorPager::new();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => trigger.input(line).await,
                None => break,
            },
            event = events.recv() => match event {
                Some(SearchEvent::Clear) => {
                    results.clear();
                    println!("(cleared)");
                }
                Some(SearchEvent::Search(search)) => {
                    let query = MerchantQuery {
                        account_id: account_id.clone(),
                        search,
                    };
                    results.refresh(source, query).await;
                    match results.last_error() {
                        Some(err) => eprintln!("search failed: {err}"),
                        None => {
                            for merchant in results.items() {
                                println!("{:<20} {}", merchant.id, merchant.name);
                            }
                        }
                    }
                }
                None => break,
            },
        }
    }
    Ok(())
}

async fn transactions(ctx: &Context, args: TransactionListArgs) -> Result<()> {
    let source = TransactionFeed(&ctx.client);
    let mut query = TransactionQuery::new(ctx.account_id()?);
    if let Some(va) = args.virtual_account {
        query = query.virtual_account(va);
    }
    let filters: BTreeMap<String, String> = args.filters.into_iter().collect();
    for (key, value) in filters {
        query = query.filter(key, value);
    }

    let mut pager = CursorPager::new();
    pager.refresh(&source, query).await;
    load_chunks(&mut pager, &source, args.pages).await;

    let shown = post_filter(pager.items(), args.grep.as_deref().unwrap_or(""));
    if ctx.json {
        output::print_json(&shown)?;
    } else {
        let tz = ctx.timezone()?;
        for tx in &shown {
            println!("{}", output::transaction_line(tx, tz));
        }
    }
    if let Some(err) = pager.last_error() {
        return Err(AppError::Fetch(err.to_string()));
    }
    if pager.has_more() && !ctx.json {
        println!("more transactions available (--pages {})", args.pages + 1);
    }
    Ok(())
}

async fn meta(ctx: &Context, command: MetaCommand) -> Result<()> {
    let rows: Vec<(String, String)> = match command {
        MetaCommand::Countries => ctx
            .client
            .countries()
            .await?
            .into_iter()
            .map(|c| (c.code, c.name))
            .collect(),
        MetaCommand::Mcc => ctx
            .client
            .mcc_codes()
            .await?
            .into_iter()
            .map(|m| (m.code, m.description))
            .collect(),
        MetaCommand::Categories => ctx
            .client
            .merchant_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect(),
    };
    if ctx.json {
        return output::print_json(&rows);
    }
    for (code, label) in rows {
        println!("{code:<12} {label}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use api_types::paging::CursorPage;

    use super::*;

    /// Serves `next-N` cursors and fails every chunk after the first.
    #[derive(Default)]
    struct FlakySource {
        cursors: RefCell<Vec<Option<String>>>,
    }

    impl FlakySource {
        fn chunk<T>(
            &self,
            cursor: Option<&str>,
            item: T,
        ) -> std::result::Result<CursorPage<T>, String> {
            let mut seen = self.cursors.borrow_mut();
            seen.push(cursor.map(str::to_string));
            if seen.len() > 1 {
                return Err("502 bad gateway".to_string());
            }
            Ok(CursorPage {
                items: vec![item],
                next_cursor: Some(format!("next-{}", seen.len())),
            })
        }
    }

    impl CursorSource for FlakySource {
        type Query = String;
        type Item = String;
        type Error = String;

        async fn fetch_chunk(
            &self,
            _query: &String,
            cursor: Option<&str>,
        ) -> std::result::Result<CursorPage<String>, String> {
            self.chunk(cursor, "tx_1".to_string())
        }
    }

    struct FlakyMerchants(FlakySource);

    impl CursorSource for FlakyMerchants {
        type Query = MerchantQuery;
        type Item = Merchant;
        type Error = String;

        async fn fetch_chunk(
            &self,
            _query: &MerchantQuery,
            cursor: Option<&str>,
        ) -> std::result::Result<CursorPage<Merchant>, String> {
            let merchant = Merchant {
                id: "m_1".to_string(),
                name: "Acme".to_string(),
                mcc: None,
                category: None,
                country: None,
            };
            self.0.chunk(cursor, merchant)
        }
    }

    #[tokio::test]
    async fn failed_continuation_stops_paging_and_keeps_items() {
        let source = FlakySource::default();
        let mut pager = CursorPager::new();
        pager.refresh(&source, "acc_1".to_string()).await;
        load_chunks(&mut pager, &source, 5).await;

        assert_eq!(
            *source.cursors.borrow(),
            vec![None, Some("next-1".to_string())]
        );
        assert_eq!(pager.items(), &["tx_1".to_string()]);
        assert_eq!(pager.last_error(), Some("502 bad gateway"));
    }

    #[tokio::test]
    async fn merchant_pages_stop_at_first_failure() {
        let source = FlakyMerchants(FlakySource::default());
        let mut session = EditSession::new("acc_1");
        let now = tokio::time::Instant::now();
        session.search_input("acme", now);
        let request = session.poll_search(now + engine::DEFAULT_QUIET);
        assert!(request.is_some());

        collect_merchants(&mut session, &source, request, 4).await;

        assert_eq!(source.0.cursors.borrow().len(), 2);
        let search = session.merchant_search();
        assert_eq!(search.items().len(), 1);
        assert_eq!(search.last_error(), Some("502 bad gateway"));
    }

    #[test]
    fn filter_flag_needs_key_and_value() {
        assert_eq!(
            parse_filter("status=SETTLED"),
            Ok(("status".to_string(), "SETTLED".to_string()))
        );
        assert_eq!(
            parse_filter("from="),
            Ok(("from".to_string(), String::new()))
        );
        assert!(parse_filter("=x").is_err());
        assert!(parse_filter("status").is_err());
    }

    #[test]
    fn constraint_flags_toggle_onto_existing_selection() {
        let mut session = EditSession::editing(
            "acc-1",
            &api_types::constraint::SpendingConstraintPayload {
                country_allow: Some(vec!["US".to_string(), "CA".to_string()]),
                ..Default::default()
            },
        );
        let args = ConstraintArgs {
            countries: vec!["ca".to_string(), "mx".to_string()],
            merchants: vec!["m1=Acme".to_string()],
            daily_limit: Some("$100".to_string()),
            ..Default::default()
        };
        args.apply(&mut session).unwrap();

        assert_eq!(
            session.draft.countries.as_slice(),
            &["US".to_string(), "MX".to_string()]
        );
        assert_eq!(session.draft.merchants.names(), &["Acme".to_string()]);
        assert_eq!(session.draft.limits.utilization.cents(), Some(10_000));
    }

    #[test]
    fn empty_limit_flag_clears_existing_limit() {
        let mut session = EditSession::editing(
            "acc-1",
            &api_types::constraint::SpendingConstraintPayload {
                maximum_amount_cents: Some(5_000),
                ..Default::default()
            },
        );
        let args = ConstraintArgs {
            max_amount: Some(String::new()),
            ..Default::default()
        };
        args.apply(&mut session).unwrap();
        assert!(!session.draft.limits.maximum.is_set());
    }

    #[test]
    fn zero_limit_flag_fails_on_submit() {
        let mut session = EditSession::new("acc-1");
        let args = ConstraintArgs {
            daily_limit: Some("0".to_string()),
            ..Default::default()
        };
        args.apply(&mut session).unwrap();
        let ctx = BuildContext::new(
            chrono::NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
            "UTC",
        );
        assert!(matches!(
            session.submit(&ctx),
            Err(EngineError::ZeroLimit(_))
        ));
    }
}
