//! Client-side rule model for the card-issuing dashboard.
//!
//! - [`money`]: cents ⇄ dollars conversion and tri-state limits.
//! - [`toggle`]: add/remove-by-identity selection editing.
//! - [`constraints`]: spending-constraint drafts and payload building.
//! - [`pager`]: cursor and offset pagination with stale-response discarding.
//! - [`search`]: debounced free-text search trigger.
//! - [`filter`]: post-filter over an already fetched window.
//! - [`lookup`]: code → label resolution.
pub use constraints::{
    BuildContext, ConstraintDraft, DEFAULT_TIMEZONE, Limits, RestrictionRule,
    build_constraint_payload, normalize_country,
};
pub use currency::Currency;
pub use drafts::{CardDraft, CardEdit, CardGroupEdit};
pub use error::EngineError;
pub use filter::{SearchText, post_filter};
pub use lookup::{LabelIndex, MerchantDirectory, Resolvers};
pub use money::{LimitSetting, MoneyCents, to_display_units, to_minor_units};
pub use pager::{
    Applied, CursorPager, CursorRequest, CursorSource, FetchKind, OffsetPager, PageRequest,
    PageSource, PagerStatus, Ticket,
};
pub use search::{
    DEFAULT_QUIET, DebounceConfig, MIN_SEARCH_LEN, SearchCommand, SearchDebouncer, SearchEvent,
    SearchTrigger, debounce_search,
};
pub use session::{EditSession, MerchantQuery};
pub use toggle::{MerchantSelection, ToggleSet, toggle};

pub mod constraints;
mod currency;
mod drafts;
mod error;
pub mod filter;
pub mod lookup;
pub mod money;
pub mod pager;
pub mod search;
mod session;
pub mod toggle;
