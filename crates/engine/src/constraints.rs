//! Spending-constraint composition.
//!
//! A [`ConstraintDraft`] holds the selections of one editing session. On
//! submit it is validated and turned into the typed backend payload by
//! [`build_constraint_payload`], which only emits the *active* dimensions:
//! an empty allow-list would deny every transaction, so it is never sent.
use api_types::constraint::{
    RestrictionMode, SpendingConstraintPayload, UserData, UtilizationPreset,
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{
    EngineError, LimitSetting, MerchantDirectory, MerchantSelection, MoneyCents, ToggleSet,
};

/// Timezone the daily utilization window is anchored to.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Date and timezone stamped on a utilization limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildContext {
    pub today: NaiveDate,
    pub timezone: String,
}

impl BuildContext {
    pub fn new(today: NaiveDate, timezone: impl Into<String>) -> Self {
        Self {
            today,
            timezone: timezone.into(),
        }
    }

    /// Uses the current date as seen in `timezone` (IANA name).
    pub fn now_in(timezone: &str) -> Result<Self, EngineError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self {
            today: Utc::now().with_timezone(&tz).date_naive(),
            timezone: tz.name().to_string(),
        })
    }
}

/// One allow-list dimension.
///
/// The rule is active only when it has at least one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestrictionRule<T> {
    items: Vec<T>,
}

impl<T> RestrictionRule<T> {
    pub fn allow(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn is_active(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Wire form: `(items, "allowlist")` when active, nothing otherwise.
    pub fn into_wire(self) -> (Option<Vec<T>>, Option<RestrictionMode>) {
        if self.is_active() {
            (Some(self.items), Some(RestrictionMode::Allowlist))
        } else {
            (None, None)
        }
    }
}

/// Normalizes a country code to ISO alpha-2 uppercase.
///
/// Returns `None` for anything that is not exactly two ASCII letters.
pub fn normalize_country(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    (code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase())).then_some(code)
}

/// Monetary limits of a constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    /// Daily utilization cap.
    pub utilization: LimitSetting,
    /// Minimum transaction size.
    pub minimum: LimitSetting,
    /// Maximum transaction size.
    pub maximum: LimitSetting,
}

impl Limits {
    /// Parses the three input fields.
    pub fn from_text(utilization: &str, minimum: &str, maximum: &str) -> Result<Self, EngineError> {
        Ok(Self {
            utilization: LimitSetting::from_text(utilization)?,
            minimum: LimitSetting::from_text(minimum)?,
            maximum: LimitSetting::from_text(maximum)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        !self.utilization.is_set() && !self.minimum.is_set() && !self.maximum.is_set()
    }

    /// Rejects explicit zero limits and a minimum that is not below the maximum.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.utilization == LimitSetting::Zero {
            return Err(EngineError::ZeroLimit("daily limit"));
        }
        if self.minimum == LimitSetting::Zero {
            return Err(EngineError::ZeroLimit("minimum amount"));
        }
        if self.maximum == LimitSetting::Zero {
            return Err(EngineError::ZeroLimit("maximum amount"));
        }
        if let (Some(minimum), Some(maximum)) = (self.minimum.cents(), self.maximum.cents())
            && minimum >= maximum
        {
            return Err(EngineError::InvalidLimitRange {
                minimum: MoneyCents::new(minimum).to_string(),
                maximum: MoneyCents::new(maximum).to_string(),
            });
        }
        Ok(())
    }
}

/// Selection state of one create/edit session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintDraft {
    pub countries: ToggleSet<String>,
    pub mcc_codes: ToggleSet<String>,
    pub merchant_categories: ToggleSet<String>,
    pub merchants: MerchantSelection,
    pub limits: Limits,
    /// Stored `userData` keys other than the merchant names, written back untouched.
    pub user_data_extra: serde_json::Map<String, serde_json::Value>,
}

impl ConstraintDraft {
    /// Seeds a draft from a constraint stored on the backend.
    pub fn from_payload(payload: &SpendingConstraintPayload) -> Self {
        let list = |items: &Option<Vec<String>>| items.clone().unwrap_or_default();
        let UserData {
            merchant_names,
            extra,
        } = payload.user_data.clone().unwrap_or_default();

        Self {
            countries: ToggleSet::from_items(
                list(&payload.country_allow)
                    .iter()
                    .filter_map(|c| normalize_country(c)),
            ),
            mcc_codes: ToggleSet::from_items(list(&payload.mcc_allow)),
            merchant_categories: ToggleSet::from_items(list(&payload.merchant_category_allow)),
            merchants: MerchantSelection::from_parts(list(&payload.merchant_allow), merchant_names),
            limits: Limits {
                utilization: LimitSetting::from_cents(payload.utilization_limit_amount_cents),
                minimum: LimitSetting::from_cents(payload.minimum_amount_cents),
                maximum: LimitSetting::from_cents(payload.maximum_amount_cents),
            },
            user_data_extra: extra,
        }
    }

    pub fn toggle_country(&mut self, code: &str) -> bool {
        match normalize_country(code) {
            Some(code) => self.countries.toggle(code),
            None => false,
        }
    }

    pub fn toggle_mcc(&mut self, code: &str) -> bool {
        self.mcc_codes.toggle(code.trim().to_string())
    }

    pub fn toggle_merchant_category(&mut self, id: &str) -> bool {
        self.merchant_categories.toggle(id.trim().to_string())
    }

    /// Toggles a merchant, resolving its display name through `directory`.
    pub fn toggle_merchant(&mut self, id: &str, directory: &MerchantDirectory) -> bool {
        let name = directory.label(id).to_string();
        self.merchants.toggle(id, &name)
    }

    /// Returns `true` if no dimension has a selection.
    pub fn has_no_selection(&self) -> bool {
        self.countries.is_empty()
            && self.mcc_codes.is_empty()
            && self.merchant_categories.is_empty()
            && self.merchants.is_empty()
    }

    /// Validates the limits and builds the payload.
    ///
    /// On error nothing is built and the draft is left untouched.
    pub fn prepare(
        &self,
        directory: &MerchantDirectory,
        ctx: &BuildContext,
    ) -> Result<SpendingConstraintPayload, EngineError> {
        self.limits.validate()?;
        Ok(build_constraint_payload(self, directory, ctx))
    }
}

/// Builds the backend payload from a draft.
///
/// Never fails: malformed entries are dropped and a dimension left without
/// items is omitted. Callers must have run [`Limits::validate`] first.
pub fn build_constraint_payload(
    draft: &ConstraintDraft,
    directory: &MerchantDirectory,
    ctx: &BuildContext,
) -> SpendingConstraintPayload {
    let mut payload = SpendingConstraintPayload::default();

    let mut countries: Vec<String> = Vec::new();
    for code in draft.countries.as_slice().iter().filter_map(|c| normalize_country(c)) {
        if !countries.contains(&code) {
            countries.push(code);
        }
    }
    (payload.country_allow, payload.country_restriction) =
        RestrictionRule::allow(countries).into_wire();

    (payload.mcc_allow, payload.mcc_restriction) =
        RestrictionRule::allow(non_blank(draft.mcc_codes.as_slice())).into_wire();

    (payload.merchant_category_allow, payload.merchant_category_restriction) =
        RestrictionRule::allow(non_blank(draft.merchant_categories.as_slice())).into_wire();

    let merchants: Vec<(String, String)> = draft
        .merchants
        .iter()
        .filter(|(id, _)| !id.trim().is_empty())
        .map(|(id, name)| {
            let name = if name.is_empty() || name == id {
                directory.label(id)
            } else {
                name
            };
            (id.to_string(), name.to_string())
        })
        .collect();
    let (ids, names): (Vec<String>, Vec<String>) = merchants.into_iter().unzip();
    (payload.merchant_allow, payload.merchant_restriction) =
        RestrictionRule::allow(ids).into_wire();
    let user_data = UserData {
        merchant_names: names,
        extra: draft.user_data_extra.clone(),
    };
    if !user_data.is_empty() {
        payload.user_data = Some(user_data);
    }

    if let Some(cents) = draft.limits.utilization.cents() {
        payload.utilization_limit_amount_cents = Some(cents);
        payload.utilization_preset = Some(UtilizationPreset::Daily);
        payload.utilization_start_date = Some(ctx.today);
        payload.utilization_timezone = Some(ctx.timezone.clone());
    }
    payload.minimum_amount_cents = draft.limits.minimum.cents();
    payload.maximum_amount_cents = draft.limits.maximum.cents();

    payload
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
