/// Settlement currency of the issuing program.
///
/// Card amounts and limits are integer minor units; the currency only
/// decides how they are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Currency {
    #[default]
    Usd,
}

impl Currency {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
        }
    }

    /// Minor units per major unit (100 cents per dollar).
    #[must_use]
    pub const fn scale(self) -> u64 {
        match self {
            Currency::Usd => 100,
        }
    }

    /// Renders `minor` units, e.g. `-$10.50`.
    pub fn render(self, minor: i64) -> String {
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.unsigned_abs();
        format!(
            "{sign}{}{}.{:02}",
            self.symbol(),
            abs / self.scale(),
            abs % self.scale()
        )
    }
}
