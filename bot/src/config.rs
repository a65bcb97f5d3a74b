use crate::monitor::Settings;
use anyhow::{bail, ensure, Context, Result};
use common::{optional_var, required_var};
use std::str::FromStr;
use std::time::Duration;
use steam::{
    Exterior, Page, PriceBand, PurchaseTerms, QueryEncoder, SearchCriteria, Session,
    SortDirection, SortVariant,
};

const DEFAULT_BASE_URL: &str = "https://steamcommunity.com";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: usize = 10;
// 15% commission (5% platform + 10% game); confirm against the current fee
// schedule before trusting computed totals.
const DEFAULT_COMMISSION_RATE: f64 = 0.15;
const DEFAULT_QUANTITY: u32 = 1;
const DEFAULT_CURRENCY: &str = "1";

pub(crate) enum Auth {
    /// A pre-baked session cookie, skipping the login handshake entirely.
    Token(Session),
    Credentials {
        username: String,
        password: String,
        guard_code: Option<String>,
    },
}

pub(crate) struct Config {
    pub base_url: String,
    pub auth: Auth,
    criteria: SearchCriteria,
    sort_variant: SortVariant,
    band: PriceBand,
    page: Page,
    poll_interval: Duration,
    terms: PurchaseTerms,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let base_url =
            optional_var("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let price_min: f64 = required_var("PRICE_MIN")?
            .parse()
            .context("PRICE_MIN must be a number")?;
        let price_max: f64 = required_var("PRICE_MAX")?
            .parse()
            .context("PRICE_MAX must be a number")?;
        ensure!(price_min <= price_max, "PRICE_MIN must not exceed PRICE_MAX");

        let auth = match token_auth(
            optional_var("STEAM_LOGIN_SECURE"),
            optional_var("STEAM_SESSION_ID"),
        )? {
            Some(session) => Auth::Token(session),
            None => Auth::Credentials {
                username: required_var("STEAM_LOGIN")?,
                password: required_var("STEAM_PASSWORD")?,
                guard_code: optional_var("STEAM_GUARD_CODE"),
            },
        };

        let criteria = SearchCriteria {
            stickers: parse_list(optional_var("STICKERS").as_deref().unwrap_or_default()),
            ordered: optional_var("STICKERS_ORDERED").is_some_and(|v| v == "1" || v == "true"),
            weapon: optional_var("WEAPON"),
            exteriors: optional_var("EXTERIORS")
                .as_deref()
                .map(parse_exteriors)
                .transpose()?,
            quality: optional_var("QUALITY"),
            sort: match optional_var("SORT").as_deref() {
                Some("desc") => SortDirection::Descending,
                _ => SortDirection::Ascending,
            },
        };

        let sort_variant = match optional_var("SORT_VARIANT").as_deref() {
            Some("fragment") => SortVariant::Fragment,
            _ => SortVariant::QueryParameter,
        };

        let poll_interval = Duration::from_secs(numeric_var(
            "POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let page = Page {
            start: 0,
            count: numeric_var("PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        };

        let terms = PurchaseTerms {
            quantity: numeric_var("QUANTITY", DEFAULT_QUANTITY)?,
            fee_rate: numeric_var("COMMISSION_RATE", DEFAULT_COMMISSION_RATE)?,
            currency: optional_var("CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        };

        Ok(Self {
            base_url,
            auth,
            criteria,
            sort_variant,
            band: PriceBand::new(price_min, price_max),
            page,
            poll_interval,
            terms,
        })
    }

    pub fn into_settings(self) -> Settings {
        Settings {
            encoder: QueryEncoder::new(self.base_url, self.sort_variant),
            criteria: self.criteria,
            band: self.band,
            terms: self.terms,
            page: self.page,
            interval: self.poll_interval,
        }
    }
}

// A token without its sessionid would produce purchase forms the platform
// rejects, so a half-configured bypass is refused up front instead of
// silently falling back to credential login.
fn token_auth(token: Option<String>, session_id: Option<String>) -> Result<Option<Session>> {
    match (token, session_id) {
        (Some(token), Some(session_id)) => Ok(Some(Session::new(token, session_id))),
        (Some(_), None) => {
            bail!("STEAM_LOGIN_SECURE is set but STEAM_SESSION_ID is not; both are needed to skip the login handshake")
        }
        _ => Ok(None),
    }
}

fn numeric_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} must be a number")),
        None => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_exteriors(raw: &str) -> Result<Vec<Exterior>> {
    raw.split(',')
        .map(|part| {
            let level: u8 = part
                .trim()
                .parse()
                .with_context(|| format!("invalid wear level: {part}"))?;
            Exterior::from_level(level).with_context(|| format!("wear level out of range: {level}"))
        })
        .collect()
}
