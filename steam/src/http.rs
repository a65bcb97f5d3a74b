use crate::auth::Session;
use crate::endpoint::Endpoint;
use crate::listing::Listing;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header;
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

/// Purchase parameters that stay fixed across attempts. `fee_rate` is the
/// platform commission applied on top of the listing subtotal.
#[derive(Clone, Debug)]
pub struct PurchaseTerms {
    pub quantity: u32,
    pub fee_rate: f64,
    pub currency: String,
}

/// Result of one purchase attempt as reported by the platform.
#[derive(Debug)]
pub struct Acquisition {
    pub success: bool,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
struct BuyResponse {
    success: u8,
    message: Option<String>,
}

/// Outbound capabilities the monitor loop depends on, split out so tests can
/// run the loop against a scripted marketplace.
#[async_trait]
pub trait Marketplace {
    /// Fetches a page (search results or a listing detail page) as raw HTML.
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// Submits a purchase for a listing with a resolved id.
    async fn buy_listing(&self, listing: &Listing, terms: &PurchaseTerms) -> Result<Acquisition>;
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl Client {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)?;
        let response = self
            .client
            .get(url)
            .header(header::COOKIE, self.session.cookie())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(Error::Status(status, response.text().await?))
        }
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<T> {
        let url = Url::parse(url)?;
        let response = self
            .client
            .post(url)
            .header(header::COOKIE, self.session.cookie())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status, response.text().await?));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|_| Error::Deserialize(text))
    }
}

fn to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

fn commission(subtotal: i64, rate: f64) -> i64 {
    (subtotal as f64 * rate).round() as i64
}

#[async_trait]
impl Marketplace for Client {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }

    async fn buy_listing(&self, listing: &Listing, terms: &PurchaseTerms) -> Result<Acquisition> {
        let listing_id = listing
            .id
            .as_deref()
            .ok_or_else(|| Error::Listing(format!("{}: listing id unresolved", listing.name)))?;

        let subtotal = to_cents(listing.price);
        let fee = commission(subtotal, terms.fee_rate);

        let form = [
            ("sessionid".to_string(), self.session.session_id.clone()),
            ("listing_id".to_string(), listing_id.to_string()),
            ("quantity".to_string(), terms.quantity.to_string()),
            ("fee".to_string(), fee.to_string()),
            ("subtotal".to_string(), subtotal.to_string()),
            ("total".to_string(), (subtotal + fee).to_string()),
            ("currency".to_string(), terms.currency.clone()),
        ];

        let url = format!("{}{}", self.base_url, Endpoint::BuyListing);
        let response: BuyResponse = self.post_form(&url, &form).await?;

        Ok(Acquisition {
            success: response.success == 1,
            reason: response.message,
        })
    }
}
