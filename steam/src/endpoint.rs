use strum_macros::Display;

/// Community Market endpoints used by the bot.
#[derive(Display, Copy, Clone)]
pub(crate) enum Endpoint {
    #[strum(serialize = "/market/search")]
    Search,
    #[strum(serialize = "/market/buylisting")]
    BuyListing,
    #[strum(serialize = "/login/dologin/")]
    Login,
}
