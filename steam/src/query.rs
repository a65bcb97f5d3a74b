use crate::endpoint::Endpoint;
use urlencoding::encode;

pub const CS2_APP_ID: i32 = 730;

/// Exterior wear category, ordered best to worst. The numeric value is the
/// `tag_WearCategory<n>` suffix the search endpoint expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exterior {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

impl Exterior {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::FactoryNew),
            1 => Some(Self::MinimalWear),
            2 => Some(Self::FieldTested),
            3 => Some(Self::WellWorn),
            4 => Some(Self::BattleScarred),
            _ => None,
        }
    }

    fn tag(self) -> String {
        format!("tag_WearCategory{}", self as u8)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn suffix(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Where the price sort lands on the request: some market pages read it from
/// a trailing query parameter, others from the URL fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortVariant {
    QueryParameter,
    Fragment,
}

/// One search worth of filters. Wear levels are taken as given; callers
/// validate ranges before constructing this.
#[derive(Clone, Debug)]
pub struct SearchCriteria {
    pub stickers: Vec<String>,
    /// When set, sticker names form a single comma-joined phrase so slot
    /// order matters; otherwise each name is matched independently.
    pub ordered: bool,
    pub weapon: Option<String>,
    pub exteriors: Option<Vec<Exterior>>,
    pub quality: Option<String>,
    pub sort: SortDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub count: usize,
}

/// A fully assembled request target plus the pagination window it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedQuery {
    pub url: String,
    pub start: usize,
    pub count: usize,
}

pub struct QueryEncoder {
    base_url: String,
    variant: SortVariant,
}

impl QueryEncoder {
    pub fn new(base_url: impl Into<String>, variant: SortVariant) -> Self {
        Self {
            base_url: base_url.into(),
            variant,
        }
    }

    pub fn encode(&self, criteria: &SearchCriteria, page: &Page) -> EncodedQuery {
        let mut pairs = vec![
            format!("q={}", sticker_term(criteria)),
            format!(
                "{}={}",
                escape("category_730_Weapon[]"),
                weapon_term(criteria.weapon.as_deref())
            ),
        ];

        if let Some(exteriors) = &criteria.exteriors {
            pairs.push(format!(
                "{}={}",
                escape("category_730_Exterior[]"),
                exterior_term(exteriors)
            ));
        }

        pairs.push(format!(
            "{}={}",
            escape("category_730_Quality[]"),
            quality_term(criteria.quality.as_deref())
        ));
        pairs.push(format!("appid={CS2_APP_ID}"));
        pairs.push(format!("start={}", page.start));
        pairs.push(format!("count={}", page.count));

        let mut url = format!("{}{}?{}", self.base_url, Endpoint::Search, pairs.join("&"));

        match self.variant {
            SortVariant::QueryParameter => {
                url.push_str("&sort_column=price&sort_dir=");
                url.push_str(criteria.sort.suffix());
            }
            SortVariant::Fragment => {
                url.push_str("#p1_price_");
                url.push_str(criteria.sort.suffix());
            }
        }

        EncodedQuery {
            url,
            start: page.start,
            count: page.count,
        }
    }
}

/// Percent-escapes `text` while keeping comma, double quote and percent
/// literal. The market's search parser chokes on the escaped forms of these
/// three, so they must survive encoding verbatim.
fn escape(text: &str) -> String {
    encode(text)
        .replace("%2C", ",")
        .replace("%22", "\"")
        .replace("%25", "%")
}

fn sticker_term(criteria: &SearchCriteria) -> String {
    if criteria.stickers.is_empty() {
        return "\"\"".to_string();
    }

    if criteria.ordered {
        format!("\"{}\"", escape(&criteria.stickers.join(",")))
    } else {
        criteria
            .stickers
            .iter()
            .map(|name| format!("\"{}\"", escape(name)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// The exterior value deliberately embeds unescaped ampersands between tag
// tokens; the search endpoint only matches the filter in that form.
fn exterior_term(exteriors: &[Exterior]) -> String {
    exteriors
        .iter()
        .map(|exterior| exterior.tag())
        .collect::<Vec<_>>()
        .join("&")
}

fn weapon_term(weapon: Option<&str>) -> String {
    match weapon {
        Some(weapon) => format!("tag_weapon_{weapon}"),
        None => "any".to_string(),
    }
}

fn quality_term(quality: Option<&str>) -> String {
    match quality {
        Some(quality) => format!("tag_{quality}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(stickers: &[&str], ordered: bool) -> SearchCriteria {
        SearchCriteria {
            stickers: stickers.iter().map(|s| s.to_string()).collect(),
            ordered,
            weapon: None,
            exteriors: None,
            quality: None,
            sort: SortDirection::Ascending,
        }
    }

    fn encoder(variant: SortVariant) -> QueryEncoder {
        QueryEncoder::new("https://steamcommunity.com", variant)
    }

    const PAGE: Page = Page { start: 0, count: 10 };

    #[test]
    fn ordered_stickers_form_one_quoted_comma_joined_token() {
        let query = encoder(SortVariant::Fragment).encode(&criteria(&["A", "B"], true), &PAGE);
        assert!(query.url.contains("q=\"A,B\""), "{}", query.url);
    }

    #[test]
    fn unordered_stickers_are_quoted_independently_and_space_joined() {
        let query = encoder(SortVariant::Fragment).encode(&criteria(&["A", "B"], false), &PAGE);
        assert!(query.url.contains("q=\"A\" \"B\""), "{}", query.url);
    }

    #[test]
    fn no_stickers_yields_empty_quoted_string() {
        let query = encoder(SortVariant::Fragment).encode(&criteria(&[], false), &PAGE);
        assert!(query.url.contains("q=\"\"&"), "{}", query.url);
    }

    #[test]
    fn sticker_names_are_escaped_but_quirk_characters_survive() {
        let query =
            encoder(SortVariant::Fragment).encode(&criteria(&["Crown (Foil) 100%"], true), &PAGE);
        assert!(
            query.url.contains("q=\"Crown%20%28Foil%29%20100%\""),
            "{}",
            query.url
        );
    }

    #[test]
    fn exterior_levels_join_with_literal_ampersand() {
        let mut criteria = criteria(&[], false);
        criteria.exteriors = Some(vec![Exterior::FactoryNew, Exterior::MinimalWear]);
        let query = encoder(SortVariant::Fragment).encode(&criteria, &PAGE);
        assert!(
            query
                .url
                .contains("category_730_Exterior%5B%5D=tag_WearCategory0&tag_WearCategory1"),
            "{}",
            query.url
        );
    }

    #[test]
    fn absent_weapon_and_quality_map_to_wildcard_and_empty() {
        let query = encoder(SortVariant::Fragment).encode(&criteria(&[], false), &PAGE);
        assert!(query.url.contains("category_730_Weapon%5B%5D=any"));
        assert!(query.url.contains("category_730_Quality%5B%5D=&"));
    }

    #[test]
    fn present_weapon_and_quality_become_prefixed_tags() {
        let mut criteria = criteria(&[], false);
        criteria.weapon = Some("ak47".to_string());
        criteria.quality = Some("normal".to_string());
        let query = encoder(SortVariant::Fragment).encode(&criteria, &PAGE);
        assert!(query.url.contains("category_730_Weapon%5B%5D=tag_weapon_ak47"));
        assert!(query.url.contains("category_730_Quality%5B%5D=tag_normal"));
    }

    #[test]
    fn sort_lands_in_fragment_or_query_parameter_per_variant() {
        let mut criteria = criteria(&[], false);
        criteria.sort = SortDirection::Descending;

        let fragment = encoder(SortVariant::Fragment).encode(&criteria, &PAGE);
        assert!(fragment.url.ends_with("#p1_price_desc"), "{}", fragment.url);

        let parameter = encoder(SortVariant::QueryParameter).encode(&criteria, &PAGE);
        assert!(
            parameter.url.ends_with("&sort_column=price&sort_dir=desc"),
            "{}",
            parameter.url
        );
        assert!(!parameter.url.contains('#'));
    }

    #[test]
    fn encoding_is_pure() {
        let criteria = criteria(&["Titan (Holo)", "iBUYPOWER (Holo)"], false);
        let encoder = encoder(SortVariant::QueryParameter);
        assert_eq!(encoder.encode(&criteria, &PAGE), encoder.encode(&criteria, &PAGE));
    }

    #[test]
    fn pagination_carries_through() {
        let page = Page { start: 20, count: 50 };
        let query = encoder(SortVariant::Fragment).encode(&criteria(&[], false), &page);
        assert!(query.url.contains("start=20&count=50"));
        assert_eq!(query.start, 20);
        assert_eq!(query.count, 50);
    }
}
