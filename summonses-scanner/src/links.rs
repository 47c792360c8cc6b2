use crate::error::{Result, ScanError};
use crate::result::{LinkMap, MonthYear};
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};
use url::{ParseError, Url};

pub const SUMMONS_PREFIX: &str = "Summons";
pub const COLLISION_PREFIX: &str = "Collision";

static ANCHOR_SELECTOR: OnceLock<Selector> = OnceLock::new();

fn anchor_selector() -> &'static Selector {
    ANCHOR_SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("static selector is valid"))
}

/// How the first word of an anchor's text is compared against the prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// First word starts with the prefix ("Summonses" matches "Summons")
    #[default]
    Leading,
    /// First word equals the prefix
    Exact,
}

impl MatchMode {
    fn matches(self, token: &str, prefix: &str) -> bool {
        match self {
            MatchMode::Leading => token.starts_with(prefix),
            MatchMode::Exact => token == prefix,
        }
    }
}

/// Pulls `<Prefix> <Month> <Year>` anchors out of an archive page.
///
/// The page is parsed tolerantly, so stray or unclosed tags never abort
/// extraction. Anchors without an `href` or without visible text are ignored.
pub struct LinkExtractor {
    prefix: String,
    base_url: Option<Url>,
    match_mode: MatchMode,
    skip_malformed: bool,
}

impl LinkExtractor {
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ScanError::InvalidPrefix);
        }

        Ok(Self {
            prefix,
            base_url: None,
            match_mode: MatchMode::default(),
            skip_malformed: false,
        })
    }

    /// Resolve every extracted href against `base`, which must be absolute.
    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        let parsed = Url::parse(base)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base, e)))?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Skip anchors whose date does not parse instead of failing the whole page.
    pub fn skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn extract(&self, document: &str) -> Result<LinkMap> {
        let document = Html::parse_document(document);
        let mut links = LinkMap::new();

        for element in document.select(anchor_selector()) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let text: String = element.text().collect();
            let mut tokens = text.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };
            if !self.match_mode.matches(first, &self.prefix) {
                continue;
            }

            let date_text = tokens.collect::<Vec<_>>().join(" ");
            let Some(month) = MonthYear::parse(&date_text) else {
                if self.skip_malformed {
                    warn!("Skipping link to {} with malformed date '{}'", href, date_text);
                    continue;
                }
                return Err(ScanError::MalformedDate {
                    text: date_text,
                    href: href.to_string(),
                });
            };

            let target = self.resolve(href.trim());
            debug!("Found {} link for {}: {}", self.prefix, month, target);
            if let Some(previous) = links.insert(month, target) {
                debug!("  -> replaces earlier link {}", previous);
            }
        }

        Ok(links)
    }

    /// Join a relative href onto the base URL. Anything that is not a
    /// joinable relative reference comes back exactly as the page wrote it.
    fn resolve(&self, href: &str) -> String {
        let Some(base) = &self.base_url else {
            return href.to_string();
        };

        match Url::parse(href) {
            Err(ParseError::RelativeUrlWithoutBase) => match base.join(href) {
                Ok(joined) => joined.to_string(),
                Err(e) => {
                    warn!("Could not resolve {} against {}: {}", href, base, e);
                    href.to_string()
                }
            },
            Ok(_) => href.to_string(),
            Err(e) => {
                warn!("Keeping unparsable link {} as written: {}", href, e);
                href.to_string()
            }
        }
    }
}

/// Extract every `<prefix> <Month> <Year>` link from `document`.
pub fn extract_links(document: &str, prefix: &str, base_url: Option<&str>) -> Result<LinkMap> {
    let mut extractor = LinkExtractor::new(prefix)?;
    if let Some(base) = base_url {
        extractor = extractor.with_base_url(base)?;
    }
    extractor.extract(document)
}

/// Links whose text reads like "Summonses August 2012".
pub fn summonses_from_page(document: &str, base_url: Option<&str>) -> Result<LinkMap> {
    extract_links(document, SUMMONS_PREFIX, base_url)
}

/// Links whose text reads like "Collisions June 2013".
pub fn collisions_from_page(document: &str, base_url: Option<&str>) -> Result<LinkMap> {
    extract_links(document, COLLISION_PREFIX, base_url)
}
