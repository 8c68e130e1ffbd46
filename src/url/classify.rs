//! URL classification
//!
//! Every URL gets exactly one [`Category`]. The decision is an ordered table
//! of `(matcher, category)` rules; the first rule that matches wins and
//! anything left over is [`Category::External`].
//!
//! The order matters: file-type, scheme and social rules sit above the
//! INTERNAL host check, so `https://target.com/report.pdf` is a DOWNLOAD and
//! not an INTERNAL page.

use crate::url::domain::{extract_domain, is_same_site};
use crate::url::matcher::matches_wildcard;
use crate::UrlError;
use serde::Serialize;
use std::fmt;
use url::Url;

/// Resource category assigned to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Download,
    Email,
    Telephone,
    Social,
    Api,
    Frontend,
    Image,
    Video,
    Audio,
    Font,
    Config,
    Data,
    Archive,
    Database,
    Internal,
    External,
}

impl Category {
    /// Every category, in classification priority order
    pub const ALL: [Category; 16] = [
        Category::Download,
        Category::Email,
        Category::Telephone,
        Category::Social,
        Category::Api,
        Category::Frontend,
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Font,
        Category::Config,
        Category::Data,
        Category::Archive,
        Category::Database,
        Category::Internal,
        Category::External,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Download => "DOWNLOAD",
            Category::Email => "EMAIL",
            Category::Telephone => "TELEPHONE",
            Category::Social => "SOCIAL",
            Category::Api => "API",
            Category::Frontend => "FRONTEND",
            Category::Image => "IMAGE",
            Category::Video => "VIDEO",
            Category::Audio => "AUDIO",
            Category::Font => "FONT",
            Category::Config => "CONFIG",
            Category::Data => "DATA",
            Category::Archive => "ARCHIVE",
            Category::Database => "DATABASE",
            Category::Internal => "INTERNAL",
            Category::External => "EXTERNAL",
        }
    }

    /// Returns true if URLs of this category are expanded for further links
    pub fn is_internal(&self) -> bool {
        matches!(self, Category::Internal)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in SOCIAL allowlist
pub const SOCIAL_DOMAINS: &[&str] = &[
    "*.facebook.com",
    "*.twitter.com",
    "*.instagram.com",
    "*.x.com",
    "*.linkedin.com",
    "*.youtube.com",
    "*.telegram.me",
    "*.whatsapp.com",
];

/// A single predicate in the classification table
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Last path segment ends in one of these extensions (case-insensitive)
    Extension(&'static [&'static str]),
    /// URL scheme equals this value
    Scheme(&'static str),
    /// Host is on the SOCIAL allowlist
    SocialDomain,
    /// Some path segment equals this value
    PathSegment(&'static str),
    /// Host is the run hostname, optionally `www.`-prefixed
    SameSite,
    /// Plain `http`/`https` URL
    WebScheme,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub matcher: Matcher,
    pub category: Category,
}

const fn rule(matcher: Matcher, category: Category) -> Rule {
    Rule { matcher, category }
}

/// The classification table, highest priority first
///
/// `json` appears under both CONFIG and DATA; CONFIG is checked first, so
/// DATA only ever catches `.csv`.
pub const RULES: &[Rule] = &[
    rule(
        Matcher::Extension(&["pdf", "docx", "pptx", "xls", "xlsx", "txt", "exe", "doc"]),
        Category::Download,
    ),
    rule(Matcher::Scheme("mailto"), Category::Email),
    rule(Matcher::Scheme("tel"), Category::Telephone),
    rule(Matcher::SocialDomain, Category::Social),
    rule(Matcher::PathSegment("api"), Category::Api),
    rule(Matcher::Extension(&["html", "css", "js"]), Category::Frontend),
    rule(
        Matcher::Extension(&["jpg", "jpeg", "png", "gif", "bmp", "webp"]),
        Category::Image,
    ),
    rule(Matcher::Extension(&["mp4", "avi", "mov", "mkv"]), Category::Video),
    rule(Matcher::Extension(&["mp3", "wav", "flac"]), Category::Audio),
    rule(Matcher::Extension(&["woff", "woff2", "ttf", "otf"]), Category::Font),
    rule(
        Matcher::Extension(&["json", "xml", "yaml", "ini", "conf"]),
        Category::Config,
    ),
    rule(Matcher::Extension(&["csv", "json"]), Category::Data),
    rule(Matcher::Extension(&["zip", "tar", "rar", "gz", "7z"]), Category::Archive),
    rule(Matcher::Extension(&["db", "sqlite", "sql"]), Category::Database),
    rule(Matcher::SameSite, Category::Internal),
    rule(Matcher::WebScheme, Category::External),
];

/// The pieces of a URL the rules look at
#[derive(Debug)]
struct UrlParts {
    scheme: String,
    host: Option<String>,
    path: String,
}

impl UrlParts {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Url::parse(raw) {
            Ok(url) => Self {
                scheme: url.scheme().to_string(),
                host: extract_domain(&url),
                path: url.path().to_lowercase(),
            },
            // Unparseable input still gets a best-effort look at its text
            Err(_) => {
                let without_suffix = raw.split(['?', '#']).next().unwrap_or_default();
                let scheme = without_suffix
                    .split_once(':')
                    .map(|(s, _)| s)
                    .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
                    .unwrap_or_default()
                    .to_lowercase();
                Self {
                    scheme,
                    host: None,
                    path: without_suffix.to_lowercase(),
                }
            }
        }
    }

    fn extension(&self) -> Option<&str> {
        let last_segment = self.path.rsplit('/').next()?;
        last_segment.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// Maps URLs to categories relative to the run hostname
#[derive(Debug, Clone)]
pub struct Classifier {
    hostname: String,
    social_domains: Vec<String>,
}

impl Classifier {
    /// Creates a classifier for the given run hostname
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into().to_lowercase(),
            social_domains: SOCIAL_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Creates a classifier whose hostname is taken from the seed URL
    pub fn for_seed(seed: &Url) -> Result<Self, UrlError> {
        extract_domain(seed)
            .map(Self::new)
            .ok_or(UrlError::MissingHost)
    }

    /// Extends the SOCIAL allowlist with extra domain patterns
    pub fn with_social_domains<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.social_domains
            .extend(extra.into_iter().map(|d| d.into().to_lowercase()));
        self
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Classifies a URL; never fails
    ///
    /// # Examples
    ///
    /// ```
    /// use moss::url::{Category, Classifier};
    ///
    /// let classifier = Classifier::new("example.com");
    /// assert_eq!(classifier.classify("https://example.com/report.pdf"), Category::Download);
    /// assert_eq!(classifier.classify("https://example.com/about"), Category::Internal);
    /// assert_eq!(classifier.classify("https://unknown.tld/x"), Category::External);
    /// ```
    pub fn classify(&self, url: &str) -> Category {
        let parts = UrlParts::parse(url);

        RULES
            .iter()
            .find(|rule| self.matches(&rule.matcher, &parts))
            .map(|rule| rule.category)
            .unwrap_or(Category::External)
    }

    /// Classifies an already parsed URL
    pub fn classify_url(&self, url: &Url) -> Category {
        self.classify(url.as_str())
    }

    fn matches(&self, matcher: &Matcher, parts: &UrlParts) -> bool {
        match matcher {
            Matcher::Extension(extensions) => parts
                .extension()
                .is_some_and(|ext| extensions.iter().any(|e| *e == ext)),
            Matcher::Scheme(scheme) => parts.scheme == *scheme,
            Matcher::SocialDomain => parts.host.as_deref().is_some_and(|host| {
                self.social_domains
                    .iter()
                    .any(|pattern| matches_wildcard(pattern, host))
            }),
            Matcher::PathSegment(segment) => parts.path.split('/').any(|s| s == *segment),
            Matcher::SameSite => parts
                .host
                .as_deref()
                .is_some_and(|host| is_same_site(host, &self.hostname)),
            Matcher::WebScheme => parts.scheme == "http" || parts.scheme == "https",
        }
    }
}
