//! Static origin allow-list.
//!
//! Entries are loaded once from configuration and never change for the
//! lifetime of the process. An entry is one of:
//! - an exact origin (`https://app.example.com`)
//! - an exact hostname (`app.example.com`)
//! - a wildcard-subdomain pattern (`*.example.com`)
//! - the literal `*`, which admits every origin

use url::Url;

/// Matches request origins against configured entries without any I/O.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: Vec<String>,
    allow_all: bool,
}

impl AllowList {
    /// Builds an allow-list, trimming entries and dropping empty ones.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        let allow_all = entries.iter().any(|entry| entry == "*");

        Self { entries, allow_all }
    }

    /// Builds an allow-list from a comma-separated string.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns `true` if the list contains the literal `*`.
    pub fn allows_any(&self) -> bool {
        self.allow_all
    }

    /// Decides whether `origin` may proceed based on static entries only.
    ///
    /// An absent or empty origin (same-origin requests, curl, server to
    /// server) is always permitted.
    pub fn permits(&self, origin: Option<&str>) -> bool {
        if self.allow_all {
            return true;
        }

        let origin = match origin {
            Some(origin) if !origin.is_empty() => origin,
            _ => return true,
        };

        let hostname = origin_hostname(origin);
        self.entries
            .iter()
            .any(|entry| entry_matches(entry, origin, &hostname))
    }
}

fn entry_matches(entry: &str, origin: &str, hostname: &str) -> bool {
    if entry == origin || entry == hostname {
        return true;
    }

    // Only `*.` entries take part in suffix matching; the bare apex never
    // matches its own wildcard.
    match entry.strip_prefix('*') {
        Some(suffix) if suffix.starts_with('.') => hostname.ends_with(suffix),
        _ => false,
    }
}

/// Extracts the hostname of an origin.
///
/// Falls back to the raw string when the origin is not a parseable URL or
/// carries no host.
pub fn origin_hostname(origin: &str) -> String {
    match Url::parse(origin) {
        Ok(url) => url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| origin.to_string()),
        Err(_) => origin.to_string(),
    }
}
