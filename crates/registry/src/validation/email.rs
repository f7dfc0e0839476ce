//! Email address shape check and provider-aware canonicalisation.
//!
//! Local parts may carry non-ASCII letters, and domain labels may be
//! internationalised. Normalisation lowercases the whole address and then
//! applies the rules the major mail providers themselves use, so that two
//! spellings delivering to the same mailbox compare equal.

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;

static LOCAL_PART_RE: Lazy<Regex> = Lazy::new(|| {
    let atom = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{00A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+";
    Regex::new(&format!(r"^{atom}(?:\.{atom})*$")).expect("valid local part regex")
});
static DOMAIN_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9\x{00A1}-\x{10FFFF}](?:[A-Za-z0-9\x{00A1}-\x{10FFFF}-]{0,61}[A-Za-z0-9\x{00A1}-\x{10FFFF}])?$",
    )
    .expect("valid label regex")
});
static TLD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z\x{00A1}-\x{00A8}\x{00AA}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,}|xn--[A-Za-z0-9-]{2,})$",
    )
    .expect("valid tld regex")
});

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];
const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com", "mac.com"];
const OUTLOOK_DOMAINS: &[&str] = &[
    "hotmail.com",
    "hotmail.co.uk",
    "hotmail.de",
    "hotmail.es",
    "hotmail.fr",
    "hotmail.it",
    "live.com",
    "live.co.uk",
    "live.de",
    "live.fr",
    "msn.com",
    "outlook.com",
    "outlook.co.uk",
    "outlook.de",
    "outlook.fr",
    "passport.com",
];
const YAHOO_DOMAINS: &[&str] = &[
    "yahoo.com",
    "yahoo.ca",
    "yahoo.co.uk",
    "yahoo.de",
    "yahoo.fr",
    "ymail.com",
    "rocketmail.com",
];
const YANDEX_DOMAINS: &[&str] = &[
    "yandex.ru",
    "yandex.ua",
    "yandex.kz",
    "yandex.com",
    "yandex.by",
    "ya.ru",
];

/// Mailbox providers with their own aliasing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Gmail,
    Icloud,
    Outlook,
    Yahoo,
    Yandex,
    Other,
}

impl Provider {
    fn for_domain(domain: &str) -> Self {
        if GMAIL_DOMAINS.contains(&domain) {
            Provider::Gmail
        } else if ICLOUD_DOMAINS.contains(&domain) {
            Provider::Icloud
        } else if OUTLOOK_DOMAINS.contains(&domain) {
            Provider::Outlook
        } else if YAHOO_DOMAINS.contains(&domain) {
            Provider::Yahoo
        } else if YANDEX_DOMAINS.contains(&domain) {
            Provider::Yandex
        } else {
            Provider::Other
        }
    }
}

/// Returns `true` if `email` has the shape `local@domain.tld`.
pub fn is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if !LOCAL_PART_RE.is_match(local) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if !labels.iter().all(|label| DOMAIN_LABEL_RE.is_match(label)) {
        return false;
    }
    labels.last().is_some_and(|tld| TLD_RE.is_match(tld))
}

/// Canonicalise an address that already passed [`is_valid`].
///
/// Returns `None` when a provider rule leaves the mailbox name empty, as with
/// `+tag@gmail.com`; such an address names no mailbox.
pub fn normalize(email: &str) -> Option<String> {
    let lowered = email.to_lowercase();
    let Some((local, domain)) = lowered.rsplit_once('@') else {
        return Some(lowered);
    };

    let (local, domain) = match Provider::for_domain(domain) {
        Provider::Gmail => (before_first(local, '+').replace('.', ""), "gmail.com"),
        Provider::Icloud | Provider::Outlook => (before_first(local, '+').to_owned(), domain),
        Provider::Yahoo => (before_last(local, '-').to_owned(), domain),
        Provider::Yandex => (local.to_owned(), "yandex.ru"),
        Provider::Other => return Some(lowered.clone()),
    };
    (!local.is_empty()).then(|| format!("{local}@{domain}"))
}

/// Everything before the first `separator`.
fn before_first(local: &str, separator: char) -> &str {
    local.split_once(separator).map_or(local, |(head, _)| head)
}

/// Everything before the last `separator`.
fn before_last(local: &str, separator: char) -> &str {
    local.rsplit_once(separator).map_or(local, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_shapes() {
        for email in [
            "a@example.com",
            "Ann.Lee@Example.com",
            "first+tag@sub.example.co.uk",
            "o'neil@example.ie",
            "x_y-z@example-mail.org",
        ] {
            assert!(is_valid(email), "expected valid: {email}");
        }
    }

    #[test]
    fn rejects_malformed_shapes() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "ann@",
            "ann@localhost",
            "ann@@example.com",
            "ann lee@example.com",
            ".ann@example.com",
            "ann.@example.com",
            "ann..lee@example.com",
            "ann@-example.com",
            "ann@example-.com",
            "ann@example.c",
            "ann@example.123",
            "ann@example..com",
        ] {
            assert!(!is_valid(email), "expected invalid: {email}");
        }
    }

    #[test]
    fn rejects_overlong_local_part() {
        let email = format!("{}@example.com", "a".repeat(MAX_LOCAL_LEN + 1));
        assert!(!is_valid(&email));
    }

    #[test]
    fn accepts_internationalised_addresses() {
        for email in ["jöhn@example.com", "名前@example.jp", "ann@münchen.de", "ann@例え.テスト"] {
            assert!(is_valid(email), "expected valid: {email}");
        }
    }

    #[test]
    fn rejects_non_letter_symbols_in_local_part() {
        assert!(!is_valid("ann\u{00A0}lee@example.com"));
        assert!(!is_valid("ann😀@example.com"));
    }

    #[test]
    fn lowercases_other_domains_only() {
        assert_eq!(normalize("Ann.Lee@Example.com").as_deref(), Some("ann.lee@example.com"));
        assert_eq!(normalize("a+b@example.com").as_deref(), Some("a+b@example.com"));
    }

    #[test]
    fn lowercases_beyond_ascii() {
        assert_eq!(normalize("JÖHN@Example.com").as_deref(), Some("jöhn@example.com"));
    }

    #[test]
    fn gmail_drops_dots_and_tags() {
        assert_eq!(
            normalize("Ann.Lee+school@GoogleMail.com").as_deref(),
            Some("annlee@gmail.com")
        );
        assert_eq!(normalize("a.n.n@gmail.com").as_deref(), Some("ann@gmail.com"));
    }

    #[test]
    fn outlook_and_icloud_drop_plus_tags() {
        assert_eq!(normalize("ann+x@outlook.com").as_deref(), Some("ann@outlook.com"));
        assert_eq!(normalize("Ann.Lee+x@iCloud.com").as_deref(), Some("ann.lee@icloud.com"));
    }

    #[test]
    fn yahoo_drops_only_the_last_dash_tag() {
        assert_eq!(normalize("ann-news@yahoo.com").as_deref(), Some("ann@yahoo.com"));
        assert_eq!(normalize("a-b-c@yahoo.com").as_deref(), Some("a-b@yahoo.com"));
        assert_eq!(normalize("john@yahoo.com").as_deref(), Some("john@yahoo.com"));
        assert_eq!(normalize("ann+news@yahoo.com").as_deref(), Some("ann+news@yahoo.com"));
    }

    #[test]
    fn yandex_domains_collapse() {
        assert_eq!(normalize("ann@ya.ru").as_deref(), Some("ann@yandex.ru"));
    }

    #[test]
    fn tag_only_local_part_names_no_mailbox() {
        assert_eq!(normalize("+tag@gmail.com"), None);
        assert_eq!(normalize("+tag@outlook.com"), None);
        assert_eq!(normalize("-tag@yahoo.com"), None);
        assert_eq!(normalize("+tag@example.com").as_deref(), Some("+tag@example.com"));
    }
}
