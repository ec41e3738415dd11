//! Decision-support method catalogue
//!
//! Every method page lives under its own root route (`/hierarchy`,
//! `/savage/...`). Drafts record which method they belong to so the
//! draft list can label them and resume on the right page.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Decision-support method a draft belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodType {
    /// Analytic hierarchy process (pairwise comparisons)
    Hierarchy,
    /// Binary relations
    Binary,
    /// Expert evaluation
    Experts,
    /// Laplace criterion
    Laplasa,
    /// Maximin criterion
    Maximin,
    /// Savage (minimax regret) criterion
    Savage,
    /// Hurwitz criterion
    Hurwitz,
    /// Page outside any method
    #[serde(other)]
    Unknown,
}

impl MethodType {
    /// All methods with a page of their own
    pub const ALL: [MethodType; 7] = [
        MethodType::Hierarchy,
        MethodType::Binary,
        MethodType::Experts,
        MethodType::Laplasa,
        MethodType::Maximin,
        MethodType::Savage,
        MethodType::Hurwitz,
    ];

    /// Wire key, also the root route segment
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodType::Hierarchy => "hierarchy",
            MethodType::Binary => "binary",
            MethodType::Experts => "experts",
            MethodType::Laplasa => "laplasa",
            MethodType::Maximin => "maximin",
            MethodType::Savage => "savage",
            MethodType::Hurwitz => "hurwitz",
            MethodType::Unknown => "unknown",
        }
    }

    /// Parse a wire key; anything unrecognised is `Unknown`
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .unwrap_or(MethodType::Unknown)
    }

    /// Method owning a page path
    ///
    /// Matches `/<method>` exactly or `/<method>/...` as a prefix.
    /// `/hierarchyX` does not match.
    pub fn from_route(path: &str) -> Self {
        for method in Self::ALL {
            let root = format!("/{}", method.as_str());
            if path == root || path.starts_with(&format!("{}/", root)) {
                return method;
            }
        }
        MethodType::Unknown
    }

    /// Whether the save-draft control belongs on this method's pages
    pub fn is_method_page(&self) -> bool {
        *self != MethodType::Unknown
    }

    /// Human-readable method name, as shown in the draft list
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            MethodType::Hierarchy => Some("Метод Аналізу Ієрархій"),
            MethodType::Binary => Some("Метод Бінарних Відношень"),
            MethodType::Experts => Some("Метод Експертних Оцінок"),
            MethodType::Laplasa => Some("Критерій Лапласа"),
            MethodType::Maximin => Some("Критерій Максиміна"),
            MethodType::Savage => Some("Критерій Севіджа"),
            MethodType::Hurwitz => Some("Критерій Гурвіца"),
            MethodType::Unknown => None,
        }
    }
}

impl std::fmt::Display for MethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default draft title: `"<method name> - dd.mm.YYYY HH:MM"`
///
/// `method_key` is the raw `method_type` string from the request, so
/// keys the catalogue does not know still produce a readable title
/// (title-cased per word).
pub fn generate_draft_title<Tz>(method_key: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let name = MethodType::from_key(method_key)
        .display_name()
        .map(str::to_string)
        .unwrap_or_else(|| title_case(method_key));

    format!("{} - {}", name, now.format("%d.%m.%Y %H:%M"))
}

/// Upper-case every letter that follows a non-letter, lower-case the rest
/// (`"topsis_method"` -> `"Topsis_Method"`, `"ahp2x"` -> `"Ahp2X"`)
fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut after_letter = false;
    for c in key.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_from_route_exact_and_prefix() {
        assert_eq!(MethodType::from_route("/hierarchy"), MethodType::Hierarchy);
        assert_eq!(MethodType::from_route("/savage/matrix"), MethodType::Savage);
        assert_eq!(MethodType::from_route("/hurwitz/result/2"), MethodType::Hurwitz);
    }

    #[test]
    fn test_from_route_unknown() {
        assert_eq!(MethodType::from_route("/"), MethodType::Unknown);
        assert_eq!(MethodType::from_route("/drafts/"), MethodType::Unknown);
        assert_eq!(MethodType::from_route("/binaryx"), MethodType::Unknown);
        assert!(!MethodType::from_route("/login").is_method_page());
    }

    #[test]
    fn test_serde_keys() {
        assert_eq!(
            serde_json::to_value(MethodType::Laplasa).unwrap(),
            serde_json::json!("laplasa")
        );
        let parsed: MethodType = serde_json::from_value(serde_json::json!("topsis")).unwrap();
        assert_eq!(parsed, MethodType::Unknown);
    }

    #[test]
    fn test_generate_title_known_method() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(
            generate_draft_title("hierarchy", &now),
            "Метод Аналізу Ієрархій - 07.03.2024 09:05"
        );
    }

    #[test]
    fn test_generate_title_unknown_method() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(generate_draft_title("topsis", &now), "Topsis - 31.12.2024 23:59");
    }

    #[test]
    fn test_title_case_splits_on_non_letters() {
        assert_eq!(title_case("topsis_method"), "Topsis_Method");
        assert_eq!(title_case("ELECTRE tri"), "Electre Tri");
        assert_eq!(title_case("ahp2x"), "Ahp2X");
        assert_eq!(title_case(""), "");
    }
}
