//! Service-location matching
//!
//! Spoken city names arrive in Devanagari, romanized Hindi or English.
//! Known Devanagari (and a few romanized) spellings are first rewritten to
//! the canonical Latin name, longest alias first. The normalized text is
//! then tested against every active center's city and branch tokens,
//! longest token first, so that a short token never claims a longer word.

use crate::normalize::{contains_words, normalize};
use once_cell::sync::Lazy;
use reminder_agent_core::{BranchMatch, ServiceCenter};

const CITY_ALIASES: &[(&str, &str)] = &[
    ("जयपुर", "jaipur"),
    ("जैपुर", "jaipur"),
    ("जोधपुर", "jodhpur"),
    ("उदयपुर", "udaipur"),
    ("कोटा", "kota"),
    ("अजमेर", "ajmer"),
    ("बीकानेर", "bikaner"),
    ("भीलवाड़ा", "bhilwara"),
    ("भीलवाडा", "bhilwara"),
    ("अलवर", "alwar"),
    ("सीकर", "sikar"),
    ("दिल्ली", "delhi"),
    ("देहली", "delhi"),
    ("नई दिल्ली", "delhi"),
    ("dilli", "delhi"),
    ("new delhi", "delhi"),
    ("अहमदाबाद", "ahmedabad"),
    ("amdavad", "ahmedabad"),
    ("इंदौर", "indore"),
    ("इन्दौर", "indore"),
    ("लखनऊ", "lucknow"),
    ("lakhnau", "lucknow"),
    ("रायपुर", "raipur"),
    ("गुड़गांव", "gurgaon"),
    ("गुड़गाँव", "gurgaon"),
    ("गुरुग्राम", "gurgaon"),
    ("gurugram", "gurgaon"),
    ("मानेसर", "manesar"),
    ("सीतापुरा", "sitapura"),
    ("मुंबई", "mumbai"),
    ("मुम्बई", "mumbai"),
    ("bombay", "mumbai"),
    ("पुणे", "pune"),
    ("पूना", "pune"),
    ("poona", "pune"),
    ("भोपाल", "bhopal"),
    ("नागपुर", "nagpur"),
    ("सूरत", "surat"),
    ("वडोदरा", "vadodara"),
    ("baroda", "vadodara"),
    ("चंडीगढ़", "chandigarh"),
    ("लुधियाना", "ludhiana"),
    ("आगरा", "agra"),
    ("कानपुर", "kanpur"),
    ("पटना", "patna"),
    ("हैदराबाद", "hyderabad"),
    ("बेंगलुरु", "bangalore"),
    ("बैंगलोर", "bangalore"),
    ("bengaluru", "bangalore"),
];

/// Aliases sorted longest first
static ALIASES_BY_LENGTH: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut aliases = CITY_ALIASES.to_vec();
    aliases.sort_by_key(|(alias, _)| std::cmp::Reverse(alias.chars().count()));
    aliases
});

/// Rewrite known spellings to canonical Latin city names
pub fn transliterate_city_aliases(text: &str) -> String {
    let mut out = text.to_lowercase();
    for (alias, canonical) in ALIASES_BY_LENGTH.iter() {
        if out.contains(alias) {
            out = out.replace(alias, canonical);
        }
    }
    out
}

/// Fuzzy matcher over the active service centers
#[derive(Debug, Clone)]
pub struct LocationMatcher {
    /// (normalized token, center) sorted longest token first
    tokens: Vec<(String, BranchMatch)>,
}

impl LocationMatcher {
    /// Inactive centers are skipped
    pub fn new(centers: &[ServiceCenter]) -> Self {
        let mut tokens = Vec::new();
        for center in centers.iter().filter(|c| c.active) {
            let matched = center.to_match();
            for field in [&center.city_name, &center.branch_name] {
                let token = normalize(field);
                if !token.is_empty() {
                    tokens.push((token, matched.clone()));
                }
            }
        }
        // stable: equal lengths keep directory order
        tokens.sort_by_key(|(token, _)| std::cmp::Reverse(token.chars().count()));

        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Match an utterance against the directory
    pub fn find(&self, raw: &str) -> Option<BranchMatch> {
        let text = normalize(&transliterate_city_aliases(raw));
        if text.is_empty() {
            return None;
        }
        self.tokens
            .iter()
            .find(|(token, _)| contains_words(&text, token))
            .map(|(_, center)| center.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(code: &str, city: &str, branch: &str, active: bool) -> ServiceCenter {
        ServiceCenter {
            id: code.to_lowercase(),
            city_name: city.into(),
            branch_name: branch.into(),
            branch_code: code.into(),
            address: format!("{branch}, {city}"),
            active,
        }
    }

    fn matcher() -> LocationMatcher {
        LocationMatcher::new(&[
            center("JPR01", "Jaipur", "Sitapura", true),
            center("RPR01", "Raipur", "Urla", true),
            center("GGN01", "Gurgaon", "Manesar", true),
            center("DEL01", "Delhi", "Okhla", true),
            center("KTA09", "Kota", "Old Branch", false),
        ])
    }

    #[test]
    fn test_script_and_case_insensitive() {
        let m = matcher();
        let devanagari = m.find("जयपुर").unwrap();
        let latin = m.find("JAIPUR").unwrap();
        assert_eq!(devanagari.code, "JPR01");
        assert_eq!(devanagari.code, latin.code);
    }

    #[test]
    fn test_alias_in_sentence() {
        let m = matcher();
        assert_eq!(m.find("हम जयपुर में हैं").unwrap().code, "JPR01");
        assert_eq!(m.find("machine gurugram mein hai").unwrap().code, "GGN01");
        assert_eq!(m.find("नई दिल्ली").unwrap().code, "DEL01");
    }

    #[test]
    fn test_branch_name_matches() {
        let m = matcher();
        assert_eq!(m.find("sitapura wale center pe").unwrap().code, "JPR01");
        assert_eq!(m.find("मानेसर").unwrap().code, "GGN01");
    }

    #[test]
    fn test_similar_cities_do_not_collide() {
        let m = matcher();
        assert_eq!(m.find("रायपुर").unwrap().code, "RPR01");
        assert_eq!(m.find("raipur").unwrap().code, "RPR01");
    }

    #[test]
    fn test_inactive_center_not_matched() {
        assert!(matcher().find("kota").is_none());
    }

    #[test]
    fn test_no_match() {
        let m = matcher();
        assert!(m.find("").is_none());
        assert!(m.find("haan theek hai").is_none());
        assert!(m.find("jaipurwala").is_none());
    }
}
