//! Intent pattern tables
//!
//! The cascade is an ordered list of `(intent, phrase set)` pairs; the
//! first category that matches wins. Tables can be replaced from YAML with
//! [`IntentPatterns::from_yaml`], but the built-in order is the contract.

use crate::normalize::{contains_words, normalize};
use crate::TextProcessingError;
use reminder_agent_core::Intent;
use serde::{Deserialize, Serialize};

/// Literal phrases for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSet {
    /// Matched as substrings of the normalized utterance
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Matched as whole tokens (bare particles such as "nahi", "ok")
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl PhraseSet {
    fn from_lists(phrases: &[&str], tokens: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Bring every entry into normalized form
    pub fn normalized(&self) -> Self {
        let clean = |list: &[String]| {
            list.iter()
                .map(|p| normalize(p))
                .filter(|p| !p.is_empty())
                .collect()
        };
        Self {
            phrases: clean(&self.phrases),
            tokens: clean(&self.tokens),
        }
    }

    /// `text` must be normalized
    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text.contains(p.as_str()))
            || self.tokens.iter().any(|t| contains_words(text, t))
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.tokens.is_empty()
    }
}

/// One cascade entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatterns {
    pub intent: Intent,
    #[serde(flatten)]
    pub set: PhraseSet,
}

/// Ordered cascade plus the filler words used by the confirm guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPatterns {
    pub categories: Vec<CategoryPatterns>,
    #[serde(default)]
    pub filler_acknowledgments: Vec<String>,
}

/// Fixed cascade priority
pub const CASCADE_ORDER: [Intent; 12] = [
    Intent::Repeat,
    Intent::Confusion,
    Intent::AlreadyDone,
    Intent::DriverUnavailable,
    Intent::MachineBusy,
    Intent::WorkingFine,
    Intent::MoneyIssue,
    Intent::CallLater,
    Intent::ProvideDate,
    Intent::Confirm,
    Intent::ProvideBranch,
    Intent::Reject,
];

impl IntentPatterns {
    pub fn from_yaml(yaml: &str) -> Result<Self, TextProcessingError> {
        let patterns: Self = serde_yaml::from_str(yaml)
            .map_err(|e| TextProcessingError::InvalidPatterns(e.to_string()))?;
        patterns.validate()?;
        Ok(patterns)
    }

    /// Categories must follow the cascade priority, each at most once
    pub fn validate(&self) -> Result<(), TextProcessingError> {
        let mut last_rank = None;
        for category in &self.categories {
            let rank = CASCADE_ORDER
                .iter()
                .position(|i| *i == category.intent)
                .ok_or_else(|| {
                    TextProcessingError::InvalidPatterns(format!(
                        "{} cannot be a cascade category",
                        category.intent
                    ))
                })?;
            if last_rank.map_or(false, |last| rank <= last) {
                return Err(TextProcessingError::InvalidPatterns(format!(
                    "{} is out of priority order or repeated",
                    category.intent
                )));
            }
            last_rank = Some(rank);
        }
        Ok(())
    }

    pub fn category(&self, intent: Intent) -> Option<&PhraseSet> {
        self.categories
            .iter()
            .find(|c| c.intent == intent)
            .map(|c| &c.set)
    }
}

impl Default for IntentPatterns {
    fn default() -> Self {
        let categories = CASCADE_ORDER
            .iter()
            .map(|intent| CategoryPatterns {
                intent: *intent,
                set: builtin_set(*intent),
            })
            .collect();

        Self {
            categories,
            filler_acknowledgments: FILLERS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

const FILLERS: &[&str] = &[
    "accha", "achha", "acha", "achchha", "hmm", "hm", "hmmm", "ok", "okay", "ji", "अच्छा", "हम्म",
    "ओके", "जी",
];

fn builtin_set(intent: Intent) -> PhraseSet {
    match intent {
        Intent::Repeat => PhraseSet::from_lists(
            &[
                "phir se bolo", "phir se boliye", "fir se bolo", "fir se boliye", "phir se batao",
                "phir se bataiye", "dobara bolo", "dobara boliye", "dobara batao", "dubara bolo",
                "repeat", "kya bola", "kya kaha", "kya bol rahe", "sunai nahi diya",
                "sunai nahi de raha", "awaaz nahi aa rahi", "awaz nahi aa rahi", "say again",
                "come again", "pardon", "फिर से बोलिए", "फिर से बोलो", "फिर से बताइए",
                "दोबारा बोलिए", "दोबारा बोलो", "दोबारा बताइए", "क्या बोला", "क्या कहा",
                "सुनाई नहीं", "आवाज़ नहीं", "आवाज नहीं",
            ],
            &[],
        ),
        Intent::Confusion => PhraseSet::from_lists(
            &[
                "samajh nahi aaya", "samajh nahi aya", "samjha nahi", "samjhi nahi", "samajh nahi",
                "kya matlab", "matlab kya", "kaun bol raha", "kaun bol rahi", "kaun hai",
                "aap kaun", "kis baare mein", "kis bare me", "kiski baat", "kaunsi machine",
                "kaun si machine", "what is this", "who is this", "who are you",
                "don't understand", "dont understand", "not understand", "समझ नहीं", "क्या मतलब",
                "कौन बोल", "आप कौन", "किस बारे में", "कौन सी मशीन",
            ],
            &[],
        ),
        Intent::AlreadyDone => PhraseSet::from_lists(
            &[
                "already", "pehle hi", "pahle hi", "pehle se", "ho chuki", "ho chuka",
                "service ho gayi", "service ho gai", "service ho gaya", "servicing ho gayi",
                "karwa li", "karwa liya", "karva li", "karva liya", "kara li", "kara liya",
                "करवा ली", "करवा लिया", "करा ली", "करा लिया", "हो चुकी", "हो चुका", "पहले ही",
                "सर्विस हो गई", "सर्विस हो गयी",
            ],
            &[],
        ),
        Intent::DriverUnavailable => PhraseSet::from_lists(
            &[
                "driver nahi", "driver nahin", "driver nai", "driver chutti", "driver leave",
                "driver gaon", "driver bimar", "driver absent", "driver not available",
                "no driver", "operator nahi", "operator nahin", "operator chutti",
                "chalane wala nahi", "ड्राइवर नहीं", "ड्राइवर छुट्टी", "ड्राइवर गांव",
                "ऑपरेटर नहीं", "चलाने वाला नहीं",
            ],
            &[],
        ),
        Intent::MachineBusy => PhraseSet::from_lists(
            &[
                "machine busy", "machine site", "site pe", "site par", "kaam chal raha",
                "kaam pe hai", "kaam par hai", "kaam pe lagi", "kaam mein lagi",
                "machine chal rahi", "machine lagi hui", "project pe", "project par",
                "busy hai machine", "मशीन बिज़ी", "मशीन बिजी", "मशीन चल रही", "साइट पर",
                "साइट पे", "काम चल रहा", "काम पर लगी", "काम पे लगी",
            ],
            &[],
        ),
        Intent::WorkingFine => PhraseSet::from_lists(
            &[
                "theek chal rahi", "thik chal rahi", "theek chal raha", "thik chal raha",
                "sahi chal rahi", "sahi chal raha", "badhiya chal rahi", "acchi chal rahi",
                "achhi chal rahi", "working fine", "works fine", "running fine", "running well",
                "koi problem nahi", "koi problem nahin", "koi dikkat nahi", "koi dikkat nahin",
                "koi pareshani nahi", "koi issue nahi", "zarurat nahi", "zaroorat nahi",
                "jarurat nahi", "need nahi", "no need", "ठीक चल रही", "ठीक चल रहा",
                "सही चल रही", "बढ़िया चल रही", "कोई दिक्कत नहीं", "कोई समस्या नहीं",
                "कोई प्रॉब्लम नहीं", "ज़रूरत नहीं", "जरूरत नहीं",
            ],
            &[],
        ),
        Intent::MoneyIssue => PhraseSet::from_lists(
            &[
                "paise nahi", "paisa nahi", "paise nahin", "paisa nahin", "budget nahi",
                "budget nahin", "fund nahi", "mehenga", "mehnga", "mahanga", "costly",
                "expensive", "charges zyada", "charge zyada", "kharcha", "kharch", "payment",
                "paise ki dikkat", "paise ki problem", "पैसे नहीं", "पैसा नहीं", "महंगा", "महँगा",
                "बजट नहीं", "खर्च",
            ],
            &[],
        ),
        Intent::CallLater => PhraseSet::from_lists(
            &[
                "baad mein", "baad me", "bad me", "bad mein", "later", "call back", "callback",
                "phir call", "fir call", "phir phone", "abhi busy", "abhi nahi", "abhi time nahi",
                "abhi samay nahi", "time nahi hai", "busy hoon", "busy hu", "meeting mein",
                "drive kar raha", "next time", "kuch din baad", "बाद में", "अभी नहीं",
                "अभी बिज़ी", "अभी बिजी", "अभी समय नहीं", "अभी टाइम नहीं", "फिर कॉल",
            ],
            &[],
        ),
        Intent::ProvideDate => PhraseSet::from_lists(
            &[
                "reschedule", "date change", "date badal", "dusri date", "doosri date",
                "date aage", "aage kar do", "aage karo", "postpone", "prepone", "koi aur din",
                "kisi aur din", "doosre din", "दूसरी तारीख", "तारीख बदल", "आगे कर दो",
                "किसी और दिन",
            ],
            &[],
        ),
        Intent::Confirm => PhraseSet::from_lists(
            &[
                "haan ji", "ha ji", "ji haan", "ji ha", "theek hai", "thik hai", "sahi hai",
                "book kar", "book karo", "book kardo", "karwa do",
                "karwa dijiye", "karva do", "chalega", "chalo theek", "bilkul", "zaroor", "jarur",
                "jaroor", "of course", "go ahead", "please book", "yes please", "no problem",
                "हाँ जी", "हां जी", "जी हाँ", "जी हां", "ठीक है", "बुक कर", "करवा दो", "चलेगा",
                "बिल्कुल", "ज़रूर", "जरूर",
            ],
            &[
                "haan", "han", "haa", "ha", "hanji", "haanji", "yes", "yeah", "yep", "ok", "okay",
                "okk", "sure", "accha", "achha", "acha", "hmm", "hm", "हाँ", "हां", "हा", "अच्छा",
                "ओके",
            ],
        ),
        Intent::Reject => PhraseSet::from_lists(
            &[
                "nahi chahiye", "nahin chahiye", "nai chahiye", "nahi karwana", "nahi karna",
                "nahi karani", "nahi karwani", "mat karo", "mat kijiye", "interest nahi",
                "interested nahi", "not interested", "no thanks", "no thank you", "don't want",
                "dont want", "do not want", "cancel", "band karo", "rehne do", "rehne dijiye",
                "jaane do", "नहीं चाहिए", "नहीं करवाना", "नहीं करना", "मत करो", "रहने दो",
                "रहने दीजिए",
            ],
            &[
                "nahi", "nahin", "nai", "na", "naa", "no", "nope", "mana", "mat", "नहीं", "नही", "ना",
                "मत",
            ],
        ),
        // location-gated; no phrases
        _ => PhraseSet::default(),
    }
}
