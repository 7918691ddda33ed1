//! Spoken reply templates (Hindi, Devanagari with English loanwords)

use reminder_agent_core::{BranchMatch, CustomerInfo, DialogueState, Intent};

fn name(customer: &CustomerInfo) -> &str {
    if customer.customer_name.trim().is_empty() {
        "ग्राहक"
    } else {
        customer.customer_name.as_str()
    }
}

pub fn opening(customer: &CustomerInfo) -> String {
    format!(
        "नमस्ते {} जी, मैं सर्विस टीम से बोल रही हूँ। आपकी {} मशीन ({}) की {} सर्विस {} को ड्यू है। क्या हम आपकी सर्विस बुक कर दें?",
        name(customer),
        customer.asset_model,
        customer.asset_id,
        customer.service_type,
        customer.due_date
    )
}

pub fn clarify(customer: &CustomerInfo) -> String {
    format!(
        "मैं आपकी {} मशीन की सर्विस के बारे में बात कर रही हूँ, जिसकी {} सर्विस {} को ड्यू है। क्या हम सर्विस बुक कर दें?",
        customer.asset_model, customer.service_type, customer.due_date
    )
}

pub fn ask_date() -> String {
    "बहुत बढ़िया! आप किस तारीख को सर्विस करवाना चाहेंगे?".to_string()
}

pub fn reprompt_date() -> String {
    "कृपया सर्विस के लिए कोई तारीख बताइए, जैसे कल, सोमवार या 25 तारीख।".to_string()
}

pub fn reopen_date() -> String {
    "कोई बात नहीं। फिर आप कौन सी तारीख चाहेंगे?".to_string()
}

pub fn confirm_date(display: &str) -> String {
    format!("तो मैं आपकी सर्विस {} के लिए नोट कर रही हूँ, सही है?", display)
}

pub fn ask_branch() -> String {
    "धन्यवाद। आपकी मशीन किस शहर या ब्रांच के पास है?".to_string()
}

pub fn reask_branch() -> String {
    "माफ़ कीजिए, शहर का नाम समझ नहीं आया। कृपया अपने शहर या नज़दीकी ब्रांच का नाम बताइए।"
        .to_string()
}

pub fn branch_noted_ask_date(branch: &BranchMatch) -> String {
    format!(
        "ठीक है, {} सर्विस सेंटर नोट कर लिया। आप किस तारीख को सर्विस करवाना चाहेंगे?",
        branch.city
    )
}

pub fn booking_confirmed(date: &str, branch: &BranchMatch) -> String {
    format!(
        "आपकी सर्विस {} को हमारे {} ({}) सर्विस सेंटर पर बुक कर दी गई है। हमारी टीम आपसे संपर्क करेगी। धन्यवाद!",
        date, branch.name, branch.city
    )
}

pub fn date_noted_goodbye(date: &str) -> String {
    format!(
        "ठीक है, आपकी सर्विस {} के लिए नोट कर ली गई है। हमारी टीम ब्रांच के लिए आपसे संपर्क करेगी। धन्यवाद!",
        date
    )
}

pub fn branch_noted_goodbye(branch: &BranchMatch) -> String {
    format!(
        "ठीक है, {} सर्विस सेंटर नोट कर लिया है। तारीख के लिए हमारी टीम आपसे संपर्क करेगी। धन्यवाद!",
        branch.city
    )
}

pub fn ask_reason() -> String {
    "कोई बात नहीं। क्या आप बता सकते हैं कि आप अभी सर्विस क्यों नहीं करवाना चाहते?".to_string()
}

pub fn persuasion() -> String {
    "समय पर सर्विस से मशीन की लाइफ बढ़ती है और बड़े ब्रेकडाउन से बचाव होता है। क्या हम आपके सुविधाजनक दिन पर सर्विस बुक कर दें?"
        .to_string()
}

pub fn branch_persuasion() -> String {
    "बस शहर का नाम बता दीजिए, हम नज़दीकी सर्विस सेंटर से आपकी बुकिंग पक्की कर देंगे।".to_string()
}

/// Scripted counter for an objection, ending with a request for a date
pub fn objection_reply(intent: Intent) -> String {
    match intent {
        Intent::DriverUnavailable => {
            "हमारे टेक्नीशियन ड्राइवर के बिना भी मशीन की जाँच कर सकते हैं। आप कोई ऐसी तारीख बताइए जब मशीन उपलब्ध हो।"
        }
        Intent::MachineBusy => {
            "सर्विस में ज़्यादा समय नहीं लगता, हम काम के बाद या छुट्टी वाले दिन भी आ सकते हैं। कौन सी तारीख ठीक रहेगी?"
        }
        Intent::WorkingFine => {
            "यह अच्छी बात है! समय पर सर्विस से मशीन आगे भी ऐसे ही ठीक चलती रहेगी। कौन सी तारीख ठीक रहेगी?"
        }
        Intent::MoneyIssue => {
            "सर्विस के चार्ज किफ़ायती हैं, और समय पर सर्विस से बाद के बड़े खर्च से बचाव होता है। कौन सी तारीख ठीक रहेगी?"
        }
        Intent::CallLater => {
            "ज़रूर। आप बस एक सुविधाजनक तारीख बता दीजिए, हम उसी दिन के लिए बुक कर देंगे।"
        }
        _ => "कोई बात नहीं। आप अपनी सुविधा से कोई तारीख बता दीजिए।",
    }
    .to_string()
}

pub fn ask_service_details() -> String {
    "अच्छा, आपने सर्विस पहले ही करवा ली है। कृपया बताइए कि सर्विस कब और कहाँ करवाई थी?".to_string()
}

pub fn already_done_thanks() -> String {
    "जानकारी के लिए धन्यवाद, हमने अपना रिकॉर्ड अपडेट कर लिया है। आपका दिन शुभ हो!".to_string()
}

pub fn rejected_goodbye() -> String {
    "ठीक है, आपका समय देने के लिए धन्यवाद। ज़रूरत हो तो हमें कभी भी कॉल करें।".to_string()
}

pub fn no_response_goodbye() -> String {
    "लगता है अभी बात करना संभव नहीं है। हम आपसे बाद में संपर्क करेंगे। धन्यवाद!".to_string()
}

pub fn low_confidence() -> String {
    "माफ़ कीजिए, आपकी आवाज़ साफ़ नहीं आई। क्या आप दोबारा बोल सकते हैं?".to_string()
}

pub fn technical_error() -> String {
    "माफ़ कीजिए, तकनीकी समस्या के कारण कॉल समाप्त की जा रही है। हम आपसे जल्द संपर्क करेंगे।"
        .to_string()
}

pub fn session_expired() -> String {
    "माफ़ कीजिए, यह कॉल सत्र समाप्त हो चुका है। धन्यवाद।".to_string()
}

/// Re-ask the question that belongs to `state`
pub fn reask(state: DialogueState, customer: &CustomerInfo, tentative_date: Option<&str>) -> String {
    match state {
        DialogueState::AwaitingInitialDecision => format!(
            "क्या हम आपकी {} मशीन की सर्विस बुक कर दें? कृपया हाँ या ना में बताइए।",
            customer.asset_model
        ),
        DialogueState::AwaitingReason | DialogueState::AwaitingReasonPersisted => {
            "क्या आप बता सकते हैं कि सर्विस क्यों नहीं करवानी है?".to_string()
        }
        DialogueState::AwaitingDate => reprompt_date(),
        DialogueState::AwaitingDateConfirm => match tentative_date {
            Some(date) => confirm_date(date),
            None => reprompt_date(),
        },
        DialogueState::AwaitingBranch => reask_branch(),
        DialogueState::AwaitingServiceDetails => {
            "कृपया बताइए कि सर्विस कब और कहाँ करवाई थी?".to_string()
        }
        DialogueState::Ended => rejected_goodbye(),
    }
}
