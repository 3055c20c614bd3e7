use crate::models::SignalCategory;

/// Fixed phrase list for one signal category. Phrases are lowercase and
/// matched by substring containment against lowercased transcript text.
#[derive(Debug, Clone, Copy)]
pub struct PhraseTable {
    pub category: SignalCategory,
    pub phrases: &'static [&'static str],
}

const START_PHRASES: &[&str] = &[
    "sponsored by",
    "this video is sponsored",
    "brought to you by",
    "this video is brought",
    "thanks to our sponsor",
    "a quick word from",
    "before we continue",
    "want to tell you about",
    "today's sponsor",
    "shoutout to",
    "partnered with",
];

const END_PHRASES: &[&str] = &[
    "link in the description",
    "link in description",
    "link below",
    "use code",
    "coupon code",
    "promo code",
    "percent off",
    "% off",
    "first month free",
    "free trial",
    "sign up today",
    "click the link",
];

const BRAND_PHRASES: &[&str] = &[
    "nordvpn",
    "expressvpn",
    "surfshark",
    "raid shadow legends",
    "raycon",
    "manscaped",
    "ridge wallet",
    "hellofresh",
    "squarespace",
    "skillshare",
    "brilliant",
    "audible",
    "betterhelp",
    "honey",
    "incogni",
    "aura",
    "ground news",
    "nebula",
    "athletic greens",
    "ag1",
    "established titles",
];

const TOPIC_PHRASES: &[&str] = &[
    "vpn",
    "privacy",
    "personal data",
    "annual plan",
    "subscription",
    "discount",
    "data brokers",
];

const WEAK_PHRASES: &[&str] = &["check out", "go to", "visit", "head to", "sponsor"];

/// Returns the phrase table for a category.
pub fn table_for(category: SignalCategory) -> PhraseTable {
    let phrases = match category {
        SignalCategory::Start => START_PHRASES,
        SignalCategory::End => END_PHRASES,
        SignalCategory::Brand => BRAND_PHRASES,
        SignalCategory::Topic => TOPIC_PHRASES,
        SignalCategory::Weak => WEAK_PHRASES,
    };
    PhraseTable { category, phrases }
}

/// All five tables in category order.
pub fn phrase_tables() -> [PhraseTable; 5] {
    SignalCategory::ALL.map(table_for)
}
