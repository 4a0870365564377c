//! Customer-facing strings in the six supported languages.
//!
//! Lookups never fail: an unknown key renders as the key itself and an
//! unknown product id renders with the backend's own name.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Te,
    Kn,
    Ml,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Hi,
        Language::Ta,
        Language::Te,
        Language::Kn,
        Language::Ml,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ta => "ta",
            Language::Te => "te",
            Language::Kn => "kn",
            Language::Ml => "ml",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Ta => "தமிழ்",
            Language::Te => "తెలుగు",
            Language::Kn => "ಕನ್ನಡ",
            Language::Ml => "മലയാളം",
        }
    }

    fn table(self) -> &'static Table {
        match self {
            Language::En => &EN,
            Language::Hi => &HI,
            Language::Ta => &TA,
            Language::Te => &TE,
            Language::Kn => &KN,
            Language::Ml => &ML,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Basket,
    Items,
    BasketEmpty,
    ScanItems,
    Subtotal,
    Tax,
    Total,
    NoDiscount,
    Checkout,
    TotalAmount,
    PayNow,
    Processing,
    PaymentSuccessful,
    Announcement,
    GotIt,
    SpinWin,
    YouWon,
    DiscountApplied,
}

impl Msg {
    pub const ALL: [Msg; MSG_COUNT] = [
        Msg::Basket,
        Msg::Items,
        Msg::BasketEmpty,
        Msg::ScanItems,
        Msg::Subtotal,
        Msg::Tax,
        Msg::Total,
        Msg::NoDiscount,
        Msg::Checkout,
        Msg::TotalAmount,
        Msg::PayNow,
        Msg::Processing,
        Msg::PaymentSuccessful,
        Msg::Announcement,
        Msg::GotIt,
        Msg::SpinWin,
        Msg::YouWon,
        Msg::DiscountApplied,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Msg::Basket => "basket",
            Msg::Items => "items",
            Msg::BasketEmpty => "basketEmpty",
            Msg::ScanItems => "scanItems",
            Msg::Subtotal => "subtotal",
            Msg::Tax => "tax",
            Msg::Total => "total",
            Msg::NoDiscount => "noDiscount",
            Msg::Checkout => "checkout",
            Msg::TotalAmount => "totalAmount",
            Msg::PayNow => "payNow",
            Msg::Processing => "processing",
            Msg::PaymentSuccessful => "paymentSuccessful",
            Msg::Announcement => "announcement",
            Msg::GotIt => "gotIt",
            Msg::SpinWin => "spinWin",
            Msg::YouWon => "youWon",
            Msg::DiscountApplied => "discountApplied",
        }
    }
}

const MSG_COUNT: usize = 18;

struct Table {
    messages: [&'static str; MSG_COUNT],
    products: &'static [(&'static str, &'static str)],
}

static EN: Table = Table {
    messages: [
        "Basket",
        "Items",
        "Your basket is empty",
        "Scan items to add them",
        "Subtotal",
        "Tax",
        "Total",
        "No Discount",
        "Checkout",
        "Total Amount",
        "Pay Now",
        "Processing",
        "Payment Successful!",
        "Announcement",
        "Got it!",
        "SPIN & WIN!",
        "You won:",
        "Discount applied automatically at checkout!",
    ],
    products: &[
        ("03563B38", "Milk Packet"),
        ("079B3F55", "Biscuit Packet"),
        ("435D1D39", "Tea Powder"),
        ("52612D5C", "India Gate Basmati Rice"),
        ("83E69038", "Sugar"),
        ("9917FEE4", "Sunflower Oil"),
        ("B3211839", "Bread Loaf"),
        ("E3F72C39", "Aashirvaad Atta"),
    ],
};

static HI: Table = Table {
    messages: [
        "टोकरी",
        "आइटम",
        "आपकी टोकरी खाली है",
        "आइटम जोड़ने के लिए स्कैन करें",
        "उपयोग",
        "कर",
        "कुल",
        "कोई छूट नहीं",
        "चेकआउट",
        "कुल राशि",
        "अभी भुगतान करें",
        "प्रोसेसिंग",
        "भुगतान सफल!",
        "घोषणा",
        "समझ गया!",
        "स्पिन और जीतें!",
        "आपने जीता:",
        "चेकआउट पर स्वचालित रूप से छूट लागू!",
    ],
    products: &[
        ("03563B38", "दूध पैकेट"),
        ("079B3F55", "बिस्कुट पैकेट"),
        ("435D1D39", "चाय पाउडर"),
        ("52612D5C", "इंडिया गेट बासमती चावल"),
        ("83E69038", "चीनी"),
        ("9917FEE4", "सूरजमुखी तेल"),
        ("B3211839", "ब्रेड लोफ"),
        ("E3F72C39", "आशीर्वाद आटा"),
    ],
};

static TA: Table = Table {
    messages: [
        "கூடை",
        "பொருட்கள்",
        "உங்கள் கூடை காலியாக உள்ளது",
        "பொருட்களைச் சேர்க்க ஸ்கேன் செய்யவும்",
        "துணைத்தொகை",
        "வரி",
        "மொத்தம்",
        "தள்ளுபடி இல்லை",
        "செக்அவுட்",
        "மொத்தத் தொகை",
        "இப்போது செலுத்துங்கள்",
        "செயலாக்கம்",
        "பணம் செலுத்தியது வெற்றி!",
        "அறிவிப்பு",
        "புரிந்தது!",
        "சுழற்றி வெல்லுங்கள்!",
        "நீங்கள் வென்றீர்கள்:",
        "செக்அவுட்டில் தானாக தள்ளுபடி பயன்படுத்தப்பட்டது!",
    ],
    products: &[
        ("03563B38", "பால் பாக்கெட்"),
        ("079B3F55", "பிஸ்கட் பாக்கெட்"),
        ("435D1D39", "தேயிலை பொடி"),
        ("52612D5C", "இந்தியா கேட் பாஸ்மதி அரிசி"),
        ("83E69038", "சர்க்கரை"),
        ("9917FEE4", "சூரியகாந்தி எண்ணெய்"),
        ("B3211839", "ரொட்டி லோஃப்"),
        ("E3F72C39", "ஆசீர்வாத அட்டா"),
    ],
};

static TE: Table = Table {
    messages: [
        "బుట్ట",
        "వస్తువులు",
        "మీ బుట్ట ఖాళీగా ఉంది",
        "వస్తువులను జోడించడానికి స్కాన్ చేయండి",
        "ఉపమొత్తం",
        "పన్ను",
        "మొత్తం",
        "డిస్కౌంట్ లేదు",
        "చెక్అవుట్",
        "మొత్తం మొత్తం",
        "ఇప్పుడు చెల్లించండి",
        "ప్రాసెసింగ్",
        "చెల్లింపు విజయవంతం!",
        "ప్రకటన",
        "అర్థమైంది!",
        "స్పిన్ మరియు గెలవండి!",
        "మీరు గెలిచారు:",
        "చెక్అవుట్‌లో స్వయంచాలకంగా తగ్గింపు వర్తించబడింది!",
    ],
    products: &[
        ("03563B38", "పాల ప్యాకెట్"),
        ("079B3F55", "బిస్కెట్ ప్యాకెట్"),
        ("435D1D39", "టీ పౌడర్"),
        ("52612D5C", "ఇండియా గేట్ బాస్మతి వరి"),
        ("83E69038", "చక్కెర"),
        ("9917FEE4", "సూర్యకాంతి నూనె"),
        ("B3211839", "బ్రెడ్ లోఫ్"),
        ("E3F72C39", "ఆశీర్వాద అట్టా"),
    ],
};

static KN: Table = Table {
    messages: [
        "ಬುಟ್ಟಿ",
        "ವಸ್ತುಗಳು",
        "ನಿಮ್ಮ ಬುಟ್ಟಿ ಖಾಲಿಯಾಗಿದೆ",
        "ವಸ್ತುಗಳನ್ನು ಸೇರಿಸಲು ಸ್ಕ್ಯಾನ್ ಮಾಡಿ",
        "ಉಪಮೊತ್ತ",
        "ತೆರಿಗೆ",
        "ಒಟ್ಟು",
        "ರಿಯಾಯಿತಿ ಇಲ್ಲ",
        "ಚೆಕ್‌ಔಟ್",
        "ಒಟ್ಟು ಮೊತ್ತ",
        "ಈಗ ಪಾವತಿಸಿ",
        "ಪ್ರಕ್ರಿಯೆಗೊಳಿಸಲಾಗುತ್ತಿದೆ",
        "ಪಾವತಿ ಯಶಸ್ವಿಯಾಗಿದೆ!",
        "ಘೋಷಣೆ",
        "ಅರ್ಥವಾಯಿತು!",
        "ಸ್ಪಿನ್ ಮತ್ತು ಗೆಲ್ಲಿ!",
        "ನೀವು ಗೆದ್ದಿದ್ದೀರಿ:",
        "ಚೆಕ್‌ಔಟ್‌ನಲ್ಲಿ ಸ್ವಯಂಚಾಲಿತವಾಗಿ ರಿಯಾಯಿತಿ ಅನ್ವಯಿಸಲಾಗಿದೆ!",
    ],
    products: &[
        ("03563B38", "ಹಾಲು ಪ್ಯಾಕೆಟ್"),
        ("079B3F55", "ಬಿಸ್ಕೆಟ್ ಪ್ಯಾಕೆಟ್"),
        ("435D1D39", "ಟೀ ಪೌಡರ್"),
        ("52612D5C", "ಇಂಡಿಯಾ ಗೇಟ್ ಬಾಸ್ಮತಿ ಅನ್ನ"),
        ("83E69038", "ಸಕ್ಕರೆ"),
        ("9917FEE4", "ಸೂರ್ಯಕಾಂತಿ ಎಣ್ಣೆ"),
        ("B3211839", "ಬ್ರೆಡ್ ಲೋಫ್"),
        ("E3F72C39", "ಆಶೀರ್ವಾದ ಅಟ್ಟಾ"),
    ],
};

static ML: Table = Table {
    messages: [
        "ബാസ്കറ്റ്",
        "ഇനങ്ങൾ",
        "നിങ്ങളുടെ ബാസ്കറ്റ് ശൂന്യമാണ്",
        "ഇനങ്ങൾ ചേർക്കാൻ സ്കാൻ ചെയ്യുക",
        "ഉപആകെ",
        "നികുതി",
        "ആകെ",
        "കിഴിവില്ല",
        "ചെക്ക്ഔട്ട്",
        "ആകെ തുക",
        "ഇപ്പോൾ അടയ്ക്കുക",
        "പ്രോസസ്സിംഗ്",
        "പേയ്മെന്റ് വിജയകരം!",
        "അറിയിപ്പ്",
        "മനസ്സിലായി!",
        "സ്പിൻ ചെയ്ത് വിജയിക്കൂ!",
        "നിങ്ങൾ നേടി:",
        "ചെക്ക്ഔട്ടിൽ സ്വയമേവ കിഴിവ് പ്രയോഗിച്ചു!",
    ],
    products: &[
        ("03563B38", "പാൽ പാക്കറ്റ്"),
        ("079B3F55", "ബിസ്‌ക്കറ്റ് പാക്കറ്റ്"),
        ("435D1D39", "ടീ പൗഡർ"),
        ("52612D5C", "ഇന്ത്യ ഗേറ്റ് ബാസ്മതി അരി"),
        ("83E69038", "പഞ്ചസാര"),
        ("9917FEE4", "സൂര്യകാന്തി എണ്ണ"),
        ("B3211839", "ബ്രെഡ് ലോഫ്"),
        ("E3F72C39", "ആശീർവാദ് ആട്ട"),
    ],
};

pub fn text(lang: Language, msg: Msg) -> &'static str {
    lang.table().messages[msg as usize]
}

/// Lookup by the string key used in page markup; unknown keys echo back.
pub fn lookup<'a>(lang: Language, key: &'a str) -> &'a str {
    Msg::ALL
        .into_iter()
        .find(|msg| msg.key() == key)
        .map(|msg| text(lang, msg))
        .unwrap_or(key)
}

pub fn product_name<'a>(lang: Language, product_id: &str, fallback: &'a str) -> &'a str {
    lang.table()
        .products
        .iter()
        .find(|(id, _)| *id == product_id)
        .map(|(_, name)| *name)
        .unwrap_or(fallback)
}

pub fn language_changed_toast(lang: Language) -> String {
    format!("Language changed to {}", lang.native_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_every_message() {
        for lang in Language::ALL {
            for msg in Msg::ALL {
                assert!(!text(lang, msg).is_empty(), "{lang:?} missing {}", msg.key());
            }
        }
    }

    #[test]
    fn unknown_key_echoes() {
        assert_eq!(lookup(Language::Hi, "basket"), "टोकरी");
        assert_eq!(lookup(Language::Hi, "mapComingSoon"), "mapComingSoon");
    }

    #[test]
    fn product_names_fall_back_to_backend_name() {
        assert_eq!(product_name(Language::Ta, "83E69038", "Sugar 1kg"), "சர்க்கரை");
        assert_eq!(product_name(Language::En, "UNKNOWN", "Soap Bar"), "Soap Bar");
    }

    #[test]
    fn codes_round_trip() {
        assert_eq!(Language::from_code("ML"), Some(Language::Ml));
        assert_eq!(Language::from_code("fr"), None);
    }
}
