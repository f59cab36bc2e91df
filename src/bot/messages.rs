//! User-facing texts. Sent with HTML parse mode.

pub const START_MESSAGES: &[&str] = &[
    "👋 Hi! I turn text into speech with Steos Voice.",
    "🔑 First, get an API key in your Steos Voice account and send it to me with /apikey.",
    "🗣 Then pick a voice with /voice and check your remaining symbols with /symbols.",
    "✍️ After that just send me any text, or a picture with a caption, and I will read it out loud.",
];

pub const SET_API_KEY: &str = "🔑 Send me your Steos Voice API key.";
pub const NOT_AN_API_KEY: &str = "🤔 That does not look like an API key. Please send the key as plain text.";
pub const FAILED_TO_VERIFY_API_KEY: &str =
    "❌ Could not verify this API key with Steos Voice. Check it and send it again.";
pub const API_KEY_IS_SET: &str = "✅ API key saved. Choose a voice with /voice.";

pub const NO_API_KEY: &str = "🔑 You have no API key yet. Set one with /apikey.";
pub const NO_VOICE: &str = "🗣 No voice selected. Choose one with /voice.";
pub const VOICE_IS_SET: &str = "✅ Voice selected.";
pub const VOICE_LIST: &str = "🗣 Available voices:";

pub const PREVIOUS_PAGE_BUTTON: &str = "‹";
pub const NEXT_PAGE_BUTTON: &str = "›";
pub const CHOOSE_VOICE_BUTTON: &str = "✅ Choose";
pub const BACK_BUTTON: &str = "↩️ Back";

pub const NOT_ENOUGH_SYMBOLS: &str = "📉 Not enough symbols left on your Steos Voice account.";
pub const SERVICE_NOT_AVAILABLE: &str = "⏳ Steos Voice is not available right now. Try again later.";

pub const UNKNOWN_COMMAND: &str = "🤷 Unknown command. See /help.";
pub const CAN_NOT_HANDLE: &str = "🤷 I can only read text and captions.";
pub const COMMAND_FAILED: &str = "❌ Could not complete the command. Try again later.";
pub const SOMETHING_WENT_WRONG: &str = "⚠️ Something went wrong. Try again later.";

pub fn symbol_count(symbols: i64) -> String {
    format!("🔢 Symbols left: <b>{}</b>", symbols)
}
