//! Callback data carried by the voice picker's inline buttons.
//!
//! `voice_page_<page>` renders a catalog page, `voice_info_<id>_<page>` opens
//! the detail view of a voice with `<page>` as its back target, and
//! `voice_<id>` selects a voice. Fields are joined with `_`.

use thiserror::Error;

const NAMESPACE: &str = "voice";
const DELIMITER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Show catalog page (1-based).
    Page(u32),
    /// Show the detail view of a voice, returning to `page`.
    Info { voice_id: i64, page: u32 },
    /// Make the voice the user's active voice.
    Select(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("callback data outside the voice namespace: {0}")]
    ForeignNamespace(String),

    #[error("malformed navigation callback: {0}")]
    MalformedNavigation(String),

    #[error("malformed voice selection callback: {0}")]
    MalformedSelection(String),
}

impl TokenError {
    /// Only a broken selection is reported back to the user; anything else
    /// is dropped silently.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::MalformedSelection(_))
    }
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            Self::Page(page) => format!("{NAMESPACE}_page_{page}"),
            Self::Info { voice_id, page } => format!("{NAMESPACE}_info_{voice_id}_{page}"),
            Self::Select(voice_id) => format!("{NAMESPACE}_{voice_id}"),
        }
    }

    pub fn decode(data: &str) -> Result<Self, TokenError> {
        let fields: Vec<&str> = data.split(DELIMITER).collect();
        if fields[0] != NAMESPACE {
            return Err(TokenError::ForeignNamespace(data.to_string()));
        }

        // A navigation tag without all of its fields is read as a selection
        // of a voice named "page" or "info", which fails visibly.
        let navigation = || TokenError::MalformedNavigation(data.to_string());
        let selection = || TokenError::MalformedSelection(data.to_string());
        match fields.get(1).copied() {
            Some("page") => match fields[..] {
                [_, _] => Err(selection()),
                [_, _, page] => page.parse().map(Self::Page).map_err(|_| navigation()),
                _ => Err(navigation()),
            },
            Some("info") => match fields[..] {
                [_, _] | [_, _, _] => Err(selection()),
                [_, _, voice_id, page] => {
                    let voice_id = parse_voice_id(voice_id).ok_or_else(navigation)?;
                    let page = page.parse().map_err(|_| navigation())?;
                    Ok(Self::Info { voice_id, page })
                }
                _ => Err(navigation()),
            },
            _ => match fields[..] {
                [_, voice_id] => parse_voice_id(voice_id)
                    .map(Self::Select)
                    .ok_or_else(selection),
                _ => Err(selection()),
            },
        }
    }
}

/// Provider voice ids are non-negative.
fn parse_voice_id(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|id| *id >= 0)
}
