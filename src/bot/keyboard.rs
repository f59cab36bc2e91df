use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;

use crate::bot::messages;
use crate::bot::token::CallbackAction;
use crate::tts::Voice;

pub const VOICE_PAGE_SIZE: usize = 5;

/// A rendered catalog page.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub page: u32,
    pub total_pages: u32,
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

pub fn total_pages(catalog_len: usize, page_size: usize) -> u32 {
    catalog_len.div_ceil(page_size).max(1) as u32
}

/// Render page `page` (1-based, clamped into range) of a sorted catalog:
/// one button per voice, then a navigation row when there is somewhere to go.
pub fn catalog_page(voices: &[Voice], page: u32, page_size: usize) -> CatalogPage {
    let total = total_pages(voices.len(), page_size);
    let page = page.clamp(1, total);

    let start = (page as usize - 1) * page_size;
    let mut rows: Vec<Vec<InlineKeyboardButton>> = voices
        .iter()
        .skip(start)
        .take(page_size)
        .map(|voice| {
            vec![InlineKeyboardButton::callback(
                voice.display_name(),
                CallbackAction::Info {
                    voice_id: voice.id,
                    page,
                }
                .encode(),
            )]
        })
        .collect();

    let mut navigation = Vec::new();
    if page > 1 {
        navigation.push(InlineKeyboardButton::callback(
            messages::PREVIOUS_PAGE_BUTTON,
            CallbackAction::Page(page - 1).encode(),
        ));
    }
    if page < total {
        navigation.push(InlineKeyboardButton::callback(
            messages::NEXT_PAGE_BUTTON,
            CallbackAction::Page(page + 1).encode(),
        ));
    }
    if !navigation.is_empty() {
        rows.push(navigation);
    }

    CatalogPage {
        page,
        total_pages: total,
        text: format!("{}\n\nPage {}/{}", messages::VOICE_LIST, page, total),
        keyboard: InlineKeyboardMarkup::new(rows),
    }
}

/// Detail view of a voice with "choose" and "back to `back_page`" buttons.
pub fn voice_details(voice: &Voice, back_page: u32) -> (String, InlineKeyboardMarkup) {
    let text = format!(
        "<b>{}</b>\n{}\n\nSex: {}",
        html::escape(&voice.display_name()),
        html::escape(&voice.display_description()),
        html::escape(voice.display_sex()),
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            messages::CHOOSE_VOICE_BUTTON,
            CallbackAction::Select(voice.id).encode(),
        )],
        vec![InlineKeyboardButton::callback(
            messages::BACK_BUTTON,
            CallbackAction::Page(back_page).encode(),
        )],
    ]);

    (text, keyboard)
}

/// Callback data of every button, row by row.
#[cfg(test)]
pub fn callback_data(keyboard: &InlineKeyboardMarkup) -> Vec<Vec<String>> {
    use teloxide::types::InlineKeyboardButtonKind;

    keyboard
        .inline_keyboard
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|button| match &button.kind {
                    InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}
