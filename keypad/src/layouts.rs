//! Built-in English keyboard.
//!
//! Seven 8×8 layers. Control and toggle cells only carry labels: their codes
//! are classified before any grid lookup, so the label is never inserted. A
//! toggle cell is left blank in layers where that toggle would lead to an
//! unregistered combination.
//!
//! | code | action             | code | action     |
//! |------|--------------------|------|------------|
//! | 00   | escape             | 60   | shift      |
//! | 06   | fn                 | 70   | accents    |
//! | 07   | delete             | 71   | symbols    |
//! | 10   | tab                | 72   | emoji      |
//! | 17   | backspace          | 66   | arrow up   |
//! | 37   | enter              | 75   | arrow left |
//! | 76   | arrow down         | 77   | arrow right|

use keypad_core::{Layout, LayoutRegistry, Mode};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::warn;

type Grid = [[&'static str; 8]; 8];

const LOWER: Grid = [
    ["esc", "1", "2", "3", "4", "5", "fn", "del"],
    ["tab", "q", "w", "e", "r", "t", "y", "⌫"],
    ["u", "i", "o", "p", "a", "s", "d", "f"],
    ["g", "h", "j", "k", "l", "'", "-", "⏎"],
    ["z", "x", "c", "v", "b", "n", "m", "?"],
    ["6", "7", "8", "9", "0", ",", ".", "!"],
    ["⇧", " ", " ", " ", ":", ";", "↑", ""],
    ["àé", "?123", "☺", "@", "#", "←", "↓", "→"],
];

const UPPER: Grid = [
    ["esc", "1", "2", "3", "4", "5", "fn", "del"],
    ["tab", "Q", "W", "E", "R", "T", "Y", "⌫"],
    ["U", "I", "O", "P", "A", "S", "D", "F"],
    ["G", "H", "J", "K", "L", "\"", "_", "⏎"],
    ["Z", "X", "C", "V", "B", "N", "M", "?"],
    ["6", "7", "8", "9", "0", ";", ":", "!"],
    ["⇧", " ", " ", " ", "(", ")", "↑", ""],
    ["ÀÉ", "?123", "", "@", "#", "←", "↓", "→"],
];

const SYMBOLS: Grid = [
    ["esc", "+", "-", "*", "/", "=", "fn", "del"],
    ["tab", "(", ")", "[", "]", "{", "}", "⌫"],
    ["<", ">", "&", "|", "\\", "^", "%", "$"],
    ["~", "`", "\"", "'", "_", "°", "§", "⏎"],
    ["…", "«", "»", "“", "”", "‘", "’", "¿"],
    ["€", "£", "¥", "¢", "₽", "¡", "·", "•"],
    ["⇧", " ", " ", " ", "±", "×", "↑", "÷"],
    ["", "abc", "", "@", "#", "←", "↓", "→"],
];

const SYMBOLS_SHIFTED: Grid = [
    ["esc", "≠", "≈", "≤", "≥", "∞", "fn", "del"],
    ["tab", "√", "∑", "∏", "∫", "∂", "∆", "⌫"],
    ["α", "β", "γ", "δ", "π", "λ", "μ", "σ"],
    ["Ω", "θ", "φ", "ψ", "ω", "ε", "η", "⏎"],
    ["⇐", "⇒", "⇔", "↔", "⇑", "⇓", "↺", "↻"],
    ["½", "⅓", "¼", "¾", "²", "³", "‰", "№"],
    ["⇧", " ", " ", " ", "©", "®", "↑", "™"],
    ["", "ABC", "", "@", "#", "←", "↓", "→"],
];

const ACCENTS: Grid = [
    ["esc", "à", "á", "â", "ä", "ã", "fn", "del"],
    ["tab", "å", "æ", "ç", "è", "é", "ê", "⌫"],
    ["ë", "ì", "í", "î", "ï", "ñ", "ò", "ó"],
    ["ô", "ö", "õ", "ø", "œ", "ß", "ù", "⏎"],
    ["ú", "û", "ü", "ý", "ÿ", "ł", "ś", "ź"],
    ["ż", "ć", "ń", "ę", "ą", "č", "š", "ž"],
    ["⇧", " ", " ", " ", "ğ", "ş", "↑", "ı"],
    ["abc", "", "", "@", "#", "←", "↓", "→"],
];

const ACCENTS_UPPER: Grid = [
    ["esc", "À", "Á", "Â", "Ä", "Ã", "fn", "del"],
    ["tab", "Å", "Æ", "Ç", "È", "É", "Ê", "⌫"],
    ["Ë", "Ì", "Í", "Î", "Ï", "Ñ", "Ò", "Ó"],
    ["Ô", "Ö", "Õ", "Ø", "Œ", "ẞ", "Ù", "⏎"],
    ["Ú", "Û", "Ü", "Ý", "Ÿ", "Ł", "Ś", "Ź"],
    ["Ż", "Ć", "Ń", "Ę", "Ą", "Č", "Š", "Ž"],
    ["⇧", " ", " ", " ", "Ğ", "Ş", "↑", "İ"],
    ["ABC", "", "", "@", "#", "←", "↓", "→"],
];

const EMOJI: Grid = [
    ["esc", "😀", "😂", "😉", "😍", "😎", "fn", "del"],
    ["tab", "🙂", "🙃", "😢", "😡", "🤔", "😴", "⌫"],
    ["👍", "👎", "👍🏽", "👏", "🙏", "💪", "👋", "✌️"],
    ["❤️", "💔", "🔥", "✨", "⭐", "🎉", "💯", "⏎"],
    ["🐱", "🐶", "🦊", "🐼", "🌸", "🌍", "☀️", "🌙"],
    ["🍕", "🍺", "☕", "🎂", "⚽", "🎵", "📌", "✅"],
    ["", " ", " ", " ", "👨‍👩‍👧", "🏳️‍🌈", "↑", ""],
    ["", "", "abc", "❌", "❓", "←", "↓", "→"],
];

/// Layers of the built-in keyboard, by mode mask.
pub const ENGLISH_LAYERS: [(u8, &Grid); 7] = [
    (0b0000, &LOWER),
    (0b0001, &SYMBOLS),
    (0b0010, &UPPER),
    (0b0011, &SYMBOLS_SHIFTED),
    (0b0100, &ACCENTS),
    (0b0110, &ACCENTS_UPPER),
    (0b1000, &EMOJI),
];

/// Shared registry of the built-in keyboard.
pub static ENGLISH: Lazy<Arc<LayoutRegistry>> = Lazy::new(|| {
    let mut registry = LayoutRegistry::new();
    for (bits, grid) in ENGLISH_LAYERS {
        let Some(mode) = Mode::new(bits) else {
            warn!(bits, "skipping built-in layer with an invalid mode");
            continue;
        };
        if let Err(err) = registry.insert(mode, Layout::from_rows(grid)) {
            warn!(%err, bits, "skipping invalid built-in layer");
        }
    }
    Arc::new(registry)
});

/// The built-in registry, or a JSON layout set from `path` when given.
pub fn load(path: Option<&std::path::Path>) -> Result<Arc<LayoutRegistry>, keypad_core::LayoutError> {
    match path {
        Some(path) => Ok(Arc::new(LayoutRegistry::load_json(path)?)),
        None => Ok(Arc::clone(&ENGLISH)),
    }
}
