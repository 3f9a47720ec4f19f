//! Recovering color literals from markup text.
//!
//! The document is treated as plain text: literals are found wherever they
//! appear (attribute values, `<style>` blocks, comments). Two syntaxes are
//! recognised:
//!
//! - `#rrggbb`, exactly six hex digits in any case. Shorter or longer runs
//!   such as `#fff` or `#ff0000ff` are not colors.
//! - `rgb(r, g, b)` with ASCII integers and optional whitespace around every
//!   token. Channels above 255 are clamped.

use std::collections::BTreeSet;
use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::color::Color;
use crate::error::{PaletteError, Result};

/// `#` plus the maximal hex run (length checked after matching), or a
/// functional `rgb()` literal with its three integer tokens captured.
static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"#(?<hex>[0-9A-Fa-f]+)|rgb\(\s*(?<r>[0-9]+)\s*,\s*(?<g>[0-9]+)\s*,\s*(?<b>[0-9]+)\s*\)",
    )
    .expect("color pattern is a valid regex")
});

/// Deduplicated colors from one document, kept in canonical order
/// (ascending `#rrggbb`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet {
    colors: Vec<Color>,
}

impl ColorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn contains(&self, color: &Color) -> bool {
        self.colors.binary_search(color).is_ok()
    }

    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(Color::to_hex).collect()
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let unique: BTreeSet<Color> = iter.into_iter().collect();
        Self {
            colors: unique.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ColorSet {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

impl IntoIterator for ColorSet {
    type Item = Color;
    type IntoIter = std::vec::IntoIter<Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}

/// Yield every color literal in `text`, in document order and with
/// duplicates.
///
/// `rgb()` literals whose tokens are not integers are reported as
/// [`PaletteError::MalformedLiteral`]; hex runs that are not exactly six
/// digits long are skipped silently since they are not color literals.
pub fn scan(text: &str) -> impl Iterator<Item = Result<Color>> + '_ {
    COLOR_PATTERN
        .captures_iter(text)
        .filter_map(|caps| match caps.name("hex") {
            Some(hex) if hex.len() == 6 => Some(Color::from_hex(hex.as_str())),
            Some(_) => None,
            None => Some(parse_functional(&caps)),
        })
}

fn parse_functional(caps: &Captures<'_>) -> Result<Color> {
    let token = |name: &str| caps.name(name).map_or("", |m| m.as_str());
    parse_rgb_tokens(
        caps.get(0).map_or("", |m| m.as_str()),
        [token("r"), token("g"), token("b")],
    )
}

/// Turn the three integer tokens of an `rgb()` literal into a color.
///
/// Integers of any size are accepted and clamped to 255.
fn parse_rgb_tokens(literal: &str, tokens: [&str; 3]) -> Result<Color> {
    let mut channels = [0u32; 3];
    for (slot, token) in channels.iter_mut().zip(tokens) {
        *slot = parse_channel(token).ok_or_else(|| PaletteError::MalformedLiteral {
            literal: literal.to_string(),
        })?;
    }

    let [r, g, b] = channels;
    Ok(Color::from_channels(r, g, b))
}

fn parse_channel(token: &str) -> Option<u32> {
    match token.parse::<u32>() {
        Ok(value) => Some(value),
        // Still an integer, just past u32; clamping takes it to 255 anyway.
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}

/// Recover every color literal in `text` as a canonical, deduplicated set.
///
/// Malformed literals are dropped without aborting the scan. A document with
/// no literals yields an empty set.
pub fn extract(text: &str) -> ColorSet {
    let mut found = 0usize;
    let mut dropped = 0usize;

    let set: ColorSet = scan(text)
        .filter_map(|literal| match literal {
            Ok(color) => {
                found += 1;
                Some(color)
            }
            Err(err) => {
                dropped += 1;
                tracing::debug!(%err, "Dropping color literal");
                None
            }
        })
        .collect();

    tracing::debug!(
        literals = found,
        dropped,
        unique = set.len(),
        "Extracted colors"
    );
    set
}
