//! ManiaPlanet text markup stripping.
//!
//! Nicknames, map names and chat lines carry inline `$` codes: colors
//! (`$f00`), manialink/external link spans (`$h[...]`, `$l[...]`) and
//! one-character style toggles (`$o`, `$i`, `$z`, `$$`, ...). None of them
//! mean anything outside the game, so they are removed before text crosses
//! the relay.

use fancy_regex::Regex;
use once_cell::sync::Lazy;

static DEFAULT_STRIPPER: Lazy<MarkupStripper> = Lazy::new(MarkupStripper::new);

/// Remove all ManiaPlanet formatting codes from `text`.
///
/// Idempotent, and never fails on unbalanced markup: an unclosed `$h[` or
/// `$l[` loses only its two-character escape.
pub fn sanitize(text: &str) -> String {
    DEFAULT_STRIPPER.strip(text)
}

/// Compiled patterns for markup removal.
#[derive(Debug, Clone)]
pub struct MarkupStripper {
    /// `$` followed by a 3-digit hex color.
    color_pattern: Regex,
    /// `$h[target]` up to the closing `]` or `$h`.
    manialink_pattern: Regex,
    /// `$l[url]` up to the closing `]` or `$l`.
    link_pattern: Regex,
    /// Any remaining `$` + one character.
    escape_pattern: Regex,
}

impl Default for MarkupStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupStripper {
    pub fn new() -> Self {
        Self {
            color_pattern: Regex::new(r"\$[0-9a-fA-F]{3}").expect("valid color pattern"),
            manialink_pattern: Regex::new(r"\$[hH]\[.*?(?:\$[hH]\]?|\])")
                .expect("valid manialink pattern"),
            link_pattern: Regex::new(r"\$[lL]\[.*?(?:\$[lL]\]?|\])").expect("valid link pattern"),
            escape_pattern: Regex::new(r"\$.").expect("valid escape pattern"),
        }
    }

    /// Strip colors, link spans, then every leftover escape, in that order.
    pub fn strip(&self, text: &str) -> String {
        let step1 = self.color_pattern.replace_all(text, "");
        let step2 = self.manialink_pattern.replace_all(&step1, "");
        let step3 = self.link_pattern.replace_all(&step2, "");
        self.escape_pattern.replace_all(&step3, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_colors_and_manialink() {
        assert_eq!(sanitize("$f00Hello$h[link$h]World"), "HelloWorld");
    }

    #[test]
    fn test_strip_style_codes() {
        assert_eq!(sanitize("$o$iBold$z Italic"), "Bold Italic");
        assert_eq!(sanitize("$FFFWhite$AbCmixed"), "Whitemixed");
    }

    #[test]
    fn test_link_keeps_visible_text() {
        assert_eq!(sanitize("$l[https://example.com]Click$l here"), "Click here");
        assert_eq!(sanitize("$h[maniaplanet]Join$h now"), "Join now");
    }

    #[test]
    fn test_unbalanced_markup() {
        // Only the trailing escape goes, the rest survives.
        assert_eq!(sanitize("$h[never closed"), "[never closed");
        assert_eq!(sanitize("$l[also open"), "[also open");
        assert_eq!(sanitize("trailing $"), "trailing $");
    }

    #[test]
    fn test_dollar_escape() {
        assert_eq!(sanitize("costs $$5"), "costs 5");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("no markup here"), "no markup here");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "$f00Hello$h[link$h]World",
            "$$$f00$$",
            "a$$$b",
            "$h[x$l[y]z$h]w",
            "$l[open $h[nested",
            "$\n$fff",
            "nick$$fff",
            "$o$w$n$t$s$g$z$i",
            "💥$f00boom",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_multibyte() {
        assert_eq!(sanitize("$0f0ÆØÅ$z"), "ÆØÅ");
        assert_eq!(sanitize("$é"), "");
    }
}
