//! Text Parsing
//!
//! Normalizes a blob of generated title text into a clean ordered list.

use regex::Regex;

/// Characters stripped from both ends of a parsed title line.
const QUOTE_CHARS: &[char] = &['"', '\'', '「', '」', '『', '』'];

/// Parser that turns raw generated title text into individual titles.
///
/// Generated output typically arrives as a numbered or bulleted list,
/// sometimes with quoted lines. Each line loses its leading enumeration
/// marker (`1.` / `1、` / `1)` / `(1)` / `第1个` / `*` / `-` / `•`) and any
/// wrapping quotes; blank lines are dropped. Order is preserved and
/// duplicates are kept. Pure: no state is retained between calls.
pub struct TitleParser {
    enumeration: Regex,
    parenthesized: Regex,
    ordinal: Regex,
    bullet: Regex,
}

impl TitleParser {
    pub fn new() -> Self {
        Self {
            enumeration: Regex::new(r"^\d+[\.、\)]\s*").unwrap(),
            parenthesized: Regex::new(r"^\(\d+\)\s*").unwrap(),
            ordinal: Regex::new(r"^第\d+[个条项]\s*").unwrap(),
            bullet: Regex::new(r"^[\*\-•]\s*").unwrap(),
        }
    }

    /// Parse raw title output into an ordered list of title strings.
    pub fn parse(&self, raw_text: &str) -> Vec<String> {
        let mut titles = Vec::new();
        for line in raw_text.trim().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line = self.enumeration.replace(line, "");
            let line = self.parenthesized.replace(&line, "");
            let line = self.ordinal.replace(&line, "");
            let line = self.bullet.replace(&line, "");
            let line = line.trim_matches(|c| QUOTE_CHARS.contains(&c));
            if !line.is_empty() {
                titles.push(line.to_string());
            }
        }
        titles
    }
}

impl Default for TitleParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_and_quoted_lines() {
        let parser = TitleParser::new();
        assert_eq!(
            parser.parse("1. Foo\n2. 「Bar」\n\n3) Baz"),
            vec!["Foo", "Bar", "Baz"]
        );
    }

    #[test]
    fn test_bullet_markers() {
        let parser = TitleParser::new();
        assert_eq!(
            parser.parse("* one\n- two\n• three"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_cjk_enumeration_and_ordinals() {
        let parser = TitleParser::new();
        assert_eq!(
            parser.parse("1、职场甩锅的艺术\n(2) 摸鱼指南\n第3条 开会生存法则"),
            vec!["职场甩锅的艺术", "摸鱼指南", "开会生存法则"]
        );
    }

    #[test]
    fn test_quote_stripping() {
        let parser = TitleParser::new();
        assert_eq!(
            parser.parse("\"double\"\n'single'\n『corner』"),
            vec!["double", "single", "corner"]
        );
    }

    #[test]
    fn test_blank_and_marker_only_lines_dropped() {
        let parser = TitleParser::new();
        assert_eq!(parser.parse("1.\n\n   \n2. kept"), vec!["kept"]);
    }

    #[test]
    fn test_empty_input() {
        let parser = TitleParser::new();
        assert!(parser.parse("").is_empty());
    }

    #[test]
    fn test_duplicates_preserved() {
        let parser = TitleParser::new();
        assert_eq!(parser.parse("1. same\n2. same"), vec!["same", "same"]);
    }

    #[test]
    fn test_same_input_same_output() {
        let parser = TitleParser::new();
        let input = "1. 甲\n2. 乙";
        assert_eq!(parser.parse(input), parser.parse(input));
    }
}
