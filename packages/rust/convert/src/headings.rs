//! Pre-conversion heading normalization.
//!
//! Chapter files carry redundant `# Chapter N:` prefixes in their top-level
//! headings; the chapter numbering is re-derived by the typesetting engine,
//! so the prefix is stripped before conversion.

use std::sync::LazyLock;

use regex::Regex;

/// Rewrite every `# Chapter N: Title` line to `# Title`.
///
/// Only lines matching the exact pattern (heading marker, `Chapter` keyword,
/// digits, colon) at line start are touched; everything else passes through
/// unchanged. The transform is idempotent.
pub fn normalize_chapter_headings(content: &str) -> String {
    static CHAPTER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^#\s+Chapter\s+\d+:\s*").expect("valid regex"));

    CHAPTER_RE.replace_all(content, "# ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_chapter_prefix() {
        let input = "# Chapter 1: Intro\n\nBody text.";
        assert_eq!(
            normalize_chapter_headings(input),
            "# Intro\n\nBody text."
        );
    }

    #[test]
    fn rewrites_every_matching_line() {
        let input = "# Chapter 1: One\n\ntext\n\n# Chapter 12: Twelve\n";
        assert_eq!(
            normalize_chapter_headings(input),
            "# One\n\ntext\n\n# Twelve\n"
        );
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let input = "# Chapter 3: Setup\n\nBody.";
        let once = normalize_chapter_headings(input);
        let twice = normalize_chapter_headings(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_colon_untouched() {
        let input = "# Chapter 1 Intro";
        assert_eq!(normalize_chapter_headings(input), input);
    }

    #[test]
    fn wrong_keyword_untouched() {
        let input = "# Section 1: Intro";
        assert_eq!(normalize_chapter_headings(input), input);
    }

    #[test]
    fn mid_line_mention_untouched() {
        let input = "See # Chapter 1: Intro for details.";
        assert_eq!(normalize_chapter_headings(input), input);
    }

    #[test]
    fn indented_heading_untouched() {
        let input = "  # Chapter 1: Intro";
        assert_eq!(normalize_chapter_headings(input), input);
    }

    #[test]
    fn deeper_headings_untouched() {
        // `##` does not match `#\s+` since the second `#` is not whitespace.
        let input = "## Chapter 1: Intro";
        assert_eq!(normalize_chapter_headings(input), input);
    }

    #[test]
    fn extra_spaces_inside_pattern_accepted() {
        let input = "#   Chapter   7:   Lucky";
        assert_eq!(normalize_chapter_headings(input), "# Lucky");
    }

    #[test]
    fn colon_without_trailing_space_accepted() {
        let input = "# Chapter 2:Setup";
        assert_eq!(normalize_chapter_headings(input), "# Setup");
    }
}
