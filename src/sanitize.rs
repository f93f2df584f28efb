//! Input hardening shared by handlers: HTML neutralising for free text and
//! key checks for query-string filters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Complete element tags and comments. Anything else, including an
/// unterminated tag, is left to the escaper.
static MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^<>]*>|<![A-Za-z][^<>]*>").expect("markup pattern compiles")
});

/// Removes HTML tags from user supplied text and escapes what is left, so
/// stray angle brackets survive as text instead of swallowing their
/// surroundings.
pub fn strip_tags(input: &str) -> String {
    let stripped = MARKUP.replace_all(input, "");
    html_escape::encode_text(stripped.as_ref()).into_owned()
}

pub fn clean_text(input: Option<String>) -> Option<String> {
    input.map(|s| strip_tags(&s))
}

/// Keys that could be read as store operators or nested paths are refused.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with('$') && !key.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        assert_eq!(strip_tags("<script>alert(1)</script>Acme"), "alert(1)Acme");
        assert_eq!(strip_tags("<b>Bold</b> move"), "Bold move");
        assert_eq!(strip_tags("<a href=\"x\" onclick=\"go()\">link</a><!-- note -->"), "link");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(strip_tags("Tel: 02-555-1234 ext 5"), "Tel: 02-555-1234 ext 5");
    }

    #[test]
    fn stray_angle_brackets_are_kept_as_text() {
        assert_eq!(strip_tags("a < b > c"), "a &lt; b &gt; c");
        assert_eq!(
            strip_tags("Salary < 50k THB, team > 20 people, 1<2"),
            "Salary &lt; 50k THB, team &gt; 20 people, 1&lt;2"
        );
    }

    #[test]
    fn unterminated_tag_is_escaped() {
        assert_eq!(strip_tags("Acme <img src=x onerror=alert(1)"), "Acme &lt;img src=x onerror=alert(1)");
    }

    #[test]
    fn ampersands_are_escaped() {
        assert_eq!(strip_tags("R&D"), "R&amp;D");
    }

    #[test]
    fn clean_text_passes_none_through() {
        assert_eq!(clean_text(None), None);
        assert_eq!(clean_text(Some("<i>x</i>".to_string())), Some("x".to_string()));
    }

    #[test]
    fn rejects_operator_and_path_keys() {
        assert!(is_safe_key("name"));
        assert!(!is_safe_key("$where"));
        assert!(!is_safe_key("profile.name"));
        assert!(!is_safe_key(""));
    }
}
