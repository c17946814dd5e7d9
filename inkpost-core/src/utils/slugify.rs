use std::sync::LazyLock;

use deunicode::deunicode;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s-]").expect("static regex is valid")
});
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-\s]+").expect("static regex is valid")
});

pub const SLUG_SUFFIX_LEN: usize = 5;

/// Lowercase ASCII slug: non-ASCII is transliterated, anything that is not a
/// word character, whitespace or hyphen is dropped and runs of whitespace and
/// hyphens collapse into one hyphen.
pub fn slugify<S: AsRef<str>>(s: S) -> String {
    let ascii = deunicode(s.as_ref()).to_lowercase();
    let cleaned = NON_WORD.replace_all(&ascii, "");
    let dashed = SEPARATORS.replace_all(cleaned.trim(), "-");
    dashed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug of a blog: title, author and category name, followed by a random
/// alphanumeric suffix so equal titles never collide
pub fn blog_slug(title: &str, author: &str, category: Option<&str>) -> String {
    let base = slugify(format!("{title} {author} {}", category.unwrap_or_default()));
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SLUG_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{base}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("hello world"), "hello-world");
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("hello--world"), "hello-world");
        assert_eq!(slugify("hello - world"), "hello-world");
        assert_eq!(slugify("hello & world"), "hello-world");
        assert_eq!(slugify("hello!world"), "helloworld");
    }

    #[test]
    fn test_slugify_keeps_underscores_inside() {
        assert_eq!(slugify("snake_case title"), "snake_case-title");
        assert_eq!(slugify("_leading and trailing_"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("héllo wörld"), "hello-world");
        assert_eq!(slugify("Ünïcödé Blog"), "unicode-blog");
    }

    #[test]
    fn test_slugify_edge_cases() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("!@#$%"), "");
    }

    #[test]
    fn test_blog_slug_has_random_suffix() {
        let slug = blog_slug("My First Post", "alice", Some("Science"));
        let (base, suffix) = slug.split_at(slug.len() - SLUG_SUFFIX_LEN);
        assert_eq!(base, "my-first-post-alice-science");
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));

        let without_category = blog_slug("Post", "bob", None);
        assert!(without_category.starts_with("post-bob"));
    }
}
