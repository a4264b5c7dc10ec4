//! Header anchors as generated by the various markdown renderers.
//!
//! Each [`PlatformMode`] reproduces the slug algorithm of one renderer, quirks
//! included, so that a link `[title](#anchor)` written into the TOC resolves on
//! that platform.

use crate::Error;
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Characters left untouched by ECMAScript's `encodeURI`.
const URI_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

const ZERO_WIDTH_JOINER_ENCODED: &str = "%E2%80%8D";

static ESCAPE_CODES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)%[a-f0-9]{2}").unwrap());

static GITHUB_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/?!:\[\]`.,()*"';{}+=<>~$|#@&–—]"#).unwrap());

static GITLAB_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/?!:\[\]`.,()*"';{}+=<>~$|#@]"#).unwrap());

static GHOST_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/?:\[\]`.,()*"';{}\-+=<>!@#%^&\\|]"#).unwrap());

static CJK_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[。？！，、；：“”【】（）〔〕［］﹃﹄“ ”‘’﹁﹂—…－～《》〈〉「」]").unwrap()
});

/// Emoji sequences: flags, keycaps and pictographs with their optional
/// variation selector, skin tone, tag run and ZWJ continuations.
static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[\x{1F1E6}-\x{1F1FF}]{2}",
        r"|[#*0-9]\x{FE0F}?\x{20E3}",
        r"|(?:\p{Extended_Pictographic}|\p{Emoji_Presentation})[\x{FE0E}\x{FE0F}]?\p{Emoji_Modifier}?[\x{E0020}-\x{E007F}]*",
        r"(?:\x{200D}(?:\p{Extended_Pictographic}|\p{Emoji_Presentation})[\x{FE0E}\x{FE0F}]?\p{Emoji_Modifier}?)*",
    ))
    .unwrap()
});

static HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());
static DOUBLE_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"--+").unwrap());
static WHITESPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*\]\(.*\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*)\]\(.*\)").unwrap());
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Markdown renderer whose anchor naming is emulated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    #[default]
    #[serde(alias = "github.com")]
    Github,
    #[serde(alias = "bitbucket.org")]
    Bitbucket,
    #[serde(alias = "gitlab.com")]
    Gitlab,
    #[serde(alias = "nodejs.org")]
    Nodejs,
    #[serde(alias = "ghost.org")]
    Ghost,
}

impl PlatformMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Bitbucket => "bitbucket",
            Self::Gitlab => "gitlab",
            Self::Nodejs => "nodejs",
            Self::Ghost => "ghost",
        }
    }
}

impl std::fmt::Display for PlatformMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" | "github.com" => Ok(Self::Github),
            "bitbucket" | "bitbucket.org" => Ok(Self::Bitbucket),
            "gitlab" | "gitlab.com" => Ok(Self::Gitlab),
            "nodejs" | "nodejs.org" => Ok(Self::Nodejs),
            "ghost" | "ghost.org" => Ok(Self::Ghost),
            _ => Err(Error::UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Returns the URL fragment `mode` assigns to a header with text `header`.
///
/// `repetition` is the number of headers with the same cleaned title seen
/// before this one, `0` for the first occurrence. `module_name` is only used,
/// and then required, by [`PlatformMode::Nodejs`].
///
/// Only ASCII letters are lower-cased before slugifying, non-ASCII letters
/// end up percent-encoded as written.
pub fn anchor_id(
    header: &str,
    mode: PlatformMode,
    repetition: usize,
    module_name: Option<&str>,
) -> Result<String, Error> {
    let text = header.trim().to_ascii_lowercase();

    let href = match mode {
        PlatformMode::Github => github_id(&text, repetition),
        PlatformMode::Bitbucket => bitbucket_id(&text, repetition),
        PlatformMode::Gitlab => gitlab_id(&text, repetition),
        PlatformMode::Nodejs => {
            let module_name = module_name
                .filter(|name| !name.is_empty())
                .ok_or(Error::MissingRequiredParameter("module_name"))?;
            nodejs_id(&format!("{module_name}.{text}"), repetition)
        }
        PlatformMode::Ghost => ghost_id(&text),
    };

    let mut encoded = encode_uri(&href);
    if mode == PlatformMode::Github {
        // GitHub keeps the joiner of emoji sequences as is.
        encoded = encoded.replace(ZERO_WIDTH_JOINER_ENCODED, "\u{200D}");
    }

    Ok(normalize(&encoded))
}

/// Percent-encodes `text` like ECMAScript's `encodeURI`.
fn encode_uri(text: &str) -> String {
    utf8_percent_encode(text, URI_RESERVED).to_string()
}

/// Final pass shared by all the modes, `%` of the encoded bytes are dropped.
fn normalize(href: &str) -> String {
    href.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '%' => None,
            c if c.is_whitespace() => Some('-'),
            c => Some(c),
        })
        .collect()
}

fn basic_github_id(text: &str) -> String {
    let text = text.replace(' ', "-");
    let text = ESCAPE_CODES.replace_all(&text, "");
    let text = GITHUB_PUNCTUATION.replace_all(&text, "");
    CJK_PUNCTUATION.replace_all(&text, "").into_owned()
}

fn github_id(text: &str, repetition: usize) -> String {
    let mut id = basic_github_id(text);

    if repetition > 0 {
        id.push_str(&format!("-{repetition}"));
    }

    EMOJI.replace_all(&id, "").into_owned()
}

fn bitbucket_id(text: &str, repetition: usize) -> String {
    let id = format!("markdown-header-{}", basic_github_id(text));

    // Unlike GitHub, consecutive hyphens are condensed.
    let mut id = DOUBLE_HYPHENS.replace_all(&id, "-").into_owned();

    if repetition > 0 {
        id.push_str(&format!("_{repetition}"));
    }

    id
}

fn gitlab_id(text: &str, repetition: usize) -> String {
    let text = unwrap_html_tags(text);
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace(&text, "$1");
    let text = WHITESPACES.replace_all(&text, "-");
    let text = GITLAB_PUNCTUATION.replace_all(&text, "");
    let text = CJK_PUNCTUATION.replace_all(&text, "");
    let text = HYPHENS.replace_all(&text, "-");

    let text = text.strip_prefix('-').unwrap_or(&text);
    let mut id = text.strip_suffix('-').unwrap_or(text).to_string();

    if repetition > 0 {
        id.push_str(&format!("-{repetition}"));
    }

    id
}

fn nodejs_id(text: &str, repetition: usize) -> String {
    let text = NON_ALNUM.replace_all(text, "_");

    // Either the leading or the trailing underscores are stripped, never both.
    let text = if text.starts_with('_') {
        text.trim_start_matches('_')
    } else {
        text.trim_end_matches('_')
    };

    let mut id = match text.chars().next() {
        Some(c) if !c.is_ascii_lowercase() => format!("_{text}"),
        _ => text.to_string(),
    };

    if repetition > 0 {
        id.push_str(&format!("_{repetition}"));
    }

    id
}

/// Ghost has no notion of repeated headers.
fn ghost_id(text: &str) -> String {
    let text = text.replace(' ', "-");
    GHOST_PUNCTUATION
        .replace_all(&text, "")
        .replace('$', "d")
        .replace('~', "t")
}

/// Replaces each `<tag>inner</tag>` with `inner`.
///
/// The opening tag and the inner text are matched greedily and the closing tag
/// must repeat the opening one, e.g. `<em>a</em> <b>c</b>` becomes `a c`.
fn unwrap_html_tags(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    'outer: while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];

        let tag_ends = after_open
            .match_indices('>')
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();

        for &tag_end in tag_ends.iter().rev() {
            let tag = &after_open[..tag_end];
            let body = &after_open[tag_end + 1..];
            let closing = format!("</{tag}>");
            if let Some(inner_end) = body.rfind(&closing) {
                output.push_str(&rest[..open]);
                output.push_str(&body[..inner_end]);
                rest = &body[inner_end + closing.len()..];
                continue 'outer;
            }
        }

        output.push_str(&rest[..=open]);
        rest = after_open;
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(header: &str, mode: PlatformMode, repetition: usize) -> String {
        anchor_id(header, mode, repetition, Some("fs")).unwrap()
    }

    #[test]
    fn test_github_anchor() {
        use PlatformMode::Github;

        assert_eq!(anchor("Hello World", Github, 0), "hello-world");
        assert_eq!(anchor("  Hello World  ", Github, 0), "hello-world");
        assert_eq!(anchor("Hello World", Github, 1), "hello-world-1");
        assert_eq!(anchor("What's new?", Github, 0), "whats-new");
        assert_eq!(anchor("C++ & Rust", Github, 0), "c--rust");
        assert_eq!(anchor("a – b — c", Github, 0), "a--b--c");
        assert_eq!(anchor("run `cargo test`", Github, 0), "run-cargo-test");
        assert_eq!(anchor("100%20done", Github, 0), "100done");
        assert_eq!(anchor("你好，世界", Github, 0), "e4bda0e5a5bde4b896e7958c");
        assert_eq!(anchor("中文 标题", Github, 0), "e4b8ade69687-e6a087e9a298");
    }

    #[test]
    fn test_github_emoji() {
        use PlatformMode::Github;

        assert_eq!(anchor("Hello 👷", Github, 0), "hello-");
        assert_eq!(anchor("👷🏼‍♀️ Worker", Github, 0), "-worker");
        assert_eq!(anchor("🇫🇷 France", Github, 2), "-france-2");
        // A joiner outside of an emoji sequence is kept verbatim.
        assert_eq!(anchor("a\u{200D}b", Github, 0), "a\u{200D}b");
    }

    #[test]
    fn test_non_ascii_letters_are_not_lowercased() {
        assert_eq!(anchor("Über", PlatformMode::Github, 0), "c39cber");
        assert_eq!(anchor("über", PlatformMode::Github, 0), "c3bcber");
    }

    #[test]
    fn test_remaining_percent_signs_are_stripped() {
        assert_eq!(anchor("100%", PlatformMode::Github, 0), "10025");
    }

    #[test]
    fn test_bitbucket_anchor() {
        use PlatformMode::Bitbucket;

        assert_eq!(anchor("Hello World", Bitbucket, 0), "markdown-header-hello-world");
        assert_eq!(
            anchor("Hello  - World", Bitbucket, 0),
            "markdown-header-hello-world"
        );
        assert_eq!(
            anchor("Hello World", Bitbucket, 2),
            "markdown-header-hello-world_2"
        );
    }

    #[test]
    fn test_gitlab_anchor() {
        use PlatformMode::Gitlab;

        assert_eq!(anchor("Hello   World", Gitlab, 0), "hello-world");
        assert_eq!(anchor(" -Foo- ", Gitlab, 0), "foo");
        assert_eq!(anchor("Foo & Bar", Gitlab, 0), "foo-&-bar");
        assert_eq!(
            anchor(
                "<em>Hello</em> [World](http://x.com) ![img](a.png)",
                Gitlab,
                0
            ),
            "hello-world"
        );
        assert_eq!(anchor("Hello World", Gitlab, 1), "hello-world-1");
    }

    #[test]
    fn test_unwrap_html_tags() {
        assert_eq!(unwrap_html_tags("<em>a</em> b <b>c</b>"), "a b c");
        assert_eq!(unwrap_html_tags("a < b > c"), "a < b > c");
        assert_eq!(unwrap_html_tags("<i>x</b>"), "<i>x</b>");
    }

    #[test]
    fn test_nodejs_anchor() {
        use PlatformMode::Nodejs;

        assert_eq!(anchor("Class: fs.Stats", Nodejs, 0), "fs_class_fs_stats");
        assert_eq!(anchor("Class: fs.Stats", Nodejs, 1), "fs_class_fs_stats_1");
        assert_eq!(anchor("Example!", Nodejs, 0), "fs_example");
        assert_eq!(
            anchor_id("Intro", Nodejs, 0, Some("9")).unwrap(),
            "_9_intro"
        );
        assert_eq!(
            anchor_id("Intro", Nodejs, 0, None),
            Err(Error::MissingRequiredParameter("module_name"))
        );
        assert_eq!(
            anchor_id("Intro", Nodejs, 0, Some("")),
            Err(Error::MissingRequiredParameter("module_name"))
        );
    }

    #[test]
    fn test_ghost_anchor() {
        use PlatformMode::Ghost;

        assert_eq!(anchor("Hello World", Ghost, 0), "helloworld");
        assert_eq!(anchor("Cost $5 ~ok", Ghost, 0), "costd5tok");
        assert_eq!(anchor("Cost $5 ~ok", Ghost, 3), "costd5tok");
    }

    #[test]
    fn test_repetition_suffix() {
        let modes = [
            PlatformMode::Github,
            PlatformMode::Bitbucket,
            PlatformMode::Gitlab,
            PlatformMode::Nodejs,
        ];
        for mode in modes {
            let first = anchor("Setup", mode, 0);
            let third = anchor("Setup", mode, 2);
            assert!(!first.ends_with('2'), "{mode}: {first}");
            assert_ne!(first, third, "{mode}");
            assert!(third.ends_with("2"), "{mode}: {third}");
        }
    }

    #[test]
    fn test_parse_platform_mode() {
        assert_eq!("github".parse::<PlatformMode>(), Ok(PlatformMode::Github));
        assert_eq!("GitLab.com".parse::<PlatformMode>(), Ok(PlatformMode::Gitlab));
        assert_eq!(
            "gitea".parse::<PlatformMode>(),
            Err(Error::UnsupportedPlatform("gitea".to_string()))
        );
    }
}
