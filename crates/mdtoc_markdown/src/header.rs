use crate::anchor::anchor_id;
use crate::document::TextRange;
use crate::options::TocOptions;
use crate::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Up to six `#` not followed by another one.
static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})(?:[^#]|$)").unwrap());
static SECTION_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d+\.)+").unwrap());
static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.+)\]\([^)]*\)").unwrap());
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--.+-->").unwrap());
static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"#*`|\(|\)").unwrap());

/// Headers carrying this comment are left out of the TOC.
const IGNORE_MARKER: &str = "<!-- TOC ignore:true -->";

/// Raw `#` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// The run of `#`.
    pub mark: String,
    /// Text after the mark, trimmed.
    pub text: String,
}

impl Heading {
    pub fn depth(&self) -> usize {
        self.mark.len()
    }
}

impl FromStr for Heading {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = HEADER.captures(s).ok_or(())?;
        let mark = caps.get(1).ok_or(())?.as_str();
        let text = s[mark.len()..].trim();
        if text.is_empty() {
            return Err(());
        }
        Ok(Self {
            mark: mark.to_string(),
            text: text.to_string(),
        })
    }
}

/// A header of the document.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Line number, 0-based.
    pub line: usize,
    pub depth: usize,
    /// The run of `#`.
    pub mark: String,
    /// Cleaned up header text.
    pub title: String,
    /// Header text without the leading section number.
    pub base_title: String,
    /// Section number, e.g. `2.1.`.
    pub ordered_list: String,
    /// Anchor of the header.
    pub hash: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy)]
enum CodeBlockStart {
    Backticks,
    Tides,
}

impl CodeBlockStart {
    fn fence(&self) -> &'static str {
        match self {
            Self::Backticks => "```",
            Self::Tides => "~~~",
        }
    }
}

/// Number of occurrences of each title in a document.
#[derive(Debug, Default)]
struct DuplicateTracker(HashMap<String, usize>);

impl DuplicateTracker {
    /// Returns how many times `title` was seen before.
    fn record(&mut self, title: &str) -> usize {
        match self.0.get_mut(title) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.0.insert(title.to_string(), 0);
                0
            }
        }
    }
}

/// Extracts the headers of a markdown document.
///
/// Headers in the code blocks, out of the configured depth range or marked
/// with `<!-- TOC ignore:true -->` are skipped.
pub fn extract_headers<S: AsRef<str>>(
    lines: &[S],
    options: &TocOptions,
) -> Result<Vec<Header>, Error> {
    let (depth_from, depth_to) = options.depth_range();

    let mut code_fence: Option<CodeBlockStart> = None;
    let mut duplicates = DuplicateTracker::default();
    let mut indices_of_depth = [0usize; 6];
    let mut headers = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();

        match code_fence {
            None => {
                if line.starts_with("```") {
                    code_fence.replace(CodeBlockStart::Backticks);
                } else if line.starts_with("~~~") {
                    code_fence.replace(CodeBlockStart::Tides);
                }
            }
            Some(code_block_start) => {
                if line.starts_with(code_block_start.fence()) {
                    code_fence.take();
                }
                continue;
            }
        }

        if code_fence.is_some() {
            continue;
        }

        let Ok(heading) = line.parse::<Heading>() else {
            continue;
        };

        let depth = heading.depth();
        if depth < depth_from || depth > depth_to || line.contains(IGNORE_MARKER) {
            continue;
        }

        indices_of_depth[depth..].fill(0);
        indices_of_depth[depth - 1] += 1;

        let ordered_list = indices_of_depth[depth_from - 1..depth]
            .iter()
            .map(|n| format!("{n}."))
            .collect::<String>();

        let base_title = SECTION_NUMBER.replace(&heading.text, "").trim().to_string();
        let title = clean_up_title(&heading.text);

        let repetition = duplicates.record(&title);
        let hash = anchor_id(
            &title,
            options.anchor_mode,
            repetition,
            options.module_name.as_deref(),
        )?;

        headers.push(Header {
            line: idx,
            depth,
            mark: heading.mark,
            title,
            base_title,
            ordered_list,
            hash,
            range: TextRange::of_line(idx, line),
        });
    }

    tracing::debug!(
        total = headers.len(),
        mode = %options.anchor_mode,
        "Extracted markdown headers"
    );

    Ok(headers)
}

/// Strips the links, comments and special characters of a header text.
pub fn clean_up_title(text: &str) -> String {
    let title = MARKDOWN_LINK.replace_all(text, "$1");
    let title = HTML_COMMENT.replace_all(&title, "");
    SPECIAL_CHARS.replace_all(&title, "").trim().to_string()
}
