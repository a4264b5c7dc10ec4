pub mod actions;
pub mod anchor;
pub mod document;
pub mod header;
pub mod options;
pub mod toc;

pub use self::actions::{
    delete_sections, delete_toc, find_toc_range, section_edits, toc_edits, update_sections,
    update_toc,
};
pub use self::anchor::{anchor_id, PlatformMode};
pub use self::document::{Document, Edit, Position, TextBuffer, TextRange};
pub use self::header::{extract_headers, Header};
pub use self::options::{Indent, LineEnding, OptionKey, TocOptions};
pub use self::toc::render_toc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unsupported anchor mode: {0}")]
    UnsupportedPlatform(String),
    #[error("missing required parameter `{0}`")]
    MissingRequiredParameter(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_and_render_are_deterministic() {
        let lines = [
            "# Setup",
            "```",
            "# not a header",
            "```",
            "## Setup",
            "## Hello 👷",
        ];
        let options = TocOptions {
            line_ending: LineEnding::Lf,
            ..Default::default()
        };

        let headers = extract_headers(&lines, &options).unwrap();
        assert_eq!(headers, extract_headers(&lines, &options).unwrap());
        assert_eq!(
            headers.iter().map(|h| h.hash.as_str()).collect::<Vec<_>>(),
            vec![
                anchor_id("setup", PlatformMode::Github, 0, None).unwrap(),
                anchor_id("setup", PlatformMode::Github, 1, None).unwrap(),
                "hello-".to_string(),
            ]
        );

        let toc = render_toc(&headers, &options);
        assert_eq!(toc, render_toc(&headers, &options));
        assert_eq!(
            toc,
            "<!-- TOC -->\n\n- [Setup](#setup)\n\t- [Setup](#setup-1)\n\t- [Hello 👷](#hello-)\n\n<!-- /TOC -->"
        );
    }
}
