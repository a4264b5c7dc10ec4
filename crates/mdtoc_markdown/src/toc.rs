use crate::header::Header;
use crate::options::TocOptions;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

pub const TOC_STOP: &str = "<!-- /TOC -->";

/// `<!-- TOC -->` or `<!-- TOC key:value ... -->`.
pub static TOC_START_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*<!--\s*TOC(?:\s.*)?-->").unwrap());

pub static TOC_STOP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*<!--\s*/TOC\s*-->").unwrap());

/// Anchor line inserted above a header, `markdown-` is the legacy id prefix.
pub static ANCHOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^<a id="(?:md|markdown)-.+" name=".+"></a>"#).unwrap());

/// Returns the start marker echoing the flagged options, e.g.
/// `<!-- TOC depthFrom:2 orderedList:true -->`.
pub fn toc_start_marker(options: &TocOptions) -> String {
    if options.flags.is_empty() {
        return "<!-- TOC -->".to_string();
    }
    let flags = options
        .flags
        .iter()
        .map(|key| format!("{}:{}", key.name(), options.value_of(*key)))
        .join(" ");
    format!("<!-- TOC {flags} -->")
}

/// Returns the explicit anchor inserted above the header with anchor `hash`.
pub fn anchor_line(hash: &str) -> String {
    format!(r#"<a id="md-{hash}" name="{hash}"></a>"#)
}

/// Renders the TOC block of `headers`, markers included.
///
/// The indentation starts from the shallowest header present, but never above
/// `depth_from`. With `ordered_list`, the counter of a level restarts only once
/// a shallower row has been rendered after it.
pub fn render_toc(headers: &[Header], options: &TocOptions) -> String {
    let eol = options.line_ending.as_str();
    let tab = options.indent.unit();
    let (depth_from, depth_to) = options.depth_range();

    let levels = (depth_to + 1).saturating_sub(depth_from);
    let mut indices_of_depth = vec![0usize; levels];
    let mut wait_reset = vec![false; levels];

    let min_depth = headers.iter().map(|h| h.depth).fold(6, usize::min);
    let start_depth = min_depth.max(depth_from);

    let mut text = Vec::with_capacity(headers.len() + 2);
    text.push(format!("{}{eol}", toc_start_marker(options)));

    for header in headers
        .iter()
        .filter(|h| h.depth >= start_depth && h.depth <= depth_to)
    {
        let level = header.depth - start_depth;

        for (index, wait) in wait_reset.iter_mut().enumerate() {
            if *wait && level < index {
                indices_of_depth[index] = 0;
                *wait = false;
            }
        }

        let bullet = if options.ordered_list {
            indices_of_depth[level] += 1;
            format!("{}. ", indices_of_depth[level])
        } else {
            String::from("- ")
        };

        let row = if options.with_links {
            format!("[{}](#{})", header.title, header.hash)
        } else {
            header.title.clone()
        };

        text.push(format!("{}{bullet}{row}", tab.repeat(level)));
        wait_reset[level] = true;
    }

    text.push(format!("{eol}{TOC_STOP}"));

    text.join(eol)
}
