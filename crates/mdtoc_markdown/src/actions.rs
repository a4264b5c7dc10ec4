//! TOC and section actions on a [`TextBuffer`].
//!
//! The `*_edits` functions only compute the edits against the current lines,
//! the others also apply them to the buffer.

use crate::document::{Edit, Position, TextBuffer, TextRange};
use crate::header::extract_headers;
use crate::options::TocOptions;
use crate::toc::{anchor_line, render_toc, ANCHOR_PATTERN, TOC_START_PATTERN, TOC_STOP_PATTERN};
use crate::Error;

/// Returns the range of the existing TOC block, markers included.
pub fn find_toc_range<B: TextBuffer + ?Sized>(buffer: &B) -> Option<TextRange> {
    buffer.locate_marker_range(&TOC_START_PATTERN, &TOC_STOP_PATTERN)
}

/// Returns `options` overridden by the start marker of the TOC at `toc_range`.
fn document_options(lines: &[String], toc_range: Option<TextRange>, options: &TocOptions) -> TocOptions {
    let mut options = options.clone();
    options.flags.clear();
    if let Some(marker) = toc_range.and_then(|range| lines.get(range.start.line)) {
        options.apply_marker(marker);
    }
    options
}

fn delete_anchor_edits(lines: &[String]) -> impl Iterator<Item = Edit> + '_ {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| ANCHOR_PATTERN.is_match(line))
        .map(|(idx, _)| Edit::Delete(TextRange::whole_line(idx)))
}

/// Computes the edits of creating or refreshing the TOC.
///
/// An existing TOC is replaced in place, otherwise the TOC is inserted at
/// `cursor`. Returns `None` when triggered by a save and there is no TOC
/// or the document disables `updateOnSave`.
pub fn toc_edits<B: TextBuffer + ?Sized>(
    buffer: &B,
    options: &TocOptions,
    cursor: Position,
    by_save: bool,
) -> Result<Option<Vec<Edit>>, Error> {
    let lines = buffer.lines();
    let toc_range = find_toc_range(buffer);
    let options = document_options(&lines, toc_range, options);

    if by_save && (!options.update_on_save || toc_range.is_none()) {
        return Ok(None);
    }

    let mut edits = Vec::new();

    let eol = options.line_ending.as_str();

    // A new TOC keeps the line at the cursor on its own line.
    let (insert_position, trailing) = match toc_range {
        Some(range) => {
            edits.push(Edit::Delete(range));
            edits.extend(delete_anchor_edits(&lines));
            (range.start, "")
        }
        None => (Position::new(cursor.line, 0), eol),
    };

    let headers = extract_headers(&lines, &options)?;

    edits.push(Edit::Insert {
        at: insert_position,
        text: format!("{}{trailing}", render_toc(&headers, &options)),
    });

    if options.insert_anchor {
        edits.extend(headers.iter().map(|header| Edit::Insert {
            at: Position::new(header.line, 0),
            text: format!("{}{eol}", anchor_line(&header.hash)),
        }));
    }

    tracing::debug!(
        headers = headers.len(),
        existing_toc = toc_range.is_some(),
        "Generated markdown TOC"
    );

    Ok(Some(edits))
}

/// Creates or refreshes the TOC, returns whether the buffer was modified.
pub fn update_toc<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    options: &TocOptions,
    cursor: Position,
    by_save: bool,
) -> Result<bool, Error> {
    match toc_edits(buffer, options, cursor, by_save)? {
        Some(edits) => {
            buffer.apply_edits(edits);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Computes the edits of removing the TOC block, including the line break of
/// its stop marker, and the inserted anchors.
pub fn delete_toc_edits<B: TextBuffer + ?Sized>(buffer: &B) -> Option<Vec<Edit>> {
    let lines = buffer.lines();
    let toc_range = find_toc_range(buffer)?;
    let toc_lines = TextRange::new(toc_range.start, Position::new(toc_range.end.line + 1, 0));
    Some(
        std::iter::once(Edit::Delete(toc_lines))
            .chain(delete_anchor_edits(&lines))
            .collect(),
    )
}

/// Removes the TOC block and the inserted anchors, returns whether a TOC was
/// found.
pub fn delete_toc<B: TextBuffer + ?Sized>(buffer: &mut B) -> bool {
    match delete_toc_edits(buffer) {
        Some(edits) => {
            buffer.apply_edits(edits);
            true
        }
        None => false,
    }
}

/// Computes the edits of rewriting every header as `## 1.2. Title`, or as
/// `## Title` when `numbered` is false.
pub fn section_edits<B: TextBuffer + ?Sized>(
    buffer: &B,
    options: &TocOptions,
    numbered: bool,
) -> Result<Vec<Edit>, Error> {
    let lines = buffer.lines();
    let options = document_options(&lines, find_toc_range(buffer), options);

    let edits = extract_headers(&lines, &options)?
        .into_iter()
        .map(|header| {
            let text = if numbered {
                format!("{} {} {}", header.mark, header.ordered_list, header.base_title)
            } else {
                format!("{} {}", header.mark, header.base_title)
            };
            Edit::Replace {
                range: header.range,
                text,
            }
        })
        .collect();

    Ok(edits)
}

pub fn update_sections<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    options: &TocOptions,
) -> Result<(), Error> {
    let edits = section_edits(buffer, options, true)?;
    buffer.apply_edits(edits);
    Ok(())
}

pub fn delete_sections<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    options: &TocOptions,
) -> Result<(), Error> {
    let edits = section_edits(buffer, options, false)?;
    buffer.apply_edits(edits);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::options::LineEnding;

    const DOC: &str = "# Title\n\nSome text.\n\n## Setup\n\n```sh\n# not a header\n```\n\n## Setup\n### Usage\n";

    fn options() -> TocOptions {
        TocOptions {
            line_ending: LineEnding::Lf,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_toc_at_cursor() {
        let mut doc = Document::new(DOC);
        assert!(update_toc(&mut doc, &options(), Position::new(1, 0), false).unwrap());

        assert_eq!(
            doc.text(),
            "# Title\n\
             <!-- TOC -->\n\n\
             - [Title](#title)\n\
             \t- [Setup](#setup)\n\
             \t- [Setup](#setup-1)\n\
             \t\t- [Usage](#usage)\n\
             \n<!-- /TOC -->\n\
             \n\
             Some text.\n\n## Setup\n\n```sh\n# not a header\n```\n\n## Setup\n### Usage\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let mut doc = Document::new(DOC);
        let options = TocOptions {
            insert_anchor: true,
            ..options()
        };
        update_toc(&mut doc, &options, Position::new(1, 0), false).unwrap();
        assert!(doc.text().contains("<a id=\"md-setup-1\" name=\"setup-1\"></a>\n## Setup"));

        assert!(delete_toc(&mut doc));
        assert_eq!(doc.text(), DOC);
        assert!(!delete_toc(&mut doc));
    }

    #[test]
    fn test_insert_toc_above_header() {
        let original = "# Title\n\n## A\n";
        let mut doc = Document::new(original);
        let options = TocOptions {
            insert_anchor: true,
            ..options()
        };
        update_toc(&mut doc, &options, Position::new(0, 0), false).unwrap();

        assert_eq!(
            doc.text(),
            "<!-- TOC -->\n\n\
             - [Title](#title)\n\
             \t- [A](#a)\n\
             \n<!-- /TOC -->\n\
             <a id=\"md-title\" name=\"title\"></a>\n\
             # Title\n\n\
             <a id=\"md-a\" name=\"a\"></a>\n\
             ## A\n"
        );

        let updated = doc.text().to_string();
        update_toc(&mut doc, &options, Position::new(0, 0), false).unwrap();
        assert_eq!(doc.text(), updated);

        assert!(delete_toc(&mut doc));
        assert_eq!(doc.text(), original);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut doc = Document::new(DOC);
        let options = TocOptions {
            insert_anchor: true,
            ordered_list: true,
            ..options()
        };
        update_toc(&mut doc, &options, Position::new(1, 0), false).unwrap();
        let first = doc.text().to_string();

        update_toc(&mut doc, &options, Position::new(0, 0), false).unwrap();
        assert_eq!(doc.text(), first);
    }

    #[test]
    fn test_update_reads_marker_options() {
        let mut doc = Document::new("<!-- TOC depthFrom:2 withLinks:false -->\n<!-- /TOC -->\n# A\n## B\n");
        update_toc(&mut doc, &options(), Position::default(), false).unwrap();

        assert_eq!(
            doc.text(),
            "<!-- TOC depthFrom:2 withLinks:false -->\n\n- B\n\n<!-- /TOC -->\n# A\n## B\n"
        );
    }

    #[test]
    fn test_update_on_save() {
        let mut doc = Document::new(DOC);
        assert!(!update_toc(&mut doc, &options(), Position::default(), true).unwrap());
        assert_eq!(doc.text(), DOC);

        let mut doc = Document::new("<!-- TOC updateOnSave:false -->\n<!-- /TOC -->\n# A\n");
        assert!(!update_toc(&mut doc, &options(), Position::default(), true).unwrap());

        let mut doc = Document::new("<!-- TOC -->\n<!-- /TOC -->\n# A\n");
        assert!(update_toc(&mut doc, &options(), Position::default(), true).unwrap());
        assert_eq!(
            doc.text(),
            "<!-- TOC -->\n\n- [A](#a)\n\n<!-- /TOC -->\n# A\n"
        );
    }

    #[test]
    fn test_sections() {
        let mut doc = Document::new("# Intro\n## 9.9. Old\n## Next\n# End\n");
        update_sections(&mut doc, &options()).unwrap();
        assert_eq!(doc.text(), "# 1. Intro\n## 1.1. Old\n## 1.2. Next\n# 2. End\n");

        delete_sections(&mut doc, &options()).unwrap();
        assert_eq!(doc.text(), "# Intro\n## Old\n## Next\n# End\n");
    }
}
