use crate::anchor::PlatformMode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `key:value` or `key=value` pair in the TOC start marker.
static MARKER_OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)[:=]([\w.]+)").unwrap());

/// Indentation of one TOC level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(try_from = "IndentValue", into = "IndentValue")]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(n) if *n > 0 => " ".repeat(*n),
            _ => "\t".to_string(),
        }
    }
}

/// `indent = "tab"` or `indent = 4` in the config file.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum IndentValue {
    Spaces(usize),
    Keyword(String),
}

impl TryFrom<IndentValue> for Indent {
    type Error = String;

    fn try_from(value: IndentValue) -> Result<Self, Self::Error> {
        match value {
            IndentValue::Spaces(n) => Ok(Self::Spaces(n)),
            IndentValue::Keyword(s) if s.eq_ignore_ascii_case("tab") => Ok(Self::Tab),
            IndentValue::Keyword(s) => Err(format!("invalid indent `{s}`, expect `tab` or a number")),
        }
    }
}

impl From<Indent> for IndentValue {
    fn from(indent: Indent) -> Self {
        match indent {
            Indent::Tab => Self::Keyword("tab".into()),
            Indent::Spaces(n) => Self::Spaces(n),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Native line ending of the running platform.
    #[default]
    Auto,
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto if cfg!(windows) => "\r\n",
            Self::Auto | Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Option that can be overridden per document in the TOC start marker.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    DepthFrom,
    DepthTo,
    InsertAnchor,
    WithLinks,
    OrderedList,
    UpdateOnSave,
    AnchorMode,
}

impl OptionKey {
    const ALL: [Self; 7] = [
        Self::DepthFrom,
        Self::DepthTo,
        Self::InsertAnchor,
        Self::WithLinks,
        Self::OrderedList,
        Self::UpdateOnSave,
        Self::AnchorMode,
    ];

    /// Name of the key in the marker comment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepthFrom => "depthFrom",
            Self::DepthTo => "depthTo",
            Self::InsertAnchor => "insertAnchor",
            Self::WithLinks => "withLinks",
            Self::OrderedList => "orderedList",
            Self::UpdateOnSave => "updateOnSave",
            Self::AnchorMode => "anchorMode",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name))
    }
}

/// Options of extracting the headers and rendering the TOC.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TocOptions {
    /// Shallowest header level included in the TOC.
    pub depth_from: usize,

    /// Deepest header level included in the TOC.
    pub depth_to: usize,

    /// Render `1.`, `2.` rows instead of `-` bullets.
    pub ordered_list: bool,

    /// Render each row as a link to the header anchor.
    pub with_links: bool,

    /// Renderer whose anchor naming is emulated.
    pub anchor_mode: PlatformMode,

    /// Module prefix of the anchors, required by the `nodejs` mode.
    pub module_name: Option<String>,

    /// Insert an explicit `<a>` anchor above each header.
    pub insert_anchor: bool,

    /// Refresh an existing TOC when the document is saved.
    pub update_on_save: bool,

    pub indent: Indent,

    pub line_ending: LineEnding,

    /// Options read from the TOC start marker, echoed back when rendering.
    #[serde(skip)]
    pub flags: Vec<OptionKey>,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            depth_from: 1,
            depth_to: 6,
            ordered_list: false,
            with_links: true,
            anchor_mode: PlatformMode::Github,
            module_name: None,
            insert_anchor: false,
            update_on_save: true,
            indent: Indent::Tab,
            line_ending: LineEnding::Auto,
            flags: Vec::new(),
        }
    }
}

impl TocOptions {
    /// Returns the configured depth range clamped to valid header levels.
    pub fn depth_range(&self) -> (usize, usize) {
        (self.depth_from.clamp(1, 6), self.depth_to.clamp(1, 6))
    }

    pub fn value_of(&self, key: OptionKey) -> String {
        match key {
            OptionKey::DepthFrom => self.depth_from.to_string(),
            OptionKey::DepthTo => self.depth_to.to_string(),
            OptionKey::InsertAnchor => self.insert_anchor.to_string(),
            OptionKey::WithLinks => self.with_links.to_string(),
            OptionKey::OrderedList => self.ordered_list.to_string(),
            OptionKey::UpdateOnSave => self.update_on_save.to_string(),
            OptionKey::AnchorMode => self.anchor_mode.to_string(),
        }
    }

    /// Overrides the options with the `key:value` pairs of a TOC start marker
    /// such as `<!-- TOC depthFrom:2 orderedList:true -->`.
    ///
    /// The recognized keys are recorded in [`Self::flags`] in the order they
    /// appear. Unknown keys and invalid values are ignored.
    pub fn apply_marker(&mut self, marker: &str) {
        self.flags.clear();

        for caps in MARKER_OPTION.captures_iter(marker) {
            let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let value = value.as_str();

            let Some(key) = OptionKey::from_name(key.as_str()) else {
                tracing::debug!(key = key.as_str(), "Ignored unknown TOC option");
                continue;
            };

            let applied = match key {
                OptionKey::DepthFrom => parse_depth(value).map(|v| self.depth_from = v).is_some(),
                OptionKey::DepthTo => parse_depth(value).map(|v| self.depth_to = v).is_some(),
                OptionKey::InsertAnchor => {
                    self.insert_anchor = parse_bool(value);
                    true
                }
                OptionKey::WithLinks => {
                    self.with_links = parse_bool(value);
                    true
                }
                OptionKey::OrderedList => {
                    self.ordered_list = parse_bool(value);
                    true
                }
                OptionKey::UpdateOnSave => {
                    self.update_on_save = parse_bool(value);
                    true
                }
                OptionKey::AnchorMode => value
                    .parse::<PlatformMode>()
                    .map(|mode| self.anchor_mode = mode)
                    .is_ok(),
            };

            if !applied {
                tracing::warn!(key = key.name(), value, "Ignored invalid TOC option value");
                continue;
            }

            if !self.flags.contains(&key) {
                self.flags.push(key);
            }
        }
    }
}

fn parse_depth(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().map(|depth| depth.clamp(1, 6))
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_marker() {
        let mut options = TocOptions::default();
        options.apply_marker("<!-- TOC depthFrom:2 orderedList:TRUE anchorMode:gitlab.com -->");

        assert_eq!(options.depth_from, 2);
        assert!(options.ordered_list);
        assert_eq!(options.anchor_mode, PlatformMode::Gitlab);
        assert_eq!(
            options.flags,
            vec![
                OptionKey::DepthFrom,
                OptionKey::OrderedList,
                OptionKey::AnchorMode
            ]
        );
    }

    #[test]
    fn test_apply_marker_ignores_invalid_values() {
        let mut options = TocOptions::default();
        options.apply_marker("<!-- TOC depthTo=9 withLinks:no anchorMode:gitea foo:bar -->");

        assert_eq!(options.depth_to, 6);
        assert!(!options.with_links);
        assert_eq!(options.anchor_mode, PlatformMode::Github);
        assert_eq!(options.flags, vec![OptionKey::DepthTo, OptionKey::WithLinks]);
    }

    #[test]
    fn test_apply_marker_resets_flags() {
        let mut options = TocOptions::default();
        options.apply_marker("<!-- TOC depthFrom:2 -->");
        options.apply_marker("<!-- TOC -->");

        assert!(options.flags.is_empty());
        assert_eq!(options.depth_from, 2);
    }

    #[test]
    fn test_indent_unit() {
        assert_eq!(Indent::Tab.unit(), "\t");
        assert_eq!(Indent::Spaces(2).unit(), "  ");
        assert_eq!(Indent::Spaces(0).unit(), "\t");
    }
}
