//! Section grammar for SOP markdown.
//!
//! A section starts at a column-0 `## <Title>` line and runs until the next
//! column-0 `# ` or `## ` line. Lines inside fenced code blocks never open or
//! close a section, so example headings in code samples are left alone.

use std::path::Path;

use crate::{
    error::{Error, Result},
    types::{Parameter, SopDocument, SourceTier},
};

// ── Sections ────────────────────────────────────────────────────────────────

/// Section titles the registry understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Overview,
    Parameters,
    Steps,
    Examples,
    Troubleshooting,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        Self::Overview,
        Self::Parameters,
        Self::Steps,
        Self::Examples,
        Self::Troubleshooting,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Parameters => "Parameters",
            Self::Steps => "Steps",
            Self::Examples => "Examples",
            Self::Troubleshooting => "Troubleshooting",
        }
    }

    fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.title() == title)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Raw section bodies borrowed from a document, first occurrence of each title.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sections<'a> {
    bodies: [Option<&'a str>; 5],
}

impl<'a> Sections<'a> {
    /// Trimmed body of a section, if the heading exists.
    pub fn get(&self, kind: SectionKind) -> Option<&'a str> {
        self.bodies[kind.index()].map(str::trim)
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.bodies[kind.index()].is_some()
    }
}

/// Split a document into its recognized sections.
pub fn split_sections(content: &str) -> Sections<'_> {
    let mut sections = Sections::default();
    let mut open: Option<(SectionKind, usize)> = None;
    let mut fence: Option<Fence> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let text = line.trim_end_matches(['\n', '\r']);

        if let Some(open_fence) = fence {
            if open_fence.is_closed_by(text) {
                fence = None;
            }
            continue;
        }
        if let Some(opened) = Fence::open(text) {
            fence = Some(opened);
            continue;
        }
        if !is_boundary(text) {
            continue;
        }

        if let Some((kind, start)) = open.take() {
            sections.bodies[kind.index()] = Some(&content[start..line_start]);
        }
        let kind = text
            .strip_prefix("## ")
            .and_then(|title| SectionKind::from_title(title.trim()));
        if let Some(kind) = kind
            && !sections.contains(kind)
        {
            open = Some((kind, offset));
        }
    }

    if let Some((kind, start)) = open {
        sections.bodies[kind.index()] = Some(&content[start..]);
    }
    sections
}

/// An open code fence: its marker character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// A run of three or more backticks or tildes, optionally followed by an
    /// info string.
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|&c| matches!(c, '`' | '~'))?;
        let len = trimmed.chars().take_while(|&c| c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    /// Only a bare run of the same marker, at least as long, closes a fence.
    fn is_closed_by(self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.len() >= self.len && trimmed.chars().all(|c| c == self.marker)
    }
}

/// Column-0 `#` or `##` heading.
fn is_boundary(line: &str) -> bool {
    line == "#" || line == "##" || line.starts_with("# ") || line.starts_with("## ")
}

// ── Documents ───────────────────────────────────────────────────────────────

/// Parse one SOP file into a document.
///
/// Fails with [`Error::MissingOverviewSection`] when there is no Overview and
/// [`Error::EmptyOverviewSection`] when it has no text.
pub fn parse(
    name: &str,
    content: &str,
    source_tier: SourceTier,
    path: &Path,
) -> Result<SopDocument> {
    let sections = split_sections(content);
    let overview = sections
        .get(SectionKind::Overview)
        .ok_or(Error::MissingOverviewSection)?;
    let description = collapse_lines(overview);
    if description.is_empty() {
        return Err(Error::EmptyOverviewSection);
    }

    Ok(SopDocument {
        name: name.to_string(),
        description,
        content: content.to_string(),
        source_tier,
        path: path.to_path_buf(),
    })
}

/// Join the non-blank lines of a block with single spaces.
pub fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Parameters ──────────────────────────────────────────────────────────────

/// Extract parameter declarations from a Parameters section body.
/// Lines that don't match the declaration shape are skipped.
pub fn parse_parameters(section: &str) -> Vec<Parameter> {
    section.lines().filter_map(parse_parameter_line).collect()
}

/// Parse `- **name** (required|optional[, default: value]): description`.
///
/// The qualifier ends at the parenthesis that balances the opening one, so a
/// default such as `f(x)` and parentheses in the description both survive.
pub fn parse_parameter_line(line: &str) -> Option<Parameter> {
    let rest = line.trim_start().strip_prefix("- **")?;
    let (name, rest) = rest.split_once("**")?;
    if !is_snake_case(name) {
        return None;
    }

    let rest = rest.trim_start().strip_prefix('(')?;
    let close = balanced_close(rest)?;
    let qualifier = &rest[..close];
    let description = rest[close + 1..].strip_prefix(':')?.trim();

    let mut parts = split_top_level(qualifier).into_iter().map(str::trim);
    let required = match parts.next()? {
        "required" => true,
        "optional" => false,
        _ => return None,
    };
    let default = if required {
        None
    } else {
        parts
            .find_map(|part| part.strip_prefix("default:"))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(String::from)
    };

    Some(Parameter {
        name: name.to_string(),
        required,
        default,
        description: description.to_string(),
    })
}

fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Byte index of the `)` closing an already-opened parenthesis.
fn balanced_close(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            },
            _ => {},
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + 1;
            },
            _ => {},
        }
    }
    parts.push(&s[start..]);
    parts
}
