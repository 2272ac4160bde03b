use crate::error::ReferenceError;
use std::fmt;

/// One dot-separated component of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'r> {
    /// A plain embedded page or property name.
    Page(&'r str),
    /// `name(n)`: element of a PageList. `index` is zero-based; the path syntax is one-based.
    ListItem { name: &'r str, index: usize },
    /// `name(key)`: entry of a PageGroup.
    GroupEntry { name: &'r str, key: &'r str },
}

impl<'r> Segment<'r> {
    pub fn name(&self) -> &'r str {
        match *self {
            Segment::Page(name)
            | Segment::ListItem { name, .. }
            | Segment::GroupEntry { name, .. } => name,
        }
    }

    pub fn is_repeat(&self) -> bool {
        !matches!(self, Segment::Page(_))
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Page(name) => write!(f, "{}", name),
            Segment::ListItem { name, index } => write!(f, "{}({})", name, index + 1),
            Segment::GroupEntry { name, key } => write!(f, "{}({})", name, key),
        }
    }
}

/// A reference split into the containers it walks through and its final segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference<'r> {
    pub reference: &'r str,
    pub containers: Vec<Segment<'r>>,
    pub leaf: Segment<'r>,
}

/// Parses a single segment of `reference`.
pub fn parse_segment<'r>(reference: &str, segment: &'r str) -> Result<Segment<'r>, ReferenceError> {
    if segment.is_empty() {
        return Err(ReferenceError::malformed(reference, segment, "empty segment"));
    }

    let Some(open) = segment.find('(') else {
        if segment.contains(')') {
            return Err(ReferenceError::malformed(
                reference,
                segment,
                "closing parenthesis without an opening one",
            ));
        }
        return Ok(Segment::Page(segment));
    };

    if !segment.ends_with(')') {
        return Err(ReferenceError::malformed(
            reference,
            segment,
            "repeat subscript must close the segment",
        ));
    }

    let name = &segment[..open];
    let key = &segment[open + 1..segment.len() - 1];

    if name.is_empty() {
        return Err(ReferenceError::malformed(
            reference,
            segment,
            "repeat subscript has no container name",
        ));
    }
    if key.is_empty() {
        return Err(ReferenceError::malformed(reference, segment, "empty subscript"));
    }
    if key.contains('(') || key.contains(')') {
        return Err(ReferenceError::malformed(
            reference,
            segment,
            "unbalanced parentheses",
        ));
    }

    match key.parse::<i64>() {
        Ok(position) if position >= 1 => usize::try_from(position - 1)
            .map(|index| Segment::ListItem { name, index })
            .map_err(|_| ReferenceError::InvalidIndex {
                reference: reference.to_string(),
                segment: segment.to_string(),
            }),
        Ok(_) => Err(ReferenceError::InvalidIndex {
            reference: reference.to_string(),
            segment: segment.to_string(),
        }),
        Err(_) => Ok(Segment::GroupEntry { name, key }),
    }
}

/// Splits `reference` on `.` and parses every segment. Root-page markers are dropped
/// from the container segments; the leaf is always kept.
pub fn parse_reference<'r>(
    reference: &'r str,
    root_page: &str,
) -> Result<ParsedReference<'r>, ReferenceError> {
    let mut parts: Vec<&'r str> = reference.split('.').collect();
    // `split` always yields at least one item.
    let leaf_part = parts.pop().unwrap_or_default();
    let leaf = parse_segment(reference, leaf_part)?;

    let containers = parts
        .into_iter()
        .filter(|part| *part != root_page)
        .map(|part| parse_segment(reference, part))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedReference {
        reference,
        containers,
        leaf,
    })
}
