use super::default_visible;
use super::field::Field;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// A named container of groups. Pages (harnesses) are views that carry a `pageID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default, rename = "pageID", skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl View {
    /// Parses a view or page document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::Json(e.to_string()))
    }

    pub fn is_page(&self) -> bool {
        self.page_id.is_some()
    }

    /// Pages contribute their fields even when not explicitly flagged visible.
    pub fn contributes_values(&self) -> bool {
        self.visible || self.is_page()
    }
}

/// Exactly one renderable element. Decoded from the API's
/// `{view?, layout?, paragraph?, caption?, field?}` object; an object carrying none of
/// the known keys decodes to [`Group::Unsupported`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGroup", into = "RawGroup")]
pub enum Group {
    View(View),
    Layout(Layout),
    Paragraph(Paragraph),
    Caption(Caption),
    Field(Field),
    /// A group kind this client does not know. Renders nothing.
    Unsupported,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    view: Option<View>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    caption: Option<Caption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<Field>,
}

impl TryFrom<RawGroup> for Group {
    type Error = ModelError;

    fn try_from(raw: RawGroup) -> Result<Self, Self::Error> {
        let populated = [
            raw.view.is_some(),
            raw.layout.is_some(),
            raw.paragraph.is_some(),
            raw.caption.is_some(),
            raw.field.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if populated > 1 {
            return Err(ModelError::GroupVariant(populated));
        }

        let group = match raw {
            RawGroup { view: Some(v), .. } => Group::View(v),
            RawGroup { layout: Some(l), .. } => Group::Layout(l),
            RawGroup {
                paragraph: Some(p), ..
            } => Group::Paragraph(p),
            RawGroup { caption: Some(c), .. } => Group::Caption(c),
            RawGroup { field: Some(f), .. } => Group::Field(f),
            _ => Group::Unsupported,
        };
        Ok(group)
    }
}

impl From<Group> for RawGroup {
    fn from(group: Group) -> Self {
        let mut raw = RawGroup::default();
        match group {
            Group::View(v) => raw.view = Some(v),
            Group::Layout(l) => raw.layout = Some(l),
            Group::Paragraph(p) => raw.paragraph = Some(p),
            Group::Caption(c) => raw.caption = Some(c),
            Group::Field(f) => raw.field = Some(f),
            Group::Unsupported => {}
        }
        raw
    }
}

tagged_kind! {
    /// Arrangement policy selected by a layout's `groupFormat`.
    pub enum GroupFormat {
        InlineGridDouble => "Inline grid double",
        InlineGridTriple => "Inline grid triple",
        InlineGrid7030 => "Inline grid 70 30",
        InlineGrid3070 => "Inline grid 30 70",
        Stacked => "Stacked",
        Grid => "Grid",
        Dynamic => "Dynamic",
        InlineMiddle => "Inline middle",
    }
    fallback Unrecognized
}

impl Default for GroupFormat {
    fn default() -> Self {
        GroupFormat::Unrecognized(String::new())
    }
}

/// Shape of a repeating structure bound to a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RepeatKind {
    /// Keyed mapping (PageGroup).
    Group,
    /// Ordered sequence (PageList).
    #[default]
    List,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub group_format: GroupFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Box<View>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<RepeatKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub value: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub value: String,
}
