use crate::actions::ComposedHandler;
use crate::model::{ModeOption, RepeatKind};
use chrono::NaiveDate;
use serde::Serialize;

/// A renderable element produced by the layout interpreter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum RenderNode {
    /// A view. Nested views are `divided` from the content before them.
    View {
        name: String,
        divided: bool,
        children: Vec<RenderNode>,
    },
    Layout {
        title: Option<String>,
        arrangement: Arrangement,
        children: Vec<RenderNode>,
    },
    Grid(GridNode),
    /// Server-supplied HTML, passed through untouched.
    Paragraph { html: String },
    Caption { text: String },
    Field(FieldNode),
    /// An element decorated with a validation message.
    Annotated {
        message: String,
        child: Box<RenderNode>,
    },
}

impl RenderNode {
    pub fn children(&self) -> Vec<&RenderNode> {
        match self {
            RenderNode::View { children, .. } | RenderNode::Layout { children, .. } => {
                children.iter().collect()
            }
            RenderNode::Grid(grid) => grid
                .header
                .iter()
                .flatten()
                .chain(grid.rows.iter().flat_map(|row| row.cells.iter().flatten()))
                .collect(),
            RenderNode::Annotated { child, .. } => vec![child.as_ref()],
            RenderNode::Paragraph { .. } | RenderNode::Caption { .. } | RenderNode::Field(_) => {
                Vec::new()
            }
        }
    }

    /// Depth-first search for the field bound to `reference`.
    pub fn find_field(&self, reference: &str) -> Option<&FieldNode> {
        match self {
            RenderNode::Field(field) if field.reference == reference => Some(field),
            _ => self
                .children()
                .into_iter()
                .find_map(|child| child.find_field(reference)),
        }
    }

    /// All fields in document order.
    pub fn fields(&self) -> Vec<&FieldNode> {
        match self {
            RenderNode::Field(field) => vec![field],
            _ => self
                .children()
                .into_iter()
                .flat_map(|child| child.fields())
                .collect(),
        }
    }
}

/// How a layout arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Arrangement {
    /// Two equal columns.
    DoubleColumn,
    TripleColumn,
    /// Two columns of unequal width, out of a 16-unit row.
    Split { widths: [u8; 2] },
    Stacked,
    /// Row-major: every row's groups, one after another.
    Dynamic,
    /// Single row, columns sized to content.
    InlineMiddle,
}

impl Arrangement {
    /// Column width (in 16ths) of the child at `index`, when the arrangement fixes one.
    pub fn column_width(&self, index: usize) -> Option<u8> {
        match self {
            Arrangement::DoubleColumn => Some(8),
            Arrangement::Split { widths } => widths.get(index).copied(),
            _ => None,
        }
    }
}

/// Repeat container a grid edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatBinding {
    pub reference: String,
    pub kind: RepeatKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridNode {
    pub title: Option<String>,
    /// `None` for a plain table without add/remove controls.
    pub repeat: Option<RepeatBinding>,
    /// Header cells; `None` where the cell renders nothing.
    pub header: Vec<Option<RenderNode>>,
    pub rows: Vec<GridRow>,
    /// Column span of the add/remove footer.
    pub footer_span: usize,
    /// An add/remove round trip for this container is in flight.
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// PageGroup key of the row, when the grid edits a PageGroup.
    pub key: Option<String>,
    pub cells: Vec<Option<RenderNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub reference: String,
    pub name: String,
    pub label: Option<String>,
    pub required: bool,
    pub disabled: bool,
    pub read_only: bool,
    pub control: FieldControl,
    /// Handler fired by the control's natural trigger, when the field binds any actions.
    pub trigger: Option<Trigger>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerEvent {
    Blur,
    Click,
    Select,
    Change,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub event: TriggerEvent,
    pub handler: ComposedHandler,
}

/// The concrete control a field renders as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum FieldControl {
    TextInput {
        value: String,
        numeric: bool,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
    },
    Checkbox { checked: bool },
    Dropdown {
        value: String,
        placeholder: Option<String>,
        source: OptionSource,
    },
    RadioGroup { options: Vec<RadioOption> },
    AutoComplete { value: String, source: DataPageSource },
    DatePicker { date: Option<NaiveDate> },
    Button { caption: String },
    Label { text: String },
    Link {
        text: String,
        href: String,
        image: Option<LinkImage>,
    },
    Icon { glyph: IconGlyph },
    /// Static label/value pair used for read-only and display-only fields.
    ReadOnly { value: String },
    /// Placeholder for a control kind the interpreter does not know.
    Unsupported { kind: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OptionSource {
    Local { options: Vec<ModeOption> },
    DataPage(DataPageSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DataPageSource {
    pub page_id: String,
    pub value_property: String,
    pub prompt_property: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioOption {
    pub key: String,
    pub label: String,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkImage {
    pub file: String,
    pub position: ImagePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImagePosition {
    Left,
    Right,
    /// The image is configured but not placed.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum IconGlyph {
    /// A named icon from the host's icon font. `None` when the standard icon is unmapped.
    Named { name: Option<String> },
    Image { file: String },
    Url { src: String },
    StyleClass { class: String },
    Undefined,
}
