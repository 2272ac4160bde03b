use super::node::{Arrangement, FieldControl, FieldNode, GridNode, IconGlyph, RenderNode};
use crate::model::RepeatKind;
use std::fmt;

/// A wrapper to print a render tree as an indented ASCII tree.
pub struct DisplayNode<'a> {
    pub node: &'a RenderNode,
}

impl<'a> DisplayNode<'a> {
    pub fn new(node: &'a RenderNode) -> Self {
        Self { node }
    }
}

impl fmt::Display for DisplayNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_as_tree(self.node, f, "", true)
    }
}

fn fmt_as_tree(
    node: &RenderNode,
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    is_last: bool,
) -> fmt::Result {
    let node_marker = if is_last { "└── " } else { "├── " };
    write!(f, "{}{}", prefix, node_marker)?;

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

    match node {
        RenderNode::View {
            name,
            divided,
            children,
        } => {
            writeln!(f, "View '{}'{}", name, if *divided { " (divided)" } else { "" })?;
            fmt_children(children.iter(), f, &child_prefix)?;
        }
        RenderNode::Layout {
            title,
            arrangement,
            children,
        } => {
            write!(f, "Layout [{}]", arrangement_name(arrangement))?;
            if let Some(title) = title {
                write!(f, " '{}'", title)?;
            }
            writeln!(f)?;
            fmt_children(children.iter(), f, &child_prefix)?;
        }
        RenderNode::Grid(grid) => fmt_grid(grid, f, &child_prefix)?,
        RenderNode::Paragraph { html } => writeln!(f, "Paragraph: {}", html)?,
        RenderNode::Caption { text } => writeln!(f, "Caption: {}", text)?,
        RenderNode::Field(field) => fmt_field(field, f)?,
        RenderNode::Annotated { message, child } => {
            writeln!(f, "Error: {}", message)?;
            fmt_as_tree(child, f, &child_prefix, true)?;
        }
    }
    Ok(())
}

fn fmt_children<'n>(
    children: impl ExactSizeIterator<Item = &'n RenderNode>,
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
) -> fmt::Result {
    let count = children.len();
    for (i, child) in children.enumerate() {
        fmt_as_tree(child, f, prefix, i + 1 == count)?;
    }
    Ok(())
}

fn fmt_grid(grid: &GridNode, f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
    write!(f, "Grid")?;
    if let Some(title) = &grid.title {
        write!(f, " '{}'", title)?;
    }
    if let Some(repeat) = &grid.repeat {
        let kind = match repeat.kind {
            RepeatKind::Group => "group",
            RepeatKind::List => "list",
        };
        write!(f, " <{} {}>", kind, repeat.reference)?;
    }
    if grid.loading {
        write!(f, " (loading)")?;
    }
    writeln!(f)?;

    let sections = 1 + grid.rows.len();
    let header: Vec<&RenderNode> = grid.header.iter().flatten().collect();
    writeln!(
        f,
        "{}{}Header",
        prefix,
        if sections == 1 { "└── " } else { "├── " }
    )?;
    let header_prefix = format!("{}{}", prefix, if sections == 1 { "    " } else { "│   " });
    fmt_children(header.into_iter(), f, &header_prefix)?;

    for (i, row) in grid.rows.iter().enumerate() {
        let is_last = i + 2 == sections;
        write!(f, "{}{}Row {}", prefix, if is_last { "└── " } else { "├── " }, i + 1)?;
        if let Some(key) = &row.key {
            write!(f, " ({})", key)?;
        }
        writeln!(f)?;
        let row_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        let cells: Vec<&RenderNode> = row.cells.iter().flatten().collect();
        fmt_children(cells.into_iter(), f, &row_prefix)?;
    }
    Ok(())
}

fn fmt_field(field: &FieldNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", control_summary(&field.control))?;
    if !field.reference.is_empty() {
        write!(f, " {}", field.reference)?;
    }
    if let Some(label) = field.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        write!(f, " \"{}\"", label)?;
    }
    let mut flags = Vec::new();
    if field.required {
        flags.push("required");
    }
    if field.disabled {
        flags.push("disabled");
    }
    if field.read_only {
        flags.push("read-only");
    }
    if !flags.is_empty() {
        write!(f, " [{}]", flags.join(", "))?;
    }
    if let Some(trigger) = &field.trigger {
        write!(
            f,
            " on {:?} ({} step(s))",
            trigger.event,
            trigger.handler.steps.len()
        )?;
    }
    writeln!(f)
}

fn arrangement_name(arrangement: &Arrangement) -> String {
    match arrangement {
        Arrangement::DoubleColumn => "double column".to_string(),
        Arrangement::TripleColumn => "triple column".to_string(),
        Arrangement::Split { widths } => format!("split {}/{}", widths[0], widths[1]),
        Arrangement::Stacked => "stacked".to_string(),
        Arrangement::Dynamic => "dynamic".to_string(),
        Arrangement::InlineMiddle => "inline middle".to_string(),
    }
}

fn control_summary(control: &FieldControl) -> String {
    match control {
        FieldControl::TextInput { value, numeric, .. } => {
            let kind = if *numeric { "NumberInput" } else { "TextInput" };
            format!("{} = '{}'", kind, value)
        }
        FieldControl::TextArea { value, .. } => format!("TextArea = '{}'", value),
        FieldControl::Checkbox { checked } => format!("Checkbox = {}", checked),
        FieldControl::Dropdown { value, .. } => format!("Dropdown = '{}'", value),
        FieldControl::RadioGroup { options } => {
            let selected = options
                .iter()
                .find(|option| option.checked)
                .map(|option| option.key.as_str())
                .unwrap_or("");
            format!("RadioGroup({}) = '{}'", options.len(), selected)
        }
        FieldControl::AutoComplete { value, .. } => format!("AutoComplete = '{}'", value),
        FieldControl::DatePicker { date } => match date {
            Some(date) => format!("DatePicker = {}", date),
            None => "DatePicker".to_string(),
        },
        FieldControl::Button { caption } => format!("Button '{}'", caption),
        FieldControl::Label { text } => format!("Label '{}'", text),
        FieldControl::Link { text, href, .. } => format!("Link '{}' -> '{}'", text, href),
        FieldControl::Icon { glyph } => match glyph {
            IconGlyph::Named { name } => format!("Icon {}", name.as_deref().unwrap_or("?")),
            IconGlyph::Image { file } => format!("Icon image {}", file),
            IconGlyph::Url { src } => format!("Icon url {}", src),
            IconGlyph::StyleClass { class } => format!("Icon class {}", class),
            IconGlyph::Undefined => "Icon".to_string(),
        },
        FieldControl::ReadOnly { value } => format!("ReadOnly = '{}'", value),
        FieldControl::Unsupported { kind } => format!("Unsupported '{}'", kind),
    }
}
