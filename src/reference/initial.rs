use super::EditState;
use crate::model::{Field, Group, Layout, View};

/// Collects the server-echoed value of every visible, bound field in `view`.
///
/// The result seeds a fresh edit state; it is never merged into an existing one.
pub fn extract_initial_values(view: &View) -> EditState {
    let mut values = EditState::new();
    collect_view(view, &mut values);
    values
}

fn collect_view(view: &View, values: &mut EditState) {
    if view.contributes_values() {
        collect_groups(&view.groups, values);
    }
}

fn collect_groups(groups: &[Group], values: &mut EditState) {
    for group in groups {
        match group {
            Group::View(view) => collect_view(view, values),
            Group::Layout(layout) => collect_layout(layout, values),
            Group::Field(field) => collect_field(field, values),
            Group::Paragraph(_) | Group::Caption(_) | Group::Unsupported => {}
        }
    }
}

// Layout visibility does not gate extraction; only the fields' own flags do.
fn collect_layout(layout: &Layout, values: &mut EditState) {
    if let Some(rows) = &layout.rows {
        for row in rows {
            collect_groups(&row.groups, values);
        }
    } else if let Some(view) = &layout.view {
        collect_view(view, values);
    } else if let Some(groups) = &layout.groups {
        collect_groups(groups, values);
    }
}

fn collect_field(field: &Field, values: &mut EditState) {
    if field.visible && field.is_bound() {
        values.insert(field.reference.clone(), field.value.clone());
    }
}
