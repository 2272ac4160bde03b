use super::node::{GridNode, GridRow, RenderNode, RepeatBinding};
use super::{LayoutInterpreter, RenderContext};
use crate::model::{Layout, RepeatKind, Row};
use crate::reference::page_group_key_from_row;

impl LayoutInterpreter {
    /// Renders a `Grid` layout as a table: header cells, one row per body row and, for
    /// repeat-bound grids, a footer carrying the add/remove controls.
    pub(super) fn render_grid(&self, layout: &Layout, ctx: &RenderContext<'_>) -> GridNode {
        let repeat = layout
            .reference
            .as_ref()
            .filter(|reference| !reference.is_empty())
            .map(|reference| RepeatBinding {
                reference: reference.clone(),
                kind: layout.reference_type.unwrap_or_default(),
            });

        let header: Vec<Option<RenderNode>> = layout
            .header
            .as_ref()
            .map(|row| self.render_cells(row, ctx, true))
            .unwrap_or_default();

        let rows = layout
            .rows
            .iter()
            .flatten()
            .map(|row| GridRow {
                key: match &repeat {
                    Some(RepeatBinding {
                        kind: RepeatKind::Group,
                        ..
                    }) => page_group_key_from_row(row).map(str::to_string),
                    _ => None,
                },
                cells: self.render_cells(row, ctx, false),
            })
            .collect();

        let footer_span = match &repeat {
            Some(RepeatBinding {
                kind: RepeatKind::Group,
                ..
            }) => header.len() + 1,
            _ => header.len(),
        };

        let loading = repeat
            .as_ref()
            .is_some_and(|binding| ctx.loading.contains(&binding.reference));

        GridNode {
            title: layout.title.clone(),
            repeat,
            header,
            rows,
            footer_span,
            loading,
        }
    }

    fn render_cells(
        &self,
        row: &Row,
        ctx: &RenderContext<'_>,
        show_label: bool,
    ) -> Vec<Option<RenderNode>> {
        row.groups
            .iter()
            .map(|group| self.render_group(group, ctx, show_label))
            .collect()
    }
}
