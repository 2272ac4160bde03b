//! Recursive rendering of API-described views into a [`RenderNode`] tree.
//!
//! The interpreter is a pure function of the view, the current edit state, the
//! validation map and a clock. Unknown field kinds render an `Unsupported`
//! placeholder and unknown layout formats fall back to stacking, so a newer server
//! never breaks rendering.

use crate::config::FormConfig;
use crate::model::{Group, GroupFormat, Layout, View};
use crate::model::ValidationErrors;
use crate::reference::{EditState, extract_initial_values};
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use log::{debug, warn};

mod display;
mod field;
mod grid;
mod node;

pub use display::DisplayNode;
pub use node::*;

/// Standard icon names mapped to the host icon font.
pub const STANDARD_ICONS: &[(&str, &str)] = &[
    ("pxIconAddItem", "plus circle"),
    ("pxIconAddNewWork", "rocket"),
    ("pxIconAttachments", "paperclip"),
    ("pxCancel", "cancel"),
    ("pxIconContents", "eye"),
    ("pxIconDeleteItem", "trash"),
    ("pxIconEnableActionSection", "rocket"),
    ("pxIconExpandCollapse", "plus square outline"),
    ("pxIconExplore", "setting"),
    ("pxIconFinishAssignment", "rocket"),
    ("pxIconGetNextWork", "rocket"),
    ("pxIconHistory", "history"),
    ("pxIconLocalAction", "rocket"),
    ("pxIconPrint", "print"),
    ("pxIconReopenWorkItem", "share"),
    ("pxIconReview", "rocket"),
    ("pxIconSave", "check square outline"),
    ("pxIconShowFlowLocation", "map marker alternate"),
    ("pxIconShowHarness", "rocket"),
    ("pxIconShowReopenScreen", "reply"),
    ("pxIconSpellChecker", "checkmark box"),
    ("pxIconUpdate", "setting"),
];

/// Everything besides the view that a render depends on.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub values: &'a EditState,
    pub errors: &'a ValidationErrors,
    /// Repeat containers with an add/remove round trip in flight.
    pub loading: &'a AHashSet<String>,
    /// Reference point for relative timestamps.
    pub now: DateTime<Utc>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        values: &'a EditState,
        errors: &'a ValidationErrors,
        loading: &'a AHashSet<String>,
    ) -> Self {
        Self {
            values,
            errors,
            loading,
            now: Utc::now(),
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// Maps views, groups, layouts and fields to render nodes.
#[derive(Debug, Clone)]
pub struct LayoutInterpreter {
    config: FormConfig,
    standard_icons: AHashMap<String, String>,
}

impl Default for LayoutInterpreter {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LayoutInterpreter {
    /// Creates a builder seeded with the default configuration and icon table.
    pub fn builder() -> LayoutInterpreterBuilder {
        LayoutInterpreterBuilder::new()
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Flat edit state seeded from the server-echoed values in `view`.
    pub fn initial_values(&self, view: &View) -> EditState {
        extract_initial_values(view)
    }

    /// Renders a top-level view or page. Invisible views render nothing; pages render
    /// even when not flagged visible.
    pub fn render(&self, view: &View, ctx: &RenderContext<'_>) -> Option<RenderNode> {
        if !view.contributes_values() {
            debug!("View '{}' is not visible; nothing to render", view.name);
            return None;
        }
        Some(self.render_view(view, ctx, false))
    }

    fn render_view(&self, view: &View, ctx: &RenderContext<'_>, divided: bool) -> RenderNode {
        RenderNode::View {
            name: view.name.clone(),
            divided,
            children: self.render_groups(&view.groups, ctx),
        }
    }

    fn render_groups(&self, groups: &[Group], ctx: &RenderContext<'_>) -> Vec<RenderNode> {
        groups
            .iter()
            .filter_map(|group| self.render_group(group, ctx, true))
            .collect()
    }

    pub(crate) fn render_group(
        &self,
        group: &Group,
        ctx: &RenderContext<'_>,
        show_label: bool,
    ) -> Option<RenderNode> {
        match group {
            Group::View(view) if !view.visible => None,
            Group::View(view) => Some(self.render_view(view, ctx, true)),
            Group::Layout(layout) => self.render_layout(layout, ctx),
            Group::Paragraph(paragraph) => paragraph.visible.then(|| RenderNode::Paragraph {
                html: paragraph.value.clone(),
            }),
            Group::Caption(caption) => Some(RenderNode::Caption {
                text: caption.value.clone(),
            }),
            Group::Field(field) => self.render_field(field, ctx, show_label),
            Group::Unsupported => {
                debug!("Skipping a group of unknown kind");
                None
            }
        }
    }

    /// Dispatches on `groupFormat`. An unrecognized format stacks its groups, or
    /// recurses into its nested view, or renders nothing.
    pub fn render_layout(&self, layout: &Layout, ctx: &RenderContext<'_>) -> Option<RenderNode> {
        if !layout.visible {
            return None;
        }

        let groups = layout.groups.as_deref().unwrap_or_default();
        let arranged = |arrangement: Arrangement, children: Vec<RenderNode>| {
            Some(RenderNode::Layout {
                title: layout.title.clone(),
                arrangement,
                children,
            })
        };

        match &layout.group_format {
            GroupFormat::InlineGridDouble => {
                arranged(Arrangement::DoubleColumn, self.render_groups(groups, ctx))
            }
            GroupFormat::InlineGridTriple => {
                arranged(Arrangement::TripleColumn, self.render_groups(groups, ctx))
            }
            GroupFormat::InlineGrid7030 => arranged(
                Arrangement::Split { widths: [11, 5] },
                self.render_groups(groups, ctx),
            ),
            GroupFormat::InlineGrid3070 => arranged(
                Arrangement::Split { widths: [5, 11] },
                self.render_groups(groups, ctx),
            ),
            GroupFormat::Stacked => arranged(Arrangement::Stacked, self.render_groups(groups, ctx)),
            GroupFormat::Grid => Some(RenderNode::Grid(self.render_grid(layout, ctx))),
            GroupFormat::Dynamic => {
                let children = match &layout.rows {
                    Some(rows) => rows
                        .iter()
                        .flat_map(|row| self.render_groups(&row.groups, ctx))
                        .collect(),
                    None => self.render_groups(groups, ctx),
                };
                arranged(Arrangement::Dynamic, children)
            }
            GroupFormat::InlineMiddle => {
                arranged(Arrangement::InlineMiddle, self.render_groups(groups, ctx))
            }
            GroupFormat::Unrecognized(format) => {
                if let Some(groups) = &layout.groups {
                    if !format.is_empty() {
                        warn!("Unrecognized layout format '{}'; stacking its groups", format);
                    }
                    arranged(Arrangement::Stacked, self.render_groups(groups, ctx))
                } else if let Some(view) = &layout.view {
                    if !view.contributes_values() {
                        return None;
                    }
                    arranged(Arrangement::Stacked, vec![self.render_view(view, ctx, false)])
                } else {
                    warn!(
                        "Layout with format '{}' has neither groups nor a view; skipping",
                        format
                    );
                    None
                }
            }
        }
    }
}

/// Builder for [`LayoutInterpreter`].
#[derive(Debug, Clone)]
pub struct LayoutInterpreterBuilder {
    config: FormConfig,
    standard_icons: AHashMap<String, String>,
}

impl LayoutInterpreterBuilder {
    fn new() -> Self {
        Self {
            config: FormConfig::default(),
            standard_icons: STANDARD_ICONS
                .iter()
                .map(|(standard, name)| (standard.to_string(), name.to_string()))
                .collect(),
        }
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Maps an additional (or overrides an existing) standard icon.
    pub fn with_standard_icon(mut self, standard: &str, name: &str) -> Self {
        self.standard_icons
            .insert(standard.to_string(), name.to_string());
        self
    }

    pub fn build(self) -> LayoutInterpreter {
        LayoutInterpreter {
            config: self.config,
            standard_icons: self.standard_icons,
        }
    }
}
