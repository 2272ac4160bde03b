use super::node::{
    DataPageSource, FieldControl, FieldNode, IconGlyph, ImagePosition, LinkImage, OptionSource,
    RadioOption, RenderNode, Trigger, TriggerEvent,
};
use super::{LayoutInterpreter, RenderContext};
use crate::actions::{ActionResolver, resolve_text, value_to_text};
use crate::model::{ControlKind, Field, IconSource, ListSource, Mode};
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde_json::Value;

/// Wire format of `Date Time` display values, after `GMT` is rewritten to `+0000`.
const SERVER_DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.3f %z";

impl LayoutInterpreter {
    /// Renders a single field. Hidden and invisible fields render nothing.
    ///
    /// `show_label` is `false` for grid body cells, which rely on the header row instead.
    pub fn render_field(
        &self,
        field: &Field,
        ctx: &RenderContext<'_>,
        show_label: bool,
    ) -> Option<RenderNode> {
        if !field.visible || field.control.kind == ControlKind::Hidden {
            return None;
        }

        let current = ctx
            .values
            .get(&field.reference)
            .filter(|value| !value.is_null())
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        let text = value_to_text(&current);
        let label = field_label(field, show_label);
        let mode = field.mode();
        let read_only = field.read_only;

        let (control, event) = match &field.control.kind {
            ControlKind::Checkbox => {
                let checked = matches!(&current, Value::Bool(true))
                    || matches!(&current, Value::String(s) if s == "true");
                if read_only {
                    let shown = if checked { "yes" } else { "no" };
                    (read_only_text(shown), None)
                } else {
                    (FieldControl::Checkbox { checked }, Some(TriggerEvent::Change))
                }
            }
            ControlKind::RadioButtons => {
                let options = mode
                    .map(|mode| {
                        mode.options
                            .iter()
                            .map(|option| RadioOption {
                                key: option.key.clone(),
                                label: option.value.clone(),
                                checked: option.key == text,
                                disabled: field.disabled || read_only,
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                (FieldControl::RadioGroup { options }, None)
            }
            ControlKind::AutoComplete if read_only => (read_only_text(&text), None),
            ControlKind::AutoComplete => (
                FieldControl::AutoComplete {
                    value: text,
                    source: mode.map(data_page_source).unwrap_or_default(),
                },
                Some(TriggerEvent::Select),
            ),
            ControlKind::Dropdown if read_only => (read_only_text(&text), None),
            ControlKind::Dropdown => {
                let placeholder = mode
                    .and_then(|mode| mode.placeholder.as_ref())
                    .map(|placeholder| resolve_text(placeholder, ctx.values))
                    .or_else(|| label.clone());
                let source = match mode {
                    Some(mode) if mode.list_source == Some(ListSource::DataPage) => {
                        OptionSource::DataPage(data_page_source(mode))
                    }
                    _ => OptionSource::Local {
                        options: mode.map(|mode| mode.options.clone()).unwrap_or_default(),
                    },
                };
                (
                    FieldControl::Dropdown {
                        value: text,
                        placeholder,
                        source,
                    },
                    Some(TriggerEvent::Blur),
                )
            }
            ControlKind::Email
            | ControlKind::Phone
            | ControlKind::Integer
            | ControlKind::Currency
            | ControlKind::TextInput
                if read_only =>
            {
                (read_only_text(&text), None)
            }
            kind @ (ControlKind::Email
            | ControlKind::Phone
            | ControlKind::Integer
            | ControlKind::Currency
            | ControlKind::TextInput) => (
                FieldControl::TextInput {
                    value: text,
                    numeric: matches!(kind, ControlKind::Integer | ControlKind::Currency),
                    placeholder: label.clone(),
                },
                Some(TriggerEvent::Blur),
            ),
            ControlKind::TextArea if read_only => (read_only_text(&text), None),
            ControlKind::TextArea => (
                FieldControl::TextArea {
                    value: text,
                    placeholder: label.clone(),
                },
                Some(TriggerEvent::Blur),
            ),
            ControlKind::DisplayText => {
                let raw = value_to_text(&field.value);
                let shown = if field.data_type == "Date Time" {
                    time_ago(&raw, ctx.now).unwrap_or(raw)
                } else {
                    raw
                };
                (read_only_text(&shown), None)
            }
            ControlKind::DateTime if read_only => {
                let shown = NaiveDate::parse_from_str(&text, &self.config.date_format)
                    .map(|date| date.format(&self.config.display_date_format).to_string())
                    .unwrap_or(text);
                (read_only_text(&shown), None)
            }
            ControlKind::DateTime => (
                FieldControl::DatePicker {
                    date: NaiveDate::parse_from_str(&text, &self.config.date_format).ok(),
                },
                None,
            ),
            ControlKind::Button => (
                FieldControl::Button {
                    caption: resolve_text(&field.control.label, ctx.values),
                },
                Some(TriggerEvent::Click),
            ),
            ControlKind::Label => (
                FieldControl::Label {
                    text: label.clone().unwrap_or_default(),
                },
                None,
            ),
            ControlKind::Link => {
                let href = mode
                    .and_then(|mode| mode.link_data.as_ref())
                    .map(|data| resolve_text(data, ctx.values))
                    .unwrap_or_default();
                let image = mode.and_then(link_image);
                let event = href.is_empty().then_some(TriggerEvent::Click);
                (
                    FieldControl::Link {
                        text: resolve_text(&field.control.label, ctx.values),
                        href,
                        image,
                    },
                    event,
                )
            }
            ControlKind::Icon => (
                FieldControl::Icon {
                    glyph: self.icon_glyph(mode, ctx),
                },
                Some(TriggerEvent::Click),
            ),
            ControlKind::Subscript => (read_only_text(&text), None),
            ControlKind::Hidden => return None,
            ControlKind::Unsupported(kind) => {
                warn!(
                    "No control is defined for '{}' (field '{}')",
                    kind, field.reference
                );
                (FieldControl::Unsupported { kind: kind.clone() }, None)
            }
        };

        let trigger = event.and_then(|event| {
            let handler = ActionResolver::resolve(field);
            (!handler.is_inert()).then_some(Trigger { event, handler })
        });

        let label = match field.control.kind {
            ControlKind::Button | ControlKind::Link | ControlKind::Icon if !field.show_label => None,
            _ => label,
        };

        let node = RenderNode::Field(FieldNode {
            reference: field.reference.clone(),
            name: field.name.clone(),
            label,
            required: field.required,
            disabled: field.disabled || (read_only && field.control.kind == ControlKind::Button),
            read_only,
            control,
            trigger,
        });

        match error_message(field, &current, ctx) {
            Some(message) => Some(RenderNode::Annotated {
                message,
                child: Box::new(node),
            }),
            None => Some(node),
        }
    }

    fn icon_glyph(&self, mode: Option<&Mode>, ctx: &RenderContext<'_>) -> IconGlyph {
        let Some(mode) = mode else {
            return IconGlyph::Undefined;
        };
        match &mode.icon_source {
            Some(IconSource::Standard) => IconGlyph::Named {
                name: mode
                    .icon_standard
                    .as_deref()
                    .and_then(|standard| self.standard_icons.get(standard))
                    .cloned(),
            },
            Some(IconSource::Image) => IconGlyph::Image {
                file: mode.icon_image.clone().unwrap_or_default(),
            },
            Some(IconSource::ExternalUrl) => IconGlyph::Url {
                src: mode.icon_url.clone().unwrap_or_default(),
            },
            Some(IconSource::Property) => IconGlyph::Url {
                src: mode
                    .icon_property
                    .as_ref()
                    .map(|property| resolve_text(property, ctx.values))
                    .unwrap_or_default(),
            },
            Some(IconSource::StyleClass) => IconGlyph::StyleClass {
                class: translate_style_class(mode.icon_style.as_deref().unwrap_or_default()),
            },
            Some(IconSource::Other(_)) | None => IconGlyph::Undefined,
        }
    }
}

fn read_only_text(value: &str) -> FieldControl {
    FieldControl::ReadOnly {
        value: value.to_string(),
    }
}

fn field_label(field: &Field, show_label: bool) -> Option<String> {
    if !show_label {
        return None;
    }
    if field.label.is_empty() {
        field.label_reserve_space.then(|| " ".to_string())
    } else {
        Some(field.label.clone())
    }
}

/// A field is in error when the validation map names it, or when the server attached
/// a message and the value has not been edited since.
fn error_message(field: &Field, current: &Value, ctx: &RenderContext<'_>) -> Option<String> {
    if let Some(message) = ctx.errors.get(&field.reference) {
        return Some(message.to_string());
    }
    (!field.validation_messages.is_empty() && *current == field.value)
        .then(|| field.validation_messages.clone())
}

fn data_page_source(mode: &Mode) -> DataPageSource {
    DataPageSource {
        page_id: mode.data_page_id.clone().unwrap_or_default(),
        value_property: mode.data_page_value.clone().unwrap_or_default(),
        prompt_property: mode.data_page_prompt.clone().unwrap_or_default(),
    }
}

fn link_image(mode: &Mode) -> Option<LinkImage> {
    let file = mode.link_image.clone().filter(|file| !file.is_empty())?;
    let position = match mode.link_image_position.as_deref() {
        Some("left") => ImagePosition::Left,
        Some("right") => ImagePosition::Right,
        _ => ImagePosition::Hidden,
    };
    Some(LinkImage { file, position })
}

/// `pi pi-caret-left` becomes `caret_left`; other classes are kept as-is.
fn translate_style_class(style: &str) -> String {
    if style.contains("pi") {
        style.replace("pi pi-", "").replace('-', "_")
    } else {
        style.to_string()
    }
}

/// Renders a server timestamp (`20190315T101500.000 GMT`) relative to `now`.
pub(crate) fn time_ago(raw: &str, now: DateTime<Utc>) -> Option<String> {
    let normalized = raw.replace("GMT", "+0000");
    let then = DateTime::parse_from_str(&normalized, SERVER_DATE_TIME_FORMAT).ok()?;
    let seconds = now.signed_duration_since(then.with_timezone(&Utc)).num_seconds();
    let span = humanize(seconds.unsigned_abs());
    Some(if seconds >= 0 {
        format!("{} ago", span)
    } else {
        format!("in {}", span)
    })
}

fn humanize(seconds: u64) -> String {
    let round = |value: f64| value.round() as u64;
    let secs = seconds as f64;
    let minutes = round(secs / 60.0);
    let hours = round(secs / 3_600.0);
    let days = round(secs / 86_400.0);
    let months = round(secs / (86_400.0 * 30.436_875));
    let years = round(secs / (86_400.0 * 365.25));

    if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", months.max(2))
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", years.max(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 3, 18, 10, 15, 0).unwrap()
    }

    #[test]
    fn test_time_ago_in_days() {
        assert_eq!(
            time_ago("20190315T101500.000 GMT", now()).as_deref(),
            Some("3 days ago")
        );
    }

    #[test]
    fn test_time_ago_in_future() {
        assert_eq!(
            time_ago("20190318T121500.000 GMT", now()).as_deref(),
            Some("in 2 hours")
        );
    }

    #[test]
    fn test_time_ago_rejects_garbage() {
        assert_eq!(time_ago("yesterday", now()), None);
    }

    #[test]
    fn test_humanize_thresholds() {
        assert_eq!(humanize(10), "a few seconds");
        assert_eq!(humanize(60), "a minute");
        assert_eq!(humanize(30 * 60), "30 minutes");
        assert_eq!(humanize(60 * 60), "an hour");
        assert_eq!(humanize(24 * 3_600), "a day");
        assert_eq!(humanize(40 * 86_400), "a month");
        assert_eq!(humanize(400 * 86_400), "a year");
        assert_eq!(humanize(3 * 365 * 86_400), "3 years");
    }

    #[test]
    fn test_style_class_translation() {
        assert_eq!(translate_style_class("pi pi-caret-left"), "caret_left");
        assert_eq!(translate_style_class("icon-save"), "icon-save");
    }
}
