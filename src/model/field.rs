use super::action::ActionSet;
use super::default_visible;
use serde::{Deserialize, Serialize};
use serde_json::Value;

tagged_kind! {
    /// The closed set of field controls the interpreter knows how to render.
    pub enum ControlKind {
        TextInput => "pxTextInput",
        Dropdown => "pxDropdown",
        Checkbox => "pxCheckbox",
        TextArea => "pxTextArea",
        Email => "pxEmail",
        DateTime => "pxDateTime",
        Integer => "pxInteger",
        Phone => "pxPhone",
        DisplayText => "pxDisplayText",
        Hidden => "pxHidden",
        Button => "pxButton",
        Label => "label",
        Link => "pxLink",
        Icon => "pxIcon",
        RadioButtons => "pxRadioButtons",
        AutoComplete => "pxAutoComplete",
        Currency => "pxCurrency",
        /// Unnamed control used for subscripted display values.
        Subscript => "",
    }
    fallback Unsupported
}

tagged_kind! {
    /// Where a dropdown or autocomplete takes its options from.
    pub enum ListSource {
        DataPage => "datapage",
        Constant => "constant",
        LocalList => "locallist",
        Text => "Text",
    }
    fallback Other
}

tagged_kind! {
    pub enum IconSource {
        Standard => "standardicon",
        Image => "image",
        ExternalUrl => "exturl",
        Property => "property",
        StyleClass => "styleclass",
    }
    fallback Other
}

/// Leaf editable or display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Fully qualified property path; empty for unbound fields.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub reference: String,
    /// Value echoed by the server.
    #[serde(default)]
    pub value: Value,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub label: String,
    #[serde(default)]
    pub show_label: bool,
    #[serde(default)]
    pub label_reserve_space: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub validation_messages: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    /// Property data type, e.g. `Date Time`.
    #[serde(default, rename = "type", deserialize_with = "super::null_as_default")]
    pub data_type: String,
    #[serde(default)]
    pub control: Control,
}

impl Field {
    /// First configured mode, if any.
    pub fn mode(&self) -> Option<&Mode> {
        self.control.modes.first()
    }

    pub fn is_bound(&self) -> bool {
        !self.reference.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    #[serde(rename = "type")]
    pub kind: ControlKind,
    #[serde(default)]
    pub label: Value,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub action_sets: Vec<ActionSet>,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            kind: ControlKind::Unsupported("undefined".to_string()),
            label: Value::Null,
            modes: Vec::new(),
            action_sets: Vec::new(),
        }
    }
}

/// Mode-specific control configuration. Only the keys the interpreter reads are modelled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    #[serde(default)]
    pub options: Vec<ModeOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_source: Option<ListSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Value>,
    #[serde(default, rename = "dataPageID", skip_serializing_if = "Option::is_none")]
    pub data_page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_page_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_page_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_image_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_source: Option<IconSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_property: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeOption {
    pub key: String,
    #[serde(default)]
    pub value: String,
}
