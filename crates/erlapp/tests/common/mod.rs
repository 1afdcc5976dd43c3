#![allow(dead_code)]

use std::collections::BTreeMap;

use erlapp::api::{Action, WidgetApi};
use erlapp::commands::save::EditSubmission;
use erlapp::config::WidgetSettings;
use erlapp::editor::StructuralEditor;
use erlapp::model::{AddItemRequest, LayoutConfig, LayoutDefinition};
use erlapp::store::memory::{InMemoryEntityStore, StaticLayoutRegistry};
use serde_json::json;

pub type Api = WidgetApi<InMemoryEntityStore, StaticLayoutRegistry>;

fn definition(id: &str, label: &str, regions: &[&str], has_config_form: bool) -> LayoutDefinition {
    let mut default_config = LayoutConfig::new();
    if has_config_form {
        default_config.insert("gutter".into(), json!("medium"));
    }
    LayoutDefinition {
        id: id.into(),
        label: label.into(),
        regions: regions.iter().map(|r| r.to_string()).collect(),
        has_config_form,
        default_config,
    }
}

/// `layout_a` (left, right), `layout_b` (main) and `layout_c` (first, second, third).
pub fn registry() -> StaticLayoutRegistry {
    StaticLayoutRegistry::new([
        definition("layout_a", "Layout A", &["left", "right"], true),
        definition("layout_b", "Layout B", &["main"], false),
        definition("layout_c", "Layout C", &["first", "second", "third"], false),
    ])
}

pub fn settings() -> WidgetSettings {
    let labels: BTreeMap<String, String> = [
        ("section", "Section"),
        ("text", "Text"),
        ("quote", "Quote"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    WidgetSettings {
        target_bundles: vec!["section".into(), "text".into(), "quote".into()],
        layout_bundles: vec!["section".into()],
        bundle_labels: Some(labels),
        ..Default::default()
    }
}

pub fn api() -> Api {
    WidgetApi::new("field_page", InMemoryEntityStore::new(), registry(), settings())
}

/// Posts the widget form as the client currently sees it.
pub fn post(api: &mut Api, trigger: Action) {
    let editor = StructuralEditor::attach(&api.refresh());
    api.submit(editor.submission(Some(trigger))).unwrap();
}

pub fn post_from(api: &mut Api, editor: &StructuralEditor, trigger: Action) {
    api.submit(editor.submission(Some(trigger))).unwrap();
}

pub fn add(request: AddItemRequest) -> Action {
    Action::Add(request)
}

pub fn save(delta: usize, layout: Option<&str>) -> Action {
    Action::Save {
        delta,
        submission: EditSubmission {
            layout: layout.map(str::to_string),
            ..Default::default()
        },
    }
}

/// Adds and saves a section with `layout`, after the last section.
pub fn add_section(api: &mut Api, layout: &str) {
    let editor = StructuralEditor::attach(&api.refresh());
    let last = editor.arrangement().layouts.last().map(|l| l.key);
    post(api, add(editor.request_add_section("section", last)));
    let delta = api.session().editing().unwrap();
    post(api, save(delta, Some(layout)));
}

/// Delta of the section at `ordinal`.
pub fn layout_key(api: &Api, ordinal: usize) -> usize {
    api.session().layout_deltas()[ordinal]
}

/// Delta of the item whose `body` field is `body`.
pub fn delta_of(api: &Api, body: &str) -> usize {
    api.session()
        .items()
        .iter()
        .position(|i| {
            i.entity
                .as_ref()
                .is_some_and(|e| e.fields.get("body") == Some(&json!(body)))
        })
        .unwrap()
}

/// Adds and saves a text item into `region` of the section at `ordinal`.
pub fn add_text(api: &mut Api, ordinal: usize, region: &str, body: &str) -> usize {
    let layout = layout_key(api, ordinal);
    let editor = StructuralEditor::attach(&api.refresh());
    let request = editor.request_add_item("text", layout, region).unwrap();
    post(api, add(request));
    let delta = api.session().editing().unwrap();
    let mut submission = EditSubmission::default();
    submission.fields.insert("body".into(), json!(body));
    post(api, Action::Save { delta, submission });
    delta_of(api, body)
}

/// Bodies of the text items, grouped per region, in document order.
pub fn outline(api: &Api) -> Vec<(String, Vec<String>)> {
    let view = api.refresh();
    let mut out = Vec::new();
    for (ordinal, section) in view.sections.iter().enumerate() {
        for region in &section.regions {
            out.push((
                format!("{}:{}", ordinal, region.name),
                region
                    .items
                    .iter()
                    .map(|i| body(&i.fields))
                    .collect(),
            ));
        }
    }
    out.push((
        "disabled".to_string(),
        view.disabled.items.iter().map(|i| body(&i.fields)).collect(),
    ));
    out
}

fn body(fields: &BTreeMap<String, serde_json::Value>) -> String {
    fields
        .get("body")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
