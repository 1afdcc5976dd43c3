//! Text output for widget views, stored values and messages.
//!
//! The `render_*` functions build strings so they can be tested without a
//! terminal; the `print_*` functions are what handlers call.

use super::styles;
use erlapp::commands::{CmdMessage, MessageLevel};
use erlapp::config::WidgetSettings;
use erlapp::persist::StoredValue;
use erlapp::view::{Dialog, ItemView, WidgetView};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;

const INDENT: &str = "  ";
const EMPTY_REGION: &str = "(empty)";
const NO_DISABLED: &str = "No items disabled.";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => styles::muted(),
            MessageLevel::Success => styles::success(),
            MessageLevel::Warning => styles::warning(),
            MessageLevel::Error => styles::error(),
        };
        println!("{}", style.apply_to(&message.content));
    }
}

fn render_fields(fields: &BTreeMap<String, Value>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_item(out: &mut String, item: &ItemView, depth: usize) {
    let indent = INDENT.repeat(depth);
    let delta = styles::delta().apply_to(format!("[{}]", item.delta));
    let mut line = format!("{}{} {}", indent, delta, item.label);
    let fields = render_fields(&item.fields);
    if !fields.is_empty() {
        line.push(' ');
        line.push_str(&fields);
    }
    if item.hidden {
        let _ = writeln!(out, "{} {}", line, styles::hidden().apply_to("(unsaved)"));
    } else {
        let _ = writeln!(out, "{}", line);
    }
}

pub(super) fn render_view(view: &WidgetView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", styles::heading().apply_to(&view.field_name));

    if view.sections.is_empty() {
        let _ = writeln!(out, "{}{}", INDENT, styles::muted().apply_to("No sections."));
    }
    for section in &view.sections {
        let delta = styles::delta().apply_to(format!("[{}]", section.item.delta));
        let layout = match (&section.layout_label, &section.layout) {
            (Some(label), Some(id)) => format!(": {} ({})", label, id),
            (None, Some(id)) => format!(": {}", id),
            _ => String::new(),
        };
        let hidden = if section.item.hidden { " (unsaved)" } else { "" };
        let _ = writeln!(
            out,
            "{}{} {}{}{}",
            INDENT,
            delta,
            section.item.label,
            layout,
            styles::hidden().apply_to(hidden)
        );
        for region in &section.regions {
            let _ = writeln!(
                out,
                "{}{}",
                INDENT.repeat(3),
                styles::region().apply_to(&region.name)
            );
            if region.items.is_empty() {
                let _ = writeln!(
                    out,
                    "{}{}",
                    INDENT.repeat(4),
                    styles::muted().apply_to(EMPTY_REGION)
                );
            }
            for item in &region.items {
                render_item(&mut out, item, 4);
            }
        }
    }

    let _ = writeln!(out, "{}{}", INDENT, styles::heading().apply_to("Disabled"));
    if view.disabled.description_visible {
        let _ = writeln!(out, "{}{}", INDENT.repeat(2), styles::muted().apply_to(NO_DISABLED));
    }
    for item in &view.disabled.items {
        render_item(&mut out, item, 2);
    }

    match &view.dialog {
        Some(Dialog::Edit(dialog)) => {
            let _ = writeln!(out, "{}", styles::heading().apply_to(&dialog.title));
            if let Some(select) = &dialog.layout_select {
                let options: Vec<String> = select
                    .options
                    .iter()
                    .map(|o| {
                        if select.selected.as_deref() == Some(o.id.as_str()) {
                            format!("(*) {}", o.label)
                        } else {
                            format!("( ) {}", o.label)
                        }
                    })
                    .collect();
                let _ = writeln!(out, "{}Layout: {}", INDENT, options.join("  "));
            }
            if let Some(form) = &dialog.config_form {
                let _ = writeln!(out, "{}{}", INDENT, form.title);
                for field in &form.fields {
                    let _ = writeln!(out, "{}{} = {}", INDENT.repeat(2), field.key, field.value);
                }
            }
        }
        Some(Dialog::ConfirmRemove(dialog)) => {
            let _ = writeln!(out, "{}", styles::heading().apply_to(&dialog.title));
            let _ = writeln!(out, "{}{}", INDENT, dialog.message);
        }
        None => {}
    }
    out
}

pub(super) fn render_stored(values: &[StoredValue]) -> String {
    let mut out = String::new();
    for (delta, value) in values.iter().enumerate() {
        let region = if value.region.is_empty() {
            "-"
        } else {
            value.region.as_str()
        };
        let layout = value.layout.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{} {} region={} layout={}",
            styles::delta().apply_to(format!("[{}]", delta)),
            value.target_id,
            region,
            layout
        );
    }
    out
}

pub(super) fn render_settings(settings: &WidgetSettings) -> String {
    let mut out = String::new();
    for line in settings.summary() {
        let _ = writeln!(out, "{}", line);
    }
    let items: Vec<String> = settings.item_bundles().into_iter().map(|b| b.label).collect();
    let sections: Vec<String> = settings
        .section_bundles()
        .into_iter()
        .map(|b| b.label)
        .collect();
    let _ = writeln!(out, "Item bundles: {}", list_or_none(&items));
    let _ = writeln!(out, "Section bundles: {}", list_or_none(&sections));
    match &settings.allowed_layouts {
        None => {
            let _ = writeln!(out, "Allowed layouts: any");
        }
        Some(_) => {
            let layouts: Vec<String> = settings
                .available_layouts()
                .into_iter()
                .map(|(id, _)| id)
                .collect();
            let _ = writeln!(out, "Allowed layouts: {}", list_or_none(&layouts));
        }
    }
    out
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
