//! Output formatting for the CLI

use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use crate::OutputFormat;

/// Colour and border settings shared by every text printer
pub struct OutputStyle {
    /// Colour output; off when `NO_COLOR` is set
    pub use_color: bool,
    /// Rounded UTF-8 borders instead of ASCII
    pub use_unicode: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_color: std::env::var("NO_COLOR").is_err(),
            use_unicode: true,
        }
    }
}

impl OutputStyle {
    /// Style picked from the environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn colours off
    #[must_use]
    pub fn no_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

/// Green text for a completed change
pub fn format_success(text: &str, style: &OutputStyle) -> String {
    if style.use_color {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

/// Bold heading above a block of output
pub fn format_header(text: &str, style: &OutputStyle) -> String {
    if style.use_color {
        text.bold().bright_blue().to_string()
    } else {
        text.to_string()
    }
}

/// Table with the border preset for `style`
pub fn create_table(style: &OutputStyle) -> Table {
    let mut table = Table::new();

    if style.use_unicode {
        table
            .load_preset(presets::UTF8_FULL)
            .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(presets::ASCII_FULL);
    }

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table
}

/// Bold header cell, cyan when colours are on
pub fn header_cell(text: &str, style: &OutputStyle) -> Cell {
    let cell = Cell::new(text).add_attribute(Attribute::Bold);
    if style.use_color {
        cell.fg(Color::Cyan)
    } else {
        cell
    }
}

/// Plain left-aligned cell
pub fn regular_cell(text: &str) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Left)
}

/// Cell for a setting value; on/off toggles are coloured
pub fn value_cell(value: &Value, style: &OutputStyle) -> Cell {
    let text = display_value(value);
    let cell = Cell::new(&text);
    if !style.use_color {
        return cell;
    }
    match text.as_str() {
        "on" | "true" | "active" => cell.fg(Color::Green),
        "off" | "false" | "disabled" => cell.fg(Color::DarkGrey),
        "error" => cell.fg(Color::Red),
        "pending" | "pending-disabled" => cell.fg(Color::Yellow),
        _ => cell,
    }
}

/// Cell holding a failure message
pub fn error_cell(text: &str, style: &OutputStyle) -> Cell {
    let cell = Cell::new(text);
    if style.use_color { cell.fg(Color::Red) } else { cell }
}

/// Strings without quotes, everything else as compact JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Print `value` as JSON in the requested flavour
pub fn print_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> serde_json::Result<()> {
    let output = if format == OutputFormat::JsonPretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("on")), "on");
        assert_eq!(display_value(&json!(300)), "300");
        assert_eq!(display_value(&json!(null)), "-");
        assert_eq!(
            display_value(&json!({"css": "on"})),
            r#"{"css":"on"}"#
        );
    }

    #[test]
    fn test_plain_style() {
        let style = OutputStyle::new().no_color();
        assert_eq!(format_success("done", &style), "done");
        assert_eq!(format_header("Zone", &style), "Zone");
    }
}
