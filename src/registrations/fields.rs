//! Built-in field types

use crate::model::{FieldType, FieldWidth};
use crate::registry::{CustomizationInput, FieldTypeDefBuilder, FieldTypeRegistry};
use anyhow::Result;

fn widths() -> CustomizationInput {
    CustomizationInput::Select {
        options: ["25%", "33%", "50%", "66%", "75%", "100%"]
            .iter()
            .map(|w| w.to_string())
            .collect(),
    }
}

/// Knobs every field type shares
fn common(field_type: FieldType) -> FieldTypeDefBuilder {
    FieldTypeDefBuilder::new(field_type)
        .customize("label", "Label", CustomizationInput::Text)
        .customize("helperText", "Helper text", CustomizationInput::Textarea)
        .customize("width", "Width", widths())
        .customize("required", "Required", CustomizationInput::Toggle)
}

fn with_placeholder(builder: FieldTypeDefBuilder) -> FieldTypeDefBuilder {
    builder.customize("placeholder", "Placeholder", CustomizationInput::Text)
}

fn with_options(builder: FieldTypeDefBuilder) -> FieldTypeDefBuilder {
    builder
        .customize("options", "Options", CustomizationInput::OptionsList)
        .default_options(&[("Option 1", "option-1"), ("Option 2", "option-2")])
}

/// Register all built-in field types
pub fn register(registry: &FieldTypeRegistry) -> Result<()> {
    // Basic
    registry.register(
        with_placeholder(common(FieldType::Text))
            .display_name("Short Text")
            .description("Single line of text")
            .category("basic")
            .icon("text")
            .tags(&["input", "string", "name"])
            .default_label("Text")
            .rules(&["required", "minLength", "maxLength", "exactLength", "pattern"])
            .build()?,
    );

    registry.register(
        with_placeholder(common(FieldType::Textarea))
            .display_name("Long Text")
            .description("Multi-line text such as comments or descriptions")
            .category("basic")
            .icon("align-left")
            .tags(&["paragraph", "multiline", "comment"])
            .default_label("Comments")
            .rules(&["required", "minLength", "maxLength", "pattern"])
            .build()?,
    );

    registry.register(
        with_placeholder(common(FieldType::Email))
            .display_name("Email")
            .description("Email address with format check")
            .category("basic")
            .icon("mail")
            .tags(&["contact", "address"])
            .default_label("Email")
            .default_placeholder("name@example.com")
            .rules(&["required", "email", "minLength", "maxLength", "pattern"])
            .build()?,
    );

    registry.register(
        with_placeholder(common(FieldType::Number))
            .display_name("Number")
            .description("Numeric value with optional bounds")
            .category("basic")
            .icon("hash")
            .tags(&["integer", "decimal", "amount", "quantity"])
            .default_label("Number")
            .default_width(FieldWidth::Half)
            .customize("step", "Step", CustomizationInput::Number)
            .rules(&["required", "min", "max", "integer"])
            .build()?,
    );

    registry.register(
        with_placeholder(common(FieldType::Phone))
            .display_name("Phone")
            .description("Telephone number")
            .category("basic")
            .icon("phone")
            .tags(&["contact", "mobile", "telephone"])
            .default_label("Phone")
            .default_width(FieldWidth::Half)
            .rules(&["required", "phone", "pattern"])
            .build()?,
    );

    registry.register(
        with_placeholder(common(FieldType::Url))
            .display_name("Website")
            .description("Web address starting with http or https")
            .category("basic")
            .icon("link")
            .tags(&["url", "link", "homepage"])
            .default_label("Website")
            .default_placeholder("https://")
            .rules(&["required", "url", "pattern"])
            .build()?,
    );

    // Choice
    registry.register(
        with_options(common(FieldType::Dropdown))
            .display_name("Dropdown")
            .description("Select from a list of options")
            .category("choice")
            .icon("chevron-down")
            .tags(&["select", "list", "picker"])
            .default_label("Choose one")
            .multi_select(false)
            .customize("allowMultiSelect", "Allow multiple", CustomizationInput::Toggle)
            .rules(&["required", "minSelected", "maxSelected"])
            .build()?,
    );

    registry.register(
        with_options(common(FieldType::Radio))
            .display_name("Radio Group")
            .description("Pick exactly one of a few options")
            .category("choice")
            .icon("circle-dot")
            .tags(&["single choice", "option"])
            .default_label("Choose one")
            .rules(&["required"])
            .build()?,
    );

    registry.register(
        with_options(common(FieldType::Checkbox))
            .display_name("Checkboxes")
            .description("Tick any number of options")
            .category("choice")
            .icon("check-square")
            .tags(&["multiple choice", "tick", "consent"])
            .default_label("Select all that apply")
            .rules(&["required", "minSelected", "maxSelected"])
            .build()?,
    );

    // Date & time
    registry.register(
        common(FieldType::Date)
            .display_name("Date")
            .description("Calendar date")
            .category("datetime")
            .icon("calendar")
            .tags(&["day", "birthday", "deadline"])
            .default_label("Date")
            .default_width(FieldWidth::Half)
            .rules(&["required", "minDate", "maxDate", "futureDate", "pastDate"])
            .build()?,
    );

    registry.register(
        common(FieldType::Datetime)
            .display_name("Date & Time")
            .description("Calendar date with time of day")
            .category("datetime")
            .icon("calendar-clock")
            .tags(&["timestamp", "appointment"])
            .default_label("Date and time")
            .rules(&["required", "minDate", "maxDate", "futureDate", "pastDate"])
            .build()?,
    );

    registry.register(
        common(FieldType::Time)
            .display_name("Time")
            .description("Time of day")
            .category("datetime")
            .icon("clock")
            .tags(&["hour", "minute"])
            .default_label("Time")
            .default_width(FieldWidth::Quarter)
            .rules(&["required"])
            .build()?,
    );

    // Advanced
    registry.register(
        common(FieldType::File)
            .display_name("File Upload")
            .description("Attach one or more files")
            .category("advanced")
            .icon("paperclip")
            .tags(&["attachment", "document", "image", "upload"])
            .default_label("Attachments")
            .customize("accept", "Accepted types", CustomizationInput::Text)
            .rules(&["required", "fileTypes", "maxFileSize", "maxFiles"])
            .build()?,
    );

    log::info!("Registered {} field types", registry.count());
    Ok(())
}
