use colored::Colorize;
use inquire::{Confirm, MultiSelect, Select, Text};
use std::str::FromStr;

use formgen::prelude::*;

/// Runs the guided template wizard.
pub fn run_wizard_mode() -> Result<Template, Box<dyn std::error::Error>> {
    println!("\n{}", "TEMPLATE WIZARD".bright_cyan().bold());
    println!("{}", "Describe an entity and its fields; the result is a ready-to-save template.".dimmed());
    println!("{}", "You can press Ctrl+C at any time to exit.".dimmed());
    println!();

    // Only the first character may be upper-case.
    let casing = |input: &str| -> Result<inquire::validator::Validation, inquire::CustomUserError> {
        if input.chars().skip(1).any(|c| c.is_ascii_uppercase()) {
            Ok(inquire::validator::Validation::Invalid(inquire::validator::ErrorMessage::Custom(
                "Only the first character may be upper-case".to_string(),
            )))
        } else if input.is_empty() {
            Ok(inquire::validator::Validation::Invalid(inquire::validator::ErrorMessage::Custom(
                "Name cannot be empty".to_string(),
            )))
        } else {
            Ok(inquire::validator::Validation::Valid)
        }
    };

    let template_name = Text::new("Template name:").with_placeholder("e.g. Blog Posts").prompt()?;
    let singular = Text::new("Entity name (singular):")
        .with_placeholder("e.g. Post")
        .with_validator(casing)
        .prompt()?;
    let plural = Text::new("Entity name (plural):")
        .with_default(&format!("{}s", singular))
        .with_validator(casing)
        .prompt()?;

    println!("\n{}", "--- Fields ---".bright_yellow());
    let tags: Vec<String> = TypeTag::all().iter().map(|t| t.to_string()).collect();
    let mut fields: Vec<(String, SchemaNode)> = Vec::new();

    loop {
        let name = Text::new("Field name (empty to finish):").prompt()?;
        if name.trim().is_empty() {
            break;
        }
        let tag = Select::new("Field type:", tags.clone()).prompt()?;
        let base = TypeTag::from_str(&tag)?;

        let mut raw = tag;
        if base.accepts_options() {
            let options = Text::new("Options (comma separated):").with_placeholder("e.g. Draft,Published").prompt()?;
            if !options.trim().is_empty() {
                raw = format!("{}#{}", raw, options.trim());
            }
        }
        if Confirm::new("Read-only?").with_default(false).prompt()? {
            raw = format!("{}#readonly", raw);
        }

        let field_type = FieldType::parse(&raw)?;
        fields.retain(|(existing, _)| existing != name.trim());
        fields.push((name.trim().to_string(), SchemaNode::Leaf(field_type)));
        println!("{}", format!("Added field '{}'.", name.trim()).green());
    }

    let use_generate_folder = Confirm::new("Scaffold into the generate folder instead of the dashboard?")
        .with_default(false)
        .prompt()?;

    let field_names: Vec<String> = fields.iter().map(|(name, _)| name.clone()).collect();
    let bulk_action = if field_names.is_empty() {
        Vec::new()
    } else {
        MultiSelect::new("Fields editable by bulk action:", field_names).prompt()?
    };

    Ok(build_template(
        template_name,
        &plural,
        &singular,
        fields,
        use_generate_folder,
        bulk_action,
    )?)
}

/// Assembles the wizard answers into a validated template.
fn build_template(
    template_name: String,
    plural: &str,
    singular: &str,
    fields: Vec<(String, SchemaNode)>,
    use_generate_folder: bool,
    bulk_action: Vec<String>,
) -> Result<Template, FormgenError> {
    let naming = NamingConvention::new(
        capitalize(plural),
        plural.to_lowercase(),
        capitalize(singular),
        singular.to_lowercase(),
    )
    .with_generate_folder(use_generate_folder)
    .with_bulk_action(bulk_action);

    let template = Template {
        uid: Some(PLACEHOLDER_UID.to_string()),
        template_name,
        schema: SchemaNode::Node(fields),
        naming_convention: naming,
    };
    template.validate()?;
    Ok(template)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
