//! `tradedesk rfq` - raise requests for quote and review the outbox

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use miette::Result;

use crate::cli::helpers::truncate_str;
use crate::cli::output::effective_format;
use crate::cli::table::{print_list, TextTable};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::outbox::{self, OutboxSink};
use crate::core::{Config, RfqSink, RfqWizard, Transition, WizardStep};
use crate::entities::rfq::{CATEGORIES, INCOTERMS};
use crate::entities::{RfqField, RfqFields};

/// Accepted delivery date format
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Subcommand, Debug)]
pub enum RfqCommands {
    /// Raise a new RFQ
    New(NewArgs),

    /// List submitted RFQs
    List,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    #[arg(long)]
    pub product: Option<String>,

    /// Commodity category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Quantity in metric tons
    #[arg(long)]
    pub quantity: Option<String>,

    /// Target price in USD per metric ton
    #[arg(long)]
    pub target_price: Option<String>,

    /// Origin country
    #[arg(long)]
    pub origin: Option<String>,

    /// Delivery port
    #[arg(long)]
    pub port: Option<String>,

    /// Delivery date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Quality specification
    #[arg(long)]
    pub quality: Option<String>,

    /// Incoterms (e.g. FOB, CIF)
    #[arg(long)]
    pub incoterms: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Interactive mode (prompt for each step)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

impl NewArgs {
    fn preset(&self) -> Vec<(RfqField, &str)> {
        [
            (RfqField::ProductName, &self.product),
            (RfqField::Category, &self.category),
            (RfqField::Quantity, &self.quantity),
            (RfqField::TargetPrice, &self.target_price),
            (RfqField::Origin, &self.origin),
            (RfqField::DeliveryPort, &self.port),
            (RfqField::DeliveryDate, &self.date),
            (RfqField::Quality, &self.quality),
            (RfqField::Incoterms, &self.incoterms),
            (RfqField::Notes, &self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

pub fn run(cmd: RfqCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        RfqCommands::New(args) => run_new(args, global, config),
        RfqCommands::List => run_list(global, config),
    }
}

/// Empty, or a calendar date
fn validate_date(value: &str) -> std::result::Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| format!("Invalid delivery date '{}': use YYYY-MM-DD", value))
}

/// Empty, or a positive number
fn validate_number(field: RfqField, value: &str) -> std::result::Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match value.replace(',', "").parse::<f64>() {
        Ok(n) if n > 0.0 => Ok(()),
        _ => Err(format!("{} must be a positive number", field.label())),
    }
}

fn validate_field(field: RfqField, value: &str) -> std::result::Result<(), String> {
    match field {
        RfqField::DeliveryDate => validate_date(value),
        RfqField::Quantity | RfqField::TargetPrice => validate_number(field, value),
        _ => Ok(()),
    }
}

/// Drive the wizard from preset values only
///
/// Walks every step with `next()`; the first blocked step or a failed submit
/// becomes the error.
pub fn submit_preset<S: RfqSink>(
    preset: &[(RfqField, &str)],
    sink: &mut S,
) -> std::result::Result<(String, RfqFields), String> {
    let mut wizard = RfqWizard::new();
    wizard.open();
    for (field, value) in preset {
        validate_field(*field, value)?;
        wizard.set_field(*field, *value);
    }

    loop {
        match wizard.next(sink) {
            Transition::Advanced(_) => continue,
            Transition::Submitted { reference, fields } => return Ok((reference, fields)),
            Transition::Blocked { .. } | Transition::SubmitFailed { .. } => {
                return Err(wizard
                    .message()
                    .unwrap_or("RFQ could not be submitted")
                    .to_string())
            }
            other => return Err(format!("Unexpected wizard state: {:?}", other)),
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let mut sink = OutboxSink::new(config.outbox_dir(), config.author());

    let submitted = if args.interactive {
        run_wizard(&args, &mut sink)?
    } else {
        let preset = args.preset();
        Some(submit_preset(&preset, &mut sink).map_err(|msg| {
            miette::miette!(
                help = "Pass --product, --category, --quantity and --port, or use --interactive",
                "{}",
                msg
            )
        })?)
    };

    let Some((reference, fields)) = submitted else {
        if !global.quiet {
            println!("{}", style("RFQ cancelled").yellow());
        }
        return Ok(());
    };

    match global.output {
        OutputFormat::Id => println!("{}", reference),
        _ if global.quiet => {}
        _ => {
            println!(
                "{} Submitted {} for {}",
                style("✓").green(),
                style(&reference).cyan(),
                style(&fields.product_name).yellow()
            );
            println!(
                "   {}",
                style(sink.path_for(&reference).display()).dim()
            );
        }
    }
    Ok(())
}

/// Prompt for one field, preferring a menu where the values are known
fn prompt_field(
    theme: &ColorfulTheme,
    field: RfqField,
    current: &str,
    required: bool,
) -> Result<String> {
    let choices: Option<&[&str]> = match field {
        RfqField::Category => Some(CATEGORIES),
        RfqField::Incoterms => Some(INCOTERMS),
        _ => None,
    };

    if let Some(choices) = choices {
        let default = choices.iter().position(|c| *c == current).unwrap_or(0);
        let selection = Select::with_theme(theme)
            .with_prompt(field.label())
            .items(choices)
            .default(default)
            .interact()
            .map_err(|e| miette::miette!("Prompt failed: {}", e))?;
        return Ok(choices[selection].to_string());
    }

    let label = if required {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    };
    Input::<String>::with_theme(theme)
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(!required)
        .validate_with(|input: &String| validate_field(field, input))
        .interact_text()
        .map_err(|e| miette::miette!("Prompt failed: {}", e))
}

/// Step through the wizard with prompts; `None` when cancelled
fn run_wizard(args: &NewArgs, sink: &mut OutboxSink) -> Result<Option<(String, RfqFields)>> {
    let theme = ColorfulTheme::default();
    let mut wizard = RfqWizard::new();
    wizard.open();
    for (field, value) in args.preset() {
        wizard.set_field(field, value);
    }

    println!("{}", style("New Request for Quote").bold());

    loop {
        let step = wizard.step();
        println!();
        println!("{}", style(step).cyan());
        if let Some(message) = wizard.message() {
            println!("{}", style(message).red());
        }

        for field in step.fields() {
            let value = prompt_field(
                &theme,
                *field,
                wizard.fields().get(*field),
                step.is_required(*field),
            )?;
            wizard.set_field(*field, value);
        }

        let forward = if step == WizardStep::Delivery { "Submit" } else { "Next" };
        let actions: &[&str] = if step == WizardStep::Basics {
            &[forward, "Cancel"]
        } else {
            &[forward, "Back", "Cancel"]
        };
        let choice = Select::with_theme(&theme)
            .items(actions)
            .default(0)
            .interact()
            .map_err(|e| miette::miette!("Prompt failed: {}", e))?;

        match actions[choice] {
            "Cancel" => {
                wizard.cancel();
                return Ok(None);
            }
            "Back" => {
                wizard.back();
            }
            _ => match wizard.next(sink) {
                Transition::Submitted { reference, fields } => {
                    return Ok(Some((reference, fields)))
                }
                Transition::SubmitFailed { message } => {
                    println!("{}", style(message).red());
                }
                _ => {}
            },
        }
    }
}

fn run_list(global: &GlobalOpts, config: &Config) -> Result<()> {
    let docs = outbox::list(&config.outbox_dir());
    let format = effective_format(global.output, true);

    if docs.is_empty() && matches!(format, OutputFormat::Table) {
        println!("No RFQs found.");
        return Ok(());
    }

    let mut text = TextTable::new([
        "ID", "Submitted", "Product", "Quantity (MT)", "Port", "Incoterms", "Author",
    ]);
    for doc in &docs {
        text.push([
            doc.id.clone(),
            doc.submitted.format("%Y-%m-%d %H:%M").to_string(),
            truncate_str(&doc.fields.product_name, 30),
            doc.fields.quantity.clone(),
            doc.fields.delivery_port.clone(),
            doc.fields.incoterms.clone(),
            doc.author.clone(),
        ]);
    }
    let ids: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
    print_list(format, &docs, &ids, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SubmitError;

    #[test]
    fn test_validate_fields() {
        assert!(validate_field(RfqField::DeliveryDate, "2026-11-30").is_ok());
        assert!(validate_field(RfqField::DeliveryDate, "").is_ok());
        assert!(validate_field(RfqField::DeliveryDate, "30/11/2026").is_err());
        assert!(validate_field(RfqField::Quantity, "1,500").is_ok());
        assert!(validate_field(RfqField::Quantity, "-3").is_err());
        assert!(validate_field(RfqField::Notes, "anything").is_ok());
    }

    #[test]
    fn test_submit_preset_reports_missing_fields() {
        let mut sink = |_: &RfqFields| Ok::<_, SubmitError>("RFQ-X".to_string());
        let err = submit_preset(&[(RfqField::ProductName, "Wheat")], &mut sink).unwrap_err();
        assert!(err.contains("Category"));
        assert!(err.contains("Quantity"));
    }

    #[test]
    fn test_submit_preset_stops_at_pricing_step() {
        let mut sink = |_: &RfqFields| Ok::<_, SubmitError>("RFQ-X".to_string());
        let preset = [
            (RfqField::ProductName, "Wheat"),
            (RfqField::Category, "Grains"),
            (RfqField::Quantity, "500"),
        ];
        let err = submit_preset(&preset, &mut sink).unwrap_err();
        assert!(err.contains("Delivery port"));
    }

    #[test]
    fn test_submit_preset_success() {
        let mut sink = |fields: &RfqFields| Ok::<_, SubmitError>(format!("RFQ-{}", fields.delivery_port));
        let preset = [
            (RfqField::ProductName, "Wheat"),
            (RfqField::Category, "Grains"),
            (RfqField::Quantity, "500"),
            (RfqField::DeliveryPort, "Santos"),
        ];
        let (reference, fields) = submit_preset(&preset, &mut sink).unwrap();
        assert_eq!(reference, "RFQ-Santos");
        assert_eq!(fields.quantity, "500");
    }
}
