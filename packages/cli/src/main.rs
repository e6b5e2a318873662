#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the incident map.
//!
//! Loads the static dataset and exposes the classification, filtering, and
//! session layers without a browser: print the category legend, filter
//! incidents, inspect a single incident's info window, or run a session and
//! dump the map commands it would send to the widget.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use incident_map_classify::{Classifier, KeywordTiers};
use incident_map_dataset::{DEFAULT_DATASET_PATH, DatasetSummary, load_incidents};
use incident_map_filter::{FilterPredicates, filter_incidents};
use incident_map_session::{
    DateControl, Event, MapConfig, Session, Taxonomy, ViewState, incident_info,
};

#[derive(Parser)]
#[command(name = "incident_map", about = "Police incident map tools")]
struct Cli {
    /// Path to the incident dataset JSON file.
    #[arg(long, global = true, default_value = DEFAULT_DATASET_PATH)]
    data: PathBuf,

    /// Path to a keyword tiers TOML file replacing the built-in one.
    #[arg(long, global = true)]
    tiers: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category legend in severity order
    Categories {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print dataset statistics
    Summary,
    /// Filter incidents by date range and category
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print only the number of matching incidents
        #[arg(long)]
        count: bool,
    },
    /// Run a map session and print the resulting map commands as JSON lines
    Render {
        /// Map configuration TOML file
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the info window content for one incident
    Inspect {
        /// Case number of the incident
        case_number: String,
    },
}

/// Filter controls, mirroring the date inputs and category checkboxes.
#[derive(Args)]
struct FilterArgs {
    /// Earliest incident date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    from: Option<String>,

    /// Latest incident date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    to: Option<String>,

    /// Earliest report date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    report_from: Option<String>,

    /// Latest report date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    report_to: Option<String>,

    /// Category to include (repeatable; none means all)
    #[arg(long = "category")]
    categories: Vec<String>,
}

impl FilterArgs {
    fn predicates(&self) -> FilterPredicates {
        let mut predicates = FilterPredicates::new().with_categories(&self.categories);
        if let Some(from) = &self.from {
            predicates = predicates.with_incident_start(from);
        }
        if let Some(to) = &self.to {
            predicates = predicates.with_incident_end(to);
        }
        if let Some(from) = &self.report_from {
            predicates = predicates.with_report_start(from);
        }
        if let Some(to) = &self.report_to {
            predicates = predicates.with_report_end(to);
        }
        predicates
    }

    fn events(&self) -> Vec<Event> {
        let dates = [
            (DateControl::IncidentStart, &self.from),
            (DateControl::IncidentEnd, &self.to),
            (DateControl::ReportStart, &self.report_from),
            (DateControl::ReportEnd, &self.report_to),
        ];

        dates
            .into_iter()
            .filter_map(|(control, value)| {
                value.as_ref().map(|value| Event::DateInput {
                    control,
                    value: value.clone(),
                })
            })
            .chain(self.categories.iter().map(|label| Event::CategoryToggled {
                label: label.clone(),
                checked: true,
            }))
            .collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let classifier = load_classifier(cli.tiers.as_deref())?;
    let incidents = load_incidents(&cli.data)?;

    match cli.command {
        Commands::Categories { json } => {
            let taxonomy = Taxonomy::build(&incidents, &classifier);

            if json {
                println!("{}", serde_json::to_string_pretty(&taxonomy.legend)?);
            } else {
                for entry in &taxonomy.legend {
                    println!(
                        "{:<14} {}  {:>6}  {}",
                        entry.severity.label(),
                        entry.color,
                        entry.count,
                        entry.category
                    );
                }
            }
        }
        Commands::Summary => {
            let summary = DatasetSummary::from_incidents(&incidents);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Filter { filters, count } => {
            let matched = filter_incidents(&incidents, &filters.predicates());
            log::info!("{} of {} incidents match", matched.len(), incidents.len());

            if count {
                println!("{}", matched.len());
            } else {
                println!("{}", serde_json::to_string_pretty(&matched)?);
            }
        }
        Commands::Render { config, filters } => {
            let config = MapConfig::load(config.as_deref())?;
            let mut session = Session::new(config, classifier);
            if let ViewState::Unavailable { message } = session.view() {
                return Err(message.clone().into());
            }

            session.dispatch(Event::DatasetLoaded(incidents));
            for event in filters.events() {
                session.dispatch(event);
            }

            for command in session.render() {
                println!("{}", serde_json::to_string(&command)?);
            }
        }
        Commands::Inspect { case_number } => {
            let Some(incident) = incidents
                .iter()
                .find(|incident| incident.case_number == case_number)
            else {
                return Err(format!("No incident with case number {case_number:?}").into());
            };

            let taxonomy = Taxonomy::build(&incidents, &classifier);
            let content = incident_info(incident, taxonomy.colors.incident_color(incident));
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
    }

    Ok(())
}

fn load_classifier(path: Option<&Path>) -> Result<Classifier, Box<dyn std::error::Error>> {
    let tiers = match path {
        Some(path) => KeywordTiers::from_path(path)?,
        None => KeywordTiers::builtin(),
    };
    Ok(Classifier::new(&tiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("incident_map").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn filter_args_build_predicates() {
        let cli = parse(&[
            "filter",
            "--from",
            "2025-02-01",
            "--category",
            "Theft",
            "--category",
            "Assault",
        ]);
        let Commands::Filter { filters, count } = cli.command else {
            panic!("expected filter command");
        };
        assert!(!count);

        let predicates = filters.predicates();
        assert!(predicates.incident_dates.is_active());
        assert!(!predicates.report_dates.is_active());
        assert_eq!(predicates.categories.len(), 2);
    }

    #[test]
    fn filter_args_become_session_events() {
        let cli = parse(&["render", "--report-to", "2025-03-01", "--category", "Theft"]);
        let Commands::Render { filters, config } = cli.command else {
            panic!("expected render command");
        };
        assert!(config.is_none());
        assert_eq!(filters.events().len(), 2);
    }

    #[test]
    fn global_flags_default() {
        let cli = parse(&["summary"]);
        assert_eq!(cli.data, PathBuf::from(DEFAULT_DATASET_PATH));
        assert!(cli.tiers.is_none());
    }
}
