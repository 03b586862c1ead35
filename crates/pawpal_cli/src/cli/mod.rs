use clap::{Parser, Subcommand};
use pawpal_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "pawpal", author, version, about = "Plan feeding, walks, meds and vet visits for your pets", long_about = None)]
pub struct Cli {
    /// Command to run; without one an interactive session starts
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set the owner's details
    ///
    /// Example: pawpal owner Jordan --email jordan@example.com
    Owner {
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Manage pets
    Pet {
        #[command(subcommand)]
        pet: PetCommand,
    },
    /// Manage care tasks
    Task {
        #[command(subcommand)]
        task: TaskCommand,
    },
    /// Mark a task as completed, scheduling the next one if it recurs
    ///
    /// Example: pawpal done 1a2b3c4d
    Done { id: String },
    /// Mark a completed task as pending again
    ///
    /// Example: pawpal undo 1a2b3c4d
    Undo { id: String },
    /// List scheduled tasks
    ///
    /// Example: pawpal list time
    /// Example: pawpal list upcoming --days 3
    List {
        #[command(subcommand)]
        list: ListCommand,
    },
    /// Show tasks that share a clock time
    Conflicts,
    /// Load a sample household and print its schedule
    Demo,
}

#[derive(Subcommand, Debug)]
pub enum PetCommand {
    /// Add a pet
    ///
    /// Example: pawpal pet add Mochi dog --breed Shiba --born 2021-06-01
    Add {
        name: String,
        species: String,
        #[arg(long, default_value = "")]
        breed: String,
        /// Date of birth (YYYY-MM-DD); defaults to today
        #[arg(long, value_name = "YYYY-MM-DD")]
        born: Option<String>,
    },
    /// Remove every pet with this name
    Remove { name: String },
    /// List pets
    List,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task for a pet and put it on the schedule
    ///
    /// Example: pawpal task add Mochi "Morning walk" "2026-02-15 08:00" --priority high --every 1
    Add {
        pet: String,
        title: String,
        /// When the task happens (YYYY-MM-DD HH:MM)
        when: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "general")]
        category: String,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Repeat every N days once completed
        #[arg(long, value_name = "DAYS")]
        every: Option<u32>,
    },
    /// Remove a task from the schedule and from its pet
    Remove { id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    /// Earliest first
    Time,
    /// Highest priority first
    Priority,
    /// Overdue tasks first, each group by priority
    Due,
    /// Tasks dated today
    Today,
    /// Tasks dated from today through the next N days
    Upcoming {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Tasks listed on one pet, in the order they were added
    Pet { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    UpcomingDays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = match key_raw.split_once('.') {
        Some((field, rest)) => (field.trim(), Some(rest.trim())),
        None => (key_raw.trim(), None),
    };

    let canonical_field =
        canonicalize_flag_name(field).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match (canonical_field.as_str(), remainder) {
        ("theme", None) => ConfigOverrideTarget::Theme,
        ("theme", Some(_)) => return Err("theme override cannot have subfields".to_string()),
        ("upcoming_days", None) => ConfigOverrideTarget::UpcomingDays,
        ("upcoming_days", Some(_)) => {
            return Err("upcoming_days override cannot have subfields".to_string());
        }
        ("aliases" | "alias", rest) => {
            let alias_name = rest
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            ConfigOverrideTarget::Alias(alias_name.to_string())
        }
        (other, _) => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` value into one set of overrides; later
/// values win.
pub fn collect_config_overrides(raw_values: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for raw in raw_values {
        let parsed = parse_config_override(raw)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::UpcomingDays => {
                let days = parsed
                    .value
                    .parse::<u32>()
                    .map_err(|_| format!("upcoming_days must be a whole number, got '{}'", parsed.value))?;
                overrides.upcoming_days = Some(days);
            }
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let words: Vec<String> = name
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join("_"))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, Command, ConfigOverrideTarget, ListCommand, collect_config_overrides,
        parse_config_override,
    };
    use clap::Parser;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Noir ").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Noir");

        let parsed = parse_config_override("Upcoming-Days=3").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::UpcomingDays);
    }

    #[test]
    fn parse_config_override_trims_alias_names() {
        let parsed = parse_config_override("aliases. t = list time").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::Alias("t".into()));
        assert_eq!(parsed.value, "list time");
    }

    #[test]
    fn parse_config_override_rejects_bad_input() {
        assert!(parse_config_override("aliases. = foo").unwrap_err().contains("alias name"));
        assert!(parse_config_override("unknown.field=x").unwrap_err().contains("unknown config field"));
        assert!(parse_config_override("theme.sub=x").unwrap_err().contains("subfields"));
        assert!(parse_config_override("themenoir").unwrap_err().contains("KEY=VALUE"));
        assert!(parse_config_override("=x").unwrap_err().contains("empty"));
    }

    #[test]
    fn collect_config_overrides_merges_values() {
        let overrides = collect_config_overrides(&[
            "theme=noir".to_string(),
            "upcoming_days=10".to_string(),
            "alias.c=conflicts".to_string(),
        ])
        .unwrap();

        assert_eq!(overrides.theme.as_deref(), Some("noir"));
        assert_eq!(overrides.upcoming_days, Some(10));
        assert_eq!(overrides.aliases.get("c").map(String::as_str), Some("conflicts"));
    }

    #[test]
    fn collect_config_overrides_rejects_non_numeric_days() {
        let err = collect_config_overrides(&["upcoming_days=soon".to_string()]).unwrap_err();
        assert!(err.contains("whole number"));
    }

    #[test]
    fn cli_parses_list_upcoming_with_days() {
        let cli = Cli::try_parse_from(["pawpal", "--json", "list", "upcoming", "--days", "3"]).unwrap();

        assert!(cli.json);
        match cli.command {
            Some(Command::List { list }) => {
                assert_eq!(list, ListCommand::Upcoming { days: Some(3) })
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_without_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["pawpal"]).unwrap();
        assert!(cli.command.is_none());
    }
}
