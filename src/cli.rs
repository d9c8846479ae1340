use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::handlers::commands::unescape_value;
use crate::prompt::Field;

#[derive(Debug, Parser)]
#[command(name = "avatar-prompt-studio")]
#[command(about = "Compose Kling 2.6 avatar video prompts from a structured form")]
pub struct Cli {
    /// YAML file with starting field values.
    #[arg(long, value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Avatar image to load before anything else runs.
    #[arg(long, value_name = "FILE")]
    pub avatar: Option<PathBuf>,

    /// Media type to declare for --avatar instead of sniffing it.
    #[arg(long, value_name = "MIME", requires = "avatar")]
    pub avatar_type: Option<String>,

    /// Field assignment applied after the seed, e.g. --set tone=urgent.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<Assignment>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Line-oriented editing session (default).
    Interactive,
    /// Print the composed prompt once.
    Compose {
        /// Also copy the prompt to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Print the current record as YAML.
    Record {
        /// Print JSON instead of YAML.
        #[arg(long)]
        json: bool,
    },
    /// List fields, defaults and options.
    Fields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: Field,
    pub value: String,
}

pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = Field::parse(name).map_err(|err| err.to_string())?;
    Ok(Assignment {
        field,
        value: unescape_value(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("narrative=a=b\\nc"),
            Ok(Assignment {
                field: Field::Narrative,
                value: "a=b\nc".to_string()
            })
        );
        assert!(parse_assignment("narrative").is_err());
        assert!(parse_assignment("mood=happy").is_err());
    }

    #[test]
    fn flags_and_subcommand_parse() {
        let cli = Cli::try_parse_from([
            "avatar-prompt-studio",
            "--set",
            "tone=urgent",
            "--set",
            "avatar_name=Kai",
            "compose",
            "--copy",
        ])
        .unwrap();
        assert_eq!(cli.assignments.len(), 2);
        assert_eq!(cli.command, Some(Commands::Compose { copy: true }));

        let cli = Cli::try_parse_from(["avatar-prompt-studio"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(Cli::try_parse_from(["avatar-prompt-studio", "--avatar-type", "image/png"]).is_err());
    }
}
