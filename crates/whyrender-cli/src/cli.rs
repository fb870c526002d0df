use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "whyrender",
    about = "Explain which props changed between two renders",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (overrides the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Label prefixed to every report line
    #[arg(long, global = true)]
    pub tag: Option<String>,

    /// Component name shown in the report
    #[arg(long, global = true)]
    pub name: Option<String>,

    #[arg(long, global = true)]
    pub no_color: bool,

    /// TOML report configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Exit with status 1 when any prop changed
    #[arg(long, global = true)]
    pub exit_code: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two JSON files, each holding one props object
    Compare(CompareArgs),
    /// Compare the previous and next props of a scenario file
    Scenario(ScenarioArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub previous: PathBuf,
    pub next: PathBuf,
}

#[derive(Args)]
pub struct ScenarioArgs {
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compare() {
        let cli = Cli::try_parse_from(["whyrender", "compare", "a.json", "b.json"]).unwrap();
        if let Command::Compare(args) = cli.command {
            assert_eq!(args.previous, PathBuf::from("a.json"));
            assert_eq!(args.next, PathBuf::from("b.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_compare_requires_two_files() {
        assert!(Cli::try_parse_from(["whyrender", "compare", "a.json"]).is_err());
    }

    #[test]
    fn parse_scenario() {
        let cli = Cli::try_parse_from(["whyrender", "scenario", "s.json"]).unwrap();
        assert!(matches!(cli.command, Command::Scenario(_)));
    }

    #[test]
    fn parse_labels() {
        let cli = Cli::try_parse_from([
            "whyrender", "--tag", "[perf]", "--name", "Grid", "scenario", "s.json",
        ])
        .unwrap();
        assert_eq!(cli.tag, Some("[perf]".into()));
        assert_eq!(cli.name, Some("Grid".into()));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["whyrender", "--format", "json", "scenario", "s.json"]).unwrap();
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "whyrender", "compare", "a.json", "b.json", "--no-color", "--exit-code", "-v",
        ])
        .unwrap();
        assert!(cli.no_color);
        assert!(cli.exit_code);
        assert!(cli.verbose);
    }
}
