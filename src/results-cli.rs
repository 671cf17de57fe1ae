//! A simple CLI tool for printing the results of a nomination commission.
//! It reads the JSON returned by `GET /commissions/<commission_id>/results`
//! using the server's own result types.

use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use nomination_backend::model::{
    api::results::{CommissionResults, MemberCount, RoleTally},
    common::CommissionStatus,
};

const PROGRAM_NAME: &str = "results-cli";

const ABOUT_TEXT: &str = "Print the results of a nomination commission.

EXIT CODES:
     0: Report printed.
     1: The results could not be read.";

const RESULTS_PATH: &str = "RESULTS_PATH";

const RESULTS_PATH_HELP: &str = "The path to a JSON dump of a commission's results,\n\
as returned by `GET /commissions/<commission_id>/results`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME).about(ABOUT_TEXT).arg(
        Arg::new(RESULTS_PATH)
            .help(RESULTS_PATH_HELP)
            .action(ArgAction::Set)
            .required(true),
    )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON dump.
    Format(String),
}

fn plural(count: u32, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn heading(results: &CommissionResults) -> String {
    let state = match (results.status, results.finalized_at) {
        (CommissionStatus::Finalized, Some(at)) => {
            format!("finalized {}", at.format("%Y-%m-%d %H:%M UTC"))
        }
        (CommissionStatus::Finalized, None) => "finalized".to_string(),
        (CommissionStatus::Open, _) => "open, results may still change".to_string(),
        (CommissionStatus::Draft, _) => "not yet open".to_string(),
    };
    format!("{} ({}), {state}", results.commission_name, results.year)
}

fn role_lines(position: usize, tally: &RoleTally) -> Vec<String> {
    let mut lines = vec![format!(
        "{position}. {} ({})",
        tally.role_name,
        plural(tally.ballots, "ballot")
    )];
    lines.extend(
        tally
            .votes
            .iter()
            .map(|MemberCount { name, count, .. }| format!("   {name}: {}", plural(*count, "vote"))),
    );
    lines
}

/// Lay out the report, one line per entry.
fn report(results: &CommissionResults) -> Vec<String> {
    let mut lines = vec![
        heading(results),
        format!(
            "{} received",
            plural(results.submissions as u32, "submission")
        ),
    ];
    if results.roles.is_empty() {
        lines.push(String::new());
        lines.push("No ballots have been cast.".to_string());
    }
    for (position, tally) in results.roles.iter().enumerate() {
        lines.push(String::new());
        lines.extend(role_lines(position + 1, tally));
    }
    lines
}

/// Load the results dump.
fn load(path: &str) -> Result<CommissionResults, Error> {
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))
}

/// Print the report and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let Some(path) = args.get_one::<String>(RESULTS_PATH) else {
        println!("No results path given");
        return 1;
    };
    match load(path) {
        Ok(results) => {
            for line in report(&results) {
                println!("{line}");
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {msg}");
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {msg}");
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalized_report() {
        let results = load("example_dumps/results.json").unwrap();
        let expected = [
            "Nominating Committee (2025), finalized 2025-11-02 18:30 UTC",
            "3 submissions received",
            "",
            "1. Elders (3 ballots)",
            "   Maria Silva: 3 votes",
            "   Ana Souza: 1 vote",
            "",
            "2. Treasurer (1 ballot)",
            "   Rita Lopes: 1 vote",
        ];
        assert_eq!(report(&results), expected);
    }

    #[test]
    fn open_report_without_ballots() {
        let results = load("example_dumps/open.json").unwrap();
        let expected = [
            "Youth Committee (2026), open, results may still change",
            "0 submissions received",
            "",
            "No ballots have been cast.",
        ];
        assert_eq!(report(&results), expected);
    }

    #[test]
    fn unreadable_input() {
        assert!(matches!(load("example_dumps/missing.json"), Err(Error::IO(_))));
        assert!(matches!(load("Cargo.toml"), Err(Error::Format(_))));

        let args = cli().get_matches_from([PROGRAM_NAME, "example_dumps/missing.json"]);
        assert_eq!(run(&args), 1);
        let args = cli().get_matches_from([PROGRAM_NAME, "example_dumps/results.json"]);
        assert_eq!(run(&args), 0);
    }
}
