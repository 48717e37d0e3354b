use clap::{Parser, Subcommand};

/// Extended help shown after `creditsea report create --help`.
pub const REPORT_CREATE_AFTER_HELP: &str = "\
How report upload works:
  CreditSea reads one XML credit report exported by a bureau, normalizes it,
  and stores the normalized record under your owner id.

  Accepted roots:
    <CreditReport>       nested Applicant / Accounts / Enquiries blocks
    <INProfileResponse>  flat Name / Account / Enquiry elements
  Any other root is read as-is; fields it does not carry fall back to defaults.

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat report.xml | creditsea report create --dry-run -
  Reports larger than 10 MiB are rejected.

What to do next:
  1. Run `creditsea report create --dry-run <path>` and review the summary.
  2. Run `creditsea report create <path>` to store it.
  3. Run `creditsea report list` to see stored reports.

Field defaults:
  name, mobilePhone, pan, bank, accountNumber, address   N/A
  account type, status                                    Unknown
  creditScore, balances, amounts                          0

Summary rules:
  Active accounts:   status contains `active` (any case) or equals `11`.
  Closed accounts:   status contains `closed`.
  Secured balance:   type contains auto loan, home loan, mortgage, or secured.
  Recent enquiries:  enquiry dates within the last 7 days, inclusive.
";

#[derive(Debug, Parser)]
#[command(
    name = "creditsea",
    version,
    about = "credit report normalizer",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Owner id that scopes stored reports
    #[arg(long, global = true, env = "CREDITSEA_OWNER")]
    pub owner: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload, inspect, and remove normalized credit reports
    #[command(arg_required_else_help = true)]
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReportCommand {
    /// Normalize an XML credit report and store the result
    #[command(after_long_help = REPORT_CREATE_AFTER_HELP)]
    Create {
        /// Normalize and print the record without storing it
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to an XML credit report (use `-` for stdin)
        path: Option<String>,
    },
    /// List stored reports, newest first
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show one stored report in full
    Show {
        /// The report ID to show (e.g. rpt_01J...)
        report_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Delete one stored report
    Delete {
        /// The report ID to delete (e.g. rpt_01J...)
        report_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{Commands, ReportCommand, parse_from};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 10] = [
            vec!["creditsea", "report", "create"],
            vec!["creditsea", "report", "create", "./report.xml"],
            vec!["creditsea", "report", "create", "--dry-run", "./report.xml"],
            vec!["creditsea", "report", "create", "-", "--json"],
            vec!["creditsea", "report", "list"],
            vec!["creditsea", "report", "list", "--json"],
            vec!["creditsea", "report", "show", "rpt_1"],
            vec!["creditsea", "report", "show", "rpt_1", "--json"],
            vec!["creditsea", "report", "delete", "rpt_1"],
            vec!["creditsea", "--owner", "user-1", "report", "list"],
        ];

        for args in cases {
            let parsed = parse_from(args.clone());
            assert!(parsed.is_ok(), "failed to parse {args:?}");
        }
    }

    #[test]
    fn parse_create_flags() {
        let parsed = parse_from(["creditsea", "report", "create", "--dry-run", "r.xml"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            match cli.command {
                Commands::Report {
                    command:
                        ReportCommand::Create {
                            dry_run,
                            json,
                            path,
                        },
                } => {
                    assert!(dry_run);
                    assert!(!json);
                    assert_eq!(path.as_deref(), Some("r.xml"));
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn owner_flag_is_accepted_after_subcommand() {
        let parsed = parse_from(["creditsea", "report", "list", "--owner", "user-9"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(cli.owner.as_deref(), Some("user-9"));
            assert!(matches!(
                cli.command,
                Commands::Report {
                    command: ReportCommand::List { json: false }
                }
            ));
        }
    }

    #[test]
    fn show_requires_report_id() {
        let parsed = parse_from(["creditsea", "report", "show"]);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn bare_report_shows_help() {
        let parsed = parse_from(["creditsea", "report"]);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(
                error.kind(),
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            );
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let parsed = parse_from(["creditsea", "bogus", "create"]);
        assert!(parsed.is_err());
    }
}
