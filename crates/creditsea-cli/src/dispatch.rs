use creditsea_client::commands;
use creditsea_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, ReportCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    let owner = cli.owner.clone();
    match &cli.command {
        Commands::Report { command } => match command {
            ReportCommand::Create {
                dry_run,
                json: _,
                path,
            } => commands::report::run(path.clone(), *dry_run, owner),
            ReportCommand::List { .. } => commands::report::list(owner),
            ReportCommand::Show { report_id, .. } => commands::report::show(report_id, owner),
            ReportCommand::Delete { report_id, .. } => commands::report::delete(report_id, owner),
        },
    }
}
