use crate::cli::{Commands, ReportCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Report { command } => match command {
            ReportCommand::Create { json, .. }
            | ReportCommand::List { json }
            | ReportCommand::Show { json, .. }
            | ReportCommand::Delete { json, .. } => {
                if *json {
                    OutputMode::Json
                } else {
                    OutputMode::Text
                }
            }
        },
    }
}
