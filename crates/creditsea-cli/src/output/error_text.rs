use creditsea_client::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "What to do next:".to_string(),
    ];

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    if let Some(help_command) = help_command(error) {
        lines.push(String::new());
        lines.push(format!("For upload guidance, run `{help_command}`."));
    }

    lines.join("\n")
}

fn help_command(error: &ClientError) -> Option<&str> {
    error
        .data
        .as_ref()
        .and_then(|data| data.get("help_command"))
        .and_then(Value::as_str)
}
