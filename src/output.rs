//! Shared output formatting for kanban CLI commands.

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "kanban.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Option::is_none")]
            hint: Option<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            hint,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Header, then `Summary:` key/value pairs, then plain detail lines.
pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    if !output.header.is_empty() {
        lines.push(output.header.clone());
    }

    if !output.summary.is_empty() {
        push_blank(&mut lines);
        lines.push("Summary:".to_string());
        for (key, value) in &output.summary {
            if value.is_empty() {
                lines.push(format!("- {key}"));
            } else {
                lines.push(format!("- {key}: {value}"));
            }
        }
    }

    if !output.details.is_empty() {
        push_blank(&mut lines);
        lines.extend(output.details.iter().cloned());
    }

    lines.join("\n")
}

fn push_blank(lines: &mut Vec<String>) {
    if !lines.is_empty() {
        lines.push(String::new());
    }
}

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

/// First positional argument, skipping global flags and the `--dir` value.
fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--dir" {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "kanban".to_string()
}

fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::TaskNotFound(_) => "task_not_found",
        Error::ListNotFound(_) => "list_not_found",
        Error::InvalidConfig(_) => "invalid_config",
        Error::InvalidArgument(_) => "invalid_argument",
        Error::LockFailed(_) => "lock_failed",
        _ => "operation_failed",
    }
}

fn error_hint(err: &Error) -> Option<String> {
    match err {
        Error::TaskNotFound(_) => Some("kanban show".to_string()),
        Error::ListNotFound(_) => Some("lists: list1 (To Do), list2 (In Progress), list3 (Done)".to_string()),
        Error::InvalidConfig(_) => Some("fix kanban.toml then retry".to_string()),
        Error::LockFailed(_) => Some("another kanban process holds the board; retry".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn infer_skips_flags_and_dir_value() {
        assert_eq!(infer_command_name(args(&["--json", "add", "x"])), "add");
        assert_eq!(
            infer_command_name(args(&["--dir", "/tmp/board", "mv", "id", "list3"])),
            "mv"
        );
        assert_eq!(infer_command_name(args(&["-q"])), "kanban");
    }

    #[test]
    fn format_human_sections() {
        let mut human = HumanOutput::new("Board");
        human.push_summary("total", "2");
        human.push_detail("To Do (1)");

        assert_eq!(
            format_human(&human),
            "Board\n\nSummary:\n- total: 2\n\nTo Do (1)"
        );
    }

    #[test]
    fn format_human_details_only() {
        let mut human = HumanOutput::new("");
        human.push_detail("created (2024-05-01 09:30:00)");
        assert_eq!(format_human(&human), "created (2024-05-01 09:30:00)");
    }

    #[test]
    fn error_kind_by_variant() {
        assert_eq!(error_kind(&Error::TaskNotFound("x".into())), "task_not_found");
        assert_eq!(
            error_kind(&Error::OperationFailed("disk".into())),
            "operation_failed"
        );
        assert!(error_hint(&Error::TaskNotFound("x".into())).is_some());
    }
}
