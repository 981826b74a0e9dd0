use std::path::PathBuf;

use super::{parse_args, CliCommand};

#[test]
fn parse_args_defaults_to_summary() {
    assert_eq!(parse_args(Vec::<String>::new()), Ok(CliCommand::Summary));
    assert_eq!(parse_args(["summary"]), Ok(CliCommand::Summary));
}

#[test]
fn parse_args_export_target_is_optional() {
    assert_eq!(parse_args(["export"]), Ok(CliCommand::Export(None)));
    assert_eq!(
        parse_args(["export", "backup.json"]),
        Ok(CliCommand::Export(Some(PathBuf::from("backup.json"))))
    );
}

#[test]
fn parse_args_import_requires_file() {
    assert!(parse_args(["import"]).is_err());
    assert_eq!(
        parse_args(["import", "backup.json"]),
        Ok(CliCommand::Import(PathBuf::from("backup.json")))
    );
}

#[test]
fn parse_args_rejects_unknown_and_extra_arguments() {
    assert!(parse_args(["frobnicate"]).is_err());
    assert!(parse_args(["add-dashboard", "extra"]).is_err());
    assert_eq!(parse_args(["--help"]), Ok(CliCommand::Help));
}
