//! `copy <src> <dst>`: barebones `cp` for files and directory trees.

use std::path::PathBuf;
use std::process::ExitCode;

use axiomkit_copy::{CopyError, EnumCopyOutcome, ReportCopy, SpecCopyOptions, copy};
use clap::Parser;

const C_USAGE: &str = "usage: copy <src-operand> <dst-operand>\n  where operand can be either a file or a directory";

#[derive(Debug, Parser)]
#[command(
    name = "copy",
    about = "Copy a file or a directory tree",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Source and destination operands.
    #[arg(value_name = "OPERAND", num_args = 0.., allow_hyphen_values = true)]
    operands: Vec<PathBuf>,
}

fn main() -> ExitCode {
    axiomkit_log::init_logging("error");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            tracing::debug!(error = %e, "argument parsing failed");
            println!("{C_USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let [path_src, path_dst, ..] = cli.operands.as_slice() else {
        println!("{C_USAGE}");
        return ExitCode::FAILURE;
    };

    let outcome = report_result(copy(path_src, path_dst, &SpecCopyOptions::default()));
    ExitCode::from(outcome.exit_code() as u8)
}

/// Print one `copy: <reason>.` line per failure and return the run outcome.
fn report_result(res_copy: Result<ReportCopy, CopyError>) -> EnumCopyOutcome {
    match res_copy {
        Ok(report_cp) => {
            tracing::info!("{report_cp}");
            for spec_error in &report_cp.errors {
                println!("copy: {}.", spec_error.exception);
            }
            report_cp.outcome()
        }
        Err(e) => {
            tracing::debug!(error = ?e, "copy failed");
            println!("copy: {e}.");
            e.outcome()
        }
    }
}
