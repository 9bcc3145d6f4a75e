use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command as ProcessCommand, ExitCode, Output};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format, fix, test and check the workspace
    Tidy,
    /// Cross-compile libsurfacelink.so for an Android ABI
    Android {
        /// Rust target triple of the ABI
        #[arg(long, default_value = "aarch64-linux-android")]
        target: String,
        #[arg(long)]
        release: bool,
    },
}

fn cargo(args: &[&str]) -> Result<Output, String> {
    ProcessCommand::new("cargo")
        .args(args)
        .output()
        .map_err(|e| format!("Failed to run cargo {}: {e}", args.join(" ")))
}

fn cargo_status(args: &[&str]) -> Result<bool, String> {
    ProcessCommand::new("cargo")
        .args(args)
        .status()
        .map(|status| status.success())
        .map_err(|e| format!("Failed to run cargo {}: {e}", args.join(" ")))
}

/// Pulls the failed count out of a `test result: FAILED. 3 passed; 1 failed; ...` line.
fn failed_test_count(output: &str) -> usize {
    output
        .lines()
        .filter(|line| line.contains("test result: FAILED."))
        .filter_map(|line| {
            line.split(';')
                .find(|part| part.trim().ends_with("failed"))
                .and_then(|part| part.split_whitespace().next())
                .and_then(|num| num.parse::<usize>().ok())
        })
        .sum()
}

fn tidy() -> Result<ExitCode, String> {
    if !cargo_status(&["fmt", "--all"])? {
        println!("\n{}", "❌ Formatting failed".bold().red());
        return Ok(ExitCode::FAILURE);
    }

    if !cargo_status(&["fix", "--allow-dirty", "--all-features", "--workspace"])? {
        println!("\n{}", "❌ Cargo fix failed".bold().red());
        return Ok(ExitCode::FAILURE);
    }

    let test_output = cargo(&["test", "--workspace"])?;
    if !test_output.status.success() {
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&test_output.stdout),
            String::from_utf8_lossy(&test_output.stderr)
        );
        let message = format!("× {} tests failed", failed_test_count(&combined));
        return Ok(print_result(&message, false));
    }

    let check_output = cargo(&["check", "--workspace", "--message-format=json"])?;
    let warning_count = String::from_utf8_lossy(&check_output.stdout)
        .lines()
        .filter(|line| line.contains("\"level\":\"warning\""))
        .count();

    if warning_count > 0 {
        Ok(print_result(&format!("× Found {warning_count} issues"), false))
    } else {
        Ok(print_result("✓ Success!", true))
    }
}

fn android(target: &str, release: bool) -> Result<ExitCode, String> {
    let mut args = vec!["build", "-p", "surfacelink-android", "--target", target];
    if release {
        args.push("--release");
    }

    println!("{} {}", "Building libsurfacelink.so for".cyan(), target.bold());
    if cargo_status(&args)? {
        Ok(print_result("✓ Built!", true))
    } else {
        Ok(print_result("× Build failed", false))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = match args.command {
        Command::Tidy => tidy(),
        Command::Android { target, release } => android(&target, release),
    };

    result.unwrap_or_else(|e| {
        println!("\n{}", e.bold().red());
        ExitCode::FAILURE
    })
}

fn print_result(message: &str, success: bool) -> ExitCode {
    const TOTAL_WIDTH: usize = 50;
    const BOX_WIDTH: usize = 24;

    println!("\n{}", "=".repeat(TOTAL_WIDTH).cyan());

    let border = "─".repeat(BOX_WIDTH);
    let message_width = message.chars().count();
    let left = BOX_WIDTH.saturating_sub(message_width) / 2;
    let right = BOX_WIDTH.saturating_sub(message_width + left);
    let indent = " ".repeat((TOTAL_WIDTH - BOX_WIDTH) / 2);

    let rendered = [
        format!("{indent}┌{border}┐"),
        format!("{indent}│{}{message}{}│", " ".repeat(left), " ".repeat(right)),
        format!("{indent}└{border}┘"),
    ]
    .join("\n");

    if success {
        println!("\n{}\n", rendered.bold().green());
        ExitCode::SUCCESS
    } else {
        println!("\n{}\n", rendered.bold().red());
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_test_count() {
        let output = "running 4 tests\n\
            test result: FAILED. 3 passed; 1 failed; 0 ignored\n\
            test result: ok. 2 passed; 0 failed; 0 ignored\n\
            test result: FAILED. 0 passed; 2 failed; 0 ignored\n";
        assert_eq!(failed_test_count(output), 3);
    }

    #[test]
    fn test_no_failures() {
        assert_eq!(failed_test_count("test result: ok. 5 passed; 0 failed"), 0);
    }
}
