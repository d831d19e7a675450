//! Validate command - detected rules, cell issues and quality score.

use std::path::PathBuf;

use colored::Colorize;
use gridlab::{Gridlab, GridlabConfig};

use super::{score_label, truncate};

pub fn run(
    config: GridlabConfig,
    file: PathBuf,
    max_issues: usize,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let gridlab = Gridlab::with_config(config);
    let (data, _source) = gridlab.load(&file)?;
    let report = gridlab.validate(&data);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {}",
            "Validation of".cyan().bold(),
            file.display().to_string().white()
        );
        println!();

        let header = format!("  {:<20} {:<10} {:>7}", "Column", "Rule", "Issues");
        println!("{}", header.bold());
        for (column, rule) in &report.rules {
            let issues = report.issues_for(column).count();
            let issues_text = format!("{:>7}", issues);
            let issues_text = if issues == 0 {
                issues_text.green()
            } else {
                issues_text.red()
            };
            let mut line = format!(
                "  {:<20} {:<10} {}",
                truncate(column, 20),
                rule.kind.to_string(),
                issues_text
            );
            if !rule.allowed_values.is_empty() {
                let allowed = truncate(&rule.allowed_values.join(", "), 40);
                line.push_str(&format!("  {}", allowed.dimmed()));
            }
            println!("{}", line);
        }
        println!();

        if !report.issues.is_empty() && max_issues > 0 {
            println!("{}", "Issues:".yellow().bold());
            for issue in report.issues.iter().take(max_issues) {
                println!(
                    "  row {:>5}  {:<20} {} expected {}",
                    issue.row + 1,
                    truncate(&issue.column, 20),
                    format!("{:<24}", format!("'{}'", truncate(&issue.value.to_string(), 22))).red(),
                    issue.expected
                );
            }
            if report.issues.len() > max_issues {
                println!(
                    "  {} more not shown (use --issues N)",
                    report.issues.len() - max_issues
                );
            }
            println!();
        }

        println!(
            "Records: {} total, {} with issues",
            report.total_records, report.records_with_issues
        );
        println!(
            "Completeness {:.1}% ({} missing), accuracy {:.1}% ({} invalid)",
            report.completeness,
            report.total_missing_values,
            report.accuracy,
            report.total_invalid_values
        );
        println!(
            "Quality score: {} {}",
            score_label(report.quality_score),
            if report.passed {
                "PASSED".green().bold()
            } else {
                "FAILED".red().bold()
            }
        );
    }

    if strict && !report.passed {
        return Err(format!(
            "validation failed: completeness {:.1}%, accuracy {:.1}%",
            report.completeness, report.accuracy
        )
        .into());
    }

    Ok(())
}
