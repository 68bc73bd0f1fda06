//! Human-readable table output
//!
//! Renders the update report as an aligned table with colored markers and
//! version cells, the grouped error sentences, and the follow-up command
//! hints. Alignment uses plain cell widths; color escapes are appended to
//! already-padded text so they never skew the columns.

use crate::domain::DependencyType;
use crate::update::{UpdateReport, UpdateRow};
use colored::Colorize;
use std::io::Write;

/// Display configuration carried over from the CLI
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Manifest was rewritten in this run
    pub update: bool,
    /// Latest column was requested
    pub latest: bool,
    /// Prerelease inclusion was requested
    pub prerelease: bool,
    /// Package name filters as given on the command line
    pub filters: Vec<String>,
    /// Manifest path for the hint lines
    pub manifest: String,
}

/// One-character colored section marker
fn marker(dep_type: DependencyType) -> String {
    let ch = dep_type.marker().to_string();
    match dep_type {
        DependencyType::Dependencies => ch,
        DependencyType::DevDependencies => ch.yellow().to_string(),
        DependencyType::PeerDependencies => ch.magenta().to_string(),
        DependencyType::OptionalDependencies => ch.cyan().to_string(),
    }
}

fn spaces(n: usize) -> String {
    " ".repeat(n)
}

fn red_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| name.red().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the whole report to `writer`.
pub fn render_report(
    report: &UpdateReport,
    options: &RenderOptions,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    let errors = &report.errors;

    if !errors.is_empty() {
        writeln!(writer)?;
    }
    if !errors.invalid.is_empty() {
        let tail = if errors.invalid.len() == 1 {
            "has an invalid semver range, and is skipped."
        } else {
            "have invalid semver ranges, and are skipped."
        };
        writeln!(writer, "Package {} {}", red_names(&errors.invalid), tail)?;
    }
    if !errors.complex.is_empty() {
        let tail = if errors.complex.len() == 1 {
            "has a composed range, and is left for manual review."
        } else {
            "have composed ranges, and are left for manual review."
        };
        writeln!(writer, "Package {} {}", red_names(&errors.complex), tail)?;
    }
    if !errors.network.is_empty() {
        let verb = if errors.network.len() == 1 { "is" } else { "are" };
        writeln!(
            writer,
            "Package {} {} not checked due to connection error to the registry.",
            red_names(&errors.network),
            verb
        )?;
    }

    if report.rows.is_empty() {
        if errors.is_empty() {
            writeln!(
                writer,
                "\nAll dependencies are up to date! {}",
                ":3".green()
            )?;
        }
        return Ok(());
    }

    // Headers impose a minimum on their own columns.
    let mut widths = report.widths;
    widths.name = widths.name.max("name".len());
    if widths.newer > 0 {
        widths.newer = widths.newer.max("newer".len());
    }
    if widths.latest > 0 {
        widths.latest = widths.latest.max("latest".len());
    }

    let show_type = report
        .rows
        .iter()
        .any(|row| row.dep_type != DependencyType::Dependencies);

    let mut header = format!("\n {}ame{}  ", "n".cyan(), spaces(widths.name - 4));
    if show_type {
        header.push_str("   ");
    }
    header.push_str(&spaces(widths.current + 5));
    if widths.newer > 0 {
        header.push_str(&format!("{}{}ewer  ", spaces(widths.newer - 5), "n".green()));
    }
    if widths.latest > 0 {
        header.push_str(&format!(
            "{}{}atest",
            spaces(widths.latest - 6),
            "l".magenta()
        ));
    }
    writeln!(writer, "{}", header)?;

    for row in &report.rows {
        writeln!(writer, "{}", render_row(row, &widths, show_type))?;
    }

    render_hints(report, options, writer)
}

fn render_row(row: &UpdateRow, widths: &crate::update::ColumnWidths, show_type: bool) -> String {
    let mut line = format!(" {}{}  ", row.name, spaces(widths.name - row.name.len()));
    if show_type {
        line.push_str(&format!("{}  ", marker(row.dep_type)));
    }
    line.push_str(&format!(
        "{}{}  →  ",
        spaces(widths.current - row.current.len()),
        row.current
    ));

    if widths.newer > 0 {
        match &row.newer {
            Some(cell) => line.push_str(&format!(
                "{}{}  ",
                spaces(widths.newer - cell.plain.len()),
                cell.colored
            )),
            None if row.latest.is_some() => line.push_str(&spaces(widths.newer + 2)),
            None => {}
        }
    }
    if widths.latest > 0 {
        if let Some(cell) = &row.latest {
            line.push_str(&format!(
                "{}{}",
                spaces(widths.latest - cell.plain.len()),
                cell.colored
            ));
        }
    }

    line.trim_end().to_string()
}

fn render_hints(
    report: &UpdateReport,
    options: &RenderOptions,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    if options.update {
        let which = if options.latest {
            format!("{}atest", "l".magenta())
        } else {
            format!("{}ewer", "n".green())
        };
        return writeln!(
            writer,
            "\nRun {} to install the {} versions.",
            "npm install".cyan(),
            which
        );
    }

    writeln!(writer)?;

    let filters = if options.filters.is_empty() {
        String::new()
    } else {
        format!(" {}", options.filters.join(" ").cyan())
    };
    let pre = if options.prerelease {
        format!(" {}", "--pre".yellow())
    } else {
        String::new()
    };

    if report.has_newer() {
        writeln!(
            writer,
            "Run {}{}{} to update {} to {}ewer versions.",
            "npmup -u".cyan(),
            filters,
            pre,
            options.manifest.green(),
            "n".green()
        )?;
    }
    if report.has_latest() {
        writeln!(
            writer,
            "Run {}{}{}{} to update {} to {}atest versions.",
            "npmup -u".cyan(),
            "l".magenta(),
            filters,
            pre,
            options.manifest.green(),
            "l".magenta()
        )?;
    }

    Ok(())
}
