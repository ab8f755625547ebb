use colored::Colorize;

use vesaire::utils::{display_path, format_size};
use vesaire::{AggregateResult, AnalysisReport, CleanupCategory, ProgressEvent};

pub fn print_banner() {
    println!(
        "{}",
        format!("vesaire - disk cleaner v{}", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_progress(event: &ProgressEvent) {
    println!(
        "  {} {}",
        format!("[{:>3}%]", event.percent).dimmed(),
        event.message
    );
}

pub fn print_summary_header() {
    println!();
    println!("{}", "=== Summary ===".bold().white());
}

pub fn print_summary(result: &AggregateResult, dry_run: bool) {
    print_summary_header();
    for row in result.categories() {
        let size = format_size(row.freed_bytes);
        if row.category == CleanupCategory::RecycleBin {
            let note = if row.incomplete {
                "[not emptied]".red()
            } else {
                "[not measured]".dimmed()
            };
            println!("  {:<30} {}  {}", row.category.label(), size.green(), note);
        } else {
            println!(
                "  {:<30} {}  {}",
                row.category.label(),
                size.green(),
                format!("({} files)", row.item_count).dimmed()
            );
        }
    }
    print_separator();
    let label = if dry_run { "Total reclaimable:" } else { "Total freed:" };
    println!(
        "  {:<30} {}  {}",
        label.bold(),
        format_size(result.total_freed_bytes()).green().bold(),
        format!("({} files)", result.total_item_count()).dimmed()
    );
    println!();
}

pub fn print_analysis(report: &AnalysisReport) {
    println!();
    println!("{}", "=== Junk locations ===".bold().white());
    for entry in &report.entries {
        println!(
            "  {:<16} {:>12}  {:>8} files  {}",
            entry.label,
            format_size(entry.size_bytes).yellow(),
            entry.item_count,
            display_path(&entry.source_path).dimmed()
        );
    }
    println!();
    println!("{}", "=== Volumes ===".bold().white());
    for volume in &report.volumes {
        println!(
            "  {:<24} {:>12} used / {:>12} total  {:>5.1}%  {}",
            volume.mount_point.display(),
            format_size(volume.used_bytes),
            format_size(volume.total_bytes),
            volume.percent_used,
            volume.device.dimmed()
        );
    }
    println!();
}

pub fn print_separator() {
    println!("  {}", "─".repeat(45).dimmed());
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Run `vesaire clean --confirm` to delete."
            .yellow()
            .bold()
    );
}

pub fn print_clean_complete(freed: &str) {
    println!(
        "{} {}",
        "Cleaned!".green().bold(),
        format!("{freed} freed.").green()
    );
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run scan."
            .yellow()
            .bold()
    );
    println!();
}
