//! Console reporter with colored output

use super::FileReport;
use crate::analyzer::engine::AggregateStats;
use crate::{Category, QualityFlag, Severity};
use colored::{ColoredString, Colorize};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, report: &FileReport) {
        print!("{}", self.render(report));
    }

    /// Report multiple results with summary
    pub fn report_many(&self, reports: &[FileReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (one line per file)
    pub fn report_quiet(&self, report: &FileReport) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render_quiet(&self, report: &FileReport) -> String {
        let n = report.result.quality_flags.len();
        let flags = format!("{} flag{}", n, if n == 1 { "" } else { "s" });
        let flags = match report.result.max_severity() {
            None => self.paint(flags, |s| s.green()),
            Some(sev) => self.paint(flags, |s| severity_color(s, sev)),
        };
        format!(
            "{}: {} ({})",
            report.path.display(),
            self.colorize_category(report.result.category),
            flags
        )
    }

    /// Full multi-line report for one file
    pub fn render(&self, report: &FileReport) -> String {
        let result = &report.result;
        let mut out = String::from("\n");

        line(
            &mut out,
            self.paint(format!("📄 Data Module Analysis: {}", report.path.display()), |s| s.bold()),
        );
        line(
            &mut out,
            format!("   Category: {}", self.colorize_category(result.category)),
        );
        line(
            &mut out,
            format!("   DM code:  {}", result.metadata.dm_code.as_deref().unwrap_or("-")),
        );
        line(
            &mut out,
            format!("   Title:    {}", result.metadata.dm_title.as_deref().unwrap_or("-")),
        );
        out.push('\n');

        line(&mut out, format!("   {}", self.paint("Counts:".to_string(), |s| s.bold())));
        for (label, n) in [
            ("proceduralStep", result.counts.steps),
            ("warning", result.counts.warnings),
            ("caution", result.counts.cautions),
            ("note", result.counts.notes),
        ] {
            line(&mut out, format!("   {:>6}  {}", n, label));
        }
        out.push('\n');

        if result.quality_flags.is_empty() {
            line(
                &mut out,
                format!("   {} No quality flags", self.paint("✓".to_string(), |s| s.green())),
            );
        } else {
            line(
                &mut out,
                format!("   {}", self.paint("Quality Flags:".to_string(), |s| s.bold())),
            );
            for flag in &result.quality_flags {
                line(&mut out, self.render_flag(flag));
            }
        }
        out.push('\n');
        out
    }

    fn render_flag(&self, flag: &QualityFlag) -> String {
        let icon = match flag.severity {
            Severity::Error => "✗",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        };
        let icon = self.paint(icon.to_string(), |s| severity_color(s, flag.severity));
        if self.verbose {
            format!(
                "   {} [{} / {}] {}",
                icon,
                self.paint(flag.rule.to_string(), |s| s.dimmed()),
                flag.severity,
                flag.message
            )
        } else {
            format!("   {} {}", icon, flag.message)
        }
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let rule = "═".repeat(60);
        let mut out = String::from("\n");
        line(&mut out, &rule);
        line(&mut out, self.paint("Summary".to_string(), |s| s.bold()));
        line(&mut out, &rule);
        line(&mut out, format!("   Files analyzed: {}", stats.files_analyzed));
        line(&mut out, format!("   Total steps:    {}", stats.total_steps));
        line(&mut out, format!("   Total flags:    {}", stats.total_flags));
        for (category, n) in stats.by_category.iter().filter(|(_, n)| *n > 0) {
            line(&mut out, format!("   {:<12}    {}", category.as_str(), n));
        }
        out.push('\n');
        out
    }

    fn colorize_category(&self, category: Category) -> String {
        self.paint(category.to_string(), |s| match category {
            Category::Procedure => s.cyan().bold(),
            Category::Parts => s.magenta().bold(),
            Category::Fault => s.yellow().bold(),
            Category::Description => s.blue().bold(),
            Category::Unknown => s.dimmed(),
        })
    }

    fn paint(&self, text: String, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(&text).to_string()
        } else {
            text
        }
    }
}

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

fn severity_color(s: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => s.red(),
        Severity::Warning => s.yellow(),
        Severity::Info => s.blue(),
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
