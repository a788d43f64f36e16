//! Output rendering and formatting

use crate::report::{CheckReport, OperationResult, ReplayReport};
use banker_safety::EvaluationTrace;
use banker_types::{ColorChoice, OutputFormat, SafetyResult};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Output format
    format: OutputFormat,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.render_json(result),
            OutputFormat::Plain => self.render_plain(result),
            OutputFormat::Tty => self.render_table(result),
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render as plain lines
    fn render_plain(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Check(reports) => {
                for report in reports {
                    match &report.result {
                        SafetyResult::Safe { order } => {
                            println!("{}: system is in a safe state", report.name);
                            println!("{}: completion order: {order:?}", report.name);
                        }
                        SafetyResult::Unsafe => {
                            println!("{}: system is not in a safe state", report.name);
                        }
                    }
                    if let Some(trace) = &report.trace {
                        for step in &trace.steps {
                            println!(
                                "{}: pass {} process {} need {} work {} -> {}",
                                report.name,
                                step.pass,
                                step.process,
                                step.need,
                                step.work_before,
                                step.work_after
                            );
                        }
                        if !trace.blocked.is_empty() {
                            println!("{}: blocked processes: {:?}", report.name, trace.blocked);
                        }
                    }
                }
            }
            OperationResult::Replay(report) => {
                println!(
                    "{}: order {:?} is valid, final work {}",
                    report.name, report.order, report.final_work
                );
            }
        }
        Ok(())
    }

    /// Render as formatted table
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Check(reports) => self.render_check_reports(reports),
            OperationResult::Replay(report) => self.render_replay_report(report),
        }
    }

    fn render_check_reports(&self, reports: &[CheckReport]) -> io::Result<()> {
        let mut table = self.new_table();

        table.set_header(vec![
            Cell::new("Snapshot").add_attribute(Attribute::Bold),
            Cell::new("Processes").add_attribute(Attribute::Bold),
            Cell::new("Resources").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
            Cell::new("Completion order").add_attribute(Attribute::Bold),
        ]);

        for report in reports {
            let order = report
                .result
                .order()
                .map_or_else(|| "-".to_string(), |order| format!("{order:?}"));

            table.add_row(vec![
                Cell::new(&report.name),
                Cell::new(report.processes),
                Cell::new(report.resources),
                self.format_verdict(&report.result),
                Cell::new(order),
            ]);
        }

        println!("{table}");

        for report in reports {
            if let Some(trace) = &report.trace {
                println!();
                println!("{}", self.style_name(&report.name));
                self.render_trace(trace);
            }
        }
        Ok(())
    }

    fn render_trace(&self, trace: &EvaluationTrace) {
        if trace.steps.is_empty() {
            println!("No process can finish with the available resources.");
        } else {
            let mut table = self.new_table();
            table.set_header(vec![
                Cell::new("Pass").add_attribute(Attribute::Bold),
                Cell::new("Process").add_attribute(Attribute::Bold),
                Cell::new("Need").add_attribute(Attribute::Bold),
                Cell::new("Work before").add_attribute(Attribute::Bold),
                Cell::new("Work after").add_attribute(Attribute::Bold),
            ]);
            for step in &trace.steps {
                table.add_row(vec![
                    Cell::new(step.pass),
                    Cell::new(step.process),
                    Cell::new(&step.need),
                    Cell::new(&step.work_before),
                    Cell::new(&step.work_after),
                ]);
            }
            println!("{table}");
        }

        println!("Passes:     {}", trace.passes);
        println!("Final work: {}", trace.final_work);
        if !trace.blocked.is_empty() {
            println!("Blocked:    {:?}", trace.blocked);
        }
    }

    fn render_replay_report(&self, report: &ReplayReport) -> io::Result<()> {
        println!(
            "{} order {:?} is valid for {}",
            self.style_ok("[OK]"),
            report.order,
            self.style_name(&report.name)
        );
        println!("Final work: {}", report.final_work);
        Ok(())
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.supports_color() {
            table.force_no_tty();
        }
        table
    }

    fn format_verdict(&self, result: &SafetyResult) -> Cell {
        match result {
            SafetyResult::Safe { .. } => Cell::new("Safe").fg(Color::Green),
            SafetyResult::Unsafe => Cell::new("Unsafe").fg(Color::Red),
        }
    }

    fn style_name(&self, name: &str) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(name).to_string()
        } else {
            name.to_string()
        }
    }

    fn style_ok(&self, text: &str) -> String {
        if self.supports_color() {
            Style::new().green().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
