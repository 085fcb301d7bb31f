use clap::Args;
use colored::Colorize;
use debsolve_common::config::Config;
use debsolve_common::error::Result;
use debsolve_common::rules::{RuleKind, RuleSetFiles};
use prettytable::{format, Cell, Row, Table};

#[derive(Args, Debug)]
pub struct Rules {
    /// Only show one rules file, e.g. maven.ignoreRules
    #[arg(long, value_name = "FILE")]
    pub file: Option<String>,
}

impl Rules {
    pub fn run(&self, config: &Config) -> Result<()> {
        let rules = RuleSetFiles::load(&config.output_dir())?;
        for kind in RuleKind::ALL {
            if self
                .file
                .as_deref()
                .is_some_and(|file| file != kind.file_name())
            {
                continue;
            }
            let set = rules.get(kind);
            println!(
                "{} {} ({} rules)",
                "==>".bold().blue(),
                kind.file_name().bold(),
                set.len()
            );
            if set.is_empty() {
                println!("{}", "  none".dimmed());
                continue;
            }
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
            table.add_row(Row::new(vec![
                Cell::new("Rule").style_spec("b"),
                Cell::new("Description").style_spec("b"),
            ]));
            for rule in set.rules() {
                table.add_row(Row::new(vec![
                    Cell::new(&rule.to_string()),
                    Cell::new(rule.description()),
                ]));
            }
            table.printstd();
        }
        Ok(())
    }
}
