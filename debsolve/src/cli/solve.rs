use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use debsolve_common::config::Config;
use debsolve_common::error::{DebsolveError, Result};
use debsolve_core::interaction::{DefaultPrompt, Prompt, TerminalPrompt};
use debsolve_core::scanner::DpkgScanner;
use debsolve_core::{DependencyResolver, ResolverOptions};

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Name of the Debian package being built
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,

    /// Never ask questions, take the default answer instead
    #[arg(long)]
    pub non_interactive: bool,

    /// Do not query apt-file for packages that are not installed
    #[arg(long)]
    pub offline: bool,

    /// Root of the Maven repository for Debian
    #[arg(short, long, value_name = "DIR")]
    pub maven_repo: Option<PathBuf>,

    /// Only analyse the descriptors listed in debian/<package>.poms
    #[arg(long)]
    pub non_explore: bool,

    /// Running during the package build: do not rewrite the rule and descriptor lists
    #[arg(long)]
    pub build: bool,

    /// Include the dependencies needed to run the tests
    #[arg(long)]
    pub run_tests: bool,

    /// Include the dependencies needed to build the documentation
    #[arg(long)]
    pub generate_javadoc: bool,
}

impl SolveArgs {
    /// `Ok(false)` when the run finished with unresolved issues.
    pub fn run(&self, config: Config, verbose: bool) -> Result<bool> {
        let package = self.package.clone().ok_or_else(|| {
            DebsolveError::Config(
                "the name of the package being built is required (--package)".to_string(),
            )
        })?;
        let mut config = config.with_package_name(&package);
        if let Some(repo) = &self.maven_repo {
            config = config.with_maven_repo(repo);
        }

        let options = ResolverOptions {
            interactive: !self.non_interactive,
            explore: !self.non_explore,
            run_tests: self.run_tests,
            generate_javadoc: self.generate_javadoc,
        };

        if verbose {
            let mut message = format!("Solving dependencies for package {package}");
            if options.run_tests {
                message.push_str(" (tests are included)");
            }
            if options.generate_javadoc {
                message.push_str(" (documentation is included)");
            }
            println!("{} {}", "==>".bold().blue(), message.bold());
        }

        let scanner = Box::new(DpkgScanner::new(self.offline, config.maven_repo()));
        let prompt: Box<dyn Prompt> = if options.interactive {
            Box::new(TerminalPrompt::new())
        } else {
            Box::new(DefaultPrompt)
        };

        let mut resolver = DependencyResolver::new(config, options, scanner, prompt)?;
        resolver.solve()?;

        if !self.build {
            resolver.save_rules_and_poms()?;
        }
        resolver.save_substvars()?;

        let issues = resolver.issues();
        if issues.is_empty() {
            return Ok(true);
        }
        eprintln!("{}", "ERROR:".red().bold());
        for issue in issues {
            eprintln!("{issue}");
        }
        eprintln!("--------");
        eprintln!("Some problems were found in this project, exiting...");
        Ok(false)
    }
}
