// debsolve-core/src/ignore.rs
//! Heuristics for dependencies a Debian build can do without.
use debsolve_common::error::Result;
use debsolve_common::model::Dependency;
use tracing::info;

use crate::interaction::Prompt;

type Artifact = (&'static str, &'static str);

const APACHE_PLUGINS: &str = "org.apache.maven.plugins";
const CODEHAUS_PLUGINS: &str = "org.codehaus.mojo";
const WAGON: &str = "org.apache.maven.wagon";

/// Plugins that only make sense on a developer machine or for upstream releases.
const USELESS_PLUGINS: &[Artifact] = &[
    (APACHE_PLUGINS, "maven-archetype-plugin"),
    (APACHE_PLUGINS, "maven-deploy-plugin"),
    (APACHE_PLUGINS, "maven-release-plugin"),
    (APACHE_PLUGINS, "maven-repository-plugin"),
    (APACHE_PLUGINS, "maven-scm-plugin"),
    (APACHE_PLUGINS, "maven-stage-plugin"),
    (APACHE_PLUGINS, "maven-eclipse-plugin"),
    (APACHE_PLUGINS, "maven-idea-plugin"),
    (APACHE_PLUGINS, "maven-source-plugin"),
    (CODEHAUS_PLUGINS, "changelog-maven-plugin"),
    (CODEHAUS_PLUGINS, "netbeans-freeform-maven-plugin"),
    (CODEHAUS_PLUGINS, "nbm-maven-plugin"),
    (CODEHAUS_PLUGINS, "animal-sniffer-maven-plugin"),
    (CODEHAUS_PLUGINS, "versions-maven-plugin"),
    ("org.sonatype.plugins", "nexus-staging-maven-plugin"),
];

/// Plugins a build often survives without, so the operator decides.
const OPTIONAL_PLUGINS: &[Artifact] = &[
    (APACHE_PLUGINS, "maven-ant-plugin"),
    (APACHE_PLUGINS, "maven-assembly-plugin"),
    (APACHE_PLUGINS, "maven-enforcer-plugin"),
    (APACHE_PLUGINS, "maven-gpg-plugin"),
    (APACHE_PLUGINS, "maven-shade-plugin"),
    ("org.apache.rat", "apache-rat-plugin"),
    (CODEHAUS_PLUGINS, "buildnumber-maven-plugin"),
    (CODEHAUS_PLUGINS, "findbugs-maven-plugin"),
];

const DOC_PLUGINS: &[Artifact] = &[
    (APACHE_PLUGINS, "maven-javadoc-plugin"),
    (APACHE_PLUGINS, "maven-docck-plugin"),
];

const REPORT_PLUGINS: &[Artifact] = &[
    (APACHE_PLUGINS, "maven-site-plugin"),
    (APACHE_PLUGINS, "maven-project-info-reports-plugin"),
    (APACHE_PLUGINS, "maven-changes-plugin"),
    (APACHE_PLUGINS, "maven-changelog-plugin"),
    (APACHE_PLUGINS, "maven-checkstyle-plugin"),
    (APACHE_PLUGINS, "maven-pmd-plugin"),
    (APACHE_PLUGINS, "maven-jxr-plugin"),
    (CODEHAUS_PLUGINS, "javancss-maven-plugin"),
    (CODEHAUS_PLUGINS, "jdepend-maven-plugin"),
    (CODEHAUS_PLUGINS, "taglist-maven-plugin"),
    (CODEHAUS_PLUGINS, "clirr-maven-plugin"),
];

const TEST_PLUGINS: &[Artifact] = &[
    (APACHE_PLUGINS, "maven-surefire-report-plugin"),
    (APACHE_PLUGINS, "maven-failsafe-plugin"),
    (CODEHAUS_PLUGINS, "cobertura-maven-plugin"),
    ("org.jacoco", "jacoco-maven-plugin"),
    ("com.atlassian.maven.plugins", "maven-clover2-plugin"),
];

/// Transports for deploying to remote repositories.
const USELESS_EXTENSIONS: &[Artifact] = &[
    (WAGON, "wagon-ssh-external"),
    (WAGON, "wagon-ssh"),
    (WAGON, "wagon-ftp"),
    (WAGON, "wagon-webdav"),
    (WAGON, "wagon-webdav-jackrabbit"),
    ("org.jvnet.wagon-svn", "wagon-svn"),
];

fn listed(table: &[Artifact], dependency: &Dependency) -> bool {
    table
        .iter()
        .any(|(group, artifact)| dependency.group_id == *group && dependency.artifact_id == *artifact)
}

pub fn is_doc_or_report_plugin(dependency: &Dependency) -> bool {
    listed(DOC_PLUGINS, dependency) || listed(REPORT_PLUGINS, dependency)
}

/// Decides which dependencies to drop, asking when running interactively and
/// falling back to the safe answer otherwise.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreQuestions {
    interactive: bool,
}

impl IgnoreQuestions {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }

    fn ask(&self, prompt: &mut dyn Prompt, text: &str, default: bool) -> Result<bool> {
        if self.interactive {
            prompt.confirm(text, default)
        } else {
            Ok(default)
        }
    }

    /// Dependencies that are not needed for the Debian build whether or not
    /// they could be found: test-only ones when tests are off, documentation
    /// when javadoc is off, release tooling, remote transports.
    pub fn ask_ignore_unnecessary_dependency(
        &self,
        prompt: &mut dyn Prompt,
        location: &str,
        dependency: &Dependency,
        run_tests: bool,
        generate_javadoc: bool,
    ) -> Result<bool> {
        let name = dependency.short_name();
        if !run_tests && dependency.is_test_scoped() {
            return self.ignore_if(
                prompt,
                &format!("Tests are turned off. Ignore the test dependency {name} in {location}?"),
                true,
            );
        }
        if !run_tests && listed(TEST_PLUGINS, dependency) {
            return self.ignore_if(
                prompt,
                &format!("Tests are turned off. Ignore the test plugin {name} in {location}?"),
                true,
            );
        }
        if !generate_javadoc && is_doc_or_report_plugin(dependency) {
            return self.ignore_if(
                prompt,
                &format!("Documentation is turned off. Ignore the documentation plugin {name} in {location}?"),
                true,
            );
        }
        if listed(USELESS_PLUGINS, dependency) {
            return self.ignore_if(
                prompt,
                &format!("This plugin is not useful for the build or its use is against Debian policies. Ignore the plugin {name} in {location}?"),
                true,
            );
        }
        if listed(USELESS_EXTENSIONS, dependency) {
            return self.ignore_if(
                prompt,
                &format!("This extension is not useful for the build. Ignore the extension {name} in {location}?"),
                true,
            );
        }
        if listed(OPTIONAL_PLUGINS, dependency) {
            return self.ignore_if(
                prompt,
                &format!("This plugin may be ignored in some cases. Ignore the plugin {name} in {location}?"),
                false,
            );
        }
        Ok(false)
    }

    fn ignore_if(&self, prompt: &mut dyn Prompt, text: &str, default: bool) -> Result<bool> {
        let ignore = self.ask(prompt, text, default)?;
        if ignore {
            info!("[ignored] {}", text);
        }
        Ok(ignore)
    }

    pub fn ask_ignore_dependency(
        &self,
        prompt: &mut dyn Prompt,
        location: &str,
        dependency: &Dependency,
        message: &str,
    ) -> Result<bool> {
        if !self.interactive {
            return Ok(false);
        }
        prompt.confirm(
            &format!("{message}\nIn {location}: {dependency}"),
            true,
        )
    }

    /// Documentation and report plugins that cannot be found are dropped
    /// without asking.
    pub fn ask_ignore_doc_or_report_plugin(&self, location: &str, dependency: &Dependency) -> bool {
        let ignore = is_doc_or_report_plugin(dependency);
        if ignore {
            println!(
                "[warning] Ignoring the documentation or report plugin {} in {}, it cannot be found.",
                dependency.short_name(),
                location
            );
        }
        ignore
    }

    /// `None` when the operator chose to drop the dependency, otherwise the
    /// issue to report for it, annotated with the operator's notes.
    pub fn ask_ignore_needed_dependency(
        &self,
        prompt: &mut dyn Prompt,
        location: &str,
        dependency: &Dependency,
    ) -> Result<Option<String>> {
        let issue = format!("{location}: Cannot resolve dependency {dependency}");
        if !self.interactive {
            return Ok(Some(issue));
        }
        let text = format!(
            "{dependency} in {location} cannot be found in the Debian repository.\n\
             Ignore this dependency? The build may fail if it is really needed."
        );
        if prompt.confirm(&text, false)? {
            return Ok(None);
        }
        let notes = prompt.input_lines(
            "Please explain why this dependency is needed and what should be done about it:",
        )?;
        if notes.is_empty() {
            Ok(Some(issue))
        } else {
            Ok(Some(format!("{issue}\n  {}", notes.replace('\n', "\n  "))))
        }
    }
}
