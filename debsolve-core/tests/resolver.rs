use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use debsolve_common::model::project::{HAS_PACKAGE_VERSION_PROPERTY, PACKAGE_PROPERTY};
use debsolve_common::model::{
    DebianDependency, Dependency, DependencyBucket, DependencyRule, DependencyType, ProjectInfo,
};
use debsolve_common::{Config, DebsolveError, RuleKind};
use debsolve_core::interaction::{Answer, DefaultPrompt, Prompt, Question, ScriptedPrompt};
use debsolve_core::scanner::PackageScanner;
use debsolve_core::{DependencyResolver, ResolverOptions};
use tempfile::TempDir;

const PACKAGE: &str = "liba-java";

/// Knows no package at all; documentation packages follow the `-doc` convention.
#[derive(Default, Clone)]
struct FakeScanner {
    refreshed: Rc<Cell<usize>>,
}

impl PackageScanner for FakeScanner {
    fn find_package_providing_file(&mut self, _path: &Path) -> Option<DebianDependency> {
        None
    }

    fn find_package_with_descriptor(&mut self, _dependency: &Dependency) -> Option<DebianDependency> {
        None
    }

    fn find_package_with_jar(&mut self, _dependency: &Dependency) -> Option<DebianDependency> {
        None
    }

    fn installed_version(&mut self, _package: &DebianDependency, _installed_only: bool) -> Option<String> {
        None
    }

    fn doc_dependencies(
        &mut self,
        packages: &[DebianDependency],
        _origins: &HashMap<DebianDependency, Dependency>,
    ) -> Vec<DebianDependency> {
        packages
            .iter()
            .map(|p| DebianDependency::new(format!("{}-doc", p.package)))
            .collect()
    }

    fn fresh(&self) -> Box<dyn PackageScanner> {
        self.refreshed.set(self.refreshed.get() + 1);
        Box::new(self.clone())
    }
}

struct Workspace {
    _dir: TempDir,
    base: PathBuf,
    repo: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        let repo = dir.path().join("repo");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(&repo).unwrap();
        Self { _dir: dir, base, repo }
    }

    fn config(&self) -> Config {
        Config {
            maven_repo: self.repo.clone(),
            base_dir: self.base.clone(),
            debian_dir_name: "debian".to_string(),
            package_name: PACKAGE.to_string(),
        }
    }

    /// Installs a descriptor owned by `package` in the repository.
    fn install(&self, pom: ProjectInfo, package: &str) {
        install_in(&self.repo, pom, package);
    }

    /// Writes a project descriptor in `module` (relative to the base directory).
    fn project(&self, module: &str, pom: ProjectInfo) -> PathBuf {
        let dir = self.base.join(module);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pom.json");
        fs::write(&path, serde_json::to_string(&pom).unwrap()).unwrap();
        path
    }

    fn resolver(&self, options: ResolverOptions, prompt: Box<dyn Prompt>) -> DependencyResolver {
        DependencyResolver::new(self.config(), options, Box::new(FakeScanner::default()), prompt)
            .unwrap()
    }

    fn batch(&self) -> DependencyResolver {
        self.resolver(batch_options(), Box::new(DefaultPrompt))
    }
}

fn install_in(repo: &Path, pom: ProjectInfo, package: &str) {
    let pom = pom.with_property(PACKAGE_PROPERTY, package);
    let dep = &pom.this_pom;
    let version = dep.version().unwrap();
    let dir = repo
        .join(dep.group_id.replace('.', "/"))
        .join(&dep.artifact_id)
        .join(version);
    fs::create_dir_all(&dir).unwrap();
    let file = format!("{}-{}-{}.pom.json", dep.artifact_id, version, dep.artifact_type);
    fs::write(dir.join(file), serde_json::to_string(&pom).unwrap()).unwrap();
}

/// Runs a hook the first time the operator is asked to retry, then answers
/// from the script.
struct RetryHookPrompt {
    script: ScriptedPrompt,
    on_retry: Option<Box<dyn FnOnce()>>,
}

impl Prompt for RetryHookPrompt {
    fn ask(&mut self, question: &Question) -> debsolve_common::Result<Answer> {
        if question.text() == "Try again to resolve the dependency?" {
            if let Some(hook) = self.on_retry.take() {
                hook();
            }
        }
        self.script.ask(question)
    }
}

fn interactive_options() -> ResolverOptions {
    ResolverOptions {
        interactive: true,
        ..batch_options()
    }
}

fn batch_options() -> ResolverOptions {
    ResolverOptions {
        interactive: false,
        explore: true,
        run_tests: false,
        generate_javadoc: false,
    }
}

fn library(group: &str, artifact: &str, version: &str) -> ProjectInfo {
    ProjectInfo::new(Dependency::jar(group, artifact, Some(version)))
}

fn project_a() -> ProjectInfo {
    library("g", "a", "1.2.3")
}

#[test]
fn scenario_a_runtime_dependency() {
    let ws = Workspace::new();
    ws.install(library("g", "b", "2.0"), "libb-java");
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "b", Some("2.0")).with_scope("compile"),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("libb-java")]
    );
    assert!(resolver.issues().is_empty());
}

#[test]
fn scenario_a_package_version_gives_minimum_version() {
    let ws = Workspace::new();
    ws.install(
        library("g", "b", "2.0").with_property(HAS_PACKAGE_VERSION_PROPERTY, "true"),
        "libb-java",
    );
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "b", Some("2.0")),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::with_min_version("libb-java", "2.0")]
    );
}

#[test]
fn scenario_b_version_from_management_without_prompting() {
    let ws = Workspace::new();
    ws.install(library("g", "c", "3.1"), "libc-java");
    ws.project(
        "",
        project_a()
            .with_dependency(
                DependencyType::DependencyManagement,
                Dependency::jar("g", "c", Some("3.1")),
            )
            .with_dependency(DependencyType::Dependencies, Dependency::jar("g", "c", None)),
    );

    let prompt = ScriptedPrompt::new(Vec::new());
    let transcript = prompt.transcript();
    let mut resolver = ws.resolver(batch_options(), Box::new(prompt));
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("libc-java")]
    );
    assert!(transcript.borrow().is_empty());
    assert!(resolver.issues().is_empty());
}

#[test]
fn scenario_c_jar_resolves_to_bundle() {
    let ws = Workspace::new();
    let published = DependencyRule::parse("g d s/jar/bundle/ *").unwrap();
    ws.install(
        ProjectInfo::new(Dependency::new("g", "d", "bundle", Some("1.0")))
            .with_published_rule(published.clone()),
        "libd-java",
    );
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "d", Some("1.0")),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("libd-java")]
    );
    let resolution = resolver.rules().get(RuleKind::Resolution);
    assert!(resolution.contains(&published));
    let rewritten = resolution
        .first_match(&Dependency::jar("g", "d", Some("1.0")))
        .unwrap()
        .apply(&Dependency::jar("g", "d", Some("1.0")));
    assert!(rewritten.is_bundle());
}

#[test]
fn scenario_d_unresolved_dependency_aborts_batch_run() {
    let ws = Workspace::new();
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "missing", Some("1.0")),
        ),
    );

    let prompt = ScriptedPrompt::new(Vec::new());
    let transcript = prompt.transcript();
    let mut resolver = ws.resolver(batch_options(), Box::new(prompt));
    let err = resolver.solve().unwrap_err();

    match err {
        DebsolveError::DependencyNotFound { dependency, pom } => {
            assert!(dependency.contains("g:missing"));
            assert_eq!(pom, "pom.json");
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(transcript.borrow().is_empty());
    assert_eq!(resolver.issues().len(), 1);
}

#[test]
fn unneeded_and_known_dependencies_are_not_duplicated() {
    let ws = Workspace::new();
    ws.install(library("g", "b", "2.0"), "libb-java");
    let test_dep = Dependency::jar("junit", "junit", Some("4.12")).with_scope("test");
    ws.project(
        "",
        project_a()
            .with_dependency(DependencyType::Dependencies, test_dep.clone())
            .with_dependency(DependencyType::Dependencies, test_dep.clone())
            .with_dependency(DependencyType::Dependencies, Dependency::jar("g", "b", Some("2.0")))
            .with_dependency(DependencyType::Dependencies, Dependency::jar("g", "b", Some("2.0")))
            .with_dependency(
                DependencyType::Dependencies,
                Dependency::new("g", "a", "test-jar", Some("1.2.3")),
            ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(resolver.rules().get(RuleKind::Ignore).len(), 1);
    assert!(resolver
        .rules()
        .get(RuleKind::Ignore)
        .contains(&DependencyRule::to_ignore(&test_dep)));
    assert_eq!(resolver.dependencies().get(DependencyBucket::Runtime).len(), 1);
    assert!(resolver.dependencies().get(DependencyBucket::Test).is_empty());
}

#[test]
fn published_rules_of_dependencies_are_propagated() {
    let ws = Workspace::new();
    let published = DependencyRule::parse("g b-extra * s/.*/debian/").unwrap();
    ws.install(
        library("g", "b", "2.0").with_published_rule(published.clone()),
        "libb-java",
    );
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "b", Some("2.0")),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();
    assert!(resolver.rules().get(RuleKind::Resolution).contains(&published));
}

#[test]
fn published_rule_of_another_version_must_round_trip() {
    let ws = Workspace::new();
    let published = DependencyRule::parse("g e jar s/.*/debian/").unwrap();
    ws.install(
        library("g", "e", "debian").with_published_rule(published.clone()),
        "libe-java",
    );
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "e", Some("1.5")),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("libe-java")]
    );
    assert!(resolver.rules().get(RuleKind::Resolution).contains(&published));
}

#[test]
fn buckets_follow_scope_and_list() {
    let ws = Workspace::new();
    ws.install(library("g", "opt", "1"), "libopt-java");
    ws.install(library("g", "prov", "1"), "libprov-java");
    ws.install(library("g", "t", "1"), "libt-java");
    ws.install(
        ProjectInfo::new(Dependency::plugin("org.codehaus.mojo", "build-helper-maven-plugin", Some("1.8"))),
        "libbuild-helper-maven-plugin-java",
    );
    ws.project(
        "",
        project_a()
            .with_dependency(
                DependencyType::Dependencies,
                Dependency::jar("g", "opt", Some("1")).with_optional(true),
            )
            .with_dependency(
                DependencyType::Dependencies,
                Dependency::jar("g", "prov", Some("1")).with_scope("provided"),
            )
            .with_dependency(
                DependencyType::Dependencies,
                Dependency::jar("g", "t", Some("1")).with_scope("test"),
            )
            .with_dependency(
                DependencyType::Plugins,
                Dependency::plugin("org.codehaus.mojo", "build-helper-maven-plugin", Some("1.8")),
            ),
    );

    let options = ResolverOptions {
        run_tests: true,
        ..batch_options()
    };
    let mut resolver = ws.resolver(options, Box::new(DefaultPrompt));
    resolver.solve().unwrap();

    let deps = resolver.dependencies();
    assert_eq!(deps.get(DependencyBucket::Optional), &[DebianDependency::new("libopt-java")]);
    assert_eq!(deps.get(DependencyBucket::Test), &[DebianDependency::new("libt-java")]);
    assert_eq!(
        deps.get(DependencyBucket::Compile),
        &[DebianDependency::new("libbuild-helper-maven-plugin-java")]
    );
    assert!(deps.get(DependencyBucket::Runtime).is_empty());
}

#[test]
fn missing_management_entries_are_skipped() {
    let ws = Workspace::new();
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::DependencyManagement,
            Dependency::jar("g", "nowhere", Some("1.0")),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();
    assert!(resolver.issues().is_empty());
    assert!(resolver.dependencies().is_empty());
}

#[test]
fn plugins_built_by_the_project_get_a_clean_rule() {
    let ws = Workspace::new();
    ws.project(
        "",
        ProjectInfo::new(Dependency::new("g", "parent", "pom", Some("1.0")))
            .with_module("plugin")
            .with_module("lib"),
    );
    ws.project(
        "plugin",
        ProjectInfo::new(Dependency::plugin("g", "my-plugin", Some("1.0")))
            .with_parent(Dependency::new("g", "parent", "pom", Some("1.0"))),
    );
    ws.project(
        "lib",
        library("g", "lib", "1.0")
            .with_parent(Dependency::new("g", "parent", "pom", Some("1.0")))
            .with_dependency(
                DependencyType::Plugins,
                Dependency::plugin("g", "my-plugin", Some("1.0")),
            ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    let clean = DependencyRule::parse("g my-plugin maven-plugin *").unwrap();
    assert!(resolver.rules().get(RuleKind::Clean).contains(&clean));
    assert!(resolver.dependencies().is_empty());
    assert_eq!(resolver.pom_list().poms().len(), 3);
}

#[test]
fn version_rule_is_asked_once_per_version() {
    let ws = Workspace::new();
    ws.project(
        "",
        ProjectInfo::new(Dependency::new("g", "parent", "pom", Some("1.0")))
            .with_module("m1")
            .with_module("m2"),
    );
    for module in ["m1", "m2"] {
        ws.project(
            module,
            library("g", module, "1.0")
                .with_parent(Dependency::new("g", "parent", "pom", Some("1.0"))),
        );
    }

    let prompt = ScriptedPrompt::new(vec![
        Answer::Text(String::new()),
        Answer::Choice(1),
        Answer::YesNo(true),
    ]);
    let transcript = prompt.transcript();
    let options = ResolverOptions {
        interactive: true,
        ..batch_options()
    };
    let mut resolver = ws.resolver(options, Box::new(prompt));
    resolver.solve().unwrap();

    let asked = transcript.borrow();
    let choices = asked
        .iter()
        .filter(|q| matches!(q, Question::Choice { .. }))
        .count();
    assert_eq!(choices, 1);
    assert_eq!(resolver.package_version(), Some("1.0"));

    let resolution = resolver.rules().get(RuleKind::Resolution);
    for module in ["m1", "m2"] {
        let dep = Dependency::jar("g", module, Some("1.0"));
        let rewritten = resolution.first_match(&dep).unwrap().apply(&dep);
        assert_eq!(rewritten.version(), Some("debian"));
    }
}

#[test]
fn operator_can_ignore_an_unresolved_dependency() {
    let ws = Workspace::new();
    let missing = Dependency::jar("g", "missing", Some("1.0"));
    ws.project(
        "",
        project_a().with_dependency(DependencyType::Dependencies, missing.clone()),
    );

    let prompt = ScriptedPrompt::new(vec![
        Answer::Text(String::new()),
        Answer::Choice(1),
        Answer::YesNo(true),
    ]);
    let options = ResolverOptions {
        interactive: true,
        ..batch_options()
    };
    let mut resolver = ws.resolver(options, Box::new(prompt));
    resolver.solve().unwrap();

    assert!(resolver.issues().is_empty());
    assert!(resolver
        .rules()
        .get(RuleKind::Ignore)
        .contains(&DependencyRule::to_ignore(&missing)));
}

#[test]
fn operator_rule_rewrites_and_retries() {
    let ws = Workspace::new();
    ws.install(library("org.new", "b", "2.0"), "libb-java");
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("org.old", "b", Some("2.0")),
        ),
    );

    let prompt = ScriptedPrompt::new(vec![
        Answer::Text(String::new()),
        Answer::Choice(1),
        // Keep the dependency, no notes.
        Answer::YesNo(false),
        Answer::Text(String::new()),
        // A rule that changes nothing is refused.
        Answer::Text("org.other * * *".to_string()),
        Answer::Text("s/org.old/org.new/ b jar *".to_string()),
    ]);
    let options = ResolverOptions {
        interactive: true,
        ..batch_options()
    };
    let mut resolver = ws.resolver(options, Box::new(prompt));
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("libb-java")]
    );
    assert!(resolver
        .rules()
        .get(RuleKind::Resolution)
        .contains(&DependencyRule::parse("s/org.old/org.new/ b jar *").unwrap()));
    // Declining to ignore it was recorded.
    assert_eq!(resolver.issues().len(), 1);
}

#[test]
fn no_parent_option_skips_a_missing_parent() {
    let ws = Workspace::new();
    ws.project(
        "",
        project_a().with_parent(Dependency::new("g", "unpackaged-parent", "pom", Some("1"))),
    );
    let debian = ws.base.join("debian");
    fs::create_dir_all(&debian).unwrap();
    fs::write(debian.join(format!("{PACKAGE}.poms")), "pom.json --no-parent\n").unwrap();

    let options = ResolverOptions {
        explore: false,
        ..batch_options()
    };
    let mut resolver = ws.resolver(options, Box::new(DefaultPrompt));
    resolver.solve().unwrap();
    assert!(resolver.issues().is_empty());
}

#[test]
fn substvars_are_merged_and_rules_saved() {
    let ws = Workspace::new();
    ws.install(library("g", "b", "2.0"), "libb-java");
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "b", Some("2.0")),
        ),
    );
    let debian = ws.base.join("debian");
    fs::create_dir_all(&debian).unwrap();
    let substvars = debian.join(format!("{PACKAGE}.substvars"));
    fs::write(&substvars, "misc:Depends=foo\n").unwrap();

    let options = ResolverOptions {
        generate_javadoc: true,
        ..batch_options()
    };
    let mut resolver = ws.resolver(options, Box::new(DefaultPrompt));
    resolver.solve().unwrap();
    resolver.save_rules_and_poms().unwrap();
    resolver.save_substvars().unwrap();

    let written = fs::read_to_string(&substvars).unwrap();
    assert!(written.contains("misc:Depends=foo"));
    assert!(written.contains("maven.Depends=libb-java\n"));
    assert!(written.contains("maven.DocDepends=default-jdk-doc, libb-java-doc\n"));
    assert!(debian.join("maven.rules").exists());
    let poms = fs::read_to_string(debian.join(format!("{PACKAGE}.poms"))).unwrap();
    assert!(poms.lines().any(|line| line.starts_with("pom.json")));
}

#[test]
fn broken_project_descriptor_is_fatal() {
    let ws = Workspace::new();
    fs::write(ws.base.join("pom.json"), "{ not json").unwrap();

    let mut resolver = ws.batch();
    assert!(matches!(
        resolver.solve(),
        Err(DebsolveError::Descriptor(_, _))
    ));
}

#[test]
fn management_version_inherited_through_installed_parents() {
    let ws = Workspace::new();
    ws.install(
        ProjectInfo::new(Dependency::new("g", "grand", "pom", Some("1"))).with_dependency(
            DependencyType::DependencyManagement,
            Dependency::jar("g", "c", Some("3.1")),
        ),
        "libparent-java",
    );
    ws.install(
        ProjectInfo::new(Dependency::new("g", "parent", "pom", Some("1")))
            .with_parent(Dependency::new("g", "grand", "pom", Some("1"))),
        "libparent-java",
    );
    ws.install(library("g", "c", "3.1"), "libc-java");
    ws.project(
        "",
        project_a()
            .with_parent(Dependency::new("g", "parent", "pom", Some("1")))
            .with_dependency(DependencyType::Dependencies, Dependency::jar("g", "c", None)),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert!(resolver
        .dependencies()
        .get(DependencyBucket::Runtime)
        .contains(&DebianDependency::new("libc-java")));
    assert!(resolver.issues().is_empty());
}

#[test]
fn module_cycle_is_a_descriptor_error() {
    let ws = Workspace::new();
    ws.project("", project_a().with_module("."));

    let mut resolver = ws.batch();
    match resolver.solve() {
        Err(DebsolveError::Descriptor(_, message)) => assert!(message.contains("module cycle")),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn missing_version_falls_back_to_best_guess() {
    let ws = Workspace::new();
    ws.install(library("g", "x", "2.0"), "libx-java");
    ws.project(
        "",
        project_a().with_dependency(DependencyType::Dependencies, Dependency::jar("g", "x", None)),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("libx-java")]
    );
    assert!(resolver.issues().is_empty());
}

#[test]
fn plugin_with_several_installed_versions_is_reported_and_resolved() {
    let ws = Workspace::new();
    for version in ["1.5", "2.5"] {
        ws.install(
            ProjectInfo::new(Dependency::plugin("org.example", "x-maven-plugin", Some(version))),
            "libx-plugin-java",
        );
    }
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Plugins,
            Dependency::plugin("org.example", "x-maven-plugin", None),
        ),
    );

    let mut resolver = ws.batch();
    resolver.solve().unwrap();

    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Compile),
        &[DebianDependency::new("libx-plugin-java")]
    );
    assert_eq!(resolver.issues().len(), 1);
    assert!(resolver.issues()[0]
        .contains("More than one version matches the plugin org.example:x-maven-plugin"));
}

#[test]
fn operator_can_ignore_a_missing_parent() {
    let ws = Workspace::new();
    let path = ws.project(
        "",
        project_a().with_parent(Dependency::new("g", "unpackaged-parent", "pom", Some("1"))),
    );

    let prompt = ScriptedPrompt::new(vec![
        Answer::YesNo(true),
        Answer::Text(String::new()),
        Answer::Choice(1),
    ]);
    let transcript = prompt.transcript();
    let mut resolver = ws.resolver(interactive_options(), Box::new(prompt));
    resolver.solve().unwrap();

    assert!(transcript.borrow()[0]
        .text()
        .starts_with("The parent descriptor cannot be found"));
    assert!(resolver.pom_list().options(&path).no_parent);
    assert!(resolver.issues().is_empty());
}

#[test]
fn retry_rescans_with_a_fresh_scanner() {
    let ws = Workspace::new();
    ws.project(
        "",
        project_a().with_dependency(
            DependencyType::Dependencies,
            Dependency::jar("g", "late", Some("1.0")),
        ),
    );

    let repo = ws.repo.clone();
    let prompt = RetryHookPrompt {
        script: ScriptedPrompt::new(vec![
            Answer::Text(String::new()),
            Answer::Choice(1),
            // Keep the dependency, no notes, no rule.
            Answer::YesNo(false),
            Answer::Text(String::new()),
            Answer::Text(String::new()),
            Answer::YesNo(true),
        ]),
        // Installed in another terminal while the question is open.
        on_retry: Some(Box::new(move || {
            install_in(&repo, library("g", "late", "1.0"), "liblate-java");
        })),
    };
    let scanner = FakeScanner::default();
    let refreshed = Rc::clone(&scanner.refreshed);
    let mut resolver = DependencyResolver::new(
        ws.config(),
        interactive_options(),
        Box::new(scanner),
        Box::new(prompt),
    )
    .unwrap();
    resolver.solve().unwrap();

    assert_eq!(refreshed.get(), 1);
    assert_eq!(
        resolver.dependencies().get(DependencyBucket::Runtime),
        &[DebianDependency::new("liblate-java")]
    );
    // Declining to ignore it was recorded before the retry.
    assert_eq!(resolver.issues().len(), 1);
}

#[test]
fn declined_module_is_ignored() {
    let ws = Workspace::new();
    ws.project(
        "",
        ProjectInfo::new(Dependency::new("g", "parent", "pom", Some("1.0")))
            .with_module("m1")
            .with_module("m2"),
    );
    let mut paths = Vec::new();
    for module in ["m1", "m2"] {
        paths.push(ws.project(
            module,
            library("g", module, "1.0")
                .with_parent(Dependency::new("g", "parent", "pom", Some("1.0"))),
        ));
    }

    let prompt = ScriptedPrompt::new(vec![
        Answer::Text(String::new()),
        Answer::Choice(1),
        // Select the modules one by one.
        Answer::YesNo(false),
        Answer::YesNo(true),
        Answer::YesNo(false),
    ]);
    let transcript = prompt.transcript();
    let mut resolver = ws.resolver(interactive_options(), Box::new(prompt));
    resolver.solve().unwrap();

    let module_questions = transcript
        .borrow()
        .iter()
        .filter(|q| q.text().starts_with("Include the module"))
        .count();
    assert_eq!(module_questions, 2);
    assert!(!resolver.pom_list().options(&paths[0]).ignore);
    assert!(resolver.pom_list().options(&paths[1]).ignore);
    assert!(resolver
        .rules()
        .get(RuleKind::Ignore)
        .contains(&DependencyRule::to_match(&Dependency::jar("g", "m2", Some("1.0")))));
}

#[test]
fn version_question_skipped_only_for_rules_naming_the_artifact() {
    let asked_choices = |rule: &str, answers: Vec<Answer>| {
        let ws = Workspace::new();
        ws.project("", project_a());
        let debian = ws.base.join("debian");
        fs::create_dir_all(&debian).unwrap();
        fs::write(debian.join("maven.rules"), format!("{rule}\n")).unwrap();

        let prompt = ScriptedPrompt::new(answers);
        let transcript = prompt.transcript();
        let mut resolver = ws.resolver(interactive_options(), Box::new(prompt));
        resolver.solve().unwrap();
        let count = transcript
            .borrow()
            .iter()
            .filter(|q| matches!(q, Question::Choice { .. }))
            .count();
        count
    };

    assert_eq!(
        asked_choices("g a jar s/.*/debian/", vec![Answer::Text(String::new())]),
        0
    );
    assert_eq!(
        asked_choices(
            "* * * s/.*/debian/",
            vec![Answer::Text(String::new()), Answer::Choice(1)]
        ),
        1
    );
}
