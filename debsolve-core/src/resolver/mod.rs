// debsolve-core/src/resolver/mod.rs
//! Resolution of a package's dependency tree against the local repository.
//!
//! Descriptors are analysed first: each one is registered as a project
//! artifact, gets its version rule and has its parent reference resolved.
//! The dependency lists they declare are queued and only resolved once the
//! whole tree is known, so that modules depending on each other resolve as
//! project artifacts instead of being searched in the repository.
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bitflags::bitflags;
use colored::Colorize;
use debsolve_common::config::Config;
use debsolve_common::error::{DebsolveError, Result};
use debsolve_common::model::debian::compare_versions;
use debsolve_common::model::dependency::{BUNDLE, MAVEN_PLUGIN};
use debsolve_common::model::project::{HAS_PACKAGE_VERSION_PROPERTY, PACKAGE_PROPERTY};
use debsolve_common::model::{
    ArtifactKey, DebianDependencies, DebianDependency, Dependency, DependencyBucket,
    DependencyRule, DependencyType, ProjectInfo, Rule,
};
use debsolve_common::poms::PomList;
use debsolve_common::rules::{RuleKind, RuleSetFiles};
use debsolve_common::substvars::{self, UPSTREAM_VERSION_KEY};
use tracing::{debug, error, info, instrument};

use crate::descriptor::{DescriptorCache, DescriptorReader, JsonDescriptorReader};
use crate::ignore::IgnoreQuestions;
use crate::interaction::Prompt;
use crate::repository::RepositoryIndex;
use crate::scanner::PackageScanner;

pub mod version;

use version::{describe, VersionRules};

const RULE_FORM: &str =
    "s/groupId/newGroupId/ s/artifactId/newArtifactId/ jar s/version/newVersion/";

bitflags! {
    /// How the dependency being resolved is used by the build.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResolveFlags: u8 {
        /// Only needed to build: plugins, extensions and their dependencies.
        const BUILD_TIME = 1 << 0;
        const EXTENSION  = 1 << 1;
        /// Declared in a management list; pins a version, is not a requirement.
        const MANAGEMENT = 1 << 2;
        /// The parent reference of the source descriptor.
        const PARENT     = 1 << 3;
    }
}

impl ResolveFlags {
    pub fn for_list(list: DependencyType) -> Self {
        let mut flags = ResolveFlags::empty();
        if list.is_build_time() {
            flags |= ResolveFlags::BUILD_TIME;
        }
        if list == DependencyType::Extensions {
            flags |= ResolveFlags::EXTENSION;
        }
        if list.is_management() {
            flags |= ResolveFlags::MANAGEMENT;
        }
        flags
    }
}

/// Bucket a resolved dependency lands in; management entries land nowhere.
pub fn classify(dependency: &Dependency, flags: ResolveFlags) -> Option<DependencyBucket> {
    if flags.contains(ResolveFlags::MANAGEMENT) {
        None
    } else if dependency.is_test_scoped() {
        Some(DependencyBucket::Test)
    } else if flags.contains(ResolveFlags::BUILD_TIME) {
        Some(DependencyBucket::Compile)
    } else if dependency.optional {
        Some(DependencyBucket::Optional)
    } else if !dependency.is_provided() {
        Some(DependencyBucket::Runtime)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub interactive: bool,
    /// Follow modules from the root descriptor instead of the fixed list.
    pub explore: bool,
    pub run_tests: bool,
    pub generate_javadoc: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            interactive: true,
            explore: true,
            run_tests: false,
            generate_javadoc: false,
        }
    }
}

/// A dependency list waiting for the whole tree to be registered.
#[derive(Debug, Clone)]
struct Pending {
    pom: PathBuf,
    list: DependencyType,
    flags: ResolveFlags,
}

enum Step {
    Resolved(Dependency),
    Dropped,
    Retry(Dependency),
}

pub struct DependencyResolver {
    config: Config,
    options: ResolverOptions,
    reader: Box<dyn DescriptorReader>,
    scanner: Box<dyn PackageScanner>,
    prompt: Box<dyn Prompt>,
    ignore_questions: IgnoreQuestions,
    repository: RepositoryIndex,
    descriptors: DescriptorCache,
    rules: RuleSetFiles,
    pom_list: PomList,
    known_projects: HashSet<ArtifactKey>,
    ignored: HashSet<ArtifactKey>,
    project_poms: Vec<Dependency>,
    version_rules: VersionRules,
    package_version: Option<String>,
    dependencies: DebianDependencies,
    origins: HashMap<DebianDependency, Dependency>,
    issues: Vec<String>,
    pending: Vec<Pending>,
    analysed: HashSet<PathBuf>,
    modules_asked: bool,
    filter_modules: bool,
}

impl DependencyResolver {
    /// Loads the rules and the list of descriptors left by earlier runs.
    pub fn new(
        config: Config,
        options: ResolverOptions,
        scanner: Box<dyn PackageScanner>,
        prompt: Box<dyn Prompt>,
    ) -> Result<Self> {
        let rules = RuleSetFiles::load(&config.output_dir())?;
        let pom_list = PomList::load(config.pom_list_path(), config.base_dir())?;
        let repository = RepositoryIndex::new(config.maven_repo());
        Ok(Self {
            ignore_questions: IgnoreQuestions::new(options.interactive),
            config,
            options,
            reader: Box::new(JsonDescriptorReader),
            scanner,
            prompt,
            repository,
            descriptors: DescriptorCache::new(),
            rules,
            pom_list,
            known_projects: HashSet::new(),
            ignored: HashSet::new(),
            project_poms: Vec::new(),
            version_rules: VersionRules::new(),
            package_version: None,
            dependencies: DebianDependencies::new(),
            origins: HashMap::new(),
            issues: Vec::new(),
            pending: Vec::new(),
            analysed: HashSet::new(),
            modules_asked: false,
            filter_modules: false,
        })
    }

    pub fn with_reader(mut self, reader: Box<dyn DescriptorReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn rules(&self) -> &RuleSetFiles {
        &self.rules
    }

    pub fn dependencies(&self) -> &DebianDependencies {
        &self.dependencies
    }

    pub fn pom_list(&self) -> &PomList {
        &self.pom_list
    }

    pub fn package_version(&self) -> Option<&str> {
        self.package_version.as_deref()
    }

    pub fn repository(&self) -> &RepositoryIndex {
        &self.repository
    }

    #[instrument(skip_all, fields(package = %self.config.package_name))]
    pub fn solve(&mut self) -> Result<()> {
        if !self.repository.is_scanned() {
            self.repository.scan(self.reader.as_ref())?;
        }
        fs::create_dir_all(self.config.output_dir())?;

        if self.options.explore {
            let root = match self.pom_list.first_pom() {
                Some(pom) => pom,
                None => self.find_root_descriptor()?,
            };
            self.analyse(&root)?;
        } else {
            for pom in self.pom_list.poms() {
                self.analyse(&pom)?;
            }
        }

        self.resolve_pending()
    }

    fn find_root_descriptor(&mut self) -> Result<PathBuf> {
        let name = self.reader.project_file_name().to_string();
        for candidate in [
            self.config.base_dir().join(&name),
            self.config.output_dir().join(&name),
        ] {
            if candidate.is_file() {
                self.pom_list.add_pom(&candidate);
                return Ok(candidate);
            }
        }
        Err(DebsolveError::Generic(format!(
            "Cannot find the project descriptor {} in {}",
            name,
            self.config.base_dir().display()
        )))
    }

    fn load_descriptor(&mut self, path: &Path) -> Result<&mut ProjectInfo> {
        let options = self.pom_list.options(path);
        self.descriptors.load(path, self.reader.as_ref(), &options)
    }

    /// Registers one descriptor of the tree and queues its dependency lists.
    fn analyse(&mut self, pom_path: &Path) -> Result<()> {
        if self.pom_list.options_mut(pom_path).ignore {
            return Ok(());
        }
        let canonical = fs::canonicalize(pom_path).unwrap_or_else(|_| pom_path.to_path_buf());
        if !self.analysed.insert(canonical) {
            return Err(DebsolveError::Descriptor(
                pom_path.to_path_buf(),
                "module cycle: this descriptor is already part of the tree".to_string(),
            ));
        }
        let location = self.config.relative_path(pom_path);
        println!("{} {}...", "Analysing".bold(), location);

        let options = self.pom_list.options(pom_path);
        let package_name = self.config.package_name.clone();
        let reset_properties = |pom: &mut ProjectInfo| {
            pom.properties = BTreeMap::from([(PACKAGE_PROPERTY.to_string(), package_name.clone())]);
        };

        let pom = self.load_descriptor(pom_path)?;
        reset_properties(pom);
        if options.no_parent {
            pom.parent = None;
        }

        if let Some(parent) = pom.parent.clone().filter(|p| !p.is_super_pom()) {
            // Not a build-time requirement: the installed descriptor keeps needing its parent.
            let resolved = self.resolve_dependency(&parent, pom_path, ResolveFlags::PARENT)?;
            if self.pom_list.options(pom_path).no_parent != options.no_parent {
                self.descriptors.invalidate(pom_path);
                reset_properties(self.load_descriptor(pom_path)?);
            }
            let parent_pom = resolved
                .as_ref()
                .and_then(|p| self.repository.search_matching_pom(p));
            let pom = self.load_descriptor(pom_path)?;
            pom.parent = resolved;
            if parent_pom.is_some() {
                pom.parent_pom = parent_pom;
            }
        }

        let original_version = self
            .load_descriptor(pom_path)?
            .original_version()
            .map(str::to_string);
        if self.package_version.is_none() {
            if self.options.interactive {
                let answer = self.prompt.input(
                    "Enter the upstream version for the package.",
                    original_version.as_deref(),
                )?;
                self.package_version = Some(answer).filter(|v| !v.is_empty());
            } else if options.has_package_version {
                self.package_version = original_version.clone();
            }
        }
        if original_version.is_some() && original_version == self.package_version {
            self.load_descriptor(pom_path)?
                .properties
                .insert(HAS_PACKAGE_VERSION_PROPERTY.to_string(), "true".to_string());
            self.pom_list.options_mut(pom_path).has_package_version = true;
        }

        let snapshot = self.load_descriptor(pom_path)?.clone();
        let this_pom = snapshot.this_pom.clone();
        if this_pom.is_jar() {
            // Other modules may depend on the test jar built alongside.
            self.repository.register_pom(pom_path, snapshot.as_test_jar());
        }
        self.repository.register_pom(pom_path, snapshot.clone());
        self.known_projects.insert(this_pom.key());

        if self.filter_modules
            && !self
                .prompt
                .confirm(&format!("Include the module {location} ?"), true)?
        {
            self.pom_list.options_mut(pom_path).ignore = true;
            self.rules
                .get_mut(RuleKind::Ignore)
                .add(DependencyRule::to_match(&this_pom));
            return Ok(());
        }

        self.project_poms.push(this_pom.clone());

        if self.options.interactive && !this_pom.is_plugin() && !self.has_explicit_rule(&this_pom) {
            if let Some(version) = this_pom.version() {
                let version_rule = self.choose_version_rule(&this_pom, version)?;
                self.rules.get_mut(RuleKind::Resolution).add(DependencyRule::with_version_rule(
                    &this_pom.group_id,
                    &this_pom.artifact_id,
                    &this_pom.artifact_type,
                    version_rule.clone(),
                )?);
                let transformed =
                    snapshot.new_from_rules(self.rules.get(RuleKind::Resolution).rules());
                self.project_poms.push(transformed.this_pom.clone());
                self.repository.register_pom(pom_path, transformed);

                if this_pom.is_bundle() {
                    let question = format!(
                        "{} is a bundle.\nInform the resolver that dependencies of type jar which may match this library should be transformed into bundles automatically?",
                        this_pom.short_name()
                    );
                    if self.prompt.confirm(&question, true)? {
                        self.rules.get_mut(RuleKind::Published).add(
                            DependencyRule::with_version_rule(
                                &this_pom.group_id,
                                &this_pom.artifact_id,
                                "s/jar/bundle/",
                                version_rule,
                            )?,
                        );
                    }
                }
            }
        }

        let parent = self
            .load_descriptor(pom_path)?
            .parent
            .clone()
            .filter(|p| !p.is_super_pom());
        if let Some(parent) = parent {
            let found = self.repository.search_matching_pom(&parent);
            if found.map_or(true, |p| p.this_pom.is_super_pom()) {
                self.pom_list.options_mut(pom_path).no_parent = true;
            }
            if pom_path.parent() != Some(self.config.base_dir()) {
                println!("Checking the parent dependency in the sub project {location}");
                self.resolve_dependency(&parent, pom_path, ResolveFlags::PARENT)?;
            }
        }

        for list in DependencyType::ALL {
            self.pending.push(Pending {
                pom: pom_path.to_path_buf(),
                list,
                flags: ResolveFlags::for_list(list),
            });
        }

        if self.options.explore && !snapshot.modules.is_empty() {
            if self.options.interactive && !self.modules_asked {
                self.filter_modules = !self.prompt.confirm(
                    "This project contains modules. Include all modules? (no to select them individually)",
                    true,
                )?;
                self.modules_asked = true;
            }
            let dir = pom_path
                .parent()
                .unwrap_or(self.config.base_dir())
                .to_path_buf();
            let file_name = self.reader.project_file_name().to_string();
            for module in &snapshot.modules {
                self.analyse(&dir.join(module).join(&file_name))?;
            }
        }
        Ok(())
    }

    /// A rule from an earlier run naming this artifact settles its version.
    fn has_explicit_rule(&self, this_pom: &Dependency) -> bool {
        self.rules
            .get(RuleKind::Resolution)
            .find_matching_rules(this_pom)
            .iter()
            .any(|rule| rule.explicitly_mentions(this_pom))
    }

    fn choose_version_rule(&mut self, this_pom: &Dependency, version: &str) -> Result<Rule> {
        if let Some(rule) = self.version_rules.remembered(version) {
            info!("Reusing version rule {} for {}", rule, this_pom.short_name());
            return Ok(rule.clone());
        }
        let choices = self.version_rules.choices(version);
        let question = format!(
            "Version of {} is {}\nChoose how the version will be transformed:",
            this_pom.short_name(),
            version
        );
        let index = self.prompt.choose(
            &question,
            choices.iter().map(describe).collect(),
            VersionRules::default_choice(&choices),
        )?;
        let mut rule = choices
            .get(index)
            .cloned()
            .ok_or_else(|| DebsolveError::Prompt(format!("no version rule at index {index}")))?;
        if rule.is_custom() {
            rule = self.ask_custom_version_rule()?;
            self.version_rules.add_custom(rule.clone());
        }
        self.version_rules.remember(version, rule.clone());
        Ok(rule)
    }

    fn ask_custom_version_rule(&mut self) -> Result<Rule> {
        let mut question =
            "Enter the pattern for your custom rule (in the form s/regex/replace/)".to_string();
        loop {
            let pattern = self.prompt.input(&question, None)?.to_lowercase();
            if !pattern.is_empty() {
                match Rule::new(&pattern, &format!("My custom rule {pattern}")) {
                    Ok(rule) if !rule.is_custom() => return Ok(rule),
                    Ok(_) => {}
                    Err(e) => println!("{} {}", "[error]".red(), e),
                }
            }
            question = "Please enter a pattern of the form s/regex/replace/".to_string();
        }
    }

    fn resolve_pending(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        for work in pending {
            let dependencies = self
                .load_descriptor(&work.pom)?
                .dependencies_of(work.list)
                .to_vec();
            for dependency in &dependencies {
                match self.resolve_dependency(dependency, &work.pom, work.flags) {
                    Ok(_) => {}
                    // The operator already declined to ignore it, which recorded the issue.
                    Err(DebsolveError::DependencyNotFound { dependency, pom })
                        if self.options.interactive =>
                    {
                        error!("Cannot resolve {} in {}", dependency, pom);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    /// Resolves one dependency, retrying with the rewritten coordinate each
    /// time the operator supplies a rule or asks for a rescan.
    fn resolve_dependency(
        &mut self,
        dependency: &Dependency,
        source: &Path,
        flags: ResolveFlags,
    ) -> Result<Option<Dependency>> {
        let mut current = self.apply_resolution_rules(dependency);
        let mut flags = flags;
        let mut rescan_offered = false;
        loop {
            match self.resolve_step(&current, source, flags, &mut rescan_offered)? {
                Step::Resolved(resolved) => return Ok(Some(resolved)),
                Step::Dropped => return Ok(None),
                Step::Retry(next) => {
                    current = next;
                    flags.remove(ResolveFlags::PARENT);
                }
            }
        }
    }

    fn apply_resolution_rules(&self, dependency: &Dependency) -> Dependency {
        match self.rules.get(RuleKind::Resolution).first_match(dependency) {
            Some(rule) => {
                let rewritten = rule.apply(dependency);
                if rewritten != *dependency {
                    debug!("{} rewritten to {} by {}", dependency, rewritten, rule);
                }
                rewritten
            }
            None => dependency.clone(),
        }
    }

    fn ignore(&mut self, dependency: &Dependency) {
        self.ignored.insert(dependency.key());
        self.rules
            .get_mut(RuleKind::Ignore)
            .add(DependencyRule::to_ignore(dependency));
        info!("[ignored] {}", dependency);
    }

    fn resolve_step(
        &mut self,
        dependency: &Dependency,
        source: &Path,
        flags: ResolveFlags,
        rescan_offered: &mut bool,
    ) -> Result<Step> {
        let key = dependency.key();
        if self.known_projects.contains(&key) {
            // Plugins built by the project itself do not exist yet when cleaning.
            if dependency.is_plugin()
                && self
                    .project_poms
                    .iter()
                    .any(|p| p.equals_ignore_version(dependency))
            {
                self.rules.get_mut(RuleKind::Clean).add(DependencyRule::new(
                    &dependency.group_id,
                    &dependency.artifact_id,
                    MAVEN_PLUGIN,
                    "*",
                )?);
            }
            if let Some(path) = self.repository.project_path(dependency) {
                debug!("{} is built from {}", dependency, path.display());
            }
            return Ok(Step::Resolved(dependency.clone()));
        }

        let management = flags.contains(ResolveFlags::MANAGEMENT);
        if self.ignored.contains(&key)
            || self.rules.get(RuleKind::Ignore).matches(dependency)
            || (management && self.repository.is_default_plugin(dependency))
        {
            return Ok(Step::Dropped);
        }

        if flags.contains(ResolveFlags::PARENT) && dependency.is_super_pom() {
            return Ok(Step::Resolved(dependency.clone()));
        }

        let location = self.config.relative_path(source);
        match dependency.scope() {
            Some(scope) => info!("Resolving {} of scope {}...", dependency, scope),
            None => info!("Resolving {}...", dependency),
        }

        if self.ignore_questions.ask_ignore_unnecessary_dependency(
            self.prompt.as_mut(),
            &location,
            dependency,
            self.options.run_tests,
            self.options.generate_javadoc,
        )? {
            self.ignore(dependency);
            return Ok(Step::Dropped);
        }

        let mut dependency = dependency.clone();
        let mut candidate = self.find_candidate(&mut dependency, source, &location);
        if candidate.is_none() && management {
            info!("[skipped dependency or plugin management] {}", dependency);
            return Ok(Step::Dropped);
        }
        if candidate.is_none() {
            candidate = self.find_bundle(&mut dependency)?;
        }

        match candidate {
            Some(candidate) => Ok(self.accept(candidate, &dependency, source, &location, flags)),
            None => self.escalate(dependency, source, &location, flags, rescan_offered),
        }
    }

    /// Exact lookup, then the version pinned by management, published rules
    /// of other versions, best-guess versions, and any version of a plugin.
    fn find_candidate(
        &mut self,
        dependency: &mut Dependency,
        source: &Path,
        location: &str,
    ) -> Option<Arc<ProjectInfo>> {
        let mut candidate = self.repository.search_matching_pom(dependency);

        if candidate.is_none() && dependency.version().is_none() {
            let managed = self
                .descriptors
                .get(source)
                .and_then(|pom| self.repository.version_from_management(pom, dependency));
            match managed {
                Some(version) => {
                    dependency.set_version(Some(version));
                    candidate = self.repository.search_matching_pom(dependency);
                }
                None => {
                    println!(
                        "In {location}, cannot find the version for dependency {dependency} from this descriptor or its parents"
                    );
                    if self.pom_list.options(source).no_parent {
                        println!(
                            "{} Option --no-parent has been set for {}, maybe it was not a good idea and you should first package its parent",
                            "[warning]".yellow(),
                            location
                        );
                    }
                }
            }
        }

        if candidate.is_none() && dependency.version().is_some() {
            candidate = self.search_with_published_rules(dependency);
        }

        if candidate.is_none() && dependency.version().is_none() {
            for major in 0..10 {
                let guess = format!("{major}.0");
                let guessed = dependency.clone().with_version(Some(&guess));
                if let Some(found) = self.repository.search_matching_pom(&guessed) {
                    println!(
                        "Use best guess version: {} for {}",
                        guess,
                        dependency.short_name()
                    );
                    *dependency = guessed;
                    candidate = Some(found);
                    break;
                }
            }
        }

        if candidate.is_none() && dependency.is_plugin() {
            let matching = self.repository.search_matching_poms_ignore_version(dependency);
            if matching.len() > 1 {
                self.issues.push(format!(
                    "{location}: More than one version matches the plugin {}:{}:{}",
                    dependency.group_id,
                    dependency.artifact_id,
                    dependency.version().unwrap_or("?")
                ));
            }
            candidate = matching.into_iter().next();
        }

        candidate
    }

    /// Another version of the artifact whose own published rule rewrites the
    /// dependency to exactly its coordinate.
    fn search_with_published_rules(&mut self, dependency: &Dependency) -> Option<Arc<ProjectInfo>> {
        for candidate in self.repository.search_matching_poms_ignore_version(dependency) {
            let rule = candidate
                .published_rules
                .iter()
                .find(|rule| rule.matches(dependency) && rule.apply(dependency) == candidate.this_pom)
                .cloned();
            if let Some(rule) = rule {
                self.rules.get_mut(RuleKind::Resolution).add(rule);
                return Some(candidate);
            }
        }
        None
    }

    /// Libraries that became OSGi bundles are installed with the bundle type.
    fn find_bundle(&mut self, dependency: &mut Dependency) -> Result<Option<Arc<ProjectInfo>>> {
        if !dependency.is_jar() {
            return Ok(None);
        }
        debug!("Checking {} with bundle type", dependency);
        let bundle = dependency.clone().with_type(BUNDLE);
        let found = match self.repository.search_matching_pom(&bundle) {
            Some(found) => Some(found),
            None if bundle.version().is_some() => self.search_with_published_rules(&bundle),
            None => None,
        };
        let Some(candidate) = found else {
            return Ok(None);
        };

        let version_rule = candidate
            .published_rules
            .iter()
            .find(|rule| {
                rule.matches_and_preserves_group_artifact_and_type(&bundle)
                    || (rule.matches(dependency) && rule.apply(dependency).is_bundle())
            })
            .map(|rule| rule.version_rule().clone())
            .unwrap_or_else(Rule::any);
        self.rules
            .get_mut(RuleKind::Resolution)
            .add(DependencyRule::with_version_rule(
                &candidate.this_pom.group_id,
                &candidate.this_pom.artifact_id,
                "s/jar/bundle/",
                version_rule,
            )?);
        *dependency = bundle;
        Ok(Some(candidate))
    }

    fn accept(
        &mut self,
        candidate: Arc<ProjectInfo>,
        dependency: &Dependency,
        source: &Path,
        location: &str,
        flags: ResolveFlags,
    ) -> Step {
        let package = self.package_of(&candidate, location);
        if let Some(package) = package
            .as_ref()
            .filter(|p| p.package != self.config.package_name)
        {
            let constrained = match candidate.original_version() {
                Some(original) if candidate.has_package_version() => {
                    let version = match dependency.version() {
                        Some(v) if compare_versions(v, original) != Ordering::Greater => v,
                        _ => original,
                    };
                    DebianDependency::with_min_version(package.package.clone(), version)
                }
                _ => package.clone(),
            };
            if let Some(bucket) = classify(dependency, flags) {
                self.dependencies.add(bucket, constrained.clone());
            }
            self.origins.insert(constrained, dependency.clone());
        }

        self.rules
            .get_mut(RuleKind::Resolution)
            .add_all(candidate.published_rules.iter());

        match &package {
            Some(package) => info!("Dependency {} found in package {}", dependency, package),
            None => info!("Dependency {} found, owning package unknown", dependency),
        }

        if flags.contains(ResolveFlags::PARENT) {
            if let Some(pom) = self.descriptors.get_mut(source) {
                pom.parent_pom = Some(Arc::clone(&candidate));
            }
        }
        Step::Resolved(candidate.this_pom.clone())
    }

    fn package_of(&mut self, candidate: &ProjectInfo, location: &str) -> Option<DebianDependency> {
        if let Some(name) = candidate.package_name() {
            return Some(DebianDependency::new(name));
        }
        let pom = &candidate.this_pom;
        let version = pom.version().unwrap_or_default();
        self.issues.push(format!(
            "{location}: Dependency is missing the Debian properties in its descriptor: {}:{}:{}",
            pom.group_id, pom.artifact_id, version
        ));
        let path = self.config.repository_descriptor_path(
            &pom.group_id,
            &pom.artifact_id,
            version,
            self.reader.repository_extension(),
        );
        self.scanner.find_package_providing_file(&path)
    }

    /// Nothing automatic found the dependency: drop it, hint at a package to
    /// install, take a rule from the operator, or rescan and retry.
    fn escalate(
        &mut self,
        dependency: Dependency,
        source: &Path,
        location: &str,
        flags: ResolveFlags,
        rescan_offered: &mut bool,
    ) -> Result<Step> {
        if flags.contains(ResolveFlags::PARENT)
            && self.ignore_questions.ask_ignore_dependency(
                self.prompt.as_mut(),
                location,
                &dependency,
                "The parent descriptor cannot be found in the Maven repository for Debian. Ignore it?",
            )?
        {
            self.pom_list.options_mut(source).no_parent = true;
            info!("[no-parent] {}", location);
            return Ok(Step::Dropped);
        }

        let mut drop = self
            .ignore_questions
            .ask_ignore_doc_or_report_plugin(location, &dependency);
        if !drop {
            match self.ignore_questions.ask_ignore_needed_dependency(
                self.prompt.as_mut(),
                location,
                &dependency,
            )? {
                None => drop = true,
                Some(issue) => self.issues.push(issue),
            }
        }
        if drop {
            self.ignore(&dependency);
            return Ok(Step::Dropped);
        }

        let package = self.scanner.find_package_with_descriptor(&dependency);
        if let Some(package) = &package {
            match self.scanner.installed_version(package, true) {
                Some(installed) => {
                    println!(
                        "{} Package {} ({}) is already installed and contains a possible match,",
                        "[error]".red(),
                        package,
                        installed
                    );
                    println!("but I cannot resolve library {dependency} in it.");
                    println!(
                        "{} Please check manually that the library is up to date, otherwise it may be necessary to package version {} in Debian.",
                        "[error]".red(),
                        dependency.version().unwrap_or("?")
                    );
                }
                None => {
                    println!(
                        "{} Please install the missing dependency. Run the following command in another terminal:",
                        "[warning]".yellow()
                    );
                    println!("  sudo apt-get install {package}");
                }
            }
        }

        if self.options.interactive && package.is_none() {
            if let Some(next) = self.ask_substitution(&dependency)? {
                return Ok(Step::Retry(next));
            }
        }

        if self.options.interactive && !*rescan_offered {
            *rescan_offered = true;
            if self.prompt.confirm("Try again to resolve the dependency?", true)? {
                self.rescan()?;
                self.scanner = self.scanner.fresh();
                return Ok(Step::Retry(dependency));
            }
        }

        Err(DebsolveError::DependencyNotFound {
            dependency: dependency.to_string(),
            pom: location.to_string(),
        })
    }

    fn rescan(&mut self) -> Result<()> {
        println!("Rescanning {}...", self.repository.root().display());
        self.repository.scan(self.reader.as_ref())?;
        Ok(())
    }

    fn ask_substitution(&mut self, dependency: &Dependency) -> Result<Option<Dependency>> {
        if let Some(package) = self.scanner.find_package_with_jar(dependency) {
            let question = format!(
                "[error] Package {package} does not contain Maven dependency {dependency} but there seems to be a match\n\
                 If the package already contains Maven artifacts but the names don't match, try to enter a substitution rule\n\
                 of the form {RULE_FORM} here:"
            );
            let Some(rule) = self.ask_rule(&question)? else {
                return Ok(None);
            };
            let rewritten = rewrite(&rule, dependency);
            self.rules.get_mut(RuleKind::Resolution).add(rule);
            println!(
                "Please suggest the maintainer of package {package} to add this rule to debian/{}",
                RuleKind::Published.file_name()
            );
            return Ok(Some(rewritten));
        }

        let mut question = format!(
            "[error] Cannot resolve Maven dependency {dependency}. If you know a package that contains a compatible dependency,\n\
             try to enter a substitution rule of the form {RULE_FORM} here:"
        );
        loop {
            let Some(rule) = self.ask_rule(&question)? else {
                return Ok(None);
            };
            let rewritten = rewrite(&rule, dependency);
            if rewritten == *dependency {
                question = format!(
                    "Your rule doesn't seem to apply on {dependency}.\n\
                     Please enter a substitution rule of the form {RULE_FORM} here, or press <Enter> to give up"
                );
                continue;
            }
            self.rules.get_mut(RuleKind::Resolution).add(rule);
            self.rescan()?;
            return Ok(Some(rewritten));
        }
    }

    /// `None` on empty input; a malformed rule is asked again.
    fn ask_rule(&mut self, question: &str) -> Result<Option<DependencyRule>> {
        let mut question = question.to_string();
        loop {
            let answer = self.prompt.input(&question, None)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match DependencyRule::parse(&answer) {
                Ok(rule) => return Ok(Some(rule)),
                Err(e) => {
                    println!("{} {}", "[error]".red(), e);
                    question = format!(
                        "Please enter a rule of the form {RULE_FORM}, or press <Enter> to give up"
                    );
                }
            }
        }
    }

    pub fn save_rules_and_poms(&self) -> Result<()> {
        self.pom_list.save()?;
        self.rules.save(&self.config.output_dir())
    }

    /// Merges the dependency buckets and the upstream version into the
    /// package's substvars file.
    pub fn save_substvars(&mut self) -> Result<()> {
        if self.options.generate_javadoc {
            println!("Checking dependencies for documentation packages...");
            self.dependencies.add(
                DependencyBucket::DocRuntime,
                DebianDependency::new("default-jdk-doc"),
            );
            let runtime = self.scanner.doc_dependencies(
                self.dependencies.get(DependencyBucket::Runtime),
                &self.origins,
            );
            self.dependencies
                .add_all(DependencyBucket::DocRuntime, runtime);
            let optional = self.scanner.doc_dependencies(
                self.dependencies.get(DependencyBucket::Optional),
                &self.origins,
            );
            self.dependencies
                .add_all(DependencyBucket::DocOptional, optional);
        }

        let mut vars = BTreeMap::new();
        self.dependencies.put_in_properties(&mut vars);
        if let Some(version) = &self.package_version {
            vars.insert(UPSTREAM_VERSION_KEY.to_string(), version.clone());
        }
        substvars::merge(&self.config.substvars_path(), &vars)
    }
}

/// Applies the rule when it matches, as rules read from files would be.
fn rewrite(rule: &DependencyRule, dependency: &Dependency) -> Dependency {
    if rule.matches(dependency) {
        rule.apply(dependency)
    } else {
        dependency.clone()
    }
}
