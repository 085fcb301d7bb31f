// debsolve-common/src/model/debian.rs
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A Debian package, optionally with a minimum version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DebianDependency {
    pub package: String,
    pub min_version: Option<String>,
}

impl DebianDependency {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            min_version: None,
        }
    }

    pub fn with_min_version(package: impl Into<String>, version: &str) -> Self {
        Self {
            package: package.into(),
            min_version: Some(version.to_string()),
        }
    }
}

impl fmt::Display for DebianDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min_version {
            Some(version) => write!(f, "{} (>= {})", self.package, version),
            None => f.write_str(&self.package),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyBucket {
    Compile,
    Runtime,
    Test,
    Optional,
    DocRuntime,
    DocOptional,
}

impl DependencyBucket {
    pub const ALL: [DependencyBucket; 6] = [
        DependencyBucket::Compile,
        DependencyBucket::Runtime,
        DependencyBucket::Test,
        DependencyBucket::Optional,
        DependencyBucket::DocRuntime,
        DependencyBucket::DocOptional,
    ];

    pub fn property_key(self) -> &'static str {
        match self {
            DependencyBucket::Compile => "maven.CompileDepends",
            DependencyBucket::Runtime => "maven.Depends",
            DependencyBucket::Test => "maven.TestDepends",
            DependencyBucket::Optional => "maven.OptionalDepends",
            DependencyBucket::DocRuntime => "maven.DocDepends",
            DependencyBucket::DocOptional => "maven.DocOptionalDepends",
        }
    }
}

impl fmt::Display for DependencyBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyBucket::Compile => "compile",
            DependencyBucket::Runtime => "runtime",
            DependencyBucket::Test => "test",
            DependencyBucket::Optional => "optional",
            DependencyBucket::DocRuntime => "doc-runtime",
            DependencyBucket::DocOptional => "doc-optional",
        };
        f.write_str(name)
    }
}

/// Debian packages required by the package being built, per bucket.
#[derive(Debug, Clone, Default)]
pub struct DebianDependencies {
    buckets: BTreeMap<DependencyBucket, Vec<DebianDependency>>,
}

impl DebianDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package to a bucket. A package appears at most once per bucket,
    /// carrying the highest minimum version seen for it.
    pub fn add(&mut self, bucket: DependencyBucket, dependency: DebianDependency) {
        let entries = self.buckets.entry(bucket).or_default();
        match entries
            .iter_mut()
            .find(|existing| existing.package == dependency.package)
        {
            Some(existing) => {
                if stronger(&dependency.min_version, &existing.min_version) {
                    existing.min_version = dependency.min_version;
                }
            }
            None => entries.push(dependency),
        }
    }

    pub fn add_all(
        &mut self,
        bucket: DependencyBucket,
        dependencies: impl IntoIterator<Item = DebianDependency>,
    ) {
        for dependency in dependencies {
            self.add(bucket, dependency);
        }
    }

    pub fn get(&self, bucket: DependencyBucket) -> &[DebianDependency] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// One comma-joined entry per bucket, sorted by package name.
    pub fn put_in_properties(&self, properties: &mut BTreeMap<String, String>) {
        for bucket in DependencyBucket::ALL {
            let mut entries: Vec<&DebianDependency> = self.get(bucket).iter().collect();
            entries.sort_by(|a, b| a.package.cmp(&b.package));
            let value = entries
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            properties.insert(bucket.property_key().to_string(), value);
        }
    }
}

fn stronger(candidate: &Option<String>, current: &Option<String>) -> bool {
    match (candidate, current) {
        (Some(_), None) => true,
        (Some(c), Some(e)) => compare_versions(c, e) == Ordering::Greater,
        _ => false,
    }
}

/// Orders version strings by comparing runs of digits numerically and
/// everything else lexically; `~` sorts before anything, even the end.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (Some('~'), Some('~')) => {
                left.next();
                right.next();
            }
            (Some('~'), _) => return Ordering::Less,
            (_, Some('~')) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_number(&mut left);
                let rn = take_number(&mut right);
                match ln.cmp(&rn) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            (Some(l), Some(r)) => {
                let order = match (l.is_ascii_digit(), r.is_ascii_digit()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => l.cmp(&r),
                };
                if order != Ordering::Equal {
                    return order;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value: u64 = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(u64::from(d));
        chars.next();
    }
    value
}
