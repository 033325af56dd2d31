//! Per-file pipeline
//!
//! Parse, run every rule, print. Outcomes are cached under the file's path
//! and content, with the config fingerprint as variable key.

use std::path::Path;

use modernize_cache::{Cache, ContentHash};
use modernize_rules::{
    ArrayCallableMatch, ArrayCallableMethodMatcher, ClassCollector, NodeTypeResolver, Rector,
    StrStartsWithRector,
};
use modernize_syntax::{parse, SyntaxTree};
use modernize_types::{DetailedTypeAnalyzer, GenericClassStringTypeNormalizer, InMemoryReflectionProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ModernizeConfig;
use crate::error::{CoreError, CoreResult};
use crate::storage::AnyCacheStorage;

/// What processing one file produced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Whether the printed source differs from the input
    pub changed: bool,
    /// Rewritten source, only when changed
    pub new_source: Option<String>,
    /// Rules that rewrote at least one node, in run order
    pub applied_rules: Vec<String>,
    /// Total rewrites across all rules
    pub rewrites: usize,
    /// `Class::method` for every array callable found in the input
    pub array_callables: Vec<String>,
}

/// Outcome plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Processing outcome
    pub outcome: FileOutcome,
    /// `true` if served from the cache without parsing
    pub from_cache: bool,
}

/// Runs the rule set over single files
#[derive(Debug)]
pub struct FileProcessor {
    cache: Cache<AnyCacheStorage>,
    rectors: Vec<Box<dyn Rector>>,
    reflection: InMemoryReflectionProvider,
    too_detailed: DetailedTypeAnalyzer,
    variable_key: String,
}

impl FileProcessor {
    /// Create processor with the cache backend named by `config`
    ///
    /// # Errors
    /// Returns error if the config cannot be fingerprinted
    pub fn new(config: &ModernizeConfig) -> CoreResult<Self> {
        Self::with_cache(config, Cache::new(AnyCacheStorage::from_config(config)))
    }

    /// Create processor over an existing cache
    ///
    /// # Errors
    /// Returns error if the config cannot be fingerprinted
    pub fn with_cache(config: &ModernizeConfig, cache: Cache<AnyCacheStorage>) -> CoreResult<Self> {
        Ok(Self {
            cache,
            rectors: vec![Box::new(StrStartsWithRector::default())],
            reflection: InMemoryReflectionProvider::with_builtins(),
            too_detailed: config.detailed_type_analyzer(),
            variable_key: config.fingerprint()?,
        })
    }

    /// Add classes known beyond the processed file (builder)
    #[must_use]
    pub fn with_reflection(mut self, reflection: InMemoryReflectionProvider) -> Self {
        self.reflection.extend(reflection);
        self
    }

    /// Append a rule; rules run in insertion order (builder)
    #[must_use]
    pub fn with_rector(mut self, rector: impl Rector + 'static) -> Self {
        self.rectors.push(Box::new(rector));
        self
    }

    /// Result cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Cache<AnyCacheStorage> {
        &self.cache
    }

    /// Read and process a file from disk
    ///
    /// # Errors
    /// Returns error if the file cannot be read, see also [`Self::process`]
    pub fn process_path(&self, path: &Path) -> CoreResult<ProcessResult> {
        let source = std::fs::read_to_string(path).map_err(|e| CoreError::io_error(path, e))?;
        self.process(path, &source)
    }

    /// Process `source`, reusing a cached outcome when path, content and
    /// configuration are unchanged
    ///
    /// # Errors
    /// Returns error if the source does not parse or the outcome cannot be
    /// cached
    pub fn process(&self, path: &Path, source: &str) -> CoreResult<ProcessResult> {
        let key = cache_key(path, source);
        if let Some(outcome) = self.cache.load::<FileOutcome>(&key, &self.variable_key) {
            debug!(path = %path.display(), "reusing cached outcome");
            return Ok(ProcessResult {
                outcome,
                from_cache: true,
            });
        }

        let outcome = self.refactor(path, source)?;
        self.cache.save(&key, &self.variable_key, &outcome)?;
        if outcome.changed {
            info!(path = %path.display(), rewrites = outcome.rewrites, "file changed");
        }

        Ok(ProcessResult {
            outcome,
            from_cache: false,
        })
    }

    fn refactor(&self, path: &Path, source: &str) -> CoreResult<FileOutcome> {
        let mut tree = parse(source).map_err(|e| CoreError::parse(path, e))?;
        let array_callables = self.array_callables(&tree);

        let mut applied_rules = Vec::new();
        let mut rewrites = 0;
        for rector in &self.rectors {
            let count = rector.refactor(&mut tree);
            if count > 0 {
                applied_rules.push(rector.name().to_string());
                rewrites += count;
            }
        }

        let printed = tree.print();
        let changed = printed != source;
        Ok(FileOutcome {
            changed,
            new_source: changed.then_some(printed),
            applied_rules,
            rewrites,
            array_callables,
        })
    }

    fn array_callables(&self, tree: &SyntaxTree) -> Vec<String> {
        let mut collector = ClassCollector::with_provider(self.reflection.clone());
        collector.collect(tree);
        let reflection = collector.into_provider();

        let normalizer = GenericClassStringTypeNormalizer::with_detail_check(&reflection, self.too_detailed);
        let matcher = ArrayCallableMethodMatcher::new(NodeTypeResolver::with_normalizer(normalizer));

        tree.descendants(tree.root())
            .into_iter()
            .filter_map(|node| match matcher.match_array(tree, node)? {
                ArrayCallableMatch::Callable(callable) => {
                    Some(format!("{}::{}", callable.class_name(), callable.method_name()))
                }
                ArrayCallableMatch::Unknown => None,
            })
            .collect()
    }
}

fn cache_key(path: &Path, source: &str) -> String {
    format!("{}\n{}", path.display(), ContentHash::compute(source.as_bytes()))
}
