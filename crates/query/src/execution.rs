//! Runs a compiled query against a root value.
//!
//! One execution owns one bindings table, threaded through every part in
//! chain order. Parts never fail at run time: problems are logged and the
//! part contributes whatever its pipeline still produced.
use crate::chain::Chain;
use crate::config::ExecutionConfig;
use crate::part::QueryPart;
use crate::query::Query;
use crate::result::QueryResult;
use crate::scheme::Scheme;
use quarry_selector::{SelectorContext, is_empty_result, parse_selector};
use quarry_source::HtmlFragmentParser;
use quarry_traits::{MarkupParser, ScriptEngine};
use quarry_transform::{Phase, Pipeline, TransformContext};
use quarry_types::{Bindings, Value};
use quarry_vars::resolve;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

static DEFAULT_MARKUP: HtmlFragmentParser = HtmlFragmentParser;

/// A configured run of a [`Query`].
///
/// ```ignore
/// let result = Execution::new(&query)
///     .with_variables([("page", 2i64)])
///     .run(&root);
/// ```
pub struct Execution<'q, 'e> {
    query: &'q Query,
    bindings: Bindings,
    script: Option<&'e mut (dyn ScriptEngine + 'e)>,
    markup: &'e dyn MarkupParser,
    config: ExecutionConfig,
}

/// What the preceding part added to the accumulated entries.
#[derive(Debug, Clone, Copy)]
struct Contribution {
    start: usize,
    required: Option<bool>,
    ran: bool,
}

impl<'q, 'e> Execution<'q, 'e> {
    pub fn new(query: &'q Query) -> Self {
        Self {
            query,
            bindings: Bindings::new(),
            script: None,
            markup: &DEFAULT_MARKUP,
            config: ExecutionConfig::default(),
        }
    }

    /// Seeds the bindings table.
    pub fn with_variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.bindings.extend(variables);
        self
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Enables `jseval`. The engine is reset once when the run starts.
    pub fn with_script_engine(mut self, engine: &'e mut (dyn ScriptEngine + 'e)) -> Self {
        self.script = Some(engine);
        self
    }

    /// Replaces the parser used when an HTML selector receives a string.
    pub fn with_markup_parser(mut self, parser: &'e dyn MarkupParser) -> Self {
        self.markup = parser;
        self
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn run(mut self, root: &Value) -> QueryResult {
        if let Some(engine) = self.script.as_deref_mut() {
            engine.reset();
        }
        let page_url = self
            .config
            .source_url
            .clone()
            .or_else(|| root.as_node().map(|node| node.source_url()))
            .unwrap_or_default();

        let query = self.query;
        let mut entries: Vec<Value> = Vec::new();
        let mut previous: Option<Contribution> = None;

        for link in query.links() {
            let part = &link.part;
            let mut start = entries.len();
            let ran = match link.operator {
                None | Some(Chain::Append) => {
                    let out = self.evaluate_part(part, root, &page_url);
                    entries.extend(out);
                    true
                }
                Some(Chain::Fallback) => {
                    let forced = previous.is_some_and(|p| p.ran && p.required == Some(true));
                    if forced || is_empty_result(&entries) {
                        let out = self.evaluate_part(part, root, &page_url);
                        entries.extend(out);
                        true
                    } else {
                        log::debug!("skipping fallback '{}': results already present", part.path());
                        false
                    }
                }
                Some(chain) => match previous {
                    Some(p) if p.ran => {
                        let consumed: Vec<Value> = entries
                            .drain(p.start..)
                            .map(Value::unwrap_discarded)
                            .collect();
                        start = p.start;
                        let out: Vec<Value> = if chain == Chain::ArrayPipe {
                            consumed
                                .iter()
                                .flat_map(|element| self.evaluate_part(part, element, &page_url))
                                .collect()
                        } else {
                            self.evaluate_part(part, &Value::from_matches(consumed), &page_url)
                        };
                        entries.extend(out);
                        true
                    }
                    _ => {
                        log::debug!("skipping '{}' pipe: nothing ran before it", chain);
                        false
                    }
                },
            };
            previous = Some(Contribution {
                start,
                required: part.required(),
                ran,
            });
        }

        QueryResult::new(entries, self.config.join_separator, self.bindings)
    }

    fn evaluate_part(&mut self, part: &QueryPart, input: &Value, page_url: &str) -> Vec<Value> {
        let value = self.produce(part, input, page_url);

        let resolved;
        let pipeline = match part.cached_pipeline() {
            Some(pipeline) => pipeline,
            None => {
                resolved = self.resolve_pipeline(part);
                &resolved
            }
        };

        let mut ctx = TransformContext::new(&mut self.bindings, page_url);
        if let Some(engine) = self.script.as_deref_mut() {
            ctx = ctx.with_script(engine);
        }
        let results = pipeline.run(value, &mut ctx).into_results();
        log::debug!("{} part '{}' produced {} entries", part.scheme(), part.path(), results.len());
        results
    }

    /// The value a part hands to its pipeline.
    fn produce(&self, part: &QueryPart, input: &Value, page_url: &str) -> Value {
        match part.scheme() {
            Scheme::Html | Scheme::Json => {
                let ctx = SelectorContext::new(page_url).with_markup(self.markup);
                let matches = match part.cached_selector() {
                    Some(selector) => selector.evaluate(input, &ctx),
                    None => {
                        let path = resolve(part.path(), &self.bindings);
                        let flavor = part.scheme().flavor().unwrap_or_default();
                        match parse_selector(&path, flavor) {
                            Ok(selector) => selector.evaluate(input, &ctx),
                            Err(e) => {
                                log::warn!("resolved selector '{}' is invalid: {}", path, e);
                                Vec::new()
                            }
                        }
                    }
                };
                Value::from_matches(matches)
            }
            Scheme::Url => {
                let path = resolve(part.path(), &self.bindings);
                let params: BTreeMap<&str, Vec<String>> = part
                    .params()
                    .iter()
                    .map(|(key, values)| {
                        let values = values
                            .iter()
                            .map(|v| resolve(v, &self.bindings).into_owned())
                            .collect();
                        (key.as_str(), values)
                    })
                    .collect();
                build_url(&path, &params, page_url)
            }
            Scheme::Template => Value::String(resolve(part.path(), &self.bindings).into_owned()),
        }
    }

    fn resolve_pipeline(&self, part: &QueryPart) -> Pipeline {
        let raw: BTreeMap<Phase, Vec<String>> = part
            .directives()
            .iter()
            .map(|(phase, texts)| {
                let texts = texts
                    .iter()
                    .map(|text| resolve(text, &self.bindings).into_owned())
                    .collect();
                (*phase, texts)
            })
            .collect();
        Pipeline::parse(&raw).unwrap_or_else(|e| {
            log::warn!("resolved directives of '{}' are invalid: {}", part.path(), e);
            Pipeline::new()
        })
    }
}

impl fmt::Debug for Execution<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execution")
            .field("query", &self.query.text())
            .field("bindings", &self.bindings.len())
            .field("script", &self.script.is_some())
            .field("markup", &self.markup)
            .field("config", &self.config)
            .finish()
    }
}

/// Resolves `path` against the page URL and appends the parameters.
fn build_url(path: &str, params: &BTreeMap<&str, Vec<String>>, page_url: &str) -> Value {
    let joined = Url::parse(page_url)
        .and_then(|base| base.join(path))
        .or_else(|_| Url::parse(path));
    match joined {
        Ok(mut url) => {
            if !params.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (key, values) in params {
                    for value in values {
                        pairs.append_pair(key, value);
                    }
                }
            }
            Value::String(url.into())
        }
        Err(e) => {
            log::warn!("cannot build a URL from '{}' against '{}': {}", path, page_url, e);
            Value::Null
        }
    }
}
