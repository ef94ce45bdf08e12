//! Declarative parser configuration
//!
//! [`ParserConfig`] mirrors the [`Parser`] builder as a plain serde struct so
//! services can load it from their own configuration files.

use crate::algorithm::{AlgorithmPolicy, MethodRegistry};
use crate::claims::{NumberDecoding, TimeClaim};
use crate::codec::Padding;
use crate::error::{Error, Result};
use crate::parser::Parser;
use serde::Deserialize;

/// Parser settings
///
/// ```ignore
/// let config: ParserConfig = serde_json::from_str(r#"{
///     "allowed_algorithms": ["RS256", "ES256"],
///     "leeway_seconds": 30,
///     "required_claims": ["exp"]
/// }"#)?;
/// let parser = Parser::from_config(&config)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Algorithm identifiers the parser accepts. Required and non-empty.
    pub allowed_algorithms: Vec<String>,

    /// Keep numbers in the claims at their exact decimal value (default: false)
    #[serde(default)]
    pub strict_number_decoding: bool,

    /// Authenticate signatures but skip claims validation (default: false)
    #[serde(default)]
    pub skip_claims_validation: bool,

    /// Clock skew tolerance in seconds (default: 0)
    #[serde(default)]
    pub leeway_seconds: u64,

    /// Base64URL padding mode, "strict" or "lenient" (default: "strict")
    #[serde(default)]
    pub padding: Padding,

    /// Time claims that must be present: any of "exp", "nbf", "iat" (default: none)
    #[serde(default)]
    pub required_claims: Vec<TimeClaim>,
}

impl ParserConfig {
    /// Configuration with the given algorithms and every other field at its default
    pub fn new<I, S>(allowed_algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_algorithms: allowed_algorithms.into_iter().map(Into::into).collect(),
            strict_number_decoding: false,
            skip_claims_validation: false,
            leeway_seconds: 0,
            padding: Padding::default(),
            required_claims: Vec::new(),
        }
    }
}

impl Parser {
    /// Build a parser from a [`ParserConfig`]
    ///
    /// Fails with [`Error::Configuration`] when the algorithm list is empty or
    /// names an algorithm the built-in registry does not know.
    pub fn from_config(config: &ParserConfig) -> Result<Parser> {
        if config.allowed_algorithms.is_empty() {
            return Err(Error::Configuration(
                "allowed_algorithms must not be empty".into(),
            ));
        }

        let registry = MethodRegistry::default();
        if let Some(unknown) = config
            .allowed_algorithms
            .iter()
            .find(|alg| !registry.contains(alg))
        {
            return Err(Error::Configuration(format!(
                "unknown algorithm '{unknown}'. Known: {:?}",
                registry.algorithms()
            )));
        }

        let mut parser = Parser::new(AlgorithmPolicy::allow_only(
            config.allowed_algorithms.iter().cloned(),
        ));
        parser
            .registry(registry)
            .leeway(config.leeway_seconds)
            .padding(config.padding)
            .number_decoding(if config.strict_number_decoding {
                NumberDecoding::Exact
            } else {
                NumberDecoding::Float
            });

        for claim in &config.required_claims {
            parser.require(*claim);
        }

        if config.skip_claims_validation {
            parser.without_claims_validation();
        }

        tracing::debug!(
            algorithms = ?config.allowed_algorithms,
            leeway = config.leeway_seconds,
            "parser configured"
        );

        Ok(parser)
    }
}
