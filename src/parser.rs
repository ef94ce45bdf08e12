//! Token verification
//!
//! The [`Parser`] is configured once and can be shared across threads to
//! verify any number of tokens. Each call walks the same stages:
//!
//! 1. Split the compact text and decode the three Base64URL segments
//! 2. Parse the header as a JSON object
//! 3. Decode the claims
//! 4. Read a string `alg`, check it against the [`AlgorithmPolicy`] and look
//!    up the method
//! 5. Ask the caller's resolver for the key
//! 6. Authenticate the signature over the original signing input
//! 7. Validate the claims against the configured clock
//!
//! A failure at stage 5 or later returns the unverified token inside the
//! [`Rejection`] so callers can inspect why it was refused.

use crate::algorithm::{AlgorithmPolicy, MethodRegistry, SigningMethod};
use crate::claims::{Claims, MapClaims, NumberDecoding, TimeClaim, unix_seconds};
use crate::codec::{self, Padding};
use crate::error::{BoxError, ClaimError, ClaimViolations, Error, ErrorKind, Result};
use crate::keys::Key;
use crate::token::{Header, Token};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Time source for claims validation
pub type Clock = Arc<dyn Fn() -> SystemTime + Send + Sync + 'static>;

/// JWT parser
///
/// The allow-list is mandatory: [`Parser::new`] is the only way to get one.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::*;
///
/// let parser = Parser::new(AlgorithmPolicy::hs256_only())
///     .leeway(30)
///     .require(TimeClaim::Expiration)
///     .build();
///
/// let token = parser.parse(compact, |_token| Ok(Key::symmetric("secret")))?;
/// assert!(token.is_verified());
/// ```
#[derive(Clone)]
pub struct Parser {
    config_algorithms: AlgorithmPolicy,
    config_registry: MethodRegistry,
    config_numbers: NumberDecoding,
    config_padding: Padding,
    config_leeway: u64,
    config_required: Vec<TimeClaim>,
    config_skip_claims: bool,
    config_clock: Clock,
}

impl Parser {
    /// Create a parser that accepts only the algorithms in `policy`
    pub fn new(policy: AlgorithmPolicy) -> Self {
        Self {
            config_algorithms: policy,
            config_registry: MethodRegistry::default(),
            config_numbers: NumberDecoding::default(),
            config_padding: Padding::default(),
            config_leeway: 0,
            config_required: Vec::new(),
            config_skip_claims: false,
            config_clock: Arc::new(SystemTime::now),
        }
    }

    /// Replace the algorithm policy
    pub fn algorithms(&mut self, policy: AlgorithmPolicy) -> &mut Self {
        self.config_algorithms = policy;
        self
    }

    /// Replace the method registry
    pub fn registry(&mut self, registry: MethodRegistry) -> &mut Self {
        self.config_registry = registry;
        self
    }

    /// Add or replace a single signing method
    ///
    /// The method is only reachable if the policy also allows its identifier.
    pub fn register(&mut self, method: impl SigningMethod + 'static) -> &mut Self {
        self.config_registry.register(method);
        self
    }

    /// Configure how numbers in the claims are decoded
    pub fn number_decoding(&mut self, numbers: NumberDecoding) -> &mut Self {
        self.config_numbers = numbers;
        self
    }

    /// Configure how Base64URL segments are decoded
    pub fn padding(&mut self, padding: Padding) -> &mut Self {
        self.config_padding = padding;
        self
    }

    /// Clock skew tolerance in seconds for `exp`, `nbf` and `iat` (default: 0)
    pub fn leeway(&mut self, seconds: u64) -> &mut Self {
        self.config_leeway = seconds;
        self
    }

    /// Reject tokens that do not carry `claim`
    pub fn require(&mut self, claim: TimeClaim) -> &mut Self {
        if !self.config_required.contains(&claim) {
            self.config_required.push(claim);
        }
        self
    }

    /// Skip claims validation entirely
    ///
    /// Signatures are still authenticated. Use only when the caller validates
    /// the claims itself.
    pub fn without_claims_validation(&mut self) -> &mut Self {
        self.config_skip_claims = true;
        self
    }

    /// Configure the time source used for claims validation
    pub fn clock<F>(&mut self, clock: F) -> &mut Self
    where
        F: Fn() -> SystemTime + Send + Sync + 'static,
    {
        self.config_clock = Arc::new(clock);
        self
    }

    /// Finish configuration
    pub fn build(&mut self) -> Self {
        self.clone()
    }

    /// The configured algorithm policy
    pub fn policy(&self) -> &AlgorithmPolicy {
        &self.config_algorithms
    }
}

impl Parser {
    /// Parse and verify a token with [`MapClaims`]
    pub fn parse<F>(
        &self,
        token: &str,
        resolve_key: F,
    ) -> std::result::Result<Token<MapClaims>, Rejection<MapClaims>>
    where
        F: FnOnce(&Token<MapClaims>) -> std::result::Result<Key, BoxError>,
    {
        self.parse_with_claims(token, resolve_key)
    }

    /// Parse and verify a token with a caller-chosen claims type
    ///
    /// `resolve_key` is called exactly once, with the unverified token, after
    /// the algorithm passed the policy.
    pub fn parse_with_claims<C, F>(
        &self,
        token: &str,
        resolve_key: F,
    ) -> std::result::Result<Token<C>, Rejection<C>>
    where
        C: Claims,
        F: FnOnce(&Token<C>) -> std::result::Result<Key, BoxError>,
    {
        // 1-4. Decode segments, header and claims, then resolve the method
        let (mut parsed, signing_input) = self.decode::<C>(token).map_err(Rejection::new)?;

        // 5. Resolve the verification key
        let key = match resolve_key(&parsed) {
            Ok(key) => key,
            Err(source) => return Err(Rejection::with_token(Error::KeyResolution(source), parsed)),
        };
        tracing::trace!(alg = parsed.method().alg(), "key resolved");

        // 6. Authenticate the signature
        let signature = parsed.signature().unwrap_or_default();
        if let Err(error) = parsed.method().verify(signing_input, signature, &key) {
            return Err(Rejection::with_token(error, parsed));
        }
        tracing::trace!(alg = parsed.method().alg(), "signature authenticated");

        // 7. Validate claims
        if !self.config_skip_claims {
            let now = unix_seconds((self.config_clock)());
            if let Err(violations) = self.validate_claims(parsed.claims(), now) {
                return Err(Rejection::with_token(Error::ClaimsInvalid(violations), parsed));
            }
            tracing::trace!(now, leeway = self.config_leeway, "claims validated");
        }

        parsed.mark_verified();
        tracing::debug!(alg = parsed.method().alg(), "token verified");

        Ok(parsed)
    }

    /// Decode a token and resolve its method without authenticating it
    ///
    /// The algorithm policy still applies. The returned token is never marked
    /// verified; its claims must not be trusted.
    pub fn parse_unverified<C: Claims>(&self, token: &str) -> Result<Token<C>> {
        self.decode(token).map(|(parsed, _)| parsed)
    }

    fn decode<'a, C: Claims>(&self, token: &'a str) -> Result<(Token<C>, &'a str)> {
        // 1. Split and decode segments
        let segments = codec::decode(token, self.config_padding)?;

        // 2. Parse header
        let header: Map<String, Value> = serde_json::from_slice(&segments.header)
            .map_err(|e| Error::Malformed(format!("header is not a JSON object: {e}")))?;
        let header = Header::from(header);

        // 3. Parse claims
        let claims = C::decode(&segments.payload, self.config_numbers)
            .map_err(|e| Error::Malformed(format!("claims are not valid JSON: {e}")))?;

        // 4. Resolve the method, checking the policy before the registry
        let alg = match header.get("alg") {
            Some(Value::String(alg)) => alg.clone(),
            Some(other) => return Err(Error::AlgorithmUnsupported(other.to_string())),
            None => return Err(Error::AlgorithmUnsupported("(missing)".into())),
        };
        self.config_algorithms.validate(&alg)?;
        let method = self
            .config_registry
            .get(&alg)
            .ok_or_else(|| Error::AlgorithmUnsupported(alg.clone()))?;
        tracing::trace!(alg = %alg, "method resolved");

        let parsed = Token::parsed(token, method, header, claims, segments.signature);
        Ok((parsed, segments.signing_input))
    }

    fn validate_claims<C: Claims>(
        &self,
        claims: &C,
        now: i64,
    ) -> std::result::Result<(), ClaimViolations> {
        let mut violations = ClaimViolations::new();

        for claim in &self.config_required {
            if matches!(claim.read(claims), Ok(None)) {
                violations.push(ClaimError::Missing(claim.name().to_string()));
            }
        }

        if let Err(found) = claims.validate(now, self.config_leeway) {
            violations.extend(found);
        }

        violations.into_result()
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("algorithms", &self.config_algorithms)
            .field("registry", &self.config_registry)
            .field("numbers", &self.config_numbers)
            .field("padding", &self.config_padding)
            .field("leeway", &self.config_leeway)
            .field("required", &self.config_required)
            .field("skip_claims", &self.config_skip_claims)
            .finish_non_exhaustive()
    }
}

/// A refused token
///
/// Carries the [`Error`] and, when the failure happened after the method was
/// resolved (key resolution, signature, or claims), the unverified token.
/// Converts into [`Error`] with `?`.
pub struct Rejection<C> {
    error: Error,
    token: Option<Token<C>>,
}

impl<C> Rejection<C> {
    pub(crate) fn new(error: Error) -> Self {
        Self { error, token: None }
    }

    fn with_token(error: Error, token: Token<C>) -> Self {
        Self {
            error,
            token: Some(token),
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// The unverified token, if decoding got that far
    pub fn token(&self) -> Option<&Token<C>> {
        self.token.as_ref()
    }

    pub fn into_error(self) -> Error {
        self.error
    }

    pub fn into_parts(self) -> (Error, Option<Token<C>>) {
        (self.error, self.token)
    }
}

impl<C> From<Rejection<C>> for Error {
    fn from(rejection: Rejection<C>) -> Self {
        rejection.error
    }
}

impl<C> fmt::Debug for Rejection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejection")
            .field("error", &self.error)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl<C> fmt::Display for Rejection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<C> std::error::Error for Rejection<C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}
