use crate::algorithm::{Ecdsa, EdDsa, Hmac, NoneMethod, Rsa, SigningMethod};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Mapping from algorithm identifier to signing method
///
/// The registry answers "which implementation handles `alg`". It does not
/// decide whether `alg` is acceptable; that is the job of
/// [`AlgorithmPolicy`](crate::AlgorithmPolicy), which the parser consults
/// first.
#[derive(Clone)]
pub struct MethodRegistry {
    methods: HashMap<&'static str, Arc<dyn SigningMethod>>,
}

impl MethodRegistry {
    /// A registry with no methods
    pub fn empty() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Add or replace a method, keyed by its [`alg`](SigningMethod::alg)
    pub fn register(&mut self, method: impl SigningMethod + 'static) -> &mut Self {
        self.register_shared(Arc::new(method))
    }

    /// Add or replace an already shared method
    pub fn register_shared(&mut self, method: Arc<dyn SigningMethod>) -> &mut Self {
        self.methods.insert(method.alg(), method);
        self
    }

    /// Look up a method by algorithm identifier
    pub fn get(&self, alg: &str) -> Option<Arc<dyn SigningMethod>> {
        self.methods.get(alg).cloned()
    }

    pub fn contains(&self, alg: &str) -> bool {
        self.methods.contains_key(alg)
    }

    /// Registered identifiers, sorted
    pub fn algorithms(&self) -> Vec<&'static str> {
        let mut algorithms: Vec<_> = self.methods.keys().copied().collect();
        algorithms.sort_unstable();
        algorithms
    }
}

impl Default for MethodRegistry {
    /// Every built-in method, including `none`
    fn default() -> Self {
        let mut registry = Self::empty();

        registry
            .register(Hmac::HS256)
            .register(Hmac::HS384)
            .register(Hmac::HS512)
            .register(Rsa::RS256)
            .register(Rsa::RS384)
            .register(Rsa::RS512)
            .register(Rsa::PS256)
            .register(Rsa::PS384)
            .register(Rsa::PS512)
            .register(Ecdsa::ES256)
            .register(Ecdsa::ES384)
            .register(Ecdsa::ES512)
            .register(EdDsa)
            .register(NoneMethod);

        registry
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("algorithms", &self.algorithms())
            .finish()
    }
}
