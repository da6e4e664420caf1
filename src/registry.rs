//! Registry of disaggregation methods.
//!
//! Methods are looked up by `(variable, name)`. The process-wide
//! [`METHOD_REGISTRY`] is pre-populated with the built-in methods and accepts
//! additional runtime registrations; callers that need full control (or a
//! registry without the builtins) construct their own [`MethodRegistry`].
//!
//! # Thread Safety
//!
//! The registry uses `RwLock` for thread-safe access, so methods can be
//! registered from any thread before or between disaggregation runs.

use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use crate::errors::{DisaggError, DisaggResult};
use crate::methods::{evaporation, humidity, precipitation, radiation, temperature, wind, Method};
use crate::timeseries::Variable;

/// Lookup table from `(variable, method name)` to the method implementation.
pub struct MethodRegistry {
    methods: RwLock<HashMap<(Variable, String), Arc<dyn Method>>>,
}

impl MethodRegistry {
    /// Create a registry with no methods at all.
    pub fn empty() -> Self {
        Self {
            methods: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding every built-in method with its default
    /// parameters.
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        let builtins: Vec<Arc<dyn Method>> = vec![
            Arc::new(temperature::SineMinMax::default()),
            Arc::new(temperature::SunLocShift::default()),
            Arc::new(humidity::Equal),
            Arc::new(humidity::MinMax::default()),
            Arc::new(wind::Equal),
            Arc::new(wind::Cosine::default()),
            Arc::new(wind::Random::default()),
            Arc::new(radiation::PotRad),
            Arc::new(precipitation::Equal),
            Arc::new(precipitation::SingleBurst),
            Arc::new(evaporation::DaylightTrapezoid),
            Arc::new(evaporation::FixedProfile),
        ];
        for method in builtins {
            registry
                .register(method)
                .expect("Built-in method names collide");
        }
        registry
    }

    /// Register a method under the name its [`MethodSpec`](crate::methods::MethodSpec)
    /// declares.
    ///
    /// # Errors
    ///
    /// Returns [`DisaggError::DuplicateMethod`] if the `(variable, name)` pair
    /// is already taken.
    pub fn register(&self, method: Arc<dyn Method>) -> DisaggResult<()> {
        let spec = method.spec();
        let key = (spec.variable, spec.name.clone());

        let mut methods = self.methods.write().expect("Registry lock poisoned");
        if methods.contains_key(&key) {
            return Err(DisaggError::DuplicateMethod {
                variable: spec.variable,
                name: spec.name,
            });
        }
        trace!("registering method {}/{}", spec.variable, spec.name);
        methods.insert(key, method);
        Ok(())
    }

    /// Look up a method by variable and name.
    ///
    /// # Errors
    ///
    /// Returns [`DisaggError::UnknownMethod`] if nothing is registered under
    /// the pair.
    pub fn resolve(&self, variable: Variable, name: &str) -> DisaggResult<Arc<dyn Method>> {
        let methods = self.methods.read().expect("Registry lock poisoned");
        methods
            .get(&(variable, name.to_string()))
            .cloned()
            .ok_or_else(|| DisaggError::UnknownMethod {
                variable,
                method: name.to_string(),
            })
    }

    /// The method names registered for a variable, sorted for stable output.
    pub fn method_names(&self, variable: Variable) -> Vec<String> {
        let methods = self.methods.read().expect("Registry lock poisoned");
        let mut names: Vec<String> = methods
            .keys()
            .filter(|(v, _)| *v == variable)
            .map(|(_, n)| n.clone())
            .collect();
        names.sort();
        names
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// The process-wide registry, initialized with the built-in methods on first
/// use.
pub static METHOD_REGISTRY: LazyLock<MethodRegistry> = LazyLock::new(MethodRegistry::with_builtins);
