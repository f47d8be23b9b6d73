//! Typed parameter bag passed to registry entries.

use std::{collections::BTreeMap, time::Duration};

use crate::{
    budget::SearchBudget,
    convergence::IterationControl,
    error::{AlgorithmError, Result},
    graph::{AttributeValue, Graph, VertexId},
};

/// Parameters for one registry invocation.
///
/// Values are stored as [`AttributeValue`]s and interpreted by the typed
/// accessors, which reject values of the wrong shape with
/// [`AlgorithmError::InvalidParameter`]. Algorithms comparing two graphs
/// read the second one from [`AlgorithmConfig::pattern`].
///
/// # Examples
/// ```
/// use grafo_core::registry::AlgorithmConfig;
///
/// let config = AlgorithmConfig::new().with("k", 3).with("strategy", "dsatur");
/// assert_eq!(config.usize("k")?, Some(3));
/// assert_eq!(config.string("strategy")?, Some("dsatur"));
/// assert_eq!(config.f64("damping")?, None);
/// assert!(config.bool("k").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlgorithmConfig {
    params: BTreeMap<String, AttributeValue>,
    pattern: Option<Graph>,
}

fn mistyped(name: &str, expected: &str, value: &AttributeValue) -> AlgorithmError {
    AlgorithmError::invalid_parameter(name, format!("expected {expected}, got `{value}`"))
}

impl AlgorithmConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Attaches the second graph used by isomorphism and spectral distance.
    #[must_use]
    pub fn with_pattern(mut self, pattern: Graph) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Sets a parameter in place, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.params.insert(name.into(), value.into())
    }

    /// Returns `true` when the parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Raw value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.params.get(name)
    }

    /// Parameters in name order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The attached pattern graph, if any.
    #[must_use]
    pub const fn pattern(&self) -> Option<&Graph> {
        self.pattern.as_ref()
    }

    /// Fills every parameter missing here from `defaults`. The pattern is
    /// kept as is.
    #[must_use]
    pub fn merged_over(mut self, defaults: &Self) -> Self {
        for (name, value) in &defaults.params {
            self.params
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    /// A finite number; integers are widened.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for non-numeric or
    /// non-finite values.
    pub fn f64(&self, name: &str) -> Result<Option<f64>> {
        self.get(name)
            .map(|value| match value.as_f64() {
                Some(number) if number.is_finite() => Ok(number),
                _ => Err(mistyped(name, "a finite number", value)),
            })
            .transpose()
    }

    /// A non-negative integer.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for anything else.
    pub fn u64(&self, name: &str) -> Result<Option<u64>> {
        self.get(name)
            .map(|value| match value {
                AttributeValue::Int(int) => {
                    u64::try_from(*int).map_err(|_| mistyped(name, "a non-negative integer", value))
                }
                _ => Err(mistyped(name, "a non-negative integer", value)),
            })
            .transpose()
    }

    /// A non-negative integer that fits a `usize`.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for anything else.
    pub fn usize(&self, name: &str) -> Result<Option<usize>> {
        self.u64(name)?
            .map(|value| {
                usize::try_from(value).map_err(|_| {
                    AlgorithmError::invalid_parameter(name, format!("{value} is too large"))
                })
            })
            .transpose()
    }

    /// A boolean.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for anything else.
    pub fn bool(&self, name: &str) -> Result<Option<bool>> {
        self.get(name)
            .map(|value| match value {
                AttributeValue::Bool(flag) => Ok(*flag),
                _ => Err(mistyped(name, "a boolean", value)),
            })
            .transpose()
    }

    /// A string.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for anything else.
    pub fn string(&self, name: &str) -> Result<Option<&str>> {
        self.get(name)
            .map(|value| value.as_str().ok_or_else(|| mistyped(name, "a string", value)))
            .transpose()
    }

    /// A vertex id: integers and strings map to the matching [`VertexId`].
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for booleans and floats.
    pub fn vertex(&self, name: &str) -> Result<Option<VertexId>> {
        self.get(name)
            .map(|value| match value {
                AttributeValue::Int(int) => Ok(VertexId::Int(*int)),
                AttributeValue::Str(text) => Ok(VertexId::from(text.as_str())),
                _ => Err(mistyped(name, "a vertex id", value)),
            })
            .transpose()
    }

    /// Search budget from `max_nodes` and `timeout_ms`. Without either the
    /// default budget applies; `timeout_ms` alone lifts the node cap.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for malformed values.
    pub fn search_budget(&self) -> Result<SearchBudget> {
        let timeout = self.u64("timeout_ms")?.map(Duration::from_millis);
        Ok(match (self.u64("max_nodes")?, timeout) {
            (None, None) => SearchBudget::default(),
            (Some(nodes), None) => SearchBudget::nodes(nodes),
            (None, Some(deadline)) => SearchBudget::time(deadline),
            (Some(nodes), Some(deadline)) => SearchBudget::nodes(nodes).with_deadline(deadline),
        })
    }

    /// Overrides `fallback` with `max_iterations` and `tolerance` when
    /// present.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] for malformed values or a
    /// non-positive tolerance.
    pub fn iteration_control(&self, fallback: IterationControl) -> Result<IterationControl> {
        let mut control = fallback;
        if let Some(cap) = self.usize("max_iterations")? {
            control = control.with_max_iterations(cap);
        }
        if let Some(tolerance) = self.f64("tolerance")? {
            if tolerance <= 0.0 {
                return Err(AlgorithmError::invalid_parameter(
                    "tolerance",
                    "must be positive",
                ));
            }
            control = control.with_tolerance(tolerance);
        }
        Ok(control)
    }
}

/// Unwraps a required parameter.
pub(crate) fn required<T>(algorithm: &'static str, name: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or(AlgorithmError::MissingParameter { algorithm, name })
}
