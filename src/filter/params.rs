//! Filter metadata and parameter validation.
//!
//! Each filter declares its numeric parameters with a range. Parameters are
//! validated eagerly: a missing or out-of-range value is a contract failure
//! and is never clamped.

use crate::util::{PixFilterError, PixFilterResult};
use std::collections::BTreeMap;

/// Declaration of one numeric filter parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamDescriptor {
    /// Key used in `FilterParams`.
    pub id: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Value used by `FilterParams::defaults_for`.
    pub default: f64,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// UI increment.
    pub step: f64,
}

impl ParamDescriptor {
    /// Returns true when `value` lies in `[min, max]` (NaN never does).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Static description of a registered filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterDescriptor {
    /// Registry key.
    pub id: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Declared parameters.
    pub params: &'static [ParamDescriptor],
}

impl FilterDescriptor {
    /// Looks up a parameter declaration by id.
    pub fn param(&self, id: &str) -> Option<&'static ParamDescriptor> {
        self.params.iter().find(|p| p.id == id)
    }
}

/// Parameter values keyed by parameter id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterParams {
    values: BTreeMap<String, f64>,
}

impl FilterParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from the declared defaults of `desc`.
    pub fn defaults_for(desc: &FilterDescriptor) -> Self {
        desc.params
            .iter()
            .map(|p| (p.id.to_string(), p.default))
            .collect()
    }

    /// Returns the map with `id` set to `value`.
    pub fn with(mut self, id: impl Into<String>, value: f64) -> Self {
        self.set(id, value);
        self
    }

    /// Sets `id` to `value`, replacing any previous value.
    pub fn set(&mut self, id: impl Into<String>, value: f64) {
        self.values.insert(id.into(), value);
    }

    /// Returns the value for `id`.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Iterates over `(id, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Checks that every declared parameter is present and in range.
    pub fn validate(&self, desc: &FilterDescriptor) -> PixFilterResult<()> {
        for param in desc.params {
            self.checked(desc, param)?;
        }
        Ok(())
    }

    /// Returns a validated value for the declared parameter `id`.
    pub(crate) fn require(&self, desc: &FilterDescriptor, id: &str) -> PixFilterResult<f64> {
        let param = desc.param(id).ok_or(PixFilterError::InvalidInput(
            "parameter is not declared by the filter",
        ))?;
        self.checked(desc, param)
    }

    fn checked(&self, desc: &FilterDescriptor, param: &ParamDescriptor) -> PixFilterResult<f64> {
        let value = self
            .get(param.id)
            .ok_or_else(|| PixFilterError::MissingParameter {
                filter: desc.id.to_string(),
                param: param.id.to_string(),
            })?;
        if !param.contains(value) {
            return Err(PixFilterError::ParameterOutOfRange {
                param: param.id.to_string(),
                value,
                min: param.min,
                max: param.max,
            });
        }
        Ok(value)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FilterParams {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<BTreeMap<String, f64>> for FilterParams {
    fn from(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }
}
