//! Required-parameter presence check.
//!
//! A request-shape gate, not a schema validator: only presence of the
//! parameters declared `required` is checked. An explicit `null` counts as
//! present.

use super::handlers::{ParameterDescriptor, ParameterMap};

/// Names of required parameters absent from `provided`, in declaration order.
pub fn missing_required(parameters: &[ParameterDescriptor], provided: &ParameterMap) -> Vec<String> {
    parameters
        .iter()
        .filter(|p| p.required && !provided.contains_key(&p.name))
        .map(|p| p.name.clone())
        .collect()
}
