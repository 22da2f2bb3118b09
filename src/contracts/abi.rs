//! ABI introspection helpers.

use alloy::{
    dyn_abi::{DynSolValue, Specifier},
    json_abi::{Function, JsonAbi, StateMutability},
};

use crate::error::{Result, SessionError};

/// First function declared under `method`.
///
/// Overloads are not resolved: later entries with the same name are ignored.
pub fn first_function<'a>(abi: &'a JsonAbi, method: &str) -> Option<&'a Function> {
    abi.function(method).and_then(|overloads| overloads.first())
}

/// Function under `method` taking `arity` inputs, or the first one when none matches.
pub fn function_for_arity<'a>(
    abi: &'a JsonAbi,
    method: &str,
    arity: usize,
) -> Option<&'a Function> {
    let overloads = abi.function(method)?;
    overloads.iter().find(|f| f.inputs.len() == arity).or_else(|| overloads.first())
}

/// Test the declared mutability of `method` against a predicate.
///
/// Returns `None` when the ABI declares no functions (events and errors do not
/// count), `Some(false)` when no function has that name, otherwise the
/// predicate applied to the first matching entry.
pub fn method_mutability_matches<F>(abi: &JsonAbi, method: &str, predicate: F) -> Option<bool>
where
    F: Fn(StateMutability) -> bool,
{
    if abi.functions.is_empty() {
        return None;
    }
    Some(first_function(abi, method).is_some_and(|f| predicate(f.state_mutability)))
}

/// View or pure.
pub fn is_read_only(mutability: StateMutability) -> bool {
    matches!(mutability, StateMutability::View | StateMutability::Pure)
}

/// Parse string arguments into typed values using the function's input types.
pub fn coerce_inputs(function: &Function, raw: &[&str]) -> Result<Vec<DynSolValue>> {
    if raw.len() != function.inputs.len() {
        return Err(SessionError::Abi(format!(
            "{} expects {} arguments, got {}",
            function.name,
            function.inputs.len(),
            raw.len()
        )));
    }

    function
        .inputs
        .iter()
        .zip(raw)
        .map(|(param, value)| -> Result<DynSolValue> {
            let ty = param.resolve()?;
            let coerced = ty.coerce_str(value)?;
            Ok(coerced)
        })
        .collect()
}
