//! Field-to-context projection.
//!
//! The key for each custom claim field resolves by a fixed priority:
//! explicit inject alias, then serialized name, then the field's own name.
//! The whole resolution is a pure function of the static descriptor list,
//! so it runs once at construction and never per request.

use crate::claims::ClaimSet;
use crate::error::AuthError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Precomputed projection from a claim type to context entries.
#[derive(Debug, Clone)]
pub(crate) struct ProjectionPlan {
    entries: Vec<PlanEntry>,
}

#[derive(Debug, Clone)]
struct PlanEntry {
    /// Key under which the field appears in the serialized claim object.
    lookup: &'static str,
    /// Resolved context key.
    context_key: &'static str,
}

impl ProjectionPlan {
    /// Resolve the descriptor list of `C` into an ordered entry list.
    ///
    /// Reserved and skipped fields drop out here. Declaration order is
    /// preserved; if two fields resolve to the same context key, the
    /// later declaration wins at projection time.
    pub(crate) fn for_claims<C: ClaimSet>() -> Self {
        let entries = C::FIELDS
            .iter()
            .filter(|field| !field.reserved && !field.skip)
            .map(|field| PlanEntry {
                lookup: field.serialized.unwrap_or(field.name),
                context_key: field.inject.or(field.serialized).unwrap_or(field.name),
            })
            .collect();
        Self { entries }
    }

    /// Project the decoded claims into a context map.
    ///
    /// Fields absent from the serialized form (e.g. `None` options elided
    /// by `skip_serializing_if`) are simply not injected.
    pub(crate) fn project<C>(&self, claims: &C) -> Result<InjectedClaims, AuthError>
    where
        C: Serialize,
    {
        let serialized =
            serde_json::to_value(claims).map_err(|_| AuthError::InvalidClaimsShape)?;
        let Value::Object(mut object) = serialized else {
            return Err(AuthError::InvalidClaimsShape);
        };

        let mut context = HashMap::new();
        for entry in &self.entries {
            if let Some(value) = object.remove(entry.lookup) {
                context.insert(entry.context_key.to_string(), value);
            }
        }
        Ok(InjectedClaims(context))
    }
}

/// The projected claim fields, stored in request extensions when
/// auto-injection is enabled.
#[derive(Debug, Clone, Default)]
pub struct InjectedClaims(HashMap<String, Value>);

impl InjectedClaims {
    /// Look up an injected field by its resolved context key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a context key was injected.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over all injected entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of injected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was injected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
