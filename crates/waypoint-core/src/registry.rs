//! Route registry contract and the in-memory route table
//!
//! The engine never owns route definitions. It asks a [`RouteRegistry`] for
//! the chain of descriptors behind a route name, and for a route's custom
//! serializer when a by-object context has to be turned back into params.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{Result, WaypointError};
use crate::model::{ModelRef, Params, RouteDescriptor};

/// Source of route chains and per-route serializers
pub trait RouteRegistry: Send + Sync {
    /// Root-first chain of descriptors for a route name
    ///
    /// # Errors
    ///
    /// `UnknownRoute` if no route has this name.
    fn handlers_for(&self, name: &str) -> Result<Vec<Arc<RouteDescriptor>>>;

    /// Custom serialization of `model` for `route`
    ///
    /// `None` means the route has no serializer of its own and the default
    /// convention applies.
    fn serialize(&self, _route: &RouteDescriptor, _model: &ModelRef) -> Option<Params> {
        None
    }
}

/// Serialize a context into params for `route`
///
/// Uses the registry's serializer for the route if it has one, otherwise the
/// default convention:
/// - exactly one dynamic segment is required, else the params are empty;
/// - a string or number model is the segment value itself;
/// - a segment named `*_id` takes the model's `id` field;
/// - any other model is stringified whole.
pub fn serialize_context(
    registry: &dyn RouteRegistry,
    route: &RouteDescriptor,
    model: Option<&ModelRef>,
) -> Params {
    let Some(model) = model else {
        return Params::new();
    };
    if let Some(params) = registry.serialize(route, model) {
        return params;
    }

    let [name] = route.dynamic_segment_names() else {
        return Params::new();
    };

    let value = match model.value() {
        Value::String(_) | Value::Number(_) => stringify(model.value()),
        object if name.ends_with("_id") => match object.get("id") {
            Some(id) => stringify(id),
            None => return Params::new(),
        },
        other => stringify(other),
    };
    Params::from([(name.clone(), value)])
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-route serializer closure
pub type SerializeFn = Arc<dyn Fn(&ModelRef, &[String]) -> Params + Send + Sync>;

/// In-memory route registry
///
/// Maps route names to descriptor chains. Descriptors with the same handler
/// and segments are interned so chains that share a prefix share `Arc`s.
#[derive(Default, Clone)]
pub struct RouteTable {
    chains: HashMap<String, Vec<Arc<RouteDescriptor>>>,
    descriptors: HashMap<String, Arc<RouteDescriptor>>,
    serializers: HashMap<String, SerializeFn>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as resolving to `chain` (root-first)
    pub fn add_route(
        &mut self,
        name: impl Into<String>,
        chain: impl IntoIterator<Item = RouteDescriptor>,
    ) -> &mut Self {
        let chain = chain
            .into_iter()
            .map(|descriptor| self.intern(descriptor))
            .collect();
        self.chains.insert(name.into(), chain);
        self
    }

    /// Register a custom serializer for every level handled by `handler_name`
    pub fn add_serializer<F>(&mut self, handler_name: impl Into<String>, serializer: F) -> &mut Self
    where
        F: Fn(&ModelRef, &[String]) -> Params + Send + Sync + 'static,
    {
        self.serializers
            .insert(handler_name.into(), Arc::new(serializer));
        self
    }

    /// Build a table from `(route name, [(handler, [segments])])` definitions
    pub fn from_definitions(definitions: Vec<(&str, Vec<(&str, Vec<&str>)>)>) -> Self {
        let mut table = Self::new();
        for (name, chain) in definitions {
            let chain: Vec<RouteDescriptor> = chain
                .into_iter()
                .map(|(handler, segments)| RouteDescriptor::new(handler, segments))
                .collect();
            table.add_route(name, chain);
        }
        table
    }

    /// Shared descriptor for a handler, if any registered chain uses it
    pub fn descriptor(&self, handler_name: &str) -> Option<Arc<RouteDescriptor>> {
        self.descriptors.get(handler_name).cloned()
    }

    fn intern(&mut self, descriptor: RouteDescriptor) -> Arc<RouteDescriptor> {
        match self.descriptors.get(descriptor.handler_name()) {
            Some(existing) if **existing == descriptor => Arc::clone(existing),
            _ => {
                let shared = Arc::new(descriptor);
                self.descriptors
                    .insert(shared.handler_name().to_string(), Arc::clone(&shared));
                shared
            }
        }
    }
}

impl RouteRegistry for RouteTable {
    fn handlers_for(&self, name: &str) -> Result<Vec<Arc<RouteDescriptor>>> {
        let chain = self
            .chains
            .get(name)
            .ok_or_else(|| WaypointError::UnknownRoute {
                route_name: name.to_string(),
            })?;

        if chain.is_empty() {
            return Err(WaypointError::EmptyRouteChain {
                route_name: name.to_string(),
            });
        }

        Ok(chain.clone())
    }

    fn serialize(&self, route: &RouteDescriptor, model: &ModelRef) -> Option<Params> {
        self.serializers
            .get(route.handler_name())
            .map(|serializer| serializer(model, route.dynamic_segment_names()))
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.chains.keys().collect();
        names.sort();
        f.debug_struct("RouteTable")
            .field("routes", &names)
            .field("serializers", &self.serializers.len())
            .finish()
    }
}
