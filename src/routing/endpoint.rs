//! A routable endpoint and its variant set.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::definitions::Variant;
use crate::routing::key::EndpointKey;

/// Name of the variant every endpoint starts on.
pub const DEFAULT_VARIANT: &str = "default";

/// The variant currently served for an endpoint, with its name.
#[derive(Debug)]
pub struct ActiveVariant {
    name: String,
    variant: Arc<Variant>,
}

impl ActiveVariant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }
}

/// Returned when an endpoint is built without a `default` variant.
#[derive(Debug, thiserror::Error)]
#[error("endpoint {0} has no \"default\" variant")]
pub struct MissingDefault(pub EndpointKey);

/// An endpoint with its named variants and the one currently active.
///
/// The variant set is fixed at construction. Only the active pointer
/// changes, and it is replaced as a whole, so a reader sees either the old
/// or the new variant and never a mix.
#[derive(Debug)]
pub struct Endpoint {
    key: EndpointKey,
    variants: BTreeMap<String, Arc<Variant>>,
    active: ArcSwap<ActiveVariant>,
}

impl Endpoint {
    /// Create an endpoint whose active variant is `default`.
    pub fn new(key: EndpointKey, variants: BTreeMap<String, Variant>) -> Result<Self, MissingDefault> {
        let variants: BTreeMap<String, Arc<Variant>> = variants
            .into_iter()
            .map(|(name, variant)| (name, Arc::new(variant)))
            .collect();

        let default = match variants.get(DEFAULT_VARIANT) {
            Some(v) => Arc::clone(v),
            None => return Err(MissingDefault(key)),
        };

        Ok(Self {
            key,
            variants,
            active: ArcSwap::from_pointee(ActiveVariant {
                name: DEFAULT_VARIANT.to_string(),
                variant: default,
            }),
        })
    }

    pub fn key(&self) -> &EndpointKey {
        &self.key
    }

    /// Variant names in sorted order.
    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name).map(|v| v.as_ref())
    }

    /// Snapshot of the active variant.
    pub fn active(&self) -> Arc<ActiveVariant> {
        self.active.load_full()
    }

    /// Make `name` the active variant and return the one it replaced.
    ///
    /// Returns `None` and leaves the endpoint untouched when `name` is not
    /// one of its variants.
    pub fn activate(&self, name: &str) -> Option<Arc<ActiveVariant>> {
        let variant = self.variants.get(name)?;
        Some(self.active.swap(Arc::new(ActiveVariant {
            name: name.to_string(),
            variant: Arc::clone(variant),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::key::EndpointPath;
    use axum::http::Method;

    fn variants(names: &[&str]) -> BTreeMap<String, Variant> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let body = serde_json::json!({ "n": i });
                (name.to_string(), Variant::build(200, BTreeMap::new(), body).unwrap())
            })
            .collect()
    }

    fn key() -> EndpointKey {
        EndpointKey::new(Method::GET, EndpointPath::parse("/things"))
    }

    #[test]
    fn test_starts_on_default() {
        let endpoint = Endpoint::new(key(), variants(&["alt", "default"])).unwrap();
        assert_eq!(endpoint.active().name(), "default");
        assert_eq!(endpoint.variant_names().collect::<Vec<_>>(), vec!["alt", "default"]);
    }

    #[test]
    fn test_requires_default() {
        let err = Endpoint::new(key(), variants(&["alt"])).unwrap_err();
        assert_eq!(err.0, key());
    }

    #[test]
    fn test_activate() {
        let endpoint = Endpoint::new(key(), variants(&["alt", "default"])).unwrap();

        let previous = endpoint.activate("alt").unwrap();
        assert_eq!(previous.name(), "default");
        assert_eq!(endpoint.active().name(), "alt");
        assert_eq!(endpoint.active().variant().body(), &serde_json::json!({ "n": 0 }));

        assert!(endpoint.activate("missing").is_none());
        assert_eq!(endpoint.active().name(), "alt");
    }

    #[test]
    fn test_held_snapshot_survives_swap() {
        let endpoint = Endpoint::new(key(), variants(&["alt", "default"])).unwrap();
        let held = endpoint.active();
        endpoint.activate("alt");
        assert_eq!(held.name(), "default");
    }
}
