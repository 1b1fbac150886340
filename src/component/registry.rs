use super::Component;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Components addressable by name, used by [`super::Node::Named`] nodes and
/// by `{"component": "..."}` entries in JSON trees.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, Arc<dyn Component>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.register(name, component);
        self
    }

    /// Adds a component, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, component: impl Component + 'static) {
        let name = name.into();
        if self
            .components
            .insert(name.clone(), Arc::new(component))
            .is_some()
        {
            log::debug!("Replaced component '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.components.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Context, Node, Props};
    use crate::renderer::RenderError;

    fn empty(_: &Props, _: Vec<Node>, _: &mut Context) -> Result<Node, RenderError> {
        Ok(Node::Empty)
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ComponentRegistry::new().with("Footer", empty).with("Logo", empty);
        assert!(registry.get("Footer").is_some());
        assert!(registry.get("Missing").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Footer", "Logo"]);
    }
}
