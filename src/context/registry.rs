//! The fixed, ordered set of list contexts

use crate::context::{ContextKey, ListContext};
use crate::error::RegistryError;
use crate::model::Model;
use std::collections::HashMap;

/// Owns every list context. Order is registration order and is what "next
/// tab" and bulk refreshes walk.
pub struct ContextRegistry {
    contexts: Vec<Box<dyn ListContext>>,
    index: HashMap<ContextKey, usize>,
}

impl ContextRegistry {
    /// Fails on the first repeated key.
    pub fn new(contexts: Vec<Box<dyn ListContext>>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(contexts.len());
        for (i, context) in contexts.iter().enumerate() {
            if index.insert(context.key(), i).is_some() {
                return Err(RegistryError::DuplicateKey(context.key().to_string()));
            }
        }
        Ok(Self { contexts, index })
    }

    /// Fails on the first key in `required` that nothing registered.
    pub fn ensure_complete(&self, required: &[ContextKey]) -> Result<(), RegistryError> {
        match required.iter().find(|key| !self.index.contains_key(key)) {
            Some(key) => Err(RegistryError::MissingKey(key.to_string())),
            None => Ok(()),
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &dyn ListContext> + '_ {
        self.contexts.iter().map(|c| c.as_ref() as &dyn ListContext)
    }

    pub fn keys(&self) -> impl Iterator<Item = ContextKey> + '_ {
        self.contexts.iter().map(|c| c.key())
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        self.index.contains_key(&key)
    }

    pub fn position(&self, key: ContextKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    pub fn get(&self, key: ContextKey) -> Option<&dyn ListContext> {
        let i = self.position(key)?;
        Some(&*self.contexts[i])
    }

    pub fn get_mut(&mut self, key: ContextKey) -> Option<&mut dyn ListContext> {
        let i = self.position(key)?;
        Some(&mut *self.contexts[i])
    }

    /// Keys of the contexts sharing `window`, in registry order
    pub fn contexts_in_window(&self, window: &str) -> Vec<ContextKey> {
        self.contexts
            .iter()
            .filter(|c| c.window_name() == window)
            .map(|c| c.key())
            .collect()
    }

    /// Clamp every panel state to its collection after a model reload
    pub fn refresh_all(&mut self, model: &Model) {
        for context in &mut self.contexts {
            let count = context.item_count(model);
            context.panel_state_mut().clamp(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{pick, window_of, BaseContext, RenderScope, Row};
    use crate::model::{ListItem, Model};
    use ratatui::text::Span;

    struct Fake {
        base: BaseContext,
    }

    impl Fake {
        fn boxed(key: &'static str, window: &'static str) -> Box<dyn ListContext> {
            Box::new(Fake {
                base: BaseContext::side(ContextKey::new(key), window, window, key),
            })
        }
    }

    impl ListContext for Fake {
        fn base(&self) -> &BaseContext {
            &self.base
        }
        fn base_mut(&mut self) -> &mut BaseContext {
            &mut self.base
        }
        fn item_count(&self, model: &Model) -> usize {
            model.tags.len()
        }
        fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
            window_of(&scope.model.tags, start, length)
                .iter()
                .map(|t| vec![Span::raw(t.name.clone())])
                .collect()
        }
        fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
            pick(&model.tags, self.panel_state())
        }
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let result = ContextRegistry::new(vec![Fake::boxed("a", "w"), Fake::boxed("a", "w")]);
        assert_eq!(
            result.err(),
            Some(RegistryError::DuplicateKey("a".to_string()))
        );
    }

    #[test]
    fn missing_key_is_reported() {
        let registry = ContextRegistry::new(vec![Fake::boxed("a", "w")]).unwrap();
        assert!(registry.ensure_complete(&[ContextKey::new("a")]).is_ok());
        assert_eq!(
            registry.ensure_complete(&[ContextKey::new("a"), ContextKey::new("b")]),
            Err(RegistryError::MissingKey("b".to_string()))
        );
    }

    #[test]
    fn order_and_lookup() {
        let registry = ContextRegistry::new(vec![
            Fake::boxed("a", "left"),
            Fake::boxed("b", "right"),
            Fake::boxed("c", "left"),
        ])
        .unwrap();

        let keys: Vec<_> = registry.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(registry.position(ContextKey::new("c")), Some(2));
        assert!(registry.get(ContextKey::new("z")).is_none());
        assert_eq!(
            registry.contexts_in_window("left"),
            vec![ContextKey::new("a"), ContextKey::new("c")]
        );
    }

    #[test]
    fn refresh_all_clamps_panel_state() {
        let mut registry = ContextRegistry::new(vec![Fake::boxed("a", "w")]).unwrap();
        let mut model = Model::default();
        model.tags = (0..10)
            .map(|i| crate::model::Tag {
                name: format!("v{}", i),
                ..Default::default()
            })
            .collect();

        let key = ContextKey::new("a");
        registry.get_mut(key).unwrap().panel_state_mut().select(8, 10);
        model.tags.truncate(3);
        assert!(registry.get(key).unwrap().selected_item(&model).is_none());

        registry.refresh_all(&model);
        assert_eq!(registry.get(key).unwrap().panel_state().selected(), 2);
        assert_eq!(
            registry.get(key).unwrap().selected_item(&model).map(|i| i.id().to_string()),
            Some("v2".to_string())
        );
    }
}
