use super::ClassInfo;
use crate::jvm::cloner::clone_class;
use crate::jvm::model::ClassNode;
use crate::jvm::{BinaryName, Error};
use elsa::map::FrozenMap;
use std::collections::HashMap;
use typed_arena::Arena;

/// Capability to look up the class with a given name
///
/// Lookups are never retried: a failure is reported straight back to whoever needed the class.
pub trait ClassProvider {
    /// Load the class, failing with [`Error::ClassNotFound`] if it can't be located
    fn class_node(&self, name: &BinaryName) -> Result<ClassNode, Error>;
}

impl<F> ClassProvider for F
where
    F: Fn(&BinaryName) -> Result<ClassNode, Error>,
{
    fn class_node(&self, name: &BinaryName) -> Result<ClassNode, Error> {
        self(name)
    }
}

/// Provider serving classes registered up front
///
/// Every lookup hands out an independent copy, so callers are free to edit what they get.
#[derive(Default)]
pub struct MapClassProvider {
    classes: HashMap<BinaryName, ClassNode>,
}

impl MapClassProvider {
    pub fn new() -> MapClassProvider {
        MapClassProvider::default()
    }

    /// Register a class, replacing any previous class with the same name
    pub fn add(&mut self, class: ClassNode) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn contains(&self, name: &BinaryName) -> bool {
        self.classes.contains_key(name)
    }
}

impl FromIterator<ClassNode> for MapClassProvider {
    fn from_iter<I: IntoIterator<Item = ClassNode>>(iter: I) -> MapClassProvider {
        let mut provider = MapClassProvider::new();
        for class in iter {
            provider.add(class);
        }
        provider
    }
}

impl ClassProvider for MapClassProvider {
    fn class_node(&self, name: &BinaryName) -> Result<ClassNode, Error> {
        self.classes
            .get(name)
            .map(clone_class)
            .ok_or_else(|| Error::ClassNotFound(name.clone()))
    }
}

pub struct ClassInfoArenas<'g> {
    info_arena: Arena<ClassInfo<'g>>,
}

impl<'g> ClassInfoArenas<'g> {
    pub fn new() -> Self {
        ClassInfoArenas {
            info_arena: Arena::new(),
        }
    }
}

impl<'g> Default for ClassInfoArenas<'g> {
    fn default() -> Self {
        ClassInfoArenas::new()
    }
}

/// Cache of class descriptors, loading each class at most once
///
/// Descriptors handed out live as long as the arenas, and are bound to this provider so that
/// they can resolve their own supertypes.
pub struct ClassInfoProvider<'g> {
    arenas: &'g ClassInfoArenas<'g>,
    class_provider: &'g dyn ClassProvider,
    infos: FrozenMap<&'g BinaryName, &'g ClassInfo<'g>>,
}

impl<'g> ClassInfoProvider<'g> {
    pub fn new(
        arenas: &'g ClassInfoArenas<'g>,
        class_provider: &'g dyn ClassProvider,
    ) -> ClassInfoProvider<'g> {
        ClassInfoProvider {
            arenas,
            class_provider,
            infos: FrozenMap::new(),
        }
    }

    /// The lookup capability backing this provider
    pub fn class_provider(&self) -> &'g dyn ClassProvider {
        self.class_provider
    }

    /// Descriptor of the class with the given name
    ///
    /// The first request for a name loads the class (so its descriptor comes with its body);
    /// later requests return the same descriptor.
    pub fn of(&'g self, name: &BinaryName) -> Result<&'g ClassInfo<'g>, Error> {
        if let Some(info) = self.infos.get(name) {
            return Ok(info);
        }

        let class_node = self.class_provider.class_node(name)?;
        log::debug!("Loaded class {}", name);
        let info = ClassInfo::from_class_node(class_node).with_provider(self);
        let info = &*self.arenas.info_arena.alloc(info);
        self.infos.insert(&info.name, info);
        Ok(info)
    }

    /// Whether a descriptor for the name is already cached
    pub fn is_cached(&self, name: &BinaryName) -> bool {
        self.infos.get(name).is_some()
    }
}
