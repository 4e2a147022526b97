use super::ClassInfoProvider;
use crate::jvm::model::ClassNode;
use crate::jvm::{BinaryName, ClassAccessFlags, Error};
use once_cell::unsync::OnceCell;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Descriptor of a class: its name, flags and direct supertypes
///
/// The body of the class may or may not be loaded. When it isn't, and the descriptor is bound to
/// a provider, it is loaded on first request and kept from then on.
pub struct ClassInfo<'g> {
    provider: Option<&'g ClassInfoProvider<'g>>,
    class_node: OnceCell<Arc<ClassNode>>,

    pub name: BinaryName,
    pub access_flags: ClassAccessFlags,

    /// Super class (only `java/lang/Object` has none)
    pub superclass: Option<BinaryName>,

    /// Direct superinterfaces, in declaration order
    pub interfaces: Vec<BinaryName>,
}

impl<'g> ClassInfo<'g> {
    /// Descriptor without a body and without a provider
    pub fn new(
        name: BinaryName,
        access_flags: ClassAccessFlags,
        superclass: Option<BinaryName>,
        interfaces: Vec<BinaryName>,
    ) -> ClassInfo<'g> {
        ClassInfo {
            provider: None,
            class_node: OnceCell::new(),
            name,
            access_flags,
            superclass,
            interfaces,
        }
    }

    /// Descriptor of an already loaded class (the class becomes the body)
    pub fn from_class_node(class_node: ClassNode) -> ClassInfo<'g> {
        ClassInfo {
            provider: None,
            name: class_node.name.clone(),
            access_flags: class_node.access_flags,
            superclass: class_node.superclass.clone(),
            interfaces: class_node.interfaces.clone(),
            class_node: OnceCell::from(Arc::new(class_node)),
        }
    }

    /// Same descriptor (and body, if loaded), but resolving through a different provider
    pub fn with_provider(&self, provider: &'g ClassInfoProvider<'g>) -> ClassInfo<'g> {
        let class_node = match self.class_node.get() {
            Some(loaded) => OnceCell::from(Arc::clone(loaded)),
            None => OnceCell::new(),
        };
        ClassInfo {
            provider: Some(provider),
            class_node,
            name: self.name.clone(),
            access_flags: self.access_flags,
            superclass: self.superclass.clone(),
            interfaces: self.interfaces.clone(),
        }
    }

    pub fn provider(&self) -> Option<&'g ClassInfoProvider<'g>> {
        self.provider
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    /// Is the body already loaded?
    pub fn is_loaded(&self) -> bool {
        self.class_node.get().is_some()
    }

    /// Body of the class, loading it through the provider if needed
    ///
    /// Returns `None` if the body isn't loaded and there is no provider to load it from.
    pub fn class_node(&self) -> Result<Option<&ClassNode>, Error> {
        if let Some(class_node) = self.class_node.get() {
            return Ok(Some(class_node.as_ref()));
        }
        let provider = match self.provider {
            Some(provider) => provider,
            None => return Ok(None),
        };
        let class_node = self.class_node.get_or_try_init(|| {
            log::debug!("Loading body of {}", self.name);
            provider
                .class_provider()
                .class_node(&self.name)
                .map(Arc::new)
        })?;
        Ok(Some(class_node.as_ref()))
    }

    /// Descriptor of the super class
    ///
    /// Returns `None` when there is no super class or no provider to resolve it with.
    pub fn resolve_superclass(&self) -> Result<Option<&'g ClassInfo<'g>>, Error> {
        match (self.provider, &self.superclass) {
            (Some(provider), Some(superclass)) => provider.of(superclass).map(Some),
            _ => Ok(None),
        }
    }

    /// Descriptors of the direct superinterfaces, in declaration order
    ///
    /// Empty if there is no provider to resolve them with.
    pub fn resolve_interfaces(&self) -> Result<Vec<&'g ClassInfo<'g>>, Error> {
        match self.provider {
            Some(provider) => self
                .interfaces
                .iter()
                .map(|interface| provider.of(interface))
                .collect(),
            None => Ok(vec![]),
        }
    }

    /// All supertypes reachable through super class and superinterface edges
    ///
    /// Types are listed breadth first, each exactly once, starting with this class when
    /// `include_self` is set. Cyclic hierarchies are fine: a type is only expanded the first time
    /// it is reached.
    pub fn recursive_resolve_supertypes(
        &self,
        include_self: bool,
    ) -> Result<Vec<&ClassInfo<'g>>, Error> {
        let mut to_visit: VecDeque<&ClassInfo<'g>> = VecDeque::new();
        let mut visited: HashSet<&ClassInfo<'g>> = HashSet::new();
        let mut supertypes: Vec<&ClassInfo<'g>> = vec![];
        to_visit.push_back(self);

        while let Some(class_info) = to_visit.pop_front() {
            if !visited.insert(class_info) {
                continue;
            }
            log::trace!("Visiting supertype {} of {}", class_info.name, self.name);
            supertypes.push(class_info);

            if let Some(superclass) = class_info.resolve_superclass()? {
                to_visit.push_back(superclass);
            }
            to_visit.extend(class_info.resolve_interfaces()?);
        }

        if !include_self {
            supertypes.retain(|class_info| *class_info != self);
        }
        Ok(supertypes)
    }
}

impl<'g> PartialEq for ClassInfo<'g> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.access_flags == other.access_flags
            && self.superclass == other.superclass
            && self.interfaces == other.interfaces
    }
}

impl<'g> Eq for ClassInfo<'g> {}

impl<'g> Hash for ClassInfo<'g> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.access_flags.hash(state);
        self.superclass.hash(state);
        self.interfaces.hash(state);
    }
}

impl<'g> fmt::Debug for ClassInfo<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field("access_flags", &self.access_flags)
            .field("superclass", &self.superclass)
            .field("interfaces", &self.interfaces)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_info::{ClassInfoArenas, MapClassProvider};
    use std::cell::Cell;
    use std::ptr;

    fn name(dotted: &str) -> BinaryName {
        BinaryName::from_dotted(dotted).unwrap()
    }

    #[test]
    fn without_provider() {
        let info = ClassInfo::new(
            name("a.Lonely"),
            ClassAccessFlags::PUBLIC,
            Some(BinaryName::OBJECT),
            vec![name("a.Missing")],
        );
        assert!(!info.is_loaded());
        assert!(info.class_node().unwrap().is_none());
        assert!(info.resolve_superclass().unwrap().is_none());
        assert!(info.resolve_interfaces().unwrap().is_empty());

        let supertypes = info.recursive_resolve_supertypes(true).unwrap();
        assert_eq!(supertypes.len(), 1);
        assert!(info.recursive_resolve_supertypes(false).unwrap().is_empty());
    }

    #[test]
    fn lazy_body() {
        let classes: MapClassProvider = vec![ClassNode::empty(name("a.Lazy"))].into_iter().collect();
        let arenas = ClassInfoArenas::new();
        let provider = ClassInfoProvider::new(&arenas, &classes);

        let info = ClassInfo::new(
            name("a.Lazy"),
            ClassAccessFlags::PUBLIC,
            Some(BinaryName::OBJECT),
            vec![],
        );
        let bound = info.with_provider(&provider);
        assert!(!bound.is_loaded());
        assert_eq!(bound, info);

        let body = bound.class_node().unwrap().unwrap();
        assert_eq!(body.methods.len(), 1);
        assert!(bound.is_loaded());
        assert!(!info.is_loaded());

        // Rebinding keeps the loaded body
        let rebound = bound.with_provider(&provider);
        assert!(rebound.is_loaded());
    }

    #[test]
    fn body_is_loaded_once() {
        let lookups = Cell::new(0);
        let counting = |name: &BinaryName| {
            lookups.set(lookups.get() + 1);
            Ok::<_, Error>(ClassNode::empty(name.clone()))
        };
        let arenas = ClassInfoArenas::new();
        let provider = ClassInfoProvider::new(&arenas, &counting);

        let info = ClassInfo::new(
            name("a.Once"),
            ClassAccessFlags::PUBLIC,
            Some(BinaryName::OBJECT),
            vec![],
        )
        .with_provider(&provider);
        let first = info.class_node().unwrap().unwrap();
        let second = info.class_node().unwrap().unwrap();
        assert!(ptr::eq(first, second));
        assert_eq!(lookups.get(), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        let available = Cell::new(false);
        let lookups = Cell::new(0);
        let flaky = |name: &BinaryName| {
            lookups.set(lookups.get() + 1);
            if available.get() {
                Ok(ClassNode::empty(name.clone()))
            } else {
                Err(Error::ClassNotFound(name.clone()))
            }
        };
        let arenas = ClassInfoArenas::new();
        let provider = ClassInfoProvider::new(&arenas, &flaky);

        let info = ClassInfo::new(name("a.Later"), ClassAccessFlags::PUBLIC, None, vec![])
            .with_provider(&provider);
        assert!(matches!(info.class_node(), Err(Error::ClassNotFound(_))));
        assert!(!info.is_loaded());

        available.set(true);
        let first = info.class_node().unwrap().unwrap();
        let second = info.class_node().unwrap().unwrap();
        assert!(ptr::eq(first, second));
        assert_eq!(lookups.get(), 2);
    }

    #[test]
    fn missing_body() {
        let classes = MapClassProvider::new();
        let arenas = ClassInfoArenas::new();
        let provider = ClassInfoProvider::new(&arenas, &classes);
        assert!(provider.class_provider().class_node(&name("a.Gone")).is_err());

        let info = ClassInfo::new(name("a.Gone"), ClassAccessFlags::PUBLIC, None, vec![])
            .with_provider(&provider);
        assert!(matches!(info.class_node(), Err(Error::ClassNotFound(_))));
        assert!(!info.is_loaded());
    }

    #[test]
    fn equality_ignores_body_and_provider() {
        let loaded = ClassInfo::from_class_node(ClassNode::empty(name("a.Same")));
        let described = ClassInfo::new(
            name("a.Same"),
            ClassAccessFlags::PUBLIC,
            Some(BinaryName::OBJECT),
            vec![],
        );
        assert_eq!(loaded, described);

        let other_flags = ClassInfo::new(
            name("a.Same"),
            ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL,
            Some(BinaryName::OBJECT),
            vec![],
        );
        assert_ne!(loaded, other_flags);
    }
}
