//! Construction of components from their type id and details string, as needed when
//! reading board files or creating a "new component of this type".

use std::{collections::BTreeMap, fmt, sync::OnceLock};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::{Error, Result},
    str::SharedStr,
};

use super::{
    constant::Constant,
    diode::Diode,
    gates::{self, And, Gate, GateImpl, Nand, Nor, Or, Xnor, Xor},
    lamp::Lamp,
    switch::Switch,
    Component, ComponentKind, Container, Interface,
};

pub type Constructor = fn(&str) -> Result<ComponentKind>;

#[derive(Clone)]
pub struct Entry {
    pub display_name: SharedStr,
    pub default_details: String,
    pub construct: Constructor,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("display_name", &self.display_name)
            .field("default_details", &self.default_details)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<SharedStr, Entry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_gate::<And>();
        registry.register_gate::<Or>();
        registry.register_gate::<Xor>();
        registry.register_gate::<Nand>();
        registry.register_gate::<Nor>();
        registry.register_gate::<Xnor>();

        registry.register(Constant::ID, "Constant", "LOW", |details| {
            Constant::from_details(details).map(ComponentKind::element)
        });
        registry.register(Lamp::ID, "Lamp", "", |_| Ok(ComponentKind::element(Lamp::new())));
        registry.register(Diode::ID, "Diode", "", |_| Ok(ComponentKind::passthrough(Diode)));
        registry.register(Switch::ID, "Switch", "open", |details| {
            Switch::from_details(details).map(ComponentKind::passthrough)
        });
        registry.register(Interface::INPUT_ID, "Board input", "in", |details| {
            Ok(ComponentKind::Interface(Interface::input(details)))
        });
        registry.register(Interface::OUTPUT_ID, "Board output", "out", |details| {
            Ok(ComponentKind::Interface(Interface::output(details)))
        });
        registry.register(Container::ID, "Board", "", |details| {
            Ok(ComponentKind::Container(Container::unsupplied(details)))
        });

        registry
    }

    /// Adds or replaces the constructor for `id`.
    pub fn register(
        &mut self,
        id: impl Into<SharedStr>,
        display_name: impl Into<SharedStr>,
        default_details: impl Into<String>,
        construct: Constructor,
    ) {
        self.entries.insert(
            id.into(),
            Entry {
                display_name: display_name.into(),
                default_details: default_details.into(),
                construct,
            },
        );
    }

    fn register_gate<G: GateImpl>(&mut self) {
        self.register(
            G::id(),
            G::display_name(),
            gates::DEFAULT_INPUTS.to_string(),
            |details| Gate::<G>::from_details(details).map(ComponentKind::element),
        );
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn default_details(&self, id: &str) -> Option<&str> {
        self.entry(id).map(|entry| entry.default_details.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &SharedStr> {
        self.entries.keys()
    }

    /// Builds a detached component. An unknown id is a format error.
    pub fn create(&self, id: &str, details: &str) -> Result<Component> {
        let entry = self
            .entry(id)
            .ok_or_else(|| Error::format(format!("unknown component type {id:?}")))?;
        (entry.construct)(details).map(Component::new)
    }

    /// Builds a component with its type's default details.
    pub fn create_default(&self, id: &str) -> Result<Component> {
        let details = self
            .default_details(id)
            .ok_or_else(|| Error::format(format!("unknown component type {id:?}")))?;
        self.create(id, details)
    }
}

fn global() -> &'static RwLock<ComponentRegistry> {
    static REGISTRY: OnceLock<RwLock<ComponentRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(ComponentRegistry::with_builtins()))
}

/// The process-wide registry used when loading boards, pre-populated with the
/// built-in components.
pub fn registry() -> RwLockReadGuard<'static, ComponentRegistry> {
    global().read()
}

/// Write access for collaborators registering their own components.
pub fn registry_mut() -> RwLockWriteGuard<'static, ComponentRegistry> {
    global().write()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::State;

    #[test]
    fn builds_builtins_by_id() {
        let registry = ComponentRegistry::with_builtins();

        let gate = registry.create("gate_xnor", "3").unwrap();
        assert_eq!(gate.id(), "gate_xnor");
        assert_eq!(gate.details(), "3");
        assert_eq!(gate.pin_offsets().len(), 4);

        let constant = registry.create_default(Constant::ID).unwrap();
        assert_eq!(
            constant.downcast_ref::<Constant>().map(Constant::state),
            Some(State::Low)
        );

        let input = registry.create(Interface::INPUT_ID, "A").unwrap();
        assert_eq!(input.interface().map(Interface::name), Some("A"));

        let container = registry.create(Container::ID, "adder").unwrap();
        assert_eq!(container.details(), "adder");
        assert!(!container.container().unwrap().is_supplied());
        assert!(registry.create(Lamp::ID, "").unwrap().is_graphical());
    }

    #[test]
    fn unknown_id_is_a_format_error() {
        let registry = ComponentRegistry::with_builtins();
        assert!(matches!(
            registry.create("flux_capacitor", ""),
            Err(Error::Format(_))
        ));
        assert!(registry.default_details("flux_capacitor").is_none());
    }

    #[test]
    fn collaborators_can_register_components() {
        registry_mut().register("pull_up", "Pull-up", "", |_| {
            Ok(ComponentKind::element(Constant::new(State::PulledHigh)))
        });
        let component = registry().create("pull_up", "").unwrap();
        assert_eq!(component.details(), "PULLEDHIGH");
    }
}
