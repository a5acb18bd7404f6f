use std::fmt;

use ahash::{AHashMap, AHashSet};

use crate::assemble::MismatchPolicy;
use crate::assembler::Assembler;
use crate::interface::Interface;
use crate::record::Record;
use crate::value::{Props, Value};

/// Identifier of a record in a [`Registry`].
///
/// Ids are plain indices into the registry that issued them and are never
/// reused. Passing an id to a registry other than its issuer is a logic
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TargetId(usize);

impl TargetId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of this id.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifier of an assembled instance in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct InstanceId(usize);

impl InstanceId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of this id.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Either side of an association: an instance id or a target id.
///
/// Identity lookups accept both, so callers can ask "the instance of" or
/// "the target of" whatever handle they are holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// An assembled instance.
    Instance(InstanceId),
    /// A record.
    Target(TargetId),
}

impl From<InstanceId> for Entity {
    fn from(id: InstanceId) -> Self {
        Self::Instance(id)
    }
}

impl From<TargetId> for Entity {
    fn from(id: TargetId) -> Self {
        Self::Target(id)
    }
}

/// An assembled instance: the lightweight wrapper bound to one target.
///
/// Holds the assembler it was built by, the id of its target, and its own
/// properties (claimed keys plus, under the lenient policy, overflow keys).
pub struct Instance {
    assembler: &'static dyn Assembler,
    target: TargetId,
    props: Props,
}

impl Instance {
    pub(crate) fn new(assembler: &'static dyn Assembler, target: TargetId) -> Self {
        Self {
            assembler,
            target,
            props: Props::new(),
        }
    }

    /// Returns the assembler this instance was built by.
    #[must_use]
    pub fn assembler(&self) -> &'static dyn Assembler {
        self.assembler
    }

    /// Returns the id of the bound target.
    #[must_use]
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Returns the instance's own properties.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    pub(crate) fn props_mut(&mut self) -> &mut Props {
        &mut self.props
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("assembler", &self.assembler.name())
            .field("target", &self.target)
            .field("props", &self.props)
            .finish()
    }
}

/// The assembly context: owns every record and instance and the
/// association between them.
///
/// A registry is created once per application root and passed explicitly
/// to construction calls; dropping it tears down every target, instance
/// and association at once. There is no global state.
///
/// The association table maps target identity to instance identity and
/// holds ids only, so an entry never extends any lifetime. Its invariant:
/// at most one instance per target, later bindings overwrite.
#[derive(Debug)]
pub struct Registry {
    targets: Vec<Record>,
    instances: Vec<Option<Instance>>,
    assoc: AHashMap<TargetId, InstanceId>,
    policy: MismatchPolicy,
}

impl Registry {
    /// Creates an empty registry with the default
    /// [`MismatchPolicy::Strict`] policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(MismatchPolicy::Strict)
    }

    /// Creates an empty registry with the given mismatch policy.
    #[must_use]
    pub fn with_policy(policy: MismatchPolicy) -> Self {
        Self {
            targets: Vec::new(),
            instances: Vec::new(),
            assoc: AHashMap::new(),
            policy,
        }
    }

    /// Returns the configured mismatch policy.
    #[must_use]
    pub fn policy(&self) -> MismatchPolicy {
        self.policy
    }

    /// Creates an empty record of the given interface and returns its id.
    ///
    /// This is the default target factory; assemblers may override
    /// [`Assembler::create`] to call it with a different interface or to
    /// pre-fill the record.
    pub fn create_target(&mut self, interface: &'static Interface) -> TargetId {
        let id = TargetId::new(self.targets.len());
        self.targets.push(Record::new(interface));
        id
    }

    /// Returns the record behind a target id.
    ///
    /// # Panics
    /// Panics if the id was not issued by this registry.
    #[must_use]
    pub fn record(&self, id: TargetId) -> &Record {
        self.targets.get(id.index()).expect("Registry::record: unknown target id")
    }

    /// Returns the record behind a target id, mutably.
    ///
    /// # Panics
    /// Panics if the id was not issued by this registry.
    pub fn record_mut(&mut self, id: TargetId) -> &mut Record {
        self.targets
            .get_mut(id.index())
            .expect("Registry::record_mut: unknown target id")
    }

    /// Returns the instance behind an instance id.
    ///
    /// # Panics
    /// Panics if the id was not issued by this registry or the instance was
    /// discarded by a failed construction.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> &Instance {
        self.instances
            .get(id.index())
            .expect("Registry::instance: unknown instance id")
            .as_ref()
            .expect("Registry::instance: instance was discarded")
    }

    pub(crate) fn instance_mut(&mut self, id: InstanceId) -> &mut Instance {
        self.instances
            .get_mut(id.index())
            .expect("Registry::instance_mut: unknown instance id")
            .as_mut()
            .expect("Registry::instance_mut: instance was discarded")
    }

    pub(crate) fn insert_instance(&mut self, instance: Instance) -> InstanceId {
        let id = InstanceId::new(self.instances.len());
        self.instances.push(Some(instance));
        id
    }

    /// Discards an instance cell after a failed construction. The slot
    /// stays tombstoned so the id is never reissued.
    pub(crate) fn discard_instance(&mut self, id: InstanceId) {
        if let Some(slot) = self.instances.get_mut(id.index()) {
            *slot = None;
        }
    }

    /// Associates `target` with `instance`, overwriting any prior binding
    /// for the same target.
    pub(crate) fn bind(&mut self, target: TargetId, instance: InstanceId) {
        if let Some(previous) = self.assoc.insert(target, instance) {
            tracing::debug!(
                record = target.index(),
                old = previous.index(),
                new = instance.index(),
                "target re-associated"
            );
        }
    }

    /// Drops the association for `target` if it currently points at
    /// `instance`.
    pub(crate) fn unbind(&mut self, target: TargetId, instance: InstanceId) {
        if self.assoc.get(&target) == Some(&instance) {
            self.assoc.remove(&target);
        }
    }

    /// Looks up the instance for an entity.
    ///
    /// An instance id answers for itself (when still live); a target id is
    /// resolved through the association table. Returns `None` for targets
    /// no instance is bound to and for discarded instances.
    #[must_use]
    pub fn instance_of(&self, entity: impl Into<Entity>) -> Option<InstanceId> {
        match entity.into() {
            Entity::Instance(id) => self
                .instances
                .get(id.index())
                .and_then(Option::as_ref)
                .map(|_| id),
            Entity::Target(id) => self.assoc.get(&id).copied(),
        }
    }

    /// Looks up the target for an entity.
    ///
    /// An instance id yields its bound target; a target id yields itself,
    /// but only while an instance is bound to it. Returns `None` otherwise.
    #[must_use]
    pub fn target_of(&self, entity: impl Into<Entity>) -> Option<TargetId> {
        match entity.into() {
            Entity::Instance(id) => self
                .instances
                .get(id.index())
                .and_then(Option::as_ref)
                .map(Instance::target),
            Entity::Target(id) => self.assoc.contains_key(&id).then_some(id),
        }
    }

    /// Number of records created so far, discarded constructions included.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of live instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.iter().filter(|slot| slot.is_some()).count()
    }

    /// Resolves an entity into a JSON value, following handle values into
    /// the records and instances they point at.
    ///
    /// A target resolves to the JSON object of its record's own properties.
    /// An instance resolves to
    /// `{"$instance": {"type": ..., "props": ..., "target": ...}}`. A
    /// handle already being resolved further up the walk resolves to
    /// `{"$cycle": n}` with `n` the entity's arena index. Handles this
    /// registry did not issue resolve to their shallow markers.
    #[must_use]
    pub fn to_json_value(&self, entity: impl Into<Entity>) -> serde_json::Value {
        let mut visited = AHashSet::new();
        self.resolve_entity(entity.into(), &mut visited)
    }

    fn resolve_entity(&self, entity: Entity, visited: &mut AHashSet<Entity>) -> serde_json::Value {
        use serde_json::{Value as JV, json};

        if visited.contains(&entity) {
            let index = match entity {
                Entity::Instance(id) => id.index(),
                Entity::Target(id) => id.index(),
            };
            return json!({"$cycle": index});
        }
        visited.insert(entity);

        let result = match entity {
            Entity::Target(id) => match self.targets.get(id.index()) {
                Some(record) => {
                    let map: serde_json::Map<String, JV> = record
                        .iter()
                        .map(|(key, value)| (key.to_owned(), self.resolve_value(value, visited)))
                        .collect();
                    JV::Object(map)
                }
                None => json!({"$target": id.index()}),
            },
            Entity::Instance(id) => match self.instances.get(id.index()).and_then(Option::as_ref) {
                Some(instance) => {
                    let props: serde_json::Map<String, JV> = instance
                        .props()
                        .iter()
                        .map(|(key, value)| (key.clone(), self.resolve_value(value, visited)))
                        .collect();
                    let target = self.resolve_entity(Entity::Target(instance.target()), visited);
                    json!({"$instance": {
                        "type": instance.assembler().name(),
                        "props": props,
                        "target": target,
                    }})
                }
                None => json!({"$instance": id.index()}),
            },
        };

        visited.remove(&entity);
        result
    }

    fn resolve_value(&self, value: &Value, visited: &mut AHashSet<Entity>) -> serde_json::Value {
        match value {
            Value::Target(id) => self.resolve_entity(Entity::Target(*id), visited),
            Value::Instance(id) => self.resolve_entity(Entity::Instance(*id), visited),
            Value::List(items) => serde_json::Value::Array(
                items.iter().map(|item| self.resolve_value(item, visited)).collect(),
            ),
            Value::Map(props) => {
                let map: serde_json::Map<String, serde_json::Value> = props
                    .iter()
                    .map(|(key, value)| (key.clone(), self.resolve_value(value, visited)))
                    .collect();
                serde_json::Value::Object(map)
            }
            other => other.to_json_value(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
