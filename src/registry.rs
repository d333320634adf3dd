//! Instantiating sensors from configuration blocks.
//!
//! [`Registry`] is the host side: it remembers which component ids exist and
//! how each was configured. [`to_code`] is the binding: it builds one
//! [`I2sRmsSensor`] per configuration, registers it as a polling component
//! and as a sensor, then forwards the interval and pins to the instance.

use core::fmt;

use heapless::Vec;

use crate::{
    component::PollingComponent,
    config::{
        Chip,
        ComponentId,
        ConfigError,
        OptionKey,
        SensorConfig,
        SensorMeta,
        Value,
        generated_id,
        validate,
    },
    duration::UpdateInterval,
    sensor::I2sRmsSensor,
    source::FrameSource,
};

/// Slot of a registered component.
pub type ComponentIndex = usize;

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// The id is already registered with a different configuration.
    DuplicateId(ComponentId),
    /// No room for another component.
    Full,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateId(id) => {
                write!(f, "id '{}' is already registered with a different configuration", id)
            }
            RegistryError::Full => f.write_str("component registry is full"),
        }
    }
}

impl core::error::Error for RegistryError {}

/// Failure while turning a configuration block into a sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    Config(ConfigError),
    Registry(RegistryError),
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

impl From<RegistryError> for SetupError {
    fn from(e: RegistryError) -> Self {
        SetupError::Registry(e)
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Config(e) => write!(f, "invalid configuration: {e}"),
            SetupError::Registry(e) => write!(f, "registration failed: {e}"),
        }
    }
}

impl core::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            SetupError::Config(e) => Some(e),
            SetupError::Registry(e) => Some(e),
        }
    }
}

/// One registered component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub config: SensorConfig,
    pub polling: Option<UpdateInterval>,
    /// Sensor options, once registered as a sensor.
    pub sensor: Option<SensorMeta>,
}

/// Host component registry with room for `N` components.
#[derive(Debug, Default)]
pub struct Registry<const N: usize> {
    entries: Vec<Entry, N>,
    generated: u32,
}

impl<const N: usize> Registry<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            generated: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: ComponentIndex) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: &str) -> Option<ComponentIndex> {
        self.entries.iter().position(|e| e.config.id().as_str() == id)
    }

    /// Number of components registered for polling.
    pub fn polling_count(&self) -> usize {
        self.entries.iter().filter(|e| e.polling.is_some()).count()
    }

    /// Number of components registered as sensors.
    pub fn sensor_count(&self) -> usize {
        self.entries.iter().filter(|e| e.sensor.is_some()).count()
    }

    /// Number for the next generated id, skipping ids that are already taken.
    pub fn next_generated_index(&self) -> u32 {
        let mut index = self.generated;
        while self.find(&generated_id(index)).is_some() {
            index += 1;
        }
        index
    }

    /// Index of an identical earlier registration of `config`, if any.
    pub fn lookup(&self, config: &SensorConfig) -> Result<Option<ComponentIndex>, RegistryError> {
        match self.find(config.id()) {
            Some(index) if self.entries[index].config == *config => Ok(Some(index)),
            Some(_) => Err(RegistryError::DuplicateId(config.id().clone())),
            None => Ok(None),
        }
    }

    /// Reserve a slot for `config`.
    pub fn new_component(&mut self, config: &SensorConfig) -> Result<ComponentIndex, RegistryError> {
        if let Some(index) = self.lookup(config)? {
            return Ok(index);
        }
        self.entries
            .push(Entry {
                config: config.clone(),
                polling: None,
                sensor: None,
            })
            .map_err(|_| RegistryError::Full)?;
        Ok(self.entries.len() - 1)
    }

    pub fn register_component(&mut self, index: ComponentIndex, interval: UpdateInterval) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.polling = Some(interval);
        }
    }

    pub fn register_sensor(&mut self, index: ComponentIndex, meta: &SensorMeta) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.sensor = Some(meta.clone());
        }
    }
}

/// Outcome of [`to_code`].
pub enum Binding<'a, S> {
    /// A new instance, registered at the given index.
    Created(I2sRmsSensor<'a, S>, ComponentIndex),
    /// The same configuration was already registered; nothing was built.
    Existing(ComponentIndex),
}

impl<S> Binding<'_, S> {
    pub fn index(&self) -> ComponentIndex {
        match self {
            Binding::Created(_, index) | Binding::Existing(index) => *index,
        }
    }
}

impl<S> fmt::Debug for Binding<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Created(_, index) => f.debug_tuple("Created").field(index).finish(),
            Binding::Existing(index) => f.debug_tuple("Existing").field(index).finish(),
        }
    }
}

/// Build and register the sensor described by `config`.
///
/// `make_source` is only called when a new instance is constructed.
pub fn to_code<'a, S, F, const N: usize>(
    config: &SensorConfig,
    registry: &mut Registry<N>,
    make_source: F,
) -> Result<Binding<'a, S>, RegistryError>
where
    S: FrameSource,
    F: FnOnce() -> S,
{
    if let Some(index) = registry.lookup(config)? {
        debug!("'{}' already registered", config.id().as_str());
        return Ok(Binding::Existing(index));
    }

    let index = registry.new_component(config)?;
    let mut sensor = I2sRmsSensor::new(make_source());
    registry.register_component(index, config.update_interval());
    registry.register_sensor(index, config.meta());
    sensor.set_meta(config.meta().clone());

    sensor.set_update_interval(config.update_interval());
    let pins = config.pins();
    sensor.set_pins(pins.bclk, pins.ws, pins.data);
    sensor.set_sample_rate(config.sample_rate());

    debug!("registered '{}' at slot {}", config.id().as_str(), index);
    Ok(Binding::Created(sensor, index))
}

/// Validate `block` and bind it. Nothing is constructed when validation fails.
///
/// A block without an `id` takes the next free generated id.
pub fn setup_block<'a, S, F, const N: usize>(
    block: &[(&str, Value<'_>)],
    chip: Chip,
    registry: &mut Registry<N>,
    make_source: F,
) -> Result<Binding<'a, S>, SetupError>
where
    S: FrameSource,
    F: FnOnce() -> S,
{
    let generated = registry.next_generated_index();
    let config = validate(block, chip, generated)?;
    let binding = to_code(&config, registry, make_source)?;
    if !block.iter().any(|(key, _)| *key == OptionKey::Id.as_str()) {
        registry.generated = generated + 1;
    }
    Ok(binding)
}
