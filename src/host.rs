//! The host application the cards talk to.
//!
//! A host owns the entity states and the side-effect primitives (service
//! calls, navigation, events). Cards only ever read state through
//! [`Host::entity`] and request changes through the other methods; they never
//! mutate entity state directly.

use std::collections::BTreeMap;

use dashboard_widgets_common::lifecycle::{ReadError, classify_state};

// =============================================================================
// Entity State
// =============================================================================

/// An entity attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Number(f64),
    Text(String),
}

impl From<f64> for Attribute {
    fn from(v: f64) -> Self { Self::Number(v) }
}

impl From<&str> for Attribute {
    fn from(v: &str) -> Self { Self::Text(v.to_owned()) }
}

/// Snapshot of one entity as the host reports it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityState {
    /// Raw state string, e.g. `"21.5"`, `"on"`, `"unavailable"`.
    pub state: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(
        mut self,
        key: &str,
        value: impl Into<Attribute>,
    ) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// Numeric attribute. Text attributes that parse as numbers count too.
    pub fn number(
        &self,
        key: &str,
    ) -> Option<f32> {
        match self.attributes.get(key)? {
            Attribute::Number(v) if v.is_finite() => Some(*v as f32),
            Attribute::Number(_) => None,
            Attribute::Text(s) => s.trim().parse::<f32>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn text(
        &self,
        key: &str,
    ) -> Option<&str> {
        match self.attributes.get(key)? {
            Attribute::Text(s) => Some(s.as_str()),
            Attribute::Number(_) => None,
        }
    }

    #[inline]
    pub fn friendly_name(&self) -> Option<&str> { self.text("friendly_name") }

    #[inline]
    pub fn unit(&self) -> Option<&str> { self.text("unit_of_measurement") }

    /// Whether the state reads as "on" for toggle-style entities.
    pub fn is_on(&self) -> bool { matches!(self.state.as_str(), "on" | "open" | "heat" | "playing" | "home") }
}

// =============================================================================
// Service Calls
// =============================================================================

/// A request for the host to run `domain.service` with a payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: BTreeMap<String, Attribute>,
}

impl ServiceCall {
    pub fn new(
        domain: &str,
        service: &str,
    ) -> Self {
        Self {
            domain: domain.to_owned(),
            service: service.to_owned(),
            data: BTreeMap::new(),
        }
    }

    /// Builder-style payload setter.
    #[must_use]
    pub fn with(
        mut self,
        key: &str,
        value: impl Into<Attribute>,
    ) -> Self {
        self.data.insert(key.to_owned(), value.into());
        self
    }

    /// Target entity, if the payload names one.
    pub fn entity_id(&self) -> Option<&str> {
        match self.data.get("entity_id")? {
            Attribute::Text(s) => Some(s.as_str()),
            Attribute::Number(_) => None,
        }
    }
}

/// Event a card fires to ask the host to open an entity's detail dialog.
pub const MORE_INFO_EVENT: &str = "hass-more-info";

// =============================================================================
// Host Interface
// =============================================================================

/// What a card may ask of its host.
pub trait Host {
    /// Current state of `entity_id`, `None` if the host has no such entity.
    fn entity(
        &self,
        entity_id: &str,
    ) -> Option<&EntityState>;

    /// Dispatch a service call.
    fn call_service(
        &mut self,
        call: ServiceCall,
    );

    /// Switch the dashboard view.
    fn navigate(
        &mut self,
        path: &str,
    );

    /// Emit a named event for other components.
    fn fire_event(
        &mut self,
        event: &str,
        entity_id: &str,
    );
}

/// Read `entity_id` as a number, classifying every way it can fail.
pub fn read_number(
    host: &dyn Host,
    entity_id: &str,
) -> Result<f32, ReadError> {
    classify_state(host.entity(entity_id).map(|e| e.state.as_str()))
}

// =============================================================================
// Mock Host
// =============================================================================

/// In-memory host for the simulator and tests.
///
/// Records every side effect. A few services are also applied to the stored
/// state so the simulator reacts to taps.
#[derive(Debug, Default)]
pub struct MockHost {
    entities: BTreeMap<String, EntityState>,
    pub calls: Vec<ServiceCall>,
    pub navigations: Vec<String>,
    pub events: Vec<(String, String)>,
}

impl MockHost {
    pub fn new() -> Self { Self::default() }

    pub fn set_entity(
        &mut self,
        entity_id: &str,
        entity: EntityState,
    ) {
        self.entities.insert(entity_id.to_owned(), entity);
    }

    /// Replace only the state string, keeping attributes.
    pub fn set_state(
        &mut self,
        entity_id: &str,
        state: impl Into<String>,
    ) {
        self.entities
            .entry(entity_id.to_owned())
            .or_default()
            .state = state.into();
    }

    pub fn remove_entity(
        &mut self,
        entity_id: &str,
    ) {
        self.entities.remove(entity_id);
    }

    /// Mutable access for updating attributes in place.
    pub fn entity_mut(
        &mut self,
        entity_id: &str,
    ) -> Option<&mut EntityState> {
        self.entities.get_mut(entity_id)
    }

    fn apply(
        &mut self,
        call: &ServiceCall,
    ) {
        let Some(entity_id) = call.entity_id().map(str::to_owned) else {
            return;
        };
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            return;
        };
        match call.service.as_str() {
            "toggle" => entity.state = if entity.is_on() { "off" } else { "on" }.to_owned(),
            "turn_on" => entity.state = "on".to_owned(),
            "turn_off" => entity.state = "off".to_owned(),
            "set_temperature" => {
                if let Some(temp) = call.data.get("temperature") {
                    entity.attributes.insert("temperature".to_owned(), temp.clone());
                }
            }
            _ => {}
        }
    }
}

impl Host for MockHost {
    fn entity(
        &self,
        entity_id: &str,
    ) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    fn call_service(
        &mut self,
        call: ServiceCall,
    ) {
        log::debug!("service call {}.{} {:?}", call.domain, call.service, call.data);
        self.apply(&call);
        self.calls.push(call);
    }

    fn navigate(
        &mut self,
        path: &str,
    ) {
        log::debug!("navigate to {path}");
        self.navigations.push(path.to_owned());
    }

    fn fire_event(
        &mut self,
        event: &str,
        entity_id: &str,
    ) {
        self.events.push((event.to_owned(), entity_id.to_owned()));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_number_classifies() {
        let mut host = MockHost::new();
        assert_eq!(read_number(&host, "sensor.t"), Err(ReadError::MissingEntity));

        host.set_state("sensor.t", "unavailable");
        assert_eq!(read_number(&host, "sensor.t"), Err(ReadError::UnavailableState));

        host.set_state("sensor.t", "21.5");
        assert_eq!(read_number(&host, "sensor.t"), Ok(21.5));
    }

    #[test]
    fn test_attributes() {
        let entity = EntityState::new("heat")
            .with_attribute("temperature", 21.0)
            .with_attribute("current_temperature", "19.5")
            .with_attribute("friendly_name", "Hall");
        assert_eq!(entity.number("temperature"), Some(21.0));
        assert_eq!(entity.number("current_temperature"), Some(19.5), "Numeric text parses");
        assert_eq!(entity.number("friendly_name"), None);
        assert_eq!(entity.friendly_name(), Some("Hall"));
        assert!(entity.is_on());
    }

    #[test]
    fn test_set_state_keeps_attributes() {
        let mut host = MockHost::new();
        host.set_entity("sensor.t", EntityState::new("1").with_attribute("unit_of_measurement", "C"));
        host.set_state("sensor.t", "2");
        let entity = host.entity("sensor.t").unwrap();
        assert_eq!(entity.state, "2");
        assert_eq!(entity.unit(), Some("C"));
    }

    #[test]
    fn test_toggle_applies_and_records() {
        let mut host = MockHost::new();
        host.set_state("light.desk", "off");
        host.call_service(ServiceCall::new("homeassistant", "toggle").with("entity_id", "light.desk"));
        assert_eq!(host.entity("light.desk").unwrap().state, "on");
        assert_eq!(host.calls.len(), 1);
        assert_eq!(host.calls[0].entity_id(), Some("light.desk"));
    }

    #[test]
    fn test_set_temperature_updates_attribute() {
        let mut host = MockHost::new();
        host.set_entity("climate.hall", EntityState::new("heat").with_attribute("temperature", 20.0));
        host.call_service(
            ServiceCall::new("climate", "set_temperature")
                .with("entity_id", "climate.hall")
                .with("temperature", 20.5),
        );
        assert_eq!(host.entity("climate.hall").unwrap().number("temperature"), Some(20.5));
    }
}
