// ── Port fact resolution ──
//
// Each method issues the backend reads for one fact of one port and
// normalizes the outcome into a `Fact`. Nothing here fails: a backend
// error is logged and degrades to the fact's sentinel.

use tracing::debug;

use crate::backend::{BackendError, Backends};
use crate::model::{
    DeviceId, DeviceType, Fact, Frequency, ModulationScheme, OchSignal, PortNumber, PortType,
    PowerRange, PowerRangeKind, PortPowerRange, fmt_double,
};

/// Frequency facts derived from a port's signal set.
///
/// All three are absent together when the set is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrequencyLimits {
    pub min: Option<Frequency>,
    pub max: Option<Frequency>,
    pub spacing: Option<Frequency>,
}

impl FrequencyLimits {
    /// Extremes are chosen by spacing multiplier. The spacing comes from
    /// the lowest-multiplier signal.
    pub fn from_signals<'a>(signals: impl IntoIterator<Item = &'a OchSignal>) -> Self {
        let mut lowest: Option<&OchSignal> = None;
        let mut highest: Option<&OchSignal> = None;
        for signal in signals {
            if lowest.is_none_or(|s| signal.spacing_multiplier < s.spacing_multiplier) {
                lowest = Some(signal);
            }
            if highest.is_none_or(|s| signal.spacing_multiplier > s.spacing_multiplier) {
                highest = Some(signal);
            }
        }
        Self {
            min: lowest.map(OchSignal::central_frequency),
            max: highest.map(OchSignal::central_frequency),
            spacing: lowest.map(|s| s.channel_spacing.frequency()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }
}

/// The port's current frequency, or the zero sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wavelength {
    Assigned(Frequency),
    Unassigned,
}

impl Wavelength {
    pub fn render(&self) -> String {
        match self {
            Self::Assigned(freq) => fmt_double(freq.as_thz()),
            Self::Unassigned => "0".to_owned(),
        }
    }
}

/// Resolves facts about one port.
#[derive(Debug)]
pub struct PortFactResolver<'a> {
    backends: &'a Backends,
    device_id: &'a DeviceId,
    port: PortNumber,
}

impl<'a> PortFactResolver<'a> {
    pub fn new(backends: &'a Backends, device_id: &'a DeviceId, port: PortNumber) -> Self {
        Self {
            backends,
            device_id,
            port,
        }
    }

    fn absorb<T>(&self, fact: &str, result: Result<T, BackendError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(
                    device_id = %self.device_id,
                    port = %self.port,
                    fact,
                    error = %e,
                    "backend read failed"
                );
                None
            }
        }
    }

    pub async fn frequency_limits(&self) -> FrequencyLimits {
        let signals = self.backends.optical.query_lambdas(self.device_id, self.port).await;
        self.absorb("frequency_limits", signals)
            .map(|signals| FrequencyLimits::from_signals(&signals))
            .unwrap_or_default()
    }

    /// Input range when the port has one, else the target range.
    pub async fn power_range(&self) -> Fact<PortPowerRange> {
        let optical = &self.backends.optical;
        let input = optical.input_power_range(self.device_id, self.port).await;
        if let Some(Some(range)) = self.absorb("input_power_range", input) {
            return Fact::Known(PortPowerRange {
                kind: PowerRangeKind::Input,
                range,
            });
        }
        let target = optical.target_power_range(self.device_id, self.port).await;
        match self.absorb("target_power_range", target).flatten() {
            Some(range) => Fact::Known(PortPowerRange {
                kind: PowerRangeKind::Target,
                range,
            }),
            None => Fact::NotApplicable,
        }
    }

    pub async fn target_power_range(&self) -> Option<PowerRange> {
        let range = self
            .backends
            .optical
            .target_power_range(self.device_id, self.port)
            .await;
        self.absorb("target_power_range", range).flatten()
    }

    pub async fn current_power(&self) -> Fact<f64> {
        let power = self.backends.optical.current_power(self.device_id, self.port).await;
        Fact::from_option(self.absorb("current_power", power).flatten())
    }

    pub async fn current_input_power(&self) -> Fact<f64> {
        let power = self
            .backends
            .optical
            .current_input_power(self.device_id, self.port)
            .await;
        Fact::from_option(self.absorb("current_input_power", power).flatten())
    }

    pub async fn has_target_power(&self) -> bool {
        let has = self
            .backends
            .optical
            .has_target_power(self.device_id, self.port)
            .await;
        self.absorb("has_target_power", has).unwrap_or(false)
    }

    /// Not applicable when the port has no configurable target power.
    pub async fn target_power(&self) -> Fact<f64> {
        if !self.has_target_power().await {
            return Fact::NotApplicable;
        }
        let power = self.backends.optical.target_power(self.device_id, self.port).await;
        Fact::from_option(self.absorb("target_power", power).flatten())
    }

    /// Only line-side channel ports are asked for a modulation.
    pub async fn modulation(&self, port_type: PortType) -> Fact<ModulationScheme> {
        if !port_type.carries_modulation() {
            return Fact::Unknown;
        }
        let scheme = self.backends.optical.modulation(self.device_id, self.port).await;
        Fact::from_option(self.absorb("modulation", scheme).flatten())
    }

    /// Input port status of the protection path reporting on this port.
    pub async fn service_state(&self, device_type: Option<DeviceType>) -> Fact<String> {
        if !device_type.is_some_and(DeviceType::is_protection_switch) {
            return Fact::NotApplicable;
        }
        let states = self
            .backends
            .optical
            .protection_switch_states(self.device_id)
            .await;
        let Some(states) = self.absorb("service_state", states) else {
            return Fact::Unknown;
        };
        states
            .values()
            .flat_map(|endpoint| &endpoint.path_states)
            .find(|path| path.output.port == self.port)
            .and_then(|path| path.input_port_status())
            .map_or(Fact::Unknown, |status| Fact::Known(status.to_owned()))
    }

    pub async fn wavelength(&self) -> Wavelength {
        let freq = self.backends.optical.wavelength(self.device_id, self.port).await;
        self.absorb("wavelength", freq)
            .flatten()
            .map_or(Wavelength::Unassigned, Wavelength::Assigned)
    }
}
