use time::{Duration, OffsetDateTime};

use crate::configs::settings::Automation;
use crate::models::{ActuationCommand, DeviceId, Power};

/// Averages produced when an accumulation window closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverage {
    pub temperature_c: f64,
    pub lux: f64,
    pub closed_at: OffsetDateTime,
}

/// Accumulates raw samples over a fixed window and emits one average per
/// closed window.
///
/// A window opens on the first sample after a reset and closes on the
/// sample whose timestamp is not less than the window length past the
/// start; that closing sample is always included in the average.
#[derive(Debug)]
pub struct WindowAggregator {
    window: Duration,
    started_at: Option<OffsetDateTime>,
    sum_temp_c: f64,
    sum_lux: f64,
    sample_count: u32,
}

impl WindowAggregator {
    pub fn new(window_seconds: u64) -> Self {
        Self {
            window: Duration::seconds(window_seconds as i64),
            started_at: None,
            sum_temp_c: 0.0,
            sum_lux: 0.0,
            sample_count: 0,
        }
    }

    pub fn add_sample(
        &mut self,
        temperature_c: f64,
        lux: f64,
        observed_at: OffsetDateTime,
    ) -> Option<WindowAverage> {
        let started_at = *self.started_at.get_or_insert(observed_at);

        self.sum_temp_c += temperature_c;
        self.sum_lux += lux;
        self.sample_count += 1;

        if observed_at - started_at < self.window {
            return None;
        }

        let count = f64::from(self.sample_count);
        let average = WindowAverage {
            temperature_c: self.sum_temp_c / count,
            lux: self.sum_lux / count,
            closed_at: observed_at,
        };

        tracing::info!(
            "Automation window completed: samples={} avg_temp_c={:.2} avg_lux={:.2}",
            self.sample_count,
            average.temperature_c,
            average.lux,
        );

        self.reset();

        Some(average)
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.sum_temp_c = 0.0;
        self.sum_lux = 0.0;
        self.sample_count = 0;
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.started_at.is_none() && self.sample_count == 0
    }
}

/// Dual-threshold on/off decisions for the fan and the light.
///
/// Each actuator carries an on and an off threshold forming a deadband:
/// averages strictly between them leave state untouched, so noise near a
/// single boundary cannot chatter the actuator. Equality at a threshold
/// never triggers a transition. The engine is total: every average yields
/// a (possibly empty) decision.
#[derive(Debug)]
pub struct DecisionEngine {
    thresholds: Automation,
    fan: Power,
    light: Power,
}

impl DecisionEngine {
    /// Threshold ordering (`fan_off < fan_on`, `light_on < light_off`) is
    /// enforced at settings load.
    pub fn new(thresholds: Automation) -> Self {
        Self {
            thresholds,
            fan: Power::Off,
            light: Power::Off,
        }
    }

    /// Maps a closed-window average onto zero or more actuation commands,
    /// fan before light. State is written only on a real transition.
    pub fn decide(&mut self, average: &WindowAverage) -> Vec<ActuationCommand> {
        let mut commands = Vec::new();

        let fan_next = match self.fan {
            Power::Off if average.temperature_c > self.thresholds.fan_on_temp_c => Power::On,
            Power::On if average.temperature_c < self.thresholds.fan_off_temp_c => Power::Off,
            current => current,
        };
        if fan_next != self.fan {
            self.fan = fan_next;
            commands.push(ActuationCommand::automation(
                DeviceId::Fan,
                fan_next,
                average.closed_at,
            ));
        }

        // Inverted relationship: dark turns the light on, bright turns it off
        let light_next = match self.light {
            Power::Off if average.lux < self.thresholds.light_on_lux => Power::On,
            Power::On if average.lux > self.thresholds.light_off_lux => Power::Off,
            current => current,
        };
        if light_next != self.light {
            self.light = light_next;
            commands.push(ActuationCommand::automation(
                DeviceId::Light,
                light_next,
                average.closed_at,
            ));
        }

        commands
    }

    pub fn fan(&self) -> Power {
        self.fan
    }

    pub fn light(&self) -> Power {
        self.light
    }
}

/// Window aggregation and hysteresis decisions behind a single sample feed.
pub struct AutomationService {
    aggregator: WindowAggregator,
    engine: DecisionEngine,
}

impl AutomationService {
    pub fn new(settings: &Automation) -> Self {
        Self {
            aggregator: WindowAggregator::new(settings.window_seconds),
            engine: DecisionEngine::new(settings.clone()),
        }
    }

    /// Feed one validated reading; returns the commands decided by the
    /// window this sample closed, if any.
    pub fn observe(
        &mut self,
        temperature_c: f64,
        lux: f64,
        observed_at: OffsetDateTime,
    ) -> Vec<ActuationCommand> {
        match self.aggregator.add_sample(temperature_c, lux, observed_at) {
            Some(average) => self.engine.decide(&average),
            None => Vec::new(),
        }
    }
}
