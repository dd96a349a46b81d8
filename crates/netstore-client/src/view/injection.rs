// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Load and generator views.

use std::sync::{Arc, Weak};

use netstore_model::{EnergySource, GeneratorAttributes, LoadAttributes, LoadType, Resource};

use crate::equipment::Contained;
use crate::error::IndexError;
use crate::extension::{Extension, ExtensionData, ExtensionKind};
use crate::index::ResourceIndex;
use crate::terminal::Terminal;
use crate::view::{
    add_single_position, single_position, BundleView, Connectable, Extendable, ViewCore,
    VoltageLevelView,
};

macro_rules! injection_view {
    ($view:ident, $attrs:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug)]
        pub struct $view {
            core: ViewCore<$attrs>,
            terminal: Terminal,
        }

        impl $view {
            pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<$attrs>) -> Self {
                let core = ViewCore::new(index, resource);
                let terminal = Terminal::injection(core.id(), core.weak_index(), core.shared());
                Self { core, terminal }
            }

            /// The equipment's terminal.
            pub const fn terminal(&self) -> &Terminal {
                &self.terminal
            }

            /// Voltage level the terminal belongs to.
            pub fn voltage_level(&self) -> Result<Arc<VoltageLevelView>, IndexError> {
                self.terminal.voltage_level()
            }
        }

        impl BundleView for $view {
            type Attributes = $attrs;

            fn core(&self) -> &ViewCore<$attrs> {
                &self.core
            }
        }

        impl Contained for $view {
            fn container_ids(&self) -> Vec<String> {
                vec![self.core.read(|a| a.voltage_level_id.clone())]
            }
        }

        impl Extendable for $view {
            fn add_extension(&self, data: ExtensionData) {
                add_single_position(&self.core, data);
            }

            fn extension(&self, kind: ExtensionKind) -> Option<Extension> {
                single_position(&self.core, kind)
            }
        }

        impl Connectable for $view {
            fn terminals(&self) -> Vec<&Terminal> {
                vec![&self.terminal]
            }
        }
    };
}

injection_view!(LoadView, LoadAttributes, "A load.");
injection_view!(GeneratorView, GeneratorAttributes, "A generator.");

impl LoadView {
    /// Load kind.
    pub fn load_type(&self) -> LoadType {
        self.core.read(|a| a.load_type)
    }

    /// Sets the load kind.
    pub fn set_load_type(&self, load_type: LoadType) {
        self.core.write(|a| a.load_type = load_type);
    }

    /// Active power setpoint in MW.
    pub fn p0(&self) -> f64 {
        self.core.read(|a| a.p0)
    }

    /// Sets the active power setpoint.
    pub fn set_p0(&self, p0: f64) {
        self.core.write(|a| a.p0 = p0);
    }

    /// Reactive power setpoint in MVar.
    pub fn q0(&self) -> f64 {
        self.core.read(|a| a.q0)
    }

    /// Sets the reactive power setpoint.
    pub fn set_q0(&self, q0: f64) {
        self.core.write(|a| a.q0 = q0);
    }
}

impl GeneratorView {
    /// Primary energy.
    pub fn energy_source(&self) -> EnergySource {
        self.core.read(|a| a.energy_source)
    }

    /// Sets the primary energy.
    pub fn set_energy_source(&self, source: EnergySource) {
        self.core.write(|a| a.energy_source = source);
    }

    /// Minimum active power in MW.
    pub fn min_p(&self) -> f64 {
        self.core.read(|a| a.min_p)
    }

    /// Sets the minimum active power.
    pub fn set_min_p(&self, min_p: f64) {
        self.core.write(|a| a.min_p = min_p);
    }

    /// Maximum active power in MW.
    pub fn max_p(&self) -> f64 {
        self.core.read(|a| a.max_p)
    }

    /// Sets the maximum active power.
    pub fn set_max_p(&self, max_p: f64) {
        self.core.write(|a| a.max_p = max_p);
    }

    /// Returns `true` if the generator regulates voltage.
    pub fn is_voltage_regulator_on(&self) -> bool {
        self.core.read(|a| a.voltage_regulator_on)
    }

    /// Turns voltage regulation on or off.
    pub fn set_voltage_regulator_on(&self, on: bool) {
        self.core.write(|a| a.voltage_regulator_on = on);
    }

    /// Active power target in MW.
    pub fn target_p(&self) -> f64 {
        self.core.read(|a| a.target_p)
    }

    /// Sets the active power target.
    pub fn set_target_p(&self, target_p: f64) {
        self.core.write(|a| a.target_p = target_p);
    }

    /// Reactive power target in MVar (NaN when unset).
    pub fn target_q(&self) -> f64 {
        self.core.read(|a| a.target_q)
    }

    /// Sets the reactive power target.
    pub fn set_target_q(&self, target_q: f64) {
        self.core.write(|a| a.target_q = target_q);
    }

    /// Voltage target in kV (NaN when unset).
    pub fn target_v(&self) -> f64 {
        self.core.read(|a| a.target_v)
    }

    /// Sets the voltage target.
    pub fn set_target_v(&self, target_v: f64) {
        self.core.write(|a| a.target_v = target_v);
    }
}
