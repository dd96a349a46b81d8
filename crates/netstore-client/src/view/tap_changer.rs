// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tap changers nested in two windings transformer attributes.
//!
//! Changers and steps are borrowed handles on the transformer view. They
//! read and write the nested records in place, so a step setter changes the
//! transformer's bundle directly. A handle whose changer has since been
//! cleared reports [`IndexError::InvariantViolation`].

use netstore_model::{
    PhaseRegulationMode, PhaseTapChangerAttributes, PhaseTapChangerStepAttributes,
    RatioTapChangerAttributes, RatioTapChangerStepAttributes, TwoWindingsTransformerAttributes,
};

use crate::error::IndexError;
use crate::view::ViewCore;

type Core = ViewCore<TwoWindingsTransformerAttributes>;

macro_rules! tap_changer {
    (
        $changer:ident, $step:ident, $slot:ident, $record:ty, $step_attrs:ty, $label:literal;
        $($field:ident / $setter:ident: $what:literal),+ $(,)?
    ) => {
        #[doc = concat!("The ", $label, " tap changer of a transformer.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $changer<'a> {
            core: &'a Core,
        }

        impl<'a> $changer<'a> {
            pub(crate) const fn new(core: &'a Core) -> Self {
                Self { core }
            }

            fn read<R>(
                &self,
                operation: &'static str,
                f: impl FnOnce(&$record) -> R,
            ) -> Result<R, IndexError> {
                self.core
                    .read(|a| a.$slot.as_ref().map(f))
                    .ok_or_else(|| cleared(self.core, operation))
            }

            fn write<R>(
                &self,
                operation: &'static str,
                f: impl FnOnce(&mut $record) -> R,
            ) -> Result<R, IndexError> {
                self.core
                    .write(|a| a.$slot.as_mut().map(f))
                    .ok_or_else(|| cleared(self.core, operation))
            }

            /// Position of the first step.
            pub fn low_tap_position(&self) -> Result<i32, IndexError> {
                self.read("low_tap_position", |c| c.low_tap_position)
            }

            /// Position of the last step.
            pub fn high_tap_position(&self) -> Result<i32, IndexError> {
                self.read("high_tap_position", |c| {
                    c.low_tap_position.saturating_add(step_span(c.steps.len()))
                })
            }

            /// Current tap position.
            pub fn tap_position(&self) -> Result<i32, IndexError> {
                self.read("tap_position", |c| c.tap_position)
            }

            /// Moves the tap. The position must designate an existing step.
            pub fn set_tap_position(&self, position: i32) -> Result<(), IndexError> {
                let id = self.core.id();
                self.write("set_tap_position", |c| {
                    offset(id, "set_tap_position", c.low_tap_position, c.steps.len(), position)?;
                    c.tap_position = position;
                    Ok(())
                })?
            }

            /// Number of steps.
            pub fn step_count(&self) -> Result<usize, IndexError> {
                self.read("step_count", |c| c.steps.len())
            }

            /// Returns `true` if regulation is active.
            pub fn is_regulating(&self) -> Result<bool, IndexError> {
                self.read("is_regulating", |c| c.regulating)
            }

            /// Turns regulation on or off.
            pub fn set_regulating(&self, regulating: bool) -> Result<(), IndexError> {
                self.write("set_regulating", |c| c.regulating = regulating)
            }

            /// Regulation deadband (NaN when unset).
            pub fn target_deadband(&self) -> Result<f64, IndexError> {
                self.read("target_deadband", |c| c.target_deadband)
            }

            /// Sets the regulation deadband.
            pub fn set_target_deadband(&self, deadband: f64) -> Result<(), IndexError> {
                self.write("set_target_deadband", |c| c.target_deadband = deadband)
            }

            /// Step at `position`.
            ///
            /// Fails with [`IndexError::InvariantViolation`] when `position`
            /// is outside `[low_tap_position, high_tap_position]`.
            pub fn step(&self, position: i32) -> Result<$step<'a>, IndexError> {
                let id = self.core.id();
                let offset = self.read("step", |c| {
                    offset(id, "step", c.low_tap_position, c.steps.len(), position)
                })??;
                Ok($step {
                    core: self.core,
                    offset,
                    position,
                })
            }

            /// Step at the current tap position.
            pub fn current_step(&self) -> Result<$step<'a>, IndexError> {
                self.step(self.tap_position()?)
            }

            /// Every step, from the low tap position upwards.
            pub fn steps(&self) -> Result<Vec<$step<'a>>, IndexError> {
                let (low, count) = self.read("steps", |c| (c.low_tap_position, c.steps.len()))?;
                Ok((0..count)
                    .zip(low..)
                    .map(|(offset, position)| $step {
                        core: self.core,
                        offset,
                        position,
                    })
                    .collect())
            }
        }

        #[doc = concat!("One step of a ", $label, " tap changer.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $step<'a> {
            core: &'a Core,
            offset: usize,
            position: i32,
        }

        impl $step<'_> {
            fn read<R>(&self, f: impl FnOnce(&$step_attrs) -> R) -> Result<R, IndexError> {
                self.core
                    .read(|a| a.$slot.as_ref().and_then(|c| c.steps.get(self.offset)).map(f))
                    .ok_or_else(|| cleared(self.core, "step"))
            }

            fn write(&self, f: impl FnOnce(&mut $step_attrs)) -> Result<(), IndexError> {
                self.core
                    .write(|a| a.$slot.as_mut().and_then(|c| c.steps.get_mut(self.offset)).map(f))
                    .ok_or_else(|| cleared(self.core, "step"))
            }

            /// Tap position of this step.
            pub const fn position(&self) -> i32 {
                self.position
            }

            /// Copy of the step record.
            pub fn attributes(&self) -> Result<$step_attrs, IndexError> {
                self.read(|s| *s)
            }

            $(
                #[doc = concat!($what, " of this step.")]
                pub fn $field(&self) -> Result<f64, IndexError> {
                    self.read(|s| s.$field)
                }

                #[doc = concat!("Sets the ", $what, " of this step.")]
                pub fn $setter(&self, value: f64) -> Result<(), IndexError> {
                    self.write(|s| s.$field = value)
                }
            )+
        }
    };
}

tap_changer! {
    PhaseTapChanger, PhaseTapChangerStep, phase_tap_changer,
    PhaseTapChangerAttributes, PhaseTapChangerStepAttributes, "phase";
    rho / set_rho: "Voltage ratio",
    r / set_r: "Resistance deviation",
    x / set_x: "Reactance deviation",
    g / set_g: "Conductance deviation",
    b / set_b: "Susceptance deviation",
    alpha / set_alpha: "Phase shift",
}

tap_changer! {
    RatioTapChanger, RatioTapChangerStep, ratio_tap_changer,
    RatioTapChangerAttributes, RatioTapChangerStepAttributes, "ratio";
    rho / set_rho: "Voltage ratio",
    r / set_r: "Resistance deviation",
    x / set_x: "Reactance deviation",
    g / set_g: "Conductance deviation",
    b / set_b: "Susceptance deviation",
}

impl PhaseTapChanger<'_> {
    /// Regulation mode.
    pub fn regulation_mode(&self) -> Result<PhaseRegulationMode, IndexError> {
        self.read("regulation_mode", |c| c.regulation_mode)
    }

    /// Sets the regulation mode.
    pub fn set_regulation_mode(&self, mode: PhaseRegulationMode) -> Result<(), IndexError> {
        self.write("set_regulation_mode", |c| c.regulation_mode = mode)
    }

    /// Regulation target (NaN when unset).
    pub fn regulation_value(&self) -> Result<f64, IndexError> {
        self.read("regulation_value", |c| c.regulation_value)
    }

    /// Sets the regulation target.
    pub fn set_regulation_value(&self, value: f64) -> Result<(), IndexError> {
        self.write("set_regulation_value", |c| c.regulation_value = value)
    }
}

impl RatioTapChanger<'_> {
    /// Returns `true` if the changer can operate under load.
    pub fn has_load_tap_changing_capabilities(&self) -> Result<bool, IndexError> {
        self.read("has_load_tap_changing_capabilities", |c| {
            c.load_tap_changing_capabilities
        })
    }

    /// Voltage target in kV (NaN when unset).
    pub fn target_v(&self) -> Result<f64, IndexError> {
        self.read("target_v", |c| c.target_v)
    }

    /// Sets the voltage target.
    pub fn set_target_v(&self, target_v: f64) -> Result<(), IndexError> {
        self.write("set_target_v", |c| c.target_v = target_v)
    }
}

fn cleared(core: &Core, operation: &'static str) -> IndexError {
    IndexError::invariant(operation, core.id(), "tap changer no longer exists")
}

fn step_span(count: usize) -> i32 {
    i32::try_from(count).map_or(i32::MAX, |n| n - 1)
}

/// Offset of `position` in a step list starting at `low`.
fn offset(
    id: &str,
    operation: &'static str,
    low: i32,
    count: usize,
    position: i32,
) -> Result<usize, IndexError> {
    usize::try_from(i64::from(position) - i64::from(low))
        .ok()
        .filter(|offset| *offset < count)
        .ok_or_else(|| {
            IndexError::invariant(
                operation,
                id,
                format!(
                    "tap position {position} outside [{low}, {}]",
                    i64::from(low) + i64::try_from(count).unwrap_or(i64::MAX) - 1
                ),
            )
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use netstore_model::Resource;
    use std::sync::Weak;

    fn transformer() -> Core {
        let mut attrs = TwoWindingsTransformerAttributes::new("VL1", "VL2", 380.0, 225.0);
        attrs.phase_tap_changer = Some(PhaseTapChangerAttributes {
            low_tap_position: -1,
            tap_position: 0,
            regulation_mode: PhaseRegulationMode::FixedTap,
            regulation_value: f64::NAN,
            regulating: false,
            target_deadband: f64::NAN,
            steps: [-10.0, 0.0, 10.0]
                .into_iter()
                .map(|alpha| PhaseTapChangerStepAttributes {
                    rho: 1.0,
                    r: 0.0,
                    x: 0.0,
                    g: 0.0,
                    b: 0.0,
                    alpha,
                })
                .collect(),
        });
        ViewCore::new(Weak::new(), Resource::new("TWT", attrs))
    }

    #[test]
    fn steps_are_addressed_by_tap_position() {
        let core = transformer();
        let ptc = PhaseTapChanger::new(&core);
        assert_eq!(ptc.high_tap_position().unwrap(), 1);
        assert_eq!(ptc.step(-1).unwrap().alpha().unwrap(), -10.0);
        assert_eq!(ptc.current_step().unwrap().alpha().unwrap(), 0.0);
        let positions: Vec<i32> = ptc.steps().unwrap().iter().map(|s| s.position()).collect();
        assert_eq!(positions, [-1, 0, 1]);
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let core = transformer();
        let ptc = PhaseTapChanger::new(&core);
        assert!(ptc.step(2).err().unwrap().is_invariant_violation());
        assert!(ptc.step(-2).err().unwrap().is_invariant_violation());
        assert!(ptc.set_tap_position(5).unwrap_err().is_invariant_violation());
        assert_eq!(ptc.tap_position().unwrap(), 0);
    }

    #[test]
    fn high_position_saturates_near_the_integer_limit() {
        let core = transformer();
        core.write(|a| {
            if let Some(ptc) = a.phase_tap_changer.as_mut() {
                ptc.low_tap_position = i32::MAX - 1;
                ptc.tap_position = i32::MAX - 1;
            }
        });
        let ptc = PhaseTapChanger::new(&core);
        assert_eq!(ptc.high_tap_position().unwrap(), i32::MAX);
        assert_eq!(ptc.step(i32::MAX).unwrap().alpha().unwrap(), 0.0);
    }

    #[test]
    fn cleared_changer_invalidates_handles() {
        let core = transformer();
        let step = PhaseTapChanger::new(&core).step(1).unwrap();
        core.write(|a| a.phase_tap_changer = None);
        assert!(step.rho().unwrap_err().is_invariant_violation());
        assert!(RatioTapChanger::new(&core)
            .tap_position()
            .unwrap_err()
            .is_invariant_violation());
    }
}
