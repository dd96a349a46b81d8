// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two windings transformer view.

use std::sync::{Arc, Weak};

use netstore_model::{
    PhaseTapChangerAttributes, RatioTapChangerAttributes, Resource, Side,
    TwoWindingsTransformerAttributes,
};

use crate::equipment::Contained;
use crate::error::IndexError;
use crate::extension::{Extension, ExtensionData, ExtensionKind};
use crate::index::ResourceIndex;
use crate::terminal::Terminal;
use crate::view::line::quantity;
use crate::view::{
    add_sided_position, sided_position, BundleView, Connectable, Extendable, PhaseTapChanger,
    RatioTapChanger, SubstationView, ViewCore,
};

/// A two windings transformer, optionally fitted with tap changers.
#[derive(Debug)]
pub struct TwoWindingsTransformerView {
    core: ViewCore<TwoWindingsTransformerAttributes>,
    terminal1: Terminal,
    terminal2: Terminal,
}

impl TwoWindingsTransformerView {
    pub(crate) fn build(
        index: Weak<ResourceIndex>,
        resource: Resource<TwoWindingsTransformerAttributes>,
    ) -> Self {
        let core = ViewCore::new(index, resource);
        let terminal1 = Terminal::branch(core.id(), Side::One, core.weak_index(), core.shared());
        let terminal2 = Terminal::branch(core.id(), Side::Two, core.weak_index(), core.shared());
        Self {
            core,
            terminal1,
            terminal2,
        }
    }

    /// Terminal of `side`.
    pub const fn terminal(&self, side: Side) -> &Terminal {
        match side {
            Side::One => &self.terminal1,
            Side::Two => &self.terminal2,
        }
    }

    /// Terminal of side one.
    pub const fn terminal1(&self) -> &Terminal {
        &self.terminal1
    }

    /// Terminal of side two.
    pub const fn terminal2(&self) -> &Terminal {
        &self.terminal2
    }

    /// Substation holding the transformer, found through side one.
    pub fn substation(&self) -> Result<Arc<SubstationView>, IndexError> {
        self.terminal1.voltage_level()?.substation()
    }

    quantity! {
        r / set_r: "Series resistance in ohms.";
        x / set_x: "Series reactance in ohms.";
        g / set_g: "Magnetizing conductance in S.";
        b / set_b: "Magnetizing susceptance in S.";
        rated_u1 / set_rated_u1: "Rated voltage of side one in kV.";
        rated_u2 / set_rated_u2: "Rated voltage of side two in kV.";
    }

    /// Phase tap changer, if fitted.
    pub fn phase_tap_changer(&self) -> Option<PhaseTapChanger<'_>> {
        self.core
            .read(|a| a.phase_tap_changer.is_some())
            .then(|| PhaseTapChanger::new(&self.core))
    }

    /// Fits, replaces or removes the phase tap changer.
    pub fn set_phase_tap_changer(&self, changer: Option<PhaseTapChangerAttributes>) {
        self.core.write(|a| a.phase_tap_changer = changer);
    }

    /// Ratio tap changer, if fitted.
    pub fn ratio_tap_changer(&self) -> Option<RatioTapChanger<'_>> {
        self.core
            .read(|a| a.ratio_tap_changer.is_some())
            .then(|| RatioTapChanger::new(&self.core))
    }

    /// Fits, replaces or removes the ratio tap changer.
    pub fn set_ratio_tap_changer(&self, changer: Option<RatioTapChangerAttributes>) {
        self.core.write(|a| a.ratio_tap_changer = changer);
    }
}

impl BundleView for TwoWindingsTransformerView {
    type Attributes = TwoWindingsTransformerAttributes;

    fn core(&self) -> &ViewCore<TwoWindingsTransformerAttributes> {
        &self.core
    }
}

impl Contained for TwoWindingsTransformerView {
    fn container_ids(&self) -> Vec<String> {
        self.core
            .read(|a| vec![a.voltage_level_id1.clone(), a.voltage_level_id2.clone()])
    }
}

impl Extendable for TwoWindingsTransformerView {
    fn add_extension(&self, data: ExtensionData) {
        add_sided_position(&self.core, data);
    }

    fn extension(&self, kind: ExtensionKind) -> Option<Extension> {
        sided_position(&self.core, kind)
    }
}

impl Connectable for TwoWindingsTransformerView {
    fn terminals(&self) -> Vec<&Terminal> {
        vec![&self.terminal1, &self.terminal2]
    }
}
