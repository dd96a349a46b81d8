// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! AC line view.

use std::sync::Weak;

use netstore_model::{LineAttributes, Resource, Side};

use crate::equipment::Contained;
use crate::extension::{Extension, ExtensionData, ExtensionKind};
use crate::index::ResourceIndex;
use crate::terminal::Terminal;
use crate::view::{add_sided_position, sided_position, BundleView, Connectable, Extendable, ViewCore};

macro_rules! quantity {
    ($($get:ident / $set:ident: $doc:literal;)+) => {
        $(
            #[doc = $doc]
            pub fn $get(&self) -> f64 {
                self.core.read(|a| a.$get)
            }

            #[doc = concat!("Sets: ", $doc)]
            pub fn $set(&self, value: f64) {
                self.core.write(|a| a.$get = value);
            }
        )+
    };
}

pub(crate) use quantity;

/// An AC line between two voltage levels.
#[derive(Debug)]
pub struct LineView {
    core: ViewCore<LineAttributes>,
    terminal1: Terminal,
    terminal2: Terminal,
}

impl LineView {
    pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<LineAttributes>) -> Self {
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

    quantity! {
        r / set_r: "Series resistance in ohms.";
        x / set_x: "Series reactance in ohms.";
        g1 / set_g1: "Shunt conductance of side one in S.";
        b1 / set_b1: "Shunt susceptance of side one in S.";
        g2 / set_g2: "Shunt conductance of side two in S.";
        b2 / set_b2: "Shunt susceptance of side two in S.";
    }
}

impl BundleView for LineView {
    type Attributes = LineAttributes;

    fn core(&self) -> &ViewCore<LineAttributes> {
        &self.core
    }
}

impl Contained for LineView {
    fn container_ids(&self) -> Vec<String> {
        self.core
            .read(|a| vec![a.voltage_level_id1.clone(), a.voltage_level_id2.clone()])
    }
}

impl Extendable for LineView {
    fn add_extension(&self, data: ExtensionData) {
        add_sided_position(&self.core, data);
    }

    fn extension(&self, kind: ExtensionKind) -> Option<Extension> {
        sided_position(&self.core, kind)
    }
}

impl Connectable for LineView {
    fn terminals(&self) -> Vec<&Terminal> {
        vec![&self.terminal1, &self.terminal2]
    }
}
