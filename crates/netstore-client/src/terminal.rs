// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Terminals: the connection point of equipment to a voltage level.
//!
//! A [`Terminal`] is one generic implementation parameterised by a
//! [`TerminalAdapter`] that maps the uniform terminal surface onto whichever
//! fields of the owner's attributes hold that terminal's data. Equipment
//! kinds without some capability report it per call instead of exposing a
//! reduced interface.

use std::sync::{Arc, RwLock, Weak};

use netstore_model::{
    BranchAttributes, BusbarSectionAttributes, InjectionAttributes, Resource, Side, TopologyKind,
};

use crate::error::IndexError;
use crate::extension::{Feeder, SlotCodec};
use crate::equipment::Equipment;
use crate::index::{upgrade, ResourceIndex};
use crate::sync::{read_lock, write_lock};
use crate::view::VoltageLevelView;

/// Maps terminal reads and writes onto an owner's attribute fields.
pub trait TerminalAdapter: Send + Sync {
    /// Voltage level of the terminal.
    fn voltage_level_id(&self) -> String;
    /// Node number, present in node-breaker mode.
    fn node(&self) -> Option<i32>;
    /// Connected bus in bus-breaker mode.
    fn bus(&self) -> Option<String>;
    /// Connectable bus in bus-breaker mode.
    fn connectable_bus(&self) -> Option<String>;
    /// Active power flow.
    fn p(&self) -> Result<f64, IndexError>;
    /// Sets the active power flow.
    fn set_p(&self, p: f64) -> Result<(), IndexError>;
    /// Reactive power flow.
    fn q(&self) -> Result<f64, IndexError>;
    /// Sets the reactive power flow.
    fn set_q(&self, q: f64) -> Result<(), IndexError>;
    /// Feeder position slot of this terminal.
    fn position(&self) -> Result<Option<Feeder>, IndexError>;
}

/// Adapter for single-terminal equipment with flows.
pub(crate) struct InjectionTerminal<A> {
    resource: Arc<RwLock<Resource<A>>>,
}

impl<A> InjectionTerminal<A> {
    pub(crate) fn new(resource: Arc<RwLock<Resource<A>>>) -> Self {
        Self { resource }
    }
}

impl<A: InjectionAttributes> TerminalAdapter for InjectionTerminal<A> {
    fn voltage_level_id(&self) -> String {
        read_lock(&self.resource).attributes().voltage_level_id().to_owned()
    }

    fn node(&self) -> Option<i32> {
        read_lock(&self.resource).attributes().node()
    }

    fn bus(&self) -> Option<String> {
        read_lock(&self.resource).attributes().bus().map(str::to_owned)
    }

    fn connectable_bus(&self) -> Option<String> {
        read_lock(&self.resource)
            .attributes()
            .connectable_bus()
            .map(str::to_owned)
    }

    fn p(&self) -> Result<f64, IndexError> {
        Ok(read_lock(&self.resource).attributes().p())
    }

    fn set_p(&self, p: f64) -> Result<(), IndexError> {
        write_lock(&self.resource).attributes_mut().set_p(p);
        Ok(())
    }

    fn q(&self) -> Result<f64, IndexError> {
        Ok(read_lock(&self.resource).attributes().q())
    }

    fn set_q(&self, q: f64) -> Result<(), IndexError> {
        write_lock(&self.resource).attributes_mut().set_q(q);
        Ok(())
    }

    fn position(&self) -> Result<Option<Feeder>, IndexError> {
        Ok(read_lock(&self.resource)
            .attributes()
            .position()
            .map(Feeder::reconstruct))
    }
}

/// Adapter for busbar sections, which have a node but no flows.
pub(crate) struct BusbarSectionTerminal {
    resource: Arc<RwLock<Resource<BusbarSectionAttributes>>>,
}

impl BusbarSectionTerminal {
    pub(crate) fn new(resource: Arc<RwLock<Resource<BusbarSectionAttributes>>>) -> Self {
        Self { resource }
    }

    fn no_flow(&self, operation: &'static str) -> IndexError {
        IndexError::invariant(
            operation,
            read_lock(&self.resource).id(),
            "busbar sections carry no power flow or feeder position",
        )
    }
}

impl TerminalAdapter for BusbarSectionTerminal {
    fn voltage_level_id(&self) -> String {
        read_lock(&self.resource).attributes().voltage_level_id.clone()
    }

    fn node(&self) -> Option<i32> {
        Some(read_lock(&self.resource).attributes().node)
    }

    fn bus(&self) -> Option<String> {
        None
    }

    fn connectable_bus(&self) -> Option<String> {
        None
    }

    fn p(&self) -> Result<f64, IndexError> {
        Err(self.no_flow("p"))
    }

    fn set_p(&self, _p: f64) -> Result<(), IndexError> {
        Err(self.no_flow("set_p"))
    }

    fn q(&self) -> Result<f64, IndexError> {
        Err(self.no_flow("q"))
    }

    fn set_q(&self, _q: f64) -> Result<(), IndexError> {
        Err(self.no_flow("set_q"))
    }

    fn position(&self) -> Result<Option<Feeder>, IndexError> {
        Err(self.no_flow("position"))
    }
}

/// Adapter for one side of a two-terminal equipment.
pub(crate) struct BranchTerminal<A> {
    resource: Arc<RwLock<Resource<A>>>,
    side: Side,
}

impl<A> BranchTerminal<A> {
    pub(crate) fn new(resource: Arc<RwLock<Resource<A>>>, side: Side) -> Self {
        Self { resource, side }
    }
}

impl<A: BranchAttributes> TerminalAdapter for BranchTerminal<A> {
    fn voltage_level_id(&self) -> String {
        read_lock(&self.resource)
            .attributes()
            .voltage_level_id(self.side)
            .to_owned()
    }

    fn node(&self) -> Option<i32> {
        read_lock(&self.resource).attributes().node(self.side)
    }

    fn bus(&self) -> Option<String> {
        read_lock(&self.resource)
            .attributes()
            .bus(self.side)
            .map(str::to_owned)
    }

    fn connectable_bus(&self) -> Option<String> {
        read_lock(&self.resource)
            .attributes()
            .connectable_bus(self.side)
            .map(str::to_owned)
    }

    fn p(&self) -> Result<f64, IndexError> {
        Ok(read_lock(&self.resource).attributes().p(self.side))
    }

    fn set_p(&self, p: f64) -> Result<(), IndexError> {
        write_lock(&self.resource).attributes_mut().set_p(self.side, p);
        Ok(())
    }

    fn q(&self) -> Result<f64, IndexError> {
        Ok(read_lock(&self.resource).attributes().q(self.side))
    }

    fn set_q(&self, q: f64) -> Result<(), IndexError> {
        write_lock(&self.resource).attributes_mut().set_q(self.side, q);
        Ok(())
    }

    fn position(&self) -> Result<Option<Feeder>, IndexError> {
        Ok(read_lock(&self.resource)
            .attributes()
            .position(self.side)
            .map(Feeder::reconstruct))
    }
}

/// Connection point of an equipment to a voltage level.
///
/// The topology mode of a terminal follows its data: a terminal with a node
/// is node-breaker, anything else is bus-breaker. Accessors belonging to the
/// other mode fail with [`IndexError::Unsupported`].
pub struct Terminal {
    connectable_id: String,
    side: Option<Side>,
    index: Weak<ResourceIndex>,
    adapter: Box<dyn TerminalAdapter>,
}

impl Terminal {
    pub(crate) fn new(
        connectable_id: &str,
        side: Option<Side>,
        index: Weak<ResourceIndex>,
        adapter: Box<dyn TerminalAdapter>,
    ) -> Self {
        Self {
            connectable_id: connectable_id.to_owned(),
            side,
            index,
            adapter,
        }
    }

    pub(crate) fn injection<A: InjectionAttributes>(
        connectable_id: &str,
        index: Weak<ResourceIndex>,
        resource: Arc<RwLock<Resource<A>>>,
    ) -> Self {
        Self::new(
            connectable_id,
            None,
            index,
            Box::new(InjectionTerminal::new(resource)),
        )
    }

    pub(crate) fn branch<A: BranchAttributes>(
        connectable_id: &str,
        side: Side,
        index: Weak<ResourceIndex>,
        resource: Arc<RwLock<Resource<A>>>,
    ) -> Self {
        Self::new(
            connectable_id,
            Some(side),
            index,
            Box::new(BranchTerminal::new(resource, side)),
        )
    }

    /// Id of the owning equipment.
    pub fn connectable_id(&self) -> &str {
        &self.connectable_id
    }

    /// Side of the owning equipment, `None` for single-terminal equipment.
    pub const fn side(&self) -> Option<Side> {
        self.side
    }

    /// Owning equipment.
    pub fn connectable(&self) -> Result<Equipment, IndexError> {
        upgrade(&self.index, &self.connectable_id)?.resolve(&self.connectable_id)
    }

    /// Id of the voltage level this terminal belongs to.
    pub fn voltage_level_id(&self) -> String {
        self.adapter.voltage_level_id()
    }

    /// Voltage level this terminal belongs to.
    pub fn voltage_level(&self) -> Result<Arc<VoltageLevelView>, IndexError> {
        upgrade(&self.index, &self.connectable_id)?
            .resolve_as::<VoltageLevelView>(&self.adapter.voltage_level_id())
    }

    /// Topology mode of this terminal.
    pub fn topology_kind(&self) -> TopologyKind {
        if self.adapter.node().is_some() {
            TopologyKind::NodeBreaker
        } else {
            TopologyKind::BusBreaker
        }
    }

    /// Node number. Node-breaker only.
    pub fn node(&self) -> Result<i32, IndexError> {
        self.adapter
            .node()
            .ok_or_else(|| IndexError::not_applicable("node", &self.connectable_id))
    }

    /// Connected bus, `None` when disconnected. Bus-breaker only.
    pub fn bus_id(&self) -> Result<Option<String>, IndexError> {
        self.require_bus_breaker("bus_id")?;
        Ok(self.adapter.bus())
    }

    /// Bus the terminal can be connected to. Bus-breaker only.
    pub fn connectable_bus_id(&self) -> Result<Option<String>, IndexError> {
        self.require_bus_breaker("connectable_bus_id")?;
        Ok(self.adapter.connectable_bus())
    }

    /// Returns `true` if the terminal is connected. Bus-breaker terminals
    /// are connected when their bus is set; node-breaker terminals always
    /// report connected since switch states are not evaluated.
    pub fn is_connected(&self) -> bool {
        match self.topology_kind() {
            TopologyKind::NodeBreaker => true,
            TopologyKind::BusBreaker => self.adapter.bus().is_some(),
        }
    }

    /// Active power flow in MW.
    pub fn p(&self) -> Result<f64, IndexError> {
        self.adapter.p()
    }

    /// Sets the active power flow in MW.
    pub fn set_p(&self, p: f64) -> Result<(), IndexError> {
        self.adapter.set_p(p)
    }

    /// Reactive power flow in MVar.
    pub fn q(&self) -> Result<f64, IndexError> {
        self.adapter.q()
    }

    /// Sets the reactive power flow in MVar.
    pub fn set_q(&self, q: f64) -> Result<(), IndexError> {
        self.adapter.set_q(q)
    }

    /// Feeder position of this terminal.
    pub fn position(&self) -> Result<Option<Feeder>, IndexError> {
        self.adapter.position()
    }

    fn require_bus_breaker(&self, operation: &'static str) -> Result<(), IndexError> {
        if self.adapter.node().is_some() {
            return Err(IndexError::not_applicable(operation, &self.connectable_id));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("connectable_id", &self.connectable_id)
            .field("side", &self.side)
            .field("voltage_level_id", &self.adapter.voltage_level_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use netstore_model::{LineAttributes, LoadAttributes};

    fn shared<A>(resource: Resource<A>) -> Arc<RwLock<Resource<A>>> {
        Arc::new(RwLock::new(resource))
    }

    #[test]
    fn busbar_section_flows_are_invariant_violations() {
        let bbs = shared(Resource::new("BBS1", BusbarSectionAttributes::new("VL1", 0)));
        let terminal = Terminal::new(
            "BBS1",
            None,
            Weak::new(),
            Box::new(BusbarSectionTerminal::new(bbs)),
        );
        assert_eq!(terminal.node().unwrap(), 0);
        assert!(terminal.p().unwrap_err().is_invariant_violation());
        assert!(terminal.set_q(1.0).unwrap_err().is_invariant_violation());
        assert!(terminal.position().unwrap_err().is_invariant_violation());
        assert!(terminal.bus_id().unwrap_err().is_unsupported());
    }

    #[test]
    fn injection_terminal_writes_through() {
        let mut attrs = LoadAttributes::new("VL1");
        attrs.bus = Some("B1".into());
        let load = shared(Resource::new("LOAD", attrs));
        let terminal = Terminal::injection("LOAD", Weak::new(), Arc::clone(&load));
        assert_eq!(terminal.topology_kind(), TopologyKind::BusBreaker);
        assert!(terminal.node().unwrap_err().is_unsupported());
        assert_eq!(terminal.bus_id().unwrap().as_deref(), Some("B1"));
        assert!(terminal.p().unwrap().is_nan());
        terminal.set_p(12.5).unwrap();
        assert_eq!(read_lock(&load).attributes().p, 12.5);
    }

    #[test]
    fn branch_sides_are_independent() {
        let mut attrs = LineAttributes::new("VL1", "VL2");
        attrs.node1 = Some(4);
        attrs.bus2 = Some("B2".into());
        let line = shared(Resource::new("LINE", attrs));
        let t1 = Terminal::branch("LINE", Side::One, Weak::new(), Arc::clone(&line));
        let t2 = Terminal::branch("LINE", Side::Two, Weak::new(), Arc::clone(&line));
        assert_eq!(t1.voltage_level_id(), "VL1");
        assert_eq!(t2.voltage_level_id(), "VL2");
        assert_eq!(t1.node().unwrap(), 4);
        assert_eq!(t2.bus_id().unwrap().as_deref(), Some("B2"));
        t2.set_q(-3.0).unwrap();
        assert!(read_lock(&line).attributes().q1.is_nan());
        assert_eq!(read_lock(&line).attributes().q2, -3.0);
    }

    #[test]
    fn dangling_index_is_reported_not_panicked() {
        let load = shared(Resource::new("LOAD", LoadAttributes::new("VL1")));
        let terminal = Terminal::injection("LOAD", Weak::new(), load);
        assert!(terminal.voltage_level().unwrap_err().is_invariant_violation());
    }
}
