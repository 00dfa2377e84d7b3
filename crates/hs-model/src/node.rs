//! Fluid nodes — the shared boundary conditions between subsystems.

use std::ops::{Index, IndexMut};

use hs_core::{NodeId, STD_BARO_PRESS};

/// State of one air node.
///
/// Equipment models write flows and conditions to their outlet nodes; the
/// core reads zone inlet, exhaust and return nodes and writes return nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub name:                String,
    /// Dry-bulb temperature [°C].
    pub temp:                f64,
    /// Humidity ratio [kg water / kg dry air].
    pub hum_rat:             f64,
    /// Specific enthalpy [J/kg].
    pub enthalpy:            f64,
    /// Pressure [Pa].
    pub press:               f64,
    /// Current mass flow rate [kg/s].
    pub mass_flow:           f64,
    /// Hardware maximum mass flow rate [kg/s].
    pub mass_flow_max:       f64,
    /// Maximum mass flow available this iteration [kg/s].
    pub mass_flow_max_avail: f64,
    /// Minimum mass flow available this iteration [kg/s].
    pub mass_flow_min_avail: f64,
}

impl Node {
    /// A still node at 20 °C, 8 g/kg and standard pressure.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:                name.into(),
            temp:                20.0,
            hum_rat:             0.008,
            enthalpy:            0.0,
            press:               STD_BARO_PRESS,
            mass_flow:           0.0,
            mass_flow_max:       0.0,
            mass_flow_max_avail: 0.0,
            mass_flow_min_avail: 0.0,
        }
    }
}

/// Arena of [`Node`]s indexed by [`NodeId`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeStore {
    pub nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Sum of mass flows over `ids` [kg/s].
    pub fn total_mass_flow(&self, ids: &[NodeId]) -> f64 {
        ids.iter().map(|&id| self[id].mass_flow).sum()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<NodeId> for NodeStore {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeStore {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
