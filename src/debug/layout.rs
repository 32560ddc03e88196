//! Force-directed graph layout for state graph viewers.

use super::snapshot::MachineSnapshot;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Below this separation nodes are treated as coincident.
const MIN_DISTANCE: f32 = 0.01;

/// Tuning for [`GraphLayout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Steps taken by [`GraphLayout::run`]
    pub iterations: u32,
    /// Inverse-square push between every pair of nodes
    pub repulsion: f32,
    /// Spring stiffness along edges
    pub attraction: f32,
    /// Edge length at which the spring is relaxed
    pub rest_length: f32,
    /// Pull of every node towards the origin, proportional to distance
    pub gravity: f32,
    /// Largest distance a node may move in one step
    pub max_step: f32,
    /// Radius of the circle nodes start on
    pub initial_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            repulsion: 20_000.0,
            attraction: 0.02,
            rest_length: 150.0,
            gravity: 0.01,
            max_step: 8.0,
            initial_radius: 200.0,
        }
    }
}

/// 2D positions for the nodes of a machine graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLayout {
    nodes: Vec<String>,
    positions: Vec<Vec2>,
    edges: Vec<(usize, usize)>,
}

impl GraphLayout {
    /// Place the snapshot's nodes evenly on a circle. Self-loops and edges
    /// to unregistered states are left out.
    pub fn from_snapshot(snapshot: &MachineSnapshot, config: &LayoutConfig) -> Self {
        let nodes: Vec<String> = snapshot.nodes().into_iter().map(str::to_string).collect();

        let index_of = |name: &str| nodes.iter().position(|node| node == name);
        let edges = snapshot
            .edges
            .iter()
            .filter_map(|edge| Some((index_of(&edge.from)?, index_of(&edge.to)?)))
            .filter(|(from, to)| from != to)
            .collect();

        let count = nodes.len().max(1) as f32;
        let positions = (0..nodes.len())
            .map(|i| Vec2::from_angle(TAU * i as f32 / count) * config.initial_radius)
            .collect();

        Self {
            nodes,
            positions,
            edges,
        }
    }

    /// Lay out a snapshot in one call.
    pub fn compute(snapshot: &MachineSnapshot, config: &LayoutConfig) -> Self {
        let mut layout = Self::from_snapshot(snapshot, config);
        layout.run(config);
        layout
    }

    pub fn run(&mut self, config: &LayoutConfig) {
        for _ in 0..config.iterations {
            self.step(config);
        }
    }

    /// Apply one round of repulsion, edge springs and gravity.
    pub fn step(&mut self, config: &LayoutConfig) {
        let count = self.positions.len();
        let mut forces = vec![Vec2::ZERO; count];

        for i in 0..count {
            for j in (i + 1)..count {
                let delta = self.positions[i] - self.positions[j];
                let distance = delta.length().max(MIN_DISTANCE);
                // Coincident nodes separate along an index-derived axis.
                let direction = delta
                    .try_normalize()
                    .unwrap_or_else(|| Vec2::from_angle((i * count + j) as f32));
                let push = direction * (config.repulsion / (distance * distance));
                forces[i] += push;
                forces[j] -= push;
            }
        }

        for &(from, to) in &self.edges {
            let delta = self.positions[to] - self.positions[from];
            let distance = delta.length();
            if distance < MIN_DISTANCE {
                continue;
            }
            let pull = delta / distance * (config.attraction * (distance - config.rest_length));
            forces[from] += pull;
            forces[to] -= pull;
        }

        for (position, force) in self.positions.iter_mut().zip(forces) {
            let total = force - *position * config.gravity;
            *position += total.clamp_length_max(config.max_step);
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Edges as indices into [`nodes`](Self::nodes).
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn position(&self, name: &str) -> Option<Vec2> {
        let index = self.nodes.iter().position(|node| node == name)?;
        Some(self.positions[index])
    }

    /// Smallest and largest corner of the box containing every node.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}
