//! Tether Graph - WASM Module
//!
//! An interactive force-directed graph simulation. A fixed set of nodes and
//! links is laid out by a small set of physical forces (centering, charge,
//! collision, springs) that are integrated one step at a time while the user
//! drags nodes, pans and zooms. The engine is compiled to WebAssembly and
//! exposes a JavaScript-friendly API via wasm-bindgen; the same engine is
//! usable directly from Rust.
//!
//! # Architecture
//!
//! - `graph`: input schema and the validated graph model (petgraph StableGraph)
//! - `force`: the force trait, built-in forces and the ordered registry
//! - `simulation`: the step integrator and alpha state machine
//! - `spatial`: R-tree spatial indexing for collision candidates and hit testing
//! - `interaction`: drag gesture and pan/zoom transform

use js_sys::{Float64Array, Function};
use wasm_bindgen::prelude::*;

pub mod error;
pub mod force;
pub mod graph;
pub mod interaction;
pub mod simulation;
pub mod spatial;

pub use error::{LayoutError, LayoutResult};
pub use force::{Force, ForceConfig};
pub use graph::{GraphData, GraphLink, GraphNode, NodeId};
pub use simulation::{Phase, Simulation, SimulationConfig, StepResult};

use interaction::{DragController, ViewTransform};
use simulation::ObserverId;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the existing logger.
    let _ = console_log::init_with_level(log::Level::Debug);
}

impl From<LayoutError> for JsValue {
    fn from(err: LayoutError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Main entry point for the simulation.
///
/// This struct wraps a [`Simulation`] together with the view transform and
/// drag state of one canvas and provides the public API exposed to
/// JavaScript.
#[wasm_bindgen]
pub struct TetherGraphWasm {
    sim: Simulation,
    view: ViewTransform,
    drag: DragController,
}

#[wasm_bindgen]
impl TetherGraphWasm {
    /// Create a simulation.
    ///
    /// # Arguments
    ///
    /// * `graph` - `{ nodes: [{ id, x?, y?, fx?, fy? }], links: [{ source, target }] }`
    /// * `forces` - Optional force options; `undefined` uses the defaults
    /// * `center_x`, `center_y` - Centering target, usually the canvas middle
    #[wasm_bindgen(constructor)]
    pub fn new(
        graph: JsValue,
        forces: JsValue,
        center_x: f64,
        center_y: f64,
    ) -> Result<TetherGraphWasm, JsValue> {
        let data: GraphData = serde_wasm_bindgen::from_value(graph)?;
        let forces: ForceConfig = if forces.is_undefined() || forces.is_null() {
            ForceConfig::default()
        } else {
            serde_wasm_bindgen::from_value(forces)?
        };

        Ok(Self {
            sim: Simulation::new(&data, forces, center_x, center_y)?,
            view: ViewTransform::default(),
            drag: DragController::default(),
        })
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance one step. Returns the new alpha.
    pub fn step(&mut self) -> f64 {
        self.sim.step().alpha
    }

    /// Advance `steps` steps. Returns the new alpha.
    pub fn tick(&mut self, steps: u32) -> f64 {
        self.sim.run(steps as usize).alpha
    }

    /// Register a callback invoked as `fn(alpha, phase)` after every step.
    ///
    /// Returns a handle for `offStep`.
    #[wasm_bindgen(js_name = onStep)]
    pub fn on_step(&mut self, callback: Function) -> u32 {
        let id = self.sim.on_step(move |view| {
            let alpha = JsValue::from_f64(view.alpha);
            let phase = JsValue::from_str(view.phase.as_str());
            if let Err(err) = callback.call2(&JsValue::NULL, &alpha, &phase) {
                web_sys::console::error_1(&err);
            }
        });
        id.handle()
    }

    /// Unregister a step callback.
    #[wasm_bindgen(js_name = offStep)]
    pub fn off_step(&mut self, handle: u32) -> bool {
        self.sim.remove_observer(ObserverId::from_handle(handle))
    }

    // =========================================================================
    // Simulation Control
    // =========================================================================

    /// Pin a node (number or string id) at `(x, y)` in graph space.
    pub fn pin(&mut self, id: JsValue, x: f64, y: f64) -> Result<(), JsValue> {
        let id: NodeId = serde_wasm_bindgen::from_value(id)?;
        Ok(self.sim.pin(&id, x, y)?)
    }

    /// Release a pinned node.
    pub fn unpin(&mut self, id: JsValue) -> Result<(), JsValue> {
        let id: NodeId = serde_wasm_bindgen::from_value(id)?;
        Ok(self.sim.unpin(&id)?)
    }

    /// Raise the alpha target to `target` in (0, 1].
    pub fn reheat(&mut self, target: f64) -> Result<(), JsValue> {
        Ok(self.sim.reheat(target)?)
    }

    /// Release the alpha target.
    pub fn cool(&mut self) {
        self.sim.cool();
    }

    #[wasm_bindgen(js_name = setAlpha)]
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), JsValue> {
        Ok(self.sim.set_alpha(alpha)?)
    }

    pub fn alpha(&self) -> f64 {
        self.sim.alpha()
    }

    #[wasm_bindgen(js_name = alphaTarget)]
    pub fn alpha_target(&self) -> f64 {
        self.sim.alpha_target()
    }

    /// `"active"`, `"settling"` or `"cold"`.
    pub fn phase(&self) -> String {
        self.sim.phase().as_str().to_string()
    }

    /// True once alpha has decayed; the host may stop its animation loop.
    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self) -> bool {
        self.sim.is_settled()
    }

    /// Tune a force, e.g. `setForceParameter("charge", "strength", -60)`.
    #[wasm_bindgen(js_name = setForceParameter)]
    pub fn set_force_parameter(
        &mut self,
        force: &str,
        parameter: &str,
        value: f64,
    ) -> Result<(), JsValue> {
        Ok(self.sim.set_force_parameter(force, parameter, value)?)
    }

    #[wasm_bindgen(js_name = forceParameter)]
    pub fn force_parameter(&self, force: &str, parameter: &str) -> Result<f64, JsValue> {
        Ok(self.sim.force_parameter(force, parameter)?)
    }

    /// Move the centering target, e.g. after a canvas resize.
    #[wasm_bindgen(js_name = setCenter)]
    pub fn set_center(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        Ok(self.sim.set_center(x, y)?)
    }

    // =========================================================================
    // Node and Edge Data
    // =========================================================================

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.sim.nodes().len() as u32
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.sim.edges().len() as u32
    }

    /// Node ids in slot order.
    #[wasm_bindgen(js_name = nodeIds)]
    pub fn node_ids(&self) -> Result<JsValue, JsValue> {
        let ids: Vec<&NodeId> = self.sim.nodes().iter().map(|n| &n.id).collect();
        Ok(serde_wasm_bindgen::to_value(&ids)?)
    }

    /// Node positions as [x0, y0, x1, y1, ...] in slot order.
    pub fn positions(&self) -> Float64Array {
        Float64Array::from(&flat_positions(self.sim.nodes())[..])
    }

    /// Edge endpoints as [sx0, sy0, tx0, ty0, ...] in input order.
    #[wasm_bindgen(js_name = edgePositions)]
    pub fn edge_positions(&self) -> Float64Array {
        Float64Array::from(&flat_segments(&self.sim.view())[..])
    }

    /// Edge endpoint slots as [source0, target0, source1, target1, ...].
    #[wasm_bindgen(js_name = edgePairs)]
    pub fn edge_pairs(&self) -> Vec<u32> {
        self.sim
            .edges()
            .iter()
            .flat_map(|e| [e.source as u32, e.target as u32])
            .collect()
    }

    /// Id of the node nearest to graph point `(x, y)`, or `undefined`.
    ///
    /// With `radius`, only nodes within that distance are considered.
    #[wasm_bindgen(js_name = findNode)]
    pub fn find_node(&self, x: f64, y: f64, radius: Option<f64>) -> Result<JsValue, JsValue> {
        match self.sim.find(x, y, radius) {
            Some(node) => Ok(serde_wasm_bindgen::to_value(&node.id)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Pointer pressed at screen `(sx, sy)`.
    ///
    /// Returns true if a node was grabbed; otherwise the host should pan.
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, sx: f64, sy: f64) -> Result<bool, JsValue> {
        Ok(self.drag.start(&mut self.sim, &self.view, sx, sy)?)
    }

    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, sx: f64, sy: f64) -> Result<(), JsValue> {
        Ok(self.drag.drag(&mut self.sim, &self.view, sx, sy)?)
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> Result<(), JsValue> {
        Ok(self.drag.end(&mut self.sim)?)
    }

    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view.pan_by(dx, dy);
    }

    /// Zoom by `factor` around screen `(sx, sy)`.
    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
        self.view.zoom_at(sx, sy, factor);
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Keyboard shortcut. `"r"` resets the view. Returns true if handled.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        handle_key(&mut self.view, key)
    }

    /// Current view transform as [x, y, k].
    pub fn transform(&self) -> Vec<f64> {
        vec![self.view.x, self.view.y, self.view.k]
    }

    /// Convert a screen point to graph space as [x, y].
    #[wasm_bindgen(js_name = screenToGraph)]
    pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Vec<f64> {
        let (x, y) = self.view.screen_to_graph(sx, sy);
        vec![x, y]
    }
}

fn flat_positions(nodes: &[graph::Node]) -> Vec<f64> {
    nodes.iter().flat_map(|n| [n.x, n.y]).collect()
}

fn flat_segments(view: &StepResult<'_>) -> Vec<f64> {
    view.segments()
        .flat_map(|((sx, sy), (tx, ty))| [sx, sy, tx, ty])
        .collect()
}

fn handle_key(view: &mut ViewTransform, key: &str) -> bool {
    match key {
        "r" | "R" => {
            view.reset();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod integration_tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::interaction::DRAG_ALPHA_TARGET;

    /// The demo graph: twelve nodes, node 0 linked to 5, 4 and 3.
    fn demo_data() -> GraphData {
        serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": 0}, {"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}, {"id": 5},
                    {"id": 6}, {"id": 7}, {"id": 8}, {"id": 9}, {"id": 10}, {"id": 11}
                ],
                "links": [
                    {"source": 0, "target": 5},
                    {"source": 0, "target": 4},
                    {"source": 0, "target": 3}
                ]
            }"#,
        )
        .unwrap()
    }

    fn distance(a: &graph::Node, b: &graph::Node) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn test_demo_graph_settles_into_readable_layout() {
        let mut sim = Simulation::new(&demo_data(), ForceConfig::default(), 480.0, 270.0).unwrap();

        let mut steps = 0;
        while !sim.is_settled() {
            sim.step();
            steps += 1;
            assert!(steps <= 310);
        }

        let nodes = sim.nodes();
        for (i, a) in nodes.iter().enumerate() {
            assert!(a.x.is_finite() && a.y.is_finite());
            for b in &nodes[i + 1..] {
                assert!(distance(a, b) > 35.0, "{} and {} overlap", a.id, b.id);
            }
        }
        for edge in sim.edges() {
            let d = distance(&nodes[edge.source], &nodes[edge.target]);
            assert!((60.0..110.0).contains(&d), "edge length {d}");
        }

        let (cx, cy) = sim.graph().centroid().unwrap();
        assert!((cx - 480.0).abs() < 1.0 && (cy - 270.0).abs() < 1.0);
    }

    #[test]
    fn test_drag_session_end_to_end() {
        let mut sim = Simulation::new(&demo_data(), ForceConfig::default(), 0.0, 0.0).unwrap();
        sim.run(400);
        assert!(sim.is_settled());

        let frames = Rc::new(Cell::new(0));
        let counter = frames.clone();
        sim.on_step(move |_| counter.set(counter.get() + 1));

        let view = ViewTransform::default();
        let mut drag = DragController::default();
        let hub = sim.node(&NodeId::Index(0)).unwrap().clone();
        assert!(drag.start(&mut sim, &view, hub.x, hub.y).unwrap());
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET);

        // Drag the hub 200 units right over 60 frames.
        for i in 1..=60 {
            let x = hub.x + 200.0 * i as f64 / 60.0;
            drag.drag(&mut sim, &view, x, hub.y).unwrap();
            let frame = sim.step();
            assert_eq!(frame.nodes[0].x, x);
            assert_eq!(frame.phase, Phase::Active);
        }
        drag.end(&mut sim).unwrap();
        assert_eq!(sim.phase(), Phase::Settling);

        // Leaves followed the hub.
        let nodes = sim.nodes();
        for leaf in [3, 4, 5] {
            assert!(distance(&nodes[0], &nodes[leaf]) < 180.0);
        }

        while !sim.is_settled() {
            sim.step();
        }
        assert!(frames.get() > 60);
        assert!(!sim.node(&NodeId::Index(0)).unwrap().is_pinned());
    }

    #[test]
    fn test_named_nodes_from_json() {
        let data: GraphData = serde_json::from_str(
            r#"{
                "nodes": [{"id": "core", "fx": 0, "fy": 0}, {"id": "a"}, {"id": "b"}],
                "links": [{"source": "core", "target": "a"}, {"source": "core", "target": "b"}]
            }"#,
        )
        .unwrap();
        let mut sim = Simulation::new(&data, ForceConfig::default(), 0.0, 0.0).unwrap();
        let view = sim.run(300);

        assert_eq!((view.nodes[0].x, view.nodes[0].y), (0.0, 0.0));
        let err = sim.pin(&NodeId::from("missing"), 1.0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), r#"unknown node "missing""#);
    }

    #[test]
    fn test_custom_force_joins_registry() {
        /// Constant drift to the right.
        struct Wind;

        impl Force for Wind {
            fn name(&self) -> &str {
                "wind"
            }

            fn apply(&mut self, nodes: &mut [graph::Node], alpha: f64, _jitter: &mut force::Jitter) {
                for node in nodes {
                    node.vx += alpha;
                }
            }

            fn parameter(&self, name: &str) -> LayoutResult<f64> {
                Err(LayoutError::UnknownParameter {
                    force: "wind".into(),
                    parameter: name.into(),
                })
            }

            fn set_parameter(&mut self, name: &str, _value: f64) -> LayoutResult<()> {
                Err(LayoutError::UnknownParameter {
                    force: "wind".into(),
                    parameter: name.into(),
                })
            }
        }

        let mut sim = Simulation::new(&demo_data(), ForceConfig::none(), 0.0, 0.0).unwrap();
        let before = sim.graph().centroid().unwrap();
        sim.add_force(Box::new(Wind));
        sim.run(10);
        let after = sim.graph().centroid().unwrap();

        assert!(after.0 > before.0);
        assert!((after.1 - before.1).abs() < 1e-9);
    }

    #[test]
    fn test_flat_exports() {
        let data = GraphData {
            nodes: vec![GraphNode::new(0u64).at(1.0, 2.0), GraphNode::new(1u64).at(3.0, 4.0)],
            links: vec![GraphLink::new(1u64, 0u64)],
        };
        let sim = Simulation::new(&data, ForceConfig::none(), 0.0, 0.0).unwrap();

        assert_eq!(flat_positions(sim.nodes()), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(flat_segments(&sim.view()), vec![3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_reset_key() {
        let mut view = ViewTransform::default();
        view.zoom_at(10.0, 10.0, 4.0);

        assert!(!handle_key(&mut view, "x"));
        assert!(!view.is_identity());
        assert!(handle_key(&mut view, "r"));
        assert!(view.is_identity());
    }
}
