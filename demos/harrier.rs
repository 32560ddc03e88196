//! Harrier
//!
//! A hovering gunship that notices a target, closes in, fires missiles on a
//! cooldown and breaks off when hit.
//!
//! Key concepts:
//! - States with behaviour driving the agent's pose
//! - Cooldowns kept in the property store with `get_add_set`
//! - A wildcard transition fired by a one-shot trigger
//! - Animation events forwarded to the current state
//! - A JSON debug snapshot and a graph layout for inspection tools
//!
//! Run with: RUST_LOG=statecraft=debug cargo run --example harrier

use glam::Vec3;
use serde::Serialize;
use statecraft::{
    GraphLayout, LayoutConfig, MachineContext, PoseHandle, State, StateMachineBuilder,
    TransitionBuilder, VisualizerRegistry,
};
use tracing::info;

/// Seconds per simulated frame.
const DT: f32 = 0.1;

/// Handles the states drive.
struct Rig {
    body: PoseHandle,
    missiles_fired: u32,
}

type Ctx = MachineContext<Rig>;

#[derive(Serialize)]
struct HarrierTunables {
    chase_range: f32,
    attack_range: f32,
    speed: f32,
    fire_cooldown: f32,
    retreat_time: f32,
    missiles: i32,
}

struct Idle;

impl State<Rig> for Idle {
    fn on_enter(&mut self, ctx: &mut Ctx) {
        info!(frame = ctx.frame(), "hovering");
    }
}

struct Chasing;

impl State<Rig> for Chasing {
    fn on_tick(&mut self, ctx: &mut Ctx) {
        let Some(direction) = ctx.direction_to_target() else {
            return;
        };
        let speed = ctx.properties.get::<f32>("speed");
        ctx.shared.body.translate(direction * speed * DT);
        if let Some(target) = ctx.target_position() {
            ctx.shared.body.face_towards(target);
        }
    }
}

struct Attacking;

impl State<Rig> for Attacking {
    fn on_enter(&mut self, ctx: &mut Ctx) {
        // First missile leaves on the entry frame.
        let _ = ctx.properties.set("fire_timer", 0.0_f32);
    }

    fn on_tick(&mut self, ctx: &mut Ctx) {
        if ctx.properties.get_add_set("fire_timer", -DT) > 0.0 {
            return;
        }
        if ctx.properties.get::<i32>("missiles") <= 0 {
            return;
        }

        let remaining = ctx.properties.get_add_set("missiles", -1_i32);
        let cooldown = ctx.properties.get::<f32>("fire_cooldown");
        let _ = ctx.properties.set("fire_timer", cooldown);
        ctx.shared.missiles_fired += 1;
        info!(frame = ctx.frame(), remaining, "missile away");
    }

    fn on_event(&mut self, ctx: &mut Ctx, kind: &str, id: i32) {
        info!(frame = ctx.frame(), kind, id, "attack animation event");
    }
}

struct Retreat;

impl State<Rig> for Retreat {
    fn on_enter(&mut self, ctx: &mut Ctx) {
        let retreat_time = ctx.properties.get::<f32>("retreat_time");
        let _ = ctx.properties.set("retreat_timer", retreat_time);
    }

    fn on_tick(&mut self, ctx: &mut Ctx) {
        ctx.properties.get_add_set("retreat_timer", -DT);
        if let Some(direction) = ctx.direction_to_target() {
            let speed = ctx.properties.get::<f32>("speed");
            ctx.shared.body.translate(-direction * speed * 2.0 * DT);
        }
    }
}

fn within(ctx: &Ctx, range: &str) -> bool {
    let range = ctx.properties.get::<f32>(range);
    ctx.distance_to_target().is_some_and(|d| d <= range)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let body = PoseHandle::at(Vec3::new(0.0, 20.0, 0.0));
    let target = PoseHandle::at(Vec3::new(40.0, 0.0, 0.0));

    let mut harrier = StateMachineBuilder::new()
        .import_properties(&HarrierTunables {
            chase_range: 30.0,
            attack_range: 15.0,
            speed: 12.0,
            fire_cooldown: 0.5,
            retreat_time: 1.5,
            missiles: 4,
        })
        .state("Idle", Idle)
        .state("Chasing", Chasing)
        .state("Attacking", Attacking)
        .state("Retreat", Retreat)
        .default_state("Idle")
        .transition(
            TransitionBuilder::new()
                .any_state()
                .to("Retreat")
                .on_trigger("hit")
                .on_transition(|ctx: &mut Ctx| info!(frame = ctx.frame(), "hit, breaking off")),
        )
        .transition(
            TransitionBuilder::new()
                .from("Idle")
                .to("Chasing")
                .when(|ctx: &mut Ctx| within(ctx, "chase_range")),
        )
        .transition(
            TransitionBuilder::new()
                .from("Chasing")
                .to("Attacking")
                .when(|ctx: &mut Ctx| within(ctx, "attack_range")),
        )
        .transition(
            TransitionBuilder::new()
                .from("Chasing")
                .to("Idle")
                .when(|ctx: &mut Ctx| !within(ctx, "chase_range")),
        )
        .transition(
            TransitionBuilder::new()
                .from("Attacking")
                .to("Idle")
                .when(|ctx: &mut Ctx| ctx.properties.get::<i32>("missiles") <= 0),
        )
        .transition(
            TransitionBuilder::new()
                .from("Attacking")
                .to("Chasing")
                .when(|ctx: &mut Ctx| !within(ctx, "attack_range")),
        )
        .transition(
            TransitionBuilder::new()
                .from("Retreat")
                .to("Idle")
                .when(|ctx: &mut Ctx| ctx.properties.get::<f32>("retreat_timer") <= 0.0),
        )
        .build(
            body.clone(),
            Rig {
                body: body.clone(),
                missiles_fired: 0,
            },
        )?;
    harrier.context_mut().set_target(target.clone());

    let mut registry = VisualizerRegistry::new();

    for frame in 1..=60 {
        // The target drifts slowly towards the harrier.
        target.translate(Vec3::new(-0.5, 0.0, 0.0));

        if frame == 25 {
            harrier.on_event("missile_launch", 1);
        }
        if frame == 40 {
            harrier.set_trigger("hit", true);
        }

        harrier.tick();
        registry.publish("harrier-01", &harrier);
    }

    info!(
        state = harrier.current_state_name(),
        missiles_fired = harrier.shared().missiles_fired,
        path = ?harrier.history().get_path(),
        "simulation finished"
    );

    let snapshot = harrier.snapshot();
    println!("{}", snapshot.to_json()?);

    let layout = GraphLayout::compute(&snapshot, &LayoutConfig::default());
    for (node, position) in layout.nodes().iter().zip(layout.positions()) {
        println!("{node:>10} at ({:7.1}, {:7.1})", position.x, position.y);
    }

    Ok(())
}
