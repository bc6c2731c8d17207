#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine that drives a Treasure Hunt world to completion.
//!
//! The engine deploys every adventurer, then plays turns until nobody is
//! active. Adventurers are resolved strictly in active-list order and each
//! command is applied before the next adventurer is looked at, so the first
//! adventurer to reach a contested cell keeps it.

use log::{debug, trace};
use treasure_hunt_core::{AdventurerId, Command, Event};
use treasure_hunt_system_movement::Resolver;
use treasure_hunt_world::{self as world, query, World};

/// Final world together with every event broadcast during the run.
#[derive(Clone, Debug)]
pub struct Simulation {
    world: World,
    events: Vec<Event>,
}

impl Simulation {
    /// World in its final state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events in the order they were broadcast.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the simulation, yielding the final world and the event log.
    #[must_use]
    pub fn into_parts(self) -> (World, Vec<Event>) {
        (self.world, self.events)
    }
}

/// Orchestrates deployment and the per-turn loop.
#[derive(Debug, Default)]
pub struct TurnEngine {
    resolver: Resolver,
}

impl TurnEngine {
    /// Plays a freshly constructed world until every adventurer retired.
    #[must_use]
    pub fn run(&self, mut world: World) -> Simulation {
        let mut events = Vec::new();
        self.initialize(&mut world, &mut events);
        while self.play_turn(&mut world, &mut events) {}
        debug!(
            "simulation finished after {} turns with {} retired adventurers",
            query::turn(&world),
            query::retired(&world).len()
        );
        Simulation { world, events }
    }

    /// Deploys adventurers in input order, retiring those with illegal starts.
    pub fn initialize(&self, world: &mut World, out_events: &mut Vec<Event>) {
        let roster: Vec<AdventurerId> = query::active(world).collect();
        for id in roster {
            let Some(adventurer) = query::adventurer(world, id) else {
                continue;
            };
            let command = self.resolver.deploy(adventurer, query::grid(world));
            apply_logged(world, command, out_events);
        }
    }

    /// Plays a single turn, returning `false` once nobody is left to move.
    pub fn play_turn(&self, world: &mut World, out_events: &mut Vec<Event>) -> bool {
        let roster: Vec<AdventurerId> = query::active(world).collect();
        if roster.is_empty() {
            return false;
        }

        let turn = query::turn(world);
        debug!("turn {turn}\n{}", query::grid(world));

        for id in roster {
            let Some(adventurer) = query::adventurer(world, id) else {
                continue;
            };
            let command = self.resolver.step(adventurer, turn, query::grid(world));
            apply_logged(world, command, out_events);
        }

        apply_logged(world, Command::EndTurn, out_events);
        true
    }
}

fn apply_logged(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let first = out_events.len();
    world::apply(world, command, out_events);
    for event in &out_events[first..] {
        trace!("{event:?}");
    }
}
