//! Exchanges on a lone rank: absorbing walls, periodic wrap, custom
//! handlers, input validation and scratch reuse.

use rankhop_boundary::{Absorber, SpecularReflector};
use rankhop_comm::{SoloTransport, Transport};
use rankhop_core::{Face, InjectorRecord, InputError, Mover};
use rankhop_exchange::{
    BoundaryExchange, ExchangeConfig, ExchangeContext, ExchangeError, ExchangeReport,
    ExchangeWarning,
};
use rankhop_grid::{BoxDecomposition, GlobalBoundary, GridTopology};
use rankhop_test_utils::{
    centered, leaving, CountingHandler, FixedEmitter, RankWorld, StrayEmitter,
};

fn grid(dims: [u32; 3], boundary: [GlobalBoundary; 6]) -> GridTopology {
    BoxDecomposition::new(dims, [1, 1, 1], boundary)
        .unwrap()
        .topology(0)
        .unwrap()
}

/// Periodic along x, `rest` on the other four faces.
fn x_periodic(rest: GlobalBoundary) -> [GlobalBoundary; 6] {
    let mut b = [rest; 6];
    b[Face::NegX.index()] = GlobalBoundary::Periodic;
    b[Face::PosX.index()] = GlobalBoundary::Periodic;
    b
}

fn run(
    exchange: &mut BoundaryExchange,
    world: &mut RankWorld,
    transport: &mut dyn Transport,
) -> Result<ExchangeReport, ExchangeError> {
    exchange.run(ExchangeContext {
        particles: &mut world.particles,
        movers: &mut world.movers,
        fields: &mut world.fields,
        accumulators: &mut world.accumulators,
        grid: &world.grid,
        species: &world.species,
        handlers: &world.handlers,
        transport,
        rng: &mut world.rng,
    })
}

fn run_solo(world: &mut RankWorld) -> ExchangeReport {
    let mut exchange = BoundaryExchange::default();
    run(&mut exchange, world, &mut SoloTransport::default()).unwrap()
}

fn assert_conserved(initial: usize, r: &ExchangeReport) {
    assert_eq!(
        r.live_particles + r.absorbed + r.sent + r.wrapped + r.custom_handled,
        initial + r.injected,
        "conservation failed: {r:?}"
    );
}

// ── Absorbing walls ─────────────────────────────────────────────

#[test]
fn absorbing_face_destroys_particle() {
    let mut world = RankWorld::new(grid([2, 2, 2], [GlobalBoundary::Absorb; 6]), 8);
    world.add_resting(centered(0));
    world.add_moving(leaving(1, Face::PosX), [0.0; 3]);
    world.add_resting(centered(2));

    let r = run_solo(&mut world);
    assert_eq!(r.absorbed, 1);
    assert_eq!(r.passes, 1);
    assert_eq!(r.live_particles, 2);
    assert!(world.movers.is_empty());
    assert!(r.is_clean());
    // The last particle backfilled the hole.
    assert_eq!(world.particles.get(1).unwrap().cell, 2);
    assert_conserved(3, &r);
}

#[test]
fn many_absorptions_compact_densely() {
    let mut world = RankWorld::new(grid([4, 1, 1], [GlobalBoundary::Absorb; 6]), 16);
    for i in 0..10u32 {
        if i % 3 == 0 {
            world.add_moving(leaving(0, Face::NegX), [0.0; 3]);
        } else {
            world.add_resting(centered(i % 4));
        }
    }
    let r = run_solo(&mut world);
    assert_eq!(r.absorbed, 4);
    assert_eq!(world.particles.len(), 6);
    assert!(world.particles.iter().all(|p| p.momentum == [0.0; 3]));
    assert_conserved(10, &r);
}

#[test]
fn empty_mover_list_runs_no_pass() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Absorb; 6]), 4);
    world.add_resting(centered(0));
    let r = run_solo(&mut world);
    assert_eq!(r.passes, 0);
    assert_eq!(r.live_particles, 1);
    assert!(r.is_clean());
}

// ── Periodic wrap ───────────────────────────────────────────────

#[test]
fn periodic_wrap_reinjects_on_same_rank() {
    let mut world = RankWorld::new(grid([2, 1, 1], x_periodic(GlobalBoundary::Absorb)), 4);
    world.add_moving(leaving(1, Face::PosX), [0.0; 3]);

    let r = run_solo(&mut world);
    assert_eq!((r.wrapped, r.injected, r.sent), (1, 1, 0));
    assert_eq!(world.particles.len(), 1);
    let p = world.particles.get(0).unwrap();
    assert_eq!(p.cell, 0);
    assert_eq!(p.offset, [-1.0, -0.5, 0.75]);
    assert_eq!(p.momentum, [1.0, 0.25, -0.375]);
    assert!(world.movers.is_empty());
    assert_conserved(1, &r);
}

#[test]
fn wrapped_residual_finishes_in_next_cell() {
    let mut world = RankWorld::new(grid([2, 1, 1], x_periodic(GlobalBoundary::Absorb)), 4);
    world.add_moving(leaving(0, Face::NegX), [-3.0, 0.0, 0.0]);

    let r = run_solo(&mut world);
    assert_eq!(r.wrapped, 1);
    let p = world.particles.get(0).unwrap();
    // Across all of cell 1 into cell 0, then 1.0 further.
    assert_eq!(p.cell, 0);
    assert!(p.offset[0].abs() < 1e-6, "offset {:?}", p.offset);
    assert!(world.movers.is_empty());
}

#[test]
fn enormous_wrapped_residual_still_terminates() {
    let mut world = RankWorld::new(grid([1, 1, 1], x_periodic(GlobalBoundary::Absorb)), 4);
    world.add_moving(leaving(0, Face::PosX), [1.0e8, 0.0, 0.0]);

    let r = run_solo(&mut world);
    assert_eq!((r.wrapped, r.injected), (1, 1));
    assert_eq!(r.passes, 1);
    assert_eq!(world.particles.get(0).unwrap().cell, 0);
    assert!(world.movers.is_empty());
    assert_conserved(1, &r);
}

#[test]
fn residual_reaching_wall_is_resolved_in_later_pass() {
    let mut world = RankWorld::new(grid([2, 1, 1], x_periodic(GlobalBoundary::Absorb)), 4);
    world.add_moving(leaving(1, Face::PosX), [0.0, 4.0, 0.0]);

    let r = run_solo(&mut world);
    assert_eq!(r.wrapped, 1);
    assert_eq!(r.absorbed, 1);
    assert_eq!(r.passes, 2);
    assert_eq!(r.live_particles, 0);
    assert!(r.is_clean());
    assert_conserved(1, &r);
}

#[test]
fn movers_left_after_last_pass_are_reported() {
    let config = ExchangeConfig {
        max_passes: 1,
        ..ExchangeConfig::default()
    };
    let mut exchange = BoundaryExchange::new(config).unwrap();
    let mut world = RankWorld::new(grid([2, 1, 1], x_periodic(GlobalBoundary::Absorb)), 4);
    world.add_moving(leaving(1, Face::PosX), [0.0, 4.0, 0.0]);

    let r = run(&mut exchange, &mut world, &mut SoloTransport::default()).unwrap();
    assert_eq!(r.passes, 1);
    assert_eq!(r.remaining_movers, 1);
    assert_eq!(world.movers.len(), 1);
    match r.warnings_of("unprocessed_movers").next() {
        Some(ExchangeWarning::UnprocessedMovers { rank: 0, count: 1 }) => {}
        other => panic!("expected UnprocessedMovers, got {other:?}"),
    }
    // The leftover mover sits on +y with the rest of its displacement.
    let p = world.particles.get(0).unwrap();
    assert!(p.is_leaving_through(Face::PosY));
    assert_eq!(world.movers.as_slice()[0].disp, [0.0, 2.5, 0.0]);
}

// ── Custom handlers ─────────────────────────────────────────────

#[test]
fn custom_absorbing_handler_removes_one_particle() {
    let mut world = RankWorld::new(grid([2, 2, 1], [GlobalBoundary::Custom(0); 6]), 8);
    let counter = CountingHandler::new("sink");
    let calls = counter.calls();
    world.handlers.register(counter).unwrap();
    for cell in 0..4 {
        world.add_resting(centered(cell));
    }
    world.add_moving(leaving(3, Face::PosY), [0.0; 3]);

    let r = run_solo(&mut world);
    assert_eq!(calls.get(), 1);
    assert_eq!(r.custom_handled, 1);
    assert_eq!(r.custom_emitted, 0);
    assert_eq!(world.particles.len(), 4);
    assert!(r.is_clean());
    assert_conserved(5, &r);
}

#[test]
fn tallying_absorber_deposits_weight() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Custom(0); 6]), 4);
    world.handlers.register(Absorber::tallying(2)).unwrap();
    let mut p = leaving(1, Face::PosZ);
    p.weight = 3.5;
    world.add_moving(p, [0.0; 3]);

    run_solo(&mut world);
    assert_eq!(world.accumulators.cell(1).unwrap()[2], 3.5);
    assert!(world.particles.is_empty());
}

#[test]
fn reflector_returns_particle_to_its_cell() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Custom(0); 6]), 4);
    world.handlers.register(SpecularReflector).unwrap();
    world.add_moving(leaving(0, Face::NegY), [0.0; 3]);

    let r = run_solo(&mut world);
    assert_eq!((r.custom_handled, r.custom_emitted, r.injected), (1, 1, 1));
    let p = world.particles.get(0).unwrap();
    assert_eq!(p.cell, 0);
    assert_eq!(p.momentum[1], 1.0);
    assert!(!p.is_leaving_through(Face::NegY));
    assert_conserved(1, &r);
}

#[test]
fn emitter_with_residual_walks_after_injection() {
    let template = InjectorRecord {
        offset: [0.0; 3],
        momentum: [1.0, 0.0, 0.0],
        weight: 2.0,
        cell: 0,
        disp: [0.5, 0.0, 0.0],
    };
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Custom(0); 6]), 4);
    world.handlers.register(FixedEmitter::new(template)).unwrap();
    world.add_moving(leaving(1, Face::PosZ), [0.0; 3]);

    run_solo(&mut world);
    let p = world.particles.get(0).unwrap();
    assert_eq!(p.cell, 1);
    assert_eq!(p.offset, [0.5, 0.0, 0.0]);
    assert_eq!(p.weight, 2.0);
}

#[test]
fn emission_outside_local_grid_is_dropped_with_warning() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Custom(0); 6]), 4);
    world.handlers.register(StrayEmitter).unwrap();
    world.add_moving(leaving(0, Face::PosY), [0.0; 3]);

    let r = run_solo(&mut world);
    assert_eq!(r.dropped, 1);
    assert!(world.particles.is_empty());
    match r.warnings.as_slice() {
        [ExchangeWarning::InvalidEmission {
            handler: 0,
            cell: 9,
            ..
        }] => {}
        other => panic!("expected InvalidEmission, got {other:?}"),
    }
}

#[test]
fn unregistered_handler_code_absorbs_with_warning() {
    let mut world = RankWorld::new(grid([1, 1, 1], [GlobalBoundary::Custom(4); 6]), 2);
    world.handlers.register(CountingHandler::new("only")).unwrap();
    world.add_moving(leaving(0, Face::PosX), [0.0; 3]);

    let r = run_solo(&mut world);
    assert_eq!(r.absorbed, 1);
    match r.warnings.as_slice() {
        [ExchangeWarning::UnknownBoundaryCode {
            face: Face::PosX,
            code: -7,
            ..
        }] => {}
        other => panic!("expected UnknownBoundaryCode, got {other:?}"),
    }
}

#[test]
fn reflect_code_is_not_handled_by_exchange() {
    let mut world = RankWorld::new(grid([1, 1, 1], [GlobalBoundary::Reflect; 6]), 2);
    world.add_moving(leaving(0, Face::NegZ), [0.0; 3]);
    let r = run_solo(&mut world);
    assert_eq!(r.absorbed, 1);
    assert_eq!(r.warnings_of("unknown_boundary_code").count(), 1);
}

#[test]
fn mover_off_every_face_is_unresolved() {
    let mut world = RankWorld::new(grid([1, 1, 1], [GlobalBoundary::Absorb; 6]), 2);
    world.add_moving(centered(0), [0.1, 0.0, 0.0]);
    let r = run_solo(&mut world);
    assert_eq!(r.absorbed, 1);
    match r.warnings.as_slice() {
        [ExchangeWarning::UnresolvedMover {
            pass: 0, index: 0, ..
        }] => {}
        other => panic!("expected UnresolvedMover, got {other:?}"),
    }
}

// ── Input validation ────────────────────────────────────────────

#[test]
fn unordered_movers_are_rejected_by_default() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Absorb; 6]), 4);
    world.add_resting(leaving(0, Face::NegX));
    world.add_resting(leaving(1, Face::PosX));
    world.movers.push(Mover::new(1, [0.0; 3])).unwrap();
    world.movers.push(Mover::new(0, [0.0; 3])).unwrap();

    match run(&mut BoundaryExchange::default(), &mut world, &mut SoloTransport::default()) {
        Err(ExchangeError::Input(InputError::UnorderedMovers { .. })) => {}
        other => panic!("expected UnorderedMovers, got {other:?}"),
    }
    assert_eq!(world.particles.len(), 2);
}

#[test]
fn unordered_movers_can_be_normalized() {
    let config = ExchangeConfig {
        reject_unordered_movers: false,
        ..ExchangeConfig::default()
    };
    let mut exchange = BoundaryExchange::new(config).unwrap();
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Absorb; 6]), 4);
    world.add_resting(leaving(0, Face::NegX));
    world.add_resting(leaving(1, Face::PosX));
    for i in [1, 0, 1] {
        world.movers.push(Mover::new(i, [0.0; 3])).unwrap();
    }

    let r = run(&mut exchange, &mut world, &mut SoloTransport::default()).unwrap();
    assert_eq!(r.absorbed, 2);
    assert!(world.particles.is_empty());
    assert_eq!(r.warnings_of("unordered_movers").count(), 1);
}

#[test]
fn out_of_range_mover_is_fatal() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Absorb; 6]), 4);
    world.add_resting(centered(0));
    world.movers.push(Mover::new(3, [0.0; 3])).unwrap();
    match run(&mut BoundaryExchange::default(), &mut world, &mut SoloTransport::default()) {
        Err(ExchangeError::Input(InputError::MoverIndexOutOfRange { index: 3, .. })) => {}
        other => panic!("expected MoverIndexOutOfRange, got {other:?}"),
    }
}

#[test]
fn moving_particle_outside_the_grid_is_fatal() {
    let mut world = RankWorld::new(grid([2, 1, 1], [GlobalBoundary::Absorb; 6]), 4);
    world.add_moving(leaving(5, Face::PosX), [0.0; 3]);
    match run(&mut BoundaryExchange::default(), &mut world, &mut SoloTransport::default()) {
        Err(ExchangeError::Input(InputError::ParticleCellOutOfRange {
            index: 0,
            cell: 5,
            cells: 2,
        })) => {}
        other => panic!("expected ParticleCellOutOfRange, got {other:?}"),
    }
    assert_eq!(world.particles.len(), 1);
}

#[test]
fn transport_for_other_rank_is_rejected() {
    let d = BoxDecomposition::new([2, 1, 1], [2, 1, 1], [GlobalBoundary::Absorb; 6]).unwrap();
    let mut world = RankWorld::new(d.topology(1).unwrap(), 4);
    match run(&mut BoundaryExchange::default(), &mut world, &mut SoloTransport::default()) {
        Err(ExchangeError::Input(InputError::RankMismatch {
            grid: 1,
            transport: 0,
        })) => {}
        other => panic!("expected RankMismatch, got {other:?}"),
    }
}

// ── Scratch reuse ───────────────────────────────────────────────

#[test]
fn scratch_grows_geometrically_and_is_reused() {
    let mut exchange = BoundaryExchange::default();
    let mut transport = SoloTransport::default();
    let g = grid([2, 1, 1], x_periodic(GlobalBoundary::Absorb));

    let mut small = RankWorld::new(g.clone(), 64);
    for _ in 0..10 {
        small.add_moving(leaving(1, Face::PosX), [0.0; 3]);
    }
    run(&mut exchange, &mut small, &mut transport).unwrap();
    assert_eq!(exchange.scratch_capacity(), 16);

    let mut large = RankWorld::new(g.clone(), 64);
    for _ in 0..40 {
        large.add_moving(leaving(0, Face::NegX), [0.0; 3]);
    }
    let r = run(&mut exchange, &mut large, &mut transport).unwrap();
    assert_eq!(r.wrapped, 40);
    assert_eq!(large.particles.len(), 40);
    assert_eq!(exchange.scratch_capacity(), 52);

    // A smaller call keeps the larger allocation.
    let mut again = RankWorld::new(g, 64);
    again.add_moving(leaving(1, Face::PosX), [0.0; 3]);
    run(&mut exchange, &mut again, &mut transport).unwrap();
    assert_eq!(exchange.scratch_capacity(), 52);

    exchange.release();
    assert_eq!(exchange.scratch_capacity(), 0);
}

#[test]
fn weight_is_conserved_through_wraps() {
    let mut world = RankWorld::new(grid([3, 1, 1], x_periodic(GlobalBoundary::Absorb)), 32);
    for i in 0..12u32 {
        let mut p = leaving(i % 3, if i % 2 == 0 { Face::PosX } else { Face::NegX });
        p.weight = 0.5 + i as f32;
        world.add_moving(p, [0.0; 3]);
    }
    let before = world.weight();
    let r = run_solo(&mut world);
    assert_eq!(r.wrapped, 12);
    assert_eq!(world.weight(), before);
    assert!(r.is_clean());
}
