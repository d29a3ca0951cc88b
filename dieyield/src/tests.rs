use approx::{assert_abs_diff_eq, assert_relative_eq};
use geometry::prelude::*;
use test_log::test;

use crate::prelude::*;

fn wafer_300() -> Substrate {
    Wafer::new(300., 0.).into()
}

fn all_good_physical(n: usize) -> Vec<DieStatus> {
    vec![DieStatus::GoodPhysical; n]
}

#[test]
fn scenario_a_dice_per_shot() {
    let reticle = Reticle::new(Dims::new(26., 33.), Dims::square(5.), Dims::square(0.2));
    let layout = Layout::build(&wafer_300(), &reticle).unwrap();
    assert_eq!(layout.dice_per_shot(), (5, 6));
    // ceil(300 / 26) = 12 columns, ceil(300 / 33) = 10 rows.
    assert_eq!(layout.shots().len(), 120);
    assert_eq!(layout.len(), 120 * 30);
    assert!(layout.issues().is_empty());
}

#[test]
fn layout_order_is_shot_major_then_cell_major() {
    let panel = Substrate::from(Panel::new(10., 10., 0.));
    let reticle = Reticle::new(Dims::square(5.), Dims::square(2.), Dims::square(0.5));
    let layout = Layout::build(&panel, &reticle).unwrap();

    assert_eq!(
        layout.shots(),
        &[
            Point::new(0., 0.),
            Point::new(0., 5.),
            Point::new(5., 0.),
            Point::new(5., 5.)
        ]
    );
    assert_eq!(layout.dice_per_shot(), (2, 2));

    let origins: Vec<Point> = layout.dice().iter().take(5).map(Die::origin).collect();
    assert_eq!(
        origins,
        vec![
            Point::new(0., 0.),
            Point::new(0., 2.5),
            Point::new(2.5, 0.),
            Point::new(2.5, 2.5),
            Point::new(0., 5.),
        ]
    );
    assert_eq!(layout.dice()[3].cell(), (1, 1));
    assert_eq!(layout.dice()[4].shot(), 1);
    assert_eq!(
        layout.shot_rect(3),
        Some(Rect::from_sides(5., 5., 10., 10.))
    );
    assert_eq!(layout.shot_rect(4), None);
}

#[test]
fn die_corners_are_axis_aligned_offsets() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let die = layout.dice()[7];
    let corners: Vec<Point> = die.corners().values().collect();
    assert_eq!(
        corners,
        vec![
            Point::new(die.x(), die.y()),
            Point::new(die.x() + 5., die.y()),
            Point::new(die.x(), die.y() + 5.),
            Point::new(die.x() + 5., die.y() + 5.),
        ]
    );
}

#[test]
fn unaddressable_die_counts_are_rejected() {
    for die in [1e-300, 1e-7] {
        let reticle = Reticle {
            die_width: die,
            die_height: die,
            scribe_x: 0.,
            scribe_y: 0.,
            ..Default::default()
        };
        let err = Layout::build(&wafer_300(), &reticle).unwrap_err();
        assert!(
            matches!(
                err,
                Error::LayoutTooLarge {
                    shots_x: 12,
                    shots_y: 10,
                    ..
                }
            ),
            "{err}"
        );
        assert!(err.is_invalid_argument());
    }

    let reticle = Reticle {
        shot_width: 1e-300,
        ..Default::default()
    };
    let err = Layout::build(&wafer_300(), &reticle).unwrap_err();
    assert!(
        matches!(
            err,
            Error::LayoutTooLarge {
                shots_x: usize::MAX,
                dice_x: 0,
                ..
            }
        ),
        "{err}"
    );
}

#[test]
fn die_larger_than_shot_yields_empty_layout() {
    let reticle = Reticle {
        die_width: 40.,
        ..Default::default()
    };
    let layout = Layout::build(&wafer_300(), &reticle).unwrap();
    assert!(layout.is_empty());
    assert_eq!(layout.issues().len(), 1);
    assert!(matches!(
        layout.issues().iter().next(),
        Some(GeometryIssue::EmptyShot {
            dir: Dir::Horiz,
            ..
        })
    ));

    let batch = Simulation::new(&layout, &wafer_300(), 0.9)
        .run(3, Some(1))
        .unwrap();
    for trial in &batch {
        assert_eq!(trial.tally().total, 0);
        assert_eq!(trial.fab_yield(), 0.);
    }
}

#[test]
fn invalid_geometry_is_rejected_before_building() {
    let reticle = Reticle {
        die_height: -5.,
        ..Default::default()
    };
    let err = Layout::build(&wafer_300(), &reticle).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(matches!(err, Error::InvalidDimension { name: "die height", .. }));
}

#[test]
fn geometric_containment() {
    let region = Substrate::from(Wafer::new(300., 0.)).usable_region();

    let at_origin = Die::new(Rect::from_sides(0., 0., 0., 0.));
    assert_eq!(classify(&at_origin, &region), DieStatus::GoodPhysical);

    let far_away = Die::new(Rect::from_sides(200., 200., 205., 205.));
    assert_eq!(classify(&far_away, &region), DieStatus::Lost);
}

#[test]
fn boundary_corners_count_as_inside() {
    let region = Substrate::from(Wafer::new(10., 0.)).usable_region();
    // Corners at (0, 0), (3, 0), (0, 4), (3, 4); (3, 4) is exactly on the circle.
    let die = Die::new(Rect::from_sides(0., 0., 3., 4.));
    assert_eq!(classify(&die, &region), DieStatus::GoodPhysical);
}

#[test]
fn straddling_wafer_edge_is_partial() {
    let region = Substrate::from(Wafer::new(284., 0.)).usable_region();
    let die = Die::new(Rect::from_sides(140., 0., 145., 5.));
    assert_eq!(
        crate::classify::corners_inside(&die, &region),
        2
    );
    assert_eq!(classify(&die, &region), DieStatus::Partial);
}

#[test]
fn die_covering_small_region_without_corners_is_lost() {
    // Only corners are sampled: a die that covers the whole usable disk is lost.
    let region = Substrate::from(Wafer::new(2., 0.)).usable_region();
    let die = Die::new(Rect::from_sides(-5., -5., 5., 5.));
    assert_eq!(classify(&die, &region), DieStatus::Lost);
}

#[test]
fn panel_classification_uses_inset_rectangle() {
    let region = Substrate::from(Panel::new(100., 100., 10.)).usable_region();
    let inside = Die::new(Rect::from_sides(10., 10., 90., 90.));
    let partial = Die::new(Rect::from_sides(5., 20., 15., 30.));
    let outside = Die::new(Rect::from_sides(0., 0., 9., 9.));
    assert_eq!(classify(&inside, &region), DieStatus::GoodPhysical);
    assert_eq!(classify(&partial, &region), DieStatus::Partial);
    assert_eq!(classify(&outside, &region), DieStatus::Lost);
}

#[test]
fn degenerate_panel_has_no_good_dice() {
    let panel = Substrate::from(Panel::new(100., 50., 30.));
    let layout = Layout::build(&panel, &Reticle::default()).unwrap();
    assert!(!layout.is_empty());
    assert!(matches!(
        layout.issues().iter().next(),
        Some(GeometryIssue::DegenerateUsableArea { .. })
    ));

    let batch = Simulation::new(&layout, &panel, 0.9)
        .run(2, Some(7))
        .unwrap();
    let tally = batch.first().unwrap().tally();
    assert_eq!(tally.good_physical, 0);
    assert_eq!(tally.lost, tally.total);
    assert_eq!(tally.fab_yield, 0.);
}

#[test]
fn scenario_b_poisson_yield() {
    let params = YieldParams::new(0.5, 25., YieldModel::Poisson);
    assert_relative_eq!(params.defect_parameter(), 0.125);
    assert_relative_eq!(params.yield_fraction(), (-0.125f64).exp());
    assert_abs_diff_eq!(params.yield_fraction(), 0.8825, epsilon = 1e-4);
}

#[test]
fn model_formulas() {
    let d = 0.4f64;
    let cases = [
        (YieldModel::Poisson, (-d).exp()),
        (YieldModel::Murphy, ((1. - (-d).exp()) / d).powi(2)),
        (YieldModel::Rectangular, (1. - (-2. * d).exp()) / (2. * d)),
        (YieldModel::Moore, (-d.sqrt()).exp()),
        (YieldModel::Seeds, 1. / (1. + d)),
    ];
    for (model, expected) in cases {
        assert_relative_eq!(model.evaluate(d), expected, max_relative = 1e-12);
    }
}

#[test]
fn zero_defect_parameter_yields_exactly_one() {
    for model in YieldModel::ALL {
        assert_eq!(yield_fraction(0., 25., model), 1.0, "{model}");
        assert_eq!(yield_fraction(0.5, 0., model), 1.0, "{model}");
    }
}

#[test]
fn yield_decreases_with_defect_rate() {
    for model in YieldModel::ALL {
        let mut prev = yield_fraction(0., 25., model);
        for step in 1..=50 {
            let y = yield_fraction(step as f64 * 0.2, 25., model);
            assert!(y <= prev, "{model} increased at step {step}");
            assert!(y > 0. && y <= 1.);
            prev = y;
        }
    }
}

#[test]
fn unrecognized_model_falls_back_to_poisson() {
    assert_eq!(YieldModel::from_name("Bose-Einstein"), YieldModel::Poisson);
    assert_eq!(YieldModel::from_name("SEEDS"), YieldModel::Seeds);
    assert_eq!(YieldModel::lookup("Bose-Einstein"), None);
    assert_eq!(YieldModel::from("Rectangular".to_string()), YieldModel::Rectangular);
}

#[test]
fn scenario_c_seeded_injection_is_reproducible() {
    let mut first = all_good_physical(500);
    let mut second = all_good_physical(500);
    inject_seeded(&mut first, 0.88, Some(42));
    inject_seeded(&mut second, 0.88, Some(42));
    assert_eq!(first, second);
    assert!(first.contains(&DieStatus::Good));
    assert!(first.contains(&DieStatus::Defective));

    let mut other = all_good_physical(500);
    inject_seeded(&mut other, 0.88, Some(43));
    assert_ne!(first, other);
}

#[test]
fn injection_only_touches_good_physical_dice() {
    let mut statuses = vec![
        DieStatus::Partial,
        DieStatus::GoodPhysical,
        DieStatus::Lost,
        DieStatus::GoodPhysical,
    ];
    let defective = inject_seeded(&mut statuses, 0.0, Some(3));
    assert_eq!(defective, 2);
    assert_eq!(
        statuses,
        vec![
            DieStatus::Partial,
            DieStatus::Defective,
            DieStatus::Lost,
            DieStatus::Defective,
        ]
    );

    let mut statuses = all_good_physical(100);
    assert_eq!(inject_seeded(&mut statuses, 1.0, None), 0);
    assert!(statuses.iter().all(|s| *s == DieStatus::Good));
}

#[test]
fn skipped_dice_do_not_consume_random_values() {
    let mut dense = all_good_physical(50);
    let mut sparse: Vec<DieStatus> = (0..100)
        .map(|i| {
            if i % 2 == 0 {
                DieStatus::GoodPhysical
            } else {
                DieStatus::Lost
            }
        })
        .collect();
    inject_seeded(&mut dense, 0.5, Some(11));
    inject_seeded(&mut sparse, 0.5, Some(11));
    let resolved: Vec<DieStatus> = sparse.into_iter().step_by(2).collect();
    assert_eq!(dense, resolved);
}

#[test]
fn runs_are_deterministic() {
    let params = SimulationParams {
        run: RunParams {
            trials: 4,
            seed: Some(42),
            parallel: false,
        },
        ..Default::default()
    };
    let a = params.run().unwrap();
    let b = params.run().unwrap();
    assert_eq!(a.batch, b.batch);
    assert_eq!(a.yield_fraction.to_bits(), b.yield_fraction.to_bits());
}

#[test]
fn scenario_d_trial_seeds_depend_only_on_index() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let sim = Simulation::new(&layout, &wafer_300(), 0.8825);
    let five = sim.run(5, Some(42)).unwrap();
    let ten = sim.run(10, Some(42)).unwrap();

    assert_eq!(five.len(), 5);
    assert_eq!(ten.len(), 10);
    for (k, trial) in five.iter().enumerate() {
        assert_eq!(trial.index(), k);
        assert_eq!(trial.seed(), Some(42 + k as u64));
        assert_eq!(trial, &ten.trials()[k]);
    }
}

#[test]
fn trials_differ_by_seed() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let batch = Simulation::new(&layout, &wafer_300(), 0.5)
        .run(2, Some(0))
        .unwrap();
    assert_ne!(batch.trials()[0].statuses(), batch.trials()[1].statuses());
}

#[test]
fn trial_seed_wraps() {
    assert_eq!(crate::sim::trial_seed(Some(u64::MAX), 1), Some(0));
    assert_eq!(crate::sim::trial_seed(None, 3), None);
}

#[test]
fn partition_and_yield_bounds_hold() {
    for substrate in [wafer_300(), Panel::new(1000., 500., 12.).into()] {
        let layout = Layout::build(&substrate, &Reticle::default()).unwrap();
        let batch = Simulation::new(&layout, &substrate, 0.7)
            .run(5, Some(9))
            .unwrap();
        for trial in &batch {
            let t = trial.tally();
            assert_eq!(t.good + t.defective + t.partial + t.lost, t.total);
            assert_eq!(t.good_physical, t.good + t.defective);
            assert_eq!(t.total, layout.len());
            assert!((0. ..=1.).contains(&t.fab_yield));
            assert!(trial
                .statuses()
                .iter()
                .all(|s| !matches!(s, DieStatus::Pending | DieStatus::GoodPhysical)));
        }
    }
}

#[test]
fn classification_does_not_depend_on_trial() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let batch = Simulation::new(&layout, &wafer_300(), 0.3)
        .run(3, Some(5))
        .unwrap();
    let physical: Vec<Vec<bool>> = batch
        .iter()
        .map(|t| t.statuses().iter().map(DieStatus::is_physically_good).collect())
        .collect();
    assert_eq!(physical[0], physical[1]);
    assert_eq!(physical[1], physical[2]);
    let first = batch.first().unwrap().tally();
    assert!(first.partial > 0);
    assert!(first.lost > 0);
    assert!(first.good_physical > 0);
}

#[test]
fn parallel_matches_sequential() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let sim = Simulation::new(&layout, &wafer_300(), 0.8);
    assert_eq!(
        sim.run(8, Some(100)).unwrap(),
        sim.run_parallel(8, Some(100)).unwrap()
    );
}

#[test]
fn unseeded_runs_are_valid() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let batch = Simulation::new(&layout, &wafer_300(), 0.8)
        .run(2, None)
        .unwrap();
    for trial in &batch {
        assert_eq!(trial.seed(), None);
        assert!((0. ..=1.).contains(&trial.fab_yield()));
    }
}

#[test]
fn zero_trials_is_an_argument_error() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let sim = Simulation::new(&layout, &wafer_300(), 0.8);
    assert_eq!(sim.run(0, Some(1)), Err(Error::InvalidTrialCount(0)));
    assert_eq!(sim.run_parallel(0, None), Err(Error::InvalidTrialCount(0)));
    assert!(run_simulation(0, layout.shared_dice(), &wafer_300(), 0.8, None).is_err());
}

#[test]
fn params_validate_every_input() {
    let bad_yield = SimulationParams {
        yield_params: YieldParams::new(-1., 25., YieldModel::Poisson),
        ..Default::default()
    };
    assert!(matches!(
        bad_yield.run(),
        Err(Error::InvalidYieldParam { name: "defect rate", .. })
    ));

    let no_trials = SimulationParams {
        run: RunParams {
            trials: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(no_trials.validate(), Err(Error::InvalidTrialCount(0)));
}

#[test]
fn batch_statistics() {
    let layout = Layout::build(&wafer_300(), &Reticle::default()).unwrap();
    let batch = Simulation::new(&layout, &wafer_300(), 0.6)
        .run(6, Some(1234))
        .unwrap();
    let yields: Vec<f64> = batch.iter().map(TrialResult::fab_yield).collect();
    let mean = yields.iter().sum::<f64>() / yields.len() as f64;
    assert_relative_eq!(batch.mean_fab_yield(), mean);
    assert!(batch.min_fab_yield() <= batch.mean_fab_yield());
    assert!(batch.max_fab_yield() >= batch.mean_fab_yield());
    assert!(batch.fab_yield_std_dev() >= 0.);

    let empty = SimulationBatch::default();
    assert_eq!(empty.mean_fab_yield(), 0.);
    assert_eq!(empty.min_fab_yield(), 0.);
    assert_eq!(empty.fab_yield_std_dev(), 0.);
}

#[test]
fn large_sample_yield_tracks_yield_fraction() {
    let statuses = all_good_physical(20_000);
    let mut statuses = statuses;
    inject_seeded(&mut statuses, 0.8825, Some(2024));
    let tally = Tally::from_statuses(&statuses);
    assert_abs_diff_eq!(tally.fab_yield, 0.8825, epsilon = 0.01);
}

#[test]
fn die_map_colors() {
    assert_eq!(DieStatus::Good.color(), "green");
    assert_eq!(DieStatus::Defective.color(), "red");
    assert_eq!(DieStatus::Partial.color(), "yellow");
    assert_eq!(DieStatus::Lost.color(), "grey");
    assert_eq!(DieStatus::Pending.color(), "blue");
}

#[test]
fn params_deserialize_with_defaults() {
    let params: SimulationParams = toml::from_str(
        r#"
        [substrate]
        type = "panel"
        width = 600.0

        [yield]
        model = "murphy"
        defect_rate = 0.1

        [run]
        trials = 3
        "#,
    )
    .unwrap();
    assert_eq!(params.substrate, Substrate::from(Panel::new(600., 500., 0.)));
    assert_eq!(params.reticle, Reticle::default());
    assert_eq!(params.yield_params.model, YieldModel::Murphy);
    assert_eq!(params.yield_params.critical_area, 25.);
    assert_eq!(params.run.trials, 3);
    assert_eq!(params.run.seed, Some(42));
}

#[test]
fn seed_accepts_negative_and_unseeded_values() {
    let run: RunParams = toml::from_str("seed = -1").unwrap();
    assert_eq!(run.seed, Some(u64::MAX));
    assert_eq!(crate::sim::trial_seed(run.seed, 1), Some(0));

    let run: RunParams = toml::from_str("seed = false\ntrials = 2").unwrap();
    assert_eq!(run.seed, None);
    assert_eq!(run.trials, 2);

    let run: RunParams = toml::from_str("seed = 7").unwrap();
    assert_eq!(run.seed, Some(7));

    assert!(toml::from_str::<RunParams>("seed = true").is_err());
    assert!(toml::from_str::<RunParams>("seed = \"abc\"").is_err());
}

#[test]
fn seed_serialization_is_symmetric() {
    for seed in [None, Some(0), Some(42), Some(u64::MAX)] {
        let run = RunParams {
            trials: 4,
            seed,
            parallel: true,
        };
        let text = toml::to_string(&run).unwrap();
        assert_eq!(toml::from_str::<RunParams>(&text).unwrap(), run, "{text}");
    }
}
