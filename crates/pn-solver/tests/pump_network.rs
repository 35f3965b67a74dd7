//! Integration test: fitted pump driving a network with a parallel split.

use pn_components::{Branch, Fitting, LossContext, NetworkTopology, PipeSegment};
use pn_core::units::{m, mm};
use pn_fluids::Library;
use pn_solver::{
    HeadCurve, OperatingPointConfig, ParallelConfig, SampleRow, SystemCurve, fit_curve,
    find_operating_point, solve_parallel,
};

fn network() -> NetworkTopology {
    NetworkTopology::new()
        .with_before_segment(
            PipeSegment::new(m(15.0), mm(100.0), "Carbon Steel (new)")
                .with_fitting(Fitting::from_catalog("Sharp-Edged Entrance", 1).unwrap())
                .with_fitting(Fitting::from_catalog("Gate Valve (Fully Open)", 1).unwrap()),
        )
        .with_branch(Branch::new(
            "Branch 1",
            vec![
                PipeSegment::new(m(40.0), mm(65.0), "Carbon Steel (new)")
                    .with_fitting(Fitting::from_catalog("90° Elbow (Long Radius)", 2).unwrap()),
            ],
        ))
        .unwrap()
        .with_branch(Branch::new(
            "Branch 2",
            vec![PipeSegment::new(m(60.0), mm(80.0), "PVC / Plastic")],
        ))
        .unwrap()
        .with_after_segment(
            PipeSegment::new(m(30.0), mm(100.0), "Carbon Steel (new)")
                .with_fitting(Fitting::from_catalog("Pipe Exit", 1).unwrap()),
        )
}

#[test]
fn operating_point_balances_pump_and_network() {
    let library = Library::builtin();
    let water = library.resolve_fluid("Water at 20°C").unwrap();
    let ctx = LossContext::new(water, &library);

    let pump = fit_curve(
        &[
            SampleRow::new(0.0, 40.0),
            SampleRow::new(50.0, 35.0),
            SampleRow::new(100.0, 25.0),
        ],
        2,
    )
    .unwrap();

    let topology = network();
    let system = SystemCurve::new(&topology, ctx, 12.0);
    let op = find_operating_point(&pump, &system, 12.0, &OperatingPointConfig::default()).unwrap();

    assert!(op.flow_m3h > 0.0);
    let h_sys = system.head(op.flow_m3h).unwrap();
    assert!((op.head_m - h_sys).abs() < 1e-6);

    let losses = system.losses(op.flow_m3h).unwrap();
    let split: f64 = losses.parallel.flows.iter().map(|(_, q)| q).sum();
    assert!((split - op.flow_m3h).abs() < 1e-9);
    assert!(losses.parallel.flows.iter().all(|(_, q)| *q > 0.0));
}

#[test]
fn raising_static_head_lowers_flow() {
    let library = Library::builtin();
    let water = library.resolve_fluid("Water at 20°C").unwrap();
    let ctx = LossContext::new(water, &library);
    let pump = |q: f64| 40.0 - 0.002 * q * q;
    let topology = network();

    let low = find_operating_point(
        &pump,
        &SystemCurve::new(&topology, ctx, 5.0),
        5.0,
        &OperatingPointConfig::default(),
    )
    .unwrap();
    let high = find_operating_point(
        &pump,
        &SystemCurve::new(&topology, ctx, 20.0),
        20.0,
        &OperatingPointConfig::default(),
    )
    .unwrap();

    assert!(high.flow_m3h < low.flow_m3h);
}

/// Three cast iron branches of very different size. One narrow branch sits at
/// its laminar/turbulent transition for a wide band of totals around 50 m³/h.
fn lopsided_branches() -> Vec<Branch> {
    [("A", 500.0, 20.0), ("B", 5.0, 150.0), ("C", 100.0, 40.0)]
        .into_iter()
        .map(|(name, length, diameter_mm)| {
            Branch::new(
                name,
                vec![PipeSegment::new(m(length), mm(diameter_mm), "Cast Iron")],
            )
        })
        .collect()
}

#[test]
fn lopsided_split_solves_at_search_start_flow() {
    let library = Library::builtin();
    let water = library.resolve_fluid("Water at 20°C").unwrap();
    let ctx = LossContext::new(water, &library);

    let forward = lopsided_branches();
    let mut reversed = lopsided_branches();
    reversed.reverse();

    for branches in [forward, reversed] {
        for total in [10.0, 50.0, 100.0] {
            let sol = solve_parallel(&branches, total, ctx, &ParallelConfig::default())
                .unwrap_or_else(|e| panic!("Q = {total}: {e}"));
            assert!((sol.total_flow() - total).abs() < 1e-9);
            assert!(sol.flows.iter().all(|(_, q)| *q >= 0.0));
            // The wide, short branch takes nearly everything
            assert!(sol.flow_of("B").unwrap() > 0.9 * total);
        }
    }
}

#[test]
fn lopsided_network_has_operating_point() {
    let library = Library::builtin();
    let water = library.resolve_fluid("Water at 20°C").unwrap();
    let ctx = LossContext::new(water, &library);

    let mut topology = NetworkTopology::new();
    for branch in lopsided_branches() {
        topology = topology.with_branch(branch).unwrap();
    }

    // Duty points near 120 and 60 m³/h; the second lies in the band where
    // branch C is held at its transition flow
    for (pump_coeff, geometric_head_m) in [(0.002, 10.0), (1.0 / 120.0, 10.0), (0.002, 25.0)] {
        let pump = move |q: f64| 40.0 - pump_coeff * q * q;
        let system = SystemCurve::new(&topology, ctx, geometric_head_m);
        let op = find_operating_point(
            &pump,
            &system,
            geometric_head_m,
            &OperatingPointConfig::default(),
        )
        .unwrap_or_else(|e| panic!("H_geo = {geometric_head_m}: {e}"));

        assert!(op.flow_m3h > 0.0);
        let h_sys = system.head(op.flow_m3h).unwrap();
        assert!((op.head_m - h_sys).abs() < 1e-6);
        assert!(op.head_m > geometric_head_m);
    }
}
