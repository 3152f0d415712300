use super::*;
use crate::error::ContourError;
use crate::synth::{circle, draw_ring_radial, square_ccw, RadialCfg, ReplayToken};
use nalgebra::Vector2;
use proptest::prelude::*;

#[test]
fn validation_rejects_malformed_rings() {
    let short = Ring::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]);
    assert!(matches!(
        short,
        Err(ContourError::TooFewPoints {
            required: 4,
            actual: 3
        })
    ));

    let open = Ring::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    assert!(matches!(open, Err(ContourError::NotClosed { .. })));

    let nan = Ring::from_pairs(&[[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    assert!(matches!(nan, Err(ContourError::NonFinite { index: 1 })));
}

#[test]
fn signed_area_sign_encodes_winding() {
    let sq = square_ccw(Vector2::zeros(), 1.0).unwrap();
    assert!((sq.signed_area() + 1.0).abs() < 1e-12);
    assert_eq!(sq.winding(), Winding::CounterClockwise);
    let cw = sq.reversed();
    assert!((cw.signed_area() - 1.0).abs() < 1e-12);
    assert_eq!(cw.winding(), Winding::Clockwise);
}

#[test]
fn orient_flips_ccw_and_keeps_cw() {
    let sq = square_ccw(Vector2::new(3.0, -2.0), 2.0).unwrap();
    let o = orient_clockwise(sq.clone());
    assert!((o.area() - 4.0).abs() < 1e-12);
    assert_eq!(o.ring(), &sq.reversed());
    assert_eq!(o.ring().winding(), Winding::Clockwise);

    let cw = sq.reversed();
    let o2 = orient_clockwise(cw.clone());
    assert_eq!(o2.ring(), &cw);
    assert!((o2.area() - 4.0).abs() < 1e-12);
}

#[test]
fn orient_passes_zero_area_through() {
    let flat = Ring::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [0.0, 0.0]]).unwrap();
    let (area, ring) = orient_clockwise(flat.clone()).into_parts();
    assert_eq!(area, 0.0);
    assert_eq!(ring, flat);
    assert_eq!(ring.winding(), Winding::Degenerate);
}

#[test]
fn circle_area_close_to_pi_r_squared() {
    let c = circle(Vector2::new(120.0, 45.0), 5.0, 100, Winding::Clockwise).unwrap();
    let o = orient_clockwise(c.clone());
    assert_eq!(o.ring(), &c);
    // inscribed 99-gon
    let expected = 0.5 * 99.0 * 25.0 * (std::f64::consts::TAU / 99.0).sin();
    assert!((o.area() - expected).abs() < 1e-9);
    assert!((o.area() - 78.54).abs() < 0.1);
}

#[test]
fn area_filter_boundary_is_inclusive() {
    let f = AreaFilter::default();
    assert_eq!(f.verdict_for_area(9.999_999), AreaVerdict::Drop);
    assert_eq!(f.verdict_for_area(10.0), AreaVerdict::Keep);
    assert_eq!(f.verdict_for_area(10.000_001), AreaVerdict::Keep);
    assert_eq!(f.verdict_for_area(0.0), AreaVerdict::Drop);

    let loose = AreaFilter::new(0.5);
    let sq = orient_clockwise(square_ccw(Vector2::zeros(), 1.0).unwrap());
    assert_eq!(loose.verdict(&sq), AreaVerdict::Keep);
    assert_eq!(f.verdict(&sq), AreaVerdict::Drop);
}

#[test]
fn median_spacing_even_and_odd() {
    // segments 1, 1, 1, 1 -> median 1
    let sq = square_ccw(Vector2::zeros(), 1.0).unwrap();
    assert!((sq.median_spacing() - 1.0).abs() < 1e-12);
    // segments 3, 4, 5 -> median 4
    let tri = Ring::from_pairs(&[[0.0, 0.0], [3.0, 0.0], [3.0, 4.0], [0.0, 0.0]]).unwrap();
    assert!((tri.median_spacing() - 4.0).abs() < 1e-12);
    // segments 1, 2, 1, 2 -> mean of middle pair 1.5
    let rect = Ring::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [1.0, 2.0], [0.0, 2.0], [0.0, 0.0]])
        .unwrap();
    assert!((rect.median_spacing() - 1.5).abs() < 1e-12);
}

#[test]
fn pairs_round_trip() {
    let pairs = [[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0]];
    let r = Ring::from_pairs(&pairs).unwrap();
    assert_eq!(r.to_pairs(), pairs.to_vec());
    assert_eq!(r.distinct().len(), 4);
}

fn radial_ring() -> impl Strategy<Value = Ring> {
    (any::<u64>(), 3usize..80, any::<bool>()).prop_map(|(seed, n, ccw)| {
        let cfg = RadialCfg {
            vertices: n,
            winding: if ccw {
                Winding::CounterClockwise
            } else {
                Winding::Clockwise
            },
            ..RadialCfg::default()
        };
        draw_ring_radial(cfg, ReplayToken { seed, index: 0 }).unwrap()
    })
}

proptest! {
    #[test]
    fn orient_is_idempotent(ring in radial_ring()) {
        let once = orient_clockwise(ring);
        let twice = orient_clockwise(once.ring().clone());
        prop_assert_eq!(once.ring(), twice.ring());
        prop_assert!((once.area() - twice.area()).abs() < 1e-9);
        prop_assert_eq!(twice.ring().winding(), Winding::Clockwise);
    }

    #[test]
    fn orient_preserves_point_set_and_area(ring in radial_ring()) {
        let reversed = ring.reversed();
        let a = orient_clockwise(ring.clone());
        let b = orient_clockwise(reversed);
        prop_assert!(a.area() >= 0.0);
        prop_assert!((a.area() - b.area()).abs() <= 1e-9 * a.area().max(1.0));
        prop_assert!((a.area() - ring.signed_area().abs()).abs() < 1e-12);
        let mut before: Vec<_> = ring.to_pairs();
        let mut after: Vec<_> = a.ring().to_pairs();
        before.sort_by(|p, q| p[0].total_cmp(&q[0]).then(p[1].total_cmp(&q[1])));
        after.sort_by(|p, q| p[0].total_cmp(&q[0]).then(p[1].total_cmp(&q[1])));
        prop_assert_eq!(before, after);
    }
}
