use super::area::area_ratio;
use super::*;
use crate::cfg::{DiameterPolicy, Region};
use crate::error::StimulusError;
use crate::schedule::Side;
use rand::{rngs::StdRng, SeedableRng};

const UNIFORM: DiameterPolicy = DiameterPolicy::Uniform {
    min: 20.0,
    max: 50.0,
};

fn assert_packed(set: &DotSet, region: Region) {
    for (i, a) in set.dots().iter().enumerate() {
        assert!(region.contains(a), "dot {i} out of bounds: {a:?}");
        for b in &set.dots()[i + 1..] {
            let dist = (a.center() - b.center()).norm();
            assert!(dist >= a.radius() + b.radius(), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn overlap_is_strict_on_centre_distance() {
    let a = Dot::new(Coordinate::new(0, 0), 10.0);
    let touching = Dot::new(Coordinate::new(10, 0), 10.0);
    let inside = Dot::new(Coordinate::new(9, 0), 10.0);
    assert!(!a.overlaps(&touching));
    assert!(a.overlaps(&inside));
    // Bounding squares intersect but the disks do not.
    let diagonal = Dot::new(Coordinate::new(8, 8), 10.0);
    assert!(!a.overlaps(&diagonal));
}

#[test]
fn pack_five_in_reference_region() {
    let region = Region::new(300, 450);
    let mut rng = StdRng::seed_from_u64(5);
    let set = pack(5, region, UNIFORM, 10_000, &mut rng).unwrap();
    assert_eq!(set.len(), 5);
    assert_packed(&set, region);
    for d in set.diameters() {
        assert!((20.0..=50.0).contains(&d));
    }
}

#[test]
fn pack_tracks_total_area() {
    let mut rng = StdRng::seed_from_u64(11);
    let set = pack(26, Region::new(300, 450), UNIFORM, 10_000, &mut rng).unwrap();
    let expected: f64 = set.dots().iter().map(Dot::area).sum();
    assert!((set.total_area() - expected).abs() < 1e-9);
}

#[test]
fn mean_variance_pairs_average_to_mean() {
    let policy = DiameterPolicy::MeanVariance {
        mean: 30.0,
        max_variance: 10.0,
    };
    let region = Region::new(300, 450);
    let mut rng = StdRng::seed_from_u64(3);
    let set = pack(7, region, policy, 10_000, &mut rng).unwrap();
    assert_eq!(set.len(), 7);
    assert_packed(&set, region);
    let ds: Vec<f64> = set.diameters().collect();
    for pair in ds[..6].chunks(2) {
        let v = pair[0] - 30.0;
        assert!(v > 0.0 && v <= 10.0);
        assert!((pair[1] - (30.0 - v)).abs() < 1e-12);
    }
    assert_eq!(ds[6], 30.0);
}

#[test]
fn pack_rejects_zero_count() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = pack(0, Region::new(300, 450), UNIFORM, 100, &mut rng).unwrap_err();
    assert!(matches!(err, StimulusError::Configuration { .. }));
}

#[test]
fn overfull_region_reports_infeasible() {
    // A 50×50 region holds exactly one 50px dot.
    let policy = DiameterPolicy::Uniform {
        min: 50.0,
        max: 50.0,
    };
    let mut rng = StdRng::seed_from_u64(1);
    let err = pack(2, Region::new(50, 50), policy, 200, &mut rng).unwrap_err();
    assert_eq!(
        err,
        StimulusError::PackingInfeasible {
            requested: 2,
            placed: 1,
            attempts: 200,
        }
    );
}

#[test]
fn equalize_shrinks_larger_set() {
    let region = Region::new(300, 450);
    let mut rng = StdRng::seed_from_u64(21);
    let mut one = pack(20, region, UNIFORM, 10_000, &mut rng).unwrap();
    let mut two = pack(2, region, UNIFORM, 10_000, &mut rng).unwrap();
    let small = two.total_area();
    assert!(one.total_area() > small);
    let side = equalize(&mut one, &mut two);
    assert_eq!(side, Side::Left);
    assert!((one.total_area() - small).abs() / small < 1e-9);
    assert_eq!(two.total_area(), small);
    assert_packed(&one, region);
}

#[test]
fn diverge_widens_ratio_and_keeps_layout() {
    let region = Region::new(300, 450);
    let mut rng = StdRng::seed_from_u64(8);
    let mut one = pack(6, region, UNIFORM, 10_000, &mut rng).unwrap();
    let mut two = pack(12, region, UNIFORM, 10_000, &mut rng).unwrap();
    let before = area_ratio(&one, &two);
    let positions: Vec<Coordinate> = one.positions().collect();
    let side = diverge(&mut one, &mut two, 0.75);
    let after = area_ratio(&one, &two);
    assert!(after > before);
    assert!((after / before - 1.0 / 0.75).abs() < 1e-9);
    if side == Side::Left {
        assert_eq!(one.positions().collect::<Vec<_>>(), positions);
    }
    assert_packed(&one, region);
    assert_packed(&two, region);
}

#[test]
fn diverge_breaks_ties_on_second_set() {
    let mut one = DotSet::default();
    one.push(Dot::new(Coordinate::new(0, 0), 10.0));
    let mut two = one.clone();
    assert_eq!(diverge(&mut one, &mut two, 0.5), Side::Right);
    assert!((two.total_area() * 2.0 - one.total_area()).abs() < 1e-9);
}

#[test]
fn shrinking_keeps_small_dot_in_corner_pocket_clear() {
    // The 4px dot sits in the corner gap of the 60px dot's bounding square.
    let region = Region::new(100, 100);
    let mut set = DotSet::default();
    set.push(Dot::new(Coordinate::new(0, 0), 60.0));
    set.push(Dot::new(Coordinate::new(5, 5), 4.0));
    assert!(!set.dots()[0].overlaps(&set.dots()[1]));
    let centers: Vec<_> = set.dots().iter().map(Dot::center).collect();

    set.match_area(set.total_area() / 4.0);

    let (big, small) = (set.dots()[0], set.dots()[1]);
    assert!(!big.overlaps(&small), "{big:?} overlaps {small:?}");
    assert_eq!((big.diameter, small.diameter), (30.0, 2.0));
    assert_eq!(big.inset(), 15.0);
    for (dot, c) in set.dots().iter().zip(&centers) {
        assert!((dot.center() - c).norm() < 1e-12);
    }
    assert_eq!(set.positions().collect::<Vec<_>>()[1], Coordinate::new(5, 5));
    assert_packed(&set, region);
}
