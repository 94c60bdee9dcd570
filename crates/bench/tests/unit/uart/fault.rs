//! # Noise Planning Tests

use framebench_core::config::FrameConfig;
use framebench_core::uart::{FaultLocation, FaultPlan, FaultRng};
use rstest::rstest;

#[test]
fn clean_plan_strips_configured_noise() {
    let frame = FrameConfig::new(115_200, 8).with_noise(4, 2);
    let mut rng = FaultRng::new(1);
    let resolved = FaultPlan::Clean.resolve(&frame, &mut rng);
    assert_eq!(FaultLocation::from_frame(&resolved), None);
}

#[test]
fn fixed_plan_keeps_the_configured_location() {
    let frame = FrameConfig::new(115_200, 8).with_noise(4, 2);
    let mut rng = FaultRng::new(1);
    let resolved = FaultPlan::Fixed.resolve(&frame, &mut rng);
    assert_eq!(
        FaultLocation::from_frame(&resolved),
        Some(FaultLocation { bit: 4, sample: 2 })
    );
}

#[test]
fn fixed_plan_draws_a_missing_sample_index() {
    let mut frame = FrameConfig::new(115_200, 5);
    frame.noisy_bit = Some(9);
    let mut rng = FaultRng::new(11);
    let location = FaultLocation::from_frame(&FaultPlan::Fixed.resolve(&frame, &mut rng)).unwrap();
    assert_eq!(location.bit, 9);
    assert!(location.sample < 5);
}

#[rstest]
#[case(FaultPlan::RandomData, 1, 8)]
#[case(FaultPlan::RandomAny, 0, 9)]
fn random_plans_cover_their_range(#[case] plan: FaultPlan, #[case] low: u8, #[case] high: u8) {
    let frame = FrameConfig::new(115_200, 4);
    let mut rng = FaultRng::new(0xDEAD_BEEF);
    let mut seen = [false; 10];
    for _ in 0..2_000 {
        let location = FaultLocation::from_frame(&plan.resolve(&frame, &mut rng)).unwrap();
        assert!((low..=high).contains(&location.bit));
        assert!(location.sample < 4);
        seen[usize::from(location.bit)] = true;
    }
    assert!((low..=high).all(|bit| seen[usize::from(bit)]));
}

#[test]
fn seeds_replay_the_same_faults() {
    let frame = FrameConfig::default();
    let run = |seed| {
        let mut rng = FaultRng::from_option(Some(seed));
        (0..32)
            .map(|_| FaultLocation::from_frame(&FaultPlan::RandomAny.resolve(&frame, &mut rng)))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(5), run(5));
    assert_ne!(run(5), run(6));
}

#[test]
fn entropy_seeds_are_reported() {
    let rng = FaultRng::from_option(None);
    assert_ne!(rng.seed(), 0);
}
