// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Integration tests for the `pixstem` library.

mod common;

use std::f64::consts::PI;

use approx::assert_relative_eq;
use common::{assert_eq_profiles, random_centres, random_stack, GeneratedFrames};
use ndarray::{Array, Array2, Axis, Dimension, IxDyn};
use pixstem::errors::{ConfigError, ImageError, ProcessingError, StackError};
use pixstem::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn test_radial_uniform_stack() {
    let stack = DiffractionStack::new(Array::from_elem(IxDyn(&[2, 3, 9, 11]), 5.0)).unwrap();
    let centres = CentreArrays::uniform(&[2, 3], 5.0, 4.0);

    let profiles = RadialIntegration::new()
        .n_threads(4)
        .build()
        .unwrap()
        .run(&stack, &centres, None)
        .unwrap();

    let local = frame_radial_size(11, 9, 5.0, 4.0).unwrap();
    let size = find_longest_distance(11, 9, 5.0, 4.0, 5.0, 4.0) + 1;
    assert_eq!(profiles.data().shape(), &[2, 3, size]);
    assert_eq!(profiles.lowest_zero_index(), local);

    for lane in profiles.data().lanes(Axis(2)) {
        for (i, &value) in lane.iter().enumerate() {
            if i < local {
                assert_relative_eq!(value, 5.0);
            } else {
                assert_relative_eq!(value, 0.0);
            }
        }
    }
}

#[test]
fn test_radial_shape_invariance() {
    let mut rng = StdRng::seed_from_u64(1234);

    for case in 0..8 {
        let n_nav = rng.random_range(0..3);
        let navigation: Vec<usize> = (0..n_nav).map(|_| rng.random_range(1..4)).collect();
        let rows = rng.random_range(3..12);
        let cols = rng.random_range(3..12);

        let mut shape = navigation.clone();
        shape.extend([rows, cols]);

        let stack = random_stack(&shape, case);
        let centres = random_centres(&navigation, rows, cols, case + 100);

        let profiles = RadialIntegration::new()
            .n_threads(2)
            .build()
            .unwrap()
            .run(&stack, &centres, None)
            .unwrap();

        let size = find_longest_distance(
            cols,
            rows,
            centres.min_x(),
            centres.min_y(),
            centres.max_x(),
            centres.max_y(),
        ) + 1;

        let mut expected = navigation.clone();
        expected.push(size);
        assert_eq!(profiles.data().shape(), expected.as_slice());
        assert_eq!(profiles.navigation_shape(), navigation.as_slice());
        assert_eq!(profiles.radial_size(), size);
        assert!(profiles.skipped_frames().is_empty());
    }
}

#[test]
fn test_radial_uniform_random_masks() {
    let mut rng = StdRng::seed_from_u64(5);
    let stack = DiffractionStack::new(Array::from_elem(IxDyn(&[6, 14, 12]), 5.0)).unwrap();
    let centres = random_centres(&[6], 14, 12, 6);
    let masks = MaskStack::PerFrame(Array::from_shape_simple_fn(IxDyn(&[6, 14, 12]), || {
        rng.random_bool(0.6)
    }));

    let profiles = RadialIntegration::new()
        .n_threads(3)
        .build()
        .unwrap()
        .run(&stack, &centres, Some(&masks))
        .unwrap();

    for &value in profiles.data() {
        assert!(value == 0.0 || (value - 5.0).abs() < 1e-12);
    }
}

#[test]
fn test_radial_full_mask_equals_unmasked() {
    let stack = random_stack(&[3, 2, 13, 10], 42);
    let centres = random_centres(&[3, 2], 13, 10, 43);
    let params = RadialIntegration::new().n_threads(3).build().unwrap();

    let unmasked = params.run(&stack, &centres, None).unwrap();

    let single = MaskStack::Single(Array2::from_elem((13, 10), true));
    let masked_single = params.run(&stack, &centres, Some(&single)).unwrap();

    let per_frame = MaskStack::PerFrame(Array::from_elem(IxDyn(&[3, 2, 13, 10]), true));
    let masked_per_frame = params.run(&stack, &centres, Some(&per_frame)).unwrap();

    for index in [[0, 0], [1, 1], [2, 0], [2, 1]] {
        let reference = unmasked.profile(&index).unwrap();
        assert_eq_profiles(reference, masked_single.profile(&index).unwrap());
        assert_eq_profiles(reference, masked_per_frame.profile(&index).unwrap());
    }
}

#[test]
fn test_radial_matches_single_image() {
    let stack = random_stack(&[4, 15, 15], 7);
    let centres = random_centres(&[4], 15, 15, 8);

    let profiles = RadialIntegration::default()
        .run(&stack, &centres, None)
        .unwrap();

    for i in 0..4 {
        let (cx, cy) = centres.get(&[i]).unwrap();
        let frame = stack.frame(&[i]).unwrap();
        let local = frame_radial_size(15, 15, cx, cy).unwrap();
        let expected = radial_profile(frame.view(), cx, cy, local, None).unwrap();

        let profile = profiles.profile(&[i]).unwrap();
        assert_eq_profiles(
            profile.slice_axis(Axis(0), (..local).into()),
            expected.view(),
        );
        assert!(profile.iter().skip(local).all(|&v| v == 0.0));
    }
}

#[test]
fn test_radial_thread_count_does_not_matter() {
    let stack = random_stack(&[5, 4, 8, 8], 99);
    let centres = random_centres(&[5, 4], 8, 8, 100);

    let serial = RadialIntegration::default()
        .run(&stack, &centres, None)
        .unwrap();

    for n_threads in [2, 3, 8] {
        let parallel = RadialIntegration::new()
            .n_threads(n_threads)
            .build()
            .unwrap()
            .run(&stack, &centres, None)
            .unwrap();

        assert_eq!(serial.data(), parallel.data());
    }
}

#[test]
fn test_radial_generated_frames() {
    let source = GeneratedFrames::new(&[2, 3], 32, 40, (15.0, 16.0), 8.0);

    let x = Array::from_shape_fn(IxDyn(&[2, 3]), |idx| source.centre_of(idx.slice()).0);
    let y = Array::from_shape_fn(IxDyn(&[2, 3]), |idx| source.centre_of(idx.slice()).1);
    let centres = CentreArrays::from_arrays(x, y).unwrap();

    let profiles = RadialIntegration::new()
        .n_threads(2)
        .build()
        .unwrap()
        .run(&source, &centres, None)
        .unwrap();

    assert_eq!(source.requests(), 6);
    assert_eq!(profiles.navigation_axes()[0].name(), "scan0");

    // all rings are centred, so all profiles are the same up to the frame extent
    for index in [[0, 1], [1, 2]] {
        let profile = profiles.profile(&index).unwrap();
        assert_relative_eq!(profile[0], 0.0);
        assert_relative_eq!(profile[8], 10.0);
        assert_relative_eq!(profile[3], 0.0);
    }
}

#[test]
fn test_radial_generated_frames_broken() {
    let source = GeneratedFrames::new(&[4], 16, 16, (7.0, 7.0), 4.0).with_broken(&[2]);
    let centres = CentreArrays::uniform(&[4], 7.0, 7.0);

    let profiles = RadialIntegration::new()
        .n_threads(2)
        .build()
        .unwrap()
        .run(&source, &centres, None)
        .unwrap();

    assert_eq!(profiles.skipped_frames().len(), 1);
    let skipped = &profiles.skipped_frames()[0];
    assert_eq!(skipped.index, vec![2]);
    assert!(matches!(
        skipped.source,
        ImageError::Source(StackError::IndexOutOfBounds { .. })
    ));

    assert!(profiles.profile(&[2]).unwrap().iter().all(|&v| v == 0.0));
    assert_relative_eq!(profiles.profile(&[0]).unwrap()[4], 10.0);

    let strict = RadialIntegration::new().strict().build().unwrap();
    match strict.run(&source, &centres, None) {
        Err(ProcessingError::Frame(e)) => assert_eq!(e.index, vec![2]),
        Ok(_) => panic!("Function should have failed."),
        Err(e) => panic!("Incorrect error returned. {}", e),
    }
}

#[test]
fn test_radial_crop_with_skipped_frame() {
    let stack = DiffractionStack::new(Array::from_elem(IxDyn(&[3, 5, 5]), 1.0)).unwrap();
    let x = ndarray::arr1(&[2.0, f64::NAN, 2.0]).into_dyn();
    let y = ndarray::arr1(&[2.0, 2.0, 2.0]).into_dyn();
    let centres = CentreArrays::from_arrays(x, y).unwrap();

    let profiles = RadialIntegration::default()
        .run(&stack, &centres, None)
        .unwrap();

    assert_eq!(profiles.skipped_frames().len(), 1);
    assert_eq!(profiles.lowest_zero_index(), 3);

    let cropped = profiles.crop(profiles.lowest_zero_index()).unwrap();
    assert_eq!(cropped.data().shape(), &[3, 3]);
    for i in [0, 2] {
        assert!(cropped.profile(&[i]).unwrap().iter().all(|&v| v == 1.0));
    }
}

#[test]
fn test_centre_of_mass_then_radial() {
    let source = GeneratedFrames::new(&[3], 24, 24, (9.0, 12.0), 5.0);

    let centres = CentreOfMass::default().run(&source, None).unwrap();
    for i in 0..3 {
        let (x, y) = centres.get(&[i]).unwrap();
        let (cx, cy) = source.centre_of(&[i]);
        assert_relative_eq!(x, cx, epsilon = 1e-10);
        assert_relative_eq!(y, cy, epsilon = 1e-10);
    }

    let profiles = RadialIntegration::default()
        .run(&source, &centres, None)
        .unwrap();

    for i in 0..3 {
        assert_relative_eq!(profiles.profile(&[i]).unwrap()[5], 10.0);
    }
}

#[test]
fn test_sector_masked_radial() {
    let source = GeneratedFrames::new(&[2], 21, 21, (10.0, 10.0), 6.0);
    let centres = CentreArrays::from_arrays(
        ndarray::arr1(&[10.0, 11.0]).into_dyn(),
        ndarray::arr1(&[10.0, 10.0]).into_dyn(),
    )
    .unwrap();

    let sector = AngleSector::new(0.0, PI).unwrap();
    let masks = MaskStack::PerFrame(
        sector
            .mask(&source, SectorCentre::PerFrame(&centres))
            .unwrap(),
    );

    let profiles = RadialIntegration::default()
        .run(&source, &centres, Some(&masks))
        .unwrap();

    // the upper half of the ring has the same profile as the full ring
    for i in 0..2 {
        assert_relative_eq!(profiles.profile(&[i]).unwrap()[6], 10.0);
    }
}

#[test]
fn test_circular_mask_radial() {
    let stack = DiffractionStack::new(Array::from_elem(IxDyn(&[2, 11, 11]), 3.0)).unwrap();
    let centres = CentreArrays::uniform(&[2], 5.0, 5.0);
    let masks = MaskStack::Single(make_circular_mask(5.0, 5.0, 11, 11, 3.0).unwrap());

    let profiles = RadialIntegration::default()
        .run(&stack, &centres, Some(&masks))
        .unwrap();

    let profile = profiles.profile(&[1]).unwrap();
    for i in 0..4 {
        assert_relative_eq!(profile[i], 3.0);
    }
    assert!(profile.iter().skip(4).all(|&v| v == 0.0));
    assert_eq!(profiles.lowest_zero_index(), 4);

    let cropped = profiles.crop(4).unwrap();
    assert_eq!(cropped.data().shape(), &[2, 4]);
}

#[test]
fn test_radial_fail_mask_shape() {
    let stack = random_stack(&[2, 6, 6], 5);
    let centres = CentreArrays::uniform(&[2], 3.0, 3.0);
    let masks = MaskStack::Single(Array2::from_elem((6, 5), true));

    match RadialIntegration::default().run(&stack, &centres, Some(&masks)) {
        Err(ProcessingError::Mask(_)) => (),
        Ok(_) => panic!("Function should have failed."),
        Err(e) => panic!("Incorrect error returned. {}", e),
    }
}

#[test]
fn test_ramp_and_limits() {
    let mut rng = StdRng::seed_from_u64(2024);
    let image = Array2::from_shape_fn((40, 50), |(y, x)| {
        0.3 * x as f64 - 0.2 * y as f64 + 4.0 + rng.random_range(-0.01..0.01)
    });
    let signal = Signal2D::new(image);

    let flat = RampFit::default().subtract_ramp(&signal).unwrap();
    for &value in flat.data() {
        assert!(value.abs() < 0.1);
    }

    let (low, high) = DisplayLimits::default().compute(flat.view()).unwrap();
    assert!(low < high);
    assert!(low >= -0.1 && high <= 0.1);

    let normalized = normalize_array(flat.view(), 255.0).unwrap();
    assert_relative_eq!(normalized.fold(f64::INFINITY, |a, &b| a.min(b)), 0.0, epsilon = 1e-9);
    assert_relative_eq!(
        normalized.fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        255.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_histogram_and_coloring() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = Array2::from_shape_simple_fn((20, 30), || rng.random_range(-1.0..1.0));
    let y = Array2::from_shape_simple_fn((20, 30), || rng.random_range(-0.5..0.5));

    let hist = BivariateHistogram::new()
        .bins(50)
        .build()
        .unwrap()
        .compute(x.view(), y.view(), None)
        .unwrap();

    assert_eq!(hist.data().dim(), (50, 50));
    // the spread of x covers the whole range, so nothing is dropped
    assert_relative_eq!(hist.data().sum(), 600.0);
    assert_relative_eq!(hist.x_axis().scale(), hist.y_axis().scale(), epsilon = 1e-12);

    let angle = Array2::from_shape_fn((20, 30), |(r, c)| y[[r, c]].atan2(x[[r, c]]));
    let magnitude = Array2::from_shape_fn((20, 30), |(r, c)| x[[r, c]].hypot(y[[r, c]]));

    let rgb = VectorColoring::new()
        .rotation(45.0)
        .build()
        .unwrap()
        .rgb(angle.view(), magnitude.view())
        .unwrap();

    assert_eq!(rgb.dim(), (20, 30, 3));
    assert!(rgb.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_config_from_file() {
    let config = Config::from_file("tests/files/inputs/config.yaml").unwrap();

    assert_eq!(config.radial().n_threads(), 4);
    assert!(config.radial().strict());
    assert_relative_eq!(config.centre_of_mass().threshold().unwrap(), 1.5);
    assert_eq!(config.histogram().bins(), 64);
    assert_eq!(config.histogram().range(), Some([-2.0, 2.0]));
    assert!(config.limits().ignore_zeros());
    assert!(!config.limits().ignore_edges());
    assert_relative_eq!(config.ramp().corner_size(), 0.1);
    assert_relative_eq!(config.coloring().rotation(), 30.0);
    assert_eq!(config.coloring().magnitude_limits(), Some([0.0, 5.0]));

    let sector = config.sector().unwrap();
    assert_relative_eq!(sector.angle0(), 0.5);
    assert_relative_eq!(sector.angle1(), 2.5);

    // the loaded parameters can be used directly
    let stack = random_stack(&[2, 8, 8], 3);
    let centres = CentreArrays::uniform(&[2], 3.5, 3.5);
    let profiles = config.radial().run(&stack, &centres, None).unwrap();
    assert_eq!(profiles.navigation_shape(), &[2]);
}

#[test]
fn test_config_from_file_aliases() {
    let config = Config::from_file("tests/files/inputs/config_aliases.yaml").unwrap();

    assert_eq!(config.radial().n_threads(), 2);
    assert_eq!(config.centre_of_mass().n_threads(), 3);
    assert_relative_eq!(config.coloring().max_angle(), PI);
}

#[test]
fn test_config_fail_unknown_field() {
    match Config::from_file("tests/files/inputs/config_unknown_field.yaml") {
        Err(ConfigError::CouldNotParseConfig(file, _)) => {
            assert_eq!(file, "tests/files/inputs/config_unknown_field.yaml")
        }
        Ok(_) => panic!("Function should have failed."),
        Err(e) => panic!("Incorrect error returned. {}", e),
    }
}

#[test]
fn test_config_fail_invalid_threads() {
    match Config::from_file("tests/files/inputs/config_zero_threads.yaml") {
        Err(ConfigError::InvalidNThreads) => (),
        Ok(_) => panic!("Function should have failed."),
        Err(e) => panic!("Incorrect error returned. {}", e),
    }
}
