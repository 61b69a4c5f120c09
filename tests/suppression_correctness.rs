use harris_corners::lowlevel::{ScalarStages, Stages};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_response(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| f64::from(rng.random_range(-1000i32..=1000)))
        .collect()
}

fn check_tiles(response: &[f64], suppressed: &[f64], stride: usize, size: usize) {
    let height = response.len() / stride;
    let tile_rows = height / size;
    let tile_cols = stride / size;

    for ty in 0..tile_rows {
        for tx in 0..tile_cols {
            let mut max = f64::NEG_INFINITY;
            let mut nonzero = Vec::new();
            for y in ty * size..(ty + 1) * size {
                for x in tx * size..(tx + 1) * size {
                    let idx = y * stride + x;
                    max = max.max(response[idx]);
                    if suppressed[idx] != 0.0 {
                        nonzero.push(idx);
                    }
                }
            }
            assert!(nonzero.len() <= 1, "tile ({tx}, {ty}) kept {nonzero:?}");
            if let Some(&idx) = nonzero.first() {
                assert_eq!(suppressed[idx], max);
                assert_eq!(response[idx], max);
            } else {
                assert_eq!(max, 0.0, "tile ({tx}, {ty}) lost its maximum");
            }
        }
    }

    // Pixels outside the full tiles are never evaluated.
    for y in 0..height {
        for x in 0..stride {
            if y >= tile_rows * size || x >= tile_cols * size {
                assert_eq!(suppressed[y * stride + x], 0.0, "tail ({x}, {y})");
            }
        }
    }
}

#[test]
fn each_tile_keeps_only_its_maximum() {
    let mut rng = StdRng::seed_from_u64(5);
    for size in [1usize, 3, 5, 7] {
        let stride = rng.random_range(size..=40);
        let height = rng.random_range(size..=40);
        let response = random_response(&mut rng, stride * height);
        let suppressed = ScalarStages.suppress(&response, stride, size);
        check_tiles(&response, &suppressed, stride, size);
    }
}

#[test]
fn window_of_one_keeps_everything() {
    let response = vec![3.0, -1.0, 0.5, 7.0, 2.0, -4.0];
    assert_eq!(ScalarStages.suppress(&response, 3, 1), response);
}

#[test]
fn smaller_than_window_is_all_zero() {
    let response = vec![9.0; 8];
    assert_eq!(ScalarStages.suppress(&response, 4, 3), vec![0.0; 8]);
}

#[test]
fn five_by_four_map() {
    #[rustfmt::skip]
    let response = [
        1.0, 2.0, 3.0, 2.0, 1.0,
        2.0, 2.0, 4.0, 5.0, 1.0,
        1.0, 2.0, 3.0, 4.0, 6.0,
        3.0, 4.0, 5.0, 6.0, 7.0,
    ];
    let suppressed = ScalarStages.suppress(&response, 5, 3);
    let mut expected = vec![0.0; 20];
    expected[7] = 4.0;
    assert_eq!(suppressed, expected);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_suppression_matches_sequential() {
    use harris_corners::lowlevel::RayonStages;

    let mut rng = StdRng::seed_from_u64(77);
    for workers in [1, 3, 64] {
        let stages = RayonStages::new(workers).unwrap();
        for size in [1usize, 3, 5, 9] {
            let stride = rng.random_range(size..=64);
            let height = rng.random_range(size..=64);
            let response = random_response(&mut rng, stride * height);
            let parallel = stages.suppress(&response, stride, size);
            assert_eq!(parallel, ScalarStages.suppress(&response, stride, size));
            check_tiles(&response, &parallel, stride, size);
        }
    }

    let response = [1.0, 2.0, 3.0, 2.0, 2.0, 4.0, 1.0, 2.0, 3.0];
    let stages = RayonStages::new(4).unwrap();
    assert_eq!(
        stages.suppress(&response, 3, 3),
        ScalarStages.suppress(&response, 3, 3)
    );
}
