use comprehension::{Array, Shape, Error, EvalConfig, Evaluator, Window, gather};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn evaluators() -> [Evaluator; 2] {
    [
        Evaluator::new(EvalConfig::sequential()),
        Evaluator::new(EvalConfig::default().with_min_parallel_len(1)),
    ]
}

#[test]
fn matrix_vector_product() {
    init();
    let a = Array::new(Shape([2, 3]), [1, 2, 3, 4, 5, 6]).unwrap();
    let x = Array::new(Shape([3]), [1, 1, 1]).unwrap();
    for e in evaluators() {
        assert_eq!(e.matvec(&a, &x).unwrap().as_ref(), [6, 15]);
    }
}

#[test]
fn conv1d() {
    init();
    let i = Array::new(Shape([3]), [4.0, 5.0, 6.0]).unwrap();
    let k = Array::new(Shape([3]), [1.0, 1.0, 1.0]).unwrap();
    let r = Evaluator::default().conv1d(&i, &k).unwrap();
    assert_eq!(r.shape(), Shape([1]));
    assert_eq!(r.as_ref(), [15.0]);

    let i = Array::new(Shape([5]), [1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let k = Array::new(Shape([2]), [1.0, -1.0]).unwrap();
    assert_eq!(Evaluator::default().conv1d(&i, &k).unwrap().as_ref(), [-1.0, -1.0, -1.0, -1.0]);
}

#[test]
fn max_pool_2x2() {
    init();
    let input = Array::from_fn(Shape([1, 1, 4, 4]), |[_, _, y, x]| (y * 4 + x) as f32);
    for e in evaluators() {
        let r = e.max_pool_2x2(&input).unwrap();
        assert_eq!(r.shape(), Shape([1, 1, 2, 2]));
        assert_eq!(r.as_ref(), [5.0, 7.0, 13.0, 15.0]);
    }
}

#[test]
fn max_pool_negative_values() {
    let input = Array::from_fn(Shape([2, 3, 2, 2]), |[b, c, y, x]| -((b * 100 + c * 10 + y * 2 + x) as i32));
    let r = Evaluator::default().max_pool_2x2(&input).unwrap();
    assert_eq!(r.shape(), Shape([2, 3, 1, 1]));
    assert_eq!(r.as_ref(), [0, -10, -20, -100, -110, -120]);
}

#[test]
fn max_pool_too_small() {
    let input = Array::from_fn(Shape([1, 1, 1, 4]), |_| 0.0f32);
    assert_eq!(
        Evaluator::default().max_pool_2x2(&input),
        Err(Error::InvalidWindow {dim: 2, input: 1, window: 2}),
    );
}

#[test]
fn conv2d_matches_direct_loops() {
    init();
    let input = Array::from_fn(Shape([2, 3, 6, 5]), |[b, c, y, x]| ((b + 2 * c + 3 * y + 5 * x) % 7) as i64 - 3);
    let weight = Array::from_fn(Shape([4, 3, 3, 2]), |[o, c, y, x]| ((o * 5 + c * 3 + y + x) % 5) as i64 - 2);
    let mut expected = vec![];
    for b in 0..2 {
        for o in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    let mut sum = 0;
                    for c in 0..3 {
                        for ky in 0..3 {
                            for kx in 0..2 {
                                sum += input[[b, c, y + ky, x + kx]] * weight[[o, c, ky, kx]];
                            }
                        }
                    }
                    expected.push(sum);
                }
            }
        }
    }
    for e in evaluators() {
        let r = e.conv2d(&input, &weight).unwrap();
        assert_eq!(r.shape(), Shape([2, 4, 4, 4]));
        assert_eq!(r.as_ref(), &expected[..]);
    }
}

#[test]
fn gather_2d_indices() {
    init();
    let x = Array::new(Shape([4]), [1.0, 2.0, 3.0, 4.0]).unwrap();
    let i = Array::new(Shape([2, 3]), [3u32, 0, 0, 1, 2, 3]).unwrap();
    let z = gather(&x, &i).unwrap();
    assert_eq!(z.shape(), i.shape());
    assert_eq!(z.as_ref(), [4.0, 1.0, 1.0, 2.0, 3.0, 4.0]);

    let past_end = Array::new(Shape([1, 2]), [0u32, 4]).unwrap();
    assert!(matches!(gather(&x, &past_end), Err(Error::IndexOutOfBounds {..})));
}

#[test]
fn window_larger_than_input() {
    let input = Array::from_fn(Shape([1, 1, 3, 3]), |_| 1.0f64);
    let weight = Array::from_fn(Shape([1, 1, 2, 4]), |_| 1.0f64);
    assert_eq!(
        Evaluator::default().conv2d(&input, &weight),
        Err(Error::InvalidWindow {dim: 3, input: 3, window: 4}),
    );
    let bias = Array::new(Shape([1]), [0.0]).unwrap();
    assert!(matches!(
        Evaluator::default().strided_conv2d(1, 1, &input, &weight, &bias),
        Err(Error::InvalidWindow {..}),
    ));
}

#[test]
fn strided_conv_shape() {
    let input = Array::from_fn(Shape([2, 3, 11, 8]), |_| 1.0f32);
    let weight = Array::from_fn(Shape([5, 3, 3, 2]), |_| 1.0f32);
    let bias = Array::from_fn(Shape([5]), |[f]| f as f32);
    let r = Evaluator::default().strided_conv2d(3, 2, &input, &weight, &bias).unwrap();
    let expected = Window::with_stride([3, 2], [3, 2]).unwrap().output_shape(Shape([2, 5, 11, 8])).unwrap();
    assert_eq!(r.shape(), expected);
    assert_eq!(r.shape(), Shape([2, 5, 3, 4]));
    assert_eq!(r[[1, 4, 2, 3]], 18.0 + 4.0);
}

#[test]
fn composed_kernels_leave_inputs_unchanged() {
    let a = Array::from_fn(Shape([3, 2]), |[i, j]| (i + j) as f32);
    let b = Array::from_fn(Shape([2, 3]), |[i, j]| (i * j) as f32);
    let c = Array::from_fn(Shape([3, 3]), |_| 1.0f32);
    let before = c.clone();
    let r = Evaluator::default().gemm(1.0, 0.0, &a, &b, &c).unwrap();
    assert_eq!(c, before);
    let t = Evaluator::default().matmul_transposed(&a, &b).err();
    assert!(matches!(t, Some(Error::ShapeMismatch {..})));
    assert_eq!(r[[2, 2]], 3.0 * 2.0);
}

#[test]
fn max_pool_nan_in_any_position() {
    for nan_at in 0..4 {
        let input = Array::from_fn(Shape([1, 1, 2, 2]), |[_, _, y, x]| {
            if y * 2 + x == nan_at { f64::NAN } else { (y * 2 + x) as f64 }
        });
        for e in evaluators() {
            assert!(e.max_pool_2x2(&input).unwrap()[[0, 0, 0, 0]].is_nan());
        }
    }
}
