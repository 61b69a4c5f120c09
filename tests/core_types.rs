use harris_corners::lowlevel::GAUSSIAN_3X3;
use harris_corners::{ConvKernel, Corner, HarrisError, ImageView, OwnedImage};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        HarrisError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        HarrisError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_padded_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 2, 2, 4).err().unwrap();
    assert_eq!(
        err,
        HarrisError::InvalidStride {
            width: 2,
            stride: 4,
        }
    );
}

#[test]
fn image_view_requires_exact_length() {
    let err = ImageView::new(&[0u8; 3], 2, 2, 2).err().unwrap();
    assert_eq!(err, HarrisError::SizeMismatch { expected: 4, got: 3 });

    let err = ImageView::new(&[0u8; 5], 2, 2, 2).err().unwrap();
    assert_eq!(err, HarrisError::SizeMismatch { expected: 4, got: 5 });
}

#[test]
fn image_view_accessors() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::from_slice(&data, 4, 3).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.as_slice(), data.as_slice());
    assert_eq!(view.row(1).unwrap(), &[4u8, 5, 6, 7]);
    assert_eq!(view.get(3, 2).copied(), Some(11));
    assert!(view.get(4, 0).is_none());
    assert!(view.row(3).is_none());
}

#[test]
fn owned_image_round_trips_its_buffer() {
    let img = OwnedImage::new(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
    assert_eq!(img.view().row(1).unwrap(), &[4u8, 5, 6]);
    assert_eq!(img.into_vec(), vec![1, 2, 3, 4, 5, 6]);

    let err = OwnedImage::new(vec![0; 5], 3, 2).err().unwrap();
    assert_eq!(err, HarrisError::SizeMismatch { expected: 6, got: 5 });
}

#[test]
fn corner_index_encoding_is_injective() {
    let stride = 13;
    let height = 11;
    let mut seen = std::collections::HashSet::new();
    for index in 0..stride * height {
        let corner = Corner::from_index(index, stride);
        assert_eq!(corner.index(stride), index);
        assert!(seen.insert(corner), "duplicate corner for index {index}");
    }
}

#[test]
fn kernel_validation() {
    assert!(ConvKernel::from_3x3(GAUSSIAN_3X3, 16).is_ok());
    assert_eq!(
        ConvKernel::from_3x3(GAUSSIAN_3X3, 0).err(),
        Some(HarrisError::InvalidKernel {
            reason: "weight must be positive",
        })
    );
    let kernel = ConvKernel::new(vec![1; 25], 5, 25).unwrap();
    assert_eq!(kernel.radius(), 2);
}
