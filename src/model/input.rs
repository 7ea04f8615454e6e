//! Host images to network input tensors.

use burn::prelude::*;

use super::network::RecognitionModelConfig;
use crate::data::examples::ExampleSet;
use crate::data::image::Image;
use crate::error::{Error, Result};

/// Stack `(canvas, target)` pairs into a `[n, 2, S, S]` tensor.
pub fn stack_pairs<B: Backend>(
    pairs: &[(&Image, &Image)],
    config: &RecognitionModelConfig,
    device: &B::Device,
) -> Result<Tensor<B, 4>> {
    let side = config.image_size;
    if config.channels != 2 {
        return Err(Error::Shape(format!(
            "model expects {} channels, pairs provide 2",
            config.channels
        )));
    }
    let plane = side * side;
    let mut data = Vec::with_capacity(pairs.len() * 2 * plane);

    for (canvas, target) in pairs {
        for image in [canvas, target] {
            if image.shape() != (side, side) {
                return Err(Error::Shape(format!(
                    "image is {}x{}, model expects {}x{}",
                    image.width, image.height, side, side
                )));
            }
            data.extend_from_slice(&image.pixels);
        }
    }

    Ok(Tensor::from_data(
        TensorData::new(data, [pairs.len(), 2, side, side]),
        device,
    ))
}

/// The whole example set as one input batch.
pub fn examples_to_input<B: Backend>(
    examples: &ExampleSet,
    config: &RecognitionModelConfig,
    device: &B::Device,
) -> Result<Tensor<B, 4>> {
    let pairs: Vec<(&Image, &Image)> = examples
        .partials
        .iter()
        .zip(&examples.targets)
        .map(|(p, t)| (p.as_ref(), t.as_ref()))
        .collect();
    stack_pairs(&pairs, config, device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn channels_are_canvas_then_target() {
        let device = Default::default();
        let config = RecognitionModelConfig::new().with_image_size(2);
        let canvas = Image::from_pixels(2, 2, vec![0.0, 0.1, 0.2, 0.3]).unwrap();
        let target = Image::from_pixels(2, 2, vec![1.0, 0.9, 0.8, 0.7]).unwrap();

        let input = stack_pairs::<B>(&[(&canvas, &target)], &config, &device).unwrap();
        assert_eq!(input.dims(), [1, 2, 2, 2]);
        let values: Vec<f32> = input.into_data().to_vec().unwrap();
        assert_eq!(&values[..4], canvas.pixels.as_slice());
        assert_eq!(&values[4..], target.pixels.as_slice());
    }

    #[test]
    fn wrong_image_size_is_a_shape_error() {
        let device = Default::default();
        let config = RecognitionModelConfig::new();
        let small = Image::zeros(30, 30);
        let err = stack_pairs::<B>(&[(&small, &small)], &config, &device).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }
}
