//! Convolutional stroke recognizer: one strided conv layer feeding
//! independent classification heads.
//!
//! Input is `[batch, 2, S, S]`: channel 0 is the canvas drawn so far,
//! channel 1 the target image. Four heads classify the next stroke's
//! coordinate bins (x1, y1, x2, y2) and a fifth its kind.

use burn::config::Config;
use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Linear, LinearConfig, PaddingConfig2d};
use burn::prelude::*;
use burn::tensor::activation;

use super::heads::HeadLogits;
use crate::data::examples::LABEL_SLOTS;
use crate::error::{Error, Result};
use crate::language::{StrokeKind, GRID_BINS};

/// Shape of the recognition network.
#[derive(Config, Debug)]
pub struct RecognitionModelConfig {
    /// Side length of the square input images.
    #[config(default = 300)]
    pub image_size: usize,
    /// Input channels (partial canvas + target).
    #[config(default = 2)]
    pub channels: usize,
    /// Number of convolution filters.
    #[config(default = 5)]
    pub filters: usize,
    /// Square kernel side.
    #[config(default = 10)]
    pub kernel_size: usize,
    /// Convolution stride.
    #[config(default = 10)]
    pub stride: usize,
    /// Class count for each coordinate head.
    #[config(default = "vec![10, 10, 10, 10]")]
    pub output_dims: Vec<usize>,
    /// Class count for the stroke-kind head.
    #[config(default = 2)]
    pub kinds: usize,
}

/// The recognition network.
#[derive(Module, Debug)]
pub struct RecognitionModel<B: Backend> {
    conv: Conv2d<B>,
    heads: Vec<Linear<B>>,
    kind_head: Linear<B>,
}

impl RecognitionModelConfig {
    /// Side of the feature map produced by the convolution.
    ///
    /// With `S = 300, k = 10, s = 10` no padding is needed to tile the
    /// input exactly, so valid padding gives the same 30x30 map that
    /// "same" padding would.
    pub fn feature_side(&self) -> usize {
        if self.image_size < self.kernel_size {
            return 0;
        }
        (self.image_size - self.kernel_size) / self.stride + 1
    }

    /// Width of the flattened feature vector seen by every head.
    pub fn feature_dim(&self) -> usize {
        self.filters * self.feature_side() * self.feature_side()
    }

    /// Check that every label the data can produce has a logit to land on.
    pub fn validate(&self) -> Result<()> {
        if self.output_dims.len() != LABEL_SLOTS {
            return Err(Error::Shape(format!(
                "expected {} coordinate heads, config has {}",
                LABEL_SLOTS,
                self.output_dims.len()
            )));
        }
        if let Some(dim) = self.output_dims.iter().find(|&&d| d < GRID_BINS as usize) {
            return Err(Error::Shape(format!(
                "coordinate head with {} classes cannot hold {} grid bins",
                dim, GRID_BINS
            )));
        }
        if self.kinds != StrokeKind::COUNT {
            return Err(Error::Shape(format!(
                "kind head needs {} classes, config has {}",
                StrokeKind::COUNT,
                self.kinds
            )));
        }
        if self.feature_dim() == 0 {
            return Err(Error::Shape(format!(
                "{}px input yields no features for a {}px kernel",
                self.image_size, self.kernel_size
            )));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> RecognitionModel<B> {
        let conv = Conv2dConfig::new(
            [self.channels, self.filters],
            [self.kernel_size, self.kernel_size],
        )
        .with_stride([self.stride, self.stride])
        .with_padding(PaddingConfig2d::Valid)
        .init(device);

        let features = self.feature_dim();
        let heads = self
            .output_dims
            .iter()
            .map(|&classes| LinearConfig::new(features, classes).init(device))
            .collect();
        let kind_head = LinearConfig::new(features, self.kinds).init(device);

        RecognitionModel {
            conv,
            heads,
            kind_head,
        }
    }
}

impl<B: Backend> RecognitionModel<B> {
    /// `input`: `[batch, channels, S, S]`.
    pub fn forward(&self, input: Tensor<B, 4>) -> HeadLogits<B> {
        let x = activation::relu(self.conv.forward(input));
        let [batch, filters, height, width] = x.dims();
        let features = x.reshape([batch, filters * height * width]);

        HeadLogits {
            slots: self
                .heads
                .iter()
                .map(|head| head.forward(features.clone()))
                .collect(),
            kind: self.kind_head.forward(features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    fn tiny_config() -> RecognitionModelConfig {
        RecognitionModelConfig::new().with_image_size(30)
    }

    #[test]
    fn default_feature_dim_matches_strided_map() {
        let config = RecognitionModelConfig::new();
        assert_eq!(config.feature_side(), 30);
        assert_eq!(config.feature_dim(), 4500);
        assert_eq!(config.output_dims, vec![10, 10, 10, 10]);
    }

    #[test]
    fn validate_rejects_configs_labels_cannot_fit() {
        assert!(RecognitionModelConfig::new().validate().is_ok());

        let narrow = RecognitionModelConfig::new().with_output_dims(vec![10, 10, 10, 5]);
        let missing = RecognitionModelConfig::new().with_output_dims(vec![10, 10]);
        let kinds = RecognitionModelConfig::new().with_kinds(3);
        let tiny = RecognitionModelConfig::new().with_image_size(4);
        for config in [narrow, missing, kinds, tiny] {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, Error::Shape(_)), "got {err}");
        }
    }

    #[test]
    fn forward_produces_one_logit_row_per_example() {
        let device = Default::default();
        let config = tiny_config();
        let model = config.init::<B>(&device);

        let input = Tensor::<B, 4>::zeros([3, 2, 30, 30], &device);
        let logits = model.forward(input);
        assert_eq!(logits.slots.len(), 4);
        for head in &logits.slots {
            assert_eq!(head.dims(), [3, 10]);
        }
        assert_eq!(logits.kind.dims(), [3, 2]);
    }

    #[test]
    fn param_count_is_conv_plus_heads() {
        let device = Default::default();
        let config = tiny_config();
        let model = config.init::<B>(&device);
        let conv = 2 * 5 * 10 * 10 + 5;
        let heads = 4 * (config.feature_dim() * 10 + 10) + config.feature_dim() * 2 + 2;
        assert_eq!(model.num_params(), conv + heads);
    }
}
