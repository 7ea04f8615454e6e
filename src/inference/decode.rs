//! Greedy stroke decoding.
//!
//! Starting from a blank canvas, repeatedly predicts the next stroke from
//! (canvas, target), appends it, and re-renders the whole program to get
//! the next canvas.

use std::path::Path;

use burn::prelude::*;
use log::info;

use crate::data::image::{show, Image};
use crate::error::{Error, Result};
use crate::language::Program;
use crate::model::input::stack_pairs;
use crate::model::{RecognitionModel, RecognitionModelConfig};
use crate::render::Renderer;

/// When to stop appending strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeConfig {
    /// Hard cap on program length. At least one stroke is always drawn.
    pub max_strokes: usize,
    /// Stop early once the mean absolute pixel difference between the
    /// canvas and the target is at or below this value.
    pub stop_distance: Option<f32>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_strokes: 3,
            stop_distance: None,
        }
    }
}

impl DecodeConfig {
    fn done(&self, program: &Program, canvas: &Image, target: &Image) -> bool {
        if program.len() >= self.max_strokes {
            return true;
        }
        match (self.stop_distance, canvas.mean_abs_diff(target)) {
            (Some(threshold), Some(distance)) => distance <= threshold,
            _ => false,
        }
    }
}

/// Decode one target image into a program.
///
/// Calls the renderer exactly once per appended stroke. When `previews`
/// is set, every intermediate canvas is written as `<name>-<k>.png`.
#[allow(clippy::too_many_arguments)]
pub fn decode_target<B: Backend, R: Renderer>(
    model: &RecognitionModel<B>,
    model_config: &RecognitionModelConfig,
    target: &Image,
    renderer: &mut R,
    config: &DecodeConfig,
    previews: Option<&Path>,
    name: &str,
    device: &B::Device,
) -> Result<Program> {
    let mut canvas = Image::zeros(target.width, target.height);
    let mut program = Program::default();

    loop {
        let input = stack_pairs::<B>(&[(&canvas, target)], model_config, device)?;
        let label = model
            .forward(input)
            .predictions()?
            .pop()
            .ok_or_else(|| Error::Tensor("model returned no prediction".into()))?;

        program.push(label.decode());
        info!("{}", program);

        canvas = renderer
            .render(std::slice::from_ref(&program))?
            .pop()
            .ok_or_else(|| Error::Shape("renderer returned no image".into()))?;
        if canvas.shape() != target.shape() {
            return Err(Error::Shape(format!(
                "renderer drew {:?}, target is {:?}",
                canvas.shape(),
                target.shape()
            )));
        }
        if let Some(dir) = previews {
            show(&canvas, dir, &format!("{}-{}", name, program.len()))?;
        }

        if config.done(&program, &canvas, target) {
            return Ok(program);
        }
    }
}

/// Decode every target in order, previewing each target first.
pub fn draw<B: Backend, R: Renderer>(
    model: &RecognitionModel<B>,
    model_config: &RecognitionModelConfig,
    targets: &[Image],
    renderer: &mut R,
    config: &DecodeConfig,
    previews: Option<&Path>,
    device: &B::Device,
) -> Result<Vec<Program>> {
    let mut programs = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        let name = format!("draw-{}", i);
        if let Some(dir) = previews {
            show(target, dir, &format!("{}-target", name))?;
        }
        let program = decode_target(
            model,
            model_config,
            target,
            renderer,
            config,
            previews,
            &name,
            device,
        )?;
        info!("target {}: {} strokes", i, program.len());
        programs.push(program);
    }
    Ok(programs)
}
