//! Randomized perturbations of a rendered glyph.
//!
//! A [`Pipeline`] is an ordered list of [`Step`]s. Each step holds a [`Transform`] and the
//! probability that it runs. Every call to [`Pipeline::apply`] draws fresh parameters and returns a
//! new canvas; the input is left untouched.
use crate::config::GeneratorConfig;
use crate::glyph::BACKGROUND;
use crate::Canvas;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::noise::gaussian_noise;
use imageproc::rect::Rect;
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;

/// A single perturbation with the ranges its parameters are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Rotate by an angle drawn from `-max_degrees..=max_degrees`
    Rotate { max_degrees: f32 },
    /// Gaussian blur with a radius drawn from `radius`
    Blur { radius: RangeInclusive<f32> },
    /// White out a rectangle at a random position, sides drawn from `size`
    Erase { size: RangeInclusive<u32> },
    /// Additive gaussian noise with mean zero
    Noise { stddev: f64 },
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Rotate { .. } => "rotate",
            Transform::Blur { .. } => "blur",
            Transform::Erase { .. } => "erase",
            Transform::Noise { .. } => "noise",
        }
    }

    /// Sample parameters from `rng` and apply the transform to a copy of `canvas`.
    pub fn apply<R: Rng + ?Sized>(&self, canvas: &Canvas, rng: &mut R) -> Canvas {
        match self {
            Transform::Rotate { max_degrees } => {
                let max = max_degrees.abs();
                let angle = if max > 0.0 { rng.gen_range(-max..=max) } else { 0.0 };
                rotate(canvas, angle)
            }
            Transform::Blur { radius } => {
                if radius.is_empty() {
                    return canvas.clone();
                }
                blur(canvas, rng.gen_range(radius.clone()))
            }
            Transform::Erase { size } => {
                let (width, height) = canvas.dimensions();
                if size.is_empty() || width == 0 || height == 0 {
                    return canvas.clone();
                }
                let x = rng.gen_range(0..width);
                let y = rng.gen_range(0..height);
                let w = rng.gen_range(size.clone());
                let h = rng.gen_range(size.clone());
                erase(canvas, x, y, w, h)
            }
            Transform::Noise { stddev } => add_noise(canvas, *stddev, rng.gen()),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Transform::Rotate { max_degrees } => write!(f, "rotate ±{}°", max_degrees),
            Transform::Blur { radius } => {
                write!(f, "blur {}..={}", radius.start(), radius.end())
            }
            Transform::Erase { size } => write!(f, "erase {}..={}", size.start(), size.end()),
            Transform::Noise { stddev } => write!(f, "noise σ={}", stddev),
        }
    }
}

/// Rotate counter-clockwise by `degrees` about the center. Uncovered pixels become white.
///
/// An angle of exactly zero returns an identical copy.
pub fn rotate(canvas: &Canvas, degrees: f32) -> Canvas {
    if degrees == 0.0 {
        return canvas.clone();
    }
    // imageproc rotates clockwise
    rotate_about_center(canvas, -degrees.to_radians(), Interpolation::Bilinear, BACKGROUND)
}

/// Gaussian blur with standard deviation `radius`. A non-positive radius is a no-op.
pub fn blur(canvas: &Canvas, radius: f32) -> Canvas {
    if !(radius > 0.0) {
        return canvas.clone();
    }
    gaussian_blur_f32(canvas, radius)
}

/// Fill the `width` x `height` rectangle at `(x, y)` with white, clipped to the canvas.
pub fn erase(canvas: &Canvas, x: u32, y: u32, width: u32, height: u32) -> Canvas {
    let mut out = canvas.clone();
    let rect = Rect::at(x as i32, y as i32).of_size(width.max(1), height.max(1));
    draw_filled_rect_mut(&mut out, rect, BACKGROUND);
    out
}

/// Add zero-mean gaussian noise. Results are clamped to `0..=255`.
pub fn add_noise(canvas: &Canvas, stddev: f64, seed: u64) -> Canvas {
    if !(stddev > 0.0) {
        return canvas.clone();
    }
    gaussian_noise(canvas, 0.0, stddev, seed)
}

/// A transform and the probability that it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub transform: Transform,
    pub probability: f64,
}

/// An ordered sequence of randomly applied transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Pipeline {
        Pipeline::default()
    }

    /// Append a step. Probabilities `<= 0` never run, `>= 1` always run.
    pub fn then(mut self, transform: Transform, probability: f64) -> Pipeline {
        self.steps.push(Step {
            transform,
            probability,
        });
        self
    }

    /// Rotation, blur, erasure and noise, in that order, with the configured ranges.
    pub fn from_config(config: &GeneratorConfig) -> Pipeline {
        Pipeline::new()
            .then(
                Transform::Rotate {
                    max_degrees: config.rotation_range,
                },
                1.0,
            )
            .then(
                Transform::Blur {
                    radius: config.blur_radius_range.clone(),
                },
                config.blur_probability,
            )
            .then(
                Transform::Erase {
                    size: config.erase_size_range.clone(),
                },
                config.erase_probability,
            )
            .then(
                Transform::Noise {
                    stddev: config.noise_stddev,
                },
                config.noise_probability,
            )
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Produce one perturbed copy of `canvas`.
    pub fn apply<R: Rng + ?Sized>(&self, canvas: &Canvas, rng: &mut R) -> Canvas {
        let mut out = canvas.clone();
        for step in self.steps.iter() {
            if rng.gen::<f64>() < step.probability {
                out = step.transform.apply(&out, rng);
            }
        }
        out
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let steps = self
            .steps
            .iter()
            .map(|s| format!("{} (p={})", s.transform, s.probability))
            .collect::<Vec<String>>()
            .join(" -> ");
        write!(f, "{}", steps)
    }
}
