use {
    crate::{AspectMode, ModelConfig, Normalization, PoseError, TensorLayout},
    base::{Tensor, Vec2},
    image::Image,
};

/// Maps normalized image coordinates (origin top-left, y down, unit square
/// covers the image) to normalized model input coordinates and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectTransform {
    pub scale: Vec2<f32>,
    pub offset: Vec2<f32>,
}

impl AspectTransform {
    pub fn identity() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            offset: Vec2::zero(),
        }
    }

    pub fn new(mode: AspectMode, image_size: Vec2<usize>, input_size: Vec2<usize>) -> Self {
        let image = image_size.as_f32();
        let input = input_size.as_f32();
        let fit = match mode {
            AspectMode::Stretch => return Self::identity(),
            AspectMode::ScaleToFit => (input.x / image.x).min(input.y / image.y),
            AspectMode::AspectFill => (input.x / image.x).max(input.y / image.y),
        };
        // fraction of the model input covered by the scaled image, per axis
        let scale = Vec2::new(image.x * fit / input.x, image.y * fit / input.y);
        let offset = Vec2::new((1.0 - scale.x) * 0.5, (1.0 - scale.y) * 0.5);
        Self { scale, offset }
    }

    pub fn to_model(&self, p: Vec2<f32>) -> Vec2<f32> {
        Vec2::new(p.x * self.scale.x + self.offset.x, p.y * self.scale.y + self.offset.y)
    }

    pub fn to_image(&self, p: Vec2<f32>) -> Vec2<f32> {
        Vec2::new(
            (p.x - self.offset.x) / self.scale.x,
            (p.y - self.offset.y) / self.scale.y,
        )
    }
}

/// Resample `image` into the model's input tensor.
///
/// Bilinear sampling; areas outside the image (letterbox padding) are black
/// before normalization. Each channel becomes `(v / 255 - mean) / std`.
pub fn preprocess(image: &Image, config: &ModelConfig) -> Result<(Tensor<f32>, AspectTransform), PoseError> {
    if !image.is_well_formed_rgb() {
        return Err(PoseError::InvalidInput(format!(
            "expected a non-empty Rgb8 image, got {:?} {}x{}",
            image.format,
            image.width(),
            image.height()
        )));
    }
    let (width, height) = (config.input_width, config.input_height);
    let transform = AspectTransform::new(config.aspect_mode, image.size, config.input_size());
    let image_size = image.size.as_f32();
    let Normalization { mean, std: deviation } = config.normalization;

    let mut data = vec![0.0f32; 3 * width * height];
    for y in 0..height {
        for x in 0..width {
            let model_uv = Vec2::new((x as f32 + 0.5) / width as f32, (y as f32 + 0.5) / height as f32);
            let image_uv = transform.to_image(model_uv);
            let rgb = image.sample_bilinear(
                image_uv.x * image_size.x - 0.5,
                image_uv.y * image_size.y - 0.5,
                [0, 0, 0],
            );
            for c in 0..3 {
                let value = (rgb[c] / 255.0 - mean[c]) / deviation[c];
                let index = match config.layout {
                    TensorLayout::Nhwc => (y * width + x) * 3 + c,
                    TensorLayout::Nchw => c * width * height + y * width + x,
                };
                data[index] = value;
            }
        }
    }

    let shape = match config.layout {
        TensorLayout::Nhwc => vec![1, height, width, 3],
        TensorLayout::Nchw => vec![1, 3, height, width],
    };
    let tensor = Tensor::new(shape, data).map_err(|e| PoseError::InvalidInput(e.to_string()))?;
    Ok((tensor, transform))
}
