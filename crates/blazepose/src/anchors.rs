use {crate::AnchorOptions, base::Vec2};

/// Generate SSD anchor centers in normalized model coordinates.
///
/// Layers with equal consecutive strides are merged into one grid whose
/// per-cell anchor count is the sum of theirs. Anchors are emitted grid by
/// grid, row-major, with all anchors of a cell adjacent.
pub fn generate_anchors(options: &AnchorOptions, input_size: Vec2<usize>) -> Vec<Vec2<f32>> {
    let mut anchors = Vec::new();
    let mut layer = 0;
    while layer < options.strides.len() {
        let stride = options.strides[layer];
        let mut per_cell = 0;
        while layer < options.strides.len() && options.strides[layer] == stride {
            per_cell += options.anchors_per_layer;
            layer += 1;
        }
        if stride == 0 {
            continue;
        }
        let grid_w = input_size.x.div_ceil(stride);
        let grid_h = input_size.y.div_ceil(stride);
        for y in 0..grid_h {
            for x in 0..grid_w {
                let center = Vec2::new(
                    (x as f32 + options.offset) / grid_w as f32,
                    (y as f32 + options.offset) / grid_h as f32,
                );
                anchors.extend(std::iter::repeat_n(center, per_cell));
            }
        }
    }
    anchors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_count() {
        let anchors = generate_anchors(&AnchorOptions::default(), Vec2::new(224, 224));
        assert_eq!(anchors.len(), 2254);
    }

    #[test]
    fn test_first_anchor_center() {
        let anchors = generate_anchors(&AnchorOptions::default(), Vec2::new(224, 224));
        assert!((anchors[0].x - 0.5 / 28.0).abs() < 1e-6);
        assert!((anchors[0].y - 0.5 / 28.0).abs() < 1e-6);
        // two anchors share each cell of the first grid
        assert_eq!(anchors[0], anchors[1]);
        assert!(anchors[2].x > anchors[1].x);
    }

    #[test]
    fn test_merged_layers_share_cells() {
        let anchors = generate_anchors(&AnchorOptions::default(), Vec2::new(224, 224));
        let last_grid = &anchors[2254 - 294..];
        assert!(last_grid[..6].iter().all(|a| *a == last_grid[0]));
        assert!((last_grid[0].x - 0.5 / 7.0).abs() < 1e-6);
    }
}
