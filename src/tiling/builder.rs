use super::Tiling;

/// Constructors
impl Tiling {
    /// Construct a `Tiling` for a raster of the given size,
    /// initially with a `1x1` step.
    pub fn with_dims(height: usize, width: usize) -> Self {
        if width < 1 || height < 1 {
            panic!("dimensions must both be at least 1");
        }
        Tiling {
            height,
            width,
            step_h: 1,
            step_w: 1,
        }
    }
}

/// Builder methods to configure the parameters
impl Tiling {
    /// Set the step `(height, width)` between consecutive
    /// tiles. Each tile spans one step.
    pub fn with_step(mut self, step_h: usize, step_w: usize) -> Self {
        if step_h < 1 || step_w < 1 {
            panic!("step must be at least 1 in both directions");
        }
        self.step_h = step_h;
        self.step_w = step_w;
        self
    }
}

/// Getter methods to read the parameters of the tiling
impl Tiling {
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn width(&self) -> usize {
        self.width
    }

    /// Step as `(height, width)`.
    pub fn step(&self) -> (usize, usize) {
        (self.step_h, self.step_w)
    }
}
