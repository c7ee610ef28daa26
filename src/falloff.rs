use std::f64::consts::FRAC_PI_2;

/// Shape of the feather band. `fade` runs from 1 at `t = 0` down to 0 at `t = 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    #[default]
    Cosine,
    Linear,
}

impl Falloff {
    pub fn fade(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Cosine => (t * FRAC_PI_2).cos().max(0.0),
            Self::Linear => 1.0 - t,
        }
    }
}
