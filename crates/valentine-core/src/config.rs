//! Tunables for every effect on the page.
//!
//! All sections deserialize with `#[serde(default)]`, so a host can pass a
//! partial JSON document (for example only `{"evasion": {"suppress_accidental_accept": false}}`)
//! and keep the defaults for everything else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parallax: ParallaxConfig,
    pub evasion: EvasionConfig,
    pub particles: ParticleConfig,
    pub celebration: CelebrationConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Fraction of the remaining distance covered per frame (first-order low-pass).
    pub damping: f32,
    /// Pixel translation at full deflection.
    pub scale_px: f32,
    /// Constant zoom applied so the translated edges never show.
    pub zoom: f32,
    /// Device tilt (degrees) mapped to full deflection.
    pub tilt_gamma_range: f32,
    pub tilt_beta_range: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            damping: 0.04,
            scale_px: 14.0,
            zoom: 1.06,
            tilt_gamma_range: 20.0,
            tilt_beta_range: 35.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvasionConfig {
    /// Inner viewport padding the dodging element never crosses.
    pub padding_px: f32,
    /// Window after a dodge during which a trailing click is treated as accidental.
    pub debounce_ms: u64,
    /// Pointer distance from the element center that triggers a preemptive dodge.
    pub proximity_radius_px: Option<f32>,
    /// Stop the fallback click from reaching the host's own handler.
    pub suppress_accidental_accept: bool,
}

impl Default for EvasionConfig {
    fn default() -> Self {
        Self {
            padding_px: 12.0,
            debounce_ms: 350,
            proximity_radius_px: Some(90.0),
            suppress_accidental_accept: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Hard ceiling on simultaneously active particles; oldest are evicted first.
    pub max_particles: usize,
    /// Fill colors as `[r, g, b]`, picked cyclically by particle index.
    pub palette: Vec<[u8; 3]>,
    /// Upper bound on a single frame delta, seconds.
    pub max_dt: f32,
    /// Delta used on the first frame after the loop (re)starts, seconds.
    pub first_frame_dt: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 1200,
            palette: vec![
                [255, 77, 109],  // rose
                [255, 143, 171], // pink
                [255, 209, 220], // blush
                [255, 255, 255], // white
                [201, 24, 74],   // crimson
            ],
            max_dt: 0.033,
            first_frame_dt: 0.016,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    /// Burst center as a fraction of the viewport (upper-middle region).
    pub center_x_frac: f32,
    pub center_y_frac: f32,
    /// Delay before the second wave, milliseconds. `0` disables it.
    pub second_wave_ms: u64,
    /// Alpha of the white screen flash on celebrate; `0` disables it.
    pub flash_alpha: f32,
    pub flash_ms: u64,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            center_x_frac: 0.5,
            center_y_frac: 0.35,
            second_wave_ms: 280,
            flash_alpha: 0.18,
            flash_ms: 120,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(field: &'static str, value: f64, ok: bool) -> Result<(), ConfigError> {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { field, value })
            }
        }
        let p = &self.parallax;
        check("parallax.damping", p.damping as f64, p.damping > 0.0 && p.damping <= 1.0)?;
        check("parallax.scale_px", p.scale_px as f64, p.scale_px >= 0.0)?;
        check("parallax.zoom", p.zoom as f64, p.zoom >= 1.0)?;
        check("parallax.tilt_gamma_range", p.tilt_gamma_range as f64, p.tilt_gamma_range > 0.0)?;
        check("parallax.tilt_beta_range", p.tilt_beta_range as f64, p.tilt_beta_range > 0.0)?;

        let e = &self.evasion;
        check("evasion.padding_px", e.padding_px as f64, e.padding_px >= 0.0)?;
        if let Some(r) = e.proximity_radius_px {
            check("evasion.proximity_radius_px", r as f64, r > 0.0)?;
        }

        let pc = &self.particles;
        check(
            "particles.max_particles",
            pc.max_particles as f64,
            pc.max_particles > 0,
        )?;
        check(
            "particles.palette",
            pc.palette.len() as f64,
            !pc.palette.is_empty(),
        )?;
        check("particles.max_dt", pc.max_dt as f64, pc.max_dt > 0.0)?;
        check(
            "particles.first_frame_dt",
            pc.first_frame_dt as f64,
            pc.first_frame_dt > 0.0 && pc.first_frame_dt <= pc.max_dt,
        )?;

        let c = &self.celebration;
        check(
            "celebration.center_x_frac",
            c.center_x_frac as f64,
            (0.0..=1.0).contains(&c.center_x_frac),
        )?;
        check(
            "celebration.center_y_frac",
            c.center_y_frac as f64,
            (0.0..=1.0).contains(&c.center_y_frac),
        )?;
        check(
            "celebration.flash_alpha",
            c.flash_alpha as f64,
            (0.0..=1.0).contains(&c.flash_alpha),
        )?;
        Ok(())
    }
}
