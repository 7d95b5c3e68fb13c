use serde::{Deserialize, Serialize};

use acuity_image::{image_from_host, image_to_host, ops, ImageBatch, ImageError};

use crate::sharpen::{
    clarity, high_pass_sharpen, smart_sharpen, texture, unsharp_mask, ClarityParams,
    HighPassParams, SmartSharpenParams, TextureParams, UnsharpMaskParams,
};

/// Errors surfaced by the filter registry.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// The requested filter name is not registered.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// The parameter variant does not match the dispatched filter.
    #[error("parameters do not match filter `{0}`")]
    ParamMismatch(&'static str),

    /// An underlying image operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Parameters for any registered filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FilterParams {
    /// Parameters for [`unsharp_mask`].
    UnsharpMask(UnsharpMaskParams),
    /// Parameters for [`high_pass_sharpen`].
    HighPass(HighPassParams),
    /// Parameters for [`clarity`].
    Clarity(ClarityParams),
    /// Parameters for [`texture`].
    Texture(TextureParams),
    /// Parameters for [`smart_sharpen`].
    SmartSharpen(SmartSharpenParams),
}

/// Declarative range of one scalar control, for host-side introspection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    /// Field name of the control.
    pub name: &'static str,
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Default value.
    pub default: f32,
    /// Suggested host widget step.
    pub step: f32,
}

/// A registered filter: machine name, scalar schema and entry point.
pub struct FilterEntry {
    /// Machine name the host dispatches on.
    pub name: &'static str,
    /// Declarative schema of the scalar controls.
    pub params: &'static [ParamSpec],
    run: fn(&ImageBatch<f32, 3>, &FilterParams) -> Result<ImageBatch<f32, 3>, FilterError>,
}

impl FilterEntry {
    /// Run the filter on a normalized batch.
    pub fn apply(
        &self,
        src: &ImageBatch<f32, 3>,
        params: &FilterParams,
    ) -> Result<ImageBatch<f32, 3>, FilterError> {
        (self.run)(src, params)
    }
}

fn run_unsharp(
    src: &ImageBatch<f32, 3>,
    params: &FilterParams,
) -> Result<ImageBatch<f32, 3>, FilterError> {
    let FilterParams::UnsharpMask(p) = params else {
        return Err(FilterError::ParamMismatch("unsharp_mask"));
    };
    let mut dst = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    unsharp_mask(src, &mut dst, p)?;
    Ok(dst)
}

fn run_high_pass(
    src: &ImageBatch<f32, 3>,
    params: &FilterParams,
) -> Result<ImageBatch<f32, 3>, FilterError> {
    let FilterParams::HighPass(p) = params else {
        return Err(FilterError::ParamMismatch("high_pass_sharpen"));
    };
    let mut dst = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    high_pass_sharpen(src, &mut dst, p)?;
    Ok(dst)
}

fn run_clarity(
    src: &ImageBatch<f32, 3>,
    params: &FilterParams,
) -> Result<ImageBatch<f32, 3>, FilterError> {
    let FilterParams::Clarity(p) = params else {
        return Err(FilterError::ParamMismatch("clarity"));
    };
    let mut dst = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    clarity(src, &mut dst, p)?;
    Ok(dst)
}

fn run_texture(
    src: &ImageBatch<f32, 3>,
    params: &FilterParams,
) -> Result<ImageBatch<f32, 3>, FilterError> {
    let FilterParams::Texture(p) = params else {
        return Err(FilterError::ParamMismatch("texture"));
    };
    let mut dst = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    texture(src, &mut dst, p)?;
    Ok(dst)
}

fn run_smart(
    src: &ImageBatch<f32, 3>,
    params: &FilterParams,
) -> Result<ImageBatch<f32, 3>, FilterError> {
    let FilterParams::SmartSharpen(p) = params else {
        return Err(FilterError::ParamMismatch("smart_sharpen"));
    };
    let mut dst = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    smart_sharpen(src, &mut dst, p)?;
    Ok(dst)
}

static REGISTRY: &[FilterEntry] = &[
    FilterEntry {
        name: "unsharp_mask",
        params: &[
            ParamSpec { name: "radius", min: 0.0, max: 100.0, default: 2.0, step: 0.1 },
            ParamSpec { name: "amount", min: 0.0, max: 5.0, default: 1.0, step: 0.05 },
            ParamSpec { name: "threshold", min: 0.0, max: 0.2, default: 0.0, step: 0.005 },
        ],
        run: run_unsharp,
    },
    FilterEntry {
        name: "high_pass_sharpen",
        params: &[
            ParamSpec { name: "radius", min: 0.0, max: 100.0, default: 3.0, step: 0.1 },
            ParamSpec { name: "amount", min: 0.0, max: 3.0, default: 1.0, step: 0.05 },
            ParamSpec { name: "opacity", min: 0.0, max: 1.0, default: 1.0, step: 0.01 },
        ],
        run: run_high_pass,
    },
    FilterEntry {
        name: "clarity",
        params: &[
            ParamSpec { name: "radius", min: 1.0, max: 200.0, default: 24.0, step: 1.0 },
            ParamSpec { name: "strength", min: -1.0, max: 1.0, default: 0.35, step: 0.01 },
            ParamSpec { name: "midtone_softness", min: 0.05, max: 0.5, default: 0.35, step: 0.01 },
        ],
        run: run_clarity,
    },
    FilterEntry {
        name: "texture",
        params: &[
            ParamSpec { name: "radius", min: 0.3, max: 10.0, default: 2.0, step: 0.1 },
            ParamSpec { name: "strength", min: -1.0, max: 1.0, default: 0.4, step: 0.01 },
        ],
        run: run_texture,
    },
    FilterEntry {
        name: "smart_sharpen",
        params: &[
            ParamSpec { name: "radius", min: 0.0, max: 50.0, default: 1.8, step: 0.1 },
            ParamSpec { name: "amount", min: 0.0, max: 5.0, default: 1.2, step: 0.05 },
            ParamSpec { name: "reduce_noise", min: 0.0, max: 1.0, default: 0.15, step: 0.01 },
            ParamSpec { name: "fade_shadows", min: 0.0, max: 1.0, default: 0.2, step: 0.01 },
            ParamSpec { name: "fade_highlights", min: 0.0, max: 1.0, default: 0.2, step: 0.01 },
        ],
        run: run_smart,
    },
];

/// The static filter table, constructed once and never mutated.
pub fn registry() -> &'static [FilterEntry] {
    REGISTRY
}

/// Look up a filter entry by its machine name.
pub fn find(name: &str) -> Option<&'static FilterEntry> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

/// Fold every scalar of a parameter set into its declared range.
///
/// Hosts are expected to validate before invoking; this is the registry's
/// defensive counterpart.
pub fn clamp_params(params: &FilterParams) -> FilterParams {
    match *params {
        FilterParams::UnsharpMask(p) => FilterParams::UnsharpMask(UnsharpMaskParams {
            radius: p.radius.clamp(0.0, 100.0),
            amount: p.amount.clamp(0.0, 5.0),
            threshold: p.threshold.clamp(0.0, 0.2),
            ..p
        }),
        FilterParams::HighPass(p) => FilterParams::HighPass(HighPassParams {
            radius: p.radius.clamp(0.0, 100.0),
            amount: p.amount.clamp(0.0, 3.0),
            opacity: p.opacity.clamp(0.0, 1.0),
            ..p
        }),
        FilterParams::Clarity(p) => FilterParams::Clarity(ClarityParams {
            radius: p.radius.clamp(1.0, 200.0),
            strength: p.strength.clamp(-1.0, 1.0),
            midtone_softness: p.midtone_softness.clamp(0.05, 0.5),
            ..p
        }),
        FilterParams::Texture(p) => FilterParams::Texture(TextureParams {
            radius: p.radius.clamp(0.3, 10.0),
            strength: p.strength.clamp(-1.0, 1.0),
            ..p
        }),
        FilterParams::SmartSharpen(p) => FilterParams::SmartSharpen(SmartSharpenParams {
            radius: p.radius.clamp(0.0, 50.0),
            amount: p.amount.clamp(0.0, 5.0),
            reduce_noise: p.reduce_noise.clamp(0.0, 1.0),
            fade_shadows: p.fade_shadows.clamp(0.0, 1.0),
            fade_highlights: p.fade_highlights.clamp(0.0, 1.0),
        }),
    }
}

/// Run a registered filter on a host tensor.
///
/// Normalizes the layout (channel-last is auto-detected on a trailing axis
/// of 3), dispatches the filter, clamps the result to the unit interval and
/// returns it in channel-last layout.
pub fn run_filter(
    name: &str,
    shape: &[usize],
    data: Vec<f32>,
    params: &FilterParams,
) -> Result<(Vec<usize>, Vec<f32>), FilterError> {
    let entry = find(name).ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?;

    let src = image_from_host(shape, data)?;
    log::debug!("running filter {} on {}", entry.name, src.size());

    let mut out = entry.apply(&src, params)?;
    ops::clamp_unit_mut(&mut out);

    Ok(image_to_host(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names() {
        let names: Vec<_> = registry().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "unsharp_mask",
                "high_pass_sharpen",
                "clarity",
                "texture",
                "smart_sharpen"
            ]
        );
        assert!(find("clarity").is_some());
        assert!(find("emboss").is_none());
    }

    #[test]
    fn test_schema_defaults_match_param_defaults() {
        let entry = find("unsharp_mask").unwrap();
        let defaults = UnsharpMaskParams::default();
        let radius = entry.params.iter().find(|p| p.name == "radius").unwrap();
        assert_eq!(radius.default, defaults.radius);

        let entry = find("smart_sharpen").unwrap();
        let defaults = SmartSharpenParams::default();
        let amount = entry.params.iter().find(|p| p.name == "amount").unwrap();
        assert_eq!(amount.default, defaults.amount);
    }

    #[test]
    fn test_schema_serializes() {
        let entry = find("clarity").unwrap();
        let json = serde_json::to_string(entry.params).unwrap();
        assert!(json.contains("\"midtone_softness\""));
        assert!(json.contains("\"min\":0.05"));
    }

    #[test]
    fn test_clamp_params() {
        let wild = FilterParams::Clarity(ClarityParams {
            radius: 1e6,
            strength: -7.0,
            midtone_softness: 0.0,
            ..Default::default()
        });
        let FilterParams::Clarity(p) = clamp_params(&wild) else {
            panic!("variant changed");
        };
        assert_eq!(p.radius, 200.0);
        assert_eq!(p.strength, -1.0);
        assert_eq!(p.midtone_softness, 0.05);
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let res = run_filter(
            "emboss",
            &[1, 1, 1, 3],
            vec![0.0; 3],
            &FilterParams::UnsharpMask(UnsharpMaskParams::default()),
        );
        assert!(matches!(res, Err(FilterError::UnknownFilter(_))));
    }

    #[test]
    fn test_param_mismatch_is_rejected() {
        let res = run_filter(
            "clarity",
            &[1, 1, 1, 3],
            vec![0.5; 3],
            &FilterParams::UnsharpMask(UnsharpMaskParams::default()),
        );
        assert!(matches!(res, Err(FilterError::ParamMismatch("clarity"))));
    }

    #[test]
    fn test_run_filter_round_trips_layout() -> Result<(), FilterError> {
        // flat mid-gray stays untouched through unsharp masking
        let shape = [2usize, 4, 4, 3];
        let data = vec![0.5f32; 2 * 4 * 4 * 3];

        let (out_shape, out) = run_filter(
            "unsharp_mask",
            &shape,
            data.clone(),
            &FilterParams::UnsharpMask(UnsharpMaskParams::default()),
        )?;

        assert_eq!(out_shape, vec![2, 4, 4, 3]);
        for (o, x) in out.iter().zip(data.iter()) {
            assert!((o - x).abs() < 1e-6);
        }
        Ok(())
    }
}
