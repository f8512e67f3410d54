// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conservative classification of local transforms.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Affine;

/// Absolute tolerance below which shear/rotation coefficients are treated
/// as zero. Composing translations and scales produces exact zeros; this
/// only absorbs float noise, not small real rotations.
const COEFF_EPSILON: f64 = 1e-12;

/// Classification of a transform's shape, used to decide when a cached
/// axis-aligned box can be reused under it.
///
/// The variants form a conservative hierarchy: `Translation ⊆
/// ScaleTranslation ⊆ General`. Transforming an axis-aligned box by a
/// `Translation` or `ScaleTranslation` transform yields the exact box of
/// the transformed content, so cached boxes stay tight; a `General`
/// transform (any rotation or skew) does not, and cached boxes must not be
/// shortcut through it.
///
/// The class is cheap to compute but is still cached on the node when its
/// transform is set, rather than re-derived on every query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransformClass {
    /// Pure translation (including the identity).
    Translation,
    /// Axis-aligned scale (possibly negative) plus translation.
    ScaleTranslation,
    /// Anything with a rotation or skew component.
    General,
}

impl TransformClass {
    /// Classify a transform by inspecting its coefficients.
    pub fn classify(transform: Affine) -> Self {
        let [a, b, c, d, _, _] = transform.as_coeffs();
        if b.abs() > COEFF_EPSILON || c.abs() > COEFF_EPSILON {
            return Self::General;
        }
        if (a - 1.0).abs() <= COEFF_EPSILON && (d - 1.0).abs() <= COEFF_EPSILON {
            Self::Translation
        } else {
            Self::ScaleTranslation
        }
    }

    /// Returns true if transforming an axis-aligned box by a transform of
    /// this class produces an exact (not merely conservative) box.
    pub fn is_axis_aligned(self) -> bool {
        !matches!(self, Self::General)
    }
}
