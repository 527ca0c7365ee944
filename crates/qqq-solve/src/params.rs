use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// Floating-point precision of a field on the host or device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 16-bit storage.
    Half,
    /// 32-bit storage.
    Single,
    /// 64-bit storage.
    Double,
}

impl Precision {
    /// Host precision matching a real word of `bytes` bytes.
    pub fn from_word_size(bytes: usize) -> Self {
        if bytes == 4 {
            Precision::Single
        } else {
            Precision::Double
        }
    }

    /// Host precision of the real type `R`.
    pub fn of<R>() -> Self {
        Self::from_word_size(std::mem::size_of::<R>())
    }
}

/// Gauge-link compression on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reconstruct {
    /// Full 18 real numbers per link.
    #[serde(rename = "none")]
    None,
    /// Eight-parameter reconstruction.
    #[serde(rename = "8")]
    Eight,
    /// Twelve-parameter reconstruction.
    #[default]
    #[serde(rename = "12")]
    Twelve,
}

/// Schwarz preconditioning variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchwarzType {
    /// Additive Schwarz.
    #[default]
    Additive,
    /// Multiplicative Schwarz.
    Multiplicative,
}

/// Anisotropic lattice parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnisoParams {
    /// Bare anisotropy.
    pub xi_0: f64,
    /// Fermion anisotropy.
    pub nu: f64,
}

/// Multigrid preconditioner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultigridParams {
    /// Preconditioner precision, half when unset.
    #[serde(default)]
    pub precision: Option<Precision>,
    /// Preconditioner link reconstruction, 12 when unset.
    #[serde(default)]
    pub reconstruct: Option<Reconstruct>,
    /// Preconditioner tolerance.
    #[serde(default = "default_mg_tol")]
    pub tol: f64,
    /// Preconditioner iteration cap.
    #[serde(default = "default_mg_max_iterations")]
    pub max_iterations: usize,
    /// Krylov subspace size of the outer GCR.
    #[serde(default = "default_gcr_nkrylov")]
    pub outer_gcr_nkrylov: usize,
    /// Schwarz variant, additive when unset.
    #[serde(default)]
    pub schwarz_type: Option<SchwarzType>,
    /// Outer relaxation parameter.
    #[serde(default = "default_omega")]
    pub relaxation_omega_outer: f64,
}

fn default_mg_tol() -> f64 {
    1.0e-1
}

fn default_mg_max_iterations() -> usize {
    10
}

fn default_gcr_nkrylov() -> usize {
    12
}

fn default_omega() -> f64 {
    1.0
}

impl Default for MultigridParams {
    fn default() -> Self {
        Self {
            precision: None,
            reconstruct: None,
            tol: default_mg_tol(),
            max_iterations: default_mg_max_iterations(),
            outer_gcr_nkrylov: default_gcr_nkrylov(),
            schwarz_type: None,
            relaxation_omega_outer: default_omega(),
        }
    }
}

/// Parameters of the multigrid clover MdagM solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Target relative residual.
    pub rsd_target: f64,
    /// Accepted multiple of `rsd_target` before a solve counts as failed.
    #[serde(default = "default_tolerance_factor")]
    pub rsd_tolerance_factor: f64,
    /// Outer iteration cap.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Reliable-update delta.
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Device precision, host precision when unset.
    #[serde(default)]
    pub cuda_precision: Option<Precision>,
    /// Sloppy device precision, device precision when unset.
    #[serde(default)]
    pub cuda_sloppy_precision: Option<Precision>,
    /// Link reconstruction, 12 when unset.
    #[serde(default)]
    pub cuda_reconstruct: Option<Reconstruct>,
    /// Sloppy link reconstruction, 12 when unset.
    #[serde(default)]
    pub cuda_sloppy_reconstruct: Option<Reconstruct>,
    /// Anti-periodic temporal boundary already applied to the links.
    #[serde(default = "default_true")]
    pub anti_periodic_t: bool,
    /// Links are fixed to temporal axial gauge.
    #[serde(default)]
    pub axial_gauge: bool,
    /// Autotune the dslash kernels.
    #[serde(default)]
    pub tune_dslash: bool,
    /// Verbose backend output.
    #[serde(default)]
    pub verbose: bool,
    /// Report tolerance violations instead of failing.
    #[serde(default)]
    pub silent_fail: bool,
    /// Asymmetric even-odd preconditioning, needs the clover term itself.
    #[serde(default)]
    pub asymmetric_clover: bool,
    /// Anisotropy, isotropic when unset.
    #[serde(default)]
    pub aniso: Option<AnisoParams>,
    /// Iteration count above which the subspace is regenerated.
    #[serde(default = "default_threshold_count")]
    pub threshold_count: usize,
    /// Cache key of the multigrid subspace.
    pub subspace_id: String,
    /// Multigrid preconditioner block.
    #[serde(default)]
    pub multigrid: MultigridParams,
}

fn default_tolerance_factor() -> f64 {
    10.0
}

fn default_max_iter() -> usize {
    1000
}

fn default_delta() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_threshold_count() -> usize {
    500
}

impl SolverParams {
    /// Parameters with defaults for everything but the target and subspace id.
    pub fn new(rsd_target: f64, subspace_id: impl Into<String>) -> Self {
        Self {
            rsd_target,
            rsd_tolerance_factor: default_tolerance_factor(),
            max_iter: default_max_iter(),
            delta: default_delta(),
            cuda_precision: None,
            cuda_sloppy_precision: None,
            cuda_reconstruct: None,
            cuda_sloppy_reconstruct: None,
            anti_periodic_t: true,
            axial_gauge: false,
            tune_dslash: false,
            verbose: false,
            silent_fail: false,
            asymmetric_clover: false,
            aniso: None,
            threshold_count: default_threshold_count(),
            subspace_id: subspace_id.into(),
            multigrid: MultigridParams::default(),
        }
    }

    /// Parses a YAML parameter block.
    pub fn from_yaml(text: &str) -> Result<Self, SolveError> {
        serde_yaml::from_str(text).map_err(|err| SolveError::invalid("yaml", err.to_string()))
    }

    /// Largest relative residual a solve may return.
    pub fn max_tolerated(&self) -> f64 {
        self.rsd_tolerance_factor * self.rsd_target
    }

    /// Rejects values no solve can use.
    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.rsd_target > 0.0) {
            return Err(SolveError::invalid("rsd_target", "must be positive"));
        }
        if !(self.rsd_tolerance_factor >= 1.0) {
            return Err(SolveError::invalid("rsd_tolerance_factor", "must be at least 1"));
        }
        if self.max_iter == 0 {
            return Err(SolveError::invalid("max_iter", "must be positive"));
        }
        if self.subspace_id.trim().is_empty() {
            return Err(SolveError::invalid("subspace_id", "must not be empty"));
        }
        if let Some(aniso) = &self.aniso {
            if aniso.nu == 0.0 {
                return Err(SolveError::invalid("aniso.nu", "must be non-zero"));
            }
        }
        Ok(())
    }
}
