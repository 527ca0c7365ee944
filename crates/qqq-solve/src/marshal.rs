//! Translation of [`SolverParams`] into backend gauge and inverter records.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::params::{Precision, Reconstruct, SchwarzType, SolverParams};

/// Temporal boundary condition baked into the links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeBoundary {
    /// Anti-periodic in time.
    AntiPeriodic,
    /// Periodic in time.
    Periodic,
}

/// Backend verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No output.
    Silent,
    /// Final summary only.
    Summarize,
    /// Per-iteration output.
    Verbose,
}

/// Gauge-field description handed to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeParams {
    /// Local sub-lattice extents.
    pub lattice: [usize; 4],
    /// Host precision.
    pub cpu_prec: Precision,
    /// Device precision.
    pub cuda_prec: Precision,
    /// Sloppy device precision.
    pub cuda_prec_sloppy: Precision,
    /// Preconditioner precision.
    pub cuda_prec_precondition: Precision,
    /// Link reconstruction.
    pub reconstruct: Reconstruct,
    /// Sloppy link reconstruction.
    pub reconstruct_sloppy: Reconstruct,
    /// Preconditioner link reconstruction.
    pub reconstruct_precondition: Reconstruct,
    /// Temporal boundary condition.
    pub t_boundary: TimeBoundary,
    /// Whether the links are gauge fixed.
    pub gauge_fixed: bool,
    /// Temporal anisotropy `xi_0 / nu`, 1 when isotropic.
    pub anisotropy: f64,
    /// Gauge padding, the largest half face volume.
    pub ga_pad: usize,
}

/// Inverter description handed to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertParams {
    /// Hopping parameter; the clover term carries the mass.
    pub kappa: f64,
    /// Residual target.
    pub tol: f64,
    /// Outer iteration cap.
    pub maxiter: usize,
    /// Reliable-update delta.
    pub reliable_delta: f64,
    /// Host precision.
    pub cpu_prec: Precision,
    /// Device precision, shared with the clover field.
    pub cuda_prec: Precision,
    /// Sloppy device precision, shared with the clover field.
    pub cuda_prec_sloppy: Precision,
    /// Preconditioner precision, shared with the clover field.
    pub cuda_prec_precondition: Precision,
    /// Preconditioner tolerance.
    pub tol_precondition: f64,
    /// Preconditioner iteration cap.
    pub maxiter_precondition: usize,
    /// Outer GCR Krylov size.
    pub gcr_nkrylov: usize,
    /// Schwarz variant.
    pub schwarz_type: SchwarzType,
    /// Preconditioner cycles per outer step.
    pub precondition_cycle: usize,
    /// Outer relaxation parameter.
    pub omega: f64,
    /// Outer verbosity.
    pub verbosity: Verbosity,
    /// Preconditioner verbosity.
    pub verbosity_precondition: Verbosity,
    /// Dslash autotuning.
    pub tune: bool,
    /// Whether the clover term itself is loaded next to its inverse.
    pub load_clover: bool,
}

/// Largest of the four half face volumes of `lattice`.
pub fn gauge_padding(lattice: [usize; 4]) -> usize {
    (0..4)
        .map(|skip| {
            lattice
                .iter()
                .enumerate()
                .filter(|(mu, _)| *mu != skip)
                .map(|(_, extent)| extent)
                .product::<usize>()
                / 2
        })
        .max()
        .unwrap_or(0)
}

/// Builds the gauge and inverter records for a local lattice.
pub fn marshal(
    params: &SolverParams,
    lattice: [usize; 4],
    host: Precision,
) -> Result<(GaugeParams, InvertParams), SolveError> {
    params.validate()?;
    if lattice.contains(&0) {
        return Err(SolveError::invalid("lattice", "extents must be positive"));
    }
    let cuda_prec = params.cuda_precision.unwrap_or(host);
    let cuda_prec_sloppy = params.cuda_sloppy_precision.unwrap_or(cuda_prec);
    let mg = &params.multigrid;
    let cuda_prec_precondition = mg.precision.unwrap_or(Precision::Half);
    let anisotropy = match params.aniso {
        Some(aniso) => aniso.xi_0 / aniso.nu,
        None => 1.0,
    };

    let gauge = GaugeParams {
        lattice,
        cpu_prec: host,
        cuda_prec,
        cuda_prec_sloppy,
        cuda_prec_precondition,
        reconstruct: params.cuda_reconstruct.unwrap_or_default(),
        reconstruct_sloppy: params.cuda_sloppy_reconstruct.unwrap_or_default(),
        reconstruct_precondition: mg.reconstruct.unwrap_or_default(),
        t_boundary: if params.anti_periodic_t {
            TimeBoundary::AntiPeriodic
        } else {
            TimeBoundary::Periodic
        },
        gauge_fixed: params.axial_gauge,
        anisotropy,
        ga_pad: gauge_padding(lattice),
    };
    let invert = InvertParams {
        kappa: 0.5,
        tol: params.rsd_target,
        maxiter: params.max_iter,
        reliable_delta: params.delta,
        cpu_prec: host,
        cuda_prec,
        cuda_prec_sloppy,
        cuda_prec_precondition,
        tol_precondition: mg.tol,
        maxiter_precondition: mg.max_iterations,
        gcr_nkrylov: mg.outer_gcr_nkrylov,
        schwarz_type: mg.schwarz_type.unwrap_or_default(),
        precondition_cycle: 1,
        omega: mg.relaxation_omega_outer,
        verbosity: if params.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Summarize
        },
        verbosity_precondition: Verbosity::Silent,
        tune: params.tune_dslash,
        load_clover: params.asymmetric_clover,
    };
    Ok((gauge, invert))
}
