//! Two-step `M^dag M` solve through a multigrid backend.
//!
//! With `M^dag = g5 M g5`, the system `M^dag M psi = chi` is solved as
//! `M Y' = g5 chi`, `Y = g5 Y'`, `M psi = Y`.

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::SolveError;
use crate::marshal::{marshal, GaugeParams, InvertParams};
use crate::params::{Precision, SolverParams};
use crate::subspace::SubspaceCache;

/// Fermion field the solver works on.
pub trait SpinorField: Clone {
    /// Multiplies by `gamma_5`.
    fn gamma5(&self) -> Self;

    /// Returns `self - other`.
    fn sub(&self, other: &Self) -> Self;

    /// Squared norm over the operator's subset.
    fn norm2(&self) -> f64;
}

/// Whether an operator is applied as is or daggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// `M`.
    Plus,
    /// `M^dag`.
    Minus,
}

/// The fermion matrix `M`, used for the true-residual check.
pub trait LinearOperator<F> {
    /// Applies `M` or `M^dag` to `psi`.
    fn apply(&self, psi: &F, sign: Sign) -> F;
}

/// Result of a single backend inversion.
#[derive(Debug, Clone)]
pub struct Inversion<F> {
    /// Approximate solution.
    pub solution: F,
    /// Iterations spent.
    pub iterations: usize,
}

/// Device-side multigrid library.
pub trait MultigridBackend<F> {
    /// Opaque subspace handle.
    type Subspace: Clone;

    /// Uploads links and clover terms.
    fn load(&mut self, gauge: &GaugeParams, invert: &InvertParams) -> Result<(), SolveError>;

    /// Builds a fresh multigrid subspace.
    fn create_subspace(&mut self, invert: &InvertParams) -> Result<Self::Subspace, SolveError>;

    /// Refreshes a recovered subspace against the loaded links.
    fn update_subspace(&mut self, subspace: &Self::Subspace) -> Result<(), SolveError>;

    /// Frees a subspace.
    fn destroy_subspace(&mut self, subspace: Self::Subspace);

    /// Solves `M x = source` from a zero guess.
    fn invert(
        &mut self,
        subspace: &Self::Subspace,
        invert: &InvertParams,
        source: &F,
    ) -> Result<Inversion<F>, SolveError>;

    /// Frees links and clover terms.
    fn release(&mut self);
}

/// Outcome of a successful (or silently failed) solve.
#[derive(Debug, Clone)]
pub struct SolveReport<F> {
    /// Solution `psi`.
    pub solution: F,
    /// Iterations of both steps combined.
    pub iterations: usize,
    /// Iterations of the `M Y' = g5 chi` step.
    pub first_iterations: usize,
    /// Iterations of the `M psi = Y` step.
    pub second_iterations: usize,
    /// `|chi - M^dag M psi|`.
    pub residual: f64,
    /// Residual relative to `|chi|`.
    pub relative_residual: f64,
    /// Whether the residual exceeded the tolerance with silent failure on.
    pub out_of_tolerance: bool,
    /// Whether the subspace was rebuilt after this solve.
    pub subspace_regenerated: bool,
    /// Wall time of the two inversions.
    pub elapsed: Duration,
}

/// Multigrid clover solver for `M^dag M psi = chi`.
pub struct MdagMSolver<F, A, B: MultigridBackend<F>> {
    operator: A,
    backend: B,
    params: SolverParams,
    gauge: GaugeParams,
    invert: InvertParams,
    subspace: B::Subspace,
    _field: PhantomData<F>,
}

impl<F, A, B> MdagMSolver<F, A, B>
where
    F: SpinorField,
    A: LinearOperator<F>,
    B: MultigridBackend<F>,
{
    /// Marshals parameters, loads the backend and recovers or creates the
    /// subspace stored under `params.subspace_id`.
    pub fn new<C>(
        operator: A,
        mut backend: B,
        params: SolverParams,
        lattice: [usize; 4],
        host: Precision,
        cache: &mut C,
    ) -> Result<Self, SolveError>
    where
        C: SubspaceCache<Handle = B::Subspace>,
    {
        let (gauge, invert) = marshal(&params, lattice, host)?;
        backend.load(&gauge, &invert)?;
        let subspace = match cache.get(&params.subspace_id) {
            Some(subspace) => {
                info!(id = %params.subspace_id, "recovering multigrid subspace");
                backend.update_subspace(&subspace)?;
                subspace
            }
            None => {
                let subspace = backend.create_subspace(&invert)?;
                info!(id = %params.subspace_id, "storing multigrid subspace");
                cache.put(&params.subspace_id, subspace.clone());
                subspace
            }
        };
        Ok(Self {
            operator,
            backend,
            params,
            gauge,
            invert,
            subspace,
            _field: PhantomData,
        })
    }

    /// Parameters the solver was built with.
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Gauge record handed to the backend.
    pub fn gauge_params(&self) -> &GaugeParams {
        &self.gauge
    }

    /// Inverter record handed to the backend.
    pub fn invert_params(&self) -> &InvertParams {
        &self.invert
    }

    /// Backend the solver drives.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Subspace currently in use.
    pub fn subspace(&self) -> &B::Subspace {
        &self.subspace
    }

    /// Solves `M^dag M psi = chi` from a zero initial guess.
    ///
    /// A relative residual above `rsd_tolerance_factor * rsd_target` is an
    /// error unless `silent_fail` is set. When either step needs more than
    /// `threshold_count` iterations the subspace is rebuilt and stored again.
    pub fn solve<C>(&mut self, chi: &F, cache: &mut C) -> Result<SolveReport<F>, SolveError>
    where
        C: SubspaceCache<Handle = B::Subspace>,
    {
        let start = Instant::now();
        let g5chi = chi.gamma5();
        let first = self.backend.invert(&self.subspace, &self.invert, &g5chi)?;
        let y = first.solution.gamma5();
        let second = self.backend.invert(&self.subspace, &self.invert, &y)?;
        let elapsed = start.elapsed();
        let psi = second.solution;

        let m_psi = self.operator.apply(&psi, Sign::Plus);
        let mdag_m_psi = self.operator.apply(&m_psi, Sign::Minus);
        let residual = chi.sub(&mdag_m_psi).norm2().sqrt();
        let chi_norm = chi.norm2().sqrt();
        let relative_residual = if chi_norm > 0.0 {
            residual / chi_norm
        } else {
            residual
        };
        let iterations = first.iterations + second.iterations;
        info!(
            iterations,
            residual,
            relative_residual,
            seconds = elapsed.as_secs_f64(),
            "multigrid clover solve"
        );

        let max_tolerated = self.params.max_tolerated();
        let out_of_tolerance = relative_residual > max_tolerated || relative_residual.is_nan();
        if out_of_tolerance {
            warn!(
                relative_residual,
                target = self.params.rsd_target,
                max_tolerated,
                "residual outside tolerance"
            );
            if !self.params.silent_fail {
                return Err(SolveError::ResidualOutOfTolerance {
                    relative: relative_residual,
                    target: self.params.rsd_target,
                    max_tolerated,
                    iterations,
                });
            }
        }

        let threshold = self.params.threshold_count;
        let subspace_regenerated = first.iterations > threshold || second.iterations > threshold;
        if subspace_regenerated {
            warn!(
                threshold,
                first = first.iterations,
                second = second.iterations,
                "iteration count above threshold, regenerating multigrid subspace"
            );
            self.regenerate(cache)?;
        }

        Ok(SolveReport {
            solution: psi,
            iterations,
            first_iterations: first.iterations,
            second_iterations: second.iterations,
            residual,
            relative_residual,
            out_of_tolerance,
            subspace_regenerated,
            elapsed,
        })
    }

    fn regenerate<C>(&mut self, cache: &mut C) -> Result<(), SolveError>
    where
        C: SubspaceCache<Handle = B::Subspace>,
    {
        let id = &self.params.subspace_id;
        let stale = cache.remove(id).unwrap_or_else(|| self.subspace.clone());
        self.backend.destroy_subspace(stale);
        self.subspace = self.backend.create_subspace(&self.invert)?;
        info!(id = %id, "storing multigrid subspace");
        cache.put(id, self.subspace.clone());
        Ok(())
    }
}

impl<F, A, B: MultigridBackend<F>> Drop for MdagMSolver<F, A, B> {
    fn drop(&mut self) {
        self.backend.release();
    }
}
