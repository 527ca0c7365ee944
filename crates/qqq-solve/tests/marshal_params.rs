use qqq_solve::{
    gauge_padding, marshal, AnisoParams, Precision, Reconstruct, SchwarzType, SolveError,
    SolverParams, TimeBoundary, Verbosity,
};

fn params() -> SolverParams {
    SolverParams::new(1.0e-9, "mg-subspace")
}

#[test]
fn host_precision_follows_word_size() {
    assert_eq!(Precision::of::<f32>(), Precision::Single);
    assert_eq!(Precision::of::<f64>(), Precision::Double);
    assert_eq!(Precision::from_word_size(4), Precision::Single);
    assert_eq!(Precision::from_word_size(8), Precision::Double);
}

#[test]
fn unset_precisions_fall_back_in_order() {
    let (gauge, invert) = marshal(&params(), [4, 4, 4, 8], Precision::Double).unwrap();
    assert_eq!(gauge.cpu_prec, Precision::Double);
    assert_eq!(gauge.cuda_prec, Precision::Double);
    assert_eq!(gauge.cuda_prec_sloppy, Precision::Double);
    assert_eq!(gauge.cuda_prec_precondition, Precision::Half);
    assert_eq!(invert.cuda_prec_sloppy, Precision::Double);

    let mut p = params();
    p.cuda_precision = Some(Precision::Single);
    let (gauge, invert) = marshal(&p, [4, 4, 4, 8], Precision::Double).unwrap();
    assert_eq!(gauge.cuda_prec, Precision::Single);
    assert_eq!(gauge.cuda_prec_sloppy, Precision::Single);
    assert_eq!(invert.cpu_prec, Precision::Double);

    p.cuda_sloppy_precision = Some(Precision::Half);
    let (gauge, _) = marshal(&p, [4, 4, 4, 8], Precision::Double).unwrap();
    assert_eq!(gauge.cuda_prec_sloppy, Precision::Half);
}

#[test]
fn defaults_match_the_fixed_inverter_setup() {
    let (gauge, invert) = marshal(&params(), [4, 4, 4, 8], Precision::Single).unwrap();
    assert_eq!(gauge.reconstruct, Reconstruct::Twelve);
    assert_eq!(gauge.reconstruct_sloppy, Reconstruct::Twelve);
    assert_eq!(gauge.reconstruct_precondition, Reconstruct::Twelve);
    assert_eq!(gauge.t_boundary, TimeBoundary::AntiPeriodic);
    assert!(!gauge.gauge_fixed);
    assert_eq!(gauge.anisotropy, 1.0);
    assert_eq!(invert.kappa, 0.5);
    assert_eq!(invert.tol, 1.0e-9);
    assert_eq!(invert.maxiter, 1000);
    assert_eq!(invert.reliable_delta, 0.1);
    assert_eq!(invert.schwarz_type, SchwarzType::Additive);
    assert_eq!(invert.precondition_cycle, 1);
    assert_eq!(invert.verbosity, Verbosity::Summarize);
    assert_eq!(invert.verbosity_precondition, Verbosity::Silent);
    assert!(!invert.tune);
}

#[test]
fn flags_switch_boundary_gauge_and_verbosity() {
    let mut p = params();
    p.anti_periodic_t = false;
    p.axial_gauge = true;
    p.verbose = true;
    p.tune_dslash = true;
    p.asymmetric_clover = true;
    p.aniso = Some(AnisoParams { xi_0: 2.0, nu: 0.5 });
    let (gauge, invert) = marshal(&p, [4, 4, 4, 8], Precision::Double).unwrap();
    assert_eq!(gauge.t_boundary, TimeBoundary::Periodic);
    assert!(gauge.gauge_fixed);
    assert_eq!(gauge.anisotropy, 4.0);
    assert_eq!(invert.verbosity, Verbosity::Verbose);
    assert!(invert.tune);
    assert!(invert.load_clover);
}

#[test]
fn padding_is_the_largest_half_face() {
    assert_eq!(gauge_padding([4, 4, 4, 8]), 64);
    assert_eq!(gauge_padding([8, 4, 4, 16]), 256);
    let (gauge, _) = marshal(&params(), [8, 4, 4, 16], Precision::Double).unwrap();
    assert_eq!(gauge.ga_pad, 256);
}

#[test]
fn invalid_parameters_are_rejected() {
    let mut p = params();
    p.rsd_target = 0.0;
    assert!(matches!(
        marshal(&p, [4, 4, 4, 8], Precision::Double),
        Err(SolveError::InvalidParams { ref field, .. }) if field == "rsd_target"
    ));

    let mut p = params();
    p.subspace_id = " ".to_string();
    assert!(p.validate().is_err());

    let mut p = params();
    p.aniso = Some(AnisoParams { xi_0: 1.0, nu: 0.0 });
    assert!(p.validate().is_err());

    assert!(matches!(
        marshal(&params(), [4, 0, 4, 8], Precision::Double),
        Err(SolveError::InvalidParams { ref field, .. }) if field == "lattice"
    ));
}

#[test]
fn yaml_block_fills_defaults() {
    let p = SolverParams::from_yaml(
        "rsd_target: 1.0e-8
subspace_id: mg
cuda_reconstruct: '8'
threshold_count: 40
multigrid:
  precision: single
  schwarz_type: multiplicative
  max_iterations: 6
",
    )
    .unwrap();
    assert_eq!(p.rsd_tolerance_factor, 10.0);
    assert_eq!(p.threshold_count, 40);
    assert!(p.anti_periodic_t);
    let (gauge, invert) = marshal(&p, [4, 4, 4, 8], Precision::Double).unwrap();
    assert_eq!(gauge.reconstruct, Reconstruct::Eight);
    assert_eq!(gauge.cuda_prec_precondition, Precision::Single);
    assert_eq!(invert.schwarz_type, SchwarzType::Multiplicative);
    assert_eq!(invert.maxiter_precondition, 6);
    assert_eq!(invert.gcr_nkrylov, 12);

    assert!(SolverParams::from_yaml("subspace_id: mg\n").is_err());
}

#[test]
fn marshaled_records_serialize() {
    let (gauge, _) = marshal(&params(), [4, 4, 4, 8], Precision::Double).unwrap();
    let json = serde_json::to_value(&gauge).unwrap();
    assert_eq!(json["t_boundary"], "anti-periodic");
    assert_eq!(json["reconstruct"], "12");
    assert_eq!(json["cuda_prec_precondition"], "half");
}
