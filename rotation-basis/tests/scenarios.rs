use rotation_basis::basis::{
    find_optimal_basis_with, CostWeights, RotationBound, SolveStatus, SubsetSearchSolver,
};
use rotation_basis::config::{BasisSelectionConfig, SearchConfig};
use rotation_basis::sdr::{decode, decode_masks, encode_bitwise, encode_iterative};
use rotation_basis::{find_optimal_basis, select_basis, Error, Solution};
use std::time::Duration;

const ROTATIONS: [i64; 11] = [3, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const N: usize = 16;

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_sound(rotations: &[i64], solution: &Solution) {
    assert_eq!(solution.reconstructions().len(), rotations.len());
    for (target, members) in rotations.iter().zip(solution.reconstructions()) {
        assert_eq!(members.iter().sum::<i64>(), *target, "{members:?}");
        for member in members {
            assert!(
                solution.rotations().contains(member),
                "{member} is used but not materialized"
            );
        }
    }
}

#[test]
fn test_balanced_weights_materialize_every_target() {
    init_logs();
    let solution = find_optimal_basis(&ROTATIONS, N, 0.5, 0.5).unwrap();

    assert_eq!(solution.objective(), 11.0);
    assert_eq!(solution.rotations(), &ROTATIONS);
    for (target, members) in ROTATIONS.iter().zip(solution.reconstructions()) {
        assert_eq!(members, &vec![*target]);
    }
    assert_sound(&ROTATIONS, &solution);
}

#[test]
fn test_expensive_key_material_shrinks_the_basis() {
    init_logs();
    let solution = find_optimal_basis(&ROTATIONS, N, 0.5, 10.0).unwrap();

    assert!(solution.rotations().len() < ROTATIONS.len());
    assert_eq!(solution.rotations(), &[3, 4, 6, 8]);
    assert!((solution.objective() - 50.5).abs() < 1e-9);
    assert_sound(&ROTATIONS, &solution);

    let uses: usize = solution.reconstructions().iter().map(Vec::len).sum();
    assert_eq!(uses, 21);
}

#[test]
fn test_time_limit_returns_best_known_basis() {
    init_logs();
    let solver = SubsetSearchSolver::new(SearchConfig::default().with_time_limit(Duration::ZERO));
    let solution = find_optimal_basis_with(
        &solver,
        &ROTATIONS,
        RotationBound(N),
        CostWeights::new(0.5, 10.0),
    )
    .unwrap();

    // The search stops before improving on materializing every target
    assert_eq!(solution.rotations(), &ROTATIONS);
    assert_eq!(solution.objective(), 11.0 * 10.0 + 11.0 * 0.5);
    assert_sound(&ROTATIONS, &solution);
}

#[test]
fn test_selection_from_toml_config() {
    init_logs();
    let path = std::env::temp_dir().join(format!("rotation_basis_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
bound = 16
exclude_zero_candidate = true

[weights]
key_material = 10.0
"#,
    )
    .unwrap();
    let config = BasisSelectionConfig::from_toml(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.bound, RotationBound(16));
    assert_eq!(config.weights, CostWeights::new(0.5, 10.0));
    assert_eq!(config.search, SearchConfig::default());

    let solution = select_basis(&ROTATIONS, &config).unwrap();
    assert_eq!(solution.rotations(), &[3, 4, 6, 8]);
    assert_sound(&ROTATIONS, &solution);
}

#[test]
fn test_invalid_configs() {
    assert!(matches!(
        BasisSelectionConfig::from_toml_str("bound = 0"),
        Err(Error::InvalidBound(0))
    ));
    assert!(matches!(
        BasisSelectionConfig::from_toml_str("bound = 4\n[weights]\nlatency = -1.0"),
        Err(Error::InvalidWeight { .. })
    ));
    assert!(matches!(
        BasisSelectionConfig::from_toml_str("weights = 3"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        BasisSelectionConfig::from_toml("/nonexistent/rotation_basis.toml"),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_infeasible_selection_reports_status() {
    // Out of reach of 1 + 2 + ... + 15
    let err = find_optimal_basis(&[200], N, 0.5, 0.5).unwrap_err();
    match err {
        Error::Solver(err) => assert_eq!(err.status(), SolveStatus::Infeasible),
        other => panic!("Unexpected error {other}"),
    }
}

#[test]
fn test_power_of_two_baseline_is_a_valid_basis() {
    // Every term of these non-adjacent forms is a candidate, so materializing them is a valid
    // basis
    let rotations = [3, 5, 7, 9];
    let solution = find_optimal_basis(&rotations, N, 1.0, 1.0).unwrap();
    let baseline_terms: usize = rotations
        .iter()
        .map(|&r| encode_bitwise(r as u64).nonzero_count())
        .sum();
    let mut baseline_keys: Vec<i128> = rotations
        .iter()
        .flat_map(|&r| encode_bitwise(r as u64).terms())
        .collect();
    baseline_keys.sort_unstable();
    baseline_keys.dedup();
    let baseline_cost = (baseline_terms + baseline_keys.len()) as f64;
    assert!(solution.objective() <= baseline_cost);
    assert_sound(&rotations, &solution);
}

#[test]
fn test_codecs_agree() {
    for x in 0..1 << 12 {
        let digits = encode_iterative(x);
        let masks = encode_bitwise(x);
        assert_eq!(decode(&digits), Some(i128::from(x)));
        assert_eq!(
            decode_masks(masks.negative, masks.positive),
            Some(i128::from(x))
        );
        assert_eq!(masks.digits(), digits);
    }
}
