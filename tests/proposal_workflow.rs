use psi_proposals::utils::{approx_eq_arrays, mean_vector};
use psi_proposals::{
    AdditiveLogRatio, MultiChainOptions, NormDriftDraw, NormDriftProposal, ProposalConfig,
    PsiReparameterization, StickBreaking, chain_rngs,
};
use rand::RngExt;
use rand::rngs::StdRng;

const READ_COUNTS: [f64; 3] = [300.0, 100.0, 600.0];

fn multinomial_log_likelihood(psi: &[f64]) -> f64 {
    READ_COUNTS
        .iter()
        .zip(psi)
        .map(|(count, p)| count * p.ln())
        .sum()
}

fn should_accept(log_acceptance: f64, rng: &mut StdRng) -> bool {
    log_acceptance >= 0.0 || rng.random::<f64>().ln() < log_acceptance
}

/// Metropolis chain over alpha with a flat prior in alpha space, under which
/// the psi posterior is Dirichlet(READ_COUNTS).
fn run_chain(
    config: ProposalConfig,
    rng: &mut StdRng,
    iterations: usize,
    burn_in: usize,
) -> (Vec<Vec<f64>>, f64) {
    let (covar, chol) = config
        .covariance_with_factor(READ_COUNTS.len() - 1)
        .expect("positive sigma");
    let mut proposal = NormDriftProposal::new(AdditiveLogRatio);
    let mut alpha = vec![0.0; READ_COUNTS.len() - 1];
    let mut current_psi = AdditiveLogRatio.to_psi(&alpha).expect("finite alpha");
    let mut log_target = multinomial_log_likelihood(&current_psi);
    let mut draw = NormDriftDraw::default();
    let mut accepted = 0_u32;
    let mut retained = Vec::with_capacity(iterations - burn_in);

    for iteration in 0..iterations {
        proposal
            .propose_into(&alpha, &covar, &chol, rng, &mut draw)
            .expect("valid proposal");
        let candidate = multinomial_log_likelihood(&draw.psi);
        if should_accept(candidate - log_target, rng) {
            alpha.clone_from(&draw.alpha);
            current_psi.clone_from(&draw.psi);
            log_target = candidate;
            accepted += 1;
        }
        if iteration >= burn_in {
            retained.push(current_psi.clone());
        }
    }
    let rate = f64::from(accepted) / f64::from(u32::try_from(iterations).unwrap_or(u32::MAX));
    (retained, rate)
}

#[test]
fn metropolis_chain_recovers_read_proportions() {
    let config = ProposalConfig::default();
    let mut rng = config.rng();
    let (draws, acceptance) = run_chain(config, &mut rng, 20_000, 2_000);

    let total: f64 = READ_COUNTS.iter().sum();
    let expected: Vec<f64> = READ_COUNTS.iter().map(|count| count / total).collect();
    assert!(approx_eq_arrays(&mean_vector(&draws), &expected, 0.02));
    assert!(acceptance > 0.1 && acceptance < 0.95);
}

#[test]
fn independent_chains_run_in_parallel_and_agree() {
    let config = ProposalConfig::default();
    let rngs = chain_rngs(config.seed, MultiChainOptions::default()).expect("valid options");

    let means: Vec<Vec<f64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = rngs
            .into_iter()
            .map(|mut rng| {
                scope.spawn(move || {
                    let (draws, _) = run_chain(config, &mut rng, 8_000, 1_000);
                    mean_vector(&draws)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("chain thread"))
            .collect()
    });

    assert_eq!(means.len(), 4);
    for other in &means[1..] {
        assert!(approx_eq_arrays(&means[0], other, 0.03));
        assert_ne!(&means[0], other);
    }
}

#[test]
fn first_chain_stream_matches_single_chain_run() {
    let config = ProposalConfig {
        seed: 1_337,
        ..ProposalConfig::default()
    };
    let mut single = config.rng();
    let mut chains = chain_rngs(config.seed, MultiChainOptions::default()).expect("valid");
    let (single_draws, _) = run_chain(config, &mut single, 500, 100);
    let (chain_draws, _) = run_chain(config, &mut chains[0], 500, 100);
    assert_eq!(single_draws, chain_draws);
}

#[test]
fn stick_breaking_proposals_stay_on_simplex() {
    let config = ProposalConfig {
        sigma: 2.0,
        ..ProposalConfig::default()
    };
    let (covar, chol) = config.covariance_with_factor(4).expect("positive sigma");
    let mut rng = config.rng();
    let mut proposal = NormDriftProposal::new(StickBreaking);
    let mut alpha = vec![3.0, -3.0, 0.0, 8.0];
    for _ in 0..2_000 {
        let draw = proposal
            .propose(&alpha, &covar, &chol, &mut rng)
            .expect("valid proposal");
        assert_eq!(draw.psi.len(), 5);
        assert!(draw.psi.iter().all(|value| *value >= 0.0));
        assert!((draw.psi.iter().sum::<f64>() - 1.0).abs() < 1.0e-12);
        let back = proposal
            .reparameterization()
            .to_psi(&draw.alpha)
            .expect("finite alpha");
        assert_eq!(back, draw.psi);
        alpha = draw.alpha;
    }
}

#[test]
fn proposal_density_is_symmetric_for_correlated_factor() {
    let covar = faer::Mat::from_fn(2, 2, |i, j| if i == j { 0.04 } else { 0.01 });
    let chol = psi_proposals::cholesky_lower(&covar).expect("positive definite");
    let proposal = NormDriftProposal::new(AdditiveLogRatio);
    let forward = proposal
        .log_density(&[0.1, -0.4], &[0.35, 0.2], &chol)
        .expect("valid");
    let backward = proposal
        .log_density(&[0.35, 0.2], &[0.1, -0.4], &chol)
        .expect("valid");
    assert!((forward - backward).abs() < 1.0e-12);
    assert!(forward.is_finite());
}
