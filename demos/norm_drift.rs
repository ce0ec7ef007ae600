use psi_proposals::utils::mean_vector;
use psi_proposals::{
    AdditiveLogRatio, NormDriftDraw, NormDriftProposal, ProposalConfig, PsiReparameterization,
};
use rand::RngExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Reads assigned to each of three isoforms.
const READ_COUNTS: [f64; 3] = [120.0, 45.0, 235.0];

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("psi_proposals=debug,norm_drift=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ProposalConfig::default();
    config.validate().expect("default config is valid");
    let (covar, chol) = config
        .covariance_with_factor(READ_COUNTS.len() - 1)
        .expect("positive sigma");
    let mut rng = config.rng();
    let mut proposal = NormDriftProposal::new(AdditiveLogRatio);

    let mut alpha = vec![0.0; READ_COUNTS.len() - 1];
    let mut psi = AdditiveLogRatio.to_psi(&alpha).expect("finite alpha");
    let mut log_target = log_likelihood(&psi);
    let mut draw = NormDriftDraw::default();
    let mut retained = Vec::new();
    let mut accepted = 0_u32;

    for iteration in 0..10_000 {
        proposal
            .propose_into(&alpha, &covar, &chol, &mut rng, &mut draw)
            .expect("valid proposal");
        let candidate = log_likelihood(&draw.psi);
        let delta = candidate - log_target;
        if delta >= 0.0 || rng.random::<f64>().ln() < delta {
            alpha.clone_from(&draw.alpha);
            psi.clone_from(&draw.psi);
            log_target = candidate;
            accepted += 1;
        }
        if iteration >= 1_000 {
            retained.push(psi.clone());
        }
    }

    let mean = mean_vector(&retained);
    info!(
        accepted,
        posterior_mean = ?mean,
        "normal-drift chain finished"
    );
    println!("posterior mean psi: {mean:.3?}");
}

fn log_likelihood(psi: &[f64]) -> f64 {
    READ_COUNTS.iter().zip(psi).map(|(count, p)| count * p.ln()).sum()
}
