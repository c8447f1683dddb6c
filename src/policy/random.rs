use super::{Policy, PolicyContext};
use rand::{Rng, RngCore};

/// Uniform over the whole action space.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose_action(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> usize {
        rng.gen_range(0..ctx.catalog.action_count())
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, AgentState};
    use crate::catalog::Catalog;
    use crate::core::tick::Observation;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_stays_in_range_and_covers_space() {
        let catalog = Catalog::standard();
        let observation = Observation::of(&AgentState::new(100, catalog.weapons.len()));
        let ctx = PolicyContext {
            agent: AgentId(0),
            observation: &observation,
            step: 0,
            catalog: &catalog,
            max_weapon_level: 5,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = vec![false; catalog.action_count()];
        for _ in 0..1000 {
            let code = RandomPolicy.choose_action(&ctx, &mut rng);
            assert!(code < catalog.action_count());
            seen[code] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
