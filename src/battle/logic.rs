use super::types::Transition;
use crate::agent::{AgentState, BattleInstance, Mode};
use crate::catalog::{BossId, Catalog, WeaponId};
use crate::combat::{apply_retaliation, attack_blocked, compute_damage, roll_loot};
use crate::core::action::Action;
use crate::core::config::EngineConfig;
use crate::core::tick::TickEvent;
use crate::crafting::try_upgrade;
use rand::Rng;
use tracing::{debug, info};

/// Runs one agent's transition for the tick.
///
/// In the world the action is taken at face value. In battle, idle skips the
/// round and every other action attacks the active boss.
pub fn apply_action<R: Rng>(
    agent: &mut AgentState,
    action: Action,
    catalog: &Catalog,
    config: &EngineConfig,
    rng: &mut R,
) -> Transition {
    let active_boss = agent.battle().map(|b| b.boss);
    match (active_boss, action) {
        (None, Action::Idle) => Transition::with_event(TickEvent::Idled),
        (None, Action::Attack(boss)) => engage(agent, boss, catalog),
        (None, Action::Craft(weapon)) => craft(agent, weapon, catalog, config),
        (Some(boss), Action::Idle) => Transition::with_event(TickEvent::Hesitated { boss }),
        (Some(boss), _) => attack_round(agent, boss, catalog, config, rng),
    }
}

fn engage(agent: &mut AgentState, boss: BossId, catalog: &Catalog) -> Transition {
    let boss_health = catalog.boss(boss).max_health as f64;
    agent.mode = Mode::Battle(BattleInstance {
        boss,
        current_health: boss_health,
    });
    debug!(boss = %catalog.boss(boss).name, "Battle started");
    Transition::with_event(TickEvent::BattleStarted { boss, boss_health })
}

fn craft(
    agent: &mut AgentState,
    weapon: WeaponId,
    catalog: &Catalog,
    config: &EngineConfig,
) -> Transition {
    let outcome = try_upgrade(agent, weapon, catalog, config.max_weapon_level);
    let reward = if outcome.applied() {
        agent.stats.upgrades += 1;
        debug!(weapon = %catalog.weapon(weapon).name, ?outcome, "Weapon upgraded");
        config.rewards.upgrade
    } else {
        0.0
    };
    Transition {
        reward,
        terminated: false,
        events: vec![TickEvent::Upgrade { weapon, outcome }],
    }
}

/// One combat round: agent strikes, then a surviving boss strikes back.
fn attack_round<R: Rng>(
    agent: &mut AgentState,
    boss_id: BossId,
    catalog: &Catalog,
    config: &EngineConfig,
    rng: &mut R,
) -> Transition {
    let boss = catalog.boss(boss_id);
    let mut transition = Transition::default();

    // --- Agent strikes ---
    if attack_blocked(agent, boss, config.max_weapon_level) {
        transition
            .events
            .push(TickEvent::AttackBlocked { boss: boss_id });
    }
    let damage = compute_damage(agent, boss_id, catalog, config.max_weapon_level);
    let boss_health = match agent.battle_mut() {
        Some(instance) => {
            instance.current_health = (instance.current_health - damage).max(0.0);
            instance.current_health
        }
        None => 0.0,
    };
    transition.events.push(TickEvent::Attacked {
        boss: boss_id,
        damage,
        boss_health,
    });

    // --- Win resolution ---
    if boss_health <= 0.0 {
        let loot = roll_loot(boss, rng);
        agent.add_loot(&loot);
        agent.leave_battle();
        agent.stats.kills += 1;
        debug!(boss = %boss.name, ?loot, "Boss defeated");
        transition.events.push(TickEvent::BossDefeated {
            boss: boss_id,
            loot,
        });

        if boss.is_final {
            agent.stats.final_boss_kills += 1;
            info!(boss = %boss.name, "Final boss defeated");
            transition.reward = config.rewards.final_boss;
            transition.terminated = true;
            transition
                .events
                .push(TickEvent::FinalBossDefeated { boss: boss_id });
        } else {
            transition.reward = config.rewards.kill;
        }
        return transition;
    }

    // --- Boss strikes back ---
    if boss.retaliation > 0 {
        let taken = apply_retaliation(agent, boss);
        transition.events.push(TickEvent::Retaliated {
            boss: boss_id,
            damage: taken,
            health: agent.health,
        });
    }

    // --- Loss resolution ---
    if agent.health == 0 {
        agent.health = config.starting_health;
        agent.leave_battle();
        agent.stats.losses += 1;
        info!(boss = %boss.name, "Agent knocked out, respawning");
        transition.reward = config.rewards.loss;
        transition
            .events
            .push(TickEvent::AgentDefeated { boss: boss_id });
    }

    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Element, Material};
    use crate::crafting::UpgradeOutcome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        catalog: Catalog,
        config: EngineConfig,
        rng: ChaCha8Rng,
        agent: AgentState,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = Catalog::standard();
            let config = EngineConfig::default();
            let agent = AgentState::new(config.starting_health, catalog.weapons.len());
            Self {
                catalog,
                config,
                rng: ChaCha8Rng::seed_from_u64(42),
                agent,
            }
        }

        fn act(&mut self, action: Action) -> Transition {
            apply_action(
                &mut self.agent,
                action,
                &self.catalog,
                &self.config,
                &mut self.rng,
            )
        }

        fn boss(&self, name: &str) -> BossId {
            self.catalog.boss_by_name(name).unwrap()
        }
    }

    #[test]
    fn test_idle_in_world_changes_nothing() {
        let mut fx = Fixture::new();
        let before = fx.agent.clone();
        let t = fx.act(Action::Idle);
        assert_eq!(t.reward, 0.0);
        assert_eq!(t.events, vec![TickEvent::Idled]);
        assert_eq!(fx.agent, before);
    }

    #[test]
    fn test_engage_deals_no_damage() {
        let mut fx = Fixture::new();
        let fire = fx.boss("fire_boss");
        let t = fx.act(Action::Attack(fire));
        assert_eq!(t.reward, 0.0);
        let battle = fx.agent.battle().unwrap();
        assert_eq!(battle.boss, fire);
        assert_eq!(battle.current_health, 10.0);
    }

    #[test]
    fn test_any_non_idle_action_attacks_in_battle() {
        let mut fx = Fixture::new();
        let fire = fx.boss("fire_boss");
        let water = fx.boss("water_boss");
        fx.act(Action::Attack(fire));

        fx.act(Action::Attack(water));
        fx.act(Action::Craft(WeaponId(2)));

        let battle = fx.agent.battle().unwrap();
        assert_eq!(battle.boss, fire);
        assert_eq!(battle.current_health, 8.0);
        assert_eq!(fx.agent.weapon_level(WeaponId(2)), 0);
    }

    #[test]
    fn test_idle_in_battle_skips_round() {
        let mut fx = Fixture::new();
        let final_boss = fx.boss("final_boss");
        fx.act(Action::Attack(final_boss));

        let t = fx.act(Action::Idle);

        assert_eq!(t.events, vec![TickEvent::Hesitated { boss: final_boss }]);
        assert_eq!(fx.agent.health, 100);
        assert_eq!(fx.agent.battle().unwrap().current_health, 100.0);
    }

    #[test]
    fn test_kill_credits_loot_and_returns_to_world() {
        let mut fx = Fixture::new();
        let fire = fx.boss("fire_boss");
        fx.act(Action::Attack(fire));
        fx.agent.battle_mut().unwrap().current_health = 1.0;

        let t = fx.act(Action::Attack(fire));

        assert_eq!(t.reward, 100.0);
        assert!(!t.terminated);
        assert!(!fx.agent.in_battle());
        assert_eq!(fx.agent.count(Material::Common), 5);
        assert_eq!(fx.agent.count(Material::Stone(Element::Fire)), 2);
        assert_eq!(fx.agent.stats.kills, 1);
    }

    #[test]
    fn test_loss_respawns_at_full_health() {
        let mut fx = Fixture::new();
        let final_boss = fx.boss("final_boss");
        fx.act(Action::Attack(final_boss));
        fx.agent.health = 10;

        let t = fx.act(Action::Attack(final_boss));

        assert_eq!(t.reward, fx.config.rewards.loss);
        assert!(!t.terminated);
        assert_eq!(fx.agent.health, 100);
        assert!(!fx.agent.in_battle());
        assert_eq!(fx.agent.stats.losses, 1);
        assert!(t
            .events
            .iter()
            .any(|e| matches!(e, TickEvent::AttackBlocked { .. })));
        assert!(t
            .events
            .iter()
            .any(|e| matches!(e, TickEvent::AgentDefeated { .. })));
    }

    #[test]
    fn test_final_boss_kill_terminates() {
        let mut fx = Fixture::new();
        let final_boss = fx.boss("final_boss");
        fx.agent.set_weapon_level(WeaponId(0), 5);
        fx.act(Action::Attack(final_boss));

        let first = fx.act(Action::Attack(final_boss));
        assert!(!first.terminated);
        assert_eq!(fx.agent.battle().unwrap().current_health, 40.0);
        assert_eq!(fx.agent.health, 90);

        let second = fx.act(Action::Attack(final_boss));
        assert!(second.terminated);
        assert_eq!(second.reward, fx.config.rewards.final_boss);
        assert_eq!(fx.agent.count(Material::Common), 50);
        assert_eq!(fx.agent.stats.final_boss_kills, 1);
    }

    #[test]
    fn test_craft_in_world() {
        let mut fx = Fixture::new();
        fx.agent.add_material(Material::Common, 10);

        let t = fx.act(Action::Craft(WeaponId(0)));

        assert_eq!(t.reward, 50.0);
        assert_eq!(
            t.events,
            vec![TickEvent::Upgrade {
                weapon: WeaponId(0),
                outcome: UpgradeOutcome::Upgraded { level: 1 },
            }]
        );
        assert!(!fx.agent.in_battle());
    }

    #[test]
    fn test_failed_craft_pays_nothing() {
        let mut fx = Fixture::new();
        let t = fx.act(Action::Craft(WeaponId(0)));
        assert_eq!(t.reward, 0.0);
        assert_eq!(fx.agent.weapon_level(WeaponId(0)), 0);
    }
}
