use ecotorus_core::{CellState, Neighborhood};
use ecotorus_system_rules::{DominantColorSpreads, Rule, RuleEngine, ThresholdRule};

fn window(center: CellState, others: &[(i32, i32, CellState)]) -> Neighborhood {
    let mut neighborhood = Neighborhood::uniform(CellState::Empty);
    neighborhood.set(0, 0, center);
    for (dx, dy, state) in others {
        neighborhood.set(*dx, *dy, *state);
    }
    neighborhood
}

fn ring(center: CellState, state: CellState) -> Neighborhood {
    Neighborhood::from_fn(|dx, dy| if dx == 0 && dy == 0 { center } else { state })
}

#[test]
fn grass_spreads_onto_empty_ground() {
    let engine = RuleEngine::predator_prey();
    let neighborhood = window(CellState::Empty, &[(1, 1, CellState::Grass)]);

    let found = engine.first_match(&neighborhood).expect("rule fires");
    assert_eq!(found.index, 0);
    assert_eq!(found.state, CellState::Grass);
}

#[test]
fn rabbits_eat_neighbouring_grass() {
    let engine = RuleEngine::predator_prey();
    let neighborhood = window(CellState::Grass, &[(-1, 0, CellState::Rabbit)]);

    assert_eq!(engine.evaluate(&neighborhood), Some(CellState::Rabbit));
}

#[test]
fn wolf_surrounded_by_rabbits_disappears() {
    let engine = RuleEngine::predator_prey();
    let neighborhood = ring(CellState::Wolf, CellState::Rabbit);

    let found = engine.first_match(&neighborhood).expect("rule fires");
    assert_eq!(found.name, "too many rabbits");
    assert_eq!(found.state, CellState::Empty);
}

#[test]
fn seven_rabbits_do_not_displace_a_wolf() {
    let engine = RuleEngine::predator_prey();
    let mut neighborhood = ring(CellState::Wolf, CellState::Rabbit);
    neighborhood.set(1, 1, CellState::Grass);

    assert_eq!(engine.evaluate(&neighborhood), None);
}

#[test]
fn wolf_threshold_counts_the_center_itself() {
    let engine = RuleEngine::predator_prey();
    let pack = window(
        CellState::Wolf,
        &[(-1, -1, CellState::Wolf), (1, 1, CellState::Wolf)],
    );
    let pair = window(CellState::Wolf, &[(0, 1, CellState::Wolf)]);

    let found = engine.first_match(&pack).expect("rule fires");
    assert_eq!(found.name, "too many wolves");
    assert_eq!(found.state, CellState::Empty);
    assert_eq!(engine.evaluate(&pair), None);
}

#[test]
fn wolves_kill_neighbouring_rabbits() {
    let engine = RuleEngine::predator_prey();
    let neighborhood = window(CellState::Rabbit, &[(0, -1, CellState::Wolf)]);

    assert_eq!(engine.evaluate(&neighborhood), Some(CellState::Wolf));
}

#[test]
fn empty_window_without_grass_is_left_alone() {
    let engine = RuleEngine::predator_prey();
    let neighborhood = window(
        CellState::Empty,
        &[(1, 0, CellState::Rabbit), (0, 1, CellState::Wolf)],
    );

    assert_eq!(engine.evaluate(&neighborhood), None);
    assert_eq!(engine.next_state(&neighborhood), CellState::Empty);
}

#[test]
fn evaluation_is_repeatable() {
    let engine = RuleEngine::predator_prey();
    let windows = [
        ring(CellState::Wolf, CellState::Rabbit),
        window(CellState::Grass, &[(1, -1, CellState::Rabbit)]),
        window(CellState::Empty, &[]),
        Neighborhood::from_fn(|dx, dy| CellState::from_bits((dx * dy + 2) as u8)),
    ];

    for neighborhood in windows {
        let first = engine.evaluate(&neighborhood);
        for _ in 0..16 {
            assert_eq!(engine.evaluate(&neighborhood), first, "window {neighborhood}");
        }
    }
}

#[test]
fn earlier_rule_wins_when_several_fire() {
    let engine = RuleEngine::new(vec![
        Box::new(ThresholdRule::new(
            "wolf to grass",
            CellState::Wolf,
            CellState::Wolf,
            1,
            CellState::Grass,
        )),
        Box::new(ThresholdRule::too_many_wolves()),
    ]);
    let neighborhood = Neighborhood::uniform(CellState::Wolf);

    assert!(ThresholdRule::too_many_wolves().apply(&neighborhood).is_some());
    let found = engine.first_match(&neighborhood).expect("rule fires");
    assert_eq!(found.index, 0);
    assert_eq!(found.state, CellState::Grass);
}

#[test]
fn rabbit_rule_precedes_wolf_rule_for_wolf_centers() {
    let engine = RuleEngine::predator_prey();
    let names: Vec<_> = engine.rule_names().collect();
    let rabbits = names
        .iter()
        .position(|name| *name == "too many rabbits")
        .expect("rabbit rule present");
    let wolves = names
        .iter()
        .position(|name| *name == "too many wolves")
        .expect("wolf rule present");

    assert!(rabbits < wolves);
}

#[test]
fn dominant_color_takes_over_the_center() {
    let engine = RuleEngine::dominant_color();
    let mut neighborhood = ring(CellState::Empty, CellState::Grass);
    neighborhood.set(-1, -1, CellState::Wolf);

    assert_eq!(engine.evaluate(&neighborhood), Some(CellState::Grass));
}

#[test]
fn dominant_color_declines_on_ties_and_settled_centers() {
    let rule = DominantColorSpreads;
    let tie = Neighborhood::from_fn(|dx, _| match dx {
        -1 => CellState::Rabbit,
        0 => CellState::Wolf,
        _ => CellState::Grass,
    });
    let settled = ring(CellState::Wolf, CellState::Wolf);

    assert_eq!(rule.apply(&tie), None);
    assert_eq!(rule.apply(&settled), None);
}
