#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure rule evaluation deciding each cell's next state.
//!
//! A [`RuleEngine`] owns an ordered list of [`Rule`] values. Evaluation walks
//! the list top to bottom and stops at the first rule that fires; when no
//! rule fires the focus cell keeps its state. Rules only ever observe a
//! [`Neighborhood`] value, never the grid, so evaluation is deterministic and
//! free of side effects.

use std::fmt;

use ecotorus_core::{CellState, Neighborhood};

/// Pure transform proposing a replacement for the focus cell of a window.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Human readable identifier used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the replacement state when the rule fires, `None` when it declines.
    fn apply(&self, neighborhood: &Neighborhood) -> Option<CellState>;
}

/// Fires when the focus cell holds one state and enough window cells hold another.
///
/// Counts cover all nine cells of the window, the focus cell included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdRule {
    name: &'static str,
    center: CellState,
    counted: CellState,
    at_least: u8,
    becomes: CellState,
}

impl ThresholdRule {
    /// Creates a rule turning a `center` cell into `becomes` once at least
    /// `at_least` of the nine window cells hold `counted`.
    #[must_use]
    pub const fn new(
        name: &'static str,
        center: CellState,
        counted: CellState,
        at_least: u8,
        becomes: CellState,
    ) -> Self {
        Self {
            name,
            center,
            counted,
            at_least,
            becomes,
        }
    }

    /// Empty ground next to grass grows grass.
    #[must_use]
    pub const fn grass_spreads() -> Self {
        Self::new(
            "grass spreads",
            CellState::Empty,
            CellState::Grass,
            1,
            CellState::Grass,
        )
    }

    /// Grass next to a rabbit is eaten and becomes a rabbit.
    #[must_use]
    pub const fn rabbits_eat_grass() -> Self {
        Self::new(
            "rabbits eat grass",
            CellState::Grass,
            CellState::Rabbit,
            1,
            CellState::Rabbit,
        )
    }

    /// A wolf entirely surrounded by rabbits disappears.
    ///
    /// Guards on a wolf center although it counts rabbits; kept as is so the
    /// historical behaviour of the predator-prey table is reproduced.
    #[must_use]
    pub const fn too_many_rabbits() -> Self {
        Self::new(
            "too many rabbits",
            CellState::Wolf,
            CellState::Rabbit,
            8,
            CellState::Empty,
        )
    }

    /// A wolf in a pack of three or more starves.
    #[must_use]
    pub const fn too_many_wolves() -> Self {
        Self::new(
            "too many wolves",
            CellState::Wolf,
            CellState::Wolf,
            3,
            CellState::Empty,
        )
    }

    /// A rabbit next to a wolf is eaten and becomes a wolf.
    #[must_use]
    pub const fn wolves_kill_rabbits() -> Self {
        Self::new(
            "wolves kill rabbits",
            CellState::Rabbit,
            CellState::Wolf,
            1,
            CellState::Wolf,
        )
    }
}

impl Rule for ThresholdRule {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, neighborhood: &Neighborhood) -> Option<CellState> {
        if neighborhood.center() != self.center {
            return None;
        }
        (neighborhood.histogram().count(self.counted) >= self.at_least).then_some(self.becomes)
    }
}

/// The state held by strictly more window cells than any other takes over the center.
///
/// Declines on ties and when the leader already occupies the center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DominantColorSpreads;

impl Rule for DominantColorSpreads {
    fn name(&self) -> &str {
        "dominant color spreads"
    }

    fn apply(&self, neighborhood: &Neighborhood) -> Option<CellState> {
        neighborhood
            .histogram()
            .dominant()
            .filter(|leader| *leader != neighborhood.center())
    }
}

/// Outcome of the first rule that fired for a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleMatch<'engine> {
    /// Position of the rule inside the engine's ordered list.
    pub index: usize,
    /// Name reported by the rule.
    pub name: &'engine str,
    /// Replacement state proposed by the rule.
    pub state: CellState,
}

/// Ordered list of rules evaluated with first-match-wins semantics.
#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Creates an engine evaluating `rules` in the provided order.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The five-rule grass, rabbit and wolf table.
    #[must_use]
    pub fn predator_prey() -> Self {
        Self::new(vec![
            Box::new(ThresholdRule::grass_spreads()),
            Box::new(ThresholdRule::rabbits_eat_grass()),
            Box::new(ThresholdRule::too_many_rabbits()),
            Box::new(ThresholdRule::too_many_wolves()),
            Box::new(ThresholdRule::wolves_kill_rabbits()),
        ])
    }

    /// The single-rule table where the majority state spreads.
    #[must_use]
    pub fn dominant_color() -> Self {
        Self::new(vec![Box::new(DominantColorSpreads)])
    }

    /// Number of rules in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Reports whether the table holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Finds the first rule that fires for `neighborhood`.
    #[must_use]
    pub fn first_match(&self, neighborhood: &Neighborhood) -> Option<RuleMatch<'_>> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            rule.apply(neighborhood).map(|state| RuleMatch {
                index,
                name: rule.name(),
                state,
            })
        })
    }

    /// Replacement proposed by the first firing rule, `None` to keep the center.
    #[must_use]
    pub fn evaluate(&self, neighborhood: &Neighborhood) -> Option<CellState> {
        self.first_match(neighborhood).map(|found| found.state)
    }

    /// State the focus cell holds in the next generation.
    #[must_use]
    pub fn next_state(&self, neighborhood: &Neighborhood) -> CellState {
        self.evaluate(neighborhood).unwrap_or_else(|| neighborhood.center())
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::predator_prey()
    }
}

/// Built-in rule tables selectable through configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RuleSet {
    /// Grass, rabbits and wolves; see [`RuleEngine::predator_prey`].
    #[default]
    PredatorPrey,
    /// Majority spreading; see [`RuleEngine::dominant_color`].
    DominantColor,
}

impl RuleSet {
    /// Builds the engine for this table.
    #[must_use]
    pub fn engine(self) -> RuleEngine {
        match self {
            Self::PredatorPrey => RuleEngine::predator_prey(),
            Self::DominantColor => RuleEngine::dominant_color(),
        }
    }

    /// Short identifier used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PredatorPrey => "predator-prey",
            Self::DominantColor => "dominant-color",
        }
    }
}
