use ecotorus_core::{Brush, CellCoord, CellState, Command, GridSize};
use ecotorus_system_painting::{Config, PaintInput, Painting};
use ecotorus_world::{self as world, query, World};

fn stamps(commands: &[Command]) -> Vec<(CellCoord, Brush)> {
    commands
        .iter()
        .map(|command| match command {
            Command::PaintBrush { center, brush } => (*center, *brush),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn primary_button_stamps_rabbits_under_the_cursor() {
    let mut painting = Painting::new(Config::default());
    let mut commands = Vec::new();

    painting.handle(
        PaintInput::new(Some(CellCoord::new(30, 40)), true, false),
        &mut commands,
    );

    assert_eq!(
        stamps(&commands),
        vec![(CellCoord::new(30, 40), Brush::RABBIT_STAMP)]
    );
}

#[test]
fn secondary_button_drops_a_single_wolf() {
    let mut world = World::default();
    let mut painting = Painting::new(Config::default());
    let mut commands = Vec::new();
    painting.handle(
        PaintInput::new(Some(CellCoord::new(3, 4)), false, true),
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(query::population(&world).count(CellState::Wolf), 1);
    assert_eq!(query::cell(&world, CellCoord::new(3, 4)), CellState::Wolf);
}

#[test]
fn primary_button_wins_when_both_are_held() {
    let config = Config::new(
        Brush::new(CellState::Grass, 3),
        Brush::new(CellState::Wolf, 5),
    );
    let mut painting = Painting::new(config);
    let mut commands = Vec::new();

    painting.handle(
        PaintInput::new(Some(CellCoord::new(1, 1)), true, true),
        &mut commands,
    );

    assert_eq!(stamps(&commands), vec![(CellCoord::new(1, 1), config.primary())]);
}

#[test]
fn released_buttons_and_off_grid_pointers_paint_nothing() {
    let mut painting = Painting::new(Config::default());
    let mut commands = Vec::new();

    painting.handle(
        PaintInput::new(Some(CellCoord::new(1, 1)), false, false),
        &mut commands,
    );
    painting.handle(PaintInput::new(None, true, false), &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn resting_pointer_restamps_every_frame() {
    let mut painting = Painting::new(Config::default());
    let mut commands = Vec::new();
    let input = PaintInput::new(Some(CellCoord::new(8, 8)), true, false);

    for _ in 0..3 {
        painting.handle(input, &mut commands);
    }

    assert_eq!(commands.len(), 3);
}

#[test]
fn fast_strokes_are_filled_in() {
    let mut painting = Painting::new(Config::default());
    let mut commands = Vec::new();
    painting.handle(
        PaintInput::new(Some(CellCoord::new(0, 50)), true, false),
        &mut commands,
    );
    painting.handle(
        PaintInput::new(Some(CellCoord::new(100, 50)), true, false),
        &mut commands,
    );

    let centers: Vec<_> = stamps(&commands)
        .into_iter()
        .map(|(center, _)| center.x())
        .collect();
    assert_eq!(centers, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);

    let mut world = World::new(
        GridSize::new(128, 128).expect("valid size"),
        Default::default(),
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    for x in -10..=110 {
        assert_eq!(
            query::cell(&world, CellCoord::new(x, 50)),
            CellState::Rabbit,
            "gap in stroke at column {x}"
        );
    }
}

#[test]
fn releasing_the_button_starts_a_new_stroke() {
    let mut painting = Painting::new(Config::default());
    let mut commands = Vec::new();
    painting.handle(
        PaintInput::new(Some(CellCoord::new(0, 0)), true, false),
        &mut commands,
    );
    painting.handle(
        PaintInput::new(Some(CellCoord::new(60, 0)), false, false),
        &mut commands,
    );
    painting.handle(
        PaintInput::new(Some(CellCoord::new(60, 0)), true, false),
        &mut commands,
    );

    assert_eq!(commands.len(), 2);
}
