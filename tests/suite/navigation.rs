//! Navigation scenarios: walking the π digits through a grid.

use piwalk_core::{Digit, Direction, Position, RunOutcome, Step, Tick};

use crate::common::{program, run_to_end};

#[tokio::test]
async fn straight_path_exits_under_the_third_cell() {
    let mut prg = program("3 1 4 1\n    E", &[]);
    assert_eq!(run_to_end(&mut prg).await, RunOutcome::Exited);
    assert_eq!(prg.ticks(), 2);
    assert_eq!(prg.position(), Position::new(4, 0));
    assert_eq!(prg.pi_index(), 2);
}

#[tokio::test]
async fn missing_first_digit_crashes_at_the_origin() {
    let mut prg = program("3 5", &[]);
    let RunOutcome::Crashed(end) = run_to_end(&mut prg).await else {
        panic!("expected a crash");
    };
    assert_eq!(end.position, Position::ORIGIN);
    assert_eq!(end.digit, Digit::new(1));
    assert_eq!(end.to_string(), "Crashed at (1,1); could not find 1");
    assert_eq!(prg.ticks(), 0);
}

#[tokio::test]
async fn diagonal_steps_follow_the_digits() {
    // 3 -> 1 (SE) -> 4 (NE) -> 1 (E) -> 5 (SE)
    let source = "3 4 1\n 1   5";
    let mut prg = program(source, &[]);
    let mut directions = Vec::new();
    for _ in 0..4 {
        match prg.tick() {
            Tick::Moved { direction, .. } => directions.push(direction),
            Tick::DeadEnd(end) => panic!("unexpected dead end: {end}"),
        }
    }
    assert_eq!(
        directions,
        [Direction::SE, Direction::NE, Direction::E, Direction::SE]
    );
    assert_eq!(prg.position(), Position::new(5, 1));
}

#[tokio::test]
async fn never_steps_straight_back() {
    // After 3 -> 1 -> 4 the next 1 exists only behind us.
    let mut prg = program("3 1 4", &[]);
    assert_eq!(prg.step().await.expect("step"), Step::Continue);
    assert_eq!(prg.step().await.expect("step"), Step::Continue);
    let step = prg.step().await.expect("step");
    let Step::Crashed(end) = step else {
        panic!("expected a crash, got {step:?}");
    };
    assert_eq!(end.position, Position::new(4, 0));
    assert_eq!(end.to_string(), "Crashed at (5,1); could not find 1");
}

#[tokio::test]
async fn ties_break_on_the_previous_digit_register() {
    // From the origin both E and SE hold a 1; register 3 (the digit just
    // left) picks index 1 of [SE, E].
    let mut prg = program("3 1\n 1", &[]);
    prg.store_mut()
        .set_register(Digit::new(3).expect("digit"), Some(1));
    let Tick::Moved { direction, .. } = prg.tick() else {
        panic!("expected a move");
    };
    assert_eq!(direction, Direction::E);

    let mut prg = program("3 1\n 1", &[]);
    prg.store_mut()
        .set_register(Digit::new(3).expect("digit"), Some(-4));
    let Tick::Moved { direction, .. } = prg.tick() else {
        panic!("expected a move");
    };
    assert_eq!(direction, Direction::SE);
}

#[tokio::test]
async fn floating_tie_break_draws_from_entropy() {
    let mut prg = program("3 1\n 1", &[3]);
    let Tick::Moved { direction, .. } = prg.tick() else {
        panic!("expected a move");
    };
    assert_eq!(direction, Direction::E);
}

#[tokio::test]
async fn priority_branch_takes_the_first_candidate() {
    // `P` under the first 1 marks key 1 as priority. From (2,0) the 4 sits
    // both SE and E; the tie is keyed by the 1 just left.
    let source = "3 1 4\n  |4\n  P";
    let mut prg = program(source, &[1]);
    assert_eq!(prg.step().await.expect("step"), Step::Continue);
    let Tick::Moved { direction, .. } = prg.tick() else {
        panic!("expected a move");
    };
    assert_eq!(direction, Direction::SE);
}

#[tokio::test]
async fn branch_override_picks_among_candidates() {
    let mut prg = program("3 1\n 1", &[0]).with_branch_override(Box::new(
        |candidates: &[Direction]| candidates.last().copied(),
    ));
    let Tick::Moved { direction, .. } = prg.tick() else {
        panic!("expected a move");
    };
    assert_eq!(direction, Direction::E);
}

#[tokio::test]
async fn override_outside_the_candidates_is_ignored() {
    let mut prg = program("3 1\n 1", &[0])
        .with_branch_override(Box::new(|_: &[Direction]| Some(Direction::NW)));
    let Tick::Moved { direction, .. } = prg.tick() else {
        panic!("expected a move");
    };
    assert_eq!(direction, Direction::SE);
}

#[tokio::test]
async fn bounds_hide_cells_outside_the_box() {
    let mut prg = program("3 1 4", &[]).with_bounds(Position::new(0, 0), Position::new(3, 3));
    assert!(matches!(prg.tick(), Tick::Moved { .. }));
    let Tick::DeadEnd(end) = prg.tick() else {
        panic!("the 4 lies outside the box");
    };
    assert_eq!(end.digit, Digit::new(4));
}
