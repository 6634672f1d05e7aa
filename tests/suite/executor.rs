//! Whole-program executor scenarios.

use piwalk_core::{Digit, Expected, PiVelocity, Position, RunError, RunOutcome, VarRead};

use crate::common::{drain, program, run_to_end, with_output};

// Path 3 1 4 1 5 9 along the top row:
//   under the first 1: n := 1
//   under the 4:       r4 := 4 + n
//   under the 5:       print 5
//   under the 9:       exit
const COUNTER: &str = "\
3 1 4 1 5 9
  v +   v E
  n n   SYS_T";

#[tokio::test]
async fn instructions_run_under_each_visited_cell() {
    let (mut prg, mut output) = with_output(program(COUNTER, &[]));
    assert_eq!(run_to_end(&mut prg).await, RunOutcome::Exited);
    assert_eq!(drain(&mut output), "5");
    assert_eq!(prg.ticks(), 5);
    assert_eq!(prg.registers()[4], Some(5));
    assert!(matches!(
        prg.store_mut().get("n", None),
        VarRead::Ready(Some(1))
    ));
}

#[tokio::test]
async fn syntax_errors_abort_the_run_with_a_location() {
    let mut prg = program("3 1\n  v\n  +", &[]);
    let err = prg.run().await.expect_err("v needs a name operand");
    assert!(matches!(
        err,
        RunError::Syntax {
            expected: Expected::Name,
            ..
        }
    ));
    let at = err.location().expect("syntax errors carry a location");
    assert_eq!((at.row, at.column), (3, 3));
    assert_eq!(
        err.to_string(),
        "expecting name token at row 3, column 3, found operator"
    );
}

#[tokio::test]
async fn reversal_walks_back_to_the_start_of_pi() {
    let mut prg = program("3 1 4\n    :", &[]);
    let RunOutcome::Crashed(end) = run_to_end(&mut prg).await else {
        panic!("walking past index 0 must crash");
    };
    assert_eq!(prg.navigator().pi().velocity(), PiVelocity::Backward);
    assert_eq!(end.position, Position::ORIGIN);
    assert_eq!(end.digit, None);
    assert_eq!(
        end.to_string(),
        "Crashed at (1,1); could not find a digit (end of pi reference)"
    );
    assert_eq!(prg.ticks(), 4);
}

#[tokio::test]
async fn grounded_deref_chain_reads_zero_from_unset_registers() {
    let mut prg = program("3 1\n  .\n  @\n  @\n  v\n  x", &[7]);
    prg.store_mut()
        .set_register(Digit::new(1).expect("digit"), Some(2));
    let RunOutcome::Crashed(_) = run_to_end(&mut prg).await else {
        panic!("the path ends after one step");
    };
    // r1 holds 2, and r2 is unset so the grounded read gives 0.
    assert!(matches!(
        prg.store_mut().get("x", None),
        VarRead::Ready(Some(0))
    ));
}
