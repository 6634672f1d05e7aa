//! `SYS_T` / `SYS_AT` round trips through the driver channels.

use piwalk_core::{Digit, RunError, RunOutcome, Step, VarRead};

use crate::common::{drain, program, run_to_end, scripted_input, with_output};

fn one() -> Digit {
    Digit::new(1).expect("digit")
}

/// Write register 1 to `target` on the first step.
fn writer(target: &str) -> String {
    format!("3 1\n  @\n  v\n  {target}")
}

/// Read `source` into register 1 on the first step.
fn reader(source: &str) -> String {
    format!("3 1\n  ^\n  {source}")
}

#[tokio::test]
async fn decimal_terminal_prints_the_value() {
    let (mut prg, mut output) = with_output(program(&writer("SYS_T"), &[]));
    prg.store_mut().set_register(one(), Some(-42));
    run_to_end(&mut prg).await;
    assert_eq!(drain(&mut output), "-42");
}

#[tokio::test]
async fn ascii_terminal_prints_characters() {
    for (value, expected) in [(65, "A"), (32, " "), (10, "\n"), (7, "\\x7"), (-3, "\\x-3")] {
        let (mut prg, mut output) = with_output(program(&writer("SYS_AT"), &[]));
        prg.store_mut().set_register(one(), Some(value));
        run_to_end(&mut prg).await;
        assert_eq!(drain(&mut output), expected, "value {value}");
    }
}

#[tokio::test]
async fn indirect_reserved_names_are_plain_variables() {
    let (mut prg, mut output) = with_output(program(&writer("SYS_T@1"), &[]));
    prg.store_mut().set_register(one(), Some(4));
    run_to_end(&mut prg).await;
    assert_eq!(drain(&mut output), "");
    assert!(matches!(
        prg.store_mut().get("SYS_T[4]", None),
        VarRead::Ready(Some(4))
    ));
}

#[tokio::test]
async fn decimal_read_parses_one_digit() {
    for (reply, expected) in [("5", 5), ("57", 5), ("x", -1), ("", -1)] {
        let (prg, mut output) = with_output(program(&reader("SYS_T"), &[]));
        let mut prg = prg.with_input(scripted_input(&[reply]));
        assert_eq!(prg.step().await.expect("read"), Step::Continue);
        assert_eq!(prg.registers()[1], Some(expected), "reply {reply:?}");
        assert_eq!(drain(&mut output), "", "reads do not echo");
        assert!(!prg.store().is_halted());
    }
}

#[tokio::test]
async fn ascii_read_takes_the_code_point() {
    for (reply, expected) in [("A", 65), ("hello", 104), ("", 32)] {
        let mut prg = program(&reader("SYS_AT"), &[]).with_input(scripted_input(&[reply]));
        prg.step().await.expect("read");
        assert_eq!(prg.registers()[1], Some(expected), "reply {reply:?}");
    }
}

#[tokio::test]
async fn echo_program_copies_input_to_output() {
    // Column 2 reads a character into r1; column 6 writes r1 back out.
    let source = "\
3 1 4 1
  |   @
  ^   v
  SYS_AT";
    let (prg, mut output) = with_output(program(source, &[]));
    let mut prg = prg.with_input(scripted_input(&["q"]));
    let RunOutcome::Crashed(_) = run_to_end(&mut prg).await else {
        panic!("the path ends after the echo");
    };
    assert_eq!(drain(&mut output), "q");
}

#[tokio::test]
async fn hung_up_input_fails_the_read() {
    let mut prg = program(&reader("SYS_T"), &[]).with_input(scripted_input(&[]));
    let err = prg.step().await.expect_err("no reply will come");
    assert!(matches!(err, RunError::InputUnavailable));
    assert!(!prg.store().is_halted());
    assert_eq!(prg.store().pending_reads(), 0);
}
