//! Tokenizer properties over whole sources.

use std::sync::Arc;

use piwalk_core::{Digit, Grid, Position, Token, TokenKind};

fn at(grid: &Grid, x: i64, y: i64) -> &Token {
    grid.get(Position::new(x, y))
}

fn name(text: &str) -> Token {
    Token::Name(Arc::from(text))
}

#[test]
fn every_column_gets_exactly_one_token() {
    let source = "3 1 4\n  v total\n  SYS_AT #\n@ x@1 P|";
    let grid = Grid::parse(source);
    for (row, line) in grid.rows().iter().zip(source.lines()) {
        assert_eq!(row.len(), line.chars().count(), "line {line:?}");
    }
}

#[test]
fn names_fill_every_column_they_cover() {
    let grid = Grid::parse("  total");
    for x in 2..7 {
        assert_eq!(at(&grid, x, 0), &name("total"));
    }
    assert_eq!(at(&grid, 7, 0), &Token::Empty);
}

#[test]
fn opcode_letters_are_operators_only_when_alone() {
    let grid = Grid::parse("v vx E|P Ex");
    assert_eq!(at(&grid, 0, 0), &Token::Operator('v'));
    assert_eq!(at(&grid, 2, 0), &name("vx"));
    assert_eq!(at(&grid, 5, 0), &Token::Operator('E'));
    assert_eq!(at(&grid, 6, 0), &Token::Operator('|'));
    assert_eq!(at(&grid, 7, 0), &Token::Operator('P'));
    assert_eq!(at(&grid, 9, 0), &name("Ex"));
}

#[test]
fn digits_split_names_only_at_the_start() {
    let grid = Grid::parse("a1 1a");
    assert_eq!(at(&grid, 0, 0), &name("a1"));
    assert_eq!(at(&grid, 1, 0), &name("a1"));
    assert_eq!(
        at(&grid, 3, 0),
        &Token::Path(Digit::new(1).expect("digit"))
    );
    assert_eq!(at(&grid, 4, 0), &name("a"));
}

#[test]
fn indirect_names_keep_their_suffix() {
    let grid = Grid::parse("cell@3 arr[2]");
    assert_eq!(at(&grid, 0, 0), &name("cell@3"));
    assert_eq!(at(&grid, 7, 0), &name("arr[2]"));
}

#[test]
fn symbols_outside_the_operator_set_are_unknown() {
    let grid = Grid::parse("# ! =");
    assert_eq!(at(&grid, 0, 0).kind(), TokenKind::Unknown);
    assert_eq!(at(&grid, 2, 0).kind(), TokenKind::Unknown);
    assert_eq!(at(&grid, 4, 0), &Token::Operator('='));
}

#[test]
fn line_endings_and_trailing_blanks_are_dropped() {
    let grid = Grid::parse("3 1  \t\r\n  v\r\n");
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.rows()[0].len(), 3);
    assert_eq!(grid.rows()[2].len(), 0);
    assert_eq!(grid.width(), 3);
}

#[test]
fn reads_outside_the_source_are_empty() {
    let grid = Grid::parse("31");
    assert_eq!(at(&grid, -1, 0), &Token::Empty);
    assert_eq!(at(&grid, 0, 5), &Token::Empty);
    assert_eq!(at(&grid, 40, 0), &Token::Empty);
}
