// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-finger drag and drop on a three-column board.
//!
//! This example shows how to:
//! - register columns as drop targets and report their bounds from layout,
//! - drive two drags at once from a scripted gesture stream,
//! - redraw only when [`DragDropState::revision`] moves,
//! - apply completions to application state through an [`OnDrop`] handler.
//!
//! Run:
//! - `cargo run -p understory_demos --example drag_drop_board`
//! - `RUST_LOG=understory_drag_drop=trace cargo run -p understory_demos --example drag_drop_board`

use std::collections::BTreeMap;

use kurbo::{Point, Rect, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_drag_drop::{DragDropState, DragGeometry, OnDrop};

const COLUMNS: [&str; 3] = ["todo", "doing", "done"];
const COLUMN_WIDTH: f64 = 120.0;
const CARD: Size = Size::new(40.0, 20.0);

/// Application state: which cards sit in which column.
#[derive(Debug, Default)]
struct Board {
    columns: BTreeMap<&'static str, Vec<&'static str>>,
}

impl Board {
    fn column_of(&self, card: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(_, cards)| cards.iter().any(|c| *c == card))
            .map(|(column, _)| *column)
    }
}

/// Moving a card between columns is what a drop means on this board.
impl OnDrop<&'static str, &'static str, &'static str> for Board {
    fn on_drop(&mut self, card: &&'static str, from: &&'static str, to: &&'static str) {
        if let Some(cards) = self.columns.get_mut(from) {
            cards.retain(|c| c != card);
        }
        self.columns.entry(*to).or_default().push(*card);
        println!("  dropped {card}: {from} -> {to}");
    }
}

/// One scripted input event.
#[derive(Clone, Copy, Debug)]
enum Gesture {
    Start(&'static str),
    Move(&'static str, Vec2),
    End(&'static str),
}

fn column_bounds(index: usize) -> Rect {
    let x0 = index as f64 * COLUMN_WIDTH;
    Rect::new(x0, 0.0, x0 + COLUMN_WIDTH - 10.0, 300.0)
}

fn card_origin(board: &Board, card: &str) -> Point {
    let column = board.column_of(card).unwrap_or(COLUMNS[0]);
    let index = COLUMNS.iter().position(|c| *c == column).unwrap_or(0);
    let row = board.columns[column]
        .iter()
        .position(|c| *c == card)
        .unwrap_or(0);
    Point::new(
        index as f64 * COLUMN_WIDTH + 10.0,
        20.0 + row as f64 * (CARD.height + 10.0),
    )
}

fn render(state: &DragDropState<&'static str, &'static str, &'static str, Board>) {
    for drag in state.drags() {
        let over = state.hovered_drop(drag.key()).copied().unwrap_or("-");
        println!(
            "  ghost {:<6} at ({:>5.1}, {:>5.1}) over {over}",
            drag.key(),
            drag.position().x,
            drag.position().y,
        );
    }
    for drop in state.drop_targets() {
        if let Some((card, _)) = state.hover(drop.key()) {
            println!("  highlight {} for {card}", drop.key());
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut board = Board::default();
    board.columns.insert("todo", vec!["write", "review"]);
    board.columns.insert("doing", vec!["ship"]);
    board.columns.insert("done", Vec::new());

    let mut state = DragDropState::new(board);
    for (index, column) in COLUMNS.iter().enumerate() {
        state.register_drop(*column).set_bounds(column_bounds(index));
    }

    // Two fingers: "write" goes to done, "ship" goes to done too but arrives second, so it
    // waits until "write" is released.
    let script = [
        Gesture::Start("write"),
        Gesture::Start("ship"),
        Gesture::Move("write", Vec2::new(120.0, 0.0)),
        Gesture::Move("write", Vec2::new(120.0, 10.0)),
        Gesture::Move("ship", Vec2::new(120.0, 0.0)),
        Gesture::Start("write"),
        Gesture::End("write"),
        Gesture::Move("ship", Vec2::new(0.0, 5.0)),
        Gesture::End("ship"),
        Gesture::Move("ship", Vec2::new(10.0, 10.0)),
    ];

    let mut drawn = state.revision();
    for gesture in script {
        println!("{gesture:?}");
        match gesture {
            Gesture::Start(card) => {
                let origin = card_origin(state.handler(), card);
                let from = state.handler().column_of(card).unwrap_or(COLUMNS[0]);
                if !state.register_drag(card, from, DragGeometry::new(origin, CARD)) {
                    println!("  {card} is already being dragged");
                }
            }
            Gesture::Move(card, delta) => state.move_drag(&card, delta),
            Gesture::End(card) => {
                state.end_drag(&card);
            }
        }
        if state.revision() != drawn {
            drawn = state.revision();
            render(&state);
        }
    }

    println!("final board:");
    for (column, cards) in &state.handler().columns {
        println!("  {column:<6} {cards:?}");
    }
}
