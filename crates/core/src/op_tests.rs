// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn resize_token_format() {
    let op = OpId::resize(Stage::Move, "/dev/vg0/dst", 3);
    assert_eq!(op.token(), "move resize /dev/vg0/dst 3");
}

#[test]
fn move_chunk_token_format() {
    let op = OpId::move_chunk(Stage::Move, "/dev/vg0/src", 4, "/dev/vg0/dst", 0);
    assert_eq!(op.token(), "move move_chunk /dev/vg0/src 4 /dev/vg0/dst 0");
}

#[parameterized(
    park = { Stage::ReorderPark, "reorder-1" },
    fill = { Stage::ReorderFill, "reorder-2" },
    restore = { Stage::ReorderRestore, "reorder-3" },
    resize = { Stage::Reorder, "reorder" },
)]
fn reorder_stage_names(stage: Stage, expected: &str) {
    let op = OpId::move_chunk(stage, "d", 0, "d", 5);
    assert_eq!(op.stage(), stage);
    assert!(op.token().starts_with(&format!("{expected} ")));
}

#[test]
fn tokens_are_deterministic() {
    let a = OpId::move_chunk(Stage::ReorderFill, "d", 7, "d", 0);
    let b = OpId::move_chunk(Stage::ReorderFill, "d", 7, "d", 0);
    assert_eq!(a, b);
    assert_eq!(a.token(), b.token());
}

#[test]
fn tokens_distinguish_chunk_indices() {
    let a = OpId::move_chunk(Stage::Move, "s", 1, "d", 2);
    let b = OpId::move_chunk(Stage::Move, "s", 2, "d", 1);
    assert_ne!(a.token(), b.token());
}
