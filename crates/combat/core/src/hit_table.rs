//! Cluster hits table.
//!
//! Converts a volley of `shots` sub-projectiles and a modified 2d6 roll into
//! the number of sub-hits that land. The table is the tabletop's literal
//! column data; nothing here is derived by formula.

/// Largest column in the table.
const MAX_COLUMN: u32 = 40;
/// Largest contiguous column; counts between this and [`MAX_COLUMN`] split.
const MAX_CONTIGUOUS: u32 = 30;

/// Rows for 2..=30 shots followed by the 40-shot row; columns are rolls 2..=12.
const CLUSTER_TABLE: [[u8; 11]; 30] = [
    [1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2],           // 2
    [1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3],           // 3
    [1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4],           // 4
    [1, 2, 2, 3, 3, 3, 3, 4, 4, 5, 5],           // 5
    [2, 2, 3, 3, 4, 4, 4, 5, 5, 6, 6],           // 6
    [2, 2, 3, 4, 4, 4, 4, 6, 6, 7, 7],           // 7
    [3, 3, 4, 4, 5, 5, 5, 6, 6, 8, 8],           // 8
    [3, 3, 4, 5, 5, 5, 5, 7, 7, 9, 9],           // 9
    [3, 3, 4, 6, 6, 6, 6, 8, 8, 10, 10],         // 10
    [4, 4, 5, 7, 7, 7, 7, 9, 9, 11, 11],         // 11
    [4, 4, 5, 8, 8, 8, 8, 10, 10, 12, 12],       // 12
    [4, 4, 5, 8, 8, 8, 8, 11, 11, 13, 13],       // 13
    [5, 5, 6, 9, 9, 9, 9, 11, 11, 14, 14],       // 14
    [5, 5, 6, 9, 9, 9, 9, 12, 12, 15, 15],       // 15
    [5, 5, 7, 10, 10, 10, 10, 13, 13, 16, 16],   // 16
    [5, 5, 7, 10, 10, 10, 10, 14, 14, 17, 17],   // 17
    [6, 6, 8, 11, 11, 11, 11, 14, 14, 18, 18],   // 18
    [6, 6, 8, 11, 11, 11, 11, 15, 15, 19, 19],   // 19
    [6, 6, 9, 12, 12, 12, 12, 16, 16, 20, 20],   // 20
    [7, 7, 9, 13, 13, 13, 13, 17, 17, 21, 21],   // 21
    [7, 7, 9, 14, 14, 14, 14, 18, 18, 22, 22],   // 22
    [7, 7, 10, 15, 15, 15, 15, 19, 19, 23, 23],  // 23
    [8, 8, 10, 16, 16, 16, 16, 20, 20, 24, 24],  // 24
    [8, 8, 10, 16, 16, 16, 16, 21, 21, 25, 25],  // 25
    [9, 9, 11, 17, 17, 17, 17, 21, 21, 26, 26],  // 26
    [9, 9, 11, 17, 17, 17, 17, 22, 22, 27, 27],  // 27
    [9, 9, 11, 17, 17, 17, 17, 23, 23, 28, 28],  // 28
    [10, 10, 12, 18, 18, 18, 18, 23, 23, 29, 29], // 29
    [10, 10, 12, 18, 18, 18, 18, 24, 24, 30, 30], // 30
    [12, 12, 18, 24, 24, 24, 24, 32, 32, 40, 40], // 40
];

/// Number of sub-hits landed by a volley.
///
/// `modifier` is the net cluster modifier and `roll` the natural 2d6. A
/// modified roll below 2 lands nothing; above 12 reads the 12 column. A single
/// shot always lands exactly once and `all_shots_hit` returns `shots`.
pub fn hits_landed(shots: u32, modifier: i32, roll: u8, all_shots_hit: bool) -> u32 {
    if all_shots_hit || shots <= 1 {
        return shots;
    }

    let modified = i32::from(roll) + modifier;
    if modified < 2 {
        return 0;
    }
    let column = (modified.min(12) - 2) as usize;

    split_columns(shots)
        .into_iter()
        .map(|block| column_value(block, column))
        .sum()
}

/// Splits counts missing from the table into whole 40-shot blocks, one
/// 30-shot block for anything left above 30, then the remainder.
fn split_columns(shots: u32) -> Vec<u32> {
    let mut blocks = Vec::new();
    let mut remaining = shots;
    while remaining >= MAX_COLUMN {
        blocks.push(MAX_COLUMN);
        remaining -= MAX_COLUMN;
    }
    if remaining > MAX_CONTIGUOUS {
        blocks.push(MAX_CONTIGUOUS);
        remaining -= MAX_CONTIGUOUS;
    }
    if remaining > 0 {
        blocks.push(remaining);
    }
    blocks
}

fn column_value(block: u32, column: usize) -> u32 {
    match block {
        0 => 0,
        1 => 1,
        2..=MAX_CONTIGUOUS => u32::from(CLUSTER_TABLE[(block - 2) as usize][column]),
        _ => u32::from(CLUSTER_TABLE[CLUSTER_TABLE.len() - 1][column]),
    }
}
