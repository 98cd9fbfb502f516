pub mod grid;
pub mod slice;

pub use grid::{arr2_to_i32, arr3_to_i32, i32_to_arr2, i32_to_arr3, map_to_i32};
pub use slice::{
    append_to_rows, clone_arr2, clone_arr3, find_row, find_triple, flip_arr2, index_of,
    index_of_pair, insert_unique, is_same_arr2, is_same_arr2_i32, is_same_arr2_prefix,
};
