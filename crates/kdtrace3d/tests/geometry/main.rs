mod common;
mod packed_tree;
mod trace_vs_exhaustive;
