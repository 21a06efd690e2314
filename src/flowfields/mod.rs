//! FlowFields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! A rectangular region of the world is divided into a grid of `columns x rows`
//! cells. Cells are indexed from the bottom-left corner of the region, i.e the
//! `(-x, -z)` direction, with columns increasing along `x` and rows along `z`.
//!
//! Definitions:
//!
//! * Obstacle field - sparse mapping of the cells which cannot be traversed,
//! any cell absent from it is open ground
//! * Distance field - dense grid of hop counts from the destination found by
//! a breadth-first flood fill. Cells the fill never reached hold `-1` and
//! impassable cells hold [i32::MAX]
//!
//! ```text
//!  ___________________
//! |_4_|_3_|_2_|_3_|_4_|
//! |_3_|_2_|_1_|_2_|_3_|
//! |_2_|_1_|_0_|_1_|_2_|
//! |_3_|_2_|_1_|_2_|_3_|
//! |_4_|_3_|_2_|_3_|_4_|
//! ```
//!
//! * Direction field - dense grid of unit vectors, each pointing at the
//! neighbour (of 8) with the smallest distance. This is the FlowField actors
//! follow
//!

pub mod error;
pub mod fields;
pub mod grid;
pub mod obstacles;
pub mod utilities;
