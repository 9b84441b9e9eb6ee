//! The five deposit shapes.
//!
//! Each shape exposes `place(feature, attempt, ..) -> bool` and goes through
//! [`Attempt`](crate::attempt::Attempt) for every read and write. The return
//! value reports whether the shape wrote anything, except for geodes, which
//! return `false` only when their anchors abort the attempt.

pub mod dense;
pub mod dike;
pub mod geode;
pub mod sphere;
pub mod vein;
