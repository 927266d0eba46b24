//! Exercise variants.
//!
//! Each module owns one question type and implements
//! [`Exercise`](crate::exercise_engine::exercise::Exercise) plus whichever
//! input capabilities it supports:
//!
//! | Module | Type id | Capabilities |
//! |--------|---------|--------------|
//! | `number_line` | `number_line` | locator |
//! | `fraction_comparison` | `fraction_comparison` | locator |
//! | `advanced_comparison` | `advanced_fraction_comparison_{tier}` | choices, locator |
//! | `area_estimation` | `multiplication_{tier}` | grid estimate |
//! | `multiplication_fact` | `multiplication_fact`, `multiplication_fact_choice` | choices, locator (choice form) |

pub mod advanced_comparison;
pub mod area_estimation;
pub mod fraction_comparison;
pub mod multiplication_fact;
pub mod number_line;

pub use advanced_comparison::AdvancedComparison;
pub use area_estimation::AreaEstimation;
pub use fraction_comparison::FractionComparison;
pub use multiplication_fact::{MultiplicationFact, MultiplicationFactChoice};
pub use number_line::NumberLine;
