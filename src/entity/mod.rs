pub mod composition;

pub use composition::{Composition, CompositionCreate, CompositionUpdate, MealType};
