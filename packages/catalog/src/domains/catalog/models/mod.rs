mod book;
mod recommendation;
mod year;

pub use book::Book;
pub use recommendation::{Recommendation, RecommendationDetail};
pub use year::Year;
