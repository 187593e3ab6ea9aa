pub mod posters;
pub mod providers;
pub mod recommendations;
pub mod recommender;

pub use posters::{PosterLookup, PosterResolver};
pub use recommender::Recommender;
