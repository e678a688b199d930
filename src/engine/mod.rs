pub mod assignment;
pub mod explanation;
pub mod feedback;
pub mod matching;
pub mod profile;
pub mod queue;
pub mod ranking;
pub mod similarity;
