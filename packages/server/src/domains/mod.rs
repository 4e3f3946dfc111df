// Business domains
pub mod corpus;
pub mod morphology;
pub mod roots;
